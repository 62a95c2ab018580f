//! HTTP client for the E2E control-plane API.

mod block_storage;
mod error;
mod kubernetes;
mod payload;
mod request;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::config::E2eConfig;
use crate::models::{
    ActionResponse, AttachAction, BlockStorageAttach, BlockStorageCreate, BlockStoragePlan,
    BlockStorageResponse, BlockStorageUpgrade, CreateBlockStorageResponse, Scope,
};

pub use error::ApiError;
pub use kubernetes::JsonObject;
pub use payload::strip_conflicting_node_pool_fields;

const USER_AGENT: &str = concat!("e2e-provider/", env!("CARGO_PKG_VERSION"));

/// Future returned by API operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Block storage endpoints used by the lifecycle controller.
pub trait BlockStorageApi: Send + Sync {
    /// Lists the sizes a volume may be created with.
    fn block_storage_plans<'a>(&'a self, scope: &'a Scope)
    -> ApiFuture<'a, Vec<BlockStoragePlan>>;

    /// Creates a volume.
    fn create_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageCreate,
        scope: &'a Scope,
    ) -> ApiFuture<'a, CreateBlockStorageResponse>;

    /// Fetches a volume by identifier.
    fn get_block_storage<'a>(
        &'a self,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, BlockStorageResponse>;

    /// Attaches the volume to, or detaches it from, a VM.
    fn attach_or_detach_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageAttach,
        action: AttachAction,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse>;

    /// Renames and grows an attached volume.
    fn upgrade_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageUpgrade,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse>;

    /// Deletes a volume.
    fn delete_block_storage<'a>(&'a self, id: &'a str, scope: &'a Scope) -> ApiFuture<'a, ()>;
}

/// Authenticated client for the control-plane REST API.
#[derive(Clone, Debug)]
pub struct E2eClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    auth_token: String,
}

impl E2eClient {
    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &E2eConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ApiError::Client {
                message: err.to_string(),
            })?;

        let mut endpoint = config.api_endpoint.trim().to_owned();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
