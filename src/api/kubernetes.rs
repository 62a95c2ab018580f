//! Kubernetes cluster endpoints.
//!
//! Responses are returned as key-ordered JSON maps; only the create payload
//! is typed.

use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::info;

use crate::models::{KubernetesCreate, Scope};

use super::payload::encode_payload;
use super::{ApiError, E2eClient, strip_conflicting_node_pool_fields};

/// Generic JSON object returned by the Kubernetes endpoints.
pub type JsonObject = Map<String, Value>;

impl E2eClient {
    /// Lists master node plans.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-200 status, or an
    /// undecodable body.
    pub async fn get_kubernetes_master_plans(&self, scope: &Scope) -> Result<JsonObject, ApiError> {
        let request = self.request(Method::GET, "kubernetes/plans", Some(scope));
        self.execute_json(request, StatusCode::OK, "kubernetes master plans")
            .await
    }

    /// Lists worker node plans.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-200 status, or an
    /// undecodable body.
    pub async fn get_kubernetes_worker_plans(&self, scope: &Scope) -> Result<JsonObject, ApiError> {
        let request = self.request(Method::GET, "kubernetes/worker-plans/", Some(scope));
        self.execute_json(request, StatusCode::OK, "kubernetes worker plans")
            .await
    }

    /// Creates a cluster after stripping conflicting node-pool fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] before sending anything when the
    /// payload cannot be encoded or has no node pools, and other
    /// [`ApiError`] variants for transport, status, or decode failures.
    pub async fn create_kubernetes_cluster(
        &self,
        cluster: &KubernetesCreate,
        scope: &Scope,
    ) -> Result<JsonObject, ApiError> {
        let mut payload = encode_payload(cluster, "kubernetes create payload")?;
        self.create_kubernetes_cluster_raw(&mut payload, scope).await
    }

    /// Creates a cluster from an untyped payload, shaping it in place first.
    ///
    /// # Errors
    ///
    /// See [`E2eClient::create_kubernetes_cluster`].
    pub async fn create_kubernetes_cluster_raw(
        &self,
        payload: &mut Value,
        scope: &Scope,
    ) -> Result<JsonObject, ApiError> {
        strip_conflicting_node_pool_fields(payload)?;
        info!(location = %scope.location, "creating kubernetes cluster");
        let request = self
            .request(Method::POST, "kubernetes/", Some(scope))
            .json(payload);
        self.execute_json(request, StatusCode::CREATED, "kubernetes create")
            .await
    }

    /// Fetches cluster details.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-200 status, or an
    /// undecodable body.
    pub async fn get_kubernetes_cluster(
        &self,
        id: &str,
        scope: &Scope,
    ) -> Result<JsonObject, ApiError> {
        let request = self.request(Method::GET, &format!("kubernetes/{id}"), Some(scope));
        self.execute_json(request, StatusCode::OK, "kubernetes read")
            .await
    }
}
