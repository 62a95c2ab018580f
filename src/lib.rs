//! Core library for the `e2e-provider` infrastructure tool.
//!
//! The crate wraps the E2E Networks control-plane API: a typed HTTP client
//! for block storage and Kubernetes endpoints, and a lifecycle controller
//! that creates, refreshes, reattaches, upgrades, and deletes block storage
//! volumes while tracking them in a local snapshot.

pub mod api;
pub mod block_storage;
pub mod config;
pub mod models;
pub mod state_store;
pub mod test_support;

pub use api::{ApiError, BlockStorageApi, E2eClient};
pub use block_storage::{
    BlockStorageController, BlockStorageError, BlockStorageSpec, BlockStorageState,
    UpdateFailure, UpdateOutcome, WaitPolicy,
};
pub use config::{ConfigError, E2eConfig};
pub use models::{Location, Scope};
pub use state_store::{StateStore, StateStoreError};
