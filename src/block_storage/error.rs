//! Error types for the block storage lifecycle.

use thiserror::Error;

use crate::api::ApiError;
use crate::models::BlockStorageStatus;

use super::BlockStorageState;

/// Errors raised by block storage lifecycle operations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BlockStorageError {
    /// Wrapper for API client failures.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Raised when the requested size matches no plan.
    #[error("block storage size {size_gb} GB not available in the plans")]
    SizeNotInPlans {
        /// Requested size in GB, rendered for display.
        size_gb: String,
    },
    /// Raised when an immutable attribute is edited.
    #[error("{field} cannot be changed once the block storage is created")]
    ImmutableField {
        /// Attribute that was edited.
        field: &'static str,
    },
    /// Raised when attachment is requested outside the Available state.
    #[error(
        "block storage cannot be attached to a node unless it is in available state (current status: {status})"
    )]
    AttachRequiresAvailable {
        /// Status at the time of the request.
        status: BlockStorageStatus,
    },
    /// Raised when a resize or rename is requested on a detached volume.
    #[error(
        "cannot upgrade a block storage name or size unless it is attached to a node (current status: {status})"
    )]
    UpgradeRequiresAttached {
        /// Status at the time of the request.
        status: BlockStorageStatus,
    },
    /// Raised when an attached volume is asked to keep or shrink its size.
    #[error(
        "cannot upgrade block storage to {requested_gb} GB: name and size change only when growing beyond {current_gb} GB"
    )]
    UpgradeRequiresLargerSize {
        /// Current size in GB, rendered for display.
        current_gb: String,
        /// Requested size in GB, rendered for display.
        requested_gb: String,
    },
    /// Raised when the API reports no VM for a volume about to be upgraded.
    #[error("block storage {id} reports no attached VM")]
    NotAttached {
        /// Volume identifier.
        id: String,
    },
    /// Raised when the API answers without a success code.
    #[error("{message}")]
    Rejected {
        /// Message returned by the API.
        message: String,
    },
    /// Raised when the account cannot pay for a new volume.
    #[error("insufficient credit: {message}")]
    InsufficientCredit {
        /// Message returned by the API.
        message: String,
    },
    /// Raised when a create response lacks the created volume.
    #[error("create response for block storage {name} carries no volume data")]
    MissingCreateData {
        /// Requested volume name.
        name: String,
    },
    /// Raised when deleting a volume in an in-flight state.
    #[error("block storage {id} cannot be deleted while in {status} state")]
    DeleteInTransientState {
        /// Volume identifier.
        id: String,
        /// Status at the time of the request.
        status: BlockStorageStatus,
    },
    /// Raised when a status wait exceeds its deadline.
    #[error("timeout waiting for block storage {id} to become {target} (last status: {last})")]
    WaitTimeout {
        /// Volume identifier.
        id: String,
        /// Status being waited for.
        target: BlockStorageStatus,
        /// Last status observed.
        last: BlockStorageStatus,
    },
    /// Raised when a status wait is cancelled.
    #[error("wait for block storage {id} was cancelled")]
    WaitCancelled {
        /// Volume identifier.
        id: String,
    },
}

/// Failed update together with the snapshot the caller should keep.
///
/// The snapshot is the prior one, except when a detach already went through
/// before the failure; then it reflects the detached volume.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{error}")]
pub struct UpdateFailure {
    /// Snapshot to persist.
    pub state: Box<BlockStorageState>,
    /// What went wrong.
    #[source]
    pub error: BlockStorageError,
}

impl UpdateFailure {
    /// Keeps `state` and reports `error`.
    #[must_use]
    pub fn keep(state: &BlockStorageState, error: impl Into<BlockStorageError>) -> Self {
        Self {
            state: Box::new(state.clone()),
            error: error.into(),
        }
    }
}
