//! Block storage lifecycle controller.
//!
//! The controller drives a [`BlockStorageApi`] through create, read, update,
//! delete, and existence checks. Every operation takes the last known
//! snapshot by reference and hands back a new one.

mod error;
mod lifecycle;
mod plans;
mod transition;
mod types;
mod wait;

use tokio_util::sync::CancellationToken;

use crate::api::BlockStorageApi;

pub use error::{BlockStorageError, UpdateFailure};
pub use plans::{calculate_iops, size_in_plans};
pub use transition::{ChangeCategory, SIZE_TOLERANCE, UpdateAction, classify, plan_update};
pub use types::{BlockStorageSpec, BlockStorageState, VmAttachment};
pub use wait::WaitPolicy;

/// Result of a successful update.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The volume still exists; persist this snapshot.
    Updated(BlockStorageState),
    /// The volume vanished remotely; drop the local identity.
    Gone,
}

/// Applies lifecycle operations against the block storage API.
#[derive(Debug)]
pub struct BlockStorageController<A> {
    api: A,
    wait_policy: WaitPolicy,
    cancel: CancellationToken,
}

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Creates a controller that polls according to `wait_policy`.
    #[must_use]
    pub fn new(api: A, wait_policy: WaitPolicy) -> Self {
        Self {
            api,
            wait_policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the token used to abort status waits.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
