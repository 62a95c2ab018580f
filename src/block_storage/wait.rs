//! Bounded, cancellable status polling.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::api::BlockStorageApi;
use crate::models::{BlockStorageResponse, BlockStorageStatus, Scope};

use super::{BlockStorageController, BlockStorageError};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// How often and for how long to poll a volume's status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPolicy {
    /// Delay between reads.
    pub interval: Duration,
    /// Deadline measured from the first read.
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Re-reads volume `id` until its status equals `target`.
    ///
    /// Returns the read that matched. Read errors propagate immediately.
    pub(super) async fn wait_for_status(
        &self,
        id: &str,
        scope: &Scope,
        target: &BlockStorageStatus,
    ) -> Result<BlockStorageResponse, BlockStorageError> {
        let deadline = Instant::now() + self.wait_policy.timeout;
        let mut last = BlockStorageStatus::Other(String::from("unknown"));

        while Instant::now() <= deadline {
            let response = self.api.get_block_storage(id, scope).await?;
            if &response.data.status == target {
                return Ok(response);
            }
            debug!(
                block_storage_id = id,
                status = %response.data.status,
                target = %target,
                "waiting for block storage status"
            );
            last = response.data.status;

            tokio::select! {
                () = self.cancel.cancelled() => {
                    return Err(BlockStorageError::WaitCancelled { id: id.to_owned() });
                }
                () = sleep(self.wait_policy.interval) => {}
            }
        }

        Err(BlockStorageError::WaitTimeout {
            id: id.to_owned(),
            target: target.clone(),
            last,
        })
    }
}
