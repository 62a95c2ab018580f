//! Reading and existence checks.

use tracing::{debug, warn};

use crate::api::BlockStorageApi;
use crate::models::BlockStorageResponse;

use super::super::{BlockStorageController, BlockStorageError, BlockStorageState, VmAttachment};

/// Merges a server read into `prior`.
///
/// Name, status, IOPS, and attachment come from the server; size, project,
/// and location keep their local values.
pub(in crate::block_storage) fn observed(
    prior: &BlockStorageState,
    response: &BlockStorageResponse,
) -> BlockStorageState {
    let detail = &response.data;
    BlockStorageState {
        name: detail.name.clone(),
        status: detail.status.clone(),
        iops: detail.template.total_iops_sec.clone(),
        attachment: detail.attached_vm().map(|(vm_id, vm_name)| VmAttachment {
            vm_id,
            vm_name: vm_name.map(str::to_owned),
        }),
        ..prior.clone()
    }
}

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Refreshes `prior` from the API.
    ///
    /// Returns `None` when the volume no longer exists, in which case the
    /// caller should drop its local identity.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStorageError::Api`] for any failure other than a
    /// missing volume.
    pub async fn read(
        &self,
        prior: &BlockStorageState,
    ) -> Result<Option<BlockStorageState>, BlockStorageError> {
        match self.api.get_block_storage(&prior.id, &prior.scope()).await {
            Ok(response) => {
                let state = observed(prior, &response);
                debug!(
                    block_storage_id = %state.id,
                    status = %state.status,
                    "block storage read"
                );
                Ok(Some(state))
            }
            Err(err) if err.is_not_found() => {
                warn!(block_storage_id = %prior.id, "block storage not found; dropping local state");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Reports whether the volume still exists remotely.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStorageError::Api`] for any failure other than a
    /// missing volume.
    pub async fn exists(&self, state: &BlockStorageState) -> Result<bool, BlockStorageError> {
        Ok(self.read(state).await?.is_some())
    }
}
