//! Volume deletion.

use tracing::info;

use crate::api::BlockStorageApi;

use super::super::{BlockStorageController, BlockStorageError, BlockStorageState};

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Deletes the volume described by `state`.
    ///
    /// Volumes that are still being created or saved are refused without
    /// contacting the API.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStorageError::DeleteInTransientState`] for `Creating`
    /// and `Saving` volumes and [`BlockStorageError::Api`] when the delete
    /// call fails.
    pub async fn delete(&self, state: &BlockStorageState) -> Result<(), BlockStorageError> {
        if state.status.is_transient() {
            return Err(BlockStorageError::DeleteInTransientState {
                id: state.id.clone(),
                status: state.status.clone(),
            });
        }
        self.api
            .delete_block_storage(&state.id, &state.scope())
            .await?;
        info!(block_storage_id = %state.id, "block storage deleted");
        Ok(())
    }
}
