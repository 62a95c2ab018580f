//! Volume creation.

use tracing::info;

use crate::api::BlockStorageApi;
use crate::models::{BlockStorageCreate, BlockStorageStatus};

use super::super::{
    BlockStorageController, BlockStorageError, BlockStorageSpec, BlockStorageState,
    calculate_iops,
};

const NO_MESSAGE: &str = "the API refused the request without a message";

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Provisions a detached volume matching `spec`.
    ///
    /// The size is checked against the plan list before anything is
    /// created. The returned snapshot reports `Creating` until the next read.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStorageError::SizeNotInPlans`] when the size matches no
    /// plan, [`BlockStorageError::Rejected`] when the response carries no
    /// `code`, [`BlockStorageError::InsufficientCredit`] when the account
    /// cannot pay for the volume, and [`BlockStorageError::Api`] for
    /// transport and status failures.
    pub async fn create(
        &self,
        spec: &BlockStorageSpec,
    ) -> Result<BlockStorageState, BlockStorageError> {
        let scope = spec.scope();
        self.validate_size(spec.size_gb, &scope).await?;

        let iops = calculate_iops(spec.size_gb);
        let payload = BlockStorageCreate {
            name: spec.name.clone(),
            size: spec.size_gb,
            iops: iops.clone(),
        };
        info!(
            name = %spec.name,
            size_gb = spec.size_gb,
            location = %spec.location,
            "creating block storage"
        );
        let response = self.api.create_block_storage(&payload, &scope).await?;

        let message = response
            .message
            .unwrap_or_else(|| String::from(NO_MESSAGE));
        if response.code.is_none() {
            return Err(BlockStorageError::Rejected { message });
        }
        let data = response
            .data
            .ok_or_else(|| BlockStorageError::MissingCreateData {
                name: spec.name.clone(),
            })?;
        if data.is_credit_sufficient == Some(false) {
            return Err(BlockStorageError::InsufficientCredit { message });
        }

        let state = BlockStorageState {
            id: data.identity(),
            name: spec.name.clone(),
            size_gb: spec.size_gb,
            iops,
            project_id: spec.project_id,
            location: spec.location,
            status: BlockStorageStatus::Creating,
            attachment: None,
        };
        info!(block_storage_id = %state.id, "block storage created");
        Ok(state)
    }
}
