//! In-place updates: reattachment and upgrades.

use tracing::{info, warn};

use crate::api::BlockStorageApi;
use crate::models::{
    AttachAction, BlockStorageAttach, BlockStorageResponse, BlockStorageStatus,
    BlockStorageUpgrade,
};

use super::super::{
    BlockStorageController, BlockStorageError, BlockStorageSpec, BlockStorageState,
    UpdateAction, UpdateFailure, UpdateOutcome, calculate_iops, plan_update,
};
use super::read::observed;

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Moves the volume described by `prior` towards `desired`.
    ///
    /// The volume is read first and the change is planned against the
    /// server's status and attachment. Exactly one kind of change is applied
    /// per call, in priority order: location, project, attachment, then size
    /// or name. Without changes the snapshot is refreshed from the API.
    ///
    /// # Errors
    ///
    /// Returns an [`UpdateFailure`] holding the snapshot to keep: `prior`
    /// unchanged, or the detached snapshot when a detach went through before
    /// the failure.
    pub async fn update(
        &self,
        prior: &BlockStorageState,
        desired: &BlockStorageSpec,
    ) -> Result<UpdateOutcome, UpdateFailure> {
        let fresh = match self.api.get_block_storage(&prior.id, &prior.scope()).await {
            Ok(response) => response,
            Err(err) if err.is_not_found() => {
                warn!(block_storage_id = %prior.id, "block storage vanished before update");
                return Ok(UpdateOutcome::Gone);
            }
            Err(err) => return Err(UpdateFailure::keep(prior, err)),
        };

        let current = observed(prior, &fresh);
        match plan_update(&current, desired) {
            UpdateAction::Reject(error) => {
                warn!(block_storage_id = %prior.id, %error, "block storage update rejected");
                Err(UpdateFailure::keep(prior, error))
            }
            UpdateAction::Reattach { detach, attach } => self
                .reattach(prior, detach, attach)
                .await
                .map(UpdateOutcome::Updated),
            UpdateAction::Upgrade { name, size_gb } => self
                .upgrade(prior, &fresh, name, size_gb)
                .await
                .map(UpdateOutcome::Updated),
            UpdateAction::Refresh => Ok(UpdateOutcome::Updated(current)),
        }
    }

    async fn reattach(
        &self,
        prior: &BlockStorageState,
        detach: Option<u64>,
        attach: Option<u64>,
    ) -> Result<BlockStorageState, UpdateFailure> {
        let current = match detach {
            Some(vm_id) => self.detach(prior, vm_id).await?,
            None => prior.clone(),
        };

        let settled = self
            .wait_for_status(&current.id, &current.scope(), &BlockStorageStatus::Available)
            .await
            .map_err(|err| UpdateFailure::keep(&current, err))?;

        let Some(vm_id) = attach else {
            return Ok(observed(&current, &settled));
        };

        let response = self
            .api
            .attach_or_detach_block_storage(
                &BlockStorageAttach { vm_id },
                AttachAction::Attach,
                &current.id,
                &current.scope(),
            )
            .await
            .map_err(|err| UpdateFailure::keep(&current, err))?;
        response
            .accepted()
            .map_err(|message| UpdateFailure::keep(&current, BlockStorageError::Rejected { message }))?;

        info!(block_storage_id = %current.id, vm_id, "block storage attached");
        Ok(current.attached(vm_id))
    }

    async fn detach(
        &self,
        prior: &BlockStorageState,
        vm_id: u64,
    ) -> Result<BlockStorageState, UpdateFailure> {
        self.api
            .attach_or_detach_block_storage(
                &BlockStorageAttach { vm_id },
                AttachAction::Detach,
                &prior.id,
                &prior.scope(),
            )
            .await
            .map_err(|err| {
                warn!(block_storage_id = %prior.id, vm_id, %err, "detach failed; keeping prior state");
                UpdateFailure::keep(prior, err)
            })?;
        info!(block_storage_id = %prior.id, vm_id, "block storage detached");
        Ok(prior.detached())
    }

    async fn upgrade(
        &self,
        prior: &BlockStorageState,
        fresh: &BlockStorageResponse,
        name: String,
        size_gb: f64,
    ) -> Result<BlockStorageState, UpdateFailure> {
        let scope = prior.scope();
        self.validate_size(size_gb, &scope)
            .await
            .map_err(|err| UpdateFailure::keep(prior, err))?;

        let Some((vm_id, _)) = fresh.data.attached_vm() else {
            return Err(UpdateFailure::keep(
                prior,
                BlockStorageError::NotAttached {
                    id: prior.id.clone(),
                },
            ));
        };

        let payload = BlockStorageUpgrade {
            name,
            size: size_gb,
            vm_id,
        };
        let response = self
            .api
            .upgrade_block_storage(&payload, &prior.id, &scope)
            .await
            .map_err(|err| UpdateFailure::keep(prior, err))?;
        response
            .accepted()
            .map_err(|message| UpdateFailure::keep(prior, BlockStorageError::Rejected { message }))?;

        info!(
            block_storage_id = %prior.id,
            size_gb,
            "block storage upgraded"
        );
        Ok(BlockStorageState {
            name: payload.name,
            size_gb,
            iops: calculate_iops(size_gb),
            ..observed(prior, fresh)
        })
    }
}
