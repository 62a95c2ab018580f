//! Plan validation and IOPS derivation.

use tracing::debug;

use crate::api::BlockStorageApi;
use crate::models::{BlockStoragePlan, Scope};

use super::{BlockStorageController, BlockStorageError};

/// IOPS provisioned per GB.
const IOPS_PER_GB: f64 = 15.0;

/// Derives the IOPS string sent on create: `floor(size_gb * 15)`.
///
/// # Examples
///
/// ```
/// assert_eq!(e2e_provider::block_storage::calculate_iops(10.0), "150");
/// assert_eq!(e2e_provider::block_storage::calculate_iops(0.1), "1");
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "IOPS scale linearly with size")]
pub fn calculate_iops(size_gb: f64) -> String {
    format!("{}", (size_gb * IOPS_PER_GB).trunc())
}

/// Returns `true` when `size_gb` equals one of the plan sizes exactly.
#[must_use]
#[expect(
    clippy::float_cmp,
    reason = "plan sizes must match exactly, as the API enforces"
)]
pub fn size_in_plans(size_gb: f64, plans: &[BlockStoragePlan]) -> bool {
    plans.iter().any(|plan| plan.size_gb() == size_gb)
}

impl<A: BlockStorageApi> BlockStorageController<A> {
    /// Checks `size_gb` against the plans offered in `scope`.
    pub(super) async fn validate_size(
        &self,
        size_gb: f64,
        scope: &Scope,
    ) -> Result<(), BlockStorageError> {
        let plans = self.api.block_storage_plans(scope).await?;
        debug!(size_gb, plans = plans.len(), "validating block storage size");
        if size_in_plans(size_gb, &plans) {
            return Ok(());
        }
        Err(BlockStorageError::SizeNotInPlans {
            size_gb: size_gb.to_string(),
        })
    }
}
