//! Update decision table.
//!
//! An update honours exactly one change category, picked in priority order,
//! and the action taken depends only on that category and the current
//! status. Everything here is pure so the table can be tested without I/O.

use crate::models::BlockStorageStatus;

use super::{BlockStorageError, BlockStorageSpec, BlockStorageState};

/// Sizes closer than this are considered equal.
pub const SIZE_TOLERANCE: f64 = 1e-6;

/// Kind of edit an update carries, in priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeCategory {
    /// The location differs.
    Location,
    /// The project differs.
    ProjectId,
    /// The requested VM differs from the current attachment.
    Attachment,
    /// The size or name differs.
    Resize,
    /// Nothing differs.
    Unchanged,
}

/// Remote work an update resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateAction {
    /// Refuse the update and keep the prior snapshot.
    Reject(BlockStorageError),
    /// Detach from `detach` if set, wait for `Available`, then attach to
    /// `attach` if set.
    Reattach {
        /// VM to detach from first.
        detach: Option<u64>,
        /// VM to attach to afterwards.
        attach: Option<u64>,
    },
    /// Grow and optionally rename the attached volume.
    Upgrade {
        /// Name after the upgrade.
        name: String,
        /// Size after the upgrade in GB.
        size_gb: f64,
    },
    /// Nothing to change; resync from the API.
    Refresh,
}

#[expect(clippy::float_arithmetic, reason = "sizes are compared with a tolerance")]
const fn sizes_differ(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() > SIZE_TOLERANCE
}

#[expect(clippy::float_arithmetic, reason = "sizes are compared with a tolerance")]
const fn is_growth(current: f64, requested: f64) -> bool {
    requested > current + SIZE_TOLERANCE
}

/// Picks the single change category an update is about.
#[must_use]
pub fn classify(prior: &BlockStorageState, desired: &BlockStorageSpec) -> ChangeCategory {
    if desired.location != prior.location {
        ChangeCategory::Location
    } else if desired.project_id != prior.project_id {
        ChangeCategory::ProjectId
    } else if desired.vm_id != prior.attached_vm_id() {
        ChangeCategory::Attachment
    } else if sizes_differ(desired.size_gb, prior.size_gb) || desired.name != prior.name {
        ChangeCategory::Resize
    } else {
        ChangeCategory::Unchanged
    }
}

/// Resolves an update to the action to execute.
#[must_use]
pub fn plan_update(prior: &BlockStorageState, desired: &BlockStorageSpec) -> UpdateAction {
    let category = classify(prior, desired);
    match (category, &prior.status) {
        (ChangeCategory::Location, _) => {
            UpdateAction::Reject(BlockStorageError::ImmutableField { field: "location" })
        }
        (ChangeCategory::ProjectId, _) => {
            UpdateAction::Reject(BlockStorageError::ImmutableField { field: "project ID" })
        }
        (ChangeCategory::Attachment, BlockStorageStatus::Attached)
            if prior.attachment.is_some() =>
        {
            UpdateAction::Reattach {
                detach: prior.attached_vm_id(),
                attach: desired.vm_id,
            }
        }
        (ChangeCategory::Attachment, BlockStorageStatus::Available) => UpdateAction::Reattach {
            detach: None,
            attach: desired.vm_id,
        },
        (ChangeCategory::Attachment, status) => match desired.vm_id {
            Some(_) => UpdateAction::Reject(BlockStorageError::AttachRequiresAvailable {
                status: status.clone(),
            }),
            None => UpdateAction::Reattach {
                detach: None,
                attach: None,
            },
        },
        (ChangeCategory::Resize, BlockStorageStatus::Attached) => {
            if is_growth(prior.size_gb, desired.size_gb) {
                UpdateAction::Upgrade {
                    name: desired.name.clone(),
                    size_gb: desired.size_gb,
                }
            } else {
                UpdateAction::Reject(BlockStorageError::UpgradeRequiresLargerSize {
                    current_gb: prior.size_gb.to_string(),
                    requested_gb: desired.size_gb.to_string(),
                })
            }
        }
        (ChangeCategory::Resize, status) => {
            UpdateAction::Reject(BlockStorageError::UpgradeRequiresAttached {
                status: status.clone(),
            })
        }
        (ChangeCategory::Unchanged, _) => UpdateAction::Refresh,
    }
}
