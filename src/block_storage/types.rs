//! Desired configuration and observed snapshot of a block storage volume.

use serde::{Deserialize, Serialize};

use crate::models::{BlockStorageStatus, Location, Scope};

/// VM a volume is attached to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VmAttachment {
    /// VM identifier.
    pub vm_id: u64,
    /// VM name, known once the volume has been read back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_name: Option<String>,
}

/// Configuration requested by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockStorageSpec {
    /// Volume name.
    pub name: String,
    /// Size in GB; must be one of the plan sizes.
    pub size_gb: f64,
    /// Owning project.
    pub project_id: u64,
    /// Hosting region.
    pub location: Location,
    /// VM the volume should be attached to, if any.
    pub vm_id: Option<u64>,
}

impl BlockStorageSpec {
    /// Creates a detached spec.
    #[must_use]
    pub fn new(name: impl Into<String>, size_gb: f64, project_id: u64, location: Location) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            size_gb,
            project_id,
            location,
            vm_id: None,
        }
    }

    /// Requests attachment to `vm_id`, or detachment when `None`.
    #[must_use]
    pub const fn attached_to(mut self, vm_id: Option<u64>) -> Self {
        self.vm_id = vm_id;
        self
    }

    /// Spec that matches a snapshot exactly, used as a base for edits.
    #[must_use]
    pub fn from_state(state: &BlockStorageState) -> Self {
        Self {
            name: state.name.clone(),
            size_gb: state.size_gb,
            project_id: state.project_id,
            location: state.location,
            vm_id: state.attached_vm_id(),
        }
    }

    /// Project and location of the requested volume.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        Scope::new(self.project_id, self.location)
    }
}

/// Last known state of a managed volume.
///
/// Snapshots are never mutated in place: every lifecycle operation returns a
/// new one, and a failed update hands back the snapshot to keep.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BlockStorageState {
    /// Identifier assigned by the API.
    pub id: String,
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size_gb: f64,
    /// Provisioned IOPS.
    pub iops: String,
    /// Owning project.
    pub project_id: u64,
    /// Hosting region.
    pub location: Location,
    /// Status reported by the API.
    pub status: BlockStorageStatus,
    /// Attached VM, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<VmAttachment>,
}

impl BlockStorageState {
    /// Project and location the volume lives in.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        Scope::new(self.project_id, self.location)
    }

    /// Identifier of the attached VM, if any.
    #[must_use]
    pub fn attached_vm_id(&self) -> Option<u64> {
        self.attachment.as_ref().map(|attachment| attachment.vm_id)
    }

    /// Snapshot after a successful detach.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            status: BlockStorageStatus::Available,
            attachment: None,
            ..self.clone()
        }
    }

    /// Snapshot after a successful attach.
    #[must_use]
    pub fn attached(&self, vm_id: u64) -> Self {
        Self {
            status: BlockStorageStatus::Attached,
            attachment: Some(VmAttachment {
                vm_id,
                vm_name: None,
            }),
            ..self.clone()
        }
    }
}
