//! Block storage payloads and typed responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status reported by the API for a block storage volume.
///
/// Unrecognised strings are kept verbatim so a new server-side state does not
/// break reads.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStorageStatus {
    /// The volume is being provisioned.
    Creating,
    /// The volume exists and is not attached to a VM.
    Available,
    /// The volume is attached to a VM.
    Attached,
    /// The volume is being snapshotted or resized.
    Saving,
    /// Provisioning failed.
    Failed,
    /// Any other status string.
    Other(String),
}

impl BlockStorageStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "Creating",
            Self::Available => "Available",
            Self::Attached => "Attached",
            Self::Saving => "Saving",
            Self::Failed => "Failed",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns `true` for in-flight states that must not be deleted.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Creating | Self::Saving)
    }
}

impl From<String> for BlockStorageStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Creating" => Self::Creating,
            "Available" => Self::Available,
            "Attached" => Self::Attached,
            "Saving" => Self::Saving,
            "Failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for BlockStorageStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<BlockStorageStatus> for String {
    fn from(value: BlockStorageStatus) -> Self {
        match value {
            BlockStorageStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BlockStorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for `POST block-storage/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockStorageCreate {
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size: f64,
    /// IOPS derived from the size.
    pub iops: String,
}

/// Body for the attach and detach endpoints.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BlockStorageAttach {
    /// VM the volume is attached to or detached from.
    pub vm_id: u64,
}

/// Body for the upgrade endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockStorageUpgrade {
    /// Name after the upgrade.
    pub name: String,
    /// New size in GB.
    pub size: f64,
    /// VM the volume is currently attached to.
    pub vm_id: u64,
}

/// Direction of an attachment change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttachAction {
    /// Attach the volume to a VM.
    Attach,
    /// Detach the volume from its VM.
    Detach,
}

impl AttachAction {
    /// Path segment used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attach => "attach",
            Self::Detach => "detach",
        }
    }
}

impl fmt::Display for AttachAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the block storage plan list.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct BlockStoragePlan {
    /// Plan size in TB.
    pub bs_size: f64,
}

impl BlockStoragePlan {
    /// Plan size converted to GB.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "plan sizes are published in fractional TB"
    )]
    pub const fn size_gb(self) -> f64 {
        self.bs_size * 1000.0
    }
}

/// Response of the plan listing endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BlockStoragePlansResponse {
    /// Available plans.
    pub data: Vec<BlockStoragePlan>,
}

/// Response of `POST block-storage/`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CreateBlockStorageResponse {
    /// Application-level status code; absent when the request was refused.
    #[serde(default)]
    pub code: Option<i64>,
    /// Created volume details.
    #[serde(default)]
    pub data: Option<CreatedBlockStorage>,
    /// Human-readable message from the API.
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` section of a create response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CreatedBlockStorage {
    /// Numeric identifier, sent as a JSON number that may carry a fraction.
    pub id: f64,
    /// `false` when the account cannot pay for the volume.
    #[serde(default)]
    pub is_credit_sufficient: Option<bool>,
}

impl CreatedBlockStorage {
    /// Identifier rounded to an integer and rendered as a string.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "ids are positive integers sent as JSON floats"
    )]
    pub fn identity(&self) -> String {
        (self.id.round() as u64).to_string()
    }
}

/// Response of `GET block-storage/{id}/`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BlockStorageResponse {
    /// Volume details.
    pub data: BlockStorageDetail,
}

/// Volume details as reported by the API.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BlockStorageDetail {
    /// Volume name.
    pub name: String,
    /// Current status.
    pub status: BlockStorageStatus,
    /// Performance template.
    pub template: BlockStorageTemplate,
    /// Attached VM, if any. The API sends an empty object when detached.
    #[serde(default)]
    pub vm_detail: Option<VmDetail>,
}

impl BlockStorageDetail {
    /// Returns the attached VM identifier and name when the API reports one.
    #[must_use]
    pub fn attached_vm(&self) -> Option<(u64, Option<&str>)> {
        let detail = self.vm_detail.as_ref()?;
        let vm_id = detail.vm_id?;
        Some((vm_id, detail.vm_name.as_deref()))
    }
}

/// Performance template of a volume.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct BlockStorageTemplate {
    /// Provisioned IOPS as a decimal string.
    #[serde(rename = "TOTAL_IOPS_SEC")]
    pub total_iops_sec: String,
}

/// Attachment details of a volume.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct VmDetail {
    /// Attached VM identifier.
    #[serde(default)]
    pub vm_id: Option<u64>,
    /// Attached VM name.
    #[serde(default)]
    pub vm_name: Option<String>,
}

/// Response of the attach, detach and upgrade endpoints.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ActionResponse {
    /// Application-level status code; absent when the API refused the action.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable message from the API.
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    /// Succeeds when the response carries a `code` field.
    ///
    /// # Errors
    ///
    /// Returns the server-provided message when `code` is absent.
    pub fn accepted(&self) -> Result<(), String> {
        if self.code.is_some() {
            return Ok(());
        }
        Err(self
            .message
            .clone()
            .unwrap_or_else(|| String::from("the API refused the request without a message")))
    }
}
