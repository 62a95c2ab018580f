//! Request and response shapes exchanged with the E2E control-plane API.

pub mod block_storage;
pub mod kubernetes;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use block_storage::{
    ActionResponse, AttachAction, BlockStorageAttach, BlockStorageCreate, BlockStorageDetail,
    BlockStoragePlan, BlockStoragePlansResponse, BlockStorageResponse, BlockStorageStatus,
    BlockStorageTemplate, BlockStorageUpgrade, CreateBlockStorageResponse, CreatedBlockStorage,
    VmDetail,
};
pub use kubernetes::{ElasticityDict, KubernetesCreate, NodePool};

/// Regions in which the platform accepts block storage and clusters.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Location {
    /// Delhi region, used when nothing else is configured.
    #[default]
    Delhi,
    /// Mumbai region.
    Mumbai,
    /// Second Delhi NCR region.
    #[serde(rename = "Delhi-NCR-2")]
    DelhiNcr2,
}

impl Location {
    /// Every supported location, in the order the API documents them.
    pub const ALL: [Self; 3] = [Self::Delhi, Self::Mumbai, Self::DelhiNcr2];

    /// Returns the wire name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delhi => "Delhi",
            Self::Mumbai => "Mumbai",
            Self::DelhiNcr2 => "Delhi-NCR-2",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a location string is not one of [`Location::ALL`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unsupported location '{0}': expected one of Delhi, Mumbai, Delhi-NCR-2")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == trimmed)
            .ok_or_else(|| UnknownLocation(trimmed.to_owned()))
    }
}

/// Project and location pair attached to every scoped API request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scope {
    /// Numeric project identifier.
    pub project_id: u64,
    /// Region hosting the resource.
    pub location: Location,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub const fn new(project_id: u64, location: Location) -> Self {
        Self {
            project_id,
            location,
        }
    }
}
