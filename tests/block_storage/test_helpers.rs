//! Shared fixtures for block storage BDD scenarios.

use std::time::Duration;

use e2e_provider::block_storage::{VmAttachment, WaitPolicy};
use e2e_provider::models::{BlockStorageStatus, Location};
use e2e_provider::test_support::ScriptedApi;
use e2e_provider::{BlockStorageController, BlockStorageState};
use rstest::fixture;
use thiserror::Error;

pub const VOLUME_ID: &str = "4521";
pub const PROJECT_ID: u64 = 1001;
pub const DEFAULT_LOCATION: &str = "Delhi";

#[derive(Clone, Debug)]
pub struct BlockStorageContext {
    pub api: ScriptedApi,
    pub prior: BlockStorageState,
    pub outcome: Option<LifecycleResult>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleResult {
    Recorded(BlockStorageState),
    Gone,
    Deleted,
    Failure {
        message: String,
        kept: Option<BlockStorageState>,
    },
}

pub type BlockStorageContextResult = Result<BlockStorageContext, BlockStorageTestError>;

#[derive(Clone, Debug, Error)]
pub enum BlockStorageTestError {
    #[error("invalid block storage fixture: {0}")]
    Fixture(String),
}

impl BlockStorageContext {
    pub fn controller(&self) -> BlockStorageController<ScriptedApi> {
        BlockStorageController::new(
            self.api.clone(),
            WaitPolicy {
                interval: Duration::from_millis(1),
                timeout: Duration::from_millis(500),
            },
        )
    }

    pub fn with_outcome(self, outcome: LifecycleResult) -> Self {
        Self {
            outcome: Some(outcome),
            ..self
        }
    }
}

pub fn snapshot(
    location: Location,
    status: BlockStorageStatus,
    vm_id: Option<u64>,
) -> BlockStorageState {
    BlockStorageState {
        id: String::from(VOLUME_ID),
        name: String::from("data"),
        size_gb: 250.0,
        iops: String::from("3750"),
        project_id: PROJECT_ID,
        location,
        status,
        attachment: vm_id.map(|vm| VmAttachment {
            vm_id: vm,
            vm_name: None,
        }),
    }
}

#[fixture]
pub fn block_storage_context_result() -> BlockStorageContextResult {
    build_context()
}

#[fixture]
pub fn block_storage_context(
    block_storage_context_result: BlockStorageContextResult,
) -> BlockStorageContext {
    block_storage_context_result
        .unwrap_or_else(|err| panic!("block storage context fixture should initialise: {err}"))
}

fn build_context() -> BlockStorageContextResult {
    let location = DEFAULT_LOCATION
        .parse::<Location>()
        .map_err(|err| BlockStorageTestError::Fixture(err.to_string()))?;
    let prior = snapshot(location, BlockStorageStatus::Available, None);
    Ok(BlockStorageContext {
        api: ScriptedApi::new(),
        prior,
        outcome: None,
    })
}
