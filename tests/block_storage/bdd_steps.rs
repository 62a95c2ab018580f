//! BDD step definitions for the block storage lifecycle.

use e2e_provider::models::{AttachAction, BlockStorageStatus, Location};
use e2e_provider::test_support::ApiCall;
use e2e_provider::{BlockStorageSpec, BlockStorageState, UpdateFailure, UpdateOutcome};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{
    BlockStorageContext, BlockStorageTestError, LifecycleResult, PROJECT_ID, snapshot,
};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] BlockStorageTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn runtime() -> Result<Runtime, StepError> {
    Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))
}

fn update_result(result: Result<UpdateOutcome, UpdateFailure>) -> LifecycleResult {
    match result {
        Ok(UpdateOutcome::Updated(state)) => LifecycleResult::Recorded(state),
        Ok(UpdateOutcome::Gone) => LifecycleResult::Gone,
        Err(failure) => LifecycleResult::Failure {
            message: failure.error.to_string(),
            kept: Some(*failure.state),
        },
    }
}

fn update_to(
    block_storage_context: BlockStorageContext,
    desired: &BlockStorageSpec,
) -> Result<BlockStorageContext, StepError> {
    let runtime = runtime()?;
    let controller = block_storage_context.controller();
    let prior = block_storage_context.prior.clone();
    let result = runtime.block_on(async move { controller.update(&prior, desired).await });
    Ok(block_storage_context.with_outcome(update_result(result)))
}

fn recorded(block_storage_context: &BlockStorageContext) -> Result<&BlockStorageState, StepError> {
    match block_storage_context.outcome {
        Some(LifecycleResult::Recorded(ref state)) => Ok(state),
        ref other => Err(StepError::Assertion(format!(
            "expected a recorded volume, got {other:?}"
        ))),
    }
}

#[given("a scripted block storage API")]
fn scripted_api(block_storage_context: BlockStorageContext) -> BlockStorageContext {
    block_storage_context
}

#[given("the plans include a {size} TB volume")]
fn plans_include(block_storage_context: BlockStorageContext, size: f64) -> BlockStorageContext {
    block_storage_context.api.push_plans(&[size]);
    block_storage_context
}

#[given("the API accepts the create as volume {id}")]
fn create_accepted(block_storage_context: BlockStorageContext, id: u32) -> BlockStorageContext {
    block_storage_context.api.push_created(f64::from(id));
    block_storage_context
}

#[given("a volume attached to VM {vm}")]
fn volume_attached(mut block_storage_context: BlockStorageContext, vm: u64) -> BlockStorageContext {
    block_storage_context.prior = snapshot(
        block_storage_context.prior.location,
        BlockStorageStatus::Attached,
        Some(vm),
    );
    block_storage_context
}

#[given("a volume with status \"{status}\"")]
fn volume_with_status(
    mut block_storage_context: BlockStorageContext,
    status: String,
) -> BlockStorageContext {
    block_storage_context.prior = snapshot(
        block_storage_context.prior.location,
        BlockStorageStatus::from(status),
        None,
    );
    block_storage_context
}

#[given("the API reports the volume attached to VM {vm}")]
fn api_reports_attached(block_storage_context: BlockStorageContext, vm: u64) -> BlockStorageContext {
    block_storage_context
        .api
        .push_volume("data", "Attached", Some(vm));
    block_storage_context
}

#[given("the API reports the volume available")]
fn api_reports_available(block_storage_context: BlockStorageContext) -> BlockStorageContext {
    block_storage_context
        .api
        .push_volume("data", "Available", None);
    block_storage_context
}

#[given("the API reports the volume missing")]
fn api_reports_missing(block_storage_context: BlockStorageContext) -> BlockStorageContext {
    block_storage_context.api.push_not_found();
    block_storage_context
}

#[given("the API accepts the detach")]
fn detach_accepted(block_storage_context: BlockStorageContext) -> BlockStorageContext {
    block_storage_context.api.push_action_ok();
    block_storage_context
}

#[given("the API accepts the attach")]
fn attach_accepted(block_storage_context: BlockStorageContext) -> BlockStorageContext {
    block_storage_context.api.push_action_ok();
    block_storage_context
}

#[given("the API refuses the attach with \"{message}\"")]
fn attach_refused(block_storage_context: BlockStorageContext, message: String) -> BlockStorageContext {
    block_storage_context.api.push_action_refused(&message);
    block_storage_context
}

#[when("I create a {size} GB volume named \"{name}\"")]
fn create_volume(
    block_storage_context: BlockStorageContext,
    size: f64,
    name: String,
) -> Result<BlockStorageContext, StepError> {
    let runtime = runtime()?;
    let controller = block_storage_context.controller();
    let spec = BlockStorageSpec::new(
        name,
        size,
        PROJECT_ID,
        block_storage_context.prior.location,
    );
    let result = runtime.block_on(async move { controller.create(&spec).await });
    let outcome = match result {
        Ok(state) => LifecycleResult::Recorded(state),
        Err(err) => LifecycleResult::Failure {
            message: err.to_string(),
            kept: None,
        },
    };
    Ok(block_storage_context.with_outcome(outcome))
}

#[when("I move the volume to \"{location}\"")]
fn move_volume(
    block_storage_context: BlockStorageContext,
    location: String,
) -> Result<BlockStorageContext, StepError> {
    let target = location
        .parse::<Location>()
        .map_err(|err| StepError::Assertion(err.to_string()))?;
    let desired = BlockStorageSpec {
        location: target,
        ..BlockStorageSpec::from_state(&block_storage_context.prior)
    };
    update_to(block_storage_context, &desired)
}

#[when("I attach the volume to VM {vm}")]
fn attach_volume(
    block_storage_context: BlockStorageContext,
    vm: u64,
) -> Result<BlockStorageContext, StepError> {
    let desired = BlockStorageSpec::from_state(&block_storage_context.prior).attached_to(Some(vm));
    update_to(block_storage_context, &desired)
}

#[when("I delete the volume")]
fn delete_volume(block_storage_context: BlockStorageContext) -> Result<BlockStorageContext, StepError> {
    let runtime = runtime()?;
    let controller = block_storage_context.controller();
    let prior = block_storage_context.prior.clone();
    let result = runtime.block_on(async move { controller.delete(&prior).await });
    let outcome = match result {
        Ok(()) => LifecycleResult::Deleted,
        Err(err) => LifecycleResult::Failure {
            message: err.to_string(),
            kept: None,
        },
    };
    Ok(block_storage_context.with_outcome(outcome))
}

#[when("I refresh the volume")]
fn refresh_volume(block_storage_context: BlockStorageContext) -> Result<BlockStorageContext, StepError> {
    let runtime = runtime()?;
    let controller = block_storage_context.controller();
    let prior = block_storage_context.prior.clone();
    let result = runtime.block_on(async move { controller.read(&prior).await });
    let outcome = match result {
        Ok(Some(state)) => LifecycleResult::Recorded(state),
        Ok(None) => LifecycleResult::Gone,
        Err(err) => LifecycleResult::Failure {
            message: err.to_string(),
            kept: None,
        },
    };
    Ok(block_storage_context.with_outcome(outcome))
}

#[then("the recorded volume id is \"{id}\"")]
fn recorded_id(block_storage_context: &BlockStorageContext, id: String) -> Result<(), StepError> {
    let state = recorded(block_storage_context)?;
    if state.id == id {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected volume id {id}, got {}",
            state.id
        )))
    }
}

#[then("the recorded IOPS is \"{iops}\"")]
fn recorded_iops(block_storage_context: &BlockStorageContext, iops: String) -> Result<(), StepError> {
    let state = recorded(block_storage_context)?;
    if state.iops == iops {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected IOPS {iops}, got {}",
            state.iops
        )))
    }
}

#[then("the recorded status is \"{status}\"")]
fn recorded_status(
    block_storage_context: &BlockStorageContext,
    status: String,
) -> Result<(), StepError> {
    let state = recorded(block_storage_context)?;
    if state.status.as_str() == status {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected status {status}, got {}",
            state.status
        )))
    }
}

#[then("the operation fails mentioning \"{text}\"")]
fn operation_fails(block_storage_context: &BlockStorageContext, text: String) -> Result<(), StepError> {
    let Some(LifecycleResult::Failure { message, .. }) = &block_storage_context.outcome else {
        return Err(StepError::Assertion(format!(
            "expected failure outcome, got {:?}",
            block_storage_context.outcome
        )));
    };
    if message.contains(&text) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected failure mentioning '{text}', got: {message}"
        )))
    }
}

#[then("no volume was created")]
fn no_volume_created(block_storage_context: &BlockStorageContext) -> Result<(), StepError> {
    let created = block_storage_context
        .api
        .calls()
        .iter()
        .any(|call| matches!(call, ApiCall::Create(_)));
    if created {
        Err(StepError::Assertion(String::from(
            "create should not be called",
        )))
    } else {
        Ok(())
    }
}

#[then("the prior snapshot is kept")]
fn prior_kept(block_storage_context: &BlockStorageContext) -> Result<(), StepError> {
    match &block_storage_context.outcome {
        Some(LifecycleResult::Failure {
            kept: Some(kept), ..
        }) if *kept == block_storage_context.prior => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected the prior snapshot to be kept, got {other:?}"
        ))),
    }
}

#[then("the kept snapshot has no attachment")]
fn kept_detached(block_storage_context: &BlockStorageContext) -> Result<(), StepError> {
    match &block_storage_context.outcome {
        Some(LifecycleResult::Failure {
            kept: Some(kept), ..
        }) if kept.attachment.is_none() => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a detached snapshot, got {other:?}"
        ))),
    }
}

#[then("the volume is attached to VM {vm}")]
fn attached_to(block_storage_context: &BlockStorageContext, vm: u64) -> Result<(), StepError> {
    let state = recorded(block_storage_context)?;
    if state.status == BlockStorageStatus::Attached && state.attached_vm_id() == Some(vm) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected attachment to VM {vm}, got {:?} ({})",
            state.attached_vm_id(),
            state.status
        )))
    }
}

#[then("VM {first} was detached before VM {second} was attached")]
fn detached_then_attached(
    block_storage_context: &BlockStorageContext,
    first: u64,
    second: u64,
) -> Result<(), StepError> {
    let actions: Vec<(AttachAction, u64)> = block_storage_context
        .api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ApiCall::Attach { action, vm_id, .. } => Some((action, vm_id)),
            _ => None,
        })
        .collect();
    let expected = vec![(AttachAction::Detach, first), (AttachAction::Attach, second)];
    if actions == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {expected:?}, got {actions:?}"
        )))
    }
}

#[then("no API calls were made")]
fn no_api_calls(block_storage_context: &BlockStorageContext) -> Result<(), StepError> {
    let calls = block_storage_context.api.calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no API calls, got {calls:?}"
        )))
    }
}

#[then("the volume is reported gone")]
fn reported_gone(block_storage_context: &BlockStorageContext) -> Result<(), StepError> {
    if block_storage_context.outcome == Some(LifecycleResult::Gone) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected the volume to be gone, got {:?}",
            block_storage_context.outcome
        )))
    }
}
