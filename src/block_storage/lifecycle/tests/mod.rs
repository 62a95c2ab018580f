//! Controller tests driven by the scripted API double.


use std::time::Duration;

use rstest::{fixture, rstest};

use crate::api::ApiError;
use crate::block_storage::{
    BlockStorageController, BlockStorageError, BlockStorageSpec, BlockStorageState, VmAttachment,
    WaitPolicy,
};
use crate::models::{
    BlockStorageCreate, BlockStorageStatus, CreateBlockStorageResponse, CreatedBlockStorage,
    Location, Scope,
};
use crate::test_support::{ApiCall, ScriptedApi, volume_response};

pub(super) const VOLUME_ID: &str = "4521";
pub(super) const PROJECT_ID: u64 = 1001;

pub(super) fn fast_policy() -> WaitPolicy {
    WaitPolicy {
        interval: Duration::from_millis(1),
        timeout: Duration::from_millis(200),
    }
}

pub(super) fn controller(api: &ScriptedApi) -> BlockStorageController<ScriptedApi> {
    BlockStorageController::new(api.clone(), fast_policy())
}

pub(super) fn snapshot(status: BlockStorageStatus, vm_id: Option<u64>) -> BlockStorageState {
    BlockStorageState {
        id: String::from(VOLUME_ID),
        name: String::from("data"),
        size_gb: 250.0,
        iops: String::from("3750"),
        project_id: PROJECT_ID,
        location: Location::Delhi,
        status,
        attachment: vm_id.map(|id| VmAttachment {
            vm_id: id,
            vm_name: Some(format!("node-{id}")),
        }),
    }
}

#[fixture]
fn api() -> ScriptedApi {
    ScriptedApi::new()
}

#[rstest]
#[tokio::test]
async fn create_validates_size_and_posts_computed_iops(api: ScriptedApi) {
    api.push_plans(&[0.01, 0.25]);
    api.push_created(4521.0);
    let spec = BlockStorageSpec::new("  data ", 10.0, PROJECT_ID, Location::Mumbai);

    let state = controller(&api)
        .create(&spec)
        .await
        .unwrap_or_else(|err| panic!("create failed: {err}"));

    assert_eq!(state.id, VOLUME_ID);
    assert_eq!(state.name, "data");
    assert_eq!(state.iops, "150");
    assert_eq!(state.status, BlockStorageStatus::Creating);
    assert_eq!(state.location, Location::Mumbai);
    assert_eq!(state.attachment, None);
    assert_eq!(
        api.calls(),
        vec![
            ApiCall::Plans(Scope::new(PROJECT_ID, Location::Mumbai)),
            ApiCall::Create(BlockStorageCreate {
                name: String::from("data"),
                size: 10.0,
                iops: String::from("150"),
            }),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_size_missing_from_plans_before_posting(api: ScriptedApi) {
    api.push_plans(&[0.25, 0.5]);
    let spec = BlockStorageSpec::new("data", 300.0, PROJECT_ID, Location::Delhi);

    let err = controller(&api)
        .create(&spec)
        .await
        .expect_err("size outside the plans must fail");

    assert_eq!(
        err,
        BlockStorageError::SizeNotInPlans {
            size_gb: String::from("300"),
        }
    );
    assert!(
        !api.calls()
            .iter()
            .any(|call| matches!(call, ApiCall::Create(_))),
        "no create call expected"
    );
}

#[rstest]
#[tokio::test]
async fn create_surfaces_message_when_code_is_missing(api: ScriptedApi) {
    api.push_plans(&[0.25]);
    api.push_create(Ok(CreateBlockStorageResponse {
        code: None,
        data: None,
        message: Some(String::from("Name already taken")),
    }));
    let spec = BlockStorageSpec::new("data", 250.0, PROJECT_ID, Location::Delhi);

    let err = controller(&api)
        .create(&spec)
        .await
        .expect_err("refused create must fail");

    assert_eq!(
        err,
        BlockStorageError::Rejected {
            message: String::from("Name already taken"),
        }
    );
}

#[rstest]
#[tokio::test]
async fn create_fails_on_insufficient_credit(api: ScriptedApi) {
    api.push_plans(&[0.25]);
    api.push_create(Ok(CreateBlockStorageResponse {
        code: Some(200),
        data: Some(CreatedBlockStorage {
            id: 4521.0,
            is_credit_sufficient: Some(false),
        }),
        message: Some(String::from("Please recharge your account")),
    }));
    let spec = BlockStorageSpec::new("data", 250.0, PROJECT_ID, Location::Delhi);

    let err = controller(&api)
        .create(&spec)
        .await
        .expect_err("insufficient credit must fail");

    assert_eq!(
        err,
        BlockStorageError::InsufficientCredit {
            message: String::from("Please recharge your account"),
        }
    );
}

#[rstest]
#[tokio::test]
async fn read_overwrites_server_fields_and_keeps_local_ones(api: ScriptedApi) {
    api.push_read(Ok(volume_response(
        "renamed",
        "Attached",
        "4000",
        Some(77),
    )));
    let prior = snapshot(BlockStorageStatus::Available, None);

    let state = controller(&api)
        .read(&prior)
        .await
        .unwrap_or_else(|err| panic!("read failed: {err}"))
        .unwrap_or_else(|| panic!("volume should exist"));

    assert_eq!(
        state,
        BlockStorageState {
            name: String::from("renamed"),
            status: BlockStorageStatus::Attached,
            iops: String::from("4000"),
            attachment: Some(VmAttachment {
                vm_id: 77,
                vm_name: Some(String::from("node-77")),
            }),
            ..prior
        }
    );
}

#[rstest]
#[tokio::test]
async fn read_of_missing_volume_yields_none(api: ScriptedApi) {
    api.push_not_found();
    let prior = snapshot(BlockStorageStatus::Available, None);

    let state = controller(&api)
        .read(&prior)
        .await
        .unwrap_or_else(|err| panic!("not found must not be an error: {err}"));

    assert_eq!(state, None);
}

#[rstest]
#[tokio::test]
async fn read_propagates_other_errors(api: ScriptedApi) {
    api.push_read(Err(ApiError::Transport {
        message: String::from("connection reset"),
    }));
    let prior = snapshot(BlockStorageStatus::Available, None);

    let err = controller(&api)
        .read(&prior)
        .await
        .expect_err("transport failures propagate");

    assert_eq!(err.to_string(), "connection reset");
}

#[rstest]
#[tokio::test]
async fn exists_maps_not_found_to_false(api: ScriptedApi) {
    api.push_not_found();
    let prior = snapshot(BlockStorageStatus::Available, None);

    let exists = controller(&api)
        .exists(&prior)
        .await
        .unwrap_or_else(|err| panic!("exists failed: {err}"));

    assert!(!exists);
}

#[rstest]
#[case(BlockStorageStatus::Creating)]
#[case(BlockStorageStatus::Saving)]
#[tokio::test]
async fn delete_refuses_transient_states_without_calling_api(
    api: ScriptedApi,
    #[case] status: BlockStorageStatus,
) {
    let state = snapshot(status.clone(), None);

    let err = controller(&api)
        .delete(&state)
        .await
        .expect_err("transient volumes cannot be deleted");

    assert_eq!(
        err,
        BlockStorageError::DeleteInTransientState {
            id: String::from(VOLUME_ID),
            status,
        }
    );
    assert!(api.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_issues_delete_for_available_volume(api: ScriptedApi) {
    api.push_delete(Ok(()));
    let state = snapshot(BlockStorageStatus::Available, None);

    controller(&api)
        .delete(&state)
        .await
        .unwrap_or_else(|err| panic!("delete failed: {err}"));

    assert_eq!(
        api.calls(),
        vec![ApiCall::Delete {
            id: String::from(VOLUME_ID),
        }]
    );
}
