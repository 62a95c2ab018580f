//! BDD scenarios for the block storage lifecycle.

use rstest_bdd_macros::scenario;

use super::test_helpers::{BlockStorageContext, block_storage_context};

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Create a volume from a listed plan"
)]
fn scenario_create_volume(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Reject a size that no plan offers"
)]
fn scenario_size_not_in_plans(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Reject moving a volume to another location"
)]
fn scenario_location_is_immutable(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Move a volume between VMs"
)]
fn scenario_reattach(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Keep the detached snapshot when the attach is refused"
)]
fn scenario_refused_attach(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Refuse deleting a volume that is still being created"
)]
fn scenario_delete_while_creating(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}

#[scenario(
    path = "tests/features/block_storage.feature",
    name = "Drop a volume that vanished from the control plane"
)]
fn scenario_vanished_volume(block_storage_context: BlockStorageContext) {
    drop(block_storage_context);
}
