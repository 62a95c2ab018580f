//! Block storage endpoints.

use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::models::{
    ActionResponse, AttachAction, BlockStorageAttach, BlockStorageCreate, BlockStoragePlan,
    BlockStoragePlansResponse, BlockStorageResponse, BlockStorageUpgrade,
    CreateBlockStorageResponse, Scope,
};

use super::{ApiFuture, BlockStorageApi, E2eClient};

const BLOCK_STORAGE_PATH: &str = "block-storage/";
const PLANS_PATH: &str = "block-storage/plans/";

fn volume_path(id: &str) -> String {
    format!("{BLOCK_STORAGE_PATH}{id}/")
}

impl BlockStorageApi for E2eClient {
    fn block_storage_plans<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> ApiFuture<'a, Vec<BlockStoragePlan>> {
        Box::pin(async move {
            let request = self.request(Method::GET, PLANS_PATH, Some(scope));
            let plans: BlockStoragePlansResponse = self
                .execute_json(request, StatusCode::OK, "block storage plans")
                .await?;
            Ok(plans.data)
        })
    }

    fn create_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageCreate,
        scope: &'a Scope,
    ) -> ApiFuture<'a, CreateBlockStorageResponse> {
        Box::pin(async move {
            debug!(name = %payload.name, size = payload.size, "creating block storage");
            let request = self
                .request(Method::POST, BLOCK_STORAGE_PATH, Some(scope))
                .json(payload);
            self.execute_json(request, StatusCode::CREATED, "block storage create")
                .await
        })
    }

    fn get_block_storage<'a>(
        &'a self,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, BlockStorageResponse> {
        Box::pin(async move {
            let request = self.request(Method::GET, &volume_path(id), Some(scope));
            self.execute_json(request, StatusCode::OK, "block storage read")
                .await
        })
    }

    fn attach_or_detach_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageAttach,
        action: AttachAction,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse> {
        Box::pin(async move {
            let path = format!("{}vm/{action}/", volume_path(id));
            let request = self
                .request(Method::POST, &path, Some(scope))
                .json(payload);
            self.execute_json(request, StatusCode::OK, action.as_str())
                .await
        })
    }

    fn upgrade_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageUpgrade,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse> {
        Box::pin(async move {
            let path = format!("{}upgrade/", volume_path(id));
            let request = self
                .request(Method::POST, &path, Some(scope))
                .json(payload);
            self.execute_json(request, StatusCode::OK, "block storage upgrade")
                .await
        })
    }

    fn delete_block_storage<'a>(&'a self, id: &'a str, scope: &'a Scope) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, &volume_path(id), Some(scope));
            self.execute(request, StatusCode::OK, "block storage delete")
                .await?;
            Ok(())
        })
    }
}
