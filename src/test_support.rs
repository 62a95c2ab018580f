//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

use crate::api::{ApiError, ApiFuture, BlockStorageApi};
use crate::models::{
    ActionResponse, AttachAction, BlockStorageAttach, BlockStorageCreate, BlockStorageDetail,
    BlockStoragePlan, BlockStorageResponse, BlockStorageStatus, BlockStorageTemplate,
    BlockStorageUpgrade, CreateBlockStorageResponse, CreatedBlockStorage, Scope, VmDetail,
};

/// Records a single call made through [`ScriptedApi`].
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    /// Plan listing.
    Plans(Scope),
    /// Volume creation.
    Create(BlockStorageCreate),
    /// Volume read.
    Get {
        /// Volume identifier.
        id: String,
        /// Project and location sent with the request.
        scope: Scope,
    },
    /// Attach or detach request.
    Attach {
        /// Volume identifier.
        id: String,
        /// Direction of the change.
        action: AttachAction,
        /// VM sent in the body.
        vm_id: u64,
    },
    /// Upgrade request.
    Upgrade {
        /// Volume identifier.
        id: String,
        /// Body sent with the request.
        payload: BlockStorageUpgrade,
    },
    /// Volume deletion.
    Delete {
        /// Volume identifier.
        id: String,
    },
}

#[derive(Debug, Default)]
struct ScriptedState {
    plans: VecDeque<Result<Vec<BlockStoragePlan>, ApiError>>,
    creates: VecDeque<Result<CreateBlockStorageResponse, ApiError>>,
    reads: VecDeque<Result<BlockStorageResponse, ApiError>>,
    actions: VecDeque<Result<ActionResponse, ApiError>>,
    deletes: VecDeque<Result<(), ApiError>>,
    calls: Vec<ApiCall>,
}

/// Block storage API double that returns pre-seeded responses in FIFO order.
///
/// The last queued plan list and the last queued read are repeated once the
/// queue drains, so status waits can poll a settled volume indefinitely.
/// Attach, detach, and upgrade share one queue. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ScriptedApi {
    state: Arc<Mutex<ScriptedState>>,
}

fn exhausted(endpoint: &str) -> ApiError {
    ApiError::Transport {
        message: format!("no scripted {endpoint} response available"),
    }
}

fn pop_repeating<T: Clone>(
    queue: &mut VecDeque<Result<T, ApiError>>,
    endpoint: &str,
) -> Result<T, ApiError> {
    if queue.len() > 1 {
        return queue.pop_front().unwrap_or_else(|| Err(exhausted(endpoint)));
    }
    queue.front().cloned().unwrap_or_else(|| Err(exhausted(endpoint)))
}

fn pop_once<T>(queue: &mut VecDeque<Result<T, ApiError>>, endpoint: &str) -> Result<T, ApiError> {
    queue.pop_front().unwrap_or_else(|| Err(exhausted(endpoint)))
}

impl ScriptedApi {
    /// Creates a double with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ScriptedState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.with_state(|state| state.calls.clone())
    }

    /// Number of recorded volume reads.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.with_state(|state| {
            state
                .calls
                .iter()
                .filter(|call| matches!(call, ApiCall::Get { .. }))
                .count()
        })
    }

    /// Queues a plan list given in TB.
    pub fn push_plans(&self, sizes_tb: &[f64]) {
        let plans = sizes_tb
            .iter()
            .map(|bs_size| BlockStoragePlan { bs_size: *bs_size })
            .collect();
        self.with_state(|state| state.plans.push_back(Ok(plans)));
    }

    /// Queues a create response.
    pub fn push_create(&self, response: Result<CreateBlockStorageResponse, ApiError>) {
        self.with_state(|state| state.creates.push_back(response));
    }

    /// Queues a successful create response for volume `id`.
    pub fn push_created(&self, id: f64) {
        self.push_create(Ok(CreateBlockStorageResponse {
            code: Some(200),
            data: Some(CreatedBlockStorage {
                id,
                is_credit_sufficient: Some(true),
            }),
            message: Some(String::from("Success")),
        }));
    }

    /// Queues a read result.
    pub fn push_read(&self, response: Result<BlockStorageResponse, ApiError>) {
        self.with_state(|state| state.reads.push_back(response));
    }

    /// Queues a successful read with the given status and attachment.
    pub fn push_volume(&self, name: &str, status: &str, vm_id: Option<u64>) {
        self.push_read(Ok(volume_response(name, status, "3750", vm_id)));
    }

    /// Queues a "not found" read failure.
    pub fn push_not_found(&self) {
        self.push_read(Err(not_found()));
    }

    /// Queues an attach, detach, or upgrade result.
    pub fn push_action(&self, response: Result<ActionResponse, ApiError>) {
        self.with_state(|state| state.actions.push_back(response));
    }

    /// Queues an accepted attach, detach, or upgrade response.
    pub fn push_action_ok(&self) {
        self.push_action(Ok(ActionResponse {
            code: Some(200),
            message: Some(String::from("Success")),
        }));
    }

    /// Queues an action response without a `code`, carrying `message`.
    pub fn push_action_refused(&self, message: &str) {
        self.push_action(Ok(ActionResponse {
            code: None,
            message: Some(message.to_owned()),
        }));
    }

    /// Queues a delete result.
    pub fn push_delete(&self, response: Result<(), ApiError>) {
        self.with_state(|state| state.deletes.push_back(response));
    }
}

impl BlockStorageApi for ScriptedApi {
    fn block_storage_plans<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> ApiFuture<'a, Vec<BlockStoragePlan>> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Plans(*scope));
                pop_repeating(&mut state.plans, "plans")
            })
        })
    }

    fn create_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageCreate,
        _scope: &'a Scope,
    ) -> ApiFuture<'a, CreateBlockStorageResponse> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Create(payload.clone()));
                pop_once(&mut state.creates, "create")
            })
        })
    }

    fn get_block_storage<'a>(
        &'a self,
        id: &'a str,
        scope: &'a Scope,
    ) -> ApiFuture<'a, BlockStorageResponse> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Get {
                    id: id.to_owned(),
                    scope: *scope,
                });
                pop_repeating(&mut state.reads, "read")
            })
        })
    }

    fn attach_or_detach_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageAttach,
        action: AttachAction,
        id: &'a str,
        _scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Attach {
                    id: id.to_owned(),
                    action,
                    vm_id: payload.vm_id,
                });
                pop_once(&mut state.actions, action.as_str())
            })
        })
    }

    fn upgrade_block_storage<'a>(
        &'a self,
        payload: &'a BlockStorageUpgrade,
        id: &'a str,
        _scope: &'a Scope,
    ) -> ApiFuture<'a, ActionResponse> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Upgrade {
                    id: id.to_owned(),
                    payload: payload.clone(),
                });
                pop_once(&mut state.actions, "upgrade")
            })
        })
    }

    fn delete_block_storage<'a>(&'a self, id: &'a str, _scope: &'a Scope) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.with_state(|state| {
                state.calls.push(ApiCall::Delete { id: id.to_owned() });
                pop_once(&mut state.deletes, "delete")
            })
        })
    }
}

/// Builds a read response for a volume.
#[must_use]
pub fn volume_response(
    name: &str,
    status: &str,
    iops: &str,
    vm_id: Option<u64>,
) -> BlockStorageResponse {
    BlockStorageResponse {
        data: BlockStorageDetail {
            name: name.to_owned(),
            status: BlockStorageStatus::from(status),
            template: BlockStorageTemplate {
                total_iops_sec: iops.to_owned(),
            },
            vm_detail: Some(VmDetail {
                vm_id,
                vm_name: vm_id.map(|id| format!("node-{id}")),
            }),
        },
    }
}

/// Error the API returns for a missing volume.
#[must_use]
pub fn not_found() -> ApiError {
    ApiError::Status {
        expected: 200,
        status: 404,
        body: String::from("{\"message\":\"Block storage not found\"}"),
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Guard that holds the env mutex and cleans up variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }

    /// Removes variables while holding the global mutex, restoring them on
    /// drop.
    pub async fn remove_vars(keys: &[&str]) -> Self {
        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(keys.len());
        for key in keys {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::remove_var(key) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
