//! Node-pool payload shaping for Kubernetes cluster creation.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::ApiError;

const NODE_POOLS: &str = "node_pools";
const WORKER_NODE: &str = "worker_node";
const ELASTICITY_DICT: &str = "elasticity_dict";

/// Removes node-pool fields the API rejects in combination.
///
/// A `worker_node` of zero is dropped so the pool is sized by elasticity,
/// and `elasticity_dict` is dropped when a fixed count of two or more
/// workers is requested. Entries that are not objects, and non-numeric
/// worker counts, are left alone.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPayload`] when `node_pools` is missing or is
/// not a list.
pub fn strip_conflicting_node_pool_fields(payload: &mut Value) -> Result<(), ApiError> {
    let Some(Value::Array(pools)) = payload.get_mut(NODE_POOLS) else {
        return Err(ApiError::InvalidPayload(String::from(
            "node_pools field is missing or invalid",
        )));
    };

    for pool in pools.iter_mut().filter_map(Value::as_object_mut) {
        let Some(workers) = pool.get(WORKER_NODE).and_then(Value::as_f64) else {
            continue;
        };
        if workers.abs() < f64::EPSILON {
            pool.remove(WORKER_NODE);
        } else if workers >= 2.0 && pool.remove(ELASTICITY_DICT).is_some() {
            debug!(workers, "dropped elasticity_dict from fixed-size node pool");
        }
    }
    Ok(())
}

/// Converts a typed request body into JSON ready for shaping.
pub(super) fn encode_payload(payload: &impl Serialize, context: &str) -> Result<Value, ApiError> {
    serde_json::to_value(payload)
        .map_err(|err| ApiError::InvalidPayload(format!("cannot encode {context}: {err}")))
}
