//! Kubernetes cluster create payload.

use serde::{Deserialize, Serialize};

/// Body for `POST kubernetes/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KubernetesCreate {
    /// Cluster name.
    pub name: String,
    /// Kubernetes version, for example `1.29.0`.
    pub version: String,
    /// VPC hosting the cluster.
    pub vpc_id: String,
    /// Optional subnet inside the VPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    /// Master plan SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,
    /// Worker node pools.
    pub node_pools: Vec<NodePool>,
}

/// One worker node pool in a cluster create request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NodePool {
    /// Pool name.
    pub name: String,
    /// Worker plan name.
    pub specs_name: String,
    /// Fixed worker count. Zero means the pool is driven by elasticity.
    #[serde(default)]
    pub worker_node: u32,
    /// Autoscaling policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elasticity_dict: Option<ElasticityDict>,
    /// Autoscaling policy type, for example `Default` or `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
}

/// Autoscaling bounds of a node pool.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ElasticityDict {
    /// Lower bound on workers.
    pub min_nodes: u32,
    /// Upper bound on workers.
    pub max_nodes: u32,
    /// Scaling policy parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_parameter_type: Option<String>,
}
