//! Command-line interface definitions for the `e2e-provider` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand};

/// Locations accepted by `--location`.
pub(crate) const LOCATIONS: [&str; 3] = ["Delhi", "Mumbai", "Delhi-NCR-2"];

/// Top-level CLI for the `e2e-provider` binary.
#[derive(Debug, Parser)]
#[command(
    name = "e2e-provider",
    version,
    about = "Manage E2E Networks block storage volumes and Kubernetes clusters",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create, inspect, update, and delete block storage volumes.
    #[command(name = "block-storage", subcommand)]
    BlockStorage(BlockStorageCommand),
    /// List plans for, create, and inspect Kubernetes clusters.
    #[command(name = "kubernetes", subcommand)]
    Kubernetes(KubernetesCommand),
}

/// Block storage subcommands. Each one tracks a volume through a local state
/// file.
#[derive(Debug, Subcommand)]
pub(crate) enum BlockStorageCommand {
    /// Create a volume and record it in the state file.
    Create(CreateArgs),
    /// Refresh the recorded volume from the API.
    Read(StateArgs),
    /// Apply a change to the recorded volume.
    Update(UpdateArgs),
    /// Delete the recorded volume and remove the state file.
    Delete(StateArgs),
    /// Report whether the recorded volume still exists.
    Exists(StateArgs),
}

/// Location of the state file.
#[derive(Debug, Args)]
pub(crate) struct StateArgs {
    /// JSON file holding the last known volume snapshot.
    #[arg(long, value_name = "PATH")]
    pub(crate) state: String,
}

/// Arguments for `block-storage create`.
#[derive(Debug, Args)]
pub(crate) struct CreateArgs {
    #[command(flatten)]
    pub(crate) state: StateArgs,
    /// Volume name.
    #[arg(long)]
    pub(crate) name: String,
    /// Size in GB; must match one of the published plans.
    #[arg(long, value_name = "GB")]
    pub(crate) size: f64,
    /// Owning project.
    #[arg(long, value_name = "ID")]
    pub(crate) project_id: u64,
    /// Hosting region; defaults to the configured location.
    #[arg(long, value_parser = LOCATIONS)]
    pub(crate) location: Option<String>,
}

/// Arguments for `block-storage update`. Omitted values keep the recorded
/// ones.
#[derive(Debug, Args)]
pub(crate) struct UpdateArgs {
    #[command(flatten)]
    pub(crate) state: StateArgs,
    /// New volume name; only applied together with a larger size.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// New size in GB; the volume must be attached and can only grow.
    #[arg(long, value_name = "GB")]
    pub(crate) size: Option<f64>,
    /// Requested location; changing it is rejected.
    #[arg(long, value_parser = LOCATIONS)]
    pub(crate) location: Option<String>,
    /// Requested project; changing it is rejected.
    #[arg(long, value_name = "ID")]
    pub(crate) project_id: Option<u64>,
    /// Attach the volume to this VM, detaching it from any other first.
    #[arg(long, value_name = "ID", conflicts_with = "detach")]
    pub(crate) vm_id: Option<u64>,
    /// Detach the volume from its VM.
    #[arg(long)]
    pub(crate) detach: bool,
}

/// Kubernetes subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum KubernetesCommand {
    /// List master plans, or worker plans with `--workers`.
    Plans(PlansArgs),
    /// Create a cluster from a JSON payload file.
    Create(ClusterCreateArgs),
    /// Fetch a cluster by identifier.
    Get(ClusterGetArgs),
}

/// Project and location of a Kubernetes request.
#[derive(Debug, Args)]
pub(crate) struct ScopeArgs {
    /// Owning project.
    #[arg(long, value_name = "ID")]
    pub(crate) project_id: u64,
    /// Region; defaults to the configured location.
    #[arg(long, value_parser = LOCATIONS)]
    pub(crate) location: Option<String>,
}

/// Arguments for `kubernetes plans`.
#[derive(Debug, Args)]
pub(crate) struct PlansArgs {
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
    /// List worker node plans instead of master plans.
    #[arg(long)]
    pub(crate) workers: bool,
}

/// Arguments for `kubernetes create`.
#[derive(Debug, Args)]
pub(crate) struct ClusterCreateArgs {
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
    /// JSON file with the cluster definition, including `node_pools`.
    #[arg(long, value_name = "PATH")]
    pub(crate) payload: String,
}

/// Arguments for `kubernetes get`.
#[derive(Debug, Args)]
pub(crate) struct ClusterGetArgs {
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
    /// Cluster identifier.
    #[arg(long)]
    pub(crate) id: String,
}
