//! Binary entry point for the `e2e-provider` CLI.

use std::io::{self, Write};
use std::process;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use e2e_provider::api::{ApiError, E2eClient};
use e2e_provider::block_storage::{
    BlockStorageController, BlockStorageError, BlockStorageSpec, BlockStorageState, UpdateOutcome,
};
use e2e_provider::config::{ConfigError, E2eConfig};
use e2e_provider::models::{Location, Scope, UnknownLocation};
use e2e_provider::state_store::{StateStore, StateStoreError};

mod cli;

use cli::{
    BlockStorageCommand, Cli, ClusterCreateArgs, ClusterGetArgs, CreateArgs, KubernetesCommand,
    PlansArgs, ScopeArgs, StateArgs, UpdateArgs,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    BlockStorage(#[from] BlockStorageError),
    #[error("state error: {0}")]
    State(#[from] StateStoreError),
    #[error("no block storage recorded in {0}")]
    NoState(String),
    #[error(transparent)]
    Location(#[from] UnknownLocation),
    #[error("failed to read payload {path}: {message}")]
    Payload { path: String, message: String },
    #[error("failed to render output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling");
            on_interrupt.cancel();
        }
    });

    let exit_code = match dispatch(cli, cancel).await {
        Ok(output) => write_output(io::stdout(), &output),
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<Value, CliError> {
    match cli {
        Cli::BlockStorage(command) => match command {
            BlockStorageCommand::Create(args) => create_volume(args, cancel).await,
            BlockStorageCommand::Read(args) => read_volume(&args, cancel).await,
            BlockStorageCommand::Update(args) => update_volume(args, cancel).await,
            BlockStorageCommand::Delete(args) => delete_volume(&args, cancel).await,
            BlockStorageCommand::Exists(args) => volume_exists(&args, cancel).await,
        },
        Cli::Kubernetes(command) => match command {
            KubernetesCommand::Plans(args) => kubernetes_plans(&args).await,
            KubernetesCommand::Create(args) => kubernetes_create(&args).await,
            KubernetesCommand::Get(args) => kubernetes_get(&args).await,
        },
    }
}

fn load_config() -> Result<E2eConfig, CliError> {
    let config = E2eConfig::load_without_cli_args()?;
    config.validate()?;
    Ok(config)
}

fn resolve_location(explicit: Option<&str>, config: &E2eConfig) -> Result<Location, CliError> {
    explicit.map_or_else(
        || config.location().map_err(CliError::from),
        |raw| raw.parse::<Location>().map_err(CliError::from),
    )
}

fn resolve_scope(args: &ScopeArgs, config: &E2eConfig) -> Result<Scope, CliError> {
    let location = resolve_location(args.location.as_deref(), config)?;
    Ok(Scope::new(args.project_id, location))
}

fn controller(
    config: &E2eConfig,
    cancel: CancellationToken,
) -> Result<BlockStorageController<E2eClient>, CliError> {
    let client = E2eClient::new(config)?;
    Ok(BlockStorageController::new(client, config.wait_policy()).with_cancellation(cancel))
}

fn recorded(store: &StateStore) -> Result<BlockStorageState, CliError> {
    store
        .load()?
        .ok_or_else(|| CliError::NoState(store.path().to_string()))
}

fn render(value: &impl Serialize) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|err| CliError::Output(err.to_string()))
}

async fn create_volume(args: CreateArgs, cancel: CancellationToken) -> Result<Value, CliError> {
    let store = StateStore::new(args.state.state.as_str());
    let config = load_config()?;
    let location = resolve_location(args.location.as_deref(), &config)?;
    let spec = BlockStorageSpec::new(args.name, args.size, args.project_id, location);

    let state = controller(&config, cancel)?.create(&spec).await?;
    store.save(&state)?;
    render(&state)
}

async fn read_volume(args: &StateArgs, cancel: CancellationToken) -> Result<Value, CliError> {
    let store = StateStore::new(args.state.as_str());
    let prior = recorded(&store)?;
    let config = load_config()?;

    if let Some(state) = controller(&config, cancel)?.read(&prior).await? {
        store.save(&state)?;
        return render(&state);
    }
    store.clear()?;
    info!(path = %store.path(), "cleared state for vanished block storage");
    Ok(Value::Null)
}

fn desired_spec(prior: &BlockStorageState, args: UpdateArgs) -> Result<BlockStorageSpec, CliError> {
    let base = BlockStorageSpec::from_state(prior);
    let location = args
        .location
        .as_deref()
        .map(str::parse::<Location>)
        .transpose()?
        .unwrap_or(base.location);
    let vm_id = if args.detach {
        None
    } else {
        args.vm_id.or(base.vm_id)
    };

    Ok(BlockStorageSpec {
        name: args
            .name
            .map_or(base.name, |name| name.trim().to_owned()),
        size_gb: args.size.unwrap_or(base.size_gb),
        project_id: args.project_id.unwrap_or(base.project_id),
        location,
        vm_id,
    })
}

async fn update_volume(args: UpdateArgs, cancel: CancellationToken) -> Result<Value, CliError> {
    let store = StateStore::new(args.state.state.as_str());
    let prior = recorded(&store)?;
    let desired = desired_spec(&prior, args)?;
    let config = load_config()?;

    match controller(&config, cancel)?.update(&prior, &desired).await {
        Ok(UpdateOutcome::Updated(state)) => {
            store.save(&state)?;
            render(&state)
        }
        Ok(UpdateOutcome::Gone) => {
            store.clear()?;
            Ok(Value::Null)
        }
        Err(failure) => {
            store.save(&failure.state)?;
            Err(CliError::BlockStorage(failure.error))
        }
    }
}

async fn delete_volume(args: &StateArgs, cancel: CancellationToken) -> Result<Value, CliError> {
    let store = StateStore::new(args.state.as_str());
    let prior = recorded(&store)?;
    let config = load_config()?;
    let lifecycle = controller(&config, cancel)?;

    let Some(current) = lifecycle.read(&prior).await? else {
        store.clear()?;
        info!(path = %store.path(), "cleared state for vanished block storage");
        return Ok(Value::Null);
    };
    store.save(&current)?;
    lifecycle.delete(&current).await?;
    store.clear()?;
    Ok(json!({ "deleted": current.id }))
}

async fn volume_exists(args: &StateArgs, cancel: CancellationToken) -> Result<Value, CliError> {
    let store = StateStore::new(args.state.as_str());
    let Some(state) = store.load()? else {
        return Ok(json!({ "exists": false }));
    };
    let config = load_config()?;

    let exists = controller(&config, cancel)?.exists(&state).await?;
    Ok(json!({ "exists": exists }))
}

async fn kubernetes_plans(args: &PlansArgs) -> Result<Value, CliError> {
    let config = load_config()?;
    let scope = resolve_scope(&args.scope, &config)?;
    let client = E2eClient::new(&config)?;

    let plans = if args.workers {
        client.get_kubernetes_worker_plans(&scope).await?
    } else {
        client.get_kubernetes_master_plans(&scope).await?
    };
    Ok(Value::Object(plans))
}

fn read_payload(path: &Utf8Path) -> Result<Value, CliError> {
    let payload_error = |message: String| CliError::Payload {
        path: path.to_string(),
        message,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| payload_error(String::from("path is missing a filename")))?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| payload_error(err.to_string()))?;
    let contents = dir
        .read_to_string(file_name)
        .map_err(|err| payload_error(err.to_string()))?;
    serde_json::from_str(&contents).map_err(|err| payload_error(err.to_string()))
}

async fn kubernetes_create(args: &ClusterCreateArgs) -> Result<Value, CliError> {
    let mut payload = read_payload(Utf8Path::new(&args.payload))?;
    let config = load_config()?;
    let scope = resolve_scope(&args.scope, &config)?;

    let created = E2eClient::new(&config)?
        .create_kubernetes_cluster_raw(&mut payload, &scope)
        .await?;
    Ok(Value::Object(created))
}

async fn kubernetes_get(args: &ClusterGetArgs) -> Result<Value, CliError> {
    let config = load_config()?;
    let scope = resolve_scope(&args.scope, &config)?;

    let cluster = E2eClient::new(&config)?
        .get_kubernetes_cluster(&args.id, &scope)
        .await?;
    Ok(Value::Object(cluster))
}

fn write_output(mut target: impl Write, output: &Value) -> i32 {
    match serde_json::to_string_pretty(output) {
        Ok(rendered) => {
            writeln!(target, "{rendered}").ok();
            0
        }
        Err(err) => {
            report_error(&CliError::Output(err.to_string()));
            1
        }
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "error: {err}").ok();
}
