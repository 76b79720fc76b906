//! `tgnms-ha` - inspect controller HA arbitration and upgrade batches.
//!
//! All commands print JSON on stdout; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tgnms_ha::{
    evaluate_network,
    project_upgrade_status,
    resolve,
    ControllerFsmState,
    ControllerStatusSample,
    NmsConfig,
    NodeUpgradeProjection,
    TopologyNode,
};

#[derive(Parser, Debug)]
#[command(name = "tgnms-ha", version, about = "Controller HA status for Terragraph networks")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// NMS config file (defaults to <config_dir>/tgnms/ha.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide the active controller from two reported FSM states.
    Resolve {
        #[arg(long, default_value = "UNKNOWN")]
        primary: ControllerFsmState,
        #[arg(long, default_value = "UNKNOWN")]
        backup: ControllerFsmState,
    },
    /// Resolve the upgrade batches of a status snapshot to topology nodes.
    Upgrade {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Evaluate HA status of a configured network from a status snapshot.
    Status {
        #[arg(long)]
        network: String,
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// List configured networks and their controllers.
    Networks,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSummary {
    name: String,
    ha: bool,
    primary_api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup_api_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworksReport {
    refresh_interval_secs: u64,
    health_refresh_interval_secs: u64,
    networks: Vec<NetworkSummary>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    match cli.command {
        Command::Resolve { primary, backup } => {
            let verdict = resolve(primary, backup);
            tracing::debug!(%primary, %backup, active = %verdict.active(), "Resolved");
            print_json(out, &verdict)
        }
        Command::Upgrade { snapshot } => {
            let sample = read_snapshot(&snapshot)?;
            let projection: NodeUpgradeProjection<TopologyNode> = match &sample.upgrade_state {
                Some(dump) => project_upgrade_status(&sample.nodes, dump),
                None => {
                    tracing::info!(snapshot = %snapshot.display(), "Snapshot has no upgrade state");
                    NodeUpgradeProjection::default()
                }
            };
            print_json(out, &projection)
        }
        Command::Status { network, snapshot } => {
            let config = NmsConfig::load_or_default(cli.config.as_deref())?;
            let controllers = config.network(&network)?.controller_pair();
            let sample = read_snapshot(&snapshot)?;
            let status = evaluate_network(&network, &controllers, &sample);
            tracing::info!(
                network = %status.network,
                active = %status.ha.active(),
                "Evaluated network HA status"
            );
            print_json(out, &status)
        }
        Command::Networks => {
            let config = NmsConfig::load_or_default(cli.config.as_deref())?;
            let report = NetworksReport {
                refresh_interval_secs: config.refresh_interval_secs,
                health_refresh_interval_secs: config.health_refresh_interval_secs,
                networks: config
                    .networks
                    .iter()
                    .map(|n| NetworkSummary {
                        name: n.name.clone(),
                        ha: n.is_ha(),
                        primary_api_url: n.primary.api_service_url(),
                        backup_api_url: n.backup.as_ref().map(|b| b.api_service_url()),
                    })
                    .collect(),
            };
            print_json(out, &report)
        }
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<ControllerStatusSample> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    ControllerStatusSample::from_json(&raw)
        .with_context(|| format!("invalid snapshot {}", path.display()))
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
