//! solar-cli — Operator interface to the SolarCoin checkpoint tables.
//!
//! Lists the active checkpoint table, checks block hashes against it,
//! reports the total-blocks estimate and sync progress, and finds the last
//! checkpoint present in a block index dump.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};

use solar_consensus::Checkpoints;
use solar_core::constants::NetworkType;
use solar_core::types::Hash256;
use solar_node_lib::{init_logging, MemoryBlockIndex, NodeConfig};

/// SolarCoin checkpoint tool.
#[derive(Parser, Debug)]
#[command(name = "solar-cli", version, about = "Inspect and apply SolarCoin checkpoints")]
struct Cli {
    /// Config file (default: <data dir>/solar.toml)
    #[arg(long, global = true)]
    conf: Option<PathBuf>,

    /// Use the public test network table.
    #[arg(long, global = true, conflicts_with = "regtest")]
    testnet: bool,

    /// Use the regression-test network table.
    #[arg(long, global = true, conflicts_with = "testnet")]
    regtest: bool,

    /// Enforce checkpoints (pass `--checkpoints false` to disable)
    #[arg(long, global = true)]
    checkpoints: Option<bool>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the active checkpoint table and calibration constants.
    List,
    /// Check a block hash against the checkpoint at its height.
    Check(CheckArgs),
    /// Print the total-blocks estimate.
    Estimate,
    /// Estimate verification progress for a block.
    Progress(ProgressArgs),
    /// Find the highest checkpoint present in a block index dump.
    LastCheckpoint(LastCheckpointArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Block height.
    height: u64,
    /// Block hash (64 hex characters).
    hash: Hash256,
}

#[derive(Args, Debug)]
struct ProgressArgs {
    /// Cumulative transaction count through the block.
    #[arg(long)]
    chain_tx: u64,
    /// Block timestamp (Unix seconds).
    #[arg(long)]
    block_time: u64,
    /// Evaluation time (Unix seconds, default: now).
    #[arg(long)]
    now: Option<u64>,
}

#[derive(Args, Debug)]
struct LastCheckpointArgs {
    /// JSON file holding an array of block index records.
    #[arg(long)]
    index: PathBuf,
}

impl Cli {
    /// Layer command-line flags over the loaded configuration.
    fn into_config(self) -> Result<(NodeConfig, Commands)> {
        let mut config = NodeConfig::load(self.conf.as_deref()).context("Failed to load config")?;

        if self.regtest {
            config.network = NetworkType::Regtest;
        } else if self.testnet {
            config.network = NetworkType::Testnet;
        }
        if let Some(enabled) = self.checkpoints {
            config.checkpoints = enabled;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }

        Ok((config, self.command))
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        process::exit(2);
    }
}

fn run() -> Result<()> {
    let (config, command) = Cli::parse().into_config()?;
    init_logging(&config.log_level, &config.log_format).context("Failed to initialize logging")?;

    info!(network = %config.network, checkpoints = config.checkpoints, "solar-cli");
    let checkpoints = Checkpoints::new(config.checkpoint_config());

    match command {
        Commands::List => list(&checkpoints),
        Commands::Check(args) => {
            if !check(&checkpoints, args)? {
                process::exit(1);
            }
            Ok(())
        }
        Commands::Estimate => {
            println!("{}", checkpoints.total_blocks_estimate());
            Ok(())
        }
        Commands::Progress(args) => progress(&checkpoints, args),
        Commands::LastCheckpoint(args) => last_checkpoint(&checkpoints, args),
    }
}

/// Print the active table as JSON.
fn list(checkpoints: &Checkpoints<'_>) -> Result<()> {
    let data = checkpoints.data();
    let entries: Vec<_> = data
        .iter()
        .map(|(height, hash)| json!({ "height": height, "hash": hash }))
        .collect();
    let out = json!({
        "network": checkpoints.network(),
        "enabled": checkpoints.is_enabled(),
        "checkpoints": entries,
        "last_checkpoint_timestamp": data.last_checkpoint_timestamp(),
        "transactions_at_last_checkpoint": data.transactions_at_last_checkpoint(),
        "transactions_per_day": data.transactions_per_day(),
        "sigcheck_factor": data.sigcheck_factor(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Returns whether the block is consistent with the checkpoints.
fn check(checkpoints: &Checkpoints<'_>, args: CheckArgs) -> Result<bool> {
    match checkpoints.verify_block(args.height, &args.hash) {
        Ok(()) => {
            println!("ok");
            Ok(true)
        }
        Err(e) => {
            println!("rejected: {e}");
            Ok(false)
        }
    }
}

fn progress(checkpoints: &Checkpoints<'_>, args: ProgressArgs) -> Result<()> {
    let now = match args.now {
        Some(now) => now,
        None => u64::try_from(chrono::Utc::now().timestamp())
            .context("System clock is before the Unix epoch")?,
    };
    debug!(chain_tx = args.chain_tx, block_time = args.block_time, now, "progress");
    let fraction = checkpoints.verification_progress(args.chain_tx, args.block_time, now);
    println!("{fraction:.6}");
    Ok(())
}

fn last_checkpoint(checkpoints: &Checkpoints<'_>, args: LastCheckpointArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.index)
        .with_context(|| format!("Failed to read block index: {}", args.index.display()))?;
    let index = MemoryBlockIndex::from_json(&json).context("Failed to parse block index")?;
    info!(records = index.len(), "loaded block index");

    match checkpoints.last_checkpoint(&index) {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("none"),
    }
    Ok(())
}
