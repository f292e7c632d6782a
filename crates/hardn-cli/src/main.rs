//! # hardn CLI entry point
//!
//! Parses command-line arguments, resolves configuration and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hardn_cli::config::{HardnConfig, Overrides, StoreKind};
use hardn_cli::context::RunContext;
use hardn_cli::harden::{run_harden, HardenArgs};
use hardn_cli::list::{run_list, ListArgs};
use hardn_cli::restore::{run_restore, RestoreArgs};
use hardn_cli::status::{run_status, StatusArgs};

/// hardn — reversible security hardening for Office.
///
/// Disables risky Office features (packager objects, macros, ActiveX, DDE
/// links) through registry values, and restores the previous configuration
/// from a journal.
#[derive(Parser, Debug)]
#[command(name = "hardn", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file. Defaults to ./hardn.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend to operate on.
    #[arg(long, value_enum, global = true)]
    store: Option<StoreKind>,

    /// JSON file backing the file store.
    #[arg(long, global = true)]
    store_file: Option<PathBuf>,

    /// Journal file recording original values.
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// YAML catalog to use instead of the built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply hardening rules.
    Harden(HardenArgs),

    /// Restore the values recorded in the journal.
    Restore(RestoreArgs),

    /// Report which rules are currently hardened.
    Status(StatusArgs),

    /// List catalog rules and their targets.
    List(ListArgs),
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            store: self.store,
            store_file: self.store_file.clone(),
            journal_file: self.journal.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = HardnConfig::discover(cli.config.as_deref(), &cwd)?.with_overrides(cli.overrides());
    tracing::debug!(?config, "resolved configuration");

    let ctx = RunContext::open(config)?;

    match &cli.command {
        Commands::Harden(args) => run_harden(args, &ctx),
        Commands::Restore(args) => run_restore(args, &ctx),
        Commands::Status(args) => run_status(args, &ctx),
        Commands::List(args) => run_list(args, &ctx),
    }
}
