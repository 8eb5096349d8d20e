//! mdr CLI - Markdown content routes.
//!
//! Provides commands for:
//! - `generate`: Scan the content root and write the route manifest
//! - `watch`: Regenerate the manifest whenever content changes
//! - `routes`: List content routes under the configured mount prefix
//! - `resolve`: Show how a content import is resolved
//! - `load`: Print the module synthesized for a content import

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, LoadArgs, ResolveArgs, RoutesArgs, WatchArgs};
use output::Output;

/// mdr - Markdown content routes.
#[derive(Parser)]
#[command(name = "mdr", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover mdr.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (manifest timings and watch events).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan content and write the route manifest.
    Generate(GenerateArgs),
    /// Write the manifest, then keep it up to date as content changes.
    Watch(WatchArgs),
    /// List content routes.
    Routes(RoutesArgs),
    /// Resolve a content import to its virtual module id.
    Resolve(ResolveArgs),
    /// Print the module synthesized for a content import.
    Load(LoadArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => args.execute(config),
        Commands::Watch(args) => args.execute(config),
        Commands::Routes(args) => args.execute(config),
        Commands::Resolve(args) => args.execute(config),
        Commands::Load(args) => args.execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
