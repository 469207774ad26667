use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use covscrape::cli;
use covscrape::store::StorageContext;

/// covscrape — Attach JaCoCo HTML line coverage to parsed method records.
#[derive(Parser)]
#[command(name = "covscrape", version, about)]
struct Cli {
    /// Root directory holding the method records (`<root>/temp/<workspace>/main`).
    #[arg(long, global = true, env = "COVSCRAPE_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Workspace name under the storage root.
    #[arg(long, global = true, env = "COVSCRAPE_WORKSPACE")]
    workspace: Option<String>,

    /// Log filter directive, e.g. `debug` or `covscrape=trace`.
    #[arg(long, global = true, env = "COVSCRAPE_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the method records paired with a JaCoCo source page.
    Annotate {
        /// Path to the JaCoCo HTML page (e.g. `Foo.html`).
        report: PathBuf,
    },

    /// Show the text and status of a range of lines from a JaCoCo source page.
    Lines {
        /// Path to the JaCoCo HTML page.
        report: PathBuf,

        /// First line (1-based, inclusive).
        #[arg(long)]
        start: u32,

        /// Last line (inclusive).
        #[arg(long)]
        end: u32,
    },

    /// Print whether a method name appears in a records file.
    HasMethod {
        /// Method name to look up.
        name: String,

        /// Path to the records JSON file.
        #[arg(long)]
        records: PathBuf,
    },

    /// Print the records path derived for a JaCoCo source page.
    Key {
        /// Path to the JaCoCo HTML page.
        report: PathBuf,
    },
}

impl Cli {
    fn storage_context(&self) -> Result<StorageContext> {
        let root = self
            .storage_root
            .clone()
            .context("--storage-root (or COVSCRAPE_STORAGE_ROOT) is required")?;
        let workspace = self
            .workspace
            .clone()
            .context("--workspace (or COVSCRAPE_WORKSPACE) is required")?;
        Ok(StorageContext::new(root, workspace))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output = match &cli.command {
        Commands::Annotate { report } => cli::cmd_annotate(cli.storage_context()?, report)?,
        Commands::Lines { report, start, end } => cli::cmd_lines(report, *start, *end)?,
        Commands::HasMethod { name, records } => cli::cmd_has_method(name, records)?,
        Commands::Key { report } => cli::cmd_key(&cli.storage_context()?, report)?,
    };
    print!("{output}");
    Ok(())
}
