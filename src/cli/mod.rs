//! Command-line interface for updraft.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! execution logic:
//!
//! - `check` - Check whether an update is available without installing
//! - `status` - Show current and latest available version
//! - `apply` - Download and install the latest release, then restart
//!
//! All subcommands share the same repository/executable coordinates via
//! [`TargetArgs`]. Global flags control verbosity: `--verbose` enables debug
//! logging, `--quiet` silences logging and progress output entirely.
//!
//! # Usage
//!
//! ```bash
//! # Is there a newer stable release?
//! updraft check --owner acme --repo app --current 0.1.0 --asset app.zip
//!
//! # Follow the beta channel instead
//! updraft apply --owner acme --repo app --current 0.1.0 --asset app.zip \
//!     --channel beta --yes
//! ```

pub mod apply;
pub mod check;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::UpdateConfig;
use crate::fetch::HttpAssetFetcher;
use crate::install::ScriptRestarter;
use crate::pipeline::UpdatePipeline;
use crate::source::GithubReleaseSource;
use crate::utils::progress::{IndicatifSink, ProgressSink, SilentSink};
use crate::version::Channel;

/// Top-level command-line interface.
#[derive(Parser)]
#[command(
    name = "updraft",
    version,
    about = "Self-update client for GitHub-released binaries",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress logging and progress output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an update is available.
    Check(check::CheckCommand),

    /// Show the current version and the latest available one.
    Status(status::StatusCommand),

    /// Download and install the latest release, then restart.
    Apply(apply::ApplyCommand),
}

impl Cli {
    /// Initialize logging and dispatch to the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();
        match self.command {
            Commands::Check(cmd) => cmd.execute().await,
            Commands::Status(cmd) => cmd.execute().await,
            Commands::Apply(cmd) => cmd.execute(self.quiet).await,
        }
    }

    /// Map verbosity flags to a tracing filter: `--verbose` means debug,
    /// `--quiet` disables logging, otherwise `RUST_LOG` or warnings only.
    fn init_logging(&self) {
        if self.quiet {
            return;
        }
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new("warn")
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(true)
            .try_init();
    }
}

/// Repository and executable coordinates shared by all subcommands.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// GitHub repository owner.
    #[arg(long)]
    pub owner: String,

    /// GitHub repository name.
    #[arg(long)]
    pub repo: String,

    /// Version of the currently running executable.
    #[arg(long, value_name = "VERSION")]
    pub current: String,

    /// Release channel to accept: alpha, beta, dev, rc or stable.
    #[arg(long, default_value = "stable")]
    pub channel: Channel,

    /// Override the branch constraint derived from the current version.
    #[arg(long)]
    pub branch: Option<String>,

    /// Release asset filename to download, matched case-insensitively.
    #[arg(long)]
    pub asset: String,

    /// Executable to replace; defaults to the running executable.
    #[arg(long)]
    pub executable: Option<PathBuf>,
}

impl TargetArgs {
    /// Turn the parsed arguments into a pipeline configuration.
    pub fn into_config(self) -> Result<UpdateConfig> {
        let executable = match self.executable {
            Some(path) => path,
            None => std::env::current_exe()
                .context("failed to determine current executable path")?,
        };
        Ok(
            UpdateConfig::new(self.owner, self.repo, self.current, executable, self.asset)
                .channel(self.channel)
                .branch(self.branch),
        )
    }
}

/// Assemble a pipeline over the real collaborators: GitHub release listing,
/// HTTP download, terminal progress, script-based restart.
fn build_pipeline(config: UpdateConfig, quiet: bool) -> Result<UpdatePipeline> {
    let sink: Box<dyn ProgressSink> = if quiet {
        Box::new(SilentSink)
    } else {
        Box::new(IndicatifSink::new())
    };
    let pipeline = UpdatePipeline::new(
        config,
        Box::new(GithubReleaseSource::new()),
        Box::new(HttpAssetFetcher::new()),
        sink,
        Box::new(ScriptRestarter::new()),
    )?;
    Ok(pipeline)
}
