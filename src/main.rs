//! Updraft CLI entry point.
//!
//! Parses command-line arguments and dispatches to the subcommands:
//! - `check` - Check whether an update is available
//! - `status` - Show current and latest version information
//! - `apply` - Download and install the latest release, then restart

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use updraft_cli::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(err) = cli.execute().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
    Ok(())
}
