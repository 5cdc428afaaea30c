use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::TargetArgs;

/// Check whether a newer release is available on the configured channel.
///
/// Performs a version check against the release listing but downloads and
/// installs nothing. Useful for automation and for deciding whether to run
/// `updraft apply`.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    target: TargetArgs,
}

impl CheckCommand {
    /// Run the check and report the result.
    pub async fn execute(self) -> Result<()> {
        let current = self.target.current.clone();
        let config = self.target.into_config()?;
        let mut pipeline = super::build_pipeline(config, true)?;

        println!("{}", "Checking for updates...".cyan());
        let (latest, available) = pipeline.get_latest_remote().await?;

        if available {
            let latest = latest.unwrap_or_default();
            println!(
                "{}",
                format!("Update available: {current} -> {latest}").green()
            );
            println!("Run `updraft apply` to install the latest version");
        } else {
            println!(
                "{}",
                format!("You are on the latest version ({current})").green()
            );
        }
        Ok(())
    }
}
