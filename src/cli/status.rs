use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::TargetArgs;

/// Show the current version and the latest available one.
///
/// Unlike `check`, a network failure here is not fatal: the command still
/// prints the current version and simply omits the remote side.
#[derive(Parser, Debug)]
pub struct StatusCommand {
    #[command(flatten)]
    target: TargetArgs,
}

impl StatusCommand {
    /// Print the version status line(s).
    pub async fn execute(self) -> Result<()> {
        let current = self.target.current.clone();
        let config = self.target.into_config()?;
        let mut pipeline = super::build_pipeline(config, true)?;

        let (latest, available) = match pipeline.get_latest_remote().await {
            Ok(result) => result,
            Err(err) => {
                debug!("failed to check for updates: {err}");
                (None, false)
            }
        };

        println!("{}", format_version_info(&current, latest.as_deref(), available));
        Ok(())
    }
}

/// Format version information for status display.
pub fn format_version_info(current: &str, latest: Option<&str>, update_available: bool) -> String {
    match latest {
        Some(latest) if update_available => {
            format!("Current version: {current}\nLatest version:  {latest} (update available)")
        }
        _ => format!("Current version: {current} (up to date)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_info_formatting() {
        assert_eq!(
            format_version_info("1.0.0", None, false),
            "Current version: 1.0.0 (up to date)"
        );
        assert_eq!(
            format_version_info("1.0.0", Some("1.0.0"), false),
            "Current version: 1.0.0 (up to date)"
        );
        assert_eq!(
            format_version_info("1.0.0", Some("1.1.0"), true),
            "Current version: 1.0.0\nLatest version:  1.1.0 (update available)"
        );
    }
}
