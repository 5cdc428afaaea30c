use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::TargetArgs;
use crate::pipeline::{CycleState, UpdateHooks};

/// Download and install the latest release, then restart.
///
/// Runs a full update cycle: version check, candidate selection, download
/// with a progress bar, and the swap-and-restart handoff. Unless `--yes` is
/// given, a confirmation prompt runs as the pre-update hook - the designed
/// cancellation point before any bytes are committed.
///
/// On a successful install this command does not return: the process exits
/// so the restart script can replace the executable.
#[derive(Parser, Debug)]
pub struct ApplyCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Install without asking for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Stage the download in this directory instead of next to the
    /// executable.
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,
}

impl ApplyCommand {
    /// Run the full update cycle.
    pub async fn execute(self, quiet: bool) -> Result<()> {
        let current = self.target.current.clone();
        let mut config = self.target.into_config()?.auto_update(true);
        if let Some(dir) = self.download_dir {
            config = config.download_dir(dir);
        }

        let mut hooks = UpdateHooks::new()
            .cancel(|| println!("{}", "Update cancelled.".yellow()));
        if !self.yes {
            hooks = hooks.pre_update(confirm_install);
        }

        let mut pipeline = super::build_pipeline(config, quiet)?.with_hooks(hooks);

        println!("{}", "Checking for updates...".cyan());
        match pipeline.run_cycle().await? {
            Some(handoff) => {
                println!("{}", "Update installed, restarting...".green());
                handoff.exit()
            }
            None => {
                if pipeline.state() == CycleState::NoUpdate {
                    println!(
                        "{}",
                        format!("You are on the latest version ({current})").green()
                    );
                }
                Ok(())
            }
        }
    }
}

/// Interactive pre-update hook: ask before committing to the download.
fn confirm_install() -> bool {
    print!("A new version is available. Install it now? [y/N] ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
}
