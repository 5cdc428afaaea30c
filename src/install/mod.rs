//! Process replacement: swap the executable and restart it.
//!
//! A running executable cannot overwrite itself on every platform, so the
//! swap happens outside the process: [`ScriptRestarter`] writes a transient,
//! self-deleting restart script next to the executable, spawns it detached,
//! and returns a [`Handoff`] token. The script waits for the current process
//! to exit, moves the downloaded file over the executable, and starts the
//! new binary.
//!
//! The handoff token makes the "does not return" contract explicit without
//! killing the process inside library code: [`Handoff::exit`] terminates the
//! process, and tests intercept the token instead of dying. After a
//! successful [`ProcessReplacer::replace`] the caller must not resume normal
//! operation - the swap script is already counting down.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::core::UpdateError;

/// Proof that the restart handoff has been prepared.
///
/// The only useful thing to do with a handoff is [`exit`](Handoff::exit);
/// the token exists so that the terminal action is a value tests can
/// intercept rather than an abrupt kill buried in library code.
#[derive(Debug)]
#[must_use = "a prepared handoff must end in Handoff::exit()"]
pub struct Handoff {
    _private: (),
}

impl Handoff {
    /// Construct a handoff token. Implementors of [`ProcessReplacer`] call
    /// this after the swap mechanism is in place.
    pub fn ready() -> Self {
        Self { _private: () }
    }

    /// Terminate the process so the swap script can replace the executable.
    ///
    /// This is deliberately non-graceful: the restart script owns the rest
    /// of the update, and keeping the executable's file lock open any longer
    /// only delays it.
    pub fn exit(self) -> ! {
        info!("exiting for restart");
        std::process::exit(0)
    }
}

/// Performs the file swap and process restart.
pub trait ProcessReplacer: Send + Sync {
    /// Arrange for `update_file` to replace `executable` and for the new
    /// binary to start, then hand off.
    ///
    /// On success the caller holds a [`Handoff`] and must exit through it.
    fn replace(&self, update_file: &Path, executable: &Path) -> Result<Handoff, UpdateError>;
}

impl<T: ProcessReplacer + ?Sized> ProcessReplacer for std::sync::Arc<T> {
    fn replace(&self, update_file: &Path, executable: &Path) -> Result<Handoff, UpdateError> {
        (**self).replace(update_file, executable)
    }
}

/// [`ProcessReplacer`] writing a self-deleting restart script.
///
/// On Windows this is the classic pair of a batch file doing the work and a
/// VBScript silencer running it without a console window; on Unix a single
/// shell script. Both variants delete themselves after the swap.
pub struct ScriptRestarter;

impl ScriptRestarter {
    /// Create a restarter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptRestarter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessReplacer for ScriptRestarter {
    fn replace(&self, update_file: &Path, executable: &Path) -> Result<Handoff, UpdateError> {
        if !update_file.exists() {
            return Err(UpdateError::InstallFailed {
                reason: format!("downloaded file missing: {}", update_file.display()),
            });
        }

        let script_dir = executable
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        debug!("installing update");
        spawn_restart_script(script_dir, update_file, executable)?;

        info!("restart script spawned, handing off");
        Ok(Handoff::ready())
    }
}

#[cfg(windows)]
fn spawn_restart_script(
    script_dir: &Path,
    update_file: &Path,
    executable: &Path,
) -> Result<(), UpdateError> {
    let batch_path = script_dir.join(crate::constants::RESTART_BATCH);
    let silencer_path = script_dir.join(crate::constants::RESTART_SILENCER);

    debug!("write batch file: {}", batch_path.display());
    std::fs::write(
        &batch_path,
        swap_batch_script(update_file, executable, &silencer_path),
    )?;

    debug!("write silencer script: {}", silencer_path.display());
    std::fs::write(&silencer_path, SILENCER_SCRIPT)?;

    debug!("starting update batch file");
    Command::new("wscript.exe")
        .arg(&silencer_path)
        .arg(&batch_path)
        .spawn()
        .map_err(|err| UpdateError::InstallFailed {
            reason: format!("failed to spawn restart script: {err}"),
        })?;
    Ok(())
}

#[cfg(unix)]
fn spawn_restart_script(
    script_dir: &Path,
    update_file: &Path,
    executable: &Path,
) -> Result<(), UpdateError> {
    let script_path = script_dir.join(crate::constants::RESTART_SHELL);

    debug!("write restart script: {}", script_path.display());
    std::fs::write(&script_path, swap_shell_script(update_file, executable))?;

    debug!("starting restart script");
    Command::new("sh")
        .arg(&script_path)
        .spawn()
        .map_err(|err| UpdateError::InstallFailed {
            reason: format!("failed to spawn restart script: {err}"),
        })?;
    Ok(())
}

/// VBScript that runs its first argument with a hidden window.
#[cfg(windows)]
const SILENCER_SCRIPT: &str =
    "CreateObject(\"Wscript.Shell\").Run \"\"\"\" & WScript.Arguments(0) & \"\"\"\", 0, False";

/// Batch script: wait for the parent to exit, swap the binary, restart it,
/// and delete both script files.
#[cfg(any(windows, test))]
fn swap_batch_script(update_file: &Path, executable: &Path, silencer: &Path) -> String {
    let lines = [
        "@echo off".to_string(),
        "echo Updating to latest version...".to_string(),
        "ping 127.0.0.1 -n 5 -w 1000 > NUL".to_string(),
        format!(
            "move /Y \"{}\" \"{}\" > NUL",
            update_file.display(),
            executable.display()
        ),
        "echo restarting...".to_string(),
        format!("start \"\" \"{}\"", executable.display()),
        format!("DEL \"{}\"", silencer.display()),
        "DEL \"%~f0\"".to_string(),
    ];
    lines.join("\r\n")
}

/// Shell script counterpart of the batch file for Unix hosts.
#[cfg(any(unix, test))]
fn swap_shell_script(update_file: &Path, executable: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         echo \"Updating to latest version...\"\n\
         sleep 2\n\
         mv -f \"{update}\" \"{exe}\"\n\
         chmod +x \"{exe}\"\n\
         echo \"restarting...\"\n\
         \"{exe}\" &\n\
         rm -- \"$0\"\n",
        update = update_file.display(),
        exe = executable.display(),
    )
}
