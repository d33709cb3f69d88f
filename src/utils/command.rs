//! Shell command execution utilities.

use std::io;
use std::process::{Command, ExitStatus};

/// Build a `Command` that hands `cmd` to the host shell.
///
/// On Windows: PowerShell if available (determined by PSModulePath), otherwise cmd.exe.
/// On Unix-like systems: `/bin/sh -c`.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let prefer_ps = !std::env::var("PSModulePath").unwrap_or_default().is_empty();
        if prefer_ps {
            let mut c = Command::new("powershell.exe");
            c.args(["-NoLogo", "-NoProfile", "-Command", cmd]);
            c
        } else {
            let mut c = Command::new("cmd.exe");
            c.args(["/c", cmd]);
            c
        }
    } else {
        let mut c = Command::new("/bin/sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run `cmd` through the host shell and block until it exits.
///
/// The child inherits stdin/stdout/stderr.
pub fn run_command(cmd: &str) -> io::Result<ExitStatus> {
    shell_command(cmd).status()
}
