// src/exec/command.rs

//! Shell command construction.

use std::process::Stdio;

use tokio::process::Command;

/// Build the OS command that runs `command` through a shell.
///
/// With `shell = None` the platform shell is used (`sh -c` on Unix,
/// `cmd /C` on Windows). stdin is detached and both output streams are piped.
/// On Unix the child becomes the leader of its own process group so a kill
/// reaches everything the shell started.
pub fn shell_command(command: &str, shell: Option<&str>) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new(shell.unwrap_or("cmd"));
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new(shell.unwrap_or("sh"));
        c.arg("-c").arg(command);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}
