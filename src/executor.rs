//! Fire-and-forget execution of bound shell commands.
//!
//! Each hotkey firing runs its binding's `action` string through the user
//! shell with no captured output and no exit-code handling. The capability
//! is a trait so tests can substitute a recording stub instead of spawning
//! real processes.

use std::process::{Command, Stdio};

use tracing::{error, info};

/// Side-effecting capability that runs a shell command line.
pub trait CommandExecutor: Send + Sync {
    fn run(&self, command: &str);
}

/// Executes commands via `<shell> -c <command>` (`cmd /C` on Windows).
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) {
        let mut cmd = Command::new(&self.shell);
        #[cfg(windows)]
        cmd.arg("/C").arg(command);
        #[cfg(not(windows))]
        cmd.arg("-c").arg(command);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // On Unix, spawn in a new process group so the command detaches from
        // our terminal and signal handling.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        match cmd.spawn() {
            Ok(mut child) => {
                info!(pid = child.id(), command = %command, "command spawned");
                // Reap in the background so fired commands never linger as
                // zombies. The exit status is ignored.
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => {
                error!(shell = %self.shell, command = %command, error = %e, "command spawn failed");
            }
        }
    }
}

/// Test stub that records commands instead of spawning processes.
#[cfg(test)]
pub struct RecordingExecutor {
    commands: std::sync::Arc<parking_lot::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingExecutor {
    pub fn new() -> (Self, std::sync::Arc<parking_lot::Mutex<Vec<String>>>) {
        let commands = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        (
            Self {
                commands: commands.clone(),
            },
            commands,
        )
    }
}

#[cfg(test)]
impl CommandExecutor for RecordingExecutor {
    fn run(&self, command: &str) {
        self.commands.lock().push(command.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_executor_captures_commands_in_order() {
        let (executor, commands) = RecordingExecutor::new();
        executor.run("notepad.exe");
        executor.run("ls -la");
        assert_eq!(*commands.lock(), vec!["notepad.exe", "ls -la"]);
    }
}
