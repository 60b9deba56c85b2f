//! Remote session launching
//!
//! The menu only needs one blocking call: run a session against a target
//! as a user and report how it ended.

use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Failure to start a session at all
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Starts a remote session and blocks until it ends
pub trait SessionLauncher {
    /// Run a session to `target` as `username` and return its exit code
    fn launch(&self, target: &str, username: &str) -> Result<i32, LaunchError>;
}

/// Runs `<command> [args...] -l <username> <target>` on the current terminal
#[derive(Debug, Clone)]
pub struct SshLauncher {
    command: String,
    args: Vec<String>,
}

impl Default for SshLauncher {
    fn default() -> Self {
        Self::new("ssh", Vec::new())
    }
}

impl SshLauncher {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Full argument list for one session
    pub fn arguments(&self, target: &str, username: &str) -> Vec<String> {
        let mut arguments = self.args.clone();
        arguments.extend(["-l".to_string(), username.to_string(), target.to_string()]);
        arguments
    }
}

impl SessionLauncher for SshLauncher {
    fn launch(&self, target: &str, username: &str) -> Result<i32, LaunchError> {
        let arguments = self.arguments(target, username);
        debug!(command = %self.command, ?arguments, "Spawning session");

        let status = Command::new(&self.command)
            .args(&arguments)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // No code means the session was killed by a signal
        Ok(status.code().unwrap_or(-1))
    }
}
