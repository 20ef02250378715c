//! Command execution utilities for batch backend tools.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    #[error("Command {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Decoded stdout
    pub stdout: String,
    /// Decoded stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, the way a terminal would show them.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Execute a command and capture both output streams, whatever the exit status.
pub async fn capture_command(cmd: &mut Command, name: &str) -> Result<CommandOutput, CommandError> {
    tracing::debug!(command = name, "running {:?}", cmd.as_std());

    let output = cmd.output().await.map_err(|e| CommandError::Execution {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Execute a command and return stdout, treating non-zero exit as OK.
///
/// Some commands (like bjobs on a purged job) return non-zero but still
/// print a usable body.
pub async fn run_command_allow_failure(
    cmd: &mut Command,
    name: &str,
) -> Result<String, CommandError> {
    Ok(capture_command(cmd, name).await?.stdout)
}

/// Execute a command with stdout discarded, failing on non-zero exit.
pub async fn run_command_quiet(cmd: &mut Command, name: &str) -> Result<(), CommandError> {
    tracing::debug!(command = name, "running {:?}", cmd.as_std());

    let output = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CommandError::Execution {
            command: name.to_string(),
            error: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            command: name.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(())
}
