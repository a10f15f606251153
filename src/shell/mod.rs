use std::io;
use std::path::Path;

use crate::error::ExecError;

pub mod local;
pub mod ssh;

/// Runs commands on the deployment target. Failures are raised.
pub trait RemoteShell {
    fn execute(&self, command: &str) -> Result<(), ExecError>;

    /// Run `command` and return its stdout.
    fn capture(&self, command: &str) -> Result<String, ExecError>;

    fn upload(&self, local: &Path, remote: &str) -> Result<(), ExecError>;

    fn download(&self, remote: &str, local: &Path) -> Result<(), ExecError>;
}

/// Runs commands on this machine. Command failures come back as an outcome, not an error;
/// the caller decides whether a failed outcome stops the flow.
pub trait LocalShell {
    /// Run a shell command line.
    fn run(&self, command: &str) -> CommandOutcome;

    /// Run a program with arguments, bypassing the shell.
    fn run_program(&self, program: &str, args: &[String]) -> CommandOutcome;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Remote shell for runs without a configured server. Every call fails.
pub struct NoServer;

impl RemoteShell for NoServer {
    fn execute(&self, _command: &str) -> Result<(), ExecError> {
        Err(ExecError::NoServer)
    }

    fn capture(&self, _command: &str) -> Result<String, ExecError> {
        Err(ExecError::NoServer)
    }

    fn upload(&self, _local: &Path, _remote: &str) -> Result<(), ExecError> {
        Err(ExecError::NoServer)
    }

    fn download(&self, _remote: &str, _local: &Path) -> Result<(), ExecError> {
        Err(ExecError::NoServer)
    }
}

/// Result of one local command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub success: bool,
    pub code: Option<i32>,
    /// Captured output or the reason the command could not start.
    pub diagnostic: String,
}

impl CommandOutcome {
    pub fn ok(command: impl Into<String>) -> Self {
        Self { command: command.into(), success: true, code: Some(0), diagnostic: String::new() }
    }

    pub fn failed(command: impl Into<String>, code: Option<i32>, diagnostic: impl Into<String>) -> Self {
        Self { command: command.into(), success: false, code, diagnostic: diagnostic.into() }
    }

    pub fn into_result(self) -> Result<(), ExecError> {
        if self.success {
            return Ok(());
        }
        let diagnostic = if self.diagnostic.is_empty() {
            match self.code {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            }
        } else {
            self.diagnostic
        };
        Err(ExecError::LocalFailed { command: self.command, diagnostic })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_becomes_error_with_status() {
        let err = CommandOutcome::failed("gzip -d -f db/x.sql.gz", Some(1), "")
            .into_result()
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "local command failed: gzip -d -f db/x.sql.gz: exit status 1");
    }

    #[test]
    fn successful_outcome_is_ok() {
        assert!(CommandOutcome::ok("true").into_result().is_ok());
    }
}
