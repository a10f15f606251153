use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use super::{CommandOutcome, LocalShell};

/// Executes on the current machine through `sh -c`, streaming output to the terminal.
pub struct SystemShell;

impl SystemShell {
    fn outcome(command: String, mut cmd: Command) -> CommandOutcome {
        match cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit()).status() {
            Ok(status) if status.success() => CommandOutcome::ok(command),
            Ok(status) => CommandOutcome::failed(command, status.code(), ""),
            Err(err) => CommandOutcome::failed(command, None, format!("failed to start: {}", err)),
        }
    }
}

impl LocalShell for SystemShell {
    fn run(&self, command: &str) -> CommandOutcome {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        Self::outcome(command.to_string(), cmd)
    }

    fn run_program(&self, program: &str, args: &[String]) -> CommandOutcome {
        let mut cmd = Command::new(program);
        cmd.args(args);
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self::outcome(line, cmd)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
