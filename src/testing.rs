//! Recording stand-ins for the execution contexts and the clock.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ExecError;
use crate::shell::{CommandOutcome, LocalShell, RemoteShell};
use crate::storage::Clock;

/// Advances one second every time it is read.
pub struct TickingClock {
    next: Cell<DateTime<Local>>,
}

impl TickingClock {
    pub fn starting_at(ts: &str) -> Self {
        let naive = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S").unwrap();
        Self { next: Cell::new(Local.from_local_datetime(&naive).earliest().unwrap()) }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Local> {
        let now = self.next.get();
        self.next.set(now + Duration::seconds(1));
        now
    }
}

#[derive(Default)]
pub struct FakeRemote {
    pub events: RefCell<Vec<String>>,
    pub files: HashMap<String, String>,
    pub fail_download: bool,
    pub fail_execute_containing: Option<String>,
}

impl FakeRemote {
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl RemoteShell for FakeRemote {
    fn execute(&self, command: &str) -> Result<(), ExecError> {
        self.events.borrow_mut().push(format!("execute: {}", command));
        match &self.fail_execute_containing {
            Some(needle) if command.contains(needle.as_str()) => Err(ExecError::RemoteFailed {
                command: command.to_string(),
                status: "exit status: 1".into(),
            }),
            _ => Ok(()),
        }
    }

    fn capture(&self, command: &str) -> Result<String, ExecError> {
        self.events.borrow_mut().push(format!("capture: {}", command));
        let path = command.strip_prefix("cat ").unwrap_or(command);
        self.files.get(path).cloned().ok_or_else(|| ExecError::RemoteFailed {
            command: command.to_string(),
            status: "No such file or directory".into(),
        })
    }

    fn upload(&self, local: &Path, remote: &str) -> Result<(), ExecError> {
        self.events.borrow_mut().push(format!("upload: {} -> {}", local.display(), remote));
        Ok(())
    }

    fn download(&self, remote: &str, local: &Path) -> Result<(), ExecError> {
        self.events.borrow_mut().push(format!("download: {} -> {}", remote, local.display()));
        if self.fail_download {
            return Err(ExecError::TransferFailed { path: remote.to_string(), reason: "connection reset".into() });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLocal {
    pub events: RefCell<Vec<String>>,
    pub files: HashMap<PathBuf, String>,
    pub fail_containing: Vec<String>,
}

impl FakeLocal {
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_containing.push(needle.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn outcome(&self, line: String) -> CommandOutcome {
        self.events.borrow_mut().push(format!("run: {}", line));
        if self.fail_containing.iter().any(|n| line.contains(n.as_str())) {
            CommandOutcome::failed(line, Some(1), "")
        } else {
            CommandOutcome::ok(line)
        }
    }
}

impl LocalShell for FakeLocal {
    fn run(&self, command: &str) -> CommandOutcome {
        self.outcome(command.to_string())
    }

    fn run_program(&self, program: &str, args: &[String]) -> CommandOutcome {
        self.outcome(format!("{} {}", program, args.join(" ")))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.events.borrow_mut().push(format!("remove: {}", path.display()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.events.borrow_mut().push(format!("mkdir: {}", path.display()));
        Ok(())
    }
}
