use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use super::RemoteShell;
use crate::config::settings::ServerSettings;
use crate::error::ExecError;

/// Reaches the deployment target through the `ssh` and `scp` clients.
pub struct SshShell {
    destination: String,
    port: Option<u16>,
}

impl SshShell {
    pub fn new(server: &ServerSettings) -> Self {
        let destination = match &server.user {
            Some(user) => format!("{}@{}", user, server.host),
            None => server.host.clone(),
        };
        Self { destination, port: server.port }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    fn ssh(&self) -> Command {
        let mut cmd = Command::new("ssh");
        if let Some(port) = self.port {
            cmd.arg("-p").arg(port.to_string());
        }
        cmd.arg(&self.destination);
        cmd
    }

    fn scp(&self) -> Command {
        let mut cmd = Command::new("scp");
        cmd.arg("-q");
        if let Some(port) = self.port {
            cmd.arg("-P").arg(port.to_string());
        }
        cmd
    }

    fn remote_spec(&self, path: &str) -> String {
        format!("{}:{}", self.destination, path)
    }

    fn transfer(&self, mut cmd: Command, path: &str) -> Result<(), ExecError> {
        let output = cmd.stdin(Stdio::null()).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ExecError::TransferFailed { path: path.to_string(), reason: stderr_of(&output) })
        }
    }
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() { output.status.to_string() } else { stderr }
}

impl RemoteShell for SshShell {
    fn execute(&self, command: &str) -> Result<(), ExecError> {
        let status = self.ssh().arg(command).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ExecError::RemoteFailed { command: command.to_string(), status: status.to_string() })
        }
    }

    fn capture(&self, command: &str) -> Result<String, ExecError> {
        let output = self.ssh().arg(command).stdin(Stdio::null()).output()?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(ExecError::RemoteFailed { command: command.to_string(), status: stderr_of(&output) })
        }
    }

    fn upload(&self, local: &Path, remote: &str) -> Result<(), ExecError> {
        let mut cmd = self.scp();
        cmd.arg(local).arg(self.remote_spec(remote));
        self.transfer(cmd, remote)
    }

    fn download(&self, remote: &str, local: &Path) -> Result<(), ExecError> {
        if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut cmd = self.scp();
        cmd.arg(self.remote_spec(remote)).arg(local);
        self.transfer(cmd, remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_includes_user_when_configured() {
        let shell = SshShell::new(&ServerSettings { host: "app1".into(), user: Some("deploy".into()), port: None });
        assert_eq!(shell.destination(), "deploy@app1");
        assert_eq!(shell.remote_spec("/srv/db/x.gz"), "deploy@app1:/srv/db/x.gz");

        let shell = SshShell::new(&ServerSettings { host: "app1".into(), user: None, port: Some(2222) });
        assert_eq!(shell.destination(), "app1");
    }

    #[test]
    fn port_goes_to_both_clients() {
        let shell = SshShell::new(&ServerSettings { host: "app1".into(), user: None, port: Some(2222) });
        let ssh: Vec<_> = shell.ssh().get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(ssh, vec!["-p", "2222", "app1"]);
        let scp: Vec<_> = shell.scp().get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(scp, vec!["-q", "-P", "2222"]);
    }
}
