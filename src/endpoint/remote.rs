use anyhow::{Context, Result};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use super::{Endpoint, SyncContext};
use crate::config::database::parse_profile;
use crate::error::ExecError;
use crate::shell::RemoteShell;

/// The database of the deployed application, driven over the remote shell.
pub struct Remote<'a> {
    endpoint: Endpoint,
    shell: &'a dyn RemoteShell,
    current_path: String,
    clean_dump: bool,
}

impl<'a> Remote<'a> {
    /// Reads the database config of the current release and picks the `rails_env` section.
    pub fn new(ctx: &SyncContext<'a>) -> Result<Self> {
        let settings = ctx.settings;
        let current_path = settings.current_path()?;
        let config_path = format!("{}/{}", current_path, settings.database_config);
        let content = ctx
            .remote
            .capture(&format!("cat {}", config_path))
            .with_context(|| format!("reading remote database config {}", config_path))?;
        let profile = parse_profile(&content, &settings.rails_env, &format!("remote:{}", config_path))?;
        let endpoint = Endpoint::new(profile, &settings.rails_env, settings, ctx.clock)?;

        Ok(Self {
            endpoint,
            shell: ctx.remote,
            current_path,
            clean_dump: settings.db_remote_clean,
        })
    }

    /// Run `command` on the server; a failure carries the masked command line.
    fn execute(&self, command: &str) -> Result<(), ExecError> {
        self.shell.execute(command).map_err(|err| err.map_command(|c| self.redact(c)))
    }

    pub fn dump_file_path(&self) -> String {
        format!("{}/{}", self.current_path, self.output_file())
    }

    pub fn dump(&self) -> Result<&Self> {
        let command = format!("cd {} && {}", self.current_path, self.dump_pipeline());
        tracing::info!(command = %self.redact(&command), "dumping remote database");
        self.execute(&command)?;
        Ok(self)
    }

    /// Fetch the artifact; by default to the same relative path on this machine.
    pub fn download(&self, local_file: Option<&Path>) -> Result<()> {
        let local_file = local_file.unwrap_or_else(|| Path::new(self.output_file()));
        let remote_file = self.dump_file_path();
        tracing::info!(from = %remote_file, to = %local_file.display(), "downloading dump");
        self.shell.download(&remote_file, local_file)?;
        Ok(())
    }

    pub fn clean_dump_if_needed(&self) -> Result<()> {
        let remote_file = self.dump_file_path();
        if self.clean_dump {
            self.shell.execute(&format!("rm -f {}", remote_file))?;
        } else {
            tracing::info!(
                "leaving {} on the server (set db_remote_clean: true to remove)",
                remote_file
            );
        }
        Ok(())
    }

    /// Restore `file` (relative to the release directory); `cleanup` removes the
    /// decompressed SQL afterwards.
    pub fn load(&self, file: &str, cleanup: bool) -> Result<()> {
        let (unzipped, pipeline) = self.load_pipeline(file);
        let command = format!("cd {} && {}", self.current_path, pipeline);
        tracing::info!(command = %self.redact(&command), "restoring remote database");
        self.execute(&command)?;
        if cleanup {
            self.shell.execute(&format!("cd {} && rm {}", self.current_path, unzipped))?;
        }
        Ok(())
    }
}

impl Deref for Remote<'_> {
    type Target = Endpoint;

    fn deref(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DerefMut for Remote<'_> {
    fn deref_mut(&mut self) -> &mut Endpoint {
        &mut self.endpoint
    }
}
