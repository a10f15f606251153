use anyhow::Result;
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use super::{Endpoint, SyncContext};
use crate::config::database::parse_profile;
use crate::error::ConfigError;
use crate::shell::{CommandOutcome, LocalShell, RemoteShell};

/// The development database on this machine.
pub struct Local<'a> {
    endpoint: Endpoint,
    shell: &'a dyn LocalShell,
    remote: &'a dyn RemoteShell,
    current_path: Option<String>,
    sensitive_data_task: String,
}

impl<'a> Local<'a> {
    /// Reads the local database config and picks the `local_rails_env` section.
    pub fn new(ctx: &SyncContext<'a>) -> Result<Self> {
        let settings = ctx.settings;
        let config_path = settings.local_database_config();
        let content = ctx.local.read_to_string(&config_path).map_err(|source| ConfigError::Unreadable {
            path: config_path.display().to_string(),
            source,
        })?;
        let profile = parse_profile(
            &content,
            &settings.local_rails_env,
            &config_path.display().to_string(),
        )?;
        let endpoint = Endpoint::new(profile, &settings.local_rails_env, settings, ctx.clock)?;

        Ok(Self {
            endpoint,
            shell: ctx.local,
            remote: ctx.remote,
            current_path: settings.current_path().ok(),
            sensitive_data_task: settings.sensitive_data_task.clone(),
        })
    }

    /// Run a command line, logging it, and log an error when it fails. Never raises.
    /// The returned outcome carries the masked command line.
    fn execute(&self, command: &str) -> CommandOutcome {
        let masked = self.redact(command);
        tracing::info!("executing local: {}", masked);
        let mut outcome = self.shell.run(command);
        if !outcome.success {
            tracing::error!("Failed to execute the local command: {}", masked);
        }
        outcome.command = masked;
        outcome
    }

    pub fn dump(&self) -> Result<&Self> {
        if let Some(dir) = Path::new(self.output_file()).parent() {
            self.shell.create_dir_all(dir)?;
        }
        self.execute(&self.dump_pipeline()).into_result()?;
        Ok(self)
    }

    /// Copy the artifact into the release directory on the server; returns the remote path.
    pub fn upload(&self) -> Result<String> {
        let current_path = self.current_path.as_deref().ok_or(ConfigError::MissingSetting("deploy_to"))?;
        let remote_file = format!("{}/{}", current_path, self.output_file());
        tracing::info!(from = %self.output_file(), to = %remote_file, "uploading dump");
        self.remote.upload(Path::new(self.output_file()), &remote_file)?;
        Ok(remote_file)
    }

    /// Restore `file`. The outcome of the restore is handed back; the decompressed file is
    /// removed first when `cleanup` is set, whatever the outcome.
    pub fn load(&self, file: &str, cleanup: bool) -> Result<CommandOutcome> {
        let (unzipped, command) = self.load_pipeline(file);
        let outcome = self.execute(&command);

        if cleanup {
            tracing::info!("removing {}", unzipped);
            match self.shell.remove_file(Path::new(&unzipped)) {
                Ok(()) => {}
                Err(err) if !outcome.success && err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        } else {
            tracing::info!("leaving {} (set db_local_clean: true to remove)", unzipped);
        }

        if outcome.success {
            tracing::info!("Completed database import");
        }
        Ok(outcome)
    }

    /// Run the redaction task once per schema. Failures are logged and counted, never raised.
    pub fn remove_sensitive_data<I, S>(&self, schemas: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tracing::info!("Local database: removing sensitive data, hold tight...");
        let mut failures = 0;
        for schema in schemas {
            let task = format!("{}[{}]", self.sensitive_data_task, schema.as_ref());
            let args = vec!["exec".to_string(), "rake".to_string(), task];
            let outcome = self.shell.run_program("bundle", &args);
            if outcome.success {
                tracing::info!(schema = schema.as_ref(), "sensitive data removed");
            } else {
                failures += 1;
                tracing::error!(
                    schema = schema.as_ref(),
                    code = ?outcome.code,
                    diagnostic = %outcome.diagnostic,
                    "failed to remove sensitive data: {}",
                    outcome.command
                );
            }
        }
        failures
    }
}

impl Deref for Local<'_> {
    type Target = Endpoint;

    fn deref(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl DerefMut for Local<'_> {
    fn deref_mut(&mut self) -> &mut Endpoint {
        &mut self.endpoint
    }
}
