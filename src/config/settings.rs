use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::registry::{resolve_compressor, Compressor};

pub const DEFAULT_SETTINGS_PATH: &str = "config/dbsync.yml";

/// SSH destination of the deployment target.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Deploy settings, the values the sync steps look up by key.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SyncSettings {
    pub server: Option<ServerSettings>,
    pub deploy_to: Option<String>,
    /// Overrides `<deploy_to>/current`.
    pub current_path: Option<String>,
    pub rails_env: String,
    pub local_rails_env: String,
    pub database_config: String,
    pub compressor: String,
    pub db_ignore_tables: Vec<String>,
    pub db_ignore_data_tables: Vec<String>,
    pub db_remote_clean: bool,
    pub db_local_clean: bool,
    pub skip_data_sync_confirm: bool,
    pub disallow_pushing: bool,
    pub sensitive_data_task: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            server: None,
            deploy_to: None,
            current_path: None,
            rails_env: "production".into(),
            local_rails_env: "development".into(),
            database_config: "config/database.yml".into(),
            compressor: "gzip".into(),
            db_ignore_tables: Vec::new(),
            db_ignore_data_tables: Vec::new(),
            db_remote_clean: false,
            db_local_clean: false,
            skip_data_sync_confirm: false,
            disallow_pushing: false,
            sensitive_data_task: "replace_emails_in_database".into(),
        }
    }
}

/// Command-line values that win over the settings file.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub rails_env: Option<String>,
    pub local_rails_env: Option<String>,
    pub compressor: Option<String>,
    pub remote_clean: bool,
    pub local_clean: bool,
    pub skip_confirm: bool,
}

impl SyncSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: SyncSettings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: &SettingsOverrides) {
        if let Some(env) = &overrides.rails_env {
            self.rails_env = env.clone();
        }
        if let Some(env) = &overrides.local_rails_env {
            self.local_rails_env = env.clone();
        }
        if let Some(name) = &overrides.compressor {
            self.compressor = name.clone();
        }
        self.db_remote_clean |= overrides.remote_clean;
        self.db_local_clean |= overrides.local_clean;
        self.skip_data_sync_confirm |= overrides.skip_confirm;
    }

    /// Reject settings that could only fail later, after something was dumped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compressor()?;
        Ok(())
    }

    pub fn compressor(&self) -> Result<&'static dyn Compressor, ConfigError> {
        resolve_compressor(&self.compressor)
    }

    /// Directory of the deployed release on the remote host.
    pub fn current_path(&self) -> Result<String, ConfigError> {
        if let Some(path) = &self.current_path {
            return Ok(path.trim_end_matches('/').to_string());
        }
        self.deploy_to
            .as_ref()
            .map(|d| format!("{}/current", d.trim_end_matches('/')))
            .ok_or(ConfigError::MissingSetting("deploy_to"))
    }

    pub fn server(&self) -> Result<&ServerSettings, ConfigError> {
        self.server.as_ref().ok_or(ConfigError::MissingSetting("server"))
    }

    pub fn local_database_config(&self) -> PathBuf {
        PathBuf::from(&self.database_config)
    }
}
