use thiserror::Error;

/// Problems detected before any command touches a database.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported database adapter '{0}'")]
    UnsupportedAdapter(String),
    #[error("no adapter configured for environment '{0}'")]
    MissingAdapter(String),
    #[error("no database name configured for environment '{0}'")]
    MissingDatabase(String),
    #[error("environment '{env}' not found in {source_name}")]
    MissingEnvironment { env: String, source_name: String },
    #[error("unknown compressor '{name}' (known: {known})")]
    UnknownCompressor { name: String, known: String },
    #[error("Only mysql or postgresql on remote and local server is supported (local: {local}, remote: {remote})")]
    AdapterMismatch { local: String, remote: String },
    #[error("template error: {0}")]
    Template(String),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("cannot read {path}: {source}")]
    Unreadable { path: String, source: std::io::Error },
    #[error("missing setting '{0}'")]
    MissingSetting(&'static str),
    #[error("pushing to the remote database is disabled (disallow_pushing is set)")]
    PushDisallowed,
}

/// Failures of commands run through an execution context.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("remote command failed ({status}): {command}")]
    RemoteFailed { command: String, status: String },
    #[error("transfer of {path} failed: {reason}")]
    TransferFailed { path: String, reason: String },
    #[error("local command failed: {command}: {diagnostic}")]
    LocalFailed { command: String, diagnostic: String },
    #[error("no server configured (set server.host in the settings file)")]
    NoServer,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// Rewrite the command text carried by a failed-command error, e.g. to mask credentials.
    pub fn map_command(self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            ExecError::RemoteFailed { command, status } => ExecError::RemoteFailed { command: f(&command), status },
            ExecError::LocalFailed { command, diagnostic } => ExecError::LocalFailed { command: f(&command), diagnostic },
            other => other,
        }
    }
}
