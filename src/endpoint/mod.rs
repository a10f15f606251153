use crate::config::settings::SyncSettings;
use crate::drivers::selector::select_driver;
use crate::drivers::{BackendDriver, ConnectionProfile, DumpOptions};
use crate::error::ConfigError;
use crate::registry::Compressor;
use crate::shell::{LocalShell, RemoteShell};
use crate::storage::{decompressed_path, Clock, OutputArtifact};

pub mod local;
pub mod remote;

pub use local::Local;
pub use remote::Remote;

/// Everything one sync operation runs against.
pub struct SyncContext<'a> {
    pub settings: &'a SyncSettings,
    pub remote: &'a dyn RemoteShell,
    pub local: &'a dyn LocalShell,
    pub clock: &'a dyn Clock,
}

/// The part of an endpoint that does not depend on where it runs: the driver for its
/// profile, what to dump, and the artifact it produces.
pub struct Endpoint {
    driver: Box<dyn BackendDriver>,
    options: DumpOptions,
    compressor: &'static dyn Compressor,
    artifact: OutputArtifact,
}

impl Endpoint {
    pub fn new(
        profile: ConnectionProfile,
        env: &str,
        settings: &SyncSettings,
        clock: &dyn Clock,
    ) -> Result<Self, ConfigError> {
        let compressor = settings.compressor()?;
        let driver = select_driver(profile, env)?;
        let database = driver.profile().database.clone().unwrap_or_default();
        let artifact = OutputArtifact::new(&database, compressor.file_extension(), clock);

        Ok(Self {
            driver,
            options: DumpOptions {
                exclude_tables: settings.db_ignore_tables.clone(),
                exclude_data_tables: settings.db_ignore_data_tables.clone(),
                schemas: Vec::new(),
            },
            compressor,
            artifact,
        })
    }

    pub fn profile(&self) -> &ConnectionProfile {
        self.driver.profile()
    }

    pub fn driver(&self) -> &dyn BackendDriver {
        self.driver.as_ref()
    }

    pub fn set_schemas(&mut self, schemas: &[String]) {
        self.options.schemas = schemas.to_vec();
    }

    pub fn output_file(&self) -> &str {
        self.artifact.path()
    }

    /// `<dump> | <compress into the artifact>`
    pub fn dump_pipeline(&self) -> String {
        format!(
            "{} | {}",
            self.driver.dump_command(&self.options),
            self.compressor.compress("-", self.artifact.path())
        )
    }

    /// Decompressed path of `file` and the command that unpacks and restores it.
    pub fn load_pipeline(&self, file: &str) -> (String, String) {
        let unzipped = decompressed_path(file, self.compressor.file_extension());
        let command = format!(
            "{} && {}",
            self.compressor.decompress(file),
            self.driver.restore_command(&unzipped, &self.options)
        );
        (unzipped, command)
    }

    pub fn redact(&self, command: &str) -> String {
        self.profile().redact(command)
    }
}
