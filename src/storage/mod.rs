use chrono::{DateTime, Local};
use std::path::Path;

/// Directory, relative to the working directory of either side, that holds dump artifacts.
pub const ARTIFACT_DIR: &str = "db";

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// The compressed dump produced by one endpoint.
///
/// The timestamp is read from the clock exactly once, when the artifact is created, so
/// the path never drifts for the lifetime of the owning endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    path: String,
}

impl OutputArtifact {
    pub fn new(database: &str, extension: &str, clock: &dyn Clock) -> Self {
        let ts = clock.now().format("%Y-%m-%d-%H%M%S");
        Self {
            path: format!("{}/{}_{}.sql.{}", ARTIFACT_DIR, database, ts, extension),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Path of `file` once its compression extension is stripped, kept in the same directory.
pub fn decompressed_path(file: &str, extension: &str) -> String {
    let path = Path::new(file);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = format!(".{}", extension);
    let stem = name.strip_suffix(&suffix).unwrap_or(&name);
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(stem).to_string_lossy().to_string(),
        _ => format!("./{}", stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TickingClock;

    #[test]
    fn path_follows_naming_pattern() {
        let clock = TickingClock::starting_at("2024-03-05T07:08:09");
        let artifact = OutputArtifact::new("shop_production", "gz", &clock);
        assert_eq!(artifact.path(), "db/shop_production_2024-03-05-070809.sql.gz");
    }

    #[test]
    fn path_is_fixed_once_created() {
        let clock = TickingClock::starting_at("2024-03-05T07:08:09");
        let artifact = OutputArtifact::new("shop", "gz", &clock);
        // the clock moves on; the artifact does not
        let later = OutputArtifact::new("shop", "gz", &clock);
        assert_eq!(later.path(), "db/shop_2024-03-05-070810.sql.gz");
        assert_eq!(artifact.path(), "db/shop_2024-03-05-070809.sql.gz");
    }

    #[test]
    fn strips_only_the_compression_extension() {
        assert_eq!(decompressed_path("db/shop_1.sql.gz", "gz"), "db/shop_1.sql");
        assert_eq!(decompressed_path("db/shop_1.sql.bz2", "gz"), "db/shop_1.sql.bz2");
        assert_eq!(decompressed_path("shop_1.sql.gz", "gz"), "./shop_1.sql");
    }
}
