

use super::{mysql::MySqlDriver, postgres::PostgresDriver, BackendDriver, ConnectionProfile};
use crate::error::ConfigError;

/// Pick the driver for a profile once, up front. Profiles with no database name or an
/// adapter outside both families are rejected here, before any command is built.
pub fn select_driver(profile: ConnectionProfile, env: &str) -> Result<Box<dyn BackendDriver>, ConfigError> {
    if profile.adapter.is_empty() {
        return Err(ConfigError::MissingAdapter(env.to_string()));
    }
    if !profile.is_mysql_family() && !profile.is_postgres_family() {
        return Err(ConfigError::UnsupportedAdapter(profile.adapter));
    }
    let database = profile
        .database
        .clone()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ConfigError::MissingDatabase(env.to_string()))?;

    if profile.is_mysql_family() {
        Ok(Box::new(MySqlDriver::new(profile, database)))
    } else {
        Ok(Box::new(PostgresDriver::new(profile, database)))
    }
}
