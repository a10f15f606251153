use serde_yaml::{Mapping, Value};

use super::template;
use crate::drivers::ConnectionProfile;
use crate::error::ConfigError;

/// Parse a templated database config and return the profile for `env`.
///
/// `source_name` only feeds error messages (a path, or `remote:<path>`).
pub fn parse_profile(content: &str, env: &str, source_name: &str) -> Result<ConnectionProfile, ConfigError> {
    let rendered = template::render(content, |name| std::env::var(name).ok())?;
    profile_from_yaml(&rendered, env, source_name)
}

pub fn profile_from_yaml(yaml: &str, env: &str, source_name: &str) -> Result<ConnectionProfile, ConfigError> {
    let mut doc: Value = serde_yaml::from_str(yaml)?;
    doc.apply_merge()?;

    let section = doc
        .get(env)
        .and_then(Value::as_mapping)
        .ok_or_else(|| ConfigError::MissingEnvironment {
            env: env.to_string(),
            source_name: source_name.to_string(),
        })?;

    let adapter = scalar(section, "adapter").ok_or_else(|| ConfigError::MissingAdapter(env.to_string()))?;

    Ok(ConnectionProfile {
        adapter,
        host: scalar(section, "host"),
        port: scalar(section, "port"),
        username: scalar(section, "username").or_else(|| scalar(section, "user")),
        password: scalar(section, "password"),
        socket: scalar(section, "socket"),
        database: scalar(section, "database"),
    })
}

/// String form of a scalar entry. Nulls and empty strings count as absent.
fn scalar(map: &Mapping, key: &str) -> Option<String> {
    let value = match map.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if value.is_empty() { None } else { Some(value) }
}
