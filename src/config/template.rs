use crate::error::ConfigError;

/// Expand the ERB-style tags found in Rails database configs.
///
/// Only environment lookups are understood: `ENV['X']`, `ENV['X'] || 'default'`,
/// `ENV.fetch('X')`, `ENV.fetch('X', 'default')` and `ENV.fetch('X') { default }`, where a
/// default is a quoted string, a number, a boolean or `nil`. `<%# %>` comments are dropped.
/// Anything else is rejected rather than left in the YAML.
pub fn render<F>(source: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("<%") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("%>")
            .ok_or_else(|| ConfigError::Template("unterminated '<%' tag".into()))?;
        let tag = &after[..end];
        rest = &after[end + 2..];

        if tag.starts_with('#') {
            continue;
        }
        let expr = tag
            .strip_prefix('=')
            .ok_or_else(|| ConfigError::Template(format!("unsupported tag '<%{}%>'", tag)))?
            .trim();
        out.push_str(&eval(expr, &lookup)?);
    }
    out.push_str(rest);
    Ok(out)
}

fn eval<F>(expr: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // ENV['X'] || 'fallback'
    if let Some((lhs, fallback)) = expr.split_once("||").filter(|(lhs, _)| lhs.starts_with("ENV[")) {
        let inner = index_arg(lhs.trim()).ok_or_else(|| unsupported(expr))?;
        let name = unquote(inner)?;
        return match lookup(&name) {
            Some(value) => Ok(value),
            None => literal(fallback.trim()),
        };
    }

    if let Some(inner) = index_arg(expr) {
        let name = unquote(inner)?;
        return Ok(lookup(&name).unwrap_or_default());
    }

    if let Some(rest) = expr.strip_prefix("ENV.fetch(") {
        let close = rest.find(')').ok_or_else(|| unsupported(expr))?;
        let (args, block) = (&rest[..close], rest[close + 1..].trim());
        let mut args = args.splitn(2, ',');
        let name = unquote(args.next().unwrap_or_default().trim())?;
        let mut default = args.next().map(|d| literal(d.trim())).transpose()?;
        if !block.is_empty() {
            let body = block
                .strip_prefix('{')
                .and_then(|b| b.strip_suffix('}'))
                .ok_or_else(|| unsupported(expr))?;
            default = Some(literal(body.trim())?);
        }
        return match (lookup(&name), default) {
            (Some(value), _) => Ok(value),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(ConfigError::Template(format!("environment variable '{}' is not set", name))),
        };
    }

    Err(unsupported(expr))
}

fn unsupported(expr: &str) -> ConfigError {
    ConfigError::Template(format!("unsupported expression '{}'", expr))
}

fn index_arg(expr: &str) -> Option<&str> {
    expr.strip_prefix("ENV[").and_then(|s| s.strip_suffix(']')).map(str::trim)
}

/// A quoted string, or a bare number, boolean or `nil` printed the way ERB would.
fn literal(s: &str) -> Result<String, ConfigError> {
    if let Ok(value) = unquote(s) {
        return Ok(value);
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    let numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '_');
    match s {
        "nil" => Ok(String::new()),
        "true" | "false" => Ok(s.to_string()),
        _ if numeric => Ok(s.replace('_', "")),
        _ => Err(ConfigError::Template(format!("unsupported default '{}'", s))),
    }
}

fn unquote(s: &str) -> Result<String, ConfigError> {
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return Ok(inner.to_string());
        }
    }
    Err(ConfigError::Template(format!("expected a quoted string, got '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "DB_PASSWORD" => Some("s3cret".into()),
            "DB_HOST" => Some("db.internal".into()),
            _ => None,
        }
    }

    #[test]
    fn passes_plain_yaml_through() {
        let src = "production:\n  adapter: mysql2\n";
        assert_eq!(render(src, env).unwrap(), src);
    }

    #[test]
    fn expands_env_lookups() {
        let src = "password: <%= ENV['DB_PASSWORD'] %>\nhost: <%= ENV[\"DB_HOST\"] %>\nuser: <%= ENV['NOPE'] %>\n";
        assert_eq!(render(src, env).unwrap(), "password: s3cret\nhost: db.internal\nuser: \n");
    }

    #[test]
    fn fetch_uses_default_when_unset() {
        let src = "port: <%= ENV.fetch('DB_PORT', '5433') %> host: <%= ENV.fetch(\"DB_HOST\") %>";
        assert_eq!(render(src, env).unwrap(), "port: 5433 host: db.internal");
    }

    #[test]
    fn fetch_without_default_requires_the_variable() {
        assert!(matches!(render("<%= ENV.fetch('DB_PORT') %>", env), Err(ConfigError::Template(_))));
    }

    #[test]
    fn drops_comments_and_rejects_code() {
        assert_eq!(render("a<%# note %>b", env).unwrap(), "ab");
        assert!(render("<% if true %>", env).is_err());
        assert!(render("<%= 1 + 1 %>", env).is_err());
        assert!(render("<%= ENV['X'] ", env).is_err());
        assert!(render("<%= ENV.fetch('X') { compute } %>", env).is_err());
    }

    #[test]
    fn fetch_block_supplies_the_default() {
        let src = "pool: <%= ENV.fetch(\"RAILS_MAX_THREADS\") { 5 } %>\nhost: <%= ENV.fetch('DB_HOST') { 'localhost' } %>";
        assert_eq!(render(src, env).unwrap(), "pool: 5\nhost: db.internal");
    }

    #[test]
    fn or_falls_back_when_unset() {
        let src = "host: <%= ENV['NOPE'] || 'localhost' %> pw: <%= ENV[\"DB_PASSWORD\"] || \"x\" %> port: <%= ENV['NOPE'] || 5_432 %>";
        assert_eq!(render(src, env).unwrap(), "host: localhost pw: s3cret port: 5432");
    }

    #[test]
    fn stock_rails_config_renders() {
        let src = "default: &default\n  adapter: postgresql\n  encoding: unicode\n  pool: <%= ENV.fetch(\"RAILS_MAX_THREADS\") { 5 } %>\n";
        assert_eq!(
            render(src, env).unwrap(),
            "default: &default\n  adapter: postgresql\n  encoding: unicode\n  pool: 5\n"
        );
    }
}
