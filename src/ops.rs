use anyhow::{Result, anyhow};
use colored::*;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::settings::{SettingsOverrides, SyncSettings};
use crate::endpoint::{Endpoint, Local, Remote, SyncContext};
use crate::registry::known_compressors;
use crate::shell::local::SystemShell;
use crate::shell::ssh::SshShell;
use crate::shell::{NoServer, RemoteShell};
use crate::storage::SystemClock;
use crate::sync::{self, SyncSummary};

pub fn load_settings(path: &Path, overrides: &SettingsOverrides) -> Result<SyncSettings> {
    let mut settings = if path.exists() {
        SyncSettings::load(path)?
    } else {
        tracing::debug!("no settings file at {}; using defaults", path.display());
        SyncSettings::default()
    };
    settings.apply(overrides);
    settings.validate()?;
    Ok(settings)
}

/// Wire the real shells and clock around `settings` and hand them to `f`.
fn with_context<T>(settings: &SyncSettings, f: impl FnOnce(&SyncContext) -> Result<T>) -> Result<T> {
    let remote = SshShell::new(settings.server()?);
    tracing::debug!(destination = remote.destination(), "using ssh");
    in_context(settings, &remote, f)
}

/// For operations that stay on this machine; no server has to be configured.
fn with_local_context<T>(settings: &SyncSettings, f: impl FnOnce(&SyncContext) -> Result<T>) -> Result<T> {
    in_context(settings, &NoServer, f)
}

fn in_context<T>(
    settings: &SyncSettings,
    remote: &dyn RemoteShell,
    f: impl FnOnce(&SyncContext) -> Result<T>,
) -> Result<T> {
    let local = SystemShell;
    let clock = SystemClock;
    let ctx = SyncContext { settings, remote, local: &local, clock: &clock };
    f(&ctx)
}

pub fn do_pull(settings: &SyncSettings) -> Result<()> {
    if !confirm_replace(settings, &format!("local '{}'", settings.local_rails_env))? {
        println!("Aborted.");
        return Ok(());
    }
    let summary = run_with_spinner("Pulling database", || {
        with_context(settings, sync::remote_to_local)
    })?;
    report("Pulled", &summary);
    Ok(())
}

pub fn do_pull_schemas(settings: &SyncSettings, schemas: &[String], scrub: bool) -> Result<()> {
    if !confirm_replace(settings, &format!("schemas {} of local '{}'", schemas.join(", "), settings.local_rails_env))? {
        println!("Aborted.");
        return Ok(());
    }
    let summary = run_with_spinner("Pulling schemas", || {
        with_context(settings, |ctx| sync::selective_schemas_to_local(ctx, schemas))
    })?;
    report("Pulled", &summary);
    if scrub {
        do_scrub(settings, schemas)?;
    }
    Ok(())
}

pub fn do_push(settings: &SyncSettings) -> Result<()> {
    if settings.disallow_pushing {
        return Err(crate::error::ConfigError::PushDisallowed.into());
    }
    if !confirm_replace(settings, &format!("remote '{}'", settings.rails_env))? {
        println!("Aborted.");
        return Ok(());
    }
    let summary = run_with_spinner("Pushing database", || {
        with_context(settings, sync::local_to_remote)
    })?;
    report("Pushed", &summary);
    Ok(())
}

pub fn do_scrub(settings: &SyncSettings, schemas: &[String]) -> Result<()> {
    let failures = with_local_context(settings, |ctx| {
        let local_db = Local::new(ctx)?;
        Ok(local_db.remove_sensitive_data(schemas))
    })?;
    if failures == 0 {
        println!("{} {}", "✔".green().bold(), "Sensitive data removed".green());
    } else {
        eprintln!(
            "{} {}: {}",
            "!".yellow().bold(),
            "Warning".yellow(),
            format!("sensitive data removal failed for {} of {} schemas", failures, schemas.len())
        );
    }
    Ok(())
}

pub fn do_show(settings: &SyncSettings) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Side").add_attribute(Attribute::Bold),
            Cell::new("Environment").add_attribute(Attribute::Bold),
            Cell::new("Driver").add_attribute(Attribute::Bold),
            Cell::new("Adapter").add_attribute(Attribute::Bold),
            Cell::new("Database").add_attribute(Attribute::Bold),
            Cell::new("Host").add_attribute(Attribute::Bold),
            Cell::new("User").add_attribute(Attribute::Bold),
            Cell::new("Password").add_attribute(Attribute::Bold),
        ]);

    with_context(settings, |ctx| {
        let local_db = Local::new(ctx)?;
        table.add_row(profile_row("local", &settings.local_rails_env, &local_db));
        match Remote::new(ctx) {
            Ok(remote_db) => {
                table.add_row(profile_row("remote", &settings.rails_env, &remote_db));
                if let Err(err) = sync::check(local_db.profile(), remote_db.profile()) {
                    eprintln!("{} {}: {}", "!".yellow().bold(), "Warning".yellow(), err);
                }
            }
            Err(err) => eprintln!("{} {}: {:#}", "!".yellow().bold(), "Warning".yellow(), err),
        }
        Ok(())
    })?;

    println!("{}", table);
    Ok(())
}

fn profile_row(side: &str, env: &str, endpoint: &Endpoint) -> Vec<String> {
    let p = endpoint.profile();
    let host = match (&p.host, &p.port, &p.socket) {
        (Some(h), Some(port), _) => format!("{}:{}", h, port),
        (Some(h), None, _) => h.clone(),
        (None, _, Some(socket)) => socket.clone(),
        _ => "-".into(),
    };
    vec![
        side.to_string(),
        env.to_string(),
        endpoint.driver().name().to_string(),
        p.adapter.clone(),
        p.database.clone().unwrap_or_else(|| "-".into()),
        host,
        p.username.clone().unwrap_or_else(|| "-".into()),
        if p.password.is_some() { "******".into() } else { "-".into() },
    ]
}

pub fn do_compressors() {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Name", "Extension", "Compress", "Decompress"]);
    for c in known_compressors() {
        let sample = format!("db/app.sql.{}", c.file_extension());
        table.add_row(vec![
            c.name().to_string(),
            c.file_extension().to_string(),
            c.compress("-", &sample),
            c.decompress(&sample),
        ]);
    }
    println!("{}", table);
}

pub fn do_version() {
    println!("{} {}", "dbsync".bold(), env!("CARGO_PKG_VERSION").cyan());
}

fn report(verb: &str, summary: &SyncSummary) {
    println!(
        "{} {}",
        "✔".green().bold(),
        format!("{} '{}' into '{}'", verb, summary.source_database, summary.target_database).green()
    );
    println!("{} {}", "i".yellow().bold(), format!("artifact: {}", summary.artifact).yellow());
}

fn confirm_replace(settings: &SyncSettings, target: &str) -> Result<bool> {
    if settings.skip_data_sync_confirm {
        return Ok(true);
    }
    prompt_confirm(&format!("This will replace the {} database. Continue? [y/N] ", target))
}

fn run_with_spinner<T>(message: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let bar = create_progress_bar(message)?;
    let result = f();
    match &result {
        Ok(_) => bar.finish_with_message(format!("{} done", message)),
        Err(_) => bar.abandon_with_message(format!("{} failed", message)),
    }
    result
}

fn create_progress_bar(prefix: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .map_err(|e| anyhow!("invalid progress template: {}", e))?
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    bar.set_message(prefix.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(bar)
}

fn prompt_confirm(message: &str) -> Result<bool> {
    use std::io::{self, Write};
    print!("{} {}", "?".cyan().bold(), message.cyan());
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let ans = input.trim().to_lowercase();
    Ok(ans == "y" || ans == "yes")
}
