use anyhow::Result;
use std::path::Path;

use crate::drivers::ConnectionProfile;
use crate::endpoint::{Local, Remote, SyncContext};
use crate::error::ConfigError;

/// What a finished sync moved where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub artifact: String,
    pub source_database: String,
    pub target_database: String,
}

/// Both sides must speak the same dialect; mixed MySQL/PostgreSQL syncs are refused.
pub fn check(local: &ConnectionProfile, remote: &ConnectionProfile) -> Result<(), ConfigError> {
    if local.family().is_some() && local.family() == remote.family() {
        Ok(())
    } else {
        Err(ConfigError::AdapterMismatch {
            local: local.adapter.clone(),
            remote: remote.adapter.clone(),
        })
    }
}

/// Replace the local database with a fresh dump of the remote one.
pub fn remote_to_local(ctx: &SyncContext) -> Result<SyncSummary> {
    pull(ctx, &[])
}

/// Like [`remote_to_local`], restricted to `schemas` on both sides.
pub fn selective_schemas_to_local(ctx: &SyncContext, schemas: &[String]) -> Result<SyncSummary> {
    pull(ctx, schemas)
}

fn pull(ctx: &SyncContext, schemas: &[String]) -> Result<SyncSummary> {
    let mut local_db = Local::new(ctx)?;
    let mut remote_db = Remote::new(ctx)?;
    local_db.set_schemas(schemas);
    remote_db.set_schemas(schemas);

    check(local_db.profile(), remote_db.profile())?;

    // the remote artifact is cleaned up (or deliberately left) whether or not the transfer worked
    let transferred = remote_db.dump().and_then(|db| db.download(None));
    let cleaned = remote_db.clean_dump_if_needed();
    match (transferred, cleaned) {
        (Ok(()), Ok(())) => {}
        (Err(err), Ok(())) => return Err(err),
        (Err(err), Err(cleanup_err)) => {
            tracing::error!("cleaning up remote dump failed: {:#}", cleanup_err);
            return Err(err);
        }
        (Ok(()), Err(cleanup_err)) => return Err(cleanup_err),
    }

    local_db
        .load(remote_db.output_file(), ctx.settings.db_local_clean)?
        .into_result()?;

    Ok(SyncSummary {
        artifact: remote_db.output_file().to_string(),
        source_database: database_name(remote_db.profile()),
        target_database: database_name(local_db.profile()),
    })
}

/// Replace the remote database with a dump of the local one.
pub fn local_to_remote(ctx: &SyncContext) -> Result<SyncSummary> {
    if ctx.settings.disallow_pushing {
        return Err(ConfigError::PushDisallowed.into());
    }

    let local_db = Local::new(ctx)?;
    let remote_db = Remote::new(ctx)?;

    check(local_db.profile(), remote_db.profile())?;

    local_db.dump()?.upload()?;
    remote_db.load(local_db.output_file(), ctx.settings.db_local_clean)?;
    if ctx.settings.db_local_clean {
        tracing::info!("removing {}", local_db.output_file());
        ctx.local.remove_file(Path::new(local_db.output_file()))?;
    }

    Ok(SyncSummary {
        artifact: local_db.output_file().to_string(),
        source_database: database_name(local_db.profile()),
        target_database: database_name(remote_db.profile()),
    })
}

fn database_name(profile: &ConnectionProfile) -> String {
    profile.database.clone().unwrap_or_default()
}
