use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::settings::{SettingsOverrides, DEFAULT_SETTINGS_PATH};

/// dbsync: copy a database between a deployed app and your machine
#[derive(Parser, Debug)]
#[command(name = "dbsync", version, about = "Dump, transfer and restore databases between a deployment target and a local environment.", long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Deploy settings file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_SETTINGS_PATH, global = true)]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Log debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct OverrideArgs {
    /// Remote environment name (rails_env)
    #[arg(long = "env", value_name = "name", global = true)]
    pub env: Option<String>,

    /// Local environment name (local_rails_env)
    #[arg(long = "local-env", value_name = "name", global = true)]
    pub local_env: Option<String>,

    /// Compressor used for dump artifacts
    #[arg(long, value_name = "name", global = true)]
    pub compressor: Option<String>,

    /// Remove the dump from the server after downloading it
    #[arg(long = "remote-clean", global = true)]
    pub remote_clean: bool,

    /// Remove local dump files once they are restored
    #[arg(long = "local-clean", global = true)]
    pub local_clean: bool,

    /// Do not ask before replacing a database
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            rails_env: self.env.clone(),
            local_rails_env: self.local_env.clone(),
            compressor: self.compressor.clone(),
            remote_clean: self.remote_clean,
            local_clean: self.local_clean,
            skip_confirm: self.yes,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the local database with the remote one
    Pull,

    /// Replace the remote database with the local one
    Push,

    /// Pull only the given PostgreSQL schemas
    PullSchemas {
        /// Schemas to dump and restore
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Remove sensitive data from the pulled schemas afterwards
        #[arg(long)]
        scrub: bool,
    },

    /// Remove sensitive data from local schemas
    Scrub {
        #[arg(required = true)]
        schemas: Vec<String>,
    },

    /// Show the resolved local and remote connection profiles
    Show,

    /// List available compressors
    Compressors,

    /// Print CLI version
    Version,
}
