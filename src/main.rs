mod cli;
mod config;
mod drivers;
mod endpoint;
mod error;
mod ops;
mod registry;
mod shell;
mod storage;
mod sync;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dbsync=debug" } else { "dbsync=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            ops::do_version();
            return Ok(());
        }
        Commands::Compressors => {
            ops::do_compressors();
            return Ok(());
        }
        _ => {}
    }

    let settings = ops::load_settings(&cli.config, &cli.overrides.to_overrides())?;

    match cli.command {
        Commands::Pull => {
            ops::do_pull(&settings)?;
        }
        Commands::Push => {
            ops::do_push(&settings)?;
        }
        Commands::PullSchemas { schemas, scrub } => {
            ops::do_pull_schemas(&settings, &schemas, scrub)?;
        }
        Commands::Scrub { schemas } => {
            ops::do_scrub(&settings, &schemas)?;
        }
        Commands::Show => {
            ops::do_show(&settings)?;
        }
        Commands::Version | Commands::Compressors => {}
    }

    Ok(())
}
