#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use txprop_db::connect_postgres_with_max;
use txprop_db::tx::TxManager;

mod cli_args;
mod modules;
mod settings;

use crate::cli_args::{Cli, Command};
use crate::modules::sequencer::handle_run_command;
use crate::modules::table::{handle_list_command, handle_migrate_command, handle_reset_command};
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format_json = std::env::var("LOG_FORMAT").unwrap_or_default() == "json";
    init_logging(cli.verbose, format_json)?;

    let settings = Settings::from_env();
    let pool = connect_postgres_with_max(&settings.db_url, settings.db_pool_max)
        .await
        .context("failed to connect to database")?;
    let manager = TxManager::new(pool);

    match cli.command {
        Command::Migrate => handle_migrate_command(&manager).await?,
        Command::Run(args) => handle_run_command(args, &settings, &manager).await?,
        Command::List(args) => handle_list_command(args, &manager).await?,
        Command::Reset => handle_reset_command(&manager).await?,
    }
    Ok(())
}

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "txprop=info,txprop_db=info,sqlx=warn",
        1 => "txprop=debug,txprop_db=debug,sqlx=warn",
        _ => "txprop=debug,txprop_db=debug,sqlx=info",
    }
}

fn init_logging(verbosity: u8, format_json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbosity))?,
    };
    if format_json {
        tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_filter() {
        assert!(default_filter(0).contains("txprop_db=info"));
        assert!(default_filter(1).contains("txprop_db=debug"));
        assert!(default_filter(3).contains("sqlx=info"));
    }

    #[test]
    fn default_filters_parse() {
        for verbosity in 0..3 {
            EnvFilter::try_new(default_filter(verbosity)).expect("valid filter");
        }
    }
}
