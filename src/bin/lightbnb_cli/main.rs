mod args;

use std::process::ExitCode;

use clap::Parser;
use lightbnb_store::{LightBnbStore, StoreError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};

fn print_json<T: Serialize>(value: &T) -> Result<(), StoreError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::RowMapping(format!("failed to render result: {e}")))?;
    println!("{rendered}");
    Ok(())
}

async fn run(store: &LightBnbStore, command: Command) -> Result<(), StoreError> {
    match command {
        Command::InitSchema => {
            store.install_schema().await?;
            tracing::info!("schema installed");
            Ok(())
        }
        Command::UserByEmail { email } => print_json(&store.get_user_with_email(&email).await?),
        Command::UserById { id } => print_json(&store.get_user_with_id(id).await?),
        Command::Reservations { guest_id, limit } => {
            print_json(&store.get_all_reservations(guest_id, Some(limit)).await?)
        }
        Command::Search(search) => {
            print_json(&store.get_all_properties(&search.options(), Some(search.limit)).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.store, "starting");

    let store = match LightBnbStore::connect(&args.store) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "invalid store configuration");
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&store, args.command).await;
    store.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
