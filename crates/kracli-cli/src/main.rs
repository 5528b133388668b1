//! kracli - command-line client for the kra.sk file storage service.
//!
//! Payload JSON goes to stdout; diagnostics, informational messages and
//! progress bars go to stderr, where `--quiet` suppresses them.

mod cli;
mod commands;
mod output;
mod progress;
mod prompt;

use std::io;

use anyhow::Result;
use clap::Parser;
use kracli_core::api::ApiClient;
use kracli_core::auth::{credentials, session, AuthError};
use kracli_core::config::Config;
use kracli_core::transfer::TransferError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=debug); default warn.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "kracli starting");

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(code) => code,
            Err(err) => {
                eprintln!("{:#}", err);
                exit_code_for(&err)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // A bare newline on interrupt, like the interactive tools
            // this replaces.
            println!();
            0
        }
    };
    std::process::exit(code);
}

/// Exit codes: 2 for the upload preflight failures, 1 for every other
/// error that escapes a command.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<TransferError>() {
        Some(err) => err.exit_code(),
        None => 1,
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::load(cli.config.clone())?;
    let mut client = ApiClient::new()?;

    let established = session::establish(&mut client, &mut config, |cfg| {
        match credentials::resolve(cfg) {
            Ok(creds) => Ok(creds),
            // On a terminal, fall back to asking; prompted credentials
            // are never written to the configuration file.
            Err(_) if prompt::can_prompt() => prompt::credentials(),
            Err(err) => Err(err.into()),
        }
    })
    .await;

    let session = match established {
        Ok(session) => session,
        Err(err) => {
            // A rejected login renders like any other error envelope.
            return match err.downcast::<AuthError>() {
                Ok(AuthError::Rejected(envelope)) => Ok(output::render(&envelope)),
                Err(err) => Err(err),
            };
        }
    };

    commands::dispatch(&client, &session, cli.command, cli.quiet).await
}
