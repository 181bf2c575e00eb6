//! WorkPulse CLI Entry Point
//!
//! Uses `anyhow` for startup errors, but command errors are
//! `kernel::error::AppError` and are reported with their suggested action.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use platform::config::ClientConfig;
use session::SessionEvent;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::commands::App;

/// Exit code when the session ended and the user must sign in again
const EXIT_LOGIN_REQUIRED: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "workpulse=info,session=info,workforce=info,platform=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    tracing::debug!(api = %config.api_base_url, state_dir = %config.state_dir.display(), "Configuration loaded");

    let app = App::connect(&config)?;
    let state = app.session.start().await;
    tracing::debug!(status = %state.status, "Session started");

    // Only a session lost while the command runs asks for a new login;
    // a failed startup refresh surfaces as "Not signed in"
    let mut events = app.session.events();

    let result = app.run(cli.command).await;
    let login_required = saw_login_required(&mut events);

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            if login_required {
                eprintln!("Session expired. Run `workpulse login` to sign in again.");
                return Ok(ExitCode::from(EXIT_LOGIN_REQUIRED));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {}", e.message());
            if let Some(action) = e.action() {
                eprintln!("hint: {action}");
            }
            if login_required {
                eprintln!("Session expired. Run `workpulse login` to sign in again.");
                return Ok(ExitCode::from(EXIT_LOGIN_REQUIRED));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Drain pending session events, reporting whether a re-login is needed
fn saw_login_required(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut required = false;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::LoginRequired) => required = true,
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => return required,
        }
    }
}
