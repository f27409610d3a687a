mod app;
mod chart;
mod fetch;
mod input;
mod theme;
mod views;

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};

use steamdash_core::{
    config::{self, AppConfig},
    ApiClient, CredentialStore, Route, Session,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let store = CredentialStore::new(config.credential_path());
    let credential_path = store.path().display().to_string();
    let session = Session::restore(store)?;
    info!(
        base_url = %config.api.base_url,
        credential_path = %credential_path,
        signed_in = session.is_authenticated(),
        "Starting steamdash"
    );
    let client = ApiClient::new(&config.api, session).context("failed to build HTTP client")?;
    let (theme, theme_status) = Theme::from_config(&config.theme);

    let mut app = app::App::new(client, theme, theme_status);
    app.run(Route::parse(&config.start_route)).await
}

/// Log to `logs/steamdash.log`. The terminal belongs to the UI, so there is
/// no stdout layer.
fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("steamdash.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
