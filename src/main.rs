use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod favorites;
mod images;
mod plates;
mod reminders;
mod seed;
mod state;
mod storage;

use crate::config::AppConfig;
use crate::reminders::{job, notifier::{LogNotifier, Notifier}};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "platelog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config).await.context("initialise app state")?;
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    // `platelog remind-once` runs a single reminder pass for cron-style triggers.
    if std::env::args().nth(1).as_deref() == Some("remind-once") {
        let summary = job::run_once(&app_state.db, notifier.as_ref(), OffsetDateTime::now_utc()).await?;
        tracing::info!(scanned = summary.scanned, sent = summary.sent, failed = summary.failed, "reminder pass");
        return Ok(());
    }

    if let Some(every) = app_state.config.reminder_interval() {
        tokio::spawn(job::run_forever(app_state.db.clone(), notifier, every));
    } else {
        tracing::info!("in-process reminder scheduler disabled");
    }

    app::serve(app::build_app(app_state)).await
}
