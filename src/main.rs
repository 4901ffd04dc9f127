use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nova_ivr::config::AppConfig;
use nova_ivr::handlers;
use nova_ivr::services::dialog::{Dialog, ENTRY_PATH};
use nova_ivr::services::messaging::twilio::TwilioSmsProvider;
use nova_ivr::services::messaging::{LogOnlyProvider, MessagingProvider};
use nova_ivr::services::store::{self, SessionStore};
use nova_ivr::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        config.session_idle_minutes > 0,
        "SESSION_IDLE_MINUTES must be positive"
    );

    let messaging: Box<dyn MessagingProvider> = if config.sms_enabled() {
        tracing::info!(from = %config.twilio_phone_number, "confirmation SMS enabled");
        Box::new(TwilioSmsProvider::from_config(&config))
    } else {
        tracing::warn!("Twilio credentials incomplete, confirmation SMS will only be logged");
        Box::new(LogOnlyProvider)
    };
    if config.twilio_auth_token.is_empty() {
        tracing::warn!("TWILIO_AUTH_TOKEN not set, webhook signatures are not verified");
    }

    let sessions = Arc::new(SessionStore::new(chrono::Duration::minutes(
        config.session_idle_minutes,
    )));
    store::spawn_sweeper(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_sweep_seconds.max(1)),
    );

    let state = Arc::new(AppState {
        dialog: Dialog::from_config(&config),
        config: config.clone(),
        sessions,
        messaging,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            ENTRY_PATH,
            get(handlers::voice::incoming_call).post(handlers::voice::incoming_call),
        )
        .route("/handle-input", post(handlers::voice::submit_turn))
        .route("/schedule-name", post(handlers::voice::submit_turn))
        .route("/schedule-time", post(handlers::voice::submit_turn))
        .route("/schedule-confirm", post(handlers::voice::submit_turn))
        .route("/api/calls", get(handlers::admin::list_calls))
        .route("/api/calls/:call_sid", get(handlers::admin::get_call))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
