use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_backend::{
    config::Config,
    db::connection::create_pool,
    repositories::{CredentialRepository, InMemoryCredentialRepository, SqlCredentialRepository},
    routes,
    services::{AuditLogService, AuditLogServiceTrait, InMemorySessionStore, SessionStore},
    state::AppState,
};

fn redact_database_url(url: &str) -> String {
    match url.split_once('@') {
        Some((_, host)) => format!("<redacted>@{}", host),
        None => url.to_string(),
    }
}

async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn CredentialRepository>> {
    if config.uses_memory_store() {
        return Ok(Arc::new(InMemoryCredentialRepository::new()));
    }
    let pool = create_pool(&config.database_url).await?;
    Ok(Arc::new(SqlCredentialRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_backend=debug,audit=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %redact_database_url(&config.database_url),
        bind_addr = %config.bind_addr,
        session_idle_timeout_minutes = ?config.session_idle_timeout_minutes,
        cookie_secure = config.cookie_secure,
        cookie_same_site = ?config.cookie_same_site,
        "Loaded configuration from environment/.env"
    );

    // Bootstrap the credential store once, before accepting requests
    let repository = build_repository(&config).await?;
    repository.ensure_seeded().await?;

    let sessions: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(config.session_idle_timeout()));
    let audit: Arc<dyn AuditLogServiceTrait> = Arc::new(AuditLogService::new());
    let addr = config.bind_addr;
    let state = AppState::new(config, repository, sessions, audit);
    let app = routes::app(state);

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
