use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thrush_api::config::ServerConfig;
use thrush_api::router::build_app_router;
use thrush_api::state::AppState;
use thrush_notify::email::{EmailConfig, EmailVerificationSender};
use thrush_notify::log::LogVerificationSender;
use thrush_notify::VerificationSender;

/// How often expired verification codes are swept from memory.
const VERIFICATION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thrush_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = %config.port,
        default_group = %config.lifecycle.default_user_group,
        templates = config.lifecycle.permission_templates.len(),
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = thrush_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    thrush_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    thrush_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Verification delivery ---
    let sender: Arc<dyn VerificationSender> = match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(smtp_host = %email.smtp_host, "Delivering verification codes by email");
            Arc::new(EmailVerificationSender::new(email))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; verification codes are only logged");
            Arc::new(LogVerificationSender)
        }
    };

    // --- App state ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(pool, config, Arc::new(mockable::DefaultClock), sender);
    tracing::info!(hooks = ?state.lifecycle.hook_names(), "On-create hooks registered");

    // Sweep expired verification codes.
    let verification = Arc::clone(&state.verification);
    let purge_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(VERIFICATION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = verification.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired verification codes");
            }
        }
    });

    // --- Router ---
    let app = build_app_router(state).expect("Invalid CORS configuration");

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, cleaning up");
    purge_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
