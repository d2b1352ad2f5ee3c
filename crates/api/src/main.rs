use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use capstone_api::config::ServerConfig;
use capstone_api::router::build_app_router;
use capstone_api::state::AppState;
use capstone_api::{background, bootstrap};
use capstone_events::{EventBus, SharedPoller};
use capstone_ocr::OcrClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "capstone_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = capstone_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    capstone_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    capstone_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Admin bootstrap ---
    if let Some(admin) = &config.admin_bootstrap {
        if let Err(e) = bootstrap::ensure_admin(&pool, admin).await {
            tracing::error!(error = %e, "Admin bootstrap failed");
        }
    }

    // --- OCR client ---
    let ocr = OcrClient::new(
        &config.ocr_service_url,
        Duration::from_secs(config.ocr_timeout_secs),
    )
    .expect("Failed to build OCR client");
    tracing::info!(url = %config.ocr_service_url, "OCR client configured");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Analytics refresh ---
    let analytics = Arc::new(SharedPoller::new(
        "analytics",
        Duration::from_secs(config.analytics_refresh_secs),
    ));
    let cancel = CancellationToken::new();
    let analytics_handle = tokio::spawn(background::analytics::run(
        pool.clone(),
        Arc::clone(&analytics),
        event_bus.subscribe(),
        cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        ocr,
        analytics,
        shutdown: cancel.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(timeout, analytics_handle).await.is_err() {
        tracing::warn!("Analytics refresh did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM, then cancel `cancel` so the analytics
/// refresh and open event streams end.
async fn shutdown_signal(cancel: CancellationToken) {
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

    cancel.cancel();
}
