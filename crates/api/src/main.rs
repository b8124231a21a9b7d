use std::net::SocketAddr;
use std::sync::Arc;

use aset_db::store::{PgTableStore, TableStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aset_api::config::{DatastoreKind, ServerConfig};
use aset_api::router::build_app_router;
use aset_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        datastore = ?config.datastore,
        auth_enabled = config.auth.is_some(),
        audit_log_enabled = config.audit_log_enabled,
        "Loaded server configuration",
    );

    let store = open_store(config.datastore).await;
    let app = build_app_router(AppState::new(store, config.clone()), &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Asset admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aset_api=debug,aset_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the configured datastore. PostgreSQL is connected, checked and
/// migrated before the server accepts requests.
async fn open_store(kind: DatastoreKind) -> Arc<dyn TableStore> {
    match kind {
        DatastoreKind::Postgres => {
            let database_url = std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set when DATASTORE=postgres");
            let pool = aset_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            aset_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            aset_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("PostgreSQL datastore ready");
            Arc::new(PgTableStore::new(pool))
        }
        DatastoreKind::Memory => {
            tracing::warn!("Using the in-memory datastore; data is lost on shutdown");
            Arc::new(aset_db::models::memory_store())
        }
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
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
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
