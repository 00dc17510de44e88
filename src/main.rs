//! lib-api server - library book catalog
//!
//! Serves the REST API over an in-memory store until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::{net::TcpListener, signal, sync::oneshot};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lib_api::{
    api,
    config::AppConfig,
    repository::{BookRepository, InMemoryBookRepository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config);

    tracing::info!("Application lib-api v{} starting up...", env!("CARGO_PKG_VERSION"));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);

    // Another backend only has to implement BookRepository
    let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::new());
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };
    let app = api::router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                stop_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            res??;
            tracing::info!("HTTP server stopped");
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!("Interrupt received. Application lib-api shutting down...");
    stop_tx.send(()).ok();

    match tokio::time::timeout(grace, server).await {
        Ok(res) => {
            res??;
            tracing::info!("HTTP server shutdown successfully");
        }
        Err(_) => tracing::warn!(
            "Graceful shutdown did not finish within {}s, dropping open connections",
            grace.as_secs()
        ),
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("lib_api={},tower_http=debug", config.logging.level).into()
    });

    let json = config.json_logs();
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
