mod app;
mod core;
mod features;
mod shared;

use std::sync::Arc;

use crate::core::config::{Config, StorageBackend};
use crate::core::database;
use crate::features::tickets::repositories::{
    InMemoryTicketRepository, PostgresTicketRepository, RedisTicketRepository, TicketRepository,
};
use crate::features::tickets::TicketService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let repository = connect_repository(&config).await?;
    tracing::info!("Ticket repository ready (backend={})", repository.backend());

    let ticket_service = Arc::new(TicketService::new(repository));
    tracing::info!("Ticket service initialized");

    let app = app::build_router(ticket_service, config.app.cors_allowed_origins.clone());

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Open the configured store and wrap it in its repository
async fn connect_repository(config: &Config) -> anyhow::Result<Arc<dyn TicketRepository>> {
    match config.storage.backend {
        StorageBackend::Redis => {
            tracing::info!("Connecting to Redis at {}", config.redis.url);
            let conn = database::connect_redis(&config.redis)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to Redis: {}", e))?;
            Ok(Arc::new(RedisTicketRepository::new(conn)))
        }
        StorageBackend::Postgres => {
            tracing::info!(
                "Connecting to PostgreSQL at {}",
                config.database.url.split('@').next_back().unwrap_or("***")
            );
            let pool = database::create_pool(&config.database).await?;
            let repository = PostgresTicketRepository::new(pool);
            repository
                .ensure_schema()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to prepare ticket table: {}", e))?;
            Ok(Arc::new(repository))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory ticket store; data is lost on exit");
            Ok(Arc::new(InMemoryTicketRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
