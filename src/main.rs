use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use wellbeing_journal::{catalog::Catalog, router, AppState, Config, FileRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("loading catalog from {}", path.display());
            Catalog::load(path).await?
        }
        None => Catalog::default(),
    };

    let state = AppState::new(
        FileRepository::new(&config.data_dir),
        catalog,
        config.seed_empty,
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("storing entries in {}", config.data_dir.display());
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
