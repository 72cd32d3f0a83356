use anyhow::Context;
use tracing_subscriber::EnvFilter;

use resale_predictor::{config::AppConfig, server, Artifacts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env();
    tracing::info!(dir = %cfg.model_dir.display(), "loading artifacts");

    let artifacts = Artifacts::load(&cfg.model_dir)
        .with_context(|| format!("failed to load artifacts from {}", cfg.model_dir.display()))?;
    artifacts.warmup().context("model warmup failed")?;
    tracing::info!("warmup forward ok");

    let app = server::router(server::AppState::new(artifacts, cfg.log_vectors));

    tracing::info!("listening on {}", cfg.bind);
    let listener = tokio::net::TcpListener::bind(cfg.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
