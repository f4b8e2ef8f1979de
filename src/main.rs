use std::sync::Arc;

use marquee_api::api::{create_router, AppState};
use marquee_api::config::Config;
use marquee_api::models::Dataset;
use marquee_api::services::{PosterService, TmdbProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let dataset = Arc::new(Dataset::from_path(&config.dataset_path)?);

    let provider = TmdbProvider::new(
        config.tmdb_read_token.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    );
    let posters = PosterService::new(Arc::new(provider));

    let state = AppState::new(dataset, posters);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
