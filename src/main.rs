use std::net::SocketAddr;
use std::sync::Arc;

use price_predictor::config::Config;
use price_predictor::dataset::ReferenceData;
use price_predictor::pipeline::ScoringPipeline;
use price_predictor::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    // Either artifact failing to load takes the whole service down; no form
    // is served without both.
    let data = ReferenceData::load(&config.dataset_path)?;
    let pipeline = ScoringPipeline::load(&config.pipeline_path)?;
    tracing::info!(
        brands = data.brands().len(),
        cities = data.cities().len(),
        "form domains ready"
    );

    let state = AppState {
        data: Arc::new(data),
        pipeline: Arc::new(pipeline),
    };
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
