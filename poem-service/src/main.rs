use dotenvy::dotenv;
use poem_service::config::PoemConfig;
use poem_service::services::metrics::init_metrics;
use poem_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // OTLP export is opt-in; without an endpoint only JSON logs are written.
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("poem-service", "info", otlp_endpoint.as_deref());

    init_metrics();

    let config = PoemConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
