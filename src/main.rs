use newsbrief::{Config, DigestPipeline};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting newsbrief digest run");

    // The only fatal path: a missing secret aborts before any network
    // activity. Per-topic and delivery failures degrade inside the pipeline.
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    let pipeline = DigestPipeline::new(config);
    let report = pipeline.run().await;

    info!(
        "Digest run finished: {}/{} topics summarized in {:.1}s (text delivered: {}, voice delivered: {})",
        report.completed_topics,
        report.total_topics,
        report.elapsed.as_secs_f64(),
        report.delivered_text,
        report.delivered_voice
    );

    Ok(())
}
