use anyhow::{Context, Result, bail};
use tracing::info;

use digest_worker::{app::ComponentRegistry, config::Config, observability};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init().context("failed to initialize tracing")?;

    let config = Config::from_env().context("failed to load configuration")?;
    let registry =
        ComponentRegistry::build(config).context("failed to build component registry")?;

    let topic = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let topic = topic.trim();
    if topic.is_empty() {
        bail!("usage: digest-worker <topic>");
    }

    registry
        .health_check()
        .await
        .context("text-generator health check failed")?;

    info!(topic, "running digest pipeline");
    let record = registry.pipeline().run(topic).await?;

    println!("Topic:    {}", record.topic());
    println!("Summary:  {}", record.summary().unwrap_or_default());
    println!("Tags:     {}", record.tags().unwrap_or_default());
    println!("Headline: {}", record.headline().unwrap_or_default());

    Ok(())
}
