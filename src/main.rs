//! servicebus-bootstrap entry point.
//!
//! Builds the process-wide bus configuration from environment variables
//! and reports the endpoints created while priming the bus. Subscriber
//! types can be listed in `SERVICEBUS_SUBSCRIBERS` (comma separated).

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use servicebus_bootstrap::config::BusSettings;
use servicebus_bootstrap::configuration;
use servicebus_bootstrap::registration::SubscriberType;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load settings
    let settings = BusSettings::from_env();
    tracing::info!(
        application_id = %settings.application_id,
        namespace = %settings.namespace,
        topic = %settings.topic_name,
        "starting servicebus-bootstrap"
    );

    let mut builder = configuration::with_settings()
        .context("failed to acquire configuration builder")?
        .with_settings_from(settings);

    for name in std::env::var("SERVICEBUS_SUBSCRIBERS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        builder = builder
            .register_subscriber(SubscriberType::new(name))
            .with_context(|| format!("invalid subscriber {name:?}"))?;
    }

    // Build and prime
    let config = builder.build().context("bus configuration failed")?;

    let endpoints = config.bus().endpoints();
    tracing::info!(
        bus_id = %config.bus().id(),
        endpoints = endpoints.len(),
        "bus ready"
    );
    println!("{}", serde_json::to_string_pretty(&endpoints)?);

    Ok(())
}
