use anyhow::Result;
use telemetry_pulse::config::LoggingSettings;
use telemetry_pulse::domain::config_types::LogFormat;
use telemetry_pulse::infrastructure::log_messages::{application, configuration};
use telemetry_pulse::Application;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let app = Application::new().await?;
    init_tracing(&app.settings().logging);

    info!("{}", configuration::CONFIG_LOADED);
    info!("{}", application::STARTING);

    app.run().await?;

    Ok(())
}

/// Logs go to stderr so stdout stays free for the JSON sink
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
