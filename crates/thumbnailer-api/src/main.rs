use thumbnailer_api::{setup, telemetry};
use thumbnailer_core::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry(config.log_format())?;
    tracing::info!(
        environment = %config.base.environment,
        storage_backend = %config.storage_backend(),
        thumbnail_width = config.thumbnail_width().get(),
        destination_container = %config.destination_container(),
        "Configuration loaded"
    );
    if config.is_production() && config.storage_backend() == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND=memory in production; thumbnails will not be persisted");
    }

    // Initialize the application (storage, pipeline, routes)
    let (_state, router) = setup::initialize_app(&config).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
