//! Backoffice Server binary.

use std::sync::Arc;

use anyhow::Context;
use backoffice_core::InMemoryPartnerRepository;
use backoffice_server::{AppState, Settings, metrics::init_metrics, run_server_with_state};
use backoffice_store::{KeyValueStore, NoopStore};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = Settings::load().context("failed to load settings")?;
    let addr = settings.listen_addr()?;

    tracing::info!(
        "Starting Backoffice Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Cache store: {}", settings.store.redacted_url());
    tracing::info!("Service keys provisioned: {}", settings.auth.service_keys.len());

    let prometheus_handle = init_metrics().context("failed to initialize metrics")?;

    // Sin store la API sigue funcionando, solo que sin cache
    let store: Arc<dyn KeyValueStore> = if settings.cache.enabled {
        match backoffice_store::connect(&settings.store).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Cache store unavailable, caching disabled");
                settings.cache.enabled = false;
                Arc::new(NoopStore::new())
            },
        }
    } else {
        tracing::info!("Response cache disabled by configuration");
        Arc::new(NoopStore::new())
    };

    let repository = Arc::new(InMemoryPartnerRepository::new());
    let state = AppState::from_settings(repository, &settings, store);

    run_server_with_state(addr, state, prometheus_handle)
        .await
        .context("server error")?;

    Ok(())
}
