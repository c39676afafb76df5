use std::sync::Arc;

use anyhow::Context;
use pulse_config::PulseConfig;
use pulse_store::BackendClient;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: PulseConfig,
    pub client: Arc<BackendClient>,
}

impl AppContext {
    /// Build the backend client. Fails when the backend URL is missing or invalid.
    pub fn init(config: PulseConfig) -> anyhow::Result<Self> {
        let client = BackendClient::new(&config.backend).context("backend client unavailable")?;
        tracing::debug!(url = client.base_url(), "backend client ready");

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }
}
