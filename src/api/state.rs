//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::GenerationOptions;
use crate::config::{AppConfig, ConfigLoader};
use crate::error::EngineResult;
use crate::source::{DataGateway, DataSource, FallbackSource, RemoteSource};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the data gateway and, when a backend is
/// configured, the client used to trigger payslip emails.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    gateway: DataGateway,
    mailer: Option<Arc<RemoteSource>>,
    options: Arc<GenerationOptions>,
}

impl AppState {
    /// Creates a state that serves the configured fallback dataset only.
    pub fn new(config: ConfigLoader) -> Self {
        let fallback: Arc<dyn DataSource> = Arc::new(FallbackSource::new(config.fallback().clone()));
        Self::with_gateway(config, DataGateway::fallback_only(fallback), None)
    }

    /// Creates a state around an existing gateway.
    pub fn with_gateway(
        config: ConfigLoader,
        gateway: DataGateway,
        mailer: Option<Arc<RemoteSource>>,
    ) -> Self {
        let options = GenerationOptions::from_config(&config);
        Self {
            config: Arc::new(config),
            gateway,
            mailer,
            options: Arc::new(options),
        }
    }

    /// Builds the state for the service binary.
    ///
    /// A [`RemoteSource`] is created when the environment names a backend;
    /// the gateway then follows the configured source policy.
    pub fn from_app_config(app: &AppConfig, config: ConfigLoader) -> EngineResult<Self> {
        let remote = app
            .backend
            .as_ref()
            .map(RemoteSource::new)
            .transpose()?
            .map(Arc::new);

        let fallback: Arc<dyn DataSource> = Arc::new(FallbackSource::new(config.fallback().clone()));
        let remote_source = remote.clone().map(|r| r as Arc<dyn DataSource>);
        let gateway = DataGateway::new(app.source_policy, remote_source, fallback)?;

        Ok(Self::with_gateway(config, gateway, remote))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the data gateway.
    pub fn gateway(&self) -> &DataGateway {
        &self.gateway
    }

    /// Returns the backend client for payslip emails, if configured.
    pub fn mailer(&self) -> Option<&RemoteSource> {
        self.mailer.as_deref()
    }

    /// Returns the generation options derived from the settings.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourcePolicy;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_state_without_backend_reads_fallback() {
        let config = ConfigLoader::load("./config/default").unwrap();
        let state = AppState::new(config);
        assert_eq!(state.gateway().policy(), SourcePolicy::Fallback);
        assert!(state.mailer().is_none());
        assert!(state.options().use_mandatories);
    }

    #[test]
    fn test_state_from_app_config_builds_remote() {
        let app = AppConfig::from_lookup(|key| match key {
            "PAYROLL_API_BASE_URL" => Some("http://127.0.0.1:9".to_string()),
            "PAYROLL_API_TOKEN" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        let config = ConfigLoader::load("./config/default").unwrap();

        let state = AppState::from_app_config(&app, config).unwrap();
        assert_eq!(state.gateway().policy(), SourcePolicy::RemoteWithFallback);
        assert!(state.mailer().is_some());
    }
}
