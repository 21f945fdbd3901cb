//! Runtime configuration resolved from environment variables.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::source::SourcePolicy;

/// Address the HTTP server binds to when `APP_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Configuration directory used when `PAYROLL_CONFIG_DIR` is unset.
pub const DEFAULT_CONFIG_DIR: &str = "./config/default";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development: pretty logs.
    Development,
    /// Deployed: JSON logs.
    Production,
    /// Test runs.
    Test,
}

impl Environment {
    fn parse(value: &str) -> EngineResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(EngineError::InvalidEnvironment {
                key: "APP_ENV".to_string(),
                message: format!(
                    "must be one of 'development', 'production', or 'test' (got {other})"
                ),
            }),
        }
    }

    /// Returns the canonical name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the payroll REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL, without a trailing slash (e.g. `https://payroll.example.com`).
    pub base_url: String,
    /// API token sent as `Authorization: Token <token>`.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Runtime configuration for the service binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Runtime environment.
    pub environment: Environment,
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// Directory holding the YAML configuration.
    pub config_dir: PathBuf,
    /// Payroll backend connection, if configured.
    pub backend: Option<BackendConfig>,
    /// How data sources are selected.
    pub source_policy: SourcePolicy,
}

impl AppConfig {
    /// Reads `.env` (when present) and then the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `APP_ENV` | `development` |
    /// | `APP_BIND_ADDR` | `127.0.0.1:8080` |
    /// | `PAYROLL_CONFIG_DIR` | `./config/default` |
    /// | `PAYROLL_API_BASE_URL` | unset (no backend) |
    /// | `PAYROLL_API_TOKEN` | unset |
    /// | `PAYROLL_API_TIMEOUT_SECS` | `10` |
    /// | `PAYROLL_SOURCE_POLICY` | `remote_with_fallback` with a backend, else `fallback` |
    pub fn from_env() -> EngineResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match non_empty("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        let bind_value = non_empty("APP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| EngineError::InvalidEnvironment {
                key: "APP_BIND_ADDR".to_string(),
                message: e.to_string(),
            })?;

        let config_dir = PathBuf::from(
            non_empty("PAYROLL_CONFIG_DIR").unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string()),
        );

        let timeout_secs = match non_empty("PAYROLL_API_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| EngineError::InvalidEnvironment {
                    key: "PAYROLL_API_TIMEOUT_SECS".to_string(),
                    message: e.to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let backend = non_empty("PAYROLL_API_BASE_URL").map(|url| BackendConfig {
            base_url: url.trim().trim_end_matches('/').to_string(),
            token: non_empty("PAYROLL_API_TOKEN"),
            timeout: Duration::from_secs(timeout_secs),
        });

        let source_policy = match non_empty("PAYROLL_SOURCE_POLICY") {
            Some(value) => value
                .parse::<SourcePolicy>()
                .map_err(|message| EngineError::InvalidEnvironment {
                    key: "PAYROLL_SOURCE_POLICY".to_string(),
                    message,
                })?,
            None if backend.is_some() => SourcePolicy::RemoteWithFallback,
            None => SourcePolicy::Fallback,
        };

        if source_policy != SourcePolicy::Fallback && backend.is_none() {
            return Err(EngineError::InvalidEnvironment {
                key: "PAYROLL_API_BASE_URL".to_string(),
                message: format!("required when PAYROLL_SOURCE_POLICY is {}", source_policy),
            });
        }

        Ok(Self {
            environment,
            bind_addr,
            config_dir,
            backend,
            source_policy,
        })
    }
}
