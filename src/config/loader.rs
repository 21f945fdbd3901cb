//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! engine configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::PolicyRates;

use super::types::{EngineSettings, MandatoryRates, PayrollDataset};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml     # Hours per day, mandatories switch, default policy
/// ├── mandatories.yaml  # Government contribution rates and tax brackets
/// └── fallback.yaml     # Stub dataset served when the backend is down
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Hours per day: {}", loader.settings().hours_per_day);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    mandatory_rates: MandatoryRates,
    fallback: PayrollDataset,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - The settings make rate derivation impossible (`Configuration`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("settings.yaml"))?;
        let mandatory_rates = Self::load_yaml::<MandatoryRates>(&path.join("mandatories.yaml"))?;
        let fallback = Self::load_yaml::<PayrollDataset>(&path.join("fallback.yaml"))?;

        Self::from_parts(settings, mandatory_rates, fallback)
    }

    /// Builds a loader from already-parsed parts.
    pub fn from_parts(
        settings: EngineSettings,
        mandatory_rates: MandatoryRates,
        fallback: PayrollDataset,
    ) -> EngineResult<Self> {
        if settings.hours_per_day <= Decimal::ZERO {
            return Err(EngineError::Configuration {
                message: format!(
                    "hours_per_day must be greater than zero (got {})",
                    settings.hours_per_day
                ),
            });
        }
        if settings.default_policy.standard_working_days <= Decimal::ZERO {
            return Err(EngineError::Configuration {
                message: "default_policy.standard_working_days must be greater than zero"
                    .to_string(),
            });
        }

        Ok(Self {
            settings,
            mandatory_rates,
            fallback,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the documented default policy, with the engine's hours per day.
    pub fn default_policy(&self) -> PolicyRates {
        PolicyRates {
            hours_per_day: self.settings.hours_per_day,
            ..self.settings.default_policy.clone()
        }
    }

    /// Returns the government contribution rates.
    pub fn mandatory_rates(&self) -> &MandatoryRates {
        &self.mandatory_rates
    }

    /// Returns the stub dataset.
    pub fn fallback(&self) -> &PayrollDataset {
        &self.fallback
    }
}
