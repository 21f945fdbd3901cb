//! Configuration loading and management for the payroll engine.
//!
//! Payroll settings, government contribution rates and the stub dataset are
//! loaded from a YAML directory by [`ConfigLoader`]. Process settings (bind
//! address, backend URL and token, data-source policy) come from the
//! environment through [`AppConfig`].
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Default working days: {}", config.default_policy().standard_working_days);
//! ```

mod env;
mod loader;
mod types;

pub use env::{AppConfig, BackendConfig, DEFAULT_BIND_ADDR, DEFAULT_CONFIG_DIR, Environment};
pub use loader::ConfigLoader;
pub use types::{EngineSettings, MandatoryRates, PayrollDataset, TaxBracket};
