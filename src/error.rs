//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving policies,
//! computing pay and talking to data sources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BusinessId, CycleType, EmployeeId};

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::PolicyNotFound { business_id: 7 };
/// assert_eq!(error.to_string(), "No payroll policy configured for business 7");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required environment variable was missing or malformed.
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvironment {
        /// The variable name.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// A payroll configuration value makes the computation impossible
    /// (for example zero standard working days).
    #[error("Configuration error: {message}")]
    Configuration {
        /// A description of the misconfiguration.
        message: String,
    },

    /// No payroll policy exists for the business.
    #[error("No payroll policy configured for business {business_id}")]
    PolicyNotFound {
        /// The business that has no policy.
        business_id: BusinessId,
    },

    /// The requested employee does not exist.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The missing employee.
        employee_id: EmployeeId,
    },

    /// The employee is missing an assignment needed for payroll.
    #[error("Employee {employee_id} is not assignable: {message}")]
    UnassignedEmployee {
        /// The employee.
        employee_id: EmployeeId,
        /// Which assignment is missing.
        message: String,
    },

    /// No salary rate is active for the employee on the date.
    #[error("No salary rate found for employee {employee_id} on {date}")]
    SalaryRateNotFound {
        /// The employee.
        employee_id: EmployeeId,
        /// The date that has no active rate.
        date: NaiveDate,
    },

    /// No active payroll cycle of the requested type exists for the business.
    #[error("No active {cycle_type} payroll cycle for business {business_id}")]
    CycleNotFound {
        /// The business.
        business_id: BusinessId,
        /// The requested cycle type.
        cycle_type: CycleType,
    },

    /// An input value failed boundary validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// One or more fields failed validation.
    #[error("Validation failed for {} field(s)", .errors.len())]
    Validation {
        /// The per-field failures, in field order.
        errors: Vec<FieldError>,
    },

    /// The operation is not permitted for the current session.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why the session may not perform the operation.
        message: String,
    },

    /// A data source could not be reached or returned an unusable response.
    #[error("Data source '{source_name}' failed: {message}")]
    SourceUnavailable {
        /// The name of the failing source.
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A validation failure for a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field name as it appears in the request.
    pub field: String,
    /// Why the value was rejected.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
