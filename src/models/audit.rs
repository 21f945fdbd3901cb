//! Audit records attached to calculation results.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning surfaced to the user alongside a result.
///
/// Warnings indicate degraded results (for example stub data used because
/// the backend was unreachable) that don't prevent a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning with the given code, message and severity.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "daily_rate".to_string(),
            rule_name: "Daily Rate".to_string(),
            input: serde_json::json!({"basic_salary": "50000"}),
            output: serde_json::json!({"daily_rate": "2272.73"}),
            reasoning: "50000 / 22".to_string(),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"rule_id\":\"daily_rate\""));
        assert!(json.contains("\"daily_rate\":\"2272.73\""));
    }

    #[test]
    fn test_warning_constructor() {
        let warning = AuditWarning::new("FALLBACK_DATA", "using stub data", "medium");
        assert_eq!(warning.code, "FALLBACK_DATA");
        assert_eq!(warning.severity, "medium");
    }
}
