//! Payroll policy lookup.
//!
//! A business's own policy always wins. When it has none, callers that can
//! tolerate it get the configured default policy together with a warning
//! that the figures are not business-specific.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditWarning, BusinessId, PayrollPolicy, PolicyId, PolicyRates};

/// Warning code attached when the default policy stands in for a missing one.
pub const DEFAULT_POLICY_WARNING_CODE: &str = "DEFAULT_POLICY";

/// Where resolved rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyOrigin {
    /// The business's own policy.
    Configured,
    /// The engine-wide default policy.
    Default,
}

/// Rates for a business plus how they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPolicy {
    /// The business the rates are for.
    pub business_id: BusinessId,
    /// The policy record used, if any.
    pub policy_id: Option<PolicyId>,
    /// The rates to calculate with.
    pub rates: PolicyRates,
    /// Configured or default.
    pub origin: PolicyOrigin,
    /// Set when the default policy was used.
    pub warnings: Vec<AuditWarning>,
}

fn find(policies: &[PayrollPolicy], business_id: BusinessId) -> Option<&PayrollPolicy> {
    policies.iter().find(|p| p.business_id == business_id)
}

/// Returns the rates of the business's policy.
///
/// # Errors
///
/// Returns [`EngineError::PolicyNotFound`] when the business has no policy.
pub fn resolve_policy(
    policies: &[PayrollPolicy],
    business_id: BusinessId,
    hours_per_day: Decimal,
) -> EngineResult<PolicyRates> {
    find(policies, business_id)
        .map(|policy| policy.rates(hours_per_day))
        .ok_or(EngineError::PolicyNotFound { business_id })
}

/// Returns the business's policy, or `default` with a warning when it has none.
///
/// The hours-per-day divisor always comes from `default`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PolicyRates;
/// use payroll_engine::policy::{resolve_or_default, PolicyOrigin};
///
/// let resolved = resolve_or_default(&[], 3, &PolicyRates::default());
/// assert_eq!(resolved.origin, PolicyOrigin::Default);
/// assert_eq!(resolved.warnings.len(), 1);
/// ```
pub fn resolve_or_default(
    policies: &[PayrollPolicy],
    business_id: BusinessId,
    default: &PolicyRates,
) -> ResolvedPolicy {
    match find(policies, business_id) {
        Some(policy) => ResolvedPolicy {
            business_id,
            policy_id: policy.id,
            rates: policy.rates(default.hours_per_day),
            origin: PolicyOrigin::Configured,
            warnings: Vec::new(),
        },
        None => {
            warn!(business_id = business_id, "No payroll policy configured, using defaults");
            ResolvedPolicy {
                business_id,
                policy_id: None,
                rates: default.clone(),
                origin: PolicyOrigin::Default,
                warnings: vec![AuditWarning::new(
                    DEFAULT_POLICY_WARNING_CODE,
                    format!(
                        "Business {} has no payroll policy; default rates were used",
                        business_id
                    ),
                    "warning",
                )],
            }
        }
    }
}
