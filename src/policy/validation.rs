//! Boundary validation for payroll policy edits.
//!
//! ## Field limits
//!
//! | Field | Digits before the point | Decimals |
//! |---|---|---|
//! | `grace_minutes` | 3 | whole minutes |
//! | `standard_working_days` | 3 | any, must be above zero |
//! | `late_penalty_per_minute`, `undertime_penalty_per_minute` | 3 | 2 |
//! | `absent_penalty_per_day` | 5 | 2 |
//! | multipliers | 2 | 2 |
//!
//! All values must be non-negative, and a business has at most one policy.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{has_at_most_two_decimals, max_digits_before};
use crate::error::{EngineError, EngineResult, FieldError};
use crate::models::{BusinessId, PayrollPolicy, PolicyId};

/// A policy as submitted by an edit form, before validation.
///
/// Every numeric field is a decimal so that out-of-range input can be
/// reported per field instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDraft {
    /// Backend identifier when editing an existing policy.
    #[serde(default)]
    pub id: Option<PolicyId>,
    /// The business the policy is for.
    #[serde(rename = "business")]
    pub business_id: BusinessId,
    /// Minutes of lateness tolerated.
    pub grace_minutes: Decimal,
    /// Working days per month.
    pub standard_working_days: Decimal,
    /// Deduction per minute late.
    pub late_penalty_per_minute: Decimal,
    /// Deduction per minute of undertime.
    pub undertime_penalty_per_minute: Decimal,
    /// Deduction per day absent.
    pub absent_penalty_per_day: Decimal,
    /// Overtime multiplier.
    pub ot_multiplier: Decimal,
    /// Rest day multiplier.
    pub rest_day_multiplier: Decimal,
    /// Regular holiday multiplier.
    pub holiday_regular_multiplier: Decimal,
    /// Special holiday multiplier.
    pub holiday_special_multiplier: Decimal,
}

impl From<&PayrollPolicy> for PolicyDraft {
    fn from(policy: &PayrollPolicy) -> Self {
        Self {
            id: policy.id,
            business_id: policy.business_id,
            grace_minutes: Decimal::from(policy.grace_minutes),
            standard_working_days: policy.standard_working_days,
            late_penalty_per_minute: policy.late_penalty_per_minute,
            undertime_penalty_per_minute: policy.undertime_penalty_per_minute,
            absent_penalty_per_day: policy.absent_penalty_per_day,
            ot_multiplier: policy.ot_multiplier,
            rest_day_multiplier: policy.rest_day_multiplier,
            holiday_regular_multiplier: policy.holiday_regular_multiplier,
            holiday_special_multiplier: policy.holiday_special_multiplier,
        }
    }
}

struct Limit {
    field: &'static str,
    max_digits: usize,
    two_decimals: bool,
}

const fn limit(field: &'static str, max_digits: usize, two_decimals: bool) -> Limit {
    Limit {
        field,
        max_digits,
        two_decimals,
    }
}

fn check(limit: &Limit, value: Decimal, errors: &mut Vec<FieldError>) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(FieldError::new(limit.field, "cannot be negative"));
        return;
    }
    if !max_digits_before(value, limit.max_digits) {
        errors.push(FieldError::new(
            limit.field,
            format!("must have at most {} digits before the decimal point", limit.max_digits),
        ));
    }
    if limit.two_decimals && !has_at_most_two_decimals(value) {
        errors.push(FieldError::new(limit.field, "must have at most 2 decimal places"));
    }
}

/// Validates a policy draft and converts it into a [`PayrollPolicy`].
///
/// `existing` holds the policies already saved; `editing_id` is the id of
/// the policy being edited, which may be re-saved for its own business.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] listing every failing field.
///
/// # Example
///
/// ```
/// use payroll_engine::policy::{validate_policy, PolicyDraft};
/// use rust_decimal::Decimal;
///
/// let mut draft = PolicyDraft {
///     id: None,
///     business_id: 1,
///     grace_minutes: Decimal::new(10, 0),
///     standard_working_days: Decimal::new(22, 0),
///     late_penalty_per_minute: Decimal::new(200, 2),
///     undertime_penalty_per_minute: Decimal::new(200, 2),
///     absent_penalty_per_day: Decimal::new(500, 0),
///     ot_multiplier: Decimal::new(125, 2),
///     rest_day_multiplier: Decimal::new(130, 2),
///     holiday_regular_multiplier: Decimal::new(200, 2),
///     holiday_special_multiplier: Decimal::new(130, 2),
/// };
/// assert!(validate_policy(&draft, &[], None).is_ok());
///
/// draft.absent_penalty_per_day = Decimal::new(123456, 0);
/// assert!(validate_policy(&draft, &[], None).is_err());
/// ```
pub fn validate_policy(
    draft: &PolicyDraft,
    existing: &[PayrollPolicy],
    editing_id: Option<PolicyId>,
) -> EngineResult<PayrollPolicy> {
    let mut errors = Vec::new();

    check(&limit("grace_minutes", 3, false), draft.grace_minutes, &mut errors);
    if draft.grace_minutes.fract() != Decimal::ZERO {
        errors.push(FieldError::new("grace_minutes", "must be a whole number of minutes"));
    }

    check(
        &limit("standard_working_days", 3, false),
        draft.standard_working_days,
        &mut errors,
    );
    if draft.standard_working_days.is_zero() {
        errors.push(FieldError::new("standard_working_days", "must be greater than zero"));
    }

    let fields = [
        (limit("late_penalty_per_minute", 3, true), draft.late_penalty_per_minute),
        (limit("undertime_penalty_per_minute", 3, true), draft.undertime_penalty_per_minute),
        (limit("absent_penalty_per_day", 5, true), draft.absent_penalty_per_day),
        (limit("ot_multiplier", 2, true), draft.ot_multiplier),
        (limit("rest_day_multiplier", 2, true), draft.rest_day_multiplier),
        (limit("holiday_regular_multiplier", 2, true), draft.holiday_regular_multiplier),
        (limit("holiday_special_multiplier", 2, true), draft.holiday_special_multiplier),
    ];
    for (limit, value) in &fields {
        check(limit, *value, &mut errors);
    }

    let duplicate = existing
        .iter()
        .any(|p| p.business_id == draft.business_id && (p.id.is_none() || p.id != editing_id));
    if duplicate {
        errors.push(FieldError::new(
            "business",
            "a payroll policy already exists for this business",
        ));
    }

    if !errors.is_empty() {
        return Err(EngineError::Validation { errors });
    }

    let grace_minutes = draft
        .grace_minutes
        .to_u32()
        .ok_or_else(|| EngineError::Validation {
            errors: vec![FieldError::new("grace_minutes", "is out of range")],
        })?;

    Ok(PayrollPolicy {
        id: editing_id.or(draft.id),
        business_id: draft.business_id,
        grace_minutes,
        standard_working_days: draft.standard_working_days,
        late_penalty_per_minute: draft.late_penalty_per_minute,
        undertime_penalty_per_minute: draft.undertime_penalty_per_minute,
        absent_penalty_per_day: draft.absent_penalty_per_day,
        ot_multiplier: draft.ot_multiplier,
        rest_day_multiplier: draft.rest_day_multiplier,
        holiday_regular_multiplier: draft.holiday_regular_multiplier,
        holiday_special_multiplier: draft.holiday_special_multiplier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn draft() -> PolicyDraft {
        PolicyDraft {
            id: None,
            business_id: 1,
            grace_minutes: dec("10"),
            standard_working_days: dec("22"),
            late_penalty_per_minute: dec("2.00"),
            undertime_penalty_per_minute: dec("2.00"),
            absent_penalty_per_day: dec("500.00"),
            ot_multiplier: dec("1.25"),
            rest_day_multiplier: dec("1.30"),
            holiday_regular_multiplier: dec("2.00"),
            holiday_special_multiplier: dec("1.30"),
        }
    }

    fn fields(error: EngineError) -> Vec<String> {
        match error {
            EngineError::Validation { errors } => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_draft_converts_to_policy() {
        let policy = validate_policy(&draft(), &[], None).unwrap();
        assert_eq!(policy.grace_minutes, 10);
        assert_eq!(policy.ot_multiplier, dec("1.25"));
        assert_eq!(policy.id, None);
    }

    #[test]
    fn test_digit_limits_at_boundary() {
        let mut at_limit = draft();
        at_limit.grace_minutes = dec("999");
        at_limit.late_penalty_per_minute = dec("999.99");
        at_limit.absent_penalty_per_day = dec("99999.99");
        at_limit.ot_multiplier = dec("99.99");
        assert!(validate_policy(&at_limit, &[], None).is_ok());

        let mut over = draft();
        over.grace_minutes = dec("1000");
        over.late_penalty_per_minute = dec("1000");
        over.absent_penalty_per_day = dec("100000");
        over.ot_multiplier = dec("100");
        let failed = fields(validate_policy(&over, &[], None).unwrap_err());
        assert_eq!(
            failed,
            vec![
                "grace_minutes",
                "late_penalty_per_minute",
                "absent_penalty_per_day",
                "ot_multiplier"
            ]
        );
    }

    #[test]
    fn test_too_many_decimals_rejected() {
        let mut bad = draft();
        bad.holiday_special_multiplier = dec("1.305");
        bad.undertime_penalty_per_minute = dec("2.001");
        let failed = fields(validate_policy(&bad, &[], None).unwrap_err());
        assert_eq!(failed, vec!["undertime_penalty_per_minute", "holiday_special_multiplier"]);

        // Trailing zeros are not significant.
        let mut padded = draft();
        padded.ot_multiplier = dec("1.2500");
        assert!(validate_policy(&padded, &[], None).is_ok());
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut bad = draft();
        bad.grace_minutes = dec("-5");
        bad.rest_day_multiplier = dec("-1.30");
        let failed = fields(validate_policy(&bad, &[], None).unwrap_err());
        assert_eq!(failed, vec!["grace_minutes", "rest_day_multiplier"]);
    }

    #[test]
    fn test_fractional_grace_and_zero_days_rejected() {
        let mut bad = draft();
        bad.grace_minutes = dec("7.5");
        bad.standard_working_days = Decimal::ZERO;
        let failed = fields(validate_policy(&bad, &[], None).unwrap_err());
        assert_eq!(failed, vec!["grace_minutes", "standard_working_days"]);
    }

    #[test]
    fn test_second_policy_for_business_rejected() {
        let existing = validate_policy(&draft(), &[], None).map(|mut p| {
            p.id = Some(4);
            p
        });
        let existing = vec![existing.unwrap()];

        let failed = fields(validate_policy(&draft(), &existing, None).unwrap_err());
        assert_eq!(failed, vec!["business"]);

        let mut other_business = draft();
        other_business.business_id = 2;
        assert!(validate_policy(&other_business, &existing, None).is_ok());
    }

    #[test]
    fn test_policy_can_be_resaved_under_its_own_id() {
        let mut saved = validate_policy(&draft(), &[], None).unwrap();
        saved.id = Some(4);
        let existing = vec![saved.clone()];

        let mut edit = PolicyDraft::from(&saved);
        edit.grace_minutes = dec("15");
        let updated = validate_policy(&edit, &existing, Some(4)).unwrap();
        assert_eq!(updated.id, Some(4));
        assert_eq!(updated.grace_minutes, 15);

        assert!(validate_policy(&edit, &existing, Some(5)).is_err());
    }
}
