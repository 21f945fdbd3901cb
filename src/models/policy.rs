//! Payroll policy model.
//!
//! A [`PayrollPolicy`] is the per-business record persisted by the backend.
//! [`PolicyRates`] is the subset of rates the calculators consume, plus the
//! hours-per-day divisor that the backend treats as a constant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BusinessId, PolicyId};

/// Per-business payroll configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Backend identifier; absent for unsaved drafts.
    #[serde(default)]
    pub id: Option<PolicyId>,
    /// The business this policy belongs to.
    #[serde(rename = "business")]
    pub business_id: BusinessId,
    /// Minutes of lateness tolerated before a LATE penalty applies.
    pub grace_minutes: u32,
    /// Working days per month used to derive the daily rate.
    pub standard_working_days: Decimal,
    /// Deduction per minute late.
    pub late_penalty_per_minute: Decimal,
    /// Deduction per minute of undertime.
    pub undertime_penalty_per_minute: Decimal,
    /// Deduction per day absent.
    pub absent_penalty_per_day: Decimal,
    /// Overtime pay multiplier.
    pub ot_multiplier: Decimal,
    /// Rest day pay multiplier.
    pub rest_day_multiplier: Decimal,
    /// Regular holiday pay multiplier.
    pub holiday_regular_multiplier: Decimal,
    /// Special holiday pay multiplier.
    pub holiday_special_multiplier: Decimal,
}

/// Rates consumed by the calculators.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PolicyRates;
/// use rust_decimal::Decimal;
///
/// let rates = PolicyRates::default();
/// assert_eq!(rates.standard_working_days, Decimal::new(22, 0));
/// assert_eq!(rates.ot_multiplier, Decimal::new(125, 2));
/// assert_eq!(rates.hours_per_day, Decimal::new(8, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRates {
    /// Minutes of lateness tolerated before a LATE penalty applies.
    #[serde(default)]
    pub grace_minutes: u32,
    /// Working days per month used to derive the daily rate.
    pub standard_working_days: Decimal,
    /// Working hours per day used to derive the hourly rate.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// Deduction per minute late.
    #[serde(default)]
    pub late_penalty_per_minute: Decimal,
    /// Deduction per minute of undertime.
    #[serde(default)]
    pub undertime_penalty_per_minute: Decimal,
    /// Deduction per day absent.
    #[serde(default)]
    pub absent_penalty_per_day: Decimal,
    /// Overtime pay multiplier.
    pub ot_multiplier: Decimal,
    /// Rest day pay multiplier.
    #[serde(default)]
    pub rest_day_multiplier: Decimal,
    /// Regular holiday pay multiplier.
    #[serde(default)]
    pub holiday_regular_multiplier: Decimal,
    /// Special holiday pay multiplier.
    #[serde(default)]
    pub holiday_special_multiplier: Decimal,
}

fn default_hours_per_day() -> Decimal {
    Decimal::new(8, 0)
}

impl Default for PolicyRates {
    fn default() -> Self {
        Self {
            grace_minutes: 0,
            standard_working_days: Decimal::new(22, 0),
            hours_per_day: default_hours_per_day(),
            late_penalty_per_minute: Decimal::ZERO,
            undertime_penalty_per_minute: Decimal::ZERO,
            absent_penalty_per_day: Decimal::ZERO,
            ot_multiplier: Decimal::new(125, 2),
            rest_day_multiplier: Decimal::new(130, 2),
            holiday_regular_multiplier: Decimal::new(200, 2),
            holiday_special_multiplier: Decimal::new(130, 2),
        }
    }
}

impl PayrollPolicy {
    /// Extracts the calculator rates, using `hours_per_day` as the daily hours divisor.
    pub fn rates(&self, hours_per_day: Decimal) -> PolicyRates {
        PolicyRates {
            grace_minutes: self.grace_minutes,
            standard_working_days: self.standard_working_days,
            hours_per_day,
            late_penalty_per_minute: self.late_penalty_per_minute,
            undertime_penalty_per_minute: self.undertime_penalty_per_minute,
            absent_penalty_per_day: self.absent_penalty_per_day,
            ot_multiplier: self.ot_multiplier,
            rest_day_multiplier: self.rest_day_multiplier,
            holiday_regular_multiplier: self.holiday_regular_multiplier,
            holiday_special_multiplier: self.holiday_special_multiplier,
        }
    }
}
