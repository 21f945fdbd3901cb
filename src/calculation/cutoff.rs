//! Payroll cycle cutoff windows.
//!
//! A cycle is defined by a start and end day of the month. For a given
//! payroll month the cutoff starts in that month; when the end day is before
//! the start day the window wraps into the following month (e.g. 25 → 10).
//! Days past the end of a short month are clamped to its last day.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult, FieldError};
use crate::models::{BusinessId, Cutoff, CycleType, PayrollCycle};

/// Largest day number a cycle may use.
pub const MAX_CYCLE_DAY: u32 = 31;

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Parses a `YYYY-MM` or `YYYY-MM-DD` string into the first day of that month.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::normalize_month;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// assert_eq!(normalize_month("2025-03").unwrap(), expected);
/// assert_eq!(normalize_month("2025-03-17").unwrap(), expected);
/// assert!(normalize_month("March").is_err());
/// ```
pub fn normalize_month(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d"));

    parsed
        .ok()
        .and_then(|date| date.with_day(1))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "month".to_string(),
            message: format!("'{}' is not in YYYY-MM or YYYY-MM-DD format", value),
        })
}

/// Checks that both cycle days are within `1..=31`.
pub fn validate_cycle_days(start_day: u32, end_day: u32) -> EngineResult<()> {
    let errors: Vec<FieldError> = [("start_day", start_day), ("end_day", end_day)]
        .into_iter()
        .filter(|(_, day)| !(1..=MAX_CYCLE_DAY).contains(day))
        .map(|(field, day)| {
            FieldError::new(field, format!("must be between 1 and 31 (got {})", day))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation { errors })
    }
}

/// Finds the business's active cycle of the given type.
pub fn find_active_cycle(
    cycles: &[PayrollCycle],
    business_id: BusinessId,
    cycle_type: CycleType,
) -> EngineResult<&PayrollCycle> {
    cycles
        .iter()
        .find(|c| c.business_id == business_id && c.cycle_type == cycle_type && c.is_active)
        .ok_or(EngineError::CycleNotFound {
            business_id,
            cycle_type,
        })
}

/// Computes the cutoff window that starts in `month`.
///
/// Only the year and month of `month` are used.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::cutoff_for_month;
/// use payroll_engine::models::{CycleType, PayrollCycle};
/// use chrono::NaiveDate;
///
/// let cycle = PayrollCycle {
///     id: 1,
///     business_id: 1,
///     name: "Mid-month".to_string(),
///     cycle_type: CycleType::Monthly,
///     start_day: 25,
///     end_day: 10,
///     is_active: true,
/// };
///
/// let cutoff = cutoff_for_month(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &cycle).unwrap();
/// assert_eq!(cutoff.start, NaiveDate::from_ymd_opt(2025, 1, 25).unwrap());
/// assert_eq!(cutoff.end, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
/// ```
pub fn cutoff_for_month(month: NaiveDate, cycle: &PayrollCycle) -> EngineResult<Cutoff> {
    validate_cycle_days(cycle.start_day, cycle.end_day)?;

    let year = month.year();
    let month_number = month.month();
    let start_day = cycle.start_day.min(days_in_month(year, month_number));
    let start = ymd(year, month_number, start_day)?;

    let end = if cycle.end_day >= cycle.start_day {
        ymd(
            year,
            month_number,
            cycle.end_day.min(days_in_month(year, month_number)),
        )?
    } else {
        let (next_year, next_month) = if month_number == 12 {
            (year + 1, 1)
        } else {
            (year, month_number + 1)
        };
        ymd(
            next_year,
            next_month,
            cycle.end_day.min(days_in_month(next_year, next_month)),
        )?
    };

    Ok(Cutoff { start, end })
}

/// Returns true if `date` falls inside an occurrence of the cycle.
///
/// For a wrapping cycle, the occurrence that started in the previous month
/// is checked as well.
pub fn date_in_cycle(cycle: &PayrollCycle, date: NaiveDate) -> bool {
    let Some(this_month) = date.with_day(1) else {
        return false;
    };
    let in_this = cutoff_for_month(this_month, cycle).is_ok_and(|c| c.contains(date));
    if in_this || cycle.end_day >= cycle.start_day {
        return in_this;
    }

    this_month
        .pred_opt()
        .is_some_and(|prev| cutoff_for_month(prev, cycle).is_ok_and(|c| c.contains(date)))
}

fn ymd(year: i32, month: u32, day: u32) -> EngineResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| EngineError::CalculationError {
        message: format!("invalid cutoff date {}-{:02}-{:02}", year, month, day),
    })
}
