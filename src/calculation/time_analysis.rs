//! Attendance time analysis.
//!
//! This module compares each attendance record with the branch work schedule
//! and produces time-based payroll codes:
//!
//! | Code | Trigger | Priced as |
//! |---|---|---|
//! | `ABSENT` | absent, missing punch, half day, or short of the minimum hours | days × absent penalty (daily rate when zero), shortfall hours × hourly rate |
//! | `LATE` | minutes late beyond the grace period | minutes × late penalty |
//! | `UNDERTIME` | minutes before the expected clock-out | minutes × undertime penalty |
//! | `OT` | hours beyond the expected day on a work day | hours × hourly rate × OT multiplier |
//! | `REST_OT` | hours worked on a rest day | hours × hourly rate × rest-day multiplier |
//! | `HOLIDAY_REGULAR` / `HOLIDAY_SPECIAL` | hours worked on a holiday | hours × hourly rate × holiday multiplier |
//!
//! Rest days and holidays carry no lateness, undertime or absence.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::money::{checked_product, checked_quotient, checked_total, round_money};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, AuditStep, Cutoff, Holiday, HolidayType, PolicyRates,
    WorkSchedule,
};

const SIXTY: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const HALF_DAY: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const HOURS_SCALE: u32 = 2;

/// A time-based payroll code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeCode {
    /// Absence, in days or shortfall hours.
    Absent,
    /// Late clock-in.
    Late,
    /// Early clock-out.
    Undertime,
    /// Overtime on a work day.
    Ot,
    /// Work on a rest day.
    RestOt,
    /// Work on a regular holiday.
    HolidayRegular,
    /// Work on a special holiday.
    HolidaySpecial,
}

impl TimeCode {
    /// The salary component code the time code maps to.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeCode::Absent => "ABSENT",
            TimeCode::Late => "LATE",
            TimeCode::Undertime => "UNDERTIME",
            TimeCode::Ot => "OT",
            TimeCode::RestOt => "REST_OT",
            TimeCode::HolidayRegular => "HOLIDAY_REGULAR",
            TimeCode::HolidaySpecial => "HOLIDAY_SPECIAL",
        }
    }

    /// Returns true for codes that reduce pay.
    pub fn is_deduction(&self) -> bool {
        matches!(self, TimeCode::Absent | TimeCode::Late | TimeCode::Undertime)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HolidayType> for TimeCode {
    fn from(holiday_type: HolidayType) -> Self {
        match holiday_type {
            HolidayType::Regular => TimeCode::HolidayRegular,
            HolidayType::Special => TimeCode::HolidaySpecial,
        }
    }
}

/// How much of a code a record produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Quantity {
    /// Whole or fractional days.
    Days(Decimal),
    /// Hours, to two decimals.
    Hours(Decimal),
    /// Minutes, to two decimals.
    Minutes(Decimal),
}

/// One code produced by one attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// The attendance date.
    pub date: chrono::NaiveDate,
    /// The time code.
    pub code: TimeCode,
    /// The measured quantity.
    pub quantity: Quantity,
    /// The priced amount, rounded to cents (zero until priced).
    pub amount: Decimal,
}

/// The total for one code over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTotal {
    /// The time code.
    pub code: TimeCode,
    /// Number of entries summed.
    pub occurrences: usize,
    /// Summed amount.
    pub amount: Decimal,
}

/// The outcome of analyzing a period of attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnalysis {
    /// Priced entries in date order.
    pub entries: Vec<TimeEntry>,
    /// Per-code totals in code order.
    pub totals: Vec<TimeTotal>,
    /// Audit steps, one per code total.
    pub audit_steps: Vec<AuditStep>,
}

/// Analyzes a single attendance record against the schedule.
///
/// `policy_grace` is used when the schedule has no grace minutes of its own.
/// Returned entries are not yet priced.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{analyze_record, Quantity, TimeCode};
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, WorkSchedule};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let schedule = WorkSchedule {
///     branch_id: 1,
///     time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     time_out: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     grace_minutes: 0,
///     break_hours: Decimal::ONE,
///     min_hours_required: Decimal::new(4, 0),
///     regular_work_days: vec![0, 1, 2, 3, 4],
/// };
/// let record = AttendanceRecord {
///     employee_id: 1,
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), // Monday
///     time_in: NaiveTime::from_hms_opt(9, 20, 0),
///     time_out: NaiveTime::from_hms_opt(18, 0, 0),
///     status: AttendanceStatus::Present,
/// };
///
/// let entries = analyze_record(&record, &schedule, 10, None);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].code, TimeCode::Late);
/// assert_eq!(entries[0].quantity, Quantity::Minutes(Decimal::new(20, 0)));
/// ```
pub fn analyze_record(
    record: &AttendanceRecord,
    schedule: &WorkSchedule,
    policy_grace: u32,
    holiday: Option<&Holiday>,
) -> Vec<TimeEntry> {
    let entry = |code: TimeCode, quantity: Quantity| TimeEntry {
        date: record.date,
        code,
        quantity,
        amount: Decimal::ZERO,
    };

    let is_work_day = schedule.is_work_day(record.date);
    let scheduled = is_work_day && holiday.is_none();

    let punches = match (record.status, record.punches()) {
        (AttendanceStatus::Leave, _) => return Vec::new(),
        (AttendanceStatus::Absent, _) | (_, None) => {
            return if scheduled {
                vec![entry(TimeCode::Absent, Quantity::Days(Decimal::ONE))]
            } else {
                Vec::new()
            };
        }
        (AttendanceStatus::HalfDay, Some(_)) => {
            return if scheduled {
                vec![entry(TimeCode::Absent, Quantity::Days(HALF_DAY))]
            } else {
                Vec::new()
            };
        }
        (AttendanceStatus::Present, Some(punches)) => punches,
    };

    let (clock_in, clock_out) = punches;
    let hours_worked = (hours_between(clock_in, clock_out) - schedule.break_hours).max(Decimal::ZERO);

    if let Some(holiday) = holiday {
        return if hours_worked > Decimal::ZERO {
            vec![entry(
                TimeCode::from(holiday.holiday_type),
                Quantity::Hours(hours_worked),
            )]
        } else {
            Vec::new()
        };
    }

    if !is_work_day {
        return if hours_worked > Decimal::ZERO {
            vec![entry(TimeCode::RestOt, Quantity::Hours(hours_worked))]
        } else {
            Vec::new()
        };
    }

    let mut entries = Vec::new();
    let expected_in = record.date.and_time(schedule.time_in);
    let mut expected_out = record.date.and_time(schedule.time_out);
    if expected_out <= expected_in {
        expected_out += TimeDelta::days(1);
    }

    let grace = if schedule.grace_minutes > 0 {
        schedule.grace_minutes
    } else {
        policy_grace
    };
    if clock_in > expected_in {
        let late = minutes_between(expected_in, clock_in);
        if late > Decimal::from(grace) {
            entries.push(entry(TimeCode::Late, Quantity::Minutes(late)));
        }
    }

    if clock_out < expected_out {
        entries.push(entry(
            TimeCode::Undertime,
            Quantity::Minutes(minutes_between(clock_out, expected_out)),
        ));
    }

    if hours_worked < schedule.min_hours_required {
        entries.push(entry(
            TimeCode::Absent,
            Quantity::Hours(schedule.min_hours_required - hours_worked),
        ));
    }

    let expected_hours = hours_between(expected_in, expected_out) - schedule.break_hours;
    if hours_worked > expected_hours {
        entries.push(entry(
            TimeCode::Ot,
            Quantity::Hours(hours_worked - expected_hours),
        ));
    }

    entries
}

/// Prices a single entry with the policy rates.
///
/// `daily_rate` and `hourly_rate` are the employee's unrounded rates.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] when the amount overflows.
pub fn price_entry(
    entry: &TimeEntry,
    rates: &PolicyRates,
    daily_rate: Decimal,
    hourly_rate: Decimal,
    holiday: Option<&Holiday>,
) -> EngineResult<Decimal> {
    let premium = |hours: Decimal, multiplier: Decimal| {
        checked_product(hours, hourly_rate).and_then(|pay| checked_product(pay, multiplier))
    };

    let amount = match (entry.code, entry.quantity) {
        (TimeCode::Absent, Quantity::Days(days)) => {
            let per_day = if rates.absent_penalty_per_day.is_zero() {
                daily_rate
            } else {
                rates.absent_penalty_per_day
            };
            checked_product(days, per_day)?
        }
        (TimeCode::Absent, Quantity::Hours(hours)) => checked_product(hours, hourly_rate)?,
        (TimeCode::Late, Quantity::Minutes(minutes)) => {
            checked_product(minutes, rates.late_penalty_per_minute)?
        }
        (TimeCode::Undertime, Quantity::Minutes(minutes)) => {
            checked_product(minutes, rates.undertime_penalty_per_minute)?
        }
        (TimeCode::Ot, Quantity::Hours(hours)) => premium(hours, rates.ot_multiplier)?,
        (TimeCode::RestOt, Quantity::Hours(hours)) => premium(hours, rates.rest_day_multiplier)?,
        (TimeCode::HolidayRegular | TimeCode::HolidaySpecial, Quantity::Hours(hours)) => {
            premium(hours, holiday_multiplier(entry.code, rates, holiday))?
        }
        _ => Decimal::ZERO,
    };
    Ok(round_money(amount))
}

/// Analyzes and prices every record in the cutoff window.
///
/// Records outside the window are ignored. Per-code totals are summed from
/// the cent-rounded entry amounts.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when the policy has zero standard
/// working days or hours per day, and [`EngineError::CalculationError`]
/// when an amount overflows.
pub fn analyze_period(
    records: &[AttendanceRecord],
    schedule: &WorkSchedule,
    rates: &PolicyRates,
    holidays: &[Holiday],
    cutoff: &Cutoff,
    base_salary: Decimal,
    step_number_start: u32,
) -> EngineResult<TimeAnalysis> {
    if rates.standard_working_days <= Decimal::ZERO || rates.hours_per_day <= Decimal::ZERO {
        return Err(EngineError::Configuration {
            message: "standard working days and hours per day must be greater than zero"
                .to_string(),
        });
    }
    let daily_rate = checked_quotient(base_salary, rates.standard_working_days)?;
    let hourly_rate = checked_quotient(daily_rate, rates.hours_per_day)?;

    let mut in_window: Vec<&AttendanceRecord> =
        records.iter().filter(|r| cutoff.contains(r.date)).collect();
    in_window.sort_by_key(|r| r.date);

    let mut entries = Vec::new();
    for record in in_window {
        let holiday = holidays.iter().find(|h| h.date == record.date);
        for mut entry in analyze_record(record, schedule, rates.grace_minutes, holiday) {
            entry.amount = price_entry(&entry, rates, daily_rate, hourly_rate, holiday)?;
            entries.push(entry);
        }
    }

    let mut by_code: BTreeMap<TimeCode, (usize, Decimal)> = BTreeMap::new();
    for entry in &entries {
        let slot = by_code.entry(entry.code).or_insert((0, Decimal::ZERO));
        slot.0 += 1;
        slot.1 = checked_total(slot.1, entry.amount)?;
    }

    let totals: Vec<TimeTotal> = by_code
        .into_iter()
        .map(|(code, (occurrences, amount))| TimeTotal {
            code,
            occurrences,
            amount,
        })
        .collect();

    let audit_steps = totals
        .iter()
        .zip(step_number_start..)
        .map(|(total, step_number)| AuditStep {
            step_number,
            rule_id: format!("time_{}", total.code.as_str().to_lowercase()),
            rule_name: format!("Time Analysis {}", total.code),
            input: serde_json::json!({
                "cutoff_start": cutoff.start.to_string(),
                "cutoff_end": cutoff.end.to_string(),
                "occurrences": total.occurrences
            }),
            output: serde_json::json!({ "amount": total.amount.to_string() }),
            reasoning: format!(
                "{} {} occurrence(s) between {} and {} totalling {}",
                total.occurrences, total.code, cutoff.start, cutoff.end, total.amount
            ),
        })
        .collect();

    Ok(TimeAnalysis {
        entries,
        totals,
        audit_steps,
    })
}

fn holiday_multiplier(code: TimeCode, rates: &PolicyRates, holiday: Option<&Holiday>) -> Decimal {
    let policy_value = match code {
        TimeCode::HolidaySpecial => rates.holiday_special_multiplier,
        _ => rates.holiday_regular_multiplier,
    };
    match holiday {
        Some(holiday) if policy_value.is_zero() => holiday.multiplier,
        _ => policy_value,
    }
}

fn round_quantity(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    round_quantity(Decimal::from((to - from).num_seconds()) / SIXTY)
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    round_quantity(Decimal::from((to - from).num_seconds()) / (SIXTY * SIXTY))
}
