//! Attendance records and branch work schedules.
//!
//! An [`AttendanceRecord`] is one day of punches for an employee; a
//! [`WorkSchedule`] holds the branch's expected hours the punches are
//! measured against.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{BranchId, EmployeeId};

/// Attendance status reported for a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// The employee reported for work.
    #[default]
    #[serde(alias = "Present")]
    Present,
    /// The employee did not report for work.
    #[serde(alias = "Absent")]
    Absent,
    /// Approved leave; not penalized.
    #[serde(alias = "Leave")]
    Leave,
    /// Half a working day.
    #[serde(alias = "Half-day", alias = "HALF-DAY")]
    HalfDay,
}

/// One day of timekeeping for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the punches belong to.
    #[serde(rename = "employee")]
    pub employee_id: EmployeeId,
    /// The work date.
    pub date: NaiveDate,
    /// Clock-in time, if punched.
    #[serde(default)]
    pub time_in: Option<NaiveTime>,
    /// Clock-out time, if punched.
    #[serde(default)]
    pub time_out: Option<NaiveTime>,
    /// Reported status.
    #[serde(default)]
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Returns the clock-in and clock-out instants, rolling clock-out to the
    /// next day when it is not after clock-in.
    ///
    /// Returns `None` when either punch is missing.
    pub fn punches(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let time_in = self.time_in?;
        let time_out = self.time_out?;
        let start = self.date.and_time(time_in);
        let mut end = self.date.and_time(time_out);
        if end <= start {
            end += TimeDelta::days(1);
        }
        Some((start, end))
    }

    /// Returns the elapsed hours between the punches, or zero when a punch is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let record = AttendanceRecord {
    ///     employee_id: 1,
    ///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
    ///     time_in: NaiveTime::from_hms_opt(22, 0, 0),
    ///     time_out: NaiveTime::from_hms_opt(6, 30, 0),
    ///     status: AttendanceStatus::Present,
    /// };
    /// assert_eq!(record.hours_worked(), Decimal::new(85, 1));
    /// ```
    pub fn hours_worked(&self) -> Decimal {
        match self.punches() {
            Some((start, end)) => {
                Decimal::new((end - start).num_minutes(), 0) / Decimal::new(60, 0)
            }
            None => Decimal::ZERO,
        }
    }
}

/// A branch's expected working pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// The branch the schedule applies to.
    #[serde(rename = "branch")]
    pub branch_id: BranchId,
    /// Expected clock-in.
    pub time_in: NaiveTime,
    /// Expected clock-out; earlier than `time_in` means an overnight shift.
    pub time_out: NaiveTime,
    /// Branch-specific grace minutes; zero defers to the payroll policy.
    #[serde(default)]
    pub grace_minutes: u32,
    /// Unpaid break hours deducted from each day.
    pub break_hours: Decimal,
    /// Minimum hours to be considered present.
    pub min_hours_required: Decimal,
    /// Regular work days, 0 = Monday through 6 = Sunday.
    #[serde(deserialize_with = "deserialize_work_days")]
    pub regular_work_days: Vec<u32>,
}

impl WorkSchedule {
    /// Returns true when `date` falls on one of the regular work days.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.regular_work_days
            .contains(&date.weekday().num_days_from_monday())
    }

    /// Returns true when `weekday` is not a regular work day.
    pub fn is_rest_day(&self, weekday: Weekday) -> bool {
        !self
            .regular_work_days
            .contains(&weekday.num_days_from_monday())
    }
}

/// Accepts either a list of day numbers or the backend's comma-separated string.
fn deserialize_work_days<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WorkDays {
        List(Vec<u32>),
        Csv(String),
    }

    let days = match WorkDays::deserialize(deserializer)? {
        WorkDays::List(days) => days,
        WorkDays::Csv(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().map_err(serde::de::Error::custom))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if let Some(bad) = days.iter().find(|d| **d > 6) {
        return Err(serde::de::Error::custom(format!(
            "work day {} is outside 0..=6",
            bad
        )));
    }
    Ok(days)
}
