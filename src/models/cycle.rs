//! Payroll cycle model and concrete cutoff windows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BusinessId, CycleId};

/// The recurrence of a payroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleType {
    /// Every week.
    #[serde(rename = "WEEKLY")]
    Weekly,
    /// Every other week.
    #[serde(rename = "BI_WEEKLY", alias = "BI-WEEKLY")]
    BiWeekly,
    /// Once a month.
    #[serde(rename = "MONTHLY")]
    Monthly,
    /// First half of a semi-monthly payroll.
    #[serde(rename = "SEMI_1")]
    Semi1,
    /// Second half of a semi-monthly payroll.
    #[serde(rename = "SEMI_2")]
    Semi2,
}

impl CycleType {
    /// The backend code for the cycle type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleType::Weekly => "WEEKLY",
            CycleType::BiWeekly => "BI_WEEKLY",
            CycleType::Monthly => "MONTHLY",
            CycleType::Semi1 => "SEMI_1",
            CycleType::Semi2 => "SEMI_2",
        }
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CycleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "WEEKLY" => Ok(CycleType::Weekly),
            "BI_WEEKLY" => Ok(CycleType::BiWeekly),
            "MONTHLY" => Ok(CycleType::Monthly),
            "SEMI_1" => Ok(CycleType::Semi1),
            "SEMI_2" => Ok(CycleType::Semi2),
            other => Err(format!("unknown cycle type '{}'", other)),
        }
    }
}

/// A business's recurring payroll period definition.
///
/// `start_day`/`end_day` are days of the month; an `end_day` before the
/// `start_day` means the period wraps into the following month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCycle {
    /// Unique identifier for the cycle.
    pub id: CycleId,
    /// The owning business.
    #[serde(rename = "business")]
    pub business_id: BusinessId,
    /// Display name.
    pub name: String,
    /// Recurrence.
    pub cycle_type: CycleType,
    /// First day of the period.
    pub start_day: u32,
    /// Last day of the period.
    pub end_day: u32,
    /// Whether the cycle is in use.
    #[serde(default)]
    pub is_active: bool,
}

/// The concrete inclusive date range of one cycle occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutoff {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl Cutoff {
    /// Returns true if `date` falls within the cutoff (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
