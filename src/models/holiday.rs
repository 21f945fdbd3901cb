//! Holiday model.
//!
//! Holidays select the premium multiplier applied to hours worked on them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayType {
    /// Regular holiday.
    Regular,
    /// Special non-working holiday.
    Special,
}

impl HolidayType {
    /// The salary component code used for premiums on this kind of holiday.
    pub fn component_code(&self) -> &'static str {
        match self {
            HolidayType::Regular => "HOLIDAY_REGULAR",
            HolidayType::Special => "HOLIDAY_SPECIAL",
        }
    }
}

fn default_multiplier() -> Decimal {
    Decimal::new(200, 2)
}

fn default_national() -> bool {
    true
}

/// A dated holiday.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Holiday, HolidayType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let holiday = Holiday {
///     name: "Independence Day".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
///     holiday_type: HolidayType::Regular,
///     multiplier: Decimal::new(200, 2),
///     is_national: true,
/// };
/// assert_eq!(holiday.holiday_type.component_code(), "HOLIDAY_REGULAR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Name of the holiday.
    pub name: String,
    /// The date of the holiday.
    pub date: NaiveDate,
    /// Regular or special.
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    /// The holiday's own pay multiplier.
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    /// Whether the holiday is national rather than local.
    #[serde(default = "default_national")]
    pub is_national: bool,
}
