//! Data sources for payroll records.
//!
//! Every payroll computation reads its inputs through the [`DataSource`]
//! trait. [`RemoteSource`] talks to the payroll REST backend,
//! [`FallbackSource`] serves the stub dataset from configuration, and
//! [`DataGateway`] picks between them according to a [`SourcePolicy`],
//! reporting where the data came from.

mod fallback;
mod gateway;
mod remote;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PayrollDataset;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, AuditWarning, Branch, Business, Employee, Holiday, PayrollCycle,
    PayrollPolicy, Position, SalaryComponent, SalaryRate, SalaryStructure, WorkSchedule,
};

pub use fallback::FallbackSource;
pub use gateway::DataGateway;
pub use remote::{EmailDispatch, PayslipEmailRequest, RemoteSource};

/// Read access to the records a payroll run needs.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// All businesses.
    async fn businesses(&self) -> EngineResult<Vec<Business>>;

    /// All branches.
    async fn branches(&self) -> EngineResult<Vec<Branch>>;

    /// All positions.
    async fn positions(&self) -> EngineResult<Vec<Position>>;

    /// All employees, active or not.
    async fn employees(&self) -> EngineResult<Vec<Employee>>;

    /// Payroll policies, at most one per business.
    async fn policies(&self) -> EngineResult<Vec<PayrollPolicy>>;

    /// Holidays.
    async fn holidays(&self) -> EngineResult<Vec<Holiday>>;

    /// Salary components.
    async fn components(&self) -> EngineResult<Vec<SalaryComponent>>;

    /// Salary structure lines for all positions.
    async fn structures(&self) -> EngineResult<Vec<SalaryStructure>>;

    /// Payroll cycles for all businesses.
    async fn cycles(&self) -> EngineResult<Vec<PayrollCycle>>;

    /// Salary rate history for all employees.
    async fn salary_rates(&self) -> EngineResult<Vec<SalaryRate>>;

    /// Branch work schedules.
    async fn schedules(&self) -> EngineResult<Vec<WorkSchedule>>;

    /// Attendance records dated within `start..=end`.
    async fn attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Everything a payroll run for `start..=end` reads, fetched concurrently.
    async fn dataset(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<PayrollDataset> {
        let (businesses, branches, positions, employees, policies, holidays) = tokio::try_join!(
            self.businesses(),
            self.branches(),
            self.positions(),
            self.employees(),
            self.policies(),
            self.holidays(),
        )?;
        let (components, structures, cycles, salary_rates, schedules, attendance) = tokio::try_join!(
            self.components(),
            self.structures(),
            self.cycles(),
            self.salary_rates(),
            self.schedules(),
            self.attendance(start, end),
        )?;

        Ok(PayrollDataset {
            businesses,
            branches,
            positions,
            employees,
            policies,
            holidays,
            components,
            structures,
            cycles,
            salary_rates,
            schedules,
            attendance,
        })
    }
}

/// Where a piece of data was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataOrigin {
    /// The payroll backend.
    Remote,
    /// The configured stub dataset.
    Fallback,
}

/// Data tagged with its origin.
///
/// `warning` is set when the gateway degraded to fallback data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    /// The data itself.
    pub data: T,
    /// Which source produced it.
    pub origin: DataOrigin,
    /// Present when the remote source failed and fallback data was served.
    pub warning: Option<AuditWarning>,
}

impl<T> Sourced<T> {
    /// Applies `f` to the data, keeping origin and warning.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            origin: self.origin,
            warning: self.warning,
        }
    }
}

/// Which source the gateway reads from.
///
/// # Example
///
/// ```
/// use payroll_engine::source::SourcePolicy;
///
/// let policy: SourcePolicy = "remote_with_fallback".parse().unwrap();
/// assert_eq!(policy, SourcePolicy::RemoteWithFallback);
/// assert_eq!(policy.to_string(), "REMOTE_WITH_FALLBACK");
/// assert!("cache".parse::<SourcePolicy>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourcePolicy {
    /// Remote only; failures are returned to the caller.
    Remote,
    /// Fallback dataset only.
    Fallback,
    /// Remote first, fallback dataset with a warning when the remote fails.
    RemoteWithFallback,
}

impl SourcePolicy {
    /// The policy name as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            SourcePolicy::Remote => "REMOTE",
            SourcePolicy::Fallback => "FALLBACK",
            SourcePolicy::RemoteWithFallback => "REMOTE_WITH_FALLBACK",
        }
    }
}

impl fmt::Display for SourcePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourcePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "REMOTE" => Ok(SourcePolicy::Remote),
            "FALLBACK" => Ok(SourcePolicy::Fallback),
            "REMOTE_WITH_FALLBACK" => Ok(SourcePolicy::RemoteWithFallback),
            other => Err(format!(
                "must be one of 'remote', 'fallback', or 'remote_with_fallback' (got {other})"
            )),
        }
    }
}
