//! Stub data source backed by the configured dataset.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DataSource;
use crate::config::PayrollDataset;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, Branch, Business, Employee, Holiday, PayrollCycle, PayrollPolicy, Position,
    SalaryComponent, SalaryRate, SalaryStructure, WorkSchedule,
};

const SOURCE_NAME: &str = "fallback";

/// [`DataSource`] serving an in-memory [`PayrollDataset`], usually the one
/// loaded from `fallback.yaml`. It never fails.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    data: Arc<PayrollDataset>,
}

impl FallbackSource {
    /// Wraps a dataset.
    pub fn new(data: PayrollDataset) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Wraps a dataset that is already shared.
    pub fn from_shared(data: Arc<PayrollDataset>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for FallbackSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn businesses(&self) -> EngineResult<Vec<Business>> {
        Ok(self.data.businesses.clone())
    }

    async fn branches(&self) -> EngineResult<Vec<Branch>> {
        Ok(self.data.branches.clone())
    }

    async fn positions(&self) -> EngineResult<Vec<Position>> {
        Ok(self.data.positions.clone())
    }

    async fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.data.employees.clone())
    }

    async fn policies(&self) -> EngineResult<Vec<PayrollPolicy>> {
        Ok(self.data.policies.clone())
    }

    async fn holidays(&self) -> EngineResult<Vec<Holiday>> {
        Ok(self.data.holidays.clone())
    }

    async fn components(&self) -> EngineResult<Vec<SalaryComponent>> {
        Ok(self.data.components.clone())
    }

    async fn structures(&self) -> EngineResult<Vec<SalaryStructure>> {
        Ok(self.data.structures.clone())
    }

    async fn cycles(&self) -> EngineResult<Vec<PayrollCycle>> {
        Ok(self.data.cycles.clone())
    }

    async fn salary_rates(&self) -> EngineResult<Vec<SalaryRate>> {
        Ok(self.data.salary_rates.clone())
    }

    async fn schedules(&self) -> EngineResult<Vec<WorkSchedule>> {
        Ok(self.data.schedules.clone())
    }

    async fn attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .data
            .attendance
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: u32) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: 1,
            date: date(2025, 3, day),
            time_in: None,
            time_out: None,
            status: AttendanceStatus::Absent,
        }
    }

    #[tokio::test]
    async fn test_attendance_is_limited_to_range() {
        let source = FallbackSource::new(PayrollDataset {
            attendance: vec![record(1), record(15), record(16)],
            ..Default::default()
        });

        let records = source
            .attendance(date(2025, 3, 1), date(2025, 3, 15))
            .await
            .unwrap();
        let days: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![date(2025, 3, 1), date(2025, 3, 15)]);
    }

    #[tokio::test]
    async fn test_dataset_collects_every_collection() {
        let source = FallbackSource::new(PayrollDataset {
            businesses: vec![Business {
                id: 1,
                name: "Acme".to_string(),
            }],
            attendance: vec![record(2), record(28)],
            ..Default::default()
        });

        let dataset = source
            .dataset(date(2025, 3, 1), date(2025, 3, 15))
            .await
            .unwrap();
        assert_eq!(dataset.businesses.len(), 1);
        assert_eq!(dataset.attendance.len(), 1);
        assert_eq!(source.name(), "fallback");
    }
}
