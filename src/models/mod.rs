//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.
//! Models mirror the JSON shapes served by the payroll backend so they can be
//! deserialized directly from REST responses and YAML fixtures.

mod attendance;
mod audit;
mod cycle;
mod employee;
mod holiday;
mod organization;
mod payroll;
mod payslip;
mod policy;
mod salary;

pub use attendance::{AttendanceRecord, AttendanceStatus, WorkSchedule};
pub use audit::{AuditStep, AuditWarning};
pub use cycle::{CycleType, Cutoff, PayrollCycle};
pub use employee::{Employee, SalaryRate};
pub use holiday::{Holiday, HolidayType};
pub use organization::{
    Branch, BranchId, Business, BusinessId, ComponentId, CycleId, EmployeeId, PolicyId, Position,
    PositionId,
};
pub use payroll::{PayrollGeneration, PayrollRecord, RecordSource};
pub use payslip::{PayslipLine, PayslipSummary, PayslipView};
pub use policy::{PayrollPolicy, PolicyRates};
pub use salary::{ComponentType, SalaryComponent, SalaryStructure};
