//! Payroll preview engine.
//!
//! This crate computes payroll previews and payslips for Philippine payroll
//! rules: net pay from basic salary and days worked, per-business payroll
//! policies, cycle cutoffs, attendance deductions and premiums, government
//! mandatories and 13th-month pay. Records are read from the payroll REST
//! backend or, when it is unreachable, from a configured stub dataset.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod source;
pub mod telemetry;
