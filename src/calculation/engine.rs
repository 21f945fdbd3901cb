//! Payroll generation.
//!
//! This module ties the individual calculators together. Generating payroll
//! for one employee, month and cycle type produces:
//!
//! 1. Structure lines for the employee's position (mandatory codes left out
//!    when mandatories are computed)
//! 2. Government mandatories allocated to the cycle, when enabled
//! 3. Time-based lines from attendance inside the cycle's cutoff window
//!
//! Missing salary components and schedules are reported as warnings and the
//! affected lines skipped; missing assignments, cycles and salary rates fail
//! the employee.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cutoff::{cutoff_for_month, find_active_cycle};
use super::mandatories::{allocate_to_cycle, compute_mandatories_monthly, MANDATORY_CODES};
use super::money::round_money;
use super::salary_rate::salary_for_date;
use super::structure::{position_lines, regular_monthly_gross};
use super::time_analysis::analyze_period;
use crate::config::{ConfigLoader, MandatoryRates, PayrollDataset};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditWarning, Branch, ComponentType, CycleType, Employee,
    EmployeeId, Holiday, PayrollCycle, PayrollGeneration, PayrollPolicy, PayrollRecord,
    PolicyRates, RecordSource, SalaryComponent, SalaryRate, SalaryStructure, WorkSchedule,
};
use crate::policy::resolve_or_default;

/// Component code of basic pay.
pub const BASIC_CODE: &str = "BASIC";
/// Component code of the 13th-month pay line.
pub const THIRTEENTH_MONTH_CODE: &str = "13TH";

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Borrowed views of the records generation reads.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInputs<'a> {
    /// Branches, to find the employee's business.
    pub branches: &'a [Branch],
    /// Payroll policies.
    pub policies: &'a [PayrollPolicy],
    /// Payroll cycles.
    pub cycles: &'a [PayrollCycle],
    /// Salary rate history.
    pub salary_rates: &'a [SalaryRate],
    /// Salary components.
    pub components: &'a [SalaryComponent],
    /// Salary structure lines.
    pub structures: &'a [SalaryStructure],
    /// Branch work schedules.
    pub schedules: &'a [WorkSchedule],
    /// Attendance records; other employees' records are ignored.
    pub attendance: &'a [AttendanceRecord],
    /// Holidays.
    pub holidays: &'a [Holiday],
}

impl<'a> From<&'a PayrollDataset> for GenerationInputs<'a> {
    fn from(data: &'a PayrollDataset) -> Self {
        Self {
            branches: &data.branches,
            policies: &data.policies,
            cycles: &data.cycles,
            salary_rates: &data.salary_rates,
            components: &data.components,
            structures: &data.structures,
            schedules: &data.schedules,
            attendance: &data.attendance,
            holidays: &data.holidays,
        }
    }
}

/// Engine-wide switches and defaults for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Compute government mandatories instead of reading them from the structure.
    pub use_mandatories: bool,
    /// Rates used for businesses without a policy.
    pub default_policy: PolicyRates,
    /// Mandatory contribution tables.
    pub mandatory_rates: MandatoryRates,
}

impl GenerationOptions {
    /// Options as configured in the loaded settings.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self {
            use_mandatories: config.settings().use_mandatories,
            default_policy: config.default_policy(),
            mandatory_rates: config.mandatory_rates().clone(),
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_mandatories: false,
            default_policy: PolicyRates::default(),
            mandatory_rates: MandatoryRates::default(),
        }
    }
}

fn component_by_code<'a>(
    components: &'a [SalaryComponent],
    code: &str,
) -> Option<&'a SalaryComponent> {
    components.iter().find(|c| c.has_code(code))
}

fn missing_component(code: &str) -> AuditWarning {
    AuditWarning::new(
        "MISSING_COMPONENT",
        format!("No salary component with code {} is configured; line skipped", code),
        "warning",
    )
}

fn record(
    employee_id: EmployeeId,
    month: NaiveDate,
    component: &SalaryComponent,
    amount: Decimal,
    source: RecordSource,
) -> PayrollRecord {
    PayrollRecord {
        employee_id,
        month,
        component_id: component.id,
        code: component.code.clone(),
        component_name: component.name.clone(),
        component_type: component.component_type,
        amount,
        source,
    }
}

/// Generates payroll records for one employee.
///
/// `month` is normalized to its first day.
///
/// # Errors
///
/// - [`EngineError::UnassignedEmployee`] without a position or a known branch
/// - [`EngineError::CycleNotFound`] without an active cycle of `cycle_type`
/// - [`EngineError::SalaryRateNotFound`] without a salary rate for the month
/// - [`EngineError::Configuration`] when the policy has zero divisors
pub fn generate_payroll(
    employee: &Employee,
    inputs: &GenerationInputs<'_>,
    month: NaiveDate,
    cycle_type: CycleType,
    options: &GenerationOptions,
) -> EngineResult<PayrollGeneration> {
    let month = month.with_day(1).unwrap_or(month);

    let position_id = employee
        .position_id
        .ok_or_else(|| EngineError::UnassignedEmployee {
            employee_id: employee.id,
            message: "no position assigned".to_string(),
        })?;
    let branch = employee
        .branch_id
        .and_then(|id| inputs.branches.iter().find(|b| b.id == id))
        .ok_or_else(|| EngineError::UnassignedEmployee {
            employee_id: employee.id,
            message: "no branch assigned".to_string(),
        })?;
    let business_id = branch.business_id;

    let resolved = resolve_or_default(inputs.policies, business_id, &options.default_policy);
    let rates = &resolved.rates;
    let mut warnings = resolved.warnings.clone();

    let cycle = find_active_cycle(inputs.cycles, business_id, cycle_type)?;
    let cutoff = cutoff_for_month(month, cycle)?;

    let salary = salary_for_date(inputs.salary_rates, employee.id, month, 1)?;
    let base_salary = salary.amount;
    let mut audit_steps = vec![salary.audit_step];

    debug!(
        employee_id = employee.id,
        business_id = business_id,
        cycle = %cycle_type,
        cutoff_start = %cutoff.start,
        cutoff_end = %cutoff.end,
        "Generating payroll"
    );

    let excluded: &[&str] = if options.use_mandatories {
        &MANDATORY_CODES
    } else {
        &[]
    };
    let mut records: Vec<PayrollRecord> = position_lines(
        inputs.structures,
        inputs.components,
        position_id,
        base_salary,
        excluded,
    )?
    .into_iter()
    .map(|line| {
        record(
            employee.id,
            month,
            line.component,
            line.amount,
            RecordSource::Structure,
        )
    })
    .collect();

    if options.use_mandatories {
        let gross = regular_monthly_gross(
            inputs.structures,
            inputs.components,
            position_id,
            base_salary,
        )?;
        let next_step = audit_steps.len() as u32 + 1;
        let monthly = compute_mandatories_monthly(gross, &options.mandatory_rates, next_step);
        audit_steps.push(monthly.audit_step);

        for (code, amount) in allocate_to_cycle(&monthly.monthly, cycle_type).by_code() {
            match component_by_code(inputs.components, code) {
                Some(component) => records.push(record(
                    employee.id,
                    month,
                    component,
                    amount,
                    RecordSource::Mandatory,
                )),
                None => warnings.push(missing_component(code)),
            }
        }
    }

    match inputs.schedules.iter().find(|s| s.branch_id == branch.id) {
        Some(schedule) => {
            let attendance: Vec<AttendanceRecord> = inputs
                .attendance
                .iter()
                .filter(|r| r.employee_id == employee.id)
                .cloned()
                .collect();
            let next_step = audit_steps.len() as u32 + 1;
            let analysis = analyze_period(
                &attendance,
                schedule,
                rates,
                inputs.holidays,
                &cutoff,
                base_salary,
                next_step,
            )?;
            audit_steps.extend(analysis.audit_steps);

            for total in analysis.totals.iter().filter(|t| !t.amount.is_zero()) {
                match component_by_code(inputs.components, total.code.as_str()) {
                    Some(component) => records.push(record(
                        employee.id,
                        month,
                        component,
                        total.amount,
                        RecordSource::TimeAnalysis,
                    )),
                    None => warnings.push(missing_component(total.code.as_str())),
                }
            }
        }
        None => {
            warn!(
                employee_id = employee.id,
                branch_id = branch.id,
                "No work schedule for branch, skipping time analysis"
            );
            warnings.push(AuditWarning::new(
                "NO_SCHEDULE",
                format!(
                    "Branch {} has no work schedule; attendance was not analyzed",
                    branch.name
                ),
                "warning",
            ));
        }
    }

    Ok(PayrollGeneration {
        employee_id: employee.id,
        employee_name: employee.full_name(),
        month,
        cycle_type,
        cutoff,
        base_salary_used: base_salary,
        records,
        audit_steps,
        warnings,
    })
}

/// Outcome of one employee in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Payroll was generated.
    Success {
        /// The generated payroll.
        generation: PayrollGeneration,
    },
    /// Generation failed for this employee only.
    Error {
        /// The employee.
        employee_id: EmployeeId,
        /// Why it failed.
        error: String,
    },
}

/// The result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchGeneration {
    /// First day of the payroll month.
    pub month: NaiveDate,
    /// The cycle generated.
    pub cycle_type: CycleType,
    /// Number of employees attempted.
    pub processed: usize,
    /// Inactive employees that were left out.
    pub skipped: Vec<EmployeeId>,
    /// Per-employee outcomes in request order.
    pub results: Vec<BatchOutcome>,
}

impl BatchGeneration {
    /// Number of successful employees.
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, BatchOutcome::Success { .. }))
            .count()
    }
}

/// Generates payroll for several employees.
///
/// `employee_ids` selects employees from `employees`; unknown ids produce an
/// error outcome and inactive employees are skipped. A failure never stops
/// the rest of the batch.
pub fn generate_batch(
    employees: &[Employee],
    employee_ids: &[EmployeeId],
    inputs: &GenerationInputs<'_>,
    month: NaiveDate,
    cycle_type: CycleType,
    options: &GenerationOptions,
) -> BatchGeneration {
    let month = month.with_day(1).unwrap_or(month);
    let mut skipped = Vec::new();
    let mut results = Vec::new();

    for &employee_id in employee_ids {
        let Some(employee) = employees.iter().find(|e| e.id == employee_id) else {
            results.push(BatchOutcome::Error {
                employee_id,
                error: EngineError::EmployeeNotFound { employee_id }.to_string(),
            });
            continue;
        };
        if !employee.active {
            skipped.push(employee_id);
            continue;
        }

        match generate_payroll(employee, inputs, month, cycle_type, options) {
            Ok(generation) => results.push(BatchOutcome::Success { generation }),
            Err(e) => {
                warn!(employee_id = employee_id, error = %e, "Payroll generation failed");
                results.push(BatchOutcome::Error {
                    employee_id,
                    error: e.to_string(),
                });
            }
        }
    }

    let batch = BatchGeneration {
        month,
        cycle_type,
        processed: results.len(),
        skipped,
        results,
    };
    info!(
        month = %batch.month,
        cycle = %cycle_type,
        processed = batch.processed,
        succeeded = batch.succeeded(),
        skipped = batch.skipped.len(),
        "Batch payroll generated"
    );
    batch
}

/// 13th-month pay for one employee and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirteenthMonth {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The calendar year.
    pub year: i32,
    /// Sum of BASIC lines in the year.
    pub total_basic: Decimal,
    /// `total_basic / 12`, rounded to cents.
    pub amount: Decimal,
    /// How the amount was derived.
    pub audit_step: AuditStep,
}

impl ThirteenthMonth {
    /// The payroll line for the pay, dated December of the year.
    pub fn to_record(&self, component: &SalaryComponent) -> Option<PayrollRecord> {
        let december = NaiveDate::from_ymd_opt(self.year, 12, 1)?;
        Some(PayrollRecord {
            employee_id: self.employee_id,
            month: december,
            component_id: component.id,
            code: component.code.clone(),
            component_name: component.name.clone(),
            component_type: ComponentType::Earning,
            amount: self.amount,
            source: RecordSource::ThirteenthMonth,
        })
    }
}

/// Computes 13th-month pay from an employee's generated records.
///
/// Only BASIC lines dated in `year` count; earlier 13th-month lines are
/// ignored.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::thirteenth_month_pay;
/// use payroll_engine::models::{ComponentType, PayrollRecord, RecordSource};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let records: Vec<PayrollRecord> = (1..=12)
///     .map(|m| PayrollRecord {
///         employee_id: 1,
///         month: NaiveDate::from_ymd_opt(2025, m, 1).unwrap(),
///         component_id: 1,
///         code: Some("BASIC".to_string()),
///         component_name: "Basic Salary".to_string(),
///         component_type: ComponentType::Earning,
///         amount: Decimal::new(30000, 0),
///         source: RecordSource::Structure,
///     })
///     .collect();
///
/// let pay = thirteenth_month_pay(&records, 1, 2025);
/// assert_eq!(pay.amount, Decimal::new(3000000, 2));
/// ```
pub fn thirteenth_month_pay(
    records: &[PayrollRecord],
    employee_id: EmployeeId,
    year: i32,
) -> ThirteenthMonth {
    let basic: Vec<&PayrollRecord> = records
        .iter()
        .filter(|r| {
            r.employee_id == employee_id
                && r.month.year() == year
                && r.source != RecordSource::ThirteenthMonth
                && r.code.as_deref() == Some(BASIC_CODE)
        })
        .collect();

    let total_basic: Decimal = basic.iter().map(|r| r.amount).sum();
    let amount = round_money(total_basic / MONTHS_PER_YEAR);

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "thirteenth_month".to_string(),
        rule_name: "13th Month Pay".to_string(),
        input: serde_json::json!({
            "year": year,
            "basic_lines": basic.len(),
            "total_basic": total_basic.to_string()
        }),
        output: serde_json::json!({ "amount": amount.to_string() }),
        reasoning: format!(
            "{} BASIC line(s) in {} totalling {} / 12 = {}",
            basic.len(),
            year,
            total_basic,
            amount
        ),
    };

    ThirteenthMonth {
        employee_id,
        year,
        total_basic,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, PositionId};
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn component(id: u64, code: &str, kind: ComponentType) -> SalaryComponent {
        SalaryComponent {
            id,
            name: code.to_string(),
            code: Some(code.to_string()),
            component_type: kind,
            is_taxable: kind == ComponentType::Earning,
        }
    }

    fn structure(position_id: PositionId, component_id: u64, amount: &str, pct: bool) -> SalaryStructure {
        SalaryStructure {
            position_id,
            component_id,
            amount: dec(amount),
            is_percentage: pct,
        }
    }

    fn employee(id: EmployeeId, active: bool) -> Employee {
        Employee {
            id,
            first_name: "Bob".to_string(),
            last_name: "Builder".to_string(),
            email: None,
            phone: None,
            position_id: Some(1),
            branch_id: Some(1),
            hire_date: date(2022, 1, 1),
            active,
        }
    }

    fn attendance(day: u32, time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: 1,
            date: date(2025, 3, day),
            time_in,
            time_out,
            status: AttendanceStatus::Present,
        }
    }

    struct Fixture {
        branches: Vec<Branch>,
        policies: Vec<PayrollPolicy>,
        cycles: Vec<PayrollCycle>,
        salary_rates: Vec<SalaryRate>,
        components: Vec<SalaryComponent>,
        structures: Vec<SalaryStructure>,
        schedules: Vec<WorkSchedule>,
        attendance: Vec<AttendanceRecord>,
        holidays: Vec<Holiday>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                branches: vec![Branch {
                    id: 1,
                    business_id: 1,
                    name: "Main".to_string(),
                }],
                policies: vec![PayrollPolicy {
                    id: Some(1),
                    business_id: 1,
                    grace_minutes: 10,
                    standard_working_days: dec("22"),
                    late_penalty_per_minute: dec("2.00"),
                    undertime_penalty_per_minute: dec("2.00"),
                    absent_penalty_per_day: Decimal::ZERO,
                    ot_multiplier: dec("1.25"),
                    rest_day_multiplier: dec("1.30"),
                    holiday_regular_multiplier: dec("2.00"),
                    holiday_special_multiplier: dec("1.30"),
                }],
                cycles: vec![PayrollCycle {
                    id: 1,
                    business_id: 1,
                    name: "First half".to_string(),
                    cycle_type: CycleType::Semi1,
                    start_day: 1,
                    end_day: 15,
                    is_active: true,
                }],
                salary_rates: vec![SalaryRate {
                    employee_id: 1,
                    amount: dec("44000"),
                    start_date: date(2024, 1, 1),
                    end_date: None,
                }],
                components: vec![
                    component(1, "BASIC", ComponentType::Earning),
                    component(2, "RICE", ComponentType::Earning),
                    component(3, "SSS_EE", ComponentType::Deduction),
                    component(4, "LATE", ComponentType::Deduction),
                    component(5, "OT", ComponentType::Earning),
                    component(6, "PHIC_EE", ComponentType::Deduction),
                    component(7, "HDMF_EE", ComponentType::Deduction),
                    component(8, "TAX_WHT", ComponentType::Deduction),
                ],
                structures: vec![
                    structure(1, 1, "50", true),
                    structure(1, 2, "1000", false),
                    structure(1, 3, "500", false),
                ],
                schedules: vec![WorkSchedule {
                    branch_id: 1,
                    time_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    time_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                    grace_minutes: 0,
                    break_hours: dec("1"),
                    min_hours_required: dec("4"),
                    regular_work_days: vec![0, 1, 2, 3, 4],
                }],
                attendance: vec![
                    // Monday 3 March: 30 minutes late
                    attendance(3, time(8, 30), time(17, 0)),
                    // Tuesday 4 March: two hours overtime
                    attendance(4, time(8, 0), time(19, 0)),
                    // Monday 17 March: outside the first-half cutoff
                    attendance(17, time(9, 0), time(17, 0)),
                ],
                holidays: vec![],
            }
        }

        fn inputs(&self) -> GenerationInputs<'_> {
            GenerationInputs {
                branches: &self.branches,
                policies: &self.policies,
                cycles: &self.cycles,
                salary_rates: &self.salary_rates,
                components: &self.components,
                structures: &self.structures,
                schedules: &self.schedules,
                attendance: &self.attendance,
                holidays: &self.holidays,
            }
        }
    }

    fn amount_of(generation: &PayrollGeneration, code: &str) -> Option<Decimal> {
        generation
            .records
            .iter()
            .find(|r| r.code.as_deref() == Some(code))
            .map(|r| r.amount)
    }

    #[test]
    fn test_structure_and_time_lines_without_mandatories() {
        let fixture = Fixture::new();
        let generation = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 20),
            CycleType::Semi1,
            &GenerationOptions::default(),
        )
        .unwrap();

        assert_eq!(generation.month, date(2025, 3, 1));
        assert_eq!(generation.cutoff.end, date(2025, 3, 15));
        assert_eq!(generation.base_salary_used, dec("44000"));
        // 50% of 44000
        assert_eq!(amount_of(&generation, "BASIC"), Some(dec("22000.00")));
        assert_eq!(amount_of(&generation, "RICE"), Some(dec("1000.00")));
        // Structure SSS line kept when mandatories are off
        assert_eq!(amount_of(&generation, "SSS_EE"), Some(dec("500.00")));
        // 30 minutes late is past the 10 minute grace; all 30 are charged at 2.00
        assert_eq!(amount_of(&generation, "LATE"), Some(dec("60.00")));
        // 44000 / 22 / 8 = 250 × 1.25 × 2h
        assert_eq!(amount_of(&generation, "OT"), Some(dec("625.00")));
        assert!(generation.warnings.is_empty());
        assert!(generation.audit_steps.iter().any(|s| s.rule_id == "time_late"));
    }

    #[test]
    fn test_mandatories_replace_structure_codes() {
        let fixture = Fixture::new();
        let options = GenerationOptions {
            use_mandatories: true,
            ..GenerationOptions::default()
        };
        let generation = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &options,
        )
        .unwrap();

        let sss: Vec<_> = generation
            .records
            .iter()
            .filter(|r| r.code.as_deref() == Some("SSS_EE"))
            .collect();
        assert_eq!(sss.len(), 1);
        assert_eq!(sss[0].source, RecordSource::Mandatory);
        // Regular gross 23000 → SSS 1035 monthly, half per semi cycle
        assert_eq!(sss[0].amount, dec("517.50"));
        assert!(generation.audit_steps.iter().any(|s| s.rule_id == "mandatories_monthly"));
    }

    #[test]
    fn test_missing_component_becomes_warning() {
        let mut fixture = Fixture::new();
        fixture.components.retain(|c| !c.has_code("OT"));
        let generation = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &GenerationOptions::default(),
        )
        .unwrap();

        assert_eq!(amount_of(&generation, "OT"), None);
        assert_eq!(generation.warnings[0].code, "MISSING_COMPONENT");
    }

    #[test]
    fn test_missing_schedule_skips_time_analysis() {
        let mut fixture = Fixture::new();
        fixture.schedules.clear();
        let generation = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &GenerationOptions::default(),
        )
        .unwrap();

        assert_eq!(amount_of(&generation, "LATE"), None);
        assert_eq!(generation.warnings[0].code, "NO_SCHEDULE");
    }

    #[test]
    fn test_default_policy_warning_is_carried() {
        let mut fixture = Fixture::new();
        fixture.policies.clear();
        let generation = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &GenerationOptions::default(),
        )
        .unwrap();

        assert!(generation.warnings.iter().any(|w| w.code == "DEFAULT_POLICY"));
    }

    #[test]
    fn test_unassigned_and_missing_cycle_fail() {
        let fixture = Fixture::new();
        let mut no_position = employee(1, true);
        no_position.position_id = None;
        let error = generate_payroll(
            &no_position,
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &GenerationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(error, EngineError::UnassignedEmployee { .. }));

        let error = generate_payroll(
            &employee(1, true),
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Monthly,
            &GenerationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(error, EngineError::CycleNotFound { .. }));
    }

    #[test]
    fn test_batch_reports_each_employee() {
        let fixture = Fixture::new();
        let employees = vec![employee(1, true), employee(2, true), employee(3, false)];

        let batch = generate_batch(
            &employees,
            &[1, 2, 3, 99],
            &fixture.inputs(),
            date(2025, 3, 1),
            CycleType::Semi1,
            &GenerationOptions::default(),
        );

        assert_eq!(batch.processed, 3);
        assert_eq!(batch.skipped, vec![3]);
        assert_eq!(batch.succeeded(), 1);
        // Employee 2 has no salary rate
        assert!(matches!(
            &batch.results[1],
            BatchOutcome::Error { employee_id: 2, error } if error.contains("No salary rate")
        ));
        assert!(matches!(
            &batch.results[2],
            BatchOutcome::Error { employee_id: 99, .. }
        ));
    }

    #[test]
    fn test_batch_outcome_serializes_status_tag() {
        let outcome = BatchOutcome::Error {
            employee_id: 4,
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["employee_id"], 4);
    }

    fn basic(month: u32, year: i32, amount: &str, source: RecordSource) -> PayrollRecord {
        PayrollRecord {
            employee_id: 1,
            month: date(year, month, 1),
            component_id: 1,
            code: Some(BASIC_CODE.to_string()),
            component_name: "Basic".to_string(),
            component_type: ComponentType::Earning,
            amount: dec(amount),
            source,
        }
    }

    #[test]
    fn test_thirteenth_month_counts_only_basic_in_year() {
        let mut records: Vec<PayrollRecord> = (1..=6)
            .map(|m| basic(m, 2025, "20000.00", RecordSource::Structure))
            .collect();
        records.push(basic(12, 2024, "20000.00", RecordSource::Structure));
        records.push(basic(12, 2025, "9999.00", RecordSource::ThirteenthMonth));
        let mut rice = basic(3, 2025, "1000.00", RecordSource::Structure);
        rice.code = Some("RICE".to_string());
        records.push(rice);

        let pay = thirteenth_month_pay(&records, 1, 2025);
        assert_eq!(pay.total_basic, dec("120000.00"));
        assert_eq!(pay.amount, dec("10000.00"));
    }

    #[test]
    fn test_thirteenth_month_rounds_to_cents() {
        let records = vec![basic(1, 2025, "10000.00", RecordSource::Structure)];
        let pay = thirteenth_month_pay(&records, 1, 2025);
        // 10000 / 12 = 833.333...
        assert_eq!(pay.amount, dec("833.33"));

        let line = pay
            .to_record(&component(14, THIRTEENTH_MONTH_CODE, ComponentType::Earning))
            .unwrap();
        assert_eq!(line.month, date(2025, 12, 1));
        assert_eq!(line.source, RecordSource::ThirteenthMonth);
    }

    #[test]
    fn test_inputs_from_dataset() {
        let dataset = PayrollDataset::default();
        let inputs = GenerationInputs::from(&dataset);
        assert!(inputs.branches.is_empty());
    }
}
