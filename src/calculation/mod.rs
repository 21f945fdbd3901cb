//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions: money rounding and
//! formatting, the net pay preview calculator, payslip assembly, payroll
//! cycle cutoffs, salary rate lookup, salary structure amounts, attendance
//! time analysis, government mandatories and payroll generation.

mod cutoff;
mod engine;
mod mandatories;
mod money;
mod net_pay;
mod payslip;
mod salary_rate;
mod structure;
mod time_analysis;

pub use cutoff::{
    MAX_CYCLE_DAY, cutoff_for_month, date_in_cycle, days_in_month, find_active_cycle,
    normalize_month, validate_cycle_days,
};
pub use engine::{
    BASIC_CODE, BatchGeneration, BatchOutcome, GenerationInputs, GenerationOptions,
    THIRTEENTH_MONTH_CODE, ThirteenthMonth, generate_batch, generate_payroll,
    thirteenth_month_pay,
};
pub use mandatories::{
    HDMF_EE, MANDATORY_CODES, Mandatories, MandatoriesResult, PHIC_EE, SSS_EE, TAX_WHT,
    allocate_to_cycle, compute_mandatories_monthly, cycle_fraction, withholding_tax_monthly,
};
pub use money::{
    MONEY_SCALE, PESO_SIGN, checked_product, checked_quotient, checked_total, format_peso,
    has_at_most_two_decimals, max_digits_before, money_from_f64, round_money, to_money,
    to_money_f64,
};
pub use net_pay::{
    NetPayInput, NetPayResult, calculate_net_pay, recalculate_all, validate_net_pay_input,
};
pub use payslip::{assemble_from_records, assemble_payslip};
pub use salary_rate::{SalaryLookupResult, salary_for_date, validate_salary_rate};
pub use structure::{StructureLine, component_amount, position_lines, regular_monthly_gross};
pub use time_analysis::{
    Quantity, TimeAnalysis, TimeCode, TimeEntry, TimeTotal, analyze_period, analyze_record,
    price_entry,
};
