//! Salary structure component amounts.
//!
//! A structure line is either a fixed amount or a percentage of the
//! employee's basic salary.

use rust_decimal::Decimal;

use super::money::{checked_product, checked_quotient, checked_total, round_money};
use crate::error::EngineResult;
use crate::models::{ComponentType, PositionId, SalaryComponent, SalaryStructure};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// A structure line resolved against its component and a base salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLine<'a> {
    /// The component the line pays or deducts.
    pub component: &'a SalaryComponent,
    /// Amount rounded to cents.
    pub amount: Decimal,
}

/// Returns the amount a structure line contributes for `base_salary`.
///
/// Fails with a calculation error when a percentage line overflows.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::component_amount;
/// use payroll_engine::models::SalaryStructure;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = SalaryStructure {
///     position_id: 1,
///     component_id: 1,
///     amount: Decimal::from_str("100").unwrap(),
///     is_percentage: true,
/// };
/// assert_eq!(
///     component_amount(&line, Decimal::new(50000, 0)).unwrap(),
///     Decimal::from_str("50000.00").unwrap()
/// );
/// ```
pub fn component_amount(
    structure: &SalaryStructure,
    base_salary: Decimal,
) -> EngineResult<Decimal> {
    unrounded_amount(structure, base_salary).map(round_money)
}

fn unrounded_amount(structure: &SalaryStructure, base_salary: Decimal) -> EngineResult<Decimal> {
    if structure.is_percentage {
        checked_product(checked_quotient(structure.amount, ONE_HUNDRED)?, base_salary)
    } else {
        Ok(structure.amount)
    }
}

/// Resolves every structure line for a position.
///
/// Lines whose component is unknown are skipped. When `excluded_codes` is
/// non-empty, components with those codes are left out.
pub fn position_lines<'a>(
    structures: &[SalaryStructure],
    components: &'a [SalaryComponent],
    position_id: PositionId,
    base_salary: Decimal,
    excluded_codes: &[&str],
) -> EngineResult<Vec<StructureLine<'a>>> {
    structures
        .iter()
        .filter(|s| s.position_id == position_id)
        .filter_map(|s| {
            let component = components.iter().find(|c| c.id == s.component_id)?;
            if excluded_codes.iter().any(|code| component.has_code(code)) {
                return None;
            }
            let line = component_amount(s, base_salary)
                .map(|amount| StructureLine { component, amount });
            Some(line)
        })
        .collect()
}

/// Sums the EARNING structure lines of a position: the regular monthly gross
/// before any time-based adjustments.
pub fn regular_monthly_gross(
    structures: &[SalaryStructure],
    components: &[SalaryComponent],
    position_id: PositionId,
    base_salary: Decimal,
) -> EngineResult<Decimal> {
    let mut total = Decimal::ZERO;
    for structure in structures.iter().filter(|s| s.position_id == position_id) {
        let is_earning = components
            .iter()
            .any(|c| c.id == structure.component_id && c.component_type == ComponentType::Earning);
        if is_earning {
            total = checked_total(total, unrounded_amount(structure, base_salary)?)?;
        }
    }
    Ok(round_money(total))
}
