//! Government mandatory contributions.
//!
//! Employee shares of SSS, PhilHealth and Pag-IBIG plus TRAIN withholding tax,
//! computed on a monthly basis and then allocated to the payroll cycle.
//!
//! ## Rules
//!
//! - **SSS**: monthly salary credit clamped to the SSS range × employee share
//! - **PhilHealth**: base clamped to the PhilHealth range × premium rate × employee split
//! - **Pag-IBIG**: base clamped to the Pag-IBIG range × 1% (monthly gross up to the
//!   threshold) or 2%
//! - **Withholding tax**: progressive brackets on `gross - SSS - PhilHealth - Pag-IBIG`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round_money;
use crate::config::MandatoryRates;
use crate::models::{AuditStep, CycleType};

/// Component code for the SSS employee share.
pub const SSS_EE: &str = "SSS_EE";
/// Component code for the PhilHealth employee share.
pub const PHIC_EE: &str = "PHIC_EE";
/// Component code for the Pag-IBIG employee share.
pub const HDMF_EE: &str = "HDMF_EE";
/// Component code for withholding tax.
pub const TAX_WHT: &str = "TAX_WHT";

/// Codes produced by this module. Structure lines with these codes are
/// skipped when mandatories are computed, so they aren't counted twice.
pub const MANDATORY_CODES: [&str; 4] = [SSS_EE, PHIC_EE, HDMF_EE, TAX_WHT];

/// Mandatory deductions for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandatories {
    /// SSS employee share.
    pub sss_ee: Decimal,
    /// PhilHealth employee share.
    pub phic_ee: Decimal,
    /// Pag-IBIG employee share.
    pub hdmf_ee: Decimal,
    /// Withholding tax.
    pub tax_wht: Decimal,
}

impl Mandatories {
    /// The amounts keyed by component code, in a stable order.
    pub fn by_code(&self) -> [(&'static str, Decimal); 4] {
        [
            (SSS_EE, self.sss_ee),
            (PHIC_EE, self.phic_ee),
            (HDMF_EE, self.hdmf_ee),
            (TAX_WHT, self.tax_wht),
        ]
    }

    /// Sum of all four deductions.
    pub fn total(&self) -> Decimal {
        self.sss_ee + self.phic_ee + self.hdmf_ee + self.tax_wht
    }
}

/// The result of computing monthly mandatories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoriesResult {
    /// Monthly amounts.
    pub monthly: Mandatories,
    /// Income the withholding tax was computed on.
    pub taxable_income: Decimal,
    /// Audit step recording the computation.
    pub audit_step: AuditStep,
}

/// Computes monthly mandatory deductions from the regular monthly gross.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_mandatories_monthly;
/// use payroll_engine::config::MandatoryRates;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = compute_mandatories_monthly(Decimal::new(50000, 0), &MandatoryRates::default(), 1);
/// assert_eq!(result.monthly.sss_ee, Decimal::from_str("1350.00").unwrap());
/// assert_eq!(result.monthly.phic_ee, Decimal::from_str("1250.00").unwrap());
/// assert_eq!(result.monthly.hdmf_ee, Decimal::from_str("100.00").unwrap());
/// ```
pub fn compute_mandatories_monthly(
    gross_monthly: Decimal,
    rates: &MandatoryRates,
    step_number: u32,
) -> MandatoriesResult {
    let sss_credit = clamp(gross_monthly, rates.sss_min_credit, rates.sss_max_credit);
    let sss_ee = round_money(sss_credit * rates.sss_ee_share);

    let phic_base = clamp(gross_monthly, rates.phic_min_base, rates.phic_max_base);
    let phic_ee = round_money(phic_base * rates.phic_rate * rates.phic_ee_split);

    let hdmf_base = clamp(gross_monthly, rates.hdmf_min_base, rates.hdmf_max_base);
    let hdmf_rate = if gross_monthly <= rates.hdmf_high_threshold {
        rates.hdmf_rate_low
    } else {
        rates.hdmf_rate_high
    };
    let hdmf_ee = round_money(hdmf_base * hdmf_rate);

    let taxable_income = (gross_monthly - sss_ee - phic_ee - hdmf_ee).max(Decimal::ZERO);
    let tax_wht = withholding_tax_monthly(taxable_income, rates);

    let monthly = Mandatories {
        sss_ee,
        phic_ee,
        hdmf_ee,
        tax_wht,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "mandatories_monthly".to_string(),
        rule_name: "Government Mandatories".to_string(),
        input: serde_json::json!({
            "gross_monthly": gross_monthly.to_string(),
            "sss_credit": sss_credit.to_string(),
            "phic_base": phic_base.to_string(),
            "hdmf_base": hdmf_base.to_string(),
            "hdmf_rate": hdmf_rate.to_string()
        }),
        output: serde_json::json!({
            "SSS_EE": sss_ee.to_string(),
            "PHIC_EE": phic_ee.to_string(),
            "HDMF_EE": hdmf_ee.to_string(),
            "taxable_income": taxable_income.to_string(),
            "TAX_WHT": tax_wht.to_string()
        }),
        reasoning: format!(
            "Monthly gross {}: SSS {}, PhilHealth {}, Pag-IBIG {}, tax {} on taxable {}",
            gross_monthly, sss_ee, phic_ee, hdmf_ee, tax_wht, taxable_income
        ),
    };

    MandatoriesResult {
        monthly,
        taxable_income: round_money(taxable_income),
        audit_step,
    }
}

/// Progressive withholding tax on monthly taxable income.
///
/// The highest bracket whose lower bound is below the income applies:
/// `base_tax + (income - lower_bound) × rate`.
pub fn withholding_tax_monthly(taxable_income: Decimal, rates: &MandatoryRates) -> Decimal {
    let tax = rates
        .tax_brackets
        .iter()
        .take_while(|bracket| taxable_income > bracket.lower_bound)
        .last()
        .map(|bracket| bracket.base_tax + (taxable_income - bracket.lower_bound) * bracket.rate)
        .unwrap_or(Decimal::ZERO);
    round_money(tax.max(Decimal::ZERO))
}

/// The share of a monthly amount that falls in one cycle occurrence.
///
/// Monthly takes it all, each semi-monthly half takes 50%, and weekly or
/// bi-weekly cycles take their share of twelve months.
pub fn cycle_fraction(cycle_type: CycleType) -> Decimal {
    match cycle_type {
        CycleType::Monthly => Decimal::ONE,
        CycleType::Semi1 | CycleType::Semi2 => Decimal::new(5, 1),
        CycleType::BiWeekly => Decimal::new(12, 0) / Decimal::new(26, 0),
        CycleType::Weekly => Decimal::new(12, 0) / Decimal::new(52, 0),
    }
}

/// Allocates monthly mandatories to a cycle, rounding each share to cents.
pub fn allocate_to_cycle(monthly: &Mandatories, cycle_type: CycleType) -> Mandatories {
    let fraction = cycle_fraction(cycle_type);
    Mandatories {
        sss_ee: round_money(monthly.sss_ee * fraction),
        phic_ee: round_money(monthly.phic_ee * fraction),
        hdmf_ee: round_money(monthly.hdmf_ee * fraction),
        tax_wht: round_money(monthly.tax_wht * fraction),
    }
}

fn clamp(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.min(max).max(min)
}
