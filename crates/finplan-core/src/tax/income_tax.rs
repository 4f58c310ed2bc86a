//! Individual income tax under India's new regime (section 115BAC), with the
//! section 87A rebate, marginal relief just above the rebate threshold, and
//! health & education cess. Surcharge is not modelled.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinPlanResult;

/// Income above which a surcharge would apply.
const SURCHARGE_THRESHOLD: Decimal = dec!(5_000_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One band of the slab table. `upper` of `None` marks the open top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub upper: Option<Money>,
    pub rate_pct: Percent,
}

/// Slab table and allowances for one assessment year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRegimeConfig {
    pub name: String,
    pub slabs: Vec<TaxSlab>,
    pub standard_deduction: Money,
    pub rebate_limit: Money,
    pub rebate_income_threshold: Money,
    pub cess_pct: Percent,
}

impl Default for TaxRegimeConfig {
    /// FY 2025-26 (AY 2026-27) new regime.
    fn default() -> Self {
        let slab = |upper: Option<Decimal>, rate_pct: Decimal| TaxSlab { upper, rate_pct };
        Self {
            name: "New regime FY 2025-26".into(),
            slabs: vec![
                slab(Some(dec!(400_000)), dec!(0)),
                slab(Some(dec!(800_000)), dec!(5)),
                slab(Some(dec!(1_200_000)), dec!(10)),
                slab(Some(dec!(1_600_000)), dec!(15)),
                slab(Some(dec!(2_000_000)), dec!(20)),
                slab(Some(dec!(2_400_000)), dec!(25)),
                slab(None, dec!(30)),
            ],
            standard_deduction: dec!(75_000),
            rebate_limit: dec!(60_000),
            rebate_income_threshold: dec!(1_200_000),
            cess_pct: dec!(4),
        }
    }
}

fn default_salaried() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub gross_income: Money,
    /// Salaried taxpayers and pensioners get the standard deduction.
    #[serde(default = "default_salaried")]
    pub is_salaried: bool,
    /// Deductions still allowed under the new regime, e.g. employer NPS
    /// contribution under 80CCD(2).
    #[serde(default)]
    pub other_deductions: Money,
    #[serde(default)]
    pub config: TaxRegimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabTax {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate_pct: Percent,
    pub taxable_amount: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxOutput {
    pub regime: String,
    pub gross_income: Money,
    pub standard_deduction: Money,
    pub other_deductions: Money,
    pub taxable_income: Money,
    pub slab_breakdown: Vec<SlabTax>,
    pub tax_before_rebate: Money,
    pub rebate_87a: Money,
    pub marginal_relief: Money,
    pub tax_after_rebate: Money,
    pub cess: Money,
    pub total_tax: Money,
    pub effective_rate_pct: Percent,
    pub marginal_rate_pct: Percent,
    pub net_income: Money,
    pub monthly_take_home: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_config(config: &TaxRegimeConfig) -> FinPlanResult<()> {
    if config.slabs.is_empty() {
        return Err(FinPlanError::invalid("config.slabs", "Slab table is empty"));
    }
    let last = config.slabs.len() - 1;
    let mut previous = Decimal::ZERO;
    for (i, slab) in config.slabs.iter().enumerate() {
        if slab.rate_pct < Decimal::ZERO || slab.rate_pct > dec!(100) {
            return Err(FinPlanError::invalid(
                &format!("config.slabs[{i}].rate_pct"),
                "Slab rate must be between 0% and 100%",
            ));
        }
        match slab.upper {
            Some(upper) if upper <= previous => {
                return Err(FinPlanError::invalid(
                    &format!("config.slabs[{i}].upper"),
                    "Slab limits must be strictly increasing",
                ));
            }
            Some(upper) => previous = upper,
            None if i != last => {
                return Err(FinPlanError::invalid(
                    &format!("config.slabs[{i}].upper"),
                    "Only the last slab may be open-ended",
                ));
            }
            None => {}
        }
    }
    if config.slabs[last].upper.is_some() {
        return Err(FinPlanError::invalid(
            "config.slabs",
            "Last slab must be open-ended",
        ));
    }
    for (field, value) in [
        ("config.standard_deduction", config.standard_deduction),
        ("config.rebate_limit", config.rebate_limit),
        ("config.rebate_income_threshold", config.rebate_income_threshold),
        ("config.cess_pct", config.cess_pct),
    ] {
        if value < Decimal::ZERO {
            return Err(FinPlanError::invalid(field, "Cannot be negative"));
        }
    }
    Ok(())
}

fn validate_input(input: &IncomeTaxInput) -> FinPlanResult<()> {
    if input.gross_income < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "gross_income",
            "Income cannot be negative",
        ));
    }
    if input.other_deductions < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "other_deductions",
            "Deductions cannot be negative",
        ));
    }
    validate_config(&input.config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply the slab table; returns the per-slab rows and the marginal rate.
fn apply_slabs(taxable: Money, slabs: &[TaxSlab]) -> (Vec<SlabTax>, Percent) {
    let mut rows = Vec::with_capacity(slabs.len());
    let mut lower = Decimal::ZERO;
    let mut marginal = slabs.first().map(|s| s.rate_pct).unwrap_or(Decimal::ZERO);

    for slab in slabs {
        let ceiling = slab.upper.map_or(taxable, |u| u.min(taxable));
        let amount = (ceiling - lower).max(Decimal::ZERO);
        if amount > Decimal::ZERO {
            marginal = slab.rate_pct;
        }
        rows.push(SlabTax {
            lower,
            upper: slab.upper,
            rate_pct: slab.rate_pct,
            taxable_amount: amount,
            // Rates are at most 100%, so the tax never exceeds the amount
            tax: amount * (slab.rate_pct / dec!(100)),
        });
        if let Some(upper) = slab.upper {
            lower = upper;
        }
    }
    (rows, marginal)
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn compute_income_tax(
    input: &IncomeTaxInput,
) -> FinPlanResult<ComputationOutput<IncomeTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    let config = &input.config;

    log::debug!(
        "compute_income_tax: gross={} regime={}",
        input.gross_income,
        config.name
    );

    let standard_deduction = if input.is_salaried {
        config.standard_deduction.min(input.gross_income)
    } else {
        Decimal::ZERO
    };
    let taxable_income =
        (input.gross_income - standard_deduction - input.other_deductions).max(Decimal::ZERO);

    let (slab_breakdown, marginal_rate_pct) = apply_slabs(taxable_income, &config.slabs);
    let tax_before_rebate: Money = slab_breakdown.iter().map(|s| s.tax).sum();

    // 87A: full rebate up to the limit at or below the threshold; just above
    // it, tax may not exceed the income over the threshold
    let mut rebate_87a = Decimal::ZERO;
    let mut marginal_relief = Decimal::ZERO;
    if taxable_income <= config.rebate_income_threshold {
        rebate_87a = tax_before_rebate.min(config.rebate_limit);
    } else {
        let excess = taxable_income - config.rebate_income_threshold;
        if tax_before_rebate > excess {
            marginal_relief = tax_before_rebate - excess;
        }
    }
    let tax_after_rebate = tax_before_rebate - rebate_87a - marginal_relief;

    let cess = tax_after_rebate
        .checked_mul(config.cess_pct / dec!(100))
        .ok_or_else(|| FinPlanError::out_of_range("config.cess_pct"))?;
    let total_tax = tax_after_rebate
        .checked_add(cess)
        .ok_or_else(|| FinPlanError::out_of_range("config.cess_pct"))?;

    let effective_rate_pct = if input.gross_income.is_zero() {
        Decimal::ZERO
    } else {
        (total_tax / input.gross_income)
            .checked_mul(dec!(100))
            .ok_or_else(|| FinPlanError::out_of_range("config.cess_pct"))?
    };
    let net_income = input.gross_income - total_tax;

    if input.gross_income > SURCHARGE_THRESHOLD {
        warnings.push(format!(
            "Income above {SURCHARGE_THRESHOLD} attracts surcharge, which is not included"
        ));
    }

    let output = IncomeTaxOutput {
        regime: config.name.clone(),
        gross_income: input.gross_income,
        standard_deduction,
        other_deductions: input.other_deductions,
        taxable_income,
        slab_breakdown,
        tax_before_rebate,
        rebate_87a,
        marginal_relief,
        tax_after_rebate,
        cess,
        total_tax,
        effective_rate_pct,
        marginal_rate_pct,
        net_income,
        monthly_take_home: net_income / dec!(12),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Slab-based income tax with section 87A rebate, marginal relief and cess",
        &serde_json::json!({
            "regime": config.name,
            "is_salaried": input.is_salaried,
            "standard_deduction": config.standard_deduction.to_string(),
            "rebate_income_threshold": config.rebate_income_threshold.to_string(),
            "cess_pct": config.cess_pct.to_string(),
            "surcharge": "not modelled",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn salaried(gross: Decimal) -> IncomeTaxInput {
        IncomeTaxInput {
            gross_income: gross,
            is_salaried: true,
            other_deductions: Decimal::ZERO,
            config: TaxRegimeConfig::default(),
        }
    }

    fn business(gross: Decimal) -> IncomeTaxInput {
        IncomeTaxInput {
            is_salaried: false,
            ..salaried(gross)
        }
    }

    #[test]
    fn test_twelve_lakh_salary_tax_free() {
        let out = compute_income_tax(&salaried(dec!(1_200_000))).unwrap().result;
        assert_eq!(out.taxable_income, dec!(1_125_000));
        assert_eq!(out.tax_before_rebate, dec!(52_500));
        assert_eq!(out.rebate_87a, dec!(52_500));
        assert_eq!(out.total_tax, Decimal::ZERO);
        assert_eq!(out.marginal_rate_pct, dec!(10));
    }

    #[test]
    fn test_rebate_at_threshold() {
        let out = compute_income_tax(&salaried(dec!(1_275_000))).unwrap().result;
        assert_eq!(out.taxable_income, dec!(1_200_000));
        assert_eq!(out.tax_before_rebate, dec!(60_000));
        assert_eq!(out.total_tax, Decimal::ZERO);
    }

    #[test]
    fn test_marginal_relief_above_threshold() {
        let out = compute_income_tax(&salaried(dec!(1_300_000))).unwrap().result;
        assert_eq!(out.taxable_income, dec!(1_225_000));
        assert_eq!(out.tax_before_rebate, dec!(63_750));
        assert_eq!(out.rebate_87a, Decimal::ZERO);
        assert_eq!(out.marginal_relief, dec!(38_750));
        assert_eq!(out.tax_after_rebate, dec!(25_000));
        assert_eq!(out.cess, dec!(1_000));
        assert_eq!(out.total_tax, dec!(26_000));
    }

    #[test]
    fn test_twenty_lakh_business_income() {
        let out = compute_income_tax(&business(dec!(2_000_000))).unwrap().result;
        assert_eq!(out.standard_deduction, Decimal::ZERO);
        assert_eq!(out.tax_before_rebate, dec!(200_000));
        assert_eq!(out.marginal_relief, Decimal::ZERO);
        assert_eq!(out.total_tax, dec!(208_000));
        assert_eq!(out.effective_rate_pct, dec!(10.4));
        assert_eq!(out.marginal_rate_pct, dec!(20));
    }

    #[test]
    fn test_top_slab() {
        let out = compute_income_tax(&salaried(dec!(3_000_000))).unwrap().result;
        assert_eq!(out.taxable_income, dec!(2_925_000));
        assert_eq!(out.tax_before_rebate, dec!(457_500));
        assert_eq!(out.total_tax, dec!(475_800));
        assert_eq!(out.marginal_rate_pct, dec!(30));
        let top = out.slab_breakdown.last().unwrap();
        assert_eq!(top.taxable_amount, dec!(525_000));
        assert_eq!(top.tax, dec!(157_500));
        assert_eq!(out.net_income, dec!(2_524_200));
        assert_eq!(out.monthly_take_home, dec!(210_350));
    }

    #[test]
    fn test_slab_amounts_sum_to_taxable() {
        let out = compute_income_tax(&salaried(dec!(1_875_000))).unwrap().result;
        let sum: Decimal = out.slab_breakdown.iter().map(|s| s.taxable_amount).sum();
        assert_eq!(sum, out.taxable_income);
        assert_eq!(out.slab_breakdown.len(), 7);
    }

    #[test]
    fn test_other_deductions_reduce_taxable() {
        let mut input = salaried(dec!(1_500_000));
        input.other_deductions = dec!(100_000);
        let out = compute_income_tax(&input).unwrap().result;
        assert_eq!(out.taxable_income, dec!(1_325_000));
    }

    #[test]
    fn test_zero_income() {
        let out = compute_income_tax(&salaried(Decimal::ZERO)).unwrap().result;
        assert_eq!(out.standard_deduction, Decimal::ZERO);
        assert_eq!(out.total_tax, Decimal::ZERO);
        assert_eq!(out.effective_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn test_surcharge_warning() {
        let out = compute_income_tax(&salaried(dec!(6_000_000))).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("surcharge")));
    }

    #[test]
    fn test_negative_income_error() {
        assert!(compute_income_tax(&salaried(dec!(-1))).is_err());
    }

    #[test]
    fn test_negative_deduction_error() {
        let mut input = salaried(dec!(1_000_000));
        input.other_deductions = dec!(-10);
        assert!(compute_income_tax(&input).is_err());
    }

    #[test]
    fn test_unsorted_slabs_error() {
        let mut input = salaried(dec!(1_000_000));
        input.config.slabs.swap(1, 2);
        assert!(compute_income_tax(&input).is_err());
    }

    #[test]
    fn test_closed_top_slab_error() {
        let mut input = salaried(dec!(1_000_000));
        input.config.slabs.pop();
        assert!(compute_income_tax(&input).is_err());
    }

    #[test]
    fn test_config_from_json_defaults() {
        let input: IncomeTaxInput =
            serde_json::from_str(r#"{"gross_income": "1300000"}"#).unwrap();
        assert!(input.is_salaried);
        assert_eq!(input.config.slabs.len(), 7);
        let out = compute_income_tax(&input).unwrap().result;
        assert_eq!(out.total_tax, dec!(26_000));
    }

    #[test]
    fn test_largest_income_stays_in_range() {
        let out = compute_income_tax(&business(Decimal::MAX)).unwrap().result;
        assert_eq!(out.marginal_rate_pct, dec!(30));
        assert!(out.total_tax < out.gross_income);
        assert!(out.net_income > Decimal::ZERO);
    }

    #[test]
    fn test_runaway_cess_error() {
        let mut input = business(dec!(2_000_000));
        input.config.cess_pct = Decimal::MAX;
        match compute_income_tax(&input) {
            Err(FinPlanError::InvalidInput { field, .. }) => assert_eq!(field, "config.cess_pct"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
