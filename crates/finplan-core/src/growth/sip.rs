use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::time_value::{cagr, compound_checked, fv_annuity_factor, monthly_rate, pct_to_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FinPlanResult;

const MAX_YEARS: u32 = 100;
const MAX_ANNUAL_RATE_PCT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a SIP (systematic investment plan) projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    /// Monthly contribution in the first year.
    pub monthly_contribution: Money,
    pub annual_rate_pct: Percent,
    pub years: u32,
    /// Annual increase applied to the monthly contribution.
    #[serde(default)]
    pub step_up_pct: Percent,
    #[serde(default)]
    pub inflation_pct: Percent,
}

/// One year of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub monthly_contribution: Money,
    pub contribution_that_year: Money,
    pub cumulative_contributed: Money,
    /// This year's contributions projected to the end of the horizon.
    pub year_block_value: Money,
    pub nominal_future_value: Money,
    pub inflation_adjusted_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthOutput {
    pub total_invested: Money,
    pub future_value: Money,
    pub total_returns: Money,
    pub inflation_adjusted_value: Money,
    /// `(future_value / total_invested)^(1/years) - 1`, zero when nothing was invested.
    pub effective_annual_rate: Rate,
    pub yearly: Vec<GrowthYear>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &GrowthInput) -> FinPlanResult<()> {
    if input.years == 0 {
        return Err(FinPlanError::invalid("years", "Duration must be at least 1 year"));
    }
    if input.years > MAX_YEARS {
        return Err(FinPlanError::invalid(
            "years",
            format!("Duration cannot exceed {MAX_YEARS} years"),
        ));
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "monthly_contribution",
            "Contribution cannot be negative",
        ));
    }
    if input.annual_rate_pct < Decimal::ZERO || input.annual_rate_pct > MAX_ANNUAL_RATE_PCT {
        return Err(FinPlanError::invalid(
            "annual_rate_pct",
            "Expected return must be between 0% and 100%",
        ));
    }
    if input.step_up_pct < Decimal::ZERO {
        return Err(FinPlanError::invalid("step_up_pct", "Step-up cannot be negative"));
    }
    if input.inflation_pct < Decimal::ZERO {
        return Err(FinPlanError::invalid("inflation_pct", "Inflation cannot be negative"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a step-up SIP year by year.
///
/// Each year's twelve contributions are compounded monthly to the end of that
/// year and then carried to the end of the horizon; the blocks are summed.
/// `nominal_future_value` at year `y` is therefore the horizon value of the
/// contributions made up to and including year `y`.
pub fn project_growth(input: &GrowthInput) -> FinPlanResult<ComputationOutput<GrowthOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    log::debug!(
        "project_growth: sip={} rate={}% years={} step_up={}% inflation={}%",
        input.monthly_contribution,
        input.annual_rate_pct,
        input.years,
        input.step_up_pct,
        input.inflation_pct
    );

    let rate = monthly_rate(input.annual_rate_pct);
    let step_factor = Decimal::ONE + pct_to_rate(input.step_up_pct);
    let inflation = pct_to_rate(input.inflation_pct);
    let months_per_year = Decimal::from(12);
    let year_factor = fv_annuity_factor(rate, 12)?;

    let mut yearly = Vec::with_capacity(input.years as usize);
    let mut monthly = input.monthly_contribution;
    let mut total_invested = Decimal::ZERO;
    let mut future_value = Decimal::ZERO;

    for year in 1..=input.years {
        let contribution = monthly
            .checked_mul(months_per_year)
            .ok_or_else(|| FinPlanError::out_of_range("monthly_contribution"))?;
        total_invested = total_invested
            .checked_add(contribution)
            .ok_or_else(|| FinPlanError::out_of_range("monthly_contribution"))?;

        let remaining_years = input.years - year + 1;
        let block = if rate.is_zero() {
            contribution
                .checked_mul(Decimal::from(remaining_years))
                .ok_or_else(|| FinPlanError::out_of_range("monthly_contribution"))?
        } else {
            let carry = compound_checked(rate, remaining_years * 12 - 12, "annual_rate_pct")?;
            monthly
                .checked_mul(year_factor)
                .and_then(|v| v.checked_mul(carry))
                .ok_or_else(|| FinPlanError::out_of_range("monthly_contribution"))?
        };
        future_value = future_value
            .checked_add(block)
            .ok_or_else(|| FinPlanError::out_of_range("monthly_contribution"))?;

        let inflation_adjusted_value = if inflation.is_zero() {
            future_value
        } else {
            future_value / compound_checked(inflation, year, "inflation_pct")?
        };

        yearly.push(GrowthYear {
            year,
            monthly_contribution: monthly,
            contribution_that_year: contribution,
            cumulative_contributed: total_invested,
            year_block_value: block,
            nominal_future_value: future_value,
            inflation_adjusted_value,
        });

        if year < input.years {
            monthly = monthly
                .checked_mul(step_factor)
                .ok_or_else(|| FinPlanError::out_of_range("step_up_pct"))?;
        }
    }

    let inflation_adjusted_value = yearly
        .last()
        .map(|y| y.inflation_adjusted_value)
        .unwrap_or(Decimal::ZERO);
    let effective_annual_rate = if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        cagr(total_invested, future_value, input.years)
    };

    log::debug!(
        "project_growth: invested={} future_value={}",
        total_invested.round_dp(2),
        future_value.round_dp(2)
    );

    let output = GrowthOutput {
        total_invested,
        future_value,
        total_returns: future_value - total_invested,
        inflation_adjusted_value,
        effective_annual_rate,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Step-up SIP projection (monthly compounding, per-year contribution blocks)",
        &serde_json::json!({
            "monthly_contribution": input.monthly_contribution.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "years": input.years,
            "step_up_pct": input.step_up_pct.to_string(),
            "inflation_pct": input.inflation_pct.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
