use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::time_value::{compound_checked, pct_to_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinPlanResult;

const MAX_AGE: u32 = 120;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for retirement planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_savings: Money,
    pub annual_contribution: Money,
    /// Expected return, applied both before and after retirement.
    pub annual_return_pct: Percent,
    pub inflation_pct: Percent,
    /// Desired annual retirement income in today's rupees.
    pub desired_annual_income: Money,
    #[serde(default)]
    pub pension_income: Money,
    #[serde(default)]
    pub provident_fund_income: Money,
}

/// Top-level output from `plan_retirement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementOutput {
    pub accumulation_phase: AccumulationPhase,
    pub income_gap: IncomeGap,
    pub decumulation_phase: DecumulationPhase,
    pub accumulation_schedule: Vec<AccumulationYear>,
    pub decumulation_schedule: Vec<DecumulationYear>,
}

/// Accumulation-phase summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulationPhase {
    pub years_to_retirement: u32,
    pub total_contributions: Money,
    pub total_investment_growth: Money,
    pub corpus_at_retirement: Money,
    pub real_corpus_at_retirement: Money,
}

/// Income needed at retirement against guaranteed income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeGap {
    /// Desired income inflated to the retirement year.
    pub income_needed_at_retirement: Money,
    pub guaranteed_income: Money,
    /// Negative when guaranteed income exceeds the need.
    pub annual_shortfall: Money,
    pub monthly_shortfall: Money,
}

/// Decumulation-phase summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecumulationPhase {
    pub retirement_duration: u32,
    pub total_withdrawals: Money,
    pub balance_at_end: Money,
    pub savings_last: bool,
    pub years_savings_last: u32,
}

/// A single year before retirement. Year 0 is today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationYear {
    pub year: u32,
    pub age: u32,
    pub contribution: Money,
    pub investment_growth: Money,
    pub balance: Money,
    pub real_balance: Money,
    pub income_needed: Money,
}

/// A single year after retirement. Year 0 is the retirement date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecumulationYear {
    pub year: u32,
    pub age: u32,
    pub withdrawal: Money,
    pub investment_growth: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RetirementInput) -> FinPlanResult<()> {
    if input.retirement_age < input.current_age {
        return Err(FinPlanError::invalid(
            "retirement_age",
            "retirement_age must be >= current_age",
        ));
    }
    if input.life_expectancy < input.retirement_age {
        return Err(FinPlanError::invalid(
            "life_expectancy",
            "life_expectancy must be >= retirement_age",
        ));
    }
    if input.life_expectancy > MAX_AGE {
        return Err(FinPlanError::invalid(
            "life_expectancy",
            format!("life_expectancy must be <= {MAX_AGE}"),
        ));
    }
    for (field, value) in [
        ("current_savings", input.current_savings),
        ("annual_contribution", input.annual_contribution),
        ("desired_annual_income", input.desired_annual_income),
        ("pension_income", input.pension_income),
        ("provident_fund_income", input.provident_fund_income),
    ] {
        if value < Decimal::ZERO {
            return Err(FinPlanError::invalid(field, "Amount cannot be negative"));
        }
    }
    if input.annual_return_pct < Decimal::ZERO || input.annual_return_pct > dec!(100) {
        return Err(FinPlanError::invalid(
            "annual_return_pct",
            "Expected return must be between 0% and 100%",
        ));
    }
    if input.inflation_pct < Decimal::ZERO || input.inflation_pct > dec!(100) {
        return Err(FinPlanError::invalid(
            "inflation_pct",
            "Inflation must be between 0% and 100%",
        ));
    }
    Ok(())
}

/// One year of growth on `balance`, erroring instead of overflowing.
fn year_growth(balance: Money, rate: Decimal) -> FinPlanResult<Money> {
    balance
        .checked_mul(rate)
        .ok_or_else(|| FinPlanError::out_of_range("annual_return_pct"))
}

fn checked_sum(a: Money, b: Money) -> FinPlanResult<Money> {
    a.checked_add(b).ok_or_else(|| FinPlanError::out_of_range("annual_return_pct"))
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project savings to retirement, size the income gap, and test whether the
/// corpus funds that gap through life expectancy.
pub fn plan_retirement(
    input: &RetirementInput,
) -> FinPlanResult<ComputationOutput<RetirementOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let retirement_duration = input.life_expectancy - input.retirement_age;
    let annual_return = pct_to_rate(input.annual_return_pct);
    let inflation = pct_to_rate(input.inflation_pct);

    log::debug!(
        "plan_retirement: age {}->{}->{} savings={} contribution={}",
        input.current_age,
        input.retirement_age,
        input.life_expectancy,
        input.current_savings,
        input.annual_contribution
    );

    // ===================================================================
    // Accumulation phase
    // ===================================================================
    let mut accumulation_schedule = Vec::with_capacity(years_to_retirement as usize + 1);
    let mut balance = input.current_savings;
    let mut total_contributions = Decimal::ZERO;
    let mut total_investment_growth = Decimal::ZERO;

    for year in 0..=years_to_retirement {
        let (contribution, growth) = if year == 0 {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            // Growth accrues on the opening balance; the contribution lands the same year
            let growth = year_growth(balance, annual_return)?;
            balance = checked_sum(balance, checked_sum(input.annual_contribution, growth)?)?;
            (input.annual_contribution, growth)
        };
        total_contributions += contribution;
        total_investment_growth = checked_sum(total_investment_growth, growth)?;

        let inflation_factor = compound_checked(inflation, year, "inflation_pct")?;
        accumulation_schedule.push(AccumulationYear {
            year,
            age: input.current_age + year,
            contribution,
            investment_growth: growth,
            balance,
            real_balance: balance / inflation_factor,
            income_needed: input
                .desired_annual_income
                .checked_mul(inflation_factor)
                .ok_or_else(|| FinPlanError::out_of_range("inflation_pct"))?,
        });
    }

    let corpus_at_retirement = balance;
    let (real_corpus_at_retirement, income_needed_at_retirement) = accumulation_schedule
        .last()
        .map(|y| (y.real_balance, y.income_needed))
        .unwrap_or((balance, input.desired_annual_income));

    // ===================================================================
    // Income gap
    // ===================================================================
    let guaranteed_income = input.pension_income + input.provident_fund_income;
    let annual_shortfall = income_needed_at_retirement - guaranteed_income;
    let withdrawal_need = annual_shortfall.max(Decimal::ZERO);
    if annual_shortfall <= Decimal::ZERO {
        warnings.push("Pension and provident fund income cover the retirement need".into());
    }

    // ===================================================================
    // Decumulation phase
    // ===================================================================
    let mut decumulation_schedule = Vec::with_capacity(retirement_duration as usize + 1);
    let mut total_withdrawals = Decimal::ZERO;
    let mut depleted_in: Option<u32> = None;

    for year in 0..=retirement_duration {
        if year == 0 {
            decumulation_schedule.push(DecumulationYear {
                year,
                age: input.retirement_age,
                withdrawal: Decimal::ZERO,
                investment_growth: Decimal::ZERO,
                balance,
            });
            continue;
        }

        let growth = year_growth(balance, annual_return)?;
        let available = checked_sum(balance, growth)?;
        let withdrawal = withdrawal_need.min(available);
        if withdrawal_need > available && depleted_in.is_none() {
            depleted_in = Some(year);
        }
        balance = available - withdrawal;
        total_withdrawals += withdrawal;

        decumulation_schedule.push(DecumulationYear {
            year,
            age: input.retirement_age + year,
            withdrawal,
            investment_growth: growth,
            balance,
        });
    }

    let savings_last = depleted_in.is_none();
    let years_savings_last = depleted_in.map(|y| y - 1).unwrap_or(retirement_duration);
    if let Some(year) = depleted_in {
        warnings.push(format!(
            "Savings run out in retirement year {year} (age {})",
            input.retirement_age + year
        ));
    }

    let output = RetirementOutput {
        accumulation_phase: AccumulationPhase {
            years_to_retirement,
            total_contributions,
            total_investment_growth,
            corpus_at_retirement,
            real_corpus_at_retirement,
        },
        income_gap: IncomeGap {
            income_needed_at_retirement,
            guaranteed_income,
            annual_shortfall,
            monthly_shortfall: annual_shortfall / dec!(12),
        },
        decumulation_phase: DecumulationPhase {
            retirement_duration,
            total_withdrawals,
            balance_at_end: balance,
            savings_last,
            years_savings_last,
        },
        accumulation_schedule,
        decumulation_schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement planning (annual accumulation, inflation-indexed income gap, drawdown)",
        &serde_json::json!({
            "current_age": input.current_age,
            "retirement_age": input.retirement_age,
            "life_expectancy": input.life_expectancy,
            "annual_return_pct": input.annual_return_pct.to_string(),
            "inflation_pct": input.inflation_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
