//! Profile-driven SIP suggestions: how much, for how long, at what expected
//! return and step-up, given income, expenses, risk appetite and experience.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::growth::sip::{project_growth, GrowthInput};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinPlanResult;

const DEFAULT_SIP: Decimal = dec!(5_000);
const SURPLUS_ALLOCATION: Decimal = dec!(0.25);
const MIN_DURATION_YEARS: u32 = 5;
const MAX_DURATION_YEARS: u32 = 40;
const MIN_SIP_PCT_OF_INCOME: Decimal = dec!(15);
const SURPLUS_HEADROOM: Decimal = dec!(0.4);
const LAKH: Decimal = dec!(100_000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentExperience {
    #[default]
    #[serde(alias = "Beginner (0-2 years)")]
    Beginner,
    #[serde(alias = "Intermediate (2-5 years)")]
    Intermediate,
    #[serde(alias = "Advanced (5+ years)")]
    Advanced,
    #[serde(alias = "Expert (10+ years)")]
    Expert,
}

/// Recurring monthly outgoings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyExpenses {
    #[serde(default)]
    pub rent_mortgage: Money,
    #[serde(default)]
    pub utilities: Money,
    #[serde(default)]
    pub food_dining: Money,
    #[serde(default)]
    pub transportation: Money,
    #[serde(default)]
    pub entertainment: Money,
    #[serde(default)]
    pub healthcare: Money,
}

impl MonthlyExpenses {
    /// Each outgoing paired with its field name.
    pub fn items(&self) -> [(&'static str, Money); 6] {
        [
            ("rent_mortgage", self.rent_mortgage),
            ("utilities", self.utilities),
            ("food_dining", self.food_dining),
            ("transportation", self.transportation),
            ("entertainment", self.entertainment),
            ("healthcare", self.healthcare),
        ]
    }

    pub fn total(&self) -> FinPlanResult<Money> {
        self.items()
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
            .ok_or_else(|| FinPlanError::out_of_range("expenses"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub age: u32,
    pub monthly_income: Money,
    #[serde(default)]
    pub expenses: MonthlyExpenses,
    #[serde(default)]
    pub current_sip: Money,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub experience: InvestmentExperience,
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,
}

fn default_retirement_age() -> u32 {
    60
}

fn default_target_corpus_lakhs() -> Decimal {
    dec!(100)
}

/// A SIP plan read against the investor's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInsightsInput {
    pub profile: InvestorProfile,
    pub plan: GrowthInput,
    /// Retirement corpus goal, in lakhs of rupees.
    #[serde(default = "default_target_corpus_lakhs")]
    pub target_corpus_lakhs: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipInsights {
    pub sip_pct_of_income: Percent,
    /// True once the SIP reaches 15% of income.
    pub sip_allocation_ok: bool,
    pub investment_horizon_years: u32,
    /// Negative when the investor is already past retirement age.
    pub years_to_retirement: i64,
    pub target_corpus: Money,
    pub projected_value: Money,
    pub corpus_gap: Money,
    pub monthly_surplus: Money,
    pub sip_pct_of_surplus: Percent,
    /// Extra monthly SIP that would bring it to 40% of the surplus.
    pub optimization_scope: Money,
    /// Annual SIP outlay that could go into ELSS funds.
    pub elss_potential: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipSuggestion {
    pub recommended_sip: Money,
    pub investment_duration_years: u32,
    pub expected_return_pct: Percent,
    pub step_up_pct: Percent,
    pub investment_type: String,
    pub monthly_surplus: Money,
    /// Recommended SIP as a percentage of monthly income.
    pub sip_pct_of_income: Percent,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the profile's amounts and return its monthly surplus.
fn validate_profile(profile: &InvestorProfile) -> FinPlanResult<Money> {
    if profile.monthly_income < Decimal::ZERO {
        return Err(FinPlanError::invalid("monthly_income", "Income cannot be negative"));
    }
    if profile.current_sip < Decimal::ZERO {
        return Err(FinPlanError::invalid("current_sip", "Current SIP cannot be negative"));
    }
    for (name, amount) in profile.expenses.items() {
        if amount < Decimal::ZERO {
            return Err(FinPlanError::invalid(
                &format!("expenses.{name}"),
                "Expense cannot be negative",
            ));
        }
    }
    // Both sides are non-negative, so the difference is representable
    Ok(profile.monthly_income - profile.expenses.total()?)
}

/// `part / whole` as a percentage, zero when `whole` is not positive.
fn share_pct(part: Money, whole: Money, field: &str) -> FinPlanResult<Percent> {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(dec!(100)))
        .ok_or_else(|| FinPlanError::out_of_range(field))
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Suggest a SIP plan for an investor profile.
pub fn suggest_sip_plan(profile: &InvestorProfile) -> FinPlanResult<ComputationOutput<SipSuggestion>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let monthly_surplus = validate_profile(profile)?;
    let recommended_sip = if monthly_surplus > Decimal::ZERO {
        (monthly_surplus * SURPLUS_ALLOCATION)
            .floor()
            .max(profile.current_sip)
    } else {
        warnings.push("Expenses meet or exceed income; using the default SIP amount".into());
        DEFAULT_SIP
    };

    let horizon = profile.retirement_age as i64 - profile.age as i64;
    let investment_duration_years =
        horizon.clamp(MIN_DURATION_YEARS as i64, MAX_DURATION_YEARS as i64) as u32;

    let (expected_return_pct, investment_type) = match profile.risk_tolerance {
        RiskTolerance::Conservative => (dec!(8), "Hybrid Funds"),
        RiskTolerance::Moderate => (dec!(12), "Equity Mutual Funds"),
        RiskTolerance::Aggressive => (dec!(15), "Equity Mutual Funds"),
    };

    let step_up_pct = match profile.experience {
        InvestmentExperience::Advanced | InvestmentExperience::Expert => dec!(10),
        InvestmentExperience::Intermediate => dec!(7.5),
        InvestmentExperience::Beginner => dec!(5),
    };

    let sip_pct_of_income = share_pct(recommended_sip, profile.monthly_income, "current_sip")?;
    if sip_pct_of_income > Decimal::ZERO && sip_pct_of_income < MIN_SIP_PCT_OF_INCOME {
        warnings.push(format!(
            "SIP is {}% of income; 15-25% is the usual target",
            sip_pct_of_income.round_dp(1)
        ));
    }

    let suggestion = SipSuggestion {
        recommended_sip,
        investment_duration_years,
        expected_return_pct,
        step_up_pct,
        investment_type: investment_type.to_string(),
        monthly_surplus,
        sip_pct_of_income,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Profile-based SIP suggestion (25% of surplus, horizon to retirement)",
        &serde_json::json!({
            "age": profile.age,
            "retirement_age": profile.retirement_age,
            "risk_tolerance": format!("{:?}", profile.risk_tolerance),
            "experience": format!("{:?}", profile.experience),
        }),
        warnings,
        elapsed,
        suggestion,
    ))
}

/// Read a SIP plan against the investor's income, expenses and retirement goal.
pub fn sip_insights(input: &SipInsightsInput) -> FinPlanResult<ComputationOutput<SipInsights>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    let profile = &input.profile;

    let monthly_surplus = validate_profile(profile)?;
    if input.target_corpus_lakhs < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "target_corpus_lakhs",
            "Target corpus cannot be negative",
        ));
    }
    let projection = project_growth(&input.plan)?;
    warnings.extend(projection.warnings);
    let projected_value = projection.result.future_value;
    let sip = input.plan.monthly_contribution;

    let sip_pct_of_income = share_pct(sip, profile.monthly_income, "plan.monthly_contribution")?;
    let sip_allocation_ok = sip_pct_of_income >= MIN_SIP_PCT_OF_INCOME;
    if !sip_allocation_ok {
        warnings.push("Consider increasing the SIP to 15-25% of income".into());
    }

    let target_corpus = input
        .target_corpus_lakhs
        .checked_mul(LAKH)
        .ok_or_else(|| FinPlanError::out_of_range("target_corpus_lakhs"))?;
    // Both figures are non-negative
    let corpus_gap = (target_corpus - projected_value).max(Decimal::ZERO);

    let sip_pct_of_surplus = share_pct(sip, monthly_surplus, "plan.monthly_contribution")?;
    // Underflow only happens on a deeply negative surplus, where there is no scope
    let optimization_scope = (monthly_surplus * SURPLUS_HEADROOM)
        .checked_sub(sip)
        .map_or(Decimal::ZERO, |scope| scope.max(Decimal::ZERO));
    let elss_potential = sip
        .checked_mul(dec!(12))
        .ok_or_else(|| FinPlanError::out_of_range("plan.monthly_contribution"))?;

    let insights = SipInsights {
        sip_pct_of_income,
        sip_allocation_ok,
        investment_horizon_years: input.plan.years,
        years_to_retirement: profile.retirement_age as i64 - profile.age as i64,
        target_corpus,
        projected_value,
        corpus_gap,
        monthly_surplus,
        sip_pct_of_surplus,
        optimization_scope,
        elss_potential,
    };

    log::debug!(
        "sip_insights: projected={projected_value} gap={corpus_gap} surplus={monthly_surplus}"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP plan insights against income, surplus and retirement corpus",
        &serde_json::json!({
            "monthly_contribution": sip.to_string(),
            "years": input.plan.years,
            "target_corpus_lakhs": input.target_corpus_lakhs.to_string(),
        }),
        warnings,
        elapsed,
        insights,
    ))
}
