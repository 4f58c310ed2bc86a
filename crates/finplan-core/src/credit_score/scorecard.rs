//! CIBIL-style credit score estimation.
//!
//! A heuristic, not the bureau algorithm: five factors on a 0-100 scale are
//! weighted (35/30/15/10/10), adjusted for delinquencies, utilization, age of
//! history and account mix, then shifted by income and debt adjustors and
//! mapped onto the 300-900 band.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinPlanResult;

const HUNDRED: Decimal = dec!(100);
const BAND_MIN: Decimal = dec!(300);
const BAND_MAX: Decimal = dec!(900);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(alias = "Salaried Employee")]
    Salaried,
    #[serde(rename = "Self-employed", alias = "SelfEmployed", alias = "Self-Employed")]
    SelfEmployed,
    #[serde(alias = "Business Owner")]
    BusinessOwner,
    Freelancer,
    Student,
    Retired,
    Other,
}

/// Annual income bracket, in lakhs of rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeRange {
    #[serde(rename = "Below 3L", alias = "Below 3 Lakhs")]
    Below3L,
    #[serde(rename = "3-5L", alias = "3-5 Lakhs")]
    From3To5L,
    #[serde(rename = "5-10L", alias = "5-10 Lakhs")]
    From5To10L,
    #[serde(rename = "Above 10L", alias = "Above 10 Lakhs")]
    Above10L,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreCategory {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreCategory {
    pub fn outlook(&self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Eligible for best loans & cards",
            ScoreCategory::Good => "Eligible for most loans",
            ScoreCategory::Fair => "Might face higher interest rates",
            ScoreCategory::Poor => "Loan approval chances low",
        }
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// The five scored factors. Each is documented on a 0-100 scale except
/// `credit_history_years` (years) and `recent_inquiries` (count).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFactors {
    /// Share of payments made on time, 0-100.
    pub payment_history: Decimal,
    /// Credit utilization ratio, 0-100 (lower is better).
    pub credit_utilization: Decimal,
    pub credit_history_years: Decimal,
    /// Quality of the credit mix, 0 (poor) to 100 (excellent).
    pub credit_mix: Decimal,
    pub recent_inquiries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCategoricals {
    pub employment_type: EmploymentType,
    pub income_range: IncomeRange,
    #[serde(default)]
    pub late_payments: u32,
    #[serde(default)]
    pub settled_accounts: u32,
    pub total_accounts: u32,
    /// Outstanding debt as a percentage of sanctioned limits, 0-100.
    pub outstanding_debt_pct: Percent,
}

/// Factor weights; they sum to 1 in the default configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorWeights {
    pub payment_history: Decimal,
    pub credit_utilization: Decimal,
    pub credit_history: Decimal,
    pub credit_mix: Decimal,
    pub recent_inquiries: Decimal,
}

/// Scoring constants. `Default` reproduces the published heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    pub score_floor: Decimal,
    pub score_ceiling: Decimal,
    pub history_points_per_year: Decimal,
    pub inquiry_penalty_points: Decimal,
    pub late_penalty_per_payment: Decimal,
    pub late_penalty_cap: Decimal,
    pub settled_penalty_per_account: Decimal,
    pub excellent_threshold: u32,
    pub good_threshold: u32,
    pub fair_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: FactorWeights {
                payment_history: dec!(0.35),
                credit_utilization: dec!(0.30),
                credit_history: dec!(0.15),
                credit_mix: dec!(0.10),
                recent_inquiries: dec!(0.10),
            },
            score_floor: dec!(300),
            score_ceiling: dec!(900),
            history_points_per_year: dec!(7),
            inquiry_penalty_points: dec!(20),
            late_penalty_per_payment: dec!(5),
            late_penalty_cap: dec!(20),
            settled_penalty_per_account: dec!(10),
            excellent_threshold: 750,
            good_threshold: 700,
            fair_threshold: 650,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreInput {
    pub factors: ScoreFactors,
    pub categoricals: ScoreCategoricals,
    #[serde(default)]
    pub config: ScoringConfig,
}

/// Weighted points contributed by each component (percentage points of the
/// 0-100 composite, before mapping onto the score band).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub payment_history: Decimal,
    pub credit_utilization: Decimal,
    pub credit_history: Decimal,
    pub credit_mix: Decimal,
    pub recent_inquiries: Decimal,
    pub late_payment_penalty: Decimal,
    pub settled_account_penalty: Decimal,
    pub income_bonus: Decimal,
    pub debt_impact: Decimal,
    pub composite_points: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreOutput {
    pub score: u32,
    pub category: ScoreCategory,
    pub outlook: String,
    pub breakdown: ScoreBreakdown,
}

// ---------------------------------------------------------------------------
// Component scoring
// ---------------------------------------------------------------------------

fn income_bonus(employment: EmploymentType, income: IncomeRange) -> Decimal {
    match (employment, income) {
        (EmploymentType::Salaried, IncomeRange::Above10L) => dec!(5),
        (EmploymentType::SelfEmployed, IncomeRange::Above10L) => dec!(3),
        (_, IncomeRange::From5To10L) | (_, IncomeRange::From3To5L) => dec!(2),
        _ => Decimal::ZERO,
    }
}

fn debt_impact(outstanding_debt_pct: Percent) -> Decimal {
    if outstanding_debt_pct > dec!(80) {
        dec!(-10)
    } else if outstanding_debt_pct > dec!(50) {
        dec!(-5)
    } else if outstanding_debt_pct < dec!(20) {
        dec!(2)
    } else {
        Decimal::ZERO
    }
}

fn utilization_multiplier(utilization: Decimal) -> Decimal {
    if utilization < dec!(10) {
        dec!(1.1)
    } else if utilization > dec!(70) {
        dec!(0.8)
    } else {
        Decimal::ONE
    }
}

fn mix_multiplier(total_accounts: u32) -> Decimal {
    if total_accounts < 3 {
        dec!(0.8)
    } else if total_accounts > 10 {
        dec!(0.9)
    } else {
        Decimal::ONE
    }
}

/// Category for an integer score under the given thresholds.
pub fn categorize(score: u32, config: &ScoringConfig) -> ScoreCategory {
    if score >= config.excellent_threshold {
        ScoreCategory::Excellent
    } else if score >= config.good_threshold {
        ScoreCategory::Good
    } else if score >= config.fair_threshold {
        ScoreCategory::Fair
    } else {
        ScoreCategory::Poor
    }
}

/// Product of `terms`, or an out-of-range error naming `field`.
fn product(field: &str, terms: &[Decimal]) -> FinPlanResult<Decimal> {
    terms
        .iter()
        .try_fold(Decimal::ONE, |acc, t| acc.checked_mul(*t))
        .ok_or_else(|| FinPlanError::out_of_range(field))
}

fn difference(field: &str, minuend: Decimal, subtrahend: Decimal) -> FinPlanResult<Decimal> {
    minuend
        .checked_sub(subtrahend)
        .ok_or_else(|| FinPlanError::out_of_range(field))
}

fn validate_config(config: &ScoringConfig) -> FinPlanResult<()> {
    let w = &config.weights;
    for (name, value) in [
        ("config.weights.payment_history", w.payment_history),
        ("config.weights.credit_utilization", w.credit_utilization),
        ("config.weights.credit_history", w.credit_history),
        ("config.weights.credit_mix", w.credit_mix),
        ("config.weights.recent_inquiries", w.recent_inquiries),
    ] {
        if value < Decimal::ZERO {
            return Err(FinPlanError::invalid(name, "Weight cannot be negative"));
        }
    }
    if config.score_floor < BAND_MIN {
        return Err(FinPlanError::invalid(
            "config.score_floor",
            "Score floor cannot be below 300",
        ));
    }
    if config.score_ceiling > BAND_MAX {
        return Err(FinPlanError::invalid(
            "config.score_ceiling",
            "Score ceiling cannot be above 900",
        ));
    }
    if config.score_floor >= config.score_ceiling {
        return Err(FinPlanError::invalid(
            "config.score_floor",
            "Score floor must be below the ceiling",
        ));
    }
    if !(config.fair_threshold <= config.good_threshold
        && config.good_threshold <= config.excellent_threshold)
    {
        return Err(FinPlanError::invalid(
            "config.fair_threshold",
            "Category thresholds must be ordered fair <= good <= excellent",
        ));
    }
    Ok(())
}

fn range_warnings(factors: &ScoreFactors, categoricals: &ScoreCategoricals) -> Vec<String> {
    let mut warnings = Vec::new();
    for (name, value) in [
        ("payment_history", factors.payment_history),
        ("credit_utilization", factors.credit_utilization),
        ("credit_mix", factors.credit_mix),
        ("outstanding_debt_pct", categoricals.outstanding_debt_pct),
    ] {
        if value < Decimal::ZERO || value > HUNDRED {
            warnings.push(format!("{name} = {value} is outside the documented 0-100 range"));
        }
    }
    if factors.credit_history_years < Decimal::ZERO {
        warnings.push("credit_history_years is negative".into());
    }
    warnings
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Estimate a 300-900 credit score from factor and categorical inputs.
///
/// Out-of-range factors are scored as given and flagged in the warnings; the
/// final score is clamped to the band regardless.
pub fn compute_score(
    input: &CreditScoreInput,
) -> FinPlanResult<ComputationOutput<CreditScoreOutput>> {
    let start = Instant::now();
    let config = &input.config;
    validate_config(config)?;

    let f = &input.factors;
    let c = &input.categoricals;
    let w = &config.weights;
    let warnings = range_warnings(f, c);

    // Payment history, less delinquency penalties scaled by its weight
    let late_points = product(
        "categoricals.late_payments",
        &[Decimal::from(c.late_payments), config.late_penalty_per_payment],
    )?
    .min(config.late_penalty_cap);
    let settled_points = product(
        "categoricals.settled_accounts",
        &[Decimal::from(c.settled_accounts), config.settled_penalty_per_account],
    )?;
    let ph_gross = product("factors.payment_history", &[f.payment_history, w.payment_history])?;
    let late_payment_penalty =
        product("categoricals.late_payments", &[late_points, w.payment_history])?
            .min(ph_gross.max(Decimal::ZERO));
    let after_late =
        difference("categoricals.late_payments", ph_gross, late_payment_penalty)?.max(Decimal::ZERO);
    let settled_account_penalty =
        product("categoricals.settled_accounts", &[settled_points, w.payment_history])?
            .min(after_late);
    let payment_history =
        difference("categoricals.settled_accounts", after_late, settled_account_penalty)?;

    let credit_utilization = product(
        "factors.credit_utilization",
        &[
            difference("factors.credit_utilization", HUNDRED, f.credit_utilization)?,
            w.credit_utilization,
            utilization_multiplier(f.credit_utilization),
        ],
    )?;

    let history_multiplier = if f.credit_history_years > dec!(10) {
        dec!(1.1)
    } else {
        Decimal::ONE
    };
    let history_points = product(
        "factors.credit_history_years",
        &[f.credit_history_years, config.history_points_per_year],
    )?
    .min(HUNDRED);
    let credit_history = product(
        "factors.credit_history_years",
        &[history_points, w.credit_history, history_multiplier],
    )?;

    let credit_mix = product(
        "factors.credit_mix",
        &[f.credit_mix, w.credit_mix, mix_multiplier(c.total_accounts)],
    )?;

    let inquiry_points = product(
        "factors.recent_inquiries",
        &[Decimal::from(f.recent_inquiries), config.inquiry_penalty_points],
    )?;
    let recent_inquiries = product(
        "factors.recent_inquiries",
        &[
            difference("factors.recent_inquiries", HUNDRED, inquiry_points)?.max(Decimal::ZERO),
            w.recent_inquiries,
        ],
    )?;

    let income_bonus = income_bonus(c.employment_type, c.income_range);
    let debt_impact = debt_impact(c.outstanding_debt_pct);

    let composite_points = [
        payment_history,
        credit_utilization,
        credit_history,
        credit_mix,
        recent_inquiries,
        income_bonus,
        debt_impact,
    ]
    .iter()
    .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    .ok_or_else(|| FinPlanError::out_of_range("factors"))?;

    // Floor and ceiling are validated to lie inside 300-900
    let band = config.score_ceiling - config.score_floor;
    let raw = (composite_points / HUNDRED)
        .checked_mul(band)
        .and_then(|v| v.checked_add(config.score_floor))
        .ok_or_else(|| FinPlanError::out_of_range("factors"))?;
    let clamped = raw.max(config.score_floor).min(config.score_ceiling);
    let score = clamped.trunc().to_u32().ok_or_else(|| {
        FinPlanError::invalid("config.score_floor", "Score band must be non-negative")
    })?;
    let category = categorize(score, config);

    log::debug!(
        "compute_score: composite={} raw={} score={score} category={category:?}",
        composite_points,
        raw
    );

    let output = CreditScoreOutput {
        score,
        category,
        outlook: category.outlook().to_string(),
        breakdown: ScoreBreakdown {
            payment_history,
            credit_utilization,
            credit_history,
            credit_mix,
            recent_inquiries,
            late_payment_penalty,
            settled_account_penalty,
            income_bonus,
            debt_impact,
            composite_points,
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted credit score heuristic (35/30/15/10/10, 300-900 band)",
        &serde_json::json!({
            "employment_type": format!("{:?}", c.employment_type),
            "income_range": format!("{:?}", c.income_range),
            "total_accounts": c.total_accounts,
            "score_floor": config.score_floor.to_string(),
            "score_ceiling": config.score_ceiling.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
