//! Loan eligibility screen from a credit score and annual income.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinPlanResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Scores below this are declined.
    pub min_score: u32,
    /// Scores below this pass with a pricing note.
    pub fair_score: u32,
    pub low_income_threshold: Money,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_score: 580,
            fair_score: 670,
            low_income_threshold: dec!(30_000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub credit_score: u32,
    pub annual_income: Money,
    #[serde(default)]
    pub config: EligibilityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    /// Decline reasons, or notes attached to an approval.
    pub reasons: Vec<String>,
}

/// Screen an applicant for loan eligibility.
///
/// Only the score can decline; a low income adds a note but never flips the
/// decision.
pub fn check_loan_eligibility(
    input: &EligibilityInput,
) -> FinPlanResult<ComputationOutput<EligibilityDecision>> {
    let start = Instant::now();
    let config = &input.config;

    if input.annual_income < Decimal::ZERO {
        return Err(FinPlanError::invalid("annual_income", "Income cannot be negative"));
    }
    if config.min_score > config.fair_score {
        return Err(FinPlanError::invalid(
            "config.min_score",
            "Minimum score cannot exceed the fair score",
        ));
    }

    let mut eligible = true;
    let mut reasons = Vec::new();
    if input.credit_score < config.min_score {
        eligible = false;
        reasons.push(format!("Credit score is too low (below {})", config.min_score));
    } else if input.credit_score < config.fair_score {
        reasons.push("Credit score is fair, which may result in higher interest rates".to_string());
    }
    if input.annual_income < config.low_income_threshold {
        reasons.push("Income is relatively low, which may limit loan amount".to_string());
    }

    log::debug!(
        "check_loan_eligibility: score={} eligible={eligible} notes={}",
        input.credit_score,
        reasons.len()
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan eligibility screen (score floor, fair band, income note)",
        &serde_json::json!({
            "min_score": config.min_score,
            "fair_score": config.fair_score,
            "low_income_threshold": config.low_income_threshold.to_string(),
        }),
        Vec::new(),
        elapsed,
        EligibilityDecision { eligible, reasons },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn applicant(credit_score: u32, annual_income: Money) -> EligibilityInput {
        EligibilityInput {
            credit_score,
            annual_income,
            config: EligibilityConfig::default(),
        }
    }

    fn decide(input: &EligibilityInput) -> EligibilityDecision {
        check_loan_eligibility(input).unwrap().result
    }

    #[test]
    fn test_good_score_and_income_clean_approval() {
        assert_eq!(
            decide(&applicant(748, dec!(1_200_000))),
            EligibilityDecision {
                eligible: true,
                reasons: Vec::new(),
            }
        );
    }

    #[test]
    fn test_low_score_declined() {
        let out = decide(&applicant(579, dec!(1_200_000)));
        assert!(!out.eligible);
        assert_eq!(out.reasons, vec!["Credit score is too low (below 580)"]);
    }

    #[test]
    fn test_fair_score_approved_with_note() {
        let out = decide(&applicant(580, dec!(1_200_000)));
        assert!(out.eligible);
        assert_eq!(
            out.reasons,
            vec!["Credit score is fair, which may result in higher interest rates"]
        );
        assert!(decide(&applicant(670, dec!(1_200_000))).reasons.is_empty());
    }

    #[test]
    fn test_low_income_is_a_note_not_a_decline() {
        let out = decide(&applicant(720, dec!(29_999)));
        assert!(out.eligible);
        assert_eq!(out.reasons, vec!["Income is relatively low, which may limit loan amount"]);
        assert!(decide(&applicant(720, dec!(30_000))).reasons.is_empty());
    }

    #[test]
    fn test_declined_with_both_reasons() {
        let out = decide(&applicant(500, dec!(10_000)));
        assert!(!out.eligible);
        assert_eq!(out.reasons.len(), 2);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut input = applicant(640, dec!(500_000));
        input.config.min_score = 650;
        input.config.fair_score = 700;
        let out = decide(&input);
        assert!(!out.eligible);
        assert_eq!(out.reasons, vec!["Credit score is too low (below 650)"]);
    }

    #[test]
    fn test_negative_income_error() {
        assert!(check_loan_eligibility(&applicant(700, dec!(-1))).is_err());
    }

    #[test]
    fn test_inverted_thresholds_error() {
        let mut input = applicant(700, dec!(500_000));
        input.config.min_score = 700;
        input.config.fair_score = 600;
        assert!(check_loan_eligibility(&input).is_err());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let input: EligibilityInput =
            serde_json::from_str(r#"{"credit_score": 600, "annual_income": "450000"}"#).unwrap();
        assert_eq!(input.config.min_score, 580);
        assert!(decide(&input).eligible);
    }
}
