//! Insurance coverage check: points per policy held, out of 100, with a
//! recommendation for every uncovered line.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput};
use crate::FinPlanResult;

const GOOD_SCORE: u32 = 70;
const WARNING_SCORE: u32 = 40;

// ---------------------------------------------------------------------------
// Coverage tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthCoverage {
    #[default]
    #[serde(alias = "No Coverage")]
    None,
    #[serde(alias = "Basic Coverage")]
    Basic,
    #[serde(alias = "Comprehensive Coverage")]
    Comprehensive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoCoverage {
    #[default]
    #[serde(alias = "No Coverage")]
    None,
    #[serde(alias = "Liability Only")]
    LiabilityOnly,
    #[serde(alias = "Full Coverage")]
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeCoverage {
    #[default]
    #[serde(alias = "No Coverage")]
    None,
    #[serde(alias = "Renters Insurance")]
    Renters,
    #[serde(alias = "Homeowners Insurance")]
    Homeowners,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeCoverage {
    #[default]
    #[serde(alias = "No Coverage")]
    None,
    #[serde(alias = "Term Life")]
    Term,
    #[serde(alias = "Whole Life")]
    Whole,
}

impl HealthCoverage {
    fn points(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Basic => 25,
            Self::Comprehensive => 35,
        }
    }
}

impl AutoCoverage {
    fn points(self) -> u32 {
        match self {
            Self::None => 0,
            Self::LiabilityOnly => 15,
            Self::Full => 20,
        }
    }
}

impl HomeCoverage {
    fn points(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Renters => 15,
            Self::Homeowners => 25,
        }
    }
}

impl LifeCoverage {
    fn points(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Term => 15,
            Self::Whole => 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Policies held; an absent line counts as uncovered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceInput {
    #[serde(default)]
    pub health: HealthCoverage,
    #[serde(default)]
    pub auto: AutoCoverage,
    #[serde(default)]
    pub home: HomeCoverage,
    #[serde(default)]
    pub life: LifeCoverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageRating {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageBreakdown {
    pub health: u32,
    pub auto: u32,
    pub home: u32,
    pub life: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceAssessment {
    /// Out of 100.
    pub coverage_score: u32,
    pub rating: CoverageRating,
    pub breakdown: CoverageBreakdown,
    pub recommendations: Vec<String>,
}

/// Rating band for a coverage score.
pub fn rate_coverage(score: u32) -> CoverageRating {
    if score >= GOOD_SCORE {
        CoverageRating::Good
    } else if score >= WARNING_SCORE {
        CoverageRating::Warning
    } else {
        CoverageRating::Danger
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn evaluate_insurance(
    input: &InsuranceInput,
) -> FinPlanResult<ComputationOutput<InsuranceAssessment>> {
    let start = Instant::now();

    let breakdown = CoverageBreakdown {
        health: input.health.points(),
        auto: input.auto.points(),
        home: input.home.points(),
        life: input.life.points(),
    };
    let coverage_score = breakdown.health + breakdown.auto + breakdown.home + breakdown.life;

    let mut recommendations = Vec::new();
    if input.health == HealthCoverage::None {
        recommendations.push("Consider getting health insurance to protect against medical costs".to_string());
    }
    if input.auto == AutoCoverage::None {
        recommendations.push("Auto insurance is legally required in most states".to_string());
    }
    if input.home == HomeCoverage::None {
        recommendations.push("Consider getting home/renters insurance to protect your property".to_string());
    }
    if input.life == LifeCoverage::None {
        recommendations.push("Consider life insurance if you have dependents".to_string());
    }

    let rating = rate_coverage(coverage_score);
    log::debug!("evaluate_insurance: score={coverage_score} rating={rating:?}");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Insurance coverage points (health 35, home 25, auto 20, life 20)",
        &serde_json::json!({
            "health": format!("{:?}", input.health),
            "auto": format!("{:?}", input.auto),
            "home": format!("{:?}", input.home),
            "life": format!("{:?}", input.life),
        }),
        Vec::new(),
        elapsed,
        InsuranceAssessment {
            coverage_score,
            rating,
            breakdown,
            recommendations,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assess(input: &InsuranceInput) -> InsuranceAssessment {
        evaluate_insurance(input).unwrap().result
    }

    #[test]
    fn test_full_cover_scores_100() {
        let out = assess(&InsuranceInput {
            health: HealthCoverage::Comprehensive,
            auto: AutoCoverage::Full,
            home: HomeCoverage::Homeowners,
            life: LifeCoverage::Whole,
        });
        assert_eq!(out.coverage_score, 100);
        assert_eq!(out.rating, CoverageRating::Good);
        assert!(out.recommendations.is_empty());
    }

    #[test]
    fn test_no_cover_recommends_every_line() {
        let out = assess(&InsuranceInput::default());
        assert_eq!(out.coverage_score, 0);
        assert_eq!(out.rating, CoverageRating::Danger);
        assert_eq!(
            out.recommendations,
            vec![
                "Consider getting health insurance to protect against medical costs",
                "Auto insurance is legally required in most states",
                "Consider getting home/renters insurance to protect your property",
                "Consider life insurance if you have dependents",
            ]
        );
    }

    #[test]
    fn test_partial_cover_breakdown() {
        let out = assess(&InsuranceInput {
            health: HealthCoverage::Basic,
            auto: AutoCoverage::LiabilityOnly,
            home: HomeCoverage::Renters,
            life: LifeCoverage::None,
        });
        assert_eq!(
            out.breakdown,
            CoverageBreakdown {
                health: 25,
                auto: 15,
                home: 15,
                life: 0,
            }
        );
        assert_eq!(out.coverage_score, 55);
        assert_eq!(out.rating, CoverageRating::Warning);
        assert_eq!(out.recommendations, vec!["Consider life insurance if you have dependents"]);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rate_coverage(70), CoverageRating::Good);
        assert_eq!(rate_coverage(69), CoverageRating::Warning);
        assert_eq!(rate_coverage(40), CoverageRating::Warning);
        assert_eq!(rate_coverage(39), CoverageRating::Danger);
    }

    #[test]
    fn test_display_labels_deserialize() {
        let input: InsuranceInput = serde_json::from_str(
            r#"{"health": "Comprehensive Coverage", "auto": "Liability Only",
                "home": "No Coverage", "life": "Term Life"}"#,
        )
        .unwrap();
        assert_eq!(input.health, HealthCoverage::Comprehensive);
        assert_eq!(input.auto, AutoCoverage::LiabilityOnly);
        assert_eq!(input.home, HomeCoverage::None);
        assert_eq!(input.life, LifeCoverage::Term);
        assert_eq!(assess(&input).coverage_score, 65);
    }

    #[test]
    fn test_missing_lines_default_to_uncovered() {
        let input: InsuranceInput = serde_json::from_str(r#"{"health": "Basic"}"#).unwrap();
        let out = assess(&input);
        assert_eq!(out.coverage_score, 25);
        assert_eq!(out.recommendations.len(), 3);
    }
}
