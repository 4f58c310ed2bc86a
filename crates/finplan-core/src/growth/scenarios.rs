use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::growth::sip::{project_growth, GrowthInput};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinPlanResult;

/// Contribution multipliers compared when none are supplied.
pub fn default_multipliers() -> Vec<Decimal> {
    vec![dec!(0.5), dec!(1.0), dec!(1.5), dec!(2.0)]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    /// Base plan; each scenario scales its monthly contribution.
    pub base: GrowthInput,
    #[serde(default = "default_multipliers")]
    pub multipliers: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionScenario {
    pub multiplier: Decimal,
    pub monthly_contribution: Money,
    pub total_invested: Money,
    pub future_value: Money,
    pub total_returns: Money,
    pub inflation_adjusted_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonOutput {
    pub scenarios: Vec<ContributionScenario>,
}

/// Re-run the SIP projection at several contribution levels.
///
/// Scenarios are independent projections; no state is shared between them.
pub fn compare_contribution_scenarios(
    input: &ScenarioComparisonInput,
) -> FinPlanResult<ComputationOutput<ScenarioComparisonOutput>> {
    let start = Instant::now();

    if input.multipliers.is_empty() {
        return Err(FinPlanError::invalid(
            "multipliers",
            "At least one contribution multiplier is required",
        ));
    }
    if let Some(m) = input.multipliers.iter().find(|m| **m <= Decimal::ZERO) {
        return Err(FinPlanError::invalid(
            "multipliers",
            format!("Multiplier {m} must be positive"),
        ));
    }

    let scenarios = input
        .multipliers
        .iter()
        .map(|&multiplier| {
            let scaled = GrowthInput {
                monthly_contribution: input
                    .base
                    .monthly_contribution
                    .checked_mul(multiplier)
                    .ok_or_else(|| FinPlanError::out_of_range("multipliers"))?,
                ..input.base.clone()
            };
            let projection = project_growth(&scaled)?.result;
            Ok(ContributionScenario {
                multiplier,
                monthly_contribution: scaled.monthly_contribution,
                total_invested: projection.total_invested,
                future_value: projection.future_value,
                total_returns: projection.total_returns,
                inflation_adjusted_value: projection.inflation_adjusted_value,
            })
        })
        .collect::<FinPlanResult<Vec<_>>>()?;

    log::debug!("compare_contribution_scenarios: {} scenarios", scenarios.len());

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP contribution scenario comparison",
        &serde_json::json!({
            "base_monthly_contribution": input.base.monthly_contribution.to_string(),
            "annual_rate_pct": input.base.annual_rate_pct.to_string(),
            "years": input.base.years,
            "multipliers": input.multipliers.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
        }),
        Vec::new(),
        elapsed,
        ScenarioComparisonOutput { scenarios },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn base_plan() -> GrowthInput {
        GrowthInput {
            monthly_contribution: dec!(10_000),
            annual_rate_pct: dec!(12),
            years: 10,
            step_up_pct: Decimal::ZERO,
            inflation_pct: dec!(6),
        }
    }

    #[test]
    fn test_default_multipliers_scale_contributions() {
        let input: ScenarioComparisonInput = serde_json::from_value(serde_json::json!({
            "base": serde_json::to_value(base_plan()).unwrap(),
        }))
        .unwrap();
        let out = compare_contribution_scenarios(&input).unwrap().result;

        let monthly: Vec<Decimal> = out.scenarios.iter().map(|s| s.monthly_contribution).collect();
        assert_eq!(
            monthly,
            vec![dec!(5_000), dec!(10_000), dec!(15_000), dec!(20_000)]
        );
    }

    #[test]
    fn test_future_value_scales_linearly() {
        let input = ScenarioComparisonInput {
            base: base_plan(),
            multipliers: default_multipliers(),
        };
        let out = compare_contribution_scenarios(&input).unwrap().result;
        let base_fv = out.scenarios[1].future_value;
        let double_fv = out.scenarios[3].future_value;
        assert!((double_fv - base_fv * dec!(2)).abs() < dec!(0.001));
        for s in &out.scenarios {
            assert!(s.inflation_adjusted_value < s.future_value);
        }
    }

    #[test]
    fn test_matches_direct_projection() {
        let input = ScenarioComparisonInput {
            base: base_plan(),
            multipliers: vec![dec!(1)],
        };
        let out = compare_contribution_scenarios(&input).unwrap().result;
        let direct = project_growth(&base_plan()).unwrap().result;
        assert_eq!(out.scenarios[0].future_value, direct.future_value);
        assert_eq!(out.scenarios[0].total_invested, direct.total_invested);
    }

    #[test]
    fn test_empty_multipliers_error() {
        let input = ScenarioComparisonInput {
            base: base_plan(),
            multipliers: Vec::new(),
        };
        assert!(compare_contribution_scenarios(&input).is_err());
    }

    #[test]
    fn test_non_positive_multiplier_error() {
        let input = ScenarioComparisonInput {
            base: base_plan(),
            multipliers: vec![dec!(1), dec!(0)],
        };
        assert!(compare_contribution_scenarios(&input).is_err());
    }

    #[test]
    fn test_oversized_multiplier_error() {
        let input = ScenarioComparisonInput {
            base: base_plan(),
            multipliers: vec![dec!(1), dec!(100_000_000_000_000_000_000_000_000)],
        };
        match compare_contribution_scenarios(&input) {
            Err(FinPlanError::InvalidInput { field, .. }) => assert_eq!(field, "multipliers"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
