use finplan_core::credit_score::eligibility::{self, EligibilityConfig, EligibilityInput};
use finplan_core::credit_score::scorecard::{self, CreditScoreInput, ScoreCategory};
use finplan_core::growth::{scenarios, sip, suggestions};
use finplan_core::loan::amortization::{self, LoanInput, RepaymentPolicy};
use finplan_core::FinPlanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization
// ===========================================================================

fn loan_json(policy: &str, params: &str) -> LoanInput {
    let raw = format!(
        r#"{{"principal": "500000", "annual_rate_pct": "8.5", "tenure_months": 240,
            "policy": "{policy}", "params": {params}}}"#
    );
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_every_policy_retires_the_principal() {
    let cases = [
        ("Standard", "{}"),
        ("StepUp", r#"{"step_rate_pct": "5"}"#),
        ("StepDown", r#"{"step_rate_pct": "5"}"#),
        ("ExtraPayment", r#"{"extra_payment": "2000"}"#),
        ("InterestOnly", "{}"),
        ("Balloon", r#"{"balloon_pct": "30"}"#),
    ];
    for (policy, params) in cases {
        let out = amortization::build_schedule(&loan_json(policy, params))
            .unwrap()
            .result;
        let repaid = out.total_principal + out.terminal_payment.unwrap_or(Decimal::ZERO);
        assert!(
            (repaid - dec!(500_000)).abs() < dec!(0.01),
            "{policy}: repaid {repaid}"
        );
        assert!(out.total_interest >= Decimal::ZERO, "{policy}");
        for p in &out.periods {
            assert!(p.remaining_balance >= Decimal::ZERO, "{policy} period {}", p.period);
        }
    }
}

#[test]
fn test_prepayment_beats_standard_on_interest() {
    let standard = amortization::build_schedule(&loan_json("Standard", "{}"))
        .unwrap()
        .result;
    let extra = amortization::build_schedule(&loan_json(
        "ExtraPayment",
        r#"{"extra_payment": "2000"}"#,
    ))
    .unwrap()
    .result;
    assert!(extra.total_interest < standard.total_interest);
    assert!(extra.periods_to_payoff < standard.periods_to_payoff);
}

#[test]
fn test_interest_only_costs_most_interest() {
    let standard = amortization::build_schedule(&loan_json("Standard", "{}"))
        .unwrap()
        .result;
    let io = amortization::build_schedule(&loan_json("InterestOnly", "{}"))
        .unwrap()
        .result;
    assert_eq!(io.policy, RepaymentPolicy::InterestOnly);
    assert!(io.total_interest > standard.total_interest);
    assert_eq!(io.terminal_payment, Some(dec!(500_000)));
}

#[test]
fn test_invalid_loan_reports_field() {
    let mut input = loan_json("Standard", "{}");
    input.tenure_months = 0;
    match amortization::build_schedule(&input) {
        Err(FinPlanError::InvalidInput { field, .. }) => assert_eq!(field, "tenure_months"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

// ===========================================================================
// Credit score
// ===========================================================================

fn onboarding_profile() -> CreditScoreInput {
    serde_json::from_str(
        r#"{
            "factors": {
                "payment_history": "90",
                "credit_utilization": "30",
                "credit_history_years": "5",
                "credit_mix": "70",
                "recent_inquiries": 1
            },
            "categoricals": {
                "employment_type": "Salaried Employee",
                "income_range": "5-10 Lakhs",
                "late_payments": 0,
                "settled_accounts": 0,
                "total_accounts": 3,
                "outstanding_debt_pct": "25"
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn test_onboarding_labels_score() {
    let out = scorecard::compute_score(&onboarding_profile()).unwrap();
    assert_eq!(out.result.score, 748);
    assert_eq!(out.result.category, ScoreCategory::Good);
    assert_eq!(out.result.outlook, "Eligible for most loans");
}

#[test]
fn test_score_stays_in_band_for_extremes() {
    let mut worst = onboarding_profile();
    worst.factors.payment_history = Decimal::ZERO;
    worst.factors.credit_utilization = dec!(100);
    worst.factors.credit_history_years = Decimal::ZERO;
    worst.factors.credit_mix = Decimal::ZERO;
    worst.factors.recent_inquiries = 10;
    worst.categoricals.late_payments = 12;
    worst.categoricals.settled_accounts = 4;
    worst.categoricals.outstanding_debt_pct = dec!(95);
    let low = scorecard::compute_score(&worst).unwrap().result;
    assert!(low.score >= 300);
    assert_eq!(low.category, ScoreCategory::Poor);

    let mut best = onboarding_profile();
    best.factors.payment_history = dec!(100);
    best.factors.credit_utilization = Decimal::ZERO;
    best.factors.credit_history_years = dec!(30);
    best.factors.credit_mix = dec!(100);
    best.factors.recent_inquiries = 0;
    let high = scorecard::compute_score(&best).unwrap().result;
    assert!(high.score <= 900);
    assert_eq!(high.category, ScoreCategory::Excellent);
}

#[test]
fn test_late_payments_never_raise_score() {
    let base = scorecard::compute_score(&onboarding_profile()).unwrap().result;
    let mut late = onboarding_profile();
    late.categoricals.late_payments = 3;
    let penalised = scorecard::compute_score(&late).unwrap().result;
    assert!(penalised.score < base.score);
}

#[test]
fn test_computed_score_feeds_eligibility() {
    let score = scorecard::compute_score(&onboarding_profile()).unwrap().result.score;
    let decision = eligibility::check_loan_eligibility(&EligibilityInput {
        credit_score: score,
        annual_income: dec!(900_000),
        config: EligibilityConfig::default(),
    })
    .unwrap()
    .result;
    assert_eq!(decision.eligible, score >= 580);
}

#[test]
fn test_worst_profile_is_declined() {
    let mut worst = onboarding_profile();
    worst.factors.payment_history = Decimal::ZERO;
    worst.factors.credit_utilization = dec!(100);
    worst.factors.credit_mix = Decimal::ZERO;
    worst.categoricals.late_payments = 10;
    let score = scorecard::compute_score(&worst).unwrap().result.score;
    assert!(score < 580, "score {score}");
    let decision = eligibility::check_loan_eligibility(&EligibilityInput {
        credit_score: score,
        annual_income: dec!(900_000),
        config: EligibilityConfig::default(),
    })
    .unwrap()
    .result;
    assert!(!decision.eligible);
}

// ===========================================================================
// Growth
// ===========================================================================

fn sample_sip() -> sip::GrowthInput {
    sip::GrowthInput {
        monthly_contribution: dec!(5_000),
        annual_rate_pct: dec!(12),
        years: 15,
        step_up_pct: dec!(10),
        inflation_pct: dec!(6),
    }
}

#[test]
fn test_sip_projection_totals_agree_with_yearly_rows() {
    let out = sip::project_growth(&sample_sip()).unwrap().result;
    let last = out.yearly.last().unwrap();
    assert_eq!(out.yearly.len(), 15);
    assert_eq!(last.cumulative_contributed, out.total_invested);
    assert_eq!(last.nominal_future_value, out.future_value);
    assert_eq!(out.total_returns, out.future_value - out.total_invested);
    assert!(out.inflation_adjusted_value < out.future_value);
}

#[test]
fn test_scenarios_scale_with_contribution() {
    let input = scenarios::ScenarioComparisonInput {
        base: sample_sip(),
        multipliers: scenarios::default_multipliers(),
    };
    let out = scenarios::compare_contribution_scenarios(&input).unwrap().result;
    assert_eq!(out.scenarios.len(), 4);
    for pair in out.scenarios.windows(2) {
        assert!(pair[1].future_value > pair[0].future_value);
    }
    let base = sip::project_growth(&sample_sip()).unwrap().result;
    assert!((out.scenarios[1].future_value - base.future_value).abs() < dec!(0.000001));
}

#[test]
fn test_suggested_plan_feeds_projection() {
    let profile: suggestions::InvestorProfile = serde_json::from_str(
        r#"{
            "age": 28,
            "monthly_income": "80000",
            "expenses": {"rent_mortgage": "20000", "food_dining": "8000", "utilities": "4000"},
            "risk_tolerance": "Aggressive",
            "experience": "Intermediate (2-5 years)"
        }"#,
    )
    .unwrap();
    let plan = suggestions::suggest_sip_plan(&profile).unwrap().result;
    assert_eq!(plan.monthly_surplus, dec!(48_000));
    assert_eq!(plan.recommended_sip, dec!(12_000));
    assert_eq!(plan.investment_duration_years, 32);
    assert_eq!(plan.expected_return_pct, dec!(15));
    assert_eq!(plan.step_up_pct, dec!(7.5));

    let projection = sip::project_growth(&sip::GrowthInput {
        monthly_contribution: plan.recommended_sip,
        annual_rate_pct: plan.expected_return_pct,
        years: plan.investment_duration_years,
        step_up_pct: plan.step_up_pct,
        inflation_pct: Decimal::ZERO,
    })
    .unwrap()
    .result;
    assert!(projection.future_value > projection.total_invested);
}

#[test]
fn test_insights_from_json() {
    let input: suggestions::SipInsightsInput = serde_json::from_str(
        r#"{
            "profile": {
                "age": 28,
                "monthly_income": "80000",
                "expenses": {"rent_mortgage": "20000", "food_dining": "8000", "utilities": "4000"}
            },
            "plan": {"monthly_contribution": "12000", "annual_rate_pct": "15", "years": 32},
            "target_corpus_lakhs": "500"
        }"#,
    )
    .unwrap();
    let insights = suggestions::sip_insights(&input).unwrap().result;
    let projection = sip::project_growth(&input.plan).unwrap().result;
    assert_eq!(insights.projected_value, projection.future_value);
    assert_eq!(insights.monthly_surplus, dec!(48_000));
    assert_eq!(insights.sip_pct_of_income, dec!(15));
    assert!(insights.sip_allocation_ok);
    assert_eq!(insights.years_to_retirement, 32);
    // 40% of 48,000 less 12,000
    assert_eq!(insights.optimization_scope, dec!(7_200));
    assert_eq!(insights.elss_potential, dec!(144_000));
    assert_eq!(
        insights.corpus_gap,
        (dec!(50_000_000) - projection.future_value).max(Decimal::ZERO)
    );
}

#[test]
fn test_negative_expense_line_reports_field() {
    let profile: suggestions::InvestorProfile = serde_json::from_str(
        r#"{"age": 30, "monthly_income": "50000",
            "expenses": {"rent_mortgage": "-4000", "food_dining": "5000"}}"#,
    )
    .unwrap();
    match suggestions::suggest_sip_plan(&profile) {
        Err(FinPlanError::InvalidInput { field, .. }) => {
            assert_eq!(field, "expenses.rent_mortgage")
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}
