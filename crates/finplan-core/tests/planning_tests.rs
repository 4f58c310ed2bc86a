#![cfg(all(feature = "wealth", feature = "tax"))]

use finplan_core::tax::income_tax::{self, IncomeTaxInput, TaxRegimeConfig, TaxSlab};
use finplan_core::wealth::expenses::{self, BudgetStatus, ExpenseInput};
use finplan_core::wealth::insurance::{self, CoverageRating, InsuranceInput};
use finplan_core::wealth::retirement::{self, RetirementInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Retirement
// ===========================================================================

fn early_saver() -> RetirementInput {
    RetirementInput {
        current_age: 30,
        retirement_age: 60,
        life_expectancy: 85,
        current_savings: dec!(500_000),
        annual_contribution: dec!(120_000),
        annual_return_pct: dec!(8),
        inflation_pct: Decimal::ZERO,
        desired_annual_income: dec!(200_000),
        pension_income: Decimal::ZERO,
        provident_fund_income: Decimal::ZERO,
    }
}

#[test]
fn test_modest_need_lasts_through_life_expectancy() {
    let out = retirement::plan_retirement(&early_saver()).unwrap().result;
    assert_eq!(out.income_gap.annual_shortfall, dec!(200_000));
    assert!(out.decumulation_phase.savings_last);
    assert_eq!(out.decumulation_phase.years_savings_last, 25);
    assert!(
        (out.decumulation_phase.balance_at_end - dec!(112_933_811.44)).abs() < dec!(0.01),
        "end={}",
        out.decumulation_phase.balance_at_end
    );
    assert_eq!(out.decumulation_schedule.len(), 26);
}

#[test]
fn test_higher_contribution_grows_corpus() {
    let base = retirement::plan_retirement(&early_saver()).unwrap().result;
    let mut richer = early_saver();
    richer.annual_contribution = dec!(240_000);
    let more = retirement::plan_retirement(&richer).unwrap().result;
    assert!(
        more.accumulation_phase.corpus_at_retirement > base.accumulation_phase.corpus_at_retirement
    );
}

#[test]
fn test_retirement_input_from_json() {
    let input: RetirementInput = serde_json::from_str(
        r#"{
            "current_age": 50, "retirement_age": 55, "life_expectancy": 60,
            "current_savings": "1000000", "annual_contribution": "0",
            "annual_return_pct": "10", "inflation_pct": "0",
            "desired_annual_income": "100000"
        }"#,
    )
    .unwrap();
    assert_eq!(input.pension_income, Decimal::ZERO);
    let out = retirement::plan_retirement(&input).unwrap().result;
    assert_eq!(out.accumulation_phase.corpus_at_retirement, dec!(1_610_510));
}

// ===========================================================================
// Expenses
// ===========================================================================

#[test]
fn test_expense_report_from_json() {
    let input: ExpenseInput = serde_json::from_str(
        r#"{
            "expenses": [
                {"date": "2025-04-02", "category": "Food", "amount": "450", "description": "Lunch"},
                {"date": "2025-04-10", "category": "Travel", "amount": "1200"},
                {"date": "2025-03-30", "category": "Food", "amount": "300"}
            ],
            "monthly_budget": "1500"
        }"#,
    )
    .unwrap();
    let out = expenses::analyze_expenses(&input).unwrap().result;
    assert_eq!(out.total_spent, dec!(1_950));
    assert_eq!(out.month.as_deref(), Some("2025-04"));
    assert_eq!(out.month_total, dec!(1_650));
    assert_eq!(
        out.budget_status,
        Some(BudgetStatus::OverBudget { excess: dec!(150) })
    );
    assert_eq!(out.ledger[0].category, "Travel");
    assert_eq!(out.ledger[1].description.as_deref(), Some("Lunch"));
}

// ===========================================================================
// Insurance
// ===========================================================================

#[test]
fn test_insurance_from_display_labels() {
    let input: InsuranceInput = serde_json::from_str(
        r#"{
            "health": "Basic Coverage",
            "auto": "Full Coverage",
            "home": "Homeowners Insurance",
            "life": "No Coverage"
        }"#,
    )
    .unwrap();
    let out = insurance::evaluate_insurance(&input).unwrap().result;
    assert_eq!(out.coverage_score, 70);
    assert_eq!(out.rating, CoverageRating::Good);
    assert_eq!(
        out.recommendations,
        vec!["Consider life insurance if you have dependents".to_string()]
    );
}

// ===========================================================================
// Income tax
// ===========================================================================

#[test]
fn test_tax_is_monotonic_in_income() {
    let mut previous = Decimal::ZERO;
    let mut gross = dec!(500_000);
    while gross <= dec!(4_000_000) {
        let input = IncomeTaxInput {
            gross_income: gross,
            is_salaried: true,
            other_deductions: Decimal::ZERO,
            config: TaxRegimeConfig::default(),
        };
        let out = income_tax::compute_income_tax(&input).unwrap().result;
        assert!(out.total_tax >= previous, "tax fell at {gross}");
        assert!(out.net_income > Decimal::ZERO);
        previous = out.total_tax;
        gross += dec!(25_000);
    }
}

#[test]
fn test_custom_flat_regime() {
    let input = IncomeTaxInput {
        gross_income: dec!(1_000_000),
        is_salaried: false,
        other_deductions: Decimal::ZERO,
        config: TaxRegimeConfig {
            name: "Flat 10%".into(),
            slabs: vec![TaxSlab {
                upper: None,
                rate_pct: dec!(10),
            }],
            standard_deduction: Decimal::ZERO,
            rebate_limit: Decimal::ZERO,
            rebate_income_threshold: Decimal::ZERO,
            cess_pct: Decimal::ZERO,
        },
    };
    let out = income_tax::compute_income_tax(&input).unwrap().result;
    assert_eq!(out.total_tax, dec!(100_000));
    assert_eq!(out.regime, "Flat 10%");
}
