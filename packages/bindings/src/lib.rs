use napi::Result as NapiResult;
use napi_derive::napi;

use finplan_core::credit_score::{eligibility, scorecard};
use finplan_core::growth::{scenarios, sip, suggestions};
use finplan_core::loan::amortization;
use finplan_core::tax::income_tax;
use finplan_core::wealth::{expenses, insurance, retirement};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn build_loan_schedule(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Credit score
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_credit_score(input_json: String) -> NapiResult<String> {
    let input: scorecard::CreditScoreInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scorecard::compute_score(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn check_loan_eligibility(input_json: String) -> NapiResult<String> {
    let input: eligibility::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = eligibility::check_loan_eligibility(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[napi]
pub fn project_sip(input_json: String) -> NapiResult<String> {
    let input: sip::GrowthInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sip::project_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_sip_scenarios(input_json: String) -> NapiResult<String> {
    let input: scenarios::ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::compare_contribution_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn suggest_sip(input_json: String) -> NapiResult<String> {
    let input: suggestions::InvestorProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = suggestions::suggest_sip_plan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sip_insights(input_json: String) -> NapiResult<String> {
    let input: suggestions::SipInsightsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = suggestions::sip_insights(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Wealth
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_retirement(input_json: String) -> NapiResult<String> {
    let input: retirement::RetirementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = retirement::plan_retirement(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_expenses(input_json: String) -> NapiResult<String> {
    let input: expenses::ExpenseInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = expenses::analyze_expenses(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_insurance(input_json: String) -> NapiResult<String> {
    let input: insurance::InsuranceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = insurance::evaluate_insurance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_income_tax(input_json: String) -> NapiResult<String> {
    let input: income_tax::IncomeTaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = income_tax::compute_income_tax(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
