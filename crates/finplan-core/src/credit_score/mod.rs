pub mod eligibility;
pub mod scorecard;
