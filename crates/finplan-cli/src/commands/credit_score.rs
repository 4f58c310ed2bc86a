use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finplan_core::credit_score::eligibility::{self, EligibilityConfig, EligibilityInput};
use finplan_core::credit_score::scorecard::{self, CreditScoreInput};

use crate::input;

#[derive(Args)]
pub struct CreditScoreArgs {
    /// Path to JSON input file with factors and categoricals
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the loan eligibility screen
#[derive(Args)]
pub struct LoanEligibilityArgs {
    /// Credit score on the 300-900 scale
    #[arg(long)]
    pub score: Option<u32>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_credit_score(args: CreditScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: CreditScoreInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };
    let result = scorecard::compute_score(&input_data)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_loan_eligibility(args: LoanEligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EligibilityInput {
            credit_score: args.score.ok_or("--score is required (or provide --input)")?,
            annual_income: args.income.ok_or("--income is required (or provide --input)")?,
            config: EligibilityConfig::default(),
        }
    };
    let result = eligibility::check_loan_eligibility(&input_data)?;
    Ok(serde_json::to_value(result)?)
}
