use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finplan_core::wealth::expenses::{self, ExpenseInput};
use finplan_core::wealth::insurance::{self, InsuranceInput};
use finplan_core::wealth::retirement::{self, RetirementInput};

use crate::input;

/// Arguments for the insurance coverage check. Each line takes a tier name
/// (e.g. `Comprehensive`) or its display label (e.g. "Term Life").
#[derive(Args)]
pub struct InsuranceArgs {
    #[arg(long, default_value = "None")]
    pub health: String,

    #[arg(long, default_value = "None")]
    pub auto: String,

    #[arg(long, default_value = "None")]
    pub home: String,

    #[arg(long, default_value = "None")]
    pub life: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for retirement planning
#[derive(Args)]
pub struct RetirementArgs {
    #[arg(long)]
    pub current_age: Option<u32>,

    #[arg(long, default_value = "60")]
    pub retirement_age: u32,

    #[arg(long, default_value = "85")]
    pub life_expectancy: u32,

    /// Savings already invested
    #[arg(long)]
    pub savings: Option<Decimal>,

    /// Amount invested every year until retirement
    #[arg(long)]
    pub annual_contribution: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual inflation in percent
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    /// Desired annual retirement income in today's money
    #[arg(long)]
    pub desired_income: Option<Decimal>,

    /// Annual pension at retirement
    #[arg(long)]
    pub pension: Option<Decimal>,

    /// Annual provident fund income at retirement
    #[arg(long)]
    pub provident_fund: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ExpensesArgs {
    /// Path to JSON expense ledger
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: RetirementInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RetirementInput {
            current_age: args
                .current_age
                .ok_or("--current-age is required (or provide --input)")?,
            retirement_age: args.retirement_age,
            life_expectancy: args.life_expectancy,
            current_savings: args.savings.unwrap_or(Decimal::ZERO),
            annual_contribution: args
                .annual_contribution
                .ok_or("--annual-contribution is required (or provide --input)")?,
            annual_return_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            inflation_pct: args.inflation,
            desired_annual_income: args
                .desired_income
                .ok_or("--desired-income is required (or provide --input)")?,
            pension_income: args.pension.unwrap_or(Decimal::ZERO),
            provident_fund_income: args.provident_fund.unwrap_or(Decimal::ZERO),
        }
    };
    let result = retirement::plan_retirement(&plan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_expenses(args: ExpensesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger: ExpenseInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };
    let result = expenses::analyze_expenses(&ledger)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_insurance(args: InsuranceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let coverage: InsuranceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        serde_json::from_value(serde_json::json!({
            "health": args.health,
            "auto": args.auto,
            "home": args.home,
            "life": args.life,
        }))?
    };
    let result = insurance::evaluate_insurance(&coverage)?;
    Ok(serde_json::to_value(result)?)
}
