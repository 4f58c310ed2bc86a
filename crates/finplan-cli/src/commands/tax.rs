use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finplan_core::tax::income_tax::{self, IncomeTaxInput};

use crate::input;

/// Arguments for income tax under the new regime
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Business or professional income (no standard deduction)
    #[arg(long)]
    pub not_salaried: bool,

    /// Deductions allowed under the new regime, e.g. employer NPS
    #[arg(long)]
    pub deductions: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: IncomeTaxInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        IncomeTaxInput {
            gross_income: args.income.ok_or("--income is required (or provide --input)")?,
            is_salaried: !args.not_salaried,
            other_deductions: args.deductions.unwrap_or(Decimal::ZERO),
            config: Default::default(),
        }
    };
    let result = income_tax::compute_income_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}
