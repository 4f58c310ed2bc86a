use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finplan_core::loan::amortization::{self, LoanInput, PolicyParams, RepaymentPolicy};

use crate::input;

/// Arguments for an EMI / amortization schedule
#[derive(Args)]
pub struct EmiArgs {
    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: Option<u32>,

    /// Repayment policy: Standard, StepUp, StepDown, ExtraPayment, InterestOnly, Balloon
    #[arg(long, default_value = "Standard")]
    pub policy: String,

    /// Step change per step in percent (StepUp / StepDown)
    #[arg(long)]
    pub step_rate: Option<Decimal>,

    /// Months between steps
    #[arg(long, default_value = "12")]
    pub step_frequency: u32,

    /// Extra principal paid every month (ExtraPayment)
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// Share of principal deferred to a final balloon, in percent (Balloon)
    #[arg(long)]
    pub balloon_pct: Option<Decimal>,

    /// Omit the month-by-month schedule from the output
    #[arg(long)]
    pub summary_only: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let policy: RepaymentPolicy = serde_json::from_value(Value::String(args.policy.clone()))
            .map_err(|_| format!("Unknown repayment policy '{}'", args.policy))?;
        LoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            policy,
            params: PolicyParams {
                step_rate_pct: args.step_rate.unwrap_or(Decimal::ZERO),
                step_frequency: args.step_frequency,
                extra_payment: args.extra_payment.unwrap_or(Decimal::ZERO),
                balloon_pct: args.balloon_pct.unwrap_or(Decimal::ZERO),
            },
            step_config: Default::default(),
        }
    };

    let mut result = amortization::build_schedule(&loan_input)?;
    if args.summary_only {
        result.result.periods.clear();
    }
    Ok(serde_json::to_value(result)?)
}
