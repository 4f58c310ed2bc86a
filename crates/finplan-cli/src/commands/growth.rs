use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finplan_core::growth::scenarios::{self, ScenarioComparisonInput};
use finplan_core::growth::sip::{self, GrowthInput};
use finplan_core::growth::suggestions::{self, InvestorProfile, SipInsightsInput};

use crate::input;

/// Arguments for a SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Monthly contribution in the first year
    #[arg(long)]
    pub monthly: Option<Decimal>,

    /// Expected annual return in percent (e.g. 12)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual step-up of the contribution in percent
    #[arg(long)]
    pub step_up: Option<Decimal>,

    /// Annual inflation in percent
    #[arg(long)]
    pub inflation: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for comparing contribution levels
#[derive(Args)]
pub struct SipScenariosArgs {
    #[command(flatten)]
    pub base: SipArgs,

    /// Contribution multipliers, comma separated (default 0.5,1,1.5,2)
    #[arg(long, value_delimiter = ',')]
    pub multipliers: Vec<Decimal>,
}

#[derive(Args)]
pub struct SipSuggestArgs {
    /// Path to JSON investor profile
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct SipInsightsArgs {
    /// Path to JSON with `profile`, `plan` and optional `target_corpus_lakhs`
    #[arg(long)]
    pub input: Option<String>,
}

fn growth_input_from_flags(args: &SipArgs) -> Result<GrowthInput, Box<dyn std::error::Error>> {
    Ok(GrowthInput {
        monthly_contribution: args
            .monthly
            .ok_or("--monthly is required (or provide --input)")?,
        annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        years: args.years.ok_or("--years is required (or provide --input)")?,
        step_up_pct: args.step_up.unwrap_or(Decimal::ZERO),
        inflation_pct: args.inflation.unwrap_or(Decimal::ZERO),
    })
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: GrowthInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        growth_input_from_flags(&args)?
    };
    let result = sip::project_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sip_scenarios(args: SipScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison: ScenarioComparisonInput = if let Some(ref path) = args.base.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let multipliers = if args.multipliers.is_empty() {
            scenarios::default_multipliers()
        } else {
            args.multipliers.clone()
        };
        ScenarioComparisonInput {
            base: growth_input_from_flags(&args.base)?,
            multipliers,
        }
    };
    let result = scenarios::compare_contribution_scenarios(&comparison)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sip_suggest(args: SipSuggestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: InvestorProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };
    let result = suggestions::suggest_sip_plan(&profile)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sip_insights(args: SipInsightsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let insights_input: SipInsightsInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };
    let result = suggestions::sip_insights(&insights_input)?;
    Ok(serde_json::to_value(result)?)
}
