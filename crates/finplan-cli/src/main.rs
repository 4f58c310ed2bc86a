mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::credit_score::{CreditScoreArgs, LoanEligibilityArgs};
use commands::growth::{SipArgs, SipInsightsArgs, SipScenariosArgs, SipSuggestArgs};
use commands::loan::EmiArgs;
use commands::tax::IncomeTaxArgs;
use commands::wealth::{ExpensesArgs, InsuranceArgs, RetirementArgs};

/// Personal-finance planning calculations
#[derive(Parser)]
#[command(
    name = "finplan",
    version,
    about = "Personal-finance planning calculations",
    long_about = "A CLI for personal-finance planning with decimal precision. Supports \
                  EMI schedules under several repayment policies, credit score estimates, \
                  SIP growth projections, retirement planning, expense tracking, \
                  insurance coverage, loan eligibility and income tax under the new regime."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine debug output to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an EMI / amortization schedule
    Emi(EmiArgs),
    /// Estimate a 300-900 credit score
    CreditScore(CreditScoreArgs),
    /// Screen loan eligibility from a credit score and income
    LoanEligibility(LoanEligibilityArgs),
    /// Project a step-up SIP with inflation adjustment
    Sip(SipArgs),
    /// Compare SIP outcomes at several contribution levels
    SipScenarios(SipScenariosArgs),
    /// Suggest a SIP plan from an investor profile
    SipSuggest(SipSuggestArgs),
    /// Read a SIP plan against income, surplus and a retirement corpus goal
    SipInsights(SipInsightsArgs),
    /// Plan savings and drawdown through retirement
    Retirement(RetirementArgs),
    /// Summarise an expense ledger against a monthly budget
    Expenses(ExpensesArgs),
    /// Score insurance coverage and list gaps
    Insurance(InsuranceArgs),
    /// Income tax under the new regime
    IncomeTax(IncomeTaxArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args),
        Commands::CreditScore(args) => commands::credit_score::run_credit_score(args),
        Commands::LoanEligibility(args) => commands::credit_score::run_loan_eligibility(args),
        Commands::Sip(args) => commands::growth::run_sip(args),
        Commands::SipScenarios(args) => commands::growth::run_sip_scenarios(args),
        Commands::SipSuggest(args) => commands::growth::run_sip_suggest(args),
        Commands::SipInsights(args) => commands::growth::run_sip_insights(args),
        Commands::Retirement(args) => commands::wealth::run_retirement(args),
        Commands::Expenses(args) => commands::wealth::run_expenses(args),
        Commands::Insurance(args) => commands::wealth::run_insurance(args),
        Commands::IncomeTax(args) => commands::tax::run_income_tax(args),
        Commands::Version => {
            println!("finplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
