//! EMI and amortization schedules.
//!
//! Six repayment policies share one month-by-month projection:
//! 1. **Standard** -- level annuity payment.
//! 2. **StepUp / StepDown** -- graduated payments starting below / above the
//!    annuity and stepped every `step_frequency` periods.
//! 3. **ExtraPayment** -- annuity plus a fixed monthly prepayment.
//! 4. **InterestOnly** -- interest serviced monthly, principal due at the end.
//! 5. **Balloon** -- part of the principal is held back and paid at the end.
//!
//! All arithmetic uses `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinPlanError;
use crate::time_value::{annuity_payment, monthly_rate, pct_to_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinPlanResult;

/// Hard ceiling on schedule length (100 years of monthly payments).
pub const MAX_SCHEDULE_PERIODS: u32 = 1200;

const MAX_ANNUAL_RATE_PCT: Decimal = dec!(100);

/// Largest principal accepted (1e15, i.e. 10 crore crore).
const MAX_PRINCIPAL: Decimal = dec!(1_000_000_000_000_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Repayment policy applied to the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentPolicy {
    #[default]
    Standard,
    StepUp,
    StepDown,
    ExtraPayment,
    InterestOnly,
    Balloon,
}

/// Policy-specific parameters. Fields irrelevant to the chosen policy are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyParams {
    /// Percentage change applied at every step (StepUp / StepDown).
    #[serde(default)]
    pub step_rate_pct: Percent,
    /// Number of periods between steps.
    #[serde(default = "default_step_frequency")]
    pub step_frequency: u32,
    /// Additional principal paid every period (ExtraPayment).
    #[serde(default)]
    pub extra_payment: Money,
    /// Share of principal held back as a final balloon (Balloon), 0-100.
    #[serde(default)]
    pub balloon_pct: Percent,
}

fn default_step_frequency() -> u32 {
    12
}

impl Default for PolicyParams {
    fn default() -> Self {
        PolicyParams {
            step_rate_pct: Decimal::ZERO,
            step_frequency: default_step_frequency(),
            extra_payment: Decimal::ZERO,
            balloon_pct: Decimal::ZERO,
        }
    }
}

/// Opening payment of a graduated schedule, as a multiple of the annuity payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub step_up_start: Decimal,
    pub step_down_start: Decimal,
}

impl Default for StepConfig {
    fn default() -> Self {
        StepConfig {
            step_up_start: dec!(0.8),
            step_down_start: dec!(1.3),
        }
    }
}

/// Input for an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
    #[serde(default)]
    pub policy: RepaymentPolicy,
    #[serde(default)]
    pub params: PolicyParams,
    #[serde(default)]
    pub step_config: StepConfig,
}

/// A single month in the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Output of [`build_schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanScheduleOutput {
    pub policy: RepaymentPolicy,
    /// Standard annuity payment on the amortized principal.
    pub base_payment: Money,
    pub first_payment: Money,
    /// Principal run through the monthly schedule (excludes a held-back balloon).
    pub amortized_principal: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub periods_to_payoff: u32,
    /// Lump sum due at tenure end (Balloon, InterestOnly).
    pub terminal_payment: Option<Money>,
    /// Scheduled payments plus any terminal payment.
    pub total_outflow: Money,
    pub periods: Vec<SchedulePeriod>,
}

// ---------------------------------------------------------------------------
// Schedule builders
// ---------------------------------------------------------------------------

/// Running totals shared by every policy.
struct ScheduleBuilder {
    periods: Vec<SchedulePeriod>,
    balance: Money,
    cumulative_interest: Money,
    cumulative_principal: Money,
}

impl ScheduleBuilder {
    fn new(principal: Money, capacity: u32) -> Self {
        ScheduleBuilder {
            periods: Vec::with_capacity(capacity as usize),
            balance: principal,
            cumulative_interest: Decimal::ZERO,
            cumulative_principal: Decimal::ZERO,
        }
    }

    fn push(&mut self, interest: Money, principal: Money) {
        self.balance -= principal;
        self.cumulative_interest += interest;
        self.cumulative_principal += principal;
        self.periods.push(SchedulePeriod {
            period: self.periods.len() as u32 + 1,
            payment: interest + principal,
            interest,
            principal,
            remaining_balance: self.balance,
            cumulative_interest: self.cumulative_interest,
            cumulative_principal: self.cumulative_principal,
        });
    }
}

/// Level payment (plus optional prepayment). The nominal final period retires
/// whatever balance is left, so the schedule never outlives the tenure.
fn level_schedule(
    principal: Money,
    rate: Decimal,
    tenure: u32,
    payment: Money,
    extra: Money,
) -> Vec<SchedulePeriod> {
    let mut builder = ScheduleBuilder::new(principal, tenure);

    for period in 1..=tenure {
        if builder.balance <= Decimal::ZERO {
            break;
        }
        let interest = builder.balance * rate;
        // An unrepresentable prepayment retires the balance outright
        let mut principal_part = (payment - interest)
            .checked_add(extra)
            .unwrap_or(builder.balance);
        if period == tenure || principal_part >= builder.balance {
            principal_part = builder.balance;
        }
        builder.push(interest, principal_part.max(Decimal::ZERO));
    }

    builder.periods
}

/// Graduated payments: multiply by `step_factor` every `frequency` periods.
/// Runs until the balance is retired, which may be before or after the tenure.
fn graduated_schedule(
    principal: Money,
    rate: Decimal,
    opening_payment: Money,
    step_factor: Decimal,
    frequency: u32,
    warnings: &mut Vec<String>,
) -> FinPlanResult<Vec<SchedulePeriod>> {
    let mut builder = ScheduleBuilder::new(principal, 360);
    let mut payment = opening_payment;

    for period in 1..=MAX_SCHEDULE_PERIODS {
        if builder.balance <= Decimal::ZERO {
            break;
        }
        let interest = builder.balance * rate;
        let mut principal_part = payment - interest;

        if principal_part <= Decimal::ZERO {
            warnings.push(format!(
                "Period {period}: payment {} does not cover interest {}; outstanding balance {} retired in a single payment",
                payment.round_dp(2),
                interest.round_dp(2),
                builder.balance.round_dp(2)
            ));
            principal_part = builder.balance;
        } else if principal_part >= builder.balance {
            principal_part = builder.balance;
        } else if period == MAX_SCHEDULE_PERIODS {
            warnings.push(format!(
                "Schedule reached {MAX_SCHEDULE_PERIODS} periods; residual balance {} retired in the final payment",
                (builder.balance - principal_part).round_dp(2)
            ));
            principal_part = builder.balance;
        }

        builder.push(interest, principal_part);

        if builder.balance > Decimal::ZERO && period % frequency == 0 {
            payment = payment
                .checked_mul(step_factor)
                .ok_or_else(|| FinPlanError::out_of_range("params.step_rate_pct"))?;
        }
    }

    Ok(builder.periods)
}

/// Interest-only servicing: the balance never amortizes.
fn interest_only_schedule(principal: Money, rate: Decimal, tenure: u32) -> Vec<SchedulePeriod> {
    let mut builder = ScheduleBuilder::new(principal, tenure);
    let interest = principal * rate;
    for _ in 0..tenure {
        builder.push(interest, Decimal::ZERO);
    }
    builder.periods
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &LoanInput) -> FinPlanResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(FinPlanError::invalid("principal", "Loan principal must be positive"));
    }
    if input.principal > MAX_PRINCIPAL {
        return Err(FinPlanError::invalid(
            "principal",
            format!("Loan principal cannot exceed {MAX_PRINCIPAL}"),
        ));
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "annual_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if input.annual_rate_pct > MAX_ANNUAL_RATE_PCT {
        return Err(FinPlanError::invalid(
            "annual_rate_pct",
            "Interest rate above 100% p.a. is not supported",
        ));
    }
    if input.tenure_months == 0 {
        return Err(FinPlanError::invalid(
            "tenure_months",
            "Tenure must be at least 1 month",
        ));
    }
    if input.tenure_months > MAX_SCHEDULE_PERIODS {
        return Err(FinPlanError::invalid(
            "tenure_months",
            format!("Tenure cannot exceed {MAX_SCHEDULE_PERIODS} months"),
        ));
    }

    let p = &input.params;
    if p.extra_payment < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "params.extra_payment",
            "Extra payment cannot be negative",
        ));
    }
    if p.balloon_pct < Decimal::ZERO || p.balloon_pct > dec!(100) {
        return Err(FinPlanError::invalid(
            "params.balloon_pct",
            "Balloon percentage must be between 0 and 100",
        ));
    }
    if p.step_rate_pct < Decimal::ZERO {
        return Err(FinPlanError::invalid(
            "params.step_rate_pct",
            "Step rate cannot be negative",
        ));
    }
    if input.policy == RepaymentPolicy::StepDown && p.step_rate_pct >= dec!(100) {
        return Err(FinPlanError::invalid(
            "params.step_rate_pct",
            "Step-down rate must be below 100%",
        ));
    }
    if p.step_frequency == 0 {
        return Err(FinPlanError::invalid(
            "params.step_frequency",
            "Step frequency must be at least 1 period",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Build a month-by-month repayment schedule for a loan under the chosen policy.
pub fn build_schedule(
    input: &LoanInput,
) -> FinPlanResult<ComputationOutput<LoanScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    log::debug!(
        "build_schedule: principal={} rate={}% tenure={} policy={:?}",
        input.principal,
        input.annual_rate_pct,
        input.tenure_months,
        input.policy
    );

    let rate = monthly_rate(input.annual_rate_pct);
    let tenure = input.tenure_months;
    let params = &input.params;

    let (amortized_principal, terminal_payment) = match input.policy {
        RepaymentPolicy::Balloon => {
            let balloon = input.principal * pct_to_rate(params.balloon_pct);
            (input.principal - balloon, Some(balloon))
        }
        RepaymentPolicy::InterestOnly => (input.principal, Some(input.principal)),
        _ => (input.principal, None),
    };

    let base_payment = match input.policy {
        RepaymentPolicy::InterestOnly => input.principal * rate,
        _ => annuity_payment(amortized_principal, rate, tenure)?,
    };

    let step = pct_to_rate(params.step_rate_pct);
    let periods = match input.policy {
        RepaymentPolicy::Standard | RepaymentPolicy::Balloon => {
            level_schedule(amortized_principal, rate, tenure, base_payment, Decimal::ZERO)
        }
        RepaymentPolicy::ExtraPayment => level_schedule(
            amortized_principal,
            rate,
            tenure,
            base_payment,
            params.extra_payment,
        ),
        RepaymentPolicy::StepUp => graduated_schedule(
            amortized_principal,
            rate,
            base_payment * input.step_config.step_up_start,
            Decimal::ONE + step,
            params.step_frequency,
            &mut warnings,
        )?,
        RepaymentPolicy::StepDown => graduated_schedule(
            amortized_principal,
            rate,
            base_payment * input.step_config.step_down_start,
            Decimal::ONE - step,
            params.step_frequency,
            &mut warnings,
        )?,
        RepaymentPolicy::InterestOnly => interest_only_schedule(input.principal, rate, tenure),
    };

    let total_payment: Money = periods.iter().map(|p| p.payment).sum();
    let total_interest: Money = periods.iter().map(|p| p.interest).sum();
    let total_principal: Money = periods.iter().map(|p| p.principal).sum();
    let first_payment = periods.first().map(|p| p.payment).unwrap_or(Decimal::ZERO);
    let periods_to_payoff = periods.len() as u32;

    if periods_to_payoff > tenure {
        warnings.push(format!(
            "Loan runs {} months beyond the nominal tenure of {tenure} months",
            periods_to_payoff - tenure
        ));
    }
    if matches!(input.policy, RepaymentPolicy::Balloon) && amortized_principal.is_zero() {
        warnings.push("Balloon covers the full principal; no monthly amortization".into());
    }

    let total_outflow = total_payment + terminal_payment.unwrap_or(Decimal::ZERO);

    log::debug!(
        "build_schedule: base_payment={} periods={} total_interest={}",
        base_payment.round_dp(2),
        periods_to_payoff,
        total_interest.round_dp(2)
    );

    let output = LoanScheduleOutput {
        policy: input.policy,
        base_payment,
        first_payment,
        amortized_principal,
        total_payment,
        total_interest,
        total_principal,
        periods_to_payoff,
        terminal_payment,
        total_outflow,
        periods,
    };

    let methodology = match input.policy {
        RepaymentPolicy::Standard => "EMI amortization (level annuity payment)",
        RepaymentPolicy::StepUp => "EMI amortization (step-up graduated payments)",
        RepaymentPolicy::StepDown => "EMI amortization (step-down graduated payments)",
        RepaymentPolicy::ExtraPayment => "EMI amortization (annuity plus monthly prepayment)",
        RepaymentPolicy::InterestOnly => "Interest-only servicing with bullet principal",
        RepaymentPolicy::Balloon => "EMI amortization with terminal balloon payment",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_months": input.tenure_months,
            "policy": format!("{:?}", input.policy),
            "step_rate_pct": params.step_rate_pct.to_string(),
            "step_frequency": params.step_frequency,
            "extra_payment": params.extra_payment.to_string(),
            "balloon_pct": params.balloon_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
