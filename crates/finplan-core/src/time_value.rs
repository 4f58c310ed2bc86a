use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::FinPlanError;
use crate::types::{Money, Percent, Rate};
use crate::FinPlanResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Convert a user-facing percentage (8.5) into a decimal rate (0.085).
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / HUNDRED
}

/// Monthly periodic rate from an annual percentage: `pct / 1200`.
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    pct_to_rate(annual_pct) / MONTHS_PER_YEAR
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Returns `None` when the factor leaves the Decimal range.
pub fn compound(rate: Rate, n: u32) -> Option<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Like [`compound`], but reports overflow as an input error against `field`.
pub fn compound_checked(rate: Rate, n: u32, field: &str) -> FinPlanResult<Decimal> {
    compound(rate, n).ok_or_else(|| {
        FinPlanError::invalid(field, "compounding factor exceeds decimal range")
    })
}

/// Level payment that amortises `principal` over `nper` periods:
/// `P·r·(1+r)^n / ((1+r)^n − 1)`, or `P/n` at a zero rate.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> FinPlanResult<Money> {
    if nper == 0 {
        return Err(FinPlanError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_checked(rate, nper, "rate")?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(FinPlanError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    // (1+r)^n / ((1+r)^n - 1) stays near 1, so divide before scaling by P·r
    let ratio = factor / denom;
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(ratio))
        .ok_or_else(|| FinPlanError::out_of_range("principal"))
}

/// Future value of one unit paid at the end of each of `nper` periods:
/// `((1+r)^n − 1) / r`, or `n` at a zero rate.
pub fn fv_annuity_factor(rate: Rate, nper: u32) -> FinPlanResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(nper));
    }
    let factor = compound_checked(rate, nper, "rate")?;
    Ok((factor - Decimal::ONE) / rate)
}

/// Compound annual growth rate from `start` to `end` over `years`.
/// Degenerate inputs (non-positive start or end, zero years) and ratios
/// beyond the Decimal range yield zero.
pub fn cagr(start: Money, end: Money, years: u32) -> Rate {
    if start <= Decimal::ZERO || end <= Decimal::ZERO || years == 0 {
        return Decimal::ZERO;
    }
    let exponent = Decimal::ONE / Decimal::from(years);
    (end / start)
        .checked_powd(exponent)
        .map(|growth| growth - Decimal::ONE)
        .unwrap_or(Decimal::ZERO)
}
