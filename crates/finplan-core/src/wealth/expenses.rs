//! Expense ledger summaries: category totals, the current month's spend and
//! how it compares with a monthly budget.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::FinPlanError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub expenses: Vec<ExpenseEntry>,
    /// Monthly budget; zero or absent skips the budget check.
    #[serde(default)]
    pub monthly_budget: Option<Money>,
    /// Month to report on. Defaults to the month of the latest expense.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: usize,
    /// Share of all spending, in percent.
    pub share_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum BudgetStatus {
    WithinBudget { remaining: Money },
    OverBudget { excess: Money },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub total_spent: Money,
    pub expense_count: usize,
    pub category_totals: Vec<CategoryTotal>,
    /// Reporting month as `YYYY-MM`; `None` for an empty ledger.
    pub month: Option<String>,
    pub month_total: Money,
    pub budget_status: Option<BudgetStatus>,
    /// Newest first.
    pub ledger: Vec<ExpenseEntry>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &ExpenseInput) -> FinPlanResult<()> {
    for (i, e) in input.expenses.iter().enumerate() {
        if e.amount < Decimal::ZERO {
            return Err(FinPlanError::invalid(
                &format!("expenses[{i}].amount"),
                "Expense amount cannot be negative",
            ));
        }
        if e.category.trim().is_empty() {
            return Err(FinPlanError::invalid(
                &format!("expenses[{i}].category"),
                "Category cannot be empty",
            ));
        }
    }
    if let Some(budget) = input.monthly_budget {
        if budget < Decimal::ZERO {
            return Err(FinPlanError::invalid(
                "monthly_budget",
                "Budget cannot be negative",
            ));
        }
    }
    Ok(())
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn analyze_expenses(input: &ExpenseInput) -> FinPlanResult<ComputationOutput<ExpenseReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    log::debug!("analyze_expenses: {} entries", input.expenses.len());

    // Amounts are non-negative, so every subtotal below is bounded by this sum
    let total_spent: Money = input
        .expenses
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
        .ok_or_else(|| FinPlanError::out_of_range("expenses"))?;

    let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for e in &input.expenses {
        let slot = by_category.entry(e.category.trim()).or_insert((Decimal::ZERO, 0));
        slot.0 += e.amount;
        slot.1 += 1;
    }
    let category_totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
            share_pct: if total_spent.is_zero() {
                Decimal::ZERO
            } else {
                (total / total_spent * dec!(100)).round_dp(2)
            },
        })
        .collect();

    let as_of = input
        .as_of
        .or_else(|| input.expenses.iter().map(|e| e.date).max());
    let month_total: Money = match as_of {
        Some(month) => input
            .expenses
            .iter()
            .filter(|e| same_month(e.date, month))
            .map(|e| e.amount)
            .sum(),
        None => Decimal::ZERO,
    };

    let budget_status = match input.monthly_budget {
        Some(budget) if budget > Decimal::ZERO => {
            if month_total > budget {
                let excess = month_total - budget;
                warnings.push(format!("Monthly spend exceeds budget by {excess}"));
                Some(BudgetStatus::OverBudget { excess })
            } else {
                Some(BudgetStatus::WithinBudget {
                    remaining: budget - month_total,
                })
            }
        }
        _ => None,
    };

    if input.expenses.is_empty() {
        warnings.push("No expenses recorded".into());
    }

    // Stable sort keeps entry order within a day
    let mut ledger = input.expenses.clone();
    ledger.sort_by(|a, b| b.date.cmp(&a.date));

    let report = ExpenseReport {
        total_spent,
        expense_count: input.expenses.len(),
        category_totals,
        month: as_of.map(|d| d.format("%Y-%m").to_string()),
        month_total,
        budget_status,
        ledger,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Expense ledger summary with monthly budget check",
        &serde_json::json!({
            "monthly_budget": input.monthly_budget.map(|b| b.to_string()),
            "as_of": as_of.map(|d| d.to_string()),
        }),
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
