// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::WalletError;
use crate::models::{BudgetCategoryKind, NewBudget, TravelBudget};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Where a spent/budget ratio sits. The budget-level alert fires at
/// `Warning` (75%) and escalates at `Critical` (90%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageBand {
    Healthy,
    Moderate,
    Warning,
    Critical,
}

impl UsageBand {
    pub fn from_percentage(pct: Decimal) -> Self {
        if pct >= Decimal::from(90) {
            UsageBand::Critical
        } else if pct >= Decimal::from(75) {
            UsageBand::Warning
        } else if pct >= Decimal::from(50) {
            UsageBand::Moderate
        } else {
            UsageBand::Healthy
        }
    }

    pub fn alert(&self) -> Option<&'static str> {
        match self {
            UsageBand::Critical => Some("You've used 90% of your budget!"),
            UsageBand::Warning => Some(
                "You've used 75% of your budget. Consider tracking your spending more closely.",
            ),
            _ => None,
        }
    }
}

/// `spent / budget * 100`; zero for a zero budget, saturating at
/// `Decimal::MAX` when the ratio does not fit.
pub fn percentage_used(spent: Decimal, budget: Decimal) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }
    spent
        .checked_div(budget)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryUsage {
    pub category: BudgetCategoryKind,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub band: UsageBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetUsage {
    pub id: String,
    pub destination: String,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub band: UsageBand,
    pub categories: Vec<CategoryUsage>,
}

pub fn usage(b: &TravelBudget) -> BudgetUsage {
    let percentage = percentage_used(b.spent, b.total_budget);
    let categories = b
        .categories
        .iter()
        .map(|(kind, bucket)| {
            let pct = percentage_used(bucket.spent, bucket.budget);
            CategoryUsage {
                category: *kind,
                budget: bucket.budget,
                spent: bucket.spent,
                remaining: bucket.budget - bucket.spent,
                percentage: pct,
                band: UsageBand::from_percentage(pct),
            }
        })
        .collect();
    BudgetUsage {
        id: b.id.clone(),
        destination: b.destination.clone(),
        currency: b.currency.clone(),
        start_date: b.start_date,
        end_date: b.end_date,
        total_budget: b.total_budget,
        spent: b.spent,
        remaining: b.total_budget - b.spent,
        percentage,
        band: UsageBand::from_percentage(percentage),
        categories,
    }
}

/// Validates creation input. Categories with no positive amount are dropped;
/// category budgets are not required to add up to the total.
pub fn new_budget(
    destination: &str,
    total_budget: Decimal,
    currency: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    categories: &[(BudgetCategoryKind, Decimal)],
) -> Result<NewBudget> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(WalletError::MissingField("destination").into());
    }
    if total_budget <= Decimal::ZERO {
        return Err(WalletError::NonPositiveAmount(total_budget).into());
    }
    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(WalletError::MissingField("currency").into());
    }
    if start_date > end_date {
        return Err(WalletError::InvalidDateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        }
        .into());
    }
    let categories = categories
        .iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .copied()
        .collect();
    Ok(NewBudget {
        destination: destination.to_string(),
        total_budget,
        currency,
        start_date,
        end_date,
        categories,
    })
}
