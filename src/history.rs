// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::WalletError;
use crate::models::{Transaction, TxType};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxType),
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        Ok(TypeFilter::Only(s.parse()?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub kind: TypeFilter,
    /// Matched case-insensitively against description and location.
    pub query: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        let kind_ok = match self.kind {
            TypeFilter::All => true,
            TypeFilter::Only(k) => t.tx_type == k,
        };
        let query_ok = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                t.description.to_lowercase().contains(&q)
                    || t
                        .location
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&q))
            }
        };
        let month_ok = match &self.month {
            None => true,
            Some(m) => t.created_at.format("%Y-%m").to_string() == *m,
        };
        kind_ok && query_ok && month_ok
    }
}

/// Keeps input order (newest first as loaded); never fails.
pub fn filter<'a>(txs: &'a [Transaction], f: &HistoryFilter) -> Vec<&'a Transaction> {
    let it = txs.iter().filter(|t| f.matches(t));
    match f.limit {
        Some(n) => it.take(n).collect(),
        None => it.collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub spent: Decimal,
    pub received: Decimal,
}

pub fn summarize(txs: &[&Transaction]) -> Result<Summary> {
    let mut s = Summary::default();
    for t in txs {
        let slot = if t.amount < Decimal::ZERO {
            &mut s.spent
        } else {
            &mut s.received
        };
        *slot = slot
            .checked_add(t.amount.abs())
            .ok_or(WalletError::AmountOutOfRange("history summary"))?;
    }
    Ok(s)
}

/// Consecutive runs by calendar day (UTC).
pub fn group_by_day<'a>(txs: &[&'a Transaction]) -> Vec<(NaiveDate, Vec<&'a Transaction>)> {
    let mut groups: Vec<(NaiveDate, Vec<&'a Transaction>)> = Vec::new();
    for &t in txs {
        let day = t.created_at.date_naive();
        match groups.last_mut() {
            Some((d, items)) if *d == day => items.push(t),
            _ => groups.push((day, vec![t])),
        }
    }
    groups
}
