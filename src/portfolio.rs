// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::WalletError;
use crate::models::Currency;
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Balance,
    Name,
    Code,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balance" => Ok(SortKey::Balance),
            "name" => Ok(SortKey::Name),
            "code" => Ok(SortKey::Code),
            other => Err(anyhow!("Invalid sort key '{}' (use balance|name|code)", other)),
        }
    }
}

pub fn base_value(c: &Currency) -> Result<Decimal> {
    c.balance
        .checked_mul(c.rate)
        .ok_or_else(|| WalletError::AmountOutOfRange("base value").into())
}

/// Sum that fails instead of overflowing.
pub fn checked_total(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| WalletError::AmountOutOfRange("total").into())
    })
}

pub fn total_in_base(currencies: &[Currency]) -> Result<Decimal> {
    let values = currencies.iter().map(base_value).collect::<Result<Vec<_>>>()?;
    checked_total(values)
}

/// Largest base value first for `Balance`; alphabetical otherwise.
pub fn sorted(currencies: &[Currency], key: SortKey) -> Result<Vec<&Currency>> {
    let mut out: Vec<(&Currency, Decimal)> = currencies
        .iter()
        .map(|c| Ok((c, base_value(c)?)))
        .collect::<Result<_>>()?;
    match key {
        SortKey::Balance => out.sort_by(|a, b| b.1.cmp(&a.1)),
        SortKey::Name => out.sort_by(|a, b| a.0.name.cmp(&b.0.name)),
        SortKey::Code => out.sort_by(|a, b| a.0.code.cmp(&b.0.code)),
    }
    Ok(out.into_iter().map(|(c, _)| c).collect())
}

/// Wallets the user actually holds (non-zero balance).
pub fn held(currencies: &[Currency]) -> Vec<&Currency> {
    currencies.iter().filter(|c| !c.balance.is_zero()).collect()
}
