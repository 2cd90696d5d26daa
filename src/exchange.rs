// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency exchange between two of the user's wallets.
//!
//! Rates are stored per currency as the value of one unit in the base
//! currency, so the cross rate is `from.rate / to.rate`. The converted leg is
//! rounded to cents toward zero and the debit leg is exactly the requested
//! amount (which must already be in cents). A round trip therefore never
//! returns more than was sent out.

use crate::data::{self, WalletView};
use crate::error::WalletError;
use crate::models::{Currency, NewTransaction, Session, TxType};
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const MONEY_DP: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeQuote {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub converted: Decimal,
}

impl ExchangeQuote {
    pub fn description(&self) -> String {
        exchange_description(&self.from, &self.to)
    }
}

pub fn exchange_description(from: &str, to: &str) -> String {
    format!("{} → {} Exchange", from, to)
}

/// Cents, truncated toward zero.
pub fn round_money(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(MONEY_DP, RoundingStrategy::ToZero)
}

pub fn cross_rate(from: &Currency, to: &Currency) -> Result<Decimal> {
    for c in [from, to] {
        if c.rate <= Decimal::ZERO {
            return Err(WalletError::InvalidRate {
                code: c.code.clone(),
                rate: c.rate,
            }
            .into());
        }
    }
    from.rate
        .checked_div(to.rate)
        .ok_or_else(|| WalletError::AmountOutOfRange("cross rate").into())
}

pub fn convert(amount: Decimal, rate: Decimal) -> Result<Decimal> {
    amount
        .checked_mul(rate)
        .map(round_money)
        .ok_or_else(|| WalletError::AmountOutOfRange("converted amount").into())
}

/// Positive and in whole cents; shared with the send workflow.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::NonPositiveAmount(amount).into());
    }
    if amount.normalize().scale() > MONEY_DP {
        return Err(WalletError::TooPrecise(amount).into());
    }
    Ok(())
}

pub fn ensure_funds(currency: &Currency, amount: Decimal) -> Result<()> {
    if amount > currency.balance {
        tracing::warn!(currency = %currency.code, %amount, balance = %currency.balance, "insufficient balance");
        return Err(WalletError::InsufficientBalance {
            currency: currency.code.clone(),
            available: currency.balance,
            requested: amount,
        }
        .into());
    }
    Ok(())
}

/// Prices an exchange against the loaded view without checking funds.
pub fn price(view: &WalletView, from: &str, to: &str, amount: Decimal) -> Result<ExchangeQuote> {
    let src = view
        .currency(from)
        .ok_or_else(|| WalletError::UnknownCurrency(from.to_uppercase()))?;
    let dst = view
        .currency(to)
        .ok_or_else(|| WalletError::UnknownCurrency(to.to_uppercase()))?;
    if src.code == dst.code {
        return Err(WalletError::SameCurrency(src.code.clone()).into());
    }
    validate_amount(amount)?;
    let rate = cross_rate(src, dst)?;
    Ok(ExchangeQuote {
        from: src.code.clone(),
        to: dst.code.clone(),
        amount,
        rate,
        converted: convert(amount, rate)?,
    })
}

/// Full client-side validation: everything `price` checks plus the source
/// balance. Funds are checked before pricing so an unaffordable amount is
/// never multiplied out. Nothing is written.
pub fn quote(view: &WalletView, from: &str, to: &str, amount: Decimal) -> Result<ExchangeQuote> {
    if let Some(src) = view.currency(from) {
        validate_amount(amount)?;
        ensure_funds(src, amount)?;
    }
    price(view, from, to, amount)
}

/// Records the credit in the target currency, then the debit in the source
/// currency, adjusting each wallet after its entry. All four writes commit
/// together or not at all.
pub fn execute(conn: &Connection, session: &Session, q: &ExchangeQuote) -> Result<WalletView> {
    let description = q.description();
    let credit = NewTransaction::completed(TxType::Exchange, q.converted, &q.to, &description);
    let debit = NewTransaction::completed(TxType::Exchange, -q.amount, &q.from, &description);

    let tx = store::write_transaction(conn)?;
    for leg in [&credit, &debit] {
        store::insert_transaction(&tx, &session.user_id, leg)?;
        store::adjust_wallet_balance(&tx, &session.user_id, &leg.currency, leg.amount)?;
    }
    if let Err(err) = tx.commit() {
        tracing::error!(from = %q.from, to = %q.to, error = %err, "exchange commit failed");
        return Err(err.into());
    }
    tracing::info!(
        from = %q.from,
        to = %q.to,
        amount = %q.amount,
        converted = %q.converted,
        "exchange completed"
    );
    data::load(conn, session)
}

/// Validate against the current view, then execute.
pub fn exchange(
    conn: &Connection,
    session: &Session,
    from: &str,
    to: &str,
    amount: Decimal,
) -> Result<(ExchangeQuote, WalletView)> {
    let view = data::load(conn, session)?;
    let q = quote(&view, from, to, amount)?;
    let view = execute(conn, session, &q)?;
    Ok((q, view))
}
