// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::amount_cell;
use crate::data;
use crate::models::{Session, Transaction};
use crate::portfolio::{self, SortKey};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

const TOP_WALLETS: usize = 4;
const RECENT: usize = 5;

#[derive(Serialize)]
pub struct HomeSummary<'a> {
    pub email: &'a str,
    pub base_currency: String,
    pub total_balance: Decimal,
    pub wallets: Vec<WalletLine>,
    pub recent: Vec<&'a Transaction>,
}

#[derive(Serialize)]
pub struct WalletLine {
    pub code: String,
    pub balance: Decimal,
    pub base_value: Decimal,
}

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let hide = m.get_flag("hide_balances");
    let view = data::load(conn, session)?;
    let base = view
        .base_currency()
        .map(|c| c.code.clone())
        .unwrap_or_else(|| "BASE".into());

    let held = portfolio::held(&view.currencies);
    let wallets = portfolio::sorted(&view.currencies, SortKey::Balance)?
        .into_iter()
        .filter(|c| held.iter().any(|h| h.code == c.code))
        .take(TOP_WALLETS)
        .map(|c| {
            Ok(WalletLine {
                code: c.code.clone(),
                balance: c.balance,
                base_value: portfolio::base_value(c)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let summary = HomeSummary {
        email: &session.email,
        total_balance: portfolio::total_in_base(&view.currencies)?,
        base_currency: base.clone(),
        wallets,
        recent: view.transactions.iter().take(RECENT).collect(),
    };

    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    println!(
        "{}: total balance {} {}",
        summary.email,
        amount_cell(&summary.total_balance, hide),
        base
    );
    let rows = summary
        .wallets
        .iter()
        .map(|w| {
            vec![
                w.code.clone(),
                amount_cell(&w.balance, hide),
                amount_cell(&w.base_value, hide),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Wallet", "Balance", &format!("Value ({})", base)], rows)
    );
    let rows = summary
        .recent
        .iter()
        .map(|t| {
            vec![
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                t.tx_type.to_string(),
                t.description.clone(),
                amount_cell(&t.amount, hide),
                t.currency.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["When", "Type", "Description", "Amount", "CCY"], rows)
    );
    Ok(())
}
