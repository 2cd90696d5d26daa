// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::amount_cell;
use crate::data;
use crate::models::Session;
use crate::portfolio::{self, SortKey};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct WalletRow {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub balance: Decimal,
    pub rate: Decimal,
    pub base_value: Decimal,
}

pub fn wallet_rows(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<Vec<WalletRow>> {
    let key = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortKey>())
        .transpose()?
        .unwrap_or_default();
    let include_zero = sub.get_flag("all");
    let view = data::load(conn, session)?;
    portfolio::sorted(&view.currencies, key)?
        .into_iter()
        .filter(|c| include_zero || !c.balance.is_zero())
        .map(|c| {
            Ok(WalletRow {
                code: c.code.clone(),
                name: c.name.clone(),
                symbol: c.symbol.clone(),
                balance: c.balance,
                rate: c.rate,
                base_value: portfolio::base_value(c)?,
            })
        })
        .collect()
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let hide = sub.get_flag("hide_balances");
    let data = wallet_rows(conn, session, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let total = portfolio::checked_total(data.iter().map(|w| w.base_value))?;
    let rows = data
        .iter()
        .map(|w| {
            vec![
                w.code.clone(),
                w.name.clone(),
                amount_cell(&w.balance, hide),
                w.rate.to_string(),
                amount_cell(&w.base_value, hide),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["CCY", "Name", "Balance", "Rate", "Base value"], rows)
    );
    println!("Total (base): {}", amount_cell(&total, hide));
    Ok(())
}
