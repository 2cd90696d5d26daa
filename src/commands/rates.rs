// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::WalletError;
use crate::store;
use crate::utils::{http_client, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

const BASE: &str = "USD";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list_rates(conn, sub)?,
        Some(("set", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            set_rate(conn, &code, rate)?;
            println!("{} rate set to {}", code, rate);
        }
        Some(("activate", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            set_active(conn, &code, true)?;
            println!("{} is active", code);
        }
        Some(("deactivate", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            set_active(conn, &code, false)?;
            println!("{} is no longer offered", code);
        }
        Some(("refresh", _)) => refresh_rates(conn)?,
        _ => {}
    }
    Ok(())
}

/// Rates are the value of one unit in the base currency, so the base itself
/// is pinned at one.
pub fn set_rate(conn: &Connection, code: &str, rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        return Err(WalletError::InvalidRate {
            code: code.to_string(),
            rate,
        }
        .into());
    }
    if code == BASE {
        bail!("{} is the base currency; its rate is always 1", BASE);
    }
    if !store::set_currency_rate(conn, code, rate)? {
        return Err(WalletError::UnknownCurrency(code.to_string()).into());
    }
    tracing::info!(%code, %rate, "rate updated");
    Ok(())
}

/// Inactive currencies drop out of every wallet view; their wallet rows stay.
pub fn set_active(conn: &Connection, code: &str, active: bool) -> Result<()> {
    if code == BASE && !active {
        bail!("{} is the base currency and cannot be deactivated", BASE);
    }
    if !store::set_currency_active(conn, code, active)? {
        return Err(WalletError::UnknownCurrency(code.to_string()).into());
    }
    tracing::info!(%code, active, "currency availability changed");
    Ok(())
}

fn list_rates(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let currencies = store::all_currencies(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &currencies)? {
        return Ok(());
    }
    let rows = currencies
        .iter()
        .map(|c| {
            vec![
                format!("{} {}", c.flag, c.code),
                c.name.clone(),
                c.symbol.clone(),
                c.rate.to_string(),
                if c.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Code", "Name", "Symbol", "Rate (USD)", "Active"], rows)
    );
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: HashMap<String, f64>,
}

/// Frankfurter quotes units of `to` per one base unit; we store the inverse.
pub fn rates_from_quotes(quotes: &HashMap<String, f64>) -> Vec<(String, Decimal)> {
    let mut out: Vec<(String, Decimal)> = quotes
        .iter()
        .filter_map(|(code, q)| {
            let q = Decimal::try_from(*q).ok()?;
            if q <= Decimal::ZERO {
                return None;
            }
            Some((code.clone(), (Decimal::ONE / q).round_dp(6)))
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn refresh_rates(conn: &Connection) -> Result<()> {
    let targets: Vec<String> = store::all_currencies(conn)?
        .into_iter()
        .map(|c| c.code)
        .filter(|c| c != BASE)
        .collect();
    if targets.is_empty() {
        println!("No non-base currencies found; nothing to fetch.");
        return Ok(());
    }
    let url = format!(
        "https://api.frankfurter.dev/v1/latest?from={BASE}&to={}",
        targets.join(",")
    );
    let client = http_client()?;
    let resp = client
        .get(&url)
        .send()
        .context("Fetch rates")?
        .error_for_status()?;
    let latest: Latest = resp.json().context("Decode rates response")?;
    let mut updated = 0usize;
    for (code, rate) in rates_from_quotes(&latest.rates) {
        if store::set_currency_rate(conn, &code, rate)? {
            updated += 1;
        }
    }
    tracing::info!(updated, "rates refreshed");
    println!("Updated {} rates via Frankfurter (ECB).", updated);
    Ok(())
}
