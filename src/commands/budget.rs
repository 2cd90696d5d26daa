// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{self, BudgetUsage};
use crate::data;
use crate::error::WalletError;
use crate::models::{BudgetCategoryKind, Session};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("show", sub)) => show(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn create(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let destination = sub.get_one::<String>("destination").unwrap();
    let total = parse_decimal(sub.get_one::<String>("total").unwrap())?;
    let currency = sub.get_one::<String>("currency").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;

    let mut categories = Vec::new();
    for kind in BudgetCategoryKind::ALL {
        if let Some(raw) = sub.get_one::<String>(kind.as_str()) {
            if !raw.trim().is_empty() {
                categories.push((*kind, parse_decimal(raw)?));
            }
        }
    }

    let new = budget::new_budget(destination, total, currency, start, end, &categories)?;
    if data::load(conn, session)?.currency(&new.currency).is_none() {
        return Err(WalletError::UnknownCurrency(new.currency).into());
    }
    data::create_budget(conn, session, &new)?;
    println!(
        "Budget created for {}: {} {} ({} categories)",
        new.destination,
        new.total_budget,
        new.currency,
        new.categories.len()
    );
    Ok(())
}

pub fn usages(conn: &Connection, session: &Session) -> Result<Vec<BudgetUsage>> {
    let view = data::load(conn, session)?;
    Ok(view.budgets.iter().map(budget::usage).collect())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = usages(conn, session)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|b| {
            vec![
                b.destination.clone(),
                format!("{} → {}", b.start_date, b.end_date),
                b.currency.clone(),
                format!("{:.2}", b.total_budget),
                format!("{:.2}", b.spent),
                format!("{:.0}%", b.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Destination", "Dates", "CCY", "Budget", "Spent", "Used"],
            rows
        )
    );
    Ok(())
}

fn show(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("destination").unwrap().trim();
    let b = usages(conn, session)?
        .into_iter()
        .find(|b| b.id == key || b.destination.eq_ignore_ascii_case(key))
        .ok_or_else(|| WalletError::NotFound {
            kind: "Budget",
            id: key.to_string(),
        })?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &b)? {
        return Ok(());
    }
    println!(
        "{}: {:.2} / {:.2} {} ({:.0}% used, {:.2} remaining)",
        b.destination, b.spent, b.total_budget, b.currency, b.percentage, b.remaining
    );
    if let Some(msg) = b.band.alert() {
        println!("{}", msg);
    }
    let rows = b
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                format!("{:.2}", c.budget),
                format!("{:.2}", c.spent),
                format!("{:.2}", c.remaining),
                format!("{:.0}%", c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Spent", "Remaining", "Used"], rows)
    );
    Ok(())
}
