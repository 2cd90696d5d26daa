// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::history::{self, HistoryFilter, TypeFilter};
use crate::models::{NewTransaction, Session, Transaction, TxStatus, TxType};
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn add(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let tx_type = sub.get_one::<String>("type").unwrap().parse::<TxType>()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let currency = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let status = sub.get_one::<String>("status").unwrap().parse::<TxStatus>()?;

    let view = data::load(conn, session)?;
    if view.currency(&currency).is_none() {
        return Err(crate::error::WalletError::UnknownCurrency(currency).into());
    }

    let t = NewTransaction {
        tx_type,
        amount,
        currency,
        description: description.to_string(),
        location: opt(sub, "location"),
        status,
        recipient: opt(sub, "recipient"),
        category: opt(sub, "category"),
    };
    let view = data::add_transaction(conn, session, &t)?;
    println!(
        "Recorded {} {} {} '{}' (balance {:.2} {})",
        t.tx_type,
        t.amount,
        t.currency,
        t.description,
        view.balance(&t.currency),
        t.currency
    );
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txs = filtered(conn, session, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &to_rows(&txs))? {
        return Ok(());
    }
    let summary = history::summarize(&txs.iter().collect::<Vec<_>>())?;
    for (day, rows) in grouped_rows(&txs) {
        println!("{}", day.format("%A, %B %-d, %Y"));
        let rows = rows
            .into_iter()
            .map(|r| vec![r.time, r.kind, r.description, r.amount, r.currency, r.location, r.status])
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Time", "Type", "Description", "Amount", "CCY", "Location", "Status"],
                rows,
            )
        );
    }
    if txs.is_empty() {
        println!("No transactions found");
    }
    println!(
        "Spent {:.2} / received {:.2} across {} transactions",
        summary.spent,
        summary.received,
        txs.len()
    );
    Ok(())
}

/// Rows split into calendar days (UTC), newest day first.
pub fn grouped_rows(txs: &[Transaction]) -> Vec<(NaiveDate, Vec<TransactionRow>)> {
    let refs: Vec<&Transaction> = txs.iter().collect();
    history::group_by_day(&refs)
        .into_iter()
        .map(|(day, items)| (day, items.into_iter().map(to_row).collect()))
        .collect()
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(skip)]
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub location: String,
    pub recipient: String,
    pub status: String,
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<HistoryFilter> {
    let kind = match sub.get_one::<String>("type") {
        Some(s) => s.parse::<TypeFilter>()?,
        None => TypeFilter::All,
    };
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    Ok(HistoryFilter {
        kind,
        query: sub.get_one::<String>("query").cloned(),
        month,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

fn filtered(
    conn: &Connection,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let f = filter_from_args(sub)?;
    let view = data::load(conn, session)?;
    Ok(history::filter(&view.transactions, &f)
        .into_iter()
        .cloned()
        .collect())
}

pub fn query_rows(
    conn: &Connection,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    Ok(to_rows(&filtered(conn, session, sub)?))
}

fn to_row(t: &Transaction) -> TransactionRow {
    TransactionRow {
        id: t.id.clone(),
        date: t.created_at.format("%Y-%m-%d").to_string(),
        time: t.created_at.format("%H:%M").to_string(),
        kind: t.tx_type.to_string(),
        description: t.description.clone(),
        amount: format!("{:.2}", t.amount),
        currency: t.currency.clone(),
        location: t.location.clone().unwrap_or_default(),
        recipient: t.recipient.clone().unwrap_or_default(),
        status: t.status.to_string(),
    }
}

fn to_rows(txs: &[Transaction]) -> Vec<TransactionRow> {
    txs.iter().map(to_row).collect()
}
