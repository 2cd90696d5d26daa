// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::exchange::{self, ExchangeQuote};
use crate::models::Session;
use crate::utils::{maybe_print_json, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("quote", sub)) => quote(conn, session, sub)?,
        Some(("run", sub)) => run(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn args(sub: &clap::ArgMatches) -> Result<(String, String, rust_decimal::Decimal)> {
    let from = sub.get_one::<String>("from").unwrap().trim().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().trim().to_uppercase();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    Ok((from, to, amount))
}

fn print_quote(q: &ExchangeQuote) {
    println!("1 {} = {:.4} {}", q.from, q.rate, q.to);
    println!("{:.2} {} -> {:.2} {}", q.amount, q.from, q.converted, q.to);
}

fn quote(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to, amount) = args(sub)?;
    let view = data::load(conn, session)?;
    let q = exchange::price(&view, &from, &to, amount)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &q)? {
        print_quote(&q);
        println!(
            "Available: {:.2} {}",
            view.balance(&q.from),
            q.from
        );
    }
    Ok(())
}

fn run(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to, amount) = args(sub)?;
    let (q, view) = exchange::exchange(conn, session, &from, &to, amount)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &q)? {
        println!("Exchange completed");
        print_quote(&q);
        println!(
            "Balances: {:.2} {}, {:.2} {}",
            view.balance(&q.from),
            q.from,
            view.balance(&q.to),
            q.to
        );
    }
    Ok(())
}
