// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::models::{CardStatus, Session};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("status", sub)) => {
            let status = sub.get_one::<String>("status").unwrap().parse::<CardStatus>()?;
            set_status(conn, session, sub, status)?;
        }
        Some(("freeze", sub)) => set_status(conn, session, sub, CardStatus::Frozen)?,
        Some(("unfreeze", sub)) => set_status(conn, session, sub, CardStatus::Active)?,
        Some(("block", sub)) => set_status(conn, session, sub, CardStatus::Blocked)?,
        _ => {}
    }
    Ok(())
}

fn set_status(
    conn: &Connection,
    session: &Session,
    sub: &clap::ArgMatches,
    status: CardStatus,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let view = data::update_card_status(conn, session, id, status)?;
    if let Some(card) = view.card(id) {
        println!("Card {} is now {}", card.number, card.status);
    }
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let view = data::load(conn, session)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view.cards)? {
        return Ok(());
    }
    let rows = view
        .cards
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.card_type.to_string(),
                c.number.clone(),
                c.expiry_date.clone(),
                c.status.to_string(),
                format!("{:.2} / {:.2}", c.current_spending, c.spending_limit),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Type", "Number", "Expiry", "Status", "Spent / Limit"], rows)
    );
    Ok(())
}
