// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::models::Session;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, session, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    // Oldest first reads naturally in a spreadsheet.
    let mut txs = data::load(conn, session)?.transactions;
    txs.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "created_at",
                "type",
                "amount",
                "currency",
                "description",
                "location",
                "recipient",
                "category",
                "status",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.created_at.to_rfc3339(),
                    t.tx_type.to_string(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.description.clone(),
                    t.location.clone().unwrap_or_default(),
                    t.recipient.clone().unwrap_or_default(),
                    t.category.clone().unwrap_or_default(),
                    t.status.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "created_at": t.created_at,
                        "type": t.tx_type,
                        "amount": t.amount.to_string(),
                        "currency": t.currency,
                        "description": t.description,
                        "location": t.location,
                        "recipient": t.recipient,
                        "category": t.category,
                        "status": t.status,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(count = txs.len(), format = %fmt, path = %out, "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
