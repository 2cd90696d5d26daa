// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Session, TxType};
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub detail: String,
}

pub fn handle(conn: &Connection, session: &Session) -> Result<()> {
    let found = findings(conn, session)?;
    if found.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = found
            .into_iter()
            .map(|f| vec![f.issue.to_string(), f.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn findings(conn: &Connection, session: &Session) -> Result<Vec<Finding>> {
    let mut out = Vec::new();
    let catalog = store::all_currencies(conn)?;
    let known: HashSet<&str> = catalog.iter().map(|c| c.code.as_str()).collect();
    let inactive: HashSet<&str> = catalog
        .iter()
        .filter(|c| !c.is_active)
        .map(|c| c.code.as_str())
        .collect();

    for b in store::budgets(conn, &session.user_id)? {
        if b.categories.is_empty() {
            out.push(Finding {
                issue: "budget_without_categories",
                detail: format!("{} ({})", b.destination, b.id),
            });
        }
    }

    let txs = store::transactions(conn, &session.user_id)?;
    for t in &txs {
        if !known.contains(t.currency.as_str()) {
            out.push(Finding {
                issue: "unknown_currency",
                detail: format!("{} {} '{}'", t.currency, t.amount, t.description),
            });
        }
    }

    // Each exchange books a debit and a credit under the same description.
    let mut legs: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.tx_type == TxType::Exchange) {
        let e = legs.entry(t.description.as_str()).or_default();
        if t.amount.is_sign_negative() {
            e.0 += 1;
        } else {
            e.1 += 1;
        }
    }
    for (desc, (debits, credits)) in legs {
        if debits != credits {
            out.push(Finding {
                issue: "one_sided_exchange",
                detail: format!("'{}': {} debit(s), {} credit(s)", desc, debits, credits),
            });
        }
    }

    for w in store::wallets(conn, &session.user_id)? {
        if inactive.contains(w.currency_code.as_str()) {
            out.push(Finding {
                issue: "wallet_inactive_currency",
                detail: format!("{} {}", w.currency_code, w.balance),
            });
        }
    }
    Ok(out)
}
