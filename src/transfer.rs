// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sending money to another person. Only the sender's side is booked: one
//! negative `send` entry against the chosen wallet. Unknown recipients with
//! an email become contacts in the same write.

use crate::data::{self, WalletView};
use crate::error::WalletError;
use crate::exchange::{ensure_funds, validate_amount};
use crate::models::{Contact, NewContact, NewTransaction, Session, TxType};
use crate::scanner::is_email;
use crate::store;
use crate::utils::initials;
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    pub recipient: String,
    pub currency: String,
    pub amount: Decimal,
    pub contact_id: Option<String>,
    #[serde(skip)]
    pub new_contact: Option<NewContact>,
}

impl Transfer {
    pub fn description(&self) -> String {
        format!("Transfer to {}", self.recipient)
    }
}

/// Case-insensitive substring match on name or email.
pub fn search_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let q = query.trim().to_lowercase();
    contacts
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&q) || c.email.to_lowercase().contains(&q))
        .collect()
}

/// Exact (case-insensitive) email or name match.
pub fn find_contact<'a>(contacts: &'a [Contact], key: &str) -> Option<&'a Contact> {
    let key = key.trim();
    contacts
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case(key))
        .or_else(|| contacts.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
}

pub fn prepare(
    view: &WalletView,
    to: Option<&str>,
    email: Option<&str>,
    currency: &str,
    amount: Decimal,
) -> Result<Transfer> {
    let to = to.map(str::trim).filter(|s| !s.is_empty());
    let email = email.map(str::trim).filter(|s| !s.is_empty());

    let known = to
        .and_then(|k| find_contact(&view.contacts, k))
        .or_else(|| email.and_then(|e| find_contact(&view.contacts, e)));

    let (recipient, contact_id, new_contact) = match known {
        Some(c) => (c.name.clone(), Some(c.id.clone()), None),
        None => {
            let name = to
                .or(email)
                .ok_or(WalletError::MissingField("recipient"))?
                .to_string();
            let email = email.or(to.filter(|t| is_email(t)));
            let new_contact = email.map(|e| NewContact {
                name: name.clone(),
                email: e.to_string(),
                avatar: Some(initials(&name)),
            });
            (name, None, new_contact)
        }
    };

    let wallet = view
        .currency(currency)
        .ok_or_else(|| WalletError::UnknownCurrency(currency.to_uppercase()))?;
    validate_amount(amount)?;
    ensure_funds(wallet, amount)?;

    Ok(Transfer {
        recipient,
        currency: wallet.code.clone(),
        amount,
        contact_id,
        new_contact,
    })
}

pub fn execute(conn: &Connection, session: &Session, t: &Transfer) -> Result<WalletView> {
    let mut entry =
        NewTransaction::completed(TxType::Send, -t.amount, &t.currency, &t.description());
    entry.recipient = Some(t.recipient.clone());
    let today = Utc::now().date_naive().to_string();

    let tx = store::write_transaction(conn)?;
    store::insert_transaction(&tx, &session.user_id, &entry)?;
    store::adjust_wallet_balance(&tx, &session.user_id, &t.currency, entry.amount)?;
    let contact_id = match (&t.contact_id, &t.new_contact) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(nc)) => Some(store::insert_contact(&tx, &session.user_id, nc)?.id),
        (None, None) => None,
    };
    if let Some(id) = &contact_id {
        store::touch_contact(&tx, &session.user_id, id, &today)?;
    }
    tx.commit()?;
    tracing::info!(
        recipient = %t.recipient,
        amount = %t.amount,
        currency = %t.currency,
        new_contact = t.new_contact.is_some(),
        "money sent"
    );
    data::load(conn, session)
}
