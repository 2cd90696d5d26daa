// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Data access layer: loads a user's rows into one denormalized
//! [`WalletView`] and performs the simple mutations. Every mutation writes,
//! then hands back a freshly loaded view so callers never patch state by hand.

use crate::error::WalletError;
use crate::models::{
    Card, CardStatus, Contact, Currency, NewBudget, NewContact, NewTransaction, Session,
    Transaction, TravelBudget,
};
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct WalletView {
    pub currencies: Vec<Currency>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<TravelBudget>,
    pub contacts: Vec<Contact>,
    pub cards: Vec<Card>,
}

impl WalletView {
    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn balance(&self, code: &str) -> Decimal {
        self.currency(code).map(|c| c.balance).unwrap_or_default()
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// The currency whose rate is exactly one, if the catalog has one.
    pub fn base_currency(&self) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.rate == Decimal::ONE)
    }
}

pub fn load(conn: &Connection, session: &Session) -> Result<WalletView> {
    let mut currencies = store::active_currencies(conn)?;
    let balances: HashMap<String, Decimal> = store::wallets(conn, &session.user_id)?
        .into_iter()
        .map(|w| (w.currency_code, w.balance))
        .collect();
    for c in currencies.iter_mut() {
        c.balance = balances.get(&c.code).copied().unwrap_or_default();
    }

    let view = WalletView {
        currencies,
        transactions: store::transactions(conn, &session.user_id)?,
        budgets: store::budgets(conn, &session.user_id)?,
        contacts: store::contacts(conn, &session.user_id)?,
        cards: store::cards(conn, &session.user_id)?,
    };
    tracing::debug!(
        user = %session.user_id,
        transactions = view.transactions.len(),
        budgets = view.budgets.len(),
        "wallet view loaded"
    );
    Ok(view)
}

/// Appends one ledger entry and applies it to the matching wallet.
pub fn add_transaction(
    conn: &Connection,
    session: &Session,
    t: &NewTransaction,
) -> Result<WalletView> {
    let tx = store::write_transaction(conn)?;
    let recorded = store::insert_transaction(&tx, &session.user_id, t)?;
    store::adjust_wallet_balance(&tx, &session.user_id, &t.currency, t.amount)?;
    tx.commit()?;
    tracing::info!(
        id = %recorded.id,
        kind = %recorded.tx_type,
        amount = %recorded.amount,
        currency = %recorded.currency,
        "transaction recorded"
    );
    load(conn, session)
}

pub fn update_card_status(
    conn: &Connection,
    session: &Session,
    card_id: &str,
    status: CardStatus,
) -> Result<WalletView> {
    if !store::update_card_status(conn, &session.user_id, card_id, status)? {
        return Err(WalletError::NotFound {
            kind: "Card",
            id: card_id.to_string(),
        }
        .into());
    }
    tracing::info!(card = card_id, %status, "card status updated");
    load(conn, session)
}

pub fn add_contact(conn: &Connection, session: &Session, c: &NewContact) -> Result<WalletView> {
    if c.name.trim().is_empty() {
        return Err(WalletError::MissingField("name").into());
    }
    if c.email.trim().is_empty() {
        return Err(WalletError::MissingField("email").into());
    }
    let contact = store::insert_contact(conn, &session.user_id, c)?;
    tracing::info!(contact = %contact.id, "contact added");
    load(conn, session)
}

/// Budget row and its category rows are written as one unit.
pub fn create_budget(conn: &Connection, session: &Session, b: &NewBudget) -> Result<WalletView> {
    let tx = store::write_transaction(conn)?;
    let budget_id = store::insert_budget(&tx, &session.user_id, b)?;
    store::insert_budget_categories(&tx, &budget_id, &b.categories)?;
    tx.commit()?;
    tracing::info!(
        budget = %budget_id,
        destination = %b.destination,
        categories = b.categories.len(),
        "travel budget created"
    );
    load(conn, session)
}
