// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-level access to the wallet store.
//!
//! Every read and write is scoped to one `user_id`; nothing here can see
//! another user's rows. Compound writes open a [`write_transaction`] and call
//! the single-row helpers inside it, so the helpers take `&Connection` and
//! never begin transactions of their own. [`adjust_wallet_balance`] is the one
//! exception: it takes a `rusqlite::Transaction` so its read-modify-write can
//! only ever run under a write lock.

use crate::error::WalletError;
use crate::models::{
    BudgetCategoryKind, Card, CardStatus, CardType, CategoryBucket, Contact, Currency,
    NewBudget, NewCard, NewContact, NewTransaction, Transaction, TravelBudget, TxStatus, TxType,
    Wallet,
};
use crate::utils::{
    decimal_column, mask_card_number, new_id, now_timestamp, parse_date, parse_timestamp,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Begins an IMMEDIATE transaction: the write lock is taken up front, so a
/// concurrent writer on the same database file waits instead of interleaving.
pub fn write_transaction(conn: &Connection) -> Result<rusqlite::Transaction<'_>> {
    rusqlite::Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .context("Begin write transaction")
}

// Currencies

fn currencies_where(conn: &Connection, only_active: bool) -> Result<Vec<Currency>> {
    let sql = if only_active {
        "SELECT id, code, name, symbol, flag, rate, is_active FROM currencies WHERE is_active=1 ORDER BY rowid"
    } else {
        "SELECT id, code, name, symbol, flag, rate, is_active FROM currencies ORDER BY rowid"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, bool>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, code, name, symbol, flag, rate_s, is_active) = row?;
        let rate = decimal_column(&rate_s, "rate")
            .with_context(|| format!("Currency {}", code))?;
        out.push(Currency {
            id,
            code,
            name,
            symbol,
            flag,
            rate,
            is_active,
            balance: Decimal::ZERO,
        });
    }
    Ok(out)
}

pub fn active_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    currencies_where(conn, true)
}

pub fn all_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    currencies_where(conn, false)
}

/// Returns false when no currency has that code.
pub fn set_currency_rate(conn: &Connection, code: &str, rate: Decimal) -> Result<bool> {
    let n = conn.execute(
        "UPDATE currencies SET rate=?1, updated_at=?2 WHERE code=?3",
        params![rate.to_string(), now_timestamp(), code],
    )?;
    Ok(n > 0)
}

pub fn set_currency_active(conn: &Connection, code: &str, active: bool) -> Result<bool> {
    let n = conn.execute(
        "UPDATE currencies SET is_active=?1, updated_at=?2 WHERE code=?3",
        params![active, now_timestamp(), code],
    )?;
    Ok(n > 0)
}

// Wallets

pub fn wallets(conn: &Connection, user_id: &str) -> Result<Vec<Wallet>> {
    let mut stmt = conn.prepare(
        "SELECT id, currency_code, balance FROM wallets WHERE user_id=?1 ORDER BY currency_code",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, currency_code, bal_s) = row?;
        let balance = decimal_column(&bal_s, "wallet balance")?;
        out.push(Wallet {
            id,
            currency_code,
            balance,
        });
    }
    Ok(out)
}

pub fn insert_wallet(conn: &Connection, user_id: &str, code: &str, balance: Decimal) -> Result<()> {
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO wallets(id, user_id, currency_code, balance, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![new_id(), user_id, code, balance.to_string(), now],
    )
    .with_context(|| format!("Create {} wallet", code))?;
    Ok(())
}

/// `wallet.balance += amount`, creating the wallet on first use. Returns the
/// new balance.
pub fn adjust_wallet_balance(
    tx: &rusqlite::Transaction<'_>,
    user_id: &str,
    code: &str,
    amount: Decimal,
) -> Result<Decimal> {
    let current: Option<String> = tx
        .query_row(
            "SELECT balance FROM wallets WHERE user_id=?1 AND currency_code=?2",
            params![user_id, code],
            |r| r.get(0),
        )
        .optional()?;
    let new_balance = match current {
        Some(raw) => {
            let balance = decimal_column(&raw, "wallet balance")?
                .checked_add(amount)
                .ok_or(WalletError::AmountOutOfRange("wallet balance"))?;
            tx.execute(
                "UPDATE wallets SET balance=?1, updated_at=?2 WHERE user_id=?3 AND currency_code=?4",
                params![balance.to_string(), now_timestamp(), user_id, code],
            )?;
            balance
        }
        None => {
            insert_wallet(tx, user_id, code, amount)?;
            amount
        }
    };
    tracing::debug!(currency = code, %amount, balance = %new_balance, "wallet adjusted");
    Ok(new_balance)
}

// Transactions

pub fn insert_transaction(
    conn: &Connection,
    user_id: &str,
    t: &NewTransaction,
) -> Result<Transaction> {
    let id = new_id();
    let created = now_timestamp();
    conn.execute(
        "INSERT INTO transactions(id, user_id, type, amount, currency, description, location, status, recipient, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id,
            user_id,
            t.tx_type.as_str(),
            t.amount.to_string(),
            t.currency,
            t.description,
            t.location,
            t.status.as_str(),
            t.recipient,
            t.category,
            created
        ],
    )
    .with_context(|| format!("Record {} transaction in {}", t.tx_type, t.currency))?;
    Ok(Transaction {
        id,
        tx_type: t.tx_type,
        amount: t.amount,
        currency: t.currency.clone(),
        description: t.description.clone(),
        location: t.location.clone(),
        status: t.status,
        recipient: t.recipient.clone(),
        category: t.category.clone(),
        created_at: parse_timestamp(&created)?,
    })
}

/// Newest first.
pub fn transactions(conn: &Connection, user_id: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, amount, currency, description, location, status, recipient, category, created_at
         FROM transactions WHERE user_id=?1
         ORDER BY created_at DESC, rowid DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let type_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let status_s: String = r.get(6)?;
        let created_s: String = r.get(9)?;
        out.push(Transaction {
            tx_type: type_s.parse::<TxType>()?,
            amount: decimal_column(&amount_s, "transaction amount")
                .with_context(|| format!("Transaction {}", id))?,
            currency: r.get(3)?,
            description: r.get(4)?,
            location: r.get(5)?,
            status: status_s.parse::<TxStatus>()?,
            recipient: r.get(7)?,
            category: r.get(8)?,
            created_at: parse_timestamp(&created_s)?,
            id,
        });
    }
    Ok(out)
}

// Travel budgets

pub fn insert_budget(conn: &Connection, user_id: &str, b: &NewBudget) -> Result<String> {
    let id = new_id();
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO travel_budgets(id, user_id, destination, total_budget, spent, currency, start_date, end_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, '0', ?5, ?6, ?7, ?8, ?8)",
        params![
            id,
            user_id,
            b.destination,
            b.total_budget.to_string(),
            b.currency,
            b.start_date.to_string(),
            b.end_date.to_string(),
            now
        ],
    )
    .with_context(|| format!("Create budget for {}", b.destination))?;
    Ok(id)
}

pub fn insert_budget_categories(
    conn: &Connection,
    budget_id: &str,
    categories: &[(BudgetCategoryKind, Decimal)],
) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO budget_categories(id, budget_id, category, budget, spent, created_at)
         VALUES (?1, ?2, ?3, ?4, '0', ?5)",
    )?;
    let now = now_timestamp();
    for (kind, amount) in categories {
        stmt.execute(params![
            new_id(),
            budget_id,
            kind.as_str(),
            amount.to_string(),
            now
        ])
        .with_context(|| format!("Create {} category", kind))?;
    }
    Ok(())
}

pub fn budgets(conn: &Connection, user_id: &str) -> Result<Vec<TravelBudget>> {
    let mut stmt = conn.prepare(
        "SELECT id, destination, total_budget, spent, currency, start_date, end_date
         FROM travel_budgets WHERE user_id=?1 ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    let mut index_by_id = HashMap::new();
    for row in rows {
        let (id, destination, total_s, spent_s, currency, start_s, end_s) = row?;
        index_by_id.insert(id.clone(), out.len());
        out.push(TravelBudget {
            destination,
            total_budget: decimal_column(&total_s, "total budget")?,
            spent: decimal_column(&spent_s, "budget spent")?,
            currency,
            start_date: parse_date(&start_s)?,
            end_date: parse_date(&end_s)?,
            categories: BTreeMap::new(),
            id,
        });
    }
    if out.is_empty() {
        return Ok(out);
    }

    let mut cat_stmt = conn.prepare(
        "SELECT bc.budget_id, bc.category, bc.budget, bc.spent
         FROM budget_categories bc JOIN travel_budgets b ON b.id=bc.budget_id
         WHERE b.user_id=?1",
    )?;
    let mut cats = cat_stmt.query(params![user_id])?;
    while let Some(r) = cats.next()? {
        let budget_id: String = r.get(0)?;
        let kind_s: String = r.get(1)?;
        let budget_s: String = r.get(2)?;
        let spent_s: String = r.get(3)?;
        if let Some(&idx) = index_by_id.get(&budget_id) {
            out[idx].categories.insert(
                kind_s.parse::<BudgetCategoryKind>()?,
                CategoryBucket {
                    budget: decimal_column(&budget_s, "category budget")?,
                    spent: decimal_column(&spent_s, "category spent")?,
                },
            );
        }
    }
    Ok(out)
}

// Contacts

pub fn insert_contact(conn: &Connection, user_id: &str, c: &NewContact) -> Result<Contact> {
    let id = new_id();
    conn.execute(
        "INSERT INTO contacts(id, user_id, name, email, avatar, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, user_id, c.name, c.email, c.avatar, now_timestamp()],
    )
    .with_context(|| format!("Add contact {}", c.email))?;
    Ok(Contact {
        id,
        name: c.name.clone(),
        email: c.email.clone(),
        avatar: c.avatar.clone(),
        last_transaction_date: None,
    })
}

pub fn contacts(conn: &Connection, user_id: &str) -> Result<Vec<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, avatar, last_transaction_date FROM contacts
         WHERE user_id=?1 ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(Contact {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            avatar: r.get(3)?,
            last_transaction_date: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn touch_contact(conn: &Connection, user_id: &str, contact_id: &str, date: &str) -> Result<()> {
    conn.execute(
        "UPDATE contacts SET last_transaction_date=?1 WHERE id=?2 AND user_id=?3",
        params![date, contact_id, user_id],
    )?;
    Ok(())
}

// Cards

pub fn insert_card(conn: &Connection, user_id: &str, c: &NewCard) -> Result<String> {
    let id = new_id();
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO cards(id, user_id, type, last_four, expiry_date, status, spending_limit, current_spending, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            id,
            user_id,
            c.card_type.as_str(),
            c.last_four,
            c.expiry_date,
            c.status.as_str(),
            c.spending_limit.to_string(),
            c.current_spending.to_string(),
            now
        ],
    )
    .context("Issue card")?;
    Ok(id)
}

pub fn cards(conn: &Connection, user_id: &str) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, last_four, expiry_date, status, spending_limit, current_spending
         FROM cards WHERE user_id=?1 ORDER BY created_at, rowid",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let type_s: String = r.get(1)?;
        let last_four: String = r.get(2)?;
        let status_s: String = r.get(4)?;
        let limit_s: String = r.get(5)?;
        let spending_s: String = r.get(6)?;
        out.push(Card {
            id: r.get(0)?,
            card_type: type_s.parse::<CardType>()?,
            number: mask_card_number(&last_four),
            last_four,
            expiry_date: r.get(3)?,
            status: status_s.parse::<CardStatus>()?,
            spending_limit: decimal_column(&limit_s, "spending limit")?,
            current_spending: decimal_column(&spending_s, "current spending")?,
        });
    }
    Ok(out)
}

/// Returns false when the card does not exist for this user.
pub fn update_card_status(
    conn: &Connection,
    user_id: &str,
    card_id: &str,
    status: CardStatus,
) -> Result<bool> {
    let n = conn.execute(
        "UPDATE cards SET status=?1, updated_at=?2 WHERE id=?3 AND user_id=?4",
        params![status.as_str(), now_timestamp(), card_id, user_id],
    )?;
    Ok(n > 0)
}
