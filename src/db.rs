// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::Path;

/// Currencies offered by the wallet. Rates are the value of one unit in the
/// base currency (USD, rate 1).
pub const CURRENCY_CATALOG: &[(&str, &str, &str, &str, &str)] = &[
    ("USD", "US Dollar", "$", "🇺🇸", "1"),
    ("EUR", "Euro", "€", "🇪🇺", "1.1765"),
    ("GBP", "British Pound", "£", "🇬🇧", "1.3699"),
    ("JPY", "Japanese Yen", "¥", "🇯🇵", "0.0091"),
    ("CAD", "Canadian Dollar", "C$", "🇨🇦", "0.8"),
    ("AUD", "Australian Dollar", "A$", "🇦🇺", "0.7407"),
    ("CHF", "Swiss Franc", "CHF", "🇨🇭", "1.087"),
    ("SGD", "Singapore Dollar", "S$", "🇸🇬", "0.7407"),
    ("HKD", "Hong Kong Dollar", "HK$", "🇭🇰", "0.1282"),
    ("SEK", "Swedish Krona", "kr", "🇸🇪", "0.1176"),
];

pub fn open_or_init(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS currencies(
        id TEXT PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL,
        flag TEXT NOT NULL,
        rate TEXT NOT NULL, -- value of one unit in BASE currency
        is_active INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
    );

    CREATE TABLE IF NOT EXISTS profiles(
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT,
        password_hash TEXT NOT NULL, -- argon2 PHC string
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions(
        token TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS wallets(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        currency_code TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(user_id, currency_code),
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('exchange','send','receive','spend','transfer')),
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT,
        status TEXT NOT NULL DEFAULT 'completed' CHECK(status IN ('completed','pending','failed')),
        recipient TEXT,
        category TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_created ON transactions(user_id, created_at);

    CREATE TABLE IF NOT EXISTS travel_budgets(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        destination TEXT NOT NULL,
        total_budget TEXT NOT NULL,
        spent TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS budget_categories(
        id TEXT PRIMARY KEY,
        budget_id TEXT NOT NULL,
        category TEXT NOT NULL CHECK(category IN ('accommodation','food','transport','activities','shopping')),
        budget TEXT NOT NULL,
        spent TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL,
        UNIQUE(budget_id, category),
        FOREIGN KEY(budget_id) REFERENCES travel_budgets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS contacts(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        avatar TEXT,
        last_transaction_date TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS cards(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('physical','virtual')),
        last_four TEXT NOT NULL CHECK(length(last_four) = 4),
        expiry_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','frozen','blocked')),
        spending_limit TEXT NOT NULL DEFAULT '0',
        current_spending TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    "#,
    )?;
    seed_currencies(conn)?;
    Ok(())
}

fn seed_currencies(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO currencies(id, code, name, symbol, flag, rate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (code, name, symbol, flag, rate) in CURRENCY_CATALOG {
        stmt.execute(params![
            uuid::Uuid::new_v4().to_string(),
            code,
            name,
            symbol,
            flag,
            rate
        ])?;
    }
    Ok(())
}
