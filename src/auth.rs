// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sign-up, sign-in and sign-out.
//!
//! A [`Session`] is the only way to reach user data: every data-access call
//! takes one explicitly. Sign-up also seeds the starter wallets, sample
//! ledger entries, contacts and a card so a fresh account has something to
//! show.

use crate::error::WalletError;
use crate::models::{CardStatus, CardType, NewCard, NewContact, NewTransaction, Session, TxType};
use crate::store;
use crate::utils::{clear_setting, get_setting, initials, new_id, now_timestamp, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

pub const SESSION_KEY: &str = "session_token";

const STARTER_WALLETS: &[(&str, i64, u32)] =
    &[("USD", 245075, 2), ("EUR", 89030, 2), ("GBP", 32050, 2)];

const SAMPLE_CONTACTS: &[(&str, &str)] = &[
    ("Sarah Johnson", "sarah.j@email.com"),
    ("Mike Chen", "mike.chen@email.com"),
];

/// Argon2id with a fresh salt; the PHC string carries salt and parameters.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Hash password: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("Stored password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(WalletError::MissingField("email").into());
    }
    Ok(email)
}

fn open_session(conn: &Connection, user_id: &str, email: &str) -> Result<Session> {
    let token = new_id();
    conn.execute(
        "INSERT INTO sessions(token, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, now_timestamp()],
    )?;
    Ok(Session {
        token,
        user_id: user_id.to_string(),
        email: email.to_string(),
    })
}

pub fn sign_up(conn: &Connection, email: &str, password: &str, full_name: Option<&str>) -> Result<Session> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(WalletError::MissingField("password").into());
    }
    let exists: Option<String> = conn
        .query_row("SELECT id FROM profiles WHERE email=?1", [&email], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_some() {
        return Err(WalletError::EmailTaken(email).into());
    }

    let tx = store::write_transaction(conn)?;
    let user_id = new_id();
    let password_hash = hash_password(password)?;
    tx.execute(
        "INSERT INTO profiles(id, email, full_name, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            email,
            full_name.unwrap_or(""),
            password_hash,
            now_timestamp()
        ],
    )?;
    seed_account(&tx, &user_id)?;
    let session = open_session(&tx, &user_id, &email)?;
    tx.commit()?;
    tracing::info!(user = %user_id, "account created");
    Ok(session)
}

fn seed_account(conn: &Connection, user_id: &str) -> Result<()> {
    for (code, units, scale) in STARTER_WALLETS {
        store::insert_wallet(conn, user_id, code, Decimal::new(*units, *scale))?;
    }
    store::insert_transaction(
        conn,
        user_id,
        &NewTransaction::completed(TxType::Receive, Decimal::new(1000, 0), "USD", "Initial deposit"),
    )?;
    store::insert_transaction(
        conn,
        user_id,
        &NewTransaction::completed(TxType::Exchange, Decimal::new(500, 0), "EUR", "USD → EUR Exchange"),
    )?;
    for (name, email) in SAMPLE_CONTACTS {
        store::insert_contact(
            conn,
            user_id,
            &NewContact {
                name: name.to_string(),
                email: email.to_string(),
                avatar: Some(initials(name)),
            },
        )?;
    }
    store::insert_card(
        conn,
        user_id,
        &NewCard {
            card_type: CardType::Physical,
            last_four: "4521".into(),
            expiry_date: "12/27".into(),
            status: CardStatus::Active,
            spending_limit: Decimal::new(5000, 0),
            current_spending: Decimal::new(125075, 2),
        },
    )?;
    Ok(())
}

pub fn sign_in(conn: &Connection, email: &str, password: &str) -> Result<Session> {
    let email = normalize_email(email)?;
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM profiles WHERE email=?1",
            [&email],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((user_id, stored_hash)) = row else {
        tracing::warn!("sign-in for unknown email");
        return Err(WalletError::InvalidCredentials.into());
    };
    if !verify_password(password, &stored_hash)? {
        tracing::warn!(user = %user_id, "sign-in with wrong password");
        return Err(WalletError::InvalidCredentials.into());
    }
    let session = open_session(conn, &user_id, &email)?;
    tracing::info!(user = %user_id, "signed in");
    Ok(session)
}

pub fn sign_out(conn: &Connection, session: &Session) -> Result<()> {
    conn.execute("DELETE FROM sessions WHERE token=?1", [&session.token])?;
    tracing::info!(user = %session.user_id, "signed out");
    Ok(())
}

pub fn session_from_token(conn: &Connection, token: &str) -> Result<Option<Session>> {
    let s = conn
        .query_row(
            "SELECT s.token, s.user_id, p.email FROM sessions s JOIN profiles p ON p.id=s.user_id WHERE s.token=?1",
            [token],
            |r| {
                Ok(Session {
                    token: r.get(0)?,
                    user_id: r.get(1)?,
                    email: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(s)
}

// The CLI keeps one active session per database in `settings`.

pub fn remember(conn: &Connection, session: &Session) -> Result<()> {
    set_setting(conn, SESSION_KEY, &session.token)
}

pub fn forget(conn: &Connection) -> Result<()> {
    clear_setting(conn, SESSION_KEY)
}

pub fn current_session(conn: &Connection) -> Result<Option<Session>> {
    match get_setting(conn, SESSION_KEY)? {
        Some(token) => session_from_token(conn, &token),
        None => Ok(None),
    }
}

pub fn require_session(conn: &Connection) -> Result<Session> {
    current_session(conn)?.ok_or_else(|| WalletError::NotSignedIn.into())
}
