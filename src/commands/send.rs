// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::error::WalletError;
use crate::models::Session;
use crate::scanner::{ScanPayload, parse_scan};
use crate::transfer;
use crate::utils::{fmt_money, parse_decimal};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Recipient and amount after merging a scanned code with the flags; explicit
/// flags win over the scanned values.
#[derive(Debug, Default, PartialEq)]
pub struct SendRequest {
    pub to: Option<String>,
    pub email: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

pub fn request_from_args(m: &clap::ArgMatches) -> Result<SendRequest> {
    let flag = |id: &str| {
        m.get_one::<String>(id)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let mut req = SendRequest {
        to: flag("to"),
        email: flag("email"),
        amount: flag("amount").map(|s| parse_decimal(&s)).transpose()?,
        currency: None,
    };
    if let Some(code) = flag("qr") {
        match parse_scan(&code) {
            ScanPayload::Payment {
                name,
                email,
                amount,
                currency,
            } => {
                req.to = req.to.or(Some(name));
                req.email = req.email.or(Some(email));
                req.amount = req.amount.or(amount);
                req.currency = currency;
            }
            ScanPayload::Email(email) => {
                req.email = req.email.or(Some(email));
            }
            ScanPayload::Unrecognized => {
                return Err(anyhow!("Unrecognized payment code '{}'", code));
            }
        }
    }
    // An explicitly given --currency beats the scanned one; the default does not.
    let explicit_currency = m.value_source("currency") == Some(clap::parser::ValueSource::CommandLine);
    if req.currency.is_none() || explicit_currency {
        req.currency = flag("currency");
    }
    Ok(req)
}

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let req = request_from_args(m)?;
    let amount = req.amount.ok_or(WalletError::MissingField("amount"))?;
    let currency = req.currency.unwrap_or_else(|| "USD".to_string()).to_uppercase();

    let view = data::load(conn, session)?;
    let t = transfer::prepare(
        &view,
        req.to.as_deref(),
        req.email.as_deref(),
        &currency,
        amount,
    )?;
    let view = transfer::execute(conn, session, &t)?;
    println!("Sent {} to {}", fmt_money(&t.amount, &t.currency), t.recipient);
    if t.new_contact.is_some() {
        println!("Added {} to your contacts", t.recipient);
    }
    println!(
        "Remaining balance: {}",
        fmt_money(&view.balance(&t.currency), &t.currency)
    );
    Ok(())
}
