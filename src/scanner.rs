// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decoding of scanned payment codes.
//!
//! A scanner yields text. Payment codes are JSON objects
//! `{"name", "email", "amount"?, "currency"?}`; anything else that looks like
//! an email address is taken as the recipient's email.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum ScanPayload {
    Payment {
        name: String,
        email: String,
        amount: Option<Decimal>,
        currency: Option<String>,
    },
    Email(String),
    Unrecognized,
}

#[derive(Deserialize)]
struct PaymentCode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    amount: Option<Value>,
    currency: Option<String>,
}

pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s.trim())
}

fn amount_from(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

pub fn parse_scan(text: &str) -> ScanPayload {
    let text = text.trim();
    if let Ok(code) = serde_json::from_str::<PaymentCode>(text) {
        let name = code.name.trim();
        let email = code.email.trim();
        if !name.is_empty() && !email.is_empty() {
            return ScanPayload::Payment {
                name: name.to_string(),
                email: email.to_string(),
                amount: code.amount.as_ref().and_then(amount_from),
                currency: code
                    .currency
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty()),
            };
        }
        tracing::debug!("payment code without name or email");
        return ScanPayload::Unrecognized;
    }
    if is_email(text) {
        return ScanPayload::Email(text.to_string());
    }
    ScanPayload::Unrecognized
}
