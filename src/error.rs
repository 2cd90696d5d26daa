// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Domain errors raised by validation and the data access layer.
//!
//! Everything else travels as `anyhow::Error` with context attached; these
//! variants exist so callers (and tests) can tell a rejected request apart
//! from a failed store call via `downcast_ref`.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WalletError {
    #[error("Not signed in; run `roamwallet auth signin` first")]
    NotSignedIn,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account for '{0}' already exists")]
    EmailTaken(String),

    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),

    #[error("Source and target currency are both {0}")]
    SameCurrency(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Amount {0} has more than two decimal places")]
    TooPrecise(Decimal),

    #[error("Amount out of range while computing {0}")]
    AmountOutOfRange(&'static str),

    #[error("Insufficient {currency} balance: available {available}, requested {requested}")]
    InsufficientBalance {
        currency: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid rate {rate} for {code}")]
    InvalidRate { code: String, rate: Decimal },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },
}
