// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budget;
pub mod cards;
pub mod contacts;
pub mod doctor;
pub mod exchange;
pub mod exporter;
pub mod home;
pub mod rates;
pub mod send;
pub mod transactions;
pub mod wallets;

pub(crate) const HIDDEN: &str = "••••••";

/// Formats an amount, or the mask when balances are hidden.
pub(crate) fn amount_cell(d: &rust_decimal::Decimal, hide: bool) -> String {
    if hide {
        HIDDEN.to_string()
    } else {
        format!("{:.2}", d)
    }
}
