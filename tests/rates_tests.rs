// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use roamwallet::commands::rates;
use roamwallet::error::WalletError;
use roamwallet::commands::doctor;
use roamwallet::{auth, cli, data, db, exchange, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn catalog_seeding_is_idempotent() {
    let conn = setup();
    db::init_schema(&conn).unwrap();
    let all = store::all_currencies(&conn).unwrap();
    assert_eq!(all.len(), db::CURRENCY_CATALOG.len());
    assert_eq!(all[0].code, "USD");
    assert_eq!(all[0].rate, Decimal::ONE);
}

#[test]
fn set_rate_validates_and_feeds_exchange() {
    let conn = setup();
    let session = auth::sign_up(&conn, "fx@example.com", "pw", None).unwrap();

    let e = rates::set_rate(&conn, "EUR", dec("0")).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::InvalidRate { .. })
    ));
    assert!(rates::set_rate(&conn, "USD", dec("2")).is_err());
    let e = rates::set_rate(&conn, "ZZZ", dec("2")).unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::UnknownCurrency("ZZZ".into())));

    rates::set_rate(&conn, "EUR", dec("1.25")).unwrap();
    let view = data::load(&conn, &session).unwrap();
    let q = exchange::price(&view, "EUR", "USD", dec("10")).unwrap();
    assert_eq!(q.converted, dec("12.50"));
}

#[test]
fn deactivated_currency_leaves_the_view() {
    let conn = setup();
    let session = auth::sign_up(&conn, "fx2@example.com", "pw", None).unwrap();
    assert!(store::set_currency_active(&conn, "SEK", false).unwrap());
    let view = data::load(&conn, &session).unwrap();
    assert!(view.currency("SEK").is_none());
    assert_eq!(store::all_currencies(&conn).unwrap().len(), 10);
}

#[test]
fn frankfurter_quotes_are_inverted() {
    let mut quotes = HashMap::new();
    quotes.insert("EUR".to_string(), 0.8);
    quotes.insert("JPY".to_string(), 160.0);
    quotes.insert("BAD".to_string(), 0.0);
    let rates = rates::rates_from_quotes(&quotes);
    assert_eq!(
        rates,
        vec![
            ("EUR".to_string(), dec("1.25")),
            ("JPY".to_string(), dec("0.00625")),
        ]
    );
}

fn rates_cmd(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["roamwallet", "rates"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("rates", m)) = matches.subcommand() else {
        panic!("no rates subcommand");
    };
    rates::handle(conn, m)
}

#[test]
fn deactivate_and_activate_from_cli() {
    let conn = setup();
    let session = auth::sign_up(&conn, "fx3@example.com", "pw", None).unwrap();

    rates_cmd(&conn, &["deactivate", "--code", "gbp"]).unwrap();
    let view = data::load(&conn, &session).unwrap();
    assert!(view.currency("GBP").is_none());
    let issues: Vec<&str> = doctor::findings(&conn, &session)
        .unwrap()
        .iter()
        .map(|f| f.issue)
        .collect();
    assert!(issues.contains(&"wallet_inactive_currency"));

    rates_cmd(&conn, &["activate", "--code", "GBP"]).unwrap();
    let view = data::load(&conn, &session).unwrap();
    assert_eq!(view.balance("GBP"), dec("320.50"));

    assert!(rates_cmd(&conn, &["deactivate", "--code", "USD"]).is_err());
    let e = rates_cmd(&conn, &["activate", "--code", "XYZ"]).unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::UnknownCurrency("XYZ".into())));
}
