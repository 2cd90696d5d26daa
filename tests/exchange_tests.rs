// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use roamwallet::error::WalletError;
use roamwallet::models::{Session, TxType};
use roamwallet::{auth, cli, commands, data, db, exchange};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> (Connection, Session) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = auth::sign_up(&conn, "traveler@example.com", "pw", Some("Tra Veler")).unwrap();
    (conn, session)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn wallet_error(e: &anyhow::Error) -> &WalletError {
    e.downcast_ref::<WalletError>().expect("domain error")
}

#[test]
fn cross_rate_is_symmetric_for_every_pair() {
    let (conn, session) = setup();
    let view = data::load(&conn, &session).unwrap();
    let tolerance = Decimal::new(1, 12);
    for a in &view.currencies {
        for b in &view.currencies {
            let ab = exchange::cross_rate(a, b).unwrap();
            let ba = exchange::cross_rate(b, a).unwrap();
            assert_eq!(ab, a.rate / b.rate);
            assert!((ab * ba - Decimal::ONE).abs() < tolerance, "{}/{}", a.code, b.code);
        }
    }
}

#[test]
fn run_moves_exact_amounts_and_records_two_legs() {
    let (conn, session) = setup();
    let before = data::load(&conn, &session).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "roamwallet", "exchange", "run", "--from", "USD", "--to", "EUR", "--amount", "100",
    ]);
    let Some(("exchange", m)) = matches.subcommand() else {
        panic!("no exchange subcommand");
    };
    commands::exchange::handle(&conn, &session, m).unwrap();

    let after = data::load(&conn, &session).unwrap();
    // 100 / 1.1765 = 84.9978..., truncated to cents
    assert_eq!(after.balance("USD"), dec("2350.75"));
    assert_eq!(after.balance("EUR"), dec("975.29"));
    assert_eq!(after.transactions.len(), before.transactions.len() + 2);

    let legs: Vec<_> = after.transactions.iter().take(2).collect();
    assert!(legs.iter().all(|t| t.tx_type == TxType::Exchange));
    assert!(legs.iter().all(|t| t.description == "USD → EUR Exchange"));
    // The debit is written after the credit, so it is the newest.
    assert_eq!(legs[0].currency, "USD");
    assert_eq!(legs[0].amount, dec("-100"));
    assert_eq!(legs[1].currency, "EUR");
    assert_eq!(legs[1].amount, dec("84.99"));
}

#[test]
fn round_trip_never_returns_more() {
    let (conn, session) = setup();
    for amount in ["100", "0.01", "333.33", "1000"] {
        let start = data::load(&conn, &session).unwrap().balance("USD");
        let x = dec(amount);
        let (q, _) = exchange::exchange(&conn, &session, "USD", "JPY", x).unwrap();
        if q.converted.is_zero() {
            continue;
        }
        let (back, view) = exchange::exchange(&conn, &session, "JPY", "USD", q.converted).unwrap();
        assert!(back.converted <= x, "{} came back as {}", x, back.converted);
        assert!(view.balance("USD") <= start);
    }
}

#[test]
fn quote_reports_without_writing() {
    let (conn, session) = setup();
    let view = data::load(&conn, &session).unwrap();
    let q = exchange::price(&view, "gbp", "usd", dec("10")).unwrap();
    assert_eq!(q.from, "GBP");
    assert_eq!(q.to, "USD");
    assert_eq!(q.rate, dec("1.3699"));
    assert_eq!(q.converted, dec("13.69"));
    assert_eq!(data::load(&conn, &session).unwrap().transactions.len(), 2);
}

#[test]
fn validation_rejects_before_any_write() {
    let (conn, session) = setup();

    let e = exchange::exchange(&conn, &session, "USD", "EUR", dec("10000")).unwrap_err();
    assert!(matches!(
        wallet_error(&e),
        WalletError::InsufficientBalance { currency, .. } if currency == "USD"
    ));

    let e = exchange::exchange(&conn, &session, "USD", "USD", dec("1")).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::SameCurrency("USD".into()));

    let e = exchange::exchange(&conn, &session, "USD", "EUR", dec("0")).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::NonPositiveAmount(Decimal::ZERO));

    let e = exchange::exchange(&conn, &session, "USD", "EUR", dec("1.005")).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::TooPrecise(dec("1.005")));

    let e = exchange::exchange(&conn, &session, "USD", "XYZ", dec("1")).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::UnknownCurrency("XYZ".into()));

    let view = data::load(&conn, &session).unwrap();
    assert_eq!(view.transactions.len(), 2);
    assert_eq!(view.balance("USD"), dec("2450.75"));
}

#[test]
fn failure_mid_exchange_commits_nothing() {
    let (conn, session) = setup();
    // The debit leg is the second write; make it fail after the credit landed.
    conn.execute_batch(
        "CREATE TRIGGER no_usd_debit BEFORE UPDATE ON wallets
         WHEN NEW.currency_code = 'USD'
         BEGIN SELECT RAISE(ABORT, 'wallet locked'); END;",
    )
    .unwrap();

    assert!(exchange::exchange(&conn, &session, "USD", "EUR", dec("50")).is_err());

    let view = data::load(&conn, &session).unwrap();
    assert_eq!(view.balance("EUR"), dec("890.30"));
    assert_eq!(view.balance("USD"), dec("2450.75"));
    assert_eq!(view.transactions.len(), 2);
}

#[test]
fn exchange_into_unheld_currency_opens_wallet() {
    let (conn, session) = setup();
    let (q, view) = exchange::exchange(&conn, &session, "EUR", "CHF", dec("100")).unwrap();
    assert_eq!(view.balance("CHF"), q.converted);
    assert_eq!(view.balance("EUR"), dec("790.30"));
}

#[test]
fn huge_amounts_fail_cleanly() {
    let (conn, session) = setup();
    let huge = Decimal::MAX;

    let e = exchange::exchange(&conn, &session, "EUR", "USD", huge).unwrap_err();
    assert!(matches!(
        wallet_error(&e),
        WalletError::InsufficientBalance { currency, .. } if currency == "EUR"
    ));

    let view = data::load(&conn, &session).unwrap();
    let e = exchange::price(&view, "EUR", "USD", huge).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::AmountOutOfRange("converted amount"));

    let matches = cli::build_cli().get_matches_from([
        "roamwallet", "exchange", "quote", "--from", "EUR", "--to", "USD", "--amount",
        "79228162514264337593543950335",
    ]);
    let Some(("exchange", m)) = matches.subcommand() else {
        panic!("no exchange subcommand");
    };
    let e = commands::exchange::handle(&conn, &session, m).unwrap_err();
    assert_eq!(wallet_error(&e), &WalletError::AmountOutOfRange("converted amount"));

    assert_eq!(data::load(&conn, &session).unwrap().transactions.len(), 2);
}
