// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use roamwallet::commands::send::{self, SendRequest};
use roamwallet::error::WalletError;
use roamwallet::models::{Session, TxType};
use roamwallet::scanner::{ScanPayload, parse_scan};
use roamwallet::{auth, cli, data, db, transfer};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> (Connection, Session) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = auth::sign_up(&conn, "sender@example.com", "pw", None).unwrap();
    (conn, session)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn send_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["roamwallet", "send"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    match matches.subcommand() {
        Some(("send", m)) => m.clone(),
        _ => panic!("no send subcommand"),
    }
}

#[test]
fn send_to_existing_contact() {
    let (conn, session) = setup();
    let m = send_matches(&["--to", "sarah johnson", "--amount", "50"]);
    send::handle(&conn, &session, &m).unwrap();

    let view = data::load(&conn, &session).unwrap();
    assert_eq!(view.balance("USD"), dec("2400.75"));
    assert_eq!(view.contacts.len(), 2);

    let t = &view.transactions[0];
    assert_eq!(t.tx_type, TxType::Send);
    assert_eq!(t.amount, dec("-50"));
    assert_eq!(t.currency, "USD");
    assert_eq!(t.description, "Transfer to Sarah Johnson");
    assert_eq!(t.recipient.as_deref(), Some("Sarah Johnson"));

    let sarah = view.contacts.iter().find(|c| c.name == "Sarah Johnson").unwrap();
    assert!(sarah.last_transaction_date.is_some());
    // No reciprocal credit anywhere.
    assert_eq!(view.transactions.len(), 3);
}

#[test]
fn new_recipient_with_email_becomes_contact() {
    let (conn, session) = setup();
    let view = data::load(&conn, &session).unwrap();
    let t = transfer::prepare(
        &view,
        Some("Ana Lima"),
        Some("ana@example.com"),
        "EUR",
        dec("20.50"),
    )
    .unwrap();
    assert!(t.contact_id.is_none());
    let view = transfer::execute(&conn, &session, &t).unwrap();

    assert_eq!(view.balance("EUR"), dec("869.80"));
    let ana = view
        .contacts
        .iter()
        .find(|c| c.email == "ana@example.com")
        .expect("contact created");
    assert_eq!(ana.name, "Ana Lima");
    assert_eq!(ana.avatar.as_deref(), Some("AL"));
    assert!(ana.last_transaction_date.is_some());
}

#[test]
fn new_recipient_without_email_is_not_saved() {
    let (conn, session) = setup();
    let view = data::load(&conn, &session).unwrap();
    let t = transfer::prepare(&view, Some("Street Vendor"), None, "USD", dec("5")).unwrap();
    let view = transfer::execute(&conn, &session, &t).unwrap();
    assert_eq!(view.contacts.len(), 2);
    assert_eq!(view.transactions[0].recipient.as_deref(), Some("Street Vendor"));
}

#[test]
fn send_validation() {
    let (conn, session) = setup();
    let view = data::load(&conn, &session).unwrap();

    let e = transfer::prepare(&view, None, None, "USD", dec("5")).unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::MissingField("recipient")));

    let e = transfer::prepare(&view, Some("Mike Chen"), None, "GBP", dec("500")).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::InsufficientBalance { .. })
    ));

    let e = transfer::prepare(&view, Some("Mike Chen"), None, "USD", dec("-1")).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::NonPositiveAmount(_))
    ));

    let m = send_matches(&["--to", "Mike Chen"]);
    let e = send::handle(&conn, &session, &m).unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::MissingField("amount")));

    assert_eq!(data::load(&conn, &session).unwrap().transactions.len(), 2);
}

#[test]
fn scanned_code_fills_request_but_flags_win() {
    let qr = r#"{"name":"Ana Lima","email":"ana@example.com","amount":12.5,"currency":"eur"}"#;

    let req = send::request_from_args(&send_matches(&["--qr", qr])).unwrap();
    assert_eq!(
        req,
        SendRequest {
            to: Some("Ana Lima".into()),
            email: Some("ana@example.com".into()),
            amount: Some(dec("12.5")),
            currency: Some("EUR".into()),
        }
    );

    let req = send::request_from_args(&send_matches(&[
        "--qr", qr, "--amount", "3", "--currency", "GBP",
    ]))
    .unwrap();
    assert_eq!(req.amount, Some(dec("3")));
    assert_eq!(req.currency.as_deref(), Some("GBP"));

    let e = send::request_from_args(&send_matches(&["--qr", "not a code"])).unwrap_err();
    assert!(e.to_string().contains("Unrecognized payment code"));
}

#[test]
fn parse_scan_variants() {
    assert_eq!(
        parse_scan(r#"{"name":"Bo","email":"bo@x.io","amount":"7.25"}"#),
        ScanPayload::Payment {
            name: "Bo".into(),
            email: "bo@x.io".into(),
            amount: Some(dec("7.25")),
            currency: None,
        }
    );
    assert_eq!(
        parse_scan("  pay@me.example  "),
        ScanPayload::Email("pay@me.example".into())
    );
    assert_eq!(parse_scan(r#"{"name":"Bo"}"#), ScanPayload::Unrecognized);
    assert_eq!(parse_scan(r#"{"name":"","email":"bo@x.io"}"#), ScanPayload::Unrecognized);
    assert_eq!(parse_scan("hello world"), ScanPayload::Unrecognized);
    assert_eq!(parse_scan("@"), ScanPayload::Unrecognized);
    assert_eq!(parse_scan(""), ScanPayload::Unrecognized);
}
