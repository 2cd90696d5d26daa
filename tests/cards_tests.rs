// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use roamwallet::error::WalletError;
use roamwallet::models::{CardStatus, Session};
use roamwallet::{auth, cli, commands, data, db};
use rusqlite::Connection;

fn setup() -> (Connection, Session, String) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = auth::sign_up(&conn, "cards@example.com", "pw", None).unwrap();
    let card_id = data::load(&conn, &session).unwrap().cards[0].id.clone();
    (conn, session, card_id)
}

fn run(conn: &Connection, session: &Session, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["roamwallet", "cards"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("cards", m)) = matches.subcommand() else {
        panic!("no cards subcommand");
    };
    commands::cards::handle(conn, session, m)
}

#[test]
fn freeze_and_unfreeze_touch_only_status() {
    let (conn, session, id) = setup();
    let before = data::load(&conn, &session).unwrap();
    let original = before.card(&id).unwrap().clone();

    run(&conn, &session, &["freeze", "--id", id.as_str()]).unwrap();
    let frozen = data::load(&conn, &session).unwrap().card(&id).unwrap().clone();
    assert_eq!(frozen.status, CardStatus::Frozen);
    assert_eq!(frozen.number, original.number);
    assert_eq!(frozen.expiry_date, original.expiry_date);
    assert_eq!(frozen.spending_limit, original.spending_limit);
    assert_eq!(frozen.current_spending, original.current_spending);

    run(&conn, &session, &["unfreeze", "--id", id.as_str()]).unwrap();
    let view = data::load(&conn, &session).unwrap();
    assert_eq!(view.card(&id).unwrap().status, CardStatus::Active);
    assert_eq!(view.transactions.len(), before.transactions.len());
}

#[test]
fn any_state_reaches_any_state() {
    let (conn, session, id) = setup();
    for (target, expect) in [
        ("blocked", CardStatus::Blocked),
        ("active", CardStatus::Active),
        ("blocked", CardStatus::Blocked),
        ("frozen", CardStatus::Frozen),
    ] {
        run(&conn, &session, &["status", "--id", id.as_str(), "--status", target]).unwrap();
        assert_eq!(data::load(&conn, &session).unwrap().card(&id).unwrap().status, expect);
    }
    run(&conn, &session, &["block", "--id", id.as_str()]).unwrap();
    assert_eq!(
        data::load(&conn, &session).unwrap().card(&id).unwrap().status,
        CardStatus::Blocked
    );
}

#[test]
fn unknown_card_or_status() {
    let (conn, session, id) = setup();
    let e = run(&conn, &session, &["freeze", "--id", "nope"]).unwrap_err();
    assert_eq!(
        e.downcast_ref::<WalletError>(),
        Some(&WalletError::NotFound {
            kind: "Card",
            id: "nope".into()
        })
    );
    assert!(run(&conn, &session, &["status", "--id", id.as_str(), "--status", "melted"]).is_err());
    assert_eq!(
        data::load(&conn, &session).unwrap().card(&id).unwrap().status,
        CardStatus::Active
    );
}
