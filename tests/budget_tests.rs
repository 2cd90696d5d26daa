// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use roamwallet::budget::{self, UsageBand};
use roamwallet::error::WalletError;
use roamwallet::models::{BudgetCategoryKind, Session};
use roamwallet::{auth, cli, commands, data, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> (Connection, Session) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = auth::sign_up(&conn, "planner@example.com", "pw", None).unwrap();
    (conn, session)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn run(conn: &Connection, session: &Session, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["roamwallet", "budget"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("budget", m)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    commands::budget::handle(conn, session, m)
}

#[test]
fn create_keeps_only_positive_categories() {
    let (conn, session) = setup();
    run(
        &conn,
        &session,
        &[
            "create", "--destination", "Tokyo", "--total", "2000", "--currency", "JPY",
            "--start", "2025-03-01", "--end", "2025-03-10", "--food", "500",
            "--shopping", "0",
        ],
    )
    .unwrap();

    let usages = commands::budget::usages(&conn, &session).unwrap();
    assert_eq!(usages.len(), 1);
    let b = &usages[0];
    assert_eq!(b.destination, "Tokyo");
    assert_eq!(b.currency, "JPY");
    assert_eq!(b.total_budget, dec("2000"));
    assert_eq!(b.spent, Decimal::ZERO);
    assert_eq!(b.categories.len(), 1);
    assert_eq!(b.categories[0].category, BudgetCategoryKind::Food);
    assert_eq!(b.categories[0].budget, dec("500"));
    assert_eq!(b.categories[0].spent, Decimal::ZERO);
    assert_eq!(b.band, UsageBand::Healthy);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM budget_categories", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn create_rejects_bad_input_without_writing() {
    let (conn, session) = setup();
    let e = run(
        &conn,
        &session,
        &[
            "create", "--destination", "Lisbon", "--total", "900", "--start", "2025-05-10",
            "--end", "2025-05-01",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::InvalidDateRange { .. })
    ));

    let e = run(
        &conn,
        &session,
        &[
            "create", "--destination", "Lisbon", "--total", "0", "--start", "2025-05-01",
            "--end", "2025-05-10",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::NonPositiveAmount(_))
    ));

    let e = budget::new_budget(
        "   ",
        dec("10"),
        "USD",
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        &[],
    )
    .unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::MissingField("destination")));

    assert!(data::load(&conn, &session).unwrap().budgets.is_empty());
}

#[test]
fn usage_reflects_recorded_spending() {
    let (conn, session) = setup();
    run(
        &conn,
        &session,
        &[
            "create", "--destination", "Paris", "--total", "1000", "--currency", "EUR",
            "--start", "2025-06-01", "--end", "2025-06-07", "--food", "200",
            "--accommodation", "600",
        ],
    )
    .unwrap();
    let id = data::load(&conn, &session).unwrap().budgets[0].id.clone();
    conn.execute(
        "UPDATE travel_budgets SET spent='800' WHERE id=?1",
        params![id],
    )
    .unwrap();
    conn.execute(
        "UPDATE budget_categories SET spent='190' WHERE budget_id=?1 AND category='food'",
        params![id],
    )
    .unwrap();

    let b = &commands::budget::usages(&conn, &session).unwrap()[0];
    assert_eq!(b.percentage, dec("80"));
    assert_eq!(b.remaining, dec("200"));
    assert_eq!(b.band, UsageBand::Warning);
    assert!(b.band.alert().unwrap().contains("75%"));

    let food = b
        .categories
        .iter()
        .find(|c| c.category == BudgetCategoryKind::Food)
        .unwrap();
    assert_eq!(food.percentage, dec("95"));
    assert_eq!(food.band, UsageBand::Critical);
    let stay = b
        .categories
        .iter()
        .find(|c| c.category == BudgetCategoryKind::Accommodation)
        .unwrap();
    assert_eq!(stay.percentage, Decimal::ZERO);

    run(&conn, &session, &["show", "--destination", "paris"]).unwrap();
    let e = run(&conn, &session, &["show", "--destination", "Rome"]).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<WalletError>(),
        Some(WalletError::NotFound { kind: "Budget", .. })
    ));
}

#[test]
fn bands_and_percentages() {
    assert_eq!(budget::percentage_used(dec("5"), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(budget::percentage_used(dec("50"), dec("200")), dec("25"));
    assert_eq!(UsageBand::from_percentage(dec("49.99")), UsageBand::Healthy);
    assert_eq!(UsageBand::from_percentage(dec("50")), UsageBand::Moderate);
    assert_eq!(UsageBand::from_percentage(dec("75")), UsageBand::Warning);
    assert_eq!(UsageBand::from_percentage(dec("90")), UsageBand::Critical);
    assert_eq!(UsageBand::from_percentage(dec("130")), UsageBand::Critical);
    assert!(UsageBand::Moderate.alert().is_none());
    assert_eq!(budget::percentage_used(Decimal::MAX, dec("0.01")), Decimal::MAX);
}

#[test]
fn create_rejects_currency_outside_catalog() {
    let (conn, session) = setup();
    let e = run(
        &conn,
        &session,
        &[
            "create", "--destination", "Atlantis", "--total", "100", "--currency", "xyz",
            "--start", "2025-07-01", "--end", "2025-07-02",
        ],
    )
    .unwrap_err();
    assert_eq!(e.downcast_ref::<WalletError>(), Some(&WalletError::UnknownCurrency("XYZ".into())));
    assert!(data::load(&conn, &session).unwrap().budgets.is_empty());
}
