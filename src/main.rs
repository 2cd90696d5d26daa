// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use roamwallet::{auth, cli, commands, config::Config, db, logging};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    let matches = cli::build_cli().get_matches();
    let conn = db::open_or_init(&config.db_path)?;

    if let Err(e) = run(&conn, &config, &matches) {
        tracing::error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}

fn run(conn: &Connection, config: &Config, matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
            return Ok(());
        }
        Some(("auth", sub)) => return commands::auth::handle(conn, sub),
        Some(("rates", sub)) => return commands::rates::handle(conn, sub),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let session = auth::require_session(conn)?;
    match matches.subcommand() {
        Some(("home", sub)) => commands::home::handle(conn, &session, sub)?,
        Some(("wallets", sub)) => commands::wallets::handle(conn, &session, sub)?,
        Some(("exchange", sub)) => commands::exchange::handle(conn, &session, sub)?,
        Some(("send", sub)) => commands::send::handle(conn, &session, sub)?,
        Some(("budget", sub)) => commands::budget::handle(conn, &session, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(conn, &session, sub)?,
        Some(("cards", sub)) => commands::cards::handle(conn, &session, sub)?,
        Some(("contacts", sub)) => commands::contacts::handle(conn, &session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(conn, &session, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(conn, &session)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
