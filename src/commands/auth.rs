// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let name = sub.get_one::<String>("name").map(|s| s.trim());
            let session = auth::sign_up(conn, email, password, name)?;
            auth::remember(conn, &session)?;
            println!("Account created; signed in as {}", session.email);
        }
        Some(("signin", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let session = auth::sign_in(conn, email, password)?;
            auth::remember(conn, &session)?;
            println!("Signed in as {}", session.email);
        }
        Some(("signout", _)) => {
            if let Some(session) = auth::current_session(conn)? {
                auth::sign_out(conn, &session)?;
            }
            auth::forget(conn)?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match auth::current_session(conn)? {
            Some(session) => println!("{} ({})", session.email, session.user_id),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
