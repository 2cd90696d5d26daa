// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::data;
use crate::models::{NewContact, Session};
use crate::transfer::search_contacts;
use crate::utils::{initials, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let email = sub.get_one::<String>("email").unwrap().trim().to_string();
            let contact = NewContact {
                avatar: Some(initials(&name)),
                name,
                email,
            };
            data::add_contact(conn, session, &contact)?;
            println!("Contact added: {} <{}>", contact.name, contact.email);
        }
        Some(("list", sub)) => {
            let view = data::load(conn, session)?;
            let found = match sub.get_one::<String>("query") {
                Some(q) => search_contacts(&view.contacts, q),
                None => view.contacts.iter().collect(),
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &found)? {
                let rows = found
                    .iter()
                    .map(|c| {
                        vec![
                            c.avatar.clone().unwrap_or_default(),
                            c.name.clone(),
                            c.email.clone(),
                            c.last_transaction_date.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "Name", "Email", "Last transfer"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
