// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn hide_balances(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("hide_balances")
            .long("hide-balances")
            .action(ArgAction::SetTrue)
            .conflicts_with_all(["json", "jsonl"])
            .help("Mask amounts in table output"),
    )
}

fn required(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).required(true).help(help)
}

fn optional(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn card_id_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(required("id", "Card id"))
}

pub fn build_cli() -> Command {
    Command::new("roamwallet")
        .about("Multi-currency travel wallet: balances, exchange, transfers, budgets and cards")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database and currency catalog"))
        .subcommand(
            Command::new("auth")
                .about("Account and session")
                .subcommand(
                    Command::new("signup")
                        .about("Create an account (seeds starter wallets) and sign in")
                        .arg(required("email", "Email address"))
                        .arg(required("password", "Password"))
                        .arg(optional("name", "Full name")),
                )
                .subcommand(
                    Command::new("signin")
                        .about("Sign in")
                        .arg(required("email", "Email address"))
                        .arg(required("password", "Password")),
                )
                .subcommand(Command::new("signout").about("End the active session"))
                .subcommand(Command::new("whoami").about("Show the signed-in user")),
        )
        .subcommand(hide_balances(json_flags(
            Command::new("home").about("Total balance, top wallets and recent activity"),
        )))
        .subcommand(
            Command::new("wallets")
                .about("Wallet balances per currency")
                .subcommand(hide_balances(json_flags(
                    Command::new("list")
                        .about("List wallets with their value in the base currency")
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("balance")
                                .help("balance|name|code"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include currencies with a zero balance"),
                        ),
                ))),
        )
        .subcommand(
            Command::new("exchange")
                .about("Convert between your currency wallets")
                .subcommand(json_flags(
                    Command::new("quote")
                        .about("Show the rate and converted amount without exchanging")
                        .arg(required("from", "Source currency code"))
                        .arg(required("to", "Target currency code"))
                        .arg(required("amount", "Amount in the source currency")),
                ))
                .subcommand(json_flags(
                    Command::new("run")
                        .about("Exchange an amount from one wallet into another")
                        .arg(required("from", "Source currency code"))
                        .arg(required("to", "Target currency code"))
                        .arg(required("amount", "Amount in the source currency")),
                )),
        )
        .subcommand(
            Command::new("send")
                .about("Send money to a contact or a new recipient")
                .arg(optional("to", "Contact name or email, or new recipient name"))
                .arg(optional("email", "Recipient email (creates a contact)"))
                .arg(optional("amount", "Amount to send"))
                .arg(optional("currency", "Wallet to send from").default_value("USD"))
                .arg(optional("qr", "Scanned payment code (JSON or email)")),
        )
        .subcommand(
            Command::new("budget")
                .about("Travel budgets")
                .subcommand(
                    Command::new("create")
                        .about("Create a travel budget with optional category budgets")
                        .arg(required("destination", "Where you are going"))
                        .arg(required("total", "Total budget"))
                        .arg(optional("currency", "Budget currency").default_value("USD"))
                        .arg(required("start", "Start date YYYY-MM-DD"))
                        .arg(required("end", "End date YYYY-MM-DD"))
                        .arg(optional("accommodation", "Accommodation budget"))
                        .arg(optional("food", "Food budget"))
                        .arg(optional("transport", "Transport budget"))
                        .arg(optional("activities", "Activities budget"))
                        .arg(optional("shopping", "Shopping budget")),
                )
                .subcommand(json_flags(Command::new("list").about("List travel budgets")))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Spending progress of one budget")
                        .arg(required("destination", "Destination or budget id")),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Transaction history")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("all")
                                .help("all|exchange|send|receive|spend|transfer"),
                        )
                        .arg(optional("query", "Search description and location"))
                        .arg(optional("month", "YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction and apply it to the wallet")
                        .arg(required("type", "exchange|send|receive|spend|transfer"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true)
                                .help("Signed amount; negative for money leaving the wallet"),
                        )
                        .arg(required("currency", "Currency code"))
                        .arg(required("description", "Description"))
                        .arg(optional("location", "Where it happened"))
                        .arg(optional("category", "Spending category"))
                        .arg(optional("recipient", "Counterparty"))
                        .arg(optional("status", "completed|pending|failed").default_value("completed")),
                ),
        )
        .subcommand(
            Command::new("cards")
                .about("Payment cards")
                .subcommand(json_flags(Command::new("list").about("List cards")))
                .subcommand(
                    card_id_cmd("status", "Set a card's status")
                        .arg(required("status", "active|frozen|blocked")),
                )
                .subcommand(card_id_cmd("freeze", "Freeze a card"))
                .subcommand(card_id_cmd("unfreeze", "Unfreeze a card"))
                .subcommand(card_id_cmd("block", "Block a card")),
        )
        .subcommand(
            Command::new("contacts")
                .about("People you send money to")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List contacts")
                        .arg(optional("query", "Filter by name or email")),
                ))
                .subcommand(
                    Command::new("add")
                        .about("Add a contact")
                        .arg(required("name", "Full name"))
                        .arg(required("email", "Email address")),
                ),
        )
        .subcommand(
            Command::new("rates")
                .about("Currency catalog and exchange rates")
                .subcommand(json_flags(Command::new("list").about("List currencies and rates")))
                .subcommand(
                    Command::new("set")
                        .about("Set one currency's rate (value of one unit in the base currency)")
                        .arg(required("code", "Currency code"))
                        .arg(required("rate", "Rate, > 0")),
                )
                .subcommand(
                    Command::new("activate")
                        .about("Offer a currency again")
                        .arg(required("code", "Currency code")),
                )
                .subcommand(
                    Command::new("deactivate")
                        .about("Stop offering a currency (existing wallets are kept)")
                        .arg(required("code", "Currency code")),
                )
                .subcommand(
                    Command::new("refresh").about("Fetch latest rates via Frankfurter (ECB)"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export your ledger")
                .subcommand(
                    Command::new("transactions")
                        .about("Write all transactions to a file")
                        .arg(optional("format", "csv|json").default_value("csv"))
                        .arg(required("out", "Output path")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}
