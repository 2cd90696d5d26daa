// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lower-case wire names shared by the database CHECK constraints, the CLI
/// and JSON output.
macro_rules! wire_enum {
    ($name:ident, $what:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> anyhow::Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(anyhow!("Invalid {} '{}'", $what, other)),
                }
            }
        }
    };
}

wire_enum!(TxType, "transaction type" {
    Exchange => "exchange",
    Send => "send",
    Receive => "receive",
    Spend => "spend",
    Transfer => "transfer",
});

wire_enum!(TxStatus, "transaction status" {
    Completed => "completed",
    Pending => "pending",
    Failed => "failed",
});

wire_enum!(CardType, "card type" {
    Physical => "physical",
    Virtual => "virtual",
});

wire_enum!(CardStatus, "card status" {
    Active => "active",
    Frozen => "frozen",
    Blocked => "blocked",
});

wire_enum!(BudgetCategoryKind, "budget category" {
    Accommodation => "accommodation",
    Food => "food",
    Transport => "transport",
    Activities => "activities",
    Shopping => "shopping",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub flag: String,
    pub rate: Decimal, // value of one unit in base currency
    pub is_active: bool,
    pub balance: Decimal, // joined from wallets, zero when absent
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub currency_code: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub location: Option<String>,
    pub status: TxStatus,
    pub recipient: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub location: Option<String>,
    pub status: TxStatus,
    pub recipient: Option<String>,
    pub category: Option<String>,
}

impl NewTransaction {
    pub fn completed(tx_type: TxType, amount: Decimal, currency: &str, description: &str) -> Self {
        Self {
            tx_type,
            amount,
            currency: currency.to_string(),
            description: description.to_string(),
            location: None,
            status: TxStatus::Completed,
            recipient: None,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub budget: Decimal,
    pub spent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelBudget {
    pub id: String,
    pub destination: String,
    pub total_budget: Decimal,
    pub spent: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub categories: BTreeMap<BudgetCategoryKind, CategoryBucket>,
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub destination: String,
    pub total_budget: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Only categories with a positive budget are kept.
    pub categories: Vec<(BudgetCategoryKind, Decimal)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub last_transaction_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub last_four: String,
    pub number: String, // masked, e.g. **** **** **** 4521
    pub expiry_date: String,
    pub status: CardStatus,
    pub spending_limit: Decimal,
    pub current_spending: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub card_type: CardType,
    pub last_four: String,
    pub expiry_date: String,
    pub status: CardStatus,
    pub spending_limit: Decimal,
    pub current_spending: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
}
