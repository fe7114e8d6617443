use crate::Sc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a balance-affecting ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Purchase,
    Claim,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Claim => "claim",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "claim" => Ok(Self::Claim),
            other => Err(format!("unknown ledger entry kind: {other}")),
        }
    }
}

/// One row of the append-only financial audit trail.
///
/// `balance_before` and `balance_after` are captured inside the same
/// transaction that applies the mutation, so for every entry
/// `balance_after == balance_before ± amount` holds exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: i64,
    pub player_id: i64,
    pub ticket_id: i64,
    pub entry: EntryKind,
    pub amount: Sc,
    pub balance_before: Sc,
    pub balance_after: Sc,
    pub description: String,
    pub created_at: u64,
}
