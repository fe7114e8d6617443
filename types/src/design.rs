use crate::Sc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two instant-win ticket families.
///
/// Pull tabs and scratch tickets share one engine and one data model; the
/// kind only selects the catalog family and the API path the ticket is
/// served under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    PullTab,
    Scratch,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PullTab => "pull_tab",
            Self::Scratch => "scratch",
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pull_tab" => Ok(Self::PullTab),
            "scratch" => Ok(Self::Scratch),
            other => Err(format!("unknown ticket kind: {other}")),
        }
    }
}

/// An admin-configured ticket template.
///
/// Designs are instantiated into individual tickets at purchase time. The
/// engine re-validates `cost` against the platform bet bounds on every
/// purchase even though the admin surface validates it at creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDesign {
    pub id: i64,
    pub kind: TicketKind,
    pub name: String,
    pub cost: Sc,
    pub slot_count: u32,
    pub win_probability: f64,
    pub prize_min: Sc,
    pub prize_max: Sc,
    pub enabled: bool,
}
