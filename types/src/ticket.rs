use crate::{Sc, TicketKind};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// The concealed value of a single slot.
///
/// Wire and storage format: the literal string `"LOSS"` for a losing slot,
/// or the prize amount in cents for the (at most one) winning slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotValue {
    Loss,
    Prize(Sc),
}

impl SlotValue {
    pub fn prize(&self) -> Option<Sc> {
        match self {
            Self::Loss => None,
            Self::Prize(amount) => Some(*amount),
        }
    }
}

impl Serialize for SlotValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Loss => serializer.serialize_str("LOSS"),
            Self::Prize(amount) => serializer.serialize_u64(amount.cents()),
        }
    }
}

impl<'de> Deserialize<'de> for SlotValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Sentinel(String),
            Cents(u64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Sentinel(text) if text == "LOSS" => Ok(Self::Loss),
            Raw::Sentinel(text) => Err(de::Error::custom(format!("invalid slot value: {text}"))),
            Raw::Cents(cents) => Ok(Self::Prize(Sc::from_cents(cents))),
        }
    }
}

/// One concealed cell on a ticket.
///
/// The index is the slot's position in the ticket's slot vector. `revealed`
/// is monotonic: once set it is never unset, and re-reveals are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub value: SlotValue,
    pub revealed: bool,
}

impl Slot {
    pub fn concealed(value: SlotValue) -> Self {
        Self {
            value,
            revealed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Expired,
    Claimed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Claimed => "claimed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Unclaimed,
    Claimed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unclaimed => "unclaimed",
            Self::Claimed => "claimed",
        }
    }
}

/// A purchased instant-win ticket.
///
/// Tickets are append-only financial records: they are created at purchase,
/// mutated only by reveal (slot flags) and claim (claim status), and never
/// deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub ticket_number: String,
    pub kind: TicketKind,
    pub design_id: i64,
    pub player_id: i64,
    pub slots: Vec<Slot>,
    pub status: TicketStatus,
    pub claim_status: ClaimStatus,
    pub created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<u64>,
}

impl Ticket {
    /// The winning slot, if any, as `(index, prize)`.
    ///
    /// Generation guarantees at most one slot carries a prize; this scans the
    /// server-held state and never trusts a client-reported amount.
    pub fn winning_slot(&self) -> Option<(usize, Sc)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(index, slot)| slot.value.prize().map(|prize| (index, prize)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_with_slots(slots: Vec<Slot>) -> Ticket {
        Ticket {
            id: 1,
            ticket_number: "17B9A3C2D4E01".to_string(),
            kind: TicketKind::PullTab,
            design_id: 1,
            player_id: 7,
            slots,
            status: TicketStatus::Active,
            claim_status: ClaimStatus::Unclaimed,
            created_at: 1_700_000_000,
            claimed_at: None,
        }
    }

    #[test]
    fn slot_value_wire_format() {
        let encoded = serde_json::to_string(&SlotValue::Loss).unwrap();
        assert_eq!(encoded, "\"LOSS\"");
        let encoded = serde_json::to_string(&SlotValue::Prize(Sc::from_cents(350))).unwrap();
        assert_eq!(encoded, "350");

        let decoded: SlotValue = serde_json::from_str("\"LOSS\"").unwrap();
        assert_eq!(decoded, SlotValue::Loss);
        let decoded: SlotValue = serde_json::from_str("350").unwrap();
        assert_eq!(decoded, SlotValue::Prize(Sc::from_cents(350)));
        assert!(serde_json::from_str::<SlotValue>("\"WIN\"").is_err());
    }

    #[test]
    fn winning_slot_finds_single_prize() {
        let ticket = ticket_with_slots(vec![
            Slot::concealed(SlotValue::Loss),
            Slot::concealed(SlotValue::Prize(Sc::from_cents(350))),
            Slot::concealed(SlotValue::Loss),
        ]);
        assert_eq!(ticket.winning_slot(), Some((1, Sc::from_cents(350))));
    }

    #[test]
    fn winning_slot_none_on_losing_ticket() {
        let ticket = ticket_with_slots(vec![
            Slot::concealed(SlotValue::Loss),
            Slot::concealed(SlotValue::Loss),
        ]);
        assert_eq!(ticket.winning_slot(), None);
    }
}
