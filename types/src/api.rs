//! JSON payloads for the HTTP surface.
//!
//! Successful responses use the `{success: true, data: ...}` envelope
//! (purchase additionally exposes the ticket under `ticket` for older
//! clients); failures use `{success: false, error, code}`.

use crate::{Sc, Slot, TicketError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub player_id: i64,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub design_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    pub ticket_id: i64,
    /// Pull-tab clients send `tabIndex`; scratch clients send `slotIndex`.
    #[serde(alias = "slotIndex")]
    pub tab_index: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub ticket_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub slot_index: u32,
    pub slot: Slot,
    /// Informational only: revealing never credits a balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<Sc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub prize_amount: Sc,
    pub winning_slot_index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub gold_coins: Sc,
    pub sweeps_coins: Sc,
}

/// Pushed to connected clients after any balance mutation commits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    pub player_id: i64,
    pub gold_coins: Sc,
    pub sweeps_coins: Sc,
}

/// Handed to the notification sink after a purchase commits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub player_id: i64,
    pub ticket_id: i64,
    pub ticket_number: String,
    pub design_name: String,
    pub cost: Sc,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignRequest {
    pub kind: crate::TicketKind,
    pub name: String,
    pub cost: Sc,
    pub slot_count: u32,
    #[serde(default)]
    pub win_probability: Option<f64>,
    pub prize_min: Sc,
    pub prize_max: Sc,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDesignEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

impl ApiFailure {
    pub fn from_error(err: &TicketError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            code: err.code(),
        }
    }
}
