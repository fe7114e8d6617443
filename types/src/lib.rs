//! Common types for the instawin instant-win ticket platform.
//!
//! This crate defines the domain model shared by the engine and the server:
//! currency, platform limits, ticket designs, tickets and their slots, the
//! financial ledger, the error taxonomy, and the JSON API payloads.
//!
//! Nothing in here performs I/O; all persistence and transport concerns live
//! in `instawin-server`.

pub mod api;
mod currency;
mod design;
mod error;
mod ledger;
mod limits;
mod ticket;

pub use currency::Sc;
pub use design::{TicketDesign, TicketKind};
pub use error::TicketError;
pub use ledger::{EntryKind, LedgerEntry};
pub use limits::{
    PlatformLimits, DEFAULT_WIN_PROBABILITY, MAX_BET_SC, MAX_WIN_SC, MIN_BET_SC,
};
pub use ticket::{ClaimStatus, Slot, SlotValue, Ticket, TicketStatus};
