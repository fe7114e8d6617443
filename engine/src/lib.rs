//! Instant-win ticket engine.
//!
//! This crate contains the pure game logic behind pull tabs and scratch
//! tickets: prize-slot generation, ticket numbering, and the lifecycle rules
//! for purchase, reveal, and claim.
//!
//! ## Trust requirements
//! - All randomness comes from [`TicketRng`]; client-supplied seeds, prize
//!   values, or win flags are never accepted.
//! - Prize amounts are decided once at generation time and re-derived from
//!   stored ticket state at claim time; nothing on the wire can change them.
//! - Functions here perform no I/O. Persistence and transaction boundaries
//!   are the server's responsibility; the server calls into this crate from
//!   inside its storage transactions.

mod generator;
mod lifecycle;
mod rng;

pub use generator::{generate_slots, ticket_number};
pub use lifecycle::{resolve_claim, reveal_slot, validate_purchase, RevealOutcome};
pub use rng::TicketRng;
