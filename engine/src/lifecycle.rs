//! Lifecycle rules for purchase, reveal, and claim.
//!
//! These functions encode the state-transition checks; they mutate in-memory
//! ticket state only. The server applies them inside a storage transaction
//! so a failed check (or any later step) rolls the whole operation back.

use instawin_types::{
    ClaimStatus, PlatformLimits, Sc, Slot, Ticket, TicketDesign, TicketError, TicketStatus,
};

/// Purchase preconditions.
///
/// A disabled design is reported as `DesignNotFound` so the catalog's
/// enabled-set is the only surface players can observe. The cost bounds are
/// re-checked here even though the admin surface validates them at design
/// creation time.
pub fn validate_purchase(
    design: &TicketDesign,
    limits: &PlatformLimits,
    balance: Sc,
) -> Result<(), TicketError> {
    if !design.enabled {
        return Err(TicketError::DesignNotFound);
    }
    if !limits.allows_bet(design.cost) {
        return Err(TicketError::InvalidDesignConfiguration);
    }
    if design.slot_count == 0 || design.prize_min > design.prize_max {
        return Err(TicketError::InvalidDesignConfiguration);
    }
    if balance < design.cost {
        return Err(TicketError::InsufficientFunds);
    }
    Ok(())
}

/// Outcome of revealing one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub slot_index: u32,
    pub slot: Slot,
    /// Informational only; revealing never credits a balance.
    pub prize: Option<Sc>,
}

/// Reveal one slot of an active, unclaimed ticket.
///
/// The `revealed` flag is monotonic: a second reveal of the same index fails
/// with `SlotAlreadyRevealed` and leaves the slot untouched.
pub fn reveal_slot(ticket: &mut Ticket, index: u32) -> Result<RevealOutcome, TicketError> {
    if ticket.claim_status == ClaimStatus::Claimed {
        return Err(TicketError::AlreadyClaimed);
    }
    if ticket.status != TicketStatus::Active {
        return Err(TicketError::TicketInactive);
    }
    let slot = ticket
        .slots
        .get_mut(index as usize)
        .ok_or(TicketError::InvalidSlotIndex)?;
    if slot.revealed {
        return Err(TicketError::SlotAlreadyRevealed);
    }
    slot.revealed = true;

    Ok(RevealOutcome {
        slot_index: index,
        slot: *slot,
        prize: slot.value.prize(),
    })
}

/// Resolve the claimable prize from server-held ticket state.
///
/// Scans the stored slots for the at-most-one winner and re-applies the
/// platform payout cap; client-reported amounts are never consulted.
pub fn resolve_claim(
    ticket: &Ticket,
    limits: &PlatformLimits,
) -> Result<(u32, Sc), TicketError> {
    if ticket.claim_status == ClaimStatus::Claimed {
        return Err(TicketError::AlreadyClaimed);
    }
    let (index, prize) = ticket.winning_slot().ok_or(TicketError::NoPrize)?;
    Ok((index as u32, limits.cap_win(prize)))
}
