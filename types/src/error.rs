use thiserror::Error;

/// Errors surfaced by ticket operations.
///
/// Every variant maps to a stable wire code so clients can branch on
/// `code` instead of parsing messages. Validation and state-conflict errors
/// are rejected before any mutation; `Storage` means the transaction was
/// rolled back and the operation is safe to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    #[error("design not found")]
    DesignNotFound,

    #[error("design configuration is invalid")]
    InvalidDesignConfiguration,

    #[error("insufficient sweeps coin balance")]
    InsufficientFunds,

    #[error("ticket not found")]
    TicketNotFound,

    #[error("ticket is not active")]
    TicketInactive,

    #[error("ticket already claimed")]
    AlreadyClaimed,

    #[error("slot index out of range")]
    InvalidSlotIndex,

    #[error("slot already revealed")]
    SlotAlreadyRevealed,

    #[error("ticket has no prize to claim")]
    NoPrize,

    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl TicketError {
    /// Wrap a storage-layer failure, preserving the message only.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Stable machine-readable code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DesignNotFound => "design_not_found",
            Self::InvalidDesignConfiguration => "invalid_design_configuration",
            Self::InsufficientFunds => "insufficient_funds",
            Self::TicketNotFound => "ticket_not_found",
            Self::TicketInactive => "ticket_inactive",
            Self::AlreadyClaimed => "already_claimed",
            Self::InvalidSlotIndex => "invalid_slot_index",
            Self::SlotAlreadyRevealed => "slot_already_revealed",
            Self::NoPrize => "no_prize",
            Self::Unauthorized => "unauthorized",
            Self::Storage(_) => "storage_failure",
        }
    }

    /// Whether the caller should refresh state before retrying, as opposed
    /// to correcting the request (validation) or retrying as-is (storage).
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds
                | Self::TicketInactive
                | Self::AlreadyClaimed
                | Self::SlotAlreadyRevealed
                | Self::NoPrize
        )
    }
}
