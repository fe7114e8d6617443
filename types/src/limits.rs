use crate::Sc;
use serde::{Deserialize, Serialize};

/// Minimum ticket cost in SC.
pub const MIN_BET_SC: Sc = Sc::from_cents(1);

/// Maximum ticket cost in SC.
pub const MAX_BET_SC: Sc = Sc::from_cents(10_000);

/// Maximum single-ticket payout in SC, applied regardless of design
/// configuration.
pub const MAX_WIN_SC: Sc = Sc::from_cents(100_000);

/// Default per-design win probability. Deployments override this explicitly;
/// it is never hardcoded at a call site.
pub const DEFAULT_WIN_PROBABILITY: f64 = 1.0 / 7.0;

/// Platform-wide bet and payout bounds.
///
/// Loaded once at startup and injected into every ticket operation, so tests
/// can tighten or loosen the bounds without touching global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLimits {
    pub min_bet: Sc,
    pub max_bet: Sc,
    pub max_win: Sc,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self {
            min_bet: MIN_BET_SC,
            max_bet: MAX_BET_SC,
            max_win: MAX_WIN_SC,
        }
    }
}

impl PlatformLimits {
    /// Whether a ticket cost falls inside the allowed bet range.
    pub fn allows_bet(&self, cost: Sc) -> bool {
        cost >= self.min_bet && cost <= self.max_bet
    }

    /// Clamp a prize to the platform payout cap.
    pub fn cap_win(&self, prize: Sc) -> Sc {
        prize.min(self.max_win)
    }
}
