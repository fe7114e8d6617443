use rand::distributions::{Bernoulli, Distribution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Randomness source for ticket generation.
///
/// Wraps a ChaCha20 stream cipher RNG seeded from OS entropy in production.
/// Deterministic seeding exists only so tests can pin outcomes; nothing
/// derived from a request ever feeds the seed.
pub struct TicketRng(ChaCha20Rng);

impl TicketRng {
    pub fn from_entropy() -> Self {
        Self(ChaCha20Rng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha20Rng::seed_from_u64(seed))
    }

    /// Single Bernoulli trial. Probabilities outside `[0, 1]` are clamped
    /// rather than rejected: a misconfigured design degrades to always-lose
    /// or always-win instead of aborting purchases.
    pub fn win_trial(&mut self, probability: f64) -> bool {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match Bernoulli::new(probability) {
            Ok(trial) => trial.sample(&mut self.0),
            Err(_) => false,
        }
    }

    /// Uniform slot index in `[0, count)`.
    pub fn slot_index(&mut self, count: usize) -> usize {
        self.0.gen_range(0..count)
    }

    /// Uniform cent amount in `[low, high]`.
    pub fn prize_cents(&mut self, low: u64, high: u64) -> u64 {
        self.0.gen_range(low..=high)
    }

    /// Random suffix for ticket numbering.
    pub fn number_suffix(&mut self) -> u32 {
        self.0.gen_range(0..1_000_000)
    }
}
