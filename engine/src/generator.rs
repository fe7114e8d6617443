//! Prize-slot generation.
//!
//! Slots are decided once, server-side, at purchase time:
//!
//! 1. One Bernoulli trial at the design's win probability decides whether
//!    the ticket wins at all.
//! 2. On a win, one slot index is chosen uniformly and its prize is drawn
//!    uniformly in `[prize_min, prize_max]` cents, then clamped to the
//!    platform payout cap.
//! 3. Every other slot (or every slot, on a loss) is the `LOSS` sentinel.
//!
//! The resulting array is immutable except for the per-slot `revealed` flag.

use crate::TicketRng;
use instawin_types::{PlatformLimits, Sc, Slot, SlotValue, TicketDesign};

/// Generate the slot outcomes for one ticket.
///
/// Guarantees, regardless of design configuration:
/// - `result.len() == design.slot_count`
/// - at most one slot carries a prize
/// - any prize is within `[0.01, limits.max_win]`
/// - every slot starts unrevealed
pub fn generate_slots(
    design: &TicketDesign,
    limits: &PlatformLimits,
    rng: &mut TicketRng,
) -> Vec<Slot> {
    let count = design.slot_count as usize;
    let mut slots = vec![Slot::concealed(SlotValue::Loss); count];
    if count == 0 {
        return slots;
    }

    if rng.win_trial(design.win_probability) {
        let index = rng.slot_index(count);
        let low = design.prize_min.cents().max(1);
        let high = design.prize_max.cents().max(low);
        let prize = limits.cap_win(Sc::from_cents(rng.prize_cents(low, high)));
        slots[index].value = SlotValue::Prize(prize);
    }

    slots
}

/// Generate a globally unique, human-opaque ticket number.
///
/// Composite of the purchase timestamp (millis, hex) and a random suffix.
/// Collisions are negligible but not impossible; the storage layer's UNIQUE
/// constraint on `ticket_number` is the backstop.
pub fn ticket_number(now_ms: u64, rng: &mut TicketRng) -> String {
    format!("{:011X}{:06}", now_ms, rng.number_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use instawin_types::TicketKind;

    fn design(win_probability: f64) -> TicketDesign {
        TicketDesign {
            id: 1,
            kind: TicketKind::PullTab,
            name: "Lucky Seven".to_string(),
            cost: Sc::from_cents(100),
            slot_count: 9,
            win_probability,
            prize_min: Sc::from_cents(1),
            prize_max: Sc::from_cents(1_000),
            enabled: true,
        }
    }

    #[test]
    fn at_most_one_winning_slot() {
        let limits = PlatformLimits::default();
        let mut rng = TicketRng::from_seed(42);
        let template = design(0.5);
        for _ in 0..2_000 {
            let slots = generate_slots(&template, &limits, &mut rng);
            assert_eq!(slots.len(), 9);
            let winners = slots
                .iter()
                .filter(|slot| slot.value.prize().is_some())
                .count();
            assert!(winners <= 1, "ticket generated {winners} winning slots");
            assert!(slots.iter().all(|slot| !slot.revealed));
        }
    }

    #[test]
    fn prizes_respect_the_payout_cap() {
        let limits = PlatformLimits {
            max_win: Sc::from_cents(500),
            ..PlatformLimits::default()
        };
        let mut rng = TicketRng::from_seed(7);
        let mut template = design(1.0);
        template.prize_min = Sc::from_cents(400);
        template.prize_max = Sc::from_cents(100_000);
        for _ in 0..500 {
            let slots = generate_slots(&template, &limits, &mut rng);
            let (_, prize) = slots
                .iter()
                .enumerate()
                .find_map(|(i, slot)| slot.value.prize().map(|p| (i, p)))
                .expect("p=1.0 ticket must win");
            assert!(prize <= Sc::from_cents(500));
            assert!(prize >= Sc::from_cents(1));
        }
    }

    #[test]
    fn zero_probability_never_wins() {
        let limits = PlatformLimits::default();
        let mut rng = TicketRng::from_seed(3);
        let slots = generate_slots(&design(0.0), &limits, &mut rng);
        assert!(slots.iter().all(|slot| slot.value == SlotValue::Loss));
    }

    #[test]
    fn win_rate_tracks_probability() {
        let limits = PlatformLimits::default();
        let mut rng = TicketRng::from_seed(99);
        let template = design(1.0 / 7.0);
        let trials = 20_000;
        let wins = (0..trials)
            .filter(|_| {
                generate_slots(&template, &limits, &mut rng)
                    .iter()
                    .any(|slot| slot.value.prize().is_some())
            })
            .count();
        let rate = wins as f64 / trials as f64;
        // 1/7 ≈ 0.1429; allow generous slack for a seeded sample.
        assert!((0.12..0.17).contains(&rate), "observed win rate {rate}");
    }

    #[test]
    fn winning_index_covers_all_slots() {
        let limits = PlatformLimits::default();
        let mut rng = TicketRng::from_seed(5);
        let template = design(1.0);
        let mut seen = [false; 9];
        for _ in 0..1_000 {
            let slots = generate_slots(&template, &limits, &mut rng);
            let index = slots
                .iter()
                .position(|slot| slot.value.prize().is_some())
                .unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|hit| *hit), "index distribution: {seen:?}");
    }

    #[test]
    fn ticket_numbers_are_opaque_and_distinct() {
        let mut rng = TicketRng::from_seed(11);
        let a = ticket_number(1_700_000_000_000, &mut rng);
        let b = ticket_number(1_700_000_000_000, &mut rng);
        assert_ne!(a, b);
        assert_eq!(a.len(), 17);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
