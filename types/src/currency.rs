use serde::{Deserialize, Serialize};
use std::fmt;

/// A sweeps-coin (SC) amount in cents.
///
/// All balance math in the platform is integer cents; fractional coins do not
/// exist. The wire representation is the raw cent count, so `3.50 SC`
/// serializes as `350`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sc(u64);

impl Sc {
    pub const ZERO: Sc = Sc(0);

    pub const fn from_cents(cents: u64) -> Self {
        Sc(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Sc) -> Option<Sc> {
        self.0.checked_add(other.0).map(Sc)
    }

    pub fn checked_sub(self, other: Sc) -> Option<Sc> {
        self.0.checked_sub(other.0).map(Sc)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Sc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
