//! Output channel masks.
//!
//! One bit per physical output line. A vibration motor uses bit 0 only; an
//! RGB triad uses bits 0–2 (R, G, B). Composite colours are unions of
//! channels; there is no intensity control, every line is binary.

use core::fmt;
use core::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Maximum number of channels any actuator can have.
pub const MAX_CHANNELS: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Channels(u8);

impl Channels {
    pub const NONE: Self = Self(0);
    pub const MOTOR: Self = Self(0b001);
    pub const RED: Self = Self(0b001);
    pub const GREEN: Self = Self(0b010);
    pub const BLUE: Self = Self(0b100);
    pub const YELLOW: Self = Self(0b011);
    pub const CYAN: Self = Self(0b110);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & ((1 << MAX_CHANNELS) - 1))
    }

    /// Every channel of an actuator with `count` lines.
    pub const fn all(count: usize) -> Self {
        if count >= MAX_CHANNELS {
            Self((1 << MAX_CHANNELS) - 1)
        } else {
            Self(((1u16 << count) - 1) as u8)
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, index: usize) -> bool {
        index < MAX_CHANNELS && self.0 & (1 << index) != 0
    }

    /// True when every set bit addresses one of the first `count` lines.
    pub const fn fits(self, count: usize) -> bool {
        self.0 & !Self::all(count).0 == 0
    }
}

impl BitOr for Channels {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channels(0b{:03b})", self.0)
    }
}
