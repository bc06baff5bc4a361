// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kleene three-valued logic.
//!
//! `Tristate` is ordered `False < Unknown < True`, so OR is the maximum of
//! its operands, AND the minimum and NOT the negation of the underlying
//! `-1 / 0 / 1` value.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum Tristate {
    False = -1,
    Unknown = 0,
    True = 1,
}

impl Tristate {
    #[inline]
    pub const fn value(self) -> i8 {
        self as i8
    }

    #[inline]
    const fn from_value(value: i8) -> Self {
        match value {
            v if v < 0 => Tristate::False,
            0 => Tristate::Unknown,
            _ => Tristate::True,
        }
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !matches!(self, Tristate::Unknown)
    }

    #[inline]
    pub fn or(self, rhs: Tristate) -> Tristate {
        self.max(rhs)
    }

    #[inline]
    pub fn and(self, rhs: Tristate) -> Tristate {
        self.min(rhs)
    }

    #[inline]
    pub const fn negate(self) -> Tristate {
        Tristate::from_value(-self.value())
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::True
        } else {
            Tristate::False
        }
    }
}

impl BitOr for Tristate {
    type Output = Tristate;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl BitAnd for Tristate {
    type Output = Tristate;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl Not for Tristate {
    type Output = Tristate;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tristate::False => "FALSE",
            Tristate::Unknown => "UNKNOWN",
            Tristate::True => "TRUE",
        };
        f.write_str(s)
    }
}
