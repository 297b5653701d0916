//! Mastermind code representation
//!
//! A code is a vector of `NPOSITIONS` color indices, stored as a dense integer
//! in `[0, NCODES)`. Position 0 is the least significant base-6 digit:
//! `code = Σ color[i] × 6^i`.

use crate::error::{MastermindError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of colors in the game
pub const NCOLORS: usize = 6;

/// Number of positions in a code
pub const NPOSITIONS: usize = 4;

/// Total number of codes (6^4)
pub const NCODES: usize = 1296;

/// A Mastermind code in numeric form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(u16);

impl Code {
    /// Orbit representatives of the full code set under position/color relabeling:
    /// `[0000]`, `[1000]`, `[1100]`, `[2100]`, `[3210]`
    pub const FIRST: [Self; 5] = [Self(0), Self(1), Self(7), Self(8), Self(51)];

    /// Create a code from its numeric value
    ///
    /// # Errors
    /// Returns `Validation` if `value >= NCODES`.
    pub fn new(value: u16) -> Result<Self> {
        if usize::from(value) >= NCODES {
            return Err(MastermindError::Validation(format!(
                "Out of range: code:{value}, range:[0, {NCODES})"
            )));
        }
        Ok(Self(value))
    }

    /// Build a code from an already range-checked index
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < NCODES);
        Self(index as u16)
    }

    /// Encode a vector of color indices
    ///
    /// # Errors
    /// Returns `Validation` if the length is not `NPOSITIONS` or a color is out of range.
    ///
    /// # Examples
    /// ```
    /// use mastermind_tree::core::Code;
    ///
    /// let code = Code::encode(&[3, 2, 1, 0]).unwrap();
    /// assert_eq!(code.value(), 51);
    /// assert!(Code::encode(&[0, 0, 6, 0]).is_err());
    /// ```
    pub fn encode(colors: &[u8]) -> Result<Self> {
        if colors.len() != NPOSITIONS {
            return Err(MastermindError::Validation(format!(
                "Incorrect length:{}, required:{NPOSITIONS}, v:{colors:?}",
                colors.len()
            )));
        }

        let mut value = 0usize;
        let mut multiplier = 1usize;
        for &color in colors {
            if usize::from(color) >= NCOLORS {
                return Err(MastermindError::Validation(format!(
                    "Out of range: peg:{color}, range:[0, {NCOLORS}); code:{colors:?}"
                )));
            }
            value += usize::from(color) * multiplier;
            multiplier *= NCOLORS;
        }

        Ok(Self::from_index(value))
    }

    /// Decode a numeric value into color indices
    ///
    /// # Errors
    /// Returns `Validation` if `value >= NCODES`.
    pub fn decode(value: u16) -> Result<[u8; NPOSITIONS]> {
        Self::new(value).map(Self::colors)
    }

    /// The color indices of this code, position 0 first
    #[must_use]
    pub const fn colors(self) -> [u8; NPOSITIONS] {
        let mut colors = [0u8; NPOSITIONS];
        let mut rest = self.0 as usize;
        let mut i = 0;
        while i < NPOSITIONS {
            colors[i] = (rest % NCOLORS) as u8;
            rest /= NCOLORS;
            i += 1;
        }
        colors
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Value as a table index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every code, in ascending numeric order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NCODES).map(Self::from_index)
    }
}

impl TryFrom<u16> for Code {
    type Error = MastermindError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for color in self.colors() {
            write!(f, "{color}")?;
        }
        write!(f, "]")
    }
}
