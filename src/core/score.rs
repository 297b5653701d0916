//! Match scores and the all-pairs score lookup table
//!
//! A score is the pair (exact, approx): pegs matching in color and position,
//! and pegs matching in color only. It is encoded as a single byte:
//! `value = (4 - exact)(5 - exact)/2 + approx`, so the perfect score is 0.

use super::code::{Code, NCODES, NCOLORS, NPOSITIONS};
use crate::error::{MastermindError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of score slots, including the unreachable (3, 1) slot
pub const NSCORES: usize = (NPOSITIONS + 1) * (NPOSITIONS + 2) / 2;

/// Number of scores that can actually occur
pub const NREALIZABLE_SCORES: usize = NSCORES - 1;

/// Match score between two codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// All pegs exact
    pub const PERFECT: Self = Self(0);

    /// Create a score from its components
    ///
    /// # Errors
    /// Returns `Validation` for component sums above `NPOSITIONS` and for (3, 1).
    pub fn new(exact: u8, approx: u8) -> Result<Self> {
        let n = NPOSITIONS as u8;
        if exact > n || approx > n || exact + approx > n || (exact == n - 1 && approx != 0) {
            return Err(MastermindError::Validation(format!(
                "Invalid score:(exact={exact},approx={approx}); range for each: [0,{n}], \
                 range for sum:[0,{n}], for exact={}, approx must be 0",
                n - 1
            )));
        }
        Ok(Self::encode(exact, approx))
    }

    /// Encode without validation
    #[inline]
    const fn encode(exact: u8, approx: u8) -> Self {
        let rest = NPOSITIONS as u8 - exact;
        Self(rest * (rest + 1) / 2 + approx)
    }

    /// Create a score from its encoded value
    ///
    /// # Errors
    /// Returns `Validation` if the value is out of range or is the (3, 1) slot.
    pub fn from_value(value: u8) -> Result<Self> {
        if usize::from(value) >= NSCORES || value == Self::encode(3, 1).0 {
            return Err(MastermindError::Validation(format!(
                "Invalid score value:{value}, range:[0, {NSCORES})"
            )));
        }
        Ok(Self(value))
    }

    /// Encoded value, 0 for perfect
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_perfect(self) -> bool {
        self.0 == 0
    }

    /// Exact matches
    #[must_use]
    pub fn exact(self) -> u8 {
        self.components().0
    }

    /// Color-only matches
    #[must_use]
    pub fn approx(self) -> u8 {
        self.components().1
    }

    fn components(self) -> (u8, u8) {
        let mut exact = NPOSITIONS as u8;
        loop {
            let rest = NPOSITIONS as u8 - exact;
            let base = rest * (rest + 1) / 2;
            if self.0 < base + rest + 1 {
                return (exact, self.0 - base);
            }
            exact -= 1;
        }
    }

    /// Score `guess` against `secret`
    ///
    /// Per color, counts min(occurrences in guess, occurrences in secret), then
    /// removes the positional matches to get the approximate count.
    ///
    /// # Examples
    /// ```
    /// use mastermind_tree::core::{Code, Score};
    ///
    /// let a = Code::encode(&[1, 1, 2, 2]).unwrap();
    /// let b = Code::encode(&[1, 2, 1, 3]).unwrap();
    /// let score = Score::calculate(a, b);
    /// assert_eq!((score.exact(), score.approx()), (1, 2));
    /// ```
    #[must_use]
    pub fn calculate(guess: Code, secret: Code) -> Self {
        let g = guess.colors();
        let s = secret.colors();
        let mut guess_counts = [0u8; NCOLORS];
        let mut secret_counts = [0u8; NCOLORS];
        let mut exact = 0u8;

        for (&a, &b) in g.iter().zip(s.iter()) {
            guess_counts[usize::from(a)] += 1;
            secret_counts[usize::from(b)] += 1;
            if a == b {
                exact += 1;
            }
        }

        let common: u8 = guess_counts
            .iter()
            .zip(secret_counts.iter())
            .map(|(&x, &y)| x.min(y))
            .sum();

        Self::encode(exact, common - exact)
    }

    /// All realizable scores, in ascending value order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NSCORES as u8).filter_map(|v| Self::from_value(v).ok())
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.exact(), self.approx())
    }
}

/// Precomputed scores of all code pairs
///
/// Built once, immutable afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTable {
    scores: Vec<u8>,
}

impl ScoreTable {
    /// Compute the full N×N table
    #[must_use]
    pub fn new() -> Self {
        let scores = (0..NCODES)
            .into_par_iter()
            .flat_map_iter(|row| {
                let a = Code::from_index(row);
                Code::all().map(move |b| Score::calculate(a, b).value())
            })
            .collect();

        Self { scores }
    }

    /// Look up the score of two codes
    #[inline]
    #[must_use]
    pub fn score(&self, a: Code, b: Code) -> Score {
        Score(self.scores[a.index() * NCODES + b.index()])
    }

    /// Check table dimensions, used after loading from cache
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.scores.len() == NCODES * NCODES
            && self.scores.iter().all(|&v| usize::from(v) < NSCORES)
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}
