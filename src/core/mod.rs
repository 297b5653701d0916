//! Core domain types for Mastermind
//!
//! Codes, scores, and the score lookup table. Everything here is pure and
//! immutable once built.

mod code;
mod score;

pub use code::{Code, NCODES, NCOLORS, NPOSITIONS};
pub use score::{NREALIZABLE_SCORES, NSCORES, Score, ScoreTable};
