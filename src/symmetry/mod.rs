//! Case-equivalence symmetry reduction
//!
//! The transform group acting on codes, and the enumeration of guesses that
//! remain distinct once part of a game has been played.

mod distinct;
mod transform;

pub use distinct::{DistinctFollowers, PrefixEntry};
pub use transform::{NCOLORPERMS, NPOSPERMS, NTRANSFORMS, Transform, TransformTable};
