//! Guess analysis command
//!
//! Partitions the full code set against each requested guess and groups the
//! guesses whose partitions share a signature.

use crate::core::Code;
use crate::error::{MastermindError, Result};
use crate::solver::{LongSignature, PartitionResult, PartitionStats, Signature};
use crate::tables::Tables;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Partition of the full code set against one guess
pub struct GuessAnalysis {
    pub guess: Code,
    pub stats: PartitionStats,
    /// Non-empty bucket sizes, largest first
    pub sizes: Vec<usize>,
    pub long_signature: LongSignature,
}

/// Guesses that split the code set into identically shaped partitions
pub struct SignatureClass {
    pub signature: Signature,
    /// Ascending
    pub members: Vec<Code>,
}

/// Result of analyzing a set of guesses
pub struct AnalysisReport {
    pub problem_size: usize,
    pub guesses: Vec<GuessAnalysis>,
    /// Ordered by smallest member
    pub classes: Vec<SignatureClass>,
}

/// Resolve guess values, defaulting to the canonical first guesses
///
/// # Errors
/// Returns `Validation` for a value outside the code space.
pub fn resolve_guesses(values: &[u16], all: bool) -> Result<Vec<Code>> {
    if all {
        return Ok(Code::all().collect());
    }
    if values.is_empty() {
        return Ok(Code::FIRST.to_vec());
    }
    values.iter().map(|&v| Code::new(v)).collect()
}

/// Analyze every guess in `guesses` against the full code set
///
/// # Errors
/// Returns `Validation` if no guesses are given.
pub fn analyze_guesses(guesses: &[Code], tables: &Tables) -> Result<AnalysisReport> {
    if guesses.is_empty() {
        return Err(MastermindError::Validation(
            "No guesses to analyze".to_string(),
        ));
    }

    let problem: Vec<Code> = Code::all().collect();
    let partitions: Vec<PartitionResult> = guesses
        .par_iter()
        .map(|&guess| PartitionResult::new(&problem, guess, &tables.scores))
        .collect();

    let mut by_signature: FxHashMap<Signature, Vec<Code>> = FxHashMap::default();
    for pr in &partitions {
        by_signature.entry(pr.signature()).or_default().push(pr.root());
    }

    let mut classes: Vec<SignatureClass> = by_signature
        .into_iter()
        .map(|(signature, mut members)| {
            members.sort_unstable();
            members.dedup();
            SignatureClass { signature, members }
        })
        .collect();
    classes.sort_by_key(|c| c.members[0]);

    let guesses = partitions
        .iter()
        .map(|pr| GuessAnalysis {
            guess: pr.root(),
            stats: *pr.stats(),
            sizes: pr.sorted_sizes(),
            long_signature: pr.long_signature(),
        })
        .collect();

    Ok(AnalysisReport {
        problem_size: problem.len(),
        guesses,
        classes,
    })
}
