//! Distinct follower enumeration
//!
//! After a prefix of guesses, two candidate guesses related by a transform that
//! fixes the whole prefix lead to mirror-image subtrees. Keeping one canonical
//! representative per orbit shrinks the candidate list without losing any
//! strategy.

use super::transform::{Transform, TransformTable};
use crate::core::{Code, NCODES};
use std::collections::BTreeSet;

/// One node of the prefix enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    /// Guesses played so far
    pub prefix: Vec<Code>,
    /// Transforms fixing every code of `prefix`
    pub preserving: Vec<Transform>,
    /// Orbit representatives of the unused codes under `preserving`
    pub distinct: Vec<Code>,
}

/// Enumerates orbit-distinct guesses and prefixes
pub struct DistinctFollowers<'t> {
    table: &'t TransformTable,
    skip_non_reducing: bool,
}

impl<'t> DistinctFollowers<'t> {
    /// Generator over the whole group of `table`
    #[must_use]
    pub const fn new(table: &'t TransformTable) -> Self {
        Self {
            table,
            skip_non_reducing: false,
        }
    }

    /// Do not descend into followers that fail to reduce the search
    ///
    /// A follower is non-reducing when its preserving set did not shrink, or
    /// when its distinct set is no larger than its parent's. Such followers are
    /// still reported, but their own followers are not enumerated.
    #[must_use]
    pub const fn skip_non_reducing(mut self, skip: bool) -> Self {
        self.skip_non_reducing = skip;
        self
    }

    /// Orbit representatives of `codes` under `transforms`, minus `exclusions`
    ///
    /// Representatives are not guaranteed to be members of `codes`. The result
    /// is sorted ascending.
    #[must_use]
    pub fn distinct_subset(
        &self,
        transforms: &[Transform],
        codes: impl IntoIterator<Item = Code>,
        exclusions: &[Code],
    ) -> Vec<Code> {
        let trivial = transforms.is_empty() || transforms == [Transform::IDENTITY];

        let reps: BTreeSet<Code> = codes
            .into_iter()
            .map(|c| {
                if trivial {
                    c
                } else {
                    self.table.representative(transforms, c)
                }
            })
            .collect();

        reps.into_iter().filter(|c| !exclusions.contains(c)).collect()
    }

    /// Like [`Self::distinct_subset`], but each representative is the smallest
    /// image that is itself a member of `codes`
    #[must_use]
    pub fn reduce_codeset(
        &self,
        transforms: &[Transform],
        codes: &[Code],
        exclusions: &[Code],
    ) -> Vec<Code> {
        let mut members = vec![false; NCODES];
        for code in codes {
            members[code.index()] = true;
        }

        let reps: BTreeSet<Code> = codes
            .iter()
            .map(|&c| {
                transforms
                    .iter()
                    .map(|&t| self.table.apply(t, c))
                    .filter(|w| members[w.index()])
                    .min()
                    .unwrap_or(c)
            })
            .collect();

        reps.into_iter().filter(|c| !exclusions.contains(c)).collect()
    }

    /// Distinct codes that may follow `prefix`
    #[must_use]
    pub fn distinct_after(&self, prefix: &[Code]) -> Vec<Code> {
        let preserving = self.table.preserving(prefix, self.table.all());
        self.distinct_subset(&preserving, Code::all(), prefix)
    }

    /// Depth-first enumeration of distinct prefixes starting with `first`
    ///
    /// Each entry is reported before its followers; followers are visited in
    /// ascending code order. Expansion stops when the preserving set is down to
    /// a single transform, the prefix reaches `max_len`, or no unused code was
    /// merged with another.
    #[must_use]
    pub fn prefixes(&self, first: Code, max_len: usize) -> Vec<PrefixEntry> {
        let root = self.entry(vec![first], self.table.all());

        let mut out = Vec::new();
        let mut stack = vec![(root, true)];

        while let Some((entry, expand)) = stack.pop() {
            let done = !expand
                || entry.preserving.len() == 1
                || entry.prefix.len() >= max_len
                || entry.distinct.len() == NCODES - entry.prefix.len();

            if !done {
                let mut followers: Vec<(PrefixEntry, bool)> = entry
                    .distinct
                    .iter()
                    .map(|&c| {
                        let mut prefix = entry.prefix.clone();
                        prefix.push(c);
                        let next = self.entry(prefix, &entry.preserving);
                        let reducing = !self.skip_non_reducing
                            || (next.preserving.len() != entry.preserving.len()
                                && next.distinct.len() > entry.distinct.len());
                        (next, reducing)
                    })
                    .collect();

                followers.reverse();
                out.push(entry);
                stack.extend(followers);
            } else {
                out.push(entry);
            }
        }

        out
    }

    fn entry(&self, prefix: Vec<Code>, seed: &[Transform]) -> PrefixEntry {
        let last = prefix.len() - 1;
        let preserving = self.table.preserving(&prefix[last..], seed);
        let distinct = self.distinct_subset(&preserving, Code::all(), &prefix);
        PrefixEntry {
            prefix,
            preserving,
            distinct,
        }
    }
}
