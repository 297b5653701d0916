//! Partitioning a problem by score against a guess
//!
//! Every secret still consistent with the game so far lands in exactly one of
//! `NSCORES` buckets, keyed by the score the guess would receive against it.

use crate::core::{Code, NSCORES, Score, ScoreTable};
use serde::{Deserialize, Serialize};

/// Summary statistics over non-empty bucket sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Number of non-empty buckets
    pub n: usize,
    pub total: usize,
    /// Sum of squared sizes
    pub totsq: usize,
    pub mean: f64,
    pub variance: f64,
    /// Shannon entropy in bits
    pub entropy: f64,
    pub largest: usize,
    pub smallest: usize,
    /// Every bucket holds at most one code and the problem has more than two
    pub optimal: bool,
    /// A single bucket holds everything and the problem has more than two
    pub degenerate: bool,
    /// The perfect-score bucket is non-empty
    pub in_solution: bool,
}

impl PartitionStats {
    /// Derive stats from bucket sizes and the perfect bucket's size
    ///
    /// Zero sizes are ignored.
    #[must_use]
    pub fn new(sizes: &[usize], perfect: usize) -> Self {
        let total: usize = sizes.iter().sum();
        let n = sizes.iter().filter(|&&s| s > 0).count();
        let totsq: usize = sizes.iter().map(|&s| s * s).sum();

        let (mean, variance, entropy) = if n == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let mean = total as f64 / n as f64;
            let variance = (totsq as f64 / n as f64 - mean * mean).max(0.0);

            let sum_xlogx: f64 = sizes.iter().map(|&s| s as f64 * safe_log2(s)).sum();
            let mut entropy = safe_log2(total) - sum_xlogx / total as f64;
            if entropy.abs() <= f64::EPSILON * 4.0 {
                entropy = 0.0;
            }
            (mean, variance, entropy)
        };

        let largest = sizes.iter().copied().max().unwrap_or(0);
        let smallest = sizes.iter().copied().filter(|&s| s > 0).min().unwrap_or(0);

        Self {
            n,
            total,
            totsq,
            mean,
            variance,
            entropy,
            largest,
            smallest,
            optimal: largest == 1 && total > 2,
            degenerate: n == 1 && total > 2,
            in_solution: perfect != 0,
        }
    }

    /// Stats of a one-code problem guessed with its only member
    #[must_use]
    pub fn single() -> Self {
        Self::new(&[1], 1)
    }

    /// Stats of a two-code problem guessed with one of its members
    #[must_use]
    pub fn pair() -> Self {
        Self::new(&[1, 1], 1)
    }

    /// Standard deviation of bucket sizes
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.variance.sqrt()
    }
}

fn safe_log2(n: usize) -> f64 {
    if n > 0 { (n as f64).log2() } else { 0.0 }
}

/// Compact shape of a partition: perfect-bucket membership and sizes, largest first
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub in_solution: bool,
    pub sizes: Vec<usize>,
}

/// One element of a [`LongSignature`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignatureEntry {
    /// Bucket larger than two, with its score
    Scored(Score, usize),
    /// Bucket of one or two codes
    Size(usize),
}

/// Shape of a partition including which scores hold the large buckets
///
/// Perfect bucket size, then `(score, size)` for buckets above two, then the
/// buckets of two, then the buckets of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LongSignature {
    pub perfect: usize,
    pub entries: Vec<SignatureEntry>,
}

/// A problem split into score buckets against a root guess
#[derive(Debug, Clone)]
pub struct PartitionResult {
    root: Code,
    parts: [Vec<Code>; NSCORES],
    stats: PartitionStats,
}

impl PartitionResult {
    /// Partition `problem` by score against `root`
    #[must_use]
    pub fn new(problem: &[Code], root: Code, scores: &ScoreTable) -> Self {
        let mut parts: [Vec<Code>; NSCORES] = std::array::from_fn(|_| Vec::new());
        for &code in problem {
            parts[scores.score(code, root).index()].push(code);
        }

        let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
        let stats = PartitionStats::new(&sizes, sizes[Score::PERFECT.index()]);

        Self { root, parts, stats }
    }

    #[inline]
    #[must_use]
    pub const fn root(&self) -> Code {
        self.root
    }

    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &PartitionStats {
        &self.stats
    }

    /// Codes that score `score` against the root
    #[must_use]
    pub fn part(&self, score: Score) -> &[Code] {
        &self.parts[score.index()]
    }

    /// All buckets, indexed by score value
    #[must_use]
    pub const fn parts(&self) -> &[Vec<Code>; NSCORES] {
        &self.parts
    }

    /// Bucket sizes, indexed by score value
    #[must_use]
    pub fn sizes(&self) -> [usize; NSCORES] {
        std::array::from_fn(|i| self.parts[i].len())
    }

    /// Non-empty bucket sizes, largest first
    #[must_use]
    pub fn sorted_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.parts.iter().map(Vec::len).filter(|&s| s > 0).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    /// Non-empty buckets ordered by descending size, ties by ascending score
    #[must_use]
    pub fn scores_by_size(&self) -> Vec<Score> {
        let mut scores: Vec<Score> = Score::all()
            .filter(|s| !self.parts[s.index()].is_empty())
            .collect();
        scores.sort_by(|a, b| self.parts[b.index()].len().cmp(&self.parts[a.index()].len()));
        scores
    }

    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            in_solution: self.stats.in_solution,
            sizes: self.sorted_sizes(),
        }
    }

    /// Long signature; problems of at most two codes fall back to the
    /// compact sizes, as no bucket can exceed two
    #[must_use]
    pub fn long_signature(&self) -> LongSignature {
        if self.stats.total <= 2 {
            return LongSignature {
                perfect: self.parts[Score::PERFECT.index()].len(),
                entries: self.sorted_sizes().into_iter().map(SignatureEntry::Size).collect(),
            };
        }

        let mut big = Vec::new();
        let mut twos = Vec::new();
        let mut ones = Vec::new();

        for score in Score::all() {
            match self.parts[score.index()].len() {
                0 => {}
                1 => ones.push(SignatureEntry::Size(1)),
                2 => twos.push(SignatureEntry::Size(2)),
                n => big.push(SignatureEntry::Scored(score, n)),
            }
        }

        big.extend(twos);
        big.extend(ones);
        LongSignature {
            perfect: self.parts[Score::PERFECT.index()].len(),
            entries: big,
        }
    }
}
