//! Strategy trees
//!
//! A tree node holds the guess to play, one optional subtree per score, and
//! aggregate stats over every secret the node can still face.

use super::partition::{PartitionResult, PartitionStats};
use crate::core::{Code, NSCORES, Score, ScoreTable};
use crate::error::{MastermindError, Result};
use serde::{Deserialize, Serialize};

/// Aggregate quality of a strategy tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of secrets the tree solves
    pub problem_size: usize,
    /// Guesses on the shortest game
    pub min_depth: usize,
    /// Guesses on the longest game
    pub max_depth: usize,
    /// Guesses summed over every secret
    pub total_moves: usize,
    /// Every non-perfect score leads straight to a single code
    pub optimal: bool,
    /// The root guess is itself a possible secret
    pub in_solution: bool,
}

impl TreeStats {
    const SINGLE: Self = Self {
        problem_size: 1,
        min_depth: 1,
        max_depth: 1,
        total_moves: 1,
        optimal: true,
        in_solution: true,
    };

    const PAIR: Self = Self {
        problem_size: 2,
        min_depth: 1,
        max_depth: 2,
        total_moves: 3,
        optimal: true,
        in_solution: true,
    };

    /// Mean number of guesses per secret
    #[must_use]
    pub fn average_game_length(&self) -> f64 {
        if self.problem_size == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.problem_size as f64
    }
}

/// A node of a strategy tree
#[derive(Debug, Clone)]
pub struct Tree {
    root: Code,
    children: [Option<Box<Tree>>; NSCORES],
    stats: TreeStats,
    pr_stats: PartitionStats,
}

impl Tree {
    fn new(root: Code, stats: TreeStats, pr_stats: PartitionStats) -> Self {
        Self {
            root,
            children: std::array::from_fn(|_| None),
            stats,
            pr_stats,
        }
    }

    /// Empty node for `pr`, to be filled with children and closed with
    /// [`Tree::update_stats`]
    #[must_use]
    pub fn open(pr: &PartitionResult) -> Self {
        let stats = TreeStats {
            problem_size: 0,
            min_depth: 0,
            max_depth: 0,
            total_moves: 0,
            optimal: pr.stats().optimal,
            in_solution: pr.stats().in_solution,
        };
        Self::new(pr.root(), stats, *pr.stats())
    }

    /// Tree for a problem holding only `code`
    #[must_use]
    pub fn single(code: Code) -> Self {
        Self::new(code, TreeStats::SINGLE, PartitionStats::single())
    }

    /// Tree for a two-code problem: guess the smaller code, then the other
    #[must_use]
    pub fn pair(a: Code, b: Code, scores: &ScoreTable) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let mut tree = Self::new(first, TreeStats::PAIR, PartitionStats::pair());
        tree.set_child(scores.score(first, second), Self::single(second));
        tree
    }

    /// Tree for an optimal partition: every non-perfect bucket is one code
    ///
    /// # Errors
    /// Returns `Integrity` if a non-perfect bucket holds more than one code.
    pub fn optimal(pr: &PartitionResult) -> Result<Self> {
        let mut tree = Self::open(pr);
        for score in Score::all().filter(|s| !s.is_perfect()) {
            match pr.part(score) {
                [] => {}
                [code] => tree.set_child(score, Self::single(*code)),
                part => {
                    return Err(MastermindError::Integrity {
                        calculated: part.len(),
                        expected: 1,
                    });
                }
            }
        }
        tree.update_stats(pr)?;
        Ok(tree)
    }

    /// Attach `child` under `score`
    pub fn set_child(&mut self, score: Score, child: Self) {
        self.children[score.index()] = Some(Box::new(child));
    }

    /// Recompute aggregate stats from the children and the root's partition
    ///
    /// # Errors
    /// Returns `Integrity` when the children plus the root do not account for
    /// exactly the partitioned problem.
    pub fn update_stats(&mut self, pr: &PartitionResult) -> Result<()> {
        self.pr_stats = *pr.stats();
        let in_solution = pr.stats().in_solution;

        let mut size = usize::from(in_solution);
        let mut total_moves = usize::from(in_solution);
        let mut min_child = usize::MAX;
        let mut max_child = 0;

        for (_, child) in self.children() {
            let s = &child.stats;
            size += s.problem_size;
            total_moves += s.total_moves + s.problem_size;
            min_child = min_child.min(s.min_depth);
            max_child = max_child.max(s.max_depth);
        }

        if size != pr.stats().total {
            return Err(MastermindError::Integrity {
                calculated: size,
                expected: pr.stats().total,
            });
        }

        let (min_depth, max_depth) = if min_child == usize::MAX {
            (1, 1)
        } else if in_solution {
            (1, 1 + max_child)
        } else {
            (1 + min_child, 1 + max_child)
        };

        self.stats = TreeStats {
            problem_size: size,
            min_depth,
            max_depth,
            total_moves,
            optimal: pr.stats().optimal,
            in_solution,
        };
        Ok(())
    }

    #[inline]
    #[must_use]
    pub const fn root(&self) -> Code {
        self.root
    }

    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Partition stats of the root guess against this node's problem
    #[inline]
    #[must_use]
    pub const fn pr_stats(&self) -> &PartitionStats {
        &self.pr_stats
    }

    #[inline]
    #[must_use]
    pub const fn in_solution(&self) -> bool {
        self.stats.in_solution
    }

    /// Subtree reached after `score`, if any
    #[must_use]
    pub fn child(&self, score: Score) -> Option<&Self> {
        self.children[score.index()].as_deref()
    }

    /// Populated children in ascending score order
    pub fn children(&self) -> impl Iterator<Item = (Score, &Self)> {
        Score::all().filter_map(|s| self.child(s).map(|c| (s, c)))
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Number of nodes in the tree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().map(|(_, c)| c.node_count()).sum::<usize>()
    }

    /// Number of secrets solved on guess `k`, indexed by `k`
    ///
    /// Index 0 is always zero; the counts sum to the problem size.
    #[must_use]
    pub fn game_lengths(&self) -> Vec<usize> {
        let mut counts = vec![0; self.stats.max_depth + 1];
        self.count_lengths(1, &mut counts);
        counts
    }

    fn count_lengths(&self, depth: usize, counts: &mut Vec<usize>) {
        if counts.len() <= depth {
            counts.resize(depth + 1, 0);
        }
        if self.stats.in_solution {
            counts[depth] += 1;
        }
        for (_, child) in self.children() {
            child.count_lengths(depth + 1, counts);
        }
    }

    /// Check the size accounting at every node
    ///
    /// # Errors
    /// Returns `Integrity` for the first node whose stored problem size does
    /// not match its children plus its own root.
    pub fn check_sizes(&self) -> Result<()> {
        let mut size = usize::from(self.stats.in_solution);
        for (_, child) in self.children() {
            child.check_sizes()?;
            size += child.stats.problem_size;
        }
        if size != self.stats.problem_size {
            return Err(MastermindError::Integrity {
                calculated: size,
                expected: self.stats.problem_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn scores() -> &'static ScoreTable {
        static TABLE: OnceLock<ScoreTable> = OnceLock::new();
        TABLE.get_or_init(ScoreTable::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    #[test]
    fn single_code_tree() {
        let tree = Tree::single(code(42));
        let s = tree.stats();
        assert_eq!((s.problem_size, s.total_moves), (1, 1));
        assert_eq!((s.min_depth, s.max_depth), (1, 1));
        assert!(s.optimal && s.in_solution);
        assert!(tree.is_leaf());
        assert!((s.average_game_length() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pair_tree_guesses_smaller_first() {
        let tree = Tree::pair(code(900), code(17), scores());
        assert_eq!(tree.root(), code(17));
        assert_eq!(tree.stats().total_moves, 3);
        assert_eq!(tree.stats().max_depth, 2);

        let score = scores().score(code(17), code(900));
        assert_eq!(tree.child(score).map(Tree::root), Some(code(900)));
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.game_lengths(), vec![0, 1, 1]);
        tree.check_sizes().unwrap();
    }

    #[test]
    fn optimal_tree_from_partition() {
        // Three codes that all score differently against 0
        let problem = [code(0), code(1), code(7)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        assert!(pr.stats().optimal);

        let tree = Tree::optimal(&pr).unwrap();
        let s = tree.stats();
        assert_eq!(s.problem_size, 3);
        assert_eq!(s.total_moves, 5);
        assert_eq!((s.min_depth, s.max_depth), (1, 2));
        assert!(s.in_solution);
        assert!(tree.child(Score::PERFECT).is_none());
        tree.check_sizes().unwrap();
    }

    #[test]
    fn optimal_tree_outside_problem() {
        // [1000], [1100], [1110] against [0000]: three, two, one exact
        let problem = [code(1), code(7), code(43)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        assert!(pr.stats().optimal);

        let tree = Tree::optimal(&pr).unwrap();
        assert!(!tree.in_solution());
        assert_eq!(tree.stats().total_moves, 6);
        assert_eq!((tree.stats().min_depth, tree.stats().max_depth), (2, 2));
        assert_eq!(tree.game_lengths(), vec![0, 0, 3]);
    }

    #[test]
    fn optimal_tree_rejects_crowded_bucket() {
        let problem = [code(1), code(6), code(36)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        assert_eq!(pr.stats().largest, 3);
        assert!(Tree::optimal(&pr).is_err());
    }

    #[test]
    fn update_stats_detects_missing_child() {
        let problem = [code(0), code(1), code(7)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        let mut tree = Tree::open(&pr);
        tree.set_child(scores().score(code(0), code(1)), Tree::single(code(1)));

        match tree.update_stats(&pr) {
            Err(MastermindError::Integrity {
                calculated,
                expected,
            }) => assert_eq!((calculated, expected), (2, 3)),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }
}
