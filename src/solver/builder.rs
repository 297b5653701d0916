//! Branch-and-bound tree construction
//!
//! The builder walks the problem depth first. At each node it asks the
//! strategy for candidate guesses, recurses into every bucket of a candidate
//! (largest first, since large buckets are the likeliest to fail), and lets
//! the evaluator keep the best complete tree. Running out of guesses is not
//! an error: the search simply returns no tree.

use super::context::BuilderContext;
use super::partition::PartitionResult;
use super::strategy::Strategy;
use super::tree::Tree;
use crate::core::Code;
use crate::error::Result;
use crate::progress::ProgressSink;
use crate::tables::Tables;
use std::time::Instant;
use tracing::{debug, info};

/// Solver entries between progress reports, unless configured otherwise
pub const DEFAULT_REPORTING_CYCLE: u64 = 10_000;

/// Cost of a build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildMetrics {
    pub elapsed_secs: f64,
    /// Entries into the recursive solver
    pub entry_count: u64,
    /// First guess fixed by the caller
    pub first_guess: Option<Code>,
}

/// Outcome of a build; the tree is absent when the budget was too small
#[derive(Debug, Clone)]
pub struct TreeResult {
    pub tree: Option<Tree>,
    /// Guess budget the tree was built under
    pub max_levels: usize,
    pub strategy: String,
    pub metrics: BuildMetrics,
}

/// Recursive tree builder
pub struct TreeBuilder<'t, S: Strategy> {
    strategy: S,
    tables: &'t Tables,
    sink: ProgressSink,
    reporting_cycle: u64,
    entry_count: u64,
}

impl<'t, S: Strategy> TreeBuilder<'t, S> {
    /// Create a builder with progress reporting disabled
    #[must_use]
    pub const fn new(strategy: S, tables: &'t Tables) -> Self {
        Self {
            strategy,
            tables,
            sink: ProgressSink::Silent,
            reporting_cycle: DEFAULT_REPORTING_CYCLE,
            entry_count: 0,
        }
    }

    /// Report search status to `sink` every `reporting_cycle` entries
    #[must_use]
    pub fn with_progress(mut self, sink: ProgressSink, reporting_cycle: u64) -> Self {
        self.sink = sink;
        self.reporting_cycle = reporting_cycle.max(1);
        self
    }

    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Build a strategy tree for `problem` within `max_depth` guesses
    ///
    /// With `first_guess`, the root guess is fixed and the strategy picks
    /// every guess below it.
    ///
    /// # Errors
    /// Returns `Integrity` if a node's size accounting fails, which points at
    /// a defect rather than bad input.
    pub fn build(
        &mut self,
        problem: Vec<Code>,
        max_depth: usize,
        first_guess: Option<Code>,
    ) -> Result<TreeResult> {
        let description = self.strategy.description();
        info!(
            "building tree: strategy={description}, problem_size={}, max_depth={max_depth}, first_guess={}",
            problem.len(),
            first_guess.map_or_else(|| "auto".to_string(), |c| c.to_string())
        );

        let preselected =
            first_guess.map(|root| vec![PartitionResult::new(&problem, root, &self.tables.scores)]);
        let ctx = BuilderContext::root(problem, preselected);

        self.entry_count = 0;
        let start = Instant::now();
        let tree = self.solve(&ctx, max_depth);
        let elapsed = start.elapsed();
        self.sink.finish();
        let tree = tree?;

        match &tree {
            Some(t) => info!(
                "tree built in {elapsed:.2?}: root={}, total_moves={}, max_depth={}, entries={}",
                t.root(),
                t.stats().total_moves,
                t.stats().max_depth,
                self.entry_count
            ),
            None => info!(
                "no tree within {max_depth} guesses ({elapsed:.2?}, entries={})",
                self.entry_count
            ),
        }

        Ok(TreeResult {
            tree,
            max_levels: max_depth,
            strategy: description,
            metrics: BuildMetrics {
                elapsed_secs: elapsed.as_secs_f64(),
                entry_count: self.entry_count,
                first_guess,
            },
        })
    }

    fn solve(&mut self, ctx: &BuilderContext<'_>, remaining: usize) -> Result<Option<Tree>> {
        self.entry_count += 1;
        if self.entry_count % self.reporting_cycle == 0 {
            self.sink.report(self.entry_count, &ctx.status_chain());
        }

        if !ctx.possible(remaining) {
            return Ok(None);
        }

        match *ctx.problem() {
            [code] => return Ok(Some(Tree::single(code))),
            [a, b] => return Ok(Some(Tree::pair(a, b, &self.tables.scores))),
            _ => {}
        }

        let candidates = match ctx.preselected() {
            Some(fixed) => fixed.to_vec(),
            None => self.strategy.candidate_guesses(ctx, self.tables),
        };
        if candidates.is_empty() {
            return Ok(None);
        }
        ctx.status().set_candidate_count(candidates.len());

        let evaluator = self.strategy.evaluator();
        let mut state = evaluator.initial_state();

        for pr in &candidates {
            ctx.status().next_candidate(pr.stats().n);
            if pr.stats().n < 2 {
                continue;
            }

            let tree = if pr.stats().optimal {
                Tree::optimal(pr)?
            } else if let Some(tree) = self.expand(ctx, pr, remaining)? {
                tree
            } else {
                if ctx.is_root() {
                    debug!("root {} fails within {remaining} guesses", pr.root());
                }
                continue;
            };

            if ctx.is_root() {
                debug!(
                    "root {}: total_moves={}, max_depth={}",
                    tree.root(),
                    tree.stats().total_moves,
                    tree.stats().max_depth
                );
            }

            if evaluator.evaluate(tree, &mut state) {
                return Ok(evaluator.best(state));
            }
        }

        Ok(evaluator.best(state))
    }

    /// Solve every bucket of `pr`; `None` as soon as one bucket fails
    fn expand(
        &mut self,
        ctx: &BuilderContext<'_>,
        pr: &PartitionResult,
        remaining: usize,
    ) -> Result<Option<Tree>> {
        let mut tree = Tree::open(pr);

        for score in pr.scores_by_size() {
            ctx.status().next_child();
            if score.is_perfect() {
                continue;
            }

            let child = ctx.child(pr.part(score).to_vec(), pr.root(), score);
            match self.solve(&child, remaining - 1)? {
                Some(subtree) => tree.set_child(score, subtree),
                None => return Ok(None),
            }
        }

        tree.update_stats(pr)?;
        Ok(Some(tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::strategy::StrategyType;
    use std::sync::OnceLock;

    fn tables() -> &'static Tables {
        static TABLES: OnceLock<Tables> = OnceLock::new();
        TABLES.get_or_init(Tables::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    fn builder(name: &str) -> TreeBuilder<'static, StrategyType> {
        TreeBuilder::new(StrategyType::from_name_seeded(name, Some(1)).unwrap(), tables())
    }

    #[test]
    fn one_code_problem() {
        let result = builder("min_largest").build(vec![code(77)], 1, None).unwrap();
        let tree = result.tree.unwrap();
        assert_eq!(tree.stats().total_moves, 1);
        assert_eq!(tree.stats().max_depth, 1);
        assert_eq!(result.metrics.entry_count, 1);
    }

    #[test]
    fn two_code_problem() {
        let result = builder("max_parts").build(vec![code(9), code(4)], 2, None).unwrap();
        let tree = result.tree.unwrap();
        assert_eq!(tree.root(), code(4));
        assert_eq!(tree.stats().total_moves, 3);
        assert_eq!(tree.stats().max_depth, 2);
    }

    #[test]
    fn zero_budget_has_no_tree() {
        let result = builder("min_largest").build(vec![code(1)], 0, None).unwrap();
        assert!(result.tree.is_none());
        assert_eq!(result.max_levels, 0);
    }

    #[test]
    fn too_small_budget_has_no_tree() {
        let problem: Vec<Code> = (0..20).map(code).collect();
        let result = builder("min_largest").build(problem, 2, None).unwrap();
        assert!(result.tree.is_none());
    }

    #[test]
    fn small_problem_every_strategy() {
        let problem: Vec<Code> = (0..40).map(|v| code(v * 7)).collect();
        for name in crate::solver::strategy::STRATEGY_NAMES {
            let result = builder(name).build(problem.clone(), 10, None).unwrap();
            let tree = result.tree.unwrap_or_else(|| panic!("{name} found no tree"));
            assert_eq!(tree.stats().problem_size, problem.len(), "{name}");
            tree.check_sizes().unwrap();
        }
    }

    #[test]
    fn first_guess_is_respected() {
        let problem: Vec<Code> = (100..130).map(code).collect();
        let result = builder("min_largest_in")
            .build(problem, 6, Some(code(51)))
            .unwrap();
        assert_eq!(result.metrics.first_guess, Some(code(51)));
        assert_eq!(result.tree.unwrap().root(), code(51));
    }

    #[test]
    fn depth_evaluator_never_deeper_than_moves_evaluator() {
        let problem: Vec<Code> = (0..25).map(|v| code(v * 11)).collect();
        let by_moves = builder("min_moves_distinct_in")
            .build(problem.clone(), 5, None)
            .unwrap()
            .tree
            .unwrap();
        let by_depth = builder("min_depth_distinct_in")
            .build(problem, 5, None)
            .unwrap()
            .tree
            .unwrap();
        assert!(by_depth.stats().max_depth <= by_moves.stats().max_depth);
        assert!(by_moves.stats().total_moves <= by_depth.stats().total_moves);
    }
}
