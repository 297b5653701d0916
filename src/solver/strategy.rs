//! Candidate selection strategies
//!
//! Defines the Strategy trait and concrete implementations, selectable by
//! name through [`StrategyType`].

use super::context::BuilderContext;
use super::evaluator::Evaluator;
use super::partition::PartitionResult;
use crate::core::{Code, NCODES};
use crate::error::{MastermindError, Result};
use crate::symmetry::DistinctFollowers;
use crate::tables::Tables;
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::cmp::Ordering;

/// A policy for proposing guesses at a search node
pub trait Strategy {
    /// Ordered candidate guesses for the node's problem, already partitioned
    fn candidate_guesses(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult>;

    /// How the trees built from the candidates are ranked
    fn evaluator(&self) -> Evaluator;

    /// Human-readable summary, recorded with built trees
    fn description(&self) -> String;
}

/// Every strategy name accepted by [`StrategyType::from_name`]
pub const STRATEGY_NAMES: [&str; 11] = [
    "random",
    "min_largest",
    "max_parts",
    "min_largest_in",
    "max_parts_in",
    "min_largest_01",
    "max_parts_01",
    "min_moves_distinct",
    "min_moves_distinct_in",
    "min_depth_distinct",
    "min_depth_distinct_in",
];

/// Enum wrapper for all strategy types
///
/// Allows runtime selection of strategy while maintaining static dispatch.
#[derive(Debug)]
pub enum StrategyType {
    /// One random member of the problem
    Random(RandomStrategy),
    /// Best guess by a partition property
    Optimize(OptimizeProperty),
    /// Every guess distinct under the node's symmetry
    Distinct(ScanDistinct),
}

impl Strategy for StrategyType {
    fn candidate_guesses(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult> {
        match self {
            Self::Random(s) => s.candidate_guesses(ctx, tables),
            Self::Optimize(s) => s.candidate_guesses(ctx, tables),
            Self::Distinct(s) => s.candidate_guesses(ctx, tables),
        }
    }

    fn evaluator(&self) -> Evaluator {
        match self {
            Self::Random(s) => s.evaluator(),
            Self::Optimize(s) => s.evaluator(),
            Self::Distinct(s) => s.evaluator(),
        }
    }

    fn description(&self) -> String {
        match self {
            Self::Random(s) => s.description(),
            Self::Optimize(s) => s.description(),
            Self::Distinct(s) => s.description(),
        }
    }
}

impl StrategyType {
    /// Create strategy from name string
    ///
    /// # Errors
    /// Returns `Configuration` for a name not in [`STRATEGY_NAMES`].
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_name_seeded(name, None)
    }

    /// Like [`Self::from_name`], seeding the `random` strategy's generator
    ///
    /// # Errors
    /// Returns `Configuration` for a name not in [`STRATEGY_NAMES`].
    pub fn from_name_seeded(name: &str, seed: Option<u64>) -> Result<Self> {
        use PartitionObjective::{MaxParts, MaxPartsInFirst, MinLargest, MinLargestInFirst};

        let optimize = |objective, restrict_to_problem| {
            Self::Optimize(OptimizeProperty {
                objective,
                restrict_to_problem,
            })
        };
        let distinct = |evaluator, restrict_to_problem| {
            Self::Distinct(ScanDistinct {
                evaluator,
                restrict_to_problem,
            })
        };

        Ok(match name {
            "random" => Self::Random(RandomStrategy::new(seed)),
            "min_largest" => optimize(MinLargest, false),
            "max_parts" => optimize(MaxParts, false),
            "min_largest_in" => optimize(MinLargest, true),
            "max_parts_in" => optimize(MaxParts, true),
            "min_largest_01" => optimize(MinLargestInFirst, false),
            "max_parts_01" => optimize(MaxPartsInFirst, false),
            "min_moves_distinct" => distinct(Evaluator::MinimizeMoveCount, false),
            "min_moves_distinct_in" => distinct(Evaluator::MinimizeMoveCount, true),
            "min_depth_distinct" => distinct(Evaluator::MinimizeTreeDepth, false),
            "min_depth_distinct_in" => distinct(Evaluator::MinimizeTreeDepth, true),
            _ => {
                return Err(MastermindError::Configuration(format!(
                    "Unknown strategy '{name}'; choose one of: {}",
                    STRATEGY_NAMES.join(", ")
                )));
            }
        })
    }
}

/// The smaller code of a tiny problem, the only sensible guess
fn smallest_member(ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult> {
    ctx.problem()
        .iter()
        .min()
        .map(|&c| PartitionResult::new(ctx.problem(), c, &tables.scores))
        .into_iter()
        .collect()
}

/// Random strategy
///
/// Picks one member of the problem. Since the guess is always a live secret,
/// every bucket is strictly smaller than the problem.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: RefCell<StdRng>,
    seed: u64,
}

impl RandomStrategy {
    /// Generator seeded with `seed`, or with a random seed
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            seed,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Strategy for RandomStrategy {
    fn candidate_guesses(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult> {
        ctx.problem()
            .choose(&mut *self.rng.borrow_mut())
            .map(|&c| PartitionResult::new(ctx.problem(), c, &tables.scores))
            .into_iter()
            .collect()
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::FirstFound
    }

    fn description(&self) -> String {
        format!("random(seed={})", self.seed)
    }
}

/// Partition property to optimize, with its tie-break chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionObjective {
    /// Smallest largest bucket, then most buckets, then in-problem
    MinLargest,
    /// Most buckets, then smallest largest bucket, then in-problem
    MaxParts,
    /// Smallest largest bucket, then in-problem, then most buckets
    MinLargestInFirst,
    /// Most buckets, then in-problem, then smallest largest bucket
    MaxPartsInFirst,
}

impl PartitionObjective {
    /// `Less` when `a` is the better guess; ties end on the smaller root
    #[must_use]
    pub fn compare(self, a: &PartitionResult, b: &PartitionResult) -> Ordering {
        let (sa, sb) = (a.stats(), b.stats());
        let largest = || sa.largest.cmp(&sb.largest);
        let parts = || sb.n.cmp(&sa.n);
        let inside = || sb.in_solution.cmp(&sa.in_solution);

        let order = match self {
            Self::MinLargest => largest().then_with(parts).then_with(inside),
            Self::MaxParts => parts().then_with(largest).then_with(inside),
            Self::MinLargestInFirst => largest().then_with(inside).then_with(parts),
            Self::MaxPartsInFirst => parts().then_with(inside).then_with(largest),
        };
        order.then_with(|| a.root().cmp(&b.root()))
    }

    const fn label(self) -> &'static str {
        match self {
            Self::MinLargest => "min_largest",
            Self::MaxParts => "max_parts",
            Self::MinLargestInFirst => "min_largest_01",
            Self::MaxPartsInFirst => "max_parts_01",
        }
    }
}

/// Best single guess by a partition property
///
/// Scans the problem, then (unless restricted) every other unused code. An
/// optimal partition ends the scan at once.
#[derive(Debug, Clone, Copy)]
pub struct OptimizeProperty {
    pub objective: PartitionObjective,
    pub restrict_to_problem: bool,
}

impl Strategy for OptimizeProperty {
    fn candidate_guesses(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult> {
        let problem = ctx.problem();
        if problem.len() <= 2 {
            return smallest_member(ctx, tables);
        }

        let mut excluded = vec![false; NCODES];
        for code in problem.iter().chain(ctx.prefix().iter()) {
            excluded[code.index()] = true;
        }

        let outside = Code::all().filter(|c| !excluded[c.index()]);
        let scan: Box<dyn Iterator<Item = Code> + '_> = if self.restrict_to_problem {
            Box::new(problem.iter().copied())
        } else {
            Box::new(problem.iter().copied().chain(outside))
        };

        let mut best: Option<PartitionResult> = None;
        for code in scan {
            let pr = PartitionResult::new(problem, code, &tables.scores);
            if pr.stats().optimal {
                return vec![pr];
            }
            let better = best
                .as_ref()
                .is_none_or(|b| self.objective.compare(&pr, b) == Ordering::Less);
            if better {
                best = Some(pr);
            }
        }
        best.into_iter().collect()
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::MinimizeMoveCount
    }

    fn description(&self) -> String {
        let scope = if self.restrict_to_problem { "problem" } else { "all codes" };
        format!("{} over {scope}", self.objective.label())
    }
}

/// Every symmetry-distinct guess at the node
///
/// An optimal in-problem guess is returned alone; otherwise the optimal
/// guess with the smallest code; otherwise every distinct guess in
/// ascending order.
#[derive(Debug, Clone, Copy)]
pub struct ScanDistinct {
    pub evaluator: Evaluator,
    pub restrict_to_problem: bool,
}

impl ScanDistinct {
    /// Orbit representatives of the node's candidate universe
    fn distinct_candidates(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<Code> {
        let preserving = ctx.preserving(&tables.transforms);
        let prefix = ctx.prefix();

        let universe: &[Code] = match ctx.parent() {
            Some(parent) if !self.restrict_to_problem => parent.problem(),
            _ => ctx.problem(),
        };

        if preserving.len() <= 1 {
            let mut codes: Vec<Code> = universe
                .iter()
                .copied()
                .filter(|c| !prefix.contains(c))
                .collect();
            codes.sort_unstable();
            return codes;
        }

        if ctx.is_root() && ctx.problem_size() == NCODES {
            return Code::FIRST.to_vec();
        }

        DistinctFollowers::new(&tables.transforms).distinct_subset(
            &preserving,
            universe.iter().copied(),
            &prefix,
        )
    }
}

impl Strategy for ScanDistinct {
    fn candidate_guesses(&self, ctx: &BuilderContext<'_>, tables: &Tables) -> Vec<PartitionResult> {
        if ctx.problem_size() <= 2 {
            return smallest_member(ctx, tables);
        }

        let mut candidates = Vec::new();
        let mut optimal: Option<PartitionResult> = None;

        for code in self.distinct_candidates(ctx, tables) {
            let pr = PartitionResult::new(ctx.problem(), code, &tables.scores);
            if pr.stats().optimal {
                if pr.stats().in_solution {
                    return vec![pr];
                }
                if optimal.as_ref().is_none_or(|o| code < o.root()) {
                    optimal = Some(pr.clone());
                }
            }
            candidates.push(pr);
        }

        match optimal {
            Some(pr) => vec![pr],
            None => candidates,
        }
    }

    fn evaluator(&self) -> Evaluator {
        self.evaluator
    }

    fn description(&self) -> String {
        let scope = if self.restrict_to_problem { "problem" } else { "parent problem" };
        format!("distinct guesses over {scope}, {}", self.evaluator.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Score;
    use std::sync::OnceLock;

    fn tables() -> &'static Tables {
        static TABLES: OnceLock<Tables> = OnceLock::new();
        TABLES.get_or_init(Tables::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    fn roots(candidates: &[PartitionResult]) -> Vec<Code> {
        candidates.iter().map(PartitionResult::root).collect()
    }

    #[test]
    fn every_name_resolves() {
        for name in STRATEGY_NAMES {
            let strategy = StrategyType::from_name(name).unwrap();
            assert!(!strategy.description().is_empty());
        }
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        assert!(matches!(
            StrategyType::from_name("entropy"),
            Err(MastermindError::Configuration(_))
        ));
    }

    #[test]
    fn evaluators_match_names() {
        let eval = |name| StrategyType::from_name(name).unwrap().evaluator();
        assert_eq!(eval("random"), Evaluator::FirstFound);
        assert_eq!(eval("max_parts_in"), Evaluator::MinimizeMoveCount);
        assert_eq!(eval("min_depth_distinct"), Evaluator::MinimizeTreeDepth);
    }

    #[test]
    fn random_picks_problem_member() {
        let problem: Vec<Code> = (300..320).map(code).collect();
        let ctx = BuilderContext::root(problem.clone(), None);
        let strategy = RandomStrategy::new(Some(7));

        let picked = roots(&strategy.candidate_guesses(&ctx, tables()));
        assert_eq!(picked.len(), 1);
        assert!(problem.contains(&picked[0]));

        let again = RandomStrategy::new(Some(7));
        assert_eq!(roots(&again.candidate_guesses(&ctx, tables())), picked);
    }

    #[test]
    fn tiny_problems_use_smallest_code() {
        let ctx = BuilderContext::root(vec![code(90), code(12)], None);
        for name in ["min_largest", "min_moves_distinct_in"] {
            let strategy = StrategyType::from_name(name).unwrap();
            assert_eq!(roots(&strategy.candidate_guesses(&ctx, tables())), vec![code(12)]);
        }
    }

    #[test]
    fn min_largest_on_full_set() {
        let ctx = BuilderContext::root(Code::all().collect(), None);
        let strategy = StrategyType::from_name("min_largest").unwrap();
        let best = strategy.candidate_guesses(&ctx, tables());
        assert_eq!(best.len(), 1);
        // [1100] is the classic first guess: largest bucket 256
        assert_eq!(best[0].root(), code(7));
        assert_eq!(best[0].stats().largest, 256);
    }

    #[test]
    fn objective_tie_breaks() {
        let problem: Vec<Code> = Code::all().collect();
        let scores = &tables().scores;
        let a = PartitionResult::new(&problem, code(0), scores);
        let b = PartitionResult::new(&problem, code(7), scores);
        assert_eq!(PartitionObjective::MinLargest.compare(&b, &a), Ordering::Less);
        assert_eq!(PartitionObjective::MaxParts.compare(&b, &a), Ordering::Less);
        assert_eq!(PartitionObjective::MaxParts.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn restricted_scan_stays_in_problem() {
        let problem: Vec<Code> = (0..30).map(code).collect();
        let ctx = BuilderContext::root(problem.clone(), None);
        let strategy = StrategyType::from_name("max_parts_in").unwrap();
        let best = roots(&strategy.candidate_guesses(&ctx, tables()));
        assert_eq!(best.len(), 1);
        assert!(problem.contains(&best[0]));
    }

    #[test]
    fn distinct_scan_on_full_set_uses_first_guesses() {
        let ctx = BuilderContext::root(Code::all().collect(), None);
        let strategy = StrategyType::from_name("min_moves_distinct").unwrap();
        assert_eq!(roots(&strategy.candidate_guesses(&ctx, tables())), Code::FIRST.to_vec());
    }

    #[test]
    fn distinct_scan_returns_optimal_inside_alone() {
        // [0000], [1000], [1100] are split perfectly by [0000]
        let ctx = BuilderContext::root(vec![code(0), code(1), code(7)], None);
        let strategy = StrategyType::from_name("min_depth_distinct_in").unwrap();
        let candidates = strategy.candidate_guesses(&ctx, tables());
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].stats().optimal && candidates[0].stats().in_solution);
    }

    #[test]
    fn distinct_scan_in_child_is_orbit_reduced() {
        let t = tables();
        let problem: Vec<Code> = Code::all().collect();
        let root = BuilderContext::root(problem.clone(), None);
        let pr = PartitionResult::new(&problem, code(0), &t.scores);
        let score = Score::new(0, 0).unwrap();
        let child = root.child(pr.part(score).to_vec(), code(0), score);

        let strategy = ScanDistinct {
            evaluator: Evaluator::MinimizeMoveCount,
            restrict_to_problem: true,
        };
        let distinct = strategy.distinct_candidates(&child, t);
        assert!(!distinct.is_empty());
        assert!(distinct.len() < child.problem_size());
        assert!(distinct.iter().all(|c| child.problem().contains(c)));
    }
}
