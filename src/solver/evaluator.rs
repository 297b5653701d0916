//! Tree evaluators
//!
//! An evaluator ranks the complete trees built for successive candidate
//! guesses of one problem, and tells the builder when no later candidate can
//! do better.

use super::tree::Tree;
use std::cmp::Ordering;

/// Ranking policy for candidate trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    /// The first tree found is final
    FirstFound,
    /// Fewest total moves, then shallowest, then root inside the problem
    MinimizeMoveCount,
    /// Shallowest, then fewest total moves, then root inside the problem
    MinimizeTreeDepth,
}

/// Running state of one evaluation
#[derive(Debug, Default)]
pub struct EvaluationState {
    best: Option<Tree>,
    optimal_outside: Option<Tree>,
    optimal_inside: Option<Tree>,
}

impl Evaluator {
    #[must_use]
    pub fn initial_state(self) -> EvaluationState {
        EvaluationState::default()
    }

    /// Record `tree`; returns true once further candidates cannot improve
    /// the result
    pub fn evaluate(self, tree: Tree, state: &mut EvaluationState) -> bool {
        if self == Self::FirstFound {
            state.best = Some(tree);
            return true;
        }

        let replace = state
            .best
            .as_ref()
            .is_none_or(|best| self.compare(&tree, best) == Ordering::Less);

        if tree.stats().optimal {
            let slot = if tree.in_solution() {
                &mut state.optimal_inside
            } else {
                &mut state.optimal_outside
            };
            if replace {
                state.best = Some(tree.clone());
            }
            *slot = Some(tree);
        } else if replace {
            state.best = Some(tree);
        }

        state.optimal_inside.is_some()
    }

    /// Best tree seen: optimal inside the problem, then optimal outside, then
    /// the best ranked
    #[must_use]
    pub fn best(self, state: EvaluationState) -> Option<Tree> {
        state
            .optimal_inside
            .or(state.optimal_outside)
            .or(state.best)
    }

    /// Ordering of two trees, `Less` meaning `a` is better
    #[must_use]
    pub fn compare(self, a: &Tree, b: &Tree) -> Ordering {
        let (sa, sb) = (a.stats(), b.stats());
        let moves = sa.total_moves.cmp(&sb.total_moves);
        let depth = sa.max_depth.cmp(&sb.max_depth);
        let inside = sb.in_solution.cmp(&sa.in_solution);

        match self {
            Self::FirstFound => Ordering::Equal,
            Self::MinimizeMoveCount => moves.then(depth).then(inside),
            Self::MinimizeTreeDepth => depth.then(moves).then(inside),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstFound => "FirstFound",
            Self::MinimizeMoveCount => "MinimizeMoveCount",
            Self::MinimizeTreeDepth => "MinimizeTreeDepth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Code, ScoreTable};
    use crate::solver::partition::PartitionResult;
    use std::sync::OnceLock;

    fn scores() -> &'static ScoreTable {
        static TABLE: OnceLock<ScoreTable> = OnceLock::new();
        TABLE.get_or_init(ScoreTable::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    /// Optimal tree rooted inside a three-code problem
    fn inside_tree() -> Tree {
        let problem = [code(0), code(1), code(7)];
        Tree::optimal(&PartitionResult::new(&problem, code(0), scores())).unwrap()
    }

    /// Optimal tree rooted outside a three-code problem
    fn outside_tree() -> Tree {
        let problem = [code(1), code(7), code(43)];
        Tree::optimal(&PartitionResult::new(&problem, code(0), scores())).unwrap()
    }

    #[test]
    fn first_found_stops_immediately() {
        let eval = Evaluator::FirstFound;
        let mut state = eval.initial_state();
        assert!(eval.evaluate(outside_tree(), &mut state));
        assert_eq!(eval.best(state).map(|t| t.root()), Some(code(0)));
    }

    #[test]
    fn optimal_inside_is_final() {
        let eval = Evaluator::MinimizeMoveCount;
        let mut state = eval.initial_state();
        assert!(!eval.evaluate(outside_tree(), &mut state));
        assert!(eval.evaluate(inside_tree(), &mut state));

        let best = eval.best(state).unwrap();
        assert!(best.in_solution());
    }

    /// Non-optimal tree rooted inside `[0, 1, 2]`: 1 and 2 share a bucket
    fn ranked_tree() -> Tree {
        let problem = [code(0), code(1), code(2)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        assert!(!pr.stats().optimal);

        let mut tree = Tree::open(&pr);
        tree.set_child(
            scores().score(code(0), code(1)),
            Tree::pair(code(1), code(2), scores()),
        );
        tree.update_stats(&pr).unwrap();
        tree
    }

    #[test]
    fn optimal_outside_beats_ranked_best() {
        let eval = Evaluator::MinimizeTreeDepth;
        let mut state = eval.initial_state();

        let ranked = ranked_tree();
        assert!(ranked.in_solution());
        assert!(!ranked.stats().optimal);
        assert!(!eval.evaluate(ranked, &mut state));
        assert!(!eval.evaluate(outside_tree(), &mut state));

        let best = eval.best(state).unwrap();
        assert!(!best.in_solution());
        assert!(best.stats().optimal);
        assert_eq!(best.stats().problem_size, 3);
    }

    #[test]
    fn pair_tree_is_final() {
        let eval = Evaluator::MinimizeMoveCount;
        let mut state = eval.initial_state();
        assert!(eval.evaluate(Tree::pair(code(3), code(4), scores()), &mut state));
    }

    #[test]
    fn move_count_prefers_fewer_moves() {
        let eval = Evaluator::MinimizeMoveCount;
        let (a, b) = (inside_tree(), outside_tree());
        assert_eq!(eval.compare(&a, &b), Ordering::Less);
        assert_eq!(eval.compare(&b, &a), Ordering::Greater);
        assert_eq!(eval.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn depth_prefers_shallower() {
        let eval = Evaluator::MinimizeTreeDepth;
        let shallow = Tree::single(code(5));
        let deep = Tree::pair(code(3), code(4), scores());
        assert_eq!(eval.compare(&shallow, &deep), Ordering::Less);
    }

    #[test]
    fn empty_state_has_no_best() {
        let eval = Evaluator::MinimizeMoveCount;
        assert!(eval.best(eval.initial_state()).is_none());
    }
}
