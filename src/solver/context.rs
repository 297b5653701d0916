//! Search nodes
//!
//! One `BuilderContext` lives on the stack for every recursive solver call.
//! Children borrow their parent, so the guess path and the symmetry state of
//! every ancestor stay reachable without copying.

use super::partition::PartitionResult;
use crate::core::{Code, NCODES, NREALIZABLE_SCORES, Score};
use crate::progress::{ProgressStatus, StatusFrame};
use crate::symmetry::{Transform, TransformTable};
use std::cell::OnceCell;
use std::rc::Rc;

/// Upper bound on the problem size solvable in `remaining` guesses
///
/// `L(0) = 0`, `L(r + 1) = min(1 + (S - 1) L(r), N)` with `S` realizable
/// scores and `N` codes: one code is hit outright, every other score can
/// at best lead to a problem solvable in one guess fewer.
#[must_use]
pub fn size_limit(remaining: usize) -> usize {
    let mut limit = 0usize;
    for _ in 0..remaining {
        limit = (1 + (NREALIZABLE_SCORES - 1) * limit).min(NCODES);
        if limit == NCODES {
            break;
        }
    }
    limit
}

/// One node of the recursive search
#[derive(Debug)]
pub struct BuilderContext<'p> {
    problem: Vec<Code>,
    parent: Option<&'p BuilderContext<'p>>,
    step: Option<(Code, Score)>,
    preselected: Option<Vec<PartitionResult>>,
    preserving: OnceCell<Rc<Vec<Transform>>>,
    status: ProgressStatus,
}

impl<'p> BuilderContext<'p> {
    /// Top-level node, optionally with a fixed list of candidates
    #[must_use]
    pub fn root(problem: Vec<Code>, preselected: Option<Vec<PartitionResult>>) -> Self {
        let status = ProgressStatus::new(problem.len());
        Self {
            problem,
            parent: None,
            step: None,
            preselected,
            preserving: OnceCell::new(),
            status,
        }
    }

    /// Node for the bucket reached by playing `guess` and scoring `score`
    #[must_use]
    pub fn child(&'p self, problem: Vec<Code>, guess: Code, score: Score) -> Self {
        let status = ProgressStatus::new(problem.len());
        Self {
            problem,
            parent: Some(self),
            step: Some((guess, score)),
            preselected: None,
            preserving: OnceCell::new(),
            status,
        }
    }

    #[must_use]
    pub fn problem(&self) -> &[Code] {
        &self.problem
    }

    #[must_use]
    pub fn problem_size(&self) -> usize {
        self.problem.len()
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&'p BuilderContext<'p>> {
        self.parent
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Candidates fixed by the caller, if any
    #[must_use]
    pub fn preselected(&self) -> Option<&[PartitionResult]> {
        self.preselected.as_deref()
    }

    /// Guess that led to this node
    #[must_use]
    pub fn last_guess(&self) -> Option<Code> {
        self.step.map(|(guess, _)| guess)
    }

    /// Number of guesses played before this node
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// `(guess, score)` pairs from the root down to this node
    #[must_use]
    pub fn path(&self) -> Vec<(Code, Score)> {
        let mut path: Vec<_> = self.ancestors().filter_map(|ctx| ctx.step).collect();
        path.reverse();
        path
    }

    /// Guesses from the root down to this node
    #[must_use]
    pub fn prefix(&self) -> Vec<Code> {
        self.path().into_iter().map(|(guess, _)| guess).collect()
    }

    /// This node, then its parent, up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = &BuilderContext<'p>> {
        std::iter::successors(Some(self), |ctx| ctx.parent)
    }

    /// Whether the size bound allows a solution in `remaining` guesses
    ///
    /// A necessary condition only.
    #[must_use]
    pub fn possible(&self, remaining: usize) -> bool {
        remaining > 0 && self.problem.len() <= size_limit(remaining)
    }

    #[must_use]
    pub const fn status(&self) -> &ProgressStatus {
        &self.status
    }

    /// Status frames from this node up to the root
    #[must_use]
    pub fn status_chain(&self) -> Vec<StatusFrame> {
        self.ancestors().map(|ctx| ctx.status.frame()).collect()
    }

    /// Transforms mapping this node's problem onto itself and fixing the path
    ///
    /// The root starts from the whole group when its problem is every code,
    /// otherwise from the stabilizer of its problem. A child keeps the
    /// parent's transforms that also fix the guess leading to it.
    pub fn preserving(&self, table: &TransformTable) -> Rc<Vec<Transform>> {
        Rc::clone(self.preserving.get_or_init(|| match (self.parent, self.step) {
            (Some(parent), Some((guess, _))) => {
                let inherited = parent.preserving(table);
                if inherited.len() <= 1 {
                    inherited
                } else {
                    Rc::new(table.preserving(&[guess], &inherited))
                }
            }
            _ if self.problem.len() == NCODES => Rc::new(table.all().to_vec()),
            _ => Rc::new(table.stabilizer(&self.problem, table.all())),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScoreTable;
    use std::sync::OnceLock;

    fn transforms() -> &'static TransformTable {
        static TABLE: OnceLock<TransformTable> = OnceLock::new();
        TABLE.get_or_init(TransformTable::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    #[test]
    fn size_limits() {
        assert_eq!(size_limit(0), 0);
        assert_eq!(size_limit(1), 1);
        assert_eq!(size_limit(2), 14);
        assert_eq!(size_limit(3), 183);
        assert_eq!(size_limit(4), 1296);
        assert_eq!(size_limit(10), 1296);
    }

    #[test]
    fn possible_respects_budget() {
        let ctx = BuilderContext::root((0..14).map(code).collect(), None);
        assert!(!ctx.possible(0));
        assert!(!ctx.possible(1));
        assert!(ctx.possible(2));

        let ctx = BuilderContext::root((0..15).map(code).collect(), None);
        assert!(!ctx.possible(2));
        assert!(ctx.possible(3));
    }

    #[test]
    fn path_and_prefix_follow_parents() {
        let scores = ScoreTable::new();
        let root = BuilderContext::root(Code::all().collect(), None);
        let s1 = scores.score(code(8), code(100));
        let child = root.child(vec![code(100), code(101)], code(8), s1);
        let s2 = scores.score(code(51), code(100));
        let grandchild = child.child(vec![code(100)], code(51), s2);

        assert_eq!(grandchild.depth(), 2);
        assert_eq!(grandchild.path(), vec![(code(8), s1), (code(51), s2)]);
        assert_eq!(grandchild.prefix(), vec![code(8), code(51)]);
        assert_eq!(grandchild.last_guess(), Some(code(51)));
        assert!(root.is_root() && root.prefix().is_empty());

        let chain = grandchild.status_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].problem_size, 1);
        assert_eq!(chain[2].problem_size, 1296);
    }

    #[test]
    fn preserving_narrows_down_the_path() {
        let table = transforms();
        let root = BuilderContext::root(Code::all().collect(), None);
        assert_eq!(root.preserving(table).len(), table.all().len());

        let child = root.child(vec![code(1)], code(0), Score::PERFECT);
        let kept = child.preserving(table);
        assert!(kept.len() < table.all().len());
        assert!(kept.iter().all(|&t| table.apply(t, code(0)) == code(0)));
        assert!(kept.contains(&Transform::IDENTITY));
    }

    #[test]
    fn partial_root_uses_stabilizer() {
        let table = transforms();
        let problem: Vec<Code> = vec![code(0), code(1295)];
        let root = BuilderContext::root(problem.clone(), None);
        let kept = root.preserving(table);
        assert!(kept.contains(&Transform::IDENTITY));
        for &t in kept.iter() {
            for &c in &problem {
                assert!(problem.contains(&table.apply(t, c)));
            }
        }
    }
}
