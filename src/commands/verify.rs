//! Tree verification command
//!
//! Replays a JSON tree against the full code set, re-deriving every
//! partition, and reports each node whose stored data disagrees.

use crate::core::{Code, Score, ScoreTable};
use crate::error::{MastermindError, Result};
use crate::output::{NodeDocument, TreeDocument};
use crate::solver::PartitionResult;
use rustc_hash::FxHashSet;
use std::fmt;

/// One disagreement between a stored node and the replayed game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Guesses and scores leading to the node
    pub path: Vec<(Code, Score)>,
    pub reason: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "root")?;
        }
        for (i, (guess, score)) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{guess}{score}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of verifying a tree
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub nodes_checked: usize,
    /// Distinct secrets solved by the tree
    pub solved: usize,
    pub max_depth: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Verify a tree document built over the full code set
///
/// # Errors
/// Returns `Validation` if the document holds no tree.
pub fn verify_document(doc: &TreeDocument, scores: &ScoreTable) -> Result<VerifyReport> {
    let root = doc
        .tree
        .as_ref()
        .ok_or_else(|| MastermindError::Validation("Document holds no tree".to_string()))?;
    let problem: Vec<Code> = Code::all().collect();
    let mut report = verify_node(root, &problem, scores);

    if report.max_depth > doc.max_levels {
        report.mismatches.push(Mismatch {
            path: Vec::new(),
            reason: format!(
                "tree needs {} guesses but was built for {}",
                report.max_depth, doc.max_levels
            ),
        });
    }
    Ok(report)
}

/// Verify the subtree `node` against the secrets in `problem`
#[must_use]
pub fn verify_node(node: &NodeDocument, problem: &[Code], scores: &ScoreTable) -> VerifyReport {
    let mut walk = Walk {
        scores,
        solved: FxHashSet::default(),
        report: VerifyReport::default(),
        path: Vec::new(),
    };
    walk.check(node, problem);

    let mut report = walk.report;
    report.solved = walk.solved.len();
    if report.solved != problem.len() {
        report.mismatches.push(Mismatch {
            path: Vec::new(),
            reason: format!("{} of {} secrets solved", report.solved, problem.len()),
        });
    }
    report
}

struct Walk<'a> {
    scores: &'a ScoreTable,
    solved: FxHashSet<Code>,
    report: VerifyReport,
    path: Vec<(Code, Score)>,
}

impl Walk<'_> {
    fn mismatch(&mut self, reason: String) {
        self.report.mismatches.push(Mismatch {
            path: self.path.clone(),
            reason,
        });
    }

    fn check(&mut self, node: &NodeDocument, problem: &[Code]) {
        self.report.nodes_checked += 1;
        self.report.max_depth = self.report.max_depth.max(self.path.len() + 1);

        let root = match Code::new(node.root) {
            Ok(code) => code,
            Err(e) => return self.mismatch(e.to_string()),
        };

        if node.problem_size != problem.len() {
            self.mismatch(format!(
                "problem_size is {} but {} secrets reach this node",
                node.problem_size,
                problem.len()
            ));
        }

        let pr = PartitionResult::new(problem, root, self.scores);
        if node.in_solution != pr.stats().in_solution {
            self.mismatch(format!(
                "in_solution is {} but guess {root} {} a live secret",
                node.in_solution,
                if pr.stats().in_solution { "is" } else { "is not" }
            ));
        }
        if pr.stats().in_solution && !self.solved.insert(root) {
            self.mismatch(format!("secret {root} solved twice"));
        }

        for &key in node.children.keys() {
            match Score::from_value(key) {
                Ok(score) if score.is_perfect() => {
                    self.mismatch("child under the perfect score".to_string());
                }
                Ok(score) if pr.part(score).is_empty() => {
                    self.mismatch(format!("child under unreachable score {score}"));
                }
                Ok(_) => {}
                Err(e) => self.mismatch(e.to_string()),
            }
        }

        for score in pr.scores_by_size() {
            if score.is_perfect() {
                continue;
            }
            let part = pr.part(score);
            match node.children.get(&score.value()) {
                Some(child) => {
                    self.path.push((root, score));
                    self.check(child, part);
                    self.path.pop();
                }
                None => self.mismatch(format!(
                    "{} secrets under score {score} have no subtree",
                    part.len()
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Tree;
    use std::sync::OnceLock;

    fn scores() -> &'static ScoreTable {
        static TABLE: OnceLock<ScoreTable> = OnceLock::new();
        TABLE.get_or_init(ScoreTable::new)
    }

    fn code(value: u16) -> Code {
        Code::new(value).unwrap()
    }

    fn optimal_node() -> (Vec<Code>, NodeDocument) {
        let problem = vec![code(0), code(1), code(7)];
        let pr = PartitionResult::new(&problem, code(0), scores());
        let tree = Tree::optimal(&pr).unwrap();
        (problem, NodeDocument::from(&tree))
    }

    #[test]
    fn consistent_tree_passes() {
        let (problem, node) = optimal_node();
        let report = verify_node(&node, &problem, scores());
        assert!(report.is_ok(), "{:?}", report.mismatches);
        assert_eq!(report.nodes_checked, 3);
        assert_eq!(report.solved, 3);
        assert_eq!(report.max_depth, 2);
    }

    #[test]
    fn wrong_problem_size_reported() {
        let (problem, mut node) = optimal_node();
        node.problem_size = 4;
        let report = verify_node(&node, &problem, scores());
        assert_eq!(report.mismatches.len(), 1);
        assert!(report.mismatches[0].path.is_empty());
        assert!(report.mismatches[0].reason.contains("problem_size"));
    }

    #[test]
    fn missing_subtree_reported() {
        let (problem, mut node) = optimal_node();
        let key = *node.children.keys().next().unwrap();
        node.children.remove(&key);
        let report = verify_node(&node, &problem, scores());
        assert!(!report.is_ok());
        assert!(
            report
                .mismatches
                .iter()
                .any(|m| m.reason.contains("have no subtree"))
        );
        assert_eq!(report.solved, 2);
    }

    #[test]
    fn mismatch_path_names_the_node() {
        let (problem, mut node) = optimal_node();
        let child = node.children.values_mut().next().unwrap();
        child.problem_size = 9;
        let report = verify_node(&node, &problem, scores());
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].path.len(), 1);
        assert_eq!(report.mismatches[0].path[0].0, code(0));
        assert!(report.mismatches[0].to_string().starts_with("[0000]("));
    }
}
