//! JSON export of built trees
//!
//! ```text
//! { "tree": <node> | null,
//!   "metrics": { "elapsed_secs", "entry_count", "first_guess"? },
//!   "strategy": "...", "max_levels": n }
//! node = { "root", "in_solution", "problem_size", "stats", "pr_stats",
//!          "children"?: { "<score value>": node } }
//! ```
//!
//! Leaves carry no `children` key. Documents read back into the same types.

use crate::error::Result;
use crate::solver::{PartitionStats, Tree, TreeResult, TreeStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A serialized [`TreeResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub tree: Option<NodeDocument>,
    pub metrics: MetricsDocument,
    pub strategy: String,
    pub max_levels: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    pub elapsed_secs: f64,
    pub entry_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_guess: Option<u16>,
}

/// Tree stats plus the derived average game length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsDocument {
    #[serde(flatten)]
    pub stats: TreeStats,
    pub average_game_length: f64,
}

/// A serialized tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub root: u16,
    pub in_solution: bool,
    pub problem_size: usize,
    pub stats: StatsDocument,
    pub pr_stats: PartitionStats,
    /// Keyed by score value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<u8, NodeDocument>,
}

impl From<&Tree> for NodeDocument {
    fn from(tree: &Tree) -> Self {
        let stats = *tree.stats();
        Self {
            root: tree.root().value(),
            in_solution: tree.in_solution(),
            problem_size: stats.problem_size,
            stats: StatsDocument {
                stats,
                average_game_length: stats.average_game_length(),
            },
            pr_stats: *tree.pr_stats(),
            children: tree
                .children()
                .map(|(score, child)| (score.value(), Self::from(child)))
                .collect(),
        }
    }
}

impl NodeDocument {
    /// Number of nodes in this subtree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Self::node_count).sum::<usize>()
    }
}

impl From<&TreeResult> for TreeDocument {
    fn from(result: &TreeResult) -> Self {
        Self {
            tree: result.tree.as_ref().map(NodeDocument::from),
            metrics: MetricsDocument {
                elapsed_secs: result.metrics.elapsed_secs,
                entry_count: result.metrics.entry_count,
                first_guess: result.metrics.first_guess.map(|c| c.value()),
            },
            strategy: result.strategy.clone(),
            max_levels: result.max_levels,
        }
    }
}

impl TreeDocument {
    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    /// Returns `Json` if the text is not a tree document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    /// Returns `Io` or `Json` on failure.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// # Errors
    /// Returns `Io` or `Json` on failure.
    pub fn read(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
