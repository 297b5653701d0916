//! Strategy tree search
//!
//! Partitioning, trees, evaluators, candidate strategies, and the recursive
//! builder that ties them together.

mod builder;
mod context;
mod evaluator;
mod partition;
pub mod strategy;
mod tree;

pub use builder::{BuildMetrics, DEFAULT_REPORTING_CYCLE, TreeBuilder, TreeResult};
pub use context::{BuilderContext, size_limit};
pub use evaluator::{EvaluationState, Evaluator};
pub use partition::{LongSignature, PartitionResult, PartitionStats, Signature, SignatureEntry};
pub use strategy::{
    OptimizeProperty, PartitionObjective, RandomStrategy, STRATEGY_NAMES, ScanDistinct, Strategy,
    StrategyType,
};
pub use tree::{Tree, TreeStats};
