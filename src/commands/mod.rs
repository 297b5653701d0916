//! Command implementations

pub mod analyze;
pub mod build;
pub mod list;
pub mod monitor;
pub mod prefixes;
pub mod verify;

pub use analyze::{AnalysisReport, GuessAnalysis, SignatureClass, analyze_guesses, resolve_guesses};
pub use build::{BuildConfig, BuildPlan, DEFAULT_MAX_DEPTH, run_build};
pub use list::{StrategyInfo, list_strategies};
pub use monitor::run_monitor;
pub use prefixes::{PrefixConfig, list_prefixes};
pub use verify::{Mismatch, VerifyReport, verify_document, verify_node};
