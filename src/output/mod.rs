//! Tree export and terminal output
//!
//! JSON documents for built trees, plus pretty-printing of command results.

pub mod display;
mod export;
pub mod formatters;

pub use display::{
    print_analysis_report, print_build_result, print_prefixes, print_progress_message,
    print_strategies, print_verify_report,
};
pub use export::{MetricsDocument, NodeDocument, StatsDocument, TreeDocument};
