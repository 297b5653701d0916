//! Mastermind Strategy Trees
//!
//! Builds decision trees that solve every secret of 4-position, 6-color
//! Mastermind within a guess budget, using branch-and-bound search over
//! candidate guesses with symmetry reduction.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mastermind_tree::core::{Code, Score};
//!
//! // Codes from colors, position 0 first
//! let guess = Code::encode(&[0, 0, 1, 1]).unwrap();
//! let secret = Code::encode(&[1, 2, 3, 4]).unwrap();
//!
//! // Exact and color-only matches
//! let score = Score::calculate(guess, secret);
//! println!("{guess} vs {secret}: {score}");
//! ```
//!
//! Building a tree:
//!
//! ```rust,no_run
//! use mastermind_tree::core::Code;
//! use mastermind_tree::solver::{StrategyType, TreeBuilder};
//! use mastermind_tree::tables::Tables;
//!
//! let tables = Tables::new();
//! let strategy = StrategyType::from_name("min_largest").unwrap();
//! let result = TreeBuilder::new(strategy, &tables)
//!     .build(Code::all().collect(), 6, None)
//!     .unwrap();
//! if let Some(tree) = result.tree {
//!     println!("average {:.4}", tree.stats().average_game_length());
//! }
//! ```

// Core domain types
pub mod core;

// Symmetry reduction
pub mod symmetry;

// Tree search
pub mod solver;

// Shared lookup tables
pub mod tables;

// Progress reporting
pub mod progress;

// Versioned on-disk cache
pub mod storage;

// Command implementations
pub mod commands;

// Tree export and terminal output
pub mod output;

pub mod error;

pub use error::{MastermindError, Result};
