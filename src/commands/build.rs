//! Tree building command
//!
//! Validates the command-line settings, builds a tree over the full code set
//! and optionally writes it out as JSON.

use crate::core::Code;
use crate::error::{MastermindError, Result};
use crate::output::TreeDocument;
use crate::progress::{ProgressAddress, ProgressSink};
use crate::solver::{DEFAULT_REPORTING_CYCLE, StrategyType, TreeBuilder, TreeResult};
use crate::tables::Tables;
use std::path::PathBuf;
use tracing::info;

/// Default guess budget
pub const DEFAULT_MAX_DEPTH: i64 = 6;

/// Configuration for building a tree
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub strategy: String,
    /// Guess budget; must be positive
    pub max_depth: i64,
    /// Fixed first guess, as a code value
    pub first_guess: Option<i64>,
    /// Where to write the JSON document
    pub output: Option<PathBuf>,
    /// Progress socket address
    pub progress: Option<String>,
    pub reporting_cycle: u64,
    /// Seed for the `random` strategy
    pub seed: Option<u64>,
    /// Show a terminal spinner when no progress socket is given
    pub spinner: bool,
}

impl BuildConfig {
    #[must_use]
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            first_guess: None,
            output: None,
            progress: None,
            reporting_cycle: DEFAULT_REPORTING_CYCLE,
            seed: None,
            spinner: false,
        }
    }

    /// Check every setting before any work starts
    ///
    /// # Errors
    /// Returns `Configuration` for an unknown strategy, a non-positive depth,
    /// or a malformed progress address, and `Validation` for a first guess
    /// outside the code space.
    pub fn validate(&self) -> Result<BuildPlan> {
        let strategy = StrategyType::from_name_seeded(&self.strategy, self.seed)?;

        let max_depth = usize::try_from(self.max_depth)
            .ok()
            .filter(|&d| d > 0)
            .ok_or_else(|| {
                MastermindError::Configuration(format!(
                    "Max depth must be positive, got {}",
                    self.max_depth
                ))
            })?;

        let first_guess = self
            .first_guess
            .map(|value| {
                u16::try_from(value)
                    .map_err(|_| {
                        MastermindError::Validation(format!("Code value {value} out of range"))
                    })
                    .and_then(Code::new)
            })
            .transpose()?;

        let progress = self
            .progress
            .as_deref()
            .map(ProgressAddress::parse)
            .transpose()?;

        Ok(BuildPlan {
            strategy,
            max_depth,
            first_guess,
            progress,
            output: self.output.clone(),
            reporting_cycle: self.reporting_cycle,
            spinner: self.spinner,
        })
    }
}

/// Validated build settings
///
/// The `random` strategy draws its seed during validation, so a plan is
/// built once and handed to [`run_build`].
#[derive(Debug)]
pub struct BuildPlan {
    pub strategy: StrategyType,
    pub max_depth: usize,
    pub first_guess: Option<Code>,
    pub progress: Option<ProgressAddress>,
    pub output: Option<PathBuf>,
    pub reporting_cycle: u64,
    pub spinner: bool,
}

/// Build a tree over the full code set
///
/// # Errors
///
/// Returns an error if:
/// - The progress socket cannot be opened
/// - The tree fails its size accounting
/// - The output file cannot be written
pub fn run_build(plan: BuildPlan, tables: &Tables) -> Result<TreeResult> {
    let sink = match &plan.progress {
        Some(address) => ProgressSink::connect(address)?,
        None if plan.spinner => ProgressSink::spinner(),
        None => ProgressSink::Silent,
    };

    let mut builder =
        TreeBuilder::new(plan.strategy, tables).with_progress(sink, plan.reporting_cycle);
    let result = builder.build(Code::all().collect(), plan.max_depth, plan.first_guess)?;

    if let Some(path) = &plan.output {
        TreeDocument::from(&result).write(path)?;
        info!("tree written to {}", path.display());
    }

    Ok(result)
}
