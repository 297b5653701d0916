//! Distinct prefix enumeration command

use crate::core::Code;
use crate::error::{MastermindError, Result};
use crate::symmetry::{DistinctFollowers, PrefixEntry};
use crate::tables::Tables;

/// Configuration for enumerating prefixes
pub struct PrefixConfig {
    /// First guess, as a code value
    pub first: u16,
    /// Longest prefix to report
    pub max_len: usize,
    pub skip_non_reducing: bool,
}

/// Enumerate distinct prefixes depth first
///
/// # Errors
/// Returns `Validation` for a first guess outside the code space and
/// `Configuration` for a zero length.
pub fn list_prefixes(config: &PrefixConfig, tables: &Tables) -> Result<Vec<PrefixEntry>> {
    let first = Code::new(config.first)?;
    if config.max_len == 0 {
        return Err(MastermindError::Configuration(
            "Prefix length must be positive".to_string(),
        ));
    }

    Ok(DistinctFollowers::new(&tables.transforms)
        .skip_non_reducing(config.skip_non_reducing)
        .prefixes(first, config.max_len))
}
