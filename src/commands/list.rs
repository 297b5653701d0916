//! Strategy listing command

use crate::error::Result;
use crate::solver::{STRATEGY_NAMES, Strategy, StrategyType};

/// A selectable strategy
pub struct StrategyInfo {
    pub name: &'static str,
    pub description: String,
    pub evaluator: &'static str,
}

/// Every strategy in catalog order
///
/// # Errors
/// Returns `Configuration` if a catalog name fails to resolve.
pub fn list_strategies() -> Result<Vec<StrategyInfo>> {
    STRATEGY_NAMES
        .iter()
        .map(|&name| {
            let strategy = StrategyType::from_name_seeded(name, Some(0))?;
            Ok(StrategyInfo {
                name,
                description: strategy.description(),
                evaluator: strategy.evaluator().name(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_strategy() {
        let infos = list_strategies().unwrap();
        assert_eq!(infos.len(), STRATEGY_NAMES.len());
        assert_eq!(infos[0].name, "random");
        assert!(infos.iter().all(|i| !i.description.is_empty()));
    }

    #[test]
    fn depth_strategies_use_depth_evaluator() {
        let infos = list_strategies().unwrap();
        let depth: Vec<&str> = infos
            .iter()
            .filter(|i| i.name.starts_with("min_depth"))
            .map(|i| i.evaluator)
            .collect();
        assert_eq!(depth.len(), 2);
        assert!(depth.iter().all(|&e| e == depth[0]));
        assert_ne!(depth[0], infos[1].evaluator);
    }
}
