//! The algorithm registry: named, parameterized formulas resolved by id at
//! config-load time and re-evaluated on every stats projection or level-up.
//!
//! Two families live here: [`growth`] (base stat -> leveled stat) and
//! [`level_cost`] (level delta -> resource cost). Both are plain functions
//! keyed by a string id rather than a trait object registry, since the set
//! of algorithms is closed and small.
pub mod growth;
pub mod level_cost;

use thiserror::Error;

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    #[error("unknown algorithm id '{0}'")]
    UnknownAlgorithm(String),

    #[error("algorithm '{algorithm_id}' requires param '{param}'")]
    MissingParam {
        algorithm_id: String,
        param: &'static str,
    },

    #[error("algorithm '{algorithm_id}' param '{param}' has the wrong type")]
    WrongParamType {
        algorithm_id: String,
        param: &'static str,
    },

    #[error("cost key '{0}' is missing its 'player.' or 'character.' scope prefix")]
    InvalidCostResourceKey(String),
}

impl GameError for AlgorithmError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            AlgorithmError::InvalidCostResourceKey(_) => "INVALID_COST_RESOURCE_KEY",
            _ => "INVALID_CONFIG_REFERENCE",
        }
    }
}

fn param_f64(
    params: &serde_json::Value,
    algorithm_id: &str,
    key: &'static str,
) -> Result<f64, AlgorithmError> {
    let value = params.get(key).ok_or_else(|| AlgorithmError::MissingParam {
        algorithm_id: algorithm_id.to_string(),
        param: key,
    })?;
    value.as_f64().ok_or_else(|| AlgorithmError::WrongParamType {
        algorithm_id: algorithm_id.to_string(),
        param: key,
    })
}

/// A resource key scoped to either the owning player or the character
/// itself, as produced by parsing a `"player.<id>"` / `"character.<id>"`
/// cost-table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostScope {
    Player,
    Character,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedResource {
    pub scope: CostScope,
    pub resource_id: String,
}

/// Splits a `"player.gold"` / `"character.mana"` cost-table key into its
/// scope and resource id.
pub fn parse_scoped_key(key: &str) -> Result<ScopedResource, AlgorithmError> {
    if let Some(resource_id) = key.strip_prefix("player.") {
        Ok(ScopedResource {
            scope: CostScope::Player,
            resource_id: resource_id.to_string(),
        })
    } else if let Some(resource_id) = key.strip_prefix("character.") {
        Ok(ScopedResource {
            scope: CostScope::Character,
            resource_id: resource_id.to_string(),
        })
    } else {
        Err(AlgorithmError::InvalidCostResourceKey(key.to_string()))
    }
}
