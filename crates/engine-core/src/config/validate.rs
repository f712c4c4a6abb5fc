//! Structural validation run once when a [`super::GameConfig`] is loaded.

use thiserror::Error;

use crate::algorithms::{level_cost, growth};
use crate::error::{ErrorSeverity, GameError};

use super::GameConfig;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("algorithms.growth references unknown algorithm id '{0}'")]
    UnknownGrowthAlgorithm(String),

    #[error("algorithms.levelCostCharacter references unknown algorithm id '{0}'")]
    UnknownCharacterCostAlgorithm(String),

    #[error("algorithms.levelCostGear references unknown algorithm id '{0}'")]
    UnknownGearCostAlgorithm(String),

    #[error(
        "gearDefs.{gear_def_id}.restrictions sets both allowedClasses and blockedClasses; they are mutually exclusive"
    )]
    RestrictionsNotExclusive { gear_def_id: String },

    #[error("gearDefs.{gear_def_id} has no equipPatterns")]
    EmptyEquipPatterns { gear_def_id: String },

    #[error(
        "gearDefs.{gear_def_id}.equipPatterns references slot '{slot}' which is not in config.slots"
    )]
    UnknownSlotInPattern { gear_def_id: String, slot: String },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "INVALID_CONFIG_REFERENCE"
    }
}

/// Structurally validates a freshly-parsed config, resolving algorithm ids
/// and checking the restriction/slot invariants that the handlers assume
/// hold for every config they are ever handed.
pub fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    if !growth::is_known(&config.algorithms.growth.algorithm_id) {
        return Err(ConfigError::UnknownGrowthAlgorithm(
            config.algorithms.growth.algorithm_id.clone(),
        ));
    }
    if !level_cost::is_known(&config.algorithms.level_cost_character.algorithm_id) {
        return Err(ConfigError::UnknownCharacterCostAlgorithm(
            config.algorithms.level_cost_character.algorithm_id.clone(),
        ));
    }
    if !level_cost::is_known(&config.algorithms.level_cost_gear.algorithm_id) {
        return Err(ConfigError::UnknownGearCostAlgorithm(
            config.algorithms.level_cost_gear.algorithm_id.clone(),
        ));
    }

    for (gear_def_id, gear_def) in &config.gear_defs {
        if gear_def.equip_patterns.is_empty() {
            return Err(ConfigError::EmptyEquipPatterns {
                gear_def_id: gear_def_id.clone(),
            });
        }
        for pattern in &gear_def.equip_patterns {
            for slot in pattern {
                if !config.slots.iter().any(|s| s == slot) {
                    return Err(ConfigError::UnknownSlotInPattern {
                        gear_def_id: gear_def_id.clone(),
                        slot: slot.clone(),
                    });
                }
            }
        }
        if let Some(restrictions) = &gear_def.restrictions
            && restrictions.allowed_classes.is_some()
            && restrictions.blocked_classes.is_some()
        {
            return Err(ConfigError::RestrictionsNotExclusive {
                gear_def_id: gear_def_id.clone(),
            });
        }
    }

    Ok(())
}
