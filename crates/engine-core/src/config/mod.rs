//! Game configuration: the immutable, per-`gameConfigId` ruleset that
//! transaction handlers and the stats pipeline consult.
//!
//! Config is parsed once at startup (see `engine-runtime::config`) and
//! shared by reference afterward — nothing in this module mutates a
//! `GameConfig` in place.
pub mod algorithm;
pub mod validate;

pub use algorithm::AlgorithmSpec;
pub use validate::ConfigError;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-class base stats before growth is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    #[serde(default)]
    pub base_stats: BTreeMap<String, i64>,
}

/// Class/level restrictions evaluated by `EquipGear`, in the fixed order
/// `allowedClasses` → `blockedClasses` → `requiredCharacterLevel` →
/// `maxLevelDelta`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default)]
    pub allowed_classes: Option<Vec<String>>,
    #[serde(default)]
    pub blocked_classes: Option<Vec<String>>,
    #[serde(default)]
    pub required_character_level: Option<u32>,
    #[serde(default)]
    pub max_level_delta: Option<i64>,
}

/// A gear definition: base stats, the slot patterns it can occupy, optional
/// set membership, and optional equip restrictions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GearDef {
    #[serde(default)]
    pub base_stats: BTreeMap<String, i64>,
    pub equip_patterns: Vec<Vec<String>>,
    #[serde(default)]
    pub set_id: Option<String>,
    #[serde(default)]
    pub set_piece_count: Option<u32>,
    #[serde(default)]
    pub restrictions: Option<Restrictions>,
}

/// A flat stat bonus unlocked once `pieces` distinct set members are
/// equipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBonus {
    pub pieces: u32,
    #[serde(default)]
    pub bonus_stats: BTreeMap<String, i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetDef {
    #[serde(default)]
    pub bonuses: Vec<SetBonus>,
}

/// Inclusive clamp applied to a finalized stat value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatClamp {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// The three algorithm slots a config selects: growth and the two level-cost
/// families.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Algorithms {
    pub growth: AlgorithmSpec,
    pub level_cost_character: AlgorithmSpec,
    pub level_cost_gear: AlgorithmSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub game_config_id: String,
    pub max_level: u32,
    pub stats: Vec<String>,
    pub slots: Vec<String>,
    #[serde(default)]
    pub classes: BTreeMap<String, ClassDef>,
    #[serde(default)]
    pub gear_defs: BTreeMap<String, GearDef>,
    #[serde(default)]
    pub sets: BTreeMap<String, SetDef>,
    pub algorithms: Algorithms,
    #[serde(default)]
    pub stat_clamps: BTreeMap<String, StatClamp>,
}

impl GameConfig {
    pub fn clamp(&self, stat_id: &str, value: i64) -> i64 {
        let Some(clamp) = self.stat_clamps.get(stat_id) else {
            return value;
        };
        let mut value = value;
        if let Some(min) = clamp.min {
            value = value.max(min);
        }
        if let Some(max) = clamp.max {
            value = value.min(max);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> GameConfig {
        GameConfig {
            game_config_id: "cfg".into(),
            max_level: 10,
            stats: vec!["strength".into(), "hp".into()],
            slots: vec!["weapon".into()],
            classes: BTreeMap::new(),
            gear_defs: BTreeMap::new(),
            sets: BTreeMap::new(),
            algorithms: Algorithms {
                growth: AlgorithmSpec::new("flat"),
                level_cost_character: AlgorithmSpec::new("free"),
                level_cost_gear: AlgorithmSpec::new("free"),
            },
            stat_clamps: BTreeMap::new(),
        }
    }

    #[test]
    fn clamp_applies_both_bounds() {
        let mut config = minimal_config();
        config
            .stat_clamps
            .insert("strength".into(), StatClamp { min: Some(0), max: Some(10) });
        assert_eq!(config.clamp("strength", -5), 0);
        assert_eq!(config.clamp("strength", 99), 10);
        assert_eq!(config.clamp("strength", 5), 5);
    }

    #[test]
    fn clamp_is_noop_without_entry() {
        let config = minimal_config();
        assert_eq!(config.clamp("hp", 42), 42);
    }
}
