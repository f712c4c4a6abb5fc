//! The derived-stats projection pipeline: classBase -> growth -> gear sum ->
//! set bonuses -> clamp.
//!
//! Projection is pure and re-run on demand rather than cached in
//! [`crate::state::GameState`] — nothing here mutates state, and nothing in
//! state stores a projected stat.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::{self, growth};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Player;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("character '{0}' does not exist")]
    UnknownCharacter(String),

    #[error("character references unknown class '{0}'")]
    UnknownClass(String),

    #[error("equipped gear instance '{0}' does not exist")]
    UnknownGearInstance(String),

    #[error("gear instance '{gear_id}' references unknown gearDef '{gear_def_id}'")]
    UnknownGearDef { gear_id: String, gear_def_id: String },

    #[error(transparent)]
    Growth(#[from] algorithms::AlgorithmError),
}

impl GameError for StatsError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "INVALID_CONFIG_REFERENCE"
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsProjection {
    pub character_id: String,
    pub class_id: String,
    pub level: u32,
    pub final_stats: BTreeMap<String, i64>,
}

/// Projects a character's final, clamped stats from class base, growth,
/// equipped gear, and set bonuses.
pub fn project_stats(
    config: &GameConfig,
    player: &Player,
    character_id: &str,
) -> Result<StatsProjection, StatsError> {
    let character = player
        .characters
        .get(character_id)
        .ok_or_else(|| StatsError::UnknownCharacter(character_id.to_string()))?;

    let class = config
        .classes
        .get(&character.class_id)
        .ok_or_else(|| StatsError::UnknownClass(character.class_id.clone()))?;

    let mut stats: BTreeMap<String, i64> = BTreeMap::new();
    for stat_id in &config.stats {
        let base = class.base_stats.get(stat_id).copied().unwrap_or(0);
        let leveled = growth::apply(&config.algorithms.growth, stat_id, base, character.level)?;
        stats.insert(stat_id.clone(), leveled);
    }

    let mut set_piece_counts: BTreeMap<String, u32> = BTreeMap::new();

    for gear_id in character.distinct_equipped_gear() {
        let gear = player
            .gear
            .get(gear_id)
            .ok_or_else(|| StatsError::UnknownGearInstance(gear_id.to_string()))?;
        let gear_def = config.gear_defs.get(&gear.gear_def_id).ok_or_else(|| {
            StatsError::UnknownGearDef {
                gear_id: gear_id.to_string(),
                gear_def_id: gear.gear_def_id.clone(),
            }
        })?;

        for stat_id in &config.stats {
            let base = gear_def.base_stats.get(stat_id).copied().unwrap_or(0);
            let scaled = growth::apply(&config.algorithms.growth, stat_id, base, gear.level)?;
            *stats.entry(stat_id.clone()).or_insert(0) += scaled;
        }

        if let Some(set_id) = &gear_def.set_id {
            let pieces = gear_def.set_piece_count.unwrap_or(1);
            *set_piece_counts.entry(set_id.clone()).or_insert(0) += pieces;
        }
    }

    for (set_id, count) in &set_piece_counts {
        let Some(set_def) = config.sets.get(set_id) else {
            // A set referenced by a gearDef but absent from config.sets
            // contributes no bonus; it is not a validation error.
            continue;
        };
        for bonus in &set_def.bonuses {
            if bonus.pieces <= *count {
                for (stat_id, value) in &bonus.bonus_stats {
                    *stats.entry(stat_id.clone()).or_insert(0) += value;
                }
            }
        }
    }

    for (stat_id, value) in stats.iter_mut() {
        *value = config.clamp(stat_id, *value);
    }

    Ok(StatsProjection {
        character_id: character_id.to_string(),
        class_id: character.class_id.clone(),
        level: character.level,
        final_stats: stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmSpec, Algorithms, ClassDef, GearDef, SetBonus, SetDef, StatClamp};
    use crate::state::{Character, GearInstance};

    fn config_with(
        classes: BTreeMap<String, ClassDef>,
        gear_defs: BTreeMap<String, GearDef>,
        sets: BTreeMap<String, SetDef>,
    ) -> GameConfig {
        GameConfig {
            game_config_id: "cfg".into(),
            max_level: 50,
            stats: vec!["strength".into(), "hp".into()],
            slots: vec!["main_hand".into(), "off_hand".into(), "chest".into()],
            classes,
            gear_defs,
            sets,
            algorithms: Algorithms {
                growth: AlgorithmSpec::new("flat"),
                level_cost_character: AlgorithmSpec::new("free"),
                level_cost_gear: AlgorithmSpec::new("free"),
            },
            stat_clamps: BTreeMap::new(),
        }
    }

    #[test]
    fn projects_class_base_with_flat_growth() {
        let mut classes = BTreeMap::new();
        classes.insert(
            "warrior".into(),
            ClassDef {
                base_stats: BTreeMap::from([("strength".into(), 10), ("hp".into(), 100)]),
            },
        );
        let config = config_with(classes, BTreeMap::new(), BTreeMap::new());

        let mut player = Player::new();
        player
            .characters
            .insert("char1".into(), Character::new("warrior"));

        let projection = project_stats(&config, &player, "char1").unwrap();
        assert_eq!(projection.final_stats.get("strength"), Some(&10));
        assert_eq!(projection.final_stats.get("hp"), Some(&100));
    }

    #[test]
    fn gear_contributes_and_multi_slot_items_do_not_double_count() {
        let mut classes = BTreeMap::new();
        classes.insert(
            "warrior".into(),
            ClassDef {
                base_stats: BTreeMap::from([("strength".into(), 10), ("hp".into(), 100)]),
            },
        );
        let mut gear_defs = BTreeMap::new();
        gear_defs.insert(
            "greatsword".into(),
            GearDef {
                base_stats: BTreeMap::from([("strength".into(), 5)]),
                equip_patterns: vec![vec!["main_hand".into(), "off_hand".into()]],
                ..Default::default()
            },
        );
        let config = config_with(classes, gear_defs, BTreeMap::new());

        let mut player = Player::new();
        let mut character = Character::new("warrior");
        character.equipped.insert("main_hand".into(), "g1".into());
        character.equipped.insert("off_hand".into(), "g1".into());
        player.characters.insert("char1".into(), character);
        player
            .gear
            .insert("g1".into(), GearInstance::new("greatsword"));

        let projection = project_stats(&config, &player, "char1").unwrap();
        assert_eq!(projection.final_stats.get("strength"), Some(&15));
    }

    #[test]
    fn gear_contributes_additive_growth_for_a_stat_it_does_not_list() {
        let mut classes = BTreeMap::new();
        classes.insert(
            "warrior".into(),
            ClassDef {
                base_stats: BTreeMap::from([("strength".into(), 10), ("hp".into(), 100)]),
            },
        );
        let mut gear_defs = BTreeMap::new();
        gear_defs.insert(
            "greatsword".into(),
            GearDef {
                // Only lists strength; hp is absent from this gearDef's base_stats.
                base_stats: BTreeMap::from([("strength".into(), 5)]),
                equip_patterns: vec![vec!["main_hand".into()]],
                ..Default::default()
            },
        );
        let mut config = config_with(classes, gear_defs, BTreeMap::new());
        config.algorithms.growth = AlgorithmSpec::with_params(
            "linear",
            serde_json::json!({ "perLevelMultiplier": 0.0, "additivePerLevel": { "hp": 1.0 } }),
        );

        let mut player = Player::new();
        let mut character = Character::new("warrior");
        character.equipped.insert("main_hand".into(), "g1".into());
        player.characters.insert("char1".into(), character);
        let mut gear = GearInstance::new("greatsword");
        gear.level = 3;
        player.gear.insert("g1".into(), gear);

        // Character stays level 1 (class hp unscaled: 100). Gear is level 3
        // (steps=2); its absent "hp" entry still grows additively:
        // base=0, additive=1.0 -> 0 + 1.0*2 = 2 on top of the class's 100.
        let projection = project_stats(&config, &player, "char1").unwrap();
        assert_eq!(projection.final_stats.get("hp"), Some(&102));
    }

    #[test]
    fn set_bonus_unlocks_once_piece_threshold_met() {
        let mut classes = BTreeMap::new();
        classes.insert(
            "warrior".into(),
            ClassDef {
                base_stats: BTreeMap::from([("strength".into(), 0), ("hp".into(), 0)]),
            },
        );
        let mut gear_defs = BTreeMap::new();
        for (id, slot) in [("helm", "chest"), ("cloak", "main_hand")] {
            gear_defs.insert(
                id.into(),
                GearDef {
                    set_id: Some("dragon".into()),
                    equip_patterns: vec![vec![slot.into()]],
                    ..Default::default()
                },
            );
        }
        let mut sets = BTreeMap::new();
        sets.insert(
            "dragon".into(),
            SetDef {
                bonuses: vec![SetBonus {
                    pieces: 2,
                    bonus_stats: BTreeMap::from([("hp".into(), 50)]),
                }],
            },
        );
        let config = config_with(classes, gear_defs, sets);

        let mut player = Player::new();
        let mut character = Character::new("warrior");
        character.equipped.insert("chest".into(), "helm".into());
        character
            .equipped
            .insert("main_hand".into(), "cloak".into());
        player.characters.insert("char1".into(), character);
        player.gear.insert("helm".into(), GearInstance::new("helm"));
        player
            .gear
            .insert("cloak".into(), GearInstance::new("cloak"));

        let projection = project_stats(&config, &player, "char1").unwrap();
        assert_eq!(projection.final_stats.get("hp"), Some(&50));
    }

    #[test]
    fn clamp_applies_after_all_contributions() {
        let mut classes = BTreeMap::new();
        classes.insert(
            "warrior".into(),
            ClassDef {
                base_stats: BTreeMap::from([("strength".into(), 10), ("hp".into(), 0)]),
            },
        );
        let mut config = config_with(classes, BTreeMap::new(), BTreeMap::new());
        config
            .stat_clamps
            .insert("strength".into(), StatClamp { min: None, max: Some(5) });

        let mut player = Player::new();
        player
            .characters
            .insert("char1".into(), Character::new("warrior"));

        let projection = project_stats(&config, &player, "char1").unwrap();
        assert_eq!(projection.final_stats.get("strength"), Some(&5));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let config = config_with(BTreeMap::new(), BTreeMap::new(), BTreeMap::new());
        let player = Player::new();
        assert!(matches!(
            project_stats(&config, &player, "ghost"),
            Err(StatsError::UnknownCharacter(_))
        ));
    }
}
