//! Restores a possibly-stale [`GameState`] to a shape the current
//! [`GameConfig`] can serve, applying a fixed sequence of idempotent repair
//! rules rather than failing the restore outright.

use engine_core::{GameConfig, GameState};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationEntry {
    pub rule: &'static str,
    pub entity_type: &'static str,
    pub entity_id: String,
    pub detail: String,
}

/// Applies every repair rule once, in order, and returns the migrated state
/// alongside a report of what changed. Never fails — a restore with no
/// matching config is still served, just with its `gameConfigId` cleared.
pub fn migrate(mut state: GameState, config: &GameConfig) -> (GameState, Vec<MigrationEntry>) {
    let mut report = Vec::new();

    if state.game_config_id != config.game_config_id {
        report.push(MigrationEntry {
            rule: "reset_unknown_config",
            entity_type: "instance",
            entity_id: state.game_instance_id.clone(),
            detail: format!(
                "gameConfigId '{}' is not the active config; reset to '{}'",
                state.game_config_id, config.game_config_id
            ),
        });
        state.game_config_id = config.game_config_id.clone();
    }

    for (player_id, player) in state.players.iter_mut() {
        let unknown_classes: Vec<String> = player
            .characters
            .iter()
            .filter(|(_, c)| !config.classes.contains_key(&c.class_id))
            .map(|(id, _)| id.clone())
            .collect();
        for character_id in &unknown_classes {
            player.characters.remove(character_id);
            report.push(MigrationEntry {
                rule: "drop_character_unknown_class",
                entity_type: "character",
                entity_id: format!("{player_id}/{character_id}"),
                detail: "references a classId absent from the active config".into(),
            });
        }

        for (character_id, character) in player.characters.iter_mut() {
            let clamped = character.level.clamp(1, config.max_level);
            if clamped != character.level {
                report.push(MigrationEntry {
                    rule: "clamp_character_level",
                    entity_type: "character",
                    entity_id: format!("{player_id}/{character_id}"),
                    detail: format!("level {} clamped to {clamped}", character.level),
                });
                character.level = clamped;
            }
        }

        let unknown_gear_defs: Vec<String> = player
            .gear
            .iter()
            .filter(|(_, g)| !config.gear_defs.contains_key(&g.gear_def_id))
            .map(|(id, _)| id.clone())
            .collect();
        for gear_id in &unknown_gear_defs {
            player.gear.remove(gear_id);
            report.push(MigrationEntry {
                rule: "drop_gear_unknown_def",
                entity_type: "gear",
                entity_id: format!("{player_id}/{gear_id}"),
                detail: "references a gearDefId absent from the active config".into(),
            });
            for (character_id, character) in player.characters.iter_mut() {
                let dangling: Vec<String> = character
                    .equipped
                    .iter()
                    .filter(|(_, equipped_gear_id)| *equipped_gear_id == gear_id)
                    .map(|(slot, _)| slot.clone())
                    .collect();
                for slot in dangling {
                    character.equipped.remove(&slot);
                    report.push(MigrationEntry {
                        rule: "drop_equipped_unknown_gear",
                        entity_type: "character",
                        entity_id: format!("{player_id}/{character_id}"),
                        detail: format!("cleared slot '{slot}' referencing removed gear '{gear_id}'"),
                    });
                }
            }
        }

        for (character_id, character) in player.characters.iter_mut() {
            let invalid_slots: Vec<String> = character
                .equipped
                .keys()
                .filter(|slot| !config.slots.contains(slot))
                .cloned()
                .collect();
            for slot in invalid_slots {
                character.equipped.remove(&slot);
                report.push(MigrationEntry {
                    rule: "drop_equipped_unknown_slot",
                    entity_type: "character",
                    entity_id: format!("{player_id}/{character_id}"),
                    detail: format!("slot '{slot}' is absent from the active config"),
                });
            }
            let vanished: Vec<String> = character
                .equipped
                .iter()
                .filter(|(_, gear_id)| !player.gear.contains_key(*gear_id))
                .map(|(slot, _)| slot.clone())
                .collect();
            for slot in vanished {
                character.equipped.remove(&slot);
                report.push(MigrationEntry {
                    rule: "drop_equipped_vanished_gear",
                    entity_type: "character",
                    entity_id: format!("{player_id}/{character_id}"),
                    detail: format!("slot '{slot}' referenced a gear id no longer owned by this player"),
                });
            }
        }

        let equipped_by_character: std::collections::BTreeMap<String, String> = player
            .characters
            .iter()
            .flat_map(|(character_id, character)| {
                character
                    .equipped
                    .values()
                    .map(move |gear_id| (gear_id.clone(), character_id.clone()))
            })
            .collect();
        for (gear_id, gear) in player.gear.iter_mut() {
            let truth = equipped_by_character.get(gear_id).cloned();
            if gear.equipped_by != truth {
                report.push(MigrationEntry {
                    rule: "reconcile_equipped_by",
                    entity_type: "gear",
                    entity_id: format!("{player_id}/{gear_id}"),
                    detail: format!("equippedBy {:?} did not match character state; set to {:?}", gear.equipped_by, truth),
                });
                gear.equipped_by = truth;
            }
        }
    }

    (state, report)
}

#[cfg(test)]
mod tests {
    use engine_core::config::Algorithms;
    use engine_core::{AlgorithmSpec, Character, ClassDef, GearDef, GearInstance, Player};

    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            game_config_id: "cfg-active".into(),
            max_level: 10,
            stats: vec!["hp".into()],
            slots: vec!["main_hand".into()],
            classes: std::collections::BTreeMap::from([("warrior".into(), ClassDef::default())]),
            gear_defs: std::collections::BTreeMap::from([("sword".into(), GearDef::default())]),
            sets: std::collections::BTreeMap::new(),
            algorithms: Algorithms {
                growth: AlgorithmSpec::new("flat"),
                level_cost_character: AlgorithmSpec::new("free"),
                level_cost_gear: AlgorithmSpec::new("free"),
            },
            stat_clamps: std::collections::BTreeMap::new(),
        }
    }

    #[test]
    fn resets_stale_config_id() {
        let state = GameState::new("inst-1", "cfg-old");
        let (migrated, report) = migrate(state, &config());
        assert_eq!(migrated.game_config_id, "cfg-active");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn drops_character_with_unknown_class_and_clamps_level() {
        let mut state = GameState::new("inst-1", "cfg-active");
        let mut player = Player::new();
        player.characters.insert("c1".into(), Character::new("ghost_class"));
        let mut overleveled = Character::new("warrior");
        overleveled.level = 999;
        player.characters.insert("c2".into(), overleveled);
        state.players.insert("p1".into(), player);

        let (migrated, report) = migrate(state, &config());
        assert!(!migrated.players["p1"].characters.contains_key("c1"));
        assert_eq!(migrated.players["p1"].characters["c2"].level, 10);
        assert!(report.iter().any(|e| e.rule == "drop_character_unknown_class"));
        assert!(report.iter().any(|e| e.rule == "clamp_character_level"));
    }

    #[test]
    fn reconciles_equipped_by_from_character_side() {
        let mut state = GameState::new("inst-1", "cfg-active");
        let mut player = Player::new();
        let mut character = Character::new("warrior");
        character.equipped.insert("main_hand".into(), "g1".into());
        player.characters.insert("c1".into(), character);
        let mut gear = GearInstance::new("sword");
        gear.equipped_by = Some("wrong_character".into());
        player.gear.insert("g1".into(), gear);
        state.players.insert("p1".into(), player);

        let (migrated, report) = migrate(state, &config());
        assert_eq!(migrated.players["p1"].gear["g1"].equipped_by.as_deref(), Some("c1"));
        assert!(report.iter().any(|e| e.rule == "reconcile_equipped_by"));
    }
}
