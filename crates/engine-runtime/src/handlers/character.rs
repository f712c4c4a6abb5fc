//! `CreateCharacter`, `LevelUpCharacter`, `GrantCharacterResources`.

use engine_core::{Character, GameConfig, GameError, GameState, level_cost};

use super::{apply_scoped_costs, field_resources, field_str, field_u32_or, require_owned_player_mut, TxOutcome};
use crate::auth::Principal;

pub fn create_character(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    fields: &serde_json::Value,
) -> TxOutcome {
    let (Some(player_id), Some(character_id), Some(class_id)) = (
        field_str(fields, "playerId"),
        field_str(fields, "characterId"),
        field_str(fields, "classId"),
    ) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    if player.characters.contains_key(character_id) {
        return TxOutcome::rejected("ALREADY_EXISTS");
    }
    if !config.classes.contains_key(class_id) {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    }

    player
        .characters
        .insert(character_id.to_string(), Character::new(class_id));
    TxOutcome::Accepted
}

pub fn level_up_character(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    fields: &serde_json::Value,
) -> TxOutcome {
    let (Some(player_id), Some(character_id)) =
        (field_str(fields, "playerId"), field_str(fields, "characterId"))
    else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let Some(levels) = field_u32_or(fields, "levels", 1) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    let Some(current_level) = player.characters.get(character_id).map(|c| c.level) else {
        return TxOutcome::rejected("CHARACTER_NOT_FOUND");
    };

    let target_level = current_level + levels;
    if target_level > config.max_level {
        return TxOutcome::rejected("MAX_LEVEL_REACHED");
    }

    let cost = match level_cost::total_cost(&config.algorithms.level_cost_character, current_level, levels) {
        Ok(cost) => cost,
        Err(error) => return TxOutcome::infrastructure(error.error_code(), error.to_string()),
    };

    if let Err(outcome) = apply_scoped_costs(player, character_id, &cost) {
        return outcome;
    }

    player.characters.get_mut(character_id).unwrap().level = target_level;
    TxOutcome::Accepted
}

pub fn grant_character_resources(state: &mut GameState, fields: &serde_json::Value) -> TxOutcome {
    let (Some(player_id), Some(character_id), Some(resources)) = (
        field_str(fields, "playerId"),
        field_str(fields, "characterId"),
        field_resources(fields, "resources"),
    ) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    let Some(player) = state.players.get_mut(player_id) else {
        return TxOutcome::rejected("PLAYER_NOT_FOUND");
    };
    let Some(character) = player.characters.get_mut(character_id) else {
        return TxOutcome::rejected("CHARACTER_NOT_FOUND");
    };

    for (resource_id, amount) in resources {
        character.grant(&resource_id, amount);
    }
    TxOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use engine_core::config::Algorithms;
    use engine_core::{Actor, AlgorithmSpec, ClassDef, Player};

    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            game_config_id: "cfg".into(),
            max_level: 10,
            stats: vec!["hp".into()],
            slots: vec!["weapon".into()],
            classes: std::collections::BTreeMap::from([("warrior".into(), ClassDef::default())]),
            gear_defs: std::collections::BTreeMap::new(),
            sets: std::collections::BTreeMap::new(),
            algorithms: Algorithms {
                growth: AlgorithmSpec::new("flat"),
                level_cost_character: AlgorithmSpec::with_params(
                    "linear_cost",
                    serde_json::json!({ "resourceId": "player.gold", "base": 100.0, "perLevel": 0.0 }),
                ),
                level_cost_gear: AlgorithmSpec::new("free"),
            },
            stat_clamps: std::collections::BTreeMap::new(),
        }
    }

    fn state_with_owned_player() -> (GameState, Principal) {
        let mut state = GameState::new("inst-1", "cfg-1");
        let mut actor = Actor::new("k1");
        actor.player_ids.push("p1".into());
        state.actors.insert("a1".into(), actor);
        state.players.insert("p1".into(), Player::new());
        (state, Principal::Actor { actor_id: "a1".into() })
    }

    #[test]
    fn create_character_rejects_unknown_class() {
        let (mut state, principal) = state_with_owned_player();
        let outcome = create_character(
            &mut state,
            &config(),
            &principal,
            &serde_json::json!({"playerId": "p1", "characterId": "c1", "classId": "mage"}),
        );
        assert!(matches!(outcome, TxOutcome::Rejected { code: "INVALID_CONFIG_REFERENCE", .. }));
    }

    #[test]
    fn level_up_character_rejects_when_out_of_gold() {
        let (mut state, principal) = state_with_owned_player();
        create_character(
            &mut state,
            &config(),
            &principal,
            &serde_json::json!({"playerId": "p1", "characterId": "c1", "classId": "warrior"}),
        );
        let outcome = level_up_character(
            &mut state,
            &config(),
            &principal,
            &serde_json::json!({"playerId": "p1", "characterId": "c1", "levels": 1}),
        );
        assert!(matches!(outcome, TxOutcome::Rejected { code: "INSUFFICIENT_RESOURCES", .. }));
    }

    #[test]
    fn level_up_character_deducts_cost_and_advances_level() {
        let (mut state, principal) = state_with_owned_player();
        create_character(
            &mut state,
            &config(),
            &principal,
            &serde_json::json!({"playerId": "p1", "characterId": "c1", "classId": "warrior"}),
        );
        state.players.get_mut("p1").unwrap().grant("gold", 100);
        let outcome = level_up_character(
            &mut state,
            &config(),
            &principal,
            &serde_json::json!({"playerId": "p1", "characterId": "c1", "levels": 1}),
        );
        assert!(matches!(outcome, TxOutcome::Accepted));
        assert_eq!(state.players["p1"].characters["c1"].level, 2);
        assert_eq!(state.players["p1"].balance("gold"), 0);
    }
}
