//! `CreateGear`, `EquipGear`, `UnequipGear`, `LevelUpGear`.

use engine_core::{GameConfig, GameError, GameState, GearInstance, Restrictions, level_cost};

use super::{apply_scoped_costs, field_str, field_u32_or, require_owned_player_mut, TxOutcome};
use crate::auth::Principal;

pub fn create_gear(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    fields: &serde_json::Value,
) -> TxOutcome {
    let (Some(player_id), Some(gear_id), Some(gear_def_id)) = (
        field_str(fields, "playerId"),
        field_str(fields, "gearId"),
        field_str(fields, "gearDefId"),
    ) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    if player.gear.contains_key(gear_id) {
        return TxOutcome::rejected("ALREADY_EXISTS");
    }
    if !config.gear_defs.contains_key(gear_def_id) {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    }

    player.gear.insert(gear_id.to_string(), GearInstance::new(gear_def_id));
    TxOutcome::Accepted
}

/// First restriction that fails, in the fixed evaluation order
/// `allowedClasses` → `blockedClasses` → `requiredCharacterLevel` →
/// `maxLevelDelta`, paired with a diagnostic message.
fn first_violated_restriction(
    restrictions: &Restrictions,
    class_id: &str,
    character_level: u32,
    gear_level: u32,
) -> Option<String> {
    if let Some(allowed) = &restrictions.allowed_classes
        && !allowed.iter().any(|c| c == class_id)
    {
        return Some(format!("class '{class_id}' is not in allowedClasses"));
    }
    if let Some(blocked) = &restrictions.blocked_classes
        && blocked.iter().any(|c| c == class_id)
    {
        return Some(format!("class '{class_id}' is blocked"));
    }
    if let Some(required) = restrictions.required_character_level
        && character_level < required
    {
        return Some(format!(
            "character level {character_level} is below required level {required}"
        ));
    }
    if let Some(max_delta) = restrictions.max_level_delta {
        let delta = gear_level as i64 - character_level as i64;
        if delta > max_delta {
            return Some(format!("gear level {gear_level} exceeds character level {character_level} by more than maxLevelDelta {max_delta}"));
        }
    }
    None
}

fn patterns_match(patterns: &[Vec<String>], requested: &[String]) -> bool {
    let mut requested_sorted = requested.to_vec();
    requested_sorted.sort();
    patterns.iter().any(|pattern| {
        let mut pattern_sorted = pattern.clone();
        pattern_sorted.sort();
        pattern_sorted == requested_sorted
    })
}

pub fn equip_gear(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    fields: &serde_json::Value,
) -> TxOutcome {
    let (Some(player_id), Some(character_id), Some(gear_id)) = (
        field_str(fields, "playerId"),
        field_str(fields, "characterId"),
        field_str(fields, "gearId"),
    ) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let swap = fields.get("swap").and_then(serde_json::Value::as_bool).unwrap_or(false);

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    let Some(gear) = player.gear.get(gear_id) else {
        return TxOutcome::rejected("GEAR_NOT_FOUND");
    };
    let Some(character) = player.characters.get(character_id) else {
        return TxOutcome::rejected("CHARACTER_NOT_FOUND");
    };
    if gear.is_equipped() {
        return TxOutcome::rejected("GEAR_ALREADY_EQUIPPED");
    }
    let Some(gear_def) = config.gear_defs.get(&gear.gear_def_id) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    // `slotPattern` picks one of gearDef's equipPatterns explicitly; omitted,
    // the first pattern whose slots are all currently free is used.
    let requested_slots: Vec<String> = match fields.get("slotPattern") {
        None => match gear_def
            .equip_patterns
            .iter()
            .find(|pattern| pattern.iter().all(|slot| !character.equipped.contains_key(slot)))
        {
            Some(pattern) => pattern.clone(),
            None => return TxOutcome::rejected("SLOT_OCCUPIED"),
        },
        Some(value) => {
            let Some(slots) = value
                .as_array()
                .and_then(|arr| arr.iter().map(|v| v.as_str().map(str::to_string)).collect::<Option<Vec<_>>>())
            else {
                return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
            };
            if let Some(unknown_slot) = slots.iter().find(|slot| !config.slots.contains(slot)) {
                return TxOutcome::rejected_with("INVALID_SLOT", format!("unknown slot '{unknown_slot}'"));
            }
            if !patterns_match(&gear_def.equip_patterns, &slots) {
                return TxOutcome::rejected("PATTERN_MISMATCH");
            }
            slots
        }
    };

    if let Some(restrictions) = &gear_def.restrictions
        && let Some(message) =
            first_violated_restriction(restrictions, &character.class_id, character.level, gear.level)
    {
        return TxOutcome::rejected_with("RESTRICTION_FAILED", message);
    }

    let occupied_by_other: Vec<String> = requested_slots
        .iter()
        .filter_map(|slot| character.equipped.get(slot).cloned())
        .filter(|occupant| occupant != gear_id)
        .collect();
    if !occupied_by_other.is_empty() && !swap {
        return TxOutcome::rejected("SLOT_OCCUPIED");
    }

    for previous_gear_id in &occupied_by_other {
        if let Some(previous) = player.gear.get_mut(previous_gear_id) {
            previous.equipped_by = None;
        }
    }
    let character = player.characters.get_mut(character_id).unwrap();
    for slot in &requested_slots {
        character.equipped.insert(slot.clone(), gear_id.to_string());
    }
    player.gear.get_mut(gear_id).unwrap().equipped_by = Some(character_id.to_string());

    TxOutcome::Accepted
}

pub fn unequip_gear(state: &mut GameState, principal: &Principal, fields: &serde_json::Value) -> TxOutcome {
    let (Some(player_id), Some(gear_id)) =
        (field_str(fields, "playerId"), field_str(fields, "gearId"))
    else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let expected_character_id = field_str(fields, "characterId");

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    let Some(gear) = player.gear.get(gear_id) else {
        return TxOutcome::rejected("GEAR_NOT_FOUND");
    };
    let Some(equipped_by) = gear.equipped_by.clone() else {
        return TxOutcome::rejected("GEAR_NOT_EQUIPPED");
    };
    if let Some(expected) = expected_character_id
        && expected != equipped_by
    {
        return TxOutcome::rejected("CHARACTER_MISMATCH");
    }

    if let Some(character) = player.characters.get_mut(&equipped_by) {
        character.equipped.retain(|_, equipped_gear_id| equipped_gear_id != gear_id);
    }
    player.gear.get_mut(gear_id).unwrap().equipped_by = None;
    TxOutcome::Accepted
}

pub fn level_up_gear(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    fields: &serde_json::Value,
) -> TxOutcome {
    let (Some(player_id), Some(gear_id)) =
        (field_str(fields, "playerId"), field_str(fields, "gearId"))
    else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let Some(levels) = field_u32_or(fields, "levels", 1) else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let character_id = field_str(fields, "characterId");

    let player = match require_owned_player_mut(state, principal, player_id) {
        Ok(player) => player,
        Err(outcome) => return outcome,
    };

    let Some(current_level) = player.gear.get(gear_id).map(|g| g.level) else {
        return TxOutcome::rejected("GEAR_NOT_FOUND");
    };
    let target_level = current_level + levels;
    if target_level > config.max_level {
        return TxOutcome::rejected("MAX_LEVEL_REACHED");
    }

    let cost = match level_cost::total_cost(&config.algorithms.level_cost_gear, current_level, levels) {
        Ok(cost) => cost,
        Err(error) => return TxOutcome::infrastructure(error.error_code(), error.to_string()),
    };

    let needs_character = cost.keys().any(|key| key.starts_with("character."));
    if needs_character && character_id.is_none() {
        return TxOutcome::rejected("CHARACTER_REQUIRED");
    }
    if let Some(character_id) = character_id
        && !player.characters.contains_key(character_id)
    {
        return TxOutcome::rejected("CHARACTER_NOT_FOUND");
    }

    if let Err(outcome) = apply_scoped_costs(player, character_id.unwrap_or(""), &cost) {
        return outcome;
    }

    player.gear.get_mut(gear_id).unwrap().level = target_level;
    TxOutcome::Accepted
}
