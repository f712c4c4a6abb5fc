//! Per-transaction-type precondition checks and mutations.
//!
//! Handlers never fail with a Rust `Err` — every precondition violation is a
//! [`TxOutcome::Rejected`] the dispatcher turns into a `200 accepted=false`
//! response. Only a config algorithm that throws during cost computation
//! escalates to [`TxOutcome::Infrastructure`] (HTTP 500).
mod character;
mod gear;
mod player;

use engine_core::algorithms::{parse_scoped_key, CostScope};
use engine_core::{GameState, Player};

use crate::auth::Principal;

pub use character::{create_character, grant_character_resources, level_up_character};
pub use gear::{create_gear, equip_gear, level_up_gear, unequip_gear};
pub use player::{create_actor, create_player, grant_resources};

#[derive(Debug)]
pub enum TxOutcome {
    Accepted,
    Rejected {
        code: &'static str,
        message: Option<String>,
    },
    Infrastructure {
        code: &'static str,
        message: String,
    },
}

impl TxOutcome {
    pub fn rejected(code: &'static str) -> Self {
        TxOutcome::Rejected { code, message: None }
    }

    pub fn rejected_with(code: &'static str, message: impl Into<String>) -> Self {
        TxOutcome::Rejected {
            code,
            message: Some(message.into()),
        }
    }

    pub fn infrastructure(code: &'static str, message: impl Into<String>) -> Self {
        TxOutcome::Infrastructure {
            code,
            message: message.into(),
        }
    }
}

/// `PLAYER_NOT_FOUND` whether the player is missing or simply not owned by
/// `principal` — the same anti-enumeration treatment the read endpoints give
/// ownership checks in §4.3.
pub(crate) fn require_owned_player<'a>(
    state: &'a GameState,
    principal: &Principal,
    player_id: &str,
) -> Result<&'a engine_core::Player, TxOutcome> {
    let owns = principal
        .actor_id()
        .is_some_and(|actor_id| crate::auth::actor_owns_player(state, actor_id, player_id));
    if !owns {
        return Err(TxOutcome::rejected("PLAYER_NOT_FOUND"));
    }
    state
        .players
        .get(player_id)
        .ok_or_else(|| TxOutcome::rejected("PLAYER_NOT_FOUND"))
}

pub(crate) fn require_owned_player_mut<'a>(
    state: &'a mut GameState,
    principal: &Principal,
    player_id: &str,
) -> Result<&'a mut engine_core::Player, TxOutcome> {
    let owns = principal
        .actor_id()
        .is_some_and(|actor_id| crate::auth::actor_owns_player(state, actor_id, player_id));
    if !owns {
        return Err(TxOutcome::rejected("PLAYER_NOT_FOUND"));
    }
    state
        .players
        .get_mut(player_id)
        .ok_or_else(|| TxOutcome::rejected("PLAYER_NOT_FOUND"))
}

pub(crate) fn field_str<'a>(fields: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(serde_json::Value::as_str)
}

pub(crate) fn field_u32(fields: &serde_json::Value, key: &str) -> Option<u32> {
    fields.get(key).and_then(serde_json::Value::as_u64).and_then(|v| u32::try_from(v).ok())
}

/// `levels` on `LevelUpCharacter`/`LevelUpGear` defaults to 1 when omitted;
/// a present-but-wrong-typed value is still a precondition failure.
pub(crate) fn field_u32_or(fields: &serde_json::Value, key: &str, default: u32) -> Option<u32> {
    if fields.get(key).is_none() {
        return Some(default);
    }
    field_u32(fields, key)
}

pub(crate) fn field_resources(
    fields: &serde_json::Value,
    key: &str,
) -> Option<std::collections::BTreeMap<String, i64>> {
    let object = fields.get(key)?.as_object()?;
    let mut resources = std::collections::BTreeMap::new();
    for (k, v) in object {
        resources.insert(k.clone(), v.as_i64()?);
    }
    Some(resources)
}

/// Deducts a `"player.<id>" / "character.<id>"`-scoped cost table from
/// `player`'s own wallet and `character_id`'s wallet. Checked in full before
/// any deduction happens, so a shortfall on one resource never leaves another
/// partially spent.
pub(crate) fn apply_scoped_costs(
    player: &mut Player,
    character_id: &str,
    costs: &std::collections::BTreeMap<String, i64>,
) -> Result<(), TxOutcome> {
    for (key, amount) in costs {
        let scoped = parse_scoped_key(key)
            .map_err(|e| TxOutcome::infrastructure("INVALID_CONFIG_REFERENCE", e.to_string()))?;
        let balance = match scoped.scope {
            CostScope::Player => player.balance(&scoped.resource_id),
            CostScope::Character => player
                .characters
                .get(character_id)
                .map(|c| c.balance(&scoped.resource_id))
                .unwrap_or(0),
        };
        if balance < *amount {
            return Err(TxOutcome::rejected("INSUFFICIENT_RESOURCES"));
        }
    }

    for (key, amount) in costs {
        let scoped = parse_scoped_key(key).expect("validated above");
        match scoped.scope {
            CostScope::Player => player.grant(&scoped.resource_id, -amount),
            CostScope::Character => {
                if let Some(character) = player.characters.get_mut(character_id) {
                    character.grant(&scoped.resource_id, -amount);
                }
            }
        }
    }
    Ok(())
}
