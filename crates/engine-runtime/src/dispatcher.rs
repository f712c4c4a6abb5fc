//! The transaction dispatcher: envelope validation, idempotency, authorization,
//! routing, and the `stateVersion` bump — the orchestration every transaction
//! type shares, wrapped around the per-type handlers in [`crate::handlers`].

use engine_core::{GameConfig, GameState};
use serde::Serialize;

use crate::auth::{self, Principal};
use crate::handlers::{self, TxOutcome};
use crate::idempotency::IdempotencyStore;

const ADMIN_ONLY_TYPES: &[&str] = &["CreateActor", "GrantResources", "GrantCharacterResources"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub tx_id: String,
    pub accepted: bool,
    pub state_version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub struct DispatchResult {
    pub http_status: u16,
    pub body: serde_json::Value,
}

fn envelope_error(message: impl Into<String>) -> DispatchResult {
    DispatchResult {
        http_status: 400,
        body: serde_json::json!({ "error": message.into() }),
    }
}

fn finalize(tx_id: &str, http_status: u16, outcome: &TxOutcome, state_version: u64) -> DispatchResult {
    let (accepted, error_code, error_message) = match outcome {
        TxOutcome::Accepted => (true, None, None),
        TxOutcome::Rejected { code, message } => (false, Some(code.to_string()), message.clone()),
        TxOutcome::Infrastructure { code, message } => {
            (false, Some(code.to_string()), Some(message.clone()))
        }
    };
    let response = TxResponse {
        tx_id: tx_id.to_string(),
        accepted,
        state_version,
        error_code,
        error_message,
    };
    DispatchResult {
        http_status,
        body: serde_json::to_value(response).expect("TxResponse always serializes"),
    }
}

/// Dispatches one transaction body against `state`, mutating it on accept.
///
/// `path_instance_id` is the `gameInstanceId` the request arrived under
/// (resolved by whoever owns the per-instance writer); a body whose own
/// `gameInstanceId` disagrees is an `INSTANCE_MISMATCH` envelope error before
/// anything else runs.
pub fn dispatch(
    state: &mut GameState,
    config: &GameConfig,
    admin_api_key: Option<&str>,
    idempotency: &IdempotencyStore,
    path_instance_id: &str,
    bearer_token: Option<&str>,
    body: &serde_json::Value,
) -> DispatchResult {
    let Some(body_instance_id) = body.get("gameInstanceId").and_then(serde_json::Value::as_str) else {
        return envelope_error("missing or non-string 'gameInstanceId'");
    };
    if body_instance_id != path_instance_id {
        return envelope_error("INSTANCE_MISMATCH: gameInstanceId does not match the request path");
    }

    let Some(tx_id) = body.get("txId").and_then(serde_json::Value::as_str) else {
        return envelope_error("missing or non-string 'txId'");
    };
    let Some(tx_type) = body.get("type").and_then(serde_json::Value::as_str) else {
        return envelope_error("missing or non-string 'type'");
    };

    if let Some(cached) = idempotency.get(&state.tx_id_cache, tx_id) {
        return DispatchResult {
            http_status: cached.status_code,
            body: cached.body,
        };
    }

    let principal = auth::authorize(state, admin_api_key, bearer_token);
    let Some(principal) = principal else {
        let result = finalize(tx_id, 401, &TxOutcome::rejected("UNAUTHORIZED"), state.state_version);
        idempotency.record(&mut state.tx_id_cache, tx_id, result.http_status, result.body.clone());
        return result;
    };
    if ADMIN_ONLY_TYPES.contains(&tx_type) && !principal.is_admin() {
        let result = finalize(tx_id, 401, &TxOutcome::rejected("UNAUTHORIZED"), state.state_version);
        idempotency.record(&mut state.tx_id_cache, tx_id, result.http_status, result.body.clone());
        return result;
    }

    let outcome = route(state, config, &principal, tx_type, body);

    if matches!(outcome, TxOutcome::Accepted) {
        state.state_version += 1;
    }
    let http_status = match outcome {
        TxOutcome::Infrastructure { .. } => 500,
        _ => 200,
    };
    let result = finalize(tx_id, http_status, &outcome, state.state_version);
    idempotency.record(&mut state.tx_id_cache, tx_id, result.http_status, result.body.clone());
    result
}

fn route(
    state: &mut GameState,
    config: &GameConfig,
    principal: &Principal,
    tx_type: &str,
    body: &serde_json::Value,
) -> TxOutcome {
    match tx_type {
        "CreateActor" => handlers::create_actor(state, body),
        "CreatePlayer" => handlers::create_player(state, principal, body),
        "CreateCharacter" => handlers::create_character(state, config, principal, body),
        "CreateGear" => handlers::create_gear(state, config, principal, body),
        "EquipGear" => handlers::equip_gear(state, config, principal, body),
        "UnequipGear" => handlers::unequip_gear(state, principal, body),
        "LevelUpCharacter" => handlers::level_up_character(state, config, principal, body),
        "LevelUpGear" => handlers::level_up_gear(state, config, principal, body),
        "GrantResources" => handlers::grant_resources(state, body),
        "GrantCharacterResources" => handlers::grant_character_resources(state, body),
        _ => TxOutcome::rejected("UNSUPPORTED_TX_TYPE"),
    }
}
