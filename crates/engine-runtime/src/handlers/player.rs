//! `CreateActor`, `CreatePlayer`, `GrantResources`.

use engine_core::{Actor, GameState, Player};

use super::{field_resources, field_str, TxOutcome};
use crate::auth::Principal;

/// Admin-only: registers a new actor credential. `ALREADY_EXISTS` if
/// `actorId` is taken, `DUPLICATE_API_KEY` if another actor already holds
/// `apiKey`.
pub fn create_actor(state: &mut GameState, fields: &serde_json::Value) -> TxOutcome {
    let Some(actor_id) = field_str(fields, "actorId") else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let Some(api_key) = field_str(fields, "apiKey") else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    if state.actors.contains_key(actor_id) {
        return TxOutcome::rejected("ALREADY_EXISTS");
    }
    if state.has_api_key(api_key) {
        return TxOutcome::rejected("DUPLICATE_API_KEY");
    }

    state.actors.insert(actor_id.to_string(), Actor::new(api_key));
    TxOutcome::Accepted
}

/// Creates a player and associates it with the calling actor. `ALREADY_EXISTS`
/// if `playerId` already names a player in this instance.
pub fn create_player(state: &mut GameState, principal: &Principal, fields: &serde_json::Value) -> TxOutcome {
    let Some(actor_id) = principal.actor_id() else {
        return TxOutcome::rejected("UNAUTHORIZED");
    };
    let Some(player_id) = field_str(fields, "playerId") else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    if state.players.contains_key(player_id) {
        return TxOutcome::rejected("ALREADY_EXISTS");
    }

    state.players.insert(player_id.to_string(), Player::new());
    if let Some(actor) = state.actors.get_mut(actor_id) {
        actor.player_ids.push(player_id.to_string());
    }
    TxOutcome::Accepted
}

/// Admin-only: adjusts a player's resource wallet. Negative values are
/// permitted — the wallet is allowed to go negative, matching
/// [`Player::grant`]'s documented behavior.
pub fn grant_resources(state: &mut GameState, fields: &serde_json::Value) -> TxOutcome {
    let Some(player_id) = field_str(fields, "playerId") else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };
    let Some(resources) = field_resources(fields, "resources") else {
        return TxOutcome::rejected("INVALID_CONFIG_REFERENCE");
    };

    let Some(player) = state.players.get_mut(player_id) else {
        return TxOutcome::rejected("PLAYER_NOT_FOUND");
    };
    for (resource_id, amount) in resources {
        player.grant(&resource_id, amount);
    }
    TxOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_state() -> GameState {
        GameState::new("inst-1", "cfg-1")
    }

    #[test]
    fn create_actor_rejects_duplicate_api_key() {
        let mut state = admin_state();
        assert!(matches!(
            create_actor(&mut state, &serde_json::json!({"actorId": "a1", "apiKey": "k1"})),
            TxOutcome::Accepted
        ));
        assert!(matches!(
            create_actor(&mut state, &serde_json::json!({"actorId": "a2", "apiKey": "k1"})),
            TxOutcome::Rejected { code: "DUPLICATE_API_KEY", .. }
        ));
    }

    #[test]
    fn create_player_associates_to_caller() {
        let mut state = admin_state();
        create_actor(&mut state, &serde_json::json!({"actorId": "a1", "apiKey": "k1"}));
        let principal = Principal::Actor { actor_id: "a1".into() };
        let outcome = create_player(&mut state, &principal, &serde_json::json!({"playerId": "p1"}));
        assert!(matches!(outcome, TxOutcome::Accepted));
        assert!(state.actors["a1"].owns_player("p1"));
    }

    #[test]
    fn grant_resources_allows_negative_balance() {
        let mut state = admin_state();
        state.players.insert("p1".into(), Player::new());
        grant_resources(&mut state, &serde_json::json!({"playerId": "p1", "resources": {"gold": 10}}));
        grant_resources(&mut state, &serde_json::json!({"playerId": "p1", "resources": {"gold": -25}}));
        assert_eq!(state.players["p1"].balance("gold"), -15);
    }
}
