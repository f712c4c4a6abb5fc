//! Bearer-token authorization: resolves the `Authorization` header against
//! the process-wide admin key and an instance's actors.

use engine_core::GameState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Principal {
    Admin,
    Actor { actor_id: String },
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    pub fn actor_id(&self) -> Option<&str> {
        match self {
            Principal::Actor { actor_id } => Some(actor_id),
            Principal::Admin => None,
        }
    }
}

/// Extracts the bearer token from an `Authorization` header value of the
/// exact form `"Bearer <token>"` (single space). Any other shape, including
/// a missing header, yields no token.
pub fn parse_bearer_token(header_value: Option<&str>) -> Option<&str> {
    header_value.and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolves a bearer token to a [`Principal`] against `state` and the
/// process-wide `admin_api_key`.
///
/// Admin key comparison happens before actor lookup: a configured admin key
/// always wins a collision with some actor's `apiKey`.
pub fn authorize(
    state: &GameState,
    admin_api_key: Option<&str>,
    token: Option<&str>,
) -> Option<Principal> {
    let token = token?;

    if let Some(admin_key) = admin_api_key
        && token == admin_key
    {
        return Some(Principal::Admin);
    }

    state
        .actor_by_api_key(token)
        .map(|(actor_id, _)| Principal::Actor {
            actor_id: actor_id.to_string(),
        })
}

/// True iff `actor_id` owns `player_id` in `state`.
pub fn actor_owns_player(state: &GameState, actor_id: &str, player_id: &str) -> bool {
    state
        .actors
        .get(actor_id)
        .is_some_and(|actor| actor.owns_player(player_id))
}

#[cfg(test)]
mod tests {
    use engine_core::Actor;

    use super::*;

    fn state_with_actor(actor_id: &str, api_key: &str, player_id: &str) -> GameState {
        let mut state = GameState::new("inst-1", "cfg-1");
        let mut actor = Actor::new(api_key);
        actor.player_ids.push(player_id.to_string());
        state.actors.insert(actor_id.to_string(), actor);
        state
    }

    #[test]
    fn parse_bearer_token_requires_exact_prefix() {
        assert_eq!(parse_bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(parse_bearer_token(Some("bearer abc")), None);
        assert_eq!(parse_bearer_token(Some("Bearerabc")), None);
        assert_eq!(parse_bearer_token(None), None);
    }

    #[test]
    fn admin_key_wins_over_actor_apikey_collision() {
        let state = state_with_actor("actor-1", "shared-key", "p1");
        let principal = authorize(&state, Some("shared-key"), Some("shared-key")).unwrap();
        assert_eq!(principal, Principal::Admin);
    }

    #[test]
    fn unknown_token_resolves_to_no_principal() {
        let state = state_with_actor("actor-1", "k1", "p1");
        assert!(authorize(&state, Some("admin-key"), Some("nope")).is_none());
    }

    #[test]
    fn actor_owns_player_reflects_membership() {
        let state = state_with_actor("actor-1", "k1", "p1");
        assert!(actor_owns_player(&state, "actor-1", "p1"));
        assert!(!actor_owns_player(&state, "actor-1", "p2"));
    }
}
