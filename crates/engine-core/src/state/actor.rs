use serde::{Deserialize, Serialize};

/// Credential principal created by the admin `CreateActor` transaction.
///
/// `api_key` must be unique among actors of the owning [`crate::GameState`];
/// the dispatcher's authorization step resolves a bearer token to an actor by
/// scanning for this value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub api_key: String,
    pub player_ids: Vec<String>,
}

impl Actor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            player_ids: Vec::new(),
        }
    }

    pub fn owns_player(&self, player_id: &str) -> bool {
        self.player_ids.iter().any(|id| id == player_id)
    }
}
