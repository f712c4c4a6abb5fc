//! Authoritative game state representation.
//!
//! This module owns the data structures that describe actors, players,
//! characters, and gear for a single game instance. The runtime mutates
//! these exclusively through its transaction handlers; nothing here
//! performs I/O.
mod actor;
mod character;
mod gear;
mod player;

pub use actor::Actor;
pub use character::Character;
pub use gear::GearInstance;
pub use player::Player;

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// A single cached transaction outcome, kept so idempotent replays return the
/// exact body and status of the original commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIdCacheEntry {
    pub tx_id: String,
    pub status_code: u16,
    pub body: serde_json::Value,
}

/// Canonical in-memory state for one `gameInstanceId`.
///
/// `players` and `actors` are keyed by their client-chosen ids; `tx_id_cache`
/// preserves FIFO insertion order so it round-trips through a snapshot
/// exactly as the live [`crate::state::TxIdCacheEntry`] order requires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_instance_id: String,
    pub game_config_id: String,
    pub state_version: u64,
    pub players: BTreeMap<String, Player>,
    pub actors: BTreeMap<String, Actor>,
    /// Absent in snapshots written before idempotency tracking existed.
    #[serde(default)]
    pub tx_id_cache: VecDeque<TxIdCacheEntry>,
}

impl GameState {
    pub fn new(game_instance_id: impl Into<String>, game_config_id: impl Into<String>) -> Self {
        Self {
            game_instance_id: game_instance_id.into(),
            game_config_id: game_config_id.into(),
            state_version: 0,
            players: BTreeMap::new(),
            actors: BTreeMap::new(),
            tx_id_cache: VecDeque::new(),
        }
    }

    /// Looks up the actor that owns `api_key`, if any.
    pub fn actor_by_api_key(&self, api_key: &str) -> Option<(&str, &Actor)> {
        self.actors
            .iter()
            .find(|(_, actor)| actor.api_key == api_key)
            .map(|(id, actor)| (id.as_str(), actor))
    }

    /// True if any actor of this instance is already using `api_key`.
    pub fn has_api_key(&self, api_key: &str) -> bool {
        self.actors.values().any(|actor| actor.api_key == api_key)
    }

    /// Finds the gear instance equipped anywhere in the instance by id,
    /// returning the owning player id alongside it. Used by restriction and
    /// invariant checks that must reason about a gearId without already
    /// knowing its owner.
    pub fn find_gear(&self, gear_id: &str) -> Option<(&str, &GearInstance)> {
        self.players.iter().find_map(|(player_id, player)| {
            player
                .gear
                .get(gear_id)
                .map(|gear| (player_id.as_str(), gear))
        })
    }
}
