//! Whole-state JSON snapshots: one `<gameInstanceId>.json` file per instance,
//! written atomically via a `.tmp` sibling and `fs::rename`.
//!
//! Grounded in the atomic-write idiom a file-backed state repository uses
//! elsewhere in this codebase: write the full payload to a temp path in the
//! same directory, then rename over the target so a reader never observes a
//! partially written file.

use std::path::{Path, PathBuf};

use engine_core::GameState;
use tracing::{debug, warn};

use crate::error::EngineError;

pub struct SnapshotManager {
    directory: PathBuf,
}

impl SnapshotManager {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, game_instance_id: &str) -> PathBuf {
        self.directory.join(format!("{game_instance_id}.json"))
    }

    /// Writes `state` to `<gameInstanceId>.json`, creating the snapshot
    /// directory if needed. The serialized form is schema-validated first;
    /// a failure logs and skips the write rather than leaving a partial or
    /// malformed file behind. Serialization itself failing is a caller bug
    /// (a `GameState` always round-trips through serde) and is not treated
    /// as a skippable I/O hiccup.
    pub fn save(&self, state: &GameState) -> Result<(), EngineError> {
        let value = serde_json::to_value(state).expect("GameState always serializes");
        if let Err(reason) = validate_schema(&value) {
            warn!(instance = %state.game_instance_id, %reason, "skipping snapshot write: failed schema validation");
            return Ok(());
        }
        std::fs::create_dir_all(&self.directory)?;
        let target = self.path_for(&state.game_instance_id);
        let tmp = target.with_extension("json.tmp");
        let payload = serde_json::to_vec_pretty(&value).expect("value always serializes");
        std::fs::write(&tmp, payload)?;
        std::fs::rename(&tmp, &target)?;
        debug!(instance = %state.game_instance_id, path = %target.display(), "wrote snapshot");
        Ok(())
    }

    /// Loads every `*.json` file in the snapshot directory, skipping and
    /// logging any that fail to parse rather than aborting startup — a
    /// corrupt snapshot for one instance must not take the rest down with it.
    pub fn load_all(&self) -> Result<Vec<GameState>, EngineError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let mut states = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match load_one(&path) {
                Ok(state) => states.push(state),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable snapshot");
                }
            }
        }
        Ok(states)
    }
}

fn load_one(path: &Path) -> Result<GameState, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
    validate_schema(&value).map_err(EngineError::ConfigParse)?;
    serde_json::from_value(value).map_err(|e| EngineError::ConfigParse(e.to_string()))
}

/// Checks the shape the spec describes for a persisted snapshot:
/// `gameInstanceId`, `gameConfigId`, `stateVersion`, `players`, `actors`
/// required, `txIdCache` optional.
fn validate_schema(value: &serde_json::Value) -> Result<(), String> {
    let object = value
        .as_object()
        .ok_or_else(|| "snapshot is not a JSON object".to_string())?;
    for field in ["gameInstanceId", "gameConfigId", "stateVersion", "players", "actors"] {
        if !object.contains_key(field) {
            return Err(format!("snapshot missing required field '{field}'"));
        }
    }
    Ok(())
}
