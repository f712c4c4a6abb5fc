//! Loads and validates the [`engine_core::GameConfig`] the runtime serves.
//!
//! A config is parsed once from disk at startup and held behind an `Arc` for
//! the lifetime of the process — nothing mutates it afterward, matching
//! `GameConfig`'s documented immutability.

use std::path::Path;
use std::sync::Arc;

use engine_core::{GameConfig, config::validate};

use crate::error::EngineError;

/// Reads `path`, parses it as a [`GameConfig`], and structurally validates
/// it, returning an `Arc` ready to be shared across every instance writer
/// that serves this config.
pub fn load_config(path: impl AsRef<Path>) -> Result<Arc<GameConfig>, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| EngineError::ConfigParse(e.to_string()))?;
    validate::validate(&config)?;
    Ok(Arc::new(config))
}
