//! Bounded FIFO cache mapping a client-chosen `txId` to the exact response it
//! previously produced, so retries under an unreliable network never
//! double-apply a mutation.
//!
//! Mirrors [`engine_core::GameState::tx_id_cache`] one-for-one: every
//! `record` that actually inserts a new entry pushes the same entry onto the
//! state's own log, and every eviction here evicts there too, so a snapshot
//! round-trip reconstructs an identical store.

use engine_core::TxIdCacheEntry;

const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedResponse {
    pub status_code: u16,
    pub body: serde_json::Value,
}

/// Wraps a [`engine_core::GameState`]'s `tx_id_cache` with FIFO-bounded,
/// lookup-indexed access. Holds no state of its own — every operation reads
/// and writes the `VecDeque` it is handed, so it can be constructed fresh
/// around any `GameState` (including one just restored from a snapshot)
/// without losing history.
pub struct IdempotencyStore {
    max_entries: usize,
}

impl IdempotencyStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }

    pub fn get(
        &self,
        log: &std::collections::VecDeque<TxIdCacheEntry>,
        tx_id: &str,
    ) -> Option<CachedResponse> {
        log.iter().find(|entry| entry.tx_id == tx_id).map(|entry| CachedResponse {
            status_code: entry.status_code,
            body: entry.body.clone(),
        })
    }

    /// Appends `(tx_id, status_code, body)` to `log` unless it is already
    /// present, evicting the oldest entry first if that would exceed
    /// capacity. No-op on an existing `tx_id` — the first recorded result for
    /// a given id is final.
    pub fn record(
        &self,
        log: &mut std::collections::VecDeque<TxIdCacheEntry>,
        tx_id: &str,
        status_code: u16,
        body: serde_json::Value,
    ) {
        if log.iter().any(|entry| entry.tx_id == tx_id) {
            return;
        }
        if log.len() >= self.max_entries {
            log.pop_front();
        }
        log.push_back(TxIdCacheEntry {
            tx_id: tx_id.to_string(),
            status_code,
            body,
        });
    }
}
