//! Maps `gameInstanceId` to its writer task, and owns instance lifecycle:
//! creation, lookup, restore-from-snapshot, and periodic snapshot flush.

use std::collections::BTreeMap;
use std::sync::Arc;

use engine_core::{GameConfig, GameState};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::instance::{self, InstanceHandle};
use crate::migrator;
use crate::snapshot::SnapshotManager;

pub struct InstanceRegistry {
    config: Arc<GameConfig>,
    admin_api_key: Option<String>,
    idempotency_capacity: usize,
    snapshots: SnapshotManager,
    instances: RwLock<BTreeMap<String, InstanceHandle>>,
}

impl InstanceRegistry {
    pub fn new(
        config: Arc<GameConfig>,
        admin_api_key: Option<String>,
        idempotency_capacity: usize,
        snapshots: SnapshotManager,
    ) -> Self {
        Self {
            config,
            admin_api_key,
            idempotency_capacity,
            snapshots,
            instances: RwLock::new(BTreeMap::new()),
        }
    }

    /// Loads every persisted snapshot, migrates it against the active config,
    /// and spawns its writer task. Instances that fail to load are skipped
    /// (and logged) by [`SnapshotManager::load_all`] rather than aborting
    /// startup.
    pub async fn restore_from_disk(&self) -> Result<usize, EngineError> {
        let states = self.snapshots.load_all()?;
        let mut instances = self.instances.write().await;
        let mut restored = 0;
        for state in states {
            let (migrated, report) = migrator::migrate(state, &self.config);
            if !report.is_empty() {
                warn!(
                    instance = %migrated.game_instance_id,
                    rules_applied = report.len(),
                    "migrated restored instance"
                );
            }
            let instance_id = migrated.game_instance_id.clone();
            let handle = instance::spawn(
                migrated,
                Arc::clone(&self.config),
                self.admin_api_key.clone(),
                self.idempotency_capacity,
            );
            instances.insert(instance_id, handle);
            restored += 1;
        }
        info!(restored, "restored instances from snapshot directory");
        Ok(restored)
    }

    pub async fn create_instance(&self, game_instance_id: &str) -> Result<InstanceHandle, EngineError> {
        let mut instances = self.instances.write().await;
        if instances.contains_key(game_instance_id) {
            return Err(EngineError::InstanceAlreadyExists(game_instance_id.to_string()));
        }
        let state = GameState::new(game_instance_id, self.config.game_config_id.clone());
        let handle = instance::spawn(
            state,
            Arc::clone(&self.config),
            self.admin_api_key.clone(),
            self.idempotency_capacity,
        );
        instances.insert(game_instance_id.to_string(), handle.clone());
        Ok(handle)
    }

    pub async fn get(&self, game_instance_id: &str) -> Result<InstanceHandle, EngineError> {
        self.instances
            .read()
            .await
            .get(game_instance_id)
            .cloned()
            .ok_or_else(|| EngineError::InstanceNotFound(game_instance_id.to_string()))
    }

    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    pub fn admin_api_key(&self) -> Option<&str> {
        self.admin_api_key.as_deref()
    }

    /// Snapshots every live instance to disk. Intended to be driven by a
    /// periodic timer; failures for one instance are logged and do not stop
    /// the others from flushing.
    pub async fn flush_all(&self) {
        let handles: Vec<InstanceHandle> = self.instances.read().await.values().cloned().collect();
        for handle in handles {
            match handle.snapshot().await {
                Ok(state) => {
                    if let Err(error) = self.snapshots.save(&state) {
                        warn!(instance = %state.game_instance_id, %error, "snapshot flush failed");
                    }
                }
                Err(error) => warn!(%error, "could not reach writer task for flush"),
            }
        }
    }
}
