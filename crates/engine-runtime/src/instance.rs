//! Per-instance writer task: one `gameInstanceId` gets one tokio task owning
//! its [`GameState`] exclusively, so every mutating transaction against that
//! instance serializes through a single command channel while different
//! instances run fully in parallel.

use std::sync::Arc;

use engine_core::{GameConfig, GameState};
use tokio::sync::{mpsc, oneshot};

use crate::dispatcher::{self, DispatchResult};
use crate::error::EngineError;
use crate::idempotency::IdempotencyStore;

enum Command {
    Dispatch {
        body: serde_json::Value,
        bearer_token: Option<String>,
        reply: oneshot::Sender<DispatchResult>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
}

const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// A live handle to an instance's writer task. Cloning shares the same
/// underlying task — every clone's commands still serialize through it.
#[derive(Clone)]
pub struct InstanceHandle {
    command_tx: mpsc::Sender<Command>,
}

impl InstanceHandle {
    pub async fn dispatch(
        &self,
        body: serde_json::Value,
        bearer_token: Option<String>,
    ) -> Result<DispatchResult, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Dispatch { body, bearer_token, reply: reply_tx })
            .await
            .map_err(|_| EngineError::WriterGone)?;
        reply_rx.await.map_err(|_| EngineError::WriterGone)
    }

    /// A consistent clone of the instance's current state, used both for
    /// serving read endpoints and for the periodic snapshot flush.
    pub async fn snapshot(&self) -> Result<GameState, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| EngineError::WriterGone)?;
        reply_rx.await.map_err(|_| EngineError::WriterGone)
    }
}

struct Writer {
    state: GameState,
    config: Arc<GameConfig>,
    admin_api_key: Option<String>,
    idempotency: IdempotencyStore,
    command_rx: mpsc::Receiver<Command>,
}

impl Writer {
    async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            match command {
                Command::Dispatch { body, bearer_token, reply } => {
                    let instance_id = self.state.game_instance_id.clone();
                    let result = dispatcher::dispatch(
                        &mut self.state,
                        &self.config,
                        self.admin_api_key.as_deref(),
                        &self.idempotency,
                        &instance_id,
                        bearer_token.as_deref(),
                        &body,
                    );
                    let _ = reply.send(result);
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.state.clone());
                }
            }
        }
    }
}

/// Spawns the writer task for `state` and returns a handle to it.
pub fn spawn(
    state: GameState,
    config: Arc<GameConfig>,
    admin_api_key: Option<String>,
    idempotency_capacity: usize,
) -> InstanceHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let writer = Writer {
        state,
        config,
        admin_api_key,
        idempotency: IdempotencyStore::new(idempotency_capacity),
        command_rx,
    };
    tokio::spawn(writer.run());
    InstanceHandle { command_tx }
}

#[cfg(test)]
mod tests {
    use engine_core::config::Algorithms;
    use engine_core::AlgorithmSpec;

    use super::*;

    fn config() -> Arc<GameConfig> {
        Arc::new(GameConfig {
            game_config_id: "cfg".into(),
            max_level: 50,
            stats: vec![],
            slots: vec![],
            classes: Default::default(),
            gear_defs: Default::default(),
            sets: Default::default(),
            algorithms: Algorithms {
                growth: AlgorithmSpec::new("flat"),
                level_cost_character: AlgorithmSpec::new("free"),
                level_cost_gear: AlgorithmSpec::new("free"),
            },
            stat_clamps: Default::default(),
        })
    }

    #[tokio::test]
    async fn dispatch_and_snapshot_round_trip_through_the_writer_task() {
        let handle = spawn(GameState::new("inst-1", "cfg"), config(), Some("admin-key".into()), 1000);

        let result = handle
            .dispatch(
                serde_json::json!({
                    "txId": "t1", "type": "CreateActor", "gameInstanceId": "inst-1",
                    "actorId": "a1", "apiKey": "k1"
                }),
                Some("admin-key".into()),
            )
            .await
            .unwrap();
        assert_eq!(result.http_status, 200);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state_version, 1);
        assert!(snapshot.actors.contains_key("a1"));
    }
}
