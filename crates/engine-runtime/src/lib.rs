//! Async orchestration around `engine-core`'s pure types: authorization,
//! idempotency, transaction dispatch, per-instance concurrency, snapshotting,
//! and config-migration-on-restore.
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod idempotency;
pub mod instance;
pub mod migrator;
pub mod registry;
pub mod snapshot;

pub use auth::Principal;
pub use dispatcher::{dispatch, DispatchResult, TxResponse};
pub use error::EngineError;
pub use idempotency::IdempotencyStore;
pub use instance::InstanceHandle;
pub use migrator::{migrate, MigrationEntry};
pub use registry::InstanceRegistry;
pub use snapshot::SnapshotManager;
