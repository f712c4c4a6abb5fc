//! Runtime-level errors: failures that do not fit a transaction's
//! `(accepted, errorCode)` envelope because they happen before or outside
//! dispatch — config loading, snapshot I/O, instance lookup.

use thiserror::Error;

use engine_core::{ConfigError, GameError, ErrorSeverity};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game instance '{0}' does not exist")]
    InstanceNotFound(String),

    #[error("game instance '{0}' already exists")]
    InstanceAlreadyExists(String),

    #[error("no active config for this instance")]
    ConfigNotFound,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse config file: {0}")]
    ConfigParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("the instance's writer task has shut down")]
    WriterGone,
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::InstanceNotFound(_) | EngineError::InstanceAlreadyExists(_) => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
            EngineError::InstanceAlreadyExists(_) => "ALREADY_EXISTS",
            EngineError::ConfigNotFound => "CONFIG_NOT_FOUND",
            EngineError::Config(_) | EngineError::ConfigParse(_) => "INVALID_CONFIG_REFERENCE",
            EngineError::Io(_) => "INTERNAL_ERROR",
            EngineError::WriterGone => "INTERNAL_ERROR",
        }
    }
}
