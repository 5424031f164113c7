use thiserror::Error;

use crate::core::item::RecordKind;

#[derive(Error, Debug, Clone, PartialEq)]
/// Batch error
pub enum BatchError {
    /// The database could not be reached. Fatal.
    #[error("Connection from: {0}")]
    Connection(String),

    /// Schema creation failed. Fatal.
    #[error("Migration of {kind} from: {message}")]
    Migration { kind: RecordKind, message: String },

    /// A single record could not be persisted.
    #[error("ItemWriter for {kind} {id} from: {message}")]
    ItemWriter {
        kind: RecordKind,
        id: uuid::Uuid,
        message: String,
    },

    #[error("Unknown item category: {0}")]
    UnknownCategory(String),

    #[error("Batch was cancelled")]
    Cancelled,

    /// A worker task panicked or was aborted before reporting.
    #[error("Worker from: {0}")]
    Worker(String),

    #[error("Configuration from: {0}")]
    Configuration(String),
}

impl BatchError {
    /// Errors that must stop the process before any record is generated.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BatchError::Connection(_) | BatchError::Migration { .. } | BatchError::Configuration(_)
        )
    }
}
