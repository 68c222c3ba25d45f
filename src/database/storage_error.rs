use thiserror::Error;

use crate::structures::StructureId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Structure set '{0}' does not exist")]
    UnknownStructureSet(String),
    #[error("Structure with id '{id}' already exists in '{table}'")]
    DuplicateId { table: String, id: StructureId },
    #[error("Structure is not a JSON object with a valid '{id_member}' member: {json}")]
    InvalidStructure { id_member: String, json: String },
    #[error("A transaction is already open")]
    TransactionInProgress,
    #[error("No transaction is open")]
    NoTransaction,
    #[error("Storage lock poisoned")]
    Poisoned,
    #[error("Storage command failed: {0}")]
    Command(String),
}
