use thiserror::Error;

use crate::database::ConfigError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("A where-only query requires a non-empty where predicate.")]
    WhereOnlyQueryRequiresWhere,
    #[error("Page size must be greater than zero")]
    InvalidPageSize,
    #[error("Page {page_index} of size {page_size} is beyond the numberable rows")]
    PageOutOfRange { page_index: usize, page_size: usize },
    #[error("Statement '{statement}' uses the unknown slot '{slot}'")]
    UnknownTemplateSlot { statement: String, slot: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Command execution failed: {0}")]
    Execution(String),
}
