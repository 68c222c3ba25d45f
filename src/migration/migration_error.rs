use thiserror::Error;

use crate::{database::StorageError, structures::StructureId};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(
        "The new structure has id '{}' but the old structure has id '{old_id}'. A migration must not change the structure id.",
        display_new_id(.new_id)
    )]
    NewIdDoesNotMatchOldId { new_id: Option<StructureId>, old_id: StructureId },
    #[error("Could not read the structure id of an old structure: {json}")]
    OldIdIsMissing { json: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Could not convert a structure: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_new_id(new_id: &Option<StructureId>) -> String {
    match new_id {
        Some(id) => id.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_mismatch_message() {
        let error = MigrationError::NewIdDoesNotMatchOldId {
            new_id: Some(StructureId::Identity(0)),
            old_id: StructureId::Identity(2),
        };
        assert_eq!(
            error.to_string(),
            "The new structure has id '0' but the old structure has id '2'. A migration must not change the structure id."
        );
    }

    #[test]
    fn test_missing_new_id_renders_null() {
        let error = MigrationError::NewIdDoesNotMatchOldId { new_id: None, old_id: StructureId::Identity(5) };
        assert!(error.to_string().starts_with("The new structure has id 'null' but the old structure has id '5'."));
    }
}
