use crate::structures::StructureId;

/// One stored item: its identity and serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub id: StructureId,
    pub json: String,
}

impl Structure {
    pub fn new(id: StructureId, json: String) -> Self {
        Self { id, json }
    }
}
