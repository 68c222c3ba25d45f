use crate::structures::StructureIdType;

/// Default capacity of the migrator's keep queue.
pub const DEFAULT_MAX_KEEP_QUEUE_SIZE: usize = 500;

/// Store configuration used when building schemas and running migrations.
///
/// - `id_type` controls how structure ids are interpreted.
/// - `id_member` is the JSON member holding the id inside each structure.
/// - `max_keep_queue_size` is the migrator's batch size.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Strategy for structure ids
    pub id_type: StructureIdType,
    /// Member name inside documents that contains the id
    pub id_member: String,
    /// Number of kept structures buffered before the migrator flushes
    pub max_keep_queue_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_type: Default::default(),
            id_member: "StructureId".to_string(),
            max_keep_queue_size: DEFAULT_MAX_KEEP_QUEUE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with explicit `id_type` and `id_member`.
    pub fn from(id_type: StructureIdType, id_member: &str) -> Self {
        Self {
            id_type,
            id_member: id_member.to_string(),
            ..Self::default()
        }
    }

    /// Convenience: create a config for sequential integer ids using `id_member`.
    pub fn identity(id_member: &str) -> Self {
        Self::from(StructureIdType::Identity, id_member)
    }

    /// Convenience: create a config for GUID ids using `id_member`.
    pub fn guid(id_member: &str) -> Self {
        Self::from(StructureIdType::Guid, id_member)
    }

    /// Override the migrator batch size. A size of zero is treated as one.
    pub fn with_max_keep_queue_size(mut self, size: usize) -> Self {
        self.max_keep_queue_size = size.max(1);
        self
    }
}
