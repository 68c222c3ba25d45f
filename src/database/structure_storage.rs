use crate::{database::StorageError, structures::{Structure, StructureId, StructureSchema}};

/// Lazy, forward-only sequence of stored JSON documents.
pub type JsonStream<'a> = Box<dyn Iterator<Item = Result<String, StorageError>> + 'a>;

/// Identity storage primitives a structure-set migration runs against.
///
/// Methods take `&self`: a migration keeps a stream open while it flushes
/// batches, so implementations use interior mutability (or separate
/// connections) to allow writes while a stream is being consumed.
pub trait StructureStorage {
    /// Make sure every table of the set exists.
    fn upsert_structure_set(&self, schema: &StructureSchema) -> Result<(), StorageError>;

    /// Stream every stored document of the set in ascending id order.
    fn stream_all_json_ordered_by_id<'a>(&'a self, schema: &StructureSchema) -> Result<JsonStream<'a>, StorageError>;

    /// Delete every structure with `from <= id <= to` from all tables of the set.
    /// Returns the number of deleted structures.
    fn delete_where_id_between(&self, schema: &StructureSchema, from: StructureId, to: StructureId) -> Result<usize, StorageError>;

    /// Insert structures without incremental index maintenance.
    fn bulk_insert(&self, schema: &StructureSchema, structures: &[Structure]) -> Result<(), StorageError>;

    /// Rebuild the secondary indexes of every table of the set.
    fn rebuild_indexes(&self, schema: &StructureSchema) -> Result<(), StorageError>;

    /// Start a unit of work. Only one may be open at a time.
    fn begin_transaction(&self) -> Result<(), StorageError>;

    /// Keep every write made since `begin_transaction`.
    fn commit_transaction(&self) -> Result<(), StorageError>;

    /// Undo every write made since `begin_transaction`.
    fn rollback_transaction(&self) -> Result<(), StorageError>;
}
