use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
    sync::RwLock,
};

use serde_json::Value;

use crate::{
    database::{JsonStream, StorageError, StructureStorage},
    structures::{Structure, StructureId, StructureSchema},
};

/// Mutating calls recorded by `MemoryStructureStorage`, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOperation {
    UpsertStructureSet(String),
    DeleteIdRange { table: String, from: StructureId, to: StructureId, deleted: usize },
    BulkInsert { table: String, count: usize },
    RebuildIndexes(String),
}

/// Structures of one set keyed by id, so iteration is in ascending id order.
type MemoryTable = BTreeMap<StructureId, String>;

/// In-memory `StructureStorage`.
///
/// Keeps one ordered map per structure table behind a `RwLock` and a journal
/// of every mutating call. Streams read by cursor and never hold the lock
/// between items, so a consumer may delete and insert while streaming.
/// A transaction is a copy of all tables taken at begin; rollback puts the
/// copy back. Transaction calls are not journaled.
#[derive(Debug, Default)]
pub struct MemoryStructureStorage {
    tables: RwLock<HashMap<String, MemoryTable>>,
    journal: RwLock<Vec<StorageOperation>>,
    snapshot: RwLock<Option<HashMap<String, MemoryTable>>>,
}

impl MemoryStructureStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, operation: StorageOperation) -> Result<(), StorageError> {
        self.journal.write().map_err(|_| StorageError::Poisoned)?.push(operation);
        Ok(())
    }

    /// Every mutating call made so far.
    pub fn journal(&self) -> Result<Vec<StorageOperation>, StorageError> {
        Ok(self.journal.read().map_err(|_| StorageError::Poisoned)?.clone())
    }

    pub fn clear_journal(&self) -> Result<(), StorageError> {
        self.journal.write().map_err(|_| StorageError::Poisoned)?.clear();
        Ok(())
    }

    pub fn exists(&self, schema: &StructureSchema) -> Result<bool, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables.contains_key(&schema.structure_table_name()))
    }

    pub fn count(&self, schema: &StructureSchema) -> Result<usize, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables.get(&schema.structure_table_name()).map(|t| t.len()).unwrap_or(0))
    }

    pub fn get(&self, schema: &StructureSchema, id: &StructureId) -> Result<Option<String>, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .get(&schema.structure_table_name())
            .and_then(|t| t.get(id))
            .cloned())
    }

    /// All documents of the set, in ascending id order.
    pub fn get_all(&self, schema: &StructureSchema) -> Result<Vec<Value>, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        let Some(table) = tables.get(&schema.structure_table_name()) else {
            return Ok(vec![]);
        };

        table
            .values()
            .map(|json| {
                serde_json::from_str::<Value>(json).map_err(|e| StorageError::Command(e.to_string()))
            })
            .collect()
    }

    /// Load documents from a JSON array, reading each id from the schema's
    /// id member. Creates the set when missing. Returns the number of items
    /// added; fails without inserting anything if an item has no valid id.
    pub fn load_from_json(&self, schema: &StructureSchema, items: Value) -> Result<usize, StorageError> {
        let Value::Array(items) = items else {
            return Err(StorageError::InvalidStructure {
                id_member: schema.id_member.clone(),
                json: items.to_string(),
            });
        };

        let mut structures = Vec::with_capacity(items.len());
        for item in items {
            let Some(id) = StructureId::from_json_member(&item, &schema.id_member, schema.id_type) else {
                return Err(StorageError::InvalidStructure {
                    id_member: schema.id_member.clone(),
                    json: item.to_string(),
                });
            };
            structures.push(Structure::new(id, item.to_string()));
        }

        self.upsert_structure_set(schema)?;
        let count = structures.len();
        self.bulk_insert(schema, &structures)?;
        Ok(count)
    }
}

/// Cursor over one memory table; reacquires the read lock per item.
struct MemoryJsonStream<'a> {
    storage: &'a MemoryStructureStorage,
    table: String,
    cursor: Option<StructureId>,
    done: bool,
}

impl Iterator for MemoryJsonStream<'_> {
    type Item = Result<String, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let tables = match self.storage.tables.read() {
            Ok(tables) => tables,
            Err(_) => {
                self.done = true;
                return Some(Err(StorageError::Poisoned));
            }
        };

        let lower = match &self.cursor {
            Some(id) => Bound::Excluded(*id),
            None => Bound::Unbounded,
        };

        let next = tables
            .get(&self.table)
            .and_then(|t| t.range((lower, Bound::Unbounded)).next())
            .map(|(id, json)| (*id, json.clone()));

        match next {
            Some((id, json)) => {
                self.cursor = Some(id);
                Some(Ok(json))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl StructureStorage for MemoryStructureStorage {
    fn upsert_structure_set(&self, schema: &StructureSchema) -> Result<(), StorageError> {
        {
            let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
            tables.entry(schema.structure_table_name()).or_default();
        }
        self.record(StorageOperation::UpsertStructureSet(schema.name.clone()))
    }

    fn stream_all_json_ordered_by_id<'a>(&'a self, schema: &StructureSchema) -> Result<JsonStream<'a>, StorageError> {
        if !self.exists(schema)? {
            return Err(StorageError::UnknownStructureSet(schema.name.clone()));
        }

        Ok(Box::new(MemoryJsonStream {
            storage: self,
            table: schema.structure_table_name(),
            cursor: None,
            done: false,
        }))
    }

    fn delete_where_id_between(&self, schema: &StructureSchema, from: StructureId, to: StructureId) -> Result<usize, StorageError> {
        let table_name = schema.structure_table_name();
        let deleted = {
            let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
            let table = tables
                .get_mut(&table_name)
                .ok_or_else(|| StorageError::UnknownStructureSet(schema.name.clone()))?;

            let ids = if from <= to {
                table.range(from..=to).map(|(id, _)| *id).collect::<Vec<_>>()
            } else {
                vec![]
            };
            for id in &ids {
                table.remove(id);
            }
            ids.len()
        };

        self.record(StorageOperation::DeleteIdRange { table: table_name, from, to, deleted })?;
        Ok(deleted)
    }

    fn bulk_insert(&self, schema: &StructureSchema, structures: &[Structure]) -> Result<(), StorageError> {
        let table_name = schema.structure_table_name();
        {
            let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
            let table = tables
                .get_mut(&table_name)
                .ok_or_else(|| StorageError::UnknownStructureSet(schema.name.clone()))?;

            // all-or-nothing, like a failed bulk copy
            for (i, structure) in structures.iter().enumerate() {
                let repeated = structures[..i].iter().any(|s| s.id == structure.id);
                if repeated || table.contains_key(&structure.id) {
                    return Err(StorageError::DuplicateId { table: table_name, id: structure.id });
                }
            }

            for structure in structures {
                table.insert(structure.id, structure.json.clone());
            }
        }

        self.record(StorageOperation::BulkInsert { table: table_name, count: structures.len() })
    }

    fn rebuild_indexes(&self, schema: &StructureSchema) -> Result<(), StorageError> {
        if !self.exists(schema)? {
            return Err(StorageError::UnknownStructureSet(schema.name.clone()));
        }
        self.record(StorageOperation::RebuildIndexes(schema.name.clone()))
    }

    fn begin_transaction(&self) -> Result<(), StorageError> {
        let mut snapshot = self.snapshot.write().map_err(|_| StorageError::Poisoned)?;
        if snapshot.is_some() {
            return Err(StorageError::TransactionInProgress);
        }
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        *snapshot = Some(tables.clone());
        Ok(())
    }

    fn commit_transaction(&self) -> Result<(), StorageError> {
        let mut snapshot = self.snapshot.write().map_err(|_| StorageError::Poisoned)?;
        snapshot.take().map(|_| ()).ok_or(StorageError::NoTransaction)
    }

    fn rollback_transaction(&self) -> Result<(), StorageError> {
        let mut snapshot = self.snapshot.write().map_err(|_| StorageError::Poisoned)?;
        let saved = snapshot.take().ok_or(StorageError::NoTransaction)?;
        *self.tables.write().map_err(|_| StorageError::Poisoned)? = saved;
        Ok(())
    }
}
