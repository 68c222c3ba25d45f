use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    database::{StoreConfig, StructureStorage},
    migration::{Migration, MigrationError, MigrationStatus},
    structures::{Structure, StructureId, StructureSchema},
};

/// Outcome of a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub kept: usize,
    pub trashed: usize,
    pub aborted: bool,
}

/// Pending work between two flushes.
///
/// Structures stream in ascending id order, so every kept or trashed id
/// extends one contiguous range that a single ranged delete removes.
struct PendingBatch {
    delete_from: Option<StructureId>,
    delete_to: Option<StructureId>,
    keep_queue: Vec<Structure>,
    capacity: usize,
}

impl PendingBatch {
    fn new(capacity: usize) -> Self {
        Self {
            delete_from: None,
            delete_to: None,
            keep_queue: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn mark_for_delete(&mut self, id: StructureId) {
        if self.delete_from.is_none() {
            self.delete_from = Some(id);
        }
        self.delete_to = Some(id);
    }

    fn keep(&mut self, structure: Structure) {
        self.keep_queue.push(structure);
    }

    fn is_full(&self) -> bool {
        self.keep_queue.len() >= self.capacity
    }
}

/// Runs migrations against a structure storage.
///
/// Old structures are deleted by id range and their replacements
/// bulk-inserted in batches of `max_keep_queue_size`; indexes of the new
/// set are rebuilt once at the end. The run is one storage transaction: an
/// aborted run is rolled back, a failing one keeps the batches already
/// flushed.
pub struct StructureSetMigrator<'s, S> {
    storage: &'s S,
    max_keep_queue_size: usize,
}

impl<'s, S: StructureStorage> StructureSetMigrator<'s, S> {
    pub fn new(storage: &'s S, config: &StoreConfig) -> Self {
        Self {
            storage,
            max_keep_queue_size: config.max_keep_queue_size.max(1),
        }
    }

    pub fn migrate<TFrom, TTo>(&self, migration: &mut Migration<'_, TFrom, TTo>) -> Result<MigrationReport, MigrationError>
    where
        TFrom: DeserializeOwned,
        TTo: DeserializeOwned + Serialize,
    {
        info!(
            from = %migration.from_schema.name,
            to = %migration.to_schema.name,
            "starting structure set migration"
        );

        self.storage.upsert_structure_set(&migration.to_schema)?;
        self.storage.begin_transaction()?;

        match self.migrate_all(migration) {
            Ok(report) if report.aborted => {
                self.storage.rollback_transaction()?;
                debug!(from = %migration.from_schema.name, "rolled back aborted migration");
                Ok(report)
            }
            Ok(report) => {
                self.storage.commit_transaction()?;
                info!(
                    from = %migration.from_schema.name,
                    to = %migration.to_schema.name,
                    kept = report.kept,
                    trashed = report.trashed,
                    "finished structure set migration"
                );
                Ok(report)
            }
            Err(error) => {
                if let Err(commit_error) = self.storage.commit_transaction() {
                    warn!(%commit_error, "could not commit flushed batches of a failed migration");
                }
                Err(error)
            }
        }
    }

    fn migrate_all<TFrom, TTo>(&self, migration: &mut Migration<'_, TFrom, TTo>) -> Result<MigrationReport, MigrationError>
    where
        TFrom: DeserializeOwned,
        TTo: DeserializeOwned + Serialize,
    {
        let mut report = MigrationReport::default();
        let mut batch = PendingBatch::new(self.max_keep_queue_size);

        for json in self.storage.stream_all_json_ordered_by_id(&migration.from_schema)? {
            let json = json?;
            let (status, new_structure) = Self::migrate_one(migration, &json)?;

            match status {
                MigrationStatus::Keep => {
                    batch.mark_for_delete(new_structure.id);
                    batch.keep(new_structure);
                    report.kept += 1;

                    if batch.is_full() {
                        self.flush(&mut batch, &migration.from_schema, &migration.to_schema)?;
                    }
                }
                MigrationStatus::Trash => {
                    batch.mark_for_delete(new_structure.id);
                    report.trashed += 1;
                }
                MigrationStatus::Abort => {
                    warn!(
                        from = %migration.from_schema.name,
                        at = %new_structure.id,
                        pending = batch.keep_queue.len(),
                        "structure set migration aborted"
                    );
                    report.aborted = true;
                    return Ok(report);
                }
            }
        }

        self.flush(&mut batch, &migration.from_schema, &migration.to_schema)?;
        self.storage.rebuild_indexes(&migration.to_schema)?;
        Ok(report)
    }

    /// Transform one stored structure. The returned structure carries the
    /// (unchanged) id and the JSON of the new shape.
    fn migrate_one<TFrom, TTo>(
        migration: &mut Migration<'_, TFrom, TTo>,
        json: &str,
    ) -> Result<(MigrationStatus, Structure), MigrationError>
    where
        TFrom: DeserializeOwned,
        TTo: DeserializeOwned + Serialize,
    {
        let value = serde_json::from_str::<Value>(json)?;
        let from_schema = &migration.from_schema;
        let old_id = StructureId::from_json_member(&value, &from_schema.id_member, from_schema.id_type)
            .ok_or_else(|| MigrationError::OldIdIsMissing { json: json.to_string() })?;

        let old = serde_json::from_value::<TFrom>(value.clone())?;
        let mut new = serde_json::from_value::<TTo>(value)?;

        let status = migration.apply(&old, &mut new);

        let new_value = serde_json::to_value(&new)?;
        let to_schema = &migration.to_schema;
        let new_id = StructureId::from_json_member(&new_value, &to_schema.id_member, to_schema.id_type);
        Self::ensure_same_id(new_id, old_id)?;

        Ok((status, Structure::new(old_id, new_value.to_string())))
    }

    fn ensure_same_id(new_id: Option<StructureId>, old_id: StructureId) -> Result<(), MigrationError> {
        match new_id {
            Some(id) if !id.is_default() && id == old_id => Ok(()),
            _ => Err(MigrationError::NewIdDoesNotMatchOldId { new_id, old_id }),
        }
    }

    /// Delete the pending id range, then insert the kept structures.
    fn flush(&self, batch: &mut PendingBatch, from_schema: &StructureSchema, to_schema: &StructureSchema) -> Result<(), MigrationError> {
        if let (Some(from), Some(to)) = (batch.delete_from.take(), batch.delete_to.take()) {
            let deleted = self.storage.delete_where_id_between(from_schema, from, to)?;
            debug!(table = %from_schema.name, %from, %to, deleted, "deleted migrated id range");
        }

        if !batch.keep_queue.is_empty() {
            self.storage.bulk_insert(to_schema, &batch.keep_queue)?;
            debug!(table = %to_schema.name, kept = batch.keep_queue.len(), "inserted migrated structures");
            batch.keep_queue.clear();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::database::{MemoryStructureStorage, StorageError, StorageOperation};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct PersonV1 {
        structure_id: i64,
        name: String,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct PersonV2 {
        structure_id: i64,
        first_name: String,
        last_name: String,
    }

    fn people() -> StructureSchema {
        StructureSchema::identity("Person")
    }

    fn storage_with_people() -> MemoryStructureStorage {
        let storage = MemoryStructureStorage::new();
        storage
            .load_from_json(
                &people(),
                json!([
                    { "StructureId": 1, "Name": "Ada Lovelace" },
                    { "StructureId": 2, "Name": "Alan Turing" },
                    { "StructureId": 3, "Name": "Grace Hopper" },
                ]),
            )
            .unwrap();
        storage.clear_journal().unwrap();
        storage
    }

    fn split_name(old: &PersonV1, new: &mut PersonV2) -> MigrationStatus {
        let mut parts = old.name.splitn(2, ' ');
        new.first_name = parts.next().unwrap_or_default().to_string();
        new.last_name = parts.next().unwrap_or_default().to_string();
        MigrationStatus::Keep
    }

    fn stored_ids(storage: &MemoryStructureStorage, schema: &StructureSchema) -> Vec<i64> {
        storage
            .get_all(schema)
            .unwrap()
            .iter()
            .map(|item| item["StructureId"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_keeps_transformed_structures() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), split_name);

        let report = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap();
        assert_eq!(report, MigrationReport { kept: 3, trashed: 0, aborted: false });

        let all = storage.get_all(&people()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], json!({ "StructureId": 2, "FirstName": "Alan", "LastName": "Turing" }));

        assert_eq!(
            storage.journal().unwrap(),
            vec![
                StorageOperation::UpsertStructureSet("Person".into()),
                StorageOperation::DeleteIdRange {
                    table: "PersonStructure".into(),
                    from: StructureId::Identity(1),
                    to: StructureId::Identity(3),
                    deleted: 3,
                },
                StorageOperation::BulkInsert { table: "PersonStructure".into(), count: 3 },
                StorageOperation::RebuildIndexes("Person".into()),
            ]
        );
    }

    #[test]
    fn test_changed_id_fails_naming_both_ids() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 2 {
                new.structure_id = 0;
            }
            MigrationStatus::Keep
        });

        let error = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap_err();
        assert!(matches!(
            error,
            MigrationError::NewIdDoesNotMatchOldId { new_id: Some(StructureId::Identity(0)), old_id: StructureId::Identity(2) }
        ));
        assert_eq!(
            error.to_string(),
            "The new structure has id '0' but the old structure has id '2'. A migration must not change the structure id."
        );

        assert_eq!(stored_ids(&storage, &people()), vec![1, 2, 3]);
        assert_eq!(storage.journal().unwrap(), vec![StorageOperation::UpsertStructureSet("Person".into())]);
    }

    #[test]
    fn test_id_moved_to_another_structure_fails() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), |_: &PersonV1, new: &mut PersonV2| {
            new.structure_id += 1;
            MigrationStatus::Keep
        });

        let error = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap_err();
        assert!(error.to_string().starts_with("The new structure has id '2' but the old structure has id '1'."));
    }

    #[test]
    fn test_removed_id_member_fails() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), |_: &Value, new: &mut Value| {
            if let Some(item) = new.as_object_mut() {
                item.remove("StructureId");
            }
            MigrationStatus::Keep
        });

        let error = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap_err();
        assert!(matches!(error, MigrationError::NewIdDoesNotMatchOldId { new_id: None, .. }));
        assert!(error.to_string().contains("'null'"));
    }

    #[test]
    fn test_abort_leaves_old_structures_untouched() {
        let storage = storage_with_people();
        let before = storage.get_all(&people()).unwrap();

        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 2 {
                return MigrationStatus::Abort;
            }
            split_name(old, new)
        });

        let report = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap();
        assert!(report.aborted);
        assert_eq!(report.kept, 1);

        assert_eq!(storage.get_all(&people()).unwrap(), before);
        let journal = storage.journal().unwrap();
        assert!(journal.iter().all(|op| matches!(op, StorageOperation::UpsertStructureSet(_))));
    }

    #[test]
    fn test_abort_after_flushed_batches_restores_everything() {
        let storage = storage_with_people();
        let before = storage.get_all(&people()).unwrap();

        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 3 {
                return MigrationStatus::Abort;
            }
            split_name(old, new)
        });
        let config = StoreConfig::new().with_max_keep_queue_size(1);

        let report = StructureSetMigrator::new(&storage, &config).migrate(&mut migration).unwrap();
        assert_eq!(report, MigrationReport { kept: 2, trashed: 0, aborted: true });

        let flushed = storage
            .journal()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, StorageOperation::BulkInsert { .. }))
            .count();
        assert_eq!(flushed, 2);
        assert_eq!(storage.get_all(&people()).unwrap(), before);
        assert!(matches!(storage.rollback_transaction(), Err(StorageError::NoTransaction)));
    }

    #[test]
    fn test_trashed_structure_is_removed() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 2 {
                return MigrationStatus::Trash;
            }
            split_name(old, new)
        });

        let report = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap();
        assert_eq!(report, MigrationReport { kept: 2, trashed: 1, aborted: false });
        assert_eq!(stored_ids(&storage, &people()), vec![1, 3]);
        assert!(storage.get(&people(), &StructureId::Identity(2)).unwrap().is_none());
    }

    #[test]
    fn test_full_keep_queue_flushes_in_batches() {
        let storage = MemoryStructureStorage::new();
        let items = (1..=5).map(|id| json!({ "StructureId": id, "Name": format!("P {id}") })).collect::<Vec<_>>();
        storage.load_from_json(&people(), Value::Array(items)).unwrap();
        storage.clear_journal().unwrap();

        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 2 {
                return MigrationStatus::Trash;
            }
            split_name(old, new)
        });
        let config = StoreConfig::new().with_max_keep_queue_size(2);

        let report = StructureSetMigrator::new(&storage, &config).migrate(&mut migration).unwrap();
        assert_eq!(report, MigrationReport { kept: 4, trashed: 1, aborted: false });
        assert_eq!(stored_ids(&storage, &people()), vec![1, 3, 4, 5]);

        let flushes = storage
            .journal()
            .unwrap()
            .into_iter()
            .filter_map(|op| match op {
                StorageOperation::DeleteIdRange { from, to, .. } => Some(format!("delete {from}..{to}")),
                StorageOperation::BulkInsert { count, .. } => Some(format!("insert {count}")),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(flushes, vec!["delete 1..3", "insert 2", "delete 4..5", "insert 2"]);
    }

    #[test]
    fn test_failure_keeps_flushed_batches() {
        let storage = storage_with_people();
        let mut migration = Migration::in_place(people(), |old: &PersonV1, new: &mut PersonV2| {
            if old.structure_id == 3 {
                new.structure_id = 0;
            }
            split_name(old, new)
        });
        let config = StoreConfig::new().with_max_keep_queue_size(1);

        let result = StructureSetMigrator::new(&storage, &config).migrate(&mut migration);
        assert!(matches!(result, Err(MigrationError::NewIdDoesNotMatchOldId { .. })));

        let all = storage.get_all(&people()).unwrap();
        assert_eq!(all[0]["FirstName"], json!("Ada"));
        assert_eq!(all[1]["FirstName"], json!("Alan"));
        assert_eq!(all[2], json!({ "StructureId": 3, "Name": "Grace Hopper" }));
        assert!(matches!(storage.commit_transaction(), Err(StorageError::NoTransaction)));
    }

    #[test]
    fn test_migrates_into_another_set() {
        let storage = storage_with_people();
        let employees = StructureSchema::identity("Employee");
        let mut migration = Migration::new(people(), employees.clone(), split_name);

        StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap();

        assert_eq!(storage.count(&people()).unwrap(), 0);
        assert_eq!(stored_ids(&storage, &employees), vec![1, 2, 3]);
    }

    #[test]
    fn test_old_structure_without_id_fails() {
        let storage = MemoryStructureStorage::new();
        storage.upsert_structure_set(&people()).unwrap();
        storage
            .bulk_insert(&people(), &[Structure::new(StructureId::Identity(1), r#"{"Name":"Nobody"}"#.to_string())])
            .unwrap();

        let mut migration = Migration::in_place(people(), split_name);
        let error = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap_err();
        assert_eq!(error.to_string(), r#"Could not read the structure id of an old structure: {"Name":"Nobody"}"#);
    }

    #[test]
    fn test_unknown_source_set_fails() {
        let storage = MemoryStructureStorage::new();
        let mut migration = Migration::new(StructureSchema::identity("Missing"), people(), split_name);
        let error = StructureSetMigrator::new(&storage, &StoreConfig::new()).migrate(&mut migration).unwrap_err();
        assert!(matches!(error, MigrationError::Storage(_)));
    }
}
