pub mod structures;
pub use structures::{Structure, StructureId, StructureIdType, StructureSchema, DataTypeCode};

pub mod database;
pub use database::{StoreConfig, SqlStatements, StructureStorage, MemoryStructureStorage};

pub mod querying;
pub use querying::{QueryCommand, QueryGenerator, DbQueryGenerator, QueryRunner, CommandExecutor, SqlQuery};

pub mod migration;
pub use migration::{Migration, MigrationStatus, StructureSetMigrator, MigrationReport};
