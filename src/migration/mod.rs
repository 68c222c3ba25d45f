pub mod migration_status;
pub use migration_status::*;

pub mod migration_error;
pub use migration_error::*;

pub mod structure_set_migration;
pub use structure_set_migration::*;

pub mod structure_set_migrator;
pub use structure_set_migrator::*;
