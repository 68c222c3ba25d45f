pub mod db_config;
pub use db_config::*;

pub mod config_error;
pub use config_error::*;

pub mod sql_statements;
pub use sql_statements::*;

pub mod storage_error;
pub use storage_error::*;

pub mod structure_storage;
pub use structure_storage::*;

pub mod memory_storage;
pub use memory_storage::*;
