pub mod lambdas;
pub mod sql;

pub mod query_error;
pub use query_error::*;

pub mod paging;
pub use paging::*;

pub mod query_command;
pub use query_command::*;

pub mod sql_query;
pub use sql_query::*;

pub mod sql_query_formatter;
pub use sql_query_formatter::*;

pub mod query_generator;
pub use query_generator::*;

pub mod json_reader;
pub use json_reader::*;

pub mod command_executor;
pub use command_executor::*;

#[cfg(test)]
pub(crate) mod test_records;
