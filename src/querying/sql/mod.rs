pub mod param_value;
pub use param_value::*;

pub mod dac_parameter;
pub use dac_parameter::*;

pub mod where_criteria;
pub use where_criteria::*;

pub mod where_criteria_builder;
pub use where_criteria_builder::*;

pub mod sql_where_member;
pub use sql_where_member::*;

pub mod sql_sorting_member;
pub use sql_sorting_member::*;

pub mod sql_include;
pub use sql_include::*;

pub mod sql_expression;
pub use sql_expression::*;

pub mod sql_expression_builder;
pub use sql_expression_builder::*;
