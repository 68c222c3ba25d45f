pub mod operator;
pub use operator::*;

pub mod member_node;
pub use member_node::*;

pub mod where_node;
pub use where_node::*;

pub mod sorting_node;
pub use sorting_node::*;

pub mod include_node;
pub use include_node::*;

pub mod parsed_lambda;
pub use parsed_lambda::*;
