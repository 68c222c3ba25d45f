pub mod structure_id_type;
pub use structure_id_type::*;

pub mod structure_id;
pub use structure_id::*;

pub mod data_type_code;
pub use data_type_code::*;

pub mod structure_schema;
pub use structure_schema::*;

pub mod structure;
pub use structure::*;
