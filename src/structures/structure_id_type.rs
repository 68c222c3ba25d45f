use serde::{Deserialize, Serialize};

/// Strategy used for the immutable identity of every stored structure.
///
/// - `Identity`: sequential integer ids assigned on first insert.
/// - `Guid`: GUID ids assigned on first insert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum StructureIdType {
    /// Sequential integer ids (default).
    #[default]
    Identity,
    /// GUID ids.
    Guid,
}
