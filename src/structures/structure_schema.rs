use crate::{database::StoreConfig, structures::{DataTypeCode, StructureIdType}};

/// Table layout of one structure set.
///
/// A structure set named `Customer` is stored in `CustomerStructure`
/// (`[StructureId]`, `[Json]`) plus one index table per data-type family,
/// e.g. `CustomerIntegers`, each holding `[StructureId]`, `[MemberPath]`,
/// `[Value]` and `[StringValue]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSchema {
    pub name: String,
    pub id_type: StructureIdType,
    /// Member of the serialized JSON holding the structure id.
    pub id_member: String,
}

impl StructureSchema {
    pub fn new(name: &str, id_type: StructureIdType, id_member: &str) -> Self {
        Self {
            name: name.to_string(),
            id_type,
            id_member: id_member.to_string(),
        }
    }

    pub fn with_config(name: &str, config: &StoreConfig) -> Self {
        Self::new(name, config.id_type, &config.id_member)
    }

    pub fn identity(name: &str) -> Self {
        Self::new(name, StructureIdType::Identity, "StructureId")
    }

    pub fn guid(name: &str) -> Self {
        Self::new(name, StructureIdType::Guid, "StructureId")
    }

    pub fn structure_table_name(&self) -> String {
        format!("{}Structure", self.name)
    }

    pub fn index_table_name(&self, data_type_code: DataTypeCode) -> String {
        format!("{}{}", self.name, data_type_code.index_table_suffix())
    }

    /// Every table of the set: the structure table first, then the index tables.
    pub fn all_table_names(&self) -> Vec<String> {
        let mut names = vec![self.structure_table_name()];
        names.extend(
            DataTypeCode::all_index_table_suffixes()
                .iter()
                .map(|suffix| format!("{}{}", self.name, suffix)),
        );
        names
    }

    pub fn index_table_names(&self) -> Vec<String> {
        self.all_table_names().into_iter().skip(1).collect()
    }
}
