use crate::{migration::MigrationStatus, structures::StructureSchema};

type Modifier<'a, TFrom, TTo> = Box<dyn FnMut(&TFrom, &mut TTo) -> MigrationStatus + 'a>;

/// Moves every structure of `from_schema` into `to_schema`, reshaping it
/// with `modifier`.
///
/// The modifier receives the old structure and a new one deserialized from
/// the same JSON, so members with unchanged names are already filled in.
/// It must not change the structure id.
pub struct Migration<'a, TFrom, TTo> {
    pub from_schema: StructureSchema,
    pub to_schema: StructureSchema,
    modifier: Modifier<'a, TFrom, TTo>,
}

impl<'a, TFrom, TTo> Migration<'a, TFrom, TTo> {
    pub fn new(
        from_schema: StructureSchema,
        to_schema: StructureSchema,
        modifier: impl FnMut(&TFrom, &mut TTo) -> MigrationStatus + 'a,
    ) -> Self {
        Self {
            from_schema,
            to_schema,
            modifier: Box::new(modifier),
        }
    }

    /// Reshape the structures of one set in place.
    pub fn in_place(schema: StructureSchema, modifier: impl FnMut(&TFrom, &mut TTo) -> MigrationStatus + 'a) -> Self {
        Self::new(schema.clone(), schema, modifier)
    }

    pub fn apply(&mut self, old: &TFrom, new: &mut TTo) -> MigrationStatus {
        (self.modifier)(old, new)
    }
}
