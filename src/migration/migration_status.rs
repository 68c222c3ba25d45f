/// What a migration does with one structure after the transform ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// Replace the old structure with the transformed one.
    Keep,
    /// Delete the old structure.
    Trash,
    /// Stop the run and leave every old structure untouched.
    Abort,
}
