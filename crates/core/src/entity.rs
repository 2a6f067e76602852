//! Stored records and their store-assigned identity.

/// A record whose identifier is assigned on insert and never changes afterwards.
pub trait Entity {
    type Id: Copy + Ord + core::fmt::Display + core::fmt::Debug;

    fn id(&self) -> Self::Id;

    /// Same record, possibly observed at different times.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
