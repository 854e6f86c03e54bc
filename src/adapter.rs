//! Adapter contract (C8): the surface external storage collaborators
//! implement so the core can ask for the two neighbour keys around a
//! cursor, without the core knowing anything about how they're stored.
//!
//! This module defines only the contract. Concrete adapters - a SQL
//! table, an in-memory list, whatever a caller's storage layer is -
//! live outside this crate; [`crate::factory::KeyFactory`] consumes the
//! pair they return as the `(a, b)` bounds for `keyBetween`.

use crate::key::Key;

/// The two neighbours of a cursor (or a boundary), as returned by a
/// [`NeighborSource`] lookup. Either side may be absent, meaning "open
/// bound" - nothing currently sits there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors<Brand = ()> {
    pub before: Option<Key<Brand>>,
    pub after: Option<Key<Brand>>,
}

impl<Brand> Neighbors<Brand> {
    pub fn new(before: Option<Key<Brand>>, after: Option<Key<Brand>>) -> Self {
        Self { before, after }
    }
}

/// Implemented by the storage-layer collaborator that knows how to look up
/// neighbour keys within a group.
///
/// `Group` identifies the ordered collection (e.g. a kanban column id);
/// `Cursor` identifies a single row within it. Implementations MUST filter
/// every lookup by the full group key - a `Cursor` found in the wrong
/// group must not leak that group's neighbours, since a forged cursor from
/// group A should never let a caller splice a key into group B.
pub trait NeighborSource {
    type Group;
    type Cursor;
    type Brand;
    /// Error type surfaced by the underlying storage lookup (e.g. a
    /// database error). Not related to [`crate::error::Error`], which
    /// covers only core-algebra failures.
    type Error;

    /// Neighbours of the position before every existing row in `group`:
    /// `(None, first_key_or_none)`.
    fn neighbors_for_first(
        &self,
        group: &Self::Group,
    ) -> Result<Neighbors<Self::Brand>, Self::Error>;

    /// Neighbours of the position after every existing row in `group`:
    /// `(last_key_or_none, None)`.
    fn neighbors_for_last(&self, group: &Self::Group) -> Result<Neighbors<Self::Brand>, Self::Error>;

    /// Neighbours of the position immediately after `cursor`. `Ok(None)`
    /// means the cursor was not found in this group.
    fn neighbors_for_after(
        &self,
        group: &Self::Group,
        cursor: &Self::Cursor,
    ) -> Result<Option<Neighbors<Self::Brand>>, Self::Error>;

    /// Neighbours of the position immediately before `cursor`. `Ok(None)`
    /// means the cursor was not found in this group.
    fn neighbors_for_before(
        &self,
        group: &Self::Group,
        cursor: &Self::Cursor,
    ) -> Result<Option<Neighbors<Self::Brand>>, Self::Error>;
}

/// Lets application code distinguish a storage-level uniqueness collision
/// (consume the next candidate from the key factory's lazy sequence) from
/// every other error (surface it) without inspecting storage-specific
/// error codes.
pub trait IndexConflictError {
    /// True if this error represents a unique-index violation on the
    /// `(group..., key)` constraint the adapter relies on.
    fn is_index_conflict(&self) -> bool;
}
