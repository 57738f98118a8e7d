//! Runtime field reflection for record types stored in a bucket.
//!
//! The query engine is generic over record types at the level of a trait object, not a compile-time
//! type parameter chain: a `Descriptor` hands back a [`Value`](crate::value::Value) for any named
//! field, so [`Criterion`](crate::querying::criterion::Criterion) evaluation and index maintenance
//! never need to know the concrete Rust type they're working with.

use crate::value::Value;

/// The kind of index a field maintains, and therefore how its bucket is populated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexKind {
    /// One index entry per record: the field's value maps to exactly one [`KeySet`](crate::indexing::KeySet)
    /// entry (the record's primary key joins that set).
    Scalar,
    /// One index entry per element of a sequence field: each element of the field's `Sequence`
    /// value gets its own entry, and the record's primary key is added to every one of them.
    Slice,
}

/// Declares that a named field is indexed, and how.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexedField {
    /// The field name, as passed to [`Descriptor::field`] and to `query.field(name)`.
    pub name: &'static str,
    pub kind: IndexKind,
}

impl IndexedField {
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self { name, kind: IndexKind::Scalar }
    }

    #[must_use]
    pub const fn slice(name: &'static str) -> Self {
        Self { name, kind: IndexKind::Slice }
    }
}

/// Implemented by every record type stored in a bucket.
///
/// A hand-written impl is expected per record type — there is no derive macro here, matching the
/// rest of this crate's avoidance of proc-macro dependencies. The impl is typically a short,
/// mechanical `match` over field names.
pub trait Descriptor {
    /// The bucket this record type is stored under, e.g. `"Account"`.
    fn bucket_name() -> &'static str
    where
        Self: Sized;

    /// The record's primary key, as a [`Value`], or `None` if the type has no declared primary key
    /// field (in which case the store assigns one, mirroring bolthold's auto-increment behavior for
    /// un-keyed structs).
    fn primary_key(&self) -> Option<Value>;

    /// Looks up a field by name. `name` may be [`crate::querying::KEY_FIELD`], in which case the
    /// implementation should return the same value as [`Descriptor::primary_key`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FieldNotFound`] if `name` does not name a field this type declares.
    fn field(&self, name: &str) -> Result<Value, crate::Error>;

    /// The fields this record type maintains secondary indexes for. Declaration order matters: the
    /// executor favors the first index-eligible criterion in a query's declaration order when more
    /// than one criterion could use an index.
    fn indexed_fields() -> &'static [IndexedField]
    where
        Self: Sized;
}
