//! Marker trait for key types whose encoded byte order preserves their logical order.

/// Marker trait indicating that a type's encoded byte representation preserves its logical
/// ordering.
///
/// Types implementing this trait may be used as keys in range queries and ordered iteration
/// (`OrderedTable::range`/`first`/`last`/`iter`). Without this guarantee, a key's byte order under
/// a given codec may bear no relation to its logical order, making range scans meaningless.
///
/// Each codec backend provides its own set of implementations for the primitive types whose
/// encoding it knows to be order-preserving.
pub trait OrderedWhenEncoded {}
