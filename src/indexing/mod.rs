//! Secondary index maintenance: reads and writes the `_index:<Type>:<Field>` buckets that back
//! index-driven query access paths.
//!
//! This module knows nothing about any concrete record type. It operates purely in terms of a
//! [`Descriptor`], a caller-supplied primary-key byte string, and `redb` transactions — the same
//! separation the query engine draws between `Criterion`/`Query` (typed-value logic) and storage.

mod key_set;

pub use crate::indexing::key_set::{ArchivedKeySet, KeySet, ReadableKeySet, UpgradableKeySet};

use crate::descriptor::{Descriptor, IndexKind, IndexedField};
use redb::{ReadableTable, TableDefinition};

/// A `redb` table holding one secondary index bucket: encoded field value → serialized [`KeySet`].
type IndexTable<'txn> = redb::Table<'txn, &'static [u8], &'static [u8]>;

/// Builds the bucket name for a secondary index, `_index:<Type>:<Field>`.
#[must_use]
pub fn index_bucket_name(bucket_name: &str, field_name: &str) -> String {
    format!("_index:{bucket_name}:{field_name}")
}

/// The distinct encoded key-bytes a single record contributes to one indexed field's bucket.
///
/// A scalar field contributes its own encoded value; a slice field contributes one entry per
/// distinct element.
fn contributions(field: &IndexedField, value: &crate::value::Value) -> Result<Vec<Vec<u8>>, crate::Error> {
    match field.kind {
        IndexKind::Scalar => Ok(vec![value.to_key_bytes()?]),
        IndexKind::Slice => {
            let Some(elements) = value.as_sequence() else {
                return Err(crate::Error::TypeMismatch { lhs: "sequence", rhs: value.kind_name() });
            };

            let mut keys = Vec::with_capacity(elements.len());
            for element in elements {
                let key = element.to_key_bytes()?;
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            Ok(keys)
        },
    }
}

/// Opens (creating if absent) an index bucket for writing.
pub(crate) fn open_index_table<'txn>(
    txn: &'txn redb::WriteTransaction,
    bucket_name: &str,
) -> Result<IndexTable<'txn>, crate::Error> {
    let definition: TableDefinition<&[u8], &[u8]> = TableDefinition::new(bucket_name);
    Ok(txn.open_table(definition)?)
}

/// Opens an index bucket for reading, or `None` if it hasn't been created yet (a read-only
/// transaction can't create tables, unlike [`open_index_table`]).
pub(crate) fn open_index_table_for_read<'txn>(
    txn: &'txn redb::ReadTransaction,
    bucket_name: &str,
) -> Result<Option<redb::ReadOnlyTable<&'static [u8], &'static [u8]>>, crate::Error> {
    let definition: TableDefinition<&[u8], &[u8]> = TableDefinition::new(bucket_name);
    match txn.open_table(definition) {
        Ok(table) => Ok(Some(table)),
        Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reads the [`KeySet`] stored at `key_bytes` in an already-open index table, or an empty set if
/// there's no entry.
///
/// # Errors
///
/// Propagates storage errors.
pub(crate) fn keyset_at(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    key_bytes: &[u8],
) -> Result<KeySet, crate::Error> {
    match table.get(key_bytes)? {
        Some(existing) => KeySet::from_bytes(existing.value()),
        None => Ok(KeySet::default()),
    }
}

/// Unions the [`KeySet`]s at several keys in an already-open index table.
///
/// # Errors
///
/// Propagates storage errors.
pub(crate) fn keyset_union(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    keys_bytes: &[Vec<u8>],
) -> Result<KeySet, crate::Error> {
    let mut result = KeySet::default();
    for key_bytes in keys_bytes {
        result = result.union(keyset_at(table, key_bytes)?);
    }
    Ok(result)
}

/// Intersects the [`KeySet`]s at several keys in an already-open index table.
///
/// # Errors
///
/// Propagates storage errors.
pub(crate) fn keyset_intersection(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    keys_bytes: &[Vec<u8>],
) -> Result<KeySet, crate::Error> {
    let Some((first, rest)) = keys_bytes.split_first() else {
        return Ok(KeySet::default());
    };

    let mut result = keyset_at(table, first)?;
    for key_bytes in rest {
        result = result.intersection(&keyset_at(table, key_bytes)?);
    }
    Ok(result)
}

/// Unions every [`KeySet`] whose encoded key falls within `bounds`, in an already-open index
/// table. Used for `Gt`/`Ge`/`Lt`/`Le` criteria driven by a scalar index: `redb`'s `Table::range`
/// walks the bucket in encoded-key order, which is logical order for every `Value` kind (see
/// [`crate::value::Value::to_key_bytes`]).
///
/// # Errors
///
/// Propagates storage errors.
pub(crate) fn keyset_range_union(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    bounds: impl std::ops::RangeBounds<Vec<u8>>,
) -> Result<KeySet, crate::Error> {
    let start: std::ops::Bound<&[u8]> = match bounds.start_bound() {
        std::ops::Bound::Included(b) => std::ops::Bound::Included(b.as_slice()),
        std::ops::Bound::Excluded(b) => std::ops::Bound::Excluded(b.as_slice()),
        std::ops::Bound::Unbounded => std::ops::Bound::Unbounded,
    };
    let end: std::ops::Bound<&[u8]> = match bounds.end_bound() {
        std::ops::Bound::Included(b) => std::ops::Bound::Included(b.as_slice()),
        std::ops::Bound::Excluded(b) => std::ops::Bound::Excluded(b.as_slice()),
        std::ops::Bound::Unbounded => std::ops::Bound::Unbounded,
    };

    let mut result = KeySet::default();
    for entry in table.range::<&[u8]>((start, end))? {
        let (_, value) = entry?;
        result = result.union(KeySet::from_bytes(value.value())?);
    }
    Ok(result)
}

fn write_key_set(
    table: &mut IndexTable<'_>,
    key_bytes: &[u8],
    set: KeySet,
) -> Result<(), crate::Error> {
    if set.is_empty() {
        table.remove(key_bytes)?;
    } else {
        table.insert(key_bytes, set.to_bytes()?.as_slice())?;
    }
    Ok(())
}

/// Adds `primary_key_bytes` to every index entry `record` contributes to, across all of `D`'s
/// indexed fields.
///
/// # Errors
///
/// Propagates field-lookup, encoding, and storage errors.
pub fn insert_index_entries<D: Descriptor>(
    txn: &redb::WriteTransaction,
    record: &D,
    primary_key_bytes: &[u8],
) -> Result<(), crate::Error> {
    for field in D::indexed_fields() {
        let value = record.field(field.name)?;
        let bucket = index_bucket_name(D::bucket_name(), field.name);
        let mut table = open_index_table(txn, &bucket)?;

        for key_bytes in contributions(field, &value)? {
            let mut set = keyset_at(&table, &key_bytes)?;
            set.insert(primary_key_bytes.to_vec());
            write_key_set(&mut table, &key_bytes, set)?;
        }
    }
    Ok(())
}

/// Removes `primary_key_bytes` from every index entry `record` contributed to. Entries left empty
/// are deleted from the bucket entirely, not stored as an empty [`KeySet`].
///
/// # Errors
///
/// Propagates field-lookup, encoding, and storage errors.
pub fn remove_index_entries<D: Descriptor>(
    txn: &redb::WriteTransaction,
    record: &D,
    primary_key_bytes: &[u8],
) -> Result<(), crate::Error> {
    for field in D::indexed_fields() {
        let value = record.field(field.name)?;
        let bucket = index_bucket_name(D::bucket_name(), field.name);
        let mut table = open_index_table(txn, &bucket)?;

        for key_bytes in contributions(field, &value)? {
            let mut set = keyset_at(&table, &key_bytes)?;
            set.remove(primary_key_bytes);
            write_key_set(&mut table, &key_bytes, set)?;
        }
    }
    Ok(())
}

/// Updates index entries for a record whose fields changed from `old` to `new`, computing the
/// symmetric difference of contributions per indexed field so unaffected entries aren't touched.
///
/// # Errors
///
/// Propagates field-lookup, encoding, and storage errors.
pub fn update_index_entries<D: Descriptor>(
    txn: &redb::WriteTransaction,
    old: &D,
    new: &D,
    primary_key_bytes: &[u8],
) -> Result<(), crate::Error> {
    for field in D::indexed_fields() {
        let old_value = old.field(field.name)?;
        let new_value = new.field(field.name)?;
        let bucket = index_bucket_name(D::bucket_name(), field.name);
        let mut table = open_index_table(txn, &bucket)?;

        let old_keys = contributions(field, &old_value)?;
        let new_keys = contributions(field, &new_value)?;

        for key_bytes in &old_keys {
            if !new_keys.contains(key_bytes) {
                let mut set = keyset_at(&table, key_bytes)?;
                set.remove(primary_key_bytes);
                write_key_set(&mut table, key_bytes, set)?;
            }
        }
        for key_bytes in &new_keys {
            if !old_keys.contains(key_bytes) {
                let mut set = keyset_at(&table, key_bytes)?;
                set.insert(primary_key_bytes.to_vec());
                write_key_set(&mut table, key_bytes, set)?;
            }
        }
    }
    Ok(())
}

/// Reads the candidate [`KeySet`] for a single encoded index key, e.g. the result of `Eq(v)` on a
/// scalar index. Returns an empty set if the bucket has no table yet or no entry for this key.
///
/// # Errors
///
/// Propagates storage errors (other than the table simply not existing yet).
pub fn lookup(
    txn: &redb::ReadTransaction,
    bucket_name: &str,
    key_bytes: &[u8],
) -> Result<KeySet, crate::Error> {
    match open_index_table_for_read(txn, bucket_name)? {
        Some(table) => keyset_at(&table, key_bytes),
        None => Ok(KeySet::default()),
    }
}

/// Reads and unions the candidate [`KeySet`]s for several encoded index keys, e.g. `In(vs)` on a
/// scalar index or `Contains`/`ContainsAny` on a slice index.
///
/// # Errors
///
/// Propagates storage errors.
pub fn lookup_union(
    txn: &redb::ReadTransaction,
    bucket_name: &str,
    keys_bytes: &[Vec<u8>],
) -> Result<KeySet, crate::Error> {
    match open_index_table_for_read(txn, bucket_name)? {
        Some(table) => keyset_union(&table, keys_bytes),
        None => Ok(KeySet::default()),
    }
}

/// Reads and intersects the candidate [`KeySet`]s for several encoded index keys, e.g.
/// `ContainsAll(vs)` on a slice index.
///
/// # Errors
///
/// Propagates storage errors.
pub fn lookup_intersection(
    txn: &redb::ReadTransaction,
    bucket_name: &str,
    keys_bytes: &[Vec<u8>],
) -> Result<KeySet, crate::Error> {
    match open_index_table_for_read(txn, bucket_name)? {
        Some(table) => keyset_intersection(&table, keys_bytes),
        None => Ok(KeySet::default()),
    }
}

/// Reads and unions every index entry whose encoded key falls within `bounds`, used for
/// `Gt`/`Ge`/`Lt`/`Le` criteria driven by a scalar index. `redb`'s `Table::range` walks the bucket
/// in encoded-key order, which is logical order for every `Value` kind (see
/// [`crate::value::Value::to_key_bytes`]).
///
/// # Errors
///
/// Propagates storage errors.
pub fn range_union(
    txn: &redb::ReadTransaction,
    bucket_name: &str,
    bounds: impl std::ops::RangeBounds<Vec<u8>>,
) -> Result<KeySet, crate::Error> {
    match open_index_table_for_read(txn, bucket_name)? {
        Some(table) => keyset_range_union(&table, bounds),
        None => Ok(KeySet::default()),
    }
}

// -------------------------------------------------------------------------------------------------
//
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Account {
        id: u64,
        age: i64,
        tags: Vec<String>,
    }

    impl Descriptor for Account {
        fn bucket_name() -> &'static str {
            "Account"
        }

        fn primary_key(&self) -> Option<Value> {
            Some(Value::from(self.id))
        }

        fn field(&self, name: &str) -> Result<Value, crate::Error> {
            match name {
                "Age" => Ok(Value::from(self.age)),
                "Tags" => Ok(Value::from(self.tags.clone())),
                other => Err(crate::Error::FieldNotFound {
                    field: Box::leak(other.to_string().into_boxed_str()),
                }),
            }
        }

        fn indexed_fields() -> &'static [IndexedField] {
            &[IndexedField::scalar("Age"), IndexedField::slice("Tags")]
        }
    }

    #[test]
    fn scalar_contributions_are_single_key() {
        let account = Account { id: 1, age: 30, tags: vec![] };
        let field = IndexedField::scalar("Age");
        let value = account.field("Age").unwrap();
        let keys = contributions(&field, &value).unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn slice_contributions_dedup_elements() {
        let account =
            Account { id: 1, age: 30, tags: vec!["admin".into(), "admin".into(), "staff".into()] };
        let field = IndexedField::slice("Tags");
        let value = account.field("Tags").unwrap();
        let keys = contributions(&field, &value).unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn bucket_name_matches_spec_format() {
        assert_eq!(index_bucket_name("Account", "Age"), "_index:Account:Age");
    }
}
