//! The read-write transaction wrapper: mutation methods that keep secondary indexes consistent.

use crate::descriptor::Descriptor;
use crate::indexing;
use crate::querying::Query;
use crate::typed::transaction::executor;
use crate::value::Value;
use crate::{Codec, Error, typed::TableMut};
use redb::{ReadableTable, TableDefinition, WriteTransaction};

/// The bucket an auto-increment counter is stored under for a given record type, `_seq:<Type>`.
fn sequence_bucket_name(bucket_name: &str) -> String {
    format!("_seq:{bucket_name}")
}

/// Reserves the next auto-increment primary key for `D`, for record types whose
/// [`Descriptor::primary_key`] returns `None`. Mirrors bolthold's behavior of assigning sequential
/// `u64` keys to un-keyed structs.
fn next_sequence<D: Descriptor>(txn: &WriteTransaction) -> Result<u64, Error> {
    let bucket = sequence_bucket_name(D::bucket_name());
    let definition: TableDefinition<&[u8], u64> = TableDefinition::new(&bucket);
    let mut table = txn.open_table(definition)?;
    let next = table.get(b"seq".as_slice())?.map_or(1, |v| v.value() + 1);
    table.insert(b"seq".as_slice(), next)?;
    Ok(next)
}

// -------------------------------------------------------------------------------------------------
//
/// ## Index Safety Feature
///
/// If you're missing methods like `table` on this `Transaction`, it's likely due to the default
/// `index-safety` feature.
///
/// `index-safety` prevents direct table mutation (through `TableMut`) to ensure all inserts and
/// deletes are coordinated with secondary indexes.
///
/// ### Options:
/// * Safe default: use high-level methods like `insert`, `update`, and `delete`.
/// * Manual mode: disable the `index-safety` feature to get back low-level `table` access.
///
/// This ensures `warrendb` is safe by default but fully controllable by experts.
pub struct Transaction(WriteTransaction);

// -------------------------------------------------------------------------------------------------
//
// Method Implementations

impl Transaction {
    #[must_use] pub fn new(redb: WriteTransaction) -> Self {
        redb.into()
    }

    /// Opens a mutable typed table by name, bypassing index maintenance entirely.
    #[cfg(not(feature = "index-safety"))]
    pub fn table<K, V>(&self, name: &str) -> Result<TableMut<K, V>, Error>
    where
        K: Codec<K>,
        V: Codec<V>,
    {
        let table_definition = TableDefinition::<&[u8], &[u8]>::new(name);
        let redb_table = self.0.open_table(table_definition)?;
        Ok(TableMut::new(redb_table))
    }

    /// Commits the transaction and makes all changes permanent.
    pub fn commit(self) -> Result<(), Error> {
        self.0.commit()?;
        Ok(())
    }

    fn primary_table<D: Descriptor>(&self) -> Result<redb::Table<'_, &'static [u8], &'static [u8]>, Error> {
        let definition: TableDefinition<&[u8], &[u8]> = TableDefinition::new(D::bucket_name());
        Ok(self.0.open_table(definition)?)
    }

    /// Resolves the primary-key bytes a record will be stored under, assigning the next
    /// auto-increment sequence value if `D::primary_key` returns `None`.
    ///
    /// # Errors
    ///
    /// Propagates key encoding and storage errors.
    fn resolve_key<D: Descriptor>(&self, record: &D) -> Result<Vec<u8>, Error> {
        match record.primary_key() {
            Some(key) => key.to_key_bytes(),
            None => Ok(next_sequence::<D>(&self.0)?.to_be_bytes().to_vec()),
        }
    }

    /// Inserts `record`, replacing any existing record under the same primary key and updating
    /// secondary indexes to match. Returns the primary key bytes the record was stored under — the
    /// caller's own value if one is declared, or a freshly assigned sequence number otherwise.
    ///
    /// # Errors
    ///
    /// Propagates encoding, decoding, and storage errors.
    pub fn insert<D: Descriptor + Codec<D>>(&mut self, record: &D) -> Result<Vec<u8>, Error> {
        let key_bytes = self.resolve_key(record)?;
        let value_bytes = D::encode(record)?;

        let previous = {
            let mut table = self.primary_table::<D>()?;
            table.insert(key_bytes.as_slice(), value_bytes.as_slice())?
                .map(|v| D::decode(v.value()))
                .transpose()?
        };

        match previous {
            Some(old) => indexing::update_index_entries(&self.0, &old, record, &key_bytes)?,
            None => indexing::insert_index_entries(&self.0, record, &key_bytes)?,
        }

        Ok(key_bytes)
    }

    /// Inserts `record`, failing if a record already exists under the same primary key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyExists`] if the key is already occupied. Propagates encoding, decoding,
    /// and storage errors otherwise.
    pub fn insert_new<D: Descriptor + Codec<D>>(&mut self, record: &D) -> Result<Vec<u8>, Error> {
        let key_bytes = self.resolve_key(record)?;

        {
            let table = self.primary_table::<D>()?;
            if table.get(key_bytes.as_slice())?.is_some() {
                return Err(Error::KeyExists);
            }
        }

        let value_bytes = D::encode(record)?;
        {
            let mut table = self.primary_table::<D>()?;
            table.insert(key_bytes.as_slice(), value_bytes.as_slice())?;
        }
        indexing::insert_index_entries(&self.0, record, &key_bytes)?;

        Ok(key_bytes)
    }

    /// Replaces the record stored under `key`, failing if no record is currently stored there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `key` has no existing record. Propagates encoding, decoding,
    /// and storage errors otherwise.
    pub fn update<D: Descriptor + Codec<D>>(&mut self, key: &Value, record: &D) -> Result<(), Error> {
        let key_bytes = key.to_key_bytes()?;

        let old = {
            let table = self.primary_table::<D>()?;
            let Some(existing) = table.get(key_bytes.as_slice())? else {
                return Err(Error::NotFound { table_name: D::bucket_name().to_string(), key: key_bytes });
            };
            D::decode(existing.value())?
        };

        let value_bytes = D::encode(record)?;
        {
            let mut table = self.primary_table::<D>()?;
            table.insert(key_bytes.as_slice(), value_bytes.as_slice())?;
        }
        indexing::update_index_entries(&self.0, &old, record, &key_bytes)?;

        Ok(())
    }

    /// Removes the record stored under `key`, along with its secondary index entries.
    ///
    /// Returns the removed record, or `None` if `key` had no record.
    ///
    /// # Errors
    ///
    /// Propagates decoding and storage errors.
    pub fn delete<D: Descriptor + Codec<D>>(&mut self, key: &Value) -> Result<Option<D>, Error> {
        let key_bytes = key.to_key_bytes()?;

        let removed = {
            let mut table = self.primary_table::<D>()?;
            table.remove(key_bytes.as_slice())?.map(|v| D::decode(v.value())).transpose()?
        };

        if let Some(record) = &removed {
            indexing::remove_index_entries(&self.0, record, &key_bytes)?;
        }

        Ok(removed)
    }

    /// Deletes every record matching `query`, returning how many were removed.
    ///
    /// Matching primary keys are collected before any mutation begins, so the delete is unaffected
    /// by the table shrinking as it proceeds.
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, and storage errors.
    pub fn delete_matching<D: Descriptor + Codec<D>>(&mut self, query: &Query) -> Result<usize, Error> {
        let keys = executor::matching_keys::<D>(&self.0, query)?;

        for key_bytes in &keys {
            let removed = {
                let mut table = self.primary_table::<D>()?;
                table.remove(key_bytes.as_slice())?.map(|v| D::decode(v.value())).transpose()?
            };
            if let Some(record) = removed {
                indexing::remove_index_entries(&self.0, &record, key_bytes)?;
            }
        }

        Ok(keys.len())
    }

    /// Applies `mutate` to every record matching `query`, writing back each result and keeping
    /// secondary indexes consistent with the change. Returns how many records were updated.
    ///
    /// Matching primary keys are collected before any mutation begins, mirroring
    /// [`Transaction::delete_matching`].
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, and storage errors.
    pub fn update_matching<D: Descriptor + Codec<D> + Clone>(
        &mut self,
        query: &Query,
        mut mutate: impl FnMut(&mut D),
    ) -> Result<usize, Error> {
        let keys = executor::matching_keys::<D>(&self.0, query)?;

        for key_bytes in &keys {
            let old = {
                let table = self.primary_table::<D>()?;
                let Some(existing) = table.get(key_bytes.as_slice())? else { continue };
                D::decode(existing.value())?
            };

            let mut new = old.clone();
            mutate(&mut new);

            let value_bytes = D::encode(&new)?;
            {
                let mut table = self.primary_table::<D>()?;
                table.insert(key_bytes.as_slice(), value_bytes.as_slice())?;
            }
            indexing::update_index_entries(&self.0, &old, &new, key_bytes)?;
        }

        Ok(keys.len())
    }

    /// Looks up a record directly by primary key, bypassing the query engine.
    ///
    /// # Errors
    ///
    /// Propagates decoding and storage errors.
    pub fn get<D: Descriptor + Codec<D>>(&self, key: &Value) -> Result<Option<D>, Error> {
        let key_bytes = key.to_key_bytes()?;
        let table = self.primary_table::<D>()?;
        table.get(key_bytes.as_slice())?.map(|v| D::decode(v.value())).transpose().map_err(Into::into)
    }

    /// Evaluates `query` against this in-progress transaction's view of the data, post-processed
    /// according to the query's `distinct`/`sort_by`/`reverse`/`skip`/`limit` settings, the same as
    /// [`crate::typed::transaction::read::Transaction::find`].
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, and post-processing errors.
    pub fn find<D: Descriptor + Codec<D>>(&self, query: &Query) -> Result<Vec<D>, Error> {
        let keys = executor::matching_keys::<D>(&self.0, query)?;
        let table = self.primary_table::<D>()?;

        let mut out = Vec::with_capacity(keys.len());
        for key_bytes in keys {
            if let Some(value) = table.get(key_bytes.as_slice())? {
                out.push(D::decode(value.value())?);
            }
        }
        executor::post_process(out, query)
    }
}

// -------------------------------------------------------------------------------------------------
//
// Trait Implementations

impl From<WriteTransaction> for Transaction {
    fn from(redb: WriteTransaction) -> Self {
        Self(redb)
    }
}
