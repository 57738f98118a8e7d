//! Read transaction methods: typed table access, pass-through to `redb`, and the query-facing
//! surface (`get`/`find`/`for_each`/`count`/`aggregate`) built on the shared query executor.

use crate::Codec;
use crate::Error;
use crate::descriptor::Descriptor;
use crate::querying::Query;
use crate::typed::TableRef;
use crate::typed::transaction::executor;
use crate::value::Value;
use redb::ReadableTable;
use std::ops::ControlFlow;

// -------------------------------------------------------------------------------------------------

pub type RedbReadOnlyTable = redb::ReadOnlyTable<&'static [u8], &'static [u8]>;

// -------------------------------------------------------------------------------------------------
//
/// A wrapper around a `redb` read transaction.
///
/// Read-only transactions may exist concurrently with writes
#[derive(Debug)]
pub struct Transaction(redb::ReadTransaction);

// -------------------------------------------------------------------------------------------------
//
// Method Implementations

impl Transaction {
    /// Wraps a `redb` read transaction into an `warrendb` one.
    #[inline]
    #[must_use]
    pub fn new(redb: redb::ReadTransaction) -> Self {
        redb.into()
    }

    /// Open the given table
    ///
    /// # Notes
    ///
    /// * This method call is passed-through to the `redb` Rust embedded database.
    #[inline]
    pub fn open_table<K, V>(&self, name: &str) -> Result<TableRef<K, V>, Error>
    where
        K: Codec<K>,
        V: Codec<V>,
    {
        let table_definition = redb::TableDefinition::<&[u8], &[u8]>::new(name);
        Ok(TableRef::new(self.0.open_table(table_definition)?))
    }

    /// Open the given table
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn open_redb_table<K, V>(
        &self,
        definition: redb::TableDefinition<'_, K, V>,
    ) -> Result<redb::ReadOnlyTable<K, V>, Error>
    where
        K: redb::Key + 'static,
        V: redb::Value + 'static
    {
        Ok(self.0.open_table(definition)?)
    }

    /// Open the given table without a type
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn open_untyped_table<K, V>(
        &self,
        handle: impl redb::TableHandle,
    ) -> Result<redb::ReadOnlyUntypedTable, Error> {
        Ok(self.0.open_untyped_table(handle)?)
    }

    /// Open the given table
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn open_multimap_table<K, V>(
        &self,
        definition: redb::MultimapTableDefinition<'_, K, V>,
    ) -> Result<redb::ReadOnlyMultimapTable<K, V>, Error>
    where
        K: redb::Key + 'static,
        V: redb::Key + 'static
    {
        Ok(self.0.open_multimap_table(definition)?)
    }

    /// Open the given table
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn open_untyped_multimap_table<K, V>(
        &self,
        handle: impl redb::MultimapTableHandle,
    ) -> Result<redb::ReadOnlyUntypedMultimapTable, Error> {
        Ok(self.0.open_untyped_multimap_table(handle)?)
    }

    /// List all the tables
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn list_tables(
        &self
    ) -> Result<impl Iterator<Item = redb::UntypedTableHandle>, Error> {
        Ok(self.0.list_tables()?)
    }

    /// List all the multimap tables
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[cfg(feature = "redb-pass-through")]
    #[inline]
    pub fn list_multimap_tables(
        &self
    ) -> Result<impl Iterator<Item = redb::UntypedMultimapTableHandle>, Error> {
        Ok(self.0.list_multimap_tables()?)
    }

    /// Looks up a record directly by primary key, bypassing the query engine.
    ///
    /// # Errors
    ///
    /// Propagates decoding and storage errors.
    pub fn get<D: Descriptor + Codec<D>>(&self, key: &Value) -> Result<Option<D>, Error> {
        let key_bytes = key.to_key_bytes()?;
        let definition: redb::TableDefinition<&[u8], &[u8]> = redb::TableDefinition::new(D::bucket_name());
        let table = match self.0.open_table(definition) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        table.get(key_bytes.as_slice())?.map(|v| D::decode(v.value())).transpose().map_err(Into::into)
    }

    /// Runs `query` to completion and returns every matching record, post-processed according to
    /// the query's `distinct`/`sort_by`/`reverse`/`skip`/`limit` settings.
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, and post-processing errors.
    pub fn find<D: Descriptor + Codec<D>>(&self, query: Query) -> Result<Vec<D>, Error> {
        executor::collect::<D>(&self.0, query)
    }

    /// Invokes `f` once per matching record. Returning [`ControlFlow::Break`] from `f` stops
    /// iteration early; `Break(Some(error))` surfaces that error to the caller, `Break(None)` stops
    /// silently.
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, post-processing, and callback errors.
    pub fn for_each<D, F>(&self, query: Query, f: F) -> Result<(), Error>
    where
        D: Descriptor + Codec<D>,
        F: FnMut(D) -> ControlFlow<Option<Error>>,
    {
        executor::for_each::<D, F>(&self.0, query, f)
    }

    /// Counts records matching `query`, without decoding post-processing modifiers beyond what's
    /// needed to answer the count (`distinct` still de-duplicates).
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, and post-processing errors.
    pub fn count<D: Descriptor + Codec<D>>(&self, query: Query) -> Result<usize, Error> {
        Ok(executor::collect::<D>(&self.0, query)?.len())
    }

    /// Runs `query`, then groups the results by `fields` for reduction via [`crate::aggregate::Group`].
    ///
    /// # Errors
    ///
    /// Propagates access-path, decoding, post-processing, and grouping errors.
    pub fn aggregate<D: Descriptor + Codec<D>>(
        &self,
        query: Query,
        fields: &'static [&'static str],
    ) -> Result<Vec<crate::aggregate::Group<D>>, Error> {
        let records = executor::collect::<D>(&self.0, query)?;
        crate::aggregate::Aggregator::group_by(records, fields)
    }

    /// Close the transaction
    ///
    /// Transactions are automatically closed when they and all objects referencing them have been
    /// dropped, so this method does not normally need to be called. This method can be used to
    /// ensure that there are no outstanding objects remaining.
    ///
    /// Returns `ReadTransactionStillInUse` error if a table or other object retrieved from the
    /// transaction still references this transaction
    ///
    /// # Notes
    ///
    /// * This method call is passed directly to the `redb` key-value store.
    #[inline]
    pub fn close(
        self
    ) -> Result<(), Error> {
        Ok(self.0.close().map_err(Box::new)?)
    }
}

// -------------------------------------------------------------------------------------------------
//
// Trait Implementations

impl From<redb::ReadTransaction> for Transaction {
    /// Converts a `redb` read transaction into an `warrendb` read transaction.
    fn from(redb: redb::ReadTransaction) -> Self {
        Self(redb)
    }
}