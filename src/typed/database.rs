use crate::Error;
use crate::typed::transaction::ReadTransaction;
use crate::typed::transaction::WriteTransaction;

/// The entry point for working with a redb database using typed keys and values.
///
/// This type wraps a `redb::Database` and provides ergonomic access to typed tables,
/// leveraging the `Codec` trait for automatic encoding and decoding.
///
/// For ordered operations, use tables with key types that also implement [`OrderedWhenEncoded`].
pub struct Database(redb::Database);

impl Database {
    /// Opens or creates a database at the given file path.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let redb = redb::Database::create(path)?;
        Ok(Self(redb))
    }

    /// Begins a read-only transaction.
    pub fn read(&self) -> Result<ReadTransaction, Error> {
        Ok(ReadTransaction::new(self.0.begin_read()?))
    }

    /// Begins a writable transaction.
    pub fn write(&self) -> Result<WriteTransaction, Error> {
        Ok(WriteTransaction::new(self.0.begin_write()?))
    }
}
