pub(crate) mod executor;
mod read;
mod write;

pub use crate::typed::transaction::read::Transaction as ReadTransaction;
pub use crate::typed::transaction::write::Transaction as WriteTransaction;