   /*
                                          ░░
                                        ░░▓▓░░
                                  ░▒▓██▓▓▒▒▒▒▓▓██▓▒░
                               ░▒█▓▒▒▒▒▒▓▒░█▒▓▒▒▒▒▒▓█▒░
                             ░▓▓▒▒▒▓▒▓▒▓▓▒░█▒▓▓▓▓▓▒▒▓▒▓▓▒
                           ░██▒▓▒▒▒▓█▓▒░░▒▒▒▓░░▒▓█▓▒▒▒▒▒▓█░
                          ▒█▒▒▓▓▓▓▓░     ▒▓█▒     ░▓▓▓▓▒▒▒█▒
                         ▒█▒▓▒▓▓▓░      ▒▓▓█▓▒      ░▓▓▒▒▓▒█▒
                        ░█▒▓▒▓▓▒       ▒█▓▓█▓█▒       ▒█▓▓▒▒█░
                       ░▓▓▒▒▓▓▒       ▒▓▓▓▓▓▓▓▓▒       ▒▓▓▒▒▓█░
                       ░█▒▒▓▒█░      ▒▓█▓█▓██▓█▓▒      ░█▒▓▒▒█▒
                       ▒▓▒▒▒▓▒      ░▓██▓▒▒█▒▓██▓░      ▒▓▒▓▒▓▒
                       ▒▓▒▒▒█▒     ░█▓██▓▓▒█▓▓███▓░     ▒█▒▓▒▓▒
                       ▒▓▒▒▓▓▓    ░▓▓█▓█▒▒▒█▒▒█▓█▓▓░    ▓▓▓▒▒▓▒
                       ░█▒▒▓▒█░  ░▓██▓▒  ░▒█░  ▒▓██▓░  ░█▒▒▒▒█░
                        ▓█▒▒▒▓▓░░▓▒▓▒░   ░▒█░   ░▒▓▒▓░░▓▓▓▒▒▓▓
                         █▓▒▒▒▓▓▓▒▓░     ░▒█░     ░▓▒▒▓▓▓▒▓▓█
                         ░▓▓▒▒▒▒█▒░      ░▒█░      ░▒█▓▒▒▒▓▓░
                          ░▓▓▒▒▒▓▓▓▓░    ░▒█░    ░▓▓▓▓▒▒▒▓▓░
                            ░█▓▒▓▒▓▓▒██▓▒▒▒█▒▒▓██▒▓▓▒▓▒▓█░
                             ░▒▓▓▓▒▒▒▒▓▒▒▒▒█▓▒▒▓▒▒▒▒▓▓▓▒░
                                ░▒▓█▓▒▒▒▒▒▒█▒▒▒▒▒▓██▒░
                                    ░▒▓███▓████▓▒░
                                          ▒▓░
                                          ░▒

                                  W A R R E N D B
*/

//! A typed, index-aware layer over [`redb`](https://docs.rs/redb), an embedded key-value store.
//!
//! `warrendb` keeps a primary table per record type plus one secondary-index table per indexed
//! field, maintains those indexes on every write, and answers a fluent [`querying::Query`] by
//! picking the cheapest index-driven access path it can find before falling back to a full scan.
//!
//! See [`typed::database::Database`] for the entry point, [`descriptor::Descriptor`] for how a
//! record type describes its own bucket name, primary key, and indexed fields, and
//! [`querying::Query`] for building queries.

#![warn(
   clippy::all,
   clippy::cargo,
   clippy::nursery,
   clippy::pedantic,
   clippy::style,
)]

mod error;
pub use crate::error::Error;

pub mod aggregate;
pub mod codecs;
pub mod descriptor;
pub mod indexing;
pub mod querying;
pub mod typed;
pub mod value;

pub use crate::aggregate::{Aggregator, Group};
pub use crate::codecs::Codec;
pub use crate::descriptor::{Descriptor, IndexKind, IndexedField};
pub use crate::querying::Query;
pub use crate::value::{Comparer, Value};
