//! Support for [Kornel Lesiński](https://github.com/kornelski) and
//! [Evgeny Safronov](https://github.com/3Hren)'s
//! [rmp-serde](https://crates.io/crates/rmp-serde) crate.

mod codec;
mod ordered_when_encoded;
pub mod serde_safety;