/// Error returned from the codec or deserializer. This includes errors for corrupted or malformed
/// data, unexpected types, etc.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error returned from [rmp-serde](https://crates.io/crates/rmp-serde)'s decoder.
    ///
    /// To understand the possible errors this codec may produce, please refer to the official
    /// documentation: <https://docs.rs/rmp-serde>
    #[cfg(feature = "rmp-serde")]
    #[error(transparent)]
    RmpSerdeDecode(#[from] rmp_serde::decode::Error),

    /// Error returned from [rmp-serde](https://crates.io/crates/rmp-serde)'s encoder.
    ///
    /// To understand the possible errors this codec may produce, please refer to the official
    /// documentation: <https://docs.rs/rmp-serde>
    #[cfg(feature = "rmp-serde")]
    #[error(transparent)]
    RmpSerdeEncode(#[from] rmp_serde::encode::Error),
}
