mod codec;
mod error;
mod ordered_when_encoded;

pub use crate::codecs::codec::Codec;
pub use crate::codecs::error::Error;
pub use crate::codecs::ordered_when_encoded::OrderedWhenEncoded;

// -------------------------------------------------------------------------------------------------
//
// Codec Feature Guard

/// Helper macro: counts how many of the listed features are turned on.
macro_rules! count_features {
    ($($feat:literal),* $(,)?) => {
        0_usize $(+ cfg!(feature = $feat) as usize)*
    };
}

const _CODEC_FEATURE_COUNT: usize = count_features!(
    "rmp-serde",
);

const _: () = {
    assert!(
        // Only one codec feature can be enabled. To fix: 1. open your `Cargo.toml` file, 2. find
        // the `[dependencies]` section where this crate is declared, 3. ensure only one codec
        // feature is enabled.
        !(_CODEC_FEATURE_COUNT > 1),
        "Multiple codec features enabled! Please enable only one of: `rmp-serde`",
    );
};

// -------------------------------------------------------------------------------------------------
//
// Codec Implementations

#[cfg(feature = "rmp-serde")]
pub mod rmp_serde;

// -------------------------------------------------------------------------------------------------
//
// Serde Safety

#[cfg(all(feature = "rmp-serde", feature = "serde-safety"))]
pub use crate::codecs::rmp_serde::serde_safety::SafeForRmpSerde;
