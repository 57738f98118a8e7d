//! An index manages non-unique indexes & one-to-many index relationships.

// Trait representing read-only access to a set of primary keys in an index entry.

mod readable_key_set;
mod upgradable_key_set;

pub use crate::indexing::key_set::readable_key_set::ReadableKeySet;
pub use crate::indexing::key_set::upgradable_key_set::UpgradableKeySet;

// -------------------------------------------------------------------------------------------------
//
// Key Set Feature Guard

/// Helper macro: counts how many of the listed features are turned on.
macro_rules! count_features {
    ($($feat:literal),* $(,)?) => {
        0_usize $(+ cfg!(feature = $feat) as usize)*
    };
}

const _KEY_SET_FEATURE_COUNT: usize = count_features!(
    "key-set-btree",
    "key-set-vec",
);

const _: () = {
    assert!(
        // Only one key-set index feature can be enabled. To fix: 1. open your `Cargo.toml` file, 2.
        // find `warrendb` under `[dependencies]`, 3. ensure only one key-set index feature is
        // enabled.
        !(_KEY_SET_FEATURE_COUNT > 1),
        "Multiple key-set features enabled! Please enable only one of: \
        `key-set-btree` or \
        `key-set-vec`",
    );
};

// -------------------------------------------------------------------------------------------------
//
// Key Set Implementations

// BTreeSet-backed index sets

#[cfg(feature = "key-set-btree")]
pub(super) mod b_tree_set;

#[cfg(feature = "key-set-btree")]
pub use crate::indexing::key_set::b_tree_set::{ArchivedKeySet, KeySet};

// Vec-backed index sets

#[cfg(feature = "key-set-vec")]
pub(super) mod vec;

#[cfg(feature = "key-set-vec")]
pub use crate::indexing::key_set::vec::{ArchivedKeySet, KeySet};