//! Stable identity keys for box-tree nodes
//!
//! A key names a logical call site, not an instance: the same id produces
//! the same key in every frame, which is what lets a box find its previous
//! frame's counterpart before this frame's geometry exists. Repeated calls
//! inside a loop disambiguate by folding the loop index in; widget
//! internals derive sub-keys from their own key.
//!
//! Composition is an order-sensitive two-word mix with strong avalanche.
//! It does not need to be cryptographic, but cross-call-site collisions
//! would corrupt frame diffing, so every bit of both inputs must affect
//! the result.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

const KEY_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Stable 64-bit identity for a box across frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    /// Key for a caller-chosen stable id
    pub const fn from_id(id: u64) -> Self {
        Key(mix(KEY_SEED, id))
    }

    /// Key for a stable string label
    pub fn from_label(label: &str) -> Self {
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        Key(mix(KEY_SEED, hasher.finish()))
    }

    /// Fold a loop index in, so each iteration names a distinct box
    pub const fn index(self, index: u64) -> Self {
        Key(mix(self.0, index))
    }

    /// Derive a sub-key for a widget-internal box
    pub fn child(self, label: &str) -> Self {
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        Key(mix(self.0, hasher.finish()))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Order-sensitive avalanche mix of two 64-bit words (wyhash-style
/// multiply-fold)
const fn mix(a: u64, b: u64) -> u64 {
    let product = (a ^ 0x2d35_8dcc_aa6c_78a5) as u128 * (b ^ 0x8bb8_4b93_962e_acc9) as u128;
    (product as u64) ^ ((product >> 64) as u64)
}
