//! Retained per-box variable store
//!
//! Boxes live one frame; widget-local state that must survive (scroll
//! offsets, animation phases, drag anchors) lives here instead, keyed by
//! the box key plus the value's type. Entries persist until explicitly
//! removed, so a widget that disappears for a few frames comes back with
//! its state intact.

use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;

use crate::key::Key;

/// Heterogeneous per-key storage surviving across frames
#[derive(Default)]
pub struct RetainedStore {
    map: FxHashMap<(Key, TypeId), Box<dyn Any>>,
}

impl RetainedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of type `T` retained for `key`, default-constructed on
    /// first access
    pub fn get_or_default<T: Default + 'static>(&mut self, key: Key) -> &mut T {
        self.map
            .entry((key, TypeId::of::<T>()))
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut()
            .expect("retained entry type matches its TypeId")
    }

    pub fn get<T: 'static>(&self, key: Key) -> Option<&T> {
        self.map
            .get(&(key, TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref())
    }

    pub fn set<T: 'static>(&mut self, key: Key, value: T) {
        self.map.insert((key, TypeId::of::<T>()), Box::new(value));
    }

    pub fn remove<T: 'static>(&mut self, key: Key) -> Option<T> {
        self.map
            .remove(&(key, TypeId::of::<T>()))
            .and_then(|value| value.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
