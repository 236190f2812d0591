#![forbid(unsafe_code)]

//! Slot registry mapping host objects to stable [`ElementId`] handles.
//!
//! # Invariants
//!
//! 1. A live object keeps the same handle until it is released.
//! 2. Released slots are reused, so the registry is bounded by the number
//!    of live objects rather than by every object ever seen.

use folio_core::ElementId;

#[derive(Debug)]
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the live entry `same` matches, registering `item` otherwise.
    pub fn intern_by(&mut self, item: T, same: impl Fn(&T, &T) -> bool) -> ElementId {
        let found = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|known| same(known, &item)));
        if let Some(index) = found {
            return ElementId(index as u32);
        }
        self.insert(item)
    }

    /// Register `item` without a lookup; for objects the host just created.
    pub fn insert(&mut self, item: T) -> ElementId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(item);
            return ElementId(index);
        }
        self.slots.push(Some(item));
        ElementId((self.slots.len() - 1) as u32)
    }

    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.slots.get(id.get() as usize)?.as_ref()
    }

    /// Drop the entry for `id`, freeing its slot.
    pub fn release(&mut self, id: ElementId) -> Option<T> {
        let item = self.slots.get_mut(id.get() as usize)?.take()?;
        self.free.push(id.get());
        Some(item)
    }

    /// Number of live entries.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Slots allocated, live or free.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
