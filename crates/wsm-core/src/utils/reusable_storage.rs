// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Object pool with owned handles.
//!
//! `ReusableStorage<T>` is an arena of slots plus a free-list of released slot
//! indices. `acquire` hands out a [`StorageHandle`], which is neither `Clone`
//! nor `Copy`; `release` takes the handle by value. A released slot can
//! therefore never be reached through a stale handle.

use fixedbitset::FixedBitSet;

/// Buffers that can be emptied while keeping their allocation.
pub trait Recyclable: Default {
    /// Resets the value to its empty state.
    fn recycle(&mut self);
}

impl<T> Recyclable for Vec<T> {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recyclable for FixedBitSet {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

/// Exclusive access token for one live slot of a [`ReusableStorage`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct StorageHandle {
    index: usize,
}

impl StorageHandle {
    /// Returns the slot index this handle refers to.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for StorageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageHandle({})", self.index)
    }
}

/// An arena of recyclable values addressed by [`StorageHandle`]s.
#[derive(Debug, Clone)]
pub struct ReusableStorage<T> {
    slots: Vec<T>,
    free: Vec<usize>,
}

impl<T> Default for ReusableStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReusableStorage<T> {
    /// Creates an empty pool.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Returns the number of slots currently handed out.
    #[inline]
    pub fn num_live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns the number of slots ever allocated, live or free.
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is currently handed out.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_live() == 0
    }

    /// Returns the value behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different pool with more slots.
    #[inline]
    pub fn get(&self, handle: &StorageHandle) -> &T {
        debug_assert!(
            handle.index < self.slots.len(),
            "called `ReusableStorage::get` with a foreign handle: the len is {} but the index is {}",
            self.slots.len(),
            handle.index
        );
        &self.slots[handle.index]
    }

    /// Returns the value behind `handle` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different pool with more slots.
    #[inline]
    pub fn get_mut(&mut self, handle: &StorageHandle) -> &mut T {
        debug_assert!(
            handle.index < self.slots.len(),
            "called `ReusableStorage::get_mut` with a foreign handle: the len is {} but the index is {}",
            self.slots.len(),
            handle.index
        );
        &mut self.slots[handle.index]
    }
}

impl<T> ReusableStorage<T>
where
    T: Recyclable,
{
    /// Hands out an empty value, reusing a released slot when one exists.
    pub fn acquire(&mut self) -> StorageHandle {
        match self.free.pop() {
            Some(index) => StorageHandle { index },
            None => {
                self.slots.push(T::default());
                StorageHandle {
                    index: self.slots.len() - 1,
                }
            }
        }
    }

    /// Returns the slot to the pool. The handle is consumed.
    pub fn release(&mut self, handle: StorageHandle) {
        debug_assert!(
            handle.index < self.slots.len(),
            "called `ReusableStorage::release` with a foreign handle: the len is {} but the index is {}",
            self.slots.len(),
            handle.index
        );
        debug_assert!(
            !self.free.contains(&handle.index),
            "called `ReusableStorage::release` with slot {} which is already free",
            handle.index
        );
        self.slots[handle.index].recycle();
        self.free.push(handle.index);
    }
}
