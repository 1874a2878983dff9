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

//! A stack that never frees popped elements.
//!
//! `LogicalStack<T>` keeps a logical length separate from the backing vector.
//! Popping only shrinks the logical length, so a later push hands back the
//! old element with its allocations intact. Elements returned by a push may
//! hold stale data; callers overwrite every field they rely on.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
pub struct LogicalStack<T> {
    items: Vec<T>,
    len: usize,
}

impl<T> Default for LogicalStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LogicalStack<T> {
    /// Creates a new, empty `LogicalStack`.
    #[inline]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            len: 0,
        }
    }

    /// Returns the logical number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements kept alive, including popped ones.
    #[inline]
    pub fn retained(&self) -> usize {
        self.items.len()
    }

    /// Returns the top element.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the top element mutably.
    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Returns the live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    /// Returns the live elements mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }

    /// Iterates over the live elements, bottom first.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Removes the top element logically. Returns `false` if empty.
    #[inline]
    pub fn pop(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Shrinks the logical length to `len`. Does nothing if already shorter.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Logically removes all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<T> LogicalStack<T>
where
    T: Default,
{
    /// Pushes an element and returns it. The element may hold stale data.
    pub fn push(&mut self) -> &mut T {
        if self.len == self.items.len() {
            self.items.push(T::default());
        }
        self.len += 1;
        &mut self.items[self.len - 1]
    }
}

impl<T> LogicalStack<T>
where
    T: Default + Clone,
{
    /// Pushes a copy of the current top element, via `clone_from` so the
    /// reused slot keeps its allocation.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn push_copy_of_last(&mut self) -> &mut T {
        assert!(
            self.len > 0,
            "called `LogicalStack::push_copy_of_last` on an empty stack"
        );
        if self.len == self.items.len() {
            self.items.push(T::default());
        }
        let (head, tail) = self.items.split_at_mut(self.len);
        tail[0].clone_from(&head[self.len - 1]);
        self.len += 1;
        &mut tail[0]
    }
}

impl<T> Index<usize> for LogicalStack<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.len,
            "called `LogicalStack::index` with index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for LogicalStack<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.len,
            "called `LogicalStack::index_mut` with index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
        &mut self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_tracks_logical_length() {
        let mut stack: LogicalStack<Vec<u8>> = LogicalStack::new();
        assert!(stack.is_empty());
        stack.push().push(1);
        stack.push().push(2);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.last(), Some(&vec![2]));

        assert!(stack.pop());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.retained(), 2);
        assert!(stack.pop());
        assert!(!stack.pop());
    }

    #[test]
    fn test_popped_slot_is_reused_with_stale_contents() {
        let mut stack: LogicalStack<Vec<u8>> = LogicalStack::new();
        stack.push().extend([1, 2, 3]);
        stack.pop();

        let reused = stack.push();
        assert_eq!(reused, &vec![1, 2, 3]);
        reused.clear();
        assert_eq!(stack.retained(), 1);
    }

    #[test]
    fn test_push_copy_of_last_clones_top() {
        let mut stack: LogicalStack<Vec<u8>> = LogicalStack::new();
        stack.push().extend([4, 5]);
        stack.push_copy_of_last().push(6);
        assert_eq!(stack[0], vec![4, 5]);
        assert_eq!(stack[1], vec![4, 5, 6]);

        stack.truncate(1);
        stack.push_copy_of_last();
        assert_eq!(stack[1], vec![4, 5]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_index_beyond_logical_length_panics() {
        let mut stack: LogicalStack<u32> = LogicalStack::new();
        *stack.push() = 1;
        stack.pop();
        let _ = stack[0];
    }
}
