use crate::merge::merge;
use crate::tracking;
use crate::util::*;

/// Source of the staging buffer handed to each merge.
pub trait Scratch<T> {
    /// Returns a buffer able to stage a merge of `len` elements.
    fn acquire(&mut self, len: usize) -> &mut Vec<T>;
}

/// Allocates a fresh buffer of exactly the merge size for every merge.
pub struct FreshScratch<T> {
    buffer: Vec<T>,
}

impl<T> FreshScratch<T> {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }
}

impl<T> Default for FreshScratch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scratch<T> for FreshScratch<T> {
    fn acquire(&mut self, len: usize) -> &mut Vec<T> {
        self.buffer = Vec::with_capacity(len);
        tracking::register_alloc(len);
        &mut self.buffer
    }
}

/// A single buffer, reserved once up front and shared by every merge.
pub struct SharedScratch<'a, T> {
    buffer: &'a mut Vec<T>,
}

impl<'a, T> SharedScratch<'a, T> {
    /// Clears `buffer` and makes sure it can hold `len` elements, which is
    /// enough for every merge of a sort over `len` elements.
    pub fn new(buffer: &'a mut Vec<T>, len: usize) -> Self {
        buffer.clear();
        if buffer.capacity() < len {
            buffer.reserve_exact(len);
            tracking::register_alloc(buffer.capacity());
        }
        Self { buffer }
    }
}

impl<T> Scratch<T> for SharedScratch<'_, T> {
    fn acquire(&mut self, _len: usize) -> &mut Vec<T> {
        &mut *self.buffer
    }
}

/// Stable top-down merge sort of `v`.
///
/// Splits at `v.len() / 2`, so the left half is never the larger one, sorts
/// both halves recursively and merges them through `scratch`. The recursion
/// depth is `ceil(log2(v.len()))`.
///
/// Panics if is_less does, in which case `v` holds a permutation of its
/// original elements.
pub fn merge_sort<T, F: Cmp<T>, S: Scratch<T>>(v: &mut [T], scratch: &mut S, is_less: &mut F) {
    let len = v.len();
    if len <= 1 {
        return;
    }

    let mid = len / 2;
    let (left, right) = v.split_at_mut(mid);
    merge_sort(left, scratch, is_less);
    merge_sort(right, scratch, is_less);
    merge(v, mid, scratch.acquire(len), is_less);
}
