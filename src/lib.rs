#![deny(unsafe_op_in_unsafe_fn)]

//! A stable, in-place, top-down merge sort.
//!
//! Every merge stages its output in a scratch buffer before moving it back
//! into the slice. By default one scratch buffer, reserved up front to the
//! length being sorted, is shared by all merges of a sort ([`ScratchPolicy::Shared`]).
//! The naive variant ([`ScratchPolicy::PerMerge`]) allocates a fresh buffer for
//! each merge instead. Both produce identical output, they only differ in how
//! often they allocate.
//!
//! Elements are moved, never cloned, so any `T` can be sorted. If the
//! comparison function panics the slice is left holding a permutation of its
//! original elements.
//!
//! ```
//! let mut v = [5, 3, 8, 1];
//! mergesort::sort(&mut v);
//! assert_eq!(v, [1, 3, 5, 8]);
//!
//! let mut v = [9, 4, 2, 7, 0];
//! mergesort::sort_range(&mut v, 1, 4);
//! assert_eq!(v, [9, 2, 4, 7, 0]);
//! ```

// We always need the tracking module internally to provide a fallback dummy
// implementation to prevent adding conditional compilation everywhere.
#[cfg(not(feature = "tracking"))]
mod tracking;
#[cfg(feature = "tracking")]
pub mod tracking;

mod error;
mod merge;
mod merge_sort;
mod util;

use core::cmp::Ordering;

use util::*;

pub use crate::error::RangeError;
use crate::merge_sort::{merge_sort, FreshScratch, Scratch, SharedScratch};

/// How the scratch space for merging is provided.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScratchPolicy {
    /// One buffer for the whole sort, cleared before every merge.
    #[default]
    Shared,
    /// A freshly allocated buffer for every merge.
    PerMerge,
}

/// See [`slice::sort`].
pub fn sort<T: Ord>(v: &mut [T]) {
    sort_by(v, |a, b| a.cmp(b))
}

/// See [`slice::sort_by_key`].
pub fn sort_by_key<T, F: FnMut(&T) -> K, K: Ord>(v: &mut [T], mut f: F) {
    sort_by(v, |a, b| f(a).cmp(&f(b)))
}

/// See [`slice::sort_by`].
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_with_policy(v, ScratchPolicy::Shared, compare)
}

/// Like [`sort`], except every merge allocates its own scratch buffer.
pub fn naive_sort<T: Ord>(v: &mut [T]) {
    naive_sort_by(v, |a, b| a.cmp(b))
}

/// Like [`sort_by`], except every merge allocates its own scratch buffer.
pub fn naive_sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_with_policy(v, ScratchPolicy::PerMerge, compare)
}

/// Like [`sort`], except the scratch space is taken from `buffer`.
///
/// Any elements in `buffer` are dropped, and it is grown to `v.len()` if it is
/// smaller. It is returned empty with its capacity intact, so one buffer can
/// serve many sorts without reallocating.
pub fn sort_with_buffer<T: Ord>(v: &mut [T], buffer: &mut Vec<T>) {
    sort_with_buffer_by(v, buffer, |a, b| a.cmp(b))
}

/// Like [`sort_by_key`], except the scratch space is taken from `buffer`.
pub fn sort_with_buffer_by_key<T, F: FnMut(&T) -> K, K: Ord>(
    v: &mut [T],
    buffer: &mut Vec<T>,
    mut f: F,
) {
    sort_with_buffer_by(v, buffer, |a, b| f(a).cmp(&f(b)))
}

/// Like [`sort_by`], except the scratch space is taken from `buffer`.
pub fn sort_with_buffer_by<T, F>(v: &mut [T], buffer: &mut Vec<T>, compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    buffer.clear();
    sort_with_scratch(v, move |n| SharedScratch::new(buffer, n), compare)
}

/// Sorts `v[begin..end]`, leaving the rest of `v` untouched.
///
/// # Panics
///
/// Panics if `begin > end` or `end > v.len()`, see [`try_sort_range`].
pub fn sort_range<T: Ord>(v: &mut [T], begin: usize, end: usize) {
    if let Err(err) = try_sort_range(v, begin, end) {
        panic!("invalid sort range: {err}");
    }
}

/// Sorts `v[begin..end]`, leaving the rest of `v` untouched.
///
/// Returns an error without touching `v` if the range is invalid.
pub fn try_sort_range<T: Ord>(v: &mut [T], begin: usize, end: usize) -> Result<(), RangeError> {
    try_sort_range_by(v, begin, end, ScratchPolicy::Shared, |a, b| a.cmp(b))
}

/// Sorts `v[begin..end]` with the comparator `compare` and scratch policy
/// `policy`, leaving the rest of `v` untouched.
///
/// Returns an error without touching `v` if the range is invalid.
pub fn try_sort_range_by<T, F>(
    v: &mut [T],
    begin: usize,
    end: usize,
    policy: ScratchPolicy,
    compare: F,
) -> Result<(), RangeError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    RangeError::check(begin, end, v.len())?;
    sort_with_policy(&mut v[begin..end], policy, compare);
    Ok(())
}

fn sort_with_policy<T, F>(v: &mut [T], policy: ScratchPolicy, compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    match policy {
        ScratchPolicy::Shared => {
            let mut buffer = Vec::new();
            let buffer = &mut buffer;
            sort_with_scratch(v, move |n| SharedScratch::new(buffer, n), compare)
        }
        ScratchPolicy::PerMerge => sort_with_scratch(v, |_| FreshScratch::new(), compare),
    }
}

/// Sorts `v` with scratch from `make_scratch(v.len())`, which is only called
/// if there is something to sort.
fn sort_with_scratch<T, F, S, M>(v: &mut [T], make_scratch: M, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
    S: Scratch<T>,
    M: FnOnce(usize) -> S,
{
    // Zero-sized types are either always or never sorted, as they can not carry
    // any information that would allow the permutation to change.
    if core::mem::size_of::<T>() == 0 || v.len() < 2 {
        return;
    }

    let mut is_less = cmp_from_closure(|a, b| {
        tracking::register_cmp(a, b);
        compare(a, b) == Ordering::Less
    });

    let n = v.len();
    let _input = tracking::track_buffer("input", v.as_ptr(), n);
    let mut scratch = make_scratch(n);
    merge_sort(v, &mut scratch, &mut is_less);
}
