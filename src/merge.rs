/*
    A merge stages its output in scratch and then moves it back:

          0           left        mid          right        len
          |  consumed  |   left    |  consumed  |   right    |
        v [............LLLLLLLLLLLL.............RRRRRRRRRRRRRR]

        scratch [ taken from either run, in merged order ]
                                                 |
                                               filled

    While both runs are non-empty we compare the heads v[left] and v[right]
    and move the smaller one to scratch[filled]. The right head is only taken
    if it is strictly less than the left head, so equal elements leave in
    their original order. Once one run is exhausted the rest of the left run
    and then the rest of the right run are appended, and all of scratch is
    moved back over v.

    At any point during the comparison loop the consumed prefixes of both runs
    are holes, and scratch[..filled] holds exactly the elements that were in
    them, with filled == left + (right - mid). If the comparison panics the
    HoleGuard moves scratch[..left] into v[..left] and scratch[left..filled]
    into v[mid..right], so v is left as a permutation of its original
    contents. The scratch Vec keeps a length of zero throughout, so it never
    drops the values it temporarily holds.
*/

use crate::tracking::{self, ptr};
use crate::util::*;

/// Refills the consumed prefixes of both runs from scratch if dropped.
struct HoleGuard<T> {
    src: *mut T,
    dst: *mut T,
    mid: usize,
    left: usize,
    right: usize,
}

impl<T> Drop for HoleGuard<T> {
    #[inline(never)]
    #[cold]
    fn drop(&mut self) {
        unsafe {
            // SAFETY: scratch[..left + right - mid] holds the elements moved
            // out of v[..left] and v[mid..right], and nothing else refers to
            // those positions any more.
            let from_right = self.right - self.mid;
            ptr::copy_nonoverlapping(self.dst, self.src, self.left);
            ptr::copy_nonoverlapping(
                self.dst.add(self.left),
                self.src.add(self.mid),
                from_right,
            );
        }
    }
}

/// Stably merges the sorted runs `v[..mid]` and `v[mid..]` into a sorted `v`.
///
/// The scratch buffer is cleared first, its capacity grown to `v.len()` if it
/// is too small, and it is empty again on return.
///
/// Panics if is_less does, in which case `v` holds a permutation of its
/// original elements. Aborts if `mid > v.len()`.
pub fn merge<T, F: Cmp<T>>(v: &mut [T], mid: usize, scratch: &mut Vec<T>, is_less: &mut F) {
    let len = v.len();
    assert_abort(mid <= len);

    scratch.clear();
    scratch.reserve(len);
    // Declared before the hole so that on unwind the hole is refilled while
    // scratch is still registered.
    let _scratch = tracking::track_buffer("scratch", scratch.as_ptr(), scratch.capacity());

    let src = v.as_mut_ptr();
    let dst = scratch.as_mut_ptr();
    let mut hole = HoleGuard {
        src,
        dst,
        mid,
        left: 0,
        right: mid,
    };

    unsafe {
        // SAFETY: left < mid and right < len inside the loop, and the filled
        // position left + right - mid < len fits in the reserved capacity.
        // Only live elements (at left and right) are ever read.
        while hole.left < mid && hole.right < len {
            let l = src.add(hole.left);
            let r = src.add(hole.right);
            let take_right = is_less(&*r, &*l);
            let filled = hole.left + (hole.right - mid);
            ptr::copy_nonoverlapping(select(take_right, r, l), dst.add(filled), 1);
            hole.left += !take_right as usize;
            hole.right += take_right as usize;
        }

        // No more comparisons, so nothing below can panic.
        let (left, right) = (hole.left, hole.right);
        core::mem::forget(hole);

        // SAFETY: the remainders v[left..mid] and v[right..len] are live and
        // together exactly fill scratch[left + right - mid..len]. Afterwards
        // scratch[..len] holds every element once and is moved back over v.
        let mut filled = left + (right - mid);
        ptr::copy_nonoverlapping(src.add(left), dst.add(filled), mid - left);
        filled += mid - left;
        ptr::copy_nonoverlapping(src.add(right), dst.add(filled), len - right);
        ptr::copy_nonoverlapping(dst, src, len);
    }
}
