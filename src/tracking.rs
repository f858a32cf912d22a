#![allow(dead_code)]

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub buffer: &'static str,
    pub idx: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Move { from: Location, to: Location },

    Compare { lhs: Location, rhs: Location },

    /// A fresh scratch allocation able to hold `capacity` elements.
    Alloc { capacity: usize },
}

#[cfg(feature = "tracking")]
mod tracking_impl {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    use super::*;

    #[derive(Default)]
    struct TrackingRegister {
        known_buffers: HashMap<&'static str, (usize, usize)>,
        ops: Vec<Operation>,
    }

    impl TrackingRegister {
        fn register_buffer(&mut self, name: &'static str, begin: usize, end: usize) {
            let old = self.known_buffers.insert(name, (begin, end));
            assert!(old.is_none(), "duplicate buffer {name}");
        }

        fn deregister_buffer(&mut self, name: &'static str) -> (usize, usize) {
            let old = self.known_buffers.remove(name);
            assert!(old.is_some(), "unknown buffer {name}");
            old.unwrap()
        }

        fn locate<T>(&self, ptr: *const T) -> Option<Location> {
            let iptr = ptr as usize;
            for (buf, (begin, end)) in self.known_buffers.iter() {
                if (*begin..*end).contains(&iptr) {
                    return Some(Location {
                        buffer: *buf,
                        idx: (iptr - begin) / std::mem::size_of::<T>(),
                    });
                }
            }
            None
        }
    }

    // Sorts running on different threads (e.g. parallel tests) each get their
    // own register.
    lazy_static::lazy_static! {
        static ref TRACKING_REGISTERS: Mutex<HashMap<ThreadId, TrackingRegister>> = {
            Mutex::new(HashMap::new())
        };
    }

    fn with_register<R>(f: impl FnOnce(&mut TrackingRegister) -> R) -> R {
        let mut registers = TRACKING_REGISTERS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(registers.entry(thread::current().id()).or_default())
    }

    /// Drains the operations recorded on the calling thread.
    pub fn read_tracked_ops() -> Vec<Operation> {
        with_register(|register| {
            assert!(register.known_buffers.is_empty());
            core::mem::take(&mut register.ops)
        })
    }

    pub fn register_buffer<T>(name: &'static str, begin: *const T, len: usize) {
        let begin = begin as usize;
        let end = begin + len * std::mem::size_of::<T>();
        with_register(|register| register.register_buffer(name, begin, end));
    }

    pub fn deregister_buffer(name: &'static str) {
        with_register(|register| {
            register.deregister_buffer(name);
        });
    }

    pub fn register_alloc(capacity: usize) {
        with_register(|register| register.ops.push(Operation::Alloc { capacity }));
    }

    pub fn register_cmp<T>(left: *const T, right: *const T) {
        with_register(|register| {
            let lhs = register.locate(left).expect("unregistered cmp lhs");
            let rhs = register.locate(right).expect("unregistered cmp rhs");
            register.ops.push(Operation::Compare { lhs, rhs })
        });
    }

    pub fn track_copy<T>(src: *const T, dst: *mut T, count: usize) {
        if count == 0 {
            return;
        }

        with_register(|register| {
            let from = register
                .locate(src)
                .expect("unregistered copy src destination");
            let to = register
                .locate(dst)
                .expect("unregistered copy dst destination");
            for i in 0..count {
                register.ops.push(Operation::Move {
                    from: Location {
                        idx: from.idx + i,
                        buffer: from.buffer,
                    },
                    to: Location {
                        idx: to.idx + i,
                        buffer: to.buffer,
                    },
                });
            }
        });
    }
}

/// Dummy implementation.
#[cfg(not(feature = "tracking"))]
#[allow(dead_code)]
mod tracking_impl {
    #[inline]
    pub fn register_cmp<T>(_left: *const T, _right: *const T) {}
    #[inline]
    pub fn register_buffer<T>(_name: &'static str, _begin: *const T, _len: usize) {}
    #[inline]
    pub fn deregister_buffer(_name: &'static str) {}
    #[inline]
    pub fn register_alloc(_capacity: usize) {}
}

#[cfg(not(feature = "tracking"))]
pub(crate) use core::ptr;

#[cfg(feature = "tracking")]
pub use tracking_impl::read_tracked_ops;
pub(crate) use tracking_impl::{register_alloc, register_cmp};

/// Keeps a buffer registered until dropped, which also happens when a
/// comparison panics.
#[must_use]
pub(crate) struct TrackedBuffer {
    name: &'static str,
}

impl Drop for TrackedBuffer {
    #[inline]
    fn drop(&mut self) {
        tracking_impl::deregister_buffer(self.name);
    }
}

#[inline]
pub(crate) fn track_buffer<T>(name: &'static str, begin: *const T, len: usize) -> TrackedBuffer {
    tracking_impl::register_buffer(name, begin, len);
    TrackedBuffer { name }
}

#[cfg(feature = "tracking")]
pub(crate) mod ptr {
    use core::ptr as cptr;

    #[inline]
    pub unsafe fn copy_nonoverlapping<T>(src: *const T, dst: *mut T, count: usize) {
        super::tracking_impl::track_copy(src, dst, count);
        unsafe { cptr::copy_nonoverlapping(src, dst, count) }
    }
}
