#![cfg(feature = "tracking")]

use std::panic::{self, AssertUnwindSafe};

use mergesort::tracking::{read_tracked_ops, Operation};
use mergesort::ScratchPolicy;

fn allocs(ops: &[Operation]) -> Vec<usize> {
    ops.iter()
        .filter_map(|op| match op {
            Operation::Alloc { capacity } => Some(*capacity),
            _ => None,
        })
        .collect()
}

fn sort_tracked(v: &mut [u32], policy: ScratchPolicy) -> Vec<Operation> {
    read_tracked_ops();
    let len = v.len();
    mergesort::try_sort_range_by(v, 0, len, policy, |a, b| a.cmp(b)).unwrap();
    read_tracked_ops()
}

#[test]
fn shared_scratch_allocates_once() {
    let mut v: Vec<u32> = (0..100).rev().collect();
    let ops = sort_tracked(&mut v, ScratchPolicy::Shared);
    let allocs = allocs(&ops);
    assert_eq!(allocs.len(), 1);
    assert!(allocs[0] >= 100);
}

#[test]
fn per_merge_scratch_allocates_every_merge() {
    let mut v: Vec<u32> = (0..100).rev().collect();
    let ops = sort_tracked(&mut v, ScratchPolicy::PerMerge);

    // A binary merge tree over 100 leaves has 99 internal nodes.
    let allocs = allocs(&ops);
    assert_eq!(allocs.len(), 99);
    assert_eq!(allocs.iter().max(), Some(&100));
    assert_eq!(allocs.last(), Some(&100));
}

#[test]
fn trivial_inputs_do_nothing() {
    for len in [0, 1] {
        let mut v: Vec<u32> = (0..len).collect();
        assert!(sort_tracked(&mut v, ScratchPolicy::Shared).is_empty());
        assert!(sort_tracked(&mut v, ScratchPolicy::PerMerge).is_empty());
    }
}

#[test]
fn both_variants_perform_the_same_moves() {
    let mut a = vec![12, 3, 9, 3, 1, 15, 8, 2, 11];
    let mut b = a.clone();
    let without_allocs = |ops: Vec<Operation>| -> Vec<Operation> {
        ops.into_iter()
            .filter(|op| !matches!(op, Operation::Alloc { .. }))
            .collect()
    };
    let ops_a = without_allocs(sort_tracked(&mut a, ScratchPolicy::Shared));
    let ops_b = without_allocs(sort_tracked(&mut b, ScratchPolicy::PerMerge));
    assert_eq!(a, b);
    assert_eq!(ops_a, ops_b);
}

#[test]
fn pair_is_one_compare_and_a_round_trip() {
    let mut v = [2, 1];
    let ops = sort_tracked(&mut v, ScratchPolicy::Shared);
    assert_eq!(v, [1, 2]);

    let compares = ops
        .iter()
        .filter(|op| matches!(op, Operation::Compare { .. }))
        .count();
    let moves = ops
        .iter()
        .filter(|op| matches!(op, Operation::Move { .. }))
        .count();
    assert_eq!(compares, 1);
    // Two moves into scratch, two moves back.
    assert_eq!(moves, 4);
}

#[test]
fn large_enough_caller_buffer_never_allocates() {
    let mut buffer: Vec<u32> = Vec::with_capacity(64);
    let mut v: Vec<u32> = (0..50).rev().collect();
    read_tracked_ops();
    mergesort::sort_with_buffer(&mut v, &mut buffer);
    assert!(allocs(&read_tracked_ops()).is_empty());
    assert_eq!(v, (0..50).collect::<Vec<_>>());

    // An empty buffer grows once, then serves later sorts as is.
    let mut buffer = Vec::new();
    let mut v: Vec<u32> = (0..50).rev().collect();
    mergesort::sort_with_buffer(&mut v, &mut buffer);
    assert_eq!(allocs(&read_tracked_ops()).len(), 1);
    let mut v: Vec<u32> = (0..40).rev().collect();
    mergesort::sort_with_buffer(&mut v, &mut buffer);
    assert!(allocs(&read_tracked_ops()).is_empty());
}

#[test]
fn buffers_are_released_after_a_comparator_panic() {
    for policy in [ScratchPolicy::Shared, ScratchPolicy::PerMerge] {
        let mut v: Vec<u32> = (0..16).rev().collect();
        let mut budget = 10;
        let res = panic::catch_unwind(AssertUnwindSafe(|| {
            mergesort::try_sort_range_by(&mut v, 0, 16, policy, |a, b| {
                if budget == 0 {
                    panic!("boom");
                }
                budget -= 1;
                a.cmp(b)
            })
        }));
        assert!(res.is_err());

        // The panicking call is recorded too.
        let ops = read_tracked_ops();
        assert_eq!(
            ops.iter()
                .filter(|op| matches!(op, Operation::Compare { .. }))
                .count(),
            11
        );

        let mut w = vec![3, 1, 2];
        let ops = sort_tracked(&mut w, policy);
        assert_eq!(w, [1, 2, 3]);
        assert!(!ops.is_empty());
    }
}
