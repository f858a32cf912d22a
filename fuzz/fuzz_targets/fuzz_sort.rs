#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&[u8], usize, usize)| {
    let mut arr: Vec<(u8, u8)> = data.0.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    let mut arr2 = arr.clone();
    let mut arr3 = arr.clone();

    mergesort::sort_by(&mut arr, |a, b| a.1.cmp(&b.1));
    mergesort::naive_sort_by(&mut arr2, |a, b| a.1.cmp(&b.1));
    arr3.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(arr, arr3);
    assert_eq!(arr2, arr3);

    // Random sub-range, rejected ranges must leave the input alone.
    let mut ranged: Vec<(u8, u8)> = data.0.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    let before = ranged.clone();
    let (begin, end) = (data.1 % (ranged.len() + 2), data.2 % (ranged.len() + 2));
    let res = mergesort::try_sort_range_by(
        &mut ranged,
        begin,
        end,
        mergesort::ScratchPolicy::Shared,
        |a, b| a.1.cmp(&b.1),
    );
    if begin <= end && end <= before.len() {
        assert!(res.is_ok());
        let mut expected = before.clone();
        expected[begin..end].sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(ranged, expected);
    } else {
        assert!(res.is_err());
        assert_eq!(ranged, before);
    }
});
