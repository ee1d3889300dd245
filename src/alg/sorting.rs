//! Comparison and non-comparison sorts over `&mut [i32]`, plus selection.

/// Bubble sort with the early-exit pass check. O(n^2), stable.
pub fn bubble_sort(arr: &mut [i32]) {
    let n = arr.len();
    for pass in 0..n {
        let mut swapped = false;
        for i in 1..n - pass {
            if arr[i - 1] > arr[i] {
                arr.swap(i - 1, i);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

/// Selection sort. O(n^2), unstable, minimal writes.
pub fn selection_sort(arr: &mut [i32]) {
    for i in 0..arr.len() {
        let mut min = i;
        for j in i + 1..arr.len() {
            if arr[j] < arr[min] {
                min = j;
            }
        }
        arr.swap(i, min);
    }
}

/// Insertion sort. O(n^2) worst case, linear on nearly-sorted input.
pub fn insertion_sort(arr: &mut [i32]) {
    for i in 1..arr.len() {
        let value = arr[i];
        let mut j = i;
        while j > 0 && arr[j - 1] > value {
            arr[j] = arr[j - 1];
            j -= 1;
        }
        arr[j] = value;
    }
}

/// Shell sort with the Knuth gap sequence (1, 4, 13, 40, ...).
pub fn shell_sort(arr: &mut [i32]) {
    let n = arr.len();
    let mut gap = 1;
    while gap < n / 3 {
        gap = 3 * gap + 1;
    }
    while gap >= 1 {
        for i in gap..n {
            let value = arr[i];
            let mut j = i;
            while j >= gap && arr[j - gap] > value {
                arr[j] = arr[j - gap];
                j -= gap;
            }
            arr[j] = value;
        }
        gap /= 3;
    }
}

/// Top-down merge sort. O(n log n), stable, O(n) scratch.
pub fn merge_sort(arr: &mut [i32]) {
    let n = arr.len();
    if n < 2 {
        return;
    }
    let mut scratch = arr.to_vec();
    merge_sort_into(&mut scratch, arr);
}

/// Sorts `src` into `dst`; both start as copies of the input.
fn merge_sort_into(src: &mut [i32], dst: &mut [i32]) {
    let n = dst.len();
    if n < 2 {
        return;
    }
    let mid = n / 2;
    // Roles alternate per level so each merge is a straight copy.
    merge_sort_into(&mut dst[..mid], &mut src[..mid]);
    merge_sort_into(&mut dst[mid..], &mut src[mid..]);

    let (left, right) = src.split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in dst.iter_mut() {
        if i < left.len() && (j >= right.len() || left[i] <= right[j]) {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}

/// Quicksort with median-of-three pivot selection. O(n log n) average.
pub fn quick_sort(arr: &mut [i32]) {
    if arr.len() < 2 {
        return;
    }
    let pivot_idx = median_of_three(arr);
    let split = partition(arr, pivot_idx);
    let (left, right) = arr.split_at_mut(split);
    quick_sort(left);
    quick_sort(&mut right[1..]);
}

/// Index of the median of the first, middle, and last elements.
fn median_of_three(arr: &[i32]) -> usize {
    let (lo, mid, hi) = (0, arr.len() / 2, arr.len() - 1);
    let (a, b, c) = (arr[lo], arr[mid], arr[hi]);
    if (a <= b && b <= c) || (c <= b && b <= a) {
        mid
    } else if (b <= a && a <= c) || (c <= a && a <= b) {
        lo
    } else {
        hi
    }
}

/// Lomuto partition around `arr[pivot_idx]`; returns the pivot's final
/// index.
fn partition(arr: &mut [i32], pivot_idx: usize) -> usize {
    let last = arr.len() - 1;
    arr.swap(pivot_idx, last);
    let pivot = arr[last];
    let mut store = 0;
    for i in 0..last {
        if arr[i] < pivot {
            arr.swap(i, store);
            store += 1;
        }
    }
    arr.swap(store, last);
    store
}

/// Returns the k-th smallest element (0-indexed), or `None` when `k` is out
/// of bounds. Reorders `arr` in place; O(n) average.
pub fn quick_select(arr: &mut [i32], k: usize) -> Option<i32> {
    if k >= arr.len() {
        return None;
    }
    let (mut lo, mut hi) = (0, arr.len());
    let mut k = k; // relative to the current window
    loop {
        if hi - lo == 1 {
            return Some(arr[lo]);
        }
        let window = &mut arr[lo..hi];
        let pivot_idx = median_of_three(window);
        let split = partition(window, pivot_idx);
        match k.cmp(&split) {
            std::cmp::Ordering::Equal => return Some(window[split]),
            std::cmp::Ordering::Less => hi = lo + split,
            std::cmp::Ordering::Greater => {
                k -= split + 1;
                lo += split + 1;
            }
        }
    }
}

/// Counting sort, offsetting by the minimum so negatives are handled.
/// O(n + range); falls back to doing nothing on an empty slice.
pub fn counting_sort(arr: &mut [i32]) {
    let Some(&min) = arr.iter().min() else {
        return;
    };
    let max = *arr.iter().max().unwrap();
    let range = (max as i64 - min as i64 + 1) as usize;

    let mut counts = vec![0usize; range];
    for &v in arr.iter() {
        counts[(v as i64 - min as i64) as usize] += 1;
    }
    let mut write = 0;
    for (offset, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            arr[write] = (offset as i64 + min as i64) as i32;
            write += 1;
        }
    }
}

/// LSD radix sort, byte at a time. The sign bit is flipped so negative
/// values order correctly as unsigned keys.
pub fn radix_sort(arr: &mut [i32]) {
    if arr.len() < 2 {
        return;
    }
    let mut keys: Vec<u32> = arr.iter().map(|&v| (v as u32) ^ 0x8000_0000).collect();
    let mut scratch = vec![0u32; keys.len()];

    for shift in (0..32).step_by(8) {
        let mut counts = [0usize; 256];
        for &k in &keys {
            counts[((k >> shift) & 0xff) as usize] += 1;
        }
        let mut positions = [0usize; 256];
        let mut running = 0;
        for (i, &c) in counts.iter().enumerate() {
            positions[i] = running;
            running += c;
        }
        for &k in &keys {
            let digit = ((k >> shift) & 0xff) as usize;
            scratch[positions[digit]] = k;
            positions[digit] += 1;
        }
        std::mem::swap(&mut keys, &mut scratch);
    }

    for (slot, k) in arr.iter_mut().zip(keys) {
        *slot = (k ^ 0x8000_0000) as i32;
    }
}

/// Returns true when `arr` is in non-decreasing order.
#[must_use]
pub fn is_sorted(arr: &[i32]) -> bool {
    arr.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[&[i32]] = &[
        &[],
        &[1],
        &[2, 1],
        &[5, 5, 5],
        &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3],
        &[-3, 7, 0, -10, 7, 2],
        &[9, 8, 7, 6, 5, 4, 3, 2, 1],
        &[i32::MIN, i32::MAX, 0, -1, 1],
    ];

    fn check(sort: fn(&mut [i32])) {
        for case in CASES {
            let mut actual = case.to_vec();
            let mut expected = case.to_vec();
            sort(&mut actual);
            expected.sort_unstable();
            assert_eq!(actual, expected, "input {case:?}");
        }
    }

    #[test]
    fn bubble() {
        check(bubble_sort);
    }

    #[test]
    fn selection() {
        check(selection_sort);
    }

    #[test]
    fn insertion() {
        check(insertion_sort);
    }

    #[test]
    fn shell() {
        check(shell_sort);
    }

    #[test]
    fn merge() {
        check(merge_sort);
    }

    #[test]
    fn quick() {
        check(quick_sort);
    }

    #[test]
    fn counting() {
        check(counting_sort);
    }

    #[test]
    fn radix() {
        check(radix_sort);
    }

    #[test]
    fn select_kth() {
        let src = [7, 2, 9, 1, 5, 5, 3];
        let mut sorted = src.to_vec();
        sorted.sort_unstable();
        for k in 0..src.len() {
            let mut arr = src.to_vec();
            assert_eq!(quick_select(&mut arr, k), Some(sorted[k]), "k = {k}");
        }
        let mut arr = src.to_vec();
        assert_eq!(quick_select(&mut arr, src.len()), None);
    }

    #[test]
    fn sortedness() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
    }
}
