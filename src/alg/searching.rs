//! Search routines over sorted (and rotated) `&[i32]` slices.
//!
//! Position-returning variants use `Option<usize>`; bound-style variants
//! return an insertion index in `0..=len`.

/// Scans left to right; O(n). Works on unsorted input.
#[must_use]
pub fn linear_search(arr: &[i32], target: i32) -> Option<usize> {
    arr.iter().position(|&v| v == target)
}

/// Classic binary search over a sorted slice. Returns any matching index.
#[must_use]
pub fn binary_search(arr: &[i32], target: i32) -> Option<usize> {
    let (mut lo, mut hi) = (0, arr.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match arr[mid].cmp(&target) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
        }
    }
    None
}

/// First index whose element is `>= target`; `arr.len()` when none is.
#[must_use]
pub fn lower_bound(arr: &[i32], target: i32) -> usize {
    let (mut lo, mut hi) = (0, arr.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if arr[mid] < target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// First index whose element is `> target`; `arr.len()` when none is.
#[must_use]
pub fn upper_bound(arr: &[i32], target: i32) -> usize {
    let (mut lo, mut hi) = (0, arr.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if arr[mid] <= target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Index of the first occurrence of `target` in a sorted slice.
#[must_use]
pub fn find_first(arr: &[i32], target: i32) -> Option<usize> {
    let idx = lower_bound(arr, target);
    (idx < arr.len() && arr[idx] == target).then_some(idx)
}

/// Index of the last occurrence of `target` in a sorted slice.
#[must_use]
pub fn find_last(arr: &[i32], target: i32) -> Option<usize> {
    let idx = upper_bound(arr, target);
    (idx > 0 && arr[idx - 1] == target).then(|| idx - 1)
}

/// Number of occurrences of `target` in a sorted slice.
#[must_use]
pub fn count_occurrences(arr: &[i32], target: i32) -> usize {
    upper_bound(arr, target) - lower_bound(arr, target)
}

/// Index where `target` is, or would be inserted to keep the slice sorted.
#[must_use]
pub fn search_insert(arr: &[i32], target: i32) -> usize {
    lower_bound(arr, target)
}

/// Searches a sorted slice rotated at an unknown pivot; elements distinct.
#[must_use]
pub fn search_rotated(arr: &[i32], target: i32) -> Option<usize> {
    let (mut lo, mut hi) = (0, arr.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if arr[mid] == target {
            return Some(mid);
        }
        if arr[lo] <= arr[mid] {
            // Left half is sorted.
            if arr[lo] <= target && target < arr[mid] {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        } else if arr[mid] < target && target <= arr[hi - 1] {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    None
}

/// Index of the smallest element of a rotated sorted slice (the rotation
/// point); 0 for an unrotated or empty slice.
#[must_use]
pub fn rotation_point(arr: &[i32]) -> usize {
    if arr.is_empty() {
        return 0;
    }
    let (mut lo, mut hi) = (0, arr.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if arr[mid] > arr[hi] {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Index of some peak element (not smaller than its neighbours).
#[must_use]
pub fn find_peak(arr: &[i32]) -> Option<usize> {
    if arr.is_empty() {
        return None;
    }
    let (mut lo, mut hi) = (0, arr.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if arr[mid] < arr[mid + 1] {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Some(lo)
}

/// Floor of the square root of `n` by binary search; `None` for negatives.
#[must_use]
pub fn sqrt_floor(n: i32) -> Option<i32> {
    if n < 0 {
        return None;
    }
    let n = i64::from(n);
    let (mut lo, mut hi) = (0i64, n.min(46_341));
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if mid * mid <= n {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(lo as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTED: &[i32] = &[1, 3, 3, 3, 7, 9, 12];

    #[test]
    fn linear_and_binary_agree() {
        for &t in &[1, 3, 7, 12, 0, 5, 13] {
            assert_eq!(linear_search(SORTED, t).is_some(), binary_search(SORTED, t).is_some(), "target {t}");
        }
        assert_eq!(binary_search(&[], 1), None);
    }

    #[test]
    fn bounds_and_occurrences() {
        assert_eq!(lower_bound(SORTED, 3), 1);
        assert_eq!(upper_bound(SORTED, 3), 4);
        assert_eq!(find_first(SORTED, 3), Some(1));
        assert_eq!(find_last(SORTED, 3), Some(3));
        assert_eq!(count_occurrences(SORTED, 3), 3);
        assert_eq!(count_occurrences(SORTED, 5), 0);
        assert_eq!(find_first(SORTED, 5), None);
        assert_eq!(find_last(SORTED, 0), None);
    }

    #[test]
    fn insert_positions() {
        assert_eq!(search_insert(SORTED, 0), 0);
        assert_eq!(search_insert(SORTED, 8), 5);
        assert_eq!(search_insert(SORTED, 13), 7);
    }

    #[test]
    fn rotated_search() {
        let arr = [8, 11, 13, 1, 3, 5, 7];
        for (i, &v) in arr.iter().enumerate() {
            assert_eq!(search_rotated(&arr, v), Some(i));
        }
        assert_eq!(search_rotated(&arr, 2), None);
        assert_eq!(rotation_point(&arr), 3);
        assert_eq!(rotation_point(&[1, 2, 3]), 0);
    }

    #[test]
    fn peaks() {
        assert_eq!(find_peak(&[]), None);
        assert_eq!(find_peak(&[5]), Some(0));
        let arr = [1, 3, 8, 4, 2];
        assert_eq!(find_peak(&arr), Some(2));
        // Any local peak is acceptable for multi-peak input.
        let idx = find_peak(&[1, 5, 2, 9, 3]).unwrap();
        assert!(idx == 1 || idx == 3);
    }

    #[test]
    fn integer_sqrt() {
        assert_eq!(sqrt_floor(-4), None);
        assert_eq!(sqrt_floor(0), Some(0));
        assert_eq!(sqrt_floor(1), Some(1));
        assert_eq!(sqrt_floor(8), Some(2));
        assert_eq!(sqrt_floor(9), Some(3));
        assert_eq!(sqrt_floor(i32::MAX), Some(46_340));
    }
}
