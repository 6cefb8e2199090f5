//! In-place partition kernels.
//!
//! Both kernels group elements equal to a pivot explicitly, which is what
//! keeps duplicate-heavy inputs linear: a two-way kernel revisits equal
//! elements on every level, a three-way kernel retires them in one pass.
//!
//! - `three_way` — Dutch-national-flag bands `< pv | == pv | > pv`.
//! - `dual_pivot` — Yaroslavskiy four bands around two ordered pivots, with
//!   a re-homing sweep of pivot-equal elements when the middle band
//!   dominates (the dual-pivot-specific duplicate pathology).
//!
//! Kernels only swap, so the multiset of values in the range is preserved;
//! no order is guaranteed among equal elements.

/// Partitions `[left, right]` around the value at `pivot`.
///
/// Returns the half-open equal band `(lt, gt)`: afterward `[left, lt)` is
/// strictly less, `[lt, gt)` equal, and `[gt, right]` strictly greater than
/// the pivot value. The band is never empty (`lt < gt`).
pub fn three_way<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    left: usize,
    right: usize,
    pivot: usize,
    is_less: &mut F,
) -> (usize, usize) {
    debug_assert!(left <= pivot && pivot <= right && right < v.len());
    let pv = v[pivot];
    let mut lt = left;
    let mut i = left;
    let mut gt = right + 1;
    while i < gt {
        if is_less(&v[i], &pv) {
            v.swap(lt, i);
            lt += 1;
            i += 1;
        } else if is_less(&pv, &v[i]) {
            gt -= 1;
            v.swap(i, gt);
        } else {
            i += 1;
        }
    }
    debug_assert!(lt < gt);
    (lt, gt)
}

/// Partitions `[left, right]` around the two pivot values at positions
/// `p1`, `p2` (ordering of the two values is normalized here).
///
/// Returns the final pivot positions `(q1, q2)`, `q1 < q2`: afterward
/// `[left, q1)` is strictly below the low pivot, `(q1, q2)` lies between the
/// pivots inclusive, and `(q2, right]` is strictly above the high pivot.
/// Equal pivot values degrade to a single `three_way` pass.
pub fn dual_pivot<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    left: usize,
    right: usize,
    p1: usize,
    p2: usize,
    is_less: &mut F,
) -> (usize, usize) {
    debug_assert!(left < right && right < v.len());
    debug_assert!(left <= p1 && p1 <= right && left <= p2 && p2 <= right && p1 != p2);

    // Park the pivots at the ends, low value left.
    v.swap(left, p1);
    let p2 = if p2 == left { p1 } else { p2 };
    v.swap(right, p2);
    if is_less(&v[right], &v[left]) {
        v.swap(left, right);
    }
    let pv1 = v[left];
    let pv2 = v[right];

    if !is_less(&pv1, &pv2) {
        // Equal pivots: one Dutch-flag pass, report the band ends as pivots.
        let (lt, gt) = three_way(v, left, right, left, is_less);
        return (lt, gt - 1);
    }

    // Invariants: [left+1, lt) < pv1, [lt, i) in [pv1, pv2],
    // (gt, right-1] > pv2, [i, gt] unexamined.
    let mut lt = left + 1;
    let mut gt = right - 1;
    let mut i = left + 1;
    while i <= gt {
        if is_less(&v[i], &pv1) {
            v.swap(i, lt);
            lt += 1;
            i += 1;
        } else if is_less(&pv2, &v[i]) {
            while i < gt && is_less(&pv2, &v[gt]) {
                gt -= 1;
            }
            if i == gt {
                gt = i - 1;
                break;
            }
            v.swap(i, gt);
            gt -= 1;
            // The element swapped in from the right is classified next round.
        } else {
            i += 1;
        }
    }

    v.swap(left, lt - 1);
    v.swap(right, gt + 1);
    let q1 = lt - 1;
    let q2 = gt + 1;
    debug_assert!(q1 < q2);

    // Re-home pivot-equal elements when the middle band dominates the range:
    // without this, heavy duplicates of either pivot make every recursion
    // level rescan nearly the whole range.
    if q2 - q1 > 2 * (right - left) / 3 && q2 - q1 >= 2 {
        let mut a = q1 + 1;
        let mut b = q2 - 1;
        let mut k = a;
        while k <= b {
            if !is_less(&pv1, &v[k]) {
                v.swap(k, a);
                a += 1;
                k += 1;
            } else if !is_less(&v[k], &pv2) {
                v.swap(k, b);
                if b == 0 {
                    break;
                }
                b -= 1;
            } else {
                k += 1;
            }
        }
    }

    (q1, q2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn lt(a: &i32, b: &i32) -> bool {
        a < b
    }

    fn check_three_way(v: &[i32], left: usize, right: usize, lt_end: usize, gt_start: usize, pv: i32) {
        assert!(left <= lt_end && lt_end < gt_start && gt_start <= right + 1);
        for i in left..lt_end {
            assert!(v[i] < pv);
        }
        for i in lt_end..gt_start {
            assert_eq!(pv, v[i]);
        }
        for i in gt_start..=right {
            assert!(v[i] > pv);
        }
    }

    // -- three_way ----------------------------------------------------------

    #[test]
    fn three_way_bands() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..200 {
            let len = rng.random_range(1..60);
            let mut v: Vec<i32> = (0..len).map(|_| rng.random_range(0..10)).collect();
            let mut expected = v.clone();
            expected.sort_unstable();
            let p = rng.random_range(0..len) as usize;
            let pv = v[p];
            let (lt_end, gt_start) = three_way(&mut v, 0, len as usize - 1, p, &mut lt);
            check_three_way(&v, 0, len as usize - 1, lt_end, gt_start, pv);
            v.sort_unstable();
            assert_eq!(expected, v);
        }
    }

    #[test]
    fn three_way_subrange_leaves_rest_untouched() {
        let mut v = vec![100, 5, 3, 8, 2, 7, -100];
        let (lt_end, gt_start) = three_way(&mut v, 1, 5, 3, &mut lt);
        assert_eq!(100, v[0]);
        assert_eq!(-100, v[6]);
        check_three_way(&v, 1, 5, lt_end, gt_start, 8);
    }

    #[test]
    fn three_way_all_equal() {
        let mut v = vec![4; 17];
        let (lt_end, gt_start) = three_way(&mut v, 0, 16, 9, &mut lt);
        assert_eq!((0, 17), (lt_end, gt_start));
    }

    #[test]
    fn three_way_single_element() {
        let mut v = vec![3];
        assert_eq!((0, 1), three_way(&mut v, 0, 0, 0, &mut lt));
    }

    // -- dual_pivot ---------------------------------------------------------

    fn check_dual(v: &[i32], left: usize, right: usize, q1: usize, q2: usize) {
        assert!(left <= q1 && q1 < q2 && q2 <= right);
        let pv1 = v[q1];
        let pv2 = v[q2];
        assert!(pv1 <= pv2);
        for i in left..q1 {
            assert!(v[i] < pv1, "i={i}");
        }
        for i in q1 + 1..q2 {
            assert!(pv1 <= v[i] && v[i] <= pv2, "i={i}");
        }
        for i in q2 + 1..=right {
            assert!(v[i] > pv2, "i={i}");
        }
    }

    #[test]
    fn dual_pivot_bands() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        for _ in 0..300 {
            let len: usize = rng.random_range(2..80);
            let mut v: Vec<i32> = (0..len).map(|_| rng.random_range(0..12)).collect();
            let mut expected = v.clone();
            expected.sort_unstable();
            let p1 = rng.random_range(0..len);
            let mut p2 = rng.random_range(0..len - 1);
            if p2 >= p1 {
                p2 += 1;
            }
            let (q1, q2) = dual_pivot(&mut v, 0, len - 1, p1, p2, &mut lt);
            check_dual(&v, 0, len - 1, q1, q2);
            v.sort_unstable();
            assert_eq!(expected, v);
        }
    }

    #[test]
    fn dual_pivot_heavy_duplicates() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..100 {
            let len: usize = rng.random_range(8..200);
            // Only two distinct values: middle band is guaranteed to dominate.
            let mut v: Vec<i32> = (0..len).map(|_| rng.random_range(0..2)).collect();
            let mut expected = v.clone();
            expected.sort_unstable();
            let (q1, q2) = dual_pivot(&mut v, 0, len - 1, 0, len - 1, &mut lt);
            check_dual(&v, 0, len - 1, q1, q2);
            v.sort_unstable();
            assert_eq!(expected, v);
        }
    }

    #[test]
    fn dual_pivot_equal_pivot_values() {
        let mut v = vec![5, 1, 5, 9, 5, 0, 5];
        let (q1, q2) = dual_pivot(&mut v, 0, 6, 0, 2, &mut lt);
        check_dual(&v, 0, 6, q1, q2);
    }

    #[test]
    fn dual_pivot_subrange() {
        let mut v = vec![-9, 4, 8, 1, 6, 3, 7, 99];
        let (q1, q2) = dual_pivot(&mut v, 1, 6, 2, 5, &mut lt);
        assert_eq!(-9, v[0]);
        assert_eq!(99, v[7]);
        check_dual(&v, 1, 6, q1, q2);
    }
}
