//! Pivoting strategies for the introselect driver.
//!
//! Every strategy is a function from `(slice, left, right, target)` to a
//! pivot index, with a declared sampling effect describing what it does to
//! the probed elements. The ladder, in increasing sample cost:
//!
//! - `Central` — fixed middle position, no probing.
//! - `MedianOf3` / `MedianOf9` — classic median / Tukey ninther of evenly
//!   spaced probes, selected by index without moving data.
//! - `MedianOf5` — 5 probes sorted in place by network, median returned.
//! - `Dynamic` — dispatches 3 vs. 9 on range size.
//! - `FloydRivest` — the SELECT sampling of Floyd & Rivest (CACM 1975): a
//!   contiguous window of ~n^(2/3) elements biased toward the target rank is
//!   fully resolved at the target, making `v[target]` an excellent pivot.
//! - `MedianOfMedians` — groups-of-5 BFPRT pivot with a guaranteed >= 3/10
//!   split fraction; the worst-case-linear stopper.

use crate::partition;
use crate::quickselect::Config;
use crate::sortnet;

/// What a strategy does to the elements it samples. Callers must respect
/// this: `Sorted` probes carry free ordering information, `PartiallySorted`
/// probes have moved, `Unchanged` probes are untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingEffect {
    Unchanged,
    PartiallySorted,
    Sorted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Central,
    MedianOf3,
    MedianOf5,
    MedianOf9,
    Dynamic,
    FloydRivest,
    MedianOfMedians,
}

impl Strategy {
    pub fn sampling_effect(self) -> SamplingEffect {
        match self {
            Strategy::Central => SamplingEffect::Unchanged,
            Strategy::MedianOf3 | Strategy::MedianOf9 => SamplingEffect::Unchanged,
            Strategy::MedianOf5 => SamplingEffect::Sorted,
            // Dispatches to 3 or 9, neither of which moves data.
            Strategy::Dynamic => SamplingEffect::Unchanged,
            Strategy::FloydRivest | Strategy::MedianOfMedians => SamplingEffect::PartiallySorted,
        }
    }

    /// Chooses a pivot position in `[left, right]` for target rank `k`.
    pub fn pivot_index<T: Copy, F: FnMut(&T, &T) -> bool>(
        self,
        v: &mut [T],
        left: usize,
        right: usize,
        k: usize,
        cfg: &Config,
        is_less: &mut F,
    ) -> usize {
        debug_assert!(left <= k && k <= right && right < v.len());
        let len = right - left + 1;
        match self {
            Strategy::Central => left + len / 2,
            Strategy::MedianOf3 => median3(v, left, left + len / 2, right, is_less),
            Strategy::MedianOf5 => {
                if len < 5 {
                    return left + len / 2;
                }
                let idx = spread5(left, right);
                sortnet::sort5_at(v, idx, is_less);
                idx[2]
            }
            Strategy::MedianOf9 => {
                if len < 9 {
                    return median3(v, left, left + len / 2, right, is_less);
                }
                ninther(v, left, right, is_less)
            }
            Strategy::Dynamic => {
                if len >= cfg.ninther_min && len >= 9 {
                    ninther(v, left, right, is_less)
                } else {
                    median3(v, left, left + len / 2, right, is_less)
                }
            }
            Strategy::FloydRivest => {
                if len > cfg.floyd_rivest_min {
                    let (wl, wr) = fr_window(left, right, k);
                    fr_select(v, wl, wr, k, cfg.floyd_rivest_min, is_less);
                    k
                } else {
                    Strategy::Dynamic.pivot_index(v, left, right, k, cfg, is_less)
                }
            }
            Strategy::MedianOfMedians => median_of_medians(v, left, right, is_less),
        }
    }
}

/// Index of the median of `v[a]`, `v[b]`, `v[c]` without moving data.
fn median3<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    mut a: usize,
    b: usize,
    mut c: usize,
    is_less: &mut F,
) -> usize {
    if is_less(&v[c], &v[a]) {
        std::mem::swap(&mut a, &mut c);
    }
    if is_less(&v[c], &v[b]) {
        return c;
    }
    if is_less(&v[b], &v[a]) {
        return a;
    }
    b
}

/// Five evenly spread probe positions over `[left, right]`, `len >= 5`.
fn spread5(left: usize, right: usize) -> [usize; 5] {
    let len = right - left + 1;
    [
        left,
        left + len / 4,
        left + len / 2,
        right - len / 4,
        right,
    ]
}

/// Tukey ninther over nine evenly spaced probes, `len >= 9`.
fn ninther<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    left: usize,
    right: usize,
    is_less: &mut F,
) -> usize {
    let step = (right - left) / 8;
    let p = |i: usize| left + i * step;
    let m0 = median3(v, p(0), p(1), p(2), is_less);
    let m1 = median3(v, p(3), p(4), p(5), is_less);
    let m2 = median3(v, p(6), p(7), p(8), is_less);
    median3(v, m0, m1, m2, is_less)
}

/// Sorts a 5-probe sample and returns two ordered pivot positions
/// (values at the returned positions satisfy `v[p1] <= v[p2]`).
pub fn dual_sample<T, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    left: usize,
    right: usize,
    is_less: &mut F,
) -> (usize, usize) {
    debug_assert!(right - left + 1 >= 5);
    let idx = spread5(left, right);
    sortnet::sort5_at(v, idx, is_less);
    (idx[1], idx[3])
}

/// The Floyd-Rivest sample window for target `k` in `[left, right]`: a
/// contiguous sub-range of ~n^(2/3) elements whose offset is biased toward
/// the target's relative position.
fn fr_window(left: usize, right: usize, k: usize) -> (usize, usize) {
    let n = (right - left + 1) as f64;
    let i = (k - left + 1) as f64;
    let z = n.ln();
    let s = 0.5 * (2.0 * z / 3.0).exp();
    let sd = 0.5 * (z * s * (n - s) / n).sqrt() * if i < n / 2.0 { -1.0 } else { 1.0 };
    let kf = k as f64;
    let lo = (kf - i * s / n + sd).max(left as f64) as usize;
    let hi = (kf + (n - i) * s / n + sd).min(right as f64) as usize;
    (lo.min(k), hi.max(k).min(right))
}

/// Classical Floyd-Rivest SELECT confined to `[left, right]`: places the
/// k-th value of the range at `k`, recursing into a biased sample window
/// while the range is large.
pub(crate) fn fr_select<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    mut left: usize,
    mut right: usize,
    k: usize,
    window_min: usize,
    is_less: &mut F,
) {
    debug_assert!(left <= k && k <= right);
    while right > left {
        if right - left > window_min {
            let (wl, wr) = fr_window(left, right, k);
            // Window size is O(n^(2/3)), so the recursion depth is O(log log n).
            fr_select(v, wl, wr, k, window_min, is_less);
        }
        let t = v[k];
        let mut i = left;
        let mut j = right;
        v.swap(left, k);
        if is_less(&t, &v[right]) {
            v.swap(right, left);
        }
        while i < j {
            v.swap(i, j);
            i += 1;
            j -= 1;
            while is_less(&v[i], &t) {
                i += 1;
            }
            while is_less(&t, &v[j]) {
                j -= 1;
            }
        }
        // Settle the pivot copy onto its final slot.
        if !is_less(&v[left], &t) && !is_less(&t, &v[left]) {
            v.swap(left, j);
        } else {
            j += 1;
            v.swap(j, right);
        }
        if j <= k {
            left = j + 1;
        }
        if k <= j {
            if j == 0 {
                break;
            }
            right = j - 1;
        }
    }
}

/// BFPRT groups-of-5 pivot: the returned position splits `[left, right]`
/// at worst 3/10 from either end. Mutates the range (group sorts, median
/// gathering, and the recursive selection over the gathered medians).
fn median_of_medians<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    left: usize,
    right: usize,
    is_less: &mut F,
) -> usize {
    let len = right - left + 1;
    if len <= sortnet::NETWORK_MAX {
        sortnet::sort_small(&mut v[left..=right], is_less);
        return left + len / 2;
    }

    // Sort each group of five, gather group medians into the range prefix.
    let mut m = left;
    let mut g = left;
    while g + 4 <= right {
        sortnet::sort5_at(v, [g, g + 1, g + 2, g + 3, g + 4], is_less);
        v.swap(m, g + 2);
        m += 1;
        g += 5;
    }
    if g <= right {
        sortnet::sort_small(&mut v[g..=right], is_less);
        v.swap(m, g + (right - g) / 2);
        m += 1;
    }

    // True median of the medians, found by the guaranteed path itself.
    let mid = left + (m - left) / 2;
    mom_select(v, left, m - 1, mid, is_less);
    mid
}

/// Worst-case-linear select used to resolve the median of the medians.
/// Self-contained so the strategy has no dependence on driver heuristics.
fn mom_select<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    mut left: usize,
    mut right: usize,
    k: usize,
    is_less: &mut F,
) {
    debug_assert!(left <= k && k <= right);
    loop {
        if right - left + 1 <= sortnet::NETWORK_MAX {
            sortnet::sort_small(&mut v[left..=right], is_less);
            return;
        }
        let p = median_of_medians(v, left, right, is_less);
        let (lt, gt) = partition::three_way(v, left, right, p, is_less);
        if k < lt {
            right = lt - 1;
        } else if k >= gt {
            left = gt;
        } else {
            return;
        }
    }
}
