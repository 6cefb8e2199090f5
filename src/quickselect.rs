//! Adaptive introselect driver.
//!
//! Orchestrates repeated partitioning until every target rank holds its
//! final sorted value:
//!
//! - **Single key**: iterative quickselect with Floyd-Rivest sampling on
//!   large ranges and median-of-3/9 below. Partition progress is measured;
//!   consecutive insufficient shrinks (adversarial or pre-sorted inputs
//!   defeating the sampling heuristic) switch the loop to the
//!   median-of-medians strategy whose split fraction is guaranteed, keeping
//!   worst-case cost linear.
//! - **Multiple keys**: an explicit work stack of frames over the sorted,
//!   deduplicated rank array — no native recursion, so adversarial inputs
//!   cannot overflow the call stack. Every partition records its settled
//!   positions in a [`PivotCache`](crate::interval::PivotCache); frames
//!   drop already-resolved ranks and tighten their range to the enclosing
//!   unsorted interval before doing any work. Large frames holding several
//!   ranks use the dual-pivot kernel to split three ways at once. Frames
//!   past the depth stopper are finished by heapsort.
//!
//! All tunables live in [`Config`], an explicit value rather than process
//! state, so configurations can coexist and be tested independently.

use crate::interval::{self, PivotCache};
use crate::partition;
use crate::pivot::Strategy;
use crate::sortnet;

/// Tuning knobs of the driver. The defaults are starting points, not
/// contracts; re-tune per platform.
#[derive(Clone, Debug)]
pub struct Config {
    /// Ranges at or below this length are finished by small sort.
    pub small_sort: usize,
    /// Minimum range length for Floyd-Rivest sampling.
    pub floyd_rivest_min: usize,
    /// Minimum range length for the ninther in the `Dynamic` strategy.
    pub ninther_min: usize,
    /// Consecutive low-progress partitions tolerated before switching to
    /// the guaranteed strategy.
    pub stall_limit: u32,
    /// A partition must shed at least `len / stall_shrink` elements to
    /// count as progress. Zero is treated as 1, which stalls every
    /// partition and forces the guaranteed strategy almost immediately.
    pub stall_shrink: usize,
    /// Minimum frame length for the dual-pivot kernel in multi-key mode.
    pub dual_pivot_min: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            small_sort: 16,
            floyd_rivest_min: 600,
            ninther_min: 128,
            stall_limit: 2,
            stall_shrink: 8,
            dual_pivot_min: 256,
        }
    }
}

impl Config {
    /// Multi-key frame depth past which a frame is finished by heapsort.
    fn depth_limit(&self, len: usize) -> usize {
        2 * (usize::BITS - len.leading_zeros()) as usize + 8
    }
}

/// One multi-key work item: a range hint and a sub-slice `[a, b]` of the
/// sorted rank array, plus its split depth.
struct Frame {
    l: usize,
    r: usize,
    a: usize,
    b: usize,
    depth: usize,
}

/// Resolves every rank of `ranks` within the half-open window `from..to`.
///
/// Bounds and ranks must already be validated; the rank collection may be
/// unsorted and contain duplicates. A window whose ranks all hold their
/// final values already is left untouched, so repeating a call with the
/// same ranks never moves anything.
pub fn select_range_by<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    from: usize,
    to: usize,
    ranks: &[usize],
    cfg: &Config,
    mut is_less: F,
) {
    debug_assert!(from <= to && to <= v.len());
    debug_assert!(ranks.iter().all(|&k| from <= k && k < to));
    if ranks.is_empty() || to - from <= 1 {
        return;
    }
    let left = from;
    let right = to - 1;

    let ks = interval::compact_ranks(ranks);
    if window_resolved(v, left, right, &ks, &mut is_less) {
        return;
    }
    if ks.len() == 1 {
        select_single(v, left, right, ks[0], cfg, false, &mut is_less);
        return;
    }
    select_multi(v, left, right, &ks, cfg, &mut is_less);
}

/// Classic adaptive single-rank quickselect with the stall-triggered
/// guaranteed fallback.
fn select_single<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    mut left: usize,
    mut right: usize,
    k: usize,
    cfg: &Config,
    forced_guaranteed: bool,
    is_less: &mut F,
) {
    debug_assert!(left <= k && k <= right);
    let mut guaranteed = forced_guaranteed;
    let mut stalls = 0u32;
    loop {
        let len = right - left + 1;
        if len <= cfg.small_sort {
            sortnet::sort_small(&mut v[left..=right], is_less);
            return;
        }
        // Extreme ranks are a linear scan, not a partition.
        if k == left {
            let m = min_position(v, left, right, is_less);
            v.swap(left, m);
            return;
        }
        if k == right {
            let m = max_position(v, left, right, is_less);
            v.swap(right, m);
            return;
        }

        let strat = if guaranteed {
            Strategy::MedianOfMedians
        } else if len > cfg.floyd_rivest_min {
            Strategy::FloydRivest
        } else {
            Strategy::Dynamic
        };
        let p = strat.pivot_index(v, left, right, k, cfg, is_less);
        let (lt, gt) = partition::three_way(v, left, right, p, is_less);
        if k < lt {
            right = lt - 1;
        } else if k >= gt {
            left = gt;
        } else {
            return;
        }

        if !guaranteed {
            let new_len = right - left + 1;
            if new_len + len / cfg.stall_shrink.max(1) > len {
                stalls += 1;
                if stalls >= cfg.stall_limit {
                    guaranteed = true;
                }
            } else {
                stalls = 0;
            }
        }
    }
}

/// Work-stack multi-rank selection over the sorted unique rank array `ks`.
fn select_multi<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    left: usize,
    right: usize,
    ks: &[usize],
    cfg: &Config,
    is_less: &mut F,
) {
    let mut cache = PivotCache::new(left, right, ks.len());
    let max_depth = cfg.depth_limit(right - left + 1);
    let mut stack = Vec::with_capacity(16);
    stack.push(Frame {
        l: left,
        r: right,
        a: 0,
        b: ks.len() - 1,
        depth: 0,
    });

    while let Some(frame) = stack.pop() {
        let Frame {
            mut l,
            mut r,
            mut a,
            mut b,
            depth,
        } = frame;

        // Drop ranks another frame already settled.
        while a <= b && cache.contains(ks[a]) {
            a += 1;
        }
        while b > a && cache.contains(ks[b]) {
            b -= 1;
        }
        if a > b {
            continue;
        }

        // Tighten to the enclosing unsorted interval. An unresolved rank is
        // never itself a known pivot, so the neighbors are strict.
        if let Some(p) = cache.previous_pivot(ks[a]) {
            l = l.max(p + 1);
        }
        if let Some(p) = cache.next_pivot(ks[b]) {
            r = r.min(p - 1);
        }
        debug_assert!(l <= ks[a] && ks[b] <= r);
        let len = r - l + 1;

        if a == b {
            select_single(v, l, r, ks[a], cfg, false, is_less);
            cache.add(ks[a]);
            continue;
        }
        if len <= cfg.small_sort {
            sortnet::sort_small(&mut v[l..=r], is_less);
            cache.add_range(l, r);
            continue;
        }
        if depth > max_depth {
            sortnet::heapsort(&mut v[l..=r], is_less);
            cache.add_range(l, r);
            continue;
        }

        if len >= cfg.dual_pivot_min {
            // Two pivots from a sorted 5-sample split the remaining ranks
            // three ways in a single pass over the range.
            let (s1, s2) = crate::pivot::dual_sample(v, l, r, is_less);
            let (q1, q2) = partition::dual_pivot(v, l, r, s1, s2, is_less);
            cache.add(q1);
            cache.add(q2);
            let sub = &ks[a..=b];
            let m1 = a + sub.partition_point(|&k| k < q1);
            let mm = a + sub.partition_point(|&k| k <= q1);
            let mq = a + sub.partition_point(|&k| k < q2);
            let m2 = a + sub.partition_point(|&k| k <= q2);
            // Ranks equal to q1 or q2 are resolved by the kernel itself.
            if m1 > a {
                stack.push(Frame { l, r: q1 - 1, a, b: m1 - 1, depth: depth + 1 });
            }
            if mq > mm {
                stack.push(Frame { l: q1 + 1, r: q2 - 1, a: mm, b: mq - 1, depth: depth + 1 });
            }
            if m2 <= b {
                stack.push(Frame { l: q2 + 1, r, a: m2, b, depth: depth + 1 });
            }
        } else {
            // Single pivot targeted at the middle remaining rank.
            let km = ks[(a + b) / 2];
            let strat = if len > cfg.floyd_rivest_min {
                Strategy::FloydRivest
            } else {
                Strategy::Dynamic
            };
            let p = strat.pivot_index(v, l, r, km, cfg, is_less);
            let (lt, gt) = partition::three_way(v, l, r, p, is_less);
            cache.add_range(lt, gt - 1);
            let sub = &ks[a..=b];
            let m1 = a + sub.partition_point(|&k| k < lt);
            let m2 = a + sub.partition_point(|&k| k < gt);
            // Ranks in [m1, m2) fell inside the equal band: resolved.
            if m1 > a {
                stack.push(Frame { l, r: lt - 1, a, b: m1 - 1, depth: depth + 1 });
            }
            if m2 <= b {
                stack.push(Frame { l: gt, r, a: m2, b, depth: depth + 1 });
            }
        }
    }
}

/// Whether every rank of the sorted array `ks` already holds its final
/// sorted value in `[left, right]`: each element must lie at or above the
/// nearest rank below it and at or below the nearest rank above it. One
/// pass, at most two comparisons per element. The kernels all perturb data
/// they touch, so this check is what keeps a repeated call a no-op.
fn window_resolved<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    left: usize,
    right: usize,
    ks: &[usize],
    is_less: &mut F,
) -> bool {
    let mut j = 0;
    let mut prev: Option<usize> = None;
    for i in left..=right {
        if let Some(p) = prev {
            if is_less(&v[i], &v[p]) {
                return false;
            }
        }
        if j < ks.len() && i == ks[j] {
            prev = Some(i);
            j += 1;
        } else if j < ks.len() && is_less(&v[ks[j]], &v[i]) {
            return false;
        }
    }
    true
}

fn min_position<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    left: usize,
    right: usize,
    is_less: &mut F,
) -> usize {
    let mut m = left;
    for i in left + 1..=right {
        if is_less(&v[i], &v[m]) {
            m = i;
        }
    }
    m
}

fn max_position<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    left: usize,
    right: usize,
    is_less: &mut F,
) -> usize {
    let mut m = left;
    for i in left + 1..=right {
        if !is_less(&v[i], &v[m]) {
            m = i;
        }
    }
    m
}
