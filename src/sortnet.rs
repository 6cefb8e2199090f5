//! Small-N sorting: fixed-comparator networks plus bounded fallbacks.
//!
//! Selection spends the end-game on tiny ranges where asymptotic machinery
//! is pure overhead. Ranges of 3..=5 elements are sorted by explicit optimal
//! networks, 6..=11 by Batcher's merge-exchange schedule (Knuth, TAOCP vol. 3,
//! Algorithm 5.2.2M — data-independent comparator sequence for any N), and
//! anything above the network ceiling by a bounded insertion sort. A heapsort
//! is kept as the recursion-depth stopper of the introselect driver.
//!
//! The network helpers take explicit index tuples so pivot sampling can sort
//! non-contiguous probe positions in place.

/// Largest range length handled by a comparator network.
pub const NETWORK_MAX: usize = 11;

/// Compare-and-swap: after the call `v[a] <= v[b]` under `is_less`.
#[inline]
fn cswap<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], a: usize, b: usize, is_less: &mut F) {
    if is_less(&v[b], &v[a]) {
        v.swap(a, b);
    }
}

/// 3-element network, 3 comparators, applied to arbitrary distinct indices.
pub fn sort3_at<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], idx: [usize; 3], is_less: &mut F) {
    let [a, b, c] = idx;
    cswap(v, a, c, is_less);
    cswap(v, a, b, is_less);
    cswap(v, b, c, is_less);
}

/// 4-element Batcher network, 5 comparators.
pub fn sort4_at<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], idx: [usize; 4], is_less: &mut F) {
    let [a, b, c, d] = idx;
    cswap(v, a, b, is_less);
    cswap(v, c, d, is_less);
    cswap(v, a, c, is_less);
    cswap(v, b, d, is_less);
    cswap(v, b, c, is_less);
}

/// 5-element network, 9 comparators (optimal size).
pub fn sort5_at<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], idx: [usize; 5], is_less: &mut F) {
    let [a, b, c, d, e] = idx;
    cswap(v, a, b, is_less);
    cswap(v, d, e, is_less);
    cswap(v, c, e, is_less);
    cswap(v, c, d, is_less);
    cswap(v, a, d, is_less);
    cswap(v, a, c, is_less);
    cswap(v, b, e, is_less);
    cswap(v, b, d, is_less);
    cswap(v, b, c, is_less);
}

/// Batcher merge-exchange: a data-independent comparator schedule that sorts
/// any length. Used for 6 <= n <= NETWORK_MAX.
pub fn merge_exchange<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], is_less: &mut F) {
    let n = v.len();
    if n < 2 {
        return;
    }
    let t = usize::BITS - (n - 1).leading_zeros();
    let mut p = 1usize << (t - 1);
    while p > 0 {
        let mut q = 1usize << (t - 1);
        let mut r = 0usize;
        let mut d = p;
        loop {
            for i in 0..n - d {
                if i & p == r {
                    cswap(v, i, i + d, is_less);
                }
            }
            if q == p {
                break;
            }
            d = q - p;
            q >>= 1;
            r = p;
        }
        p >>= 1;
    }
}

/// Bounded insertion sort. `T: Copy` keeps the shift loop branch-light.
pub fn insertion_sort<T: Copy, F: FnMut(&T, &T) -> bool>(v: &mut [T], is_less: &mut F) {
    for i in 1..v.len() {
        let x = v[i];
        let mut j = i;
        while j > 0 && is_less(&x, &v[j - 1]) {
            v[j] = v[j - 1];
            j -= 1;
        }
        v[j] = x;
    }
}

/// Sorts a small range: network at or below `NETWORK_MAX`, insertion sort above.
pub fn sort_small<T: Copy, F: FnMut(&T, &T) -> bool>(v: &mut [T], is_less: &mut F) {
    match v.len() {
        0 | 1 => {}
        2 => cswap(v, 0, 1, is_less),
        3 => sort3_at(v, [0, 1, 2], is_less),
        4 => sort4_at(v, [0, 1, 2, 3], is_less),
        5 => sort5_at(v, [0, 1, 2, 3, 4], is_less),
        6..=NETWORK_MAX => merge_exchange(v, is_less),
        _ => insertion_sort(v, is_less),
    }
}

/// Heapsort, the depth-stopper fallback of the driver. `parent >= child` heap.
pub fn heapsort<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], is_less: &mut F) {
    fn sift_down<T, F: FnMut(&T, &T) -> bool>(v: &mut [T], mut node: usize, is_less: &mut F) {
        loop {
            let mut child = 2 * node + 1;
            if child >= v.len() {
                break;
            }
            if child + 1 < v.len() && is_less(&v[child], &v[child + 1]) {
                child += 1;
            }
            if !is_less(&v[node], &v[child]) {
                break;
            }
            v.swap(node, child);
            node = child;
        }
    }

    // Build the heap in linear time, then pop maximal elements.
    for i in (0..v.len() / 2).rev() {
        sift_down(v, i, is_less);
    }
    for i in (1..v.len()).rev() {
        v.swap(0, i);
        sift_down(&mut v[..i], 0, is_less);
    }
}
