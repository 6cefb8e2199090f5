//! IEEE-754 pre/post-processing around selection.
//!
//! The engine partitions with `<`, which is a total order only once NaN and
//! the signed zeros are out of the picture. Before partitioning, one pass
//! over the window moves every NaN to the tail (NaN is greater than
//! everything and all NaNs are mutually equal) and rewrites `-0.0` as `0.0`,
//! counting the rewrites. After partitioning, the exact count of negative
//! zeros is restored onto the lowest-index zero slots of the window, which
//! puts `-0.0` below `0.0` at every resolved rank.
//!
//! Why lowest-index works: a resolved rank `k` holding zero has all
//! strictly-negative values at positions below `k`, so the number of zero
//! slots below `k` equals `k - #negatives`. Flipping the first `neg_zeros`
//! zero slots therefore flips position `k` exactly when `k` falls inside
//! the `-0.0` run of the totally ordered array.

pub(crate) trait IeeeFloat: Copy + PartialOrd {
    const ZERO: Self;
    const NEG_ZERO: Self;
    fn is_nan(self) -> bool;
    fn is_neg_zero(self) -> bool;
}

macro_rules! ieee_impl {
    ($f:ty) => {
        impl IeeeFloat for $f {
            const ZERO: Self = 0.0;
            const NEG_ZERO: Self = -0.0;
            fn is_nan(self) -> bool {
                self != self
            }
            fn is_neg_zero(self) -> bool {
                self.to_bits() == Self::NEG_ZERO.to_bits()
            }
        }
    };
}

ieee_impl!(f64);
ieee_impl!(f32);

pub(crate) struct FloatPrep {
    /// First index of the NaN tail; the sortable window is `[left, nan_start)`.
    pub nan_start: usize,
    /// Count of `-0.0` values rewritten to `0.0`.
    pub neg_zeros: usize,
}

/// One pass over `[left, right]`: NaNs to the tail, `-0.0` canonicalized.
pub(crate) fn prepare<T: IeeeFloat>(v: &mut [T], left: usize, right: usize) -> FloatPrep {
    let mut end = right + 1;
    let mut i = left;
    let mut neg_zeros = 0;
    while i < end {
        let x = v[i];
        if x.is_nan() {
            end -= 1;
            v.swap(i, end);
            // The element swapped in from the tail is examined next round.
        } else {
            if x.is_neg_zero() {
                v[i] = T::ZERO;
                neg_zeros += 1;
            }
            i += 1;
        }
    }
    FloatPrep {
        nan_start: end,
        neg_zeros,
    }
}

/// Restores the recorded count of negative zeros onto the lowest-index
/// zero slots of `[left, nan_start)`.
pub(crate) fn restore<T: IeeeFloat>(v: &mut [T], left: usize, prep: &FloatPrep) {
    let mut remaining = prep.neg_zeros;
    let mut i = left;
    while remaining > 0 {
        debug_assert!(i < prep.nan_start);
        if v[i] == T::ZERO {
            v[i] = T::NEG_ZERO;
            remaining -= 1;
        }
        i += 1;
    }
}
