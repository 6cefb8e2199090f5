//! Public selection entry points.
//!
//! All operations rearrange the slice in place so that every requested rank
//! holds the value it would hold in a fully sorted slice, leaving the rest
//! only partially ordered. Bounds and ranks are validated eagerly, before
//! any element moves; violations panic with the offending value.
//!
//! The `f64`/`f32` entry points additionally honor IEEE-754 total order:
//! NaN sorts above everything (all NaNs mutually equal) and `-0.0` sorts
//! below `0.0`. They never reject numeric edge cases.

use crate::float::{self, IeeeFloat};
use crate::quickselect::{self, Config};

#[track_caller]
fn check_window(len: usize, from: usize, to: usize) {
    if from > to || to > len {
        panic!("selection window {from}..{to} out of bounds for slice of length {len}");
    }
}

#[track_caller]
fn check_ranks(ranks: &[usize], from: usize, to: usize) {
    for &k in ranks {
        if k < from || k >= to {
            panic!("rank {k} out of selection window {from}..{to}");
        }
    }
}

/// Places the `k`-th smallest value of `v` at index `k`.
pub fn select<T: Ord + Copy>(v: &mut [T], k: usize) {
    select_range(v, 0, v.len(), k);
}

/// Places every rank of `ranks` at its sorted position. The collection may
/// be unsorted and contain duplicates.
pub fn select_many<T: Ord + Copy>(v: &mut [T], ranks: &[usize]) {
    select_many_range(v, 0, v.len(), ranks);
}

/// [`select`] restricted to the window `from..to` of `v`; `k` is an
/// absolute index inside that window.
pub fn select_range<T: Ord + Copy>(v: &mut [T], from: usize, to: usize, k: usize) {
    select_many_range(v, from, to, &[k]);
}

/// [`select_many`] restricted to the window `from..to` of `v`.
pub fn select_many_range<T: Ord + Copy>(v: &mut [T], from: usize, to: usize, ranks: &[usize]) {
    select_by(v, from, to, ranks, &Config::default(), T::lt);
}

/// Comparator-parameterized selection with an explicit [`Config`].
///
/// `is_less` must be a strict weak ordering over the window's elements;
/// the float entry points below exist precisely because `<` on floats is
/// not one in the presence of NaN.
pub fn select_by<T: Copy, F: FnMut(&T, &T) -> bool>(
    v: &mut [T],
    from: usize,
    to: usize,
    ranks: &[usize],
    cfg: &Config,
    is_less: F,
) {
    check_window(v.len(), from, to);
    check_ranks(ranks, from, to);
    quickselect::select_range_by(v, from, to, ranks, cfg, is_less);
}

fn select_floats<T: IeeeFloat>(v: &mut [T], from: usize, to: usize, ranks: &[usize]) {
    check_window(v.len(), from, to);
    check_ranks(ranks, from, to);
    if ranks.is_empty() || to - from <= 1 {
        return;
    }
    let prep = float::prepare(v, from, to - 1);
    // Ranks at or above the NaN boundary already hold NaN, the greatest
    // value under total order; only the rest reach the engine.
    let sub: Vec<usize> = ranks
        .iter()
        .copied()
        .filter(|&k| k < prep.nan_start)
        .collect();
    if !sub.is_empty() {
        quickselect::select_range_by(
            v,
            from,
            prep.nan_start,
            &sub,
            &Config::default(),
            |a: &T, b: &T| a < b,
        );
    }
    float::restore(v, from, &prep);
}

macro_rules! float_api {
    ($f:ty, $one:ident, $many:ident, $one_range:ident, $many_range:ident) => {
        /// Places the `k`-th smallest value at index `k` under IEEE-754
        /// total order (`-0.0 < 0.0`, NaN greatest).
        pub fn $one(v: &mut [$f], k: usize) {
            $many_range(v, 0, v.len(), &[k]);
        }

        /// Multi-rank form of the same operation; `ranks` may be unsorted
        /// and contain duplicates.
        pub fn $many(v: &mut [$f], ranks: &[usize]) {
            $many_range(v, 0, v.len(), ranks);
        }

        /// Window form over `from..to`; `k` is an absolute index.
        pub fn $one_range(v: &mut [$f], from: usize, to: usize, k: usize) {
            $many_range(v, from, to, &[k]);
        }

        /// Windowed multi-rank form.
        pub fn $many_range(v: &mut [$f], from: usize, to: usize, ranks: &[usize]) {
            select_floats(v, from, to, ranks);
        }
    };
}

float_api!(f64, select_f64, select_f64_many, select_f64_range, select_f64_many_range);
float_api!(f32, select_f32, select_f32_many, select_f32_range, select_f32_many_range);

#[cfg(test)]
mod tests {
    use super::*;

    fn bits64(v: &[f64]) -> Vec<u64> {
        v.iter().map(|x| x.to_bits()).collect()
    }

    // -- validation ---------------------------------------------------------

    #[test]
    #[should_panic(expected = "rank 6 out of selection window 0..6")]
    fn rank_past_end_panics() {
        let mut v = vec![5, 3, 8, 1, 9, 2];
        select(&mut v, 6);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn window_past_end_panics() {
        let mut v = vec![1, 2, 3];
        select_range(&mut v, 0, 4, 1);
    }

    #[test]
    #[should_panic(expected = "rank 1 out of selection window 2..5")]
    fn rank_below_window_panics() {
        let mut v = vec![9, 8, 7, 6, 5];
        select_range(&mut v, 2, 5, 1);
    }

    #[test]
    fn validation_happens_before_any_mutation() {
        let mut v = vec![5, 3, 8, 1, 9, 2];
        let orig = v.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            select_many(&mut v, &[2, 99]);
        }));
        assert!(result.is_err());
        assert_eq!(orig, v);
    }

    // -- basic ordering -----------------------------------------------------

    #[test]
    fn kth_smallest_integers() {
        let mut v = vec![5, 3, 8, 1, 9, 2];
        select(&mut v, 2);
        assert_eq!(3, v[2]);
    }

    #[test]
    fn min_and_max_together() {
        let mut v = vec![5, 3, 8, 1, 9, 2];
        select_many(&mut v, &[0, 5]);
        assert_eq!(1, v[0]);
        assert_eq!(9, v[5]);
    }

    #[test]
    fn full_sort_with_nan_and_signed_zero() {
        let mut v = vec![1.0f64, f64::NAN, -0.0, 0.0, f64::NAN];
        select_f64_many(&mut v, &[0, 1, 2, 3, 4]);
        assert_eq!((-0.0f64).to_bits(), v[0].to_bits());
        assert_eq!(0.0f64.to_bits(), v[1].to_bits());
        assert_eq!(1.0, v[2]);
        assert!(v[3].is_nan() && v[4].is_nan());
    }

    // -- float edge cases ---------------------------------------------------

    #[test]
    fn all_nan_input() {
        let mut v = vec![f64::NAN; 5];
        select_f64(&mut v, 2);
        assert!(v.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn nan_rank_resolves_to_nan() {
        let mut v = vec![2.0f64, f64::NAN, 1.0, 3.0];
        select_f64(&mut v, 3);
        assert!(v[3].is_nan());
        select_f64(&mut v, 0);
        assert_eq!(1.0, v[0]);
    }

    #[test]
    fn signed_zero_pair() {
        let mut v = vec![0.0f64, -0.0];
        select_f64_many(&mut v, &[0, 1]);
        assert_eq!(bits64(&[-0.0, 0.0]), bits64(&v));
    }

    #[test]
    fn signed_zeros_at_selected_ranks() {
        let mut v = vec![3.0f64, -0.0, -1.0, 0.0, -0.0, 2.0, 0.0];
        // Total order: -1.0, -0.0, -0.0, 0.0, 0.0, 2.0, 3.0
        select_f64_many(&mut v, &[1, 2, 3]);
        assert_eq!((-0.0f64).to_bits(), v[1].to_bits());
        assert_eq!((-0.0f64).to_bits(), v[2].to_bits());
        assert_eq!(0.0f64.to_bits(), v[3].to_bits());
    }

    #[test]
    fn f32_total_order() {
        let mut v = vec![0.5f32, f32::NAN, -0.0, 1.5, 0.0];
        select_f32_many(&mut v, &[0, 1, 4]);
        assert_eq!((-0.0f32).to_bits(), v[0].to_bits());
        assert_eq!(0.0f32.to_bits(), v[1].to_bits());
        assert!(v[4].is_nan());
    }

    #[test]
    fn empty_ranks_never_mutate() {
        let mut v = vec![2.0f64, f64::NAN, -0.0];
        let orig = bits64(&v);
        select_f64_many(&mut v, &[]);
        assert_eq!(orig, bits64(&v));
    }

    #[test]
    fn single_element_window_is_noop() {
        let mut v = vec![4, 7, 1];
        select_range(&mut v, 1, 2, 1);
        assert_eq!(vec![4, 7, 1], v);
    }

    #[test]
    fn float_window_keeps_outside_elements_in_place() {
        let mut v = vec![f64::NAN, 4.0, 1.0, 3.0, f64::NAN];
        select_f64_range(&mut v, 1, 4, 1);
        assert!(v[0].is_nan() && v[4].is_nan());
        assert_eq!(1.0, v[1]);
    }

    #[test]
    fn float_multiset_preserved_bitwise_by_class() {
        let mut v = vec![5.0f64, -0.0, f64::NAN, 0.0, -5.0, -0.0];
        select_f64_many(&mut v, &[0, 3, 5]);
        assert_eq!(2, v.iter().filter(|x| x.to_bits() == (-0.0f64).to_bits()).count());
        assert_eq!(1, v.iter().filter(|x| x.to_bits() == 0.0f64.to_bits()).count());
        assert_eq!(1, v.iter().filter(|x| x.is_nan()).count());
    }

    #[test]
    fn repeated_float_selection_is_bitwise_stable() {
        let mut v = vec![2.0f64, f64::NAN, -0.0, 0.0, -3.0, f64::NAN, 1.0, -0.0];
        let ranks = [0usize, 3, 5];
        select_f64_many(&mut v, &ranks);
        let snapshot = bits64(&v);
        select_f64_many(&mut v, &ranks);
        assert_eq!(snapshot, bits64(&v));
    }

    #[test]
    fn random_floats_match_sorted_oracle() {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        for _ in 0..20 {
            let len = rng.random_range(1..500);
            let mut v: Vec<f64> = (0..len)
                .map(|_| match rng.random_range(0..10) {
                    0 => f64::NAN,
                    1 => -0.0,
                    2 => 0.0,
                    _ => rng.random_range(-1000..1000) as f64 / 8.0,
                })
                .collect();
            let mut oracle = v.clone();
            oracle.sort_unstable_by(f64::total_cmp);
            let ranks: Vec<usize> = (0..8).map(|_| rng.random_range(0..len)).collect();
            select_f64_many(&mut v, &ranks);
            for &k in &ranks {
                assert_eq!(oracle[k].to_bits(), v[k].to_bits(), "rank {k}");
            }
        }
    }
}
