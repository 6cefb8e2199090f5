//! In-place order-statistic selection for slices.
//!
//! Given a set of ranks K, rearranges a slice so each index in K holds the
//! value it would hold after a full sort, in expected linear time. The
//! engine is an introselect: randomized-free quickselect with adaptive
//! pivot sampling (Floyd & Rivest, CACM 1975), single- and dual-pivot
//! partitioning, sorting networks for small windows, and a
//! median-of-medians stopper (Blum et al. 1973) that bounds the worst
//! case at O(n).
//!
//! Dedicated `f64`/`f32` entry points select under IEEE-754 total order,
//! where NaN is greater than everything and `-0.0 < 0.0`.

pub mod interval;
pub mod partition;
pub mod pivot;
pub mod quickselect;
pub mod sortnet;

mod float;
mod select;

pub use quickselect::Config;
pub use select::{
    select, select_by, select_f32, select_f32_many, select_f32_many_range, select_f32_range,
    select_f64, select_f64_many, select_f64_many_range, select_f64_range, select_many,
    select_many_range, select_range,
};
