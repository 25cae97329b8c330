//! Segment statistics honoring an exclusion set.
//!
//! Computes the mean and unbiased sample standard deviation (n − 1
//! denominator) of a contiguous index range, skipping points whose
//! timestamps have been flagged as outliers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use crate::series::Series;

/// Mean and standard deviation of a process segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Arithmetic mean of the included points.
    pub mean: f64,
    /// Sample standard deviation of the included points. `None` when only
    /// one point is included.
    pub sd: Option<f64>,
    /// Number of points that contributed (excluded points not counted).
    pub count: usize,
}

impl SegmentStats {
    /// Whether both moments are finite, i.e. run-rule predicates can be
    /// evaluated against these statistics.
    pub fn is_usable(&self) -> bool {
        self.mean.is_finite() && self.sd.is_some_and(f64::is_finite)
    }
}

/// Compute statistics over the inclusive range `[start, end]`.
///
/// Returns `None` when the range is empty, out of bounds, or every point in
/// it is excluded. With a single included point the mean is returned and
/// `sd` is `None`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use u_spc::series::Series;
/// use u_spc::spc::compute_stats;
///
/// let series = Series::from_values(&[2.0, 4.0, 4.0, 4.0, 100.0]).unwrap();
/// let excluded: BTreeSet<usize> = [4].into_iter().collect();
/// let s = compute_stats(&series, &excluded, 0, 4).unwrap();
/// assert!((s.mean - 3.5).abs() < 1e-12);
/// assert_eq!(s.count, 4);
/// ```
///
/// # Complexity
///
/// Time: O(end − start), Space: O(end − start)
pub fn compute_stats<T: Ord>(
    series: &Series<T>,
    exclusions: &BTreeSet<T>,
    start: usize,
    end: usize,
) -> Option<SegmentStats> {
    if start > end || end >= series.len() {
        return None;
    }

    let included: Vec<f64> = series.points()[start..=end]
        .iter()
        .filter(|p| !exclusions.contains(&p.timestamp))
        .map(|p| p.value)
        .collect();

    let mean = stats::mean(&included)?;
    let sd = stats::std_dev(&included);

    Some(SegmentStats {
        mean,
        sd,
        count: included.len(),
    })
}
