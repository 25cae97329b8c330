//! Ordered input series for process segmentation.
//!
//! A [`Series`] is an owned, validated sequence of [`DataPoint`]s: values
//! are finite and timestamps strictly increase, so every timestamp
//! identifies exactly one point. Timestamps are generic over any `Ord`
//! type (integer ticks, dates, `chrono` datetimes, ...).

use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};

/// A single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint<T> {
    /// Position of the observation in time. Unique within a series.
    pub timestamp: T,
    /// Observed value.
    pub value: f64,
}

impl<T> DataPoint<T> {
    pub fn new(timestamp: T, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A validated, chronologically ordered sequence of observations.
///
/// # Examples
///
/// ```
/// use u_spc::series::{DataPoint, Series};
///
/// let series = Series::new(vec![DataPoint::new(1, 10.0), DataPoint::new(2, 10.5)]).unwrap();
/// assert_eq!(series.len(), 2);
///
/// // Duplicate timestamps are rejected.
/// assert!(Series::new(vec![DataPoint::new(1, 10.0), DataPoint::new(1, 10.5)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    points: Vec<DataPoint<T>>,
}

impl<T: Ord> Series<T> {
    /// Validate and wrap `points`.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::NonFiniteValue`] if any value is NaN or infinite
    /// - [`SeriesError::UnorderedTimestamp`] if a timestamp is not strictly
    ///   greater than the previous one (this also rejects duplicates)
    pub fn new(points: Vec<DataPoint<T>>) -> SeriesResult<Self> {
        if let Some(index) = points.iter().position(|p| !p.value.is_finite()) {
            return Err(SeriesError::NonFiniteValue { index });
        }
        if let Some(i) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(SeriesError::UnorderedTimestamp { index: i + 1 });
        }
        Ok(Self { points })
    }
}

impl<T> Series<T> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DataPoint<T>] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&DataPoint<T>> {
        self.points.get(index)
    }

    /// Timestamp of the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn timestamp(&self, index: usize) -> &T {
        &self.points[index].timestamp
    }

    /// Value of the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn value(&self, index: usize) -> f64 {
        self.points[index].value
    }

    pub fn into_points(self) -> Vec<DataPoint<T>> {
        self.points
    }
}

impl Series<usize> {
    /// Build a series from bare values, using each value's position as its
    /// timestamp.
    ///
    /// # Errors
    ///
    /// [`SeriesError::NonFiniteValue`] if any value is NaN or infinite.
    pub fn from_values(values: &[f64]) -> SeriesResult<Self> {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| DataPoint::new(i, v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series = Series::new(vec![
            DataPoint::new(10, 1.0),
            DataPoint::new(20, 2.0),
            DataPoint::new(35, 3.0),
        ])
        .expect("valid series");
        assert_eq!(series.len(), 3);
        assert_eq!(*series.timestamp(2), 35);
        assert!((series.value(1) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_series_rejects_non_finite() {
        let err = Series::new(vec![DataPoint::new(1, 1.0), DataPoint::new(2, f64::NAN)])
            .expect_err("NaN must be rejected");
        assert_eq!(err, SeriesError::NonFiniteValue { index: 1 });

        let err = Series::from_values(&[f64::INFINITY]).expect_err("inf must be rejected");
        assert_eq!(err, SeriesError::NonFiniteValue { index: 0 });
    }

    #[test]
    fn test_series_rejects_duplicate_and_unordered() {
        let dup = Series::new(vec![DataPoint::new(1, 1.0), DataPoint::new(1, 2.0)]);
        assert_eq!(dup, Err(SeriesError::UnorderedTimestamp { index: 1 }));

        let back = Series::new(vec![
            DataPoint::new(1, 1.0),
            DataPoint::new(3, 2.0),
            DataPoint::new(2, 3.0),
        ]);
        assert_eq!(back, Err(SeriesError::UnorderedTimestamp { index: 2 }));
    }

    #[test]
    fn test_series_empty_is_valid() {
        let series = Series::<i64>::new(Vec::new()).expect("empty is valid");
        assert!(series.is_empty());
    }

    #[test]
    fn test_from_values_uses_positions() {
        let series = Series::from_values(&[5.0, 6.0, 7.0]).expect("valid");
        let stamps: Vec<usize> = series.points().iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![0, 1, 2]);
    }
}
