//! Stateful chart model for interactive callers.
//!
//! [`ProcessChart`] keeps a series together with its segmentation settings
//! and recomputes the full segmentation after every edit (exclusion toggles,
//! breakpoint changes, auto-detect settings). There is no incremental
//! update: every edit costs one complete [`segment`] call.

use super::chart::{PointClass, Process};
use super::config::SegmentationConfig;
use super::segmenter::{segment, Segmentation};
use crate::series::Series;

/// A series, its settings, and the segmentation they produce.
///
/// # Examples
///
/// ```
/// use u_spc::series::Series;
/// use u_spc::spc::{PointClass, ProcessChart, SegmentationConfig};
///
/// let series = Series::from_values(&[25.0, 25.2, 24.8, 25.1, 24.9, 25.3, 25.0, 24.7]).unwrap();
/// let mut chart = ProcessChart::new(series, SegmentationConfig::new());
/// assert_eq!(chart.processes().len(), 1);
///
/// assert!(chart.toggle_exclusion(5));
/// assert_eq!(chart.classification(5), Some(PointClass::Excluded));
/// ```
#[derive(Debug, Clone)]
pub struct ProcessChart<T: Ord> {
    series: Series<T>,
    config: SegmentationConfig<T>,
    segmentation: Segmentation<T>,
}

impl<T: Ord + Clone> ProcessChart<T> {
    pub fn new(series: Series<T>, config: SegmentationConfig<T>) -> Self {
        let segmentation = segment(&series, &config);
        Self {
            series,
            config,
            segmentation,
        }
    }

    pub fn series(&self) -> &Series<T> {
        &self.series
    }

    pub fn config(&self) -> &SegmentationConfig<T> {
        &self.config
    }

    pub fn segmentation(&self) -> &Segmentation<T> {
        &self.segmentation
    }

    pub fn processes(&self) -> &[Process<T>] {
        &self.segmentation.processes
    }

    pub fn classification(&self, index: usize) -> Option<PointClass> {
        self.segmentation.classification(index)
    }

    pub fn is_excluded(&self, timestamp: &T) -> bool {
        self.config.is_excluded(timestamp)
    }

    /// Flip the exclusion of `timestamp` and resegment. Returns `true` if
    /// the point is excluded afterwards.
    pub fn toggle_exclusion(&mut self, timestamp: T) -> bool {
        let excluded = self.config.toggle_exclusion(timestamp);
        self.recompute();
        excluded
    }

    /// Force a process to start at `index`. Only effective while automatic
    /// detection is off.
    pub fn add_breakpoint(&mut self, index: usize) {
        if !self.config.breakpoints.contains(&index) {
            self.config.breakpoints.push(index);
            self.recompute();
        }
    }

    /// Remove a manual breakpoint. Returns `false` if none was set at `index`.
    pub fn remove_breakpoint(&mut self, index: usize) -> bool {
        let before = self.config.breakpoints.len();
        self.config.breakpoints.retain(|&b| b != index);
        let removed = self.config.breakpoints.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    pub fn set_auto_detect(&mut self, enabled: bool) {
        if self.config.auto_detect_process != enabled {
            self.config.auto_detect_process = enabled;
            self.recompute();
        }
    }

    pub fn set_auto_detect_until(&mut self, until: Option<T>) {
        self.config.auto_detect_until = until;
        self.recompute();
    }

    /// Replace the series, keeping the settings.
    pub fn set_series(&mut self, series: Series<T>) {
        self.series = series;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.segmentation = segment(&self.series, &self.config);
    }
}
