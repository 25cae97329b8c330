//! Partition a series into processes and classify every point.
//!
//! Segmentation starts from either one process covering the whole series
//! (automatic mode, or no manual breakpoints) or one process per manual
//! breakpoint interval. Processes are resolved in order from a work queue;
//! an automatic break puts the newly created process at the front of the
//! queue so it is resolved next. Every resolved process is non-empty and
//! starts right after its predecessor, so the queue drains.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, warn};

use super::chart::{PointClass, Process};
use super::config::SegmentationConfig;
use super::detector::SignalDetector;
use super::rules::SignalRule;
use crate::series::Series;

/// Result of a segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation<T: Ord> {
    /// Resolved processes in chronological order, partitioning the series.
    pub processes: Vec<Process<T>>,
    /// Classification of every point, indexed like the series.
    pub classifications: Vec<PointClass>,
}

impl<T: Ord> Segmentation<T> {
    /// The process containing `index`.
    pub fn process_at(&self, index: usize) -> Option<&Process<T>> {
        let pos = self.processes.partition_point(|p| p.end < index);
        self.processes.get(pos).filter(|p| p.contains(index))
    }

    pub fn classification(&self, index: usize) -> Option<PointClass> {
        self.classifications.get(index).copied()
    }

    /// Indices and rules of all signalling points.
    pub fn signals(&self) -> impl Iterator<Item = (usize, SignalRule)> + '_ {
        self.classifications
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.rule().map(|rule| (i, rule)))
    }

    pub fn signal_count(&self) -> usize {
        self.signals().count()
    }

    /// Whether no point in the series signals.
    pub fn is_in_control(&self) -> bool {
        self.signal_count() == 0
    }

    /// Start indices of every process after the first.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.processes.iter().skip(1).map(|p| p.start).collect()
    }
}

/// Run the full segmentation of `series` under `config`.
///
/// Breakpoints at index 0 or past the end are ignored, and breakpoints are
/// ignored entirely while automatic detection is on.
///
/// # Examples
///
/// ```
/// use u_spc::series::Series;
/// use u_spc::spc::{segment, PointClass, SegmentationConfig};
///
/// // A level shift after eight points starts a second process.
/// let mut values = vec![10.0; 8];
/// values.extend([12.0; 8]);
/// let series = Series::from_values(&values).unwrap();
/// let config = SegmentationConfig::new().with_auto_detect_until(15);
///
/// let result = segment(&series, &config);
/// assert_eq!(result.breakpoints(), vec![8]);
/// assert!(result.is_in_control());
/// assert_eq!(result.classification(3), Some(PointClass::Normal));
/// ```
///
/// # Complexity
///
/// Time: O(Σ m²) over the resolved process lengths m, Space: O(n)
pub fn segment<T: Ord + Clone>(
    series: &Series<T>,
    config: &SegmentationConfig<T>,
) -> Segmentation<T> {
    let len = series.len();
    if len == 0 {
        return Segmentation {
            processes: Vec::new(),
            classifications: Vec::new(),
        };
    }

    let detector = SignalDetector::new(series, config);
    let mut queue = initial_processes(len, config);
    let mut processes = Vec::with_capacity(queue.len());

    while let Some(mut process) = queue.pop_front() {
        if let Some(successor) = detector.resolve(&mut process) {
            queue.push_front(successor);
        }
        processes.push(process);
    }

    debug!(points = len, processes = processes.len(), "segmentation complete");

    let classifications = classify(series, config, &processes);
    Segmentation {
        processes,
        classifications,
    }
}

/// Unresolved processes to seed the work queue with.
fn initial_processes<T: Ord>(len: usize, config: &SegmentationConfig<T>) -> VecDeque<Process<T>> {
    if config.auto_detect_process || config.breakpoints.is_empty() {
        if config.auto_detect_process && !config.breakpoints.is_empty() {
            debug!(
                count = config.breakpoints.len(),
                "manual breakpoints ignored while automatic detection is on"
            );
        }
        return VecDeque::from([Process::new(0, None)]);
    }

    let breakpoints = config.effective_breakpoints(len);
    let dropped = config.breakpoints.len() - breakpoints.len();
    if dropped > 0 {
        warn!(dropped, len, "ignoring duplicate or out-of-range breakpoints");
    }

    let starts = std::iter::once(0).chain(breakpoints.iter().copied());
    let caps = breakpoints.iter().map(|&b| Some(b - 1)).chain(std::iter::once(None));
    starts
        .zip(caps)
        .map(|(start, cap)| Process::new(start, cap))
        .collect()
}

/// Per-point classification from the resolved processes.
fn classify<T: Ord>(
    series: &Series<T>,
    config: &SegmentationConfig<T>,
    processes: &[Process<T>],
) -> Vec<PointClass> {
    let mut classes = vec![PointClass::Normal; series.len()];
    for process in processes {
        for (index, class) in classes
            .iter_mut()
            .enumerate()
            .take(process.end + 1)
            .skip(process.start)
        {
            let timestamp = series.timestamp(index);
            *class = if config.is_excluded(timestamp) {
                PointClass::Excluded
            } else if let Some(&rule) = process.signals.get(timestamp) {
                PointClass::Signal(rule)
            } else {
                PointClass::Normal
            };
        }
    }
    classes
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn series_strategy() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-50.0_f64..50.0, 0..=60)
    }

    proptest! {
        #[test]
        fn processes_partition_the_series(
            values in series_strategy(),
            auto in any::<bool>(),
            breaks in proptest::collection::vec(0_usize..70, 0..5),
            excluded in proptest::collection::btree_set(0_usize..60, 0..6),
            until in proptest::option::of(0_usize..70),
        ) {
            let series = Series::from_values(&values).unwrap();
            let mut config = SegmentationConfig::new()
                .with_auto_detect(auto)
                .with_breakpoints(breaks)
                .with_exclusions(excluded);
            config.auto_detect_until = until;
            let result = segment(&series, &config);

            prop_assert_eq!(result.classifications.len(), values.len());
            if values.is_empty() {
                prop_assert!(result.processes.is_empty());
            } else {
                prop_assert_eq!(result.processes[0].start, 0);
                prop_assert_eq!(result.processes.last().unwrap().end, values.len() - 1);
                for pair in result.processes.windows(2) {
                    prop_assert_eq!(pair[1].start, pair[0].end + 1);
                }
            }
        }

        #[test]
        fn segmentation_is_deterministic(
            values in series_strategy(),
            excluded in proptest::collection::btree_set(0_usize..60, 0..6),
        ) {
            let series = Series::from_values(&values).unwrap();
            let config = SegmentationConfig::new().with_exclusions(excluded);
            prop_assert_eq!(segment(&series, &config), segment(&series, &config));
        }

        #[test]
        fn toggling_exclusion_twice_restores(
            values in series_strategy(),
            target in 0_usize..60,
        ) {
            let series = Series::from_values(&values).unwrap();
            let mut config = SegmentationConfig::new();
            let before = segment(&series, &config);
            config.toggle_exclusion(target);
            config.toggle_exclusion(target);
            prop_assert_eq!(segment(&series, &config), before);
        }

        #[test]
        fn no_extra_processes_without_auto_detect(
            values in proptest::collection::vec(-1e6_f64..1e6, 1..=60),
            breaks in proptest::collection::vec(1_usize..60, 0..4),
        ) {
            let series = Series::from_values(&values).unwrap();
            let config = SegmentationConfig::new()
                .with_auto_detect(false)
                .with_breakpoints(breaks);
            let expected = config.effective_breakpoints(values.len());
            let result = segment(&series, &config);
            prop_assert_eq!(result.breakpoints(), expected);
        }

        #[test]
        fn excluded_points_never_signal(
            values in series_strategy(),
            excluded in proptest::collection::btree_set(0_usize..60, 0..10),
        ) {
            let series = Series::from_values(&values).unwrap();
            let config = SegmentationConfig::new().with_exclusions(excluded.clone());
            let result = segment(&series, &config);
            for (i, class) in result.classifications.iter().enumerate() {
                prop_assert_eq!(excluded.contains(&i), *class == PointClass::Excluded);
            }
        }
    }
}
