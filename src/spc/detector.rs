//! Growing-window signal detection for a single process.
//!
//! # Algorithm
//!
//! A process starts as a window of [`MAX_RUN_LENGTH`] points (or fewer at
//! the series end or its cap). The window is scanned, then grown by one
//! point and rescanned, until a process break is found or the window
//! cannot grow further. Each scan:
//!
//! 1. clears the process's signals and all run trackers,
//! 2. recomputes mean and sample standard deviation over the window,
//!    skipping excluded points,
//! 3. walks the window from the newest point back to the oldest, extending
//!    a run for every rule whose threshold the point crosses and flushing
//!    the run of every rule it does not cross.
//!
//! A flushed run that reaches its rule's length marks each of its points
//! with the rule, unless the point already carries a rule of equal or
//! higher severity.
//!
//! When an 8-point run completes at a point `j` after the process start,
//! automatic detection is on, and `j` lies before the auto-detect bound, the
//! current process is capped at `j − 1` and a successor starting at `j` is
//! returned. The shortened process is then reclassified against its final
//! statistics so its signals and its mean/sd always agree.
//!
//! Two 8-point rules completing in the same scan are resolved by scan
//! order: the one completing at the newer point wins, and at the same point
//! [`SIGNAL_RULES`] order decides (a point cannot be both above and below
//! the mean, so the second case cannot actually arise).
//!
//! # Complexity
//!
//! Time: O(m²) for a process that grows to m points, Space: O(m)

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::chart::Process;
use super::config::SegmentationConfig;
use super::rules::{SignalRule, MAX_RUN_LENGTH, SIGNAL_RULES};
use super::stats::{compute_stats, SegmentStats};
use crate::series::Series;

/// Current unbroken run of matching timestamps for every rule.
///
/// Each rule is either idle (empty run) or building a run; a mismatch
/// flushes and resets the run.
#[derive(Debug, Clone)]
pub struct SignalTracker<T> {
    runs: [Vec<T>; SIGNAL_RULES.len()],
}

impl<T> Default for SignalTracker<T> {
    fn default() -> Self {
        Self {
            runs: Default::default(),
        }
    }
}

impl<T: Ord> SignalTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every run without recording anything.
    pub fn reset(&mut self) {
        for run in &mut self.runs {
            run.clear();
        }
    }

    /// Append `timestamp` to `rule`'s run and return the new run length.
    pub fn extend(&mut self, rule: SignalRule, timestamp: T) -> usize {
        let run = &mut self.runs[rule.table_index()];
        run.push(timestamp);
        run.len()
    }

    /// Timestamps of `rule`'s run in progress, newest first. Empty when the
    /// rule is idle.
    pub fn run(&self, rule: SignalRule) -> &[T] {
        &self.runs[rule.table_index()]
    }

    /// End `rule`'s run, recording it into `signals` if it is long enough.
    pub fn flush(&mut self, rule: SignalRule, signals: &mut BTreeMap<T, SignalRule>) {
        let run = std::mem::take(&mut self.runs[rule.table_index()]);
        if run.len() < rule.run_length() {
            return;
        }
        for timestamp in run {
            match signals.get(&timestamp) {
                Some(&existing) if existing >= rule => {}
                _ => {
                    signals.insert(timestamp, rule);
                }
            }
        }
    }

    /// Flush the runs of all rules, in catalog order.
    pub fn flush_all(&mut self, signals: &mut BTreeMap<T, SignalRule>) {
        for rule in SIGNAL_RULES {
            self.flush(rule, signals);
        }
    }
}

/// Resolves processes of one series under one configuration.
pub struct SignalDetector<'a, T: Ord> {
    series: &'a Series<T>,
    config: &'a SegmentationConfig<T>,
}

impl<'a, T: Ord + Clone> SignalDetector<'a, T> {
    pub fn new(series: &'a Series<T>, config: &'a SegmentationConfig<T>) -> Self {
        Self { series, config }
    }

    /// Grow `process` to its final extent, fill in its statistics and
    /// signals, and return the successor process if a break was found.
    ///
    /// A process starting past the end of the series is left without
    /// statistics.
    pub fn resolve(&self, process: &mut Process<T>) -> Option<Process<T>> {
        let Some(last) = self.series.len().checked_sub(1) else {
            process.stats = None;
            process.signals.clear();
            return None;
        };
        if process.start > last {
            process.stats = None;
            process.signals.clear();
            return None;
        }

        let limit = process.cap.map_or(last, |cap| cap.clamp(process.start, last));
        let mut end = (process.start + MAX_RUN_LENGTH - 1).min(limit);
        let mut tracker = SignalTracker::new();

        let break_at = loop {
            process.end = end;
            if let Some(j) = self.scan(process, &mut tracker, true) {
                break Some(j);
            }
            if end >= limit {
                break None;
            }
            end += 1;
            trace!(start = process.start, end, "growing process window");
        };

        let j = break_at?;
        let successor = Process::new(j, process.cap);
        process.cap = Some(j - 1);
        process.end = j - 1;
        debug!(
            start = process.start,
            end = process.end,
            next = j,
            "automatic process break"
        );
        self.scan(process, &mut tracker, false);
        Some(successor)
    }

    /// Recompute statistics and signals for `process.start..=process.end`.
    ///
    /// Returns the index where a new process should begin when
    /// `allow_break` is set and a qualifying 8-point run completes.
    fn scan(
        &self,
        process: &mut Process<T>,
        tracker: &mut SignalTracker<T>,
        allow_break: bool,
    ) -> Option<usize> {
        process.signals.clear();
        tracker.reset();
        process.stats = compute_stats(
            self.series,
            &self.config.exclusions,
            process.start,
            process.end,
        );
        let stats = process.stats.filter(SegmentStats::is_usable)?;

        for j in (process.start..=process.end).rev() {
            let point = &self.series.points()[j];
            if self.config.is_excluded(&point.timestamp) {
                continue;
            }
            for rule in SIGNAL_RULES {
                if !rule.matches(point.value, &stats) {
                    tracker.flush(rule, &mut process.signals);
                    continue;
                }
                let run = tracker.extend(rule, point.timestamp.clone());
                if allow_break
                    && j > process.start
                    && rule.triggers_process_break()
                    && run >= rule.run_length()
                    && self.config.allows_auto_break_at(&point.timestamp)
                {
                    return Some(j);
                }
            }
        }

        tracker.flush_all(&mut process.signals);
        None
    }
}
