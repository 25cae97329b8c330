//! Core output types: processes, control limits and point classifications.
//!
//! A [`Process`] is a contiguous range of the series with its own mean and
//! standard deviation. The control limits drawn for it are the mean and the
//! 1.5σ, 2σ and 3σ lines on either side, which are exactly the thresholds
//! the run rules test against.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rules::SignalRule;
use super::stats::SegmentStats;

/// Control limit lines for one process.
///
/// # Invariants
///
/// - `lower_3 <= lower_2 <= lower_1_5 <= cl <= upper_1_5 <= upper_2 <= upper_3`
/// - All values are finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Center line (process mean).
    pub cl: f64,
    /// CL + 1.5σ.
    pub upper_1_5: f64,
    /// CL + 2σ.
    pub upper_2: f64,
    /// CL + 3σ (UCL).
    pub upper_3: f64,
    /// CL − 1.5σ.
    pub lower_1_5: f64,
    /// CL − 2σ.
    pub lower_2: f64,
    /// CL − 3σ (LCL).
    pub lower_3: f64,
}

impl ControlLimits {
    /// Limits around `stats`, or `None` if the statistics are not usable.
    pub fn from_stats(stats: &SegmentStats) -> Option<Self> {
        let s = stats.sd.filter(|_| stats.is_usable())?;
        let m = stats.mean;
        Some(Self {
            cl: m,
            upper_1_5: m + 1.5 * s,
            upper_2: m + 2.0 * s,
            upper_3: m + 3.0 * s,
            lower_1_5: m - 1.5 * s,
            lower_2: m - 2.0 * s,
            lower_3: m - 3.0 * s,
        })
    }
}

/// Final classification of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rule", rename_all = "snake_case")]
pub enum PointClass {
    /// Ordinary random variation.
    Normal,
    /// Flagged as an outlier by the caller; ignored by statistics and rules.
    Excluded,
    /// Part of a qualifying run of the given rule.
    Signal(SignalRule),
}

impl PointClass {
    pub fn is_signal(&self) -> bool {
        matches!(self, Self::Signal(_))
    }

    pub fn rule(&self) -> Option<SignalRule> {
        match self {
            Self::Signal(rule) => Some(*rule),
            _ => None,
        }
    }
}

/// A contiguous segment of the series sharing one baseline.
///
/// `start` and `end` are inclusive indices into the full series. `cap` is an
/// upper bound on `end` imposed by a manual breakpoint or by a later process
/// split off from this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process<T: Ord> {
    /// First index of the process.
    pub start: usize,
    /// Last index of the process (inclusive).
    pub end: usize,
    /// Largest index the process may grow to, if bounded.
    pub cap: Option<usize>,
    /// Statistics of the non-excluded points, `None` if every point is excluded.
    pub stats: Option<SegmentStats>,
    /// Signalling points of this process keyed by timestamp.
    pub signals: BTreeMap<T, SignalRule>,
}

impl<T: Ord> Process<T> {
    /// A fresh, unresolved process starting at `start`.
    pub fn new(start: usize, cap: Option<usize>) -> Self {
        Self {
            start,
            end: start,
            cap,
            stats: None,
            signals: BTreeMap::new(),
        }
    }

    /// Number of points covered, excluded points included.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a resolved process covers at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats.map(|s| s.mean)
    }

    pub fn sd(&self) -> Option<f64> {
        self.stats.and_then(|s| s.sd)
    }

    /// Control limit lines for rendering, or `None` without usable statistics.
    pub fn control_limits(&self) -> Option<ControlLimits> {
        self.stats.as_ref().and_then(ControlLimits::from_stats)
    }

    /// Whether no point of the process signals.
    pub fn is_in_control(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_limits_from_stats() {
        let stats = SegmentStats {
            mean: 25.0,
            sd: Some(2.0),
            count: 10,
        };
        let limits = ControlLimits::from_stats(&stats).expect("usable stats");
        assert!((limits.cl - 25.0).abs() < f64::EPSILON);
        assert!((limits.upper_1_5 - 28.0).abs() < f64::EPSILON);
        assert!((limits.upper_2 - 29.0).abs() < f64::EPSILON);
        assert!((limits.upper_3 - 31.0).abs() < f64::EPSILON);
        assert!((limits.lower_1_5 - 22.0).abs() < f64::EPSILON);
        assert!((limits.lower_2 - 21.0).abs() < f64::EPSILON);
        assert!((limits.lower_3 - 19.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_control_limits_need_usable_stats() {
        let stats = SegmentStats {
            mean: 25.0,
            sd: None,
            count: 1,
        };
        assert!(ControlLimits::from_stats(&stats).is_none());

        let process: Process<u32> = Process::new(0, None);
        assert!(process.control_limits().is_none());
        assert!(process.mean().is_none());
    }

    #[test]
    fn test_process_bounds() {
        let mut process: Process<u32> = Process::new(4, Some(9));
        process.end = 7;
        assert_eq!(process.len(), 4);
        assert!(!process.is_empty());
        assert!(process.contains(4));
        assert!(process.contains(7));
        assert!(!process.contains(8));
        assert!(!process.contains(3));
    }

    #[test]
    fn test_sd_hidden_when_undefined() {
        let mut process: Process<u32> = Process::new(0, None);
        process.stats = Some(SegmentStats {
            mean: 3.0,
            sd: None,
            count: 1,
        });
        assert_eq!(process.mean(), Some(3.0));
        assert_eq!(process.sd(), None);
    }

    #[test]
    fn test_point_class_accessors() {
        assert!(PointClass::Signal(SignalRule::TwoOverTwo).is_signal());
        assert!(!PointClass::Excluded.is_signal());
        assert_eq!(
            PointClass::Signal(SignalRule::TwoOverTwo).rule(),
            Some(SignalRule::TwoOverTwo)
        );
        assert_eq!(PointClass::Normal.rule(), None);
    }

    #[test]
    fn test_point_class_serializes_tagged() {
        let json = serde_json::to_string(&PointClass::Signal(SignalRule::OneOverThree))
            .expect("serialize");
        assert_eq!(json, r#"{"kind":"signal","rule":"ONE_OVER_THREE"}"#);
        let json = serde_json::to_string(&PointClass::Excluded).expect("serialize");
        assert_eq!(json, r#"{"kind":"excluded"}"#);
    }
}
