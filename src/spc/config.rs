//! Segmentation settings passed into every analysis call.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Inputs that steer segmentation besides the series itself.
///
/// All fields have defaults, so partial configurations deserialize:
///
/// ```
/// use u_spc::spc::SegmentationConfig;
///
/// let config: SegmentationConfig<i64> =
///     serde_json::from_str(r#"{ "auto_detect_until": 1700000000 }"#).unwrap();
/// assert!(config.auto_detect_process);
/// assert_eq!(config.auto_detect_until, Some(1_700_000_000));
/// assert!(config.exclusions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Ord + Deserialize<'de>"))]
pub struct SegmentationConfig<T: Ord> {
    /// Split processes automatically when an 8-point run appears.
    pub auto_detect_process: bool,
    /// Automatic splits are only allowed at points strictly before this
    /// timestamp. `None` places no bound.
    pub auto_detect_until: Option<T>,
    /// Timestamps flagged as outliers.
    pub exclusions: BTreeSet<T>,
    /// Start indices of manually forced processes. Only used when
    /// `auto_detect_process` is off.
    pub breakpoints: Vec<usize>,
}

impl<T: Ord> Default for SegmentationConfig<T> {
    fn default() -> Self {
        Self {
            auto_detect_process: true,
            auto_detect_until: None,
            exclusions: BTreeSet::new(),
            breakpoints: Vec::new(),
        }
    }
}

impl<T: Ord> SegmentationConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect_process = enabled;
        self
    }

    pub fn with_auto_detect_until(mut self, until: T) -> Self {
        self.auto_detect_until = Some(until);
        self
    }

    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = T>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: impl IntoIterator<Item = usize>) -> Self {
        self.breakpoints.extend(breakpoints);
        self
    }

    pub fn is_excluded(&self, timestamp: &T) -> bool {
        self.exclusions.contains(timestamp)
    }

    /// Flip the exclusion flag of `timestamp`. Returns `true` if the point
    /// is excluded afterwards.
    pub fn toggle_exclusion(&mut self, timestamp: T) -> bool {
        if self.exclusions.remove(&timestamp) {
            false
        } else {
            self.exclusions.insert(timestamp);
            true
        }
    }

    /// Whether an automatic split may start at a point with `timestamp`.
    pub fn allows_auto_break_at(&self, timestamp: &T) -> bool {
        self.auto_detect_process
            && self
                .auto_detect_until
                .as_ref()
                .map_or(true, |until| timestamp < until)
    }

    /// Breakpoints that can actually start a process in a series of `len`
    /// points: sorted, deduplicated, without index 0 and without indices
    /// past the end.
    pub fn effective_breakpoints(&self, len: usize) -> Vec<usize> {
        let mut points: Vec<usize> = self
            .breakpoints
            .iter()
            .copied()
            .filter(|&b| b > 0 && b < len)
            .collect();
        points.sort_unstable();
        points.dedup();
        points
    }

    /// Strict check of the breakpoints against a series of `len` points.
    ///
    /// Segmentation itself ignores bad breakpoints; this is for callers that
    /// want to surface them.
    ///
    /// # Errors
    ///
    /// The first breakpoint that is `0` or `>= len`.
    pub fn validate(&self, len: usize) -> ConfigResult<()> {
        for &b in &self.breakpoints {
            if b == 0 {
                return Err(ConfigError::BreakpointAtStart);
            }
            if b >= len {
                return Err(ConfigError::BreakpointOutOfRange { index: b, len });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SegmentationConfig<u32> = SegmentationConfig::default();
        assert!(config.auto_detect_process);
        assert!(config.auto_detect_until.is_none());
        assert!(config.exclusions.is_empty());
        assert!(config.breakpoints.is_empty());
    }

    #[test]
    fn test_toggle_exclusion_twice_restores() {
        let mut config: SegmentationConfig<u32> = SegmentationConfig::new();
        assert!(config.toggle_exclusion(5));
        assert!(config.is_excluded(&5));
        assert!(!config.toggle_exclusion(5));
        assert!(!config.is_excluded(&5));
        assert_eq!(config, SegmentationConfig::new());
    }

    #[test]
    fn test_auto_break_window() {
        let config = SegmentationConfig::new().with_auto_detect_until(10_u32);
        assert!(config.allows_auto_break_at(&9));
        assert!(!config.allows_auto_break_at(&10));
        assert!(!config.allows_auto_break_at(&11));

        let unbounded: SegmentationConfig<u32> = SegmentationConfig::new();
        assert!(unbounded.allows_auto_break_at(&u32::MAX));

        let disabled = SegmentationConfig::new()
            .with_auto_detect(false)
            .with_auto_detect_until(10_u32);
        assert!(!disabled.allows_auto_break_at(&1));
    }

    #[test]
    fn test_effective_breakpoints_clean_up() {
        let config: SegmentationConfig<u32> =
            SegmentationConfig::new().with_breakpoints([12, 4, 0, 4, 30, 8]);
        assert_eq!(config.effective_breakpoints(20), vec![4, 8, 12]);
        assert!(config.effective_breakpoints(0).is_empty());
    }

    #[test]
    fn test_validate_reports_bad_breakpoints() {
        let ok: SegmentationConfig<u32> = SegmentationConfig::new().with_breakpoints([3, 5]);
        assert_eq!(ok.validate(10), Ok(()));

        let zero: SegmentationConfig<u32> = SegmentationConfig::new().with_breakpoints([0]);
        assert_eq!(zero.validate(10), Err(ConfigError::BreakpointAtStart));

        let far: SegmentationConfig<u32> = SegmentationConfig::new().with_breakpoints([3, 10]);
        assert_eq!(
            far.validate(10),
            Err(ConfigError::BreakpointOutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SegmentationConfig::new()
            .with_auto_detect(false)
            .with_auto_detect_until(99_i64)
            .with_exclusions([3, 7])
            .with_breakpoints([10]);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: SegmentationConfig<i64> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }
}
