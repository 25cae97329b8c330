//! Error types for series validation and configuration checks.
//!
//! The segmentation engine itself never fails: degenerate statistics are
//! reported as `None` and bad breakpoints are ignored. These errors cover
//! the validation boundary in front of it.

use thiserror::Error;

/// Reasons a sequence of points cannot be accepted as a [`Series`](crate::series::Series).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("value at index {index} is not finite")]
    NonFiniteValue { index: usize },

    #[error("timestamp at index {index} does not strictly follow its predecessor")]
    UnorderedTimestamp { index: usize },
}

/// Problems found by [`SegmentationConfig::validate`](crate::spc::SegmentationConfig::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("breakpoint {index} is outside the series (length {len})")]
    BreakpointOutOfRange { index: usize, len: usize },

    #[error("breakpoint at index 0 cannot start a second process")]
    BreakpointAtStart,
}

pub type SeriesResult<T> = std::result::Result<T, SeriesError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
