//! Statistical Process Control (SPC) segmentation and signal detection.
//!
//! Splits an ordered series into *processes* (contiguous ranges sharing one
//! mean and standard deviation) and classifies every point as normal,
//! excluded, or signalling under one of eight run rules.
//!
//! # Components
//!
//! - [`compute_stats`] — mean and sample standard deviation of a range, honoring exclusions
//! - [`SignalRule`] / [`SIGNAL_RULES`] — the run-rule catalog with severity ordering
//! - [`SignalDetector`] — grows one process, scans it, and finds automatic process breaks
//! - [`segment`] — drives the detector over all processes and classifies every point
//! - [`ProcessChart`] — owns a series and its settings, resegmenting after each edit
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

mod chart;
mod config;
mod detector;
mod process_chart;
mod rules;
mod segmenter;
mod stats;

pub use chart::{ControlLimits, PointClass, Process};
pub use config::SegmentationConfig;
pub use detector::{SignalDetector, SignalTracker};
pub use process_chart::ProcessChart;
pub use rules::{Direction, SignalRule, MAX_RUN_LENGTH, SIGNAL_RULES};
pub use segmenter::{segment, Segmentation};
pub use stats::{compute_stats, SegmentStats};
