//! # u-spc
//!
//! Process segmentation and run-rule signal detection for statistical
//! process control (SPC) charts.
//!
//! Given an ordered series, a set of excluded points and a configuration,
//! the crate partitions the series into processes with their own control
//! limits and classifies every point as in control, excluded, or a signal.
//! Rendering and interaction are left to the caller; everything here is a
//! pure function of its inputs.
//!
//! ## Modules
//!
//! - [`series`] — Validated input series with generic orderable timestamps
//! - [`spc`] — Statistics, run rules, signal detection and segmentation
//! - [`error`] — Validation errors
//!
//! ## Design Philosophy
//!
//! - **Domain-agnostic**: values are raw `f64`, timestamps any `Ord` type
//! - **No hidden state**: configuration is passed into every call
//! - **Degrade, don't fail**: missing statistical basis yields no signals

pub mod error;
pub mod series;
pub mod spc;
