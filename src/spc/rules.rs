//! Run rules used to classify points and split processes.
//!
//! Eight rules, paired by direction. Each rule asks for a run of
//! consecutive non-excluded points beyond a threshold expressed in standard
//! deviations from the process mean:
//!
//! | Rule | Run | Side | Threshold | Severity |
//! |------|-----|------|-----------|----------|
//! | [`SignalRule::OneUnderThree`] | 1 | under | 3σ | 0 |
//! | [`SignalRule::TwoUnderTwo`] | 2 | under | 2σ | 1 |
//! | [`SignalRule::ThreeUnderOneFive`] | 3 | under | 1.5σ | 2 |
//! | [`SignalRule::EightUnderMean`] | 8 | under | mean | 3 |
//! | [`SignalRule::EightOverMean`] | 8 | over | mean | 4 |
//! | [`SignalRule::ThreeOverOneFive`] | 3 | over | 1.5σ | 5 |
//! | [`SignalRule::TwoOverTwo`] | 2 | over | 2σ | 6 |
//! | [`SignalRule::OneOverThree`] | 1 | over | 3σ | 7 |
//!
//! When a point belongs to qualifying runs of several rules, the rule with
//! the highest severity wins. Only the two 8-run rules can start a new
//! process.
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use serde::{Deserialize, Serialize};

use super::stats::SegmentStats;

/// Side of the center line a rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Values above the mean.
    Over,
    /// Values below the mean.
    Under,
}

/// One of the eight run rules.
///
/// Variants are declared in severity order, so the derived `Ord` agrees
/// with [`SignalRule::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalRule {
    /// One point more than 3σ below the mean.
    OneUnderThree,
    /// Two consecutive points more than 2σ below the mean.
    TwoUnderTwo,
    /// Three consecutive points more than 1.5σ below the mean.
    ThreeUnderOneFive,
    /// Eight consecutive points below the mean.
    EightUnderMean,
    /// Eight consecutive points above the mean.
    EightOverMean,
    /// Three consecutive points more than 1.5σ above the mean.
    ThreeOverOneFive,
    /// Two consecutive points more than 2σ above the mean.
    TwoOverTwo,
    /// One point more than 3σ above the mean.
    OneOverThree,
}

/// The rule catalog in scan order (ascending severity).
pub const SIGNAL_RULES: [SignalRule; 8] = [
    SignalRule::OneUnderThree,
    SignalRule::TwoUnderTwo,
    SignalRule::ThreeUnderOneFive,
    SignalRule::EightUnderMean,
    SignalRule::EightOverMean,
    SignalRule::ThreeOverOneFive,
    SignalRule::TwoOverTwo,
    SignalRule::OneOverThree,
];

/// Longest run any rule requires. New processes are grown from this size.
pub const MAX_RUN_LENGTH: usize = 8;

impl SignalRule {
    /// Number of consecutive matching points needed for the rule to fire.
    pub fn run_length(self) -> usize {
        match self {
            Self::OneUnderThree | Self::OneOverThree => 1,
            Self::TwoUnderTwo | Self::TwoOverTwo => 2,
            Self::ThreeUnderOneFive | Self::ThreeOverOneFive => 3,
            Self::EightUnderMean | Self::EightOverMean => 8,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Self::OneUnderThree
            | Self::TwoUnderTwo
            | Self::ThreeUnderOneFive
            | Self::EightUnderMean => Direction::Under,
            Self::EightOverMean
            | Self::ThreeOverOneFive
            | Self::TwoOverTwo
            | Self::OneOverThree => Direction::Over,
        }
    }

    /// Distance from the mean, in standard deviations, a value must exceed.
    pub fn sigma_multiple(self) -> f64 {
        match self {
            Self::OneUnderThree | Self::OneOverThree => 3.0,
            Self::TwoUnderTwo | Self::TwoOverTwo => 2.0,
            Self::ThreeUnderOneFive | Self::ThreeOverOneFive => 1.5,
            Self::EightUnderMean | Self::EightOverMean => 0.0,
        }
    }

    /// Rank used to resolve points matched by several rules; higher wins.
    pub fn severity(self) -> u8 {
        self as u8
    }

    /// Position of the rule in [`SIGNAL_RULES`].
    pub fn table_index(self) -> usize {
        self as usize
    }

    /// Whether a completed run of this rule may start a new process.
    pub fn triggers_process_break(self) -> bool {
        matches!(self, Self::EightUnderMean | Self::EightOverMean)
    }

    /// Whether `value` lies beyond this rule's threshold.
    ///
    /// Always `false` when `stats` cannot support a comparison (no standard
    /// deviation, or non-finite moments).
    pub fn matches(self, value: f64, stats: &SegmentStats) -> bool {
        let Some(sd) = stats.sd.filter(|_| stats.is_usable()) else {
            return false;
        };
        let offset = self.sigma_multiple() * sd;
        match self.direction() {
            Direction::Over => value > stats.mean + offset,
            Direction::Under => value < stats.mean - offset,
        }
    }

    /// Stable identifier, e.g. `"EIGHT_OVER_MEAN"`.
    pub fn id(self) -> &'static str {
        match self {
            Self::OneUnderThree => "ONE_UNDER_THREE",
            Self::TwoUnderTwo => "TWO_UNDER_TWO",
            Self::ThreeUnderOneFive => "THREE_UNDER_ONE_FIVE",
            Self::EightUnderMean => "EIGHT_UNDER_MEAN",
            Self::EightOverMean => "EIGHT_OVER_MEAN",
            Self::ThreeOverOneFive => "THREE_OVER_ONE_FIVE",
            Self::TwoOverTwo => "TWO_OVER_TWO",
            Self::OneOverThree => "ONE_OVER_THREE",
        }
    }
}

impl std::fmt::Display for SignalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
