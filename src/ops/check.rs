use std::fmt;

use serde::Serialize;

use crate::model::activity::{Activity, MAX_LANES};

/// Structured result of validating a loaded activity list
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

impl CheckResult {
    pub fn finding_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

/// Data that breaks a lane invariant. Positions are indexes into the stored sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    #[serde(rename = "lane_out_of_range")]
    LaneOutOfRange { index: usize, lane: u32 },
    #[serde(rename = "end_before_start")]
    EndBeforeStart { index: usize },
    /// Two activities share a lane while their active windows intersect
    #[serde(rename = "overlapping_lane")]
    OverlappingLane { lane: u32, first: usize, second: usize },
}

/// Something odd that still renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    #[serde(rename = "empty_label")]
    EmptyLabel { index: usize },
    #[serde(rename = "unreadable_color")]
    UnreadableColor { index: usize, color: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::LaneOutOfRange { index, lane } => {
                write!(f, "item {index}: lane {lane} outside 1..={MAX_LANES}")
            }
            CheckError::EndBeforeStart { index } => write!(f, "item {index}: ends before it starts"),
            CheckError::OverlappingLane { lane, first, second } => {
                write!(f, "items {first} and {second} overlap on lane {lane}")
            }
        }
    }
}

impl fmt::Display for CheckWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckWarning::EmptyLabel { index } => write!(f, "item {index}: empty label"),
            CheckWarning::UnreadableColor { index, color } => {
                write!(f, "item {index}: unreadable color {color:?}")
            }
        }
    }
}

/// Validate an activity list without modifying it.
///
/// Checks performed:
/// 1. Every lane is within 1..=MAX_LANES
/// 2. No activity ends before it starts
/// 3. No two activities on one lane have intersecting active windows
/// 4. Warnings for empty labels and colors that cannot be rendered
pub fn check_activities(activities: &[Activity]) -> CheckResult {
    let mut result = CheckResult::default();

    for (index, activity) in activities.iter().enumerate() {
        if !(1..=MAX_LANES).contains(&activity.lane) {
            result.errors.push(CheckError::LaneOutOfRange {
                index,
                lane: activity.lane,
            });
        }
        if activity.end.is_some_and(|end| end < activity.start) {
            result.errors.push(CheckError::EndBeforeStart { index });
        }
        if activity.label.trim().is_empty() {
            result.warnings.push(CheckWarning::EmptyLabel { index });
        }
        if activity.color.to_rgb().is_none() {
            result.warnings.push(CheckWarning::UnreadableColor {
                index,
                color: activity.color.to_string(),
            });
        }
    }

    for (first, a) in activities.iter().enumerate() {
        for (offset, b) in activities[first + 1..].iter().enumerate() {
            if a.lane == b.lane && a.overlaps(b) {
                result.errors.push(CheckError::OverlappingLane {
                    lane: a.lane,
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}
