use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::color::ColorSpec;

/// Number of lanes (grid rows) available to activities
pub const MAX_LANES: u32 = 10;

/// Session-scoped handle for an activity. Assigned by the store, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error for rejected user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("activity label is empty")]
    EmptyLabel,
}

/// An open-ended activity shown as a bar across the month grid.
///
/// On disk this is exactly `{label, start, end, color, lane}` with unix-second
/// timestamps; older data used `line` for the lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(skip)]
    pub id: ActivityId,
    pub label: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,
    /// `None` while in progress
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub end: Option<DateTime<Utc>>,
    pub color: ColorSpec,
    #[serde(alias = "line")]
    pub lane: u32,
}

impl Activity {
    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    /// Whether the half-open windows `[start, end ?? ∞)` of both activities intersect
    pub fn overlaps(&self, other: &Activity) -> bool {
        let starts_before_other_ends = other.end.is_none_or(|end| self.start < end);
        let other_starts_before_end = self.end.is_none_or(|end| other.start < end);
        starts_before_other_ends && other_starts_before_end
    }
}

/// Persisted fields only; `id` is a per-session handle.
impl PartialEq for Activity {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.start == other.start
            && self.end == other.end
            && self.color == other.color
            && self.lane == other.lane
    }
}

impl Eq for Activity {}

/// Trim a user-entered label, rejecting one that is empty afterwards
pub fn validate_label(label: &str) -> Result<&str, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyLabel)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn activity(start: u32, end: Option<u32>) -> Activity {
        Activity {
            id: ActivityId::default(),
            label: "x".into(),
            start: at(start),
            end: end.map(at),
            color: ColorSpec::new("#FFFFFF"),
            lane: 1,
        }
    }

    #[test]
    fn open_windows_always_overlap_later_starts() {
        let a = activity(1, None);
        let b = activity(20, None);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let a = activity(1, Some(10));
        let b = activity(10, None);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_windows_overlap() {
        let a = activity(1, Some(20));
        let b = activity(5, Some(6));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn equality_ignores_session_id() {
        let a = activity(1, None);
        let mut b = a.clone();
        b.id = ActivityId(42);
        assert_eq!(a, b);
    }

    #[test]
    fn reads_legacy_line_field() {
        let json = r#"{"label":"Read","start":1710504000,"end":null,"color":"hsl(1,50%,90%)","line":3}"#;
        let a: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(a.lane, 3);
        assert_eq!(a.start, Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
        assert!(a.end.is_none());
    }

    #[test]
    fn writes_lane_and_unix_seconds() {
        let a = activity(15, Some(16));
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["start"], 1710504000);
        assert_eq!(value["end"], 1710590400);
        assert_eq!(value["lane"], 1);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn label_validation() {
        assert_eq!(validate_label("  Learn Rust "), Ok("Learn Rust"));
        assert_eq!(validate_label(""), Err(ValidationError::EmptyLabel));
        assert_eq!(validate_label(" \t "), Err(ValidationError::EmptyLabel));
    }
}
