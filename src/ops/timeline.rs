use chrono::{DateTime, TimeZone};

use crate::model::activity::Activity;
use crate::model::month::{YearMonth, local_time};

/// What a single (lane, month) grid cell displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState<'a> {
    pub occupant: Option<&'a Activity>,
    /// The occupant's bar starts in this month (otherwise it continues from an earlier one)
    pub show_label: bool,
    /// Offer to finish the occupant here
    pub show_finish: bool,
    /// The occupant finished in this month
    pub show_completed: bool,
}

impl<'a> CellState<'a> {
    pub const EMPTY: Self = CellState {
        occupant: None,
        show_label: false,
        show_finish: false,
        show_completed: false,
    };

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Tie-break between two activities that both claim a cell: the one whose
/// active window started most recently wins, and on an exact tie the one
/// seen first keeps the cell.
pub fn most_recent_start<'a>(incumbent: &'a Activity, challenger: &'a Activity) -> &'a Activity {
    if challenger.start > incumbent.start {
        challenger
    } else {
        incumbent
    }
}

/// Resolve the cell at (`lane`, `month`) as seen at `now`.
///
/// An activity claims the cell when it sits on `lane`, started in or before
/// `month`, and had not finished by the first instant of `month`. Months
/// after the one containing `now` are always empty.
pub fn resolve_cell<'a, Tz: TimeZone>(
    lane: u32,
    month: YearMonth,
    activities: &'a [Activity],
    now: &DateTime<Tz>,
) -> CellState<'a> {
    let current = YearMonth::of(now);
    if month > current {
        return CellState::EMPTY;
    }

    let tz = now.timezone();
    let month_start = month.first_instant();
    let mut show_label = false;
    let mut occupant: Option<&Activity> = None;

    for activity in activities.iter().filter(|a| a.lane == lane) {
        let started = YearMonth::in_zone(&activity.start, &tz);
        if started > month {
            continue;
        }
        let active_in_month = activity
            .end
            .is_none_or(|end| month_start < local_time(&end, &tz));
        if !active_in_month {
            continue;
        }

        if started == month {
            show_label = true;
        }
        occupant = Some(match occupant {
            Some(incumbent) => most_recent_start(incumbent, activity),
            None => activity,
        });
    }

    let Some(occupant) = occupant else {
        return CellState::EMPTY;
    };

    let show_finish = !occupant.is_finished() && month == current;
    let show_completed = occupant
        .end
        .is_some_and(|end| YearMonth::in_zone(&end, &tz) == month);

    CellState {
        occupant: Some(occupant),
        show_label,
        show_finish,
        show_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activity::ActivityId;
    use crate::model::color::ColorSpec;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn activity(label: &str, lane: u32, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Activity {
        Activity {
            id: ActivityId::default(),
            label: label.into(),
            start,
            end,
            color: ColorSpec::new("hsl(90,40%,90%)"),
            lane,
        }
    }

    #[test]
    fn unfinished_activity_in_its_start_month() {
        let items = vec![activity("A", 1, at(2024, 3, 15), None)];
        let cell = resolve_cell(1, ym(2024, 3), &items, &at(2024, 3, 20));
        assert_eq!(cell.occupant.map(|a| a.label.as_str()), Some("A"));
        assert!(cell.show_label);
        assert!(cell.show_finish);
        assert!(!cell.show_completed);
    }

    #[test]
    fn other_lanes_are_empty() {
        let items = vec![activity("A", 1, at(2024, 3, 15), None)];
        assert!(resolve_cell(2, ym(2024, 3), &items, &at(2024, 3, 20)).is_empty());
    }

    #[test]
    fn months_after_now_are_always_empty() {
        let items = vec![activity("A", 1, at(2024, 3, 15), None)];
        let cell = resolve_cell(1, ym(2024, 4), &items, &at(2024, 3, 20));
        assert_eq!(cell, CellState::EMPTY);
    }

    #[test]
    fn months_before_start_are_empty() {
        let items = vec![activity("A", 1, at(2024, 3, 15), None)];
        assert!(resolve_cell(1, ym(2024, 2), &items, &at(2024, 6, 1)).is_empty());
    }

    #[test]
    fn continuing_months_hide_the_label() {
        let items = vec![activity("A", 1, at(2024, 3, 15), None)];
        let now = at(2024, 5, 2);

        let april = resolve_cell(1, ym(2024, 4), &items, &now);
        assert!(april.occupant.is_some());
        assert!(!april.show_label);
        assert!(!april.show_finish);

        let may = resolve_cell(1, ym(2024, 5), &items, &now);
        assert!(!may.show_label);
        assert!(may.show_finish);
    }

    #[test]
    fn finished_activity_occupies_its_finish_month() {
        let items = vec![activity("A", 1, at(2024, 3, 15), Some(at(2024, 4, 10)))];
        let now = at(2024, 4, 10);

        let april = resolve_cell(1, ym(2024, 4), &items, &now);
        assert!(april.occupant.is_some());
        assert!(april.show_completed);
        assert!(!april.show_finish);

        let march = resolve_cell(1, ym(2024, 3), &items, &now);
        assert!(march.show_label);
        assert!(!march.show_completed);
    }

    #[test]
    fn months_after_the_finish_month_are_empty() {
        let items = vec![activity("A", 1, at(2024, 3, 15), Some(at(2024, 4, 10)))];
        assert!(resolve_cell(1, ym(2024, 5), &items, &at(2024, 6, 1)).is_empty());
    }

    #[test]
    fn finish_at_exact_month_start_does_not_claim_that_month() {
        let end = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let items = vec![activity("A", 1, at(2024, 3, 15), Some(end))];
        assert!(resolve_cell(1, ym(2024, 4), &items, &at(2024, 6, 1)).is_empty());
    }

    #[test]
    fn most_recent_start_wins_a_contested_cell() {
        // Not producible through the store; hand-edited data can do it
        let items = vec![
            activity("old", 1, at(2024, 1, 3), None),
            activity("new", 1, at(2024, 2, 9), None),
        ];
        let cell = resolve_cell(1, ym(2024, 2), &items, &at(2024, 2, 20));
        assert_eq!(cell.occupant.map(|a| a.label.as_str()), Some("new"));
        assert!(cell.show_label);

        let january = resolve_cell(1, ym(2024, 1), &items, &at(2024, 2, 20));
        assert_eq!(january.occupant.map(|a| a.label.as_str()), Some("old"));
    }

    #[test]
    fn identical_starts_keep_stored_order() {
        let items = vec![
            activity("first", 1, at(2024, 2, 9), None),
            activity("second", 1, at(2024, 2, 9), None),
        ];
        let cell = resolve_cell(1, ym(2024, 2), &items, &at(2024, 2, 20));
        assert_eq!(cell.occupant.map(|a| a.label.as_str()), Some("first"));
    }

    #[test]
    fn reused_lane_shows_each_occupant_in_its_own_months() {
        let items = vec![
            activity("A", 1, at(2024, 3, 15), Some(at(2024, 4, 10))),
            activity("B", 1, at(2024, 6, 1), None),
        ];
        let now = at(2024, 6, 5);
        let label_of = |m| resolve_cell(1, ym(2024, m), &items, &now).occupant.map(|a| a.label.clone());
        assert_eq!(label_of(4), Some("A".to_string()));
        assert_eq!(label_of(5), None);
        assert_eq!(label_of(6), Some("B".to_string()));
    }
}
