use chrono::{DateTime, SubsecRound, TimeZone, Utc};

use crate::model::activity::{Activity, ActivityId, MAX_LANES, ValidationError, validate_label};
use crate::model::color::ColorSpec;
use crate::model::month::YearMonth;

/// Error when no lane can host a new activity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("there are no slots available (all {max} lanes are taken)")]
    NoSlotsAvailable { max: u32 },
}

/// Error type for store mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("activity not found: {0}")]
    NotFound(ActivityId),
    #[error("activity {0} is already finished")]
    AlreadyFinished(ActivityId),
}

/// How a lane was picked for a new activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneChoice {
    /// A lane freed by an activity that finished in an earlier month
    Reused(u32),
    /// One past the highest lane in use
    Grown(u32),
}

impl LaneChoice {
    pub fn lane(self) -> u32 {
        match self {
            LaneChoice::Reused(lane) | LaneChoice::Grown(lane) => lane,
        }
    }
}

/// The ordered activity collection.
///
/// Order is significant: new activities are appended, and finishing an
/// activity moves it to the end. The store is the only place lanes are
/// assigned.
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    next_id: u64,
    version: u64,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a loaded sequence as-is, handing out fresh session ids in order
    pub fn from_activities(activities: Vec<Activity>) -> Self {
        let mut store = ActivityStore::new();
        for mut activity in activities {
            activity.id = store.allocate_id();
            store.activities.push(activity);
        }
        store
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Bumped by every successful mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    fn allocate_id(&mut self) -> ActivityId {
        self.next_id += 1;
        ActivityId(self.next_id)
    }

    // -----------------------------------------------------------------------
    // Lane allocation
    // -----------------------------------------------------------------------

    /// Pick the lane a new activity started at `now` would get.
    ///
    /// Freed lanes are scanned in stored order and the first one qualifies
    /// when nothing unfinished sits on it and everything on it finished
    /// before the current calendar month. Otherwise the lane after the
    /// highest one in use is taken. Out-of-range lanes from loaded data are
    /// never reused.
    pub fn available_lane<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<LaneChoice, AllocationError> {
        let tz = now.timezone();
        let this_month = YearMonth::of(now);
        let ended_before_this_month = |a: &Activity| {
            a.end
                .is_some_and(|end| YearMonth::in_zone(&end, &tz) < this_month)
        };

        let max_lane_in_use = self.activities.iter().map(|a| a.lane).max().unwrap_or(0);

        let reused = self
            .activities
            .iter()
            .filter(|a| ended_before_this_month(*a))
            .map(|a| a.lane)
            .filter(|lane| (1..=MAX_LANES).contains(lane))
            .find(|&lane| {
                self.activities
                    .iter()
                    .filter(|a| a.lane == lane)
                    .all(|a| ended_before_this_month(a))
            });

        let no_slots = AllocationError::NoSlotsAvailable { max: MAX_LANES };
        let choice = match reused {
            Some(lane) => LaneChoice::Reused(lane),
            None => LaneChoice::Grown(max_lane_in_use.checked_add(1).ok_or_else(|| no_slots.clone())?),
        };

        if choice.lane() > MAX_LANES {
            return Err(no_slots);
        }
        Ok(choice)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Start a new activity at `now`. Nothing is changed on error.
    pub fn add_activity<Tz: TimeZone>(
        &mut self,
        label: &str,
        color: ColorSpec,
        now: &DateTime<Tz>,
    ) -> Result<&Activity, StoreError> {
        let label = validate_label(label)?.to_string();
        let choice = self.available_lane(now)?;
        tracing::debug!(?choice, "lane chosen");
        let lane = choice.lane();

        let activity = Activity {
            id: self.allocate_id(),
            label,
            start: to_seconds(now),
            end: None,
            color,
            lane,
        };
        self.activities.push(activity);
        self.version += 1;

        let last = self.activities.len() - 1;
        Ok(&self.activities[last])
    }

    /// Mark an activity finished at `now` and move it to the end of the
    /// sequence. Its lane does not change.
    pub fn finish_activity<Tz: TimeZone>(
        &mut self,
        id: ActivityId,
        now: &DateTime<Tz>,
    ) -> Result<&Activity, StoreError> {
        let idx = self
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if self.activities[idx].is_finished() {
            return Err(StoreError::AlreadyFinished(id));
        }

        let mut activity = self.activities.remove(idx);
        // end >= start even if the clock stepped backwards
        activity.end = Some(to_seconds(now).max(activity.start));
        self.activities.push(activity);
        self.version += 1;

        let last = self.activities.len() - 1;
        Ok(&self.activities[last])
    }
}

/// `now` in UTC, truncated to whole seconds
fn to_seconds<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    now.with_timezone(&Utc).trunc_subsecs(0)
}
