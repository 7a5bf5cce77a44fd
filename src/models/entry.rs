//! Teaching units and schedule entries.
//!
//! A `TeachingUnit` is owned by class management and only read here.
//! A `ScheduleEntry` is the persisted placement of a unit on a weekday
//! and time range. `ScheduleDraft` is the unvalidated candidate shape
//! used for create/update, and `SchedulePatch` is a partial update.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// Identifier assigned to a schedule entry by the repository.
pub type EntryId = u64;

/// A (class-section, subject, teacher) triple that needs a weekly slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingUnit {
    /// Unique unit identifier.
    pub id: String,
    /// Class-section taught.
    pub class_id: String,
    /// Subject taught (display only).
    pub subject_id: String,
    /// Teacher assigned.
    pub teacher_id: String,
}

impl TeachingUnit {
    /// Creates a new teaching unit.
    pub fn new(
        id: impl Into<String>,
        class_id: impl Into<String>,
        teacher_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            subject_id: String::new(),
            teacher_id: teacher_id.into(),
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }
}

/// A persisted placement of a teaching unit in the weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Repository-assigned identifier.
    pub id: EntryId,
    /// Placed teaching unit.
    pub teaching_unit_id: String,
    /// Day of week, Monday = 1 .. Sunday = 7.
    pub day_of_week: u8,
    /// Start time (inclusive).
    pub start: NaiveTime,
    /// End time (exclusive).
    pub end: NaiveTime,
    /// Room, if assigned.
    pub room: Option<String>,
}

impl ScheduleEntry {
    /// The entry's time range as a slot.
    #[inline]
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.start,
            end: self.end,
        }
    }

    /// Whether this entry's time range overlaps `[start, end)`.
    #[inline]
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        super::overlaps(self.start, self.end, start, end)
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        super::minutes_between(self.start, self.end)
    }
}

/// Candidate entry awaiting validation.
///
/// Fields a caller may omit are optional; `day_of_week` is accepted as
/// given and range-checked by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    /// Teaching unit to place.
    pub teaching_unit_id: Option<String>,
    /// Requested day of week.
    pub day_of_week: u8,
    /// Requested start time.
    pub start: Option<NaiveTime>,
    /// Requested end time.
    pub end: Option<NaiveTime>,
    /// Requested room.
    pub room: Option<String>,
}

impl ScheduleDraft {
    /// Creates a draft for a unit on a day, times unset.
    pub fn new(teaching_unit_id: impl Into<String>, day_of_week: u8) -> Self {
        Self {
            teaching_unit_id: Some(teaching_unit_id.into()),
            day_of_week,
            ..Self::default()
        }
    }

    /// Sets the time range.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the time range from a slot.
    pub fn with_slot(self, slot: TimeSlot) -> Self {
        self.with_times(slot.start, slot.end)
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// The time range, if both ends are set and ordered.
    pub fn slot(&self) -> Option<TimeSlot> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => TimeSlot::try_new(start, end),
            _ => None,
        }
    }

    /// Builds the entry this draft describes once an id is assigned.
    ///
    /// Returns `None` if a required field is missing.
    pub fn to_entry(&self, id: EntryId) -> Option<ScheduleEntry> {
        Some(ScheduleEntry {
            id,
            teaching_unit_id: self.teaching_unit_id.clone()?,
            day_of_week: self.day_of_week,
            start: self.start?,
            end: self.end?,
            room: self.room.clone(),
        })
    }
}

impl From<&ScheduleEntry> for ScheduleDraft {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            teaching_unit_id: Some(entry.teaching_unit_id.clone()),
            day_of_week: entry.day_of_week,
            start: Some(entry.start),
            end: Some(entry.end),
            room: entry.room.clone(),
        }
    }
}

/// Partial update of a schedule entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePatch {
    /// New teaching unit.
    pub teaching_unit_id: Option<String>,
    /// New day of week.
    pub day_of_week: Option<u8>,
    /// New start time.
    pub start: Option<NaiveTime>,
    /// New end time.
    pub end: Option<NaiveTime>,
    /// New room; `Some(None)` clears it.
    pub room: Option<Option<String>>,
}

impl SchedulePatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the entry to another day.
    pub fn with_day(mut self, day_of_week: u8) -> Self {
        self.day_of_week = Some(day_of_week);
        self
    }

    /// Changes the time range.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Changes the room.
    pub fn with_room(mut self, room: Option<String>) -> Self {
        self.room = Some(room);
        self
    }

    /// Changes the teaching unit.
    pub fn with_teaching_unit(mut self, teaching_unit_id: impl Into<String>) -> Self {
        self.teaching_unit_id = Some(teaching_unit_id.into());
        self
    }

    /// Merges this patch over an existing entry.
    pub fn apply(&self, entry: &ScheduleEntry) -> ScheduleDraft {
        ScheduleDraft {
            teaching_unit_id: Some(
                self.teaching_unit_id
                    .clone()
                    .unwrap_or_else(|| entry.teaching_unit_id.clone()),
            ),
            day_of_week: self.day_of_week.unwrap_or(entry.day_of_week),
            start: Some(self.start.unwrap_or(entry.start)),
            end: Some(self.end.unwrap_or(entry.end)),
            room: match &self.room {
                Some(room) => room.clone(),
                None => entry.room.clone(),
            },
        }
    }
}
