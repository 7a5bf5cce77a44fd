//! Time slot model and the interval-overlap primitive.
//!
//! # Time Model
//! Times are wall-clock `NaiveTime` values within a single school day.
//! Every range is half-open `[start, end)`: the end instant is excluded,
//! so two lessons touching at a boundary do not collide.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monday, as a day-of-week number.
pub const MONDAY: u8 = 1;
/// Sunday, as a day-of-week number.
pub const SUNDAY: u8 = 7;

/// Whether two half-open ranges `[start1, end1)` and `[start2, end2)` intersect.
///
/// Ranges that merely touch (`end1 == start2`) do not overlap.
/// Zero-length and inverted ranges are rejected by validation before they
/// reach this function.
#[inline]
pub fn overlaps(start1: NaiveTime, end1: NaiveTime, start2: NaiveTime, end2: NaiveTime) -> bool {
    debug_assert!(start1 < end1, "malformed range {start1}-{end1}");
    debug_assert!(start2 < end2, "malformed range {start2}-{end2}");
    !(end1 <= start2 || start1 >= end2)
}

/// Whole minutes between two times of day (negative if `end` precedes `start`).
#[inline]
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

/// Short English name of a day-of-week number (`1` = Monday).
pub fn day_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "?",
    }
}

/// Whether a day-of-week number is within Monday..=Sunday.
#[inline]
pub fn is_valid_day(day_of_week: u8) -> bool {
    (MONDAY..=SUNDAY).contains(&day_of_week)
}

/// An instructional time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates a new time slot.
    ///
    /// # Panics
    /// Panics if `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        assert!(start < end, "time slot must end after it starts: {start}-{end}");
        Self { start, end }
    }

    /// Creates a time slot, or `None` if `start >= end`.
    pub fn try_new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Creates a slot from literal `(hour, minute)` pairs.
    ///
    /// # Panics
    /// Panics on an invalid clock time or if the slot is empty.
    pub(crate) fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self::new(clock(start.0, start.1), clock(end.0, end.1))
    }

    /// Whether `start < end`. Deserialized slots are not checked on construction.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Length of the slot in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    /// Whether a time of day falls within this slot.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two slots overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Builds a `NaiveTime` from literal hour and minute values.
///
/// Input from callers goes through `NaiveTime::from_hms_opt` instead.
///
/// # Panics
/// Panics on an out-of-range hour or minute.
pub(crate) fn clock(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(t) => t,
        None => panic!("invalid clock time {hour:02}:{minute:02}"),
    }
}
