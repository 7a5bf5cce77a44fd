//! Timetable domain models.
//!
//! Provides the data types exchanged with the engine: time slots and
//! the slot catalog, teaching units, schedule entries (persisted, draft,
//! and patch form), and conflict reports.
//!
//! # Domain Mappings
//!
//! | u-timetable | School |
//! |-------------|--------|
//! | TeachingUnit | Class × subject × teacher |
//! | ScheduleEntry | Timetable row |
//! | TimeSlot | Period |
//! | SlotCatalog | Bell schedule |

mod catalog;
mod conflict;
mod entry;
mod time_slot;

pub use catalog::SlotCatalog;
pub use conflict::{ConflictKind, ConflictReport};
pub use entry::{EntryId, ScheduleDraft, ScheduleEntry, SchedulePatch, TeachingUnit};
pub(crate) use time_slot::clock;
pub use time_slot::{day_name, is_valid_day, minutes_between, overlaps, TimeSlot, MONDAY, SUNDAY};
