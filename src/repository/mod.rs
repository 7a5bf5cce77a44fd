//! Repository port for timetable persistence.
//!
//! The engine owns no storage. Everything it reads or writes goes
//! through `ScheduleRepository`. `InMemoryScheduleRepository` is the
//! reference implementation used by tests and embedding callers.
//!
//! # Write path
//! Validation followed by insert is a check-then-act sequence. Callers
//! wrap it in [`ScheduleRepository::serialized`] so concurrent writers
//! cannot both pass validation and double-book. Storage backends should
//! additionally reject overlapping rows themselves and report
//! [`RepositoryError::Conflict`].

mod memory;

pub use memory::InMemoryScheduleRepository;

use thiserror::Error;

use crate::models::{ConflictKind, EntryId, ScheduleDraft, ScheduleEntry, TeachingUnit};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Storage backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// Storage refused a write that would double-book.
    #[error("{kind} double-booking with entry {entry_id}")]
    Conflict {
        /// Dimension of the collision.
        kind: ConflictKind,
        /// Existing entry that collides.
        entry_id: EntryId,
    },
    /// A write referenced a teaching unit the store does not know.
    #[error("unknown teaching unit '{0}'")]
    UnknownTeachingUnit(String),
    /// A write was missing a required field.
    #[error("entry is missing required field '{0}'")]
    IncompleteEntry(&'static str),
    /// A write's day of week is outside 1..=7.
    #[error("day of week {0} is outside 1..=7")]
    InvalidDay(u8),
    /// A write's time range is empty or inverted.
    #[error("entry must end after it starts")]
    InvalidTimeRange,
    /// An update targeted an id that does not exist.
    #[error("schedule entry {0} does not exist")]
    MissingEntry(EntryId),
}

/// Storage contract consumed by the timetable engine.
///
/// Day-scoped finders accept an optional `exclude_id` so update
/// validation can ignore the entry being edited.
pub trait ScheduleRepository: Send + Sync {
    /// Looks up a teaching unit by id.
    fn find_teaching_unit(&self, id: &str) -> RepositoryResult<Option<TeachingUnit>>;

    /// Teaching units of a class-section, in curriculum order.
    fn find_teaching_units_by_class(&self, class_id: &str) -> RepositoryResult<Vec<TeachingUnit>>;

    /// Teaching units of a teacher, in curriculum order.
    fn find_teaching_units_by_teacher(
        &self,
        teacher_id: &str,
    ) -> RepositoryResult<Vec<TeachingUnit>>;

    /// Entries on `day_of_week` whose teaching unit is taught by `teacher_id`.
    fn find_by_teacher_and_day(
        &self,
        teacher_id: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Entries on `day_of_week` whose teaching unit belongs to `class_id`.
    fn find_by_class_and_day(
        &self,
        class_id: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Entries on `day_of_week` held in `room`.
    fn find_by_room_and_day(
        &self,
        room: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Loads one entry.
    fn find_by_id(&self, id: EntryId) -> RepositoryResult<Option<ScheduleEntry>>;

    /// Persists a new entry and assigns its id.
    fn insert(&self, draft: &ScheduleDraft) -> RepositoryResult<ScheduleEntry>;

    /// Replaces an existing entry.
    fn update_by_id(&self, id: EntryId, draft: &ScheduleDraft) -> RepositoryResult<ScheduleEntry>;

    /// Removes an entry. Returns `false` if it did not exist.
    fn delete_by_id(&self, id: EntryId) -> RepositoryResult<bool>;

    /// Runs `f` on the repository's serialized write path.
    ///
    /// While `f` runs, no other `serialized` call on the same repository
    /// may proceed. The default runs `f` directly and suits single-writer
    /// deployments; shared stores override it with a transaction or lock.
    /// `f` must not call `serialized` again.
    fn serialized<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Self) -> T,
        Self: Sized,
    {
        f(self)
    }
}
