//! In-memory schedule repository.
//!
//! Holds teaching units and entries behind an `RwLock`. Writes are
//! checked against existing entries so the store itself refuses
//! teacher, class, or room double-bookings, the same guarantee a
//! uniqueness constraint gives a relational backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use super::{RepositoryError, RepositoryResult, ScheduleRepository};
use crate::models::{
    is_valid_day, ConflictKind, EntryId, ScheduleDraft, ScheduleEntry, TeachingUnit,
};

#[derive(Debug, Default)]
struct State {
    units: Vec<TeachingUnit>,
    entries: BTreeMap<EntryId, ScheduleEntry>,
    next_id: EntryId,
}

impl State {
    fn unit(&self, id: &str) -> Option<&TeachingUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Entries on `day` other than `exclude_id` whose unit satisfies `pred`.
    fn by_unit_and_day(
        &self,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
        pred: impl Fn(&TeachingUnit) -> bool,
    ) -> Vec<ScheduleEntry> {
        self.entries
            .values()
            .filter(|e| e.day_of_week == day_of_week && Some(e.id) != exclude_id)
            .filter(|e| self.unit(&e.teaching_unit_id).is_some_and(&pred))
            .cloned()
            .collect()
    }

    fn check_double_booking(
        &self,
        candidate: &ScheduleEntry,
        unit: &TeachingUnit,
    ) -> RepositoryResult<()> {
        let clashing = self.entries.values().filter(|other| {
            other.id != candidate.id
                && other.day_of_week == candidate.day_of_week
                && other.overlaps(candidate.start, candidate.end)
        });
        for other in clashing {
            if let Some(other_unit) = self.unit(&other.teaching_unit_id) {
                if other_unit.teacher_id == unit.teacher_id {
                    return Err(conflict(ConflictKind::Teacher, other.id));
                }
                if other_unit.class_id == unit.class_id {
                    return Err(conflict(ConflictKind::Class, other.id));
                }
            }
            if candidate.room.is_some() && candidate.room == other.room {
                return Err(conflict(ConflictKind::Room, other.id));
            }
        }
        Ok(())
    }
}

fn conflict(kind: ConflictKind, entry_id: EntryId) -> RepositoryError {
    RepositoryError::Conflict { kind, entry_id }
}

/// Builds a complete entry from a draft, naming the first missing field.
fn complete(draft: &ScheduleDraft, id: EntryId) -> RepositoryResult<ScheduleEntry> {
    let teaching_unit_id = draft
        .teaching_unit_id
        .clone()
        .ok_or(RepositoryError::IncompleteEntry("teaching_unit_id"))?;
    let start = draft.start.ok_or(RepositoryError::IncompleteEntry("start"))?;
    let end = draft.end.ok_or(RepositoryError::IncompleteEntry("end"))?;
    if !is_valid_day(draft.day_of_week) {
        return Err(RepositoryError::InvalidDay(draft.day_of_week));
    }
    if start >= end {
        return Err(RepositoryError::InvalidTimeRange);
    }
    Ok(ScheduleEntry {
        id,
        teaching_unit_id,
        day_of_week: draft.day_of_week,
        start,
        end,
        room: draft.room.clone(),
    })
}

/// Thread-safe in-memory `ScheduleRepository`.
///
/// # Example
/// ```
/// use chrono::NaiveTime;
/// use u_timetable::models::{ScheduleDraft, TeachingUnit};
/// use u_timetable::repository::{InMemoryScheduleRepository, ScheduleRepository};
///
/// let clock = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let repo = InMemoryScheduleRepository::new()
///     .with_unit(TeachingUnit::new("U1", "7A", "T1"));
/// let entry = repo
///     .insert(&ScheduleDraft::new("U1", 1).with_times(clock(8, 15), clock(9, 0)))
///     .unwrap();
/// assert_eq!(entry.id, 1);
/// assert_eq!(repo.find_by_teacher_and_day("T1", 1, None).unwrap().len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryScheduleRepository {
    state: RwLock<State>,
    write_path: Mutex<()>,
    overlap_backstop: bool,
}

impl InMemoryScheduleRepository {
    /// Creates an empty repository with the overlap backstop enabled.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                ..State::default()
            }),
            write_path: Mutex::new(()),
            overlap_backstop: true,
        }
    }

    /// Enables or disables rejection of overlapping writes.
    ///
    /// With the backstop off, only `serialized` callers are protected
    /// against double-booking.
    pub fn with_overlap_backstop(mut self, enabled: bool) -> Self {
        self.overlap_backstop = enabled;
        self
    }

    /// Adds a teaching unit.
    pub fn with_unit(mut self, unit: TeachingUnit) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .units
            .push(unit);
        self
    }

    /// Adds several teaching units, preserving order.
    pub fn with_units(self, units: impl IntoIterator<Item = TeachingUnit>) -> Self {
        units.into_iter().fold(self, Self::with_unit)
    }

    /// Registers a teaching unit after construction.
    pub fn add_teaching_unit(&self, unit: TeachingUnit) -> RepositoryResult<()> {
        self.write()?.units.push(unit);
        Ok(())
    }

    /// All stored entries, ordered by id.
    pub fn entries(&self) -> RepositoryResult<Vec<ScheduleEntry>> {
        Ok(self.read()?.entries.values().cloned().collect())
    }

    /// Number of stored entries.
    pub fn len(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.entries.len())
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Backend("state lock poisoned".into()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Backend("state lock poisoned".into()))
    }

    fn checked(&self, state: &State, entry: &ScheduleEntry) -> RepositoryResult<()> {
        let unit = state
            .unit(&entry.teaching_unit_id)
            .ok_or_else(|| RepositoryError::UnknownTeachingUnit(entry.teaching_unit_id.clone()))?;
        if self.overlap_backstop {
            state.check_double_booking(entry, unit)?;
        }
        Ok(())
    }
}

impl Default for InMemoryScheduleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn find_teaching_unit(&self, id: &str) -> RepositoryResult<Option<TeachingUnit>> {
        Ok(self.read()?.unit(id).cloned())
    }

    fn find_teaching_units_by_class(&self, class_id: &str) -> RepositoryResult<Vec<TeachingUnit>> {
        Ok(self
            .read()?
            .units
            .iter()
            .filter(|u| u.class_id == class_id)
            .cloned()
            .collect())
    }

    fn find_teaching_units_by_teacher(
        &self,
        teacher_id: &str,
    ) -> RepositoryResult<Vec<TeachingUnit>> {
        Ok(self
            .read()?
            .units
            .iter()
            .filter(|u| u.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    fn find_by_teacher_and_day(
        &self,
        teacher_id: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        Ok(self
            .read()?
            .by_unit_and_day(day_of_week, exclude_id, |u| u.teacher_id == teacher_id))
    }

    fn find_by_class_and_day(
        &self,
        class_id: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        Ok(self
            .read()?
            .by_unit_and_day(day_of_week, exclude_id, |u| u.class_id == class_id))
    }

    fn find_by_room_and_day(
        &self,
        room: &str,
        day_of_week: u8,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        Ok(self
            .read()?
            .entries
            .values()
            .filter(|e| e.day_of_week == day_of_week && Some(e.id) != exclude_id)
            .filter(|e| e.room.as_deref() == Some(room))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: EntryId) -> RepositoryResult<Option<ScheduleEntry>> {
        Ok(self.read()?.entries.get(&id).cloned())
    }

    fn insert(&self, draft: &ScheduleDraft) -> RepositoryResult<ScheduleEntry> {
        let mut state = self.write()?;
        let entry = complete(draft, state.next_id)?;
        self.checked(&state, &entry)?;
        state.next_id += 1;
        state.entries.insert(entry.id, entry.clone());
        debug!("inserted schedule entry {}", entry.id);
        Ok(entry)
    }

    fn update_by_id(&self, id: EntryId, draft: &ScheduleDraft) -> RepositoryResult<ScheduleEntry> {
        let mut state = self.write()?;
        if !state.entries.contains_key(&id) {
            return Err(RepositoryError::MissingEntry(id));
        }
        let entry = complete(draft, id)?;
        self.checked(&state, &entry)?;
        state.entries.insert(id, entry.clone());
        debug!("updated schedule entry {id}");
        Ok(entry)
    }

    fn delete_by_id(&self, id: EntryId) -> RepositoryResult<bool> {
        let removed = self.write()?.entries.remove(&id).is_some();
        debug!("delete schedule entry {id}: removed={removed}");
        Ok(removed)
    }

    fn serialized<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Self) -> T,
        Self: Sized,
    {
        let _guard = self
            .write_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(self)
    }
}
