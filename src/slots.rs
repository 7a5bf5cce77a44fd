//! Free-slot search over the slot catalog.
//!
//! A catalog slot is available on a day iff it overlaps no entry of the
//! given class and no entry of the given teacher on that day. Results
//! keep catalog order so generation and fixtures are reproducible.

use log::debug;

use crate::models::{ScheduleEntry, SlotCatalog, TimeSlot};
use crate::repository::{RepositoryResult, ScheduleRepository};

/// Computes the catalog slots not yet occupied.
#[derive(Debug)]
pub struct SlotFinder<'a, R> {
    repo: &'a R,
    catalog: &'a SlotCatalog,
}

impl<'a, R: ScheduleRepository> SlotFinder<'a, R> {
    /// Creates a finder over `catalog`, reading entries from `repo`.
    pub fn new(repo: &'a R, catalog: &'a SlotCatalog) -> Self {
        Self { repo, catalog }
    }

    /// Catalog slots on `day_of_week` free for the class and the teacher.
    ///
    /// Omitting both ids returns the full catalog.
    pub fn find_available(
        &self,
        day_of_week: u8,
        class_id: Option<&str>,
        teacher_id: Option<&str>,
    ) -> RepositoryResult<Vec<TimeSlot>> {
        let occupied = self.occupied(day_of_week, class_id, teacher_id)?;
        let available: Vec<TimeSlot> = self
            .catalog
            .iter()
            .filter(|slot| !occupied.iter().any(|e| e.overlaps(slot.start, slot.end)))
            .copied()
            .collect();
        debug!(
            "day {day_of_week}: {}/{} slots free (class={class_id:?}, teacher={teacher_id:?})",
            available.len(),
            self.catalog.len()
        );
        Ok(available)
    }

    /// Whether one specific slot is free for the class and the teacher.
    pub fn is_available(
        &self,
        day_of_week: u8,
        slot: &TimeSlot,
        class_id: Option<&str>,
        teacher_id: Option<&str>,
    ) -> RepositoryResult<bool> {
        let occupied = self.occupied(day_of_week, class_id, teacher_id)?;
        Ok(!occupied.iter().any(|e| e.overlaps(slot.start, slot.end)))
    }

    fn occupied(
        &self,
        day_of_week: u8,
        class_id: Option<&str>,
        teacher_id: Option<&str>,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        let mut occupied = Vec::new();
        if let Some(class_id) = class_id {
            occupied.extend(self.repo.find_by_class_and_day(class_id, day_of_week, None)?);
        }
        if let Some(teacher_id) = teacher_id {
            occupied.extend(self.repo.find_by_teacher_and_day(teacher_id, day_of_week, None)?);
        }
        Ok(occupied)
    }
}
