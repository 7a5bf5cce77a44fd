//! Conflict detection for candidate schedule entries.
//!
//! # Algorithm
//! 1. Resolve the candidate's teacher and class-section via its teaching unit.
//! 2. Fetch same-day entries sharing the teacher, the class-section, and
//!    the room (if any): three independent queries.
//! 3. Drop the excluded entry (the one being updated).
//! 4. Keep entries whose `[start, end)` overlaps the candidate's.
//!
//! Detection is read-only.

use chrono::NaiveTime;
use log::{debug, warn};

use crate::models::{overlaps, ConflictKind, ConflictReport, EntryId, ScheduleDraft, ScheduleEntry};
use crate::repository::{RepositoryResult, ScheduleRepository};

/// Finds teacher, room, and class double-bookings against stored entries.
#[derive(Debug)]
pub struct ConflictDetector<'a, R> {
    repo: &'a R,
}

impl<'a, R: ScheduleRepository> ConflictDetector<'a, R> {
    /// Creates a detector reading from `repo`.
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Detects conflicts for `candidate`, ignoring the entry `exclude_id`.
    ///
    /// A candidate without a well-ordered time range cannot conflict and
    /// yields an empty report. If the teaching unit cannot be resolved,
    /// only the room is checked and `unresolved_unit` is set.
    pub fn detect(
        &self,
        candidate: &ScheduleDraft,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<ConflictReport> {
        let mut report = ConflictReport::new();
        let Some(slot) = candidate.slot() else {
            return Ok(report);
        };
        let day = candidate.day_of_week;

        if let Some(unit_id) = candidate.teaching_unit_id.as_deref() {
            match self.repo.find_teaching_unit(unit_id)? {
                Some(unit) => {
                    let by_teacher =
                        self.repo
                            .find_by_teacher_and_day(&unit.teacher_id, day, exclude_id)?;
                    collect(
                        &mut report,
                        ConflictKind::Teacher,
                        by_teacher,
                        slot.start,
                        slot.end,
                        exclude_id,
                    );

                    let by_class =
                        self.repo
                            .find_by_class_and_day(&unit.class_id, day, exclude_id)?;
                    collect(
                        &mut report,
                        ConflictKind::Class,
                        by_class,
                        slot.start,
                        slot.end,
                        exclude_id,
                    );
                }
                None => {
                    warn!(
                        "teaching unit '{unit_id}' not found; teacher and class conflicts skipped"
                    );
                    report.unresolved_unit = Some(unit_id.to_string());
                }
            }
        }

        if let Some(room) = candidate.room.as_deref() {
            let by_room = self.repo.find_by_room_and_day(room, day, exclude_id)?;
            collect(
                &mut report,
                ConflictKind::Room,
                by_room,
                slot.start,
                slot.end,
                exclude_id,
            );
        }

        debug!(
            "conflicts for day {day} {slot}: teacher={} room={} class={}",
            report.teacher_conflicts.len(),
            report.room_conflicts.len(),
            report.class_conflicts.len()
        );
        Ok(report)
    }

    /// Re-checks stored entries against the rest of the store.
    ///
    /// Returns the id and report of every entry in `entries` that
    /// collides with some other stored entry. Used to audit generated
    /// timetables.
    pub fn audit(
        &self,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<Vec<(EntryId, ConflictReport)>> {
        let mut found = Vec::new();
        for entry in entries {
            let report = self.detect(&ScheduleDraft::from(entry), Some(entry.id))?;
            if !report.is_empty() {
                found.push((entry.id, report));
            }
        }
        Ok(found)
    }
}

fn collect(
    report: &mut ConflictReport,
    kind: ConflictKind,
    existing: Vec<ScheduleEntry>,
    start: NaiveTime,
    end: NaiveTime,
    exclude_id: Option<EntryId>,
) {
    let bucket = report.bucket_mut(kind);
    bucket.extend(
        existing
            .into_iter()
            .filter(|e| Some(e.id) != exclude_id)
            .filter(|e| overlaps(start, end, e.start, e.end)),
    );
}
