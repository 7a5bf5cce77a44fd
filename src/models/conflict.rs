//! Conflict report model.
//!
//! A conflict is an existing entry whose time range overlaps a candidate
//! while sharing its teacher, its room, or its class-section. The three
//! dimensions are checked independently, so one entry may appear in
//! more than one bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntryId, ScheduleEntry};

/// Dimension along which two entries collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Same teacher, overlapping time.
    Teacher,
    /// Same room, overlapping time.
    Room,
    /// Same class-section, overlapping time.
    Class,
}

impl ConflictKind {
    /// All conflict dimensions, in report order.
    pub const ALL: [ConflictKind; 3] = [
        ConflictKind::Teacher,
        ConflictKind::Room,
        ConflictKind::Class,
    ];
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictKind::Teacher => "teacher",
            ConflictKind::Room => "room",
            ConflictKind::Class => "class",
        };
        f.write_str(s)
    }
}

/// Conflicts found for one candidate entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Entries sharing the candidate's teacher.
    pub teacher_conflicts: Vec<ScheduleEntry>,
    /// Entries sharing the candidate's room.
    pub room_conflicts: Vec<ScheduleEntry>,
    /// Entries sharing the candidate's class-section.
    pub class_conflicts: Vec<ScheduleEntry>,
    /// Teaching unit the candidate named but the repository could not resolve.
    ///
    /// When set, teacher and class buckets were not checked.
    pub unresolved_unit: Option<String>,
}

impl ConflictReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no conflicts were found.
    pub fn is_empty(&self) -> bool {
        self.teacher_conflicts.is_empty()
            && self.room_conflicts.is_empty()
            && self.class_conflicts.is_empty()
    }

    /// Total conflicting entries across buckets.
    pub fn total(&self) -> usize {
        self.teacher_conflicts.len() + self.room_conflicts.len() + self.class_conflicts.len()
    }

    /// Conflicts for one dimension.
    pub fn conflicts(&self, kind: ConflictKind) -> &[ScheduleEntry] {
        match kind {
            ConflictKind::Teacher => &self.teacher_conflicts,
            ConflictKind::Room => &self.room_conflicts,
            ConflictKind::Class => &self.class_conflicts,
        }
    }

    /// Ids of conflicting entries for one dimension.
    pub fn ids(&self, kind: ConflictKind) -> Vec<EntryId> {
        self.conflicts(kind).iter().map(|e| e.id).collect()
    }

    pub(crate) fn bucket_mut(&mut self, kind: ConflictKind) -> &mut Vec<ScheduleEntry> {
        match kind {
            ConflictKind::Teacher => &mut self.teacher_conflicts,
            ConflictKind::Room => &mut self.room_conflicts,
            ConflictKind::Class => &mut self.class_conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock;

    fn entry(id: EntryId) -> ScheduleEntry {
        ScheduleEntry {
            id,
            teaching_unit_id: "U1".into(),
            day_of_week: 1,
            start: clock(8, 0),
            end: clock(8, 45),
            room: None,
        }
    }

    #[test]
    fn test_empty_report() {
        let r = ConflictReport::new();
        assert!(r.is_empty());
        assert_eq!(r.total(), 0);
    }

    #[test]
    fn test_report_buckets() {
        let mut r = ConflictReport::new();
        r.bucket_mut(ConflictKind::Teacher).push(entry(1));
        r.bucket_mut(ConflictKind::Class).push(entry(1));
        r.bucket_mut(ConflictKind::Class).push(entry(2));

        assert!(!r.is_empty());
        assert_eq!(r.total(), 3);
        assert_eq!(r.ids(ConflictKind::Teacher), vec![1]);
        assert_eq!(r.ids(ConflictKind::Class), vec![1, 2]);
        assert!(r.conflicts(ConflictKind::Room).is_empty());
    }

    #[test]
    fn test_unresolved_unit_is_not_a_conflict() {
        let r = ConflictReport {
            unresolved_unit: Some("missing".into()),
            ..ConflictReport::default()
        };
        assert!(r.is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ConflictKind::Teacher.to_string(), "teacher");
        assert_eq!(ConflictKind::ALL.len(), 3);
    }
}
