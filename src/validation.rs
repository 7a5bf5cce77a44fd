//! Validation of candidate schedule entries.
//!
//! Checks field shape and conflicts in one pass and reports every
//! problem found, rather than stopping at the first. Detects:
//! - Missing teaching unit
//! - Day of week outside Monday..=Sunday
//! - Missing start or end time
//! - End not after start
//! - Unusual lesson duration (warning only)
//! - Teacher, room, and class double-bookings
//!
//! A later check is skipped only when it cannot be evaluated without an
//! earlier one (no conflict search without a unit, a valid day, and an
//! ordered time range).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ValidationRules;
use crate::conflict::ConflictDetector;
use crate::models::{
    is_valid_day, minutes_between, ConflictKind, ConflictReport, EntryId, ScheduleDraft,
};
use crate::repository::{RepositoryResult, ScheduleRepository};

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// No teaching unit given.
    MissingTeachingUnit,
    /// Day of week outside 1..=7.
    DayOutOfRange,
    /// No start time given.
    MissingStart,
    /// No end time given.
    MissingEnd,
    /// End time at or before start time.
    EndNotAfterStart,
    /// Duration outside the configured bounds (warning).
    DurationOutOfRange,
    /// Teaching unit unknown to the repository (warning).
    UnresolvedTeachingUnit,
    /// Overlap with existing entries along one dimension.
    Conflict {
        /// Dimension of the collision.
        kind: ConflictKind,
        /// Colliding entries.
        entry_ids: Vec<EntryId>,
    },
}

impl ValidationIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn conflict(kind: ConflictKind, entry_ids: Vec<EntryId>) -> Self {
        let list = entry_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let noun = if entry_ids.len() == 1 { "entry" } else { "entries" };
        Self::new(
            IssueKind::Conflict { kind, entry_ids },
            format!("{kind} conflict with {noun} {list}"),
        )
    }
}

/// Outcome of validating one candidate.
///
/// `valid` is true iff `errors` is empty; warnings never block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the candidate may be persisted.
    pub valid: bool,
    /// Blocking problems.
    pub errors: Vec<ValidationIssue>,
    /// Non-blocking remarks.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Error messages in detection order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Warning messages in detection order.
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|w| w.message.as_str()).collect()
    }

    /// Whether any error is a conflict.
    pub fn has_conflicts(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e.kind, IssueKind::Conflict { .. }))
    }

    /// Ids of entries colliding along `kind`.
    pub fn conflict_ids(&self, kind: ConflictKind) -> Vec<EntryId> {
        self.errors
            .iter()
            .filter_map(|e| match &e.kind {
                IssueKind::Conflict { kind: k, entry_ids } if *k == kind => Some(entry_ids.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.write_str("valid")
        } else {
            f.write_str(&self.error_messages().join("; "))
        }
    }
}

/// Validates candidate entries against field rules and stored entries.
#[derive(Debug)]
pub struct ScheduleValidator<'a, R> {
    detector: ConflictDetector<'a, R>,
    rules: ValidationRules,
}

impl<'a, R: ScheduleRepository> ScheduleValidator<'a, R> {
    /// Creates a validator with default duration bounds.
    pub fn new(repo: &'a R) -> Self {
        Self::with_rules(repo, ValidationRules::default())
    }

    /// Creates a validator with custom duration bounds.
    pub fn with_rules(repo: &'a R, rules: ValidationRules) -> Self {
        Self {
            detector: ConflictDetector::new(repo),
            rules,
        }
    }

    /// Validates `candidate`, ignoring `exclude_id` in conflict checks.
    ///
    /// # Checks
    /// 1. Teaching unit present
    /// 2. Day of week in 1..=7
    /// 3. Start and end present
    /// 4. Start before end
    /// 5. Duration within bounds (warning)
    /// 6. No teacher, room, or class conflicts
    ///
    /// # Errors
    /// Only repository failures are returned as `Err`; every business
    /// problem is reported inside the `ValidationResult`.
    pub fn validate(
        &self,
        candidate: &ScheduleDraft,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let has_unit = candidate
            .teaching_unit_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if !has_unit {
            errors.push(ValidationIssue::new(
                IssueKind::MissingTeachingUnit,
                "teaching unit required",
            ));
        }

        let day = candidate.day_of_week;
        let day_ok = is_valid_day(day);
        if !day_ok {
            errors.push(ValidationIssue::new(
                IssueKind::DayOutOfRange,
                format!("day of week {day} is outside the range 1..=7 (Monday=1, Sunday=7)"),
            ));
        }

        if candidate.start.is_none() {
            errors.push(ValidationIssue::new(IssueKind::MissingStart, "start time required"));
        }
        if candidate.end.is_none() {
            errors.push(ValidationIssue::new(IssueKind::MissingEnd, "end time required"));
        }

        let mut times_ok = false;
        if let (Some(start), Some(end)) = (candidate.start, candidate.end) {
            if start >= end {
                errors.push(ValidationIssue::new(
                    IssueKind::EndNotAfterStart,
                    format!(
                        "end must be after start (start {}, end {})",
                        start.format("%H:%M"),
                        end.format("%H:%M")
                    ),
                ));
            } else {
                times_ok = true;
                let minutes = minutes_between(start, end);
                let (min, max) = (
                    self.rules.min_duration_minutes,
                    self.rules.max_duration_minutes,
                );
                if minutes < min || minutes > max {
                    warnings.push(ValidationIssue::new(
                        IssueKind::DurationOutOfRange,
                        format!(
                            "duration of {minutes} minutes is outside the expected {min}-{max} minute range"
                        ),
                    ));
                }
            }
        }

        if has_unit && day_ok && times_ok {
            let report = self.detector.detect(candidate, exclude_id)?;
            push_conflicts(&report, &mut errors, &mut warnings);
        }

        Ok(ValidationResult::from_issues(errors, warnings))
    }
}

fn push_conflicts(
    report: &ConflictReport,
    errors: &mut Vec<ValidationIssue>,
    warnings: &mut Vec<ValidationIssue>,
) {
    if let Some(unit_id) = &report.unresolved_unit {
        warnings.push(ValidationIssue::new(
            IssueKind::UnresolvedTeachingUnit,
            format!(
                "teaching unit '{unit_id}' could not be resolved; teacher and class conflicts were not checked"
            ),
        ));
    }
    for kind in ConflictKind::ALL {
        let ids = report.ids(kind);
        if !ids.is_empty() {
            errors.push(ValidationIssue::conflict(kind, ids));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{clock, TeachingUnit};
    use crate::repository::InMemoryScheduleRepository;

    fn repo() -> InMemoryScheduleRepository {
        InMemoryScheduleRepository::new().with_units([
            TeachingUnit::new("U1", "7A", "T").with_subject("math"),
            TeachingUnit::new("U2", "7B", "T").with_subject("math"),
            TeachingUnit::new("U3", "7C", "S").with_subject("art"),
        ])
    }

    fn draft(unit: &str, day: u8, start: (u32, u32), end: (u32, u32)) -> ScheduleDraft {
        ScheduleDraft::new(unit, day).with_times(clock(start.0, start.1), clock(end.0, end.1))
    }

    #[test]
    fn test_valid_candidate() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 1, (8, 15), (9, 0)), None)
            .unwrap();
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_overlapping_teacher_is_invalid() {
        // Teacher T already teaches Mon 08:15-09:00; new entry Mon 08:30-09:15.
        let r = repo();
        let existing = r.insert(&draft("U1", 1, (8, 15), (9, 0))).unwrap();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U2", 1, (8, 30), (9, 15)), None)
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.conflict_ids(ConflictKind::Teacher), vec![existing.id]);
        assert_eq!(result.errors[0].message, "teacher conflict with entry 1");
    }

    #[test]
    fn test_touching_teacher_is_valid() {
        let r = repo();
        r.insert(&draft("U1", 1, (8, 15), (9, 0))).unwrap();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U2", 1, (9, 0), (9, 45)), None)
            .unwrap();
        assert!(result.valid);
    }

    #[test]
    fn test_day_out_of_range() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 8, (8, 15), (9, 0)), None)
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.errors[0].kind, IssueKind::DayOutOfRange);
        assert!(result.errors[0].message.contains("1..=7"));
    }

    #[test]
    fn test_short_duration_is_warning() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 2, (10, 0), (10, 5)), None)
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::DurationOutOfRange);
        assert!(result.warnings[0].message.contains("5 minutes"));
    }

    #[test]
    fn test_long_duration_is_warning() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 2, (8, 0), (12, 0)), None)
            .unwrap();
        assert!(result.valid);
        assert!(result.warnings[0].message.contains("240 minutes"));
    }

    #[test]
    fn test_custom_duration_rules() {
        let r = repo();
        let rules = ValidationRules {
            min_duration_minutes: 50,
            max_duration_minutes: 50,
        };
        let result = ScheduleValidator::with_rules(&r, rules)
            .validate(&draft("U1", 2, (8, 0), (8, 45)), None)
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_end_before_start() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 1, (10, 0), (9, 0)), None)
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, IssueKind::EndNotAfterStart);
        assert!(result.errors[0].message.starts_with("end must be after start"));
        // No duration warning for an inverted range.
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let r = repo();
        let candidate = ScheduleDraft {
            teaching_unit_id: None,
            day_of_week: 0,
            start: None,
            end: None,
            room: None,
        };
        let result = ScheduleValidator::new(&r).validate(&candidate, None).unwrap();
        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingTeachingUnit,
                IssueKind::DayOutOfRange,
                IssueKind::MissingStart,
                IssueKind::MissingEnd,
            ]
        );
        assert_eq!(result.errors[0].message, "teaching unit required");
    }

    #[test]
    fn test_blank_unit_is_missing() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("  ", 1, (8, 15), (9, 0)), None)
            .unwrap();
        assert_eq!(result.errors[0].kind, IssueKind::MissingTeachingUnit);
    }

    #[test]
    fn test_missing_unit_skips_conflict_check() {
        let r = repo();
        r.insert(&draft("U1", 1, (8, 15), (9, 0)).with_room("Lab")).unwrap();
        let mut candidate = draft("U1", 1, (8, 15), (9, 0)).with_room("Lab");
        candidate.teaching_unit_id = None;
        let result = ScheduleValidator::new(&r).validate(&candidate, None).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_one_error_per_conflict_bucket() {
        let r = repo();
        r.insert(&draft("U1", 1, (8, 15), (9, 0)).with_room("Lab")).unwrap();
        r.insert(&draft("U3", 1, (8, 30), (9, 15)).with_room("Lab2")).unwrap();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 1, (8, 15), (9, 0)).with_room("Lab"), None)
            .unwrap();
        assert!(result.has_conflicts());
        // teacher, room, class: one error each.
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.conflict_ids(ConflictKind::Room), vec![1]);
    }

    #[test]
    fn test_multiple_ids_in_one_bucket() {
        let r = repo();
        r.insert(&draft("U1", 1, (8, 0), (8, 45))).unwrap();
        r.insert(&draft("U1", 1, (8, 45), (9, 30))).unwrap();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U2", 1, (8, 30), (9, 0)), None)
            .unwrap();
        assert_eq!(result.conflict_ids(ConflictKind::Teacher), vec![1, 2]);
        assert_eq!(result.errors[0].message, "teacher conflict with entries 1, 2");
    }

    #[test]
    fn test_self_exclusion_on_update() {
        let r = repo();
        let e = r.insert(&draft("U1", 1, (8, 15), (9, 0)).with_room("Lab")).unwrap();
        let v = ScheduleValidator::new(&r);
        let unchanged = ScheduleDraft::from(&e);
        assert!(v.validate(&unchanged, Some(e.id)).unwrap().valid);
        assert!(!v.validate(&unchanged, None).unwrap().valid);
    }

    #[test]
    fn test_unresolved_unit_is_warning() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("ghost", 1, (8, 15), (9, 0)), None)
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings[0].kind, IssueKind::UnresolvedTeachingUnit);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let r = repo();
        r.insert(&draft("U1", 1, (8, 15), (9, 0))).unwrap();
        let v = ScheduleValidator::new(&r);
        let candidate = draft("U2", 1, (8, 30), (8, 35)).with_room("R1");
        let first = v.validate(&candidate, None).unwrap();
        let second = v.validate(&candidate, None).unwrap();
        assert_eq!(first, second);
        assert!(!first.valid);
        assert_eq!(first.warnings.len(), 1);
    }

    #[test]
    fn test_result_display_and_serde() {
        let r = repo();
        let result = ScheduleValidator::new(&r)
            .validate(&draft("U1", 9, (10, 0), (9, 0)), None)
            .unwrap();
        let text = result.to_string();
        assert!(text.contains("day of week 9"));
        assert!(text.contains("; end must be after start"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    }
}
