//! Create/update/delete façade for schedule entries.
//!
//! Every mutation except delete is validated first. Validation and the
//! write run together on the repository's serialized write path, so two
//! concurrent writers cannot both pass validation for overlapping slots.

use log::info;
use thiserror::Error;

use crate::config::ValidationRules;
use crate::models::{EntryId, ScheduleDraft, ScheduleEntry, SchedulePatch};
use crate::repository::{RepositoryError, RepositoryResult, ScheduleRepository};
use crate::validation::{ScheduleValidator, ValidationIssue, ValidationResult};

/// Gateway failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The candidate failed validation; the result lists every problem.
    #[error("validation failed: {0}")]
    Validation(ValidationResult),
    /// No entry with this id exists.
    #[error("schedule entry {0} not found")]
    NotFound(EntryId),
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A persisted entry together with the validation warnings it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    /// Stored entry.
    pub entry: ScheduleEntry,
    /// Non-blocking validation remarks.
    pub warnings: Vec<ValidationIssue>,
}

/// Validating write access to schedule entries.
///
/// # Example
/// ```
/// use u_timetable::gateway::{GatewayError, ScheduleGateway};
/// use chrono::NaiveTime;
/// use u_timetable::models::{ScheduleDraft, TeachingUnit};
/// use u_timetable::repository::InMemoryScheduleRepository;
///
/// let clock = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let repo = InMemoryScheduleRepository::new()
///     .with_unit(TeachingUnit::new("U1", "7A", "T1"))
///     .with_unit(TeachingUnit::new("U2", "7B", "T1"));
/// let gateway = ScheduleGateway::new(&repo);
///
/// let monday = ScheduleDraft::new("U1", 1).with_times(clock(8, 15), clock(9, 0));
/// assert!(gateway.create(&monday).is_ok());
///
/// let clash = ScheduleDraft::new("U2", 1).with_times(clock(8, 30), clock(9, 15));
/// assert!(matches!(gateway.create(&clash), Err(GatewayError::Validation(_))));
/// ```
#[derive(Debug)]
pub struct ScheduleGateway<'a, R> {
    repo: &'a R,
    rules: ValidationRules,
}

impl<'a, R: ScheduleRepository> ScheduleGateway<'a, R> {
    /// Creates a gateway with default validation rules.
    pub fn new(repo: &'a R) -> Self {
        Self::with_rules(repo, ValidationRules::default())
    }

    /// Creates a gateway with custom validation rules.
    pub fn with_rules(repo: &'a R, rules: ValidationRules) -> Self {
        Self { repo, rules }
    }

    /// Validates without writing, e.g. to preview a manual edit.
    pub fn validate(
        &self,
        candidate: &ScheduleDraft,
        exclude_id: Option<EntryId>,
    ) -> RepositoryResult<ValidationResult> {
        ScheduleValidator::with_rules(self.repo, self.rules).validate(candidate, exclude_id)
    }

    /// Validates and persists a new entry.
    pub fn create(&self, draft: &ScheduleDraft) -> Result<Saved, GatewayError> {
        let rules = self.rules;
        self.repo.serialized(|repo| -> Result<Saved, GatewayError> {
            let result = ScheduleValidator::with_rules(repo, rules).validate(draft, None)?;
            if !result.valid {
                info!("rejected new schedule entry: {result}");
                return Err(GatewayError::Validation(result));
            }
            let entry = repo.insert(draft)?;
            info!(
                "created schedule entry {} for unit '{}'",
                entry.id, entry.teaching_unit_id
            );
            Ok(Saved {
                entry,
                warnings: result.warnings,
            })
        })
    }

    /// Merges `patch` over entry `id`, validates the result excluding the
    /// entry itself, and persists it.
    pub fn update(&self, id: EntryId, patch: &SchedulePatch) -> Result<Saved, GatewayError> {
        let rules = self.rules;
        self.repo.serialized(|repo| -> Result<Saved, GatewayError> {
            let existing = repo.find_by_id(id)?.ok_or(GatewayError::NotFound(id))?;
            let merged = patch.apply(&existing);
            let result = ScheduleValidator::with_rules(repo, rules).validate(&merged, Some(id))?;
            if !result.valid {
                info!("rejected update of schedule entry {id}: {result}");
                return Err(GatewayError::Validation(result));
            }
            let entry = repo.update_by_id(id, &merged).map_err(|e| match e {
                RepositoryError::MissingEntry(id) => GatewayError::NotFound(id),
                other => GatewayError::Repository(other),
            })?;
            info!("updated schedule entry {id}");
            Ok(Saved {
                entry,
                warnings: result.warnings,
            })
        })
    }

    /// Removes entry `id`. No validation is performed.
    pub fn delete(&self, id: EntryId) -> Result<(), GatewayError> {
        self.repo.serialized(|repo| -> Result<(), GatewayError> {
            if repo.delete_by_id(id)? {
                info!("deleted schedule entry {id}");
                Ok(())
            } else {
                Err(GatewayError::NotFound(id))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{clock, ConflictKind, TeachingUnit};
    use crate::repository::InMemoryScheduleRepository;
    use crate::validation::IssueKind;

    fn repo() -> InMemoryScheduleRepository {
        InMemoryScheduleRepository::new().with_units([
            TeachingUnit::new("U1", "7A", "T1"),
            TeachingUnit::new("U2", "7B", "T1"),
            TeachingUnit::new("U3", "7C", "T2"),
        ])
    }

    fn draft(unit: &str, day: u8, start: (u32, u32), end: (u32, u32)) -> ScheduleDraft {
        ScheduleDraft::new(unit, day).with_times(clock(start.0, start.1), clock(end.0, end.1))
    }

    #[test]
    fn test_create() {
        let r = repo();
        let saved = ScheduleGateway::new(&r)
            .create(&draft("U1", 1, (8, 15), (9, 0)).with_room("R1"))
            .unwrap();
        assert_eq!(saved.entry.id, 1);
        assert_eq!(saved.entry.room.as_deref(), Some("R1"));
        assert!(saved.warnings.is_empty());
        assert_eq!(r.find_by_id(1).unwrap(), Some(saved.entry));
    }

    #[test]
    fn test_create_returns_warnings() {
        let r = repo();
        let saved = ScheduleGateway::new(&r)
            .create(&draft("U1", 1, (10, 0), (10, 5)))
            .unwrap();
        assert_eq!(saved.warnings.len(), 1);
        assert_eq!(saved.warnings[0].kind, IssueKind::DurationOutOfRange);
    }

    #[test]
    fn test_create_rejects_teacher_overlap() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        gw.create(&draft("U1", 1, (8, 15), (9, 0))).unwrap();

        let err = gw.create(&draft("U2", 1, (8, 30), (9, 15))).unwrap_err();
        match err {
            GatewayError::Validation(result) => {
                assert!(!result.valid);
                assert_eq!(result.conflict_ids(ConflictKind::Teacher), vec![1]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(r.len().unwrap(), 1);
    }

    #[test]
    fn test_create_reports_all_errors() {
        let r = repo();
        let candidate = ScheduleDraft {
            teaching_unit_id: None,
            day_of_week: 8,
            start: Some(clock(10, 0)),
            end: Some(clock(9, 0)),
            room: None,
        };
        let Err(GatewayError::Validation(result)) = ScheduleGateway::new(&r).create(&candidate)
        else {
            panic!("expected validation failure");
        };
        assert_eq!(result.errors.len(), 3);
        assert!(r.is_empty().unwrap());
    }

    #[test]
    fn test_update_moves_entry() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        let e = gw.create(&draft("U1", 1, (8, 15), (9, 0))).unwrap().entry;

        let saved = gw
            .update(e.id, &SchedulePatch::new().with_times(clock(8, 30), clock(9, 15)))
            .unwrap();
        assert_eq!(saved.entry.id, e.id);
        assert_eq!(saved.entry.start, clock(8, 30));
    }

    #[test]
    fn test_update_unchanged_is_valid() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        let e = gw
            .create(&draft("U1", 1, (8, 15), (9, 0)).with_room("R1"))
            .unwrap()
            .entry;
        let saved = gw.update(e.id, &SchedulePatch::new()).unwrap();
        assert_eq!(saved.entry, e);
    }

    #[test]
    fn test_update_into_conflict_is_rejected() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        gw.create(&draft("U1", 1, (8, 15), (9, 0))).unwrap();
        let e = gw.create(&draft("U2", 2, (8, 15), (9, 0))).unwrap().entry;

        let err = gw.update(e.id, &SchedulePatch::new().with_day(1)).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(r.find_by_id(e.id).unwrap().unwrap().day_of_week, 2);
    }

    #[test]
    fn test_update_not_found() {
        let r = repo();
        let err = ScheduleGateway::new(&r)
            .update(99, &SchedulePatch::new().with_day(2))
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(99)));
    }

    #[test]
    fn test_delete() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        let e = gw.create(&draft("U1", 1, (8, 15), (9, 0))).unwrap().entry;
        gw.delete(e.id).unwrap();
        assert!(matches!(gw.delete(e.id), Err(GatewayError::NotFound(_))));
        assert!(r.is_empty().unwrap());
    }

    #[test]
    fn test_unknown_unit_passes_validation_but_not_storage() {
        let r = repo();
        let err = ScheduleGateway::new(&r)
            .create(&draft("ghost", 1, (8, 15), (9, 0)))
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Repository(RepositoryError::UnknownTeachingUnit(_))
        ));
    }

    #[test]
    fn test_concurrent_creates_cannot_double_book() {
        // Storage backstop off: only the serialized write path protects us.
        let r = repo().with_overlap_backstop(false);
        let gw = ScheduleGateway::new(&r);
        let successes = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let gw = &gw;
                    let unit = if i % 2 == 0 { "U1" } else { "U2" };
                    s.spawn(move || gw.create(&draft(unit, 1, (8, 15), (9, 0))).is_ok())
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|created| *created)
                .count()
        });
        assert_eq!(successes, 1);
        assert_eq!(r.len().unwrap(), 1);
    }

    #[test]
    fn test_preview_validation() {
        let r = repo();
        let gw = ScheduleGateway::new(&r);
        gw.create(&draft("U3", 1, (8, 15), (9, 0)).with_room("Lab")).unwrap();
        let result = gw
            .validate(&draft("U1", 1, (8, 15), (9, 0)).with_room("Lab"), None)
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.conflict_ids(ConflictKind::Room), vec![1]);
        assert_eq!(r.len().unwrap(), 1);
    }
}
