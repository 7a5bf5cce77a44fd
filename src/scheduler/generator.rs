//! Greedy weekly timetable generator.
//!
//! # Algorithm
//!
//! 1. Fetch the teaching units of a class (or of a teacher), in order.
//! 2. Walk the working days, then the catalog slots, in order.
//! 3. A unit is placed in the first (day, slot) that the slot finder
//!    reports free for both its class and its teacher.
//! 4. A room is drawn from the allocator and checked against same-day
//!    room bookings; if the allocator's picks are busy, the untried rooms
//!    of the pool are scanned in order.
//!
//! Invalid working days are rejected before anything is written.
//!
//! Each placement is committed immediately, so later units see earlier
//! ones. No backtracking: a unit that finds no free slot stays
//! unscheduled and is reported in the outcome.
//!
//! # Complexity
//! O(u × d × s) slot checks for u units, d days, s slots per day.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rooms::{RoomAllocator, RoundRobinAllocator};
use crate::config::{room_choices, validate_weekdays, ConfigError, EngineConfig, PlacementPolicy};
use crate::models::{ScheduleDraft, ScheduleEntry, SlotCatalog, TeachingUnit, TimeSlot};
use crate::repository::{RepositoryError, RepositoryResult, ScheduleRepository};
use crate::slots::SlotFinder;

/// Generation failures.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator settings are unusable; nothing was written.
    #[error("invalid generation config: {0}")]
    Config(#[from] ConfigError),
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Generator settings.
#[derive(Debug)]
pub struct GenerationConfig {
    /// Working days walked in order.
    pub weekdays: Vec<u8>,
    /// Instructional windows per day.
    pub slot_catalog: SlotCatalog,
    /// Rooms to draw from first; `room_pool` is used when empty.
    pub preferred_rooms: Vec<String>,
    /// Fallback rooms.
    pub room_pool: Vec<String>,
    /// Behavior for units that fit nowhere.
    pub placement: PlacementPolicy,
    /// Room selection strategy.
    pub room_allocator: Box<dyn RoomAllocator>,
}

impl GenerationConfig {
    /// Builds generator settings from an engine configuration.
    pub fn from_engine(config: &EngineConfig) -> Self {
        Self {
            weekdays: config.weekdays.clone(),
            slot_catalog: config.slot_catalog.clone(),
            preferred_rooms: config.preferred_rooms.clone(),
            room_pool: config.room_pool.clone(),
            placement: config.placement,
            room_allocator: Box::new(RoundRobinAllocator::new()),
        }
    }

    /// Sets the working days.
    pub fn with_weekdays(mut self, weekdays: Vec<u8>) -> Self {
        self.weekdays = weekdays;
        self
    }

    /// Sets the slot catalog.
    pub fn with_catalog(mut self, catalog: SlotCatalog) -> Self {
        self.slot_catalog = catalog;
        self
    }

    /// Sets the preferred rooms.
    pub fn with_preferred_rooms(mut self, rooms: Vec<String>) -> Self {
        self.preferred_rooms = rooms;
        self
    }

    /// Sets the fallback room pool.
    pub fn with_room_pool(mut self, rooms: Vec<String>) -> Self {
        self.room_pool = rooms;
        self
    }

    /// Sets the placement policy.
    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the room allocator.
    pub fn with_allocator(mut self, allocator: impl RoomAllocator + 'static) -> Self {
        self.room_allocator = Box::new(allocator);
        self
    }

    /// Checks the working week. The catalog validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weekdays(&self.weekdays)
    }

    /// Rooms drawn from: preferred rooms if any, else the pool.
    pub fn rooms(&self) -> &[String] {
        room_choices(&self.preferred_rooms, &self.room_pool)
    }

    /// Number of (day, slot) cells in the working week.
    pub fn capacity(&self) -> usize {
        self.weekdays.len() * self.slot_catalog.len()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::from_engine(&EngineConfig::default())
    }
}

/// Result of a generation run.
///
/// Fewer entries than units means a partial timetable; the units left
/// out are listed in `unscheduled`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Entries committed, in placement order.
    pub entries: Vec<ScheduleEntry>,
    /// Ids of units that were not placed.
    pub unscheduled: Vec<String>,
}

impl GenerationOutcome {
    /// Whether every unit was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    /// Number of entries committed.
    pub fn placed_count(&self) -> usize {
        self.entries.len()
    }
}

/// Greedy weekly timetable generator.
///
/// # Example
///
/// ```
/// use u_timetable::models::TeachingUnit;
/// use u_timetable::repository::InMemoryScheduleRepository;
/// use u_timetable::scheduler::{GenerationConfig, TimetableGenerator};
///
/// let repo = InMemoryScheduleRepository::new().with_units([
///     TeachingUnit::new("math-7A", "7A", "T1"),
///     TeachingUnit::new("art-7A", "7A", "T2"),
/// ]);
/// let mut generator = TimetableGenerator::new(&repo, GenerationConfig::default());
/// let outcome = generator.generate_for_class("7A").unwrap();
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.entries[0].day_of_week, 1);
/// assert_eq!(outcome.entries[1].room.as_deref(), Some("R102"));
/// ```
#[derive(Debug)]
pub struct TimetableGenerator<'a, R> {
    repo: &'a R,
    config: GenerationConfig,
}

impl<'a, R: ScheduleRepository> TimetableGenerator<'a, R> {
    /// Creates a generator writing to `repo`.
    pub fn new(repo: &'a R, config: GenerationConfig) -> Self {
        Self { repo, config }
    }

    /// Generator settings.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Places every teaching unit of a class.
    ///
    /// # Errors
    /// Fails before writing anything if the config is invalid.
    pub fn generate_for_class(
        &mut self,
        class_id: &str,
    ) -> Result<GenerationOutcome, GenerationError> {
        self.config.validate()?;
        let units = self.repo.find_teaching_units_by_class(class_id)?;
        let outcome = self.generate(&units)?;
        log_outcome("class", class_id, units.len(), &outcome);
        Ok(outcome)
    }

    /// Places every teaching unit of a teacher.
    pub fn generate_for_teacher(
        &mut self,
        teacher_id: &str,
    ) -> Result<GenerationOutcome, GenerationError> {
        self.config.validate()?;
        let units = self.repo.find_teaching_units_by_teacher(teacher_id)?;
        let outcome = self.generate(&units)?;
        log_outcome("teacher", teacher_id, units.len(), &outcome);
        Ok(outcome)
    }

    fn generate(&mut self, units: &[TeachingUnit]) -> RepositoryResult<GenerationOutcome> {
        match self.config.placement {
            PlacementPolicy::SkipUnplaceable => self.place_each(units),
            PlacementPolicy::StopAtFirstUnplaceable => self.place_with_cursor(units),
        }
    }

    /// Searches the whole week for each unit in turn; unplaceable units are skipped.
    fn place_each(&mut self, units: &[TeachingUnit]) -> RepositoryResult<GenerationOutcome> {
        let mut outcome = GenerationOutcome::default();
        let cells = self.cells();
        for unit in units {
            let mut placed = None;
            for (day, slot) in &cells {
                placed = self.try_place(unit, *day, slot)?;
                if placed.is_some() {
                    break;
                }
            }
            match placed {
                Some(entry) => outcome.entries.push(entry),
                None => {
                    warn!("no free slot for teaching unit '{}'; skipped", unit.id);
                    outcome.unscheduled.push(unit.id.clone());
                }
            }
        }
        Ok(outcome)
    }

    /// Single pass over the week; the unit at the cursor waits for a free cell.
    fn place_with_cursor(
        &mut self,
        units: &[TeachingUnit],
    ) -> RepositoryResult<GenerationOutcome> {
        let mut outcome = GenerationOutcome::default();
        let mut cursor = 0;
        for (day, slot) in self.cells() {
            let Some(unit) = units.get(cursor) else {
                break;
            };
            if let Some(entry) = self.try_place(unit, day, &slot)? {
                outcome.entries.push(entry);
                cursor += 1;
            }
        }
        outcome.unscheduled = units[cursor.min(units.len())..]
            .iter()
            .map(|u| u.id.clone())
            .collect();
        Ok(outcome)
    }

    fn cells(&self) -> Vec<(u8, TimeSlot)> {
        self.config
            .weekdays
            .iter()
            .flat_map(|&day| self.config.slot_catalog.iter().map(move |slot| (day, *slot)))
            .collect()
    }

    /// Commits `unit` at (`day`, `slot`) if free, on the serialized write path.
    fn try_place(
        &mut self,
        unit: &TeachingUnit,
        day: u8,
        slot: &TimeSlot,
    ) -> RepositoryResult<Option<ScheduleEntry>> {
        let repo = self.repo;
        let config = &mut self.config;
        repo.serialized(|repo| -> RepositoryResult<Option<ScheduleEntry>> {
            let free = SlotFinder::new(repo, &config.slot_catalog).find_available(
                day,
                Some(&unit.class_id),
                Some(&unit.teacher_id),
            )?;
            if !free.contains(slot) {
                return Ok(None);
            }

            let mut draft = ScheduleDraft::new(unit.id.clone(), day).with_slot(*slot);
            draft.room = pick_room(repo, config, unit, day, slot)?;

            match repo.insert(&draft) {
                Ok(entry) => {
                    debug!(
                        "placed '{}' on day {day} {slot} in {:?}",
                        unit.id, entry.room
                    );
                    Ok(Some(entry))
                }
                Err(RepositoryError::Conflict { kind, entry_id }) => {
                    debug!(
                        "storage rejected '{}' on day {day} {slot}: {kind} clash with {entry_id}",
                        unit.id
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
    }
}

/// Asks the allocator for a free room, then falls back to the untried rest of the pool.
///
/// Returns `None` when the allocator declines or every room is busy at (`day`, `slot`).
fn pick_room<R: ScheduleRepository>(
    repo: &R,
    config: &mut GenerationConfig,
    unit: &TeachingUnit,
    day: u8,
    slot: &TimeSlot,
) -> RepositoryResult<Option<String>> {
    let GenerationConfig {
        preferred_rooms,
        room_pool,
        room_allocator,
        ..
    } = config;
    let rooms = room_choices(&preferred_rooms[..], &room_pool[..]);
    if rooms.is_empty() {
        return Ok(None);
    }

    let mut tried: Vec<String> = Vec::new();
    for _ in 0..rooms.len() {
        let Some(room) = room_allocator.allocate(unit, day, slot, rooms) else {
            return Ok(None);
        };
        if tried.contains(&room) {
            continue;
        }
        if room_is_free(repo, &room, day, slot)? {
            return Ok(Some(room));
        }
        debug!("room {room} busy on day {day} {slot}");
        tried.push(room);
    }
    for room in rooms.iter().filter(|r| !tried.contains(*r)) {
        if room_is_free(repo, room, day, slot)? {
            debug!("{} fell back to room {room}", room_allocator.name());
            return Ok(Some(room.clone()));
        }
    }

    warn!(
        "no free room for '{}' on day {day} {slot}; placing without a room",
        unit.id
    );
    Ok(None)
}

fn room_is_free<R: ScheduleRepository>(
    repo: &R,
    room: &str,
    day: u8,
    slot: &TimeSlot,
) -> RepositoryResult<bool> {
    Ok(!repo
        .find_by_room_and_day(room, day, None)?
        .iter()
        .any(|e| e.overlaps(slot.start, slot.end)))
}

fn log_outcome(scope: &str, id: &str, unit_count: usize, outcome: &GenerationOutcome) {
    if outcome.is_complete() {
        info!(
            "generated {} entries for {scope} '{id}'",
            outcome.placed_count()
        );
    } else {
        warn!(
            "partial timetable for {scope} '{id}': {}/{unit_count} units placed, unscheduled: {:?}",
            outcome.placed_count(),
            outcome.unscheduled
        );
    }
}
