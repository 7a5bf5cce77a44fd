//! Engine configuration.
//!
//! All tunables live in `EngineConfig`: the slot catalog, the working
//! week, room pools, the generator's placement policy, and the duration
//! bounds used by validation. Every field has a default, so a JSON
//! document only needs to name what it overrides.
//!
//! ```
//! use u_timetable::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "weekdays": [1, 2, 3, 4, 5, 6] }"#).unwrap();
//! assert_eq!(config.weekdays.len(), 6);
//! assert_eq!(config.slot_catalog.len(), 8);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{is_valid_day, SlotCatalog};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The slot catalog has no slots.
    #[error("slot catalog must contain at least one slot")]
    EmptyCatalog,
    /// A catalog slot ends at or before its start.
    #[error("slot {index} ({slot}) must end after it starts")]
    MalformedSlot { index: usize, slot: String },
    /// Catalog slots overlap or are out of order.
    #[error("slot {index} ({slot}) starts before the previous slot ({previous}) ends")]
    UnorderedCatalog {
        index: usize,
        slot: String,
        previous: String,
    },
    /// A working day is outside 1..=7.
    #[error("weekday {0} is outside 1..=7")]
    InvalidWeekday(u8),
    /// A working day is listed twice.
    #[error("weekday {0} is listed more than once")]
    DuplicateWeekday(u8),
    /// The working week is empty.
    #[error("at least one weekday is required")]
    NoWeekdays,
    /// Duration bounds are inverted or non-positive.
    #[error("duration bounds {min}..={max} minutes are invalid")]
    InvalidDurationBounds { min: i64, max: i64 },
    /// JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Duration bounds checked by the validator.
///
/// Entries outside the bounds produce a warning, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Shortest expected lesson (minutes).
    pub min_duration_minutes: i64,
    /// Longest expected lesson (minutes).
    pub max_duration_minutes: i64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_duration_minutes: 30,
            max_duration_minutes: 180,
        }
    }
}

/// What the generator does with a unit that fits nowhere in the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Report the unit as unscheduled and keep placing the rest.
    #[default]
    SkipUnplaceable,
    /// Walk days × slots with a single cursor; a unit that finds no slot
    /// holds the cursor until the week runs out, leaving every later unit
    /// unscheduled.
    StopAtFirstUnplaceable,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Instructional windows of a school day.
    pub slot_catalog: SlotCatalog,
    /// Working days walked by the generator, in order.
    pub weekdays: Vec<u8>,
    /// Rooms the generator prefers; used instead of `room_pool` when non-empty.
    pub preferred_rooms: Vec<String>,
    /// Fallback rooms for generated entries.
    pub room_pool: Vec<String>,
    /// Generator behavior for unplaceable units.
    pub placement: PlacementPolicy,
    /// Validator duration bounds.
    pub validation: ValidationRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_catalog: SlotCatalog::standard(),
            weekdays: vec![1, 2, 3, 4, 5],
            preferred_rooms: Vec::new(),
            room_pool: default_room_pool(),
            placement: PlacementPolicy::default(),
            validation: ValidationRules::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks weekdays and duration bounds. The catalog validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weekdays(&self.weekdays)?;
        let rules = &self.validation;
        let (min, max) = (rules.min_duration_minutes, rules.max_duration_minutes);
        if min <= 0 || min > max {
            return Err(ConfigError::InvalidDurationBounds { min, max });
        }
        Ok(())
    }

    /// Rooms the generator draws from: preferred rooms if any, else the pool.
    pub fn rooms(&self) -> &[String] {
        room_choices(&self.preferred_rooms, &self.room_pool)
    }
}

/// Checks a working week: non-empty, every day in 1..=7, no repeats.
pub(crate) fn validate_weekdays(weekdays: &[u8]) -> Result<(), ConfigError> {
    if weekdays.is_empty() {
        return Err(ConfigError::NoWeekdays);
    }
    let mut seen = HashSet::new();
    for &day in weekdays {
        if !is_valid_day(day) {
            return Err(ConfigError::InvalidWeekday(day));
        }
        if !seen.insert(day) {
            return Err(ConfigError::DuplicateWeekday(day));
        }
    }
    Ok(())
}

/// Preferred rooms when any are configured, else the fallback pool.
pub(crate) fn room_choices<'a>(preferred: &'a [String], pool: &'a [String]) -> &'a [String] {
    if preferred.is_empty() {
        pool
    } else {
        preferred
    }
}

fn default_room_pool() -> Vec<String> {
    ["R101", "R102", "R103", "R104", "R201", "R202", "R203", "R204"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = EngineConfig::default();
        assert_eq!(c.weekdays, vec![1, 2, 3, 4, 5]);
        assert_eq!(c.slot_catalog.len(), 8);
        assert_eq!(c.validation.min_duration_minutes, 30);
        assert_eq!(c.validation.max_duration_minutes, 180);
        assert_eq!(c.placement, PlacementPolicy::SkipUnplaceable);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rooms_prefers_preferred() {
        let mut c = EngineConfig::default();
        assert_eq!(c.rooms()[0], "R101");
        c.preferred_rooms = vec!["Lab".into()];
        assert_eq!(c.rooms(), &["Lab".to_string()]);
    }

    #[test]
    fn test_from_json_partial() {
        let c = EngineConfig::from_json_str(
            r#"{
                "weekdays": [1, 3, 5],
                "preferred_rooms": ["Gym"],
                "placement": "stop_at_first_unplaceable",
                "validation": { "max_duration_minutes": 90 }
            }"#,
        )
        .unwrap();
        assert_eq!(c.weekdays, vec![1, 3, 5]);
        assert_eq!(c.preferred_rooms, vec!["Gym".to_string()]);
        assert_eq!(c.placement, PlacementPolicy::StopAtFirstUnplaceable);
        assert_eq!(c.validation.min_duration_minutes, 30);
        assert_eq!(c.validation.max_duration_minutes, 90);
    }

    #[test]
    fn test_custom_catalog_from_json() {
        let c = EngineConfig::from_json_str(
            r#"{ "slot_catalog": [
                {"start":"08:00:00","end":"09:00:00"},
                {"start":"09:00:00","end":"10:00:00"}
            ] }"#,
        )
        .unwrap();
        assert_eq!(c.slot_catalog.len(), 2);
    }

    #[test]
    fn test_invalid_weekday() {
        let err = EngineConfig::from_json_str(r#"{ "weekdays": [1, 8] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeekday(8)));
    }

    #[test]
    fn test_duplicate_weekday() {
        let err = EngineConfig::from_json_str(r#"{ "weekdays": [2, 2] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateWeekday(2)));
    }

    #[test]
    fn test_no_weekdays() {
        let err = EngineConfig::from_json_str(r#"{ "weekdays": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoWeekdays));
    }

    #[test]
    fn test_inverted_duration_bounds() {
        let err = EngineConfig::from_json_str(
            r#"{ "validation": { "min_duration_minutes": 120, "max_duration_minutes": 60 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDurationBounds { .. }));
    }

    #[test]
    fn test_bad_catalog_is_json_error() {
        let err = EngineConfig::from_json_str(r#"{ "slot_catalog": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("at least one slot"));
    }
}
