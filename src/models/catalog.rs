//! Slot catalog: the ordered instructional windows of a school day.
//!
//! The catalog is configuration, not a constant. `SlotCatalog::standard`
//! gives the reference eight-period day; institutions supply their own
//! through `SlotCatalog::new` or `EngineConfig`.

use serde::{Deserialize, Serialize};

use super::TimeSlot;
use crate::config::ConfigError;

/// An ordered, non-overlapping sequence of time slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeSlot>", into = "Vec<TimeSlot>")]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    /// Creates a catalog from slots in day order.
    ///
    /// # Errors
    /// Fails if the list is empty, a slot ends before it starts, or the
    /// slots are not strictly increasing and disjoint.
    pub fn new(slots: Vec<TimeSlot>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (i, slot) in slots.iter().enumerate() {
            if !slot.is_well_formed() {
                return Err(ConfigError::MalformedSlot {
                    index: i,
                    slot: format!("{}-{}", slot.start, slot.end),
                });
            }
        }
        for (i, pair) in slots.windows(2).enumerate() {
            if pair[1].start < pair[0].end {
                return Err(ConfigError::UnorderedCatalog {
                    index: i + 1,
                    slot: pair[1].to_string(),
                    previous: pair[0].to_string(),
                });
            }
        }
        Ok(Self { slots })
    }

    /// The reference eight-period day, 07:30 to 14:30.
    pub fn standard() -> Self {
        Self {
            slots: vec![
                TimeSlot::hm((7, 30), (8, 15)),
                TimeSlot::hm((8, 15), (9, 0)),
                TimeSlot::hm((9, 0), (9, 45)),
                TimeSlot::hm((9, 45), (10, 30)),
                TimeSlot::hm((11, 0), (11, 45)),
                TimeSlot::hm((11, 45), (12, 30)),
                TimeSlot::hm((13, 0), (13, 45)),
                TimeSlot::hm((13, 45), (14, 30)),
            ],
        }
    }

    /// The slots in day order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Iterates slots in day order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeSlot> {
        self.slots.iter()
    }

    /// Number of slots per day.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false` for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<TimeSlot>> for SlotCatalog {
    type Error = ConfigError;

    fn try_from(slots: Vec<TimeSlot>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<SlotCatalog> for Vec<TimeSlot> {
    fn from(catalog: SlotCatalog) -> Self {
        catalog.slots
    }
}

impl<'a> IntoIterator for &'a SlotCatalog {
    type Item = &'a TimeSlot;
    type IntoIter = std::slice::Iter<'a, TimeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
