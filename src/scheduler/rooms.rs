//! Room allocation strategies for generated entries.
//!
//! The generator asks an allocator for a room, checks the room is free,
//! and asks again if it is not. Allocators must be deterministic for a
//! given construction so generated timetables are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

use crate::models::{TeachingUnit, TimeSlot};

/// Chooses a room for a unit placed at `day_of_week` / `slot`.
pub trait RoomAllocator: Send + Debug {
    /// Strategy name.
    fn name(&self) -> &'static str;

    /// Picks one of `rooms`, or `None` to leave the entry without a room.
    ///
    /// `rooms` is never empty when called by the generator.
    fn allocate(
        &mut self,
        unit: &TeachingUnit,
        day_of_week: u8,
        slot: &TimeSlot,
        rooms: &[String],
    ) -> Option<String>;
}

/// Cycles through the pool in order.
#[derive(Debug, Clone, Default)]
pub struct RoundRobinAllocator {
    next: usize,
}

impl RoundRobinAllocator {
    /// Creates an allocator starting at the first room.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomAllocator for RoundRobinAllocator {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn allocate(
        &mut self,
        _unit: &TeachingUnit,
        _day_of_week: u8,
        _slot: &TimeSlot,
        rooms: &[String],
    ) -> Option<String> {
        if rooms.is_empty() {
            return None;
        }
        let room = rooms[self.next % rooms.len()].clone();
        self.next = self.next.wrapping_add(1);
        Some(room)
    }
}

/// Picks rooms uniformly at random from a seeded generator.
///
/// The same seed always yields the same sequence of rooms.
#[derive(Debug, Clone)]
pub struct SeededRandomAllocator {
    rng: StdRng,
}

impl SeededRandomAllocator {
    /// Creates an allocator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RoomAllocator for SeededRandomAllocator {
    fn name(&self) -> &'static str {
        "seeded-random"
    }

    fn allocate(
        &mut self,
        _unit: &TeachingUnit,
        _day_of_week: u8,
        _slot: &TimeSlot,
        rooms: &[String],
    ) -> Option<String> {
        if rooms.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..rooms.len());
        Some(rooms[idx].clone())
    }
}
