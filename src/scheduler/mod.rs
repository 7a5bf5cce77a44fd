//! Greedy timetable generation.
//!
//! `TimetableGenerator` assigns a class's (or a teacher's) teaching
//! units to weekday × catalog-slot cells, first free cell wins.
//! Rooms come from a pluggable `RoomAllocator`.
//!
//! # Algorithm
//!
//! Greedy, deterministic, no backtracking. Every committed entry has
//! passed the free-slot check at commit time, so a generated timetable
//! is conflict-free for the units it placed. It does not guarantee that
//! every unit is placed; check `GenerationOutcome::unscheduled`.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod generator;
mod rooms;

pub use generator::{GenerationConfig, GenerationError, GenerationOutcome, TimetableGenerator};
pub use rooms::{RoomAllocator, RoundRobinAllocator, SeededRandomAllocator};
