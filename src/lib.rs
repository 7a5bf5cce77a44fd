//! School timetable engine.
//!
//! Assigns teaching units (class × subject × teacher) to weekly
//! day-and-slot cells, validates manual edits, and detects
//! double-bookings of teachers, rooms, and class-sections.
//!
//! # Modules
//!
//! - **`models`**: domain types: `TimeSlot`, `SlotCatalog`, `TeachingUnit`,
//!   `ScheduleEntry`, `ScheduleDraft`, `SchedulePatch`, `ConflictReport`
//! - **`repository`**: storage port (`ScheduleRepository`) and an in-memory store
//! - **`conflict`**: `ConflictDetector`, teacher/room/class overlap search
//! - **`slots`**: `SlotFinder`, free catalog slots for a class and teacher
//! - **`validation`**: `ScheduleValidator`, aggregated field and conflict checks
//! - **`scheduler`**: `TimetableGenerator`, greedy weekly assignment
//! - **`gateway`**: `ScheduleGateway`, validated create/update/delete
//! - **`config`**: `EngineConfig` (catalog, week, rooms, duration bounds)
//!
//! # Architecture
//!
//! The engine owns no data. Every call reads current state through the
//! repository; nothing is cached between calls. Writes that follow a
//! validation run on the repository's serialized write path.
//!
//! All conflict logic rests on one primitive, [`models::overlaps`], over
//! half-open `[start, end)` ranges: lessons that touch do not collide.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - de Werra (1985), "An introduction to timetabling"

pub mod config;
pub mod conflict;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod slots;
pub mod validation;
