//! Pure simulation logic for Hearth.
//!
//! This crate contains the household life-sim core that is independent
//! of any engine, storage, or UI. Types take plain data and return
//! results, making them unit-testable and portable across the native
//! engine, headless tools, and tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`clock`] | Day/hour/minute clock, active-hours window, time periods |
//! | [`stats`] | Clamped resident attributes, growth multiplier, hourly drain |
//! | [`tasks`] | Task definitions, per-day instances, activation and completion |
//! | [`catalog`] | Catalog validation and the built-in three-day schedule |
//! | [`hope`] | Derived hope score from upgrades and resident attributes |

pub mod catalog;
pub mod clock;
pub mod hope;
pub mod stats;
pub mod tasks;
