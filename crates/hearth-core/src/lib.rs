//! Hearth Core - Household Life-Sim Engine
//!
//! An ECS-based simulation of a small household rebuilding its home:
//! residents with drifting needs, a day/hour/minute clock, a scheduled
//! task book, and placeable upgrade objects that feed the hope score.
//!
//! # Architecture
//!
//! The engine uses an Entity Component System via `hecs`:
//! - **Entities**: Household residents
//! - **Components**: Pure data (Identity, StatBlock, Growth, DrainRates)
//! - **Engine**: [`engine::HouseholdEngine`] owns the world, the clock,
//!   the task book, and the placement board, and drives them each tick
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_core::engine::HouseholdEngine;
//! use hearth_core::components::{DrainRates, StatBlock};
//! use hearth_logic::catalog::builtin_schedule;
//! use hearth_logic::clock::{SimClock, SimTime};
//!
//! let clock = SimClock::new(SimTime::new(1, 8, 0), 60.0);
//! let mut engine = HouseholdEngine::new(builtin_schedule(), clock);
//! engine.add_resident("Sahil", "father", StatBlock::default(), None, DrainRates::default());
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         // react to clock/task/hope changes
//!     }
//! }
//! ```

pub mod components;
pub mod engine;
pub mod persistence;
pub mod placement;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{HouseholdEngine, SimEvent};
    pub use crate::placement::{PlaceOutcome, PlacementBoard};
}
