//! ECS components for household residents.
//!
//! Stat data lives in `hearth-logic` types attached directly as
//! components; this module adds the identity pieces the engine needs
//! for name-based lookups.

use serde::{Deserialize, Serialize};

pub use hearth_logic::stats::{DrainRates, Growth, StatBlock};

/// Marker component: this entity is a household resident.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Resident;

/// Who a resident is. Names are unique within a household and matched
/// case-insensitively everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub description: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
