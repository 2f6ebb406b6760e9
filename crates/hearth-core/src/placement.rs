//! Placement board — which upgrade objects exist and which have been
//! placed.
//!
//! The board is seeded with every object-activation requirement in the
//! catalog. Placing an object is idempotent: the first placement counts
//! as an upgrade, repeats do not. The board doubles as the
//! [`PlacementOracle`] the task book queries when object-activation
//! tasks come due.

use std::collections::HashSet;

use hearth_logic::catalog::Catalog;
use hearth_logic::tasks::{PlacementOracle, TaskKind};

/// Result of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// First placement of a known object.
    Placed,
    /// Object was already placed; nothing changed.
    AlreadyPlaced,
    /// No object with this name exists on the board.
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementBoard {
    /// Lowercased names of every placeable object.
    known: HashSet<String>,
    /// Lowercased names of objects already placed.
    placed: HashSet<String>,
}

impl PlacementBoard {
    /// Seed the board with the catalog's object-activation requirements.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let known = catalog
            .definitions()
            .iter()
            .filter(|d| d.kind == TaskKind::ObjectActivation)
            .filter_map(|d| d.requirement.as_ref())
            .map(|tag| tag.trim().to_lowercase())
            .collect();
        Self {
            known,
            placed: HashSet::new(),
        }
    }

    /// Attempt to place a named object.
    pub fn place(&mut self, name: &str) -> PlaceOutcome {
        let key = name.trim().to_lowercase();
        if !self.known.contains(&key) {
            log::warn!("no placeable object named '{}'", name.trim());
            return PlaceOutcome::Unknown;
        }
        if !self.placed.insert(key) {
            log::debug!("object '{}' is already placed", name.trim());
            return PlaceOutcome::AlreadyPlaced;
        }
        log::debug!("placed object '{}'", name.trim());
        PlaceOutcome::Placed
    }

    pub fn placed_count(&self) -> u32 {
        self.placed.len() as u32
    }

    /// Placed object names (lowercased), for the save snapshot.
    pub fn placed(&self) -> impl Iterator<Item = &str> {
        self.placed.iter().map(String::as_str)
    }

    /// Restore placements from a snapshot. Unknown names are skipped
    /// with a warning rather than failing the load.
    pub fn restore(&mut self, placed: &[String]) {
        self.placed.clear();
        for name in placed {
            let key = name.trim().to_lowercase();
            if self.known.contains(&key) {
                self.placed.insert(key);
            } else {
                log::warn!("save references unknown placement '{}'", name);
            }
        }
    }
}

impl PlacementOracle for PlacementBoard {
    fn is_object_active(&self, requirement: &str) -> bool {
        self.placed.contains(&requirement.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_logic::catalog::builtin_schedule;

    #[test]
    fn test_place_known_object_once() {
        let mut board = PlacementBoard::from_catalog(&builtin_schedule());
        assert_eq!(board.place("PlaceDonation1"), PlaceOutcome::Placed);
        assert_eq!(board.place("PlaceDonation1"), PlaceOutcome::AlreadyPlaced);
        assert_eq!(board.placed_count(), 1);
    }

    #[test]
    fn test_unknown_object_rejected() {
        let mut board = PlacementBoard::from_catalog(&builtin_schedule());
        assert_eq!(board.place("Jacuzzi"), PlaceOutcome::Unknown);
        assert_eq!(board.placed_count(), 0);
    }

    #[test]
    fn test_oracle_sees_placements_case_insensitively() {
        let mut board = PlacementBoard::from_catalog(&builtin_schedule());
        board.place("placewindmill2");
        assert!(board.is_object_active("PlaceWindmill2"));
        assert!(!board.is_object_active("PlaceSolar2"));
    }

    #[test]
    fn test_restore_skips_unknown() {
        let mut board = PlacementBoard::from_catalog(&builtin_schedule());
        board.restore(&["placedonation1".into(), "jacuzzi".into()]);
        assert_eq!(board.placed_count(), 1);
    }
}
