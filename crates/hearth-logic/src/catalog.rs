//! Task catalog — validated definition sets and the built-in
//! three-day household schedule.
//!
//! Catalog construction is the one fail-fast point in the core: an
//! empty set or a duplicate requirement tag within a day is rejected
//! here, before any simulation begins, so corrupt data never reaches
//! the tick loop. Effects naming unknown residents are not a catalog
//! concern — the engine skips and logs those at application time.

use std::collections::HashSet;

use crate::stats::Attribute;
use crate::tasks::{StatEffect, TaskDefinition, TaskKind};

/// Errors detected while loading a catalog.
#[derive(Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The definition set was empty.
    Empty,
    /// Two definitions on the same day share a requirement tag.
    DuplicateRequirement { day: u32, requirement: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "catalog has no task definitions"),
            CatalogError::DuplicateRequirement { day, requirement } => write!(
                f,
                "duplicate requirement tag '{}' on day {}",
                requirement, day
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// A validated, immutable set of task definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<TaskDefinition>,
    total_upgrades: u32,
}

impl Catalog {
    /// Validate and build a catalog. Requirement tags must be unique
    /// within each day (case-insensitive) so the per-day tag index is
    /// unambiguous.
    pub fn new(definitions: Vec<TaskDefinition>) -> Result<Self, CatalogError> {
        if definitions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen: HashSet<(u32, String)> = HashSet::new();
        for def in &definitions {
            if let Some(tag) = &def.requirement {
                let key = (def.day, tag.trim().to_lowercase());
                if !seen.insert(key) {
                    return Err(CatalogError::DuplicateRequirement {
                        day: def.day,
                        requirement: tag.clone(),
                    });
                }
            }
        }

        let total_upgrades = definitions
            .iter()
            .filter(|d| d.kind == TaskKind::ObjectActivation)
            .count() as u32;

        Ok(Self {
            definitions,
            total_upgrades,
        })
    }

    pub fn definitions(&self) -> &[TaskDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Number of object-activation tasks; the denominator of the hope
    /// score's upgrade ratio.
    pub fn total_upgrades(&self) -> u32 {
        self.total_upgrades
    }

    /// Days covered by at least one definition.
    pub fn days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.definitions.iter().map(|d| d.day).collect();
        days.sort_unstable();
        days.dedup();
        days
    }
}

fn task(
    description: &str,
    day: u32,
    hour: u8,
    minute: u8,
    requirement: &str,
    effects: &[(&str, Attribute, i32)],
    kind: TaskKind,
) -> TaskDefinition {
    TaskDefinition {
        description: description.into(),
        day,
        hour,
        minute,
        requirement: Some(requirement.into()),
        kind,
        required_actor: None,
        effects: effects
            .iter()
            .map(|(actor, attribute, amount)| StatEffect {
                actor: (*actor).into(),
                attribute: *attribute,
                amount: *amount,
            })
            .collect(),
    }
}

/// The shipped three-day schedule for the household of Sahil, Bashir,
/// Aisha and Sagar.
pub fn builtin_schedule() -> Catalog {
    use Attribute::{Learning, Stability, Trust, WorkReadiness};
    use TaskKind::{Interaction, ObjectActivation};

    let defs = vec![
        // Day 1
        task("Talk to the person on the door", 1, 8, 0, "TalkDoor1", &[("Bashir", Trust, 5)], Interaction),
        task("Prepare breakfast", 1, 9, 0, "Breakfast1", &[("Sahil", Trust, 5)], Interaction),
        task("Take a shower", 1, 10, 0, "Shower1", &[], Interaction),
        task("Scavenge backyard for materials", 1, 11, 0, "ScavengeBack1", &[], Interaction),
        task("Eat breakfast", 1, 11, 0, "EatBreakfast1", &[], Interaction),
        task("Talk to Sahil", 1, 13, 0, "TalkSahil1", &[("Bashir", Trust, 5)], Interaction),
        task("Talk to Bashir", 1, 13, 0, "TalkBashir1", &[("Sahil", Trust, 5)], Interaction),
        task("Craft donation box", 1, 14, 0, "CraftDonation1", &[("Bashir", WorkReadiness, 5)], Interaction),
        task("Scavenge bins for materials", 1, 14, 0, "ScavengeBins1", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Plant seeds", 1, 15, 0, "PlantSeeds1", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Water crops", 1, 15, 0, "WaterCrops1", &[("Sahil", Learning, 5)], Interaction),
        task("Place donation box", 1, 16, 0, "PlaceDonation1", &[], ObjectActivation),
        task("Prepare dinner", 1, 18, 0, "Dinner1", &[], Interaction),
        task("Check donation box", 1, 18, 0, "CheckDonation1", &[], Interaction),
        task("Eat dinner", 1, 19, 0, "EatDinner1", &[], Interaction),
        task("Check donation box (Evening)", 1, 18, 0, "CheckDonation1E", &[], Interaction),
        task("Paint living room walls", 1, 20, 0, "PaintLiving1", &[("Bashir", WorkReadiness, 5)], Interaction),
        task("Paint kitchen walls", 1, 20, 0, "PaintKitchen1", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Sleep", 1, 21, 0, "Sleep1", &[], Interaction),
        // Day 2
        task("Talk to the person on the door", 2, 9, 0, "TalkDoor2", &[("Bashir", Trust, 5)], Interaction),
        task("Talk to Aisha", 2, 9, 0, "TalkAisha2", &[("Aisha", Trust, 5)], Interaction),
        task("Talk to Sagar", 2, 9, 0, "TalkSagar2", &[("Sagar", Trust, 5)], Interaction),
        task("Make breakfast", 2, 9, 0, "Breakfast2", &[], Interaction),
        task("Eat breakfast (all residents)", 2, 10, 0, "EatBreakfast2", &[], Interaction),
        task("Scavenge front yard for materials", 2, 11, 0, "ScavengeFront2", &[], Interaction),
        task("Water the crops", 2, 11, 0, "WaterCrops2", &[("Aisha", Learning, 5)], Interaction),
        task("Help your mom water the crops", 2, 11, 0, "HelpWater2", &[("Sagar", WorkReadiness, 5)], Interaction),
        task("Craft windmill", 2, 12, 0, "CraftWindmill2", &[("Bashir", WorkReadiness, 5)], Interaction),
        task("Place windmill", 2, 12, 0, "PlaceWindmill2", &[], ObjectActivation),
        task("Play in the backyard", 2, 12, 0, "PlayBackyard2", &[("Sagar", Trust, 5)], Interaction),
        task("Check donation box (Afternoon)", 2, 15, 0, "CheckDonation2A", &[], Interaction),
        task("Scavenge bins for materials", 2, 14, 0, "ScavengeBins2", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Place solar panels", 2, 15, 0, "PlaceSolar2", &[("Bashir", WorkReadiness, 5), ("Bashir", Stability, 5)], ObjectActivation),
        task("Craft sewing machine", 2, 15, 0, "CraftSewing2", &[("Sahil", Trust, 5)], Interaction),
        task("Place sewing machine", 2, 15, 0, "PlaceSewing2", &[("Sahil", WorkReadiness, 5)], ObjectActivation),
        task("Help Sagar study", 2, 16, 0, "HelpStudy2", &[("Bashir", WorkReadiness, 5), ("Aisha", Trust, 5)], Interaction),
        task("Check donation box (Afternoon 2)", 2, 16, 0, "CheckDonation2A2", &[], Interaction),
        task("Sew curtain", 2, 16, 0, "SewCurtain2", &[("Aisha", Learning, 5)], Interaction),
        task("Place new curtain", 2, 16, 0, "PlaceCurtain2", &[("Aisha", WorkReadiness, 5), ("Bashir", Stability, 5)], ObjectActivation),
        task("Study", 2, 16, 0, "Study2", &[("Sagar", Learning, 5)], Interaction),
        task("Play in the backyard (Evening)", 2, 17, 0, "PlayBackyard2E", &[("Sagar", Trust, 5)], Interaction),
        task("Check donation box (Evening)", 2, 17, 0, "CheckDonation2E", &[], Interaction),
        task("Cook dinner", 2, 18, 0, "CookDinner2", &[], Interaction),
        task("Eat dinner (all residents)", 2, 19, 0, "EatDinner2", &[], Interaction),
        task("Sleep", 2, 20, 0, "Sleep2", &[], Interaction),
        // Day 3
        task("Make breakfast", 3, 9, 0, "Breakfast3", &[], Interaction),
        task("Help Sagar study", 3, 11, 0, "HelpStudy3", &[("Aisha", WorkReadiness, 5), ("Aisha", Trust, 5)], Interaction),
        task("Study", 3, 11, 0, "Study3", &[("Sagar", Learning, 5)], Interaction),
        task("Check donation box", 3, 12, 0, "CheckDonation3", &[("Bashir", Stability, 5)], Interaction),
        task("Scavenge bins in the front yard", 3, 12, 0, "ScavengeFront3", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Craft canvas frame", 3, 13, 0, "CraftCanvas3", &[("Sahil", Trust, 5), ("Aisha", Trust, 5)], Interaction),
        task("Play in backyard", 3, 13, 0, "PlayBackyard3", &[], Interaction),
        task("Sew cloth for canvas", 3, 14, 0, "SewCloth3", &[("Aisha", WorkReadiness, 5), ("Aisha", Stability, 5), ("Aisha", Trust, 5)], Interaction),
        task("Place canvas", 3, 14, 0, "PlaceCanvas3", &[("Bashir", Stability, 5)], ObjectActivation),
        task("Harvest crops", 3, 15, 0, "Harvest3", &[("Bashir", WorkReadiness, 5), ("Bashir", Stability, 5), ("Sahil", Stability, 5)], Interaction),
        task("Learn how to paint", 3, 15, 0, "LearnPaint3", &[("Sagar", Learning, 5), ("Sagar", Stability, 5)], Interaction),
        task("Water plants", 3, 16, 0, "WaterPlants3", &[], Interaction),
        task("Paint bedroom walls", 3, 16, 0, "PaintBedroom3", &[("Sahil", WorkReadiness, 5)], Interaction),
        task("Paint kitchen walls", 3, 16, 0, "PaintKitchen3", &[("Aisha", Trust, 5)], Interaction),
        task("Water plants (Evening)", 3, 16, 0, "WaterPlants3E", &[], Interaction),
        task("Cook dinner", 3, 18, 0, "CookDinner3", &[], Interaction),
        task("Eat dinner (all residents)", 3, 19, 0, "EatDinner3", &[("Bashir", Stability, 5), ("Sahil", Stability, 5), ("Aisha", Stability, 5), ("Sagar", Stability, 5)], Interaction),
        task("Sleep", 3, 20, 0, "Sleep3", &[], Interaction),
    ];

    // Known-good data; construction is covered by the unit tests below.
    Catalog::new(defs).expect("builtin schedule is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(day: u32, tag: &str) -> TaskDefinition {
        task("t", day, 9, 0, tag, &[], TaskKind::Interaction)
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_duplicate_tag_same_day_rejected() {
        let err = Catalog::new(vec![simple(1, "Chore"), simple(1, "chore ")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRequirement { day: 1, .. }));
    }

    #[test]
    fn test_same_tag_different_days_allowed() {
        let catalog = Catalog::new(vec![simple(1, "Chore"), simple(2, "Chore")]).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_builtin_schedule_loads() {
        let catalog = builtin_schedule();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.days(), vec![1, 2, 3]);
    }

    #[test]
    fn test_builtin_upgrade_count() {
        // 1 placement on day 1, 4 on day 2, 1 on day 3.
        assert_eq!(builtin_schedule().total_upgrades(), 6);
    }

    #[test]
    fn test_builtin_placements_have_tags() {
        for def in builtin_schedule().definitions() {
            if def.kind == TaskKind::ObjectActivation {
                assert!(def.requirement.is_some(), "{} has no tag", def.description);
            }
        }
    }
}
