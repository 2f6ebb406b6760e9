//! Resident attributes — clamped integer stats, growth multipliers,
//! and hourly drain.
//!
//! Every attribute lives in 0..=100. Health is tracked but derived from
//! play rather than task effects, so it is not an [`Attribute`] variant
//! and cannot be targeted by a task's stat effects.

use serde::{Deserialize, Serialize};

/// Attributes a task or interaction effect can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Stability,
    Learning,
    WorkReadiness,
    Trust,
    Nutrition,
    Hygiene,
    Energy,
}

impl Attribute {
    /// All effect-targetable attributes in order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Stability,
        Attribute::Learning,
        Attribute::WorkReadiness,
        Attribute::Trust,
        Attribute::Nutrition,
        Attribute::Hygiene,
        Attribute::Energy,
    ];
}

/// A resident's full stat block. Mutation goes through [`StatBlock::apply`]
/// and the drain helpers so clamping is never skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub health: i32,
    pub stability: i32,
    pub learning: i32,
    pub work_readiness: i32,
    pub trust: i32,
    pub nutrition: i32,
    pub hygiene: i32,
    pub energy: i32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            health: 100,
            stability: 100,
            learning: 10,
            work_readiness: 100,
            trust: 50,
            nutrition: 50,
            hygiene: 50,
            energy: 50,
        }
    }
}

fn clamp_stat(value: i32) -> i32 {
    value.clamp(0, 100)
}

impl StatBlock {
    /// Current value of an effect-targetable attribute.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Stability => self.stability,
            Attribute::Learning => self.learning,
            Attribute::WorkReadiness => self.work_readiness,
            Attribute::Trust => self.trust,
            Attribute::Nutrition => self.nutrition,
            Attribute::Hygiene => self.hygiene,
            Attribute::Energy => self.energy,
        }
    }

    /// Apply a signed change to an attribute, clamped to 0..=100.
    pub fn apply(&mut self, attribute: Attribute, amount: i32) {
        let slot = match attribute {
            Attribute::Stability => &mut self.stability,
            Attribute::Learning => &mut self.learning,
            Attribute::WorkReadiness => &mut self.work_readiness,
            Attribute::Trust => &mut self.trust,
            Attribute::Nutrition => &mut self.nutrition,
            Attribute::Hygiene => &mut self.hygiene,
            Attribute::Energy => &mut self.energy,
        };
        *slot = clamp_stat(*slot + amount);
    }

    /// Set health directly (clamped). Used by recovery and load paths.
    pub fn set_health(&mut self, health: i32) {
        self.health = clamp_stat(health);
    }

    /// Mean of the seven effect-targetable attributes (0.0..=100.0).
    pub fn average_seven(&self) -> f32 {
        let sum = self.stability
            + self.learning
            + self.work_readiness
            + self.trust
            + self.nutrition
            + self.hygiene
            + self.energy;
        sum as f32 / 7.0
    }
}

/// A resident's designated primary attribute and its growth multiplier.
/// Positive changes to the primary attribute are scaled by the rate;
/// negative changes and other attributes are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub primary: Attribute,
    pub rate: f32,
}

impl Growth {
    pub fn new(primary: Attribute, rate: f32) -> Self {
        Self {
            primary,
            rate: rate.max(0.0),
        }
    }
}

/// The change actually applied after the growth multiplier.
pub fn effective_change(growth: Option<&Growth>, attribute: Attribute, amount: i32) -> i32 {
    match growth {
        Some(g) if g.primary == attribute && amount > 0 => {
            (amount as f32 * g.rate).round() as i32
        }
        _ => amount,
    }
}

/// Per-hour drain applied to the three bodily needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainRates {
    pub nutrition: i32,
    pub hygiene: i32,
    pub energy: i32,
}

impl Default for DrainRates {
    fn default() -> Self {
        Self {
            nutrition: 5,
            hygiene: 3,
            energy: 4,
        }
    }
}

impl DrainRates {
    /// Drain one simulated hour's worth from the stat block.
    pub fn apply_hour(&self, stats: &mut StatBlock) {
        stats.nutrition = clamp_stat(stats.nutrition - self.nutrition);
        stats.hygiene = clamp_stat(stats.hygiene - self.hygiene);
        stats.energy = clamp_stat(stats.energy - self.energy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_clamps_high() {
        let mut stats = StatBlock::default();
        stats.apply(Attribute::Trust, 500);
        assert_eq!(stats.trust, 100);
    }

    #[test]
    fn test_apply_clamps_low() {
        let mut stats = StatBlock::default();
        stats.apply(Attribute::Energy, -500);
        assert_eq!(stats.energy, 0);
    }

    #[test]
    fn test_get_matches_apply() {
        let mut stats = StatBlock::default();
        for attr in Attribute::ALL {
            let before = stats.get(attr);
            stats.apply(attr, -1);
            assert_eq!(stats.get(attr), before - 1);
        }
    }

    #[test]
    fn test_health_not_effect_targetable() {
        // Health is absent from Attribute::ALL; only set_health touches it.
        let mut stats = StatBlock::default();
        for attr in Attribute::ALL {
            stats.apply(attr, -10);
        }
        assert_eq!(stats.health, 100);
        stats.set_health(250);
        assert_eq!(stats.health, 100);
    }

    #[test]
    fn test_growth_scales_positive_primary() {
        let growth = Growth::new(Attribute::Learning, 1.5);
        assert_eq!(effective_change(Some(&growth), Attribute::Learning, 10), 15);
        // Other attributes and negative changes are unscaled.
        assert_eq!(effective_change(Some(&growth), Attribute::Trust, 10), 10);
        assert_eq!(effective_change(Some(&growth), Attribute::Learning, -10), -10);
        assert_eq!(effective_change(None, Attribute::Learning, 10), 10);
    }

    #[test]
    fn test_drain_applies_and_clamps() {
        let mut stats = StatBlock::default();
        let rates = DrainRates::default();
        rates.apply_hour(&mut stats);
        assert_eq!(stats.nutrition, 45);
        assert_eq!(stats.hygiene, 47);
        assert_eq!(stats.energy, 46);
        for _ in 0..50 {
            rates.apply_hour(&mut stats);
        }
        assert_eq!(stats.nutrition, 0);
        assert_eq!(stats.energy, 0);
    }

    #[test]
    fn test_average_seven() {
        let stats = StatBlock {
            health: 0,
            stability: 70,
            learning: 70,
            work_readiness: 70,
            trust: 70,
            nutrition: 70,
            hygiene: 70,
            energy: 70,
        };
        assert!((stats.average_seven() - 70.0).abs() < f32::EPSILON);
    }
}
