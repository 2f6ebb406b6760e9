//! Derived hope score.
//!
//! Hope is never stored as its own entity; it is a pure function of the
//! upgrade ratio and the residents' current attributes, recomputed on
//! demand. The computation is idempotent and independent of resident
//! ordering.
//!
//! `Hope = clamp(round(U*60 + A*4), 0, 100)` where `U` is the fraction
//! of upgrades placed (1.0 when the catalog defines none) and `A` is
//! the mean seven-attribute average across residents divided by 10
//! (0 with no residents).

use crate::stats::StatBlock;

/// Compute hope from raw inputs. `averages` holds each resident's
/// seven-attribute average (0.0..=100.0).
pub fn hope_score(upgrades_done: u32, total_upgrades: u32, averages: &[f32]) -> u8 {
    let u = if total_upgrades == 0 {
        1.0
    } else {
        (upgrades_done as f32 / total_upgrades as f32).clamp(0.0, 1.0)
    };
    let a = if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f32>() / averages.len() as f32 / 10.0
    };
    (u * 60.0 + a * 4.0).round().clamp(0.0, 100.0) as u8
}

/// Convenience wrapper over whole stat blocks.
pub fn hope_from_stats(upgrades_done: u32, total_upgrades: u32, residents: &[StatBlock]) -> u8 {
    let averages: Vec<f32> = residents.iter().map(StatBlock::average_seven).collect();
    hope_score(upgrades_done, total_upgrades, &averages)
}
