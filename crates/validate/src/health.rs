//! Weighted multi-factor health scoring.
//!
//! Independent of the quick heuristic in the validation summary: this is
//! the slower-moving composite used by monitoring. The two scores serve
//! different audiences and are deliberately separate APIs.

use invguard_core::{Inventory, HOTBAR_LEN, INVENTORY_SLOTS, MAX_DAMAGE, MAX_ENCHANTMENT_LEVEL,
    MAX_STACK_SIZE};
use serde::{Deserialize, Serialize};

const STRUCTURE_WEIGHT: f64 = 0.30;
const CONSISTENCY_WEIGHT: f64 = 0.20;
const OPTIMIZATION_WEIGHT: f64 = 0.20;
const USABILITY_WEIGHT: f64 = 0.30;

/// Total below which improvement suggestions are emitted.
const SUGGESTION_THRESHOLD: u32 = 80;

/// Per-factor scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthFactors {
    /// 100 iff the storage slot layout is intact, else 0.
    pub structure_integrity: u32,
    /// Deductions per out-of-range count, durability, level, or damage.
    pub data_consistency: u32,
    /// Deductions per partial stack that could merge into another.
    pub optimization_level: u32,
    /// How much of the inventory the hotbar can reach.
    pub usability: u32,
}

/// Weighted composite health score with its factor breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Weighted sum of the factors, rounded to the nearest integer.
    pub score: u32,
    /// The individual factor scores.
    pub factors: HealthFactors,
    /// Improvement hints, present when the score is below 80.
    pub suggestions: Vec<String>,
}

fn structure_integrity(inventory: &Inventory) -> u32 {
    if inventory.slots.len() == INVENTORY_SLOTS {
        100
    } else {
        0
    }
}

fn data_consistency(inventory: &Inventory) -> u32 {
    let mut anomalies: u32 = 0;
    for stack in inventory.slots.iter().flatten() {
        if stack.count == 0 || stack.count > MAX_STACK_SIZE {
            anomalies += 1;
        }
        let Some(metadata) = &stack.metadata else {
            continue;
        };
        if let Some(durability) = metadata.durability {
            if !(0.0..=1.0).contains(&durability) {
                anomalies += 1;
            }
        }
        if let Some(damage) = metadata.damage {
            if !(0..=MAX_DAMAGE).contains(&damage) {
                anomalies += 1;
            }
        }
        anomalies += metadata
            .enchantments
            .iter()
            .filter(|e| !(1..=MAX_ENCHANTMENT_LEVEL).contains(&e.level))
            .count() as u32;
    }
    100u32.saturating_sub(anomalies.saturating_mul(15))
}

/// Counts partial stacks that an earlier partial stack could absorb.
fn optimization_level(inventory: &Inventory) -> u32 {
    let partials: Vec<_> = inventory
        .slots
        .iter()
        .flatten()
        .filter(|stack| stack.count > 0 && !stack.is_full())
        .collect();

    let mut redundant: u32 = 0;
    for (i, stack) in partials.iter().enumerate() {
        if partials[..i].iter().any(|earlier| earlier.can_merge(stack)) {
            redundant += 1;
        }
    }
    100u32.saturating_sub(redundant.saturating_mul(10))
}

fn usability(inventory: &Inventory) -> u32 {
    let hotbar = &inventory.hotbar;
    let well_formed = hotbar.len() == HOTBAR_LEN
        && hotbar.iter().all(|&entry| entry < inventory.slots.len())
        && hotbar
            .iter()
            .enumerate()
            .all(|(i, entry)| !hotbar[..i].contains(entry));
    if !well_formed {
        return 40;
    }

    let occupied = inventory.occupied_slots();
    if occupied == 0 {
        return 100;
    }

    let reachable = hotbar
        .iter()
        .filter(|&&entry| inventory.get(entry).is_some())
        .count();
    let denominator = occupied.min(HOTBAR_LEN);
    ((reachable * 100) / denominator).min(100) as u32
}

/// Compute the weighted health score for an inventory.
pub fn calculate_health_score(inventory: &Inventory) -> HealthReport {
    let factors = HealthFactors {
        structure_integrity: structure_integrity(inventory),
        data_consistency: data_consistency(inventory),
        optimization_level: optimization_level(inventory),
        usability: usability(inventory),
    };

    let weighted = f64::from(factors.structure_integrity) * STRUCTURE_WEIGHT
        + f64::from(factors.data_consistency) * CONSISTENCY_WEIGHT
        + f64::from(factors.optimization_level) * OPTIMIZATION_WEIGHT
        + f64::from(factors.usability) * USABILITY_WEIGHT;
    let score = weighted.round() as u32;

    let mut suggestions = Vec::new();
    if score < SUGGESTION_THRESHOLD {
        if factors.structure_integrity < 100 {
            suggestions.push("Rebuild the storage slot layout to 36 slots".to_string());
        }
        if factors.data_consistency < 100 {
            suggestions.push("Clamp out-of-range stack counts and item metadata".to_string());
        }
        if factors.optimization_level < 100 {
            suggestions.push("Merge partial stacks of the same item".to_string());
        }
        if factors.usability < 100 {
            suggestions.push("Point hotbar entries at occupied slots".to_string());
        }
    }

    HealthReport {
        score,
        factors,
        suggestions,
    }
}
