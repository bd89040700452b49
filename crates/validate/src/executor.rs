//! Auto-correction executor.
//!
//! Applies correction suggestions to a working copy of the inventory.
//! Suggestions are folded strictly left to right: each successful
//! application's output inventory is the input to the next, so two
//! corrections touching the same slot compose instead of the later one
//! silently discarding the earlier one's effect.

use std::collections::BTreeSet;

use invguard_core::{Inventory, ItemStack};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::correction::{CorrectionStep, CorrectionSuggestion, MetadataPatch, StepAction, StepTarget};

/// Coarse ordinal for how much applied corrections change gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum FunctionalityImpact {
    /// Nothing was applied.
    None,
    /// One or two corrections applied.
    Minor,
    /// Three to five corrections applied.
    Moderate,
    /// More than five corrections applied.
    Major,
}

/// Summary of what a correction run changed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImpactAnalysis {
    /// Number of stacks created, replaced, patched, or removed.
    pub items_affected: usize,
    /// Number of distinct storage slots modified.
    pub slots_modified: usize,
    /// Coarse gameplay impact.
    pub functionality_impact: FunctionalityImpact,
}

/// A suggestion the executor could not apply, with the reason.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FailedCorrection {
    /// The suggestion as received.
    pub suggestion: CorrectionSuggestion,
    /// Why it was not applied.
    pub reason: String,
}

/// Result of one auto-correction run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CorrectionOutcome {
    /// The folded working copy; equals the input when nothing applied.
    pub corrected_inventory: Inventory,
    /// Suggestions applied (or, in a dry run, that would be attempted).
    pub applied: Vec<CorrectionSuggestion>,
    /// Suggestions skipped or rejected, each with its reason.
    pub failed: Vec<FailedCorrection>,
    /// What the run changed.
    pub impact: ImpactAnalysis,
}

#[derive(Debug, Error)]
enum ApplyError {
    #[error("step is missing a slot index")]
    MissingSlotIndex,
    #[error("slot {0} is outside the inventory")]
    SlotOutOfBounds(usize),
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("step is missing a replacement value")]
    MissingValue,
    #[error("replacement value has the wrong shape: {0}")]
    MalformedValue(String),
    #[error("{action:?} on {target:?} is not an automated repair")]
    Unsupported {
        action: StepAction,
        target: StepTarget,
    },
    #[error("suggestion requires manual intervention")]
    ManualOnly,
}

#[derive(Default)]
struct EffectTracker {
    items_affected: usize,
    slots_modified: BTreeSet<usize>,
}

impl EffectTracker {
    fn touched(&mut self, slot: usize) {
        self.items_affected += 1;
        self.slots_modified.insert(slot);
    }

    fn absorb(&mut self, other: EffectTracker) {
        self.items_affected += other.items_affected;
        self.slots_modified.extend(other.slots_modified);
    }
}

fn slot_index(step: &CorrectionStep) -> Result<usize, ApplyError> {
    step.slot_index.ok_or(ApplyError::MissingSlotIndex)
}

fn required_value(step: &CorrectionStep) -> Result<&Value, ApplyError> {
    step.new_value.as_ref().ok_or(ApplyError::MissingValue)
}

fn stack_at(inventory: &Inventory, slot: usize) -> Result<&ItemStack, ApplyError> {
    if slot >= inventory.slots.len() {
        return Err(ApplyError::SlotOutOfBounds(slot));
    }
    inventory.get(slot).ok_or(ApplyError::EmptySlot(slot))
}

fn apply_metadata_patch(stack: &ItemStack, patch: MetadataPatch) -> ItemStack {
    let mut metadata = stack.metadata.clone().unwrap_or_default();
    match patch {
        MetadataPatch::Enchantment { id, level } => {
            for enchantment in &mut metadata.enchantments {
                if enchantment.id == id {
                    enchantment.level = level;
                }
            }
        }
        MetadataPatch::Damage(damage) => metadata.damage = Some(damage),
        MetadataPatch::Durability(durability) => metadata.durability = Some(durability),
    }
    stack.replace_metadata(Some(metadata))
}

fn apply_step(
    inventory: &mut Inventory,
    step: &CorrectionStep,
    effects: &mut EffectTracker,
) -> Result<(), ApplyError> {
    match (step.action, step.target) {
        (StepAction::Update, StepTarget::Slot) => {
            let slot = slot_index(step)?;
            if slot >= inventory.slots.len() {
                return Err(ApplyError::SlotOutOfBounds(slot));
            }
            match required_value(step)? {
                Value::Null => {
                    inventory.set(slot, None);
                }
                Value::Number(count) => {
                    let count = count
                        .as_u64()
                        .and_then(|c| u32::try_from(c).ok())
                        .ok_or_else(|| {
                            ApplyError::MalformedValue("count is not a u32".to_string())
                        })?;
                    let replacement = stack_at(inventory, slot)?.replace_count(count);
                    inventory.set(slot, Some(replacement));
                }
                value => {
                    let replacement: ItemStack = serde_json::from_value(value.clone())
                        .map_err(|err| ApplyError::MalformedValue(err.to_string()))?;
                    inventory.set(slot, Some(replacement));
                }
            }
            effects.touched(slot);
            Ok(())
        }
        (StepAction::Remove, StepTarget::Slot) => {
            let slot = slot_index(step)?;
            if slot >= inventory.slots.len() {
                return Err(ApplyError::SlotOutOfBounds(slot));
            }
            if inventory.get(slot).is_some() {
                inventory.set(slot, None);
                effects.touched(slot);
            }
            Ok(())
        }
        (StepAction::Update, StepTarget::Metadata) => {
            let slot = slot_index(step)?;
            let patch: MetadataPatch = serde_json::from_value(required_value(step)?.clone())
                .map_err(|err| ApplyError::MalformedValue(err.to_string()))?;
            let replacement = apply_metadata_patch(stack_at(inventory, slot)?, patch);
            inventory.set(slot, Some(replacement));
            effects.touched(slot);
            Ok(())
        }
        (StepAction::Update, StepTarget::Hotbar) => {
            let entries: Vec<usize> = serde_json::from_value(required_value(step)?.clone())
                .map_err(|err| ApplyError::MalformedValue(err.to_string()))?;
            if entries.len() != invguard_core::HOTBAR_LEN {
                return Err(ApplyError::MalformedValue(format!(
                    "hotbar replacement has {} entries",
                    entries.len()
                )));
            }
            inventory.hotbar = entries;
            Ok(())
        }
        (StepAction::Reset, StepTarget::Hotbar) => {
            inventory.selected_slot = match &step.new_value {
                Some(value) => value
                    .as_u64()
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(|| {
                        ApplyError::MalformedValue("selected slot is not an index".to_string())
                    })?,
                None => 0,
            };
            Ok(())
        }
        // Armor swaps and stack moves are never automated.
        (action, target) => Err(ApplyError::Unsupported { action, target }),
    }
}

fn apply_suggestion(
    working: &Inventory,
    suggestion: &CorrectionSuggestion,
) -> Result<(Inventory, EffectTracker), ApplyError> {
    if !suggestion.automated {
        return Err(ApplyError::ManualOnly);
    }
    // Steps run against a scratch copy and a scratch tracker so a
    // failing step leaves the fold's accumulator and the impact
    // counters untouched.
    let mut scratch = working.clone();
    let mut effects = EffectTracker::default();
    for step in &suggestion.steps {
        apply_step(&mut scratch, step, &mut effects)?;
    }
    Ok((scratch, effects))
}

fn functionality_impact(applied: usize) -> FunctionalityImpact {
    match applied {
        0 => FunctionalityImpact::None,
        1..=2 => FunctionalityImpact::Minor,
        3..=5 => FunctionalityImpact::Moderate,
        _ => FunctionalityImpact::Major,
    }
}

/// Apply `suggestions` to a working copy of `inventory`.
///
/// With `dry_run` the inventory is returned untouched while the
/// suggestions a real run would attempt are still reported as applied.
/// A failing suggestion is recorded with its reason and the remaining
/// suggestions are still processed.
pub fn auto_correct_issues(
    inventory: &Inventory,
    suggestions: &[CorrectionSuggestion],
    dry_run: bool,
) -> CorrectionOutcome {
    let mut working = inventory.clone();
    let mut applied = Vec::new();
    let mut failed = Vec::new();
    let mut effects = EffectTracker::default();

    for suggestion in suggestions {
        if dry_run {
            if suggestion.automated {
                applied.push(suggestion.clone());
            } else {
                failed.push(FailedCorrection {
                    suggestion: suggestion.clone(),
                    reason: ApplyError::ManualOnly.to_string(),
                });
            }
            continue;
        }

        match apply_suggestion(&working, suggestion) {
            Ok((next, suggestion_effects)) => {
                debug!(suggestion = %suggestion.description, "correction applied");
                working = next;
                effects.absorb(suggestion_effects);
                applied.push(suggestion.clone());
            }
            Err(err) => {
                warn!(
                    suggestion = %suggestion.description,
                    reason = %err,
                    "correction failed"
                );
                failed.push(FailedCorrection {
                    suggestion: suggestion.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let impact = ImpactAnalysis {
        items_affected: effects.items_affected,
        slots_modified: effects.slots_modified.len(),
        functionality_impact: functionality_impact(applied.len()),
    };
    CorrectionOutcome {
        corrected_inventory: working,
        applied,
        failed,
        impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::suggest_corrections;
    use crate::rules;
    use invguard_core::{Enchantment, ItemMetadata};
    use serde_json::json;

    fn suggestion_with_step(step: CorrectionStep) -> CorrectionSuggestion {
        CorrectionSuggestion {
            description: "test".to_string(),
            automated: true,
            impact: crate::correction::CorrectionImpact::Low,
            prerequisites: Vec::new(),
            steps: vec![step],
        }
    }

    #[test]
    fn count_clamp_applies_to_existing_stack() {
        let mut inv = Inventory::new();
        inv.set(2, Some(ItemStack::new("sand", 80)));
        let suggestions = suggest_corrections(&rules::detect_stack_sizes(&inv));

        let outcome = auto_correct_issues(&inv, &suggestions, false);
        assert_eq!(outcome.applied.len(), 1);
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.corrected_inventory.get(2).unwrap().count, 64);
        assert_eq!(outcome.corrected_inventory.get(2).unwrap().item_id, "sand");
        assert_eq!(outcome.impact.slots_modified, 1);
        assert_eq!(outcome.impact.items_affected, 1);
        assert_eq!(
            outcome.impact.functionality_impact,
            FunctionalityImpact::Minor
        );
    }

    #[test]
    fn corrections_on_the_same_slot_compose() {
        let meta = ItemMetadata {
            durability: Some(2.0),
            enchantments: vec![Enchantment::new("sharpness", 9)],
            damage: Some(-5),
            ..ItemMetadata::default()
        };
        let mut inv = Inventory::new();
        inv.set(6, Some(ItemStack::with_metadata("iron_sword", 1, meta)));

        let mut violations = rules::detect_metadata(&inv);
        violations.extend(rules::detect_durability(&inv));
        let suggestions = suggest_corrections(&violations);
        assert_eq!(suggestions.len(), 3);

        let outcome = auto_correct_issues(&inv, &suggestions, false);
        assert_eq!(outcome.applied.len(), 3);
        assert!(outcome.failed.is_empty());

        // All three patches landed on the same stack.
        let fixed = outcome.corrected_inventory.get(6).unwrap();
        let metadata = fixed.metadata.as_ref().unwrap();
        assert_eq!(metadata.enchantments[0].level, 5);
        assert_eq!(metadata.damage, Some(0));
        assert_eq!(metadata.durability, Some(1.0));
        assert_eq!(outcome.impact.slots_modified, 1);
        assert_eq!(outcome.impact.items_affected, 3);
    }

    #[test]
    fn dry_run_leaves_inventory_untouched() {
        let mut inv = Inventory::new();
        inv.set(2, Some(ItemStack::new("sand", 80)));
        inv.selected_slot = 12;

        let mut violations = rules::detect_stack_sizes(&inv);
        violations.extend(rules::detect_selected_slot(&inv));
        let suggestions = suggest_corrections(&violations);

        let dry = auto_correct_issues(&inv, &suggestions, true);
        assert_eq!(dry.corrected_inventory, inv);
        assert_eq!(dry.impact.items_affected, 0);

        // Same applied set as a real run would attempt.
        let wet = auto_correct_issues(&inv, &suggestions, false);
        let dry_descriptions: Vec<_> =
            dry.applied.iter().map(|s| s.description.clone()).collect();
        let wet_descriptions: Vec<_> =
            wet.applied.iter().map(|s| s.description.clone()).collect();
        assert_eq!(dry_descriptions, wet_descriptions);
        assert_ne!(wet.corrected_inventory, inv);
    }

    #[test]
    fn failure_does_not_abort_remaining_suggestions() {
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("stone", 70)));

        let broken = suggestion_with_step(CorrectionStep {
            action: StepAction::Update,
            target: StepTarget::Slot,
            slot_index: Some(50),
            new_value: Some(json!(10)),
            reason: "out of bounds on purpose".to_string(),
        });
        let good = suggest_corrections(&rules::detect_stack_sizes(&inv));

        let mut suggestions = vec![broken];
        suggestions.extend(good);
        let outcome = auto_correct_issues(&inv, &suggestions, false);

        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].reason.contains("slot 50"));
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.corrected_inventory.get(0).unwrap().count, 64);
    }

    #[test]
    fn failed_suggestion_leaves_accumulator_untouched() {
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("stone", 10)));

        // First step succeeds, second fails: the whole suggestion must
        // roll back.
        let partial = CorrectionSuggestion {
            description: "two steps, second bad".to_string(),
            automated: true,
            impact: crate::correction::CorrectionImpact::Low,
            prerequisites: Vec::new(),
            steps: vec![
                CorrectionStep {
                    action: StepAction::Update,
                    target: StepTarget::Slot,
                    slot_index: Some(0),
                    new_value: Some(json!(5)),
                    reason: "ok".to_string(),
                },
                CorrectionStep {
                    action: StepAction::Update,
                    target: StepTarget::Metadata,
                    slot_index: Some(30),
                    new_value: Some(json!({"Damage": 1})),
                    reason: "empty slot".to_string(),
                },
            ],
        };

        let outcome = auto_correct_issues(&inv, &[partial], false);
        assert_eq!(outcome.applied.len(), 0);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.corrected_inventory.get(0).unwrap().count, 10);
    }

    #[test]
    fn manual_suggestions_are_recorded_as_failed() {
        let inv = Inventory::new();
        let manual = CorrectionSuggestion {
            description: "swap armor".to_string(),
            automated: false,
            impact: crate::correction::CorrectionImpact::High,
            prerequisites: vec!["player consent".to_string()],
            steps: Vec::new(),
        };

        let outcome = auto_correct_issues(&inv, &[manual.clone()], false);
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].reason.contains("manual"));

        // Dry run classifies it the same way.
        let dry = auto_correct_issues(&inv, &[manual], true);
        assert_eq!(dry.failed.len(), 1);
    }

    #[test]
    fn hotbar_and_selected_slot_repairs() {
        let mut inv = Inventory::new();
        inv.hotbar = vec![0, 1, 2, 3, 4, 5, 6, 7, 40];
        inv.selected_slot = 9;

        let mut violations = rules::detect_hotbar(&inv);
        violations.extend(rules::detect_selected_slot(&inv));
        let outcome = auto_correct_issues(&inv, &suggest_corrections(&violations), false);

        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.corrected_inventory.selected_slot, 0);
        assert_eq!(outcome.corrected_inventory.hotbar[..8], [0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(outcome.corrected_inventory.hotbar[8] < 36);
        assert_ne!(outcome.corrected_inventory.hotbar[8], 40);
    }

    #[test]
    fn unsupported_step_is_rejected_with_reason() {
        let inv = Inventory::new();
        let swap = suggestion_with_step(CorrectionStep {
            action: StepAction::Move,
            target: StepTarget::Armor,
            slot_index: None,
            new_value: None,
            reason: "equipment swap".to_string(),
        });

        let outcome = auto_correct_issues(&inv, &[swap], false);
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].reason.contains("not an automated repair"));
        assert_eq!(
            outcome.impact.functionality_impact,
            FunctionalityImpact::None
        );
    }

    #[test]
    fn empty_run_reports_no_impact() {
        let inv = Inventory::new();
        let outcome = auto_correct_issues(&inv, &[], false);

        assert_eq!(outcome.corrected_inventory, inv);
        assert!(outcome.applied.is_empty());
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.impact.items_affected, 0);
        assert_eq!(outcome.impact.slots_modified, 0);
        assert_eq!(
            outcome.impact.functionality_impact,
            FunctionalityImpact::None
        );
    }
}
