//! Validation orchestrator and result assembly.

use invguard_core::{Inventory, HOTBAR_LEN};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::correction::{suggest_corrections, CorrectionSuggestion};
use crate::executor::{auto_correct_issues, CorrectionOutcome};
use crate::health::{calculate_health_score, HealthReport};
use crate::options::ValidationOptions;
use crate::rules;
use crate::violation::{Violation, Warning, WarningImpact, WarningKind};

/// Occupancy ratio above which a `HighUsage` warning is emitted.
const HIGH_USAGE_RATIO: f64 = 0.9;

/// Caller-contract violation: a single-slot entry point was handed an
/// index outside the inventory. Distinct from a [`Violation`], which
/// reports data-quality findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slot index {index} outside inventory of {slot_count} slots")]
pub struct SlotIndexError {
    /// The rejected index.
    pub index: usize,
    /// Number of slots the inventory actually has.
    pub slot_count: usize,
}

/// Aggregate numbers describing an inventory at validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of storage slots present.
    pub total_slots: usize,
    /// Occupied storage slots.
    pub occupied_slots: usize,
    /// Empty storage slots.
    pub empty_slots: usize,
    /// Distinct item ids across occupied slots.
    pub unique_items: usize,
    /// Sum of stack counts.
    pub total_items: u64,
    /// Quick heuristic score: 100 with no violations, minus 10 per
    /// violation otherwise. Not the weighted monitoring score.
    pub health_score: u32,
    /// Follow-ups derived from the violation descriptions.
    pub recommended_actions: Vec<String>,
}

/// Everything one validation run produced. Built fresh per call and
/// never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no violations were found.
    pub is_valid: bool,
    /// Detector findings, in detector declaration order.
    pub violations: Vec<Violation>,
    /// Advisory observations.
    pub warnings: Vec<Warning>,
    /// One suggestion per auto-correctable violation.
    pub correction_suggestions: Vec<CorrectionSuggestion>,
    /// Aggregate numbers and the quick heuristic score.
    pub summary: ValidationSummary,
}

/// Run the enabled detectors against an inventory.
///
/// Slot-count and stack-size checks always run; the remaining detector
/// groups run under their [`ValidationOptions`] flags. Violations are
/// concatenated in detector declaration order with each detector's
/// internal order preserved.
pub fn validate_inventory(inventory: &Inventory, options: &ValidationOptions) -> ValidationResult {
    let mut violations = Vec::new();
    violations.extend(rules::detect_slot_count(inventory));
    violations.extend(rules::detect_stack_sizes(inventory));
    if options.verify_hotbar_integrity {
        violations.extend(rules::detect_hotbar(inventory));
        violations.extend(rules::detect_selected_slot(inventory));
    }
    if options.validate_armor_slots {
        violations.extend(rules::detect_armor(inventory));
    }
    if options.validate_metadata {
        violations.extend(rules::detect_metadata(inventory));
    }
    if options.check_durability_ranges {
        violations.extend(rules::detect_durability(inventory));
    }
    if options.check_item_registry {
        violations.extend(rules::detect_item_ids(inventory));
    }
    trace!(count = violations.len(), "detectors finished");

    let result = assemble_result(inventory, violations);
    debug!(
        violations = result.violations.len(),
        warnings = result.warnings.len(),
        health = result.summary.health_score,
        "inventory validation complete"
    );
    result
}

/// Validate a single storage slot.
///
/// Rejects an out-of-range index up front; this is a caller error, not
/// a finding about the inventory. For an existing slot the per-slot
/// rules run: stack size, metadata, durability.
pub fn validate_slot(inventory: &Inventory, slot: usize) -> Result<Vec<Violation>, SlotIndexError> {
    if slot >= inventory.slots.len() {
        return Err(SlotIndexError {
            index: slot,
            slot_count: inventory.slots.len(),
        });
    }

    let Some(stack) = inventory.get(slot) else {
        return Ok(Vec::new());
    };
    let mut violations = Vec::new();
    violations.extend(rules::detect_stack_size(slot, stack));
    violations.extend(rules::detect_slot_metadata(slot, stack));
    violations.extend(rules::detect_slot_durability(slot, stack));
    Ok(violations)
}

fn build_warnings(inventory: &Inventory) -> Vec<Warning> {
    let mut warnings = Vec::new();

    let total = inventory.slots.len();
    if total > 0 {
        let ratio = inventory.occupied_slots() as f64 / total as f64;
        if ratio > HIGH_USAGE_RATIO {
            warnings.push(Warning {
                kind: WarningKind::HighUsage,
                impact: WarningImpact::Performance,
                description: format!(
                    "{} of {total} storage slots are occupied",
                    inventory.occupied_slots()
                ),
            });
        }
    }

    let hotbar = &inventory.hotbar;
    let hotbar_well_formed = hotbar.len() == HOTBAR_LEN
        && hotbar.iter().all(|&entry| entry < inventory.slots.len())
        && hotbar
            .iter()
            .enumerate()
            .all(|(i, entry)| !hotbar[..i].contains(entry));
    if hotbar_well_formed && inventory.occupied_slots() >= HOTBAR_LEN {
        let reachable = hotbar
            .iter()
            .filter(|&&entry| inventory.get(entry).is_some())
            .count();
        if reachable < 3 {
            warnings.push(Warning {
                kind: WarningKind::SparseHotbar,
                impact: WarningImpact::Usability,
                description: format!(
                    "only {reachable} hotbar entries point at occupied slots"
                ),
            });
        }
    }

    warnings
}

fn summarize(inventory: &Inventory, violations: &[Violation]) -> ValidationSummary {
    let health_score = if violations.is_empty() {
        100
    } else {
        100u32.saturating_sub(10 * violations.len() as u32)
    };

    let mut recommended_actions = Vec::new();
    for violation in violations {
        if !recommended_actions.contains(&violation.description) {
            recommended_actions.push(violation.description.clone());
        }
    }

    ValidationSummary {
        total_slots: inventory.slots.len(),
        occupied_slots: inventory.occupied_slots(),
        empty_slots: inventory.empty_slots(),
        unique_items: inventory.unique_item_count(),
        total_items: inventory.total_item_count(),
        health_score,
        recommended_actions,
    }
}

fn assemble_result(inventory: &Inventory, violations: Vec<Violation>) -> ValidationResult {
    let correction_suggestions = suggest_corrections(&violations);
    let warnings = build_warnings(inventory);
    let summary = summarize(inventory, &violations);
    ValidationResult {
        is_valid: violations.is_empty(),
        violations,
        warnings,
        correction_suggestions,
        summary,
    }
}

/// The validation capability set, injected explicitly by callers.
pub trait InventoryValidator {
    /// Run the enabled detectors and assemble a full result.
    fn validate_inventory(
        &self,
        inventory: &Inventory,
        options: &ValidationOptions,
    ) -> ValidationResult;

    /// Validate one storage slot, rejecting out-of-range indices.
    fn validate_slot(
        &self,
        inventory: &Inventory,
        slot: usize,
    ) -> Result<Vec<Violation>, SlotIndexError>;

    /// Apply correction suggestions, folding left to right.
    fn auto_correct_issues(
        &self,
        inventory: &Inventory,
        suggestions: &[CorrectionSuggestion],
        dry_run: bool,
    ) -> CorrectionOutcome;

    /// Compute the weighted monitoring health score.
    fn calculate_health_score(&self, inventory: &Inventory) -> HealthReport;
}

/// The stock validator implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl InventoryValidator for StandardValidator {
    fn validate_inventory(
        &self,
        inventory: &Inventory,
        options: &ValidationOptions,
    ) -> ValidationResult {
        validate_inventory(inventory, options)
    }

    fn validate_slot(
        &self,
        inventory: &Inventory,
        slot: usize,
    ) -> Result<Vec<Violation>, SlotIndexError> {
        validate_slot(inventory, slot)
    }

    fn auto_correct_issues(
        &self,
        inventory: &Inventory,
        suggestions: &[CorrectionSuggestion],
        dry_run: bool,
    ) -> CorrectionOutcome {
        auto_correct_issues(inventory, suggestions, dry_run)
    }

    fn calculate_health_score(&self, inventory: &Inventory) -> HealthReport {
        calculate_health_score(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Severity, ViolationKind};
    use invguard_core::{ItemMetadata, ItemStack};

    fn broken_inventory() -> Inventory {
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("stone", 70)));
        inv.hotbar = vec![0, 0, 2, 3, 4, 5, 6, 7, 8];
        inv.selected_slot = 11;
        inv.armor.helmet = Some(ItemStack::new("iron_chestplate", 1));
        inv
    }

    #[test]
    fn compliant_inventory_is_valid_with_full_score() {
        let inv = invguard_testkit::compliant_inventory();

        let result = validate_inventory(&inv, &ValidationOptions::default());
        assert!(result.is_valid);
        assert!(result.violations.is_empty());
        assert!(result.correction_suggestions.is_empty());
        assert_eq!(result.summary.health_score, 100);
        assert!(result.summary.recommended_actions.is_empty());
    }

    #[test]
    fn violations_arrive_in_detector_declaration_order() {
        let result = validate_inventory(&broken_inventory(), &ValidationOptions::default());
        let kinds: Vec<_> = result.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::InvalidStackSize,
                ViolationKind::DuplicateHotbarSlot,
                ViolationKind::InvalidSelectedSlot,
                ViolationKind::InvalidArmorSlot,
            ]
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn heuristic_score_penalizes_per_violation() {
        let result = validate_inventory(&broken_inventory(), &ValidationOptions::default());
        assert_eq!(result.violations.len(), 4);
        assert_eq!(result.summary.health_score, 60);
        assert_eq!(result.summary.recommended_actions.len(), 4);
    }

    #[test]
    fn options_gate_detector_groups() {
        let result =
            validate_inventory(&broken_inventory(), &ValidationOptions::structural_only());
        let kinds: Vec<_> = result.violations.iter().map(|v| v.kind).collect();
        // Only the always-on stack-size finding survives.
        assert_eq!(kinds, vec![ViolationKind::InvalidStackSize]);
    }

    #[test]
    fn slot_count_violation_is_single_and_critical() {
        let mut inv = Inventory::new();
        inv.slots.truncate(35);

        let result = validate_inventory(&inv, &ValidationOptions::default());
        let slot_count: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.kind == ViolationKind::InvalidSlotCount)
            .collect();
        assert_eq!(slot_count.len(), 1);
        assert_eq!(slot_count[0].severity, Severity::Critical);
        assert!(!slot_count[0].can_auto_correct);
        assert!(!result.is_valid);
    }

    #[test]
    fn validation_is_deterministic() {
        let inv = broken_inventory();
        let options = ValidationOptions::default();
        let first = validate_inventory(&inv, &options);
        let second = validate_inventory(&inv, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn high_usage_warning_above_ninety_percent() {
        let mut inv = Inventory::new();
        for slot in 0..32 {
            inv.set(slot, Some(ItemStack::new("stone", 1)));
        }
        let result = validate_inventory(&inv, &ValidationOptions::default());
        assert!(result
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::HighUsage));

        inv.set(32, Some(ItemStack::new("stone", 1)));
        let result = validate_inventory(&inv, &ValidationOptions::default());
        let high_usage: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::HighUsage)
            .collect();
        assert_eq!(high_usage.len(), 1);
        assert_eq!(high_usage[0].impact, WarningImpact::Performance);
    }

    #[test]
    fn sparse_hotbar_warning_for_unreachable_items() {
        let mut inv = Inventory::new();
        for slot in 9..20 {
            inv.set(slot, Some(ItemStack::new("dirt", 1)));
        }

        let result = validate_inventory(&inv, &ValidationOptions::default());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::SparseHotbar
                && w.impact == WarningImpact::Usability));
    }

    #[test]
    fn summary_counts_items() {
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("stone", 64)));
        inv.set(5, Some(ItemStack::new("stone", 16)));
        inv.set(9, Some(ItemStack::new("torch", 4)));

        let result = validate_inventory(&inv, &ValidationOptions::default());
        assert_eq!(result.summary.total_slots, 36);
        assert_eq!(result.summary.occupied_slots, 3);
        assert_eq!(result.summary.empty_slots, 33);
        assert_eq!(result.summary.unique_items, 2);
        assert_eq!(result.summary.total_items, 84);
    }

    #[test]
    fn validate_slot_rejects_out_of_range_index() {
        let inv = Inventory::new();
        let err = validate_slot(&inv, 36).unwrap_err();
        assert_eq!(
            err,
            SlotIndexError {
                index: 36,
                slot_count: 36,
            }
        );
    }

    #[test]
    fn validate_slot_runs_per_slot_rules() {
        let mut inv = Inventory::new();
        inv.set(
            4,
            Some(ItemStack::with_metadata(
                "pickaxe",
                0,
                ItemMetadata {
                    durability: Some(-1.0),
                    ..ItemMetadata::default()
                },
            )),
        );

        let violations = validate_slot(&inv, 4).unwrap();
        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::InvalidStackSize,
                ViolationKind::InvalidDurability,
            ]
        );
        assert!(validate_slot(&inv, 5).unwrap().is_empty());
    }

    #[test]
    fn standard_validator_implements_the_capability_set() {
        let validator: &dyn InventoryValidator = &StandardValidator;
        let inv = broken_inventory();

        let result = validator.validate_inventory(&inv, &ValidationOptions::default());
        let outcome =
            validator.auto_correct_issues(&inv, &result.correction_suggestions, false);
        assert!(!outcome.applied.is_empty());

        let revalidated =
            validator.validate_inventory(&outcome.corrected_inventory, &ValidationOptions::default());
        assert!(revalidated.violations.len() < result.violations.len());

        let report = validator.calculate_health_score(&inv);
        assert!(report.score <= 100);
    }
}
