//! End-to-end pipeline tests: validate, suggest, correct, re-validate.

use invguard::{
    auto_correct_issues, validate_inventory, ArmorSlotKind, FunctionalityImpact, Severity,
    ValidationOptions, ViolationKind,
};
use invguard_testkit::{enchanted_stack, stack, worn_stack, InventoryBuilder, JsonlSink};

fn battered_inventory() -> invguard::Inventory {
    InventoryBuilder::new()
        .slot(0, stack("stone", 70))
        .slot(3, worn_stack("iron_pickaxe", 1, 1.8))
        .slot(5, enchanted_stack("iron_sword", 1, &[("sharpness", 9)]))
        .hotbar(vec![0, 0, 2, 3, 4, 5, 6, 7, 40])
        .selected_slot(9)
        .armor(ArmorSlotKind::Helmet, stack("iron_chestplate", 1))
        .build()
}

#[test]
fn full_pipeline_repairs_what_it_can() {
    let inventory = battered_inventory();
    let options = ValidationOptions::default();

    let result = validate_inventory(&inventory, &options);
    assert!(!result.is_valid);

    let kinds: Vec<_> = result.violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::InvalidStackSize,
            ViolationKind::DuplicateHotbarSlot,
            ViolationKind::HotbarSlotOutOfBounds,
            ViolationKind::InvalidSelectedSlot,
            ViolationKind::InvalidArmorSlot,
            ViolationKind::InvalidEnchantmentLevel,
            ViolationKind::InvalidDurability,
        ]
    );

    // Every violation except the armor mismatch is repairable.
    assert_eq!(result.correction_suggestions.len(), 6);

    let outcome = auto_correct_issues(&inventory, &result.correction_suggestions, false);
    assert_eq!(outcome.applied.len(), 6);
    assert!(outcome.failed.is_empty());
    assert_eq!(
        outcome.impact.functionality_impact,
        FunctionalityImpact::Major
    );

    // Only the manual-intervention armor mismatch survives.
    let revalidated = validate_inventory(&outcome.corrected_inventory, &options);
    let kinds: Vec<_> = revalidated.violations.iter().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![ViolationKind::InvalidArmorSlot]);
    assert!(revalidated
        .violations
        .iter()
        .all(|v| !v.can_auto_correct));
}

#[test]
fn corrected_values_land_in_legal_ranges() {
    let inventory = battered_inventory();
    let result = validate_inventory(&inventory, &ValidationOptions::default());
    let outcome = auto_correct_issues(&inventory, &result.correction_suggestions, false);
    let fixed = outcome.corrected_inventory;

    assert_eq!(fixed.get(0).unwrap().count, 64);
    let pickaxe_meta = fixed.get(3).unwrap().metadata.as_ref().unwrap();
    assert_eq!(pickaxe_meta.durability, Some(1.0));
    let sword_meta = fixed.get(5).unwrap().metadata.as_ref().unwrap();
    assert_eq!(sword_meta.enchantments[0].level, 5);

    assert_eq!(fixed.selected_slot, 0);
    assert_eq!(fixed.hotbar.len(), 9);
    let mut entries = fixed.hotbar.clone();
    entries.sort_unstable();
    entries.dedup();
    assert_eq!(entries.len(), 9);
    assert!(fixed.hotbar.iter().all(|&entry| entry < 36));
}

#[test]
fn dry_run_previews_without_mutating() {
    let inventory = battered_inventory();
    let result = validate_inventory(&inventory, &ValidationOptions::default());

    let dry = auto_correct_issues(&inventory, &result.correction_suggestions, true);
    assert_eq!(dry.corrected_inventory, inventory);
    assert_eq!(dry.applied.len(), result.correction_suggestions.len());
}

#[test]
fn critical_slot_count_blocks_nothing_else() {
    let inventory = InventoryBuilder::new()
        .slot_count(30)
        .slot(2, stack("stone", 0))
        .build();

    let result = validate_inventory(&inventory, &ValidationOptions::default());
    let severities: Vec<_> = result
        .violations
        .iter()
        .map(|v| (v.kind, v.severity))
        .collect();
    assert_eq!(
        severities,
        vec![
            (ViolationKind::InvalidSlotCount, Severity::Critical),
            (ViolationKind::InvalidStackSize, Severity::Error),
        ]
    );
}

#[test]
fn validation_reports_serialize_to_jsonl() {
    let path = std::env::temp_dir().join("invguard_pipeline_reports.jsonl");
    let mut sink = JsonlSink::create(&path).unwrap();

    let result = validate_inventory(&battered_inventory(), &ValidationOptions::default());
    sink.write(&result).unwrap();
    drop(sink);

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    let parsed: invguard::ValidationResult = serde_json::from_str(line).unwrap();
    assert_eq!(parsed, result);

    std::fs::remove_file(&path).ok();
}
