#![warn(missing_docs)]
//! Inventory integrity validation and repair for a voxel sandbox.
//!
//! Facade over the workspace crates: [`invguard_core`] supplies the
//! inventory value types and [`invguard_validate`] the detection,
//! auto-correction, and health-scoring engine.
//!
//! ```
//! use invguard::{validate_inventory, Inventory, ValidationOptions};
//!
//! let mut inventory = Inventory::new();
//! inventory.selected_slot = 12;
//!
//! let result = validate_inventory(&inventory, &ValidationOptions::default());
//! assert!(!result.is_valid);
//! ```

pub use invguard_core::{
    ArmorSlotKind, ArmorSlots, Enchantment, Inventory, ItemMetadata, ItemStack, HOTBAR_LEN,
    INVENTORY_SLOTS, MAX_DAMAGE, MAX_ENCHANTMENT_LEVEL, MAX_STACK_SIZE,
};
pub use invguard_validate::{
    auto_correct_issues, calculate_health_score, validate_inventory, validate_slot,
    CorrectionImpact, CorrectionOutcome, CorrectionStep, CorrectionSuggestion, FailedCorrection,
    FunctionalityImpact, HealthFactors, HealthReport, ImpactAnalysis, InventoryValidator,
    MetadataPatch, Severity, SlotIndexError, StandardValidator, StepAction, StepTarget,
    ValidationOptions, ValidationResult, ValidationSummary, Violation, ViolationKind, Warning,
    WarningImpact, WarningKind,
};
