//! Violation and warning records produced by the rule detectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How serious a violation is for inventory integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The inventory is structurally unusable until repaired.
    Critical,
    /// A structural defect that should be repaired before persisting.
    Error,
    /// A data-quality defect that degrades but does not break the inventory.
    Warning,
}

/// Closed enumeration of everything the detectors can find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Storage slot count differs from the fixed layout.
    InvalidSlotCount,
    /// An occupied slot holds a stack with a count outside `[1, 64]`.
    InvalidStackSize,
    /// Hotbar length differs from 9.
    InvalidHotbarLength,
    /// The same storage slot appears more than once in the hotbar.
    DuplicateHotbarSlot,
    /// A hotbar entry points outside the storage slots.
    HotbarSlotOutOfBounds,
    /// Selected slot outside `[0, 8]`.
    InvalidSelectedSlot,
    /// An armor slot holds a piece that belongs elsewhere.
    InvalidArmorSlot,
    /// An enchantment level outside `[1, 5]`.
    InvalidEnchantmentLevel,
    /// A damage value outside `[0, 1000]`.
    InvalidDamageValue,
    /// A durability ratio outside `[0.0, 1.0]`.
    InvalidDurability,
    /// An item id that no registry would accept.
    UnknownItemId,
}

/// A detected structural or data-quality defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// What rule was broken.
    pub kind: ViolationKind,
    /// How serious the defect is.
    pub severity: Severity,
    /// Human-readable summary.
    pub description: String,
    /// Slot indices involved, empty for inventory-wide defects.
    pub affected_slots: Vec<usize>,
    /// The offending value as observed.
    pub detected_value: Value,
    /// The value a repair would install, when one exists.
    pub expected_value: Option<Value>,
    /// Whether the auto-correction executor can repair this defect.
    pub can_auto_correct: bool,
}

/// Advisory impact category for warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningImpact {
    /// Slows down inventory operations.
    Performance,
    /// Makes the inventory awkward to use in play.
    Usability,
    /// Will cause trouble for future maintenance.
    Maintenance,
}

/// Kinds of advisory warnings the result assembler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// More than 90% of storage slots are occupied.
    HighUsage,
    /// Almost no hotbar entries point at occupied slots.
    SparseHotbar,
}

/// An advisory, non-blocking observation about an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// What was observed.
    pub kind: WarningKind,
    /// Which aspect of play it affects.
    pub impact: WarningImpact,
    /// Human-readable summary.
    pub description: String,
}
