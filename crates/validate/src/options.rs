//! Validation configuration surface.

use serde::{Deserialize, Serialize};

/// Enables or disables individual detector groups.
///
/// The slot-count and stack-size checks always run regardless of these
/// flags; `check_stack_limits`, `detect_duplicates`, and
/// `perform_deep_validation` are accepted for configuration
/// compatibility and currently gate no additional detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Validate item ids against registry naming rules.
    pub check_item_registry: bool,
    /// Run enchantment-level and damage-value checks.
    pub validate_metadata: bool,
    /// Reserved; stack limits are always checked.
    pub check_stack_limits: bool,
    /// Run hotbar length/duplicate/range and selected-slot checks.
    pub verify_hotbar_integrity: bool,
    /// Run the armor slot-match check.
    pub validate_armor_slots: bool,
    /// Run the durability range check.
    pub check_durability_ranges: bool,
    /// Reserved for a cross-slot duplicate-item detector.
    pub detect_duplicates: bool,
    /// Reserved for recursive container validation.
    pub perform_deep_validation: bool,
}

impl ValidationOptions {
    /// Only the checks that cannot be disabled.
    pub fn structural_only() -> Self {
        Self {
            check_item_registry: false,
            validate_metadata: false,
            check_stack_limits: true,
            verify_hotbar_integrity: false,
            validate_armor_slots: false,
            check_durability_ranges: false,
            detect_duplicates: false,
            perform_deep_validation: false,
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_item_registry: true,
            validate_metadata: true,
            check_stack_limits: true,
            verify_hotbar_integrity: true,
            validate_armor_slots: true,
            check_durability_ranges: true,
            detect_duplicates: true,
            perform_deep_validation: true,
        }
    }
}
