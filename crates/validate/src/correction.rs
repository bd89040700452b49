//! Correction suggestions: the bridge between detected violations and
//! the auto-correction executor.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::violation::{Violation, ViolationKind};

/// What a correction step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    /// Remove the targeted value.
    Remove,
    /// Replace the targeted value with `new_value`.
    Update,
    /// Move a stack between slots.
    Move,
    /// Restore the targeted value to its default.
    Reset,
}

/// Which part of the inventory a correction step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepTarget {
    /// A storage slot's stack.
    Slot,
    /// A stack's metadata.
    Metadata,
    /// The hotbar or selected-slot pointer.
    Hotbar,
    /// An armor slot.
    Armor,
}

/// One ordered step of a correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionStep {
    /// What to do.
    pub action: StepAction,
    /// Where to do it.
    pub target: StepTarget,
    /// Storage slot the step applies to, when slot-scoped.
    pub slot_index: Option<usize>,
    /// Replacement payload, interpreted per `(action, target)`.
    pub new_value: Option<Value>,
    /// Why this step exists.
    pub reason: String,
}

/// How disruptive applying a suggestion is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionImpact {
    /// Metadata-only adjustment, nothing moves.
    Low,
    /// Stack contents or hotbar arrangement change.
    Medium,
    /// Items may be removed or relocated.
    High,
}

/// A suggested fix for one violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSuggestion {
    /// Human-readable summary of the fix.
    pub description: String,
    /// Whether the executor may apply this without player consent.
    pub automated: bool,
    /// Expected disruption.
    pub impact: CorrectionImpact,
    /// Conditions the caller must ensure before applying.
    pub prerequisites: Vec<String>,
    /// Ordered steps that implement the fix.
    pub steps: Vec<CorrectionStep>,
}

/// A slot-scoped metadata edit carried in a correction step's `new_value`.
///
/// Patches are granular on purpose: each one edits a single field of the
/// stack's current metadata, so two patches against the same slot compose
/// under the executor's sequential fold instead of overwriting each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataPatch {
    /// Set the level of the named enchantment.
    Enchantment {
        /// Enchantment identifier.
        id: String,
        /// Replacement level.
        level: u32,
    },
    /// Set the accumulated damage value.
    Damage(i32),
    /// Set the durability ratio.
    Durability(f32),
}

fn update_slot_step(violation: &Violation, reason: &str) -> Option<CorrectionStep> {
    Some(CorrectionStep {
        action: StepAction::Update,
        target: StepTarget::Slot,
        slot_index: violation.affected_slots.first().copied(),
        new_value: violation.expected_value.clone(),
        reason: reason.to_string(),
    })
}

fn metadata_step(violation: &Violation, patch: MetadataPatch, reason: &str) -> Option<CorrectionStep> {
    Some(CorrectionStep {
        action: StepAction::Update,
        target: StepTarget::Metadata,
        slot_index: violation.affected_slots.first().copied(),
        new_value: serde_json::to_value(patch).ok(),
        reason: reason.to_string(),
    })
}

/// Build the single step that repairs one auto-correctable violation.
///
/// The step vocabulary follows the violation kind: slot-scoped count
/// clamps are `Update`/`Slot` against the violation's first affected
/// slot and expected value, metadata clamps are granular
/// `Update`/`Metadata` patches, hotbar repairs replace the whole entry
/// list, and the selected slot is a `Reset`. Kinds the executor must
/// never touch (armor, registry ids, slot count) yield no step.
fn step_for(violation: &Violation) -> Option<CorrectionStep> {
    match violation.kind {
        ViolationKind::InvalidStackSize => {
            update_slot_step(violation, "clamp stack count to the legal range")
        }
        ViolationKind::InvalidHotbarLength
        | ViolationKind::DuplicateHotbarSlot
        | ViolationKind::HotbarSlotOutOfBounds => Some(CorrectionStep {
            action: StepAction::Update,
            target: StepTarget::Hotbar,
            slot_index: None,
            new_value: violation.expected_value.clone(),
            reason: "replace the hotbar with its repaired layout".to_string(),
        }),
        ViolationKind::InvalidSelectedSlot => Some(CorrectionStep {
            action: StepAction::Reset,
            target: StepTarget::Hotbar,
            slot_index: None,
            new_value: Some(json!(0)),
            reason: "reset the selected slot to the first hotbar entry".to_string(),
        }),
        ViolationKind::InvalidEnchantmentLevel => {
            let patch = violation
                .expected_value
                .clone()
                .and_then(|value| serde_json::from_value::<MetadataPatchEnchantment>(value).ok())?;
            metadata_step(
                violation,
                MetadataPatch::Enchantment {
                    id: patch.id,
                    level: patch.level,
                },
                "clamp the enchantment level to the legal range",
            )
        }
        ViolationKind::InvalidDamageValue => {
            let damage = violation
                .expected_value
                .as_ref()
                .and_then(Value::as_i64)
                .map(|v| v as i32)?;
            metadata_step(
                violation,
                MetadataPatch::Damage(damage),
                "clamp the damage value to the legal range",
            )
        }
        ViolationKind::InvalidDurability => {
            let durability = violation
                .expected_value
                .as_ref()
                .and_then(Value::as_f64)
                .map(|v| v as f32)?;
            metadata_step(
                violation,
                MetadataPatch::Durability(durability),
                "clamp the durability ratio to the legal range",
            )
        }
        ViolationKind::InvalidSlotCount
        | ViolationKind::InvalidArmorSlot
        | ViolationKind::UnknownItemId => None,
    }
}

#[derive(Deserialize)]
struct MetadataPatchEnchantment {
    id: String,
    level: u32,
}

fn impact_for(kind: ViolationKind) -> CorrectionImpact {
    match kind {
        ViolationKind::InvalidStackSize
        | ViolationKind::InvalidHotbarLength
        | ViolationKind::DuplicateHotbarSlot
        | ViolationKind::HotbarSlotOutOfBounds => CorrectionImpact::Medium,
        _ => CorrectionImpact::Low,
    }
}

/// One suggestion per auto-correctable violation, in violation order.
pub(crate) fn suggest_corrections(violations: &[Violation]) -> Vec<CorrectionSuggestion> {
    violations
        .iter()
        .filter(|violation| violation.can_auto_correct)
        .filter_map(|violation| {
            let step = step_for(violation)?;
            Some(CorrectionSuggestion {
                description: format!("Fix: {}", violation.description),
                automated: true,
                impact: impact_for(violation.kind),
                prerequisites: Vec::new(),
                steps: vec![step],
            })
        })
        .collect()
}
