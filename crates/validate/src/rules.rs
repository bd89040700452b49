//! Rule detectors and their tagged classification outcomes.
//!
//! Every rule is split in two: a classify step that computes a closed
//! outcome value (`Valid` or one concrete invalid variant carrying the
//! exact offending data) and a render step that exhaustively matches the
//! outcome into zero-or-one [`Violation`]. A new outcome variant cannot
//! be added without the compiler demanding its render arm, so no failure
//! shape can be silently skipped. Detection never touches message
//! formatting and vice versa.
//!
//! All detectors are total, side-effect-free functions of the inventory.

use invguard_core::{
    ArmorSlotKind, Enchantment, Inventory, ItemStack, HOTBAR_LEN, INVENTORY_SLOTS, MAX_DAMAGE,
    MAX_ENCHANTMENT_LEVEL, MAX_STACK_SIZE,
};
use serde_json::json;

use crate::violation::{Severity, Violation, ViolationKind};

// ---------------------------------------------------------------------------
// Slot count
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotCountOutcome {
    Valid,
    WrongCount { found: usize },
}

pub(crate) fn classify_slot_count(inventory: &Inventory) -> SlotCountOutcome {
    if inventory.slots.len() == INVENTORY_SLOTS {
        SlotCountOutcome::Valid
    } else {
        SlotCountOutcome::WrongCount {
            found: inventory.slots.len(),
        }
    }
}

fn render_slot_count(outcome: SlotCountOutcome) -> Option<Violation> {
    match outcome {
        SlotCountOutcome::Valid => None,
        SlotCountOutcome::WrongCount { found } => Some(Violation {
            kind: ViolationKind::InvalidSlotCount,
            severity: Severity::Critical,
            description: format!("inventory has {found} storage slots, expected {INVENTORY_SLOTS}"),
            affected_slots: Vec::new(),
            detected_value: json!(found),
            expected_value: Some(json!(INVENTORY_SLOTS)),
            can_auto_correct: false,
        }),
    }
}

pub(crate) fn detect_slot_count(inventory: &Inventory) -> Vec<Violation> {
    render_slot_count(classify_slot_count(inventory))
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Stack size
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StackSizeOutcome {
    Valid,
    OutOfRange { slot: usize, count: u32 },
}

pub(crate) fn classify_stack_size(slot: usize, stack: &ItemStack) -> StackSizeOutcome {
    if stack.count == 0 || stack.count > MAX_STACK_SIZE {
        StackSizeOutcome::OutOfRange {
            slot,
            count: stack.count,
        }
    } else {
        StackSizeOutcome::Valid
    }
}

fn render_stack_size(outcome: StackSizeOutcome) -> Option<Violation> {
    match outcome {
        StackSizeOutcome::Valid => None,
        StackSizeOutcome::OutOfRange { slot, count } => Some(Violation {
            kind: ViolationKind::InvalidStackSize,
            severity: Severity::Error,
            description: format!("slot {slot} holds a stack of {count}, legal range is 1-{MAX_STACK_SIZE}"),
            affected_slots: vec![slot],
            detected_value: json!(count),
            expected_value: Some(json!(count.clamp(1, MAX_STACK_SIZE))),
            can_auto_correct: true,
        }),
    }
}

pub(crate) fn detect_stack_size(slot: usize, stack: &ItemStack) -> Vec<Violation> {
    render_stack_size(classify_stack_size(slot, stack))
        .into_iter()
        .collect()
}

pub(crate) fn detect_stack_sizes(inventory: &Inventory) -> Vec<Violation> {
    occupied(inventory)
        .flat_map(|(slot, stack)| detect_stack_size(slot, stack))
        .collect()
}

// ---------------------------------------------------------------------------
// Hotbar: length, duplicates, range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HotbarLengthOutcome {
    Valid,
    WrongLength { found: usize, repaired: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HotbarDuplicatesOutcome {
    Valid,
    Duplicates {
        values: Vec<usize>,
        repaired: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HotbarRangeOutcome {
    Valid,
    OutOfBounds {
        values: Vec<usize>,
        repaired: Vec<usize>,
    },
}

/// Deterministic hotbar repair: keep the first occurrence of every
/// in-range entry, replace duplicates and out-of-range entries with the
/// smallest storage indices not already referenced, and force the result
/// to exactly [`HOTBAR_LEN`] entries.
pub(crate) fn repaired_hotbar(hotbar: &[usize]) -> Vec<usize> {
    let mut referenced = [false; INVENTORY_SLOTS];
    let mut kept: Vec<Option<usize>> = hotbar
        .iter()
        .take(HOTBAR_LEN)
        .map(|&entry| {
            if entry < INVENTORY_SLOTS && !referenced[entry] {
                referenced[entry] = true;
                Some(entry)
            } else {
                None
            }
        })
        .collect();
    kept.resize(HOTBAR_LEN, None);

    let mut unused = (0..INVENTORY_SLOTS).filter(|&slot| !referenced[slot]);
    kept.into_iter()
        .map(|entry| match entry {
            Some(slot) => slot,
            // A hotbar references at most 9 of 36 slots, so an unused
            // slot always exists; 0 is unreachable.
            None => unused.next().unwrap_or(0),
        })
        .collect()
}

pub(crate) fn classify_hotbar_length(hotbar: &[usize]) -> HotbarLengthOutcome {
    if hotbar.len() == HOTBAR_LEN {
        HotbarLengthOutcome::Valid
    } else {
        HotbarLengthOutcome::WrongLength {
            found: hotbar.len(),
            repaired: repaired_hotbar(hotbar),
        }
    }
}

pub(crate) fn classify_hotbar_duplicates(hotbar: &[usize]) -> HotbarDuplicatesOutcome {
    let mut values = Vec::new();
    for (i, &entry) in hotbar.iter().enumerate() {
        if hotbar[..i].contains(&entry) && !values.contains(&entry) {
            values.push(entry);
        }
    }
    if values.is_empty() {
        HotbarDuplicatesOutcome::Valid
    } else {
        HotbarDuplicatesOutcome::Duplicates {
            values,
            repaired: repaired_hotbar(hotbar),
        }
    }
}

pub(crate) fn classify_hotbar_range(hotbar: &[usize]) -> HotbarRangeOutcome {
    let mut values = Vec::new();
    for &entry in hotbar {
        if entry >= INVENTORY_SLOTS && !values.contains(&entry) {
            values.push(entry);
        }
    }
    if values.is_empty() {
        HotbarRangeOutcome::Valid
    } else {
        HotbarRangeOutcome::OutOfBounds {
            values,
            repaired: repaired_hotbar(hotbar),
        }
    }
}

fn render_hotbar_length(outcome: HotbarLengthOutcome) -> Option<Violation> {
    match outcome {
        HotbarLengthOutcome::Valid => None,
        HotbarLengthOutcome::WrongLength { found, repaired } => Some(Violation {
            kind: ViolationKind::InvalidHotbarLength,
            severity: Severity::Error,
            description: format!("hotbar has {found} entries, expected {HOTBAR_LEN}"),
            affected_slots: Vec::new(),
            detected_value: json!(found),
            expected_value: Some(json!(repaired)),
            can_auto_correct: true,
        }),
    }
}

fn render_hotbar_duplicates(outcome: HotbarDuplicatesOutcome) -> Option<Violation> {
    match outcome {
        HotbarDuplicatesOutcome::Valid => None,
        HotbarDuplicatesOutcome::Duplicates { values, repaired } => Some(Violation {
            kind: ViolationKind::DuplicateHotbarSlot,
            severity: Severity::Error,
            description: format!("hotbar references slots {values:?} more than once"),
            affected_slots: values.clone(),
            detected_value: json!(values),
            expected_value: Some(json!(repaired)),
            can_auto_correct: true,
        }),
    }
}

fn render_hotbar_range(outcome: HotbarRangeOutcome) -> Option<Violation> {
    match outcome {
        HotbarRangeOutcome::Valid => None,
        HotbarRangeOutcome::OutOfBounds { values, repaired } => Some(Violation {
            kind: ViolationKind::HotbarSlotOutOfBounds,
            severity: Severity::Error,
            description: format!(
                "hotbar references slots {values:?} outside storage range 0-{}",
                INVENTORY_SLOTS - 1
            ),
            affected_slots: values.clone(),
            detected_value: json!(values),
            expected_value: Some(json!(repaired)),
            can_auto_correct: true,
        }),
    }
}

/// The three hotbar sub-rules, each reported independently.
pub(crate) fn detect_hotbar(inventory: &Inventory) -> Vec<Violation> {
    let hotbar = &inventory.hotbar;
    [
        render_hotbar_length(classify_hotbar_length(hotbar)),
        render_hotbar_duplicates(classify_hotbar_duplicates(hotbar)),
        render_hotbar_range(classify_hotbar_range(hotbar)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ---------------------------------------------------------------------------
// Selected slot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectedSlotOutcome {
    Valid,
    OutOfRange { found: usize },
}

pub(crate) fn classify_selected_slot(inventory: &Inventory) -> SelectedSlotOutcome {
    if inventory.selected_slot < HOTBAR_LEN {
        SelectedSlotOutcome::Valid
    } else {
        SelectedSlotOutcome::OutOfRange {
            found: inventory.selected_slot,
        }
    }
}

fn render_selected_slot(outcome: SelectedSlotOutcome) -> Option<Violation> {
    match outcome {
        SelectedSlotOutcome::Valid => None,
        SelectedSlotOutcome::OutOfRange { found } => Some(Violation {
            kind: ViolationKind::InvalidSelectedSlot,
            severity: Severity::Error,
            description: format!(
                "selected slot {found} outside hotbar range 0-{}",
                HOTBAR_LEN - 1
            ),
            affected_slots: Vec::new(),
            detected_value: json!(found),
            expected_value: Some(json!(0)),
            can_auto_correct: true,
        }),
    }
}

pub(crate) fn detect_selected_slot(inventory: &Inventory) -> Vec<Violation> {
    render_selected_slot(classify_selected_slot(inventory))
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Armor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArmorPieceOutcome {
    Valid,
    WrongPiece {
        slot: ArmorSlotKind,
        item_id: String,
    },
}

/// A piece belongs in a slot iff its item id contains the slot name.
pub(crate) fn classify_armor_piece(slot: ArmorSlotKind, stack: &ItemStack) -> ArmorPieceOutcome {
    if stack.item_id.contains(slot.name()) {
        ArmorPieceOutcome::Valid
    } else {
        ArmorPieceOutcome::WrongPiece {
            slot,
            item_id: stack.item_id.clone(),
        }
    }
}

fn render_armor_piece(outcome: ArmorPieceOutcome) -> Option<Violation> {
    match outcome {
        ArmorPieceOutcome::Valid => None,
        ArmorPieceOutcome::WrongPiece { slot, item_id } => Some(Violation {
            kind: ViolationKind::InvalidArmorSlot,
            severity: Severity::Error,
            description: format!("\"{item_id}\" equipped in the {} slot", slot.name()),
            affected_slots: Vec::new(),
            detected_value: json!(item_id),
            expected_value: Some(json!(format!("item id containing \"{}\"", slot.name()))),
            // Equipment swaps are never automated.
            can_auto_correct: false,
        }),
    }
}

pub(crate) fn detect_armor(inventory: &Inventory) -> Vec<Violation> {
    inventory
        .armor
        .pieces()
        .filter_map(|(slot, stack)| {
            stack.and_then(|stack| render_armor_piece(classify_armor_piece(slot, stack)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Metadata: enchantment levels and damage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EnchantmentOutcome {
    Valid,
    LevelOutOfRange {
        slot: usize,
        id: String,
        level: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    Valid,
    OutOfRange { slot: usize, damage: i32 },
}

pub(crate) fn classify_enchantment(slot: usize, enchantment: &Enchantment) -> EnchantmentOutcome {
    if (1..=MAX_ENCHANTMENT_LEVEL).contains(&enchantment.level) {
        EnchantmentOutcome::Valid
    } else {
        EnchantmentOutcome::LevelOutOfRange {
            slot,
            id: enchantment.id.clone(),
            level: enchantment.level,
        }
    }
}

pub(crate) fn classify_damage(slot: usize, damage: i32) -> DamageOutcome {
    if (0..=MAX_DAMAGE).contains(&damage) {
        DamageOutcome::Valid
    } else {
        DamageOutcome::OutOfRange { slot, damage }
    }
}

fn render_enchantment(outcome: EnchantmentOutcome) -> Option<Violation> {
    match outcome {
        EnchantmentOutcome::Valid => None,
        EnchantmentOutcome::LevelOutOfRange { slot, id, level } => Some(Violation {
            kind: ViolationKind::InvalidEnchantmentLevel,
            severity: Severity::Warning,
            description: format!(
                "slot {slot} enchantment \"{id}\" has level {level}, legal range is 1-{MAX_ENCHANTMENT_LEVEL}"
            ),
            affected_slots: vec![slot],
            detected_value: json!({ "id": id, "level": level }),
            expected_value: Some(json!({
                "id": id,
                "level": level.clamp(1, MAX_ENCHANTMENT_LEVEL),
            })),
            can_auto_correct: true,
        }),
    }
}

fn render_damage(outcome: DamageOutcome) -> Option<Violation> {
    match outcome {
        DamageOutcome::Valid => None,
        DamageOutcome::OutOfRange { slot, damage } => Some(Violation {
            kind: ViolationKind::InvalidDamageValue,
            severity: Severity::Warning,
            description: format!(
                "slot {slot} has damage {damage}, legal range is 0-{MAX_DAMAGE}"
            ),
            affected_slots: vec![slot],
            detected_value: json!(damage),
            expected_value: Some(json!(damage.clamp(0, MAX_DAMAGE))),
            can_auto_correct: true,
        }),
    }
}

pub(crate) fn detect_slot_metadata(slot: usize, stack: &ItemStack) -> Vec<Violation> {
    let Some(metadata) = &stack.metadata else {
        return Vec::new();
    };

    let mut violations: Vec<Violation> = metadata
        .enchantments
        .iter()
        .filter_map(|enchantment| render_enchantment(classify_enchantment(slot, enchantment)))
        .collect();
    if let Some(damage) = metadata.damage {
        violations.extend(render_damage(classify_damage(slot, damage)));
    }
    violations
}

pub(crate) fn detect_metadata(inventory: &Inventory) -> Vec<Violation> {
    occupied(inventory)
        .flat_map(|(slot, stack)| detect_slot_metadata(slot, stack))
        .collect()
}

// ---------------------------------------------------------------------------
// Durability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DurabilityOutcome {
    Valid,
    OutOfRange { slot: usize, durability: f32 },
}

pub(crate) fn classify_durability(slot: usize, durability: f32) -> DurabilityOutcome {
    if (0.0..=1.0).contains(&durability) {
        DurabilityOutcome::Valid
    } else {
        DurabilityOutcome::OutOfRange { slot, durability }
    }
}

fn render_durability(outcome: DurabilityOutcome) -> Option<Violation> {
    match outcome {
        DurabilityOutcome::Valid => None,
        DurabilityOutcome::OutOfRange { slot, durability } => Some(Violation {
            kind: ViolationKind::InvalidDurability,
            severity: Severity::Error,
            description: format!(
                "slot {slot} has durability {durability}, legal range is 0.0-1.0"
            ),
            affected_slots: vec![slot],
            detected_value: json!(durability),
            expected_value: Some(json!(durability.clamp(0.0, 1.0))),
            can_auto_correct: true,
        }),
    }
}

pub(crate) fn detect_slot_durability(slot: usize, stack: &ItemStack) -> Vec<Violation> {
    stack
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.durability)
        .and_then(|durability| render_durability(classify_durability(slot, durability)))
        .into_iter()
        .collect()
}

pub(crate) fn detect_durability(inventory: &Inventory) -> Vec<Violation> {
    occupied(inventory)
        .flat_map(|(slot, stack)| detect_slot_durability(slot, stack))
        .collect()
}

// ---------------------------------------------------------------------------
// Item registry naming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ItemIdOutcome {
    Valid,
    Malformed { slot: usize, item_id: String },
}

/// Registry ids are non-empty and lowercase `[a-z0-9_]`.
pub(crate) fn classify_item_id(slot: usize, stack: &ItemStack) -> ItemIdOutcome {
    let well_formed = !stack.item_id.is_empty()
        && stack
            .item_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if well_formed {
        ItemIdOutcome::Valid
    } else {
        ItemIdOutcome::Malformed {
            slot,
            item_id: stack.item_id.clone(),
        }
    }
}

fn render_item_id(outcome: ItemIdOutcome) -> Option<Violation> {
    match outcome {
        ItemIdOutcome::Valid => None,
        ItemIdOutcome::Malformed { slot, item_id } => Some(Violation {
            kind: ViolationKind::UnknownItemId,
            severity: Severity::Error,
            description: format!("slot {slot} item id \"{item_id}\" is not a registry id"),
            affected_slots: vec![slot],
            detected_value: json!(item_id),
            expected_value: None,
            // Renaming an item is a data decision, not a structural repair.
            can_auto_correct: false,
        }),
    }
}

pub(crate) fn detect_item_ids(inventory: &Inventory) -> Vec<Violation> {
    occupied(inventory)
        .filter_map(|(slot, stack)| render_item_id(classify_item_id(slot, stack)))
        .collect()
}

// ---------------------------------------------------------------------------

fn occupied(inventory: &Inventory) -> impl Iterator<Item = (usize, &ItemStack)> {
    inventory
        .slots
        .iter()
        .enumerate()
        .filter_map(|(slot, stack)| stack.as_ref().map(|stack| (slot, stack)))
}
