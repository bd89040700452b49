//! Player inventory layout: storage slots, hotbar, armor, offhand.

use crate::item::ItemStack;
use serde::{Deserialize, Serialize};

/// Number of storage slots in a player inventory.
pub const INVENTORY_SLOTS: usize = 36;

/// Number of hotbar entries.
pub const HOTBAR_LEN: usize = 9;

/// The four equippable armor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlotKind {
    /// Head slot.
    Helmet,
    /// Torso slot.
    Chestplate,
    /// Leg slot.
    Leggings,
    /// Foot slot.
    Boots,
}

impl ArmorSlotKind {
    /// All armor slots in equip order.
    pub const ALL: [ArmorSlotKind; 4] = [
        ArmorSlotKind::Helmet,
        ArmorSlotKind::Chestplate,
        ArmorSlotKind::Leggings,
        ArmorSlotKind::Boots,
    ];

    /// Slot name as it appears inside matching item identifiers
    /// (an item id containing `"helmet"` belongs in the helmet slot).
    pub fn name(self) -> &'static str {
        match self {
            ArmorSlotKind::Helmet => "helmet",
            ArmorSlotKind::Chestplate => "chestplate",
            ArmorSlotKind::Leggings => "leggings",
            ArmorSlotKind::Boots => "boots",
        }
    }
}

/// Equipped armor, one optional stack per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSlots {
    /// Equipped helmet, if any.
    pub helmet: Option<ItemStack>,
    /// Equipped chestplate, if any.
    pub chestplate: Option<ItemStack>,
    /// Equipped leggings, if any.
    pub leggings: Option<ItemStack>,
    /// Equipped boots, if any.
    pub boots: Option<ItemStack>,
}

impl ArmorSlots {
    /// Create empty armor slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Equipped piece for a slot.
    pub fn get(&self, slot: ArmorSlotKind) -> Option<&ItemStack> {
        match slot {
            ArmorSlotKind::Helmet => self.helmet.as_ref(),
            ArmorSlotKind::Chestplate => self.chestplate.as_ref(),
            ArmorSlotKind::Leggings => self.leggings.as_ref(),
            ArmorSlotKind::Boots => self.boots.as_ref(),
        }
    }

    /// All slots with their contents, in equip order.
    pub fn pieces(&self) -> impl Iterator<Item = (ArmorSlotKind, Option<&ItemStack>)> {
        ArmorSlotKind::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }
}

/// A player's container-backed item collection.
///
/// A well-formed inventory has exactly [`INVENTORY_SLOTS`] storage slots,
/// [`HOTBAR_LEN`] pairwise-distinct hotbar entries pointing into storage,
/// and a selected slot in `[0, 8]`. The fields are deliberately plain
/// `Vec`s and integers so that malformed inventories (wrong slot count,
/// duplicate hotbar entries, dangling selected slot) remain representable:
/// the validation engine exists to find and repair exactly those shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Storage slots, each holding at most one stack.
    pub slots: Vec<Option<ItemStack>>,
    /// Quick-access indices into `slots`.
    pub hotbar: Vec<usize>,
    /// Currently selected hotbar entry (0-8 when well-formed).
    pub selected_slot: usize,
    /// Equipped armor.
    pub armor: ArmorSlots,
    /// Offhand stack, if any.
    pub offhand: Option<ItemStack>,
}

impl Inventory {
    /// Create a well-formed empty inventory: 36 empty slots, identity
    /// hotbar, selected slot 0.
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SLOTS],
            hotbar: (0..HOTBAR_LEN).collect(),
            selected_slot: 0,
            armor: ArmorSlots::new(),
            offhand: None,
        }
    }

    /// Get the stack in a slot, `None` for empty or out-of-range slots.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Set a slot's contents. Returns `false` if the slot doesn't exist.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = stack;
                true
            }
            None => false,
        }
    }

    /// Number of occupied storage slots.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of empty storage slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Check if every storage slot is occupied.
    pub fn is_full(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|slot| slot.is_some())
    }

    /// Number of distinct item ids across occupied slots.
    pub fn unique_item_count(&self) -> usize {
        let mut ids: Vec<&str> = self
            .slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .map(|stack| stack.item_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Total item count summed across occupied slots.
    pub fn total_item_count(&self) -> u64 {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .map(|stack| u64::from(stack.count))
            .sum()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
