#![warn(missing_docs)]
//! Deterministic inventory fixtures shared by unit, integration, and
//! property tests, plus a JSONL sink for recording validation reports.

use anyhow::Result;
use invguard_core::{ArmorSlotKind, Enchantment, Inventory, ItemMetadata, ItemStack};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Plain stack without metadata.
pub fn stack(item_id: &str, count: u32) -> ItemStack {
    ItemStack::new(item_id, count)
}

/// Stack carrying a durability ratio.
pub fn worn_stack(item_id: &str, count: u32, durability: f32) -> ItemStack {
    ItemStack::with_metadata(
        item_id,
        count,
        ItemMetadata {
            durability: Some(durability),
            ..ItemMetadata::default()
        },
    )
}

/// Stack carrying enchantments.
pub fn enchanted_stack(item_id: &str, count: u32, enchantments: &[(&str, u32)]) -> ItemStack {
    ItemStack::with_metadata(
        item_id,
        count,
        ItemMetadata {
            enchantments: enchantments
                .iter()
                .map(|(id, level)| Enchantment::new(*id, *level))
                .collect(),
            ..ItemMetadata::default()
        },
    )
}

/// Fluent builder over a well-formed empty inventory. Each method can
/// deliberately break an invariant; `build` hands back whatever was
/// assembled, malformed or not.
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    inventory: Inventory,
}

impl InventoryBuilder {
    /// Start from a well-formed empty inventory.
    pub fn new() -> Self {
        Self {
            inventory: Inventory::new(),
        }
    }

    /// Place a stack in a storage slot.
    pub fn slot(mut self, index: usize, stack: ItemStack) -> Self {
        self.inventory.set(index, Some(stack));
        self
    }

    /// Replace the hotbar entries.
    pub fn hotbar(mut self, entries: Vec<usize>) -> Self {
        self.inventory.hotbar = entries;
        self
    }

    /// Set the selected slot.
    pub fn selected_slot(mut self, slot: usize) -> Self {
        self.inventory.selected_slot = slot;
        self
    }

    /// Equip an armor piece.
    pub fn armor(mut self, slot: ArmorSlotKind, stack: ItemStack) -> Self {
        match slot {
            ArmorSlotKind::Helmet => self.inventory.armor.helmet = Some(stack),
            ArmorSlotKind::Chestplate => self.inventory.armor.chestplate = Some(stack),
            ArmorSlotKind::Leggings => self.inventory.armor.leggings = Some(stack),
            ArmorSlotKind::Boots => self.inventory.armor.boots = Some(stack),
        }
        self
    }

    /// Place a stack in the offhand.
    pub fn offhand(mut self, stack: ItemStack) -> Self {
        self.inventory.offhand = Some(stack);
        self
    }

    /// Force the storage slot count, truncating or padding with empties.
    pub fn slot_count(mut self, count: usize) -> Self {
        self.inventory.slots.resize(count, None);
        self
    }

    /// Hand back the assembled inventory.
    pub fn build(self) -> Inventory {
        self.inventory
    }
}

/// A populated inventory that passes every check: a few stacks, matching
/// armor, an offhand shield, and a hotbar pointing at the loot.
pub fn compliant_inventory() -> Inventory {
    InventoryBuilder::new()
        .slot(0, stack("stone", 64))
        .slot(1, stack("oak_planks", 32))
        .slot(2, worn_stack("iron_pickaxe", 1, 0.75))
        .slot(3, enchanted_stack("iron_sword", 1, &[("sharpness", 3)]))
        .slot(10, stack("bread", 12))
        .armor(ArmorSlotKind::Helmet, stack("iron_helmet", 1))
        .armor(ArmorSlotKind::Chestplate, stack("iron_chestplate", 1))
        .armor(ArmorSlotKind::Leggings, stack("iron_leggings", 1))
        .armor(ArmorSlotKind::Boots, stack("leather_boots", 1))
        .offhand(stack("shield", 1))
        .build()
}

/// A sink that writes newline-delimited JSON records to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append one record as a JSON line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_fixture_is_well_formed() {
        let inv = compliant_inventory();
        assert_eq!(inv.slots.len(), 36);
        assert_eq!(inv.hotbar.len(), 9);
        assert!(inv.selected_slot < 9);
        assert_eq!(inv.occupied_slots(), 5);
    }

    #[test]
    fn builder_can_break_invariants_on_purpose() {
        let inv = InventoryBuilder::new()
            .slot_count(12)
            .hotbar(vec![1, 1, 1])
            .selected_slot(99)
            .build();

        assert_eq!(inv.slots.len(), 12);
        assert_eq!(inv.hotbar, vec![1, 1, 1]);
        assert_eq!(inv.selected_slot, 99);
    }
}
