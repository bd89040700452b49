#![warn(missing_docs)]
//! Core inventory value types shared across the workspace.

pub mod inventory;
pub mod item;

// Re-export commonly used types
pub use inventory::{ArmorSlotKind, ArmorSlots, Inventory, HOTBAR_LEN, INVENTORY_SLOTS};
pub use item::{
    Enchantment, ItemMetadata, ItemStack, MAX_DAMAGE, MAX_ENCHANTMENT_LEVEL, MAX_STACK_SIZE,
};
