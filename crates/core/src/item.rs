//! Item stacks and item metadata.

use serde::{Deserialize, Serialize};

/// Maximum number of items in a single stack.
pub const MAX_STACK_SIZE: u32 = 64;

/// Highest legal enchantment level.
pub const MAX_ENCHANTMENT_LEVEL: u32 = 5;

/// Highest legal accumulated damage value.
pub const MAX_DAMAGE: i32 = 1000;

/// An enchantment applied to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantment {
    /// Enchantment identifier (e.g. `"sharpness"`).
    pub id: String,
    /// Enchantment level (1-5 when well-formed).
    pub level: u32,
}

impl Enchantment {
    /// Create a new enchantment.
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

/// Optional per-stack metadata (durability, enchantments, damage, display).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Remaining durability as a ratio (0.0 to 1.0 when well-formed).
    pub durability: Option<f32>,
    /// Enchantments applied to the item.
    pub enchantments: Vec<Enchantment>,
    /// Accumulated damage (0-1000 when well-formed).
    pub damage: Option<i32>,
    /// Player-assigned display name.
    pub custom_name: Option<String>,
    /// Lore lines shown in the item tooltip.
    pub lore: Vec<String>,
}

impl ItemMetadata {
    /// True when no metadata field carries a value.
    pub fn is_empty(&self) -> bool {
        self.durability.is_none()
            && self.enchantments.is_empty()
            && self.damage.is_none()
            && self.custom_name.is_none()
            && self.lore.is_empty()
    }
}

/// A stack of items occupying one inventory slot.
///
/// Stacks are treated as immutable values by the validation engine:
/// corrections always build a new stack rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item identifier referencing the item registry.
    pub item_id: String,
    /// Number of items in this stack (1-64 when well-formed).
    pub count: u32,
    /// Optional item metadata.
    pub metadata: Option<ItemMetadata>,
}

impl ItemStack {
    /// Create a new item stack without metadata.
    pub fn new(item_id: impl Into<String>, count: u32) -> Self {
        Self {
            item_id: item_id.into(),
            count,
            metadata: None,
        }
    }

    /// Create an item stack with metadata.
    pub fn with_metadata(item_id: impl Into<String>, count: u32, metadata: ItemMetadata) -> Self {
        Self {
            item_id: item_id.into(),
            count,
            metadata: Some(metadata),
        }
    }

    /// Copy of this stack with a different count.
    pub fn replace_count(&self, count: u32) -> Self {
        Self {
            item_id: self.item_id.clone(),
            count,
            metadata: self.metadata.clone(),
        }
    }

    /// Copy of this stack with different metadata.
    pub fn replace_metadata(&self, metadata: Option<ItemMetadata>) -> Self {
        Self {
            item_id: self.item_id.clone(),
            count: self.count,
            metadata,
        }
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id && self.metadata == other.metadata
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= MAX_STACK_SIZE
    }
}
