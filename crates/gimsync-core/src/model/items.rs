use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Game item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quantity of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item held in this stack.
    pub item_id: ItemId,
    /// Number of items.
    pub quantity: u32,
}

impl ItemStack {
    /// Create a stack of `quantity` items.
    pub fn new(item_id: ItemId, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}

/// A keyed storage container such as the bank or the seed vault.
pub type ItemCollection = BTreeMap<ItemId, ItemStack>;

/// Worn equipment, by slot.
pub type Equipment = BTreeMap<EquipmentSlot, ItemStack>;

/// Inventory slots in order. Empty slots are `None`.
pub type Inventory = Vec<Option<ItemStack>>;

/// Worn equipment slot, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Helmets and hats.
    Head,
    /// Capes.
    Cape,
    /// Amulets and necklaces.
    Amulet,
    /// Main hand.
    Weapon,
    /// Body armour.
    Body,
    /// Off hand.
    Shield,
    /// Hidden slot occupied by some bodies.
    Arms,
    /// Leg armour.
    Legs,
    /// Hidden slot occupied by some helmets.
    Hair,
    /// Gloves.
    Gloves,
    /// Boots.
    Boots,
    /// Hidden slot occupied by some helmets.
    Jaw,
    /// Rings.
    Ring,
    /// Arrows, bolts and blessings.
    Ammo,
}

impl EquipmentSlot {
    /// All slots, indexed by their wire position.
    pub const ALL: [Self; 14] = [
        Self::Head,
        Self::Cape,
        Self::Amulet,
        Self::Weapon,
        Self::Body,
        Self::Shield,
        Self::Arms,
        Self::Legs,
        Self::Hair,
        Self::Gloves,
        Self::Boots,
        Self::Jaw,
        Self::Ring,
        Self::Ammo,
    ];

    /// Slot at a wire position. `None` past the last slot.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
