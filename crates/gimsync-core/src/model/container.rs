use std::{collections::btree_map, fmt, iter::Flatten, slice};

use serde::{Deserialize, Serialize};

use super::{EquipmentSlot, ItemCollection, ItemId, ItemStack, MemberState};

/// The item-holding locations tracked per member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Container {
    Bank,
    Equipment,
    Quiver,
    Inventory,
    RunePouch,
    SeedVault,
    PotionStorage,
    CostumeRoom,
    PlankSack,
    MasterScrollBook,
    EssencePouches,
    TackleBox,
    CoalBag,
    FishBarrel,
}

impl Container {
    /// Every container, in display order.
    pub const ALL: [Self; 14] = [
        Self::Bank,
        Self::Equipment,
        Self::Quiver,
        Self::Inventory,
        Self::RunePouch,
        Self::SeedVault,
        Self::PotionStorage,
        Self::CostumeRoom,
        Self::PlankSack,
        Self::MasterScrollBook,
        Self::EssencePouches,
        Self::TackleBox,
        Self::CoalBag,
        Self::FishBarrel,
    ];

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Equipment => "Equipment",
            Self::Quiver => "Quiver",
            Self::Inventory => "Inventory",
            Self::RunePouch => "Rune Pouch",
            Self::SeedVault => "Seed Vault",
            Self::PotionStorage => "Potion Storage",
            Self::CostumeRoom => "Costume Room",
            Self::PlankSack => "Plank Sack",
            Self::MasterScrollBook => "Master Scroll Book",
            Self::EssencePouches => "Essence Pouches",
            Self::TackleBox => "Tackle Box",
            Self::CoalBag => "Coal Bag",
            Self::FishBarrel => "Fish Barrel",
        }
    }

    /// Key of the container in backend snapshots.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Equipment => "equipment",
            Self::Quiver => "quiver",
            Self::Inventory => "inventory",
            Self::RunePouch => "rune_pouch",
            Self::SeedVault => "seed_vault",
            Self::PotionStorage => "potion_storage",
            Self::CostumeRoom => "poh_costume_room",
            Self::PlankSack => "plank_sack",
            Self::MasterScrollBook => "master_scroll_book",
            Self::EssencePouches => "essence_pouches",
            Self::TackleBox => "tackle_box",
            Self::CoalBag => "coal_bag",
            Self::FishBarrel => "fish_barrel",
        }
    }

    /// Every stack this container holds for `state`.
    pub fn stacks(self, state: &MemberState) -> Stacks<'_> {
        match self {
            Self::Bank => keyed(&state.bank),
            Self::Equipment => Stacks::Worn(state.equipment.values()),
            Self::Quiver => keyed(&state.quiver),
            Self::Inventory => Stacks::Slots(state.inventory.iter().flatten()),
            Self::RunePouch => keyed(&state.rune_pouch),
            Self::SeedVault => keyed(&state.seed_vault),
            Self::PotionStorage => keyed(&state.potion_storage),
            Self::CostumeRoom => keyed(&state.poh_costume_room),
            Self::PlankSack => keyed(&state.plank_sack),
            Self::MasterScrollBook => keyed(&state.master_scroll_book),
            Self::EssencePouches => keyed(&state.essence_pouches),
            Self::TackleBox => keyed(&state.tackle_box),
            Self::CoalBag => keyed(&state.coal_bag),
            Self::FishBarrel => keyed(&state.fish_barrel),
        }
    }
}

fn keyed(collection: &ItemCollection) -> Stacks<'_> {
    Stacks::Keyed(collection.values())
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over the stacks of one [`Container`].
#[derive(Debug, Clone)]
pub enum Stacks<'a> {
    /// Containers keyed by item.
    Keyed(btree_map::Values<'a, ItemId, ItemStack>),
    /// Equipment, keyed by slot.
    Worn(btree_map::Values<'a, EquipmentSlot, ItemStack>),
    /// Inventory slots, skipping gaps.
    Slots(Flatten<slice::Iter<'a, Option<ItemStack>>>),
}

impl<'a> Iterator for Stacks<'a> {
    type Item = &'a ItemStack;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Keyed(iter) => iter.next(),
            Self::Worn(iter) => iter.next(),
            Self::Slots(iter) => iter.next(),
        }
    }
}
