//! Builders for member snapshots used across tests.

use std::sync::Arc;

use gimsync_core::{
    Collection, GroupStateUpdate, ItemCollection, ItemId, ItemStack, MemberName,
    PartialMemberState, Skill, Skills,
};

/// Builder for one member's [`PartialMemberState`].
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    partial: PartialMemberState,
}

impl MemberPatch {
    /// A patch reporting no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the bank as `(item id, quantity)` pairs.
    #[must_use]
    pub fn bank(mut self, items: &[(u32, u32)]) -> Self {
        self.partial.bank = Some(keyed(items));
        self
    }

    /// Report the inventory, one entry per slot.
    #[must_use]
    pub fn inventory(mut self, slots: &[Option<(u32, u32)>]) -> Self {
        let slots = slots
            .iter()
            .map(|slot| slot.map(|(id, quantity)| ItemStack::new(ItemId(id), quantity)))
            .collect();
        self.partial.inventory = Some(Arc::new(slots));
        self
    }

    /// Report the rune pouch as `(item id, quantity)` pairs.
    #[must_use]
    pub fn rune_pouch(mut self, items: &[(u32, u32)]) -> Self {
        self.partial.rune_pouch = Some(keyed(items));
        self
    }

    /// Report skills.
    #[must_use]
    pub fn skills(mut self, skills: &[(Skill, u64)]) -> Self {
        let skills: Skills = skills.iter().copied().collect();
        self.partial.skills = Some(Arc::new(skills));
        self
    }

    /// Report the collection log as `(item id, count)` pairs.
    #[must_use]
    pub fn collection(mut self, entries: &[(u32, u32)]) -> Self {
        let log: Collection = entries.iter().map(|&(id, count)| (ItemId(id), count)).collect();
        self.partial.collection = Some(Arc::new(log));
        self
    }

    /// The finished patch.
    pub fn build(self) -> PartialMemberState {
        self.partial
    }
}

/// Assemble an update from `(member, patch)` pairs.
pub fn update<'a>(members: impl IntoIterator<Item = (&'a str, MemberPatch)>) -> GroupStateUpdate {
    members.into_iter().map(|(name, patch)| (MemberName::from(name), patch.build())).collect()
}

fn keyed(items: &[(u32, u32)]) -> Arc<ItemCollection> {
    Arc::new(
        items
            .iter()
            .map(|&(id, quantity)| (ItemId(id), ItemStack::new(ItemId(id), quantity)))
            .collect(),
    )
}
