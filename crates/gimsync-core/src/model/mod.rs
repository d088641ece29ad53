//! Per-member account state as tracked by the dashboard.
//!
//! A [`MemberState`] holds every item container (always present, possibly
//! empty) plus optional skills, quests, diaries, position and collection log.
//! Snapshots arrive as [`PartialMemberState`] records keyed by
//! [`MemberName`] in a [`GroupStateUpdate`].

mod container;
mod items;
mod member;
mod skill;

use std::collections::BTreeMap;

pub use container::{Container, Stacks};
pub use items::{Equipment, EquipmentSlot, Inventory, ItemCollection, ItemId, ItemStack};
pub use member::{
    Collection, Diaries, MemberName, MemberState, NpcInteraction, PartialMemberState, Position,
    QuestId, QuestStatus, Quests, StatBar, Stats,
};
pub use skill::{Experience, Skill, Skills};

/// One snapshot from the backend: member name to the fields it reported.
pub type GroupStateUpdate = BTreeMap<MemberName, PartialMemberState>;
