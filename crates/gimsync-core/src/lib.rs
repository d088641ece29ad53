//! Core domain model for group state synchronization.
//!
//! Strongly-typed member state (containers, skills, quests, collection log),
//! the [`env::Environment`] time abstraction used by the engine and its
//! runtime, and the defensive wire decoder for backend snapshots.
//!
//! # Modules
//!
//! - [`model`]: member state, item containers, skills
//! - [`payload`]: JSON snapshot decoding that never rejects a whole update
//!   for one bad field
//! - [`env`]: monotonic clock and sleeping, real or simulated
//! - [`error`]: payload decoding errors

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod model;
pub mod payload;

pub use error::PayloadError;
pub use model::{
    Collection, Container, Diaries, Equipment, EquipmentSlot, Experience, GroupStateUpdate,
    Inventory, ItemCollection, ItemId, ItemStack, MemberName, MemberState, NpcInteraction,
    PartialMemberState, Position, QuestId, QuestStatus, Quests, Skill, Skills, StatBar, Stats,
};
pub use payload::decode_group_update;
