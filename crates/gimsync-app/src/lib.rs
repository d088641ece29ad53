//! Group state synchronization engine.
//!
//! Folds periodic, possibly partial snapshots of per-member account state into
//! one render-ready aggregate. Unchanged sub-structures keep their `Arc`
//! identity across updates so consumers can skip work with a pointer compare.
//!
//! # Components
//!
//! - [`reduce`] / [`GroupStore`]: the dispatcher. Applies [`GroupAction`]s one
//!   at a time to an immutable [`GroupState`]
//! - Roster and colors, member merging, the item index, collection snapshots
//!   and experience drops: the stages of one update, each skipped when its
//!   inputs did not change
//! - [`Poller`]: single-flight polling state machine per snapshot source
//! - [`Driver`]: trait for platform-specific fetching and publishing
//! - [`Session`]: close signal shared by a driver and the runtime
//! - [`Runtime`]: generic loop tying pollers, the store and a driver together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod collections;
mod config;
mod driver;
mod items;
mod merge;
mod poller;
mod reducer;
mod roster;
mod runtime;
mod session;
mod sharing;
mod state;
mod xp_drops;

pub use action::GroupAction;
pub use config::{
    DEFAULT_COLLECTION_LOG_INTERVAL, DEFAULT_GROUP_DATA_INTERVAL, DEFAULT_PALETTE,
    DEFAULT_XP_DROP_TTL, EngineConfig, PollConfig, SHARED_HUE,
};
pub use driver::Driver;
pub use poller::{Completion, PollState, PollTicket, Poller, SnapshotSource};
pub use reducer::{GroupStore, reduce};
pub use runtime::Runtime;
pub use session::Session;
pub use sharing::{SameContents, share_if_unchanged};
pub use state::{
    Collections, ContainerBreakdown, DropList, ExperienceDrop, GroupState, ItemBreakdown,
    ItemIndex, MemberColor, MemberColors, MemberStates, Roster, XpAmount, XpDrops,
};
