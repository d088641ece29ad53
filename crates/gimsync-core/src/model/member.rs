use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Equipment, Inventory, ItemCollection, ItemId, Skills};

/// Unique name of a group member.
///
/// One reserved name, [`MemberName::SHARED`], denotes the group's shared
/// storage rather than a player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberName(String);

impl MemberName {
    /// Reserved name of the shared-storage pseudo-member.
    pub const SHARED: &'static str = "@SHARED";

    /// Create a member name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The shared-storage pseudo-member.
    pub fn shared() -> Self {
        Self(Self::SHARED.to_string())
    }

    /// Whether this is the shared-storage pseudo-member.
    pub fn is_shared(&self) -> bool {
        self.0 == Self::SHARED
    }

    /// Name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// World position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// World x coordinate.
    pub x: i32,
    /// World y coordinate.
    pub y: i32,
    /// Height level.
    pub plane: u8,
    /// Whether the member is aboard a boat.
    #[serde(default)]
    pub is_on_boat: bool,
}

/// The NPC a member most recently interacted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcInteraction {
    /// NPC name.
    pub name: String,
    /// Remaining health from 0 to 1. `None` for NPCs without hitpoints.
    pub health_ratio: Option<f64>,
    /// Where the interaction happened.
    pub location: Position,
    /// When the interaction was recorded.
    pub last_updated: DateTime<Utc>,
}

/// A current/maximum pair such as hitpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBar {
    /// Current value.
    pub current: u32,
    /// Maximum value.
    pub max: u32,
}

/// Live combat stats and world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Hitpoints.
    pub health: StatBar,
    /// Prayer points.
    pub prayer: StatBar,
    /// Run energy.
    pub run: StatBar,
    /// World the member is logged into. 0 when offline.
    pub world: u16,
}

/// Quest identifier (position in the quest database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(pub u16);

/// Quest progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestStatus {
    /// Not started.
    #[default]
    NotStarted,
    /// Started but not finished.
    InProgress,
    /// Completed.
    Finished,
}

/// Quest progress by quest.
pub type Quests = BTreeMap<QuestId, QuestStatus>;

/// Achievement diary completion: region, then tier, then per-task flags.
pub type Diaries = BTreeMap<String, BTreeMap<String, Vec<bool>>>;

/// Collection log: item to number of times obtained.
pub type Collection = BTreeMap<ItemId, u32>;

/// Canonical state of one member.
///
/// Every container is always present, defaulting to empty. Large fields are
/// behind `Arc` so merging a snapshot copies pointers, not contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MemberState {
    /// When the backend last heard from this member.
    pub last_updated: DateTime<Utc>,
    pub bank: Arc<ItemCollection>,
    pub equipment: Arc<Equipment>,
    pub quiver: Arc<ItemCollection>,
    pub inventory: Arc<Inventory>,
    pub rune_pouch: Arc<ItemCollection>,
    pub seed_vault: Arc<ItemCollection>,
    pub potion_storage: Arc<ItemCollection>,
    pub poh_costume_room: Arc<ItemCollection>,
    pub plank_sack: Arc<ItemCollection>,
    pub master_scroll_book: Arc<ItemCollection>,
    pub essence_pouches: Arc<ItemCollection>,
    pub tackle_box: Arc<ItemCollection>,
    pub coal_bag: Arc<ItemCollection>,
    pub fish_barrel: Arc<ItemCollection>,
    pub coordinates: Option<Position>,
    pub interacting: Option<NpcInteraction>,
    pub stats: Option<Stats>,
    pub skills: Option<Arc<Skills>>,
    pub quests: Option<Arc<Quests>>,
    pub diaries: Option<Arc<Diaries>>,
    pub collection: Option<Arc<Collection>>,
}

/// Fields reported for one member by a snapshot.
///
/// `None` means the snapshot did not carry the field. It never clears
/// anything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PartialMemberState {
    pub last_updated: Option<DateTime<Utc>>,
    pub bank: Option<Arc<ItemCollection>>,
    pub equipment: Option<Arc<Equipment>>,
    pub quiver: Option<Arc<ItemCollection>>,
    pub inventory: Option<Arc<Inventory>>,
    pub rune_pouch: Option<Arc<ItemCollection>>,
    pub seed_vault: Option<Arc<ItemCollection>>,
    pub potion_storage: Option<Arc<ItemCollection>>,
    pub poh_costume_room: Option<Arc<ItemCollection>>,
    pub plank_sack: Option<Arc<ItemCollection>>,
    pub master_scroll_book: Option<Arc<ItemCollection>>,
    pub essence_pouches: Option<Arc<ItemCollection>>,
    pub tackle_box: Option<Arc<ItemCollection>>,
    pub coal_bag: Option<Arc<ItemCollection>>,
    pub fish_barrel: Option<Arc<ItemCollection>>,
    pub coordinates: Option<Position>,
    pub interacting: Option<NpcInteraction>,
    pub stats: Option<Stats>,
    pub skills: Option<Arc<Skills>>,
    pub quests: Option<Arc<Quests>>,
    pub diaries: Option<Arc<Diaries>>,
    pub collection: Option<Arc<Collection>>,
}

impl PartialMemberState {
    /// Overlay the supplied fields onto `state`.
    ///
    /// Shallow: a supplied container replaces the old one wholesale.
    pub fn apply_to(self, state: &mut MemberState) {
        macro_rules! overlay {
            ($patch:ident => $state:ident;
             always: $($always:ident),*;
             optional: $($optional:ident),* $(,)?) => {
                $(if let Some(value) = $patch.$always {
                    $state.$always = value;
                })*
                $(if let Some(value) = $patch.$optional {
                    $state.$optional = Some(value);
                })*
            };
        }

        let patch = self;
        overlay! {
            patch => state;
            always: last_updated, bank, equipment, quiver, inventory, rune_pouch, seed_vault,
                potion_storage, poh_costume_room, plank_sack, master_scroll_book, essence_pouches,
                tackle_box, coal_bag, fish_barrel;
            optional: coordinates, interacting, stats, skills, quests, diaries, collection,
        }
    }

    /// Whether the snapshot carried no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
