//! Observable group state.
//!
//! [`GroupState`] is the published aggregate. It is immutable: every update
//! produces a new value whose fields are `Arc`s, shared with the previous
//! version wherever their contents did not change. Consumers compare with
//! `Arc::ptr_eq` to decide what to re-render.

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Sub,
    sync::Arc,
    time::Duration,
};

use gimsync_core::{Collection, Container, Experience, ItemId, MemberName, MemberState, Skill};

/// Item id to per-member breakdown.
pub type ItemIndex = BTreeMap<ItemId, Arc<ItemBreakdown>>;

/// Canonical state per member.
pub type MemberStates = BTreeMap<MemberName, Arc<MemberState>>;

/// Current members, in order.
pub type Roster = BTreeSet<MemberName>;

/// Display color per member.
pub type MemberColors = BTreeMap<MemberName, MemberColor>;

/// Collection log per member, for members who have one.
pub type Collections = BTreeMap<MemberName, Arc<Collection>>;

/// Pending experience drops of one member, oldest first.
pub type DropList<I> = Arc<Vec<ExperienceDrop<I>>>;

/// Pending experience drops per member.
pub type XpDrops<I> = BTreeMap<MemberName, DropList<I>>;

/// Member display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberColor {
    /// Hue in degrees.
    pub hue_degrees: u16,
}

/// Experience gained in one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAmount {
    /// Skill that gained experience.
    pub skill: Skill,
    /// Experience gained. Always positive.
    pub amount: Experience,
}

/// One batch of simultaneous experience gains for a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceDrop<I> {
    /// Unique, monotonically increasing id.
    pub id: u64,
    /// Every skill that gained experience in this update.
    pub amounts: Vec<XpAmount>,
    /// When the drop was created (monotonic clock).
    pub created_at: I,
}

impl<I> ExperienceDrop<I>
where
    I: Copy + Sub<Output = Duration>,
{
    /// Time since creation.
    pub fn age(&self, now: I) -> Duration {
        now - self.created_at
    }

    /// Whether the drop has outlived `ttl`.
    pub fn is_expired(&self, now: I, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}

/// Quantity of one item per container, for one member.
///
/// Only containers holding a non-zero quantity are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerBreakdown(BTreeMap<Container, u64>);

impl ContainerBreakdown {
    /// Quantity held in `container`.
    pub fn get(&self, container: Container) -> u64 {
        self.0.get(&container).copied().unwrap_or(0)
    }

    /// Quantity across all containers.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Containers holding the item, with quantities.
    pub fn iter(&self) -> impl Iterator<Item = (Container, u64)> + '_ {
        self.0.iter().map(|(container, quantity)| (*container, *quantity))
    }

    /// Number of containers holding the item.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no container holds the item.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn add(&mut self, container: Container, quantity: u64) {
        let slot = self.0.entry(container).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }
}

impl FromIterator<(Container, u64)> for ContainerBreakdown {
    fn from_iter<T: IntoIterator<Item = (Container, u64)>>(iter: T) -> Self {
        let mut breakdown = Self::default();
        for (container, quantity) in iter {
            if quantity > 0 {
                breakdown.add(container, quantity);
            }
        }
        breakdown
    }
}

/// Who holds one item, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBreakdown(BTreeMap<MemberName, ContainerBreakdown>);

impl ItemBreakdown {
    /// Breakdown for one member. `None` if they hold none.
    pub fn member(&self, name: &MemberName) -> Option<&ContainerBreakdown> {
        self.0.get(name)
    }

    /// Quantity held by one member across all containers.
    pub fn quantity_for(&self, name: &MemberName) -> u64 {
        self.0.get(name).map_or(0, ContainerBreakdown::total)
    }

    /// Quantity across the whole group.
    pub fn total(&self) -> u64 {
        self.0.values().map(ContainerBreakdown::total).sum()
    }

    /// Members holding the item, with their breakdowns.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberName, &ContainerBreakdown)> {
        self.0.iter()
    }

    /// Number of members holding the item.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody holds the item.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn add(&mut self, member: &MemberName, container: Container, quantity: u64) {
        if let Some(breakdown) = self.0.get_mut(member) {
            breakdown.add(container, quantity);
        } else {
            let mut breakdown = ContainerBreakdown::default();
            breakdown.add(container, quantity);
            self.0.insert(member.clone(), breakdown);
        }
    }
}

impl FromIterator<(MemberName, ContainerBreakdown)> for ItemBreakdown {
    fn from_iter<T: IntoIterator<Item = (MemberName, ContainerBreakdown)>>(iter: T) -> Self {
        Self(iter.into_iter().filter(|(_, breakdown)| !breakdown.is_empty()).collect())
    }
}

/// The published aggregate.
///
/// Created empty on connect, replaced by each applied update and discarded on
/// disconnect. Generic over the monotonic instant type so simulations can
/// use virtual time.
#[derive(Debug, Clone)]
pub struct GroupState<I> {
    pub(crate) items: Arc<ItemIndex>,
    pub(crate) member_states: Arc<MemberStates>,
    pub(crate) member_names: Arc<Roster>,
    pub(crate) member_colors: Arc<MemberColors>,
    pub(crate) collections: Arc<Collections>,
    pub(crate) xp_drop_counter: u64,
    pub(crate) xp_drops: Arc<XpDrops<I>>,
}

impl<I> GroupState<I> {
    /// The empty aggregate.
    pub fn empty() -> Self {
        Self {
            items: Arc::default(),
            member_states: Arc::default(),
            member_names: Arc::default(),
            member_colors: Arc::default(),
            collections: Arc::default(),
            xp_drop_counter: 0,
            xp_drops: Arc::default(),
        }
    }

    /// Every item held by the group, by item id.
    pub fn items(&self) -> &Arc<ItemIndex> {
        &self.items
    }

    /// Who holds `item_id`. `None` if nobody does.
    pub fn item(&self, item_id: ItemId) -> Option<&Arc<ItemBreakdown>> {
        self.items.get(&item_id)
    }

    /// Canonical state of every member.
    pub fn member_states(&self) -> &Arc<MemberStates> {
        &self.member_states
    }

    /// Canonical state of one member.
    pub fn member(&self, name: &MemberName) -> Option<&Arc<MemberState>> {
        self.member_states.get(name)
    }

    /// Current roster.
    pub fn member_names(&self) -> &Arc<Roster> {
        &self.member_names
    }

    /// Every member's display color.
    pub fn member_colors(&self) -> &Arc<MemberColors> {
        &self.member_colors
    }

    /// Display color of one member.
    pub fn member_color(&self, name: &MemberName) -> Option<MemberColor> {
        self.member_colors.get(name).copied()
    }

    /// Collection logs of every member who has one.
    pub fn collections(&self) -> &Arc<Collections> {
        &self.collections
    }

    /// Collection log of one member.
    pub fn collection(&self, name: &MemberName) -> Option<&Arc<Collection>> {
        self.collections.get(name)
    }

    /// Id the next experience drop will receive.
    pub fn xp_drop_counter(&self) -> u64 {
        self.xp_drop_counter
    }

    /// Pending experience drops of every member.
    pub fn all_xp_drops(&self) -> &Arc<XpDrops<I>> {
        &self.xp_drops
    }

    /// Pending experience drops of one member, oldest first.
    ///
    /// Drops are only collected when an update is applied, so this may
    /// include expired drops. See [`Self::live_xp_drops`].
    pub fn xp_drops(&self, name: &MemberName) -> &[ExperienceDrop<I>] {
        self.xp_drops.get(name).map_or(&[], |drops| drops.as_slice())
    }
}

impl<I> GroupState<I>
where
    I: Copy + Sub<Output = Duration>,
{
    /// Pending experience drops of one member that are still alive at `now`.
    pub fn live_xp_drops(
        &self,
        name: &MemberName,
        now: I,
        ttl: Duration,
    ) -> impl Iterator<Item = &ExperienceDrop<I>> {
        self.xp_drops(name).iter().filter(move |drop| !drop.is_expired(now, ttl))
    }
}

impl<I> Default for GroupState<I> {
    fn default() -> Self {
        Self::empty()
    }
}
