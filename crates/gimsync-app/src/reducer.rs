//! The dispatcher.
//!
//! [`reduce`] is a pure function from the current aggregate and one action to
//! the next aggregate. An update runs four stages, each only when its inputs
//! changed:
//!
//! 1. Roster and colors
//! 2. Member merging
//! 3. Item index, collection logs and experience drop detection
//! 4. Experience drop garbage collection
//!
//! If no stage produced a change the input `Arc` is returned as is.

use std::{ops::Sub, sync::Arc, time::Duration};

use gimsync_core::GroupStateUpdate;
use tracing::{debug, trace};

use crate::{
    EngineConfig, GroupAction, GroupState,
    collections::rebuild_collections,
    items::rebuild_items,
    merge::merge_members,
    roster::{assign_colors, next_roster},
    xp_drops::{collect_expired, detect_drops},
};

/// Apply one action to `state`.
///
/// `now` is the monotonic time of the dispatch. It stamps new experience
/// drops and decides which old ones have expired.
pub fn reduce<I>(
    state: &Arc<GroupState<I>>,
    action: GroupAction,
    now: I,
    config: &EngineConfig,
) -> Arc<GroupState<I>>
where
    I: Copy + Sub<Output = Duration>,
{
    match action {
        GroupAction::Wipe => Arc::new(GroupState::empty()),
        GroupAction::Update { partial, update } => {
            apply_update(state, partial, update, now, config)
                .map_or_else(|| Arc::clone(state), Arc::new)
        },
    }
}

fn apply_update<I>(
    old: &GroupState<I>,
    partial: bool,
    update: GroupStateUpdate,
    now: I,
    config: &EngineConfig,
) -> Option<GroupState<I>>
where
    I: Copy + Sub<Output = Duration>,
{
    let mut next = old.clone();
    let mut updated = false;

    if let Some(roster) = next_roster(&old.member_names, &update, partial) {
        debug!(members = roster.len(), partial, "roster changed");
        next.member_colors = Arc::new(assign_colors(&old.member_colors, &roster, &config.palette));
        next.member_names = Arc::new(roster);
        updated = true;
    }

    if let Some(members) = merge_members(&old.member_states, &next.member_names, update) {
        next.member_states = Arc::new(members);
        updated = true;

        if let Some(items) = rebuild_items(&old.items, &next.member_states) {
            trace!(items = items.len(), "item index changed");
            next.items = Arc::new(items);
        }
        if let Some(collections) = rebuild_collections(&old.collections, &next.member_states) {
            next.collections = Arc::new(collections);
        }

        let (previous, current) = (&old.member_states, &next.member_states);
        detect_drops(&mut next.xp_drops, &mut next.xp_drop_counter, previous, current, now);
    }

    if collect_expired(&mut next.xp_drops, &next.member_names, now, config.xp_drop_ttl) {
        updated = true;
    }

    updated.then_some(next)
}

/// Owner of the current aggregate.
///
/// Serializes dispatches and remembers the latest published state.
#[derive(Debug)]
pub struct GroupStore<I> {
    state: Arc<GroupState<I>>,
    config: EngineConfig,
}

impl<I> GroupStore<I>
where
    I: Copy + Sub<Output = Duration>,
{
    /// Create a store holding the empty aggregate.
    pub fn new(config: EngineConfig) -> Self {
        Self { state: Arc::new(GroupState::empty()), config }
    }

    /// Apply `action` at time `now`.
    ///
    /// Returns `true` if the aggregate changed.
    pub fn dispatch(&mut self, action: GroupAction, now: I) -> bool {
        let next = reduce(&self.state, action, now, &self.config);
        if Arc::ptr_eq(&next, &self.state) {
            trace!("dispatch left state unchanged");
            return false;
        }
        self.state = next;
        true
    }

    /// The current aggregate.
    pub fn state(&self) -> &Arc<GroupState<I>> {
        &self.state
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
