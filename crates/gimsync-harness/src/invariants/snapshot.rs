//! Observable state snapshots for invariant checking.
//!
//! Snapshots flatten a published aggregate at one point in time. Invariants
//! operate on snapshots rather than live state so checks do not depend on the
//! engine's instant type.

use std::{collections::BTreeMap, ops::Sub, time::Duration};

use gimsync_app::GroupState;
use gimsync_core::{ItemId, MemberName};

/// Snapshot of one published aggregate.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    /// Roster.
    pub roster: Vec<MemberName>,
    /// Members with a canonical state.
    pub tracked: Vec<MemberName>,
    /// Hue per member.
    pub colors: BTreeMap<MemberName, u16>,
    /// Per item, the quantity each holder has across all containers.
    pub items: BTreeMap<ItemId, BTreeMap<MemberName, u64>>,
    /// Per member, pending experience drops in list order.
    pub drops: BTreeMap<MemberName, Vec<DropSnapshot>>,
    /// Id the next drop will receive.
    pub xp_drop_counter: u64,
    /// Drop lifetime the aggregate was built with.
    pub xp_drop_ttl: Duration,
}

/// Snapshot of one experience drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropSnapshot {
    /// Drop id.
    pub id: u64,
    /// Gained amounts, one per skill.
    pub amounts: Vec<u64>,
    /// Age at capture time.
    pub age: Duration,
}

impl GroupSnapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture `state` as seen at `now`.
    pub fn capture<I>(state: &GroupState<I>, now: I, xp_drop_ttl: Duration) -> Self
    where
        I: Copy + Sub<Output = Duration>,
    {
        let items = state
            .items()
            .iter()
            .map(|(item_id, breakdown)| {
                let holders =
                    breakdown.iter().map(|(name, held)| (name.clone(), held.total())).collect();
                (*item_id, holders)
            })
            .collect();

        let drops = state
            .all_xp_drops()
            .iter()
            .map(|(name, list)| {
                let list = list
                    .iter()
                    .map(|drop| DropSnapshot {
                        id: drop.id,
                        amounts: drop.amounts.iter().map(|amount| amount.amount).collect(),
                        age: drop.age(now),
                    })
                    .collect();
                (name.clone(), list)
            })
            .collect();

        Self {
            roster: state.member_names().iter().cloned().collect(),
            tracked: state.member_states().keys().cloned().collect(),
            colors: state
                .member_colors()
                .iter()
                .map(|(name, color)| (name.clone(), color.hue_degrees))
                .collect(),
            items,
            drops,
            xp_drop_counter: state.xp_drop_counter(),
            xp_drop_ttl,
        }
    }
}
