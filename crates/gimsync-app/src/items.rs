//! Item aggregation index.

use std::{collections::BTreeMap, sync::Arc};

use gimsync_core::{Container, ItemId};

use crate::{ItemBreakdown, ItemIndex, MemberStates, share_if_unchanged};

/// Rebuild the item index from `members`.
///
/// Every non-zero stack of every container of every member contributes to
/// its item's breakdown. Breakdowns equal to their previous version keep the
/// previous `Arc`. Returns `None` when the index is unchanged.
pub(crate) fn rebuild_items(previous: &ItemIndex, members: &MemberStates) -> Option<ItemIndex> {
    let mut breakdowns: BTreeMap<ItemId, ItemBreakdown> = BTreeMap::new();

    for (name, state) in members {
        for container in Container::ALL {
            for stack in container.stacks(state).filter(|stack| stack.quantity > 0) {
                breakdowns.entry(stack.item_id).or_default().add(
                    name,
                    container,
                    u64::from(stack.quantity),
                );
            }
        }
    }

    let mut changed = breakdowns.len() != previous.len();
    let index: ItemIndex = breakdowns
        .into_iter()
        .map(|(item_id, breakdown)| {
            let old = previous.get(&item_id);
            let shared = share_if_unchanged(old, breakdown);
            changed |= !old.is_some_and(|old| Arc::ptr_eq(old, &shared));
            (item_id, shared)
        })
        .collect();

    changed.then_some(index)
}
