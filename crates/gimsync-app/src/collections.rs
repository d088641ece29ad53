//! Collection log snapshots.

use std::sync::Arc;

use crate::{Collections, MemberStates, SameContents};

/// Collect every member's collection log.
///
/// A log with the same contents as before keeps its previous `Arc`. Returns
/// `None` when no log was added, removed or changed.
pub(crate) fn rebuild_collections(
    previous: &Collections,
    members: &MemberStates,
) -> Option<Collections> {
    let mut changed = false;
    let collections: Collections = members
        .iter()
        .filter_map(|(name, state)| {
            let next = state.collection.as_ref()?;
            let shared = match previous.get(name) {
                Some(old) if old.same_contents(next) => Arc::clone(old),
                _ => {
                    changed = true;
                    Arc::clone(next)
                },
            };
            Some((name.clone(), shared))
        })
        .collect();

    (changed || collections.len() != previous.len()).then_some(collections)
}
