//! Member merging.

use std::sync::Arc;

use gimsync_core::{GroupStateUpdate, MemberState};
use tracing::trace;

use crate::{MemberStates, Roster};

/// Fold `update` into the member states of `roster`.
///
/// A member with an update is the default state overlaid with its prior
/// state, then with the update. If the result equals the prior state the
/// prior `Arc` is kept. Members without an update keep their prior `Arc`.
/// Members not on the roster are dropped.
///
/// Returns `None` when no member state changed.
pub(crate) fn merge_members(
    previous: &MemberStates,
    roster: &Roster,
    update: GroupStateUpdate,
) -> Option<MemberStates> {
    let mut update = update;
    let mut changed = previous.len() != roster.len();
    let mut merged = MemberStates::new();

    for name in roster {
        let prior = previous.get(name);
        let state = match (prior, update.remove(name)) {
            (Some(prior), None) => Arc::clone(prior),
            (prior, Some(partial)) => {
                let mut state = prior.map(|prior| MemberState::clone(prior)).unwrap_or_default();
                partial.apply_to(&mut state);
                match prior {
                    Some(prior) if **prior == state => Arc::clone(prior),
                    _ => {
                        trace!(member = %name, "member state changed");
                        changed = true;
                        Arc::new(state)
                    },
                }
            },
            (None, None) => {
                changed = true;
                Arc::new(MemberState::default())
            },
        };
        merged.insert(name.clone(), state);
    }

    if !changed {
        changed = previous.keys().ne(merged.keys());
    }
    changed.then_some(merged)
}
