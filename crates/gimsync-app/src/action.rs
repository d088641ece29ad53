//! Actions applied by the dispatcher.

use gimsync_core::GroupStateUpdate;

/// One step of the group state lifecycle.
///
/// Actions are applied strictly one at a time by [`crate::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupAction {
    /// Discard everything and start from the empty aggregate.
    ///
    /// Dispatched on connect, reconnect and disconnect.
    Wipe,

    /// Fold a snapshot into the aggregate.
    Update {
        /// A partial snapshot covers only some members and never removes
        /// anyone. A full snapshot is authoritative: members it does not
        /// report are dropped.
        partial: bool,
        /// Reported fields per member.
        update: GroupStateUpdate,
    },
}

impl GroupAction {
    /// Full snapshot of every tracked member.
    pub fn full(update: GroupStateUpdate) -> Self {
        Self::Update { partial: false, update }
    }

    /// Snapshot of a subset of members.
    pub fn partial(update: GroupStateUpdate) -> Self {
        Self::Update { partial: true, update }
    }
}
