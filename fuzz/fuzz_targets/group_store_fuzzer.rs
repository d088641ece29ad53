//! Fuzz target for the group store
//!
//! # Strategy
//!
//! - Arbitrary interleavings of wipes, full and partial updates
//! - Small name and item spaces so members and items collide often
//! - Arbitrary virtual time gaps, including long ones that expire drops
//!
//! # Invariants
//!
//! - NEVER panic on any action sequence
//! - Standard aggregate invariants hold after every dispatch
//! - Repeating an update immediately is a no-op

#![no_main]

use std::{sync::Arc, time::Duration};

use arbitrary::Arbitrary;
use gimsync_app::{EngineConfig, GroupAction, GroupStore};
use gimsync_core::{
    GroupStateUpdate, ItemCollection, ItemId, ItemStack, MemberName, PartialMemberState, Skill,
    Skills,
};
use gimsync_harness::{GroupSnapshot, InvariantRegistry, SimInstant};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["Alice", "Bob", "Carol", MemberName::SHARED];

#[derive(Debug, Arbitrary)]
enum Step {
    Wipe,
    Update { partial: bool, members: Vec<(u8, Patch)>, gap_ms: u16 },
}

#[derive(Debug, Arbitrary)]
struct Patch {
    bank: Option<Vec<(u8, u8)>>,
    skills: Option<Vec<(u8, u16)>>,
}

impl Patch {
    fn into_partial(self) -> PartialMemberState {
        let bank = self.bank.map(|items| {
            let bank: ItemCollection = items
                .into_iter()
                .map(|(id, quantity)| {
                    let id = ItemId(u32::from(id % 8) + 1);
                    (id, ItemStack::new(id, u32::from(quantity % 4)))
                })
                .collect();
            Arc::new(bank)
        });
        let skills = self.skills.map(|entries| {
            let skills: Skills = entries
                .into_iter()
                .map(|(index, xp)| {
                    (Skill::ALL[usize::from(index) % Skill::ALL.len()], u64::from(xp))
                })
                .collect();
            Arc::new(skills)
        });
        PartialMemberState { bank, skills, ..PartialMemberState::default() }
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let config = EngineConfig::default();
    let registry = InvariantRegistry::standard();
    let mut store = GroupStore::new(config.clone());
    let mut now = SimInstant::default();

    for step in steps {
        match step {
            Step::Wipe => {
                store.dispatch(GroupAction::Wipe, now);
            },
            Step::Update { partial, members, gap_ms } => {
                now = now + Duration::from_millis(u64::from(gap_ms));
                let update: GroupStateUpdate = members
                    .into_iter()
                    .map(|(index, patch)| {
                        let name = NAMES[usize::from(index) % NAMES.len()];
                        (MemberName::from(name), patch.into_partial())
                    })
                    .collect();
                let action = |update| {
                    if partial { GroupAction::partial(update) } else { GroupAction::full(update) }
                };

                store.dispatch(action(update.clone()), now);
                assert!(!store.dispatch(action(update), now), "repeated update changed state");
            },
        }

        let snapshot = GroupSnapshot::capture(store.state(), now, config.xp_drop_ttl);
        if let Err(violations) = registry.check_all(&snapshot) {
            panic!("invariant violations: {violations:?}");
        }
    }
});
