//! Experience drop detection and garbage collection.

use std::{ops::Sub, sync::Arc, time::Duration};

use gimsync_core::{MemberName, MemberState, Skill};
use tracing::trace;

use crate::{DropList, ExperienceDrop, MemberStates, Roster, XpAmount, XpDrops};

/// Skills that gained experience between `old` and `new`.
///
/// Only skills present in both states are compared. Nothing is reported
/// unless both states carry skills.
pub(crate) fn gains(old: &MemberState, new: &MemberState) -> Vec<XpAmount> {
    let (Some(old), Some(new)) = (&old.skills, &new.skills) else {
        return Vec::new();
    };
    if Arc::ptr_eq(old, new) {
        return Vec::new();
    }

    Skill::ALL
        .into_iter()
        .filter_map(|skill| {
            let before = old.get(&skill)?;
            let after = new.get(&skill)?;
            (after > before).then(|| XpAmount { skill, amount: after - before })
        })
        .collect()
}

/// Append one drop per member whose skills went up.
///
/// Ids are taken from `counter`, which is advanced once per drop. The map is
/// only copied once a drop is actually created. Returns whether any drop was
/// created.
pub(crate) fn detect_drops<I: Copy>(
    drops: &mut Arc<XpDrops<I>>,
    counter: &mut u64,
    previous: &MemberStates,
    next: &MemberStates,
    now: I,
) -> bool {
    let mut created = false;

    for (name, new) in next {
        let Some(old) = previous.get(name) else { continue };
        if Arc::ptr_eq(old, new) {
            continue;
        }
        let amounts = gains(old, new);
        if amounts.is_empty() {
            continue;
        }

        let id = *counter;
        *counter += 1;
        trace!(member = %name, id, skills = amounts.len(), "experience drop");

        let list = Arc::make_mut(drops).entry(name.clone()).or_default();
        Arc::make_mut(list).push(ExperienceDrop { id, amounts, created_at: now });
        created = true;
    }

    created
}

/// Drop expired entries and entries of members no longer on the roster.
///
/// Leaves `drops` untouched, without copying, when nothing is due for
/// removal. Lists that lose nothing keep their `Arc`. Members left with no
/// drops are removed. Returns whether anything was removed.
pub(crate) fn collect_expired<I>(
    drops: &mut Arc<XpDrops<I>>,
    roster: &Roster,
    now: I,
    ttl: Duration,
) -> bool
where
    I: Copy + Sub<Output = Duration>,
{
    let stale = |name: &MemberName, list: &DropList<I>| {
        !roster.contains(name) || list.iter().any(|drop| drop.is_expired(now, ttl))
    };
    if !drops.iter().any(|(name, list)| stale(name, list)) {
        return false;
    }

    Arc::make_mut(drops).retain(|name, list| {
        if !roster.contains(name) {
            return false;
        }
        if stale(name, list) {
            let live: Vec<_> =
                list.iter().filter(|drop| !drop.is_expired(now, ttl)).cloned().collect();
            *list = Arc::new(live);
        }
        !list.is_empty()
    });
    true
}

#[cfg(test)]
mod tests {
    use gimsync_core::Skills;

    use super::*;

    fn with_skills(skills: &[(Skill, u64)]) -> Arc<MemberState> {
        let skills: Skills = skills.iter().copied().collect();
        Arc::new(MemberState { skills: Some(Arc::new(skills)), ..MemberState::default() })
    }

    fn at(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    const TTL: Duration = Duration::from_millis(9600);

    #[test]
    fn gains_compare_common_skills_only() {
        let old = with_skills(&[(Skill::Attack, 100), (Skill::Cooking, 50), (Skill::Magic, 10)]);
        let new = with_skills(&[(Skill::Attack, 150), (Skill::Cooking, 40), (Skill::Mining, 5)]);

        assert_eq!(gains(&old, &new), vec![XpAmount { skill: Skill::Attack, amount: 50 }]);
        assert!(gains(&MemberState::default(), &new).is_empty());
    }

    #[test]
    fn one_drop_per_member_per_update() {
        let alice = MemberName::from("Alice");
        let previous = MemberStates::from([(
            alice.clone(),
            with_skills(&[(Skill::Attack, 100), (Skill::Strength, 100)]),
        )]);
        let next = MemberStates::from([(
            alice.clone(),
            with_skills(&[(Skill::Attack, 110), (Skill::Strength, 130)]),
        )]);

        let mut drops = Arc::new(XpDrops::new());
        let mut counter = 0;
        assert!(detect_drops(&mut drops, &mut counter, &previous, &next, at(0)));

        assert_eq!(counter, 1);
        let list = &drops[&alice];
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 0);
        assert_eq!(list[0].amounts.len(), 2);
        assert_eq!(list[0].amounts[1], XpAmount { skill: Skill::Strength, amount: 30 });
    }

    #[test]
    fn new_members_produce_no_drop() {
        let next =
            MemberStates::from([(MemberName::from("Alice"), with_skills(&[(Skill::Attack, 1)]))]);

        let empty = Arc::new(XpDrops::new());
        let mut drops = Arc::clone(&empty);
        let mut counter = 0;
        assert!(!detect_drops(&mut drops, &mut counter, &MemberStates::new(), &next, at(0)));
        assert!(drops.is_empty());
        assert!(Arc::ptr_eq(&empty, &drops));
    }

    #[test]
    fn expired_drops_are_collected() {
        let alice = MemberName::from("Alice");
        let roster = Roster::from([alice.clone()]);
        let drop_at = |id, created_at| ExperienceDrop { id, amounts: Vec::new(), created_at };
        let list = vec![drop_at(0, at(0)), drop_at(1, at(5000))];
        let mut drops = Arc::new(XpDrops::from([(alice.clone(), Arc::new(list))]));
        let before = Arc::clone(&drops);

        assert!(!collect_expired(&mut drops, &roster, at(9000), TTL));
        assert_eq!(drops[&alice].len(), 2);
        assert!(Arc::ptr_eq(&before, &drops));

        assert!(collect_expired(&mut drops, &roster, at(9700), TTL));
        assert_eq!(drops[&alice].iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);

        assert!(collect_expired(&mut drops, &roster, at(14_600), TTL));
        assert!(drops.is_empty());
    }

    #[test]
    fn departed_members_lose_their_drops() {
        let alice = MemberName::from("Alice");
        let mut drops = Arc::new(XpDrops::from([(
            alice,
            Arc::new(vec![ExperienceDrop { id: 0, amounts: Vec::new(), created_at: at(0) }]),
        )]));

        assert!(collect_expired(&mut drops, &Roster::new(), at(1), TTL));
        assert!(drops.is_empty());
    }
}
