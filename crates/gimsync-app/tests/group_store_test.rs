//! Group store behavior tests.
//!
//! Scenario tests for roster semantics, identity stability, structural
//! sharing of the item index and the experience drop lifecycle.

use std::{sync::Arc, time::Duration};

use gimsync_app::{
    DEFAULT_XP_DROP_TTL, DropList, EngineConfig, GroupAction, GroupState, GroupStore, SHARED_HUE,
    XpAmount,
};
use gimsync_core::{
    Collection, Container, GroupStateUpdate, ItemCollection, ItemId, ItemStack, MemberName,
    PartialMemberState, Skill, Skills,
};

fn at(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn name(name: &str) -> MemberName {
    MemberName::from(name)
}

fn store() -> GroupStore<Duration> {
    GroupStore::new(EngineConfig::default())
}

fn skills(entries: &[(Skill, u64)]) -> PartialMemberState {
    let skills: Skills = entries.iter().copied().collect();
    PartialMemberState { skills: Some(Arc::new(skills)), ..PartialMemberState::default() }
}

fn bank(entries: &[(u32, u32)]) -> PartialMemberState {
    let bank: ItemCollection =
        entries.iter().map(|&(id, n)| (ItemId(id), ItemStack::new(ItemId(id), n))).collect();
    PartialMemberState { bank: Some(Arc::new(bank)), ..PartialMemberState::default() }
}

fn collection(entries: &[(u32, u32)]) -> PartialMemberState {
    let log: Collection = entries.iter().map(|&(id, n)| (ItemId(id), n)).collect();
    PartialMemberState { collection: Some(Arc::new(log)), ..PartialMemberState::default() }
}

fn drop_list(state: &GroupState<Duration>, member: &str) -> Option<DropList<Duration>> {
    state.all_xp_drops().get(&name(member)).map(Arc::clone)
}

fn update(entries: Vec<(&str, PartialMemberState)>) -> GroupStateUpdate {
    entries.into_iter().map(|(member, partial)| (name(member), partial)).collect()
}

#[test]
fn alice_trains_attack() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", skills(&[(Skill::Attack, 0)])),
            ("Bob", skills(&[(Skill::Attack, 0)])),
        ])),
        at(0),
    );
    let before = Arc::clone(store.state());

    assert_eq!(before.member_names().len(), 2);
    assert_eq!(before.member_color(&name("Alice")).map(|c| c.hue_degrees), Some(330));
    assert_eq!(before.member_color(&name("Bob")).map(|c| c.hue_degrees), Some(100));

    store.dispatch(
        GroupAction::partial(update(vec![("Alice", skills(&[(Skill::Attack, 500)]))])),
        at(100),
    );
    let after = store.state();

    assert!(Arc::ptr_eq(before.member_names(), after.member_names()));
    assert!(Arc::ptr_eq(before.member_colors(), after.member_colors()));
    assert!(Arc::ptr_eq(
        before.member(&name("Bob")).expect("Bob tracked"),
        after.member(&name("Bob")).expect("Bob tracked"),
    ));
    assert!(Arc::ptr_eq(before.items(), after.items()));

    let drops = after.xp_drops(&name("Alice"));
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].amounts, vec![XpAmount { skill: Skill::Attack, amount: 500 }]);
    assert!(after.xp_drops(&name("Bob")).is_empty());
}

#[test]
fn partial_update_keeps_roster_and_full_update_prunes() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("A", PartialMemberState::default()),
            ("B", PartialMemberState::default()),
            ("C", PartialMemberState::default()),
        ])),
        at(0),
    );

    store.dispatch(GroupAction::partial(update(vec![("A", bank(&[(1, 1)]))])), at(1));
    assert_eq!(store.state().member_names().len(), 3);

    store.dispatch(GroupAction::full(update(vec![("A", bank(&[(1, 1)]))])), at(2));
    let state = store.state();
    assert_eq!(state.member_names().iter().collect::<Vec<_>>(), vec![&name("A")]);
    assert!(state.member(&name("B")).is_none());
    assert!(state.member_color(&name("C")).is_none());
}

#[test]
fn matching_update_returns_same_state() {
    let mut store = store();
    let snapshot = update(vec![
        ("Alice", bank(&[(995, 100)])),
        ("Bob", skills(&[(Skill::Fishing, 1000)])),
    ]);
    store.dispatch(GroupAction::full(snapshot.clone()), at(0));
    let before = Arc::clone(store.state());

    assert!(!store.dispatch(GroupAction::full(snapshot.clone()), at(500)));
    assert!(!store.dispatch(GroupAction::partial(snapshot), at(600)));
    assert!(Arc::ptr_eq(&before, store.state()));
}

#[test]
fn untouched_items_keep_identity() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", bank(&[(995, 100), (4151, 1)])),
            ("Bob", bank(&[(995, 5)])),
        ])),
        at(0),
    );
    let before = Arc::clone(store.state());

    store.dispatch(
        GroupAction::partial(update(vec![("Bob", bank(&[(995, 5), (314, 10)]))])),
        at(1),
    );
    let after = store.state();

    let whip = ItemId(4151);
    let coins = ItemId(995);
    assert!(Arc::ptr_eq(
        before.item(whip).expect("whip held"),
        after.item(whip).expect("whip held")
    ));
    assert!(Arc::ptr_eq(
        before.item(coins).expect("coins held"),
        after.item(coins).expect("coins held")
    ));
    assert_eq!(after.item(ItemId(314)).map(|item| item.total()), Some(10));
    assert_eq!(
        after
            .item(coins)
            .and_then(|item| item.member(&name("Bob")))
            .map(|breakdown| breakdown.get(Container::Bank)),
        Some(5)
    );
}

#[test]
fn emptied_item_leaves_the_index() {
    let mut store = store();
    store.dispatch(GroupAction::full(update(vec![("Alice", bank(&[(1, 3), (2, 1)]))])), at(0));
    store.dispatch(GroupAction::full(update(vec![("Alice", bank(&[(1, 0), (2, 1)]))])), at(1));

    assert!(store.state().item(ItemId(1)).is_none());
    assert!(store.state().item(ItemId(2)).is_some());
}

#[test]
fn lost_experience_never_drops() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![(
            "Alice",
            skills(&[(Skill::Attack, 1000), (Skill::Magic, 1000), (Skill::Prayer, 50)]),
        )])),
        at(0),
    );
    store.dispatch(
        GroupAction::full(update(vec![(
            "Alice",
            skills(&[(Skill::Attack, 900), (Skill::Magic, 1200), (Skill::Prayer, 80)]),
        )])),
        at(1),
    );

    let drops = store.state().xp_drops(&name("Alice"));
    assert_eq!(drops.len(), 1);
    assert_eq!(
        drops[0].amounts,
        vec![
            XpAmount { skill: Skill::Magic, amount: 200 },
            XpAmount { skill: Skill::Prayer, amount: 30 },
        ]
    );

    store.dispatch(
        GroupAction::full(update(vec![("Alice", skills(&[(Skill::Attack, 0)]))])),
        at(2),
    );
    assert_eq!(store.state().xp_drops(&name("Alice")).len(), 1);
}

#[test]
fn drop_ids_increase_across_members() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", skills(&[(Skill::Attack, 0)])),
            ("Bob", skills(&[(Skill::Attack, 0)])),
        ])),
        at(0),
    );
    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", skills(&[(Skill::Attack, 10)])),
            ("Bob", skills(&[(Skill::Attack, 10)])),
        ])),
        at(1),
    );
    store.dispatch(
        GroupAction::partial(update(vec![("Alice", skills(&[(Skill::Attack, 20)]))])),
        at(2),
    );

    let state = store.state();
    let alice: Vec<u64> = state.xp_drops(&name("Alice")).iter().map(|drop| drop.id).collect();
    let bob: Vec<u64> = state.xp_drops(&name("Bob")).iter().map(|drop| drop.id).collect();
    assert_eq!(alice, vec![0, 2]);
    assert_eq!(bob, vec![1]);
    assert_eq!(state.xp_drop_counter(), 3);
}

#[test]
fn drop_expires_between_nine_and_ten_seconds() {
    let ttl = DEFAULT_XP_DROP_TTL;
    let mut store = store();
    store.dispatch(GroupAction::full(update(vec![("A", skills(&[(Skill::Attack, 0)]))])), at(0));
    store.dispatch(GroupAction::full(update(vec![("A", skills(&[(Skill::Attack, 5)]))])), at(1000));

    let created = at(1000);
    let state = Arc::clone(store.state());
    assert_eq!(state.live_xp_drops(&name("A"), created + at(9000), ttl).count(), 1);
    assert_eq!(state.live_xp_drops(&name("A"), created + at(9700), ttl).count(), 0);

    store.dispatch(GroupAction::partial(GroupStateUpdate::new()), created + at(9000));
    assert_eq!(store.state().xp_drops(&name("A")).len(), 1);

    store.dispatch(GroupAction::partial(GroupStateUpdate::new()), created + at(9700));
    assert!(store.state().xp_drops(&name("A")).is_empty());
}

#[test]
fn surviving_drop_lists_keep_identity_during_collection() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("A", skills(&[(Skill::Attack, 0)])),
            ("B", skills(&[(Skill::Attack, 0)])),
        ])),
        at(0),
    );
    let trained =
        |member| GroupAction::partial(update(vec![(member, skills(&[(Skill::Attack, 1)]))]));
    store.dispatch(trained("A"), at(0));
    store.dispatch(trained("B"), at(5000));
    let before = Arc::clone(store.state());

    store.dispatch(GroupAction::partial(GroupStateUpdate::new()), at(9600));
    let after = store.state();

    assert!(after.xp_drops(&name("A")).is_empty());
    let (old, new) = (drop_list(&before, "B"), drop_list(after, "B"));
    assert!(matches!((old, new), (Some(old), Some(new)) if Arc::ptr_eq(&old, &new)));
}

#[test]
fn colors_are_stable_until_wipe() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("Bob", PartialMemberState::default()),
            ("Carol", PartialMemberState::default()),
        ])),
        at(0),
    );
    let bob = store.state().member_color(&name("Bob"));
    let carol = store.state().member_color(&name("Carol"));

    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", PartialMemberState::default()),
            ("Carol", PartialMemberState::default()),
            (MemberName::SHARED, PartialMemberState::default()),
        ])),
        at(1),
    );
    let state = store.state();
    assert_eq!(state.member_color(&name("Carol")), carol);
    assert_eq!(state.member_color(&name("Alice")), bob);
    assert_eq!(
        state.member_color(&MemberName::shared()).map(|c| c.hue_degrees),
        Some(SHARED_HUE)
    );

    store.dispatch(GroupAction::Wipe, at(2));
    assert!(store.state().member_colors().is_empty());
}

#[test]
fn collection_logs_track_members() {
    let mut store = store();
    store.dispatch(
        GroupAction::full(update(vec![
            ("Alice", PartialMemberState::default()),
            ("Bob", PartialMemberState::default()),
        ])),
        at(0),
    );
    assert!(store.state().collections().is_empty());

    store.dispatch(GroupAction::partial(update(vec![("Alice", collection(&[(1, 1)]))])), at(1));
    let first = Arc::clone(store.state());
    assert_eq!(first.collection(&name("Alice")).map(|log| log.len()), Some(1));
    assert!(first.collection(&name("Bob")).is_none());

    store.dispatch(GroupAction::partial(update(vec![("Bob", collection(&[(2, 3)]))])), at(2));
    let second = store.state();
    assert!(Arc::ptr_eq(
        first.collection(&name("Alice")).expect("Alice has a log"),
        second.collection(&name("Alice")).expect("Alice has a log"),
    ));
    assert_eq!(second.collections().len(), 2);
}
