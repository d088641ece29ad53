//! Polling runtime tests.
//!
//! Drive the production [`Runtime`] with a scripted driver on virtual time
//! and check scheduling, failure handling and shutdown.

use std::time::Duration;

use gimsync_app::{EngineConfig, PollConfig, Runtime, SnapshotSource};
use gimsync_core::{GroupStateUpdate, MemberName, Skill};
use gimsync_harness::{
    InvariantRegistry, SimDriver, SimEnv, SimError, SimInstant,
    fixtures::{MemberPatch, update},
};

fn at(millis: u64) -> SimInstant {
    SimInstant::from_start(Duration::from_millis(millis))
}

fn driver(env: &SimEnv) -> SimDriver {
    SimDriver::new(env.clone())
        .with_invariants(InvariantRegistry::standard(), EngineConfig::default().xp_drop_ttl)
}

fn runtime(driver: &SimDriver, env: &SimEnv) -> Runtime<SimDriver, SimEnv> {
    Runtime::new(driver.clone(), env.clone(), EngineConfig::default(), PollConfig::default())
}

fn group_fetch_times(driver: &SimDriver) -> Vec<SimInstant> {
    driver
        .fetches()
        .into_iter()
        .filter(|(source, _)| *source == SnapshotSource::GroupData)
        .map(|(_, completed)| completed)
        .collect()
}

#[tokio::test]
async fn next_fetch_is_scheduled_after_completion() {
    let env = SimEnv::new();
    let driver = driver(&env).with_latency(Duration::from_millis(100));
    let members = || update([("Alice", MemberPatch::new()), ("Bob", MemberPatch::new())]);
    driver.script(SnapshotSource::GroupData, Ok(members()));
    driver.script(SnapshotSource::GroupData, Ok(members()));
    driver.script(SnapshotSource::GroupData, Ok(members()));
    driver.script(SnapshotSource::CollectionLog, Ok(GroupStateUpdate::new()));
    driver.close_after_fetches(5);

    runtime(&driver, &env).run().await.expect("run completes");

    assert_eq!(group_fetch_times(&driver), vec![at(100), at(1200), at(2300), at(3400)]);
    let fetches = driver.fetches();
    let collection_fetches =
        fetches.iter().filter(|(source, _)| *source == SnapshotSource::CollectionLog).count();
    assert_eq!(collection_fetches, 1);
}

#[tokio::test]
async fn failed_fetch_is_retried_after_interval() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(SnapshotSource::GroupData, Err(SimError::Unavailable("timeout".into())));
    driver.script(SnapshotSource::GroupData, Ok(update([("Alice", MemberPatch::new())])));
    driver.close_after_fetches(4);

    runtime(&driver, &env).run().await.expect("run completes");

    assert_eq!(group_fetch_times(&driver), vec![at(0), at(1000), at(2000)]);

    let published = driver.published();
    assert_eq!(published.len(), 3);
    assert!(published[0].member_names().is_empty());
    assert!(published[1].member(&MemberName::from("Alice")).is_some());
}

#[tokio::test]
async fn fetch_completing_after_close_is_discarded() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(SnapshotSource::GroupData, Ok(update([("Alice", MemberPatch::new())])));
    driver.script(SnapshotSource::CollectionLog, Ok(GroupStateUpdate::new()));
    driver.script(SnapshotSource::GroupData, Ok(update([("Mallory", MemberPatch::new())])));
    driver.close_after_fetches(3);

    runtime(&driver, &env).run().await.expect("run completes");

    let mallory = MemberName::from("Mallory");
    assert!(driver.published().iter().all(|state| state.member(&mallory).is_none()));
    assert!(driver.is_stopped());
}

#[tokio::test]
async fn close_abandons_a_stalled_fetch() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(
        SnapshotSource::GroupData,
        Ok(update([("Alice", MemberPatch::new().bank(&[(995, 1000)]))])),
    );
    driver.script(SnapshotSource::CollectionLog, Ok(GroupStateUpdate::new()));
    driver.script(SnapshotSource::GroupData, Ok(update([("Mallory", MemberPatch::new())])));
    driver.stall_after_fetches(3);
    driver.close_after_fetches(3);

    let run = tokio::time::timeout(Duration::from_secs(5), runtime(&driver, &env).run()).await;
    run.expect("close does not wait for the stalled fetch").expect("run completes");

    assert_eq!(driver.fetches().len(), 3);
    assert!(driver.is_stopped());

    let published = driver.published();
    let last = published.last().expect("final wipe published");
    assert!(last.member_names().is_empty());
    assert!(last.items().is_empty());

    let mallory = MemberName::from("Mallory");
    assert!(published.iter().all(|state| state.member(&mallory).is_none()));
    assert!(published.iter().any(|state| state.member(&MemberName::from("Alice")).is_some()));
}

#[tokio::test]
async fn close_during_a_stalled_fetch_from_outside() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(SnapshotSource::GroupData, Ok(update([("Alice", MemberPatch::new())])));
    driver.stall_after_fetches(1);

    let closer = driver.clone();
    let close_later = async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        closer.close();
    };
    let run = tokio::time::timeout(Duration::from_secs(5), runtime(&driver, &env).run());
    let (run, ()) = tokio::join!(run, close_later);
    run.expect("run ends once the session closes").expect("run completes");

    let published = driver.published();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|state| state.member_names().is_empty()));
    assert!(driver.is_stopped());
}

#[tokio::test]
async fn session_ends_with_a_wipe() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(
        SnapshotSource::GroupData,
        Ok(update([("Alice", MemberPatch::new().bank(&[(995, 1000)]))])),
    );
    driver.close_after_fetches(2);

    runtime(&driver, &env).run().await.expect("run completes");

    let published = driver.published();
    let last = published.last().expect("final wipe published");
    assert!(last.member_names().is_empty());
    assert!(last.items().is_empty());
    assert!(published.iter().any(|state| !state.items().is_empty()));
}

#[tokio::test]
async fn collection_log_snapshots_never_prune() {
    let env = SimEnv::new();
    let driver = driver(&env);
    driver.script(
        SnapshotSource::GroupData,
        Ok(update([
            ("Alice", MemberPatch::new().skills(&[(Skill::Attack, 100)])),
            ("Bob", MemberPatch::new()),
        ])),
    );
    driver.script(
        SnapshotSource::CollectionLog,
        Ok(update([("Alice", MemberPatch::new().collection(&[(4151, 1)]))])),
    );
    driver.close_after_fetches(3);

    runtime(&driver, &env).run().await.expect("run completes");

    let published = driver.published();
    let with_log = published
        .iter()
        .find(|state| !state.collections().is_empty())
        .expect("collection log applied");
    assert_eq!(with_log.member_names().len(), 2);
    assert!(with_log.collection(&MemberName::from("Alice")).is_some());
}

#[tokio::test]
async fn experience_drops_are_published() {
    let env = SimEnv::new();
    let driver = driver(&env);
    let alice = |xp| update([("Alice", MemberPatch::new().skills(&[(Skill::Magic, xp)]))]);
    driver.script(SnapshotSource::GroupData, Ok(alice(1000)));
    driver.script(SnapshotSource::CollectionLog, Ok(GroupStateUpdate::new()));
    driver.script(SnapshotSource::GroupData, Ok(alice(1250)));
    driver.close_after_fetches(4);

    runtime(&driver, &env).run().await.expect("run completes");

    let alice = MemberName::from("Alice");
    let dropped = driver
        .published()
        .iter()
        .find_map(|state| state.xp_drops(&alice).first().map(|drop| drop.amounts.clone()))
        .expect("drop published");
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].amount, 250);
}
