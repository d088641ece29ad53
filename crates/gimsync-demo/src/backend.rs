//! Simulated group backend.
//!
//! Two members play while the demo runs: one cooks redberry pies for Thurgo,
//! the other kills cows. Every call to [`DemoBackend::advance`] moves the
//! simulation one step. Snapshots are rendered in the backend's wire format
//! so they go through the same decoder as real responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gimsync_core::{MemberName, Skill};
use serde_json::{Map, Value, json};

const COINS: u32 = 995;
const UNCOOKED_PIE: u32 = 2321;
const REDBERRY_PIE: u32 = 2325;
const COWHIDE: u32 = 1739;
const RAW_BEEF: u32 = 2132;
const BEGINNER_CLUE: u32 = 23_182;

const INVENTORY_SLOTS: usize = 28;
const PIE_BATCH: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Cooking,
    CowKilling,
}

#[derive(Debug, Clone)]
struct Player {
    name: &'static str,
    activity: Activity,
    position: (i32, i32, u8),
    bank: BTreeMap<u32, u32>,
    inventory: Vec<Option<(u32, u32)>>,
    skills: BTreeMap<Skill, u64>,
    collection: BTreeMap<u32, u32>,
}

impl Player {
    fn new(name: &'static str, activity: Activity, position: (i32, i32, u8)) -> Self {
        let skills = Skill::ALL
            .into_iter()
            .map(|skill| (skill, if skill == Skill::Hitpoints { 1154 } else { 0 }))
            .collect();
        Self {
            name,
            activity,
            position,
            bank: BTreeMap::from([(COINS, 25_000)]),
            inventory: vec![None; INVENTORY_SLOTS],
            skills,
            collection: BTreeMap::new(),
        }
    }

    fn gain(&mut self, skill: Skill, amount: u64) {
        *self.skills.entry(skill).or_insert(0) += amount;
    }

    fn free_slot(&self) -> Option<usize> {
        self.inventory.iter().position(Option::is_none)
    }

    fn bank_all(&mut self, item_id: u32) {
        for slot in &mut self.inventory {
            if let Some((id, quantity)) = *slot
                && id == item_id
            {
                *self.bank.entry(id).or_insert(0) += quantity;
                *slot = None;
            }
        }
    }

    fn cook(&mut self) {
        if let Some(slot) = self.inventory.iter().position(|slot| *slot == Some((UNCOOKED_PIE, 1)))
        {
            self.inventory[slot] = Some((REDBERRY_PIE, 1));
            self.gain(Skill::Cooking, 78);
            return;
        }

        self.bank_all(REDBERRY_PIE);
        let stock = self.bank.entry(UNCOOKED_PIE).or_insert(0);
        if *stock < PIE_BATCH {
            *stock += 100;
        }
        *stock -= PIE_BATCH;
        for slot in self.inventory.iter_mut().take(PIE_BATCH as usize) {
            *slot = Some((UNCOOKED_PIE, 1));
        }
    }

    fn kill_cow(&mut self, kills: u64) {
        self.gain(Skill::Attack, 32);
        self.gain(Skill::Hitpoints, 10);
        self.gain(Skill::Strength, if kills % 3 == 0 { 8 } else { 0 });

        match self.free_slot() {
            Some(slot) => {
                let drop = if kills % 2 == 0 { COWHIDE } else { RAW_BEEF };
                self.inventory[slot] = Some((drop, 1));
            },
            None => {
                self.bank_all(COWHIDE);
                self.bank_all(RAW_BEEF);
            },
        }

        if kills % 25 == 0 {
            *self.collection.entry(BEGINNER_CLUE).or_insert(0) += 1;
        }
    }

    fn render(&self, now: DateTime<Utc>) -> Value {
        let skills: Vec<u64> =
            Skill::ALL.iter().map(|skill| self.skills.get(skill).copied().unwrap_or(0)).collect();
        let inventory: Vec<u32> = self
            .inventory
            .iter()
            .flat_map(|slot| <[u32; 2]>::from(slot.unwrap_or((0, 0))))
            .collect();
        let (x, y, plane) = self.position;
        json!({
            "name": self.name,
            "last_updated": now.to_rfc3339(),
            "bank": flatten(&self.bank),
            "inventory": inventory,
            "skills": skills,
            "coordinates": [x, y, plane],
            "stats": [99, 99, 43, 43, 10_000, 10_000, 302],
        })
    }
}

/// In-process stand-in for the group backend.
#[derive(Debug, Clone)]
pub struct DemoBackend {
    players: Vec<Player>,
    shared_bank: BTreeMap<u32, u32>,
    steps: u64,
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoBackend {
    /// A group of two players plus shared storage.
    pub fn new() -> Self {
        Self {
            players: vec![
                Player::new("Thurgo Fan", Activity::Cooking, (3001, 3145, 0)),
                Player::new("Cow31337Killer", Activity::CowKilling, (3259, 3271, 0)),
            ],
            shared_bank: BTreeMap::from([(COINS, 1_000_000), (REDBERRY_PIE, 2)]),
            steps: 0,
        }
    }

    /// Move the simulation one step.
    pub fn advance(&mut self) {
        self.steps += 1;
        let steps = self.steps;
        for player in &mut self.players {
            match player.activity {
                Activity::Cooking => player.cook(),
                Activity::CowKilling => player.kill_cow(steps),
            }
        }
    }

    /// Every member with every field, as the group data endpoint reports it.
    pub fn group_data(&self, now: DateTime<Utc>) -> Value {
        let mut members: Vec<Value> =
            self.players.iter().map(|player| player.render(now)).collect();
        members.push(json!({
            "name": MemberName::SHARED,
            "bank": flatten(&self.shared_bank),
        }));
        Value::Array(members)
    }

    /// Collection logs keyed by member, as the collection log endpoint
    /// reports them.
    pub fn collection_logs(&self) -> Value {
        let members: Map<String, Value> = self
            .players
            .iter()
            .map(|player| {
                let log: Map<String, Value> = player
                    .collection
                    .iter()
                    .map(|(id, count)| (id.to_string(), Value::from(*count)))
                    .collect();
                (player.name.to_string(), json!({ "collection_log": log }))
            })
            .collect();
        Value::Object(members)
    }

    /// Number of steps simulated so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

fn flatten(items: &BTreeMap<u32, u32>) -> Vec<u32> {
    items.iter().flat_map(|(id, quantity)| [*id, *quantity]).collect()
}

#[cfg(test)]
mod tests {
    use gimsync_core::{ItemId, decode_group_update};

    use super::*;

    #[test]
    fn snapshots_decode() {
        let mut backend = DemoBackend::new();
        for _ in 0..30 {
            backend.advance();
        }

        let update = decode_group_update(&backend.group_data(Utc::now())).expect("array root");

        assert_eq!(update.len(), 3);
        let cook = &update[&MemberName::from("Thurgo Fan")];
        assert!(cook.skills.as_ref().is_some_and(|skills| skills[&Skill::Cooking] > 0));
        assert_eq!(cook.inventory.as_ref().map(|slots| slots.len()), Some(INVENTORY_SLOTS));
        assert!(update[&MemberName::shared()].bank.is_some());
    }

    #[test]
    fn cooking_turns_uncooked_pies_into_pies() {
        let mut backend = DemoBackend::new();
        backend.advance();
        backend.advance();

        let cook = &backend.players[0];
        assert!(cook.inventory.contains(&Some((REDBERRY_PIE, 1))));
        assert_eq!(cook.skills[&Skill::Cooking], 78);
    }

    #[test]
    fn cow_killer_fills_collection_log() {
        let mut backend = DemoBackend::new();
        for _ in 0..50 {
            backend.advance();
        }

        let logs = decode_group_update(&backend.collection_logs()).expect("object root");
        let log = logs[&MemberName::from("Cow31337Killer")].collection.clone().expect("log");
        assert_eq!(log.get(&ItemId(BEGINNER_CLUE)), Some(&2));
        assert_eq!(backend.steps(), 50);
    }
}
