//! Defensive decoding of backend group snapshots.
//!
//! The backend reports each member as a JSON object with snake_case keys.
//! Item containers are flat `[id, qty, id, qty, ...]` arrays, inventory and
//! equipment are positional, skills and quests may be positional arrays.
//!
//! Decoding never rejects a snapshot because of one bad field: the field is
//! logged and treated as absent. `null` means "not reported" and unknown keys
//! are ignored. Only a root that is not a collection of members is an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    Collection, Diaries, Equipment, EquipmentSlot, GroupStateUpdate, Inventory, ItemCollection,
    ItemId, ItemStack, MemberName, NpcInteraction, PartialMemberState, PayloadError, Position,
    QuestId, QuestStatus, Quests, Skill, Skills, StatBar, Stats, error::json_type,
};

/// Decode a group snapshot.
///
/// Accepts either an array of member objects (each with a `name`) or an
/// object keyed by member name.
///
/// # Errors
///
/// - `PayloadError::InvalidRoot` if `root` is neither an array nor an object
pub fn decode_group_update(root: &Value) -> Result<GroupStateUpdate, PayloadError> {
    let mut update = GroupStateUpdate::new();

    match root {
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                let Some(fields) = entry.as_object() else {
                    let found = json_type(entry);
                    tracing::warn!(index, found, "skipping non-object member entry");
                    continue;
                };
                let Some(name) = fields.get("name").and_then(Value::as_str) else {
                    let error = PayloadError::MissingName { index };
                    tracing::warn!(%error, "skipping member entry");
                    continue;
                };
                let name = MemberName::new(name);
                let member = decode_member(&name, fields);
                update.insert(name, member);
            }
        },
        Value::Object(members) => {
            for (name, entry) in members {
                let name = MemberName::new(name.as_str());
                let Some(fields) = entry.as_object() else {
                    let found = json_type(entry);
                    tracing::warn!(member = %name, found, "skipping non-object member entry");
                    continue;
                };
                let member = decode_member(&name, fields);
                update.insert(name, member);
            }
        },
        other => return Err(PayloadError::InvalidRoot { found: json_type(other) }),
    }

    Ok(update)
}

/// Decode every known field of one member. Malformed fields become `None`.
fn decode_member(name: &MemberName, fields: &Map<String, Value>) -> PartialMemberState {
    let reader = FieldReader { member: name, fields };

    PartialMemberState {
        last_updated: reader.read("last_updated", timestamp),
        bank: reader.shared("bank", keyed_container),
        equipment: reader.shared("equipment", equipment),
        quiver: reader.shared("quiver", keyed_container),
        inventory: reader.shared("inventory", inventory),
        rune_pouch: reader.shared("rune_pouch", keyed_container),
        seed_vault: reader.shared("seed_vault", keyed_container),
        potion_storage: reader.shared("potion_storage", keyed_container),
        poh_costume_room: reader.shared("poh_costume_room", keyed_container),
        plank_sack: reader.shared("plank_sack", keyed_container),
        master_scroll_book: reader.shared("master_scroll_book", keyed_container),
        essence_pouches: reader.shared("essence_pouches", keyed_container),
        tackle_box: reader.shared("tackle_box", keyed_container),
        coal_bag: reader.shared("coal_bag", keyed_container),
        fish_barrel: reader.shared("fish_barrel", keyed_container),
        coordinates: reader.read("coordinates", position),
        interacting: reader.read("interacting", interaction),
        stats: reader.read("stats", stats),
        skills: reader.shared("skills", skills),
        quests: reader.shared("quests", quests),
        diaries: reader.shared("diaries", diaries),
        collection: reader.shared("collection_log", collection),
    }
}

/// Field decoder: wire key and value in, typed value out.
type Decoder<T> = fn(&'static str, &Value) -> Result<T, PayloadError>;

/// Reads the fields of one member entry, logging and discarding bad ones.
struct FieldReader<'a> {
    member: &'a MemberName,
    fields: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn read<T>(&self, key: &'static str, decoder: Decoder<T>) -> Option<T> {
        let value = self.fields.get(key).filter(|value| !value.is_null())?;
        match decoder(key, value) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                tracing::warn!(member = %self.member, %error, "dropping malformed field");
                None
            },
        }
    }

    fn shared<T>(&self, key: &'static str, decoder: Decoder<T>) -> Option<Arc<T>> {
        self.read(key, decoder).map(Arc::new)
    }
}

fn wrong_shape(field: &'static str, expected: &'static str, value: &Value) -> PayloadError {
    PayloadError::WrongShape { field, expected, found: json_type(value) }
}

fn array<'v>(field: &'static str, value: &'v Value) -> Result<&'v [Value], PayloadError> {
    value.as_array().map(Vec::as_slice).ok_or_else(|| wrong_shape(field, "array", value))
}

fn integer(field: &'static str, value: &Value) -> Result<i64, PayloadError> {
    value.as_i64().ok_or_else(|| wrong_shape(field, "integer", value))
}

/// Clamp a wire integer into `u32`. Negative values become 0.
fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Split a flat `[id, qty, ...]` array into `(id, qty)` pairs.
fn item_pairs(field: &'static str, value: &Value) -> Result<Vec<(i64, i64)>, PayloadError> {
    let flat = array(field, value)?;
    if flat.len() % 2 != 0 {
        return Err(PayloadError::OddItemArray { field, len: flat.len() });
    }

    flat.chunks_exact(2)
        .map(|pair| Ok((integer(field, &pair[0])?, integer(field, &pair[1])?)))
        .collect()
}

/// Positive item id, or `None` for an empty slot marker.
fn item_id(raw: i64) -> Option<ItemId> {
    u32::try_from(raw).ok().filter(|&id| id > 0).map(ItemId)
}

fn timestamp(field: &'static str, value: &Value) -> Result<DateTime<Utc>, PayloadError> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| wrong_shape(field, "RFC 3339 timestamp", value)),
        Value::Number(_) => integer(field, value)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| wrong_shape(field, "unix milliseconds", value)),
        _ => Err(wrong_shape(field, "timestamp", value)),
    }
}

fn keyed_container(field: &'static str, value: &Value) -> Result<ItemCollection, PayloadError> {
    let mut items = ItemCollection::new();
    for (raw_id, raw_quantity) in item_pairs(field, value)? {
        let quantity = clamp_u32(raw_quantity);
        let Some(item_id) = item_id(raw_id).filter(|_| quantity > 0) else {
            continue;
        };
        items
            .entry(item_id)
            .and_modify(|stack| stack.quantity = stack.quantity.saturating_add(quantity))
            .or_insert(ItemStack::new(item_id, quantity));
    }
    Ok(items)
}

fn inventory(field: &'static str, value: &Value) -> Result<Inventory, PayloadError> {
    Ok(item_pairs(field, value)?
        .into_iter()
        .map(|(raw_id, raw_quantity)| {
            item_id(raw_id).map(|item_id| ItemStack::new(item_id, clamp_u32(raw_quantity)))
        })
        .collect())
}

fn equipment(field: &'static str, value: &Value) -> Result<Equipment, PayloadError> {
    Ok(item_pairs(field, value)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, (raw_id, raw_quantity))| {
            let slot = EquipmentSlot::from_index(index)?;
            let item_id = item_id(raw_id)?;
            Some((slot, ItemStack::new(item_id, clamp_u32(raw_quantity))))
        })
        .collect())
}

/// `[x, y, plane]`, `[x, y, plane, is_on_boat]` or an object.
fn position(field: &'static str, value: &Value) -> Result<Position, PayloadError> {
    match value {
        Value::Array(parts) if (3..=4).contains(&parts.len()) => {
            let coordinate = |raw: &Value| {
                integer(field, raw).map(|n| {
                    i32::try_from(n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)))
                        .unwrap_or_default()
                })
            };
            Ok(Position {
                x: coordinate(&parts[0])?,
                y: coordinate(&parts[1])?,
                plane: u8::try_from(integer(field, &parts[2])?.clamp(0, 3)).unwrap_or_default(),
                is_on_boat: parts.get(3).is_some_and(|flag| {
                    flag.as_bool().unwrap_or_else(|| flag.as_i64().is_some_and(|n| n != 0))
                }),
            })
        },
        Value::Object(_) => serde_json::from_value(value.clone())
            .map_err(|_| wrong_shape(field, "position object", value)),
        _ => Err(wrong_shape(field, "[x, y, plane]", value)),
    }
}

fn interaction(field: &'static str, value: &Value) -> Result<NpcInteraction, PayloadError> {
    let object = value.as_object().ok_or_else(|| wrong_shape(field, "object", value))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| wrong_shape(field, "object with `name`", value))?
        .to_string();

    let ratio = object.get("ratio").and_then(Value::as_f64);
    let scale = object.get("scale").and_then(Value::as_f64);
    let health_ratio = match (ratio, scale) {
        (Some(ratio), Some(scale)) if scale > 0.0 && ratio >= 0.0 => Some((ratio / scale).min(1.0)),
        _ => object.get("health_ratio").and_then(Value::as_f64).map(|r| r.clamp(0.0, 1.0)),
    };

    let location = match object.get("location") {
        Some(location) if !location.is_null() => position(field, location)?,
        _ => Position::default(),
    };

    let last_updated = match object.get("last_updated") {
        Some(raw) if !raw.is_null() => timestamp(field, raw)?,
        _ => DateTime::<Utc>::default(),
    };

    Ok(NpcInteraction { name, health_ratio, location, last_updated })
}

/// `[hp, hp_max, prayer, prayer_max, run, run_max, world]` or an object.
fn stats(field: &'static str, value: &Value) -> Result<Stats, PayloadError> {
    match value {
        Value::Array(parts) if parts.len() == 7 => {
            let n = |index: usize| integer(field, &parts[index]).map(clamp_u32);
            Ok(Stats {
                health: StatBar { current: n(0)?, max: n(1)? },
                prayer: StatBar { current: n(2)?, max: n(3)? },
                run: StatBar { current: n(4)?, max: n(5)? },
                world: u16::try_from(n(6)?).unwrap_or(u16::MAX),
            })
        },
        Value::Object(_) => serde_json::from_value(value.clone())
            .map_err(|_| wrong_shape(field, "stats object", value)),
        _ => Err(wrong_shape(field, "7-element stats array", value)),
    }
}

/// Positional array in [`Skill::ALL`] order, or an object keyed by skill name.
///
/// Positional arrays shorter than the skill list (e.g. from before a skill
/// was released) only report the skills they cover.
fn skills(field: &'static str, value: &Value) -> Result<Skills, PayloadError> {
    let experience = |raw: &Value| integer(field, raw).map(|xp| xp.max(0).unsigned_abs());

    match value {
        Value::Array(values) => {
            Skill::ALL
                .into_iter()
                .zip(values)
                .map(|(skill, raw)| Ok((skill, experience(raw)?)))
                .collect()
        },
        Value::Object(entries) => {
            let mut skills = Skills::new();
            for (name, raw) in entries {
                match name.parse::<Skill>() {
                    Ok(skill) => {
                        skills.insert(skill, experience(raw)?);
                    },
                    Err(error) => tracing::debug!(%error, "ignoring skill"),
                }
            }
            Ok(skills)
        },
        _ => Err(wrong_shape(field, "skill array or object", value)),
    }
}

/// Positional status codes (0 not started, 1 in progress, 2 finished) or
/// status names.
fn quests(field: &'static str, value: &Value) -> Result<Quests, PayloadError> {
    let mut quests = Quests::new();
    for (index, raw) in array(field, value)?.iter().enumerate() {
        let Ok(id) = u16::try_from(index) else {
            break;
        };
        let status = match raw {
            Value::Number(_) => match integer(field, raw)? {
                1 => QuestStatus::InProgress,
                2 => QuestStatus::Finished,
                _ => QuestStatus::NotStarted,
            },
            Value::String(text) => match text.as_str() {
                "IN_PROGRESS" => QuestStatus::InProgress,
                "FINISHED" => QuestStatus::Finished,
                _ => QuestStatus::NotStarted,
            },
            _ => return Err(wrong_shape(field, "quest status", raw)),
        };
        quests.insert(QuestId(id), status);
    }
    Ok(quests)
}

fn diaries(field: &'static str, value: &Value) -> Result<Diaries, PayloadError> {
    serde_json::from_value(value.clone()).map_err(|_| wrong_shape(field, "diary object", value))
}

/// Object of item id to count, or a flat `[id, count, ...]` array.
fn collection(field: &'static str, value: &Value) -> Result<Collection, PayloadError> {
    let pairs = match value {
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(id, count)| Some((id.parse::<i64>().ok()?, count)))
            .map(|(id, count)| Ok((id, integer(field, count)?)))
            .collect::<Result<Vec<_>, PayloadError>>()?,
        _ => item_pairs(field, value)?,
    };

    Ok(pairs
        .into_iter()
        .filter_map(|(raw_id, raw_count)| Some((item_id(raw_id)?, clamp_u32(raw_count))))
        .filter(|&(_, count)| count > 0)
        .collect())
}
