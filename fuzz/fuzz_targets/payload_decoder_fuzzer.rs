//! Fuzz target for snapshot payload decoding
//!
//! # Strategy
//!
//! - Raw bytes: arbitrary input parsed as JSON first (general malformation)
//! - Structured members: well-formed member objects whose known fields hold
//!   values of arbitrary shape (type confusion per field)
//!
//! # Invariants
//!
//! - NEVER panic on malformed payloads
//! - Array and object roots always decode
//! - Every named member object survives decoding
//! - Decoded containers never hold zero-quantity stacks

#![no_main]

use arbitrary::Arbitrary;
use gimsync_core::{MemberName, decode_group_update};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

const FIELDS: [&str; 12] = [
    "last_updated",
    "bank",
    "equipment",
    "inventory",
    "rune_pouch",
    "coordinates",
    "interacting",
    "stats",
    "skills",
    "quests",
    "diaries",
    "collection_log",
];

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(Vec<u8>),
    Members(Vec<Member>),
}

#[derive(Debug, Arbitrary)]
struct Member {
    name: String,
    fields: Vec<(u8, Shape)>,
}

#[derive(Debug, Arbitrary)]
enum Shape {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ints(Vec<i64>),
    Object(Vec<(String, i64)>),
}

impl Shape {
    fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(flag) => Value::Bool(flag),
            Self::Int(n) => Value::from(n),
            Self::Float(f) => Value::from(f),
            Self::Text(text) => Value::String(text),
            Self::Ints(values) => Value::from(values),
            Self::Object(entries) => {
                Value::Object(entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            },
        }
    }
}

fuzz_target!(|input: Input| {
    match input {
        Input::Raw(bytes) => {
            if let Ok(root) = serde_json::from_slice::<Value>(&bytes) {
                let decoded = decode_group_update(&root);
                assert_eq!(decoded.is_ok(), root.is_array() || root.is_object());
            }
        },
        Input::Members(members) => {
            let mut names = Vec::new();
            let root: Vec<Value> = members
                .into_iter()
                .map(|member| {
                    let mut object = Map::new();
                    for (index, shape) in member.fields {
                        let key = FIELDS[usize::from(index) % FIELDS.len()];
                        object.insert(key.to_string(), shape.into_value());
                    }
                    object.insert("name".to_string(), Value::String(member.name.clone()));
                    names.push(MemberName::new(member.name));
                    Value::Object(object)
                })
                .collect();

            let update = decode_group_update(&Value::Array(root)).expect("array root decodes");
            for name in &names {
                assert!(update.contains_key(name), "member {name} lost");
            }
            for partial in update.values() {
                if let Some(bank) = &partial.bank {
                    assert!(bank.values().all(|stack| stack.quantity > 0));
                }
            }
        },
    }
});
