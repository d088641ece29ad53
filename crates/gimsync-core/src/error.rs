//! Error types for wire payload decoding.
//!
//! Decoding is defensive: field-level errors are logged and the field is
//! treated as absent, so these errors rarely escape
//! [`crate::decode_group_update`]. They exist so each rejection carries a
//! precise reason into the logs.

use thiserror::Error;

/// Errors produced while decoding a backend group snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The snapshot root was not a list (or map) of members.
    #[error("snapshot root must be an array or object of members, got {found}")]
    InvalidRoot {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// A member entry had no usable name.
    #[error("member entry at index {index} has no string `name`")]
    MissingName {
        /// Position of the entry in the snapshot
        index: usize,
    },

    /// A field had a different JSON shape than expected.
    #[error("field `{field}`: expected {expected}, got {found}")]
    WrongShape {
        /// Wire key of the field
        field: &'static str,
        /// Shape the decoder expected
        expected: &'static str,
        /// JSON type that was found instead
        found: &'static str,
    },

    /// A flat `[id, qty, ...]` array had an odd number of elements.
    #[error("field `{field}`: flat item array has odd length {len}")]
    OddItemArray {
        /// Wire key of the field
        field: &'static str,
        /// Length of the array
        len: usize,
    },

    /// A skill name did not match any known skill.
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),
}

impl PayloadError {
    /// Returns true if the error invalidates the whole snapshot.
    ///
    /// Everything except a malformed root only costs a single field or
    /// member entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidRoot { .. })
    }
}

/// Name of a JSON value's type, for diagnostics.
pub(crate) fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_root_is_fatal() {
        assert!(PayloadError::InvalidRoot { found: "string" }.is_fatal());

        assert!(!PayloadError::MissingName { index: 3 }.is_fatal());
        assert!(
            !PayloadError::WrongShape { field: "bank", expected: "array", found: "string" }
                .is_fatal()
        );
        assert!(!PayloadError::OddItemArray { field: "bank", len: 3 }.is_fatal());
        assert!(!PayloadError::UnknownSkill("Dungeoneering".to_string()).is_fatal());
    }

    #[test]
    fn messages_name_the_field() {
        let err = PayloadError::WrongShape { field: "skills", expected: "object", found: "bool" };
        assert_eq!(err.to_string(), "field `skills`: expected object, got bool");
    }
}
