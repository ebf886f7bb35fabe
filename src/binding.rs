//! The hotkey binding entity and its persisted form.
//!
//! A binding is one name → chord → command triple with an ordering
//! position. The chord is kept verbatim as entered; it is validated at
//! registration time, not at construction, so a persisted binding whose
//! chord has become invalid is still loadable (it just stays inactive).
//!
//! The persisted form is [`ShortcutRecord`], the `{name, key, action,
//! position}` object stored in `shortcuts.json`. A record with a missing or
//! wrong-typed required field fails serde deserialization; callers skip such
//! records individually rather than aborting a whole load.

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, ChordParseError};

/// Serialized form of one binding, as stored in `shortcuts.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    pub name: String,
    pub key: String,
    pub action: String,
    /// Display/trigger ordering. Absent in older files, so default 0.
    #[serde(default)]
    pub position: i64,
}

/// One live binding owned by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub name: String,
    pub key: String,
    pub action: String,
    pub position: i64,
    /// Whether an OS registration currently backs this binding. Runtime
    /// state only, never persisted.
    pub active: bool,
}

impl HotkeyBinding {
    pub fn from_record(record: ShortcutRecord) -> Self {
        Self {
            name: record.name,
            key: record.key,
            action: record.action,
            position: record.position,
            active: false,
        }
    }

    pub fn to_record(&self) -> ShortcutRecord {
        ShortcutRecord {
            name: self.name.clone(),
            key: self.key.clone(),
            action: self.action.clone(),
            position: self.position,
        }
    }

    /// Parse this binding's chord. Fails if the stored key string no longer
    /// passes validation.
    pub fn chord(&self) -> Result<Chord, ChordParseError> {
        Chord::parse(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_binding() {
        let record = ShortcutRecord {
            name: "notes".to_string(),
            key: "ctrl+alt+n".to_string(),
            action: "notepad.exe".to_string(),
            position: 3,
        };
        let binding = HotkeyBinding::from_record(record.clone());
        assert!(!binding.active);
        assert_eq!(binding.to_record(), record);
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = ShortcutRecord {
            name: "terminal".to_string(),
            key: "cmd+shift+t".to_string(),
            action: "open -a Terminal".to_string(),
            position: 1,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ShortcutRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn missing_position_defaults_to_zero() {
        let record: ShortcutRecord =
            serde_json::from_str(r#"{"name":"a","key":"ctrl+a","action":"ls"}"#).unwrap();
        assert_eq!(record.position, 0);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let result: Result<ShortcutRecord, _> =
            serde_json::from_str(r#"{"name":"a","key":"ctrl+a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn wrong_typed_field_is_malformed() {
        let result: Result<ShortcutRecord, _> =
            serde_json::from_str(r#"{"name":"a","key":42,"action":"ls","position":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_chord_is_loadable_but_unparseable() {
        let binding = HotkeyBinding::from_record(ShortcutRecord {
            name: "broken".to_string(),
            key: "n".to_string(),
            action: "ls".to_string(),
            position: 0,
        });
        assert!(binding.chord().is_err());
    }
}
