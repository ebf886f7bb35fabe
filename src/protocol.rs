//! JSONL protocol between the presentation layer and the registry.
//!
//! Requests and responses are exchanged as newline-delimited JSON. Each
//! request carries a `type` tag matching the command surface:
//!
//! ```json
//! {"type": "list-shortcuts"}
//! {"type": "add-shortcut", "name": "notes", "chord": "ctrl+alt+n", "command": "notepad.exe", "position": 0}
//! {"type": "edit-shortcut", "name": "notes", "shortcut": {"name": "notes2", "key": "ctrl+alt+m", "action": "notepad.exe", "position": 0}}
//! {"type": "remove-shortcut", "name": "notes"}
//! {"type": "is-name-available", "name": "notes"}
//! {"type": "save-bulk", "shortcuts": [{"name": "a", "key": "ctrl+a", "action": "ls", "position": 0}]}
//! ```
//!
//! All requests support an optional `requestId` field, echoed back in the
//! response so callers can correlate replies with the calls that caused
//! them.

use serde::{Deserialize, Serialize};

use crate::binding::ShortcutRecord;

/// A request from the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    /// The full ordered collection.
    ListShortcuts {
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Create a new binding.
    AddShortcut {
        name: String,
        chord: String,
        command: String,
        #[serde(default)]
        position: i64,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Replace the binding named `name` with `shortcut`.
    EditShortcut {
        name: String,
        shortcut: ShortcutRecord,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Delete the binding named `name`.
    RemoveShortcut {
        name: String,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Whether `name` is free for a new binding.
    IsNameAvailable {
        name: String,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Persist the full collection verbatim (bulk reorder).
    SaveBulk {
        shortcuts: Vec<ShortcutRecord>,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
}

impl Request {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Request::ListShortcuts { request_id }
            | Request::AddShortcut { request_id, .. }
            | Request::EditShortcut { request_id, .. }
            | Request::RemoveShortcut { request_id, .. }
            | Request::IsNameAvailable { request_id, .. }
            | Request::SaveBulk { request_id, .. } => request_id.as_deref(),
        }
    }
}

/// A response to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    /// Answer to `list-shortcuts`.
    Shortcuts {
        shortcuts: Vec<ShortcutRecord>,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// Answer to the boolean-valued commands.
    #[serde(rename = "result")]
    Outcome {
        ok: bool,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    /// A request that could not be served (malformed input or a
    /// persistence failure).
    Error {
        message: String,
        #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, key: &str, action: &str, position: i64) -> ShortcutRecord {
        ShortcutRecord {
            name: name.to_string(),
            key: key.to_string(),
            action: action.to_string(),
            position,
        }
    }

    #[test]
    fn add_shortcut_deserializes() {
        let json = r#"{"type": "add-shortcut", "name": "notes", "chord": "ctrl+alt+n", "command": "notepad.exe", "position": 2}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            Request::AddShortcut {
                name: "notes".to_string(),
                chord: "ctrl+alt+n".to_string(),
                command: "notepad.exe".to_string(),
                position: 2,
                request_id: None,
            }
        );
    }

    #[test]
    fn add_shortcut_position_defaults_to_zero() {
        let json = r#"{"type": "add-shortcut", "name": "n", "chord": "ctrl+n", "command": "ls"}"#;
        match serde_json::from_str::<Request>(json).unwrap() {
            Request::AddShortcut { position, .. } => assert_eq!(position, 0),
            other => panic!("expected add-shortcut, got {:?}", other),
        }
    }

    #[test]
    fn request_id_is_carried_and_exposed() {
        let json = r#"{"type": "remove-shortcut", "name": "notes", "requestId": "req-7"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(request.request_id(), Some("req-7"));
    }

    #[test]
    fn edit_shortcut_carries_a_full_record() {
        let json = r#"{"type": "edit-shortcut", "name": "notes",
            "shortcut": {"name": "notes2", "key": "ctrl+alt+m", "action": "notepad.exe", "position": 0}}"#;
        match serde_json::from_str::<Request>(json).unwrap() {
            Request::EditShortcut { name, shortcut, .. } => {
                assert_eq!(name, "notes");
                assert_eq!(shortcut, record("notes2", "ctrl+alt+m", "notepad.exe", 0));
            }
            other => panic!("expected edit-shortcut, got {:?}", other),
        }
    }

    #[test]
    fn save_bulk_round_trips() {
        let request = Request::SaveBulk {
            shortcuts: vec![record("a", "ctrl+a", "ls", 0), record("b", "ctrl+b", "pwd", 1)],
            request_id: Some("bulk-1".to_string()),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(serde_json::from_str::<Request>(&json).unwrap(), request);
    }

    #[test]
    fn outcome_serializes_with_result_tag() {
        let response = Response::Outcome {
            ok: true,
            request_id: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"type":"result","ok":true}"#);
    }

    #[test]
    fn shortcuts_response_round_trips() {
        let response = Response::Shortcuts {
            shortcuts: vec![record("notes", "ctrl+alt+n", "notepad.exe", 0)],
            request_id: Some("req-1".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""type":"shortcuts""#));
        assert!(json.contains(r#""requestId":"req-1""#));
        assert_eq!(serde_json::from_str::<Response>(&json).unwrap(), response);
    }

    #[test]
    fn unknown_request_type_fails_to_parse() {
        assert!(serde_json::from_str::<Request>(r#"{"type": "self-destruct"}"#).is_err());
    }
}
