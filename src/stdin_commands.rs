//! The stdin/stdout command server.
//!
//! The presentation layer drives the registry by writing protocol requests
//! to this process's stdin, one JSON object per line, and reading the
//! matching responses from stdout. A reader thread parses lines into a
//! bounded channel; the serve loop applies requests to the registry one at
//! a time, so mutations never overlap.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::protocol::{Request, Response};
use crate::registry::ShortcutRegistry;

/// What the reader thread hands to the serve loop: a parsed request, or the
/// parse error for a line that wasn't one.
pub type Incoming = Result<Request, String>;

/// Spawn a thread that reads JSONL requests from stdin.
///
/// The channel is bounded; requests arrive at human speed. The thread
/// exits when stdin closes or the receiver is dropped.
pub fn start_stdin_listener() -> async_channel::Receiver<Incoming> {
    use std::io::BufRead;

    let (tx, rx) = async_channel::bounded(100);

    std::thread::spawn(move || {
        info!("stdin command listener started");
        let stdin = std::io::stdin();
        let reader = stdin.lock();

        for line in reader.lines() {
            match line {
                Ok(line) if !line.trim().is_empty() => {
                    let incoming = serde_json::from_str::<Request>(&line)
                        .map_err(|e| format!("malformed request: {e}"));
                    if let Err(ref message) = incoming {
                        warn!(message = %message, line = %line, "dropping malformed stdin request");
                    }
                    if tx.send_blocking(incoming).is_err() {
                        info!("request channel closed, stdin listener exiting");
                        break;
                    }
                }
                Ok(_) => {} // Empty line, ignore
                Err(e) => {
                    error!(error = %e, "error reading stdin");
                    break;
                }
            }
        }
        info!("stdin command listener exiting");
    });

    rx
}

/// Serve requests until the channel closes, writing one JSONL response to
/// stdout per request.
pub fn serve(requests: async_channel::Receiver<Incoming>, registry: Arc<Mutex<ShortcutRegistry>>) {
    let stdout = std::io::stdout();
    while let Ok(incoming) = requests.recv_blocking() {
        let response = match incoming {
            Ok(request) => handle_request(&mut registry.lock(), request),
            Err(message) => Response::Error {
                message,
                request_id: None,
            },
        };

        match serde_json::to_string(&response) {
            Ok(line) => {
                let mut out = stdout.lock();
                if writeln!(out, "{line}").and_then(|_| out.flush()).is_err() {
                    error!("stdout closed, command server exiting");
                    return;
                }
            }
            Err(e) => error!(error = %e, "failed to serialize response"),
        }
    }
}

/// Apply one request to the registry and build its response.
pub fn handle_request(registry: &mut ShortcutRegistry, request: Request) -> Response {
    let request_id = request.request_id().map(str::to_string);
    match request {
        Request::ListShortcuts { .. } => match registry.list() {
            Ok(shortcuts) => Response::Shortcuts {
                shortcuts,
                request_id,
            },
            Err(e) => error_response(e, request_id),
        },
        Request::AddShortcut {
            name,
            chord,
            command,
            position,
            ..
        } => match registry.add(&name, &chord, &command, position) {
            Ok(ok) => Response::Outcome { ok, request_id },
            Err(e) => error_response(e, request_id),
        },
        Request::EditShortcut { name, shortcut, .. } => match registry.edit(&name, shortcut) {
            Ok(ok) => Response::Outcome { ok, request_id },
            Err(e) => error_response(e, request_id),
        },
        Request::RemoveShortcut { name, .. } => match registry.remove(&name) {
            Ok(ok) => Response::Outcome { ok, request_id },
            Err(e) => error_response(e, request_id),
        },
        Request::IsNameAvailable { name, .. } => Response::Outcome {
            ok: registry.is_name_available(&name),
            request_id,
        },
        Request::SaveBulk { shortcuts, .. } => match registry.save_bulk(&shortcuts) {
            Ok(()) => Response::Outcome {
                ok: true,
                request_id,
            },
            Err(e) => error_response(e, request_id),
        },
    }
}

fn error_response(e: anyhow::Error, request_id: Option<String>) -> Response {
    error!(error = %format!("{e:#}"), "request failed");
    Response::Error {
        message: format!("{e:#}"),
        request_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ShortcutRecord;
    use crate::registrar::FakeRegistrar;
    use crate::storage::JsonFileStore;
    use tempfile::tempdir;

    fn test_registry() -> (ShortcutRegistry, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("shortcuts.json"));
        let (fake, _state) = FakeRegistrar::new();
        (ShortcutRegistry::new(Box::new(store), Box::new(fake)), dir)
    }

    fn record(name: &str, key: &str, action: &str, position: i64) -> ShortcutRecord {
        ShortcutRecord {
            name: name.to_string(),
            key: key.to_string(),
            action: action.to_string(),
            position,
        }
    }

    #[test]
    fn add_then_list_round_trip() {
        let (mut registry, _dir) = test_registry();

        let response = handle_request(
            &mut registry,
            Request::AddShortcut {
                name: "notes".to_string(),
                chord: "ctrl+alt+n".to_string(),
                command: "notepad.exe".to_string(),
                position: 0,
                request_id: Some("add-1".to_string()),
            },
        );
        assert_eq!(
            response,
            Response::Outcome {
                ok: true,
                request_id: Some("add-1".to_string())
            }
        );

        let response = handle_request(
            &mut registry,
            Request::ListShortcuts { request_id: None },
        );
        assert_eq!(
            response,
            Response::Shortcuts {
                shortcuts: vec![record("notes", "ctrl+alt+n", "notepad.exe", 0)],
                request_id: None,
            }
        );
    }

    #[test]
    fn duplicate_add_reports_false() {
        let (mut registry, _dir) = test_registry();
        registry.add("x", "ctrl+n", "notepad", 0).unwrap();

        let response = handle_request(
            &mut registry,
            Request::AddShortcut {
                name: "x".to_string(),
                chord: "ctrl+m".to_string(),
                command: "other".to_string(),
                position: 0,
                request_id: None,
            },
        );
        assert_eq!(
            response,
            Response::Outcome {
                ok: false,
                request_id: None
            }
        );
    }

    #[test]
    fn is_name_available_tracks_edits() {
        let (mut registry, _dir) = test_registry();
        registry.add("notes", "ctrl+alt+n", "notepad.exe", 0).unwrap();
        registry
            .edit("notes", record("notes2", "ctrl+alt+m", "notepad.exe", 0))
            .unwrap();

        let available = |registry: &mut ShortcutRegistry, name: &str| {
            handle_request(
                registry,
                Request::IsNameAvailable {
                    name: name.to_string(),
                    request_id: None,
                },
            )
        };
        assert_eq!(
            available(&mut registry, "notes"),
            Response::Outcome {
                ok: true,
                request_id: None
            }
        );
        assert_eq!(
            available(&mut registry, "notes2"),
            Response::Outcome {
                ok: false,
                request_id: None
            }
        );
    }

    #[test]
    fn save_bulk_acknowledges() {
        let (mut registry, _dir) = test_registry();
        registry.add("a", "ctrl+a", "ls", 0).unwrap();
        registry.add("b", "ctrl+b", "pwd", 1).unwrap();

        let response = handle_request(
            &mut registry,
            Request::SaveBulk {
                shortcuts: vec![record("b", "ctrl+b", "pwd", 0), record("a", "ctrl+a", "ls", 1)],
                request_id: Some("bulk".to_string()),
            },
        );
        assert_eq!(
            response,
            Response::Outcome {
                ok: true,
                request_id: Some("bulk".to_string())
            }
        );
        assert_eq!(registry.list().unwrap()[0].name, "b");
    }
}
