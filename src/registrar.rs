//! The OS-facing global-hotkey registration boundary.
//!
//! The registry talks to the operating system only through the
//! [`HotkeyRegistrar`] trait, so its logic is platform-independent and
//! testable with a fake. [`SystemRegistrar`] is the real backend over the
//! `global-hotkey` crate; [`NullRegistrar`] stands in when the OS facility
//! cannot be created, refusing every registration so the rest of the
//! process keeps running.

use std::collections::HashMap;

use global_hotkey::{hotkey::HotKey, Error as HotkeyError, GlobalHotKeyManager};
use thiserror::Error;
use tracing::debug;

use crate::chord::Chord;

/// Error from the OS registration boundary.
#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("hotkey '{chord}' is already claimed by another application or binding")]
    AlreadyClaimed { chord: String },
    #[error("system rejected hotkey '{chord}': {reason}")]
    Rejected { chord: String, reason: String },
    #[error("os error for hotkey '{chord}': {reason}")]
    Os { chord: String, reason: String },
    #[error("hotkey manager unavailable: {0}")]
    Unavailable(String),
}

/// Capability that claims and releases global hotkeys with the OS.
pub trait HotkeyRegistrar: Send {
    fn register(&mut self, chord: &Chord) -> Result<(), RegistrarError>;

    /// Release a previously claimed chord. Releasing a chord that was never
    /// claimed is a no-op success.
    fn unregister(&mut self, chord: &Chord) -> Result<(), RegistrarError>;
}

fn map_hotkey_error(e: HotkeyError, chord: &str) -> RegistrarError {
    match e {
        HotkeyError::AlreadyRegistered(_) => RegistrarError::AlreadyClaimed {
            chord: chord.to_string(),
        },
        HotkeyError::FailedToRegister(msg) => RegistrarError::Rejected {
            chord: chord.to_string(),
            reason: msg,
        },
        HotkeyError::OsError(os_err) => RegistrarError::Os {
            chord: chord.to_string(),
            reason: os_err.to_string(),
        },
        other => RegistrarError::Os {
            chord: chord.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Registrar backed by `global_hotkey::GlobalHotKeyManager`.
pub struct SystemRegistrar {
    manager: GlobalHotKeyManager,
    /// Canonical chord -> the HotKey handed to the OS. Needed for proper
    /// unregistration: the manager wants the same HotKey value back.
    claimed: HashMap<String, HotKey>,
}

impl SystemRegistrar {
    /// Create the OS hotkey manager. On some platforms this must happen on
    /// the main thread.
    pub fn new() -> Result<Self, RegistrarError> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| RegistrarError::Unavailable(e.to_string()))?;
        Ok(Self {
            manager,
            claimed: HashMap::new(),
        })
    }
}

impl HotkeyRegistrar for SystemRegistrar {
    fn register(&mut self, chord: &Chord) -> Result<(), RegistrarError> {
        let canonical = chord.to_canonical_string();
        if self.claimed.contains_key(&canonical) {
            return Err(RegistrarError::AlreadyClaimed { chord: canonical });
        }

        let hotkey = chord.hotkey();
        self.manager
            .register(hotkey)
            .map_err(|e| map_hotkey_error(e, &canonical))?;
        debug!(chord = %canonical, id = hotkey.id(), "claimed global hotkey");
        self.claimed.insert(canonical, hotkey);
        Ok(())
    }

    fn unregister(&mut self, chord: &Chord) -> Result<(), RegistrarError> {
        let canonical = chord.to_canonical_string();
        let Some(hotkey) = self.claimed.remove(&canonical) else {
            return Ok(());
        };
        self.manager
            .unregister(hotkey)
            .map_err(|e| map_hotkey_error(e, &canonical))?;
        debug!(chord = %canonical, "released global hotkey");
        Ok(())
    }
}

/// Registrar used when the OS global-hotkey facility is unavailable.
/// Registrations are refused, so every binding stays inactive, but the
/// command surface and persistence keep working.
pub struct NullRegistrar;

impl HotkeyRegistrar for NullRegistrar {
    fn register(&mut self, chord: &Chord) -> Result<(), RegistrarError> {
        Err(RegistrarError::Rejected {
            chord: chord.to_canonical_string(),
            reason: "global hotkey facility unavailable".to_string(),
        })
    }

    fn unregister(&mut self, _chord: &Chord) -> Result<(), RegistrarError> {
        Ok(())
    }
}

/// In-memory registrar for tests: records every call and refuses chords
/// placed on its reject list.
#[cfg(test)]
pub struct FakeRegistrar {
    state: std::sync::Arc<parking_lot::Mutex<FakeRegistrarState>>,
}

#[cfg(test)]
#[derive(Default)]
pub struct FakeRegistrarState {
    pub claimed: Vec<String>,
    pub reject: std::collections::HashSet<String>,
    pub calls: Vec<String>,
}

#[cfg(test)]
impl FakeRegistrar {
    pub fn new() -> (Self, std::sync::Arc<parking_lot::Mutex<FakeRegistrarState>>) {
        let state = std::sync::Arc::new(parking_lot::Mutex::new(FakeRegistrarState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

#[cfg(test)]
impl HotkeyRegistrar for FakeRegistrar {
    fn register(&mut self, chord: &Chord) -> Result<(), RegistrarError> {
        let canonical = chord.to_canonical_string();
        let mut state = self.state.lock();
        state.calls.push(format!("register:{canonical}"));
        if state.reject.contains(&canonical) {
            return Err(RegistrarError::Rejected {
                chord: canonical,
                reason: "rejected by fake".to_string(),
            });
        }
        if state.claimed.contains(&canonical) {
            return Err(RegistrarError::AlreadyClaimed { chord: canonical });
        }
        state.claimed.push(canonical);
        Ok(())
    }

    fn unregister(&mut self, chord: &Chord) -> Result<(), RegistrarError> {
        let canonical = chord.to_canonical_string();
        let mut state = self.state.lock();
        state.calls.push(format!("unregister:{canonical}"));
        state.claimed.retain(|c| c != &canonical);
        Ok(())
    }
}
