//! Chord parsing and validation.
//!
//! A chord is the textual encoding of a modifier+key combination, e.g.
//! `"ctrl+alt+n"`. Parsing is pure: it never touches the OS. The parsed
//! [`Chord`] converts to the `global-hotkey` crate's types for actual
//! registration, and exposes the stable hotkey id used to match incoming
//! hotkey events back to a binding.

use std::fmt;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use thiserror::Error;

/// Errors that can occur when parsing a chord string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("chord is empty")]
    Empty,
    #[error("chord has no key, only modifiers")]
    MissingKey,
    #[error("chord has no modifier (at least one of ctrl/alt/shift/cmd is required)")]
    MissingModifier,
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unexpected extra key '{0}' (a chord has exactly one non-modifier key)")]
    ExtraKey(String),
}

/// Modifier flags for a chord.
///
/// `cmd` is the platform accelerator: Command on macOS, the Super/Win key
/// elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChordMods {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub cmd: bool,
}

impl ChordMods {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.cmd
    }
}

/// A validated modifier+key combination.
///
/// Constructed only through [`Chord::parse`], so every `Chord` value maps to
/// a registrable OS hotkey.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    key: String,
    mods: ChordMods,
    code: Code,
}

impl Chord {
    /// Parse a chord string such as `"ctrl+alt+n"`.
    ///
    /// Tokens are split on `+` and lowercased. At least one modifier and
    /// exactly one key from the allow-list are required.
    pub fn parse(s: &str) -> Result<Self, ChordParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let normalized = s.replace('+', " ");
        let parts: Vec<&str> = normalized.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let mut mods = ChordMods::default();
        let mut key_part: Option<String> = None;

        for part in &parts {
            let part_lower = part.to_lowercase();
            match part_lower.as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" => mods.alt = true,
                "shift" => mods.shift = true,
                "cmd" | "command" => mods.cmd = true,
                _ => {
                    if key_part.is_some() {
                        return Err(ChordParseError::ExtraKey(part.to_string()));
                    }
                    key_part = Some(part_lower);
                }
            }
        }

        let key = key_part.ok_or(ChordParseError::MissingKey)?;
        let key = canonicalize_key(&key);
        let code =
            key_code(&key).ok_or_else(|| ChordParseError::UnknownKey(key.clone()))?;
        if !mods.any() {
            return Err(ChordParseError::MissingModifier);
        }

        Ok(Self { key, mods, code })
    }

    /// Whether a chord string passes validation. Pure, no side effects.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mods(&self) -> ChordMods {
        self.mods
    }

    /// The `global-hotkey` modifier flags for this chord.
    pub fn modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        if self.mods.ctrl {
            modifiers |= Modifiers::CONTROL;
        }
        if self.mods.alt {
            modifiers |= Modifiers::ALT;
        }
        if self.mods.shift {
            modifiers |= Modifiers::SHIFT;
        }
        if self.mods.cmd {
            modifiers |= Modifiers::META;
        }
        modifiers
    }

    /// The OS-registrable hotkey for this chord.
    pub fn hotkey(&self) -> HotKey {
        HotKey::new(Some(self.modifiers()), self.code)
    }

    /// Stable id used to match incoming `GlobalHotKeyEvent`s.
    pub fn id(&self) -> u32 {
        self.hotkey().id()
    }

    /// Canonical string form, modifiers in `ctrl+alt+shift+cmd` order.
    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.mods.ctrl {
            parts.push("ctrl");
        }
        if self.mods.alt {
            parts.push("alt");
        }
        if self.mods.shift {
            parts.push("shift");
        }
        if self.mods.cmd {
            parts.push("cmd");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

/// Canonicalize a key name to its internal form.
fn canonicalize_key(key: &str) -> String {
    match key {
        "arrowup" | "uparrow" => "up",
        "arrowdown" | "downarrow" => "down",
        "arrowleft" | "leftarrow" => "left",
        "arrowright" | "rightarrow" => "right",
        "return" => "enter",
        "esc" => "escape",
        _ => return key.to_string(),
    }
    .to_string()
}

/// Map a canonical key name to its `global-hotkey` key code.
///
/// Returns `None` for anything outside the allow-list: letters, digits,
/// f1-f12, and the named keys below.
fn key_code(key: &str) -> Option<Code> {
    let code = match key {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "tab" => Code::Tab,
        "space" => Code::Space,
        "backspace" => Code::Backspace,
        "delete" => Code::Delete,
        "enter" => Code::Enter,
        "escape" => Code::Escape,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_chords_parse() {
        for chord in [
            "ctrl+n",
            "ctrl+alt+n",
            "control+alt+n",
            "cmd+shift+f5",
            "command+space",
            "alt+escape",
            "shift+alt+9",
            "ctrl+up",
        ] {
            assert!(Chord::is_valid(chord), "expected '{}' to be valid", chord);
        }
    }

    #[test]
    fn key_without_modifier_is_rejected() {
        assert_eq!(Chord::parse("n"), Err(ChordParseError::MissingModifier));
        assert_eq!(Chord::parse("f5"), Err(ChordParseError::MissingModifier));
        assert!(!Chord::is_valid("n"));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(
            Chord::parse("ctrl+$"),
            Err(ChordParseError::UnknownKey("$".to_string()))
        );
        assert_eq!(
            Chord::parse("ctrl+hyper"),
            Err(ChordParseError::UnknownKey("hyper".to_string()))
        );
    }

    #[test]
    fn modifiers_only_is_missing_key() {
        assert_eq!(Chord::parse("ctrl+alt"), Err(ChordParseError::MissingKey));
        assert_eq!(Chord::parse("ctrl+"), Err(ChordParseError::MissingKey));
    }

    #[test]
    fn two_keys_are_rejected() {
        assert_eq!(
            Chord::parse("ctrl+a+b"),
            Err(ChordParseError::ExtraKey("b".to_string()))
        );
    }

    #[test]
    fn empty_chord_is_rejected() {
        assert_eq!(Chord::parse(""), Err(ChordParseError::Empty));
        assert_eq!(Chord::parse("   "), Err(ChordParseError::Empty));
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            Chord::parse("Ctrl+Alt+N").unwrap(),
            Chord::parse("ctrl+alt+n").unwrap()
        );
    }

    #[test]
    fn key_aliases_canonicalize() {
        assert_eq!(
            Chord::parse("ctrl+esc").unwrap(),
            Chord::parse("ctrl+escape").unwrap()
        );
        assert_eq!(
            Chord::parse("ctrl+arrowup").unwrap(),
            Chord::parse("ctrl+up").unwrap()
        );
    }

    #[test]
    fn canonical_string_orders_modifiers() {
        let chord = Chord::parse("shift+cmd+ctrl+k").unwrap();
        assert_eq!(chord.to_canonical_string(), "ctrl+shift+cmd+k");
        // Canonical form round-trips to the same chord.
        assert_eq!(Chord::parse(&chord.to_canonical_string()).unwrap(), chord);
    }

    #[test]
    fn equal_chords_share_a_hotkey_id() {
        let a = Chord::parse("ctrl+alt+n").unwrap();
        let b = Chord::parse("alt+control+n").unwrap();
        assert_eq!(a.id(), b.id());

        let c = Chord::parse("ctrl+alt+m").unwrap();
        assert_ne!(a.id(), c.id());
    }
}
