//! The shortcut registry: sole owner of the live binding collection.
//!
//! The registry is the single source of truth reconciling three places a
//! binding lives: the in-memory collection, the persisted `shortcuts.json`,
//! and the OS global-hotkey table. Every mutation is write-through: the
//! full collection is persisted before the call returns, and the OS
//! registrations stay in lockstep, so a removed or rebound binding always
//! releases its old registration first.
//!
//! Domain rejections (duplicate name, unknown name, invalid chord, OS
//! refusal) come back as `Ok(false)`. `Err` is reserved for persistence
//! failures, which are surfaced rather than swallowed.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::binding::{HotkeyBinding, ShortcutRecord};
use crate::chord::Chord;
use crate::registrar::HotkeyRegistrar;
use crate::storage::BindingStore;

pub struct ShortcutRegistry {
    store: Box<dyn BindingStore>,
    registrar: Box<dyn HotkeyRegistrar>,
    bindings: Vec<HotkeyBinding>,
}

impl ShortcutRegistry {
    pub fn new(store: Box<dyn BindingStore>, registrar: Box<dyn HotkeyRegistrar>) -> Self {
        Self {
            store,
            registrar,
            bindings: Vec::new(),
        }
    }

    /// Load persisted bindings and claim an OS registration for each, in
    /// position order. A binding whose registration fails stays in the
    /// collection flagged inactive. Never fails: an unreadable store is
    /// treated as empty. Returns the number of active bindings.
    pub fn load(&mut self) -> usize {
        let records = match self.store.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "shortcut store unreadable, starting with an empty collection");
                Vec::new()
            }
        };

        self.bindings.clear();
        for record in sorted_by_position(records) {
            let mut binding = HotkeyBinding::from_record(record);
            match self.claim(&binding.key) {
                Ok(()) => binding.active = true,
                Err(e) => {
                    warn!(
                        name = %binding.name,
                        key = %binding.key,
                        error = %e,
                        "hotkey registration failed at load; binding kept inactive"
                    );
                }
            }
            self.bindings.push(binding);
        }

        let active = self.bindings.iter().filter(|b| b.active).count();
        info!(active, total = self.bindings.len(), "shortcut registry loaded");
        active
    }

    /// The current ordered collection, re-read from durable storage. The
    /// file may have been edited externally, and the caller should see the
    /// latest durable truth rather than stale memory.
    pub fn list(&self) -> Result<Vec<ShortcutRecord>> {
        let records = self
            .store
            .load()
            .context("failed to read shortcut store")?;
        Ok(sorted_by_position(records))
    }

    /// Add a new binding. Returns `Ok(false)` without mutating anything if
    /// the name is taken or empty, the chord is invalid, or the OS refuses
    /// the registration.
    pub fn add(&mut self, name: &str, key: &str, action: &str, position: i64) -> Result<bool> {
        if name.is_empty() {
            warn!("rejected add with empty name");
            return Ok(false);
        }
        if !self.is_name_available(name) {
            warn!(name = %name, "rejected add: name already in use");
            return Ok(false);
        }

        let chord = match Chord::parse(key) {
            Ok(chord) => chord,
            Err(e) => {
                warn!(name = %name, key = %key, error = %e, "rejected add: invalid chord");
                return Ok(false);
            }
        };

        if let Err(e) = self.registrar.register(&chord) {
            warn!(name = %name, key = %key, error = %e, "rejected add: registration refused");
            return Ok(false);
        }

        self.bindings.push(HotkeyBinding {
            name: name.to_string(),
            key: key.to_string(),
            action: action.to_string(),
            position,
            active: true,
        });

        if let Err(e) = self.persist() {
            // Roll the registration back so no OS hotkey outlives a binding
            // that was never durably added.
            self.bindings.pop();
            let _ = self.registrar.unregister(&chord);
            return Err(e).context("failed to persist after add");
        }

        info!(name = %name, key = %key, "shortcut added");
        Ok(true)
    }

    /// Edit an existing binding with remove-then-recreate semantics: the
    /// old OS registration is released before the new chord is claimed.
    /// Returns `Ok(false)` if no binding has `existing_name` or the new
    /// name collides with another binding. If re-registration of the new
    /// chord fails, the field update still applies and the binding is left
    /// inactive.
    pub fn edit(&mut self, existing_name: &str, record: ShortcutRecord) -> Result<bool> {
        let Some(idx) = self.bindings.iter().position(|b| b.name == existing_name) else {
            warn!(name = %existing_name, "rejected edit: no such shortcut");
            return Ok(false);
        };
        if record.name.is_empty() {
            warn!(name = %existing_name, "rejected edit: empty new name");
            return Ok(false);
        }
        if record.name != existing_name && !self.is_name_available(&record.name) {
            warn!(from = %existing_name, to = %record.name, "rejected edit: new name already in use");
            return Ok(false);
        }

        if self.bindings[idx].active {
            self.release(idx);
        }

        {
            let binding = &mut self.bindings[idx];
            binding.name = record.name;
            binding.key = record.key;
            binding.action = record.action;
            binding.position = record.position;
        }

        let new_key = self.bindings[idx].key.clone();
        match self.claim(&new_key) {
            Ok(()) => self.bindings[idx].active = true,
            Err(e) => {
                warn!(
                    name = %self.bindings[idx].name,
                    key = %self.bindings[idx].key,
                    error = %e,
                    "edit applied but new chord not registered; binding left inactive"
                );
            }
        }

        self.persist().context("failed to persist after edit")?;
        info!(name = %self.bindings[idx].name, key = %self.bindings[idx].key, "shortcut edited");
        Ok(true)
    }

    /// Remove a binding by name, releasing its OS registration. Returns
    /// `Ok(false)` if no binding has that name.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let Some(idx) = self.bindings.iter().position(|b| b.name == name) else {
            warn!(name = %name, "rejected remove: no such shortcut");
            return Ok(false);
        };

        if self.bindings[idx].active {
            self.release(idx);
        }
        self.bindings.remove(idx);

        self.persist().context("failed to persist after remove")?;
        info!(name = %name, "shortcut removed");
        Ok(true)
    }

    /// True iff no current binding has this name.
    pub fn is_name_available(&self, name: &str) -> bool {
        !self.bindings.iter().any(|b| b.name == name)
    }

    /// Persist the given collection verbatim. This is the bulk-reorder
    /// path: the presentation layer hands back the full reordered list after
    /// a drag-and-drop, bypassing per-item add/edit. In-memory
    /// bindings adopt the new order and positions by name, keeping their
    /// activity flags; bindings dropped from the collection release their
    /// registrations.
    pub fn save_bulk(&mut self, records: &[ShortcutRecord]) -> Result<()> {
        self.store
            .save(records)
            .context("failed to persist shortcut collection")?;

        for idx in 0..self.bindings.len() {
            let kept = records.iter().any(|r| r.name == self.bindings[idx].name);
            if !kept && self.bindings[idx].active {
                self.release(idx);
            }
        }

        let rebuilt: Vec<HotkeyBinding> = records
            .iter()
            .map(|record| {
                let active = self
                    .bindings
                    .iter()
                    .find(|b| b.name == record.name)
                    .map(|b| b.active)
                    .unwrap_or(false);
                let mut binding = HotkeyBinding::from_record(record.clone());
                binding.active = active;
                binding
            })
            .collect();
        self.bindings = rebuilt;

        info!(total = self.bindings.len(), "shortcut collection saved wholesale");
        Ok(())
    }

    /// Resolve a fired hotkey id to the `(name, action)` of its active
    /// binding. Stale events for ids with no live binding resolve to `None`.
    pub fn command_for_hotkey(&self, id: u32) -> Option<(String, String)> {
        self.bindings
            .iter()
            .filter(|b| b.active)
            .find(|b| b.chord().map(|c| c.id() == id).unwrap_or(false))
            .map(|b| (b.name.clone(), b.action.clone()))
    }

    /// Release every active OS registration. Quit path.
    pub fn unregister_all(&mut self) {
        for idx in 0..self.bindings.len() {
            if self.bindings[idx].active {
                self.release(idx);
            }
        }
        info!("all shortcut registrations released");
    }

    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }

    fn claim(&mut self, key: &str) -> Result<()> {
        let chord = Chord::parse(key)?;
        self.registrar.register(&chord)?;
        Ok(())
    }

    /// Release binding `idx`'s registration and clear its activity flag.
    /// Release failures are logged, not propagated: the binding is going
    /// away or changing either way.
    fn release(&mut self, idx: usize) {
        if let Ok(chord) = self.bindings[idx].chord() {
            if let Err(e) = self.registrar.unregister(&chord) {
                warn!(
                    name = %self.bindings[idx].name,
                    key = %self.bindings[idx].key,
                    error = %e,
                    "failed to release hotkey registration"
                );
            }
        }
        self.bindings[idx].active = false;
    }

    fn persist(&self) -> Result<()> {
        let records: Vec<ShortcutRecord> = self.bindings.iter().map(|b| b.to_record()).collect();
        self.store.save(&records)?;
        Ok(())
    }
}

/// Stable sort by position ascending; ties keep original file order.
fn sorted_by_position(mut records: Vec<ShortcutRecord>) -> Vec<ShortcutRecord> {
    records.sort_by_key(|r| r.position);
    records
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
