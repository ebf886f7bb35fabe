//! Global hotkey event listener.
//!
//! The `global-hotkey` crate delivers every registered hotkey press through
//! one process-wide receiver. A background thread drains it, resolves each
//! event to its binding through the registry, and fires the bound command
//! through the executor.

use std::sync::Arc;
use std::thread::JoinHandle;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::executor::CommandExecutor;
use crate::registry::ShortcutRegistry;

/// Spawn the listener thread. Runs until the event receiver disconnects
/// (process teardown).
pub fn start_hotkey_listener(
    registry: Arc<Mutex<ShortcutRegistry>>,
    executor: Arc<dyn CommandExecutor>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        info!("global hotkey listener started");
        let receiver = GlobalHotKeyEvent::receiver();

        while let Ok(event) = receiver.recv() {
            // Only respond to key PRESS, not release.
            if event.state != HotKeyState::Pressed {
                continue;
            }

            let hit = registry.lock().command_for_hotkey(event.id);
            match hit {
                Some((name, action)) => {
                    info!(name = %name, id = event.id, "hotkey fired");
                    executor.run(&action);
                }
                None => {
                    // An event can outlive its binding across an edit or
                    // remove; stale ids are expected and harmless.
                    debug!(id = event.id, "hotkey event with no live binding");
                }
            }
        }
        info!("global hotkey listener exiting");
    })
}
