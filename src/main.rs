use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use keydeck::config::{self, Config};
use keydeck::executor::{CommandExecutor, ShellExecutor};
use keydeck::registrar::{HotkeyRegistrar, NullRegistrar, SystemRegistrar};
use keydeck::registry::ShortcutRegistry;
use keydeck::storage::JsonFileStore;
use keydeck::tray::{TrayManager, TrayMenuAction};
use keydeck::{hotkeys, logging, stdin_commands};

#[derive(Parser)]
#[command(name = "keydeck", version, about = "Global hotkeys for shell commands")]
struct Cli {
    /// Use this shortcuts file instead of ~/.keydeck/shortcuts.json
    #[arg(long, value_name = "PATH")]
    shortcuts_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the persisted shortcuts and exit
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init();

    let mut config = config::load_config();
    if cli.shortcuts_file.is_some() {
        config.shortcuts_file = cli.shortcuts_file;
    }

    let store = JsonFileStore::new(config.shortcuts_path());
    info!(path = %store.path().display(), "using shortcut store");

    match cli.command {
        Some(Command::List) => run_list(store),
        None => run_daemon(config, store),
    }
}

/// `keydeck list`: print the durable collection without touching the OS
/// hotkey table.
fn run_list(store: JsonFileStore) -> Result<()> {
    let registry = ShortcutRegistry::new(Box::new(store), Box::new(NullRegistrar));
    let records = registry.list()?;

    if records.is_empty() {
        println!("No shortcuts configured.");
        return Ok(());
    }
    for record in records {
        println!(
            "{:>4}  {:<24} {:<20} {}",
            record.position, record.name, record.key, record.action
        );
    }
    Ok(())
}

fn run_daemon(config: Config, store: JsonFileStore) -> Result<()> {
    // The OS facility can be missing (no display server, no permissions).
    // Degrade to a registrar that refuses everything: bindings stay
    // inactive but the command surface and persistence keep working.
    let registrar: Box<dyn HotkeyRegistrar> = match SystemRegistrar::new() {
        Ok(registrar) => Box::new(registrar),
        Err(e) => {
            error!(error = %e, "global hotkey facility unavailable; shortcuts will not fire");
            Box::new(NullRegistrar)
        }
    };

    let mut registry = ShortcutRegistry::new(Box::new(store), registrar);
    registry.load();
    let registry = Arc::new(Mutex::new(registry));

    let executor: Arc<dyn CommandExecutor> = Arc::new(ShellExecutor::new(config.get_shell()));
    let _listener = hotkeys::start_hotkey_listener(registry.clone(), executor);

    let requests = stdin_commands::start_stdin_listener();
    let server_registry = registry.clone();
    let server = std::thread::spawn(move || stdin_commands::serve(requests, server_registry));

    match TrayManager::new() {
        Ok(tray) => run_tray_loop(tray, registry),
        Err(e) => {
            warn!(error = %e, "tray icon unavailable, running headless");
            // Headless: serve stdin commands until the peer closes the pipe.
            let _ = server.join();
            registry.lock().unregister_all();
            Ok(())
        }
    }
}

fn run_tray_loop(tray: TrayManager, registry: Arc<Mutex<ShortcutRegistry>>) -> Result<()> {
    let receiver = tray.menu_event_receiver();
    loop {
        let event = receiver.recv()?;
        match tray.match_menu_event(&event) {
            Some(TrayMenuAction::ShowShortcuts) => match registry.lock().list() {
                Ok(records) => {
                    for record in records {
                        info!(
                            name = %record.name,
                            key = %record.key,
                            action = %record.action,
                            position = record.position,
                            "shortcut"
                        );
                    }
                }
                Err(e) => error!(error = %format!("{e:#}"), "failed to list shortcuts"),
            },
            Some(TrayMenuAction::Quit) => {
                registry.lock().unregister_all();
                info!("quit requested from tray");
                return Ok(());
            }
            None => {}
        }
    }
}
