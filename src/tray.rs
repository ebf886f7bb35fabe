//! System tray icon management.
//!
//! Provides a TrayManager that creates a tray/menu bar icon with a small
//! context menu. The icon is an embedded SVG rendered as a template image
//! so it adapts to light/dark menu bars on macOS.

use anyhow::{Context, Result};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuEventReceiver, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

/// Keycap logo (32x32, monochrome).
const LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" fill="currentColor" viewBox="0 0 32 32">
  <path fill="currentColor" d="M6 7h20a4 4 0 0 1 4 4v10a4 4 0 0 1-4 4H6a4 4 0 0 1-4-4V11a4 4 0 0 1 4-4Zm2 5h3v3H8v-3Zm6.5 0h3v3h-3v-3Zm6.5 0h3v3h-3v-3ZM9 19h14v2.5H9V19Z"/>
</svg>"#;

/// Menu item identifiers for matching events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    ShowShortcuts,
    Quit,
}

/// Manages the system tray icon and menu.
pub struct TrayManager {
    #[allow(dead_code)]
    tray_icon: TrayIcon,
    show_shortcuts_id: String,
    #[allow(dead_code)]
    version_id: String,
    quit_id: String,
}

impl TrayManager {
    /// Creates a new TrayManager with the keydeck logo and menu.
    ///
    /// # Errors
    /// Returns an error if SVG parsing, PNG rendering, or tray icon
    /// creation fails.
    pub fn new() -> Result<Self> {
        let icon = Self::create_icon_from_svg()?;
        let (menu, show_shortcuts_id, version_id, quit_id) = Self::create_menu()?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip("Keydeck")
            .with_menu(Box::new(menu))
            .with_icon_as_template(true) // macOS: adapt to light/dark menu bar
            .build()
            .context("Failed to create tray icon")?;

        Ok(Self {
            tray_icon,
            show_shortcuts_id,
            version_id,
            quit_id,
        })
    }

    /// Converts the embedded SVG logo to an RGBA icon.
    fn create_icon_from_svg() -> Result<Icon> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_str(LOGO_SVG, &opts).context("Failed to parse SVG")?;

        let size = tree.size();
        let width = size.width() as u32;
        let height = size.height() as u32;

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).context("Failed to create pixmap")?;

        // Template images on macOS use the alpha channel; the system
        // colorizes based on menu bar appearance.
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let rgba = pixmap.take();
        Icon::from_rgba(rgba, width, height).context("Failed to create icon from RGBA data")
    }

    /// Creates the tray menu:
    /// 1. Keydeck v0.1.0 (disabled)
    /// 2. ---
    /// 3. Show Shortcuts
    /// 4. ---
    /// 5. Quit Keydeck
    fn create_menu() -> Result<(Menu, String, String, String)> {
        let menu = Menu::new();

        let version_item = MenuItem::new(
            format!("Keydeck (v{})", env!("CARGO_PKG_VERSION")),
            false,
            None,
        );
        let show_shortcuts_item = MenuItem::new("Show Shortcuts", true, None);
        let quit_item = MenuItem::new("Quit Keydeck", true, None);

        // Store IDs for event matching
        let version_id = version_item.id().0.clone();
        let show_shortcuts_id = show_shortcuts_item.id().0.clone();
        let quit_id = quit_item.id().0.clone();

        menu.append(&version_item)
            .context("Failed to add version item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&show_shortcuts_item)
            .context("Failed to add Show Shortcuts item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&quit_item).context("Failed to add Quit item")?;

        Ok((menu, show_shortcuts_id, version_id, quit_id))
    }

    /// Returns the menu event receiver for handling menu clicks.
    pub fn menu_event_receiver(&self) -> &MenuEventReceiver {
        MenuEvent::receiver()
    }

    /// Matches a menu event to a TrayMenuAction.
    pub fn match_menu_event(&self, event: &MenuEvent) -> Option<TrayMenuAction> {
        let id = &event.id.0;
        if id == &self.show_shortcuts_id {
            Some(TrayMenuAction::ShowShortcuts)
        } else if id == &self.quit_id {
            Some(TrayMenuAction::Quit)
        } else {
            None
        }
    }
}
