//! Terminal front end for the beacon demo.
//!
//! The screen shows a title bar, the beacon panel (the host UI the picker
//! anchors to), a map strip with the colors the host actually painted, and a
//! status bar. The color picker draws on top when open.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod beacon_panel;
pub mod color_picker;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

use crate::beacons::BeaconRegistry;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::host::{Host, UiRoot};
use crate::intercept::InterceptionLayer;
use crate::models::{EntityId, Palette};
use crate::picker::ColorPicker;
use crate::store::OverrideStore;

pub use theme::Theme;

/// Beacons placed when the demo starts.
const DEMO_BEACONS: [(&str, &str, usize); 4] = [
    ("beacon-1", "North Camp", 0),
    ("beacon-2", "River Crossing", 1),
    ("beacon-3", "Supply Drop", 2),
    ("beacon-4", "Watchtower", 3),
];

/// Width of the beacon panel in cells.
const PANEL_WIDTH: u16 = 46;

/// Application state for the demo.
pub struct App {
    /// The demo host
    pub host: BeaconRegistry,
    /// Installed override hooks and trigger controls
    pub layer: InterceptionLayer,
    /// The one picker instance
    pub picker: ColorPicker<BeaconRegistry>,
    /// Loaded configuration
    pub config: Config,
    /// Active theme
    pub theme: Theme,
    /// Selected beacon row
    pub selected_row: usize,
    /// Selected column: a palette index, or the trigger after the last one
    pub selected_col: usize,
    /// Status bar message
    pub status: String,
    /// Set by the quit key
    pub should_quit: bool,
}

impl App {
    /// Installs the override layer into a fresh host and places the demo
    /// beacons, so their creation already runs through the hooks.
    pub fn new(config: Config, store: OverrideStore) -> Result<Self> {
        let palette = Palette::load()?;
        let mut host = BeaconRegistry::new(palette);
        let layer = InterceptionLayer::install(&mut host, Rc::new(RefCell::new(store)));

        let status = if layer.report().disabled.is_empty() {
            "Ready".to_string()
        } else {
            let names: Vec<String> = layer
                .report()
                .disabled
                .iter()
                .map(|(point, _)| point.to_string())
                .collect();
            format!("Some override hooks are unavailable: {}", names.join(", "))
        };

        let mut app = Self {
            host,
            layer,
            picker: ColorPicker::new(),
            theme: Theme::from_mode(config.ui.theme_mode),
            config,
            selected_row: 0,
            selected_col: 0,
            status,
            should_quit: false,
        };

        for (id, label, index) in DEMO_BEACONS {
            let id = app.host.add_with_id(EntityId::from(id), label, index);
            app.layer.augment_entry(&id);
        }
        Ok(app)
    }

    /// Sets the status bar message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Id of the beacon under the cursor.
    #[must_use]
    pub fn selected_beacon(&self) -> Option<EntityId> {
        self.host
            .beacons()
            .get(self.selected_row)
            .map(|b| b.id.clone())
    }

    /// Column index of the trigger control.
    #[must_use]
    pub fn trigger_col(&self) -> usize {
        self.host.palette().len()
    }

    /// Once-per-loop housekeeping.
    pub fn tick(&mut self) {
        if self.picker.tick(self.host.ui_context_active()) {
            self.set_status("Beacon panel closed, color picker dismissed");
        }
    }

    /// The panel the picker was attached to is gone; an unapplied session
    /// goes with it.
    pub fn handle_resize(&mut self) {
        let dropped = self.picker.is_visible();
        self.picker.teardown();
        if dropped {
            self.set_status("Terminal resized, color picker dismissed");
        }
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Panel visibility belongs to the host, not the picker
        if key.code == KeyCode::Char('p') {
            self.host.toggle_panel();
            debug!(open = self.host.panel_open(), "beacon panel toggled");
            return false;
        }

        if self.picker.is_visible() {
            let outcome =
                color_picker::handle_key(&mut self.picker, &mut self.host, key, &self.config.ui);
            match outcome {
                color_picker::PickerOutcome::Applied => {
                    self.set_status("Custom color applied");
                }
                color_picker::PickerOutcome::Closed => self.set_status("Cancelled"),
                color_picker::PickerOutcome::Changed | color_picker::PickerOutcome::Ignored => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.host.toggle_panel();
                debug!(open = self.host.panel_open(), "beacon panel toggled");
            }
            _ if self.host.panel_open() => beacon_panel::handle_key(self, key),
            _ => {}
        }
        self.should_quit
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(app: &mut App, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    info!("{APP_NAME} started");
    loop {
        app.tick();
        terminal.draw(|f| render(f, app))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized, dropping picker layout");
                    app.handle_resize();
                }
                _ => {}
            }
        }
    }
    info!("{APP_NAME} stopped");
    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, app: &mut App) {
    let full_bg = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(6),    // Panel + map
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);

    if app.host.panel_open() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(PANEL_WIDTH), Constraint::Min(10)])
            .split(chunks[1]);
        app.host.set_panel_area(Some(rect_to_root(columns[0])));
        beacon_panel::render_panel(f, columns[0], app);
        beacon_panel::render_map(f, columns[1], app);
    } else {
        beacon_panel::render_map(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
    color_picker::render(f, &app.picker, &app.theme);
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let count = app.layer.store().borrow().len();
    let title = Paragraph::new(format!(" {APP_NAME} - {count} custom color(s)"))
        .style(Style::default().fg(app.theme.primary).bg(app.theme.background))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.accent));
    let hints = if app.picker.is_visible() {
        vec![
            key("↑↓"),
            Span::raw(" focus  "),
            key("←→"),
            Span::raw(" adjust  "),
            key("Shift"),
            Span::raw(" fine  "),
            key("Enter"),
            Span::raw(" activate  "),
            key("Esc"),
            Span::raw(" close  "),
            key("p"),
            Span::raw(" panel"),
        ]
    } else {
        vec![
            key("↑↓←→"),
            Span::raw(" move  "),
            key("Enter"),
            Span::raw(" select  "),
            key("a"),
            Span::raw(" add  "),
            key("d"),
            Span::raw(" delete  "),
            key("p"),
            Span::raw(" panel  "),
            key("q"),
            Span::raw(" quit"),
        ]
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(hints),
    ];
    let status = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

/// Converts a ratatui rectangle to the host's UI rectangle.
pub(crate) const fn rect_to_root(rect: Rect) -> UiRoot {
    UiRoot::new(rect.x, rect.y, rect.width, rect.height)
}

/// Converts a host UI rectangle to a ratatui rectangle.
pub(crate) const fn root_to_rect(root: UiRoot) -> Rect {
    Rect {
        x: root.x,
        y: root.y,
        width: root.width,
        height: root.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rgba;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app_in(dir: &TempDir) -> App {
        let mut config = Config::default();
        config.paths.data_dir = Some(dir.path().to_path_buf());
        config.ui.theme_mode = crate::config::ThemeMode::Dark;
        let store = OverrideStore::open(&config).unwrap();
        App::new(config, store).unwrap()
    }

    #[test]
    fn test_trigger_opens_picker_and_apply_repaints() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let id = EntityId::from("beacon-1");

        app.selected_col = app.trigger_col();
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_visible());
        assert_eq!(app.picker.session().unwrap().id(), &id);

        // Hue is focused; push it around the wheel
        for _ in 0..6 {
            press(&mut app, KeyCode::Right);
        }
        let chosen = app.picker.preview().unwrap();
        press(&mut app, KeyCode::Enter);

        assert!(!app.picker.is_visible());
        let stored = app.layer.store().borrow().get("beacon-1").unwrap();
        assert!(stored.approx_eq(&chosen, 1e-5));
        assert_eq!(app.host.hud_color(&id), Some(stored));
        assert_eq!(app.layer.trigger(&id).unwrap().swatch(), stored);
    }

    #[test]
    fn test_palette_pick_clears_override() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let id = EntityId::from("beacon-1");
        app.layer
            .store()
            .borrow_mut()
            .set(id.clone(), Rgba::opaque(1.0, 0.0, 0.0));

        app.selected_col = 2;
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.layer.store().borrow().get("beacon-1"), None);
        assert_eq!(app.host.hud_color(&id), Some(app.host.palette().color_at(2)));
        assert_eq!(app.layer.trigger(&id).unwrap().swatch(), Rgba::WHITE);
    }

    #[test]
    fn test_closing_panel_dismisses_picker_without_applying() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.selected_col = app.trigger_col();
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_visible());

        app.host.close_panel();
        app.tick();
        assert!(!app.picker.is_visible());
        assert!(app.layer.store().borrow().is_empty());
    }

    #[test]
    fn test_panel_key_dismisses_open_picker() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.selected_col = app.trigger_col();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        assert!(app.picker.is_visible());

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.host.panel_open());
        app.tick();

        assert!(!app.picker.is_visible());
        assert!(app.layer.store().borrow().is_empty());
        assert_eq!(app.status, "Beacon panel closed, color picker dismissed");
        assert!(!app.config.store_path().unwrap().exists());
    }

    #[test]
    fn test_resize_dismisses_picker_with_status() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.handle_resize();
        assert_eq!(app.status, "Ready");

        app.selected_col = app.trigger_col();
        press(&mut app, KeyCode::Enter);
        app.handle_resize();

        assert!(!app.picker.is_visible());
        assert!(app.picker.layout().is_none());
        assert_eq!(app.status, "Terminal resized, color picker dismissed");
        assert!(app.layer.store().borrow().is_empty());
    }

    #[test]
    fn test_render_records_panel_area() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert_eq!(app.host.ui_root(), Some(UiRoot::new(0, 3, PANEL_WIDTH, 24)));

        // Picker anchors beside the panel once it opens
        app.selected_col = app.trigger_col();
        press(&mut app, KeyCode::Enter);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let anchor = app.picker.layout().and_then(crate::picker::PickerLayout::anchor);
        assert_eq!(anchor, Some(UiRoot::new(0, 3, PANEL_WIDTH, 24)));
    }

    #[test]
    fn test_quit_key() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }
}
