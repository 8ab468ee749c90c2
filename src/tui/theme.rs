//! Colors for the terminal front end in dark and light variants.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Borders, titles and emphasis
    pub primary: Color,
    /// Selection and focus highlight
    pub accent: Color,
    /// Confirmations
    pub success: Color,
    /// Warnings, including degraded hooks
    pub warning: Color,

    /// Primary text
    pub text: Color,
    /// Help text and inactive items
    pub text_muted: Color,

    /// Main background
    pub background: Color,
    /// Selected row background
    pub highlight_bg: Color,
}

impl Theme {
    /// Detects the OS theme and returns the matching variant.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            // Dark mode, unspecified or detection failure
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Theme for the configured mode; `Auto` asks the OS.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Bright chrome on a black background.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,

            text: Color::White,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,
        }
    }

    /// Darker chrome on a white background.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0), // Dark orange for visibility
            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),
        }
    }
}
