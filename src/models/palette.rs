//! Fixed, ordered palette of built-in beacon colors.
//!
//! Hosts only let users pick from this list; anything else has to go through
//! an override.

use serde::Deserialize;

use super::Rgba;

/// One selectable palette color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaletteEntry {
    /// Display name of the color (e.g., "Amber", "Blue").
    pub name: String,
    /// The color itself.
    pub color: Rgba,
}

/// Ordered list of built-in colors, indexed by integer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Palette {
    /// Entries in selection order.
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Load the built-in palette from embedded JSON data.
    ///
    /// # Errors
    /// Returns an error if the JSON data cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        let json_data = include_str!("../data/palette.json");
        let palette: Self = serde_json::from_str(json_data)?;
        Ok(palette)
    }

    /// Build a palette from explicit entries.
    #[must_use]
    pub fn from_colors<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = (S, Rgba)>,
        S: Into<String>,
    {
        Self {
            entries: colors
                .into_iter()
                .map(|(name, color)| PaletteEntry {
                    name: name.into(),
                    color,
                })
                .collect(),
        }
    }

    /// Get an entry by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Get the color at `index`, clamped to the palette bounds.
    ///
    /// An empty palette yields white.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Rgba {
        self.entries
            .get(index.min(self.entries.len().saturating_sub(1)))
            .map_or(Rgba::WHITE, |entry| entry.color)
    }

    /// Get the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
