//! The host application as seen by the override engine.
//!
//! The engine never reaches into host internals. Everything it needs (palette,
//! per-beacon palette index, the native "color changed" notification, UI
//! context and the three extension points) goes through [`Host`].

pub mod hooks;

use std::fmt;
use thiserror::Error;

use crate::models::{EntityId, Palette, Rgba};

pub use hooks::HookSlots;

/// A moment in the host's color pipeline where the engine may observe or
/// substitute a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookPoint {
    /// Runs before the host applies a color to a beacon's live visual.
    ColorNotify,
    /// Runs after the host finished constructing a beacon's visual.
    EntityCreated,
    /// Runs before the host handles a native palette selection.
    PaletteSelected,
}

impl HookPoint {
    /// Every extension point, in install order.
    pub const ALL: [Self; 3] = [Self::ColorNotify, Self::EntityCreated, Self::PaletteSelected];

    /// Short stable name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColorNotify => "color-notify",
            Self::EntityCreated => "entity-created",
            Self::PaletteSelected => "palette-selected",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callback that may replace the color about to be applied.
pub type ColorHookFn = Box<dyn FnMut(&EntityId, &mut Rgba)>;

/// Callback observing a beacon id.
pub type EntityHookFn = Box<dyn FnMut(&EntityId)>;

/// A callback bound to one extension point.
pub enum Hook {
    /// See [`HookPoint::ColorNotify`]. May overwrite the color in place.
    ColorNotify(ColorHookFn),
    /// See [`HookPoint::EntityCreated`]. Receives the freshly built visual's color.
    EntityCreated(ColorHookFn),
    /// See [`HookPoint::PaletteSelected`].
    PaletteSelected(EntityHookFn),
}

impl Hook {
    /// The extension point this hook binds to.
    #[must_use]
    pub const fn point(&self) -> HookPoint {
        match self {
            Self::ColorNotify(_) => HookPoint::ColorNotify,
            Self::EntityCreated(_) => HookPoint::EntityCreated,
            Self::PaletteSelected(_) => HookPoint::PaletteSelected,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.point()).finish()
    }
}

/// Why a hook could not be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HookError {
    /// The host has no such extension point (e.g. an older host version).
    #[error("extension point '{0}' is not available in this host")]
    Unsupported(HookPoint),
    /// Another hook already occupies the extension point.
    #[error("extension point '{0}' already has a hook installed")]
    Occupied(HookPoint),
}

/// Rectangle of host UI, in terminal cells, that the picker anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiRoot {
    /// Left edge
    pub x: u16,
    /// Top edge
    pub y: u16,
    /// Width in cells
    pub width: u16,
    /// Height in cells
    pub height: u16,
}

impl UiRoot {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right edge.
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// What the override engine requires from the host application.
pub trait Host {
    /// The host's fixed, ordered palette.
    fn palette(&self) -> &Palette;

    /// The palette index currently selected for `id`, or `None` for unknown ids.
    fn selected_palette_index(&self, id: &EntityId) -> Option<usize>;

    /// Propagates the beacon's current color to every native consumer exactly
    /// as a native palette selection would. Runs the color-notify hook.
    fn notify_color(&mut self, id: &EntityId);

    /// Whether the UI context the picker depends on is still active.
    fn ui_context_active(&self) -> bool;

    /// The UI surface the picker anchors to, if the host currently has one.
    fn ui_root(&self) -> Option<UiRoot>;

    /// Capability query and registration in one step: installs `hook` at its
    /// extension point or reports why it cannot.
    fn install_hook(&mut self, hook: Hook) -> Result<(), HookError>;

    /// Removes whatever hook occupies `point`. No-op if none.
    fn remove_hook(&mut self, point: HookPoint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_point_of_hook() {
        let hook = Hook::PaletteSelected(Box::new(|_| {}));
        assert_eq!(hook.point(), HookPoint::PaletteSelected);
        assert_eq!(format!("{hook:?}"), "Hook(PaletteSelected)");
    }

    #[test]
    fn test_hook_error_messages() {
        let err = HookError::Unsupported(HookPoint::EntityCreated);
        assert_eq!(
            err.to_string(),
            "extension point 'entity-created' is not available in this host"
        );
    }
}
