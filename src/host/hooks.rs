//! Storage for the callbacks a host runs at its extension points.
//!
//! Hosts embed a [`HookSlots`] and call the `run_*` methods at the matching
//! places in their own pipeline.

use std::collections::BTreeSet;
use std::fmt;

use super::{ColorHookFn, EntityHookFn, Hook, HookError, HookPoint};
use crate::models::{EntityId, Rgba};

/// One optional callback per extension point, plus which points exist at all.
pub struct HookSlots {
    supported: BTreeSet<HookPoint>,
    color_notify: Option<ColorHookFn>,
    entity_created: Option<ColorHookFn>,
    palette_selected: Option<EntityHookFn>,
}

impl HookSlots {
    /// Slots for a host that offers every extension point.
    #[must_use]
    pub fn new() -> Self {
        Self::supporting(HookPoint::ALL)
    }

    /// Slots for a host that only offers `points`.
    #[must_use]
    pub fn supporting(points: impl IntoIterator<Item = HookPoint>) -> Self {
        Self {
            supported: points.into_iter().collect(),
            color_notify: None,
            entity_created: None,
            palette_selected: None,
        }
    }

    /// Whether the host offers `point`.
    #[must_use]
    pub fn supports(&self, point: HookPoint) -> bool {
        self.supported.contains(&point)
    }

    /// Whether a hook currently occupies `point`.
    #[must_use]
    pub fn is_installed(&self, point: HookPoint) -> bool {
        match point {
            HookPoint::ColorNotify => self.color_notify.is_some(),
            HookPoint::EntityCreated => self.entity_created.is_some(),
            HookPoint::PaletteSelected => self.palette_selected.is_some(),
        }
    }

    /// Installs `hook` into its slot.
    pub fn install(&mut self, hook: Hook) -> Result<(), HookError> {
        let point = hook.point();
        if !self.supports(point) {
            return Err(HookError::Unsupported(point));
        }
        if self.is_installed(point) {
            return Err(HookError::Occupied(point));
        }

        match hook {
            Hook::ColorNotify(f) => self.color_notify = Some(f),
            Hook::EntityCreated(f) => self.entity_created = Some(f),
            Hook::PaletteSelected(f) => self.palette_selected = Some(f),
        }
        Ok(())
    }

    /// Empties the slot for `point`.
    pub fn remove(&mut self, point: HookPoint) {
        match point {
            HookPoint::ColorNotify => self.color_notify = None,
            HookPoint::EntityCreated => self.entity_created = None,
            HookPoint::PaletteSelected => self.palette_selected = None,
        }
    }

    /// Runs the color-notify hook, if installed.
    pub fn run_color_notify(&mut self, id: &EntityId, color: &mut Rgba) {
        if let Some(hook) = self.color_notify.as_mut() {
            hook(id, color);
        }
    }

    /// Runs the entity-created hook, if installed.
    pub fn run_entity_created(&mut self, id: &EntityId, color: &mut Rgba) {
        if let Some(hook) = self.entity_created.as_mut() {
            hook(id, color);
        }
    }

    /// Runs the palette-selected hook, if installed.
    pub fn run_palette_selected(&mut self, id: &EntityId) {
        if let Some(hook) = self.palette_selected.as_mut() {
            hook(id);
        }
    }
}

impl Default for HookSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<HookPoint> = HookPoint::ALL
            .into_iter()
            .filter(|p| self.is_installed(*p))
            .collect();
        f.debug_struct("HookSlots")
            .field("supported", &self.supported)
            .field("installed", &installed)
            .finish()
    }
}
