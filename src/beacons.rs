//! Demo host: a registry of map beacons colored from a fixed palette.
//!
//! The registry owns the native color pipeline. Every path that paints a
//! beacon (creation, palette selection, explicit notification) runs the
//! matching extension point from its [`HookSlots`].

use std::collections::HashMap;
use tracing::debug;

use crate::host::{Hook, HookError, HookPoint, HookSlots, Host, UiRoot};
use crate::models::{EntityId, Palette, Rgba};

/// One beacon on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beacon {
    /// Stable identifier
    pub id: EntityId,
    /// Text shown in the beacon list
    pub label: String,
    /// Selected palette index
    pub color_index: usize,
}

/// Beacon list, HUD colors and the beacon panel state.
#[derive(Debug)]
pub struct BeaconRegistry {
    palette: Palette,
    beacons: Vec<Beacon>,
    hud: HashMap<EntityId, Rgba>,
    hooks: HookSlots,
    panel_open: bool,
    panel_area: Option<UiRoot>,
}

impl BeaconRegistry {
    /// Empty registry offering every extension point.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self::with_hook_slots(palette, HookSlots::new())
    }

    /// Empty registry offering only `points`, like an older host build would.
    #[must_use]
    pub fn supporting(palette: Palette, points: impl IntoIterator<Item = HookPoint>) -> Self {
        Self::with_hook_slots(palette, HookSlots::supporting(points))
    }

    fn with_hook_slots(palette: Palette, hooks: HookSlots) -> Self {
        Self {
            palette,
            beacons: Vec::new(),
            hud: HashMap::new(),
            hooks,
            panel_open: true,
            panel_area: None,
        }
    }

    /// Places a new beacon with a generated id.
    pub fn add(&mut self, label: impl Into<String>, color_index: usize) -> EntityId {
        self.add_with_id(EntityId::generate(), label, color_index)
    }

    /// Places a new beacon with a known id, replacing any beacon with that id.
    ///
    /// The HUD visual is built from the palette first; the entity-created
    /// hook then runs on the stored visual.
    pub fn add_with_id(
        &mut self,
        id: EntityId,
        label: impl Into<String>,
        color_index: usize,
    ) -> EntityId {
        self.beacons.retain(|b| b.id != id);
        self.beacons.push(Beacon {
            id: id.clone(),
            label: label.into(),
            color_index,
        });

        self.hud.insert(id.clone(), self.palette.color_at(color_index));
        if let Some(visual) = self.hud.get_mut(&id) {
            self.hooks.run_entity_created(&id, visual);
        }
        debug!(%id, color_index, "beacon placed");
        id
    }

    /// Removes a beacon. Returns `false` if it did not exist.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        let before = self.beacons.len();
        self.beacons.retain(|b| &b.id != id);
        self.hud.remove(id);
        before != self.beacons.len()
    }

    /// Beacons in placement order.
    #[must_use]
    pub fn beacons(&self) -> &[Beacon] {
        &self.beacons
    }

    /// Looks up a beacon.
    #[must_use]
    pub fn beacon(&self, id: &EntityId) -> Option<&Beacon> {
        self.beacons.iter().find(|b| &b.id == id)
    }

    /// Color currently painted on the HUD for `id`.
    #[must_use]
    pub fn hud_color(&self, id: &EntityId) -> Option<Rgba> {
        self.hud.get(id).copied()
    }

    /// Native palette pick from the beacon panel.
    pub fn select_palette(&mut self, id: &EntityId, index: usize) {
        self.hooks.run_palette_selected(id);
        let index = index.min(self.palette.len().saturating_sub(1));
        if let Some(beacon) = self.beacons.iter_mut().find(|b| &b.id == id) {
            beacon.color_index = index;
        }
        self.notify_color(id);
    }

    /// Whether the beacon panel is shown.
    #[must_use]
    pub const fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Shows the beacon panel.
    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// Hides the beacon panel. Its screen area is gone with it.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.panel_area = None;
    }

    /// Flips panel visibility.
    pub fn toggle_panel(&mut self) {
        if self.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Records where the panel was last drawn.
    pub fn set_panel_area(&mut self, area: Option<UiRoot>) {
        self.panel_area = area;
    }
}

impl Host for BeaconRegistry {
    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn selected_palette_index(&self, id: &EntityId) -> Option<usize> {
        self.beacon(id).map(|b| b.color_index)
    }

    fn notify_color(&mut self, id: &EntityId) {
        let Some(index) = self.selected_palette_index(id) else {
            return;
        };
        let mut color = self.palette.color_at(index);
        self.hooks.run_color_notify(id, &mut color);
        self.hud.insert(id.clone(), color);
    }

    fn ui_context_active(&self) -> bool {
        self.panel_open
    }

    fn ui_root(&self) -> Option<UiRoot> {
        if self.panel_open {
            self.panel_area
        } else {
            None
        }
    }

    fn install_hook(&mut self, hook: Hook) -> Result<(), HookError> {
        self.hooks.install(hook)
    }

    fn remove_hook(&mut self, point: HookPoint) {
        self.hooks.remove(point);
    }
}
