//! Glue between the host's color pipeline and the override store.
//!
//! Three hooks are installed into the host:
//!
//! - **color-notify** runs before the host paints a beacon and swaps in the
//!   override, whatever the color source was.
//! - **entity-created** runs after the host finished building a beacon's
//!   visual, which the host paints without going through color-notify.
//! - **palette-selected** runs before the host handles a native palette pick
//!   and drops the override. It has to run first: the host's own handler ends
//!   in color-notify, which would otherwise re-apply the stale override.
//!
//! A hook the host cannot take is disabled on its own; the rest keep working.
//!
//! The layer also owns the per-beacon "custom color" trigger controls that
//! open the picker.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::constants::{APP_NAME, PLUGIN_ID};
use crate::host::{Hook, HookError, HookPoint, Host};
use crate::models::{EntityId, Rgba};
use crate::picker::ColorPicker;
use crate::store::OverrideStore;

/// Override store shared between the layer and the hooks it installs.
pub type SharedStore = Rc<RefCell<OverrideStore>>;

/// Which hooks made it into the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Installed and active
    pub enabled: Vec<HookPoint>,
    /// Rejected by the host, with the reason
    pub disabled: Vec<(HookPoint, HookError)>,
}

impl InstallReport {
    /// Whether `point` is active.
    #[must_use]
    pub fn is_enabled(&self, point: HookPoint) -> bool {
        self.enabled.contains(&point)
    }
}

/// Per-beacon control that opens the picker, showing the beacon's override
/// (white when it has none).
#[derive(Debug, Clone)]
pub struct TriggerControl {
    id: EntityId,
    swatch: Rc<Cell<Rgba>>,
}

impl TriggerControl {
    /// Beacon this control belongs to.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Color currently shown on the control.
    #[must_use]
    pub fn swatch(&self) -> Rgba {
        self.swatch.get()
    }
}

/// Installed override hooks plus the trigger controls.
#[derive(Debug)]
pub struct InterceptionLayer {
    store: SharedStore,
    report: InstallReport,
    triggers: BTreeMap<EntityId, TriggerControl>,
}

impl InterceptionLayer {
    /// Installs the three hooks into `host`.
    ///
    /// Hooks the host rejects are logged and left disabled.
    pub fn install<H: Host + ?Sized>(host: &mut H, store: SharedStore) -> Self {
        let mut report = InstallReport::default();

        for point in HookPoint::ALL {
            match host.install_hook(Self::hook_for(point, &store)) {
                Ok(()) => report.enabled.push(point),
                Err(err) => {
                    warn!("Override hook '{point}' disabled: {err}");
                    report.disabled.push((point, err));
                }
            }
        }

        info!(
            plugin = PLUGIN_ID,
            enabled = report.enabled.len(),
            disabled = report.disabled.len(),
            overrides = store.borrow().len(),
            "{APP_NAME} loaded"
        );

        Self {
            store,
            report,
            triggers: BTreeMap::new(),
        }
    }

    fn hook_for(point: HookPoint, store: &SharedStore) -> Hook {
        let store = Rc::clone(store);
        match point {
            HookPoint::ColorNotify => Hook::ColorNotify(Box::new(move |id, color| {
                if let Some(custom) = store.borrow().get(id.as_str()) {
                    *color = custom;
                }
            })),
            HookPoint::EntityCreated => Hook::EntityCreated(Box::new(move |id, color| {
                if let Some(custom) = store.borrow().get(id.as_str()) {
                    *color = custom;
                }
            })),
            HookPoint::PaletteSelected => Hook::PaletteSelected(Box::new(move |id| {
                if id.is_empty() {
                    return;
                }
                let mut store = store.borrow_mut();
                if store.remove(id.as_str()).is_some() {
                    debug!(%id, "native palette selection cleared custom color");
                    store.save();
                }
            })),
        }
    }

    /// Removes every installed hook from `host`.
    pub fn uninstall<H: Host + ?Sized>(self, host: &mut H) {
        for point in &self.report.enabled {
            host.remove_hook(*point);
        }
        debug!("override hooks removed");
    }

    /// Which hooks are active.
    #[must_use]
    pub const fn report(&self) -> &InstallReport {
        &self.report
    }

    /// The shared override store.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Adds the trigger control to a beacon's list entry.
    ///
    /// Safe to call on every re-initialization of the entry: an existing
    /// control only has its swatch refreshed.
    pub fn augment_entry(&mut self, id: &EntityId) -> &TriggerControl {
        let swatch = self.swatch_for(id);
        let control = self
            .triggers
            .entry(id.clone())
            .or_insert_with(|| TriggerControl {
                id: id.clone(),
                swatch: Rc::new(Cell::new(swatch)),
            });
        control.swatch.set(swatch);
        control
    }

    /// Drops the trigger control of a beacon that left the list.
    pub fn forget_entry(&mut self, id: &EntityId) {
        self.triggers.remove(id);
    }

    /// The trigger control for `id`, if its entry was augmented.
    #[must_use]
    pub fn trigger(&self, id: &EntityId) -> Option<&TriggerControl> {
        self.triggers.get(id)
    }

    /// The color a beacon is showing: its override, else its palette color.
    ///
    /// Unknown beacons resolve to palette index 0.
    #[must_use]
    pub fn effective_color<H: Host + ?Sized>(&self, host: &H, id: &EntityId) -> Rgba {
        if let Some(custom) = self.store.borrow().get(id.as_str()) {
            return custom;
        }
        let index = host.selected_palette_index(id).unwrap_or(0);
        host.palette().color_at(index)
    }

    /// Opens `picker` for `id`, seeded with the beacon's effective color.
    ///
    /// On apply the color is stored and saved, the host repaints the beacon
    /// through its native notification, and the trigger swatch follows.
    pub fn activate_trigger<H: Host + 'static>(
        &mut self,
        host: &H,
        id: &EntityId,
        picker: &mut ColorPicker<H>,
    ) {
        let initial = self.effective_color(host, id);
        let swatch = Rc::clone(&self.augment_entry(id).swatch);
        let store = Rc::clone(&self.store);

        picker.open(host.ui_root(), id.clone(), initial, move |id, color, host: &mut H| {
            let stored = {
                let mut store = store.borrow_mut();
                store.set(id.clone(), color);
                store.save();
                store.get(id.as_str()).unwrap_or(color)
            };
            host.notify_color(id);
            swatch.set(stored);
            info!(%id, color = %stored, "custom beacon color applied");
        });
    }

    fn swatch_for(&self, id: &EntityId) -> Rgba {
        self.store.borrow().get(id.as_str()).unwrap_or(Rgba::WHITE)
    }
}
