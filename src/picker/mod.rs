//! HSV color picker state machine.
//!
//! The picker is either hidden or visible with exactly one session. A session
//! carries the beacon being edited, the in-progress HSV value and the callback
//! that receives the color on apply. The picker never touches storage: the
//! callback is the only way a chosen color leaves it.

pub mod layout;

use tracing::{debug, warn};

use crate::host::UiRoot;
use crate::models::{EntityId, Hsv, Rgba};

pub use layout::{Button, PickerLayout, PickerLayoutBuilder, PickerRow};

/// Completion callback: receives the beacon id, the chosen color and the
/// caller-supplied context passed to [`ColorPicker::apply`].
pub type ApplyFn<C> = Box<dyn FnOnce(&EntityId, Rgba, &mut C)>;

/// HSV channel edited by a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    /// Hue
    Hue,
    /// Saturation
    Saturation,
    /// Value/brightness
    Value,
}

/// Focusable element of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A slider
    Slider(Slider),
    /// A button
    Button(Button),
}

/// Transient state of one open picker interaction.
pub struct PickerSession<C> {
    id: EntityId,
    hsv: Hsv,
    alpha: f32,
    on_apply: ApplyFn<C>,
}

impl<C> PickerSession<C> {
    /// Beacon being edited.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// In-progress HSV value.
    #[must_use]
    pub const fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Color the session would apply right now.
    #[must_use]
    pub fn color(&self) -> Rgba {
        self.hsv.to_rgba(self.alpha)
    }
}

impl<C> std::fmt::Debug for PickerSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerSession")
            .field("id", &self.id)
            .field("hsv", &self.hsv)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

/// Single-instance HSV picker. `C` is the context handed to apply callbacks.
#[derive(Debug)]
pub struct ColorPicker<C> {
    layout: Option<PickerLayout>,
    session: Option<PickerSession<C>>,
    focus: Focus,
    builds: usize,
}

impl<C> ColorPicker<C> {
    /// A hidden picker. The widget layout is built on first [`open`](Self::open).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layout: None,
            session: None,
            focus: Focus::Slider(Slider::Hue),
            builds: 0,
        }
    }

    /// Starts a session for `id`, replacing any session already open.
    ///
    /// `anchor` is the host UI surface to attach to; it is only consulted when
    /// the layout has to be (re)built. The sliders are seeded from `initial`
    /// without treating it as a user change.
    pub fn open(
        &mut self,
        anchor: Option<UiRoot>,
        id: EntityId,
        initial: Rgba,
        on_apply: impl FnOnce(&EntityId, Rgba, &mut C) + 'static,
    ) {
        if self.layout.is_none() {
            if anchor.is_none() {
                warn!("ColorPicker: could not find the host UI root, picker will be centred");
            }
            self.layout = Some(PickerLayout::standard(anchor));
            self.builds += 1;
            debug!(builds = self.builds, "built color picker layout");
        }

        if let Some(previous) = self.session.take() {
            debug!(previous = %previous.id, next = %id, "discarding unapplied picker session");
        }

        self.session = Some(PickerSession {
            id,
            hsv: initial.to_hsv(),
            alpha: initial.a,
            on_apply: Box::new(on_apply),
        });
        self.focus = Focus::Slider(Slider::Hue);
    }

    /// Hides the picker and drops the session. Idempotent.
    pub fn close(&mut self) {
        self.session = None;
    }

    /// Drops the built layout, as when the host destroyed the surface it was
    /// attached to. The next `open` rebuilds it.
    pub fn teardown(&mut self) {
        self.session = None;
        self.layout = None;
    }

    /// Hands the current color to the session callback, then hides.
    ///
    /// Returns false when no session was open.
    pub fn apply(&mut self, ctx: &mut C) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let color = session.color();
        debug!(id = %session.id, color = %color, "applying picked color");
        (session.on_apply)(&session.id, color, ctx);
        true
    }

    /// Per-tick housekeeping: hides without applying when the host UI context
    /// the picker depends on is gone. Returns true if it closed the picker.
    pub fn tick(&mut self, context_active: bool) -> bool {
        if self.is_visible() && !context_active {
            debug!("host UI context closed, hiding color picker");
            self.close();
            return true;
        }
        false
    }

    /// Whether a session is open.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.session.is_some()
    }

    /// The open session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&PickerSession<C>> {
        self.session.as_ref()
    }

    /// The built layout, if any.
    #[must_use]
    pub const fn layout(&self) -> Option<&PickerLayout> {
        self.layout.as_ref()
    }

    /// How many times the layout has been built.
    #[must_use]
    pub const fn build_count(&self) -> usize {
        self.builds
    }

    /// Live preview color, or `None` while hidden.
    #[must_use]
    pub fn preview(&self) -> Option<Rgba> {
        self.session.as_ref().map(PickerSession::color)
    }

    /// Current value of a slider (0.0 while hidden).
    #[must_use]
    pub fn slider_value(&self, slider: Slider) -> f32 {
        self.session.as_ref().map_or(0.0, |s| match slider {
            Slider::Hue => s.hsv.h,
            Slider::Saturation => s.hsv.s,
            Slider::Value => s.hsv.v,
        })
    }

    /// Sets a slider, clamped to `[0, 1]`. Ignored while hidden.
    pub fn set_slider(&mut self, slider: Slider, value: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let value = value.clamp(0.0, 1.0);
        match slider {
            Slider::Hue => session.hsv.h = value,
            Slider::Saturation => session.hsv.s = value,
            Slider::Value => session.hsv.v = value,
        }
    }

    /// Moves a slider by `delta`.
    pub fn adjust_slider(&mut self, slider: Slider, delta: f32) {
        self.set_slider(slider, self.slider_value(slider) + delta);
    }

    /// Focused element.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Moves focus forward (`true`) or backward through the layout's tab order,
    /// wrapping at the ends.
    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self
            .layout
            .as_ref()
            .map(PickerLayout::focus_order)
            .unwrap_or_default();
        if order.is_empty() {
            return;
        }
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Adjusts the focused slider. Does nothing when a button has focus.
    pub fn adjust_focused(&mut self, delta: f32) {
        if let Focus::Slider(slider) = self.focus {
            self.adjust_slider(slider, delta);
        }
    }

    /// Activates the focused element: Close hides, everything else applies.
    pub fn activate(&mut self, ctx: &mut C) -> bool {
        match self.focus {
            Focus::Button(Button::Close) => {
                self.close();
                false
            }
            Focus::Button(Button::Apply) | Focus::Slider(_) => self.apply(ctx),
        }
    }
}

impl<C> Default for ColorPicker<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every applied color.
    type Applied = Vec<(EntityId, Rgba)>;

    fn record(id: &EntityId, color: Rgba, log: &mut Applied) {
        log.push((id.clone(), color));
    }

    const RED: Rgba = Rgba::opaque(1.0, 0.0, 0.0);

    #[test]
    fn test_open_seeds_sliders_and_shows() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        assert!(!picker.is_visible());

        picker.open(None, "a".into(), Rgba::opaque(0.0, 0.0, 1.0), record);

        assert!(picker.is_visible());
        assert!((picker.slider_value(Slider::Hue) - 2.0 / 3.0).abs() < 1e-5);
        assert!((picker.slider_value(Slider::Saturation) - 1.0).abs() < 1e-5);
        assert!((picker.slider_value(Slider::Value) - 1.0).abs() < 1e-5);
        assert_eq!(picker.focus(), Focus::Slider(Slider::Hue));
    }

    #[test]
    fn test_slider_change_updates_preview_without_applying() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        picker.open(None, "a".into(), RED, record);

        picker.set_slider(Slider::Value, 0.5);
        let preview = picker.preview().unwrap();
        assert!(preview.approx_eq(&Rgba::opaque(0.5, 0.0, 0.0), 1e-5));

        picker.adjust_slider(Slider::Value, 2.0);
        assert_eq!(picker.slider_value(Slider::Value), 1.0);
    }

    #[test]
    fn test_apply_invokes_callback_then_hides() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();
        picker.open(None, "a".into(), RED, record);
        picker.set_slider(Slider::Hue, 1.0 / 3.0);

        assert!(picker.apply(&mut applied));
        assert!(!picker.is_visible());
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0, EntityId::from("a"));
        assert!(applied[0].1.approx_eq(&Rgba::opaque(0.0, 1.0, 0.0), 1e-5));

        // Nothing left to apply
        assert!(!picker.apply(&mut applied));
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn test_alpha_is_carried_through_session() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();
        picker.open(None, "a".into(), Rgba::new(1.0, 0.0, 0.0, 0.4), record);
        picker.apply(&mut applied);
        assert_eq!(applied[0].1.a, 0.4);
    }

    #[test]
    fn test_reopen_discards_previous_session() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();

        picker.open(None, "A".into(), RED, |_, _, log: &mut Applied| {
            log.push(("never".into(), Rgba::BLACK));
        });
        picker.open(None, "B".into(), RED, record);
        picker.apply(&mut applied);

        assert_eq!(applied, vec![(EntityId::from("B"), RED)]);
    }

    #[test]
    fn test_close_is_idempotent_and_discards() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();
        picker.close();
        picker.open(None, "a".into(), RED, record);
        picker.close();
        picker.close();
        assert!(!picker.is_visible());
        assert!(!picker.apply(&mut applied));
        assert!(applied.is_empty());
    }

    #[test]
    fn test_tick_auto_closes_without_applying() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();
        picker.open(None, "a".into(), RED, record);

        assert!(!picker.tick(true));
        assert!(picker.is_visible());

        assert!(picker.tick(false));
        assert!(!picker.is_visible());
        assert!(!picker.apply(&mut applied));
        assert!(applied.is_empty());

        // Hidden pickers ignore context changes
        assert!(!picker.tick(false));
    }

    #[test]
    fn test_layout_built_lazily_once() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        assert!(picker.layout().is_none());

        let anchor = Some(UiRoot::new(0, 0, 10, 10));
        picker.open(anchor, "a".into(), RED, record);
        picker.open(None, "b".into(), RED, record);
        assert_eq!(picker.build_count(), 1);
        assert_eq!(picker.layout().and_then(PickerLayout::anchor), anchor);

        picker.teardown();
        assert!(picker.layout().is_none());
        assert!(!picker.is_visible());

        picker.open(None, "c".into(), RED, record);
        assert_eq!(picker.build_count(), 2);
        assert_eq!(picker.layout().and_then(PickerLayout::anchor), None);
    }

    #[test]
    fn test_focus_cycle_and_activate() {
        let mut picker: ColorPicker<Applied> = ColorPicker::new();
        let mut applied = Applied::new();
        picker.open(None, "a".into(), RED, record);

        picker.cycle_focus(false);
        assert_eq!(picker.focus(), Focus::Button(Button::Close));
        picker.adjust_focused(0.5); // no slider focused
        assert_eq!(picker.slider_value(Slider::Hue), 0.0);

        assert!(!picker.activate(&mut applied));
        assert!(!picker.is_visible());
        assert!(applied.is_empty());

        picker.open(None, "a".into(), RED, record);
        picker.cycle_focus(true);
        assert_eq!(picker.focus(), Focus::Slider(Slider::Saturation));
        picker.adjust_focused(-0.25);
        assert!((picker.slider_value(Slider::Saturation) - 0.75).abs() < 1e-5);
        assert!(picker.activate(&mut applied));
        assert_eq!(applied.len(), 1);
    }
}
