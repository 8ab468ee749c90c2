//! Declarative description of the picker's widget tree.
//!
//! The layout says *what* the picker contains and where it sits relative to
//! the host UI; the terminal front end decides how each row is drawn.

use super::{Focus, Slider};
use crate::host::UiRoot;

/// Buttons in the picker's button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Hands the chosen color to the session callback and hides the picker
    Apply,
    /// Hides the picker without applying
    Close,
}

impl Button {
    /// Button caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Apply => "Apply",
            Self::Close => "Close",
        }
    }
}

/// One row of the picker, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRow {
    /// Heading text
    Title(String),
    /// Labelled slider for one HSV channel
    Slider {
        /// Channel edited by the slider
        slider: Slider,
        /// Short label drawn left of the track
        label: String,
        /// Draw the track as a hue gradient instead of a plain fill
        gradient: bool,
    },
    /// Live preview swatch with hex readout
    Preview {
        /// Caption above the swatch
        label: String,
    },
    /// Row of buttons, left to right
    Buttons(Vec<Button>),
}

impl PickerRow {
    /// Height of the row in terminal cells, including the gap below it.
    #[must_use]
    pub const fn height(&self) -> u16 {
        match self {
            Self::Title(_) | Self::Slider { .. } => 2,
            Self::Preview { .. } => 4,
            Self::Buttons(_) => 1,
        }
    }
}

/// The built picker: its rows, size and anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLayout {
    rows: Vec<PickerRow>,
    width: u16,
    anchor: Option<UiRoot>,
}

impl PickerLayout {
    /// Start describing a layout.
    #[must_use]
    pub fn builder() -> PickerLayoutBuilder {
        PickerLayoutBuilder::default()
    }

    /// Title, hue/saturation/value sliders, preview, Apply and Close.
    #[must_use]
    pub fn standard(anchor: Option<UiRoot>) -> Self {
        Self::builder()
            .title("Color Picker")
            .gradient_slider(Slider::Hue, "H")
            .slider(Slider::Saturation, "S")
            .slider(Slider::Value, "V")
            .preview("Preview")
            .buttons([Button::Apply, Button::Close])
            .anchor(anchor)
            .build()
    }

    /// Rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[PickerRow] {
        &self.rows
    }

    /// Outer width including the border.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Outer height including the border.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.rows.iter().map(PickerRow::height).sum::<u16>() + 2
    }

    /// The host UI rectangle the picker was anchored to when built.
    #[must_use]
    pub const fn anchor(&self) -> Option<UiRoot> {
        self.anchor
    }

    /// Focusable items in tab order.
    #[must_use]
    pub fn focus_order(&self) -> Vec<Focus> {
        self.rows
            .iter()
            .flat_map(|row| match row {
                PickerRow::Slider { slider, .. } => vec![Focus::Slider(*slider)],
                PickerRow::Buttons(buttons) => buttons.iter().map(|b| Focus::Button(*b)).collect(),
                PickerRow::Title(_) | PickerRow::Preview { .. } => Vec::new(),
            })
            .collect()
    }

    /// Where to draw the picker inside `frame`.
    ///
    /// Anchored layouts sit to the right of the anchor (or overlap its right
    /// edge when there is no room), top-aligned with it. Unanchored layouts
    /// are centred. The result never leaves `frame`.
    #[must_use]
    pub fn placement(&self, frame: UiRoot) -> UiRoot {
        let width = self.width.min(frame.width);
        let height = self.height().min(frame.height);
        let max_x = frame.right().saturating_sub(width);
        let max_y = frame.bottom().saturating_sub(height);

        let (x, y) = match self.anchor {
            Some(anchor) => {
                let beside = anchor.right().saturating_add(1);
                let x = if beside <= max_x {
                    beside
                } else {
                    anchor.right().saturating_sub(width)
                };
                (x, anchor.y)
            }
            None => (
                frame.x + (frame.width - width) / 2,
                frame.y + (frame.height - height) / 2,
            ),
        };

        UiRoot::new(x.clamp(frame.x, max_x), y.clamp(frame.y, max_y), width, height)
    }
}

/// Builder for [`PickerLayout`].
#[derive(Debug, Clone)]
pub struct PickerLayoutBuilder {
    rows: Vec<PickerRow>,
    width: u16,
    anchor: Option<UiRoot>,
}

impl Default for PickerLayoutBuilder {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            width: 36,
            anchor: None,
        }
    }
}

impl PickerLayoutBuilder {
    /// Add a heading.
    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.rows.push(PickerRow::Title(text.into()));
        self
    }

    /// Add a plain slider.
    pub fn slider(mut self, slider: Slider, label: impl Into<String>) -> Self {
        self.rows.push(PickerRow::Slider {
            slider,
            label: label.into(),
            gradient: false,
        });
        self
    }

    /// Add a slider drawn over a hue gradient.
    pub fn gradient_slider(mut self, slider: Slider, label: impl Into<String>) -> Self {
        self.rows.push(PickerRow::Slider {
            slider,
            label: label.into(),
            gradient: true,
        });
        self
    }

    /// Add the preview swatch.
    pub fn preview(mut self, label: impl Into<String>) -> Self {
        self.rows.push(PickerRow::Preview {
            label: label.into(),
        });
        self
    }

    /// Add a row of buttons.
    pub fn buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.rows.push(PickerRow::Buttons(buttons.into_iter().collect()));
        self
    }

    /// Outer width in cells.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Anchor next to a host UI rectangle.
    pub fn anchor(mut self, anchor: Option<UiRoot>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Finish the layout.
    #[must_use]
    pub fn build(self) -> PickerLayout {
        PickerLayout {
            rows: self.rows,
            width: self.width,
            anchor: self.anchor,
        }
    }
}
