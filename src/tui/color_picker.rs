//! Terminal rendering and key handling for the HSV color picker.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::{rect_to_root, root_to_rect, Theme};
use crate::config::UiConfig;
use crate::models::Hsv;
use crate::picker::{ColorPicker, Focus, PickerRow};

/// What a key press did to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Key not handled
    Ignored,
    /// Focus or a slider moved
    Changed,
    /// The color was handed to the session callback
    Applied,
    /// Hidden without applying
    Closed,
}

/// Handles a key while the picker is visible.
///
/// Up/Down move focus, Left/Right nudge the focused slider (Shift for the
/// fine step), Enter activates the focused element and Esc closes.
pub fn handle_key<C>(
    picker: &mut ColorPicker<C>,
    ctx: &mut C,
    key: KeyEvent,
    ui: &UiConfig,
) -> PickerOutcome {
    let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
        ui.slider_fine_step
    } else {
        ui.slider_step
    };

    match key.code {
        KeyCode::Esc => {
            picker.close();
            PickerOutcome::Closed
        }
        KeyCode::Enter => {
            if picker.activate(ctx) {
                PickerOutcome::Applied
            } else {
                PickerOutcome::Closed
            }
        }
        KeyCode::Up | KeyCode::BackTab => {
            picker.cycle_focus(false);
            PickerOutcome::Changed
        }
        KeyCode::Down | KeyCode::Tab => {
            picker.cycle_focus(true);
            PickerOutcome::Changed
        }
        KeyCode::Left => {
            picker.adjust_focused(-step);
            PickerOutcome::Changed
        }
        KeyCode::Right => {
            picker.adjust_focused(step);
            PickerOutcome::Changed
        }
        _ => PickerOutcome::Ignored,
    }
}

/// Draws the picker over whatever is below it. Does nothing while hidden.
pub fn render<C>(f: &mut Frame, picker: &ColorPicker<C>, theme: &Theme) {
    let (Some(layout), true) = (picker.layout(), picker.is_visible()) else {
        return;
    };

    let area = root_to_rect(layout.placement(rect_to_root(f.area())));
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut y = inner.y;
    for row in layout.rows() {
        let height = row.height().min(inner.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect::new(inner.x, y, inner.width, height);
        render_row(f, row_area, row, picker, theme);
        y += height;
    }
}

fn render_row<C>(f: &mut Frame, area: Rect, row: &PickerRow, picker: &ColorPicker<C>, theme: &Theme) {
    match row {
        PickerRow::Title(text) => {
            let title = Paragraph::new(text.as_str()).style(
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_widget(title, line(area, 0));
        }
        PickerRow::Slider {
            slider,
            label,
            gradient,
        } => {
            let focused = picker.focus() == Focus::Slider(*slider);
            let value = picker.slider_value(*slider);
            render_slider(f, line(area, 0), label, value, *gradient, focused, theme);
        }
        PickerRow::Preview { label } => {
            let Some(color) = picker.preview() else {
                return;
            };
            let swatch_width = area.width / 2;
            let swatch = Block::default()
                .title(format!(" {label} "))
                .borders(Borders::ALL)
                .style(Style::default().bg(color.to_ratatui_color()));
            f.render_widget(swatch, Rect::new(area.x, area.y, swatch_width, area.height.min(3)));

            let info = Paragraph::new(vec![
                Line::from(vec![
                    Span::styled(" Hex: ", Style::default().fg(theme.text_muted)),
                    Span::styled(
                        color.to_hex(),
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::styled(" Alpha: ", Style::default().fg(theme.text_muted)),
                    Span::styled(format!("{:.2}", color.a), Style::default().fg(theme.text)),
                ]),
            ]);
            f.render_widget(
                info,
                Rect::new(
                    area.x + swatch_width,
                    area.y,
                    area.width - swatch_width,
                    area.height.min(3),
                ),
            );
        }
        PickerRow::Buttons(buttons) => {
            let mut spans = Vec::with_capacity(buttons.len() * 2);
            for button in buttons {
                let style = if picker.focus() == Focus::Button(*button) {
                    Style::default()
                        .fg(theme.background)
                        .bg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                spans.push(Span::styled(format!("[ {} ]", button.label()), style));
                spans.push(Span::raw(" "));
            }
            f.render_widget(Paragraph::new(Line::from(spans)), line(area, 0));
        }
    }
}

fn render_slider(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: f32,
    gradient: bool,
    focused: bool,
    theme: &Theme,
) {
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let label_width = 4.min(area.width);
    f.render_widget(
        Paragraph::new(Span::styled(format!("{label:<3}"), label_style)),
        Rect::new(area.x, area.y, label_width, 1),
    );

    let track = Rect::new(
        area.x + label_width,
        area.y,
        area.width - label_width,
        1,
    );
    if gradient {
        f.render_widget(Paragraph::new(hue_track(track.width, value)), track);
    } else {
        let style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let gauge = Gauge::default()
            .gauge_style(style)
            .label(format!("{:3.0}%", value * 100.0))
            .ratio(f64::from(value.clamp(0.0, 1.0)));
        f.render_widget(gauge, track);
    }
}

/// A full-saturation hue ramp with a marker at `value`.
fn hue_track(width: u16, value: f32) -> Line<'static> {
    let cells = usize::from(width);
    if cells == 0 {
        return Line::default();
    }
    let last = cells.saturating_sub(1).max(1) as f32;
    let marker = (value.clamp(0.0, 1.0) * last).round() as usize;

    (0..cells)
        .map(|i| {
            let hue = i as f32 / last;
            let color = Hsv::new(hue.min(0.999), 1.0, 1.0).to_rgba(1.0).to_ratatui_color();
            if i == marker {
                Span::styled("┃", Style::default().fg(Color::White).bg(color))
            } else {
                Span::styled(" ", Style::default().bg(color))
            }
        })
        .collect::<Vec<_>>()
        .into()
}

fn line(area: Rect, offset: u16) -> Rect {
    Rect::new(area.x, area.y + offset.min(area.height.saturating_sub(1)), area.width, 1)
}
