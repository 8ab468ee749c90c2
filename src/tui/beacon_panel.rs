//! The beacon panel (host UI) and the map strip.
//!
//! Each panel row shows the beacon's palette dots followed by the custom
//! color trigger. The map strip shows what the host actually painted, so
//! overrides are visible there without any help from the panel.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::App;
use crate::host::Host;

/// Handles a key while the panel has input.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let rows = app.host.beacons().len();
    match key.code {
        KeyCode::Up => app.selected_row = app.selected_row.saturating_sub(1),
        KeyCode::Down if rows > 0 => {
            app.selected_row = (app.selected_row + 1).min(rows - 1);
        }
        KeyCode::Left => app.selected_col = app.selected_col.saturating_sub(1),
        KeyCode::Right => app.selected_col = (app.selected_col + 1).min(app.trigger_col()),
        KeyCode::Enter | KeyCode::Char(' ') => activate(app),
        KeyCode::Char('a') => {
            let label = format!("Beacon {}", rows + 1);
            let id = app.host.add(label.clone(), 0);
            app.layer.augment_entry(&id);
            app.selected_row = rows;
            app.set_status(format!("Placed {label}"));
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_beacon() {
                app.host.remove(&id);
                app.layer.forget_entry(&id);
                app.selected_row = app.selected_row.min(rows.saturating_sub(2));
                app.set_status(format!("Removed {id}"));
            }
        }
        _ => {}
    }
}

/// Enter on a palette dot selects that color natively; on the trigger it
/// opens the picker.
fn activate(app: &mut App) {
    let Some(id) = app.selected_beacon() else {
        return;
    };

    if app.selected_col >= app.trigger_col() {
        app.layer.activate_trigger(&app.host, &id, &mut app.picker);
        app.set_status(format!("Editing color of {id}"));
        return;
    }

    app.host.select_palette(&id, app.selected_col);
    // The host re-initializes the entry after a native pick
    app.layer.augment_entry(&id);
    let name = app
        .host
        .palette()
        .get(app.selected_col)
        .map_or_else(String::new, |e| e.name.clone());
    debug!(%id, index = app.selected_col, "palette color selected");
    app.set_status(format!("{id} set to {name}"));
}

/// Draws the beacon list with palette dots and trigger controls.
pub fn render_panel(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let palette = app.host.palette();
    let trigger_col = app.trigger_col();

    let lines: Vec<Line> = app
        .host
        .beacons()
        .iter()
        .enumerate()
        .map(|(row, beacon)| {
            let selected = row == app.selected_row;
            let cursor = |col: usize| selected && col == app.selected_col;

            let label_style = if selected {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let mut spans = vec![
                Span::styled(if selected { "> " } else { "  " }, Style::default().fg(theme.accent)),
                Span::styled(format!("{:<16}", truncate(&beacon.label, 16)), label_style),
                Span::raw(" "),
            ];

            for (col, entry) in palette.entries.iter().enumerate() {
                let glyph = if col == beacon.color_index { "◉" } else { "●" };
                let mut style = Style::default().fg(entry.color.to_ratatui_color());
                if cursor(col) {
                    style = style.bg(theme.highlight_bg);
                }
                spans.push(Span::styled(glyph, style));
                spans.push(Span::raw(" "));
            }

            let swatch = app
                .layer
                .trigger(&beacon.id)
                .map_or(crate::models::Rgba::WHITE, |t| t.swatch());
            let trigger_style = if cursor(trigger_col) {
                Style::default().fg(theme.background).bg(theme.accent)
            } else {
                Style::default().fg(theme.text_muted)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled("■", Style::default().fg(swatch.to_ratatui_color())));
            spans.push(Span::styled("+", trigger_style));
            Line::from(spans)
        })
        .collect();

    let mut block = Block::default()
        .title(" Beacons ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    if !app.layer.report().disabled.is_empty() {
        block = block.title_bottom(Span::styled(
            " overrides degraded ",
            Style::default().fg(theme.warning),
        ));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draws the map strip with the colors the host painted.
pub fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines: Vec<Line> = app
        .host
        .beacons()
        .iter()
        .filter_map(|beacon| {
            let color = app.host.hud_color(&beacon.id)?;
            let custom = app.layer.store().borrow().get(beacon.id.as_str()).is_some();
            Some(Line::from(vec![
                Span::styled(" ◆ ", Style::default().fg(color.to_ratatui_color())),
                Span::styled(beacon.label.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {}", color.to_hex()),
                    Style::default().fg(theme.text_muted),
                ),
                if custom {
                    Span::styled("  custom", Style::default().fg(theme.success))
                } else {
                    Span::raw("")
                },
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" Map ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
