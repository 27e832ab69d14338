use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::console::SelectionFlags;
use crate::model::Record;

use super::{App, RenderCtx};

pub(super) fn status_color(status: &str) -> Color {
    match status {
        "approved" | "active" | "read" | "deployed" | "praise" => Color::Green,
        "rejected" | "inactive" | "bug" => Color::Red,
        "in_review" | "development" | "testing" | "deployment" => Color::Cyan,
        "pending" | "unread" | "planning" => Color::Yellow,
        _ => Color::White,
    }
}

/// Header checkbox: checked when every visible row is selected, dashed when some are.
pub(super) fn header_checkbox(flags: SelectionFlags) -> &'static str {
    if flags.all_selected {
        "[x]"
    } else if flags.partially_selected {
        "[-]"
    } else {
        "[ ]"
    }
}

fn snippet(rec: &Record, fields: &[&str], max: usize) -> String {
    let text = fields
        .iter()
        .filter_map(|f| rec.text(f))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

/// First row index to draw so `cursor` stays on screen.
pub(super) fn window_start(cursor: usize, total: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    let start = (cursor + 1).saturating_sub(height);
    start.min(total - height)
}

pub(super) fn draw_table(frame: &mut ratatui::Frame, app: &App, area: Rect, ctx: &RenderCtx) {
    let screen = &app.screen;
    let spec = screen.spec();
    let visible = screen.visible();

    if visible.is_empty() {
        let msg = if screen.records().is_empty() {
            "(no records)"
        } else {
            "(nothing matches the filter)"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::Gray))),
            area,
        );
        return;
    }

    let status_fields = spec.status_fields();
    let mut header = vec![
        Cell::from(header_checkbox(screen.selection_flags())),
        Cell::from("age"),
        Cell::from(spec.headline_field),
    ];
    for f in &status_fields {
        header.push(Cell::from(f.label));
    }
    header.push(Cell::from("details"));

    let body_h = area.height.saturating_sub(1) as usize;
    let start = window_start(app.cursor, visible.len(), body_h);
    let end = (start + body_h).min(visible.len());

    let rows = visible[start..end].iter().enumerate().map(|(i, rec)| {
        let idx = start + i;
        let mark = if screen.is_selected(&rec.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut cells = vec![
            Cell::from(mark),
            Cell::from(super::view::fmt_age(&rec.created_at, ctx)),
            Cell::from(rec.text(spec.headline_field).unwrap_or_default()),
        ];
        for f in &status_fields {
            let s = f.resolve(rec);
            cells.push(Cell::from(Span::styled(s, Style::default().fg(status_color(s)))));
        }
        cells.push(Cell::from(snippet(rec, spec.detail_fields, 80)));

        let style = if idx == app.cursor {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    });

    let mut widths = vec![
        Constraint::Length(3),
        Constraint::Length(10),
        Constraint::Length(24),
    ];
    widths.extend(status_fields.iter().map(|_| Constraint::Length(12)));
    widths.push(Constraint::Min(10));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Gray)))
        .column_spacing(1);
    frame.render_widget(table, area);
}

#[cfg(test)]
#[path = "../tests/tui_shell/table_tests.rs"]
mod tests;
