use std::sync::OnceLock;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Copy, Debug)]
pub(super) struct RenderCtx {
    pub(super) now: OffsetDateTime,
}

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]Z",
        )
        .unwrap_or_default()
    })
}

pub(super) fn fmt_ts_ui(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(ts_ui_format()).ok())
        .unwrap_or_else(|| ts.to_string())
}

/// Relative age for recent rows, absolute date past two weeks.
pub(super) fn fmt_age(ts: &str, ctx: &RenderCtx) -> String {
    let Ok(dt) = OffsetDateTime::parse(ts, &Rfc3339) else {
        return ts.to_string();
    };
    let secs = (ctx.now - dt).whole_seconds();
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;
    if secs < 0 || days >= 14 {
        fmt_ts_ui(ts)
    } else if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 48 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

pub(super) fn render_view_chrome(
    frame: &mut ratatui::Frame,
    title: &str,
    note: &str,
    area: Rect,
) -> Rect {
    let header = Line::from(vec![
        Span::styled(title.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(note.to_string(), Style::default().fg(Color::Gray)),
    ]);
    let outer = Block::default().borders(Borders::ALL).title(header);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}

#[cfg(test)]
#[path = "../tests/tui_shell/view_tests.rs"]
mod tests;
