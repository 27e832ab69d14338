use super::*;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_stats(frame, app, chunks[1]);

    let ctx = RenderCtx {
        now: OffsetDateTime::now_utc(),
    };
    let spec = app.screen.spec();
    let note = match app.screen.load_state() {
        LoadState::NotLoaded if !app.is_ready() => "waiting for credential".to_string(),
        LoadState::NotLoaded => String::new(),
        LoadState::Loading => "loading...".to_string(),
        LoadState::Loaded => format!(
            "{} of {}",
            app.screen.visible().len(),
            app.screen.records().len()
        ),
        LoadState::Failed(_) => "load failed (r to retry)".to_string(),
    };
    let inner = render_view_chrome(frame, spec.title, &note, chunks[2]);
    table::draw_table(frame, app, inner, &ctx);

    draw_filter(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if let Some(m) = &app.modal {
        modal::draw_modal(frame, app, m);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let mut spans = vec![
        Span::styled("Studio", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" "),
    ];
    for (i, kind) in EntityKind::ALL.iter().enumerate() {
        let style = if *kind == app.screen.kind() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, kind), style));
    }
    spans.push(Span::raw("  "));
    let who_style = if app.is_ready() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    spans.push(Span::styled(app.session_label(), who_style));

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_stats(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let mut spans = Vec::new();
    if let Some(counts) = app.screen.stats(app.workflow_field) {
        spans.push(Span::styled(
            format!("{} ", counts.field),
            Style::default().fg(Color::Gray),
        ));
        spans.push(Span::raw(format!("total {}", counts.total)));
        for (status, n) in &counts.by_status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {}", status, n),
                Style::default().fg(table::status_color(status)),
            ));
        }
    } else {
        spans.push(Span::styled(
            format!("{} records", app.screen.records().len()),
            Style::default().fg(Color::Gray),
        ));
    }
    if app.is_loading() {
        spans.push(Span::styled("  (refreshing)", Style::default().fg(Color::Gray)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_filter(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let facet = app.screen.criteria().facet.label().to_string();
    let facet_name = app
        .screen
        .spec()
        .facet
        .as_ref()
        .map(|f| f.label)
        .unwrap_or("facet");
    let title = format!(
        "Filter  {}: {}  selected: {}",
        facet_name,
        facet,
        app.screen.selection().len()
    );
    let focused = app.focus == Focus::Filter;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = Line::from(vec![
        Span::styled("/ ", Style::default().fg(Color::Cyan)),
        Span::raw(app.filter.buf.as_str()),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        ),
        area,
    );
    if focused && app.modal.is_none() {
        let x = area.x + 3 + app.filter.cursor as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let line = match &app.notice {
        Some(n) => {
            let style = if n.error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(Span::styled(n.text.as_str(), style))
        }
        None => Line::from(Span::styled(
            "? keys  space select  a all  s status  d delete  / filter  f facet  r reload  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}
