use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_loads();
        if app.modal.is_none() {
            app.poll_session(false);
        }

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    if app.modal.is_some() {
        modal::handle_modal_key(app, key);
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    match app.focus {
        Focus::Filter => handle_filter_key(app, key),
        Focus::Rows => handle_rows_key(app, key),
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.filter.clear();
            app.apply_filter_input();
            app.focus = Focus::Rows;
        }
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => app.focus = Focus::Rows,
        KeyCode::Backspace => {
            app.filter.backspace();
            app.apply_filter_input();
        }
        KeyCode::Delete => {
            app.filter.delete();
            app.apply_filter_input();
        }
        KeyCode::Left => app.filter.move_left(),
        KeyCode::Right => app.filter.move_right(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter.clear();
            app.apply_filter_input();
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            app.filter.insert_char(c);
            app.apply_filter_input();
        }
        _ => {}
    }
}

fn handle_rows_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if !app.screen.criteria().is_empty() {
                app.filter.clear();
                app.screen.set_query("");
                app.screen.set_facet(Default::default());
                app.clamp_cursor();
            } else if !app.screen.selection().is_empty() {
                app.screen.clear_selection();
            } else {
                app.quit = true;
            }
        }
        KeyCode::Tab => app.next_entity(1),
        KeyCode::BackTab => app.next_entity(-1),
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(kind) = EntityKind::ALL.get(idx) {
                app.switch_entity(*kind);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::Home => app.cursor = 0,
        KeyCode::End => app.move_cursor(isize::MAX / 2),
        KeyCode::Char(' ') => {
            app.toggle_current();
            app.move_cursor(1);
        }
        KeyCode::Char('a') => app.screen.toggle_all(),
        KeyCode::Char('/') => app.focus = Focus::Filter,
        KeyCode::Char('f') => app.cycle_facet(),
        KeyCode::Char('w') => app.cycle_workflow(),
        KeyCode::Char('s') => app.open_transition(false),
        KeyCode::Char('S') => app.open_transition(true),
        KeyCode::Char('d') => app.request_delete(false),
        KeyCode::Char('D') => app.request_delete(true),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('?') => app.show_help(),
        KeyCode::Enter => app.show_detail(),
        _ => {}
    }
}
