use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::console::{DeleteScope, Targets};

use super::App;

pub(super) enum Modal {
    /// Typed-phrase delete dialog; the text lives in the screen's gate.
    Delete(DeleteScope),
    Transition {
        targets: Targets,
        field: &'static str,
        options: Vec<&'static str>,
        selected: usize,
    },
    Viewer {
        title: String,
        lines: Vec<String>,
        scroll: usize,
    },
}

fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.saturating_sub(6).clamp(20, max_w);
    let h = area.height.saturating_sub(6).clamp(7, max_h);
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn modal_title(app: &App, modal: &Modal) -> String {
    match modal {
        Modal::Delete(DeleteScope::Single) => "Delete record".to_string(),
        Modal::Delete(DeleteScope::Bulk) => "Delete selected records".to_string(),
        Modal::Transition { targets, field, .. } => {
            format!(
                "Set {} on {} {}",
                field,
                targets.len(),
                app.screen.spec().title.to_lowercase()
            )
        }
        Modal::Viewer { title, .. } => title.clone(),
    }
}

pub(super) fn draw_modal(frame: &mut ratatui::Frame, app: &App, modal: &Modal) {
    let box_area = centered(frame.area(), 90, 22);
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal_title(app, modal));
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    match modal {
        Modal::Viewer { lines, scroll, .. } => {
            let lines: Vec<Line> = lines.iter().map(|s| Line::from(s.as_str())).collect();
            let scroll = (*scroll).min(lines.len().saturating_sub(1)) as u16;
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                inner,
            );
        }

        Modal::Transition {
            options, selected, ..
        } => {
            let lines: Vec<Line> = options
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let style = if i == *selected {
                        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(
                        format!(" {} ", s),
                        style.fg(super::table::status_color(s)),
                    ))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), inner);
        }

        Modal::Delete(scope) => {
            let Some(pending) = app.screen.gate(*scope).pending() else {
                return;
            };
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(inner);

            let mut lines = vec![
                Line::from(format!(
                    "This permanently deletes {} record(s).",
                    pending.ids.len()
                )),
                Line::from(vec![
                    Span::raw("Type "),
                    Span::styled(
                        pending.required_phrase.as_str(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" to confirm."),
                ]),
            ];
            if let Some(err) = &pending.error {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("error: {}", err),
                    Style::default().fg(Color::Red),
                )));
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), parts[0]);

            frame.render_widget(
                Paragraph::new(pending.input.as_str())
                    .block(Block::default().borders(Borders::ALL).title("Phrase")),
                parts[1],
            );
            let x = pending.input.chars().count() as u16;
            frame.set_cursor_position((parts[1].x + 1 + x, parts[1].y + 1));

            let hint = if app.screen.gate(*scope).can_confirm() {
                Span::styled("enter: delete   esc: cancel", Style::default().fg(Color::Red))
            } else {
                Span::styled(
                    "enter: delete (disabled)   esc: cancel",
                    Style::default().fg(Color::DarkGray),
                )
            };
            frame.render_widget(Paragraph::new(Line::from(hint)), parts[2]);
        }
    }
}

pub(super) fn handle_modal_key(app: &mut App, key: KeyEvent) {
    enum ModalAction {
        None,
        Close,
        ConfirmDelete(DeleteScope),
        CancelDelete(DeleteScope),
        Transition {
            targets: Targets,
            field: &'static str,
            status: &'static str,
        },
    }

    let action = {
        let Some(m) = app.modal.as_mut() else {
            return;
        };

        match m {
            Modal::Viewer { lines, scroll, .. } => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up => {
                    *scroll = scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down => {
                    if *scroll < lines.len().saturating_sub(1) {
                        *scroll += 1;
                    }
                    ModalAction::None
                }
                _ => ModalAction::None,
            },

            Modal::Transition {
                targets,
                field,
                options,
                selected,
            } => match key.code {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < options.len() {
                        *selected += 1;
                    }
                    ModalAction::None
                }
                KeyCode::Enter => match options.get(*selected) {
                    Some(status) => ModalAction::Transition {
                        targets: targets.clone(),
                        field: *field,
                        status: *status,
                    },
                    None => ModalAction::Close,
                },
                _ => ModalAction::None,
            },

            Modal::Delete(scope) => {
                let scope = *scope;
                let gate = app.screen.gate_mut(scope);
                match key.code {
                    KeyCode::Esc => ModalAction::CancelDelete(scope),
                    KeyCode::Enter => ModalAction::ConfirmDelete(scope),
                    KeyCode::Backspace => {
                        gate.backspace();
                        ModalAction::None
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        gate.set_input("");
                        ModalAction::None
                    }
                    KeyCode::Char(c)
                        if !key.modifiers.contains(KeyModifiers::CONTROL)
                            && !key.modifiers.contains(KeyModifiers::ALT) =>
                    {
                        gate.push_char(c);
                        ModalAction::None
                    }
                    _ => ModalAction::None,
                }
            }
        }
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::ConfirmDelete(scope) => app.confirm_delete(scope),
        ModalAction::CancelDelete(scope) => app.cancel_delete(scope),
        ModalAction::Transition {
            targets,
            field,
            status,
        } => {
            app.modal = None;
            app.apply_transition(targets, field, status);
        }
    }
}
