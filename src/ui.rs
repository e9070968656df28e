use crate::{
    board::{NoticeKind, SubmitOutcome, TaskBoard},
    client::TaskApi,
    form::Field,
    status::{Clock, TaskStatus, STATUSES},
    task::field_text,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct UiState {
    pub mode: Mode,
    pub dark_mode: bool,
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    board: &mut TaskBoard,
    api: &impl TaskApi,
    clock: &impl Clock,
) -> io::Result<()> {
    let mut ui = UiState::default();
    board.refresh(api, clock.today());
    loop {
        let now = Instant::now();
        board.clear_expired_notice(now);
        terminal.draw(|f| draw(f, board, &ui, now))?;

        // poll so notices can expire without a keypress
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(&mut ui, board, api, clock, key) == Control::Quit {
                return Ok(());
            }
        }
    }
}

pub fn handle_key(
    ui: &mut UiState,
    board: &mut TaskBoard,
    api: &impl TaskApi,
    clock: &impl Clock,
    key: KeyEvent,
) -> Control {
    match ui.mode {
        Mode::Browse => match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('a') => {
                board.form.reset();
                ui.mode = Mode::Form;
            }
            KeyCode::Char('e') => {
                if board.edit_selected() {
                    ui.mode = Mode::Form;
                }
            }
            KeyCode::Char('d') => {
                board.delete_selected(api);
            }
            KeyCode::Char('r') => {
                board.refresh(api, clock.today());
            }
            KeyCode::Char('t') => ui.dark_mode = !ui.dark_mode,
            KeyCode::Left => board.move_column(-1),
            KeyCode::Right => board.move_column(1),
            KeyCode::Up => board.move_task(-1),
            KeyCode::Down => board.move_task(1),
            _ => {}
        },
        Mode::Form => match key.code {
            KeyCode::Esc => {
                board.form.reset();
                ui.mode = Mode::Browse;
            }
            KeyCode::Tab => board.form.focus = board.form.focus.next(),
            KeyCode::BackTab => board.form.focus = board.form.focus.prev(),
            KeyCode::Enter => match board.submit(api, clock.today()) {
                SubmitOutcome::Created(_) | SubmitOutcome::Updated(_) => ui.mode = Mode::Browse,
                SubmitOutcome::Blocked | SubmitOutcome::Failed => {}
            },
            KeyCode::Backspace => board.form.pop_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                board.form.push_char(c)
            }
            _ => {}
        },
    }
    Control::Continue
}

struct Theme {
    text: Color,
    muted: Color,
    title: Color,
    accent: Color,
}

impl Theme {
    fn new(dark: bool) -> Self {
        if dark {
            Self {
                text: Color::Gray,
                muted: Color::DarkGray,
                title: Color::LightBlue,
                accent: Color::LightCyan,
            }
        } else {
            Self {
                text: Color::White,
                muted: Color::Gray,
                title: Color::Blue,
                accent: Color::Cyan,
            }
        }
    }

    fn status(&self, status: TaskStatus, dark: bool) -> Color {
        match (status, dark) {
            (TaskStatus::Completed, false) => Color::Green,
            (TaskStatus::Completed, true) => Color::LightGreen,
            (TaskStatus::InProgress, false) => Color::Yellow,
            (TaskStatus::InProgress, true) => Color::LightYellow,
            (TaskStatus::Pending, false) => Color::Red,
            (TaskStatus::Pending, true) => Color::LightRed,
        }
    }
}

fn draw(f: &mut Frame, board: &TaskBoard, ui: &UiState, now: Instant) {
    let theme = Theme::new(ui.dark_mode);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(8),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Line::from(vec![
        Span::styled(
            "To-Do List",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if ui.dark_mode { "  [dark]" } else { "  [light]" },
            Style::default().fg(theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(header), rows[0]);

    draw_form(f, board, ui, &theme, rows[1]);
    draw_columns(f, board, ui, &theme, rows[2]);

    let footer = match board.notice(now) {
        Some(notice) => Span::styled(
            notice.message.as_str(),
            Style::default().fg(match notice.kind {
                NoticeKind::Info => Color::Green,
                NoticeKind::Error => Color::Red,
            }),
        ),
        None => Span::styled(
            match ui.mode {
                Mode::Browse => "a add  e edit  d delete  r refresh  t theme  q quit",
                Mode::Form => "Tab next field  Enter save  Esc cancel",
            },
            Style::default().fg(theme.muted),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(footer)), rows[3]);
}

fn draw_form(f: &mut Frame, board: &TaskBoard, ui: &UiState, theme: &Theme, area: Rect) {
    let form = &board.form;
    let active = ui.mode == Mode::Form;
    let mut lines = Vec::new();
    for (field, label) in [
        (Field::Title, "Title"),
        (Field::Description, "Description"),
        (Field::DueDate, "Due date (YYYY-MM-DD)"),
    ] {
        let focused = active && form.focus == field;
        let value_style = if focused {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme.muted)),
            Span::styled(form.value(field).to_string(), value_style),
            Span::raw(if focused { "_" } else { "" }),
        ]));
        if let Some(message) = form.error(field) {
            lines.push(Line::from(Span::styled(
                format!("  ! {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let title = if form.editing { "Update Task" } else { "Create Task" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if active {
            Style::default().fg(theme.accent)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_columns(f: &mut Frame, board: &TaskBoard, ui: &UiState, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, status) in STATUSES.iter().enumerate() {
        let selected_column = ui.mode == Mode::Browse && board.selected_status == i;
        let items: Vec<ListItem> = board
            .get_tasks_by_status(*status)
            .iter()
            .enumerate()
            .map(|(row, t)| {
                let due = match field_text(&t.due_date) {
                    due if due.is_empty() => "-".to_string(),
                    due => due,
                };
                let mut item = ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("[#{}] ", t.id)),
                        Span::styled(
                            field_text(&t.title),
                            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(" (Due: {due})")),
                    ]),
                    Line::from(Span::styled(
                        field_text(&t.description),
                        Style::default().fg(theme.text),
                    )),
                ]);
                if selected_column && board.selected_task == row {
                    item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                item
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(Span::styled(
                    status.label(),
                    Style::default().fg(theme.status(*status, ui.dark_mode)),
                ))
                .borders(Borders::ALL)
                .border_style(if selected_column {
                    Style::default().fg(theme.accent)
                } else {
                    Style::default()
                }),
        );

        f.render_widget(list, chunks[i]);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        client::ClientError,
        form::TITLE_REQUIRED,
        status::FixedClock,
        task::{Task, TaskFields},
    };

    /// Counts calls and echoes creates back with id 1.
    #[derive(Default)]
    struct EchoApi {
        calls: Cell<usize>,
    }

    impl TaskApi for EchoApi {
        fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }

        fn create_task(&self, fields: &TaskFields) -> Result<Task, ClientError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Task::from_fields(1, fields.clone()))
        }

        fn update_task(&self, id: u64, fields: &TaskFields) -> Result<Task, ClientError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Task::from_fields(id, fields.clone()))
        }

        fn delete_task(&self, _id: u64) -> Result<(), ClientError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn press(
        ui: &mut UiState,
        board: &mut TaskBoard,
        api: &EchoApi,
        code: KeyCode,
    ) -> Control {
        handle_key(ui, board, api, &clock(), KeyEvent::from(code))
    }

    fn type_text(ui: &mut UiState, board: &mut TaskBoard, api: &EchoApi, text: &str) {
        for c in text.chars() {
            press(ui, board, api, KeyCode::Char(c));
        }
    }

    #[test]
    fn q_quits_only_while_browsing() {
        let (mut ui, mut board, api) = (UiState::default(), TaskBoard::new(), EchoApi::default());
        press(&mut ui, &mut board, &api, KeyCode::Char('a'));
        assert_eq!(ui.mode, Mode::Form);
        assert_eq!(
            press(&mut ui, &mut board, &api, KeyCode::Char('q')),
            Control::Continue
        );
        assert_eq!(board.form.draft.title, "q");

        press(&mut ui, &mut board, &api, KeyCode::Esc);
        assert_eq!(
            press(&mut ui, &mut board, &api, KeyCode::Char('q')),
            Control::Quit
        );
    }

    #[test]
    fn enter_with_empty_title_stays_in_form() {
        let (mut ui, mut board, api) = (UiState::default(), TaskBoard::new(), EchoApi::default());
        press(&mut ui, &mut board, &api, KeyCode::Char('a'));
        press(&mut ui, &mut board, &api, KeyCode::Tab);
        press(&mut ui, &mut board, &api, KeyCode::Tab);
        type_text(&mut ui, &mut board, &api, "2024-06-05");
        press(&mut ui, &mut board, &api, KeyCode::Enter);

        assert_eq!(ui.mode, Mode::Form);
        assert_eq!(board.form.title_error, Some(TITLE_REQUIRED));
        assert_eq!(api.calls.get(), 0);
    }

    #[test]
    fn filling_the_form_creates_a_task() {
        let (mut ui, mut board, api) = (UiState::default(), TaskBoard::new(), EchoApi::default());
        press(&mut ui, &mut board, &api, KeyCode::Char('a'));
        type_text(&mut ui, &mut board, &api, "Plan trip");
        press(&mut ui, &mut board, &api, KeyCode::BackTab);
        type_text(&mut ui, &mut board, &api, "2024-06-01");
        press(&mut ui, &mut board, &api, KeyCode::Enter);

        assert_eq!(ui.mode, Mode::Browse);
        assert_eq!(api.calls.get(), 1);
        assert_eq!(board.tasks.len(), 1);
        assert_eq!(board.tasks[0].status_str(), Some("in-progress"));
        assert_eq!(board.selected_column(), TaskStatus::Pending);
        board.move_column(1);
        assert_eq!(board.selected().map(|t| t.id), Some(1));
    }

    #[test]
    fn t_toggles_theme() {
        let (mut ui, mut board, api) = (UiState::default(), TaskBoard::new(), EchoApi::default());
        press(&mut ui, &mut board, &api, KeyCode::Char('t'));
        assert!(ui.dark_mode);
        press(&mut ui, &mut board, &api, KeyCode::Char('t'));
        assert!(!ui.dark_mode);
    }
}
