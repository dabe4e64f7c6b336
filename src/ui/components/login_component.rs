use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::ERROR_SESSION_EXPIRED;
use crate::ui::components::dialogs::common::{
    create_dialog_block, create_instructions_paragraph, form_height, render_form, shortcuts,
};
use crate::ui::components::text_input::Form;
use crate::ui::core::{Action, Component};
use crate::ui::layout::LayoutManager;
use crate::validation::validate_login;

/// Username/password screen shown whenever there is no session.
pub struct LoginComponent {
    form: Form,
    error: Option<String>,
    pending: bool,
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginComponent {
    pub fn new() -> Self {
        Self {
            form: Form::new()
                .field("username", "Username")
                .masked_field("password", "Password"),
            error: None,
            pending: false,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reset(&mut self) {
        self.form.reset();
        self.error = None;
        self.pending = false;
    }

    fn submit(&mut self) -> Action {
        if self.pending {
            return Action::None;
        }
        self.form.clear_errors();

        match validate_login(self.form.value("username"), self.form.value("password")) {
            Ok((username, password)) => {
                self.error = None;
                self.pending = true;
                Action::SubmitLogin { username, password }
            }
            Err(error) => {
                self.form.focus_field(error.field);
                self.error = Some(error.message);
                Action::None
            }
        }
    }
}

impl Component for LoginComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_previous();
                Action::None
            }
            _ => {
                if self.form.handle_key(key) {
                    self.error = None;
                }
                Action::None
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::LoginFailed(message) => {
                self.pending = false;
                self.error = Some(message);
                self.form.set_value("password", "");
                self.form.focus_field("password");
                Action::None
            }
            Action::SessionEnded { expired } => {
                self.pending = false;
                if expired {
                    self.error = Some(ERROR_SESSION_EXPIRED.to_string());
                }
                Action::SessionEnded { expired }
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let height = form_height(&self.form) + 8;
        let area = LayoutManager::centered_rect_lines(50, height.min(rect.height), rect);
        f.render_widget(Clear, area);

        let block = create_dialog_block("🎓 classdeck - Sign in", Color::Cyan);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(form_height(&self.form)),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new("Learning platform")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            chunks[0],
        );
        render_form(f, chunks[1], &self.form);

        let status = if self.pending {
            Some(Paragraph::new("Signing in...").style(Style::default().fg(Color::Yellow)))
        } else {
            self.error.as_ref().map(|error| {
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            })
        };
        if let Some(status) = status {
            f.render_widget(status.alignment(Alignment::Center).wrap(Wrap { trim: true }), chunks[2]);
        }

        f.render_widget(
            create_instructions_paragraph(&[
                ("Enter", Color::Green, " Sign in"),
                shortcuts::TAB_NEXT,
                ("Ctrl+C", Color::Red, " Quit"),
            ]),
            chunks[4],
        );
    }
}
