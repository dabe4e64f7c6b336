use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::{CHAT_APOLOGY, CHAT_GREETING};
use crate::ui::components::text_input::TextInput;
use crate::ui::core::{Action, Component};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Assistant chat shown at the bottom of both dashboards.
pub struct ChatPanel {
    messages: Vec<ChatLine>,
    input: TextInput,
    focused: bool,
    waiting: bool,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatLine {
                speaker: Speaker::Assistant,
                text: CHAT_GREETING.to_string(),
            }],
            input: TextInput::new(),
            focused: false,
            waiting: false,
        }
    }

    pub fn messages(&self) -> &[ChatLine] {
        &self.messages
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.messages.push(ChatLine { speaker, text });
    }
}

impl Component for ChatPanel {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if !self.focused {
            return Action::None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                self.focused = false;
                Action::None
            }
            KeyCode::Enter => {
                let message = self.input.value().trim().to_string();
                if message.is_empty() || self.waiting {
                    return Action::None;
                }
                self.input.clear();
                self.push(Speaker::User, message.clone());
                self.waiting = true;
                Action::SendChat(message)
            }
            _ => {
                self.input.handle_key(key);
                Action::None
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ChatReplied(reply) => {
                self.waiting = false;
                self.push(Speaker::Assistant, reply);
                Action::None
            }
            Action::ChatFailed => {
                self.waiting = false;
                self.push(Speaker::Assistant, CHAT_APOLOGY.to_string());
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let color = if self.focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" 💬 Assistant ")
            .style(Style::default().fg(color));
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let mut lines: Vec<Line> = self
            .messages
            .iter()
            .map(|line| {
                let (who, style) = match line.speaker {
                    Speaker::User => ("You: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                    Speaker::Assistant => ("AI: ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                };
                Line::from(vec![Span::styled(who, style), Span::raw(line.text.clone())])
            })
            .collect();
        if self.waiting {
            lines.push(Line::from(Span::styled("AI is typing...", Style::default().fg(Color::Gray))));
        }

        // Keep the newest messages in view
        let visible = chunks[0].height as usize;
        let skip = lines.len().saturating_sub(visible);
        let history = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>()).wrap(Wrap { trim: false });
        f.render_widget(history, chunks[0]);

        let prompt = if self.focused {
            let value = self.input.value();
            let split: usize = value.chars().take(self.input.cursor()).map(|c| c.len_utf8()).sum();
            let (before, after) = value.split_at(split.min(value.len()));
            format!("> {}█{}", before, after)
        } else {
            "> Press Tab to ask the assistant".to_string()
        };
        f.render_widget(
            Paragraph::new(prompt).style(Style::default().fg(Color::White)),
            chunks[1],
        );
    }
}
