//! Header and status bar shared by both dashboards

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::dialogs::common::{create_instructions_paragraph, render_banner, InstructionShortcut};
use crate::api::models::User;
use crate::ui::core::Banner;

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// App name and screen title on the left, the signed-in user on the right.
    pub fn render_header(f: &mut Frame, area: Rect, title: &str, user: Option<&User>) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let left = Line::from(vec![
            Span::styled(
                "🎓 classdeck",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", title), Style::default().fg(Color::White)),
        ]);
        f.render_widget(Paragraph::new(left), inner);

        if let Some(user) = user {
            let right = Line::from(vec![
                Span::styled(
                    user.username.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" ({})", user.display_role()), Style::default().fg(Color::Gray)),
            ]);
            f.render_widget(Paragraph::new(right).alignment(Alignment::Right), inner);
        }
    }

    /// A banner when one is showing, otherwise the screen's shortcuts.
    pub fn render_footer(f: &mut Frame, area: Rect, banner: Option<&Banner>, shortcuts: &[InstructionShortcut]) {
        if banner.is_some() {
            render_banner(f, area, banner);
        } else {
            f.render_widget(create_instructions_paragraph(shortcuts), area);
        }
    }
}
