use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

use super::common::{create_instructions_paragraph, render_banner, render_modal_frame};
use super::scroll_behavior::ScrollState;
use super::ModalDialog;
use crate::service::Mutation;
use crate::ui::core::{
    Action, BannerSlot, DeleteTarget, DismissReason, ModalBinding, ModalContext, ModalKind, ModalTrigger, Screen,
};
use crate::ui::layout::LayoutManager;

fn render_scrollbar(f: &mut Frame, area: Rect, scroll: &mut ScrollState) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("▐")
        .style(Style::default().fg(Color::Gray))
        .thumb_style(Style::default().fg(Color::White));

    f.render_stateful_widget(scrollbar, area, &mut scroll.scrollbar);
}

/// Message box used for both info and error dialogs.
fn render_message_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    message: &str,
    scroll: &mut ScrollState,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 10, area);
    f.render_widget(Clear, dialog_area);

    let instructions = "Press any key to continue • j/k to scroll if needed";

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .style(Style::default().fg(color));

    let content_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(2),
        dialog_area.height.saturating_sub(4),
    );

    let instructions_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + dialog_area.height.saturating_sub(2),
        dialog_area.width.saturating_sub(2),
        1,
    );

    let lines: Vec<&str> = message.lines().collect();
    let total_lines = lines.len();
    let visible_height = content_area.height as usize;
    let offset = scroll.clamp(total_lines, visible_height);

    let message_text = lines
        .iter()
        .skip(offset)
        .take(visible_height)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    let message_paragraph = Paragraph::new(message_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    let instructions_paragraph = Paragraph::new(instructions)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(block, dialog_area);
    f.render_widget(message_paragraph, content_area);
    f.render_widget(instructions_paragraph, instructions_area);

    if total_lines > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

pub fn render_info_dialog(f: &mut Frame, area: Rect, message: &str, scroll: &mut ScrollState) {
    render_message_dialog(f, area, "ℹ Info", Color::Blue, message, scroll);
}

pub fn render_error_dialog(f: &mut Frame, area: Rect, message: &str, scroll: &mut ScrollState) {
    render_message_dialog(f, area, "⚠ Error", Color::Red, message, scroll);
}

/// Full-screen scrollable text with a title bar.
fn render_long_text(f: &mut Frame, area: Rect, title: &str, content: &str, scroll: &mut ScrollState) {
    let outer = LayoutManager::centered_rect(90, 90, area);
    f.render_widget(Clear, outer);

    let margin_x = 2;
    let margin_y = 1;
    let content_area = Rect::new(
        outer.x + margin_x,
        outer.y + margin_y,
        outer.width.saturating_sub(margin_x * 2),
        outer.height.saturating_sub(margin_y * 2),
    );

    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();
    let visible_height = content_area.height.saturating_sub(2) as usize;
    let offset = scroll.clamp(total_lines, visible_height);

    let text = lines
        .iter()
        .skip(offset)
        .take(visible_height)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(paragraph, content_area);

    if total_lines > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

const HELP_GENERAL: &str = r"
GENERAL
-------
?           Toggle this help
G           Show debug logs
Tab         Focus the assistant chat (Esc to leave it)
L           Log out
q / Ctrl+C  Quit

MODALS
------
Esc         Close the top modal
q           Close list modals
Ctrl+Q      Cancel forms
Click       Outside a modal closes it; [x] in its border too
Enter       Submit the focused form
Tab         Next field
";

const HELP_ADMIN: &str = r"
ADMIN DASHBOARD
---------------
j/k ↑↓      Select a class
Enter       Configure the selected class (flashcards or content)
c           Create a class
u           Manage students
f           Manage flashcards
r           Upload a resource
R           Reload dashboard data

MANAGE STUDENTS
---------------
Tab         Move between the form, the class choice and the list
←→          Pick the initial class
a / Enter   Assign the selected student to classes
d           Delete the selected student

MANAGE FLASHCARDS
-----------------
n / e / d   New, edit, delete
v           Study the list in the viewer
f           Cycle the category filter
x           Export the list as CSV
b           Bulk upload from an Excel file

CLASS FLASHCARDS / ASSIGNMENTS
------------------------------
Space       Toggle membership
Enter / s   Save changes
";

const HELP_STUDENT: &str = r"
STUDENT DASHBOARD
-----------------
j/k ↑↓      Select a class
Enter / d   Browse the class documents
f           Study the class flashcards
R           Reload your classes

VIEWERS
-------
←→ h/l      Previous / next
Enter       Open the document (saved to your downloads folder)
Space       Flip the flashcard
x           Download the flashcards as CSV
";

pub fn help_text(screen: Screen) -> String {
    let specific = match screen {
        Screen::Admin => HELP_ADMIN,
        Screen::Student => HELP_STUDENT,
        Screen::Login => "\nLOGIN\n-----\nTab         Next field\nEnter       Sign in\n",
    };
    format!("CLASSDECK - Learning Platform Terminal Client\n{}{}", specific, HELP_GENERAL)
}

pub fn render_help_dialog(f: &mut Frame, area: Rect, screen: Screen, scroll: &mut ScrollState) {
    render_long_text(
        f,
        area,
        "📖 Help - Press 'Esc', '?' or 'q' to close",
        &help_text(screen),
        scroll,
    );
}

pub fn render_logs_dialog(f: &mut Frame, area: Rect, logs: &[String], scroll: &mut ScrollState) {
    let content = if logs.is_empty() {
        "No debug logs available".to_string()
    } else {
        logs.join("\n")
    };

    let title = format!("🔍 {}", crate::constants::DIALOG_TITLE_DEBUG_LOGS);
    render_long_text(f, area, &title, &content, scroll);
}

/// Asks before deleting a user, flashcard or document.
#[derive(Default)]
pub struct ConfirmDeleteDialog {
    target: Option<DeleteTarget>,
    banner: BannerSlot,
}

impl ConfirmDeleteDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&DeleteTarget> {
        self.target.as_ref()
    }
}

impl ModalDialog for ConfirmDeleteDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ConfirmDelete
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        vec![
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
            ModalBinding::char('y', ModalTrigger::Submit),
            ModalBinding::char('n', ModalTrigger::Dismiss(DismissReason::CancelButton)),
        ]
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        self.target = match context {
            ModalContext::Delete(target) => Some(target.clone()),
            _ => None,
        };
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        if trigger != ModalTrigger::Submit {
            return Action::None;
        }
        let Some(target) = self.target.take() else {
            return Action::CloseModal(ModalKind::ConfirmDelete);
        };

        let mutation = match target {
            DeleteTarget::User { id, username } => Mutation::DeleteUser {
                user_id: id,
                username,
            },
            DeleteTarget::Flashcard { id, .. } => Mutation::DeleteFlashcard { id },
            DeleteTarget::Slide { id, title, .. } => Mutation::DeleteSlide { slide_id: id, title },
        };
        Action::Mutate {
            mutation,
            refresh: Vec::new(),
        }
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let (outer, inner) = render_modal_frame(f, area, 50, 8, "Confirm Delete", Color::Red);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let prompt = self.target.as_ref().map(DeleteTarget::prompt).unwrap_or_default();
        f.render_widget(
            Paragraph::new(prompt)
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            chunks[0],
        );
        render_banner(f, chunks[1], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[
                ("Enter/y", Color::Red, " Delete"),
                ("n/Esc", Color::Gray, " Cancel"),
            ]),
            chunks[2],
        );

        outer
    }
}
