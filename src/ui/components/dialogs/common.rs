use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::text_input::{Form, FormField};
use crate::ui::core::{Banner, BannerKind};
use crate::ui::layout::LayoutManager;

/// Creates a styled main dialog block with a clickable `[x]` in the top border
pub fn create_dialog_block<'a>(title: &'a str, theme_color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", title))
        .title_top(Line::from(" [x] ").right_aligned())
        .title_style(Style::default().fg(theme_color).add_modifier(Modifier::BOLD))
        .style(Style::default().fg(theme_color))
}

/// Clear a centered area, draw the dialog frame and return (outer, inner)
pub fn render_modal_frame(
    f: &mut Frame,
    area: Rect,
    percent_x: u16,
    height_lines: u16,
    title: &str,
    theme_color: Color,
) -> (Rect, Rect) {
    let dialog_area = LayoutManager::centered_rect_lines(percent_x, height_lines.min(area.height), area);
    f.render_widget(Clear, dialog_area);

    let block = create_dialog_block(title, theme_color);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    (dialog_area, inner)
}

/// Creates an input field block with a visual cursor
pub fn create_input_paragraph<'a>(field: &'a FormField, focused: bool) -> Paragraph<'a> {
    let display = field.input.display();
    let input_display = if focused {
        let cursor_char = "█";
        let split: usize = display.chars().take(field.input.cursor()).map(|c| c.len_utf8()).sum();
        let (before, after) = display.split_at(split.min(display.len()));
        format!("{}{}{}", before, cursor_char, after)
    } else {
        display
    };

    let border_color = if field.error.is_some() {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::Gray
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", field.label))
        .title_style(Style::default().fg(Color::White))
        .style(Style::default().fg(border_color));

    Paragraph::new(input_display)
        .block(input_block)
        .style(Style::default().fg(Color::White))
}

/// Rows a form needs: three per field plus one per error line
pub fn form_height(form: &Form) -> u16 {
    form.fields()
        .iter()
        .map(|f| if f.error.is_some() { 4 } else { 3 })
        .sum()
}

/// Draw every field of a form top to bottom, errors under their field
pub fn render_form(f: &mut Frame, area: Rect, form: &Form) {
    let constraints: Vec<Constraint> = form
        .fields()
        .iter()
        .flat_map(|field| {
            let mut c = vec![Constraint::Length(3)];
            if field.error.is_some() {
                c.push(Constraint::Length(1));
            }
            c
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slot = 0;
    for (index, field) in form.fields().iter().enumerate() {
        f.render_widget(create_input_paragraph(field, index == form.focus()), chunks[slot]);
        slot += 1;

        if let Some(error) = &field.error {
            let error_line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            f.render_widget(error_line, chunks[slot]);
            slot += 1;
        }
    }
}

/// Creates a selection field block (read-only display with title)
pub fn create_selection_paragraph(value: String, field_title: &str, focused: bool) -> Paragraph<'static> {
    let color = if focused { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", field_title))
        .title_style(Style::default().fg(Color::White))
        .style(Style::default().fg(color));

    Paragraph::new(value).block(block).style(Style::default().fg(Color::White))
}

/// One-line banner; an empty line when there is nothing to show
pub fn render_banner(f: &mut Frame, area: Rect, banner: Option<&Banner>) {
    let Some(banner) = banner else {
        return;
    };

    let (prefix, color) = match banner.kind {
        BannerKind::Success => ("✓ ", Color::Green),
        BannerKind::Error => ("✗ ", Color::Red),
        BannerKind::Info => ("ℹ ", Color::Blue),
    };

    let paragraph = Paragraph::new(format!("{}{}", prefix, banner.message))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Highlighted list over `items`, keeping `selected` in view
pub fn render_selectable_list(f: &mut Frame, area: Rect, items: Vec<ListItem<'_>>, selected: Option<usize>) {
    let mut state = ListState::default();
    state.select(selected);

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut state);
}

/// Centered gray message for empty lists
pub fn render_empty_state(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Instruction shortcut definition: (key, color, description)
pub type InstructionShortcut = (&'static str, Color, &'static str);

/// Creates a paragraph with color-coded instruction shortcuts
pub fn create_instructions_paragraph<'a>(instructions: &[InstructionShortcut]) -> Paragraph<'a> {
    let mut instruction_text = Vec::new();
    for (index, (key, color, desc)) in instructions.iter().enumerate() {
        if index > 0 {
            instruction_text.push(Span::styled(" • ", Style::default().fg(Color::Gray)));
        }
        instruction_text.push(Span::styled(
            *key,
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
        instruction_text.push(Span::styled(*desc, Style::default().fg(Color::Gray)));
    }

    Paragraph::new(Line::from(instruction_text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Common instruction shortcuts used across dialogs
pub mod shortcuts {
    use super::*;

    pub const ESC_CLOSE: InstructionShortcut = ("Esc", Color::Red, " Close");
    pub const CTRL_Q_CANCEL: InstructionShortcut = ("Ctrl+Q", Color::Red, " Cancel");
    pub const ENTER_SUBMIT: InstructionShortcut = ("Enter", Color::Green, " Submit");
    pub const ENTER_SAVE: InstructionShortcut = ("Enter", Color::Green, " Save");
    pub const TAB_NEXT: InstructionShortcut = ("Tab", Color::Cyan, " Next field");
    pub const ARROWS_MOVE: InstructionShortcut = ("↑↓", Color::Cyan, " Move");
    pub const SPACE_TOGGLE: InstructionShortcut = ("Space", Color::Yellow, " Toggle");
    pub const FILTER: InstructionShortcut = ("f", Color::Magenta, " Filter");
    pub const DELETE: InstructionShortcut = ("d", Color::Red, " Delete");
}
