//! One-item-at-a-time viewers built on [`Navigator`].

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use super::common::{create_instructions_paragraph, render_banner, render_empty_state, render_modal_frame, shortcuts};
use super::ModalDialog;
use crate::api::models::{Flashcard, Id, Slide};
use crate::service::RefreshTarget;
use crate::ui::core::{
    Action, BannerSlot, DismissReason, ModalBinding, ModalCommand, ModalContext, ModalKind, ModalTrigger,
    Navigator, Position,
};

fn viewer_bindings() -> Vec<ModalBinding> {
    vec![
        ModalBinding::command(KeyCode::Left, ModalCommand::Previous),
        ModalBinding::command(KeyCode::Right, ModalCommand::Next),
        ModalBinding::command(KeyCode::Char('h'), ModalCommand::Previous),
        ModalBinding::command(KeyCode::Char('l'), ModalCommand::Next),
        ModalBinding::char('q', ModalTrigger::Dismiss(DismissReason::CloseButton)),
    ]
}

/// "◀ Previous" / "Next ▶", dimmed when that direction is a no-op.
fn nav_line(position: Option<Position>, counter: String) -> Line<'static> {
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let (prev, next) = match position {
        Some(p) => (!p.is_first(), !p.is_last()),
        None => (false, false),
    };

    Line::from(vec![
        Span::styled("◀ Previous", if prev { enabled } else { disabled }),
        Span::styled(format!("    {}    ", counter), Style::default().fg(Color::White)),
        Span::styled("Next ▶", if next { enabled } else { disabled }),
    ])
}

/// Steps through a class's documents and opens the current one.
#[derive(Default)]
pub struct DocumentViewerDialog {
    class_id: Option<Id>,
    class_name: String,
    navigator: Navigator<Slide>,
    loading: bool,
    banner: BannerSlot,
}

impl DocumentViewerDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigator(&self) -> &Navigator<Slide> {
        &self.navigator
    }

    /// Show documents the caller already has, starting at `start`.
    pub fn show(&mut self, title: String, slides: Vec<Slide>, start: usize) {
        self.class_id = None;
        self.class_name = title;
        self.navigator.load(slides);
        self.navigator.jump_to(start);
        self.loading = false;
    }

    pub fn apply_slides(&mut self, class_id: Id, class_name: String, slides: Vec<Slide>) {
        if self.class_id != Some(class_id) {
            return;
        }
        self.class_name = class_name;
        self.navigator.load(slides);
        self.loading = false;
    }
}

impl ModalDialog for DocumentViewerDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::DocumentViewer
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = viewer_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Enter, ModalCommand::View),
            ModalBinding::command(KeyCode::Char('o'), ModalCommand::View),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        let ModalContext::Class { id, name } = context else {
            return Action::None;
        };

        self.class_id = Some(*id);
        self.class_name = name.clone();
        self.navigator.clear();
        self.loading = true;

        Action::Load(vec![RefreshTarget::ViewerSlides {
            class_id: *id,
            class_name: name.clone(),
        }])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Command(ModalCommand::Next) => {
                self.navigator.next();
            }
            ModalTrigger::Command(ModalCommand::Previous) => {
                self.navigator.previous();
            }
            ModalTrigger::Command(ModalCommand::View) => {
                if let Some(slide) = self.navigator.current() {
                    return Action::OpenDocument(slide.clone());
                }
            }
            _ => {}
        }
        Action::None
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn load_failed(&mut self) {
        self.loading = false;
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let title = format!("{} - Documents", self.class_name);
        let (outer, inner) = render_modal_frame(f, area, 70, 16, &title, Color::Blue);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        if self.loading {
            render_empty_state(f, chunks[0], "Loading documents...");
        } else {
            let detail = self.navigator.render(|slide, position| {
                let kind = if slide.is_pdf() { "PDF document" } else { "Document" };
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        slide.title.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("{} • {}", kind, slide.filename),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(Span::styled(
                        format!("Document {} of {}", position.index + 1, position.total),
                        Style::default().fg(Color::Gray),
                    )),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
            });

            match detail {
                Some(paragraph) => f.render_widget(paragraph, chunks[0]),
                None => render_empty_state(f, chunks[0], "No documents available for this class yet"),
            }
        }

        f.render_widget(
            Paragraph::new(nav_line(self.navigator.position(), self.navigator.counter())).alignment(Alignment::Center),
            chunks[1],
        );
        render_banner(f, chunks[2], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[
                ("←→", Color::Cyan, " Navigate"),
                ("Enter", Color::Green, " Open"),
                shortcuts::ESC_CLOSE,
            ]),
            chunks[3],
        );

        outer
    }
}

/// Study flashcards one at a time; flipping shows the definition.
#[derive(Default)]
pub struct FlashcardViewerDialog {
    class_id: Option<Id>,
    title: String,
    navigator: Navigator<Flashcard>,
    flipped: bool,
    loading: bool,
    banner: BannerSlot,
}

impl FlashcardViewerDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigator(&self) -> &Navigator<Flashcard> {
        &self.navigator
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Show a list the caller already has, starting at `start`.
    pub fn show(&mut self, title: String, flashcards: Vec<Flashcard>, start: usize) {
        self.class_id = None;
        self.title = title;
        self.navigator.load(flashcards);
        self.navigator.jump_to(start);
        self.flipped = false;
        self.loading = false;
    }

    pub fn apply_flashcards(&mut self, class_id: Id, class_name: String, flashcards: Vec<Flashcard>) {
        if self.class_id != Some(class_id) {
            return;
        }
        self.title = class_name;
        self.navigator.load(flashcards);
        self.flipped = false;
        self.loading = false;
    }

    fn moved(&mut self, moved: bool) {
        if moved {
            self.flipped = false;
        }
    }
}

impl ModalDialog for FlashcardViewerDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::FlashcardViewer
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = viewer_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Char(' '), ModalCommand::Flip),
            ModalBinding::command(KeyCode::Enter, ModalCommand::Flip),
            ModalBinding::command(KeyCode::Char('x'), ModalCommand::Export),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        self.flipped = false;

        let ModalContext::Class { id, name } = context else {
            return Action::None;
        };

        self.class_id = Some(*id);
        self.title = name.clone();
        self.navigator.clear();
        self.loading = true;

        Action::Load(vec![RefreshTarget::ViewerFlashcards {
            class_id: *id,
            class_name: name.clone(),
        }])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Command(ModalCommand::Next) => {
                let moved = self.navigator.next();
                self.moved(moved);
            }
            ModalTrigger::Command(ModalCommand::Previous) => {
                let moved = self.navigator.previous();
                self.moved(moved);
            }
            ModalTrigger::Command(ModalCommand::Flip) => {
                if !self.navigator.is_empty() {
                    self.flipped = !self.flipped;
                }
            }
            ModalTrigger::Command(ModalCommand::Export) => {
                return Action::ExportFlashcards {
                    class_name: self.class_id.map(|_| self.title.clone()),
                    flashcards: self.navigator.items().to_vec(),
                };
            }
            _ => {}
        }
        Action::None
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn load_failed(&mut self) {
        self.loading = false;
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let title = format!("{} - Flashcards", self.title);
        let (outer, inner) = render_modal_frame(f, area, 70, 18, &title, Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        if self.loading {
            render_empty_state(f, chunks[0], "Loading flashcards...");
        } else {
            let flipped = self.flipped;
            let card = self.navigator.render(|card, _position| {
                let (label, text, color) = if flipped {
                    ("Definition", card.definition.clone(), Color::Green)
                } else {
                    ("Term", card.term.clone(), Color::Yellow)
                };
                let mut lines = vec![
                    Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
                    Line::from(""),
                    Line::from(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))),
                ];
                if let Some(category) = &card.category {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("[{}]", category),
                        Style::default().fg(Color::Magenta),
                    )));
                }

                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Double)
                            .style(Style::default().fg(color)),
                    )
            });

            match card {
                Some(paragraph) => f.render_widget(paragraph, chunks[0]),
                None => render_empty_state(f, chunks[0], "No flashcards available for this class yet"),
            }
        }

        f.render_widget(
            Paragraph::new(nav_line(self.navigator.position(), self.navigator.counter())).alignment(Alignment::Center),
            chunks[1],
        );
        render_banner(f, chunks[2], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[
                ("←→", Color::Cyan, " Navigate"),
                ("Space", Color::Yellow, " Flip"),
                ("x", Color::Blue, " Download CSV"),
                shortcuts::ESC_CLOSE,
            ]),
            chunks[3],
        );

        outer
    }
}
