//! Student dashboard: enrolled classes with their documents and flashcards.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::models::User;
use crate::constants::EMPTY_CLASSES_STUDENT;
use crate::service::{RefreshTarget, Refreshed, StudentClassCard};
use crate::ui::components::chat_panel::ChatPanel;
use crate::ui::components::dialogs::{
    self,
    common::{render_empty_state, render_selectable_list, shortcuts, InstructionShortcut},
    DocumentViewerDialog, FlashcardViewerDialog, ModalDialog,
};
use crate::ui::components::status_bar::StatusBar;
use crate::ui::core::{
    Action, AppContext, BannerKind, BannerSlot, Component, ModalContext, ModalController, ModalKind, ModalTrigger,
};
use crate::ui::layout::LayoutManager;

fn count_label(count: Option<usize>) -> String {
    count.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

pub struct StudentDashboard {
    user: Option<User>,
    classes: Vec<StudentClassCard>,
    loading: bool,
    selected: usize,
    pub modals: ModalController,
    pub document_viewer: DocumentViewerDialog,
    pub flashcard_viewer: FlashcardViewerDialog,
    pub chat: ChatPanel,
    banner: BannerSlot,
    banner_ttl: Duration,
}

impl StudentDashboard {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            user: None,
            classes: Vec::new(),
            loading: false,
            selected: 0,
            modals: ModalController::new(),
            document_viewer: DocumentViewerDialog::new(),
            flashcard_viewer: FlashcardViewerDialog::new(),
            chat: ChatPanel::new(),
            banner: BannerSlot::new(),
            banner_ttl: ctx.banner_ttl,
        }
    }

    pub fn enter(&mut self, user: User) -> Action {
        self.user = Some(user);
        self.classes.clear();
        self.selected = 0;
        self.loading = true;
        self.modals.close_all();
        self.document_viewer = DocumentViewerDialog::new();
        self.flashcard_viewer = FlashcardViewerDialog::new();
        self.chat.reset();
        self.banner.clear();
        Action::Load(vec![RefreshTarget::StudentClasses])
    }

    pub fn leave(&mut self) {
        self.user = None;
        self.modals.close_all();
    }

    pub fn classes(&self) -> &[StudentClassCard] {
        &self.classes
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    pub fn captures_input(&self) -> bool {
        self.modals.any_open() || self.chat.is_focused()
    }

    pub fn tick(&mut self, now: Instant) {
        self.banner.tick(now);
        self.document_viewer.banner_mut().tick(now);
        self.flashcard_viewer.banner_mut().tick(now);
        self.modals.tick(now);
    }

    pub fn notify(&mut self, kind: BannerKind, message: impl Into<String>, now: Instant) {
        let ttl = self.banner_ttl;
        let slot = match self.modals.top() {
            Some(ModalKind::DocumentViewer) => self.document_viewer.banner_mut(),
            Some(ModalKind::FlashcardViewer) => self.flashcard_viewer.banner_mut(),
            _ => &mut self.banner,
        };
        slot.show(kind, message, now, ttl);
    }

    fn dialog_mut(&mut self, kind: ModalKind) -> Option<&mut dyn ModalDialog> {
        match kind {
            ModalKind::DocumentViewer => Some(&mut self.document_viewer),
            ModalKind::FlashcardViewer => Some(&mut self.flashcard_viewer),
            _ => None,
        }
    }

    pub fn open(&mut self, kind: ModalKind) -> Action {
        let Some(class) = self.classes.get(self.selected) else {
            return Action::None;
        };
        let context = ModalContext::Class {
            id: class.class.id,
            name: class.class.name.clone(),
        };

        let dialog: &mut dyn ModalDialog = match kind {
            ModalKind::DocumentViewer => &mut self.document_viewer,
            ModalKind::FlashcardViewer => &mut self.flashcard_viewer,
            _ => return Action::None,
        };
        dialogs::open_dialog(&mut self.modals, dialog, context)
    }

    fn handle_modal_key(&mut self, kind: ModalKind, key: KeyEvent) -> Action {
        let dialog: &mut dyn ModalDialog = match kind {
            ModalKind::DocumentViewer => &mut self.document_viewer,
            ModalKind::FlashcardViewer => &mut self.flashcard_viewer,
            _ => {
                self.modals.close(kind);
                return Action::None;
            }
        };

        dialogs::route_key(&mut self.modals, dialog, key)
            .into_iter()
            .fold(Action::None, |outgoing, action| match action {
                Action::CloseModal(kind) => {
                    self.modals.close(kind);
                    outgoing
                }
                Action::None => outgoing,
                next => next,
            })
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" My Classes ")
            .style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let count = self.classes.len();
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "You are enrolled in {} class{}",
                    count,
                    if count == 1 { "" } else { "es" }
                ),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let width = LayoutManager::text_width(area.width, 2);
        for (index, card) in self.classes.iter().enumerate() {
            let name: String = card.class.name.chars().take(width).collect();
            let style = if index == self.selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(format!("• {}", name), style)));
        }

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    fn render_cards(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Classes ")
            .style(Style::default().fg(if self.chat.is_focused() { Color::Gray } else { Color::Cyan }));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.classes.is_empty() {
            let message = if self.loading { "Loading your classes..." } else { EMPTY_CLASSES_STUDENT };
            render_empty_state(f, inner, message);
            return;
        }

        let items: Vec<ListItem> = self
            .classes
            .iter()
            .map(|card| {
                let mut lines = vec![Line::from(Span::styled(
                    card.class.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ))];
                if let Some(description) = card.class.description.as_deref().filter(|d| !d.is_empty()) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", description),
                        Style::default().fg(Color::Gray),
                    )));
                }
                lines.push(Line::from(vec![
                    Span::styled("  📄 ", Style::default().fg(Color::Blue)),
                    Span::raw(format!("{} documents", count_label(card.content_count))),
                    Span::styled("   🗂 ", Style::default().fg(Color::Magenta)),
                    Span::raw(format!("{} flashcards", count_label(card.flashcard_count))),
                ]));
                ListItem::new(lines)
            })
            .collect();

        render_selectable_list(f, inner, items, Some(self.selected));
    }
}

const STUDENT_SHORTCUTS: &[InstructionShortcut] = &[
    shortcuts::ARROWS_MOVE,
    ("Enter", Color::Green, " Documents"),
    ("f", Color::Magenta, " Flashcards"),
    ("Tab", Color::Cyan, " Chat"),
    ("?", Color::Yellow, " Help"),
    ("q", Color::Red, " Quit"),
];

impl Component for StudentDashboard {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if let Some(kind) = self.modals.top() {
            return self.handle_modal_key(kind, key);
        }

        if self.chat.is_focused() {
            return self.chat.handle_key_events(key);
        }

        let count = self.classes.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = dialogs::step(self.selected, count, false);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = dialogs::step(self.selected, count, true);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char('d') => self.open(ModalKind::DocumentViewer),
            KeyCode::Char('f') => self.open(ModalKind::FlashcardViewer),
            KeyCode::Char('R') => {
                self.loading = true;
                Action::Load(vec![RefreshTarget::StudentClasses])
            }
            KeyCode::Tab => {
                self.chat.focus();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(ModalTrigger::Dismiss(reason)) = self.modals.dispatch_click(mouse.column, mouse.row) {
                if let Some(kind) = self.modals.close_top() {
                    log::debug!("Modal: {:?} dismissed ({:?})", kind, reason);
                }
            }
        }
        Action::None
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Loaded(Refreshed::StudentClasses(classes)) => {
                self.classes = classes;
                self.loading = false;
                self.selected = self.selected.min(self.classes.len().saturating_sub(1));
                Action::None
            }
            Action::Loaded(Refreshed::ViewerSlides {
                class_id,
                class_name,
                slides,
            }) => {
                self.document_viewer.apply_slides(class_id, class_name, slides);
                Action::None
            }
            Action::Loaded(Refreshed::ViewerFlashcards {
                class_id,
                class_name,
                flashcards,
            }) => {
                self.flashcard_viewer.apply_flashcards(class_id, class_name, flashcards);
                Action::None
            }
            Action::Loaded(_) => Action::None,
            Action::LoadFailed { target, error } => {
                let owner = match target {
                    RefreshTarget::ViewerSlides { .. } => Some(ModalKind::DocumentViewer),
                    RefreshTarget::ViewerFlashcards { .. } => Some(ModalKind::FlashcardViewer),
                    _ => None,
                };
                match owner.and_then(|kind| self.dialog_mut(kind)) {
                    Some(dialog) => dialog.load_failed(),
                    None => self.loading = false,
                }
                self.notify(
                    BannerKind::Error,
                    format!("Failed to load {}: {}", target.describe(), error),
                    Instant::now(),
                );
                Action::None
            }
            Action::ChatReplied(_) | Action::ChatFailed => self.chat.update(action),
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let areas = LayoutManager::dashboard_layout(rect);

        StatusBar::render_header(f, areas.header, "Student Dashboard", self.user.as_ref());
        self.render_sidebar(f, areas.sidebar);
        self.render_cards(f, areas.main);
        self.chat.render(f, areas.chat);
        StatusBar::render_footer(f, areas.footer, self.banner.current(), STUDENT_SHORTCUTS);

        for kind in self.modals.open_modals().to_vec() {
            let dialog: &mut dyn ModalDialog = match kind {
                ModalKind::DocumentViewer => &mut self.document_viewer,
                ModalKind::FlashcardViewer => &mut self.flashcard_viewer,
                _ => continue,
            };
            let area = dialog.render(f, rect);
            self.modals.set_area(kind, area);
        }
    }
}
