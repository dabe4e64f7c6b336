use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Paragraph, Wrap},
    Frame,
};

use super::common::{
    create_instructions_paragraph, form_height, render_banner, render_empty_state, render_form, render_modal_frame,
    render_selectable_list, shortcuts,
};
use super::{form_bindings, list_bindings, step, ModalDialog};
use crate::api::models::{Flashcard, Id};
use crate::constants::{ALL_CATEGORIES, EMPTY_FLASHCARDS};
use crate::service::{Mutation, RefreshTarget};
use crate::ui::components::text_input::Form;
use crate::ui::core::{
    Action, BannerSlot, DeleteTarget, ModalBinding, ModalCommand, ModalContext, ModalKind, ModalTrigger,
};
use crate::validation::{validate_excel, validate_flashcard, ValidationError};

/// Every flashcard, filterable by category.
#[derive(Default)]
pub struct ManageFlashcardsDialog {
    flashcards: Vec<Flashcard>,
    categories: Vec<String>,
    filter: Option<String>,
    selected: usize,
    loading: bool,
    banner: BannerSlot,
}

impl ManageFlashcardsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn find(&self, id: Id) -> Option<&Flashcard> {
        self.flashcards.iter().find(|card| card.id == id)
    }

    /// What to re-fetch so the list matches the current filter.
    pub fn refresh_targets(&self) -> Vec<RefreshTarget> {
        vec![
            RefreshTarget::Flashcards {
                category: self.filter.clone(),
            },
            RefreshTarget::Categories,
        ]
    }

    /// Responses for a filter the user already moved away from are dropped.
    pub fn apply_flashcards(&mut self, category: Option<String>, flashcards: Vec<Flashcard>) {
        if category != self.filter {
            return;
        }
        self.flashcards = flashcards;
        self.loading = false;
        self.selected = self.selected.min(self.flashcards.len().saturating_sub(1));
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        if self.filter.as_ref().is_some_and(|f| !categories.contains(f)) {
            self.filter = None;
        }
        self.categories = categories;
    }

    fn cycle_filter(&mut self) -> Action {
        self.filter = match &self.filter {
            None => self.categories.first().cloned(),
            Some(current) => {
                let position = self.categories.iter().position(|c| c == current);
                position.and_then(|i| self.categories.get(i + 1)).cloned()
            }
        };
        self.selected = 0;
        self.loading = true;
        Action::Load(vec![RefreshTarget::Flashcards {
            category: self.filter.clone(),
        }])
    }

    fn selected_card(&self) -> Option<&Flashcard> {
        self.flashcards.get(self.selected)
    }
}

impl ModalDialog for ManageFlashcardsDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ManageFlashcards
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = list_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Char('n'), ModalCommand::New),
            ModalBinding::command(KeyCode::Char('e'), ModalCommand::Edit),
            ModalBinding::command(KeyCode::Char('d'), ModalCommand::Delete),
            ModalBinding::command(KeyCode::Char('v'), ModalCommand::View),
            ModalBinding::command(KeyCode::Enter, ModalCommand::View),
            ModalBinding::command(KeyCode::Char('x'), ModalCommand::Export),
            ModalBinding::command(KeyCode::Char('b'), ModalCommand::BulkUpload),
            ModalBinding::command(KeyCode::Char('f'), ModalCommand::CycleFilter),
        ]);
        bindings
    }

    fn on_open(&mut self, _context: &ModalContext, _reset_form: bool) -> Action {
        self.loading = self.flashcards.is_empty();
        Action::Load(self.refresh_targets())
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        let ModalTrigger::Command(command) = trigger else {
            return Action::None;
        };

        match command {
            ModalCommand::Up => self.selected = step(self.selected, self.flashcards.len(), false),
            ModalCommand::Down => self.selected = step(self.selected, self.flashcards.len(), true),
            ModalCommand::CycleFilter => return self.cycle_filter(),
            ModalCommand::New => {
                return Action::OpenModal {
                    kind: ModalKind::FlashcardForm,
                    context: ModalContext::None,
                }
            }
            ModalCommand::BulkUpload => {
                return Action::OpenModal {
                    kind: ModalKind::BulkUpload,
                    context: ModalContext::None,
                }
            }
            ModalCommand::Edit => {
                if let Some(card) = self.selected_card() {
                    return Action::OpenModal {
                        kind: ModalKind::FlashcardForm,
                        context: ModalContext::Flashcard { id: card.id },
                    };
                }
            }
            ModalCommand::Delete => {
                if let Some(card) = self.selected_card() {
                    return Action::OpenModal {
                        kind: ModalKind::ConfirmDelete,
                        context: ModalContext::Delete(DeleteTarget::Flashcard {
                            id: card.id,
                            term: card.term.clone(),
                        }),
                    };
                }
            }
            ModalCommand::View => {
                if !self.flashcards.is_empty() {
                    return Action::ViewFlashcards {
                        title: self.filter.clone().unwrap_or_else(|| "All Flashcards".to_string()),
                        flashcards: self.flashcards.clone(),
                        start: self.selected,
                    };
                }
            }
            ModalCommand::Export => {
                return Action::ExportFlashcards {
                    class_name: None,
                    flashcards: self.flashcards.clone(),
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
        let height = area.height.saturating_sub(2).max(14);
        let (outer, inner) = render_modal_frame(f, area, 85, height, "Manage Flashcards", Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Category: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    self.filter.as_deref().unwrap_or(ALL_CATEGORIES).to_string(),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    format!("   {} flashcards", self.flashcards.len()),
                    Style::default().fg(Color::Gray),
                ),
            ])),
            chunks[0],
        );

        if self.loading {
            render_empty_state(f, chunks[1], "Loading flashcards...");
        } else if self.flashcards.is_empty() {
            render_empty_state(f, chunks[1], EMPTY_FLASHCARDS);
        } else {
            let items = self
                .flashcards
                .iter()
                .map(|card| {
                    let mut header = vec![Span::styled(
                        card.term.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )];
                    if let Some(category) = &card.category {
                        header.push(Span::styled(format!("  [{}]", category), Style::default().fg(Color::Magenta)));
                    }
                    ListItem::new(vec![
                        Line::from(header),
                        Line::from(Span::styled(
                            format!("  {}", card.definition),
                            Style::default().fg(Color::Gray),
                        )),
                    ])
                })
                .collect();
            render_selectable_list(f, chunks[1], items, Some(self.selected));
        }

        render_banner(f, chunks[2], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[
                ("n", Color::Green, " New"),
                ("e", Color::Yellow, " Edit"),
                shortcuts::DELETE,
                ("v", Color::Cyan, " View"),
                shortcuts::FILTER,
                ("x", Color::Blue, " Export CSV"),
                ("b", Color::Blue, " Bulk upload"),
                shortcuts::ESC_CLOSE,
            ]),
            chunks[3],
        );

        outer
    }
}

/// Create or edit one flashcard.
pub struct FlashcardFormDialog {
    form: Form,
    editing: Option<Id>,
    banner: BannerSlot,
}

impl Default for FlashcardFormDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardFormDialog {
    pub fn new() -> Self {
        Self {
            form: Form::new()
                .field("term", "Term")
                .field("definition", "Definition")
                .field("category", "Category (optional)"),
            editing: None,
            banner: BannerSlot::new(),
        }
    }

    pub fn editing(&self) -> Option<Id> {
        self.editing
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Fill the form from an existing card.
    pub fn prefill(&mut self, card: &Flashcard) {
        self.editing = Some(card.id);
        self.form.set_value("term", card.term.clone());
        self.form.set_value("definition", card.definition.clone());
        self.form.set_value("category", card.category.clone().unwrap_or_default());
    }
}

impl ModalDialog for FlashcardFormDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::FlashcardForm
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        form_bindings()
    }

    fn on_open(&mut self, _context: &ModalContext, reset_form: bool) -> Action {
        if reset_form {
            self.form.reset();
            self.editing = None;
        }
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Submit => {
                self.form.clear_errors();
                let draft = match validate_flashcard(
                    self.form.value("term"),
                    self.form.value("definition"),
                    self.form.value("category"),
                ) {
                    Ok(draft) => draft,
                    Err(error) => {
                        self.show_field_error(&error);
                        return Action::None;
                    }
                };

                let mutation = match self.editing {
                    Some(id) => Mutation::UpdateFlashcard { id, draft },
                    None => Mutation::CreateFlashcard(draft),
                };
                Action::Mutate {
                    mutation,
                    refresh: Vec::new(),
                }
            }
            ModalTrigger::Command(ModalCommand::FocusNext) => {
                self.form.focus_next();
                Action::None
            }
            ModalTrigger::Command(ModalCommand::FocusPrevious) => {
                self.form.focus_previous();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_input(&mut self, key: KeyEvent) -> bool {
        self.form.handle_key(key)
    }

    fn show_field_error(&mut self, error: &ValidationError) -> bool {
        self.form.set_error(error.field, error.message.clone());
        self.form.error(error.field).is_some()
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let title = if self.editing.is_some() {
            "Edit Flashcard"
        } else {
            "New Flashcard"
        };
        let height = form_height(&self.form) + 6;
        let (outer, inner) = render_modal_frame(f, area, 60, height, title, Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(form_height(&self.form)),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        render_form(f, chunks[0], &self.form);
        render_banner(f, chunks[1], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[shortcuts::ENTER_SAVE, shortcuts::TAB_NEXT, shortcuts::CTRL_Q_CANCEL]),
            chunks[3],
        );

        outer
    }
}

/// Import flashcards from an Excel sheet on disk.
pub struct BulkUploadDialog {
    form: Form,
    uploading: bool,
    banner: BannerSlot,
}

impl Default for BulkUploadDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkUploadDialog {
    pub fn new() -> Self {
        Self {
            form: Form::new().field("file", "Excel file path (.xlsx / .xls)"),
            uploading: false,
            banner: BannerSlot::new(),
        }
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }
}

impl ModalDialog for BulkUploadDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::BulkUpload
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        form_bindings()
    }

    fn on_open(&mut self, _context: &ModalContext, reset_form: bool) -> Action {
        if reset_form {
            self.form.reset();
            self.uploading = false;
        }
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        if trigger != ModalTrigger::Submit || self.uploading {
            return Action::None;
        }

        self.form.clear_errors();
        let raw = self.form.value("file").trim().to_string();
        if let Err(error) = validate_excel(&raw, Path::new(&raw).is_file()) {
            self.show_field_error(&error);
            return Action::None;
        }

        self.uploading = true;
        Action::Mutate {
            mutation: Mutation::BulkUploadFlashcards {
                path: PathBuf::from(raw),
            },
            refresh: Vec::new(),
        }
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_input(&mut self, key: KeyEvent) -> bool {
        self.form.handle_key(key)
    }

    fn show_field_error(&mut self, error: &ValidationError) -> bool {
        self.form.set_error("file", error.message.clone());
        true
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let height = form_height(&self.form) + 9;
        let (outer, inner) = render_modal_frame(f, area, 60, height, "Bulk Upload Flashcards", Color::Blue);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(form_height(&self.form)),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new("Columns: term, definition, category (optional). One flashcard per row.")
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true }),
            chunks[0],
        );
        render_form(f, chunks[1], &self.form);

        if self.uploading && self.banner.current().is_none() {
            f.render_widget(
                Paragraph::new("Uploading...").style(Style::default().fg(Color::Yellow)),
                chunks[2],
            );
        } else {
            render_banner(f, chunks[2], self.banner.current());
        }

        f.render_widget(
            create_instructions_paragraph(&[("Enter", Color::Green, " Upload"), shortcuts::CTRL_Q_CANCEL]),
            chunks[4],
        );

        outer
    }
}
