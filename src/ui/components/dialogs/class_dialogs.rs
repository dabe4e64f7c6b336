use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Paragraph},
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
    Action, AssignmentDraft, BannerSlot, ModalBinding, ModalCommand, ModalContext, ModalKind, ModalTrigger,
};
use crate::validation::{validate_class_name, ValidationError};

/// Name + description form for a new class.
pub struct CreateClassDialog {
    form: Form,
    banner: BannerSlot,
}

impl Default for CreateClassDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateClassDialog {
    pub fn new() -> Self {
        Self {
            form: Form::new()
                .field("name", "Class name")
                .field("description", "Description (optional)"),
            banner: BannerSlot::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }
}

impl ModalDialog for CreateClassDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::CreateClass
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        form_bindings()
    }

    fn on_open(&mut self, _context: &ModalContext, reset_form: bool) -> Action {
        if reset_form {
            self.form.reset();
        }
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Submit => {
                self.form.clear_errors();
                match validate_class_name(self.form.value("name"), self.form.value("description")) {
                    Ok(class) => Action::Mutate {
                        mutation: Mutation::CreateClass(class),
                        refresh: Vec::new(),
                    },
                    Err(error) => {
                        self.show_field_error(&error);
                        Action::None
                    }
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
        let height = form_height(&self.form) + 6;
        let (outer, inner) = render_modal_frame(f, area, 60, height, "Create New Class", Color::Cyan);

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
            create_instructions_paragraph(&[shortcuts::ENTER_SUBMIT, shortcuts::TAB_NEXT, shortcuts::CTRL_Q_CANCEL]),
            chunks[3],
        );

        outer
    }
}

const CONFIGURE_CHOICES: [(&str, &str); 2] = [
    ("Flashcards", "Choose which flashcards this class studies"),
    ("Content", "Upload and manage PDF documents"),
];

/// Entry point for one class: pick flashcards or documents.
#[derive(Default)]
pub struct ConfigureClassDialog {
    class_name: String,
    selected: usize,
    banner: BannerSlot,
}

impl ConfigureClassDialog {
    pub fn new() -> Self {
        Self::default()
    }

    fn choose(&self, index: usize, context: &ModalContext) -> Action {
        let kind = if index == 0 {
            ModalKind::ClassFlashcards
        } else {
            ModalKind::ClassDocuments
        };
        Action::OpenModal {
            kind,
            context: context.clone(),
        }
    }
}

impl ModalDialog for ConfigureClassDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ConfigureClass
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = list_bindings();
        bindings.extend([
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
            ModalBinding::command(KeyCode::Char('f'), ModalCommand::ChooseFlashcards),
            ModalBinding::command(KeyCode::Char('c'), ModalCommand::ChooseContent),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        if let ModalContext::Class { name, .. } = context {
            self.class_name = name.clone();
        }
        self.selected = 0;
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Submit => self.choose(self.selected, context),
            ModalTrigger::Command(ModalCommand::ChooseFlashcards) => self.choose(0, context),
            ModalTrigger::Command(ModalCommand::ChooseContent) => self.choose(1, context),
            ModalTrigger::Command(ModalCommand::Up) => {
                self.selected = step(self.selected, CONFIGURE_CHOICES.len(), false);
                Action::None
            }
            ModalTrigger::Command(ModalCommand::Down) => {
                self.selected = step(self.selected, CONFIGURE_CHOICES.len(), true);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let title = format!("Configure {}", self.class_name);
        let (outer, inner) = render_modal_frame(f, area, 50, 10, &title, Color::Cyan);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let items = CONFIGURE_CHOICES
            .iter()
            .map(|(label, hint)| {
                ListItem::new(vec![
                    Line::from(Span::styled(*label, Style::default().add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(format!("  {}", hint), Style::default().fg(Color::Gray))),
                ])
            })
            .collect();
        render_selectable_list(f, chunks[0], items, Some(self.selected));

        f.render_widget(
            create_instructions_paragraph(&[
                ("f", Color::Yellow, " Flashcards"),
                ("c", Color::Yellow, " Content"),
                shortcuts::ESC_CLOSE,
            ]),
            chunks[1],
        );

        outer
    }
}

/// Toggle which flashcards belong to a class, saved in one go.
#[derive(Default)]
pub struct ClassFlashcardsDialog {
    class_id: Option<Id>,
    class_name: String,
    flashcards: Vec<Flashcard>,
    categories: Vec<String>,
    filter: Option<String>,
    draft: AssignmentDraft<Id>,
    selected: usize,
    loading: bool,
    banner: BannerSlot,
}

impl ClassFlashcardsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_id(&self) -> Option<Id> {
        self.class_id
    }

    pub fn draft(&self) -> &AssignmentDraft<Id> {
        &self.draft
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Cards matching the category filter, in server order.
    pub fn visible(&self) -> Vec<&Flashcard> {
        self.flashcards
            .iter()
            .filter(|card| match &self.filter {
                Some(category) => card.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .collect()
    }

    pub fn apply_assignments(&mut self, class_id: Id, flashcards: Vec<Flashcard>, assigned: Vec<Id>) {
        if self.class_id != Some(class_id) {
            return;
        }
        self.flashcards = flashcards;
        self.draft.reset(assigned);
        self.loading = false;
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    /// "N flashcard(s) assigned to this class"
    pub fn summary(&self) -> String {
        let count = self.draft.assigned_count();
        let noun = if count == 1 { "flashcard" } else { "flashcards" };
        format!("{} {} assigned to this class", count, noun)
    }

    fn cycle_filter(&mut self) {
        self.filter = match &self.filter {
            None => self.categories.first().cloned(),
            Some(current) => {
                let position = self.categories.iter().position(|c| c == current);
                position.and_then(|i| self.categories.get(i + 1)).cloned()
            }
        };
        self.selected = 0;
    }

    fn save(&mut self) -> Action {
        let Some(class_id) = self.class_id else {
            return Action::None;
        };
        Action::Mutate {
            mutation: Mutation::SaveFlashcardAssignments {
                class_id,
                class_name: self.class_name.clone(),
                add: self.draft.to_add(),
                remove: self.draft.to_remove(),
                assigned_total: self.draft.assigned_count(),
            },
            refresh: Vec::new(),
        }
    }
}

impl ModalDialog for ClassFlashcardsDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ClassFlashcards
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = list_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Char(' '), ModalCommand::Toggle),
            ModalBinding::command(KeyCode::Char('f'), ModalCommand::CycleFilter),
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
            ModalBinding::char('s', ModalTrigger::Submit),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        let ModalContext::Class { id, name } = context else {
            return Action::None;
        };

        self.class_id = Some(*id);
        self.class_name = name.clone();
        self.flashcards.clear();
        self.draft = AssignmentDraft::default();
        self.filter = None;
        self.selected = 0;
        self.loading = true;

        Action::Load(vec![
            RefreshTarget::ClassFlashcardAssignments { class_id: *id },
            RefreshTarget::Categories,
        ])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Submit => return self.save(),
            ModalTrigger::Command(ModalCommand::Up) => {
                self.selected = step(self.selected, self.visible().len(), false);
            }
            ModalTrigger::Command(ModalCommand::Down) => {
                self.selected = step(self.selected, self.visible().len(), true);
            }
            ModalTrigger::Command(ModalCommand::Toggle) => {
                if let Some(id) = self.visible().get(self.selected).map(|card| card.id) {
                    self.draft.toggle(id);
                }
            }
            ModalTrigger::Command(ModalCommand::CycleFilter) => self.cycle_filter(),
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
        let title = format!("Flashcards for {}", self.class_name);
        let height = area.height.saturating_sub(4).max(12);
        let (outer, inner) = render_modal_frame(f, area, 70, height, &title, Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let filter_label = self.filter.as_deref().unwrap_or(ALL_CATEGORIES);
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Category: ", Style::default().fg(Color::Gray)),
                Span::styled(filter_label.to_string(), Style::default().fg(Color::Magenta)),
            ])),
            chunks[0],
        );

        let visible = self.visible();
        if self.loading {
            render_empty_state(f, chunks[1], "Loading flashcards...");
        } else if visible.is_empty() {
            render_empty_state(f, chunks[1], EMPTY_FLASHCARDS);
        } else {
            let items = visible
                .iter()
                .map(|card| {
                    let mark = if self.draft.is_assigned(card.id) { "[✓] " } else { "[ ] " };
                    let category = card.category.as_deref().unwrap_or("Uncategorized");
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, Style::default().fg(Color::Green)),
                        Span::styled(card.term.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  ({})", category), Style::default().fg(Color::Gray)),
                    ]))
                })
                .collect();
            render_selectable_list(f, chunks[1], items, Some(self.selected));
        }

        f.render_widget(
            Paragraph::new(self.summary()).style(Style::default().fg(Color::Cyan)),
            chunks[2],
        );
        render_banner(f, chunks[3], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[
                shortcuts::SPACE_TOGGLE,
                shortcuts::FILTER,
                shortcuts::ENTER_SAVE,
                shortcuts::ESC_CLOSE,
            ]),
            chunks[4],
        );

        outer
    }
}
