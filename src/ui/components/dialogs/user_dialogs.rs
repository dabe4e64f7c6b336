use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, ListItem, Paragraph},
    Frame,
};

use super::common::{
    create_instructions_paragraph, create_selection_paragraph, form_height, render_banner, render_empty_state,
    render_form, render_modal_frame, render_selectable_list, shortcuts, InstructionShortcut,
};
use super::{step, ModalDialog};
use crate::api::models::{Class, Id};
use crate::constants::{EMPTY_STUDENTS, NOT_ASSIGNED_TO_CLASSES};
use crate::service::{Mutation, RefreshTarget, UserRow};
use crate::ui::components::text_input::Form;
use crate::ui::core::{
    Action, AssignmentDraft, BannerSlot, DeleteTarget, DismissReason, ModalBinding, ModalCommand, ModalContext,
    ModalKind, ModalTrigger,
};
use crate::validation::{validate_new_user, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersFocus {
    Form,
    ClassChoice,
    List,
}

/// Student list plus the "create student" form.
pub struct ManageUsersDialog {
    users: Vec<UserRow>,
    classes: Vec<Class>,
    form: Form,
    /// Index into `classes`; `None` creates the student without a class.
    class_choice: Option<usize>,
    focus: UsersFocus,
    selected: usize,
    loading: bool,
    banner: BannerSlot,
}

impl Default for ManageUsersDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ManageUsersDialog {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            classes: Vec::new(),
            form: Form::new()
                .field("username", "Username")
                .field("email", "Email")
                .masked_field("password", "Password"),
            class_choice: None,
            focus: UsersFocus::Form,
            selected: 0,
            loading: false,
            banner: BannerSlot::new(),
        }
    }

    pub fn users(&self) -> &[UserRow] {
        &self.users
    }

    pub fn focus(&self) -> UsersFocus {
        self.focus
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn set_users(&mut self, users: Vec<UserRow>) {
        self.users = users;
        self.loading = false;
        self.selected = self.selected.min(self.users.len().saturating_sub(1));
    }

    pub fn set_classes(&mut self, classes: Vec<Class>) {
        self.classes = classes;
        if self.class_choice.is_some_and(|i| i >= self.classes.len()) {
            self.class_choice = None;
        }
    }

    /// Clear the create form after a student was added.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.class_choice = None;
        self.focus = UsersFocus::Form;
    }

    fn selected_class(&self) -> Option<&Class> {
        self.class_choice.and_then(|i| self.classes.get(i))
    }

    fn selected_user(&self) -> Option<&UserRow> {
        self.users.get(self.selected)
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            UsersFocus::Form if self.form.focus() + 1 < self.form.fields().len() => {
                self.form.focus_next();
                UsersFocus::Form
            }
            UsersFocus::Form => UsersFocus::ClassChoice,
            UsersFocus::ClassChoice => UsersFocus::List,
            UsersFocus::List => {
                self.form.focus_field("username");
                UsersFocus::Form
            }
        };
    }

    fn focus_previous(&mut self) {
        self.focus = match self.focus {
            UsersFocus::Form if self.form.focus() > 0 => {
                self.form.focus_previous();
                UsersFocus::Form
            }
            UsersFocus::Form => UsersFocus::List,
            UsersFocus::ClassChoice => {
                self.form.focus_field("password");
                UsersFocus::Form
            }
            UsersFocus::List => UsersFocus::ClassChoice,
        };
    }

    fn cycle_class(&mut self, forward: bool) {
        let len = self.classes.len();
        if len == 0 {
            self.class_choice = None;
            return;
        }
        self.class_choice = match (self.class_choice, forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
    }

    fn submit_form(&mut self) -> Action {
        self.form.clear_errors();
        let user = match validate_new_user(
            self.form.value("username"),
            self.form.value("email"),
            self.form.value("password"),
        ) {
            Ok(user) => user,
            Err(error) => {
                self.show_field_error(&error);
                return Action::None;
            }
        };

        Action::Mutate {
            mutation: Mutation::CreateUser {
                user,
                class_id: self.selected_class().map(|c| c.id),
            },
            refresh: Vec::new(),
        }
    }

    fn render_users(&self, f: &mut Frame, area: Rect) {
        let border = if self.focus == UsersFocus::List {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Students ({}) ", self.users.len()))
            .style(Style::default().fg(border));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.loading {
            render_empty_state(f, inner, "Loading students...");
            return;
        }
        if self.users.is_empty() {
            render_empty_state(f, inner, EMPTY_STUDENTS);
            return;
        }

        let items = self
            .users
            .iter()
            .map(|row| {
                let classes = match &row.classes {
                    Some(classes) if classes.is_empty() => NOT_ASSIGNED_TO_CLASSES.to_string(),
                    Some(classes) => classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "),
                    None => "Classes unavailable".to_string(),
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(row.user.username.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  {}", row.user.email), Style::default().fg(Color::Gray)),
                    ]),
                    Line::from(Span::styled(format!("  {}", classes), Style::default().fg(Color::Blue))),
                ])
            })
            .collect();

        let selected = (self.focus == UsersFocus::List).then_some(self.selected);
        render_selectable_list(f, inner, items, selected);
    }
}

impl ModalDialog for ManageUsersDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::ManageUsers
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        vec![
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
            ModalBinding::command(KeyCode::Tab, ModalCommand::FocusNext),
            ModalBinding::command(KeyCode::BackTab, ModalCommand::FocusPrevious),
            ModalBinding::command(KeyCode::Up, ModalCommand::Up),
            ModalBinding::command(KeyCode::Down, ModalCommand::Down),
            ModalBinding::command(KeyCode::Left, ModalCommand::Previous),
            ModalBinding::command(KeyCode::Right, ModalCommand::Next),
            ModalBinding::command(KeyCode::Char('d'), ModalCommand::Delete),
            ModalBinding::command(KeyCode::Char('a'), ModalCommand::Assign),
            ModalBinding::char('q', ModalTrigger::Dismiss(DismissReason::CloseButton)),
        ]
    }

    fn on_open(&mut self, _context: &ModalContext, _reset_form: bool) -> Action {
        self.reset_form();
        self.loading = self.users.is_empty();
        Action::Load(vec![RefreshTarget::Users, RefreshTarget::Classes])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match (trigger, self.focus) {
            (ModalTrigger::Command(ModalCommand::FocusNext), _) => self.focus_next(),
            (ModalTrigger::Command(ModalCommand::FocusPrevious), _) => self.focus_previous(),

            (ModalTrigger::Submit, UsersFocus::Form | UsersFocus::ClassChoice) => return self.submit_form(),
            (ModalTrigger::Command(ModalCommand::Up), UsersFocus::Form) => {
                self.form.focus_previous();
            }
            (ModalTrigger::Command(ModalCommand::Down), UsersFocus::Form) => {
                self.form.focus_next();
            }
            (ModalTrigger::Command(ModalCommand::Previous), UsersFocus::ClassChoice) => self.cycle_class(false),
            (ModalTrigger::Command(ModalCommand::Next), UsersFocus::ClassChoice) => self.cycle_class(true),

            (ModalTrigger::Command(ModalCommand::Up), UsersFocus::List) => {
                self.selected = step(self.selected, self.users.len(), false);
            }
            (ModalTrigger::Command(ModalCommand::Down), UsersFocus::List) => {
                self.selected = step(self.selected, self.users.len(), true);
            }
            (ModalTrigger::Command(ModalCommand::Delete), UsersFocus::List) => {
                if let Some(row) = self.selected_user() {
                    return Action::OpenModal {
                        kind: ModalKind::ConfirmDelete,
                        context: ModalContext::Delete(DeleteTarget::User {
                            id: row.user.id,
                            username: row.user.username.clone(),
                        }),
                    };
                }
            }
            (ModalTrigger::Submit | ModalTrigger::Command(ModalCommand::Assign), UsersFocus::List) => {
                if let Some(row) = self.selected_user() {
                    return Action::OpenModal {
                        kind: ModalKind::AssignUser,
                        context: ModalContext::User {
                            id: row.user.id,
                            username: row.user.username.clone(),
                        },
                    };
                }
            }
            _ => {}
        }
        Action::None
    }

    fn captures_text(&self) -> bool {
        self.focus == UsersFocus::Form
    }

    fn handle_input(&mut self, key: KeyEvent) -> bool {
        self.form.handle_key(key)
    }

    fn show_field_error(&mut self, error: &ValidationError) -> bool {
        self.form.set_error(error.field, error.message.clone());
        let shown = self.form.error(error.field).is_some();
        if shown {
            self.focus = UsersFocus::Form;
        }
        shown
    }

    fn banner_mut(&mut self) -> &mut BannerSlot {
        &mut self.banner
    }

    fn load_failed(&mut self) {
        self.loading = false;
    }

    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect {
        let height = area.height.saturating_sub(2).max(20);
        let (outer, inner) = render_modal_frame(f, area, 90, height, "Manage Students", Color::Cyan);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        self.render_users(f, columns[0]);

        let form_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(form_height(&self.form)),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        f.render_widget(
            Paragraph::new("Create New Student").style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            form_area[0],
        );
        render_form(f, form_area[1], &self.form);

        let class_label = match self.selected_class() {
            Some(class) => format!("◀ {} ▶", class.name),
            None => "◀ No class ▶".to_string(),
        };
        f.render_widget(
            create_selection_paragraph(
                class_label,
                "Initial class",
                self.focus == UsersFocus::ClassChoice,
            ),
            form_area[2],
        );

        render_banner(f, rows[1], self.banner.current());

        let instructions: &[InstructionShortcut] = match self.focus {
            UsersFocus::List => &[
                shortcuts::ARROWS_MOVE,
                ("a", Color::Yellow, " Assign classes"),
                shortcuts::DELETE,
                shortcuts::TAB_NEXT,
                shortcuts::ESC_CLOSE,
            ],
            _ => &[shortcuts::ENTER_SUBMIT, shortcuts::TAB_NEXT, shortcuts::ESC_CLOSE],
        };
        f.render_widget(create_instructions_paragraph(instructions), rows[2]);

        outer
    }
}

/// Toggle the classes one student belongs to.
#[derive(Default)]
pub struct AssignUserDialog {
    user_id: Option<Id>,
    username: String,
    classes: Vec<Class>,
    draft: AssignmentDraft<Id>,
    selected: usize,
    loading: bool,
    banner: BannerSlot,
}

impl AssignUserDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<Id> {
        self.user_id
    }

    pub fn draft(&self) -> &AssignmentDraft<Id> {
        &self.draft
    }

    pub fn apply_assignments(&mut self, user_id: Id, classes: Vec<Class>, assigned: Vec<Id>) {
        if self.user_id != Some(user_id) {
            return;
        }
        self.classes = classes;
        self.draft.reset(assigned);
        self.loading = false;
        self.selected = self.selected.min(self.classes.len().saturating_sub(1));
    }
}

impl ModalDialog for AssignUserDialog {
    fn kind(&self) -> ModalKind {
        ModalKind::AssignUser
    }

    fn bindings(&self) -> Vec<ModalBinding> {
        let mut bindings = super::list_bindings();
        bindings.extend([
            ModalBinding::command(KeyCode::Char(' '), ModalCommand::Toggle),
            ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
        ]);
        bindings
    }

    fn on_open(&mut self, context: &ModalContext, _reset_form: bool) -> Action {
        let ModalContext::User { id, username } = context else {
            return Action::None;
        };

        self.user_id = Some(*id);
        self.username = username.clone();
        self.classes.clear();
        self.draft = AssignmentDraft::default();
        self.selected = 0;
        self.loading = true;

        Action::Load(vec![RefreshTarget::UserAssignments { user_id: *id }])
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, _context: &ModalContext) -> Action {
        match trigger {
            ModalTrigger::Submit => {
                let Some(user_id) = self.user_id else {
                    return Action::None;
                };
                if !self.draft.is_dirty() {
                    return Action::CloseModal(ModalKind::AssignUser);
                }
                return Action::Mutate {
                    mutation: Mutation::SetUserAssignments {
                        user_id,
                        username: self.username.clone(),
                        add: self.draft.to_add(),
                        remove: self.draft.to_remove(),
                    },
                    refresh: Vec::new(),
                };
            }
            ModalTrigger::Command(ModalCommand::Up) => {
                self.selected = step(self.selected, self.classes.len(), false);
            }
            ModalTrigger::Command(ModalCommand::Down) => {
                self.selected = step(self.selected, self.classes.len(), true);
            }
            ModalTrigger::Command(ModalCommand::Toggle) => {
                if let Some(class) = self.classes.get(self.selected) {
                    self.draft.toggle(class.id);
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
        let title = format!("Assign {} to Classes", self.username);
        let height = (self.classes.len() as u16 + 7).clamp(10, area.height.max(10));
        let (outer, inner) = render_modal_frame(f, area, 60, height, &title, Color::Yellow);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        if self.loading {
            render_empty_state(f, chunks[0], "Loading classes...");
        } else if self.classes.is_empty() {
            render_empty_state(f, chunks[0], "No classes available");
        } else {
            let items = self
                .classes
                .iter()
                .map(|class| {
                    let mark = if self.draft.is_assigned(class.id) { "[✓] " } else { "[ ] " };
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, Style::default().fg(Color::Green)),
                        Span::raw(class.name.clone()),
                    ]))
                })
                .collect();
            render_selectable_list(f, chunks[0], items, Some(self.selected));
        }

        render_banner(f, chunks[1], self.banner.current());
        f.render_widget(
            create_instructions_paragraph(&[shortcuts::SPACE_TOGGLE, shortcuts::ENTER_SAVE, shortcuts::ESC_CLOSE]),
            chunks[2],
        );

        outer
    }
}
