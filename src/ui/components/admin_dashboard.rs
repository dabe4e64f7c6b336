//! Admin dashboard: overview, class list and every management modal.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, ListItem, Paragraph},
    Frame,
};

use crate::api::models::User;
use crate::api::ApiError;
use crate::constants::{EMPTY_CLASSES_ADMIN, INFO_RESOURCE_UPLOAD, MODAL_CLOSE_DELAY_MS};
use crate::service::{AdminOverview, Mutation, MutationKind, RefreshTarget, Refreshed};
use crate::ui::components::chat_panel::ChatPanel;
use crate::ui::components::dialogs::{
    self,
    common::{render_empty_state, render_selectable_list, shortcuts, InstructionShortcut},
    AssignUserDialog, BulkUploadDialog, ClassDocumentsDialog, ClassFlashcardsDialog, ConfigureClassDialog,
    ConfirmDeleteDialog, CreateClassDialog, DocumentViewerDialog, FlashcardFormDialog, FlashcardViewerDialog,
    ManageFlashcardsDialog, ManageUsersDialog, ModalDialog,
};
use crate::ui::components::status_bar::StatusBar;
use crate::ui::core::{
    Action, AppContext, BannerKind, BannerSlot, Component, ModalContext, ModalController, ModalKind, ModalTrigger,
};
use crate::ui::layout::LayoutManager;

/// The modal that reports a mutation's outcome.
pub fn owning_modal(kind: MutationKind) -> ModalKind {
    match kind {
        MutationKind::CreateClass => ModalKind::CreateClass,
        MutationKind::CreateUser | MutationKind::DeleteUser => ModalKind::ManageUsers,
        MutationKind::SetUserAssignments => ModalKind::AssignUser,
        MutationKind::CreateFlashcard | MutationKind::UpdateFlashcard => ModalKind::FlashcardForm,
        MutationKind::DeleteFlashcard => ModalKind::ManageFlashcards,
        MutationKind::BulkUploadFlashcards => ModalKind::BulkUpload,
        MutationKind::SaveFlashcardAssignments => ModalKind::ClassFlashcards,
        MutationKind::UploadSlides | MutationKind::DeleteSlide => ModalKind::ClassDocuments,
    }
}

/// Feature modals owned by the admin dashboard.
pub struct AdminDialogs {
    pub create_class: CreateClassDialog,
    pub configure_class: ConfigureClassDialog,
    pub class_flashcards: ClassFlashcardsDialog,
    pub class_documents: ClassDocumentsDialog,
    pub manage_users: ManageUsersDialog,
    pub assign_user: AssignUserDialog,
    pub manage_flashcards: ManageFlashcardsDialog,
    pub flashcard_form: FlashcardFormDialog,
    pub bulk_upload: BulkUploadDialog,
    pub confirm_delete: ConfirmDeleteDialog,
    pub flashcard_viewer: FlashcardViewerDialog,
    pub document_viewer: DocumentViewerDialog,
}

impl Default for AdminDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminDialogs {
    pub fn new() -> Self {
        Self {
            create_class: CreateClassDialog::new(),
            configure_class: ConfigureClassDialog::new(),
            class_flashcards: ClassFlashcardsDialog::new(),
            class_documents: ClassDocumentsDialog::new(),
            manage_users: ManageUsersDialog::new(),
            assign_user: AssignUserDialog::new(),
            manage_flashcards: ManageFlashcardsDialog::new(),
            flashcard_form: FlashcardFormDialog::new(),
            bulk_upload: BulkUploadDialog::new(),
            confirm_delete: ConfirmDeleteDialog::new(),
            flashcard_viewer: FlashcardViewerDialog::new(),
            document_viewer: DocumentViewerDialog::new(),
        }
    }

    pub fn get_mut(&mut self, kind: ModalKind) -> Option<&mut dyn ModalDialog> {
        let dialog: &mut dyn ModalDialog = match kind {
            ModalKind::CreateClass => &mut self.create_class,
            ModalKind::ConfigureClass => &mut self.configure_class,
            ModalKind::ClassFlashcards => &mut self.class_flashcards,
            ModalKind::ClassDocuments => &mut self.class_documents,
            ModalKind::ManageUsers => &mut self.manage_users,
            ModalKind::AssignUser => &mut self.assign_user,
            ModalKind::ManageFlashcards => &mut self.manage_flashcards,
            ModalKind::FlashcardForm => &mut self.flashcard_form,
            ModalKind::BulkUpload => &mut self.bulk_upload,
            ModalKind::ConfirmDelete => &mut self.confirm_delete,
            ModalKind::FlashcardViewer => &mut self.flashcard_viewer,
            ModalKind::DocumentViewer => &mut self.document_viewer,
        };
        Some(dialog)
    }

    fn tick(&mut self, now: Instant) {
        self.create_class.banner_mut().tick(now);
        self.configure_class.banner_mut().tick(now);
        self.class_flashcards.banner_mut().tick(now);
        self.class_documents.banner_mut().tick(now);
        self.manage_users.banner_mut().tick(now);
        self.assign_user.banner_mut().tick(now);
        self.manage_flashcards.banner_mut().tick(now);
        self.flashcard_form.banner_mut().tick(now);
        self.bulk_upload.banner_mut().tick(now);
        self.confirm_delete.banner_mut().tick(now);
        self.flashcard_viewer.banner_mut().tick(now);
        self.document_viewer.banner_mut().tick(now);
    }
}

pub struct AdminDashboard {
    user: Option<User>,
    overview: AdminOverview,
    loading: bool,
    selected: usize,
    pub modals: ModalController,
    pub dialogs: AdminDialogs,
    pub chat: ChatPanel,
    banner: BannerSlot,
    banner_ttl: Duration,
    upload_banner_ttl: Duration,
}

impl AdminDashboard {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            user: None,
            overview: AdminOverview::default(),
            loading: false,
            selected: 0,
            modals: ModalController::new(),
            dialogs: AdminDialogs::new(),
            chat: ChatPanel::new(),
            banner: BannerSlot::new(),
            banner_ttl: ctx.banner_ttl,
            upload_banner_ttl: ctx.upload_banner_ttl,
        }
    }

    /// Start a fresh session for `user` and request the overview.
    pub fn enter(&mut self, user: User) -> Action {
        self.user = Some(user);
        self.overview = AdminOverview::default();
        self.selected = 0;
        self.loading = true;
        self.modals.close_all();
        self.dialogs = AdminDialogs::new();
        self.chat.reset();
        self.banner.clear();
        Action::Load(vec![RefreshTarget::AdminOverview])
    }

    pub fn leave(&mut self) {
        self.user = None;
        self.modals.close_all();
    }

    pub fn overview(&self) -> &AdminOverview {
        &self.overview
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    /// Whether keys should bypass the app's global shortcuts.
    pub fn captures_input(&self) -> bool {
        self.modals.any_open() || self.chat.is_focused()
    }

    pub fn tick(&mut self, now: Instant) {
        self.banner.tick(now);
        self.dialogs.tick(now);
        for kind in self.modals.tick(now) {
            log::debug!("Modal: {:?} closed after success", kind);
        }
    }

    /// Show a message on the top modal, or the dashboard when none is open.
    pub fn notify(&mut self, kind: BannerKind, message: impl Into<String>, now: Instant) {
        let top = self.modals.top();
        let ttl = self.banner_ttl;
        self.show_banner(top, kind, message.into(), now, ttl);
    }

    fn show_banner(&mut self, owner: Option<ModalKind>, kind: BannerKind, message: String, now: Instant, ttl: Duration) {
        let open = owner.filter(|k| self.modals.is_open(*k));
        let slot = match open.and_then(|k| self.dialogs.get_mut(k)) {
            Some(dialog) => dialog.banner_mut(),
            None => &mut self.banner,
        };
        slot.show(kind, message, now, ttl);
    }

    fn ttl_for(&self, kind: MutationKind) -> Duration {
        match kind {
            MutationKind::BulkUploadFlashcards | MutationKind::UploadSlides => self.upload_banner_ttl,
            _ => self.banner_ttl,
        }
    }

    /// Lists to re-fetch once `mutation` succeeded.
    pub fn refresh_for(&self, mutation: &Mutation) -> Vec<RefreshTarget> {
        match mutation {
            Mutation::CreateClass(_) => vec![RefreshTarget::AdminOverview],
            Mutation::CreateUser { .. } | Mutation::DeleteUser { .. } => {
                vec![RefreshTarget::Users, RefreshTarget::AdminOverview]
            }
            Mutation::SetUserAssignments { user_id, .. } => vec![
                RefreshTarget::UserAssignments { user_id: *user_id },
                RefreshTarget::Users,
            ],
            Mutation::CreateFlashcard(_)
            | Mutation::UpdateFlashcard { .. }
            | Mutation::DeleteFlashcard { .. }
            | Mutation::BulkUploadFlashcards { .. } => {
                let mut targets = self.dialogs.manage_flashcards.refresh_targets();
                targets.push(RefreshTarget::AdminOverview);
                targets
            }
            Mutation::SaveFlashcardAssignments { class_id, .. } => vec![
                RefreshTarget::ClassFlashcardAssignments { class_id: *class_id },
                RefreshTarget::AdminOverview,
            ],
            Mutation::UploadSlides { class_id, .. } => vec![
                RefreshTarget::ClassSlides { class_id: *class_id },
                RefreshTarget::AdminOverview,
            ],
            Mutation::DeleteSlide { .. } => {
                let mut targets = Vec::new();
                if let Some(class_id) = self.dialogs.class_documents.class_id() {
                    targets.push(RefreshTarget::ClassSlides { class_id });
                }
                targets.push(RefreshTarget::AdminOverview);
                targets
            }
        }
    }

    /// The modal waiting on `target`, if any.
    fn loading_modal(&self, target: &RefreshTarget) -> Option<ModalKind> {
        match target {
            RefreshTarget::Users | RefreshTarget::Classes => Some(ModalKind::ManageUsers),
            RefreshTarget::Flashcards { .. } => Some(ModalKind::ManageFlashcards),
            RefreshTarget::Categories if self.modals.is_open(ModalKind::ClassFlashcards) => {
                Some(ModalKind::ClassFlashcards)
            }
            RefreshTarget::Categories => Some(ModalKind::ManageFlashcards),
            RefreshTarget::ClassSlides { .. } => Some(ModalKind::ClassDocuments),
            RefreshTarget::ClassFlashcardAssignments { .. } => Some(ModalKind::ClassFlashcards),
            RefreshTarget::UserAssignments { .. } => Some(ModalKind::AssignUser),
            RefreshTarget::ViewerFlashcards { .. } => Some(ModalKind::FlashcardViewer),
            RefreshTarget::AdminOverview | RefreshTarget::StudentClasses | RefreshTarget::ViewerSlides { .. } => None,
        }
    }

    pub fn open(&mut self, kind: ModalKind, context: ModalContext) -> Action {
        match self.dialogs.get_mut(kind) {
            Some(dialog) => dialogs::open_dialog(&mut self.modals, dialog, context),
            None => Action::None,
        }
    }

    /// Handle what a modal asked for; anything for the app is returned.
    fn dispatch(&mut self, action: Action) -> Action {
        match action {
            Action::OpenModal { kind, context } => {
                if matches!(kind, ModalKind::ClassFlashcards | ModalKind::ClassDocuments) {
                    self.modals.close(ModalKind::ConfigureClass);
                }
                let follow_up = self.open(kind, context.clone());
                if let (ModalKind::FlashcardForm, ModalContext::Flashcard { id }) = (kind, &context) {
                    if let Some(card) = self.dialogs.manage_flashcards.find(*id).cloned() {
                        self.dialogs.flashcard_form.prefill(&card);
                    }
                }
                follow_up
            }
            Action::CloseModal(kind) => {
                self.modals.close(kind);
                Action::None
            }
            Action::ViewFlashcards {
                title,
                flashcards,
                start,
            } => {
                self.open(ModalKind::FlashcardViewer, ModalContext::None);
                self.dialogs.flashcard_viewer.show(title, flashcards, start);
                Action::None
            }
            Action::ViewDocuments { title, slides, start } => {
                self.open(ModalKind::DocumentViewer, ModalContext::None);
                self.dialogs.document_viewer.show(title, slides, start);
                Action::None
            }
            Action::Mutate { mutation, .. } => {
                if self.modals.top() == Some(ModalKind::ConfirmDelete) {
                    self.modals.close(ModalKind::ConfirmDelete);
                }
                let refresh = self.refresh_for(&mutation);
                Action::Mutate { mutation, refresh }
            }
            other => other,
        }
    }

    fn handle_modal_key(&mut self, kind: ModalKind, key: KeyEvent) -> Action {
        let Some(dialog) = self.dialogs.get_mut(kind) else {
            self.modals.close(kind);
            return Action::None;
        };

        // Bindings never overlap, so at most one action leaves the dashboard
        let actions = dialogs::route_key(&mut self.modals, dialog, key);
        actions
            .into_iter()
            .fold(Action::None, |outgoing, action| match self.dispatch(action) {
                Action::None => outgoing,
                next => next,
            })
    }

    fn selected_class_context(&self) -> Option<ModalContext> {
        self.overview.classes.get(self.selected).map(|class| ModalContext::Class {
            id: class.id,
            name: class.name.clone(),
        })
    }

    fn apply(&mut self, refreshed: Refreshed) {
        let dialogs = &mut self.dialogs;
        match refreshed {
            Refreshed::AdminOverview(overview) => {
                self.overview = overview;
                self.loading = false;
                self.selected = self.selected.min(self.overview.classes.len().saturating_sub(1));
            }
            Refreshed::Users(users) => dialogs.manage_users.set_users(users),
            Refreshed::Classes(classes) => dialogs.manage_users.set_classes(classes),
            Refreshed::Flashcards { category, flashcards } => {
                dialogs.manage_flashcards.apply_flashcards(category, flashcards)
            }
            Refreshed::Categories(categories) => {
                dialogs.manage_flashcards.set_categories(categories.clone());
                dialogs.class_flashcards.set_categories(categories);
            }
            Refreshed::ClassSlides { class_id, slides } => dialogs.class_documents.apply_slides(class_id, slides),
            Refreshed::ClassFlashcardAssignments {
                class_id,
                flashcards,
                assigned,
            } => dialogs.class_flashcards.apply_assignments(class_id, flashcards, assigned),
            Refreshed::UserAssignments {
                user_id,
                classes,
                assigned,
            } => dialogs.assign_user.apply_assignments(user_id, classes, assigned),
            Refreshed::ViewerFlashcards {
                class_id,
                class_name,
                flashcards,
            } => dialogs.flashcard_viewer.apply_flashcards(class_id, class_name, flashcards),
            Refreshed::StudentClasses(_) | Refreshed::ViewerSlides { .. } => {}
        }
    }

    fn render_overview(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Overview ")
            .style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let stat = |icon: &str, label: &str, value: usize| {
            Line::from(vec![
                Span::raw(format!("{} {:<11}", icon, label)),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        };

        let overview = &self.overview;
        let mut lines = vec![
            stat("📚", "Classes", overview.classes.len()),
            stat("👥", "Students", overview.student_count),
            stat("📁", "Resources", overview.resource_count),
            stat("🗂", "Flashcards", overview.total_flashcards),
            Line::from(""),
            Line::from(Span::styled(
                "Recent classes",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ];

        let width = LayoutManager::text_width(area.width, 0);
        for summary in &overview.recent {
            let name: String = summary.class.name.chars().take(width).collect();
            lines.push(Line::from(Span::styled(name, Style::default().fg(Color::White))));
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} docs • {}/{} cards",
                    summary.document_count, summary.flashcard_count, overview.total_flashcards
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }

    fn render_classes(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Classes ({}) ", self.overview.classes.len()))
            .style(Style::default().fg(if self.chat.is_focused() { Color::Gray } else { Color::Cyan }));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.overview.classes.is_empty() {
            let message = if self.loading { "Loading dashboard data..." } else { EMPTY_CLASSES_ADMIN };
            render_empty_state(f, inner, message);
            return;
        }

        let width = LayoutManager::text_width(area.width, 0);
        let items: Vec<ListItem> = self
            .overview
            .classes
            .iter()
            .map(|class| {
                let mut lines = vec![Line::from(Span::styled(
                    class.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ))];
                if let Some(description) = class.description.as_deref().filter(|d| !d.is_empty()) {
                    let description: String = description.chars().take(width).collect();
                    lines.push(Line::from(Span::styled(
                        format!("  {}", description),
                        Style::default().fg(Color::Gray),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        render_selectable_list(f, inner, items, Some(self.selected));
    }
}

const ADMIN_SHORTCUTS: &[InstructionShortcut] = &[
    shortcuts::ARROWS_MOVE,
    ("Enter", Color::Green, " Configure"),
    ("c", Color::Green, " New class"),
    ("u", Color::Cyan, " Students"),
    ("f", Color::Magenta, " Flashcards"),
    ("Tab", Color::Cyan, " Chat"),
    ("?", Color::Yellow, " Help"),
    ("q", Color::Red, " Quit"),
];

impl Component for AdminDashboard {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if let Some(kind) = self.modals.top() {
            return self.handle_modal_key(kind, key);
        }

        if self.chat.is_focused() {
            return self.chat.handle_key_events(key);
        }

        let count = self.overview.classes.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = dialogs::step(self.selected, count, false);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = dialogs::step(self.selected, count, true);
                Action::None
            }
            KeyCode::Enter => match self.selected_class_context() {
                Some(context) => self.open(ModalKind::ConfigureClass, context),
                None => Action::None,
            },
            KeyCode::Char('c') => self.open(ModalKind::CreateClass, ModalContext::None),
            KeyCode::Char('u') => self.open(ModalKind::ManageUsers, ModalContext::None),
            KeyCode::Char('f') => self.open(ModalKind::ManageFlashcards, ModalContext::None),
            KeyCode::Char('r') => {
                self.banner
                    .show(BannerKind::Info, INFO_RESOURCE_UPLOAD, Instant::now(), self.banner_ttl);
                Action::None
            }
            KeyCode::Char('R') => {
                self.loading = true;
                Action::Load(vec![RefreshTarget::AdminOverview])
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
            Action::Loaded(refreshed) => {
                self.apply(refreshed);
                Action::None
            }
            Action::LoadFailed { target, error } => {
                let owner = self.loading_modal(&target);
                match owner.and_then(|k| self.dialogs.get_mut(k)) {
                    Some(dialog) => dialog.load_failed(),
                    None => self.loading = false,
                }
                let message = format!("Failed to load {}: {}", target.describe(), error);
                let ttl = self.banner_ttl;
                self.show_banner(owner, BannerKind::Error, message, Instant::now(), ttl);
                Action::None
            }
            Action::MutationApplied { kind, message } => {
                let owner = owning_modal(kind);
                let now = Instant::now();
                match kind {
                    MutationKind::CreateUser => self.dialogs.manage_users.reset_form(),
                    MutationKind::BulkUploadFlashcards => self.dialogs.bulk_upload.set_uploading(false),
                    MutationKind::UploadSlides => self.dialogs.class_documents.upload_finished(true),
                    _ => {}
                }

                let ttl = self.ttl_for(kind);
                self.show_banner(Some(owner), BannerKind::Success, message, now, ttl);
                if owner.is_creation() {
                    self.modals
                        .schedule_close(owner, now + Duration::from_millis(MODAL_CLOSE_DELAY_MS));
                }
                Action::None
            }
            Action::MutationFailed { kind, error } => {
                let owner = owning_modal(kind);
                match kind {
                    MutationKind::BulkUploadFlashcards => self.dialogs.bulk_upload.set_uploading(false),
                    MutationKind::UploadSlides => self.dialogs.class_documents.upload_finished(false),
                    _ => {}
                }

                if let ApiError::Validation(field_error) = &error {
                    if self.modals.is_open(owner) {
                        if let Some(dialog) = self.dialogs.get_mut(owner) {
                            if dialog.show_field_error(field_error) {
                                return Action::None;
                            }
                        }
                    }
                }

                let ttl = self.ttl_for(kind);
                self.show_banner(Some(owner), BannerKind::Error, error.to_string(), Instant::now(), ttl);
                Action::None
            }
            Action::ChatReplied(_) | Action::ChatFailed => self.chat.update(action),
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let areas = LayoutManager::dashboard_layout(rect);

        StatusBar::render_header(f, areas.header, "Admin Dashboard", self.user.as_ref());
        self.render_overview(f, areas.sidebar);
        self.render_classes(f, areas.main);
        self.chat.render(f, areas.chat);
        StatusBar::render_footer(f, areas.footer, self.banner.current(), ADMIN_SHORTCUTS);

        for kind in self.modals.open_modals().to_vec() {
            if let Some(dialog) = self.dialogs.get_mut(kind) {
                let area = dialog.render(f, rect);
                self.modals.set_area(kind, area);
            }
        }
    }
}
