use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc;

use crate::api::models::{Flashcard, User};
use crate::api::{LmsBackend, SessionEvent};
use crate::ui::components::{AdminDashboard, DialogComponent, LoginComponent, StudentDashboard};
use crate::ui::core::{
    actions::{Action, DialogType, Screen},
    event_handler::EventType,
    task_manager::TaskManager,
    AppContext, BannerKind, Component,
};
use crate::utils::csv::{export_file_name, flashcards_to_csv, write_export};

/// Root component: owns the screens, the background task manager and the
/// session event stream.
pub struct AppComponent {
    // Component composition
    login: LoginComponent,
    admin: AdminDashboard,
    student: StudentDashboard,
    dialog: DialogComponent,

    // Application state
    screen: Screen,
    user: Option<User>,

    // Services
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    session_events: mpsc::UnboundedReceiver<SessionEvent>,
    ctx: AppContext,

    should_quit: bool,
}

impl AppComponent {
    pub fn new(
        backend: Arc<dyn LmsBackend>,
        session_events: mpsc::UnboundedReceiver<SessionEvent>,
        ctx: AppContext,
    ) -> Self {
        let (task_manager, background_action_rx) = TaskManager::new(backend);

        Self {
            login: LoginComponent::new(),
            admin: AdminDashboard::new(&ctx),
            student: StudentDashboard::new(&ctx),
            dialog: DialogComponent::new(ctx.logger.clone()),
            screen: Screen::Login,
            user: None,
            task_manager,
            background_action_rx,
            session_events,
            ctx,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&self) -> &LoginComponent {
        &self.login
    }

    pub fn admin(&self) -> &AdminDashboard {
        &self.admin
    }

    pub fn student(&self) -> &StudentDashboard {
        &self.student
    }

    pub fn dialog(&self) -> &DialogComponent {
        &self.dialog
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    /// Check if any background operations are running
    pub fn is_busy(&self) -> bool {
        self.task_manager.is_busy()
    }

    /// Pick up a token saved by a previous run, if any.
    pub fn verify_stored_session(&mut self) {
        self.ctx.logger.log("AppComponent: verifying stored session".to_string());
        self.task_manager.spawn_verify_session();
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            log::debug!("Screen: {:?} -> {:?}", self.screen, screen);
        }
        self.screen = screen;
        self.dialog.screen = screen;
    }

    /// Whether the active screen wants every key (modal or text input focused).
    fn screen_captures_input(&self) -> bool {
        match self.screen {
            Screen::Login => true,
            Screen::Admin => self.admin.captures_input(),
            Screen::Student => self.student.captures_input(),
        }
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                self.ctx.logger.log("Global key: 'q' - quitting application".to_string());
                Action::Quit
            }
            KeyCode::Char('?') => Action::ShowDialog(DialogType::Help),
            KeyCode::Char('G') => Action::ShowDialog(DialogType::Logs),
            KeyCode::Char('L') => {
                self.ctx.logger.log("Global key: 'L' - logging out".to_string());
                Action::Logout
            }
            _ => Action::None,
        }
    }

    fn notify(&mut self, kind: BannerKind, message: String) {
        let now = Instant::now();
        match self.screen {
            Screen::Admin => self.admin.notify(kind, message, now),
            Screen::Student => self.student.notify(kind, message, now),
            Screen::Login => {}
        }
    }

    fn leave_dashboards(&mut self) {
        self.admin.leave();
        self.student.leave();
        self.user = None;
        self.set_screen(Screen::Login);
    }

    fn export_flashcards(&mut self, class_name: Option<String>, flashcards: Vec<Flashcard>) {
        if flashcards.is_empty() {
            self.notify(BannerKind::Error, "No flashcards to export".to_string());
            return;
        }

        let file_name = export_file_name(class_name.as_deref(), chrono::Local::now().date_naive());
        let content = flashcards_to_csv(&flashcards);
        match write_export(&self.ctx.downloads_dir, &file_name, &content) {
            Ok(path) => self.notify(
                BannerKind::Success,
                format!("Exported {} flashcard(s) to {}", flashcards.len(), path.display()),
            ),
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.notify(BannerKind::Error, format!("Export failed: {}", e));
            }
        }
    }

    /// Handle app-level actions that require business logic
    pub async fn handle_app_action(&mut self, action: Action) -> Action {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.task_manager.cancel_all_tasks();
                Action::None
            }
            Action::SubmitLogin { username, password } => {
                self.task_manager.spawn_login(username, password);
                Action::None
            }
            Action::LoginSucceeded(user) => {
                self.ctx
                    .logger
                    .log(format!("Session: signed in as '{}' ({})", user.username, user.display_role()));
                self.login.reset();
                self.user = Some(user.clone());
                let screen = Screen::for_user(&user);
                self.set_screen(screen);
                match screen {
                    Screen::Admin => self.admin.enter(user),
                    Screen::Student => self.student.enter(user),
                    Screen::Login => Action::None,
                }
            }
            Action::SessionEnded { expired } => {
                if self.screen != Screen::Login {
                    self.ctx.logger.log(format!("Session: ended (expired: {})", expired));
                    self.leave_dashboards();
                    self.dialog.hide();
                }
                Action::None
            }
            Action::Logout => {
                self.task_manager.spawn_logout();
                self.leave_dashboards();
                self.login.reset();
                Action::None
            }
            Action::Load(targets) => {
                if !targets.is_empty() {
                    self.task_manager.spawn_load(targets);
                }
                Action::None
            }
            Action::Mutate { mutation, refresh } => {
                self.task_manager.spawn_mutation(mutation, refresh);
                Action::None
            }
            Action::OpenDocument(slide) => {
                self.notify(BannerKind::Info, format!("Downloading \"{}\"...", slide.title));
                self.task_manager
                    .spawn_document_download(slide, self.ctx.downloads_dir.clone());
                Action::None
            }
            Action::DocumentReady { title, path } => {
                self.notify(
                    BannerKind::Success,
                    format!("\"{}\" saved to {}", title, path.display()),
                );
                Action::None
            }
            Action::DocumentFailed(message) => {
                self.notify(BannerKind::Error, message);
                Action::None
            }
            Action::ExportFlashcards { class_name, flashcards } => {
                self.export_flashcards(class_name, flashcards);
                Action::None
            }
            Action::SendChat(message) => {
                self.task_manager.spawn_chat(message);
                Action::None
            }
            Action::None => Action::None,
            other => {
                log::debug!("Unhandled action: {:?}", other);
                Action::None
            }
        }
    }

    /// Process background actions from task manager and the session
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();

        while let Ok(action) = self.background_action_rx.try_recv() {
            log::trace!("Background: Received action {:?}", action);
            actions.push(action);
        }

        while let Ok(event) = self.session_events.try_recv() {
            match event {
                SessionEvent::Expired => actions.push(Action::SessionEnded { expired: true }),
                SessionEvent::LoggedOut => actions.push(Action::SessionEnded { expired: false }),
                SessionEvent::LoggedIn => {}
            }
        }

        // Clean up finished tasks
        let completed_tasks = self.task_manager.cleanup_finished_tasks();
        if !completed_tasks.is_empty() {
            log::trace!("Background: Cleaned up {} finished tasks", completed_tasks.len());
        }

        actions
    }

    /// Run an action through the components, then the app, until nothing is left.
    pub async fn dispatch(&mut self, action: Action) {
        let mut action = action;
        while !matches!(action, Action::None) {
            let processed = self.update(action);
            action = self.handle_app_action(processed).await;
        }
    }

    /// Advance time-based state (banner expiry, scheduled modal closes).
    pub fn tick(&mut self, now: Instant) {
        self.admin.tick(now);
        self.student.tick(now);
    }

    /// Process an event through the component hierarchy
    pub async fn handle_event(&mut self, event_type: EventType) -> anyhow::Result<()> {
        let action = match event_type {
            EventType::Key(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.ctx.logger.log("Global key: Ctrl+C - quitting application".to_string());
                    Action::Quit
                } else if self.dialog.is_visible() {
                    // Dialog has priority when visible
                    self.dialog.handle_key_events(key)
                } else if self.screen_captures_input() {
                    self.handle_key_events(key)
                } else {
                    match self.handle_global_key(key) {
                        Action::None => self.handle_key_events(key),
                        action => action,
                    }
                }
            }
            EventType::Mouse(mouse) => {
                if !self.ctx.mouse_enabled || self.dialog.is_visible() {
                    Action::None
                } else {
                    match self.screen {
                        Screen::Admin => self.admin.handle_mouse_events(mouse),
                        Screen::Student => self.student.handle_mouse_events(mouse),
                        Screen::Login => Action::None,
                    }
                }
            }
            EventType::Tick => {
                self.tick(Instant::now());
                Action::None
            }
            EventType::Resize(_, _) | EventType::Other => Action::None,
        };

        self.dispatch(action).await;
        Ok(())
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match self.screen {
            Screen::Login => self.login.handle_key_events(key),
            Screen::Admin => self.admin.handle_key_events(key),
            Screen::Student => self.student.handle_key_events(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        // Process through component hierarchy
        let action = self.dialog.update(action);
        let action = self.login.update(action);
        match self.screen {
            Screen::Admin => self.admin.update(action),
            Screen::Student => self.student.update(action),
            Screen::Login => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        match self.screen {
            Screen::Login => self.login.render(f, rect),
            Screen::Admin => self.admin.render(f, rect),
            Screen::Student => self.student.render(f, rect),
        }

        // Render dialog on top if visible (includes help dialog)
        if self.dialog.is_visible() {
            self.dialog.render(f, rect);
        }
    }
}
