//! Modal dialogs shown on top of the dashboards.
//!
//! Each dialog is a plain state struct implementing [`ModalDialog`]. The
//! owning dashboard keeps them next to a [`ModalController`] and uses
//! [`open_dialog`] / [`route_key`] so every dialog gets the same lifecycle:
//! bindings registered once, Esc and backdrop dismissal, text capture first.

pub mod class_dialogs;
pub mod common;
pub mod flashcard_dialogs;
pub mod scroll_behavior;
pub mod slide_dialogs;
pub mod system_dialogs;
pub mod user_dialogs;
pub mod viewers;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::ui::core::{
    Action, BannerSlot, DismissReason, ModalBinding, ModalCommand, ModalContext, ModalController, ModalKind,
    ModalTrigger,
};
use crate::validation::ValidationError;

pub use class_dialogs::{ClassFlashcardsDialog, ConfigureClassDialog, CreateClassDialog};
pub use flashcard_dialogs::{BulkUploadDialog, FlashcardFormDialog, ManageFlashcardsDialog};
pub use slide_dialogs::ClassDocumentsDialog;
pub use system_dialogs::ConfirmDeleteDialog;
pub use user_dialogs::{AssignUserDialog, ManageUsersDialog};
pub use viewers::{DocumentViewerDialog, FlashcardViewerDialog};

pub trait ModalDialog {
    fn kind(&self) -> ModalKind;

    /// Key bindings; requested once, the first time the modal opens.
    fn bindings(&self) -> Vec<ModalBinding>;

    /// Runs on every open with the context the controller stored.
    fn on_open(&mut self, _context: &ModalContext, _reset_form: bool) -> Action {
        Action::None
    }

    fn handle_trigger(&mut self, trigger: ModalTrigger, context: &ModalContext) -> Action;

    /// Whether keys should go to a focused text input before bindings.
    fn captures_text(&self) -> bool {
        false
    }

    fn handle_input(&mut self, _key: KeyEvent) -> bool {
        false
    }

    /// Show a field-level error. Returns false when no such field exists.
    fn show_field_error(&mut self, _error: &ValidationError) -> bool {
        false
    }

    fn banner_mut(&mut self) -> &mut BannerSlot;

    /// A fetch this dialog was waiting on failed.
    fn load_failed(&mut self) {}

    /// Draw the modal and return the rectangle it occupies.
    fn render(&mut self, f: &mut Frame, area: Rect) -> Rect;
}

/// Open `dialog` through the controller and run its open hook.
pub fn open_dialog(modals: &mut ModalController, dialog: &mut dyn ModalDialog, context: ModalContext) -> Action {
    let kind = dialog.kind();
    let opened = modals.open(kind, context, || dialog.bindings());

    if opened.reset_form {
        dialog.banner_mut().clear();
    }

    let context = modals.context(kind).clone();
    dialog.on_open(&context, opened.reset_form)
}

/// Feed a key to the top modal. Returns the actions its bindings produced.
pub fn route_key(modals: &mut ModalController, dialog: &mut dyn ModalDialog, key: KeyEvent) -> Vec<Action> {
    let kind = dialog.kind();

    if key.code != KeyCode::Esc && dialog.captures_text() && dialog.handle_input(key) {
        return Vec::new();
    }

    let mut actions = Vec::new();
    for trigger in modals.dispatch_key(&key) {
        match trigger {
            ModalTrigger::Dismiss(reason) => {
                log::debug!("Modal: {:?} dismissed ({:?})", kind, reason);
                modals.close(kind);
            }
            trigger => {
                let context = modals.context(kind).clone();
                actions.push(dialog.handle_trigger(trigger, &context));
            }
        }
    }
    actions
}

/// Enter submits, Tab moves between fields, Ctrl+Q cancels.
pub fn form_bindings() -> Vec<ModalBinding> {
    vec![
        ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
        ModalBinding::command(KeyCode::Tab, ModalCommand::FocusNext),
        ModalBinding::command(KeyCode::BackTab, ModalCommand::FocusPrevious),
        ModalBinding::command(KeyCode::Down, ModalCommand::FocusNext),
        ModalBinding::command(KeyCode::Up, ModalCommand::FocusPrevious),
        ModalBinding::ctrl('q', ModalTrigger::Dismiss(DismissReason::CancelButton)),
    ]
}

/// Arrow and j/k movement plus `q` to close.
pub fn list_bindings() -> Vec<ModalBinding> {
    vec![
        ModalBinding::command(KeyCode::Up, ModalCommand::Up),
        ModalBinding::command(KeyCode::Down, ModalCommand::Down),
        ModalBinding::command(KeyCode::Char('k'), ModalCommand::Up),
        ModalBinding::command(KeyCode::Char('j'), ModalCommand::Down),
        ModalBinding::char('q', ModalTrigger::Dismiss(DismissReason::CloseButton)),
    ]
}

/// Move a list cursor by one, clamped to `len`.
pub(crate) fn step(selected: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}
