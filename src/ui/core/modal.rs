//! Modal lifecycle: open/close, key bindings and dismissal.
//!
//! Each [`ModalKind`] has exactly one [`Modal`] instance for the lifetime of
//! the controller. Its bindings are produced by a setup closure the first
//! time it opens and reused on every later open, so a key never fires twice.
//! Open modals form a stack; only the top one receives input.
//!
//! Dismissal paths:
//! - `Esc` always dismisses the top modal
//! - a mouse click outside the modal's rectangle (backdrop)
//! - a click on the `[x]` glyph in the top border (close button)
//! - whatever cancel binding the modal registered

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::time::Instant;

use crate::api::models::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    CreateClass,
    ManageUsers,
    AssignUser,
    ConfigureClass,
    ClassFlashcards,
    ClassDocuments,
    ManageFlashcards,
    FlashcardForm,
    BulkUpload,
    ConfirmDelete,
    DocumentViewer,
    FlashcardViewer,
}

impl ModalKind {
    /// Creation modals start from a blank form on every open.
    pub fn is_creation(self) -> bool {
        matches!(
            self,
            ModalKind::CreateClass | ModalKind::FlashcardForm | ModalKind::BulkUpload
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    User { id: Id, username: String },
    Flashcard { id: Id, term: String },
    Slide { id: Id, title: String, class_id: Id },
}

impl DeleteTarget {
    pub fn prompt(&self) -> String {
        match self {
            DeleteTarget::User { username, .. } => format!(
                "Are you sure you want to delete user \"{}\"? This action cannot be undone.",
                username
            ),
            DeleteTarget::Flashcard { term, .. } => {
                format!("Are you sure you want to delete the flashcard \"{}\"?", term)
            }
            DeleteTarget::Slide { title, .. } => {
                format!("Are you sure you want to delete \"{}\" and its search index?", title)
            }
        }
    }
}

/// What a modal is operating on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalContext {
    #[default]
    None,
    Class {
        id: Id,
        name: String,
    },
    User {
        id: Id,
        username: String,
    },
    Flashcard {
        id: Id,
    },
    Slide {
        id: Id,
        title: String,
    },
    Delete(DeleteTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Backdrop,
    CloseButton,
    CancelButton,
}

/// Modal-specific commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCommand {
    Up,
    Down,
    Next,
    Previous,
    Toggle,
    Flip,
    FocusNext,
    FocusPrevious,
    New,
    Edit,
    Delete,
    View,
    Assign,
    Export,
    BulkUpload,
    CycleFilter,
    ChooseFlashcards,
    ChooseContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTrigger {
    Dismiss(DismissReason),
    Submit,
    Command(ModalCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub trigger: ModalTrigger,
}

impl ModalBinding {
    pub fn key(code: KeyCode, trigger: ModalTrigger) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
            trigger,
        }
    }

    pub fn ctrl(c: char, trigger: ModalTrigger) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            trigger,
        }
    }

    pub fn char(c: char, trigger: ModalTrigger) -> Self {
        Self::key(KeyCode::Char(c), trigger)
    }

    pub fn command(code: KeyCode, command: ModalCommand) -> Self {
        Self::key(code, ModalTrigger::Command(command))
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        // Shift is already folded into the character
        let relevant = key.modifiers & !KeyModifiers::SHIFT;
        relevant == self.modifiers
    }
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub kind: ModalKind,
    open: bool,
    bindings_attached: bool,
    setup_count: usize,
    bindings: Vec<ModalBinding>,
    context: ModalContext,
    area: Option<Rect>,
    close_at: Option<Instant>,
}

impl Modal {
    fn new(kind: ModalKind) -> Self {
        Self {
            kind,
            open: false,
            bindings_attached: false,
            setup_count: 0,
            bindings: Vec::new(),
            context: ModalContext::None,
            area: None,
            close_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn bindings(&self) -> &[ModalBinding] {
        &self.bindings
    }

    pub fn context(&self) -> &ModalContext {
        &self.context
    }
}

/// Result of [`ModalController::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opened {
    /// The setup closure ran on this call.
    pub attached_bindings: bool,
    /// The caller should reset the modal's form and banner.
    pub reset_form: bool,
}

#[derive(Debug, Default)]
pub struct ModalController {
    modals: HashMap<ModalKind, Modal>,
    stack: Vec<ModalKind>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a modal with a fresh context.
    ///
    /// `setup` only runs the first time this kind is opened.
    pub fn open<F>(&mut self, kind: ModalKind, context: ModalContext, setup: F) -> Opened
    where
        F: FnOnce() -> Vec<ModalBinding>,
    {
        let modal = self.modals.entry(kind).or_insert_with(|| Modal::new(kind));

        let attached_bindings = if modal.bindings_attached {
            false
        } else {
            modal.bindings = setup();
            modal.bindings_attached = true;
            modal.setup_count += 1;
            true
        };

        modal.open = true;
        modal.context = context;
        modal.close_at = None;

        self.stack.retain(|k| *k != kind);
        self.stack.push(kind);

        log::debug!("Modal: opened {:?}", kind);

        Opened {
            attached_bindings,
            reset_form: kind.is_creation(),
        }
    }

    /// Returns whether the modal was open.
    pub fn close(&mut self, kind: ModalKind) -> bool {
        self.stack.retain(|k| *k != kind);
        match self.modals.get_mut(&kind) {
            Some(modal) if modal.open => {
                modal.open = false;
                modal.area = None;
                modal.close_at = None;
                log::debug!("Modal: closed {:?}", kind);
                true
            }
            _ => false,
        }
    }

    pub fn close_top(&mut self) -> Option<ModalKind> {
        let kind = self.top()?;
        self.close(kind);
        Some(kind)
    }

    pub fn close_all(&mut self) {
        while self.close_top().is_some() {}
    }

    pub fn top(&self) -> Option<ModalKind> {
        self.stack.last().copied()
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.modals.get(&kind).map(|m| m.open).unwrap_or(false)
    }

    pub fn any_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Open modals, bottom first.
    pub fn open_modals(&self) -> &[ModalKind] {
        &self.stack
    }

    pub fn get(&self, kind: ModalKind) -> Option<&Modal> {
        self.modals.get(&kind)
    }

    pub fn context(&self, kind: ModalKind) -> &ModalContext {
        static NONE: ModalContext = ModalContext::None;
        self.modals.get(&kind).map(|m| &m.context).unwrap_or(&NONE)
    }

    pub fn set_context(&mut self, kind: ModalKind, context: ModalContext) {
        if let Some(modal) = self.modals.get_mut(&kind) {
            modal.context = context;
        }
    }

    pub fn bindings_attached(&self, kind: ModalKind) -> bool {
        self.modals.get(&kind).map(|m| m.bindings_attached).unwrap_or(false)
    }

    pub fn setup_count(&self, kind: ModalKind) -> usize {
        self.modals.get(&kind).map(|m| m.setup_count).unwrap_or(0)
    }

    /// Triggers the top modal binds to `key`.
    pub fn dispatch_key(&self, key: &KeyEvent) -> Vec<ModalTrigger> {
        let Some(modal) = self.top().and_then(|k| self.modals.get(&k)) else {
            return Vec::new();
        };

        if key.code == KeyCode::Esc {
            return vec![ModalTrigger::Dismiss(DismissReason::Escape)];
        }

        modal
            .bindings
            .iter()
            .filter(|b| b.matches(key))
            .map(|b| b.trigger)
            .collect()
    }

    /// Record where a modal was last drawn, for mouse hit testing.
    pub fn set_area(&mut self, kind: ModalKind, area: Rect) {
        if let Some(modal) = self.modals.get_mut(&kind) {
            modal.area = Some(area);
        }
    }

    pub fn area(&self, kind: ModalKind) -> Option<Rect> {
        self.modals.get(&kind).and_then(|m| m.area)
    }

    /// Interpret a left click against the top modal.
    pub fn dispatch_click(&self, column: u16, row: u16) -> Option<ModalTrigger> {
        let area = self.top().and_then(|k| self.area(k))?;

        let inside = column >= area.x && column < area.right() && row >= area.y && row < area.bottom();
        if !inside {
            return Some(ModalTrigger::Dismiss(DismissReason::Backdrop));
        }

        let close = close_button_area(area);
        if row == close.y && column >= close.x && column < close.right() {
            return Some(ModalTrigger::Dismiss(DismissReason::CloseButton));
        }

        None
    }

    /// Close `kind` automatically at `at`.
    pub fn schedule_close(&mut self, kind: ModalKind, at: Instant) {
        if let Some(modal) = self.modals.get_mut(&kind) {
            if modal.open {
                modal.close_at = Some(at);
            }
        }
    }

    /// Close modals whose scheduled time has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<ModalKind> {
        let due: Vec<ModalKind> = self
            .modals
            .values()
            .filter(|m| m.open && m.close_at.is_some_and(|at| now >= at))
            .map(|m| m.kind)
            .collect();

        for kind in &due {
            self.close(*kind);
        }
        due
    }
}

/// The `[x]` glyph drawn at the right end of a modal's top border.
pub fn close_button_area(area: Rect) -> Rect {
    let width = 5;
    let x = area.right().saturating_sub(width + 1).max(area.x);
    Rect::new(x, area.y, width.min(area.width), 1)
}
