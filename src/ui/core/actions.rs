use std::path::PathBuf;

use crate::api::models::{Flashcard, Slide, User};
use crate::api::ApiError;
use crate::service::{Mutation, MutationKind, RefreshTarget, Refreshed};

use super::modal::{ModalContext, ModalKind};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Admin,
    Student,
}

impl Screen {
    pub fn for_user(user: &User) -> Self {
        if user.is_admin {
            Screen::Admin
        } else {
            Screen::Student
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // Session
    SubmitLogin {
        username: String,
        password: String,
    },
    LoginSucceeded(User),
    LoginFailed(String),
    SessionEnded {
        expired: bool,
    },
    Logout,

    // Data loading
    Load(Vec<RefreshTarget>),
    Loaded(Refreshed),
    LoadFailed {
        target: RefreshTarget,
        error: String,
    },

    // Mutate, then re-fetch `refresh`
    Mutate {
        mutation: Mutation,
        refresh: Vec<RefreshTarget>,
    },
    MutationApplied {
        kind: MutationKind,
        message: String,
    },
    MutationFailed {
        kind: MutationKind,
        error: ApiError,
    },

    // Documents and exports
    OpenDocument(Slide),
    DocumentReady {
        title: String,
        path: PathBuf,
    },
    DocumentFailed(String),
    ExportFlashcards {
        class_name: Option<String>,
        flashcards: Vec<Flashcard>,
    },

    // Assistant
    SendChat(String),
    ChatReplied(String),
    ChatFailed,

    // Modals
    OpenModal {
        kind: ModalKind,
        context: ModalContext,
    },
    CloseModal(ModalKind),
    ViewFlashcards {
        title: String,
        flashcards: Vec<Flashcard>,
        start: usize,
    },
    ViewDocuments {
        title: String,
        slides: Vec<Slide>,
        start: usize,
    },

    // UI operations
    ShowDialog(DialogType),
    HideDialog,

    // App control
    Quit,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogType {
    Error(String),
    Info(String),
    Help,
    Logs,
}
