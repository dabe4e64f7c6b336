//! Dashboard data loading and mutations.
//!
//! The UI never calls the backend directly. It names what it wants to see
//! through a [`RefreshTarget`] and gets a [`Refreshed`] back, and it changes
//! server state through a [`Mutation`]. A successful mutation is always
//! followed by re-fetching the targets the caller listed; nothing is patched
//! locally.

use std::path::PathBuf;

use crate::api::models::{Class, Flashcard, FlashcardDraft, Id, NewClass, NewUser, Slide, User, UserClass};

pub mod loaders;
pub mod mutations;

pub use loaders::load;
pub use mutations::{apply, download_document};

/// A list that can be (re)fetched from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTarget {
    AdminOverview,
    Users,
    Classes,
    Flashcards { category: Option<String> },
    Categories,
    ClassSlides { class_id: Id },
    ClassFlashcardAssignments { class_id: Id },
    UserAssignments { user_id: Id },
    StudentClasses,
    ViewerSlides { class_id: Id, class_name: String },
    ViewerFlashcards { class_id: Id, class_name: String },
}

impl RefreshTarget {
    pub fn describe(&self) -> &'static str {
        match self {
            RefreshTarget::AdminOverview => "dashboard data",
            RefreshTarget::Users => "users",
            RefreshTarget::Classes => "classes",
            RefreshTarget::Flashcards { .. } => "flashcards",
            RefreshTarget::Categories => "categories",
            RefreshTarget::ClassSlides { .. } => "class documents",
            RefreshTarget::ClassFlashcardAssignments { .. } => "flashcard assignments",
            RefreshTarget::UserAssignments { .. } => "class assignments",
            RefreshTarget::StudentClasses => "your classes",
            RefreshTarget::ViewerSlides { .. } => "documents",
            RefreshTarget::ViewerFlashcards { .. } => "flashcards",
        }
    }
}

/// One recent class in the admin overview.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub class: Class,
    pub document_count: usize,
    pub flashcard_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminOverview {
    pub classes: Vec<Class>,
    pub student_count: usize,
    /// Placeholder until the resources endpoint is wired in.
    pub resource_count: usize,
    pub recent: Vec<ClassSummary>,
    pub total_flashcards: usize,
}

/// A student with the classes they are enrolled in.
///
/// `classes` is `None` when that lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user: User,
    pub classes: Option<Vec<UserClass>>,
}

/// An enrolled class with its counters; `None` renders as `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentClassCard {
    pub class: Class,
    pub content_count: Option<usize>,
    pub flashcard_count: Option<usize>,
}

/// Fresh data for one [`RefreshTarget`].
#[derive(Debug, Clone, PartialEq)]
pub enum Refreshed {
    AdminOverview(AdminOverview),
    Users(Vec<UserRow>),
    Classes(Vec<Class>),
    Flashcards {
        category: Option<String>,
        flashcards: Vec<Flashcard>,
    },
    Categories(Vec<String>),
    ClassSlides {
        class_id: Id,
        slides: Vec<Slide>,
    },
    ClassFlashcardAssignments {
        class_id: Id,
        flashcards: Vec<Flashcard>,
        assigned: Vec<Id>,
    },
    UserAssignments {
        user_id: Id,
        classes: Vec<Class>,
        assigned: Vec<Id>,
    },
    StudentClasses(Vec<StudentClassCard>),
    ViewerSlides {
        class_id: Id,
        class_name: String,
        slides: Vec<Slide>,
    },
    ViewerFlashcards {
        class_id: Id,
        class_name: String,
        flashcards: Vec<Flashcard>,
    },
}

/// Which screen a mutation belongs to, used to route its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateClass,
    CreateUser,
    DeleteUser,
    SetUserAssignments,
    CreateFlashcard,
    UpdateFlashcard,
    DeleteFlashcard,
    BulkUploadFlashcards,
    SaveFlashcardAssignments,
    UploadSlides,
    DeleteSlide,
}

/// A server-side change requested by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateClass(NewClass),
    CreateUser {
        user: NewUser,
        class_id: Option<Id>,
    },
    DeleteUser {
        user_id: Id,
        username: String,
    },
    SetUserAssignments {
        user_id: Id,
        username: String,
        add: Vec<Id>,
        remove: Vec<Id>,
    },
    CreateFlashcard(FlashcardDraft),
    UpdateFlashcard {
        id: Id,
        draft: FlashcardDraft,
    },
    DeleteFlashcard {
        id: Id,
    },
    BulkUploadFlashcards {
        path: PathBuf,
    },
    SaveFlashcardAssignments {
        class_id: Id,
        class_name: String,
        add: Vec<Id>,
        remove: Vec<Id>,
        assigned_total: usize,
    },
    UploadSlides {
        class_id: Id,
        paths: Vec<PathBuf>,
    },
    DeleteSlide {
        slide_id: Id,
        title: String,
    },
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateClass(_) => MutationKind::CreateClass,
            Mutation::CreateUser { .. } => MutationKind::CreateUser,
            Mutation::DeleteUser { .. } => MutationKind::DeleteUser,
            Mutation::SetUserAssignments { .. } => MutationKind::SetUserAssignments,
            Mutation::CreateFlashcard(_) => MutationKind::CreateFlashcard,
            Mutation::UpdateFlashcard { .. } => MutationKind::UpdateFlashcard,
            Mutation::DeleteFlashcard { .. } => MutationKind::DeleteFlashcard,
            Mutation::BulkUploadFlashcards { .. } => MutationKind::BulkUploadFlashcards,
            Mutation::SaveFlashcardAssignments { .. } => MutationKind::SaveFlashcardAssignments,
            Mutation::UploadSlides { .. } => MutationKind::UploadSlides,
            Mutation::DeleteSlide { .. } => MutationKind::DeleteSlide,
        }
    }
}
