//! Core UI functionality for the classdeck application.
//!
//! This module contains the building blocks the screens are assembled from:
//!
//! - [`actions`] - Action definitions passed between components and the app loop
//! - [`assignment`] - Locally edited membership sets diffed against the server
//! - [`banner`] - Transient success and error messages
//! - [`component`] - Base component trait and rendering abstractions
//! - [`context`] - Settings and services shared by every screen
//! - [`event_handler`] - Keyboard, mouse and tick events
//! - [`modal`] - Modal lifecycle, key bindings and dismissal
//! - [`navigator`] - Cursor over a list, used by the viewers
//! - [`task_manager`] - Background network work reported back as actions

pub mod actions;
pub mod assignment;
pub mod banner;
pub mod component;
pub mod context;
pub mod event_handler;
pub mod modal;
pub mod navigator;
pub mod task_manager;

// Re-export core types for easier access from other modules
pub use actions::{Action, DialogType, Screen};
pub use assignment::AssignmentDraft;
pub use banner::{Banner, BannerKind, BannerSlot};
pub use component::Component;
pub use context::AppContext;
pub use event_handler::{EventHandler, EventType};
pub use modal::{
    DeleteTarget, DismissReason, ModalBinding, ModalCommand, ModalContext, ModalController, ModalKind, ModalTrigger,
};
pub use navigator::{Navigator, Position};
pub use task_manager::{TaskId, TaskManager};
