#[path = "core/actions.rs"]
mod actions;

#[path = "core/assignment.rs"]
mod assignment;

#[path = "core/banner.rs"]
mod banner;

#[path = "core/context.rs"]
mod context;

#[path = "core/event_handler.rs"]
mod event_handler;

#[path = "core/modal.rs"]
mod modal;

#[path = "core/navigator.rs"]
mod navigator;

#[path = "core/task_manager.rs"]
mod task_manager;
