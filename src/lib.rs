//! classdeck - a terminal client for a class, document and flashcard
//! learning platform
//!
//! Administrators manage classes, students, documents and flashcards;
//! students browse the documents and study the flashcards of the classes
//! they are enrolled in. All data lives on the platform's HTTP API.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`api`] - Bearer-token session, wire models and the backend trait
//! * [`cli`] - Command-line arguments
//! * [`config`] - Application configuration management
//! * [`service`] - Dashboard data loading and mutate-then-refresh
//! * [`ui`] - Terminal user interface components
//! * [`utils`] - CSV export and file helpers
//! * [`validation`] - Client-side form checks

/// HTTP session, token storage and the platform API
pub mod api;

/// Command-line arguments
pub mod cli;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Dashboard data loading and mutations
pub mod service;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for exports and file handling
pub mod utils;

/// Form validation run before any request is issued
pub mod validation;
