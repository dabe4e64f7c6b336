//! Constants used throughout the application
//!
//! This module centralizes user-facing text, API defaults and layout values
//! so the dashboards and dialogs stay consistent.

// API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const APP_DIR_NAME: &str = "classdeck";
pub const TOKEN_FILE_NAME: &str = "session.json";
pub const LOG_FILE_NAME: &str = "classdeck.log";

// Session errors
pub const ERROR_LOGIN_FAILED: &str = "Login failed";
pub const ERROR_LOGIN_UNREACHABLE: &str = "Could not reach the server";
pub const ERROR_NOT_AUTHENTICATED: &str = "Not authenticated";
pub const ERROR_NO_TOKEN: &str = "No token available";
pub const ERROR_REQUEST_FAILED: &str = "Request failed";
pub const ERROR_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

// Validation messages
pub const VALIDATION_LOGIN_REQUIRED: &str = "Please enter both username and password";
pub const VALIDATION_CLASS_NAME_REQUIRED: &str = "Please enter a class name";
pub const VALIDATION_CLASS_NAME_SHORT: &str = "Class name must be at least 2 characters";
pub const VALIDATION_USERNAME_REQUIRED: &str = "Please enter a username";
pub const VALIDATION_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const VALIDATION_PASSWORD_REQUIRED: &str = "Please enter a password";
pub const VALIDATION_TERM_REQUIRED: &str = "Please enter a term";
pub const VALIDATION_DEFINITION_REQUIRED: &str = "Please enter a definition";
pub const VALIDATION_FILE_REQUIRED: &str = "No file selected";
pub const VALIDATION_FILE_MISSING: &str = "File not found";
pub const VALIDATION_PDF_ONLY: &str = "Only PDF files are allowed";
pub const VALIDATION_EXCEL_ONLY: &str = "Invalid file type. Please select an Excel file (.xlsx or .xls)";

/// Largest document accepted for upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const MIN_CLASS_NAME_LEN: usize = 2;

// Mutation outcomes
pub const ERROR_CLASS_EXISTS: &str = "A class with this name already exists";
pub const ERROR_CLASS_CREATE_FAILED: &str = "Failed to create class. Please try again.";
pub const SUCCESS_CLASS_CREATED: &str = "Class created successfully!";
pub const SUCCESS_FLASHCARD_CREATED: &str = "Flashcard created successfully!";
pub const SUCCESS_FLASHCARD_UPDATED: &str = "Flashcard updated successfully!";
pub const SUCCESS_FLASHCARD_DELETED: &str = "Flashcard deleted successfully";
pub const INFO_RESOURCE_UPLOAD: &str = "Resource upload feature coming soon!";
pub const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";
pub const CHAT_GREETING: &str = "Hi! Ask me anything about your classes.";

// Empty states
pub const EMPTY_CLASSES_ADMIN: &str = "No classes created yet. Press 'c' to create your first class.";
pub const EMPTY_CLASSES_STUDENT: &str = "You are not enrolled in any classes yet.";
pub const EMPTY_STUDENTS: &str = "No students created yet";
pub const EMPTY_FLASHCARDS: &str = "No flashcards found";
pub const NOT_ASSIGNED_TO_CLASSES: &str = "Not assigned to any classes";
pub const ALL_CATEGORIES: &str = "All Categories";

// Dialog titles
pub const DIALOG_TITLE_DEBUG_LOGS: &str = "Debug Logs - Press 'Esc', 'G' or 'q' to close";
pub const CONFIG_GENERATED: &str = "Generated default configuration file";

/// Banner auto-hide delay for most screens, in seconds.
pub const DEFAULT_BANNER_SECONDS: u64 = 3;
/// Banner auto-hide delay for upload screens, in seconds.
pub const DEFAULT_UPLOAD_BANNER_SECONDS: u64 = 5;
/// Delay before a creation modal closes itself after success.
pub const MODAL_CLOSE_DELAY_MS: u64 = 1500;

/// Number of classes listed in the admin overview.
pub const RECENT_CLASSES_LIMIT: usize = 5;

// UI Layout Constants
/// Sidebar width in columns
pub const SIDEBAR_WIDTH: u16 = 32;
/// Chat panel height in rows
pub const CHAT_PANEL_HEIGHT: u16 = 10;
/// Minimum main area width to preserve usability
pub const MAIN_AREA_MIN_WIDTH: u16 = 20;
