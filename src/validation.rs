//! Client-side form validation.
//!
//! Every check here runs before a request is built. A failure names the
//! offending field so the form can render the message next to it.

use std::path::Path;

use crate::api::models::{FlashcardDraft, NewClass, NewUser};
use crate::constants::{
    MAX_UPLOAD_BYTES, MIN_CLASS_NAME_LEN, VALIDATION_CLASS_NAME_REQUIRED, VALIDATION_CLASS_NAME_SHORT,
    VALIDATION_DEFINITION_REQUIRED, VALIDATION_EMAIL_INVALID, VALIDATION_EXCEL_ONLY, VALIDATION_FILE_MISSING,
    VALIDATION_FILE_REQUIRED, VALIDATION_LOGIN_REQUIRED, VALIDATION_PASSWORD_REQUIRED, VALIDATION_PDF_ONLY,
    VALIDATION_TERM_REQUIRED, VALIDATION_USERNAME_REQUIRED,
};
use crate::utils::files::format_file_size;

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn validate_login(username: &str, password: &str) -> ValidationResult<(String, String)> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        let field = if username.is_empty() { "username" } else { "password" };
        return Err(ValidationError::new(field, VALIDATION_LOGIN_REQUIRED));
    }
    Ok((username.to_string(), password.to_string()))
}

/// Names are trimmed; at least two characters must remain.
pub fn validate_class_name(name: &str, description: &str) -> ValidationResult<NewClass> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", VALIDATION_CLASS_NAME_REQUIRED));
    }
    if name.chars().count() < MIN_CLASS_NAME_LEN {
        return Err(ValidationError::new("name", VALIDATION_CLASS_NAME_SHORT));
    }

    Ok(NewClass {
        name: name.to_string(),
        description: optional(description),
    })
}

pub fn validate_new_user(username: &str, email: &str, password: &str) -> ValidationResult<NewUser> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Err(ValidationError::new("username", VALIDATION_USERNAME_REQUIRED));
    }

    let valid_email = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid_email {
        return Err(ValidationError::new("email", VALIDATION_EMAIL_INVALID));
    }

    if password.is_empty() {
        return Err(ValidationError::new("password", VALIDATION_PASSWORD_REQUIRED));
    }

    Ok(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_flashcard(term: &str, definition: &str, category: &str) -> ValidationResult<FlashcardDraft> {
    let term = term.trim();
    let definition = definition.trim();

    if term.is_empty() {
        return Err(ValidationError::new("term", VALIDATION_TERM_REQUIRED));
    }
    if definition.is_empty() {
        return Err(ValidationError::new("definition", VALIDATION_DEFINITION_REQUIRED));
    }

    Ok(FlashcardDraft {
        term: term.to_string(),
        definition: definition.to_string(),
        category: optional(category),
    })
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

fn require_file(path: &str) -> ValidationResult<&Path> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("file", VALIDATION_FILE_REQUIRED));
    }
    Ok(Path::new(trimmed))
}

/// Check a document upload by extension and size.
///
/// `size` is `None` when the file does not exist.
pub fn validate_pdf(path: &str, size: Option<u64>) -> ValidationResult<()> {
    let path = require_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !has_extension(path, &["pdf"]) {
        return Err(ValidationError::new("file", format!("{}: {}", name, VALIDATION_PDF_ONLY)));
    }

    let size = size.ok_or_else(|| ValidationError::new("file", format!("{}: {}", name, VALIDATION_FILE_MISSING)))?;
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::new(
            "file",
            format!(
                "File \"{}\" is too large ({}). Maximum size is {}.",
                name,
                format_file_size(size),
                format_file_size(MAX_UPLOAD_BYTES)
            ),
        ));
    }

    Ok(())
}

pub fn validate_excel(path: &str, exists: bool) -> ValidationResult<()> {
    let path = require_file(path)?;

    if !has_extension(path, &["xlsx", "xls"]) {
        return Err(ValidationError::new("file", VALIDATION_EXCEL_ONLY));
    }
    if !exists {
        return Err(ValidationError::new("file", VALIDATION_FILE_MISSING));
    }

    Ok(())
}
