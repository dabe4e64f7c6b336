//! Flashcard CSV export.
//!
//! The format is deliberately minimal: a fixed `Term,Definition,Category`
//! header, every value wrapped in double quotes with inner quotes doubled,
//! rows separated by `\n` and no trailing newline.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::api::models::Flashcard;

pub const CSV_HEADER: &str = "Term,Definition,Category";

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render flashcards as CSV text.
pub fn flashcards_to_csv(flashcards: &[Flashcard]) -> String {
    let mut lines = Vec::with_capacity(flashcards.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for card in flashcards {
        lines.push(format!(
            "{},{},{}",
            quote(&card.term),
            quote(&card.definition),
            quote(card.category.as_deref().unwrap_or(""))
        ));
    }

    lines.join("\n")
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `flashcards_<date>.csv`, or `<Class>_flashcards_<date>.csv` for a class export.
pub fn export_file_name(class_name: Option<&str>, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match class_name {
        Some(name) => format!("{}_flashcards_{}.csv", sanitize_file_stem(name), date),
        None => format!("flashcards_{}.csv", date),
    }
}

/// Write an export into `dir`, creating it if needed. Returns the file path.
pub fn write_export(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    std::fs::write(&path, content).with_context(|| format!("Failed to write export: {}", path.display()))?;

    log::info!("Export: wrote {}", path.display());
    Ok(path)
}
