//! Utility modules for the classdeck application.
//!
//! These helpers have no UI or network state of their own:
//!
//! - [`csv`] - Flashcard CSV export and export file naming
//! - [`files`] - Reading local files for upload and formatting sizes

pub mod csv;
pub mod files;
