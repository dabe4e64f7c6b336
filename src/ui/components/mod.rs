//! Reusable UI components

// Screens
pub mod admin_dashboard;
pub mod login_component;
pub mod student_dashboard;

// Building blocks
pub mod chat_panel;
pub mod dialog_component;
pub mod dialogs;
pub mod status_bar;
pub mod text_input;

// Component exports
pub use admin_dashboard::AdminDashboard;
pub use chat_panel::ChatPanel;
pub use dialog_component::DialogComponent;
pub use login_component::LoginComponent;
pub use student_dashboard::StudentDashboard;
