#[path = "components/admin_dashboard.rs"]
mod admin_dashboard;

#[path = "components/chat_panel.rs"]
mod chat_panel;


#[path = "components/dialogs.rs"]
mod dialogs;

#[path = "components/layout.rs"]
mod layout;
