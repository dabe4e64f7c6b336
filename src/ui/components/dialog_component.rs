//! Application-level dialogs: errors, info messages, help and debug logs.
//!
//! These sit above every screen and its modals. Feature modals live with the
//! dashboards (see [`crate::ui::components::dialogs`]).

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::logger::Logger;
use crate::ui::components::dialogs::{scroll_behavior::ScrollState, system_dialogs};
use crate::ui::core::{
    actions::{Action, DialogType},
    Component, Screen,
};

pub struct DialogComponent {
    pub dialog_type: Option<DialogType>,
    pub scroll: ScrollState,
    pub screen: Screen,
    logger: Logger,
}

impl Default for DialogComponent {
    fn default() -> Self {
        Self::new(Logger::new())
    }
}

impl DialogComponent {
    pub fn new(logger: Logger) -> Self {
        Self {
            dialog_type: None,
            scroll: ScrollState::new(),
            screen: Screen::Login,
            logger,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.dialog_type.is_some()
    }

    pub fn show(&mut self, dialog_type: DialogType) {
        log::debug!("Dialog: showing {:?}", dialog_type);
        self.dialog_type = Some(dialog_type);
        self.scroll.scroll_to_top();
    }

    pub fn hide(&mut self) {
        self.dialog_type = None;
        self.scroll.scroll_to_top();
    }
}

impl Component for DialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let Some(dialog_type) = &self.dialog_type else {
            return Action::None;
        };

        match dialog_type {
            DialogType::Help | DialogType::Logs => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Char('G') => Action::HideDialog,
                _ => {
                    self.scroll.handle_key(key);
                    Action::None
                }
            },
            DialogType::Error(_) | DialogType::Info(_) => {
                // j/k scroll long messages, anything else dismisses
                if matches!(key.code, KeyCode::Char('j') | KeyCode::Char('k')) {
                    self.scroll.handle_key(key);
                    Action::None
                } else {
                    Action::HideDialog
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ShowDialog(dialog_type) => {
                self.show(dialog_type);
                Action::None
            }
            Action::HideDialog => {
                self.hide();
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(dialog_type) = self.dialog_type.clone() else {
            return;
        };

        match dialog_type {
            DialogType::Error(message) => system_dialogs::render_error_dialog(f, rect, &message, &mut self.scroll),
            DialogType::Info(message) => system_dialogs::render_info_dialog(f, rect, &message, &mut self.scroll),
            DialogType::Help => system_dialogs::render_help_dialog(f, rect, self.screen, &mut self.scroll),
            DialogType::Logs => {
                let logs = self.logger.get_logs();
                system_dialogs::render_logs_dialog(f, rect, &logs, &mut self.scroll);
            }
        }
    }
}
