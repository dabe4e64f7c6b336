use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ScrollbarState;

const PAGE: usize = 10;

/// Scroll position for long read-only dialogs (help, logs, messages).
///
/// The offset may run past the end; renderers clamp it to the content.
#[derive(Debug, Default, Clone)]
pub struct ScrollState {
    pub offset: usize,
    pub scrollbar: ScrollbarState,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, offset: usize) {
        self.offset = offset;
        self.scrollbar = self.scrollbar.position(offset);
    }

    pub fn scroll_up(&mut self) {
        self.set(self.offset.saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.set(self.offset.saturating_add(1));
    }

    pub fn page_up(&mut self) {
        self.set(self.offset.saturating_sub(PAGE));
    }

    pub fn page_down(&mut self) {
        self.set(self.offset.saturating_add(PAGE));
    }

    pub fn scroll_to_top(&mut self) {
        self.set(0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.set(usize::MAX);
    }

    /// Clamp the offset once the content height is known.
    pub fn clamp(&mut self, total_lines: usize, visible: usize) -> usize {
        let max_scroll = total_lines.saturating_sub(visible);
        self.offset = self.offset.min(max_scroll);
        self.scrollbar = self
            .scrollbar
            .content_length(total_lines)
            .viewport_content_length(visible)
            .position(self.offset);
        self.offset
    }

    /// Apply a scrolling key. Returns whether it was one.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Home => self.scroll_to_top(),
            KeyCode::End => self.scroll_to_bottom(),
            _ => return false,
        }
        true
    }
}
