//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::constants::{CHAT_PANEL_HEIGHT, MAIN_AREA_MIN_WIDTH, SIDEBAR_WIDTH};

/// Areas of a dashboard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardAreas {
    pub header: Rect,
    pub sidebar: Rect,
    pub main: Rect,
    pub chat: Rect,
    pub footer: Rect,
}

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into header, sidebar, main area, chat and a one-line footer.
    ///
    /// The sidebar collapses first when the terminal is too narrow.
    #[must_use]
    pub fn dashboard_layout(area: Rect) -> DashboardAreas {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let sidebar_width = Self::sidebar_width(area.width);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(rows[1]);

        let chat_height = CHAT_PANEL_HEIGHT.min(columns[1].height / 2);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(chat_height)])
            .split(columns[1]);

        DashboardAreas {
            header: rows[0],
            sidebar: columns[0],
            main: right[0],
            chat: right[1],
            footer: rows[2],
        }
    }

    /// Sidebar width; zero when the main area would drop under its minimum.
    #[must_use]
    pub fn sidebar_width(screen_width: u16) -> u16 {
        if screen_width < SIDEBAR_WIDTH + MAIN_AREA_MIN_WIDTH {
            0
        } else {
            std::cmp::min(screen_width / 3, SIDEBAR_WIDTH)
        }
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines),
                Constraint::Min(0),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Width available for a text column inside a bordered box.
    #[must_use]
    pub fn text_width(box_width: u16, reserved: usize) -> usize {
        (box_width.saturating_sub(4) as usize).saturating_sub(reserved)
    }
}
