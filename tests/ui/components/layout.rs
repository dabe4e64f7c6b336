use classdeck::constants::{MAIN_AREA_MIN_WIDTH, SIDEBAR_WIDTH};
use classdeck::ui::LayoutManager;
use ratatui::layout::Rect;

#[test]
fn test_dashboard_areas() {
    let areas = LayoutManager::dashboard_layout(Rect::new(0, 0, 120, 40));

    assert_eq!(areas.header.height, 3);
    assert_eq!(areas.footer.height, 1);
    assert_eq!(areas.footer.y, 39);
    assert_eq!(areas.sidebar.width, SIDEBAR_WIDTH);
    assert_eq!(areas.main.x, SIDEBAR_WIDTH);
    assert_eq!(areas.main.width, 120 - SIDEBAR_WIDTH);
    assert_eq!(areas.chat.y, areas.main.bottom());
}

#[test]
fn test_sidebar_collapses_when_narrow() {
    assert_eq!(LayoutManager::sidebar_width(SIDEBAR_WIDTH + MAIN_AREA_MIN_WIDTH - 1), 0);
    assert_eq!(LayoutManager::sidebar_width(60), 20);

    let areas = LayoutManager::dashboard_layout(Rect::new(0, 0, 40, 20));
    assert_eq!(areas.sidebar.width, 0);
    assert_eq!(areas.main.width, 40);
}

#[test]
fn test_centered_rect() {
    let area = LayoutManager::centered_rect(50, 50, Rect::new(0, 0, 100, 40));
    assert_eq!(area, Rect::new(25, 10, 50, 20));

    let lines = LayoutManager::centered_rect_lines(60, 8, Rect::new(0, 0, 100, 30));
    assert_eq!(lines.height, 8);
    assert_eq!(lines.width, 60);
}
