use classdeck::ui::core::EventHandler;

#[tokio::test]
async fn test_render_throttle() {
    let mut event_handler = EventHandler::new();
    event_handler.mark_rendered();

    // Just rendered, should not render again yet
    assert!(!event_handler.should_render());

    // After waiting, should be ready to render
    tokio::time::sleep(tokio::time::Duration::from_millis(17)).await;
    assert!(event_handler.should_render());
}
