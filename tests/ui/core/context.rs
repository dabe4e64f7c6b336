use std::time::Duration;

use classdeck::config::Config;
use classdeck::logger::Logger;
use classdeck::ui::core::context::AppContext;

#[test]
fn test_app_context_from_config() {
    let mut config = Config::default();
    config.ui.banner_seconds = 4;
    config.ui.mouse_enabled = false;
    config.downloads.directory = Some("/tmp/classdeck-downloads".into());

    let ctx = AppContext::new(&config, Logger::new());
    assert_eq!(ctx.banner_ttl, Duration::from_secs(4));
    assert_eq!(ctx.upload_banner_ttl, Duration::from_secs(5));
    assert!(!ctx.mouse_enabled);
    assert_eq!(ctx.downloads_dir, std::path::PathBuf::from("/tmp/classdeck-downloads"));
}
