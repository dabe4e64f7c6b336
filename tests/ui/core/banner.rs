use std::time::{Duration, Instant};

use classdeck::ui::core::{BannerKind, BannerSlot};

#[test]
fn test_banner_expires_at_deadline() {
    let mut slot = BannerSlot::new();
    let start = Instant::now();
    slot.success("Saved", start, Duration::from_secs(3));

    assert!(!slot.tick(start + Duration::from_millis(2999)));
    assert_eq!(slot.current().unwrap().message, "Saved");

    assert!(slot.tick(start + Duration::from_secs(3)));
    assert!(slot.current().is_none());
}

#[test]
fn test_newer_banner_replaces_older() {
    let mut slot = BannerSlot::new();
    let start = Instant::now();
    slot.success("first", start, Duration::from_secs(3));
    slot.error("second", start + Duration::from_secs(2), Duration::from_secs(3));

    // The first banner's deadline no longer applies
    assert!(!slot.tick(start + Duration::from_secs(4)));
    let banner = slot.current().unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.message, "second");
}
