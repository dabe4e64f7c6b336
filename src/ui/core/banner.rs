//! Transient success and error messages.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub hide_at: Instant,
}

/// Holds at most one banner; a newer one replaces the old.
///
/// Time is always passed in so expiry is deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct BannerSlot {
    banner: Option<Banner>,
}

impl BannerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, kind: BannerKind, message: impl Into<String>, now: Instant, ttl: Duration) {
        self.banner = Some(Banner {
            kind,
            message: message.into(),
            hide_at: now + ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant, ttl: Duration) {
        self.show(BannerKind::Success, message, now, ttl);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant, ttl: Duration) {
        self.show(BannerKind::Error, message, now, ttl);
    }

    pub fn clear(&mut self) {
        self.banner = None;
    }

    /// Drop the banner once its deadline has passed. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.banner {
            Some(banner) if now >= banner.hide_at => {
                self.banner = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }
}
