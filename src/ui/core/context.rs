use std::path::PathBuf;
use std::time::Duration;

use crate::{config::Config, logger::Logger};

/// Settings and services shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    pub logger: Logger,
    pub banner_ttl: Duration,
    pub upload_banner_ttl: Duration,
    pub downloads_dir: PathBuf,
    pub mouse_enabled: bool,
}

impl AppContext {
    pub fn new(config: &Config, logger: Logger) -> Self {
        Self {
            logger,
            banner_ttl: config.ui.banner_duration(),
            upload_banner_ttl: config.ui.upload_banner_duration(),
            downloads_dir: config.downloads_dir(),
            mouse_enabled: config.ui.mouse_enabled,
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(&Config::default(), Logger::new())
    }
}
