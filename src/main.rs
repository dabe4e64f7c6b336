use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use classdeck::api::{FileTokenStore, HttpBackend, LmsBackend, SessionManager};
use classdeck::cli::Cli;
use classdeck::config::Config;
use classdeck::logger::Logger;
use classdeck::ui::{self, core::AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.generate_config {
        let path = match path {
            Some(path) => path,
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let config = Config::load().context("Failed to load configuration")?;

    let logger = Logger::from_config(config.logging.enabled)?;
    logger.install(log::LevelFilter::Debug)?;
    log::info!("classdeck starting against {}", config.api.base_url);

    let store = Arc::new(FileTokenStore::new(config.token_file_path()?));
    let (session, session_events) = SessionManager::new(config.api.base_url.clone(), store);
    let backend: Arc<dyn LmsBackend> = Arc::new(HttpBackend::new(session));

    let ctx = AppContext::new(&config, logger);

    // Run the TUI application
    ui::run_app(backend, session_events, ctx).await?;

    Ok(())
}
