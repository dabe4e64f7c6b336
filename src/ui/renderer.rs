//! Terminal setup and the main event loop

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;

use crate::api::{LmsBackend, SessionEvent};
use crate::ui::app_component::AppComponent;
use crate::ui::core::{AppContext, Component, EventHandler, EventType};

/// Run the TUI until the user quits
pub async fn run_app(
    backend: Arc<dyn LmsBackend>,
    session_events: mpsc::UnboundedReceiver<SessionEvent>,
    ctx: AppContext,
) -> Result<()> {
    let mouse_enabled = ctx.mouse_enabled;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = AppComponent::new(backend, session_events, ctx);
    let mut event_handler = EventHandler::new();

    // A token from a previous run skips the login screen
    app.verify_stored_session();

    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| app.render(f, f.area()))?;
            event_handler.mark_rendered();
            needs_render = false;
        }

        let event = event_handler.next_event().await?;
        match event {
            EventType::Tick => {
                // Background results are picked up on tick
                let background_actions = app.process_background_actions();
                let had_actions = !background_actions.is_empty();
                for action in background_actions {
                    app.dispatch(action).await;
                }
                app.handle_event(EventType::Tick).await?;

                // Banners and spinners change over time; redraw at tick rate
                needs_render = had_actions || app.is_busy() || event_handler.should_render();
            }
            EventType::Other => {}
            event => {
                app.handle_event(event).await?;
                needs_render = true;
            }
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
