//! buildchat-tui: Terminal chat surface for the buildchat task console
//!
//! This crate provides the TUI layer for buildchat, including:
//! - The conversation pane with auto-scroll
//! - The input bar, send button and error line
//! - Keyboard, paste and mouse handling
//! - Headless mode for testing and automation

mod app;
mod conversation;
mod event;
pub mod headless;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod ui;
mod widgets;

pub use app::{App, Focus};
pub use buildchat_engine;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use theme::{Theme, ThemeName};

use buildchat_engine::{ClientConfig, HttpTaskClient, PendingSubmission, TaskClient};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::stdout;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Tick rate for the spinner, in milliseconds.
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application against the endpoint in `config`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. A request still in flight when the user quits is abandoned; its
/// outcome is discarded.
pub async fn run_tui(config: &ClientConfig, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(HttpTaskClient::new(config)?);
    info!(endpoint = client.endpoint(), "starting chat surface");

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(theme);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;
    debug!(messages = app.session.log().len(), "chat surface closed");
    result
}

async fn run_loop<B: Backend, C: TaskClient + 'static>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
    client: &Arc<C>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tx = events.sender();

    loop {
        app.sync_scroll();
        terminal.draw(|frame| {
            let area = frame.area();
            ui::render(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            break;
        }

        let Some(event) = events.next().await else {
            break;
        };
        if let Some(pending) = app.handle_event(event) {
            dispatch(client, pending, &tx);
        }
    }

    Ok(())
}

/// Issue the request for `pending` in the background.
///
/// The outcome comes back as [`Event::TaskCompleted`]. If the surface has
/// already closed the send fails and the outcome is dropped.
pub(crate) fn dispatch<C: TaskClient + 'static>(
    client: &Arc<C>,
    pending: PendingSubmission,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.submit_task(&pending.request).await;
        if tx
            .send(Event::TaskCompleted {
                id: pending.id,
                outcome,
            })
            .is_err()
        {
            debug!(submission = pending.id.get(), "surface closed, dropping outcome");
        }
    });
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
