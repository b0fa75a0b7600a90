//! Headless mode for the buildchat TUI.
//!
//! This module runs the chat surface without a real terminal, enabling E2E
//! testing and automation. Input events are sent via a channel and screen
//! state is captured after each render.

use crate::app::App;
use crate::event::Event;
use crate::{dispatch, ui};
use buildchat_engine::TaskClient;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether a request is outstanding.
    pub sending: bool,
    /// Number of entries in the conversation log.
    pub message_count: usize,
    /// Current error notice.
    pub error: Option<String>,
    /// Current input buffer contents.
    pub input: String,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

/// Handle to control a headless TUI instance.
///
/// Use this to send input and observe state changes.
pub struct HeadlessHandle {
    event_tx: mpsc::UnboundedSender<Event>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send a raw event to the TUI.
    ///
    /// Returns `true` if the event was sent successfully.
    pub fn send_event(&self, event: Event) -> bool {
        self.event_tx.send(event).is_ok()
    }

    /// Press a key without modifiers.
    pub fn send_key(&self, code: KeyCode) -> bool {
        self.send_key_with(code, KeyModifiers::NONE)
    }

    /// Press a key with modifiers.
    pub fn send_key_with(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.send_event(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Type `text` one character at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.send_key(KeyCode::Char(c)))
    }

    /// Paste `text` as a single bracketed paste.
    pub fn send_paste(&self, text: &str) -> bool {
        self.send_event(Event::Paste(text.to_string()))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the loop exited.
                Ok(Err(_)) | Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        let text = text.to_string();
        self.wait_for(|s| s.screen_contents.contains(&text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50, // Faster tick rate for testing
        }
    }
}

/// Run the TUI in headless mode against `client`.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(client, HeadlessConfig::default());
///
/// handle.type_text("build a widget");
/// handle.send_key(KeyCode::Enter);
///
/// let state = handle.wait_for_text("widget built", Duration::from_secs(1)).await;
///
/// handle.send_key(KeyCode::Esc);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless<C: TaskClient + 'static>(
    client: Arc<C>,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let loop_tx = event_tx.clone();
    let task = tokio::spawn(async move {
        run_headless_loop(client, config, loop_tx, event_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle { event_tx, state_rx };

    (handle, task)
}

async fn run_headless_loop<C: TaskClient + 'static>(
    client: Arc<C>,
    config: HeadlessConfig,
    event_tx: mpsc::UnboundedSender<Event>,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        app.sync_scroll();
        terminal.draw(|frame| {
            let area = frame.area();
            ui::render(&mut app, area, frame.buffer_mut());
        })?;

        let _ = state_tx.send(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            sending: app.session.is_sending(),
            message_count: app.session.log().len(),
            error: app.session.error().map(str::to_string),
            input: app.session.input().content().to_string(),
            should_quit: app.should_quit,
        });

        if app.should_quit {
            break;
        }

        // Wait for input, a completion, or a tick
        let event = tokio::select! {
            Some(event) = event_rx.recv() => event,
            () = tokio::time::sleep(tick_duration) => Event::Tick,
        };

        if let Some(pending) = app.handle_event(event) {
            dispatch(&client, pending, &event_tx);
        }
    }

    Ok(())
}

/// Convert a buffer to a string, one line per row with trailing spaces
/// trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    // Remove trailing newline
    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildchat_engine::{TaskRequest, TransportError, SEND_FAILED_NOTICE};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(2);

    /// Answers every request with a fixed outcome after `delay`.
    struct ScriptedClient {
        reply: Option<Value>,
        delay: Duration,
        calls: AtomicUsize,
        tasks: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn answering(reply: Value, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                delay,
                calls: AtomicUsize::new(0),
                tasks: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                tasks: Mutex::new(Vec::new()),
            })
        }
    }

    impl TaskClient for ScriptedClient {
        async fn submit_task(&self, request: &TaskRequest) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tasks.lock().unwrap().push(request.task.clone());
            tokio::time::sleep(self.delay).await;
            self.reply.clone().ok_or(TransportError::Timeout)
        }
    }

    #[test]
    fn test_headless_state_default() {
        let state = HeadlessState::default();
        assert!(!state.should_quit);
        assert!(!state.sending);
        assert!(state.screen_contents.is_empty());
    }

    #[test]
    fn test_headless_config_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.tick_rate_ms, 50);
    }

    #[test]
    fn test_buffer_to_string() {
        use ratatui::layout::Rect;
        use ratatui::style::Style;

        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", Style::default());
        buffer.set_string(0, 1, "World", Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld");
    }

    #[tokio::test]
    async fn test_enter_submits_and_shows_reply() {
        let client = ScriptedClient::answering(
            json!({ "result": { "output": "widget built" } }),
            Duration::from_millis(100),
        );
        let (mut handle, task) = run_tui_headless(Arc::clone(&client), HeadlessConfig::default());

        handle.type_text("build a widget");
        handle.send_key(KeyCode::Enter);

        let state = handle
            .wait_for(|s| s.sending, WAIT)
            .await
            .expect("sending state");
        assert!(state.screen_contents.contains("build a widget"));
        assert!(state.screen_contents.contains("[ Building... ]"));
        assert!(state.input.is_empty());

        let state = handle
            .wait_for_text("widget built", WAIT)
            .await
            .expect("reply shown");
        assert!(!state.sending);
        assert_eq!(state.message_count, 2);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*client.tasks.lock().unwrap(), vec!["build a widget".to_string()]);

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_enter_while_sending_is_ignored() {
        let client = ScriptedClient::answering(json!({ "result": "ok" }), Duration::from_millis(300));
        let (mut handle, task) = run_tui_headless(Arc::clone(&client), HeadlessConfig::default());

        handle.type_text("first");
        handle.send_key(KeyCode::Enter);
        handle.wait_for(|s| s.sending, WAIT).await.expect("sending");

        handle.type_text("second");
        handle.send_key(KeyCode::Enter);

        let state = handle
            .wait_for(|s| !s.sending && s.message_count == 2, WAIT)
            .await
            .expect("reply");
        assert!(state.input.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failure_shows_error_line() {
        let client = ScriptedClient::failing();
        let (mut handle, task) = run_tui_headless(client, HeadlessConfig::default());

        handle.type_text("doomed");
        handle.send_key(KeyCode::Enter);

        let state = handle
            .wait_for_text("Error: Failed to send task request.", WAIT)
            .await
            .expect("error line");
        assert_eq!(state.error.as_deref(), Some(SEND_FAILED_NOTICE));
        assert_eq!(state.message_count, 1);
        assert!(!state.sending);

        // Next submission clears the notice.
        handle.type_text("again");
        handle.send_key(KeyCode::Enter);
        handle
            .wait_for(|s| s.message_count == 2, WAIT)
            .await
            .expect("second user message");

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_blank_enter_does_nothing() {
        let client = ScriptedClient::answering(json!({}), Duration::ZERO);
        let (mut handle, task) = run_tui_headless(Arc::clone(&client), HeadlessConfig::default());

        handle.type_text("   ");
        handle.send_key(KeyCode::Enter);
        handle
            .wait_for(|s| s.input == "   ", WAIT)
            .await
            .expect("input echoed");

        // Let a few ticks pass.
        tokio::time::sleep(Duration::from_millis(150)).await;
        let state = handle.state();
        assert_eq!(state.message_count, 0);
        assert!(!state.sending);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_quit_while_sending_drops_outcome() {
        let client = ScriptedClient::answering(json!({ "result": "late" }), Duration::from_millis(200));
        let (mut handle, task) = run_tui_headless(Arc::clone(&client), HeadlessConfig::default());

        handle.type_text("slow");
        handle.send_key(KeyCode::Enter);
        handle.wait_for(|s| s.sending, WAIT).await.expect("sending");

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
        assert!(handle.has_quit());

        // The request still completes; its outcome has nowhere to go.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert!(!handle.send_key(KeyCode::Enter));
    }

    #[tokio::test]
    async fn test_paste_multiline() {
        let client = ScriptedClient::answering(json!({}), Duration::ZERO);
        let (mut handle, task) = run_tui_headless(client, HeadlessConfig::default());

        handle.send_paste("line one\r\nline two");
        let state = handle
            .wait_for(|s| !s.input.is_empty(), WAIT)
            .await
            .expect("pasted");
        assert_eq!(state.input, "line one\nline two");
        assert!(state.screen_contents.contains("> line one"));

        handle.send_key(KeyCode::Esc);
        task.await.unwrap().unwrap();
    }
}
