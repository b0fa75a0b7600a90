//! Test utilities for buildchat-tui rendering tests.

use crate::app::App;
use crate::ui;
use ratatui::{backend::TestBackend, Terminal};

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT)
}

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app with an empty session.
pub fn create_test_app() -> App {
    App::default()
}

/// Render the app into a default-sized terminal and return the screen text.
pub fn render_app_to_string(app: &mut App) -> String {
    let mut terminal = create_test_terminal();
    terminal
        .draw(|frame| {
            let area = frame.area();
            ui::render(app, area, frame.buffer_mut());
        })
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}
