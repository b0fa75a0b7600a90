//! Screen layout for the chat surface.
//!
//! ```text
//! ┌ Describe Your Build Task ──────────────────────┐
//! │                                 conversation   │
//! └────────────────────────────────────────────────┘
//! Error: Failed to send task request.      (only on failure)
//! ┌────────────────────────────────────────────────┐
//! │> input                                         │
//! └────────────────────────────────────────────────┘
//!  Enter send  Shift+Enter newline ...     [ Send ]
//! ```

use crate::app::{App, Focus};
use crate::conversation::ConversationView;
use crate::widgets::{ErrorLine, FooterHints, InputBar, SendButton, INPUT_ROWS};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{StatefulWidget, Widget},
};

/// Draw the whole chat surface into `buf`.
pub fn render(app: &mut App, area: Rect, buf: &mut Buffer) {
    let error_rows = u16::from(app.session.error().is_some());
    let [conversation_area, error_area, input_area, footer_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(error_rows),
        Constraint::Length(INPUT_ROWS + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    let sending = app.session.is_sending();

    ConversationView::new(app.session.log(), &app.theme)
        .sending(sending, app.tick)
        .render(conversation_area, buf, &mut app.scroll);

    if let Some(message) = app.session.error() {
        ErrorLine::new(message, &app.theme).render(error_area, buf);
    }

    InputBar::new(app.session.input(), &app.theme)
        .focused(app.focus == Focus::Input)
        .disabled(sending)
        .render(input_area, buf);

    buf.set_style(footer_area, Style::default().bg(app.theme.surface));
    let button_width = SendButton::width(sending).min(footer_area.width);
    let [hints_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(button_width),
    ])
    .areas(footer_area);

    FooterHints::new(&app.theme, sending).render(hints_area, buf);
    SendButton::new(&app.theme)
        .enabled(app.session.can_submit())
        .sending(sending)
        .focused(app.focus == Focus::SendButton)
        .render(button_area, buf);
    app.send_button_area = button_area;
}


#[cfg(test)]
mod snapshot_tests {
    use crate::event::{Action, Event};
    use crate::test_utils::*;
    use buildchat_engine::{PendingSubmission, TransportError};
    use insta::assert_snapshot;
    use serde_json::json;

    fn submit(app: &mut crate::App, text: &str) -> PendingSubmission {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
        app.handle_action(Action::Submit).expect("submission")
    }

    // ========================================================================
    // Screen Snapshot Tests
    // ========================================================================

    #[test]
    fn test_snapshot_idle_screen() {
        let mut app = create_test_app();
        let screen = render_app_to_string(&mut app);
        assert_snapshot!("idle_screen", screen);
    }

    #[test]
    fn test_snapshot_sending_screen() {
        let mut app = create_test_app();
        submit(&mut app, "build a widget");
        let screen = render_app_to_string(&mut app);
        assert_snapshot!("sending_screen", screen);
    }

    #[test]
    fn test_snapshot_reply_screen() {
        let mut app = create_test_app();
        let pending = submit(&mut app, "build a widget");
        app.handle_event(Event::TaskCompleted {
            id: pending.id,
            outcome: Ok(json!({ "result": { "output": "widget built" } })),
        });
        app.sync_scroll();
        let screen = render_app_to_string(&mut app);
        assert_snapshot!("reply_screen", screen);
    }

    #[test]
    fn test_snapshot_error_screen() {
        let mut app = create_test_app();
        let pending = submit(&mut app, "build a widget");
        app.handle_event(Event::TaskCompleted {
            id: pending.id,
            outcome: Err(TransportError::Timeout),
        });
        let screen = render_app_to_string(&mut app);
        assert_snapshot!("error_screen", screen);
    }
}
