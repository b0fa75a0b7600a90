//! Status lines below the conversation: error notice and key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

const IDLE_HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("Shift+Enter", "newline"),
    ("Tab", "focus"),
    ("PgUp/PgDn", "scroll"),
    ("Esc", "quit"),
];

const SENDING_HINTS: &[(&str, &str)] = &[("PgUp/PgDn", "scroll"), ("Esc", "quit")];

/// Key hints shown next to the send button.
pub struct FooterHints<'a> {
    theme: &'a Theme,
    sending: bool,
}

impl<'a> FooterHints<'a> {
    pub fn new(theme: &'a Theme, sending: bool) -> Self {
        Self { theme, sending }
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = if self.sending {
            SENDING_HINTS
        } else {
            IDLE_HINTS
        };

        let mut spans = Vec::with_capacity(hints.len() * 3);
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default().fg(self.theme.muted)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {label}"),
                Style::default().fg(self.theme.muted),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// One-line error notice, e.g. `Error: Failed to send task request.`
pub struct ErrorLine<'a> {
    theme: &'a Theme,
    message: &'a str,
}

impl<'a> ErrorLine<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { theme, message }
    }
}

impl Widget for ErrorLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            format!("Error: {}", self.message),
            Style::default().fg(self.theme.error),
        )))
        .render(area, buf);
    }
}
