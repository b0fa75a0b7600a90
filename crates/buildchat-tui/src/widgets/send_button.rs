//! Explicit submit control.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

const SEND_LABEL: &str = "[ Send ]";
const SENDING_LABEL: &str = "[ Building... ]";

/// The `[ Send ]` button.
///
/// Enabled exactly when the session can accept a submission.
pub struct SendButton<'a> {
    theme: &'a Theme,
    enabled: bool,
    sending: bool,
    focused: bool,
}

impl<'a> SendButton<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            enabled: false,
            sending: false,
            focused: false,
        }
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Switch the label to the in-flight variant.
    #[must_use]
    pub fn sending(mut self, sending: bool) -> Self {
        self.sending = sending;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Columns needed to draw the button.
    pub fn width(sending: bool) -> u16 {
        let label = if sending { SENDING_LABEL } else { SEND_LABEL };
        u16::try_from(label.width()).unwrap_or(u16::MAX)
    }

    fn label(&self) -> &'static str {
        if self.sending {
            SENDING_LABEL
        } else {
            SEND_LABEL
        }
    }
}

impl Widget for SendButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut style = if self.enabled {
            Style::default()
                .fg(self.theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.muted)
        };
        if self.focused && self.enabled {
            style = style.add_modifier(Modifier::REVERSED);
        }

        buf.set_span(area.x, area.y, &Span::styled(self.label(), style), area.width);
    }
}
