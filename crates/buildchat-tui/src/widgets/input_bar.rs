//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for text entry.
//! Supports multi-line input with Shift+Enter or Ctrl+J for newlines.
//! Long lines wrap at the inner width so the cursor never leaves the bar.

use buildchat_engine::InputBuffer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::conversation::INPUT_PLACEHOLDER;
use crate::theme::Theme;

/// Rows of text visible inside the bar.
pub const INPUT_ROWS: u16 = 3;

const PROMPT: &str = "> ";
const INDENT: &str = "  ";
const CURSOR: &str = "█";

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a InputBuffer,
    theme: &'a Theme,
    focused: bool,
    disabled: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a InputBuffer, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            focused: false,
            disabled: false,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Disable editing (a request is in flight).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn shows_cursor(&self) -> bool {
        self.focused && !self.disabled
    }

    /// Build Lines for multi-line input display, hard-wrapped to
    /// `text_width` columns.
    /// Returns the lines to display and which line index contains the cursor.
    fn build_input_lines(&self, text_width: usize) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();

        if content.is_empty() {
            let mut spans = vec![Span::raw(PROMPT)];
            if self.shows_cursor() {
                spans.push(Span::raw(CURSOR));
            }
            spans.push(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default().fg(self.theme.muted),
            ));
            return (vec![Line::from(spans)], 0);
        }

        let text_width = text_width.max(1);
        let cursor_pos = self.input.cursor();
        let mut lines = Vec::new();
        let mut cursor_line = 0;
        let mut line_start = 0;

        for text_line in content.split('\n') {
            let chars: Vec<char> = text_line.chars().collect();
            let line_end = line_start + chars.len();
            let cursor_col = cursor_pos
                .checked_sub(line_start)
                .filter(|&col| col <= chars.len());

            let rows = wrap_columns(&chars, text_width);
            let last_row = rows.len() - 1;
            for (row_idx, &(from, to)) in rows.iter().enumerate() {
                let prefix = if lines.is_empty() { PROMPT } else { INDENT };
                let row: String = chars[from..to].iter().collect();

                let cursor_here = cursor_col
                    .filter(|_| self.shows_cursor())
                    .filter(|&col| col >= from && (col < to || row_idx == last_row));
                match cursor_here {
                    Some(col) if col == to && row.width() >= text_width => {
                        // Cursor sits past a full row; give it a row of its own.
                        lines.push(Line::from(format!("{prefix}{row}")));
                        cursor_line = lines.len();
                        lines.push(Line::from(vec![Span::raw(INDENT), Span::raw(CURSOR)]));
                    }
                    Some(col) => {
                        let before: String = chars[from..col].iter().collect();
                        let after: String = chars[col..to].iter().collect();
                        cursor_line = lines.len();
                        lines.push(Line::from(vec![
                            Span::raw(prefix),
                            Span::raw(before),
                            Span::raw(CURSOR),
                            Span::raw(after),
                        ]));
                    }
                    None => {
                        if cursor_col.is_some_and(|col| col >= from && col <= to) {
                            cursor_line = lines.len();
                        }
                        lines.push(Line::from(format!("{prefix}{row}")));
                    }
                }
            }

            // +1 for the newline character
            line_start = line_end + 1;
        }

        (lines, cursor_line)
    }
}

/// Split `chars` into `(start, end)` index ranges no wider than `width`
/// columns. Always returns at least one (possibly empty) range.
fn wrap_columns(chars: &[char], width: usize) -> Vec<(usize, usize)> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, c) in chars.iter().enumerate() {
        let w = c.width().unwrap_or(0);
        if used + w > width && i > start {
            rows.push((start, i));
            start = i;
            used = 0;
        }
        used += w;
    }
    rows.push((start, chars.len()));
    rows
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.shows_cursor() {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner_height = area.height.saturating_sub(2) as usize;
        let text_width = (area.width.saturating_sub(2) as usize).saturating_sub(PROMPT.len());
        let (lines, cursor_line) = self.build_input_lines(text_width);

        // Keep the cursor line visible
        let scroll_offset = if lines.len() <= inner_height {
            0
        } else {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        };

        let text_style = if self.disabled {
            Style::default().fg(self.theme.muted)
        } else {
            Style::default().fg(self.theme.text)
        };

        Paragraph::new(lines)
            .block(block)
            .style(text_style)
            .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
