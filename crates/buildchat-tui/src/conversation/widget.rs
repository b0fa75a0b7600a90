//! Conversation pane widget.

use buildchat_engine::{ConversationLog, Message};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::placeholder::EMPTY_LOG_HINT;
use super::scroll::ScrollFollower;
use crate::theme::{Theme, SPINNER};

/// Pane title.
const TITLE: &str = " Describe Your Build Task ";

/// Message blocks take at most this share of the pane width, in percent.
const MAX_BLOCK_PERCENT: usize = 80;

/// Horizontal padding inside a message block, per side.
const BLOCK_PADDING: usize = 1;

/// Tabs are expanded to this many spaces before wrapping.
const TAB_WIDTH: usize = 4;

/// Scrollable message log.
///
/// ```text
/// ┌ Describe Your Build Task ───────────────────┐
/// │                        build a widget       │
/// │                                             │
/// │  {                                          │
/// │    "status": "ok"                           │
/// │  }                                          │
/// └─────────────────────────────────────────────┘
/// ```
pub struct ConversationView<'a> {
    log: &'a ConversationLog,
    theme: &'a Theme,
    sending: bool,
    tick: usize,
}

impl<'a> ConversationView<'a> {
    /// Create a new conversation view.
    pub fn new(log: &'a ConversationLog, theme: &'a Theme) -> Self {
        Self {
            log,
            theme,
            sending: false,
            tick: 0,
        }
    }

    /// Show the waiting indicator below the last message.
    #[must_use]
    pub fn sending(mut self, sending: bool, tick: usize) -> Self {
        self.sending = sending;
        self.tick = tick;
        self
    }
}

impl StatefulWidget for ConversationView<'_> {
    type State = ScrollFollower;

    fn render(self, area: Rect, buf: &mut Buffer, scroll: &mut Self::State) {
        let block = Block::default()
            .title(TITLE)
            .title_style(
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.log.is_empty() {
            scroll.resolve(0, inner.height as usize);
            Paragraph::new(Line::from(Span::styled(
                EMPTY_LOG_HINT,
                Style::default().fg(self.theme.muted),
            )))
            .render(inner, buf);
            return;
        }

        let mut lines = layout_messages(self.log.messages(), inner.width as usize, self.theme);
        if self.sending {
            let frame = SPINNER[self.tick % SPINNER.len()];
            lines.push(Line::from(Span::styled(
                format!("{frame} Building..."),
                Style::default().fg(self.theme.muted),
            )));
        }

        let offset = scroll.resolve(lines.len(), inner.height as usize);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        Paragraph::new(lines).scroll((offset, 0)).render(inner, buf);
    }
}

/// Lay out messages as aligned blocks for a pane `width` columns wide.
///
/// Messages are separated by one blank line. User blocks are pushed to the
/// right edge; system blocks start at the left edge.
pub fn layout_messages(messages: &[Message], width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }

    let max_block = (width * MAX_BLOCK_PERCENT / 100).max(1);
    let text_width = max_block.saturating_sub(BLOCK_PADDING * 2).max(1);

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }

        let body = wrap_preserving(message.text(), text_width);
        let body_width = body.iter().map(|l| l.width()).max().unwrap_or(0);
        let block_width = (body_width + BLOCK_PADDING * 2).min(width);
        let indent = if message.is_user() {
            width.saturating_sub(block_width)
        } else {
            0
        };

        let style = if message.is_user() {
            Style::default().fg(theme.user_text).bg(theme.user_bubble)
        } else {
            Style::default().fg(theme.system_text).bg(theme.system_bubble)
        };

        for row in body {
            let fill = body_width.saturating_sub(row.width());
            let padded = format!(
                "{pad}{row}{fill}{pad}",
                pad = " ".repeat(BLOCK_PADDING),
                fill = " ".repeat(fill),
            );
            let mut spans = Vec::with_capacity(2);
            if indent > 0 {
                spans.push(Span::raw(" ".repeat(indent)));
            }
            spans.push(Span::styled(padded, style));
            lines.push(Line::from(spans));
        }
    }

    lines
}

/// Wrap `text` to `width` columns, keeping explicit newlines, blank lines
/// and leading indentation.
///
/// Whitespace-only lines and trailing spaces are kept up to the row width;
/// spaces at a soft wrap point are dropped.
fn wrap_preserving(text: &str, width: usize) -> Vec<String> {
    let expanded = text.replace('\t', &" ".repeat(TAB_WIDTH));
    let mut rows = Vec::new();

    for raw in expanded.split('\n') {
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            rows.push(raw.chars().take(width).collect());
            continue;
        }

        let indent_len = raw.len() - raw.trim_start().len();
        let indent = &raw[..indent_len];
        let content = raw[indent_len..].trim_end();
        let trailing = &raw[indent_len + content.len()..];
        let options = textwrap::Options::new(width)
            .initial_indent(indent)
            .subsequent_indent(indent)
            .break_words(true);
        // An indent as wide as the row would leave no room for text.
        let wrapped = if indent.width() >= width {
            textwrap::wrap(content, width)
        } else {
            textwrap::wrap(content, options)
        };
        rows.extend(wrapped.into_iter().map(std::borrow::Cow::into_owned));

        if let Some(last) = rows.last_mut() {
            let room = width.saturating_sub(last.width());
            last.extend(trailing.chars().take(room));
        }
    }

    rows
}
