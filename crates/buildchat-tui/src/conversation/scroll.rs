//! Auto-scroll for the conversation pane.
//!
//! [`ScrollFollower`] listens to the conversation log through a
//! [`LogSubscription`]. Whenever it sees an append it re-anchors the
//! viewport to the newest entry, so any code path that appends a message
//! gets scrolled into view.

use buildchat_engine::{LogEvent, LogSubscription};

/// Lines scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Viewport position over the rendered conversation lines.
#[derive(Debug)]
pub struct ScrollFollower {
    subscription: LogSubscription,
    /// First visible line.
    offset: usize,
    /// Whether the viewport is anchored to the newest entry.
    pinned: bool,
    /// Largest valid offset as of the last render.
    max_offset: usize,
    /// Visible height as of the last render.
    viewport: usize,
}

impl ScrollFollower {
    /// Create a follower anchored to the bottom.
    pub fn new(subscription: LogSubscription) -> Self {
        Self {
            subscription,
            offset: 0,
            pinned: true,
            max_offset: 0,
            viewport: 0,
        }
    }

    /// Consume pending log events. Returns `true` if anything was appended.
    pub fn sync(&mut self) -> bool {
        let mut appended = false;
        for event in self.subscription.drain() {
            match event {
                LogEvent::Appended { .. } => appended = true,
            }
        }
        if appended {
            self.pinned = true;
        }
        appended
    }

    /// Whether the viewport follows the newest entry.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// First visible line as of the last render.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Fix the offset for a render of `total_lines` into `viewport` rows.
    pub fn resolve(&mut self, total_lines: usize, viewport: usize) -> usize {
        self.viewport = viewport;
        self.max_offset = total_lines.saturating_sub(viewport);
        self.offset = if self.pinned {
            self.max_offset
        } else {
            self.offset.min(self.max_offset)
        };
        self.offset
    }

    /// Scroll towards older messages.
    pub fn scroll_up(&mut self, lines: usize) {
        let target = self.offset.min(self.max_offset).saturating_sub(lines);
        if target < self.max_offset {
            self.pinned = false;
        }
        self.offset = target;
    }

    /// Scroll towards newer messages. Reaching the bottom re-anchors.
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
        if self.offset >= self.max_offset {
            self.pinned = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.saturating_sub(1).max(1));
    }
}
