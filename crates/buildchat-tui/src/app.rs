//! Application state and update logic for the buildchat TUI.

use crate::conversation::{ScrollFollower, SCROLL_SPEED};
use crate::event::{key_to_action, Action, Event};
use crate::theme::Theme;
use buildchat_engine::{ChatSession, PendingSubmission};
use crossterm::event::{KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::trace;

/// Which control receives Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    SendButton,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Conversation, input and submission status.
    pub session: ChatSession,

    /// Conversation viewport, driven by log appends.
    pub scroll: ScrollFollower,

    pub focus: Focus,

    pub theme: Theme,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Where the send button was drawn last frame, for mouse hits.
    pub(crate) send_button_area: Rect,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl App {
    /// Create a new app with an empty session.
    pub fn new(theme: Theme) -> Self {
        let mut session = ChatSession::new();
        let scroll = ScrollFollower::new(session.subscribe());
        Self {
            session,
            scroll,
            focus: Focus::Input,
            theme,
            should_quit: false,
            tick: 0,
            send_button_area: Rect::default(),
        }
    }

    /// Apply pending log changes to the viewport. Call before each draw.
    pub fn sync_scroll(&mut self) {
        self.scroll.sync();
    }

    /// Handle one event. Returns a submission the caller must dispatch.
    pub fn handle_event(&mut self, event: Event) -> Option<PendingSubmission> {
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                self.handle_action(key_to_action(key))
            }
            Event::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                if let Some(input) = self.session.input_mut() {
                    input.insert_str(&text);
                    self.focus = Focus::Input;
                }
                None
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if self
                        .send_button_area
                        .contains(Position::new(mouse.column, mouse.row)) =>
                {
                    self.submit()
                }
                MouseEventKind::ScrollUp => {
                    self.scroll.scroll_up(SCROLL_SPEED);
                    None
                }
                MouseEventKind::ScrollDown => {
                    self.scroll.scroll_down(SCROLL_SPEED);
                    None
                }
                _ => None,
            },
            Event::Tick => {
                self.tick = self.tick.wrapping_add(1);
                None
            }
            Event::Resize(..) => None,
            Event::TaskCompleted { id, outcome } => {
                self.session.complete(id, outcome);
                None
            }
        }
    }

    /// Handle a key action.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingSubmission> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return None;
            }
            Action::Submit => return self.submit(),
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Input => Focus::SendButton,
                    Focus::SendButton => Focus::Input,
                };
                return None;
            }
            Action::ScrollUp => self.scroll.scroll_up(1),
            Action::ScrollDown => self.scroll.scroll_down(1),
            Action::PageUp => self.scroll.page_up(),
            Action::PageDown => self.scroll.page_down(),
            Action::None => {}
            edit => self.edit(edit),
        }
        None
    }

    fn edit(&mut self, action: Action) {
        let Some(input) = self.session.input_mut() else {
            trace!(?action, "input locked while sending");
            return;
        };
        match action {
            Action::Insert(c) => input.insert(c),
            Action::Newline => input.insert('\n'),
            Action::Backspace => input.backspace(),
            Action::Delete => input.delete(),
            Action::Left => input.move_left(),
            Action::Right => input.move_right(),
            Action::Home => input.move_home(),
            Action::End => input.move_end(),
            Action::HistoryPrev => input.history_prev(),
            Action::HistoryNext => input.history_next(),
            _ => return,
        }
        self.focus = Focus::Input;
    }

    fn submit(&mut self) -> Option<PendingSubmission> {
        let pending = self.session.submit_input().ok()?;
        self.focus = Focus::Input;
        Some(pending)
    }
}
