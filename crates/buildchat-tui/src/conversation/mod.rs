//! Conversation pane module.
//!
//! The conversation pane shows the message log top-to-bottom:
//! - User messages right-aligned, system messages left-aligned
//! - A hint when the log is empty
//! - Auto-scroll driven by log change events, not by the submit path

mod placeholder;
mod scroll;
mod widget;

pub use placeholder::INPUT_PLACEHOLDER;
pub use scroll::{ScrollFollower, SCROLL_SPEED};
pub use widget::ConversationView;
