//! Reusable widgets for the chat screen.

mod footer;
mod input_bar;
mod send_button;

pub use footer::{ErrorLine, FooterHints};
pub use input_bar::{InputBar, INPUT_ROWS};
pub use send_button::SendButton;
