//! buildchat-engine: Headless core of the buildchat task console
//!
//! This crate holds everything that does not depend on a rendering
//! technology:
//! - Messages and the append-only conversation log with change subscriptions
//! - The input buffer
//! - The submission controller ([`ChatSession`]) and its state machine
//! - Response text extraction
//! - The task endpoint client and its configuration

pub mod client;
pub mod config;
pub mod input;
pub mod log;
pub mod message;
pub mod response;
pub mod session;

// Re-export commonly used types
pub use client::{HttpTaskClient, TaskClient, TaskRequest, TransportError};
pub use config::{ClientConfig, ConfigError, DEFAULT_ENDPOINT};
pub use input::InputBuffer;
pub use log::{ConversationLog, LogEvent, LogSubscription};
pub use message::{Message, Sender};
pub use response::extract_display_text;
pub use session::{
    ChatSession, Completion, PendingSubmission, SubmissionId, SubmissionStatus, SubmitRejected,
    SEND_FAILED_NOTICE,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
