//! Chat session state and the submission controller.
//!
//! A [`ChatSession`] owns everything one mounted chat surface needs: the
//! conversation log, the input buffer, the submission status and the error
//! indicator. It never performs I/O itself. [`ChatSession::submit`] hands
//! back a [`PendingSubmission`] describing the single request to issue, and
//! the caller reports the outcome through [`ChatSession::complete`].
//!
//! ```text
//! Idle --submit(valid text)--> Sending --success--> Idle
//! Sending --failure--> Idle (error set)
//! Idle --submit(blank text)--> Idle (no-op)
//! ```

use crate::client::{TaskClient, TaskRequest, TransportError};
use crate::input::InputBuffer;
use crate::log::{ConversationLog, LogSubscription};
use crate::message::Message;
use crate::response::extract_display_text;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// The one user-visible failure notice.
pub const SEND_FAILED_NOTICE: &str = "Failed to send task request.";

/// Identifies one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

impl SubmissionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Whether a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    /// No outstanding request.
    #[default]
    Idle,
    /// Exactly one outstanding request.
    Sending(SubmissionId),
}

impl SubmissionStatus {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_sending(self) -> bool {
        matches!(self, Self::Sending(_))
    }
}

/// An accepted submission whose request still has to be issued.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub request: TaskRequest,
}

/// Why a submit call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// Text was empty after trimming. Never shown to the user.
    #[error("nothing to submit")]
    Blank,
    /// A request is already outstanding.
    #[error("a task request is already in flight")]
    InFlight,
}

/// What [`ChatSession::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A system message was appended.
    Answered,
    /// The error indicator was set.
    Failed,
    /// The id did not match the outstanding submission; nothing changed.
    Stale,
}

/// Owned state for one chat surface.
#[derive(Debug, Default)]
pub struct ChatSession {
    log: ConversationLog,
    input: InputBuffer,
    status: SubmissionStatus,
    error: Option<String>,
    next_id: u64,
}

impl ChatSession {
    /// Create an empty, idle session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Observe future log appends.
    pub fn subscribe(&mut self) -> LogSubscription {
        self.log.subscribe()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Mutable input access. Edits are ignored while a request is in flight.
    pub fn input_mut(&mut self) -> Option<&mut InputBuffer> {
        if self.status.is_sending() {
            None
        } else {
            Some(&mut self.input)
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_sending(&self) -> bool {
        self.status.is_sending()
    }

    /// Current error notice, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the explicit submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.status.is_idle() && !self.input.is_blank()
    }

    /// Submit whatever is in the input buffer.
    pub fn submit_input(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        let text = self.input.content().to_string();
        self.submit(&text)
    }

    /// Accept `raw_text` as a new task.
    ///
    /// On success the user message is already in the log, the input buffer
    /// is empty and the session is `Sending`. The caller must issue exactly
    /// one request for the returned submission.
    pub fn submit(&mut self, raw_text: &str) -> Result<PendingSubmission, SubmitRejected> {
        let task = raw_text.trim();
        if task.is_empty() {
            trace!("ignoring blank submission");
            return Err(SubmitRejected::Blank);
        }
        if self.status.is_sending() {
            trace!("ignoring submission while a request is in flight");
            return Err(SubmitRejected::InFlight);
        }

        self.error = None;
        self.log.append(Message::user(task));
        self.input.commit(task);

        self.next_id += 1;
        let id = SubmissionId(self.next_id);
        self.status = SubmissionStatus::Sending(id);
        debug!(submission = id.get(), chars = task.len(), "task submitted");

        Ok(PendingSubmission {
            id,
            request: TaskRequest::new(task),
        })
    }

    /// Resolve the outstanding submission with its outcome.
    pub fn complete(
        &mut self,
        id: SubmissionId,
        outcome: Result<Value, TransportError>,
    ) -> Completion {
        if self.status != SubmissionStatus::Sending(id) {
            warn!(submission = id.get(), "dropping completion for unknown submission");
            return Completion::Stale;
        }
        self.status = SubmissionStatus::Idle;

        match outcome {
            Ok(body) => {
                debug!(submission = id.get(), "task request answered");
                self.log.append(Message::system(extract_display_text(&body)));
                Completion::Answered
            }
            Err(err) => {
                warn!(submission = id.get(), error = %err, "task request failed");
                self.error = Some(SEND_FAILED_NOTICE.to_string());
                Completion::Failed
            }
        }
    }

    /// Submit the input buffer and wait for `client` in one step.
    ///
    /// Used where nothing else needs to run while the request is
    /// outstanding, such as the one-shot CLI.
    pub async fn submit_and_wait<C: TaskClient>(
        &mut self,
        client: &C,
    ) -> Result<Completion, SubmitRejected> {
        let pending = self.submit_input()?;
        let outcome = client.submit_task(&pending.request).await;
        Ok(self.complete(pending.id, outcome))
    }
}
