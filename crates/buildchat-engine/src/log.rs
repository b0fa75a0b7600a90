//! Append-only conversation log.
//!
//! The log exposes exactly one mutation, [`ConversationLog::append`]. Every
//! append is published to the log's subscribers so that derived effects
//! (auto-scroll, redraw) can react without being wired into whatever code
//! path produced the message.

use crate::message::Message;
use tokio::sync::mpsc;

/// Change notification published by a [`ConversationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A message was appended at `index`.
    Appended {
        /// Position of the new message (always the last one).
        index: usize,
        /// Id of the new message.
        id: String,
    },
}

/// Receiving end of a log subscription.
///
/// Dropping it unsubscribes; the log prunes closed senders on its next
/// publish.
#[derive(Debug)]
pub struct LogSubscription {
    rx: mpsc::UnboundedReceiver<LogEvent>,
}

impl LogSubscription {
    /// Take the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<LogEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain every pending event.
    pub fn drain(&mut self) -> Vec<LogEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_next() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event. Returns `None` once the log is dropped.
    pub async fn next(&mut self) -> Option<LogEvent> {
        self.rx.recv().await
    }
}

/// Ordered, append-only sequence of messages.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    subscribers: Vec<mpsc::UnboundedSender<LogEvent>>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for future appends.
    pub fn subscribe(&mut self) -> LogSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        LogSubscription { rx }
    }

    /// Add a message to the end of the log and notify subscribers.
    pub fn append(&mut self, message: Message) {
        let event = LogEvent::Appended {
            index: self.messages.len(),
            id: message.id().to_string(),
        };
        self.messages.push(message);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}
