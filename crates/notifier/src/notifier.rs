//! Notifier: de-duplicating front for a `MessageSender`.
//!
//! A message identical to the last one actually delivered is dropped. Delivery
//! failures are logged and absorbed: the poll loop keeps running whether or not
//! the chat is reachable, and a failed message stays eligible for the next send.

use crate::telegram::MessageSender;

/// What happened to a message handed to [`Notifier::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Duplicate,
    Failed,
}

pub struct Notifier<S> {
    sender: S,
    last_sent: Option<String>,
}

impl<S: MessageSender> Notifier<S> {
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            last_sent: None,
        }
    }

    /// Deliver `message` unless it repeats the last delivered one. Never fails.
    pub async fn send(&mut self, message: &str) -> DeliveryOutcome {
        if self.last_sent.as_deref() == Some(message) {
            tracing::debug!(text = message, "Message already sent, skipping");
            return DeliveryOutcome::Duplicate;
        }

        match self.sender.send_message(message).await {
            Ok(()) => {
                tracing::debug!(text = message, "Message sent");
                self.last_sent = Some(message.to_string());
                DeliveryOutcome::Sent
            }
            Err(e) => {
                tracing::error!(text = message, error = %e, "Failed to send message");
                DeliveryOutcome::Failed
            }
        }
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    /// The wrapped transport, for callers that need to inspect it (test
    /// doubles record what they were asked to deliver).
    pub fn sender(&self) -> &S {
        &self.sender
    }
}
