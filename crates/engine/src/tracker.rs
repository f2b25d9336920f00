//! Status tracker: decides whether a poll result is news.
//!
//! Two independent channels are tracked: the review status of the newest
//! submission and the text of the most recent cycle failure. Each channel
//! remembers only its immediately previous value, so a value is reported when
//! it differs from the one before it and suppressed when it repeats.
//!
//! State is in-memory for the process lifetime. A restart forgets everything,
//! so the first status seen after startup is always reported.

use homework_common::types::{Submission, Verdict};

/// Last values seen on each channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub last_status: Option<Verdict>,
    pub last_error_text: Option<String>,
}

/// In-memory change detector for statuses and error texts.
#[derive(Debug, Default)]
pub struct StatusTracker {
    state: TrackerState,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chat message for `submission` if its status differs from
    /// the previously seen one, recording the new status.
    pub fn evaluate_status(&mut self, submission: &Submission) -> Option<String> {
        if self.state.last_status == Some(submission.status) {
            tracing::debug!(
                homework = %submission.name,
                status = %submission.status,
                "Homework status unchanged"
            );
            return None;
        }

        tracing::info!(
            homework = %submission.name,
            previous = ?self.state.last_status.map(Verdict::key),
            status = %submission.status,
            "Homework status changed"
        );
        self.state.last_status = Some(submission.status);
        Some(submission.status_message())
    }

    /// Returns `text` if it differs from the previously reported error text,
    /// recording it.
    pub fn evaluate_error(&mut self, text: &str) -> Option<String> {
        if self.state.last_error_text.as_deref() == Some(text) {
            tracing::debug!("Error repeats the previous one, not reporting again");
            return None;
        }

        self.state.last_error_text = Some(text.to_string());
        Some(text.to_string())
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }
}
