//! Poll cycle: fetch, validate, evaluate, notify, sleep, forever.
//!
//! One cycle:
//! 1. Fetch statuses since the cursor
//! 2. Validate the payload; on success the cursor moves to `current_date`
//! 3. Validate the newest submission (if any) and ask the tracker whether it is news
//! 4. Hand any resulting message to the notifier
//!
//! Every fetch or shape failure is caught here, logged, passed through the
//! tracker's error channel and, if new, sent to the chat. The cursor is not
//! advanced by a cycle that failed before top-level validation succeeded.

use std::time::Duration;

use homework_common::error::CycleError;
use homework_common::types::Submission;
use homework_engine::{StatusTracker, validate, validate_submission};
use homework_notifier::{MessageSender, Notifier};

use crate::client::HomeworkSource;

/// Result of a single cycle. Failures are values here, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no submissions in the window.
    NoSubmissions,
    /// The newest submission still has the previously reported status.
    StatusUnchanged,
    /// The status changed; carries the message handed to the notifier.
    StatusChanged(String),
    /// The cycle failed; carries the diagnostic text.
    Failed(String),
}

pub struct PollCycle<A, S> {
    source: A,
    notifier: Notifier<S>,
    tracker: StatusTracker,
    cursor: i64,
    retry_period: Duration,
}

impl<A: HomeworkSource, S: MessageSender> PollCycle<A, S> {
    pub fn new(source: A, notifier: Notifier<S>, cursor: i64, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            tracker: StatusTracker::new(),
            cursor,
            retry_period,
        }
    }

    /// Start the polling loop. Runs indefinitely until the task is cancelled.
    pub async fn run(&mut self) {
        tracing::info!(
            cursor = self.cursor,
            retry_period_secs = self.retry_period.as_secs(),
            "Homework poller started"
        );

        loop {
            // `run_once` cannot fail, so the pause below follows every outcome
            self.run_once().await;
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Run one cycle to completion and report what happened.
    pub async fn run_once(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok(None) => {
                tracing::debug!(cursor = self.cursor, "No homework status updates");
                CycleOutcome::NoSubmissions
            }
            Ok(Some(submission)) => match self.tracker.evaluate_status(&submission) {
                None => CycleOutcome::StatusUnchanged,
                Some(message) => {
                    self.notifier.send(&message).await;
                    CycleOutcome::StatusChanged(message)
                }
            },
            Err(e) => {
                let diagnostic = format!("Сбой в работе программы: {e}");
                tracing::error!(error = %e, cursor = self.cursor, "Poll cycle failed");
                if let Some(message) = self.tracker.evaluate_error(&diagnostic) {
                    self.notifier.send(&message).await;
                }
                CycleOutcome::Failed(diagnostic)
            }
        }
    }

    /// Fetch and validate. Returns the newest submission, if the window had any.
    async fn poll(&mut self) -> Result<Option<Submission>, CycleError> {
        let raw = self.source.fetch(self.cursor).await?;
        let response = validate(raw)?;
        self.advance_cursor(response.cursor);

        match response.homeworks.first() {
            None => Ok(None),
            Some(newest) => Ok(Some(validate_submission(newest)?)),
        }
    }

    fn advance_cursor(&mut self, next: i64) {
        if next < self.cursor {
            tracing::warn!(
                cursor = self.cursor,
                next,
                "Server cursor moved backwards"
            );
        }
        self.cursor = next;
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    pub fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }

    #[cfg(test)]
    fn source(&self) -> &A {
        &self.source
    }
}
