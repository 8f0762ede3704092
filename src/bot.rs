use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::CursorPolicy;
use crate::error::{CycleFailure, HomeworkError};
use crate::homework::{check_response, parse_status, response_cursor};
use crate::platform::{send_message, Notifier};
use crate::practicum::HomeworkApi;

/// What a single poll cycle ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified,
    /// The status message matched the last delivered one.
    Unchanged,
    /// The cycle failed and the failure was delivered.
    FailureNotified,
    /// The cycle failed the same way as last time.
    FailureSuppressed,
    /// The API had no homework to report.
    NothingToReport,
    /// A message was due but delivery failed; it is retried next cycle.
    DeliveryFailed,
}

/// Polls the homework API and relays status changes to a chat.
///
/// Owns the deduplication state, so one instance lives for the whole process.
pub struct HomeworkBot<A, N> {
    api: A,
    notifier: N,
    retry_period: Duration,
    cursor_policy: CursorPolicy,
    cursor: i64,
    last_message: Option<String>,
    last_error: Option<String>,
}

impl<A: HomeworkApi, N: Notifier> HomeworkBot<A, N> {
    pub fn new(
        api: A,
        notifier: N,
        retry_period: Duration,
        cursor_policy: CursorPolicy,
        cursor: i64,
    ) -> Self {
        Self {
            api,
            notifier,
            retry_period,
            cursor_policy,
            cursor,
            last_message: None,
            last_error: None,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Fetch, validate and format the current status.
    async fn poll(&mut self) -> Result<String, HomeworkError> {
        let response = self.api.get_api_answer(self.cursor).await?;
        let homework = check_response(&response)?;
        let message = parse_status(homework)?;

        if self.cursor_policy == CursorPolicy::Advance {
            if let Some(next) = response_cursor(&response) {
                debug!("Advancing cursor {} -> {}", self.cursor, next);
                self.cursor = next;
            }
        }

        Ok(message)
    }

    /// Run one cycle without sleeping. Never fails: errors are reported to the chat.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok(message) => {
                if self.last_message.as_deref() == Some(message.as_str()) {
                    debug!("Status unchanged, nothing to send");
                    return CycleOutcome::Unchanged;
                }
                if send_message(&self.notifier, &message).await.is_err() {
                    return CycleOutcome::DeliveryFailed;
                }
                self.last_message = Some(message);
                CycleOutcome::Notified
            }
            Err(source) => {
                let quiet = matches!(source, HomeworkError::EmptyResult);
                let report = CycleFailure::from(source).to_string();
                error!("{}", report);
                if quiet {
                    return CycleOutcome::NothingToReport;
                }
                if self.last_error.as_deref() == Some(report.as_str()) {
                    return CycleOutcome::FailureSuppressed;
                }
                if send_message(&self.notifier, &report).await.is_err() {
                    return CycleOutcome::DeliveryFailed;
                }
                self.last_error = Some(report);
                CycleOutcome::FailureNotified
            }
        }
    }

    /// Poll forever, sleeping `retry_period` after every cycle, until `stop` turns true.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) {
        info!(
            "Polling every {:?} from cursor {} ({} cursor)",
            self.retry_period, self.cursor, self.cursor_policy
        );

        loop {
            let outcome = self.run_cycle().await;
            debug!("Cycle finished: {:?}", outcome);

            if *stop.borrow() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                changed = stop.changed() => {
                    match changed {
                        Ok(()) if *stop.borrow() => break,
                        Ok(()) => {}
                        // Sender gone: nobody can stop us any more, keep the cadence.
                        Err(_) => tokio::time::sleep(self.retry_period).await,
                    }
                }
            }
        }

        info!("Polling stopped");
    }
}
