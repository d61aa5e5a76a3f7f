//! Emission scheduling: replays a run's events to a sink in delay order,
//! sleeping between consecutive events to reproduce their relative spacing

use crate::domain::event::TelemetryEvent;
use crate::infrastructure::log_messages::replay;
use crate::sink::TelemetrySink;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Terminal state of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every event was offered to the sink
    Completed,
    /// The host cut the replay short; the remaining events were not sent
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub generated: usize,
    pub sent: usize,
    pub failed: usize,
    /// Sum of the waits actually requested between events
    pub scheduled_wait: Duration,
    pub outcome: RunOutcome,
}

impl ReplayReport {
    fn new(generated: usize) -> Self {
        Self {
            generated,
            sent: 0,
            failed: 0,
            scheduled_wait: Duration::ZERO,
            outcome: RunOutcome::Completed,
        }
    }

    /// Events handed to the sink, successfully or not
    pub fn delivered(&self) -> usize {
        self.sent + self.failed
    }
}

/// Order events by delay, keeping insertion order among equal delays
pub fn sort_for_emission(events: &mut [TelemetryEvent]) {
    events.sort_by_key(TelemetryEvent::delay);
}

/// Paces a run's events against a sink under a cancellation token
#[derive(Debug, Clone)]
pub struct EmissionScheduler {
    cancel: CancellationToken,
}

impl EmissionScheduler {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Sort `events` and deliver them at their offsets from the replay start
    ///
    /// A failed send is logged and counted; the replay moves on. Cancellation
    /// is checked while waiting and again right before each send.
    pub async fn replay<S>(&self, mut events: Vec<TelemetryEvent>, sink: &S) -> ReplayReport
    where
        S: TelemetrySink + ?Sized,
    {
        sort_for_emission(&mut events);
        self.replay_sorted(&events, sink).await
    }

    /// Deliver events already in emission order
    pub async fn replay_sorted<S>(&self, events: &[TelemetryEvent], sink: &S) -> ReplayReport
    where
        S: TelemetrySink + ?Sized,
    {
        let mut report = ReplayReport::new(events.len());
        let mut previous_delay = 0u64;

        for event in events {
            let delay = event.delay_millis();
            let wait_ms = delay.checked_sub(previous_delay).unwrap_or_else(|| {
                warn!(delay, previous_delay, "{}", replay::NEGATIVE_WAIT);
                0
            });

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return self.cancelled(report);
                }
                _ = tokio::time::sleep(Duration::from_millis(wait_ms)) => {}
            }
            report.scheduled_wait += Duration::from_millis(wait_ms);
            previous_delay = delay;

            if self.cancel.is_cancelled() {
                return self.cancelled(report);
            }

            debug!("{event}");
            match sink.send(event).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(error = %e, delay, "{}", replay::SEND_FAILED);
                    report.failed += 1;
                }
            }
        }

        if let Err(e) = sink.flush().await {
            warn!(error = %e, "{}", replay::FLUSH_FAILED);
        }

        report
    }

    fn cancelled(&self, mut report: ReplayReport) -> ReplayReport {
        info!(
            sent = report.sent,
            remaining = report.generated - report.delivered(),
            "{}",
            replay::CANCELLED
        );
        report.outcome = RunOutcome::Cancelled;
        report
    }
}
