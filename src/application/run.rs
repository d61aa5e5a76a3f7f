//! One telemetry run: generate a workload, order it, replay it to a sink

use crate::infrastructure::log_messages::run as messages;
use crate::scheduler::{sort_for_emission, EmissionScheduler, RunOutcome};
use crate::sink::TelemetrySink;
use crate::workload::WorkloadGenerator;
use crate::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Lifecycle of a run; every run starts over from `Generating`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Generating,
    Sorting,
    Replaying,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub tenants: u32,
    pub generated: usize,
    pub sent: usize,
    pub failed: usize,
    pub outcome: RunOutcome,
}

pub struct TelemetryRun<R> {
    id: Uuid,
    generator: WorkloadGenerator<R>,
    phase: RunPhase,
}

impl<R: Rng> TelemetryRun<R> {
    pub fn new(generator: WorkloadGenerator<R>) -> Self {
        Self {
            id: Uuid::now_v7(),
            generator,
            phase: RunPhase::Generating,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Execute the run against `sink` until done or `cancel` fires
    ///
    /// Generation faults abort the run before anything is sent.
    pub async fn execute<S>(&mut self, sink: &S, cancel: CancellationToken) -> Result<RunReport>
    where
        S: TelemetrySink + ?Sized,
    {
        let span = info_span!("telemetry_run", run_id = %self.id);
        async move {
            info!(at = %telemetry_timestamp(Utc::now()), "{}", messages::STARTED);

            self.phase = RunPhase::Generating;
            let workload = self.generator.generate()?;
            info!(
                events = workload.events.len(),
                tenants = workload.tenant_count,
                "{}",
                messages::ABOUT_TO_EMIT
            );

            self.phase = RunPhase::Sorting;
            let mut events = workload.events;
            sort_for_emission(&mut events);

            self.phase = RunPhase::Replaying;
            let replay = EmissionScheduler::new(cancel)
                .replay_sorted(&events, sink)
                .await;

            let at = telemetry_timestamp(Utc::now());
            self.phase = match replay.outcome {
                RunOutcome::Completed => {
                    info!(%at, sent = replay.sent, failed = replay.failed, "{}", messages::COMPLETED);
                    RunPhase::Completed
                }
                RunOutcome::Cancelled => {
                    info!(%at, sent = replay.sent, failed = replay.failed, "{}", messages::CANCELLED);
                    RunPhase::Cancelled
                }
            };

            Ok(RunReport {
                run_id: self.id,
                tenants: workload.tenant_count,
                generated: replay.generated,
                sent: replay.sent,
                failed: replay.failed,
                outcome: replay.outcome,
            })
        }
        .instrument(span)
        .await
    }
}

/// `yyyy/MM/dd H:mm:ss UTC`
pub fn telemetry_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y/%m/%d %-H:%M:%S UTC").to_string()
}
