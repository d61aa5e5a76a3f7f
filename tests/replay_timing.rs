//! Timing and cancellation behaviour of a full replay, on a paused clock

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use telemetry_pulse::domain::config_types::{DrawBound, RunWindowMillis};
use telemetry_pulse::scheduler::{EmissionScheduler, RunOutcome};
use telemetry_pulse::sink::MemorySink;
use telemetry_pulse::workload::{WorkloadGenerator, WorkloadProfile};
use tokio_util::sync::CancellationToken;

fn profile() -> WorkloadProfile {
    WorkloadProfile {
        max_delay: RunWindowMillis::try_new(30_000).unwrap(),
        max_tenants: DrawBound::try_new(3).unwrap(),
        max_operations: DrawBound::try_new(10).unwrap(),
        ..WorkloadProfile::default()
    }
}

#[tokio::test(start_paused = true)]
async fn cumulative_wait_reconstructs_the_schedule() {
    let workload = WorkloadGenerator::with_default_builders(profile(), StdRng::seed_from_u64(17))
        .generate()
        .unwrap();
    let last_delay = workload
        .events
        .iter()
        .map(|e| e.delay_millis())
        .max()
        .unwrap();

    let sink = MemorySink::new();
    let start = tokio::time::Instant::now();
    let report = EmissionScheduler::new(CancellationToken::new())
        .replay(workload.events, &sink)
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.scheduled_wait, Duration::from_millis(last_delay));
    assert!(start.elapsed() >= Duration::from_millis(last_delay));

    let sent = sink.events();
    assert_eq!(sent.len(), report.generated);
    assert!(sent
        .windows(2)
        .all(|pair| pair[0].delay_millis() <= pair[1].delay_millis()));
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_replay_leaves_events_unsent() {
    let workload = WorkloadGenerator::with_default_builders(profile(), StdRng::seed_from_u64(4))
        .generate()
        .unwrap();
    let generated = workload.events.len();
    let mut delays: Vec<u64> = workload.events.iter().map(|e| e.delay_millis()).collect();
    delays.sort_unstable();
    let cutoff = delays[generated / 2];

    let cancel = CancellationToken::new();
    let timer = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(cutoff) + Duration::from_micros(500)).await;
            cancel.cancel();
        })
    };

    let sink = MemorySink::new();
    let report = EmissionScheduler::new(cancel)
        .replay(workload.events, &sink)
        .await;
    timer.await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(report.sent < generated);
    assert!(sink
        .events()
        .iter()
        .all(|event| event.delay_millis() <= cutoff));
}
