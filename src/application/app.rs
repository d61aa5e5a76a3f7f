use crate::application::run::{RunReport, TelemetryRun};
use crate::config::Settings;
use crate::infrastructure::log_messages::{application as messages, run as run_messages};
use crate::workload::WorkloadGenerator;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Timer host: fires runs on a fixed cadence until shut down
pub struct Application {
    settings: Settings,
    shutdown: CancellationToken,
}

impl Application {
    #[instrument]
    pub async fn new() -> Result<Self> {
        let settings = Settings::new()?;
        Ok(Self::with_settings(settings))
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancelling this token stops the schedule and the active replay
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let schedule = &self.settings.schedule;
        info!(
            interval_secs = %schedule.interval_secs,
            window_ms = %self.settings.run.window_ms,
            sink = %self.settings.sink.kind,
            "{}",
            messages::SCHEDULED
        );
        self.listen_for_shutdown();

        if schedule.run_once {
            self.run_and_log(0).await;
            info!("{}", messages::STOPPED);
            return Ok(());
        }

        let mut ticker = tokio::time::interval(schedule.interval_secs.as_duration());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if !schedule.run_on_startup {
            // the first tick completes immediately
            ticker.tick().await;
        }

        let mut run_number = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            self.run_and_log(run_number).await;
            run_number += 1;
        }

        info!("{}", messages::STOPPED);
        Ok(())
    }

    /// Execute a single run with its own sink, bounded by the run budget
    pub async fn run_once(&self, run_number: u64) -> Result<RunReport> {
        let rng = match self.settings.run.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_number)),
            None => StdRng::from_os_rng(),
        };
        let generator =
            WorkloadGenerator::with_default_builders(self.settings.workload_profile(), rng);
        let mut run = TelemetryRun::new(generator);
        let sink = self
            .settings
            .sink
            .kind
            .create(&self.settings.envelope_defaults());

        let cancel = self.shutdown.child_token();
        let budget = self.settings.run_budget();
        let deadline = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(budget).await;
                warn!("{}", run_messages::WINDOW_ELAPSED);
                cancel.cancel();
            })
        };

        let result = run.execute(sink.as_ref(), cancel).await;
        deadline.abort();
        result
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn run_and_log(&self, run_number: u64) {
        if let Err(e) = self.run_once(run_number).await {
            error!(
                error = %e,
                consistency_fault = e.is_consistency_fault(),
                "{}",
                messages::RUN_FAILED
            );
        }
    }

    fn listen_for_shutdown(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                signal = tokio::signal::ctrl_c() => {
                    if signal.is_ok() {
                        info!("{}", messages::SHUTDOWN_REQUESTED);
                    }
                    shutdown.cancel();
                }
            }
        });
    }
}
