//! Log message constants
//!
//! This module centralizes the log messages used by the run driver and the
//! scheduler so the wording stays consistent across log points. Values are
//! attached as structured fields, never interpolated.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting telemetry pulse";
    pub const SCHEDULED: &str = "Telemetry runs scheduled";
    pub const SHUTDOWN_REQUESTED: &str = "Shutdown requested, cancelling active run";
    pub const STOPPED: &str = "Telemetry pulse stopped";
    pub const RUN_FAILED: &str = "Telemetry run failed";
}

/// Per-run messages
pub mod run {
    pub const STARTED: &str = "Telemetry run started";
    pub const ABOUT_TO_EMIT: &str = "About to emit telemetry events";
    pub const COMPLETED: &str = "Telemetry run completed";
    pub const CANCELLED: &str = "Telemetry run cancelled";
    pub const WINDOW_ELAPSED: &str = "Run window elapsed before replay finished";
}

/// Replay (emission scheduler) messages
pub mod replay {
    pub const SEND_FAILED: &str = "Failed to send telemetry event";
    pub const FLUSH_FAILED: &str = "Failed to flush telemetry sink";
    pub const CANCELLED: &str = "Replay cancelled, remaining events dropped";
    pub const NEGATIVE_WAIT: &str = "Events out of order, clamping wait to zero";
}

/// Configuration messages
pub mod configuration {
    pub const CONFIG_LOADED: &str = "Configuration loaded successfully";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_messages_are_not_empty() {
        assert!(application::STARTING.len() > 10);
        assert!(application::STOPPED.len() > 10);
        assert!(run::STARTED.len() > 10);
        assert!(run::COMPLETED.len() > 10);
        assert!(replay::SEND_FAILED.len() > 10);
        assert!(replay::CANCELLED.len() > 10);
        assert!(configuration::CONFIG_LOADED.len() > 10);
    }

    #[test]
    fn test_messages_have_no_placeholders() {
        let all = [
            application::STARTING,
            application::SCHEDULED,
            application::SHUTDOWN_REQUESTED,
            application::STOPPED,
            application::RUN_FAILED,
            run::STARTED,
            run::ABOUT_TO_EMIT,
            run::COMPLETED,
            run::CANCELLED,
            run::WINDOW_ELAPSED,
            replay::SEND_FAILED,
            replay::FLUSH_FAILED,
            replay::CANCELLED,
            replay::NEGATIVE_WAIT,
            configuration::CONFIG_LOADED,
        ];
        for message in all {
            assert!(!message.contains("{}"), "{message}");
        }
    }
}
