use std::time::{Duration, Instant};

/// Converts wall-clock time into whole-second ticks while running.
///
/// Start and stop may be called any number of times; only the first start
/// (or stop) of a run has an effect. Time accumulated towards the next
/// tick is kept across stop/start, so pausing never skips or doubles a tick.
#[derive(Debug, Clone, Default)]
pub struct SecondTimer {
    running_since: Option<Instant>,
    banked: Duration,
}

impl SecondTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn stop(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
    }

    /// Drop the current run and any partial second.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Number of whole seconds completed since the previous poll.
    pub fn poll(&mut self, now: Instant) -> u64 {
        if let Some(since) = self.running_since {
            self.banked += now.saturating_duration_since(since);
            self.running_since = Some(now);
        }

        let whole = self.banked.as_secs();
        self.banked -= Duration::from_secs(whole);
        whole
    }

    /// Time banked but not yet turned into ticks by [`SecondTimer::poll`]
    pub fn pending(&self) -> Duration {
        self.banked
    }
}
