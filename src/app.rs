use std::time::Instant;

use crate::config::{Config, Mode};
use crate::session::{Key, Session, Signals};
use crate::stats::StatsEngine;
use crate::text_provider::TextProvider;
use crate::timer::SecondTimer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
pub enum Lifecycle {
    #[default]
    Idle,
    Active,
    Finished,
}

/// Handle for one practice session.
///
/// Presentation code reads through the accessors; only keystrokes, ticks,
/// focus changes and resets mutate it.
pub struct App {
    session: Session,
    stats: StatsEngine,
    lifecycle: Lifecycle,
    focused: bool,
    timer: SecondTimer,
    config: Config,
    provider: Box<dyn TextProvider>,
}

impl App {
    pub fn new(config: Config, mut provider: Box<dyn TextProvider>) -> Self {
        let text = provider.random_text();
        tracing::info!(words = text.split(' ').count(), "new practice text");

        Self {
            session: Session::new(text),
            stats: StatsEngine::new(),
            lifecycle: Lifecycle::Idle,
            focused: true,
            timer: SecondTimer::new(),
            config,
            provider,
        }
    }

    pub fn on_key(&mut self, key: Key, now: Instant) -> Signals {
        if !self.focused || self.lifecycle == Lifecycle::Finished {
            return Signals::default();
        }

        // seconds that ran out before this key belong to the counters as they were
        self.on_tick(now);

        let signals = self
            .session
            .handle_key(key, self.config.case_sensitive, &mut self.stats);

        if signals.started {
            self.transition(Lifecycle::Active);
        }
        if signals.finished {
            self.transition(Lifecycle::Finished);
            tracing::info!(
                seconds = self.stats.seconds_elapsed(),
                raw_wpm = self.stats.raw_wpm(),
                accuracy = ?self.stats.accuracy(),
                "session finished"
            );
        }

        self.sync_timer(now);
        signals
    }

    /// Turn elapsed wall-clock time into statistics ticks.
    ///
    /// Safe to call as often as wanted; only whole seconds of active typing
    /// produce ticks.
    pub fn on_tick(&mut self, now: Instant) {
        let seconds = self.timer.poll(now);
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        for _ in 0..seconds {
            self.stats.tick();
        }
    }

    pub fn set_focus(&mut self, focused: bool, now: Instant) {
        if self.focused != focused {
            tracing::debug!(focused, "focus changed");
        }
        self.focused = focused;
        self.sync_timer(now);
    }

    /// Start over with a fresh text from the provider.
    pub fn reset(&mut self, now: Instant) {
        let text = self.provider.random_text();
        self.reset_with(text, now);
    }

    /// Start over on the same text.
    pub fn restart(&mut self, now: Instant) {
        let text = self.session.text().source().to_string();
        self.reset_with(text, now);
    }

    fn reset_with(&mut self, text: String, now: Instant) {
        self.timer.cancel();
        tracing::info!(words = text.split(' ').count(), "new practice text");
        self.session.reset_for_new_text(text);
        self.stats.reset();
        self.transition(Lifecycle::Idle);
        self.focused = true;
        self.sync_timer(now);
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.configure(|cfg| cfg.mode = mode)
    }

    pub fn toggle_case_sensitive(&mut self) -> bool {
        self.configure(|cfg| cfg.case_sensitive = !cfg.case_sensitive)
    }

    pub fn toggle_realtime_stats(&mut self) -> bool {
        self.configure(|cfg| cfg.show_realtime_stats = !cfg.show_realtime_stats)
    }

    /// Config can only change while the user is not mid-text.
    pub fn is_typing(&self) -> bool {
        self.lifecycle == Lifecycle::Active && self.focused
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> &StatsEngine {
        &self.stats
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    fn configure(&mut self, change: impl FnOnce(&mut Config)) -> bool {
        if self.is_typing() {
            return false;
        }
        change(&mut self.config);
        tracing::debug!(config = ?self.config, "config changed");
        true
    }

    fn transition(&mut self, to: Lifecycle) {
        if self.lifecycle != to {
            tracing::debug!(from = %self.lifecycle, %to, "lifecycle");
            self.lifecycle = to;
        }
    }

    fn sync_timer(&mut self, now: Instant) {
        if self.is_typing() {
            self.timer.start(now);
        } else {
            self.on_tick(now);
            self.timer.stop(now);
        }
    }
}
