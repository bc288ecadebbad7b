use crate::time_series::WpmSample;

/// Standard WPM convention: every five characters count as one word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Counters the session state machine is allowed to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    WordsCompleted,
    TypedCharacters,
    Typos,
}

/// Words per minute for `chars` characters typed over `seconds` seconds.
///
/// Returns `0.0` when no time has elapsed.
pub fn wpm(chars: u64, seconds: u64) -> f64 {
    if seconds == 0 {
        return 0.0;
    }

    (chars as f64 / CHARS_PER_WORD) / (seconds as f64 / 60.0)
}

/// Cumulative counters for one practice session.
///
/// `typed_characters` and `typos` only ever grow until [`StatsEngine::reset`];
/// corrections do not roll them back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsEngine {
    seconds_elapsed: u64,
    words_completed: u64,
    typed_characters: u64,
    typos: u64,
    history: Vec<WpmSample>,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one second and record a WPM sample for it.
    pub fn tick(&mut self) {
        self.seconds_elapsed += 1;
        self.history.push(WpmSample::new(
            self.seconds_elapsed,
            self.raw_wpm(),
            self.net_wpm(),
        ));
    }

    pub fn increment(&mut self, counter: Counter) {
        match counter {
            Counter::WordsCompleted => self.words_completed += 1,
            Counter::TypedCharacters => self.typed_characters += 1,
            Counter::Typos => self.typos += 1,
        }
    }

    /// WPM over every forward-progress character, mistakes included
    pub fn raw_wpm(&self) -> f64 {
        wpm(self.typed_characters, self.seconds_elapsed)
    }

    /// WPM with every mistake taken back out of the character count
    pub fn net_wpm(&self) -> f64 {
        wpm(self.correct_characters(), self.seconds_elapsed)
    }

    /// Percentage of forward-progress characters that were not typos.
    ///
    /// `None` until something has been typed. Re-typing a mistake after a
    /// backspace adds a typo without adding progress, so the result is
    /// clamped at zero.
    pub fn accuracy(&self) -> Option<f64> {
        if self.typed_characters == 0 {
            return None;
        }

        Some(100.0 * self.correct_characters() as f64 / self.typed_characters as f64)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn seconds_elapsed(&self) -> u64 {
        self.seconds_elapsed
    }

    pub fn words_completed(&self) -> u64 {
        self.words_completed
    }

    pub fn typed_characters(&self) -> u64 {
        self.typed_characters
    }

    pub fn typos(&self) -> u64 {
        self.typos
    }

    pub fn history(&self) -> &[WpmSample] {
        &self.history
    }

    fn correct_characters(&self) -> u64 {
        self.typed_characters.saturating_sub(self.typos)
    }
}
