use crate::practice_text::{PracticeText, TypingPosition, TypoKey, TypoSet};
use crate::stats::{Counter, StatsEngine};

/// A single key event as the typing session sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    /// Arrows, tab, function keys, modified keys...
    Ignored,
}

/// Lifecycle signals raised while handling a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub started: bool,
    pub finished: bool,
}

/// How a single letter of the practice text should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    Pending,
    Correct,
    Typo,
    Completed,
}

/// Per-keystroke typing state for one practice text.
///
/// Statistics are not owned here: every key is handled against a
/// [`StatsEngine`] passed in by the caller, which only receives counter
/// increments.
#[derive(Debug, Clone)]
pub struct Session {
    text: PracticeText,
    position: TypingPosition,
    typos: TypoSet,
    // furthest forward progress across the whole text, backspace included
    char_count: i64,
    started: bool,
    finished: bool,
}

impl Session {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: PracticeText::new(text),
            position: TypingPosition::default(),
            typos: TypoSet::new(),
            char_count: 0,
            started: false,
            finished: false,
        }
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        case_sensitive: bool,
        stats: &mut StatsEngine,
    ) -> Signals {
        if self.finished {
            return Signals::default();
        }

        match key {
            Key::Ignored => Signals::default(),
            Key::Backspace => {
                self.backspace();
                Signals::default()
            }
            Key::Char(c) => self.type_char(c, case_sensitive, stats),
        }
    }

    /// Swap in a new text and rewind the cursor. Statistics are left alone.
    pub fn reset_for_new_text(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }

    pub fn text(&self) -> &PracticeText {
        &self.text
    }

    pub fn position(&self) -> TypingPosition {
        self.position
    }

    pub fn typos(&self) -> &TypoSet {
        &self.typos
    }

    pub fn is_typo(&self, word: usize, letter: usize) -> bool {
        self.typos.contains(word, letter)
    }

    pub fn char_count(&self) -> i64 {
        self.char_count
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn has_finished(&self) -> bool {
        self.finished
    }

    /// True when the current word is fully typed and a space is expected
    pub fn awaiting_separator(&self) -> bool {
        self.position.letter == self.text.word_len(self.position.word)
    }

    pub fn letter_state(&self, word: usize, letter: usize) -> LetterState {
        if self.typos.contains(word, letter) {
            LetterState::Typo
        } else if word < self.position.word {
            LetterState::Completed
        } else if word == self.position.word && letter < self.position.letter {
            LetterState::Correct
        } else {
            LetterState::Pending
        }
    }

    fn backspace(&mut self) {
        let TypingPosition { word, letter } = self.position;

        // never crosses into the previous word
        if letter > 0 {
            self.typos.remove(&TypoKey::new(word, letter - 1));
            self.position.letter -= 1;
        }
        // decremented even at the start of a word
        self.char_count -= 1;
    }

    fn type_char(&mut self, c: char, case_sensitive: bool, stats: &mut StatsEngine) -> Signals {
        let mut signals = Signals::default();
        let TypingPosition { word, letter } = self.position;
        let word_len = self.text.word_len(word);

        if word == 0 && letter == 0 && !self.started {
            self.started = true;
            signals.started = true;
            tracing::debug!("session started");
        }

        if word == self.text.last_index() && letter + 1 == word_len {
            self.finished = true;
            signals.finished = true;
            tracing::debug!("session finished");
        }

        if letter == word_len {
            if c == ' ' && word < self.text.last_index() {
                self.position = TypingPosition::new(word + 1, 0);
                stats.increment(Counter::WordsCompleted);
            }
            return signals;
        }

        let expected = self.text.word(word)[letter];
        if !chars_match(expected, c, case_sensitive) {
            self.typos.insert(TypoKey::new(word, letter));
            stats.increment(Counter::Typos);
        }

        if self.char_count >= 0 && self.char_count as u64 >= stats.typed_characters() {
            stats.increment(Counter::TypedCharacters);
        }

        self.position.letter += 1;
        self.char_count += 1;

        signals
    }
}

fn chars_match(expected: char, typed: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        expected == typed
    } else {
        expected.to_lowercase().eq(typed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn type_str(session: &mut Session, stats: &mut StatsEngine, s: &str) -> Vec<Signals> {
        s.chars()
            .map(|c| session.handle_key(Key::Char(c), true, stats))
            .collect()
    }

    #[test]
    fn test_cat_dog_scenario() {
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "cat");
        assert_eq!(session.position(), TypingPosition::new(0, 3));
        assert_eq!(stats.typed_characters(), 3);
        assert_eq!(stats.typos(), 0);

        type_str(&mut session, &mut stats, " ");
        assert_eq!(stats.words_completed(), 1);
        assert_eq!(session.position(), TypingPosition::new(1, 0));

        type_str(&mut session, &mut stats, "x");
        assert!(session.is_typo(1, 0));
        assert_eq!(stats.typos(), 1);
        assert_eq!(stats.typed_characters(), 4);
        assert_eq!(session.position(), TypingPosition::new(1, 1));

        session.handle_key(Key::Backspace, true, &mut stats);
        assert!(session.typos().is_empty());
        assert_eq!(session.position(), TypingPosition::new(1, 0));
        // the shadow counter rewinds, the cumulative one does not
        assert_eq!(session.char_count(), 3);
        assert_eq!(stats.typed_characters(), 4);
        assert_eq!(stats.typos(), 1);
    }

    #[test]
    fn test_retyping_after_backspace_does_not_recount_progress() {
        let mut session = Session::new("cat");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "ca");
        session.handle_key(Key::Backspace, true, &mut stats);
        type_str(&mut session, &mut stats, "a");

        assert_eq!(stats.typed_characters(), 2);
        assert_eq!(session.position(), TypingPosition::new(0, 2));
    }

    #[test]
    fn test_correction_restores_position_and_typos() {
        let mut session = Session::new("hello world");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "hello wxr");
        let position = session.position();
        let typos = session.typos().clone();
        let typed = stats.typed_characters();
        let typo_count = stats.typos();

        for _ in 0..2 {
            session.handle_key(Key::Backspace, true, &mut stats);
        }
        type_str(&mut session, &mut stats, "xr");

        assert_eq!(session.position(), position);
        assert_eq!(session.typos(), &typos);
        assert_eq!(stats.typed_characters(), typed);
        assert!(stats.typos() >= typo_count);
    }

    #[test]
    fn test_backspace_cannot_cross_word_boundary() {
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "cat ");
        session.handle_key(Key::Backspace, true, &mut stats);

        assert_eq!(session.position(), TypingPosition::new(1, 0));
        assert_eq!(stats.words_completed(), 1);
    }

    #[test]
    fn test_backspace_at_word_start_still_rewinds_shadow_counter() {
        // Quirk kept on purpose: the shadow counter moves without the cursor,
        // so the next letter is not counted as forward progress.
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "cat ");
        session.handle_key(Key::Backspace, true, &mut stats);
        assert_eq!(session.char_count(), 2);

        type_str(&mut session, &mut stats, "d");
        assert_eq!(stats.typed_characters(), 3);
        assert_eq!(session.position(), TypingPosition::new(1, 1));
    }

    #[test]
    fn test_backspace_on_fresh_session_goes_negative() {
        let mut session = Session::new("ab");
        let mut stats = StatsEngine::new();

        session.handle_key(Key::Backspace, true, &mut stats);
        assert_eq!(session.char_count(), -1);
        assert_eq!(session.position(), TypingPosition::new(0, 0));

        type_str(&mut session, &mut stats, "a");
        assert_eq!(stats.typed_characters(), 0);
    }

    #[test]
    fn test_word_boundary_only_accepts_space() {
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "catx");
        assert_eq!(session.position(), TypingPosition::new(0, 3));
        assert!(session.awaiting_separator());
        assert_eq!(stats.typos(), 0);
        assert_eq!(stats.typed_characters(), 3);
    }

    #[test]
    fn test_space_mid_word_is_a_typo() {
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "c ");
        assert!(session.is_typo(0, 1));
        assert_eq!(session.position(), TypingPosition::new(0, 2));
        assert_eq!(stats.words_completed(), 0);
    }

    #[test]
    fn test_ignored_keys_do_nothing() {
        let mut session = Session::new("cat");
        let mut stats = StatsEngine::new();

        let signals = session.handle_key(Key::Ignored, true, &mut stats);

        assert_eq!(signals, Signals::default());
        assert_eq!(session.position(), TypingPosition::default());
        assert_eq!(session.char_count(), 0);
        assert_eq!(stats, StatsEngine::new());
    }

    #[test]
    fn test_started_fires_once() {
        let mut session = Session::new("cat dog");
        let mut stats = StatsEngine::new();

        let first = session.handle_key(Key::Char('c'), true, &mut stats);
        assert_matches!(first, Signals { started: true, finished: false });

        session.handle_key(Key::Backspace, true, &mut stats);
        assert_eq!(session.position(), TypingPosition::new(0, 0));

        let again = session.handle_key(Key::Char('c'), true, &mut stats);
        assert!(!again.started);
        assert!(session.has_started());
    }

    #[test]
    fn test_finished_fires_on_last_letter_even_if_wrong() {
        let mut session = Session::new("ab cd");
        let mut stats = StatsEngine::new();

        let signals = type_str(&mut session, &mut stats, "ab cx");

        let finished: Vec<bool> = signals.iter().map(|s| s.finished).collect();
        assert_eq!(finished, vec![false, false, false, false, true]);
        assert!(session.has_finished());
        assert!(session.is_typo(1, 1));
        assert_eq!(stats.typos(), 1);
        assert_eq!(session.position(), TypingPosition::new(1, 2));
    }

    #[test]
    fn test_keys_after_finish_are_ignored() {
        let mut session = Session::new("ab");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "ab");
        let before = stats.clone();

        session.handle_key(Key::Backspace, true, &mut stats);
        let signals = session.handle_key(Key::Char('b'), true, &mut stats);

        assert_eq!(signals, Signals::default());
        assert_eq!(session.position(), TypingPosition::new(0, 2));
        assert_eq!(stats, before);
    }

    #[test]
    fn test_single_letter_text_starts_and_finishes_together() {
        let mut session = Session::new("a");
        let mut stats = StatsEngine::new();

        let signals = session.handle_key(Key::Char('a'), true, &mut stats);

        assert_eq!(
            signals,
            Signals {
                started: true,
                finished: true
            }
        );
    }

    #[test]
    fn test_case_insensitive_matching() {
        let mut session = Session::new("cat");
        let mut stats = StatsEngine::new();

        for c in "CAT".chars() {
            session.handle_key(Key::Char(c), false, &mut stats);
        }

        assert_eq!(stats.typos(), 0);
        assert!(session.typos().is_empty());
    }

    #[test]
    fn test_case_sensitive_matching() {
        let mut session = Session::new("cat");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "CAT");

        assert_eq!(stats.typos(), 3);
        assert_eq!(session.typos().len(), 3);
    }

    #[test]
    fn test_space_on_last_word_keeps_cursor_in_range() {
        let mut session = Session::new("ab ");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "ab  ");

        assert_eq!(session.position(), TypingPosition::new(1, 0));
        assert_eq!(stats.words_completed(), 1);
        assert!(!session.has_finished());
    }

    #[test]
    fn test_counters_never_invert_on_first_pass() {
        let mut session = Session::new("the quick brown fox");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "thx quixk brzwn fxx");

        assert!(stats.typed_characters() >= stats.typos());
        let accuracy = stats.accuracy().unwrap();
        assert!((0.0..=100.0).contains(&accuracy));
    }

    #[test]
    fn test_retyped_mistakes_can_outnumber_progress() {
        let mut session = Session::new("ab");
        let mut stats = StatsEngine::new();

        for _ in 0..3 {
            type_str(&mut session, &mut stats, "x");
            session.handle_key(Key::Backspace, true, &mut stats);
        }

        assert_eq!(stats.typed_characters(), 1);
        assert_eq!(stats.typos(), 3);
        assert_eq!(stats.accuracy(), Some(0.0));
    }

    #[test]
    fn test_letter_states() {
        let mut session = Session::new("ab cd");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "ax c");

        assert_eq!(session.letter_state(0, 0), LetterState::Completed);
        assert_eq!(session.letter_state(0, 1), LetterState::Typo);
        assert_eq!(session.letter_state(1, 0), LetterState::Correct);
        assert_eq!(session.letter_state(1, 1), LetterState::Pending);
    }

    #[test]
    fn test_reset_for_new_text() {
        let mut session = Session::new("cat");
        let mut stats = StatsEngine::new();

        type_str(&mut session, &mut stats, "cx");
        session.reset_for_new_text("dog bird");

        assert_eq!(session.text().len(), 2);
        assert_eq!(session.position(), TypingPosition::default());
        assert!(session.typos().is_empty());
        assert_eq!(session.char_count(), 0);
        assert!(!session.has_started());
        // stats are the caller's business
        assert_eq!(stats.typed_characters(), 2);
    }
}
