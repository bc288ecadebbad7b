use std::collections::BTreeSet;

/// The text being practiced, split into words on single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeText {
    source: String,
    words: Vec<Vec<char>>,
}

impl PracticeText {
    pub fn new(text: impl Into<String>) -> Self {
        let source = text.into();
        // `split` always yields at least one (possibly empty) word
        let words = source.split(' ').map(|w| w.chars().collect()).collect();

        Self { source, words }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn words(&self) -> &[Vec<char>] {
        &self.words
    }

    pub fn word(&self, idx: usize) -> &[char] {
        &self.words[idx]
    }

    pub fn word_len(&self, idx: usize) -> usize {
        self.words[idx].len()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.is_empty())
    }

    pub fn last_index(&self) -> usize {
        self.words.len() - 1
    }

    /// Number of whitespace separated tokens, as shown by the words counter
    pub fn display_word_count(&self) -> usize {
        self.source.split_whitespace().count()
    }
}

/// Zero-based cursor into a [`PracticeText`].
///
/// `letter == word_len(word)` means the word is fully typed and a space is
/// expected next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypingPosition {
    pub word: usize,
    pub letter: usize,
}

impl TypingPosition {
    pub fn new(word: usize, letter: usize) -> Self {
        Self { word, letter }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypoKey {
    pub word: usize,
    pub letter: usize,
}

impl TypoKey {
    pub fn new(word: usize, letter: usize) -> Self {
        Self { word, letter }
    }
}

impl From<TypingPosition> for TypoKey {
    fn from(p: TypingPosition) -> Self {
        Self {
            word: p.word,
            letter: p.letter,
        }
    }
}

/// Slots whose current character was mistyped and not yet backspaced over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypoSet(BTreeSet<TypoKey>);

impl TypoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TypoKey) -> bool {
        self.0.insert(key)
    }

    pub fn remove(&mut self, key: &TypoKey) -> bool {
        self.0.remove(key)
    }

    pub fn contains(&self, word: usize, letter: usize) -> bool {
        self.0.contains(&TypoKey::new(word, letter))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypoKey> {
        self.0.iter()
    }
}
