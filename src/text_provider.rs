use cgisf_lib::cgisf;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

static TEXT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/texts");

/// Supplies practice strings on demand
pub trait TextProvider {
    fn random_text(&mut self) -> String;
}

#[derive(Debug, Error)]
pub enum TextError {
    #[error("no embedded passage set named {0:?}")]
    NotFound(String),
    #[error("passage set {0:?} is not valid utf-8")]
    Encoding(String),
    #[error("passage set {name:?} could not be parsed: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("passage set {0:?} is empty")]
    Empty(String),
}

#[derive(Deserialize, Clone, Debug)]
pub struct PassageSet {
    pub name: String,
    pub passages: Vec<String>,
}

impl PassageSet {
    pub fn embedded(name: &str) -> Result<Self, TextError> {
        let file = TEXT_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| TextError::NotFound(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| TextError::Encoding(name.to_string()))?;

        Self::from_json(name, contents)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, TextError> {
        let set: PassageSet = serde_json::from_str(json).map_err(|source| TextError::Parse {
            name: name.to_string(),
            source,
        })?;

        if set.passages.is_empty() {
            return Err(TextError::Empty(name.to_string()));
        }
        Ok(set)
    }
}

/// Picks passages from an embedded set, never the same one twice in a row
#[derive(Debug, Clone)]
pub struct PassageProvider {
    set: PassageSet,
    last: Option<usize>,
}

impl PassageProvider {
    pub fn new(set: PassageSet) -> Self {
        Self { set, last: None }
    }

    pub fn english() -> Result<Self, TextError> {
        PassageSet::embedded("english").map(Self::new)
    }
}

impl TextProvider for PassageProvider {
    fn random_text(&mut self) -> String {
        let count = self.set.passages.len();
        let mut rng = rand::thread_rng();

        let idx = match self.last {
            Some(last) if count > 1 => {
                // skip over the previous pick
                let idx = rng.gen_range(0..count - 1);
                if idx >= last {
                    idx + 1
                } else {
                    idx
                }
            }
            _ => rng.gen_range(0..count),
        };

        self.last = Some(idx);
        self.set.passages[idx].clone()
    }
}

/// Nonsense-but-grammatical sentences
#[derive(Debug, Clone, Copy)]
pub struct SentenceProvider {
    sentences: usize,
}

impl SentenceProvider {
    pub fn new(sentences: usize) -> Self {
        Self {
            sentences: sentences.max(1),
        }
    }
}

impl TextProvider for SentenceProvider {
    fn random_text(&mut self) -> String {
        let rng = &mut rand::thread_rng();

        let sentences = (0..self.sentences)
            .map(|_| {
                cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                )
            })
            .join(" ");

        // generated sentences carry trailing spaces
        sentences.split_whitespace().join(" ")
    }
}

/// The same text every time
#[derive(Debug, Clone)]
pub struct FixedText(String);

impl FixedText {
    /// Runs of whitespace collapse to single spaces so no word is empty.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().split_whitespace().join(" "))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TextProvider for FixedText {
    fn random_text(&mut self) -> String {
        self.0.clone()
    }
}
