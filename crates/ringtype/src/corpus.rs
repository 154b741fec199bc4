//! Durable training data: committed sentences and the raw typing log.
//!
//! Both files are the source of truth. Models are rebuilt from them at
//! startup and only ever updated incrementally afterwards.

use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SENTENCES_FILE: &str = "training_sentences.json";
pub const RAW_TEXT_FILE: &str = "typed_text.txt";

const SENTENCE_ENDINGS: &[char] = &['.', '!', '?', '\n'];

const SEED_SENTENCES: &[&[&str]] = &[
    &["hello", "world"],
    &["how", "are", "you"],
    &["the", "quick", "brown", "fox"],
    &["I", "am", "fine"],
    &["thank", "you", "very", "much"],
    &["what", "is", "your", "name"],
    &["nice", "to", "meet", "you"],
    &["have", "a", "good", "day"],
    &["see", "you", "later"],
    &["good", "morning"],
    &["good", "afternoon"],
    &["good", "evening"],
    &["ok", "thanks"],
    &["ok", "I", "will"],
    &["ok", "let", "me", "check"],
    &["ok", "sounds", "good"],
    &["yes", "I", "agree"],
    &["no", "thank", "you"],
    &["please", "help", "me"],
    &["can", "you", "help"],
    &["this", "is", "great"],
    &["that", "is", "awesome"],
];

/// Sentences used when nothing has been committed yet.
pub fn seed_sentences() -> Vec<Vec<String>> {
    SEED_SENTENCES
        .iter()
        .map(|s| s.iter().map(|w| w.to_string()).collect())
        .collect()
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed sentence data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode sentences: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Corpus writer has shut down")]
    WriterClosed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub sentences: Vec<Vec<String>>,
    pub raw_text: String,
}

/// Destination for training data produced while typing.
pub trait CorpusSink {
    fn append_raw(&mut self, text: &str) -> Result<(), CorpusError>;
    fn persist_sentence(&mut self, sentence: &[String]) -> Result<(), CorpusError>;
}

#[derive(Debug, Clone)]
pub struct CorpusStore {
    dir: PathBuf,
    sentences: Vec<Vec<String>>,
    loaded: bool,
}

impl CorpusStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sentences: Vec::new(),
            loaded: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sentences_path(&self) -> PathBuf {
        self.dir.join(SENTENCES_FILE)
    }

    pub fn raw_text_path(&self) -> PathBuf {
        self.dir.join(RAW_TEXT_FILE)
    }

    /// Reads both files. Missing files are an empty corpus; an empty
    /// sentence list is replaced by the seed sentences so the predictor
    /// always has something to work with. Only malformed sentence data
    /// fails the load; an unreadable raw log is logged and skipped.
    pub fn load(&mut self) -> Result<Corpus, CorpusError> {
        let sentences = self.load_sentences()?;
        let raw_text = self.read_raw_text();
        log::info!(
            "Loaded {} sentences and {} bytes of typed text from {}",
            sentences.len(),
            raw_text.len(),
            self.dir.display()
        );

        Ok(Corpus {
            sentences,
            raw_text,
        })
    }

    fn load_sentences(&mut self) -> Result<Vec<Vec<String>>, CorpusError> {
        let path = self.sentences_path();
        let mut sentences: Vec<Vec<String>> = match read_optional(&path)? {
            Some(data) => serde_json::from_slice(&data)
                .map_err(|source| CorpusError::Malformed { path, source })?,
            None => Vec::new(),
        };

        if sentences.is_empty() {
            log::info!("No saved sentences, starting from seed sentences");
            sentences = seed_sentences();
        }
        self.sentences = sentences.clone();
        self.loaded = true;
        Ok(sentences)
    }

    fn read_raw_text(&self) -> String {
        let path = self.raw_text_path();
        match read_optional(&path) {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("{} is not valid UTF-8, decoding lossily", path.display());
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            },
            Ok(None) => String::new(),
            Err(e) => {
                log::warn!("Skipping typed text log: {e}");
                String::new()
            }
        }
    }

    fn write_sentences(&self) -> Result<(), CorpusError> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string(&self.sentences)?;

        let path = self.sentences_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl CorpusSink for CorpusStore {
    fn append_raw(&mut self, text: &str) -> Result<(), CorpusError> {
        fs::create_dir_all(&self.dir)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.raw_text_path())?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    fn persist_sentence(&mut self, sentence: &[String]) -> Result<(), CorpusError> {
        if !self.loaded {
            self.load_sentences()?;
        }
        self.sentences.push(sentence.to_vec());
        self.write_sentences()
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, CorpusError> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn clean_word(word: &str) -> String {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// Splits the raw log into sentences of cleaned, case-folded words.
/// Sentences left without words are dropped.
pub fn parse_raw_text(text: &str) -> Vec<Vec<String>> {
    text.split(SENTENCE_ENDINGS)
        .map(|sentence| {
            sentence
                .split_whitespace()
                .map(clean_word)
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|words| !words.is_empty())
        .collect()
}
