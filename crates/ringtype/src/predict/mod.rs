//! Next-word and completion suggestions.
//!
//! Two models feed one suggestion: a [`TransitionModel`] of word adjacencies
//! predicts the next word from the previous one, and a [`FrequencyModel`]
//! completes the first word of a sentence from its prefix.

pub mod frequency;
pub mod transition;

pub use frequency::FrequencyModel;
pub use transition::{Distribution, NextToken, TransitionModel};

use crate::config::{FallbackPolicy, PredictorConfig};
use crate::corpus::{Corpus, parse_raw_text};
use crate::sentence::SentenceBuffer;
use strum::Display as StrumDisplay;

/// Offered for short unknown contexts (articles, pronouns, prepositions).
pub const FUNCTION_WORDS: &[&str] = &["the", "a", "is", "are", "and", "to", "in", "it", "that", "of"];
/// Offered for longer unknown contexts.
pub const DEFAULT_WORD: &str = "the";
pub const SHORT_CONTEXT_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
pub enum Source {
    #[default]
    Empty,
    SentenceStart,
    NextWord,
    Completion,
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub source: Source,
}

impl Suggestion {
    fn new(text: &str, source: Source) -> Self {
        Self {
            text: text.to_string(),
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: PredictorConfig,
    transitions: TransitionModel,
    frequencies: FrequencyModel,
    suggestion: Suggestion,
}

impl Predictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Trains on committed sentences first, then on the re-parsed raw log.
    pub fn from_corpus(config: PredictorConfig, corpus: &Corpus) -> Self {
        let mut predictor = Self::new(config);
        for sentence in &corpus.sentences {
            predictor.train_sentence(sentence);
        }

        let raw_sentences = parse_raw_text(&corpus.raw_text);
        for words in &raw_sentences {
            if words.len() > 1 {
                predictor.transitions.train(words);
            }
            words.iter().for_each(|w| predictor.frequencies.observe(w));
        }

        log::info!(
            "Trained on {} sentences and {} raw text sentences ({} contexts, {} words)",
            corpus.sentences.len(),
            raw_sentences.len(),
            predictor.transitions.context_count(),
            predictor.frequencies.len()
        );
        predictor
    }

    pub fn train_sentence<S: AsRef<str>>(&mut self, sentence: &[S]) {
        self.transitions.train(sentence);
        sentence
            .iter()
            .for_each(|w| self.frequencies.observe(w.as_ref()));
    }

    pub fn set_config(&mut self, config: PredictorConfig) {
        self.config = config;
    }

    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    pub fn frequencies(&self) -> &FrequencyModel {
        &self.frequencies
    }

    pub fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }

    pub fn recompute(&mut self, buffer: &SentenceBuffer) -> &Suggestion {
        self.suggestion = self.predict(buffer.words());
        log::debug!(
            "Suggestion for {:?}: {:?} ({})",
            buffer.words(),
            self.suggestion.text,
            self.suggestion.source
        );
        &self.suggestion
    }

    fn predict(&self, words: &[String]) -> Suggestion {
        match words {
            [] => self.sentence_start(),
            [only] if only.is_empty() => self.sentence_start(),
            [only] => self
                .frequencies
                .complete(only)
                .map(|(word, _)| Suggestion::new(word, Source::Completion))
                .unwrap_or_default(),
            // right after a break and mid-word both predict the word after `context`
            [.., context, _] => self.next_word(context),
        }
    }

    fn sentence_start(&self) -> Suggestion {
        self.transitions
            .start()
            .map(|word| Suggestion::new(word, Source::SentenceStart))
            .unwrap_or_default()
    }

    fn next_word(&self, context: &str) -> Suggestion {
        match self.transitions.next(context) {
            Some(word) => Suggestion::new(word, Source::NextWord),
            None => self.fallback(context),
        }
    }

    fn fallback(&self, context: &str) -> Suggestion {
        match self.config.fallback {
            FallbackPolicy::None => Suggestion::default(),
            FallbackPolicy::CommonWords if context.chars().count() <= SHORT_CONTEXT_LEN => {
                Suggestion::new(FUNCTION_WORDS[0], Source::Fallback)
            }
            FallbackPolicy::CommonWords => Suggestion::new(DEFAULT_WORD, Source::Fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::seed_sentences;

    fn seeded() -> Predictor {
        let corpus = Corpus {
            sentences: seed_sentences(),
            raw_text: String::new(),
        };
        Predictor::from_corpus(PredictorConfig::default(), &corpus)
    }

    fn suggest(predictor: &mut Predictor, text: &str) -> Suggestion {
        predictor.recompute(&SentenceBuffer::from_text(text)).clone()
    }

    #[test]
    fn test_empty_context_uses_sentence_start() {
        let mut p = seeded();
        let s = suggest(&mut p, "");
        assert_eq!(s.source, Source::SentenceStart);
        // "ok" opens four seed sentences, more than any other word
        assert_eq!(s.text, "ok");
        assert_eq!(suggest(&mut p, " ").text, "ok");

        let mut untrained = Predictor::default();
        assert!(suggest(&mut untrained, "").is_empty());
    }

    #[test]
    fn test_seeded_context_returns_seeded_continuation() {
        let mut p = seeded();
        let seeded_followers = ["morning", "afternoon", "evening", "day"];
        let s = suggest(&mut p, "good ");
        assert_eq!(s.source, Source::NextWord);
        assert!(seeded_followers.contains(&s.text.as_str()), "{:?}", s);
    }

    #[test]
    fn test_mid_word_predicts_next_word_after_context() {
        let mut p = seeded();
        let s = suggest(&mut p, "ok wi");
        assert_eq!(s.source, Source::NextWord);
        assert_eq!(s.text, "thanks");
        assert_eq!(suggest(&mut p, "OK ").text, "thanks");
    }

    #[test]
    fn test_first_word_prefix_completion() {
        let mut p = seeded();
        p.train_sentence(&["thanks", "again"]);
        let s = suggest(&mut p, "Th");
        assert_eq!(s.source, Source::Completion);
        // "thank" and "thanks" both occur twice; the tie goes to "thank"
        assert_eq!(s.text, "thank");

        assert!(suggest(&mut p, "zzz").is_empty());
        // an exact match is not its own completion
        assert_ne!(suggest(&mut p, "hello").text, "hello");
    }

    #[test]
    fn test_fallback_ladder() {
        let mut p = seeded();
        let short = suggest(&mut p, "xyz ");
        assert_eq!(short.source, Source::Fallback);
        assert_eq!(short.text, FUNCTION_WORDS[0]);

        let long = suggest(&mut p, "unknownword ");
        assert_eq!(long.source, Source::Fallback);
        assert_eq!(long.text, DEFAULT_WORD);

        p.set_config(PredictorConfig {
            fallback: FallbackPolicy::None,
        });
        assert!(suggest(&mut p, "unknownword ").is_empty());
    }

    #[test]
    fn test_training_round_trip() {
        let mut p = Predictor::default();
        p.train_sentence(&["ok", "I", "will"]);
        p.train_sentence(&["ok", "thanks"]);
        assert_eq!(p.transitions().next("ok"), Some("I"));
        assert_eq!(p.frequencies().count("ok"), 2);
        assert_eq!(p.frequencies().count("i"), 1);
    }

    #[test]
    fn test_raw_text_trains_both_models() {
        let corpus = Corpus {
            sentences: Vec::new(),
            raw_text: "See you Soon. \"Really\"!\nbye".to_string(),
        };
        let p = Predictor::from_corpus(PredictorConfig::default(), &corpus);
        assert_eq!(p.transitions().next("see"), Some("you"));
        assert_eq!(p.transitions().next("you"), Some("soon"));
        assert_eq!(p.frequencies().count("really"), 1);
        assert_eq!(p.frequencies().count("bye"), 1);
        // single-word sentences don't become transitions
        assert_eq!(p.transitions().context_count(), 2);
    }
}
