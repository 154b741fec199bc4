//! Word-level mirror of what has been typed since the last Enter.

/// Keystroke plan for accepting a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// Characters of the in-progress word to delete before typing.
    pub erase: usize,
    /// Text to type, always ending in a space.
    pub text: String,
}

/// The words of the sentence in progress. Only the last word may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceBuffer {
    words: Vec<String>,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays typed text: spaces break words, everything else is appended.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        for c in text.chars() {
            if c == ' ' {
                buffer.word_break();
            } else {
                buffer.append_char(c.encode_utf8(&mut [0; 4]));
            }
        }
        buffer
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// The last word, empty right after a word break.
    pub fn current_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    pub fn append_char(&mut self, text: &str) {
        match self.words.last_mut() {
            Some(word) => word.push_str(text),
            None => self.words.push(text.to_string()),
        }
    }

    /// Mirrors a backspace in the target window. Deleting past the start of
    /// an empty word removes the separating space, leaving the cursor at the
    /// end of the previous word.
    pub fn backspace(&mut self) {
        let Some(word) = self.words.last_mut() else {
            return;
        };

        if word.pop().is_none() || (word.is_empty() && self.words.len() == 1) {
            self.words.pop();
        }
    }

    pub fn word_break(&mut self) {
        match self.words.last() {
            None => self.words.push(String::new()),
            Some(word) if word.is_empty() => {}
            Some(_) => self.words.push(String::new()),
        }
    }

    /// Clears the buffer. Returns the sentence only when it holds at least
    /// two non-empty words; a lone word is not worth training on.
    pub fn commit_sentence(&mut self) -> Option<Vec<String>> {
        let sentence: Vec<String> = std::mem::take(&mut self.words)
            .into_iter()
            .filter(|w| !w.is_empty())
            .collect();
        (sentence.len() > 1).then_some(sentence)
    }

    /// Replaces the in-progress word with `suggestion` and opens a new word.
    pub fn accept(&mut self, suggestion: &str) -> Acceptance {
        let partial = self
            .words
            .last()
            .filter(|w| !w.is_empty())
            .cloned()
            .unwrap_or_default();

        let acceptance = if partial.is_empty() {
            Acceptance {
                erase: 0,
                text: format!("{suggestion} "),
            }
        } else if let Some(rest) = strip_prefix_ignore_case(suggestion, &partial) {
            Acceptance {
                erase: 0,
                text: format!("{rest} "),
            }
        } else {
            Acceptance {
                erase: partial.chars().count(),
                text: format!("{suggestion} "),
            }
        };

        match self.words.last_mut() {
            Some(word) => *word = suggestion.to_string(),
            None => self.words.push(suggestion.to_string()),
        }
        self.words.push(String::new());
        acceptance
    }
}

fn strip_prefix_ignore_case<'a>(word: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = word.char_indices();
    for p in prefix.chars() {
        let (_, c) = rest.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    Some(rest.next().map_or("", |(i, _)| &word[i..]))
}
