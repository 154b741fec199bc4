use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextToken {
    pub word: String,
    pub count: u32,
}

/// Follow-up words for one context, in first-observed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<NextToken>,
}

impl Distribution {
    fn add(&mut self, word: &str) {
        match self.entries.iter_mut().find(|e| e.word == word) {
            Some(entry) => entry.count = entry.count.saturating_add(1),
            None => self.entries.push(NextToken {
                word: word.to_string(),
                count: 1,
            }),
        }
    }

    pub fn entries(&self) -> &[NextToken] {
        &self.entries
    }

    /// Highest count wins; ties go to the word seen first.
    pub fn most_likely(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .max_by_key(|e| e.count)
            .map(|e| e.word.as_str())
    }
}

/// Order-1 word transition counts. Contexts are case-folded, next words
/// keep the case they were typed with.
#[derive(Debug, Clone, Default)]
pub struct TransitionModel {
    starts: Distribution,
    contexts: HashMap<String, Distribution>,
}

impl TransitionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every adjacency in `sentence`, plus the sentence opener.
    pub fn train<S: AsRef<str>>(&mut self, sentence: &[S]) {
        let mut words = sentence.iter().map(AsRef::as_ref).filter(|w| !w.is_empty());
        let Some(mut prev) = words.next() else {
            return;
        };
        self.starts.add(prev);

        for word in words {
            self.contexts
                .entry(prev.to_lowercase())
                .or_default()
                .add(word);
            prev = word;
        }
    }

    pub fn start(&self) -> Option<&str> {
        self.starts.most_likely()
    }

    pub fn next(&self, context: &str) -> Option<&str> {
        self.distribution(context)?.most_likely()
    }

    pub fn distribution(&self, context: &str) -> Option<&Distribution> {
        self.contexts.get(&context.to_lowercase())
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_and_query() {
        let mut model = TransitionModel::new();
        model.train(&["ok", "I", "will"]);
        assert_eq!(model.next("ok"), Some("I"));
        assert_eq!(model.next("OK"), Some("I"));
        assert_eq!(model.next("i"), Some("will"));
        assert_eq!(model.next("will"), None);
        assert_eq!(model.start(), Some("ok"));
    }

    #[test]
    fn test_repeated_adjacency_increases_weight() {
        let mut model = TransitionModel::new();
        model.train(&["good", "morning"]);
        model.train(&["good", "evening"]);
        model.train(&["good", "evening"]);

        let dist = model.distribution("good").unwrap();
        let words: Vec<_> = dist.entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["morning", "evening"]);
        assert_eq!(model.next("good"), Some("evening"));
    }

    #[test]
    fn test_ties_prefer_first_observed() {
        let mut model = TransitionModel::new();
        model.train(&["good", "morning"]);
        model.train(&["good", "afternoon"]);
        model.train(&["good", "evening"]);
        assert_eq!(model.next("good"), Some("morning"));
    }

    #[test]
    fn test_empty_words_are_skipped() {
        let mut model = TransitionModel::new();
        model.train(&["", "see", "", "you", ""]);
        assert_eq!(model.start(), Some("see"));
        assert_eq!(model.next("see"), Some("you"));
        assert_eq!(model.context_count(), 1);

        model.train::<&str>(&[]);
        assert_eq!(model.context_count(), 1);
    }
}
