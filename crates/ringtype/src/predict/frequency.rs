use std::collections::HashMap;

/// Case-folded word occurrence counts, used for prefix completion.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    counts: HashMap<String, u64>,
}

impl FrequencyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence. Empty words are ignored.
    pub fn observe(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let entry = self.counts.entry(word.to_lowercase()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent known word extending `prefix`, excluding `prefix` itself.
    /// Equal counts resolve to the lexicographically smallest word.
    pub fn complete(&self, prefix: &str) -> Option<(&str, u64)> {
        let prefix = prefix.to_lowercase();
        self.counts
            .iter()
            .filter(|(word, _)| word.starts_with(&prefix) && **word != prefix)
            .max_by(|(wa, ca), (wb, cb)| ca.cmp(cb).then_with(|| wb.cmp(wa)))
            .map(|(word, count)| (word.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_case_folds() {
        let mut freq = FrequencyModel::new();
        freq.observe("OK");
        freq.observe("ok");
        freq.observe("");
        assert_eq!(freq.count("Ok"), 2);
        assert_eq!(freq.len(), 1);
    }

    #[test]
    fn test_complete_prefers_frequency() {
        let mut freq = FrequencyModel::new();
        for w in ["morning", "more", "more", "mo", "mo", "mo", "evening"] {
            freq.observe(w);
        }
        // exact match "mo" is excluded even though it is most frequent
        assert_eq!(freq.complete("Mo"), Some(("more", 2)));
        assert_eq!(freq.complete("mor"), Some(("more", 2)));
        assert_eq!(freq.complete("morn"), Some(("morning", 1)));
        assert_eq!(freq.complete("x"), None);
    }

    #[test]
    fn test_complete_tie_break_is_lexicographic() {
        let mut freq = FrequencyModel::new();
        for w in ["thanks", "that", "the", "this"] {
            freq.observe(w);
        }
        assert_eq!(freq.complete("th"), Some(("thanks", 1)));
        assert_eq!(freq.complete("thi"), Some(("this", 1)));
    }
}
