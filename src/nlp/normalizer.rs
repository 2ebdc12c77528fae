use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};

use super::stopwords;

/// Turns free text into a sequence of normalized tokens.
///
/// The primary mode lowercases, tokenizes on word boundaries, drops tokens
/// that are not purely alphabetic, drops stop words, and stems what remains.
/// The degraded mode (no stemmer) only lowercases and splits on whitespace;
/// once constructed degraded, a normalizer stays degraded for its lifetime.
/// Normalization is total: it never returns an error to the caller.
pub struct Normalizer {
    stemmer: Option<Stemmer>,
    stop_words: HashSet<&'static str>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Some(Stemmer::create(Algorithm::English)),
            stop_words: stopwords::english(),
        }
    }

    /// Reduced-functionality fallback for when no stemming resources are
    /// available: plain lowercase whitespace splitting, no stop-word removal.
    #[allow(dead_code)]
    pub fn degraded() -> Self {
        Self {
            stemmer: None,
            stop_words: HashSet::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.stemmer.is_none()
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        match &self.stemmer {
            Some(stemmer) => {
                let lowered = text.to_lowercase();
                lowered
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|t| !t.is_empty() && t.chars().all(char::is_alphabetic))
                    .filter(|t| !self.stop_words.contains(t))
                    .map(|t| stemmer.stem(t).into_owned())
                    .collect()
            }
            None => plain_split(text),
        }
    }

    /// Stems a single word, bypassing stop-word removal. Used to normalize
    /// category keywords the same way article tokens are normalized.
    pub(crate) fn stem_word(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(&lowered).into_owned(),
            None => lowered,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_split(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_morphological_variants() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("running"), vec!["run"]);
        assert_eq!(normalizer.normalize("government"), vec!["govern"]);
        // "senator" and "senate" reduce to the same stem
        assert_eq!(
            normalizer.normalize("senator"),
            normalizer.normalize("senate")
        );
    }

    #[test]
    fn drops_stop_words_and_non_alphabetic_tokens() {
        let normalizer = Normalizer::new();
        let tokens = normalizer.normalize("The economy grew by 3% in 2025");
        assert_eq!(tokens, vec!["economi", "grew"]);
    }

    #[test]
    fn lowercases_input() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("ELECTION Results"), vec!["elect", "result"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize("").is_empty());
        assert!(Normalizer::degraded().normalize("").is_empty());
    }

    #[test]
    fn degraded_mode_splits_on_whitespace_only() {
        let normalizer = Normalizer::degraded();
        assert!(normalizer.is_degraded());
        let tokens = normalizer.normalize("The Running Government");
        // no stemming, no stop-word removal
        assert_eq!(tokens, vec!["the", "running", "government"]);
    }
}
