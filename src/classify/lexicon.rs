//! Language-dependent word checks used by the classifier.

use std::collections::HashSet;

/// Stop-word and casing checks for one working language.
///
/// Only [`Lexicon::is_stop_word`] is required; any `Fn(&str) -> bool`
/// closure is a lexicon, so alternate word lists can be plugged in
/// without touching the classifier.
pub trait Lexicon: Send + Sync {
    /// Whether a lowercase word is a stop word.
    fn is_stop_word(&self, word: &str) -> bool;

    /// Fraction of words that are stop words (0.0 for text without words).
    fn stop_word_ratio(&self, text: &str) -> f32 {
        let words: Vec<String> = words(text).collect();
        if words.is_empty() {
            return 0.0;
        }
        let stops = words.iter().filter(|w| self.is_stop_word(w)).count();
        stops as f32 / words.len() as f32
    }

    /// Whether the text is in Title Case: the first word and every
    /// non-stop word start with an uppercase letter.
    fn is_title_case(&self, text: &str) -> bool {
        let mut seen = false;
        for (i, word) in text
            .split_whitespace()
            .map(trim_word)
            .filter(|w| w.chars().any(char::is_alphabetic))
            .enumerate()
        {
            let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
            if !starts_upper && (i == 0 || !self.is_stop_word(&word.to_lowercase())) {
                return false;
            }
            seen = true;
        }
        seen
    }
}

impl<F> Lexicon for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_stop_word(&self, word: &str) -> bool {
        self(word)
    }
}

fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Lowercased words of a text, punctuation trimmed.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(trim_word)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Common English connective words.
pub struct EnglishLexicon {
    stop_words: HashSet<&'static str>,
}

impl EnglishLexicon {
    /// Create the English lexicon.
    pub fn new() -> Self {
        let stop_words = [
            "a", "an", "the", "and", "or", "but", "nor", "in", "on", "at", "to", "for", "of",
            "with", "by", "from", "about", "into", "through", "during", "before", "after",
            "above", "below", "up", "down", "out", "off", "over", "under", "again", "further",
            "then", "once", "is", "are", "was", "were", "be", "been", "being", "as", "it", "its",
            "this", "that", "these", "those", "not", "no", "so", "if", "than", "we", "our",
            "you", "your", "they", "their", "he", "she", "his", "her", "which", "who", "has",
            "have", "had", "will", "can", "may", "do", "does", "vs", "via", "per",
        ]
        .into_iter()
        .collect();
        Self { stop_words }
    }
}

impl Default for EnglishLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon for EnglishLexicon {
    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}
