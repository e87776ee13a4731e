//! Composite heading score for a single fragment.

use regex::Regex;

use super::{EnglishLexicon, Lexicon, PatternMatch, PatternSet};
use crate::model::{HeadingCandidate, HeadingLevel, TextFragment};
use crate::options::OutlineOptions;
use crate::profile::FontProfile;

/// Scores within this distance of the threshold count as ties and are rejected.
pub const TIE_EPSILON: f32 = 1e-4;

const SIZE_SCORE_H1: f32 = 3.0;
const SIZE_SCORE_H2: f32 = 2.5;
const SIZE_SCORE_H3: f32 = 2.0;
const SIZE_SCORE_UNMAPPED: f32 = 1.0;

const SHORT_BONUS: f32 = 1.0;
const LONG_PENALTY: f32 = 2.0;
const PROSE_PENALTY: f32 = 2.0;
const TRAILING_PERIOD_PENALTY: f32 = 1.0;
const STOP_WORD_PENALTY: f32 = 1.5;
const NO_LETTERS_PENALTY: f32 = 3.0;

/// Breakdown of a fragment's heading score.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Composite score
    pub score: f32,
    /// Level supported by the font size
    pub size_level: Option<HeadingLevel>,
    /// First matching structural pattern
    pub pattern: Option<PatternMatch>,
    /// Resolved level if accepted
    pub level: HeadingLevel,
    /// Whether the score cleared the threshold
    pub accepted: bool,
}

/// Pick the level from font size and numbering.
///
/// A numbering level wins when it is not shallower than what the font size
/// supports. Sizes without a level still cap the numbering level at
/// [`FontProfile::level_floor`]; with neither signal the level is H3.
pub fn resolve_level(
    profile: &FontProfile,
    font_size: f32,
    pattern_level: Option<HeadingLevel>,
) -> HeadingLevel {
    match (profile.level_for(font_size), pattern_level) {
        (Some(size), Some(pattern)) if pattern >= size => pattern,
        (Some(size), _) => size,
        (None, Some(pattern)) => match profile.level_floor(font_size) {
            Some(floor) if floor > pattern => floor,
            _ => pattern,
        },
        (None, None) => HeadingLevel::H3,
    }
}

/// Decides whether a fragment is a heading, and at which level.
///
/// Classification of one fragment never depends on another, so fragments
/// can be scored in any order.
pub struct HeadingClassifier {
    options: OutlineOptions,
    patterns: PatternSet,
    lexicon: Box<dyn Lexicon>,
    prose_regex: Regex,
}

impl HeadingClassifier {
    /// Create a classifier with the English lexicon.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            options: options.clone(),
            patterns: PatternSet::new(),
            lexicon: Box::new(EnglishLexicon::new()),
            prose_regex: Regex::new(r#"\p{Ll}[.!?]["')\]]?\s+\p{Lu}"#)
                .expect("prose pattern is valid"),
        }
    }

    /// Replace the stop-word and casing checks.
    pub fn with_lexicon(mut self, lexicon: impl Lexicon + 'static) -> Self {
        self.lexicon = Box::new(lexicon);
        self
    }

    /// Whether a composite score is accepted.
    pub fn accepts(&self, score: f32) -> bool {
        score - self.options.acceptance_threshold > TIE_EPSILON
    }

    /// Score a fragment against the document's font profile.
    pub fn score(&self, fragment: &TextFragment, profile: &FontProfile) -> Classification {
        let text = fragment.text.as_str();
        let size_level = profile.level_for(fragment.font_size);

        let size_score = match size_level {
            Some(HeadingLevel::H1) => SIZE_SCORE_H1,
            Some(HeadingLevel::H2) => SIZE_SCORE_H2,
            Some(HeadingLevel::H3) => SIZE_SCORE_H3,
            None if profile.is_above_body(fragment.font_size) => SIZE_SCORE_UNMAPPED,
            None => 0.0,
        };

        let mut style_score = 0.0;
        if fragment.is_bold {
            style_score += self.options.bold_weight;
        }
        if fragment.is_italic {
            style_score += self.options.italic_weight;
        }

        let pattern = self.patterns.find(text, self.lexicon.as_ref());
        let pattern_score = pattern.map_or(0.0, |m| self.options.pattern_weights.get(m.kind));

        let context_score = self.context_score(text);
        let score = size_score + style_score + pattern_score + context_score;
        let accepted = self.accepts(score);
        let level = resolve_level(profile, fragment.font_size, pattern.and_then(|m| m.level));

        log::trace!(
            "{:?} p{} size={:.1} style={:.1} pattern={:.1} context={:.1} => {:.2}{}",
            text,
            fragment.page,
            size_score,
            style_score,
            pattern_score,
            context_score,
            score,
            if accepted { " (heading)" } else { "" }
        );

        Classification {
            score,
            size_level,
            pattern,
            level,
            accepted,
        }
    }

    /// Length, prose, punctuation and stop-word signals.
    fn context_score(&self, text: &str) -> f32 {
        if !text.chars().any(char::is_alphabetic) {
            return -NO_LETTERS_PENALTY;
        }

        let mut score = 0.0;
        if text.split_whitespace().count() <= self.options.max_heading_words {
            score += SHORT_BONUS;
        } else {
            score -= LONG_PENALTY;
        }
        if self.prose_regex.is_match(text) {
            score -= PROSE_PENALTY;
        }
        if text.ends_with('.') && !text.ends_with("...") {
            score -= TRAILING_PERIOD_PENALTY;
        }
        if self.lexicon.stop_word_ratio(text) > self.options.max_stop_word_ratio {
            score -= STOP_WORD_PENALTY;
        }
        score
    }

    /// Classify one fragment; `order` is its index in the normalized sequence.
    pub fn classify(
        &self,
        fragment: &TextFragment,
        order: usize,
        profile: &FontProfile,
    ) -> Option<HeadingCandidate> {
        let result = self.score(fragment, profile);
        result.accepted.then(|| HeadingCandidate {
            text: fragment.text.clone(),
            page: fragment.page,
            level: result.level,
            score: result.score,
            pattern_level: result.pattern.and_then(|m| m.level),
            order,
            source: fragment.clone(),
        })
    }

    /// Classify every fragment, keeping document order.
    pub fn classify_all(
        &self,
        fragments: &[TextFragment],
        profile: &FontProfile,
    ) -> Vec<HeadingCandidate> {
        let candidates: Vec<HeadingCandidate> = fragments
            .iter()
            .enumerate()
            .filter_map(|(order, fragment)| self.classify(fragment, order, profile))
            .collect();

        log::debug!(
            "{} of {} fragments accepted as heading candidates",
            candidates.len(),
            fragments.len()
        );

        candidates
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
