//! Extraction options and configuration.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::PatternKind;
use crate::error::{Error, Result};

/// Options controlling every stage of outline extraction.
///
/// All values have compiled-in defaults; any subset can be overridden
/// through the `with_*` builders or a JSON configuration file using the
/// camelCase key names (`minHeadingGap`, `maxHeadingWords`,
/// `acceptanceThreshold`, `patternWeights`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlineOptions {
    /// Fragments longer than this many characters are body paragraphs
    pub max_fragment_chars: usize,

    /// Drop fragments that are only a page number
    pub drop_page_numbers: bool,

    /// Minimum number of pages a repeated line must appear on to count as header/footer
    pub header_footer_min_pages: usize,

    /// Vertical tolerance in points when matching header/footer positions
    pub header_footer_tolerance: f32,

    /// Minimum words for a fragment to vote on the body font size
    pub min_body_words: usize,

    /// Below this many fragments no heading sizes are derived
    pub min_profile_fragments: usize,

    /// Heading sizes closer than this (in points) are merged into one level
    pub min_heading_gap: f32,

    /// Fragments with more words than this are penalized as prose
    pub max_heading_words: usize,

    /// Composite score a fragment must clear to become a heading
    pub acceptance_threshold: f32,

    /// Bonus per structural pattern
    pub pattern_weights: PatternWeights,

    /// Bonus for bold text
    pub bold_weight: f32,

    /// Bonus for italic text
    pub italic_weight: f32,

    /// Stop-word ratio above which a fragment is penalized
    pub max_stop_word_ratio: f32,

    /// Font-size drop (points) that justifies skipping a heading level
    pub hierarchy_gap: f32,

    /// Process batches of documents in parallel
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file and validate them.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&data)?;
        options.validate()?;
        Ok(options)
    }

    /// Set the maximum fragment length in characters.
    pub fn with_max_fragment_chars(mut self, chars: usize) -> Self {
        self.max_fragment_chars = chars;
        self
    }

    /// Set the minimum gap between heading sizes.
    pub fn with_min_heading_gap(mut self, gap: f32) -> Self {
        self.min_heading_gap = gap;
        self
    }

    /// Set the word limit for headings.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the acceptance threshold.
    pub fn with_acceptance_threshold(mut self, threshold: f32) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Override the bonus of one pattern.
    pub fn with_pattern_weight(mut self, kind: PatternKind, weight: f32) -> Self {
        self.pattern_weights.set(kind, weight);
        self
    }

    /// Set the hierarchy-smoothing font gap.
    pub fn with_hierarchy_gap(mut self, gap: f32) -> Self {
        self.hierarchy_gap = gap;
        self
    }

    /// Set the minimum repetition for header/footer removal.
    pub fn with_header_footer_pages(mut self, pages: usize) -> Self {
        self.header_footer_min_pages = pages;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check every option, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        non_negative("minHeadingGap", self.min_heading_gap)?;
        non_negative("acceptanceThreshold", self.acceptance_threshold)?;
        non_negative("boldWeight", self.bold_weight)?;
        non_negative("italicWeight", self.italic_weight)?;
        non_negative("hierarchyGap", self.hierarchy_gap)?;
        non_negative("headerFooterTolerance", self.header_footer_tolerance)?;

        if !(0.0..=1.0).contains(&self.max_stop_word_ratio) {
            return Err(Error::InvalidConfig(format!(
                "maxStopWordRatio must be within 0..=1 (got {})",
                self.max_stop_word_ratio
            )));
        }
        if self.max_fragment_chars == 0 {
            return Err(Error::InvalidConfig(
                "maxFragmentChars must be at least 1".into(),
            ));
        }
        if self.max_heading_words == 0 {
            return Err(Error::InvalidConfig(
                "maxHeadingWords must be at least 1".into(),
            ));
        }
        if self.header_footer_min_pages < 2 {
            return Err(Error::InvalidConfig(format!(
                "headerFooterMinPages must be at least 2 (got {})",
                self.header_footer_min_pages
            )));
        }
        for (kind, weight) in self.pattern_weights.iter() {
            non_negative(&format!("patternWeights.{}", kind.name()), weight)?;
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_fragment_chars: 300,
            drop_page_numbers: true,
            header_footer_min_pages: 3,
            header_footer_tolerance: 2.0,
            min_body_words: 5,
            min_profile_fragments: 3,
            min_heading_gap: 0.5,
            max_heading_words: 12,
            acceptance_threshold: 3.0,
            pattern_weights: PatternWeights::default(),
            bold_weight: 1.5,
            italic_weight: 0.5,
            max_stop_word_ratio: 0.5,
            hierarchy_gap: 3.0,
            parallel: true,
        }
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be a finite value >= 0 (got {})",
            name, value
        )))
    }
}

/// Per-pattern bonus overrides; kinds not listed use their default weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternWeights(HashMap<PatternKind, f32>);

impl PatternWeights {
    /// Weight for a pattern kind.
    pub fn get(&self, kind: PatternKind) -> f32 {
        self.0
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_weight())
    }

    /// Override the weight for a pattern kind.
    pub fn set(&mut self, kind: PatternKind, weight: f32) {
        self.0.insert(kind, weight);
    }

    /// Effective weight of every pattern kind.
    pub fn iter(&self) -> impl Iterator<Item = (PatternKind, f32)> + '_ {
        PatternKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}
