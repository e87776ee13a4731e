//! Heading levels, candidates and the assembled outline.

use super::TextFragment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading depth, H1 shallowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// All levels, shallowest first.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Nesting depth (1 for H1).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level for a nesting depth, clamped to H1..=H3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// The next level down (H3 stays H3).
    pub fn deeper(self) -> Self {
        Self::from_depth(self.depth() as usize + 1)
    }

    /// Label used in the output ("H1", "H2", "H3").
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fragment that passed the heading score threshold.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// Heading text (cleaned)
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Provisional level
    pub level: HeadingLevel,

    /// Composite heading score
    pub score: f32,

    /// Level suggested by a numbering pattern, if any
    pub pattern_level: Option<HeadingLevel>,

    /// Position of the source fragment in the normalized sequence
    pub order: usize,

    /// The fragment this candidate was derived from
    pub source: TextFragment,
}

impl HeadingCandidate {
    /// Font size of the source fragment.
    pub fn font_size(&self) -> f32 {
        self.source.font_size
    }
}

/// The final outline artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title ("" when none was found)
    pub title: String,

    /// Headings in page/document order, title excluded
    pub outline: Vec<OutlineEntry>,
}

impl Outline {
    /// Create an outline with the given title and no headings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Add a heading entry.
    pub fn push(&mut self, level: HeadingLevel, text: impl Into<String>, page: u32) {
        self.outline.push(OutlineEntry {
            level,
            text: text.into(),
            page,
        });
    }

    /// Number of heading entries.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// True when there is neither a title nor any heading.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Count entries at a level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,

    /// Heading text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

/// Statistics collected while extracting one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineStats {
    /// Fragments received from the parser
    pub fragment_count: usize,

    /// Fragments left after normalization
    pub kept_fragments: usize,

    /// Fragments accepted as heading candidates
    pub candidate_count: usize,

    /// Entries in the final outline
    pub heading_count: usize,

    /// Detected body font size
    pub body_size: f32,

    /// Heading font sizes, largest first
    pub heading_sizes: Vec<f32>,
}

/// Outline plus advisory validation warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The assembled outline
    pub outline: Outline,

    /// Schema warnings (never blocking)
    pub warnings: Vec<String>,

    /// Extraction statistics
    pub stats: OutlineStats,
}

impl ExtractionResult {
    /// True when the validator reported no problems.
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }
}
