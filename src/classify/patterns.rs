//! Structural heading patterns.
//!
//! Rules are evaluated in a fixed order and the first match wins, so the
//! precedence between competing patterns is the order of [`PatternSet::rules`].

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Lexicon;
use crate::model::HeadingLevel;

/// Kind of structural pattern a heading can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Decimal numbering: "1.", "1.1", "1.1.1"
    Decimal,
    /// Roman numerals: "IV."
    Roman,
    /// Letter numbering: "A."
    Letter,
    /// "Chapter 3", "Part II", "Appendix A"
    Chapter,
    /// "(a)", "1)"
    Parenthesized,
    /// Bullet or dash marker
    Bullet,
    /// ALL CAPS text
    AllCaps,
    /// Title Case text
    TitleCase,
}

impl PatternKind {
    /// Every kind, in evaluation order.
    pub const ALL: [PatternKind; 8] = [
        PatternKind::Decimal,
        PatternKind::Roman,
        PatternKind::Letter,
        PatternKind::Chapter,
        PatternKind::Parenthesized,
        PatternKind::Bullet,
        PatternKind::AllCaps,
        PatternKind::TitleCase,
    ];

    /// Compiled-in score bonus.
    pub fn default_weight(self) -> f32 {
        match self {
            PatternKind::Decimal => 2.5,
            PatternKind::Roman => 2.5,
            PatternKind::Letter => 1.5,
            PatternKind::Chapter => 2.5,
            PatternKind::Parenthesized => 0.5,
            PatternKind::Bullet => 0.5,
            PatternKind::AllCaps => 1.0,
            PatternKind::TitleCase => 0.75,
        }
    }

    /// Configuration key.
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Decimal => "decimal",
            PatternKind::Roman => "roman",
            PatternKind::Letter => "letter",
            PatternKind::Chapter => "chapter",
            PatternKind::Parenthesized => "parenthesized",
            PatternKind::Bullet => "bullet",
            PatternKind::AllCaps => "all_caps",
            PatternKind::TitleCase => "title_case",
        }
    }
}

/// Level a matching rule suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelHint {
    /// No level suggestion
    None,
    /// Always this level
    Fixed(HeadingLevel),
    /// Depth of the dotted number captured by the rule
    NumberingDepth,
}

#[derive(Debug)]
enum Matcher {
    Regex(Regex),
    TitleCase,
}

/// One entry of the ordered rule list.
#[derive(Debug)]
pub struct PatternRule {
    /// Pattern kind (selects the weight)
    pub kind: PatternKind,
    /// Suggested level on match
    pub hint: LevelHint,
    matcher: Matcher,
}

impl PatternRule {
    fn regex(kind: PatternKind, pattern: &str, hint: LevelHint) -> Self {
        Self {
            kind,
            hint,
            matcher: Matcher::Regex(Regex::new(pattern).expect("heading pattern is valid")),
        }
    }

    /// Try the rule against cleaned text.
    pub fn apply(&self, text: &str, lexicon: &dyn Lexicon) -> Option<PatternMatch> {
        match &self.matcher {
            Matcher::Regex(regex) => {
                let caps = regex.captures(text)?;
                let level = match self.hint {
                    LevelHint::None => None,
                    LevelHint::Fixed(level) => Some(level),
                    LevelHint::NumberingDepth => caps
                        .get(1)
                        .map(|m| HeadingLevel::from_depth(m.as_str().split('.').count())),
                };
                Some(PatternMatch {
                    kind: self.kind,
                    level,
                })
            }
            Matcher::TitleCase => lexicon.is_title_case(text).then_some(PatternMatch {
                kind: self.kind,
                level: None,
            }),
        }
    }
}

/// Result of a successful rule match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch {
    /// Which pattern matched
    pub kind: PatternKind,
    /// Level suggested by the numbering, if any
    pub level: Option<HeadingLevel>,
}

/// Ordered heading pattern rules.
#[derive(Debug)]
pub struct PatternSet {
    /// Rules in precedence order
    pub rules: Vec<PatternRule>,
}

impl PatternSet {
    /// The default rule list.
    pub fn new() -> Self {
        Self {
            rules: vec![
                PatternRule::regex(
                    PatternKind::Decimal,
                    r"^(\d{1,3}(?:\.\d{1,3})+)\.?\s+\S",
                    LevelHint::NumberingDepth,
                ),
                PatternRule::regex(
                    PatternKind::Decimal,
                    r"^(\d{1,3})\.\s+\S",
                    LevelHint::NumberingDepth,
                ),
                PatternRule::regex(
                    PatternKind::Roman,
                    r"^[IVX]{1,5}\.\s+\S",
                    LevelHint::Fixed(HeadingLevel::H1),
                ),
                PatternRule::regex(
                    PatternKind::Letter,
                    r"^[A-Z]\.\s+\S",
                    LevelHint::Fixed(HeadingLevel::H2),
                ),
                PatternRule::regex(
                    PatternKind::Chapter,
                    r"(?i)^(?:chapter|part|appendix)\s+(?:\d{1,3}|[ivxlc]{1,6}|[a-z])\b",
                    LevelHint::Fixed(HeadingLevel::H1),
                ),
                PatternRule::regex(
                    PatternKind::Parenthesized,
                    r"^\(?[a-z0-9]{1,3}\)\s+\S",
                    LevelHint::None,
                ),
                PatternRule::regex(
                    PatternKind::Bullet,
                    r"^[•●○◦▪■\-–*]\s+\S",
                    LevelHint::None,
                ),
                PatternRule::regex(
                    PatternKind::AllCaps,
                    r"^\p{Lu}[\p{Lu}\d\s&/,:'\-]*\p{Lu}[\p{Lu}\d\s&/,:'\-]*$",
                    LevelHint::None,
                ),
                PatternRule {
                    kind: PatternKind::TitleCase,
                    hint: LevelHint::None,
                    matcher: Matcher::TitleCase,
                },
            ],
        }
    }

    /// First rule matching the text.
    pub fn find(&self, text: &str, lexicon: &dyn Lexicon) -> Option<PatternMatch> {
        self.rules.iter().find_map(|rule| rule.apply(text, lexicon))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}
