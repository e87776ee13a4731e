//! Heading classification.
//!
//! Each normalized fragment gets a composite score built from its font
//! size rank, bold/italic flags, structural patterns and context (length,
//! prose punctuation, stop-word density). Fragments clearing the
//! acceptance threshold become [`HeadingCandidate`](crate::model::HeadingCandidate)s.

mod lexicon;
mod patterns;
mod scorer;

pub use lexicon::{EnglishLexicon, Lexicon};
pub use patterns::{LevelHint, PatternKind, PatternMatch, PatternRule, PatternSet};
pub use scorer::{resolve_level, Classification, HeadingClassifier, TIE_EPSILON};
