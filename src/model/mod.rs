//! Data model for outline extraction.
//!
//! Fragments come in from the parsing layer; candidates are the
//! classifier's intermediate output; the outline is the final artifact.
//! Everything here is scoped to one document's processing call.

mod fragment;
mod outline;

pub use fragment::{fragments_from_json, DocumentInput, Position, TextFragment};
pub use outline::{
    ExtractionResult, HeadingCandidate, HeadingLevel, Outline, OutlineEntry, OutlineStats,
};
