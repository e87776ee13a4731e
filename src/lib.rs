//! # pdfoutline
//!
//! Heading outline extraction from parsed PDF text fragments.
//!
//! The library takes the styled text runs produced by a PDF parser and
//! turns them into a document title plus an H1/H2/H3 outline, using font
//! statistics, styling and numbering patterns.
//!
//! ## Quick Start
//!
//! ```
//! use pdfoutline::{OutlineExtractor, OutlineOptions, TextFragment};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let fragments = vec![
//!         TextFragment::new("Understanding AI", 1, 24.0).bold(),
//!         TextFragment::new("Introduction", 1, 18.0).bold(),
//!         TextFragment::new("What is AI?", 2, 14.0).bold(),
//!         TextFragment::new("This is body text describing AI in detail.", 2, 11.0),
//!         TextFragment::new("History of AI", 3, 14.0).bold(),
//!     ];
//!
//!     let extractor = OutlineExtractor::new(OutlineOptions::default())?;
//!     let result = extractor.extract(&fragments);
//!
//!     assert_eq!(result.outline.title, "Understanding AI");
//!     assert_eq!(result.outline.len(), 3);
//!     println!("{}", pdfoutline::render::to_json(&result.outline, pdfoutline::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Normalize**: drop empty, overlong, page-number and running
//!   header/footer fragments
//! - **Profile**: per-document body size and heading size buckets
//! - **Classify**: composite size/style/pattern/context score per fragment
//! - **Assemble**: title, deduplication, hierarchy smoothing
//! - **Validate**: advisory schema check, warnings only

pub mod assemble;
pub mod classify;
pub mod error;
pub mod model;
pub mod normalize;
pub mod options;
pub mod profile;
pub mod render;
pub mod validate;

// Re-export commonly used types
pub use assemble::OutlineAssembler;
pub use classify::{EnglishLexicon, HeadingClassifier, Lexicon, PatternKind};
pub use error::{Error, Result};
pub use model::{
    fragments_from_json, DocumentInput, ExtractionResult, HeadingCandidate, HeadingLevel,
    Outline, OutlineEntry, OutlineStats, Position, TextFragment,
};
pub use normalize::FragmentNormalizer;
pub use options::{OutlineOptions, PatternWeights};
pub use profile::FontProfile;
pub use render::JsonFormat;
pub use validate::{OutlineSchema, SchemaValidator, SchemaViolation, ValidationAdapter, ValidationReport};

use rayon::prelude::*;

/// Extract an outline with default options.
///
/// # Example
///
/// ```
/// use pdfoutline::{extract_outline, TextFragment};
///
/// let outline = extract_outline(&[]);
/// assert_eq!(outline.title, "");
/// assert!(outline.outline.is_empty());
/// ```
pub fn extract_outline(fragments: &[TextFragment]) -> Outline {
    OutlineExtractor::default().extract(fragments).outline
}

/// Runs the full pipeline for one or many documents.
///
/// Holds no per-document state: each call builds its own [`FontProfile`],
/// so one extractor can be shared across threads.
///
/// # Example
///
/// ```
/// use pdfoutline::{OutlineExtractor, OutlineOptions, TextFragment};
///
/// let options = OutlineOptions::new()
///     .with_acceptance_threshold(3.5)
///     .with_max_heading_words(10);
/// let extractor = OutlineExtractor::new(options)?;
///
/// let result = extractor.extract(&[TextFragment::new("2.1 Background", 1, 11.0)]);
/// assert!(result.is_valid());
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct OutlineExtractor {
    options: OutlineOptions,
    normalizer: FragmentNormalizer,
    classifier: HeadingClassifier,
    assembler: OutlineAssembler,
    adapter: ValidationAdapter,
}

impl OutlineExtractor {
    /// Create an extractor, rejecting invalid options.
    pub fn new(options: OutlineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_valid_options(options))
    }

    fn with_valid_options(options: OutlineOptions) -> Self {
        Self {
            normalizer: FragmentNormalizer::new(&options),
            classifier: HeadingClassifier::new(&options),
            assembler: OutlineAssembler::new(&options),
            adapter: ValidationAdapter::new(),
            options,
        }
    }

    /// Replace the stop-word and casing checks.
    pub fn with_lexicon(mut self, lexicon: impl Lexicon + 'static) -> Self {
        self.classifier = self.classifier.with_lexicon(lexicon);
        self
    }

    /// Replace the schema validator.
    pub fn with_validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.adapter = ValidationAdapter::with_validator(validator);
        self
    }

    /// The options this extractor was built with.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of one document.
    pub fn extract(&self, fragments: &[TextFragment]) -> ExtractionResult {
        self.run(fragments, None)
    }

    /// Extract the outline of one document, with its metadata title as
    /// fallback.
    pub fn extract_document(&self, input: &DocumentInput) -> ExtractionResult {
        self.run(&input.fragments, input.title.as_deref())
    }

    /// Extract many documents. Documents are independent and processed in
    /// parallel unless the options say otherwise; results keep input order.
    pub fn extract_batch(&self, inputs: &[DocumentInput]) -> Vec<ExtractionResult> {
        if self.options.parallel {
            inputs
                .par_iter()
                .map(|input| self.extract_document(input))
                .collect()
        } else {
            inputs
                .iter()
                .map(|input| self.extract_document(input))
                .collect()
        }
    }

    fn run(&self, fragments: &[TextFragment], metadata_title: Option<&str>) -> ExtractionResult {
        if fragments.is_empty() {
            return self
                .adapter
                .finish(Outline::default(), OutlineStats::default());
        }

        let normalized = self.normalizer.normalize(fragments);
        // Nothing usable left: the result is as trivial as an empty document
        let metadata_title = metadata_title.filter(|_| !normalized.is_empty());
        let profile = FontProfile::build(&normalized, &self.options);
        let candidates = self.classifier.classify_all(&normalized, &profile);
        let candidate_count = candidates.len();
        let outline = self
            .assembler
            .assemble(candidates, &profile, metadata_title);

        let stats = OutlineStats {
            fragment_count: fragments.len(),
            kept_fragments: normalized.len(),
            candidate_count,
            heading_count: outline.len(),
            body_size: profile.body_size,
            heading_sizes: profile.heading_sizes.clone(),
        };

        log::info!(
            "Extracted {:?}: {} heading(s) from {} fragment(s)",
            outline.title,
            stats.heading_count,
            stats.fragment_count
        );

        self.adapter.finish(outline, stats)
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::with_valid_options(OutlineOptions::default())
    }
}
