//! Styled text fragments produced by the upstream PDF parser.

use serde::{Deserialize, Serialize};

/// One contiguous styled run of text extracted from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Font size in points
    #[serde(alias = "fontSize")]
    pub font_size: f32,

    /// Whether the font appears to be bold
    #[serde(default, alias = "isBold")]
    pub is_bold: bool,

    /// Whether the font appears to be italic
    #[serde(default, alias = "isItalic")]
    pub is_italic: bool,

    /// Position on the page, if the parser reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl TextFragment {
    /// Create a regular (non-bold, non-italic) fragment without position.
    pub fn new(text: impl Into<String>, page: u32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            is_bold: false,
            is_italic: false,
            position: None,
        }
    }

    /// Mark the fragment as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the fragment as italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Place the fragment at a point on the page.
    pub fn at_point(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position::Point { x, y });
        self
    }

    /// Place the fragment on a line of the page (0 = first line).
    pub fn at_line(mut self, line: u32) -> Self {
        self.position = Some(Position::Line { line });
        self
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Location of a fragment on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    /// Page coordinates in points
    Point {
        /// X position (left edge)
        x: f32,
        /// Y position (baseline)
        y: f32,
    },
    /// Line index within the page
    Line {
        /// Line number, counted from the top
        line: u32,
    },
}

/// A parsed document as handed over by the parsing layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Title from the document metadata, if any
    #[serde(default)]
    pub title: Option<String>,

    /// Fragments in reading order
    pub fragments: Vec<TextFragment>,
}

impl DocumentInput {
    /// Create an input without metadata.
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self {
            title: None,
            fragments,
        }
    }

    /// Attach a metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentsJson {
    Bare(Vec<TextFragment>),
    Document(DocumentInput),
}

/// Parse parser output, either a bare fragment array or a
/// `{ "title": ..., "fragments": [...] }` object.
pub fn fragments_from_json(json: &str) -> crate::Result<DocumentInput> {
    let parsed: FragmentsJson = serde_json::from_str(json)?;
    Ok(match parsed {
        FragmentsJson::Bare(fragments) => DocumentInput::new(fragments),
        FragmentsJson::Document(doc) => doc,
    })
}
