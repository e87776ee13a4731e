//! JSON rendering for outlines.

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))
}

/// Parse an outline back from JSON.
pub fn from_json(json: &str) -> Result<Outline> {
    serde_json::from_str(json)
        .map_err(|e| Error::Serialization(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn sample() -> Outline {
        let mut outline = Outline::new("Understanding AI");
        outline.push(HeadingLevel::H1, "Introduction", 1);
        outline.push(HeadingLevel::H2, "What is AI?", 2);
        outline
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Understanding AI\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Understanding AI","outline":[{"level":"H1","text":"Introduction","page":1},{"level":"H2","text":"What is AI?","page":2}]}"#
        );
    }

    #[test]
    fn test_from_json_roundtrip() {
        let outline = sample();
        let parsed = from_json(&to_json(&outline, JsonFormat::Pretty).unwrap()).unwrap();
        assert_eq!(parsed, outline);
    }

    #[test]
    fn test_from_json_rejects_unknown_level() {
        let err = from_json(r#"{"title":"x","outline":[{"level":"H7","text":"a","page":1}]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
