//! Advisory schema validation of assembled outlines.
//!
//! Validation never blocks delivery: every violation becomes a warning
//! string attached to the [`ExtractionResult`].

use serde_json::{Map, Value};

use crate::model::{ExtractionResult, HeadingLevel, Outline, OutlineStats};

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON path of the offending value (e.g. `outline[2].level`)
    pub path: String,
    /// What the schema expects
    pub expected: String,
    /// What was found
    pub found: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.path, self.expected, self.found
        )
    }
}

/// Pass/fail plus the list of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// No violations were found
    pub valid: bool,
    /// Every violation, in document order
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<SchemaViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }
}

/// A fixed, versioned description of the outline JSON shape.
pub trait SchemaValidator: Send + Sync {
    /// Schema version string.
    fn version(&self) -> &str;

    /// Check a JSON value against the schema.
    fn validate(&self, value: &Value) -> ValidationReport;
}

/// Built-in outline schema.
///
/// ```json
/// { "title": string,
///   "outline": [ { "level": "H1"|"H2"|"H3", "text": string, "page": integer } ] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineSchema;

impl OutlineSchema {
    /// Schema version.
    pub const VERSION: &'static str = "1.0";

    const ENTRY_FIELDS: [&'static str; 3] = ["level", "text", "page"];
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

fn violation(
    path: impl Into<String>,
    expected: impl Into<String>,
    found: impl Into<String>,
) -> SchemaViolation {
    SchemaViolation {
        path: path.into(),
        expected: expected.into(),
        found: found.into(),
    }
}

impl OutlineSchema {
    fn check_entry(path: &str, entry: &Map<String, Value>, out: &mut Vec<SchemaViolation>) {
        match entry.get("level") {
            Some(Value::String(s)) if HeadingLevel::ALL.iter().any(|l| l.as_str() == s.as_str()) => {}
            Some(Value::String(s)) => out.push(violation(
                format!("{path}.level"),
                "one of H1, H2, H3",
                format!("\"{s}\""),
            )),
            Some(other) => out.push(violation(format!("{path}.level"), "string", type_name(other))),
            None => out.push(violation(format!("{path}.level"), "string", "missing")),
        }

        match entry.get("text") {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) => {
                out.push(violation(format!("{path}.text"), "non-empty string", "empty string"))
            }
            Some(other) => out.push(violation(format!("{path}.text"), "string", type_name(other))),
            None => out.push(violation(format!("{path}.text"), "string", "missing")),
        }

        match entry.get("page") {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(p) if p >= 1 => {}
                _ => out.push(violation(format!("{path}.page"), "integer >= 1", n.to_string())),
            },
            Some(other) => out.push(violation(format!("{path}.page"), "integer", type_name(other))),
            None => out.push(violation(format!("{path}.page"), "integer", "missing")),
        }

        for key in entry.keys() {
            if !Self::ENTRY_FIELDS.contains(&key.as_str()) {
                out.push(violation(format!("{path}.{key}"), "no additional fields", "field"));
            }
        }
    }
}

impl SchemaValidator for OutlineSchema {
    fn version(&self) -> &str {
        Self::VERSION
    }

    fn validate(&self, value: &Value) -> ValidationReport {
        let mut violations = Vec::new();

        let Value::Object(root) = value else {
            violations.push(violation("$", "object", type_name(value)));
            return ValidationReport::from_violations(violations);
        };

        match root.get("title") {
            Some(Value::String(_)) => {}
            Some(other) => violations.push(violation("title", "string", type_name(other))),
            None => violations.push(violation("title", "string", "missing")),
        }

        match root.get("outline") {
            Some(Value::Array(entries)) => {
                for (i, entry) in entries.iter().enumerate() {
                    let path = format!("outline[{i}]");
                    match entry {
                        Value::Object(map) => Self::check_entry(&path, map, &mut violations),
                        other => violations.push(violation(path, "object", type_name(other))),
                    }
                }
            }
            Some(other) => violations.push(violation("outline", "array", type_name(other))),
            None => violations.push(violation("outline", "array", "missing")),
        }

        ValidationReport::from_violations(violations)
    }
}

/// Packages an outline for the caller, attaching schema warnings.
pub struct ValidationAdapter {
    validator: Box<dyn SchemaValidator>,
}

impl ValidationAdapter {
    /// Adapter over the built-in [`OutlineSchema`].
    pub fn new() -> Self {
        Self::with_validator(OutlineSchema)
    }

    /// Adapter over a custom validator.
    pub fn with_validator(validator: impl SchemaValidator + 'static) -> Self {
        Self {
            validator: Box::new(validator),
        }
    }

    /// Validate the outline and wrap it in an [`ExtractionResult`].
    pub fn finish(&self, outline: Outline, stats: OutlineStats) -> ExtractionResult {
        let warnings = match serde_json::to_value(&outline) {
            Ok(value) => self
                .validator
                .validate(&value)
                .violations
                .iter()
                .map(ToString::to_string)
                .collect(),
            Err(e) => vec![format!("$: expected serializable outline, found {}", e)],
        };

        for warning in &warnings {
            log::warn!("Schema {} violation: {}", self.validator.version(), warning);
        }

        ExtractionResult {
            outline,
            warnings,
            stats,
        }
    }
}

impl Default for ValidationAdapter {
    fn default() -> Self {
        Self::new()
    }
}
