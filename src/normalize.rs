//! Fragment cleanup before any scoring.
//!
//! Pure filtering: text is cleaned, noise fragments are dropped, and the
//! surviving fragments keep their original order.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Position, TextFragment};
use crate::options::OutlineOptions;

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Vertical slot used to recognize running headers and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Y(i64),
    Line(u32),
}

/// Removes empty, oversized, malformed and repeated fragments.
pub struct FragmentNormalizer {
    max_fragment_chars: usize,
    drop_page_numbers: bool,
    header_footer_min_pages: usize,
    header_footer_tolerance: f32,
    page_number_regex: Regex,
}

impl FragmentNormalizer {
    /// Create a normalizer from extraction options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            max_fragment_chars: options.max_fragment_chars,
            drop_page_numbers: options.drop_page_numbers,
            header_footer_min_pages: options.header_footer_min_pages,
            header_footer_tolerance: options.header_footer_tolerance,
            page_number_regex: Regex::new(
                r"(?i)^(?:page\s+)?[-–—]?\s*\d{1,4}\s*[-–—]?(?:\s+of\s+\d{1,4})?$",
            )
            .expect("page number pattern is valid"),
        }
    }

    /// Clean fragment text: ligatures, Unicode NFC, control characters, whitespace.
    pub fn clean_text(text: &str) -> String {
        let mut result = text.to_string();
        for (ligature, replacement) in LIGATURES {
            result = result.replace(ligature, replacement);
        }
        result = result.replace('\u{FFFD}', "");

        let composed: String = result
            .nfc()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        composed.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalize a document's fragments. Applying this twice gives the same result.
    pub fn normalize(&self, fragments: &[TextFragment]) -> Vec<TextFragment> {
        let mut kept = Vec::with_capacity(fragments.len());
        let mut malformed = 0usize;

        for fragment in fragments {
            if fragment.page == 0 || !fragment.font_size.is_finite() || fragment.font_size <= 0.0
            {
                malformed += 1;
                continue;
            }

            let text = Self::clean_text(&fragment.text);
            if text.is_empty() || text.chars().count() > self.max_fragment_chars {
                continue;
            }
            if self.drop_page_numbers && self.page_number_regex.is_match(&text) {
                continue;
            }

            kept.push(TextFragment {
                text,
                ..fragment.clone()
            });
        }

        if malformed > 0 {
            log::warn!(
                "Dropped {} malformed fragment(s) (page 0 or invalid font size)",
                malformed
            );
        }

        let repeated = self.find_running_lines(&kept);
        let result: Vec<TextFragment> = kept
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !repeated.contains(i))
            .map(|(_, f)| f)
            .collect();

        log::debug!(
            "Normalized {} fragments into {} ({} running header/footer lines)",
            fragments.len(),
            result.len(),
            repeated.len()
        );

        result
    }

    /// Indices of fragments repeated at the same vertical slot on enough pages.
    fn find_running_lines(&self, fragments: &[TextFragment]) -> BTreeSet<usize> {
        let mut pages_by_slot: HashMap<(&str, Slot), BTreeSet<u32>> = HashMap::new();
        for fragment in fragments {
            if let Some(slot) = self.slot(fragment.position) {
                pages_by_slot
                    .entry((fragment.text.as_str(), slot))
                    .or_default()
                    .insert(fragment.page);
            }
        }

        let mut repeated = BTreeSet::new();
        for (i, fragment) in fragments.iter().enumerate() {
            let Some(slot) = self.slot(fragment.position) else {
                continue;
            };

            let neighbours: Vec<Slot> = match slot {
                Slot::Y(bucket) => vec![
                    Slot::Y(bucket.saturating_sub(1)),
                    slot,
                    Slot::Y(bucket.saturating_add(1)),
                ],
                Slot::Line(_) => vec![slot],
            };

            let pages: BTreeSet<u32> = neighbours
                .iter()
                .filter_map(|s| pages_by_slot.get(&(fragment.text.as_str(), *s)))
                .flatten()
                .copied()
                .collect();

            if pages.len() >= self.header_footer_min_pages {
                repeated.insert(i);
            }
        }

        repeated
    }

    fn slot(&self, position: Option<Position>) -> Option<Slot> {
        match position? {
            Position::Point { y, .. } if y.is_finite() => {
                let step = if self.header_footer_tolerance > 0.0 {
                    self.header_footer_tolerance
                } else {
                    0.1
                };
                // Far-off coordinates saturate into the outermost slots
                Some(Slot::Y((y / step).floor() as i64))
            }
            Position::Point { .. } => None,
            Position::Line { line } => Some(Slot::Line(line)),
        }
    }
}

impl Default for FragmentNormalizer {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
