//! Document-wide font statistics.
//!
//! A [`FontProfile`] is built once per document, after normalization and
//! before any fragment is scored. It is a plain value: nothing is cached
//! between documents.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::model::{HeadingLevel, TextFragment};
use crate::options::OutlineOptions;

/// Body size reported for documents without usable fragments.
const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Body-to-heading gap used until a document's options are applied.
const DEFAULT_GAP: f32 = 0.5;

/// Round a font size to 0.1pt precision.
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// A group of heading font sizes treated as one level.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeBucket {
    /// Largest size in the group
    pub top: f32,
    /// Smallest size in the group
    pub floor: f32,
    /// Level mapped to this group (only the three largest groups get one)
    pub level: Option<HeadingLevel>,
}

/// Font statistics for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProfile {
    /// Body text font size (most common among paragraph-like fragments)
    pub body_size: f32,
    /// Heading sizes (bucket tops), largest first
    pub heading_sizes: Vec<f32>,
    /// Heading size groups, largest first
    pub buckets: Vec<SizeBucket>,
    /// Fragment count per size, keyed in tenths of a point
    pub size_histogram: BTreeMap<i32, usize>,
    /// Minimum distance between body and heading sizes
    gap: f32,
}

impl FontProfile {
    /// Profile with no heading sizes at all.
    pub fn empty() -> Self {
        Self {
            body_size: DEFAULT_BODY_SIZE,
            heading_sizes: Vec::new(),
            buckets: Vec::new(),
            size_histogram: BTreeMap::new(),
            gap: DEFAULT_GAP,
        }
    }

    /// Build the profile for a document's normalized fragments.
    pub fn build(fragments: &[TextFragment], options: &OutlineOptions) -> Self {
        let mut profile = Self::empty();
        if fragments.is_empty() {
            return profile;
        }
        profile.gap = options.min_heading_gap;

        let mut body_votes: BTreeMap<i32, usize> = BTreeMap::new();
        for fragment in fragments {
            let key = size_key(fragment.font_size);
            *profile.size_histogram.entry(key).or_insert(0) += 1;
            if fragment.word_count() >= options.min_body_words {
                *body_votes.entry(key).or_insert(0) += 1;
            }
        }

        let votes = if body_votes.is_empty() {
            &profile.size_histogram
        } else {
            &body_votes
        };
        // Most frequent size; ties go to the smaller size so input order never matters
        let body_key = votes
            .iter()
            .max_by_key(|(key, count)| (**count, Reverse(**key)))
            .map(|(key, _)| *key)
            .unwrap_or_else(|| size_key(DEFAULT_BODY_SIZE));
        profile.body_size = key_size(body_key);

        if fragments.len() < options.min_profile_fragments {
            log::debug!(
                "Only {} fragments, skipping heading size detection",
                fragments.len()
            );
            return profile;
        }

        let gap_key = size_key(options.min_heading_gap);
        let larger: Vec<i32> = profile
            .size_histogram
            .keys()
            .rev()
            .copied()
            .filter(|key| *key > body_key && key - body_key >= gap_key)
            .collect();

        if larger.is_empty() {
            log::debug!(
                "No font sizes above body size {:.1}pt, using style and pattern signals only",
                profile.body_size
            );
            return profile;
        }

        let mut groups: Vec<(i32, i32)> = Vec::new();
        for key in larger {
            match groups.last_mut() {
                Some((_, floor)) if *floor - key < gap_key => *floor = key,
                _ => groups.push((key, key)),
            }
        }

        profile.buckets = groups
            .into_iter()
            .enumerate()
            .map(|(i, (top, floor))| SizeBucket {
                top: key_size(top),
                floor: key_size(floor),
                level: HeadingLevel::ALL.get(i).copied(),
            })
            .collect();
        profile.heading_sizes = profile.buckets.iter().map(|b| b.top).collect();

        log::debug!(
            "Font profile: body={:.1}pt, heading sizes={:?}",
            profile.body_size,
            profile.heading_sizes
        );

        profile
    }

    /// Index of the bucket a font size falls into.
    pub fn bucket_index(&self, font_size: f32) -> Option<usize> {
        let key = size_key(font_size);
        self.buckets
            .iter()
            .position(|bucket| key >= size_key(bucket.floor))
    }

    /// Heading level supported by a font size, if its bucket is mapped.
    pub fn level_for(&self, font_size: f32) -> Option<HeadingLevel> {
        self.bucket_index(font_size)
            .and_then(|i| self.buckets[i].level)
    }

    /// Shallowest level a numbered fragment may take when its own size has
    /// no level: one below the deepest mapped bucket it does not reach.
    pub fn level_floor(&self, font_size: f32) -> Option<HeadingLevel> {
        let key = size_key(font_size);
        self.buckets
            .iter()
            .filter(|bucket| key < size_key(bucket.floor))
            .filter_map(|bucket| bucket.level)
            .last()
            .map(HeadingLevel::deeper)
    }

    /// True when the size is noticeably larger than body text.
    pub fn is_above_body(&self, font_size: f32) -> bool {
        let key = size_key(font_size);
        let body = size_key(self.body_size);
        key > body && key - body >= size_key(self.gap)
    }

    /// Copy of this profile with one bucket removed and levels re-mapped.
    pub fn without_bucket(&self, index: usize) -> Self {
        let mut profile = self.clone();
        if index < profile.buckets.len() {
            profile.buckets.remove(index);
            for (i, bucket) in profile.buckets.iter_mut().enumerate() {
                bucket.level = HeadingLevel::ALL.get(i).copied();
            }
            profile.heading_sizes = profile.buckets.iter().map(|b| b.top).collect();
        }
        profile
    }
}

impl Default for FontProfile {
    fn default() -> Self {
        Self::empty()
    }
}
