//! Outline assembly from heading candidates.
//!
//! Steps, in order: title selection, deduplication of repeated runs,
//! hierarchy smoothing, and emission in page/document order.

use crate::classify::resolve_level;
use crate::model::{HeadingCandidate, HeadingLevel, Outline};
use crate::normalize::FragmentNormalizer;
use crate::options::OutlineOptions;
use crate::profile::FontProfile;

/// Captions that are never picked as the document title.
const GENERIC_CAPTIONS: [&str; 5] = [
    "contents",
    "table of contents",
    "abstract",
    "index",
    "summary",
];

fn normalized_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Turns an ordered candidate list into the final outline.
pub struct OutlineAssembler {
    hierarchy_gap: f32,
}

impl OutlineAssembler {
    /// Create an assembler from extraction options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            hierarchy_gap: options.hierarchy_gap,
        }
    }

    /// Assemble the outline.
    ///
    /// `metadata_title` is used only when no candidate qualifies as title.
    pub fn assemble(
        &self,
        mut candidates: Vec<HeadingCandidate>,
        profile: &FontProfile,
        metadata_title: Option<&str>,
    ) -> Outline {
        candidates.sort_by_key(|c| (c.page, c.order));

        let title = match Self::select_title(&candidates) {
            Some(index) => {
                let title = candidates.remove(index);
                let key = normalized_key(&title.text);
                candidates.retain(|c| c.page != title.page || normalized_key(&c.text) != key);
                Self::release_title_size(&mut candidates, &title, profile);
                title.text
            }
            None => metadata_title
                .map(FragmentNormalizer::clean_text)
                .unwrap_or_default(),
        };

        let mut candidates = Self::deduplicate(candidates);
        self.smooth(&mut candidates);

        let mut outline = Outline::new(title);
        for candidate in candidates {
            outline.push(candidate.level, candidate.text, candidate.page);
        }

        log::debug!(
            "Assembled outline {:?}: {} H1, {} H2, {} H3",
            outline.title,
            outline.count_level(HeadingLevel::H1),
            outline.count_level(HeadingLevel::H2),
            outline.count_level(HeadingLevel::H3)
        );

        outline
    }

    /// Index of the title: the largest font on the first page holding a
    /// non-caption candidate, first in document order on ties.
    pub fn select_title(candidates: &[HeadingCandidate]) -> Option<usize> {
        let is_caption =
            |c: &HeadingCandidate| GENERIC_CAPTIONS.contains(&normalized_key(&c.text).as_str());
        let first_page = candidates
            .iter()
            .filter(|&c| !is_caption(c))
            .map(|c| c.page)
            .min()?;

        let mut best: Option<usize> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.page != first_page || is_caption(candidate) {
                continue;
            }
            match best {
                Some(b)
                    if size_key(candidates[b].font_size()) >= size_key(candidate.font_size()) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// When nothing else shares the title's size bucket, that size is not a
    /// heading level: drop it and re-resolve the remaining levels.
    fn release_title_size(
        candidates: &mut [HeadingCandidate],
        title: &HeadingCandidate,
        profile: &FontProfile,
    ) {
        let Some(bucket) = profile.bucket_index(title.font_size()) else {
            return;
        };
        if candidates
            .iter()
            .any(|c| profile.bucket_index(c.font_size()) == Some(bucket))
        {
            return;
        }

        let reduced = profile.without_bucket(bucket);
        for candidate in candidates.iter_mut() {
            candidate.level =
                resolve_level(&reduced, candidate.font_size(), candidate.pattern_level);
        }
    }

    /// Collapse consecutive same-page candidates with identical text and level.
    pub fn deduplicate(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        let mut result: Vec<HeadingCandidate> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(last) = result.last() {
                if last.page == candidate.page
                    && last.level == candidate.level
                    && normalized_key(&last.text) == normalized_key(&candidate.text)
                {
                    continue;
                }
            }
            result.push(candidate);
        }
        result
    }

    /// Raise entries that skip more than one level below the previous entry,
    /// unless their font is at least `hierarchy_gap` points smaller.
    /// Never removes an entry.
    pub fn smooth(&self, candidates: &mut [HeadingCandidate]) {
        let mut previous: Option<(HeadingLevel, f32)> = None;

        for candidate in candidates.iter_mut() {
            if let Some((prev_level, prev_size)) = previous {
                let skips = candidate.level.depth() > prev_level.depth() + 1;
                let justified = prev_size - candidate.font_size() >= self.hierarchy_gap;
                if skips && !justified {
                    log::debug!(
                        "Smoothing {:?} from {} to {}",
                        candidate.text,
                        candidate.level,
                        prev_level.deeper()
                    );
                    candidate.level = prev_level.deeper();
                }
            }
            previous = Some((candidate.level, candidate.font_size()));
        }
    }
}

impl Default for OutlineAssembler {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextFragment;

    fn candidate(text: &str, page: u32, size: f32, level: HeadingLevel) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            page,
            level,
            score: 5.0,
            pattern_level: None,
            order: 0,
            source: TextFragment::new(text, page, size),
        }
    }

    fn ordered(mut candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        for (i, c) in candidates.iter_mut().enumerate() {
            c.order = i;
        }
        candidates
    }

    #[test]
    fn test_select_title_largest_on_first_page() {
        let candidates = ordered(vec![
            candidate("Header Logo", 1, 14.0, HeadingLevel::H3),
            candidate("Annual Report", 1, 22.0, HeadingLevel::H1),
            candidate("Second Big", 1, 22.0, HeadingLevel::H1),
            candidate("Huge Later", 2, 30.0, HeadingLevel::H1),
        ]);

        assert_eq!(OutlineAssembler::select_title(&candidates), Some(1));
    }

    #[test]
    fn test_select_title_first_page_with_candidates() {
        let candidates = ordered(vec![
            candidate("Overview", 3, 16.0, HeadingLevel::H1),
            candidate("Details", 4, 20.0, HeadingLevel::H1),
        ]);

        assert_eq!(OutlineAssembler::select_title(&candidates), Some(0));
    }

    #[test]
    fn test_select_title_skips_generic_captions() {
        let candidates = ordered(vec![
            candidate("Table of Contents", 1, 24.0, HeadingLevel::H1),
            candidate("Field Guide", 1, 20.0, HeadingLevel::H1),
        ]);

        assert_eq!(OutlineAssembler::select_title(&candidates), Some(1));
        assert_eq!(OutlineAssembler::select_title(&[]), None);
    }

    #[test]
    fn test_title_after_caption_only_page() {
        let assembler = OutlineAssembler::default();
        let candidates = ordered(vec![
            candidate("Table of Contents", 1, 24.0, HeadingLevel::H1),
            candidate("Field Guide to Birds", 2, 24.0, HeadingLevel::H1),
            candidate("Methods", 3, 18.0, HeadingLevel::H2),
        ]);
        assert_eq!(OutlineAssembler::select_title(&candidates), Some(1));

        let outline = assembler.assemble(candidates, &FontProfile::empty(), Some("Scan 0042"));
        assert_eq!(outline.title, "Field Guide to Birds");
        let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Table of Contents", "Methods"]);

        let captions = ordered(vec![candidate("Abstract", 1, 24.0, HeadingLevel::H1)]);
        assert_eq!(OutlineAssembler::select_title(&captions), None);
    }

    #[test]
    fn test_title_removed_with_repeats() {
        let assembler = OutlineAssembler::default();
        let candidates = ordered(vec![
            candidate("Field Guide", 1, 24.0, HeadingLevel::H1),
            candidate("Field  guide", 1, 24.0, HeadingLevel::H1),
            candidate("Birds", 2, 18.0, HeadingLevel::H2),
        ]);

        let outline = assembler.assemble(candidates, &FontProfile::empty(), None);
        assert_eq!(outline.title, "Field Guide");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.outline[0].text, "Birds");
    }

    #[test]
    fn test_metadata_title_fallback() {
        let assembler = OutlineAssembler::default();

        let outline = assembler.assemble(Vec::new(), &FontProfile::empty(), Some("  Q3  Report "));
        assert_eq!(outline.title, "Q3 Report");
        assert!(outline.outline.is_empty());

        let outline = assembler.assemble(Vec::new(), &FontProfile::empty(), None);
        assert_eq!(outline.title, "");
    }

    #[test]
    fn test_deduplicate_consecutive_only() {
        let candidates = ordered(vec![
            candidate("Results", 2, 14.0, HeadingLevel::H2),
            candidate("results", 2, 14.0, HeadingLevel::H2),
            candidate("Results", 2, 14.0, HeadingLevel::H3),
            candidate("Results", 3, 14.0, HeadingLevel::H3),
            candidate("Discussion", 3, 14.0, HeadingLevel::H2),
            candidate("Results", 3, 14.0, HeadingLevel::H3),
        ]);

        let result = OutlineAssembler::deduplicate(candidates);
        let summary: Vec<(&str, u32)> = result.iter().map(|c| (c.text.as_str(), c.page)).collect();
        assert_eq!(
            summary,
            vec![
                ("Results", 2),
                ("Results", 2),
                ("Results", 3),
                ("Discussion", 3),
                ("Results", 3)
            ]
        );
    }

    #[test]
    fn test_smooth_raises_unjustified_skip() {
        let assembler = OutlineAssembler::default();
        let mut candidates = ordered(vec![
            candidate("Part One", 1, 18.0, HeadingLevel::H1),
            candidate("Detail", 1, 16.0, HeadingLevel::H3),
            candidate("More Detail", 2, 16.0, HeadingLevel::H3),
        ]);

        assembler.smooth(&mut candidates);
        let levels: Vec<HeadingLevel> = candidates.iter().map(|c| c.level).collect();
        assert_eq!(
            levels,
            vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
        );
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_smooth_keeps_justified_skip() {
        let assembler = OutlineAssembler::default();
        let mut candidates = ordered(vec![
            candidate("Part One", 1, 20.0, HeadingLevel::H1),
            candidate("Fine Print", 1, 12.0, HeadingLevel::H3),
        ]);

        assembler.smooth(&mut candidates);
        assert_eq!(candidates[1].level, HeadingLevel::H3);
    }

    #[test]
    fn test_smooth_leaves_first_entry() {
        let assembler = OutlineAssembler::default();
        let mut candidates = ordered(vec![candidate("Deep Start", 1, 12.0, HeadingLevel::H3)]);

        assembler.smooth(&mut candidates);
        assert_eq!(candidates[0].level, HeadingLevel::H3);
    }

    #[test]
    fn test_emits_in_page_order() {
        let assembler = OutlineAssembler::default();
        let mut late = candidate("Later", 3, 14.0, HeadingLevel::H2);
        late.order = 9;
        let mut early = candidate("Earlier", 2, 14.0, HeadingLevel::H2);
        early.order = 4;
        let mut title = candidate("Handbook", 1, 24.0, HeadingLevel::H1);
        title.order = 0;

        let outline = assembler.assemble(vec![late, early, title], &FontProfile::empty(), None);
        let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Earlier", "Later"]);
    }
}
