//! Properties of the individual pipeline stages.

use pdfoutline::{
    FontProfile, FragmentNormalizer, HeadingClassifier, HeadingLevel, OutlineAssembler,
    OutlineOptions, TextFragment,
};

fn report() -> Vec<TextFragment> {
    vec![
        TextFragment::new("Annual Report 2024", 1, 26.0).bold(),
        TextFragment::new("Revenue grew steadily across all regions this year.", 1, 10.5),
        TextFragment::new("1. Overview", 1, 18.0).bold(),
        TextFragment::new("Costs were kept flat thanks to earlier investments.", 1, 10.5),
        TextFragment::new("1.1 Markets", 2, 14.0).bold(),
        TextFragment::new("Each market is reviewed by its own regional team.", 2, 10.5),
        TextFragment::new("1.1.1 Europe", 2, 12.0).bold(),
        TextFragment::new("European sales doubled compared with last quarter.", 2, 10.5),
        TextFragment::new("2. Outlook", 3, 18.0).bold(),
        TextFragment::new("FINANCIAL STATEMENTS", 3, 10.5).bold(),
        TextFragment::new("Figures are audited by an external firm every year.", 3, 10.5),
    ]
}

#[test]
fn test_normalizer_is_idempotent() {
    let normalizer = FragmentNormalizer::default();
    let fragments = vec![
        TextFragment::new("  Eﬃcient   Design \t", 1, 14.0),
        TextFragment::new("", 1, 11.0),
        TextFragment::new("Page 2 of 10", 2, 9.0),
        TextFragment::new("Cafe\u{301} Menu", 2, 12.0),
        TextFragment::new("x".repeat(400), 2, 11.0),
        TextFragment::new("Broken size", 3, f32::NAN),
    ];

    let once = normalizer.normalize(&fragments);
    let twice = normalizer.normalize(&once);

    assert_eq!(once, twice);
    let texts: Vec<&str> = once.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["Efficient Design", "Caf\u{e9} Menu"]);
    assert!(once.iter().all(|f| !f.text.trim().is_empty()));
}

#[test]
fn test_profile_is_order_independent() {
    let options = OutlineOptions::default();
    let fragments = report();
    let forward = FontProfile::build(&fragments, &options);

    let mut reversed = fragments.clone();
    reversed.reverse();
    let backward = FontProfile::build(&reversed, &options);

    let mut rotated = fragments.clone();
    rotated.rotate_left(4);
    let rotated = FontProfile::build(&rotated, &options);

    assert_eq!(forward.body_size, 10.5);
    assert_eq!(forward.heading_sizes, vec![26.0, 18.0, 14.0, 12.0]);
    for other in [&backward, &rotated] {
        assert_eq!(other.body_size, forward.body_size);
        assert_eq!(other.heading_sizes, forward.heading_sizes);
    }
}

#[test]
fn test_profile_is_fresh_per_document() {
    let options = OutlineOptions::default();
    let first = FontProfile::build(&report(), &options);
    let small = vec![
        TextFragment::new("Notes", 1, 9.0).bold(),
        TextFragment::new("Tiny print that goes on and on here.", 1, 7.0),
        TextFragment::new("More tiny print that goes on and on.", 1, 7.0),
    ];
    let second = FontProfile::build(&small, &options);

    assert_eq!(second.body_size, 7.0);
    assert_eq!(second.heading_sizes, vec![9.0]);
    assert_eq!(first.body_size, 10.5);
}

#[test]
fn test_classification_is_per_fragment() {
    let options = OutlineOptions::default();
    let fragments = report();
    let profile = FontProfile::build(&fragments, &options);
    let classifier = HeadingClassifier::new(&options);

    let all = classifier.classify_all(&fragments, &profile);
    let individually: Vec<_> = fragments
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(i, f)| classifier.classify(f, i, &profile))
        .collect();

    assert_eq!(all.len(), individually.len());
    for (a, b) in all.iter().zip(individually.iter().rev()) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.level, b.level);
        assert_eq!(a.order, b.order);
    }
    assert!(all.iter().all(|c| HeadingLevel::ALL.contains(&c.level)));
}

#[test]
fn test_smoothing_preserves_candidate_count() {
    let options = OutlineOptions::default();
    let fragments = report();
    let profile = FontProfile::build(&fragments, &options);
    let candidates = HeadingClassifier::new(&options).classify_all(&fragments, &profile);

    let assembler = OutlineAssembler::new(&options);
    let mut deduplicated = OutlineAssembler::deduplicate(candidates);
    let before = deduplicated.len();
    assembler.smooth(&mut deduplicated);
    assert_eq!(deduplicated.len(), before);
}

#[test]
fn test_report_outline() {
    let outline = pdfoutline::extract_outline(&report());
    assert_eq!(outline.title, "Annual Report 2024");

    let entries: Vec<(HeadingLevel, &str, u32)> = outline
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect();
    assert_eq!(
        entries,
        vec![
            (HeadingLevel::H1, "1. Overview", 1),
            (HeadingLevel::H2, "1.1 Markets", 2),
            (HeadingLevel::H3, "1.1.1 Europe", 2),
            (HeadingLevel::H1, "2. Outlook", 3),
            (HeadingLevel::H3, "FINANCIAL STATEMENTS", 3),
        ]
    );
}

#[test]
fn test_title_bucket_kept_when_shared() {
    let fragments = vec![
        TextFragment::new("Field Guide", 1, 24.0).bold(),
        TextFragment::new("Birds are the focus of the first part.", 1, 11.0),
        TextFragment::new("Background", 2, 24.0).bold(),
        TextFragment::new("Watching birds takes patience and good weather.", 2, 11.0),
        TextFragment::new("Methods", 3, 18.0).bold(),
        TextFragment::new("Counts were taken at dawn on each weekend.", 3, 11.0),
    ];

    let outline = pdfoutline::extract_outline(&fragments);
    assert_eq!(outline.title, "Field Guide");
    assert_eq!(outline.outline[0].level, HeadingLevel::H1);
    assert_eq!(outline.outline[1].level, HeadingLevel::H2);
}

#[test]
fn test_closure_lexicon_changes_title_case() {
    let options = OutlineOptions::default();
    let fragment = TextFragment::new("Geschichte der Informatik", 1, 11.0).bold();
    let profile = FontProfile::empty();

    let english = HeadingClassifier::new(&options);
    let german = HeadingClassifier::new(&options)
        .with_lexicon(|word: &str| matches!(word, "der" | "die" | "das" | "und"));

    assert!(english.score(&fragment, &profile).pattern.is_none());
    assert!(german.score(&fragment, &profile).pattern.is_some());
    assert!(german.score(&fragment, &profile).score > english.score(&fragment, &profile).score);
}
