use {
    proptest::prelude::*,
    regex_colorize::{
        classify, Category, Classified, Diagnostic, ErrorKind, Mode,
    },
};

/// Pieces that pattern strategies are assembled from. They are chosen so
/// that random concatenations hit every part of the grammar, including the
/// malformed parts.
const PIECES: &[&str] = &[
    "a", "bc", "é", "☃", ".", "^", "$", "|", "(", ")", "(?:", "(?=", "(?!",
    "(?<=", "(?<!", "(?<n>", "(?<m>", "(?", "[", "]", "[^", "-", "{", "}",
    "{2}", "{2,}", "{3,1}", "{0,65536}", "*", "+", "?", r"\", r"\d", r"\b",
    r"\1", r"\2", r"\10", r"\8", r"\0", r"\01", r"\x4", r"\x41", r"\u",
    r"\u0041", r"\u{1F600}", r"\u{110000}", r"\c", r"\cA", r"\k", r"\k<n>",
    r"\k<z>", r"\p", r"\p{L}", r"\-", r"\/", r"\a", r"\]",
];

fn pattern_strategy() -> BoxedStrategy<String> {
    let piece = prop::sample::select(PIECES);
    prop::collection::vec(piece, 0..24).prop_map(|p| p.concat()).boxed()
}

fn mode_strategy() -> BoxedStrategy<Mode> {
    any::<bool>().prop_map(|u| Mode::new().unicode(u)).boxed()
}

fn flags_strategy() -> BoxedStrategy<String> {
    let flag = prop::sample::select(&['d', 'g', 'i', 'm', 's', 'u', 'y'][..]);
    prop::sample::subsequence(vec!['d', 'g', 'i', 'm', 's', 'u', 'y'], 0..=7)
        .prop_shuffle()
        .prop_flat_map(move |flags| {
            (Just(flags), prop::option::of(flag.clone()))
        })
        .prop_map(|(flags, extra)| {
            let mut s: String = flags.into_iter().collect();
            s.extend(extra);
            s
        })
        .boxed()
}

fn assert_coverage(
    pattern: &str,
    spans: &[Classified<'_>],
) -> Result<(), TestCaseError> {
    let mut at = 0;
    for s in spans {
        prop_assert_eq!(at, s.span.start, "gap or overlap in {:?}", pattern);
        prop_assert!(!s.span.is_empty(), "empty span in {:?}", pattern);
        prop_assert_eq!(&pattern[s.span.start..s.span.end], s.text);
        at = s.span.end;
    }
    prop_assert_eq!(at, pattern.len());
    Ok(())
}

/// Replays group openings and closings to count what should have been
/// reported as unbalanced.
fn expected_unbalanced(spans: &[Classified<'_>]) -> (usize, usize) {
    let mut stack = vec![];
    let mut unmatched_closings = 0;
    for s in spans {
        if is_in_class(s.category) {
            continue;
        }
        if s.text.starts_with('(') {
            let valid = !matches!(
                s.category,
                Category::Error(Diagnostic::InvalidGroupType)
                    | Category::Error(Diagnostic::DuplicateCaptureName)
            );
            stack.push(valid);
        } else if s.text == ")" {
            if stack.pop() != Some(true) {
                unmatched_closings += 1;
            }
        }
    }
    let unmatched_openings = stack.into_iter().filter(|&v| v).count();
    (unmatched_openings, unmatched_closings)
}

fn is_in_class(category: Category) -> bool {
    matches!(category, Category::ClassBody | Category::ClassBoundary)
}

fn count(spans: &[Classified<'_>], diag: Diagnostic) -> usize {
    spans.iter().filter(|s| s.diagnostic() == Some(diag)).count()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn coverage_of_arbitrary_strings(
        pattern in "\\PC*",
        mode in mode_strategy(),
    ) {
        let spans = classify(&pattern, mode).unwrap();
        assert_coverage(&pattern, &spans)?;
    }

    #[test]
    fn coverage(pattern in pattern_strategy(), mode in mode_strategy()) {
        let spans = classify(&pattern, mode).unwrap();
        assert_coverage(&pattern, &spans)?;
    }

    #[test]
    fn balance(pattern in pattern_strategy(), mode in mode_strategy()) {
        let spans = classify(&pattern, mode).unwrap();
        let (openings, closings) = expected_unbalanced(&spans);
        let left = count(&spans, Diagnostic::UnbalancedLeftParen);
        let right = count(&spans, Diagnostic::UnbalancedRightParen);
        prop_assert_eq!(openings, left);
        prop_assert_eq!(closings, right);
    }

    #[test]
    fn depths_stay_in_range(
        pattern in pattern_strategy(),
        mode in mode_strategy(),
    ) {
        for s in classify(&pattern, mode).unwrap() {
            match s.category {
                Category::Group(d) => prop_assert!((1..=5).contains(&d)),
                Category::Quantifier(d) | Category::Alternator(d) => {
                    prop_assert!(d <= 5)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn deterministic(pattern in pattern_strategy(), mode in mode_strategy()) {
        prop_assert_eq!(
            classify(&pattern, mode).unwrap(),
            classify(&pattern, mode).unwrap(),
        );
    }

    #[test]
    fn backreferences_resolve(
        pattern in pattern_strategy(),
        mode in mode_strategy(),
    ) {
        let spans = classify(&pattern, mode).unwrap();
        let groups = spans
            .iter()
            .filter(|s| !is_in_class(s.category))
            .filter(|s| s.text == "(" || s.text.starts_with("(?<"))
            .filter(|s| !["(?<=", "(?<!"].contains(&s.text))
            .count();
        let backrefs =
            spans.iter().filter(|s| s.category == Category::Backreference);
        for s in backrefs {
            if let Ok(n) = s.text[1..].parse::<usize>() {
                prop_assert!(n <= groups, "{:?}, {} groups", s.text, groups);
            }
        }
    }

    #[test]
    fn flag_resolution_is_idempotent(flags in flags_strategy()) {
        let first = Mode::parse(&flags);
        let second = Mode::parse(&flags);
        prop_assert_eq!(&first, &second);
        let has_duplicate = flags
            .chars()
            .enumerate()
            .any(|(i, c)| flags[..i].contains(c));
        match first {
            Ok(mode) => {
                prop_assert!(!has_duplicate);
                let canonical = mode.to_string();
                prop_assert_eq!(Mode::parse(&canonical).unwrap(), mode);
                prop_assert_eq!(canonical.len(), flags.len());
            }
            Err(err) => {
                prop_assert!(has_duplicate);
                let duplicate =
                    matches!(err.kind(), ErrorKind::DuplicateFlag(_));
                prop_assert!(duplicate);
            }
        }
    }
}
