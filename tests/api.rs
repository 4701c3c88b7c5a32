use regex_colorize::{
    classify, classify_with_flags, Category, Classified, Diagnostic, Error,
    ErrorKind, Mode, Span,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn auto_traits() {
    assert_send_sync::<Mode>();
    assert_send_sync::<Error>();
    assert_send_sync::<Classified<'static>>();
    assert_send_sync::<Category>();
}

#[test]
fn classify_rejects_unicode_sets() {
    let mode = Mode::new().unicode_sets(true);
    let err = classify("a", mode).unwrap_err();
    assert_eq!(&ErrorKind::UnsupportedMode('v'), err.kind());
    assert_eq!("v", err.flags());
}

#[test]
fn classify_with_flags_matches_mode() {
    let pattern = r"(?<n>a)\k<n>[\p{L}-z]\u{1F600}|{";
    for flags in ["", "u", "gimsyd", "dgimsuy"] {
        let mode: Mode = flags.parse().unwrap();
        assert_eq!(
            classify(pattern, mode).unwrap(),
            classify_with_flags(pattern, flags).unwrap(),
            "flags: {:?}",
            flags,
        );
    }
}

#[test]
fn spans_are_byte_offsets() {
    let spans = classify_with_flags("é(☃)", "").unwrap();
    let got: Vec<Span> = spans.iter().map(|s| s.span).collect();
    assert_eq!(
        got,
        vec![
            Span::new(0, 2),
            Span::new(2, 3),
            Span::new(3, 6),
            Span::new(6, 7),
        ],
    );
    for s in &spans {
        assert_eq!(s.text.len(), s.span.len());
    }
}

#[test]
fn diagnostics_carry_messages() {
    let spans = classify_with_flags("[z-a]", "").unwrap();
    let diags: Vec<Diagnostic> =
        spans.iter().filter_map(|s| s.diagnostic()).collect();
    assert_eq!(diags, vec![Diagnostic::InvalidRange]);
    assert_eq!("Reversed or invalid range", diags[0].message());
}

#[test]
fn error_messages() {
    let msg = |flags: &str| Mode::parse(flags).unwrap_err().to_string();
    assert_eq!("invalid regex flags 'gz': unrecognized flag 'z'", msg("gz"));
    assert_eq!(
        "invalid regex flags 'gig': flag 'g' is given more than once",
        msg("gig"),
    );
    assert_eq!("invalid regex flags 'v': flag 'v' is not supported", msg("v"));
    assert_eq!(
        "invalid regex flags 'g☃': unrecognized flag '☃'",
        msg("g☃"),
    );
}
