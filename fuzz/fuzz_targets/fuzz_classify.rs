#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    regex_colorize::{classify, Classified, Mode},
};

fuzz_target!(|data: &[u8]| {
    let _ = env_logger::try_init();

    let Ok(pattern) = std::str::from_utf8(data) else { return };
    for mode in [Mode::new(), Mode::new().unicode(true)] {
        let spans = match classify(pattern, mode) {
            Ok(spans) => spans,
            Err(err) => panic!("mode {} was rejected: {}", mode, err),
        };
        check_coverage(pattern, &spans);
    }
});

/// Spans must tile the pattern exactly, in order and without gaps.
fn check_coverage(pattern: &str, spans: &[Classified<'_>]) {
    let mut at = 0;
    for span in spans.iter() {
        assert_eq!(at, span.span.start, "gap or overlap in {:?}", pattern);
        assert_eq!(&pattern[span.span.start..span.span.end], span.text);
        at = span.span.end;
    }
    assert_eq!(pattern.len(), at, "{:?} is not fully covered", pattern);
}
