use regex_colorize::{
    classify, classify_with_flags, Category, Diagnostic, Mode,
};

// Inputs that once tripped up the classifier, or that sit right on the edge
// of some grammar rule. Each must classify in both modes without panicking,
// and the spans must cover the input.
const INPUTS: &[&str] = &[
    "",
    "\\",
    "[",
    "[^",
    "[\\",
    "[a-",
    "[-",
    "(?",
    "(?<",
    "(?<n",
    "(?<n>",
    "\\u{",
    "\\u{}",
    "\\u{FFFFFFFFFFFFFFFFFFFF}",
    "\\k<",
    "\\k<n",
    "\\p{",
    "\\c",
    "\\é",
    "[\\é-a]",
    "[é-a]",
    "[a-é]",
    "(?<é>a)",
    "a{99999999999999999999}",
    "a{1,99999999999999999999}",
    "\\99999999999999999999",
    "(((((((((((((((((((((((((((((((((((((((((((((((",
    ")))))))))))))))))))))))))))))))))))))))))))))))",
    "||||||||",
    "{{{{}}}}",
    "]]]][[[[",
    "\u{0}\u{FFFF}\u{10FFFF}",
];

#[test]
fn edge_inputs() {
    for &input in INPUTS {
        for mode in [Mode::new(), Mode::new().unicode(true)] {
            let spans = classify(input, mode).unwrap();
            let text: String = spans.iter().map(|s| s.text).collect();
            assert_eq!(input, text, "mode: {:?}", mode);
        }
    }
}

#[test]
fn long_pattern() {
    let pattern = "(a|[b-c]\\1{2,3}?)".repeat(10_000);
    let spans = classify_with_flags(&pattern, "u").unwrap();
    assert!(spans.iter().all(|s| !s.is_error()));
}

#[test]
fn deep_nesting() {
    let pattern = format!("{}a{}", "(".repeat(1 << 15), ")".repeat(1 << 15));
    let spans = classify_with_flags(&pattern, "").unwrap();
    assert!(spans.iter().all(|s| !s.is_error()));
    assert_eq!(Category::Group(1), spans[0].category);
    assert_eq!(Category::Group(5), spans[4].category);
    assert_eq!(Category::Group(1), spans[5].category);
}

#[test]
fn astral_escape_in_class_range() {
    let spans = classify_with_flags(r"[\u{1F600}-a]", "u").unwrap();
    assert_eq!(Some(Diagnostic::InvalidRange), spans[2].diagnostic());
}
