#![no_main]

use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzData {
    pattern: String,
    flags: String,
}

fuzz_target!(|data: FuzzData| {
    let _ = env_logger::try_init();

    let spans = match regex_colorize::classify_with_flags(
        &data.pattern,
        &data.flags,
    ) {
        Ok(spans) => spans,
        Err(_) => return,
    };
    let text: String = spans.iter().map(|s| s.text).collect();
    assert_eq!(data.pattern, text);
    // Flags that resolve must round trip through their canonical form.
    let mode: regex_colorize::Mode =
        data.flags.parse().expect("flags resolved once");
    assert_eq!(mode, mode.to_string().parse().expect("canonical flags"));
});
