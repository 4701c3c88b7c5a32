use {
    regex_colorize::{classify_with_flags, ErrorKind},
    regex_colorize_test::{
        anyhow::Result, ColorizeTest, ColorizeTests, TestResult, TestRunner,
    },
};

fn suite() -> Result<ColorizeTests> {
    let mut tests = ColorizeTests::new();
    macro_rules! load {
        ($name:expr) => {{
            const DATA: &[u8] =
                include_bytes!(concat!("../testdata/", $name, ".toml"));
            tests.load_slice($name, DATA)?;
        }};
    }

    load!("alternation");
    load!("backreferences");
    load!("classes");
    load!("escapes");
    load!("flags");
    load!("groups");
    load!("quantifiers");
    load!("unicode");

    Ok(tests)
}

/// Runs every test in the TOML suites through the public API.
#[test]
fn dialect() -> Result<()> {
    TestRunner::new()?.test_iter(suite()?.iter(), run_test).assert();
    Ok(())
}

fn run_test(test: &ColorizeTest) -> TestResult {
    match classify_with_flags(test.pattern(), test.flags()) {
        Ok(spans) => {
            TestResult::spans(spans.iter().map(|s| (s.category, s.text)))
        }
        Err(err) => match *err.kind() {
            ErrorKind::InvalidFlag(_) => TestResult::rejected("invalid-flag"),
            ErrorKind::DuplicateFlag(_) => {
                TestResult::rejected("duplicate-flag")
            }
            ErrorKind::UnsupportedMode(_) => {
                TestResult::rejected("unsupported-mode")
            }
            _ => TestResult::fail(&format!("unknown error: {}", err)),
        },
    }
}
