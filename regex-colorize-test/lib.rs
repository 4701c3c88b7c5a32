/*!
A crate for defining classification tests in a TOML format and running them
against a regex colorizer.

This crate does not come with any actual tests. It merely defines the test
format and provides some convenient routines for executing tests within the
context of Rust unit tests.

# Format

The entire test corpus is derived from zero or more TOML files. Each TOML
file contains zero or more tests, where each test is defined as a table via
`[[test]]`.

Each test has the following fields:

* `name` - A name for the test. It must be unique within its file. A test's
[`ColorizeTest::full_name`] is derived via `{group_name}/{name}`, where the
`group_name` is derived from the file stem (the file name without the `.toml`
suffix).
* `pattern` - The pattern to classify.
* `flags` - The flags to classify the pattern with. This is an optional field
and defaults to no flags.
* `spans` - The expected classification, as a list of `[category, text]`
pairs in pattern order. Each category is written the way a category displays
itself, e.g., `group-1` or `error:invalid-range`. The texts must concatenate
to the pattern.
* `rejected` - An optional field naming the kind of error the flags are
expected to be rejected with: one of `invalid-flag`, `duplicate-flag` or
`unsupported-mode`. A test with this field must not have any `spans`.
*/

#![deny(missing_docs)]

/// For convenience, `anyhow::Error` is used to represents errors in this
/// crate.
///
/// For this reason, `anyhow` is a public dependency and is re-exported here.
pub extern crate anyhow;

use std::{borrow::Borrow, collections::HashSet, fs, path::Path};

use {
    anyhow::{bail, Context, Result},
    serde::Deserialize,
};

const ENV_COLORIZE_TEST: &str = "REGEX_COLORIZE_TEST";
const ENV_COLORIZE_TEST_VERBOSE: &str = "REGEX_COLORIZE_TEST_VERBOSE";

/// The kinds of flag errors a test may expect.
const REJECTIONS: &[&str] =
    &["invalid-flag", "duplicate-flag", "unsupported-mode"];

/// A collection of classification tests.
#[derive(Clone, Debug, Deserialize)]
pub struct ColorizeTests {
    /// 'default' permits an empty TOML file.
    #[serde(default, rename = "test")]
    tests: Vec<ColorizeTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ColorizeTests {
    /// Create a new empty collection of tests.
    pub fn new() -> ColorizeTests {
        ColorizeTests { tests: vec![], seen: HashSet::new() }
    }

    /// Loads all of the tests in the given TOML file. The group name assigned
    /// to each test is the stem of the file name. For example, if one loads
    /// `foo/bar.toml`, then the group name for each test will be `bar`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let group_name = path
            .file_stem()
            .with_context(|| {
                format!("failed to get file name of {}", path.display())
            })?
            .to_str()
            .with_context(|| {
                format!("invalid UTF-8 found in {}", path.display())
            })?;
        self.load_slice(group_name, &data)
            .with_context(|| format!("error loading {}", path.display()))?;
        Ok(())
    }

    /// Load all of the TOML encoded tests in `data` into this collection.
    /// The given group name is assigned to all loaded tests.
    pub fn load_slice(&mut self, group_name: &str, data: &[u8]) -> Result<()> {
        let data = std::str::from_utf8(data).with_context(|| {
            format!("data in {} is not valid UTF-8", group_name)
        })?;
        let mut index = 1;
        let mut tests: ColorizeTests =
            toml::from_str(data).with_context(|| {
                format!("error decoding TOML for '{}'", group_name)
            })?;
        for t in &mut tests.tests {
            t.group = group_name.to_string();
            if t.name.is_empty() {
                t.name = format!("{}", index);
                index += 1;
            }
            t.full_name = format!("{}/{}", t.group, t.name);
            t.validate()
                .with_context(|| format!("invalid test '{}'", t.full_name))?;
            if self.seen.contains(t.full_name()) {
                bail!("found duplicate tests for name '{}'", t.full_name());
            }
            self.seen.insert(t.full_name().to_string());
        }
        self.tests.extend(tests.tests);
        Ok(())
    }

    /// Return an iterator over all tests that have been loaded. The order of
    /// the iterator corresponds to the order in which the tests were loaded.
    ///
    /// This is useful to pass to [`TestRunner::test_iter`].
    pub fn iter(&self) -> ColorizeTestsIter {
        ColorizeTestsIter(self.tests.iter())
    }
}

/// A classification test describes a pattern, the flags to classify it with
/// and the expected classification.
///
/// Each `ColorizeTest` represents a single `[[test]]` table in a TOML test
/// file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorizeTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    pattern: String,
    #[serde(default)]
    flags: String,
    #[serde(default)]
    spans: Vec<ExpectedSpan>,
    rejected: Option<String>,
}

impl ColorizeTest {
    /// Return the group name of this test.
    ///
    /// When using [`ColorizeTests::load`], the group name corresponds to the
    /// file stem. Otherwise, the group name is whatever is given to
    /// [`ColorizeTests::load_slice`].
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The name of this test, as given in the `[[test]]` block.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full name of this test, which is formed by joining the group
    /// name and the test name with a `/`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Return the pattern to classify.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Return the flags to classify the pattern with.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Return the expected classification as `(category, text)` pairs.
    pub fn spans(&self) -> Vec<(&str, &str)> {
        self.spans.iter().map(|s| (s.0.as_str(), s.1.as_str())).collect()
    }

    /// Returns the kind of error the flags of this test should be rejected
    /// with, if any.
    pub fn rejected(&self) -> Option<&str> {
        self.rejected.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if let Some(ref kind) = self.rejected {
            anyhow::ensure!(
                REJECTIONS.contains(&kind.as_str()),
                "unknown rejection '{}', expected one of {:?}",
                kind,
                REJECTIONS,
            );
            anyhow::ensure!(
                self.spans.is_empty(),
                "a rejected test cannot have spans",
            );
            return Ok(());
        }
        let texts: String = self.spans.iter().map(|s| s.1.as_str()).collect();
        anyhow::ensure!(
            texts == self.pattern,
            "span texts concatenate to {:?}, but the pattern is {:?}",
            texts,
            self.pattern,
        );
        Ok(())
    }
}

/// A single expected `[category, text]` pair.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct ExpectedSpan(String, String);

/// The result of classifying the pattern of a test.
///
/// When using the test runner, callers must provide a closure that takes a
/// `ColorizeTest` and returns a `TestResult`.
#[derive(Debug, Clone)]
pub struct TestResult {
    kind: TestResultKind,
}

#[derive(Debug, Clone)]
enum TestResultKind {
    Spans(Vec<(String, String)>),
    Rejected(String),
    Skip,
    Fail { why: String },
}

impl TestResult {
    /// Create a test result from the classification of a pattern, as a
    /// sequence of `(category, text)` pairs in pattern order.
    pub fn spans<I, C, T>(it: I) -> TestResult
    where
        I: IntoIterator<Item = (C, T)>,
        C: ToString,
        T: ToString,
    {
        let spans = it
            .into_iter()
            .map(|(c, t)| (c.to_string(), t.to_string()))
            .collect();
        TestResult { kind: TestResultKind::Spans(spans) }
    }

    /// Create a test result indicating that the flags were rejected with the
    /// given kind of error.
    pub fn rejected(kind: &str) -> TestResult {
        TestResult { kind: TestResultKind::Rejected(kind.to_string()) }
    }

    /// Indicate that this test should be skipped. It will not be counted as
    /// a failure.
    pub fn skip() -> TestResult {
        TestResult { kind: TestResultKind::Skip }
    }

    /// Indicate that this test should be failed for the reason given.
    pub fn fail(why: &str) -> TestResult {
        TestResult { kind: TestResultKind::Fail { why: why.to_string() } }
    }
}

/// A runner for executing classification tests.
///
/// This runner is intended to be used within a Rust unit test, marked with the
/// `#[test]` attribute. Typical usage corresponds to calling
/// [`TestRunner::test_iter`] on an iterator of `ColorizeTest`s, and then
/// calling `assert` once done. If any tests failed, then `assert` will panic
/// with an error message containing all test failures.
///
/// # Skipping tests
///
/// If the `REGEX_COLORIZE_TEST` environment variable is set, then it may
/// contain a comma separated list of substrings. Each substring corresponds
/// to a whitelisted item, unless it starts with a `-`, in which case it
/// corresponds to a blacklisted item.
///
/// If there are any whitelist items, then a test's full name must contain at
/// least one of the whitelist substrings in order to be run. The last
/// substring that a test name matches takes precedent.
#[derive(Debug)]
pub struct TestRunner {
    include: Vec<IncludePattern>,
    results: ColorizeTestResults,
}

impl TestRunner {
    /// Create a new runner for executing tests.
    ///
    /// This returns an error if there was a problem reading the
    /// `REGEX_COLORIZE_TEST` environment variable.
    pub fn new() -> Result<TestRunner> {
        let mut runner = TestRunner {
            include: vec![],
            results: ColorizeTestResults::new(),
        };
        for mut substring in read_env(ENV_COLORIZE_TEST)?.split(',') {
            substring = substring.trim();
            if substring.is_empty() {
                continue;
            }
            if let Some(substring) = substring.strip_prefix('-') {
                runner.blacklist(substring);
            } else {
                runner.whitelist(substring);
            }
        }
        Ok(runner)
    }

    /// Assert that all tests run have either passed or have been skipped.
    ///
    /// If any tests have failed, then a panic occurs with a report of all
    /// failures.
    pub fn assert(&mut self) {
        self.results.assert();
    }

    /// Whitelist the given substring.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: false,
            substring: substring.to_string(),
        });
        self
    }

    /// Blacklist the given substring.
    ///
    /// A blacklisted test is never run, unless a whitelisted substring added
    /// after the blacklisted substring matches it.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: true,
            substring: substring.to_string(),
        });
        self
    }

    /// Run all of the given tests using the given classifier.
    ///
    /// Failures are merely collected. Use [`TestRunner::assert`] to fail the
    /// current test if there were any.
    pub fn test_iter<I, T>(
        &mut self,
        it: I,
        mut classify: impl FnMut(&ColorizeTest) -> TestResult,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<ColorizeTest>,
    {
        for test in it {
            let test = test.borrow();
            if self.should_skip(test) {
                self.results.skip(test);
                continue;
            }
            self.test(test, |t| classify(t));
        }
        self
    }

    /// Run a single test, bypassing any whitelist or blacklist.
    pub fn test(
        &mut self,
        test: &ColorizeTest,
        mut classify: impl FnMut(&ColorizeTest) -> TestResult,
    ) -> &mut TestRunner {
        let result = match safe(|| classify(test)) {
            Ok(result) => result,
            Err(msg) => {
                // Classification should never panic. It's auto-fail if it
                // does.
                self.results.fail(test, FailureKind::UnexpectedPanic(msg));
                return self;
            }
        };
        match (result.kind, test.rejected()) {
            (TestResultKind::Skip, _) => self.results.skip(test),
            (TestResultKind::Fail { why }, _) => {
                self.results.fail(test, FailureKind::UserFailure { why })
            }
            (TestResultKind::Spans(got), None) => {
                let expected = test.spans();
                let same = got.len() == expected.len()
                    && got
                        .iter()
                        .zip(&expected)
                        .all(|(g, e)| g.0 == e.0 && g.1 == e.1);
                if same {
                    self.results.pass(test);
                } else {
                    self.results.fail(test, FailureKind::Spans { got });
                }
            }
            (TestResultKind::Spans(_), Some(_)) => {
                self.results.fail(test, FailureKind::NoRejection)
            }
            (TestResultKind::Rejected(got), Some(expected)) => {
                if got == expected {
                    self.results.pass(test);
                } else {
                    self.results.fail(test, FailureKind::Rejected { got });
                }
            }
            (TestResultKind::Rejected(got), None) => {
                self.results.fail(test, FailureKind::Rejected { got })
            }
        }
        self
    }

    /// Return true if and only if the given test should be skipped.
    fn should_skip(&self, test: &ColorizeTest) -> bool {
        if self.include.is_empty() {
            return false;
        }
        let mut skip = self.include.iter().any(|pat| !pat.blacklist);
        for pat in &self.include {
            if test.full_name().contains(&pat.substring) {
                skip = pat.blacklist;
            }
        }
        skip
    }
}

#[derive(Debug)]
struct IncludePattern {
    blacklist: bool,
    substring: String,
}

/// A collection of test results, corresponding to passed, skipped and failed
/// tests.
#[derive(Debug)]
struct ColorizeTestResults {
    pass: Vec<ColorizeTest>,
    fail: Vec<Failure>,
    skip: Vec<ColorizeTest>,
}

/// A test that failed along with the reason why.
#[derive(Debug)]
struct Failure {
    test: ColorizeTest,
    kind: FailureKind,
}

/// Describes the nature of the failed test.
#[derive(Debug)]
enum FailureKind {
    /// The test function explicitly failed the test.
    UserFailure { why: String },
    /// The classification differs from the expected one.
    Spans { got: Vec<(String, String)> },
    /// The flags were expected to be rejected, but they were accepted.
    NoRejection,
    /// The flags were rejected unexpectedly, or with an unexpected error.
    Rejected { got: String },
    /// A panic occurred. If possible, the panic message is captured.
    UnexpectedPanic(String),
}

impl ColorizeTestResults {
    fn new() -> ColorizeTestResults {
        ColorizeTestResults { pass: vec![], fail: vec![], skip: vec![] }
    }

    fn pass(&mut self, test: &ColorizeTest) {
        self.pass.push(test.clone());
    }

    fn fail(&mut self, test: &ColorizeTest, kind: FailureKind) {
        self.fail.push(Failure { test: test.clone(), kind });
    }

    fn skip(&mut self, test: &ColorizeTest) {
        self.skip.push(test.clone());
    }

    fn assert(&self) {
        if read_env(ENV_COLORIZE_TEST_VERBOSE).map_or(false, |s| s == "1") {
            self.verbose();
        }
        if self.fail.is_empty() {
            return;
        }
        let failures = self
            .fail
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<String>>()
            .join("\n\n");
        panic!(
            "found {} failures:\n{}\n{}\n{}\n\n\
             Set the REGEX_COLORIZE_TEST environment variable to filter \n\
             tests, e.g., REGEX_COLORIZE_TEST=foo,-foo2 runs every test \n\
             whose name contains foo but not foo2\n\n",
            self.fail.len(),
            "~".repeat(79),
            failures.trim(),
            "~".repeat(79),
        )
    }

    fn verbose(&self) {
        println!("{}", "~".repeat(79));
        for t in &self.skip {
            println!("skip: {}", t.full_name());
        }
        for t in &self.pass {
            println!("pass: {}", t.full_name());
        }
        for t in &self.fail {
            println!("FAIL: {}", t.test.full_name());
        }
        println!(
            "\npassed: {}, skipped: {}, failed: {}",
            self.pass.len(),
            self.skip.len(),
            self.fail.len()
        );
        println!("{}", "~".repeat(79));
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {}\n\
             pattern:     {:?}\n\
             flags:       {:?}",
            self.test.full_name(),
            self.kind.describe(&self.test)?,
            self.test.pattern(),
            self.test.flags(),
        )
    }
}

impl FailureKind {
    fn describe(
        &self,
        test: &ColorizeTest,
    ) -> Result<String, std::fmt::Error> {
        use std::fmt::Write;

        let mut buf = String::new();
        match *self {
            FailureKind::UserFailure { ref why } => {
                write!(buf, "failed by implementor because: {}", why)?;
            }
            FailureKind::Spans { ref got } => {
                writeln!(buf, "did not find expected spans")?;
                let expected = test.spans();
                let len = std::cmp::max(got.len(), expected.len());
                for i in 0..len {
                    let e = expected.get(i).copied().unwrap_or(("", ""));
                    let (gc, gt) = got
                        .get(i)
                        .map_or(("", ""), |g| (g.0.as_str(), g.1.as_str()));
                    let mark = if (gc, gt) == e { ' ' } else { '!' };
                    writeln!(
                        buf,
                        "  {} expected: {:<28} {:?}, got: {:<28} {:?}",
                        mark, e.0, e.1, gc, gt,
                    )?;
                }
            }
            FailureKind::NoRejection => {
                write!(
                    buf,
                    "expected flags to be rejected with {:?}, but they were \
                     accepted",
                    test.rejected().unwrap_or(""),
                )?;
            }
            FailureKind::Rejected { ref got } => match test.rejected() {
                Some(expected) => write!(
                    buf,
                    "expected flags to be rejected with {:?}, got {:?}",
                    expected, got,
                )?,
                None => {
                    write!(buf, "flags were unexpectedly rejected: {}", got)?
                }
            },
            FailureKind::UnexpectedPanic(ref msg) => {
                write!(buf, "got unexpected panic:\n{}", msg)?;
            }
        }
        Ok(buf)
    }
}

/// An iterator over classification tests.
///
/// This iterator is created by the [`ColorizeTests::iter`] method.
#[derive(Debug)]
pub struct ColorizeTestsIter<'a>(std::slice::Iter<'a, ColorizeTest>);

impl<'a> Iterator for ColorizeTestsIter<'a> {
    type Item = &'a ColorizeTest;

    fn next(&mut self) -> Option<&'a ColorizeTest> {
        self.0.next()
    }
}

/// Read the environment variable given. If it doesn't exist, then return an
/// empty string. Otherwise, check that it is valid UTF-8. If it isn't, return
/// a useful error message.
fn read_env(var: &str) -> Result<String> {
    let val = match std::env::var_os(var) {
        None => return Ok("".to_string()),
        Some(val) => val,
    };
    let val = val.into_string().map_err(|os| {
        anyhow::anyhow!("invalid UTF-8 in env var {}={:?}", var, os)
    })?;
    Ok(val)
}

/// Runs the given closure such that any panics are caught and converted into
/// errors. If the panic'd value could not be converted to a known error type,
/// then a generic string error message is used.
fn safe<T, F>(fun: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    use std::panic;

    panic::catch_unwind(panic::AssertUnwindSafe(fun)).map_err(|any_err| {
        if let Some(&s) = any_err.downcast_ref::<&str>() {
            s.to_owned()
        } else if let Some(s) = any_err.downcast_ref::<String>() {
            s.to_owned()
        } else {
            "UNABLE TO SHOW RESULT OF PANIC.".to_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(data: &str) -> Result<ColorizeTests> {
        let mut tests = ColorizeTests::new();
        tests.load_slice("test", data.as_bytes())?;
        Ok(tests)
    }

    #[test]
    fn ok_minimal() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a|b"
spans = [
  ["literal", "a"],
  ["alternator-0", "|"],
  ["literal", "b"],
]
"#;
        let tests = load(data).unwrap();
        let t = tests.iter().next().unwrap();
        assert_eq!("test/foo", t.full_name());
        assert_eq!("", t.flags());
        assert_eq!(None, t.rejected());
        assert_eq!(3, t.spans().len());
        assert_eq!(("alternator-0", "|"), t.spans()[1]);
    }

    #[test]
    fn ok_empty_file() {
        assert_eq!(0, load("").unwrap().iter().count());
    }

    #[test]
    fn ok_unnamed() {
        let data = r#"
[[test]]
pattern = ""

[[test]]
pattern = ""
"#;
        let tests = load(data).unwrap();
        let names: Vec<&str> = tests.iter().map(|t| t.full_name()).collect();
        assert_eq!(vec!["test/1", "test/2"], names);
    }

    #[test]
    fn ok_rejected() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a"
flags = "gg"
rejected = "duplicate-flag"
"#;
        let tests = load(data).unwrap();
        let t = tests.iter().next().unwrap();
        assert_eq!(Some("duplicate-flag"), t.rejected());
    }

    #[test]
    fn err_unknown_field() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a"
spans = [["literal", "a"]]
haystack = "a"
"#;
        assert!(load(data).is_err());
    }

    #[test]
    fn err_duplicate_names() {
        let data = r#"
[[test]]
name = "foo"
pattern = ""

[[test]]
name = "foo"
pattern = ""
"#;
        assert!(load(data).is_err());
    }

    #[test]
    fn err_spans_do_not_cover_pattern() {
        let data = r#"
[[test]]
name = "foo"
pattern = "ab"
spans = [["literal", "a"]]
"#;
        assert!(load(data).is_err());
    }

    #[test]
    fn err_rejected_with_spans() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a"
flags = "v"
rejected = "unsupported-mode"
spans = [["literal", "a"]]
"#;
        assert!(load(data).is_err());
    }

    #[test]
    fn err_unknown_rejection() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a"
rejected = "nope"
"#;
        assert!(load(data).is_err());
    }

    #[test]
    fn runner_reports_mismatches() {
        let data = r#"
[[test]]
name = "foo"
pattern = "a"
spans = [["literal", "a"]]
"#;
        let tests = load(data).unwrap();
        let mut runner = TestRunner {
            include: vec![],
            results: ColorizeTestResults::new(),
        };
        runner.test_iter(tests.iter(), |_| {
            TestResult::spans(vec![("metasequence", "a")])
        });
        assert_eq!(1, runner.results.fail.len());
        let msg = runner.results.fail[0].to_string();
        assert!(msg.contains("did not find expected spans"), "{}", msg);
    }

    #[test]
    fn runner_whitelist() {
        let data = r#"
[[test]]
name = "foo"
pattern = ""

[[test]]
name = "bar"
pattern = ""
"#;
        let tests = load(data).unwrap();
        let mut runner = TestRunner {
            include: vec![],
            results: ColorizeTestResults::new(),
        };
        let empty: Vec<(&str, &str)> = vec![];
        runner
            .whitelist("foo")
            .test_iter(tests.iter(), |_| TestResult::spans(empty.clone()));
        assert_eq!(1, runner.results.pass.len());
        assert_eq!(1, runner.results.skip.len());
    }
}
