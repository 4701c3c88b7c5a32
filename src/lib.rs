/*!
This crate classifies the tokens of a JavaScript regular expression so that
the pattern can be rendered with syntax highlighting and inline diagnostics.

The classifier never executes a pattern. Instead, it walks the pattern once to
discover its capturing groups and once more to classify every token, reporting
malformed, ambiguous or unsupported syntax as diagnostics attached to the
offending span. Classification always covers the entire input: concatenating
the text of every returned span yields the original pattern.

# Example

```
use regex_colorize::{classify_with_flags, Category, Diagnostic};

let spans = classify_with_flags(r"(a)\1{3,1}", "")?;
let categories: Vec<_> = spans.iter().map(|s| s.category).collect();
assert_eq!(categories, vec![
    Category::Group(1),
    Category::Literal,
    Category::Group(1),
    Category::Backreference,
    Category::Error(Diagnostic::IntervalReversed),
]);
# Ok::<(), regex_colorize::Error>(())
```

# Modes

The only way classification can fail as a whole is through its [`Mode`]:
unknown or repeated flags are rejected by [`Mode::parse`], and the `v` flag
(Unicode sets) is not supported, so it is rejected too. With the `u` flag, the
classifier applies the stricter Unicode-aware rules of the dialect.

# Crate features

* **logging** - Emits classification decisions through the `log` crate at the
  `debug` and `trace` levels.
*/

#![forbid(unsafe_code)]
#![deny(missing_docs, rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]

pub use crate::{
    error::{Error, ErrorKind},
    flags::Mode,
    span::{Category, Classified, Diagnostic, Span},
};

#[macro_use]
mod macros;

mod captures;
mod class;
mod classify;
mod error;
mod flags;
mod lex;
mod span;

/// Classify every token of `pattern` under the given mode.
///
/// The spans returned are in pattern order, do not overlap and cover the
/// whole pattern. Malformed syntax never stops classification; it is
/// reported through [`Category::Error`] spans instead.
///
/// # Errors
///
/// This returns an error only when `mode` requests Unicode sets (the `v`
/// flag), which are not supported.
pub fn classify(
    pattern: &str,
    mode: Mode,
) -> Result<Vec<Classified<'_>>, Error> {
    if mode.get_unicode_sets() {
        return Err(Error::new(
            ErrorKind::UnsupportedMode('v'),
            &mode.to_string(),
        ));
    }
    Ok(classify::Classifier::new(pattern, mode).classify())
}

/// Resolve `flags` into a [`Mode`] and then classify `pattern` with it.
///
/// # Errors
///
/// This returns an error if the flags contain an unrecognized or repeated
/// flag, or if they request an unsupported mode.
pub fn classify_with_flags<'p>(
    pattern: &'p str,
    flags: &str,
) -> Result<Vec<Classified<'p>>, Error> {
    let mode = Mode::parse(flags)?;
    classify(pattern, mode)
}
