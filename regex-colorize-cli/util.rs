use std::io::{self, Write};

use regex_colorize::{Category, Classified, Diagnostic};

/// Time an arbitrary operation.
pub fn timeit<T>(run: impl FnOnce() -> T) -> (T, std::time::Duration) {
    let start = std::time::Instant::now();
    let t = run();
    (t, start.elapsed())
}

/// Convenient time an operation that returns a result by packing the duration
/// into the `Ok` variant.
pub fn timeitr<T, E>(
    run: impl FnOnce() -> Result<T, E>,
) -> Result<(T, std::time::Duration), E> {
    let (result, time) = timeit(run);
    let t = result?;
    Ok((t, time))
}

/// A somewhat silly little thing that prints an aligned table of key-value
/// pairs. Keys can be any string and values can be anything that implements
/// Debug.
#[derive(Debug)]
pub struct Table {
    pairs: Vec<(String, Box<dyn std::fmt::Debug>)>,
}

impl Table {
    pub fn empty() -> Table {
        Table { pairs: vec![] }
    }

    pub fn add<D: std::fmt::Debug + 'static>(
        &mut self,
        label: &str,
        value: D,
    ) {
        self.pairs.push((label.to_string(), Box::new(value)));
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .alignment(tabwriter::Alignment::Right);
        for (label, value) in self.pairs.iter() {
            writeln!(wtr, "{label}:\t{value:?}")?;
        }
        wtr.flush()
    }
}

/// Where a span sits relative to the character classes of a pattern.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClassPosition {
    Outside,
    /// The opening of a class, closed or not.
    Open,
    Inside,
    Close,
}

/// Follows a stream of classified spans in order and reports which of them
/// belong to a character class.
///
/// Renderers need this since a class interior is styled as a whole, while the
/// spans themselves only say what each piece is.
#[derive(Debug, Default)]
pub struct ClassTracker {
    inside: bool,
}

impl ClassTracker {
    pub fn visit(&mut self, span: &Classified<'_>) -> ClassPosition {
        match span.category {
            Category::ClassBoundary if self.inside => {
                self.inside = false;
                ClassPosition::Close
            }
            Category::ClassBoundary
            | Category::Error(Diagnostic::UnclosedClass) => {
                self.inside = true;
                ClassPosition::Open
            }
            _ if self.inside => ClassPosition::Inside,
            _ => ClassPosition::Outside,
        }
    }

    /// Returns true if the last span visited left a class open, which only
    /// happens when that class is never closed.
    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(pattern: &str) -> Vec<ClassPosition> {
        let spans = regex_colorize::classify_with_flags(pattern, "").unwrap();
        let mut tracker = ClassTracker::default();
        spans.iter().map(|s| tracker.visit(s)).collect()
    }

    #[test]
    fn tracks_classes() {
        use self::ClassPosition::*;

        assert_eq!(
            positions(r"a[b-c]d"),
            vec![Outside, Open, Inside, Inside, Inside, Close, Outside],
        );
        assert_eq!(positions(r"[]"), vec![Open, Close]);
        assert_eq!(positions(r"[^\d"), vec![Open, Inside]);
    }

    #[test]
    fn unclosed_class_stays_open() {
        let spans = regex_colorize::classify_with_flags("x[ab", "").unwrap();
        let mut tracker = ClassTracker::default();
        for span in spans.iter() {
            tracker.visit(span);
        }
        assert!(tracker.is_inside());
    }
}
