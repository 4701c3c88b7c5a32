use std::collections::BTreeSet;

use crate::{
    flags::Mode,
    lex::{self, Lexer, TokenKind},
};

/// What is known about the capturing groups of a whole pattern.
///
/// This is computed before classification starts, since a backreference may
/// refer to a group that is opened later in the pattern. Whether `\k<name>`
/// is a backreference at all also depends on whether any named group exists
/// anywhere in the pattern.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CaptureInfo {
    total: u32,
    names: BTreeSet<String>,
}

impl CaptureInfo {
    /// Scan the given pattern for capturing groups.
    ///
    /// Repeated names are collected only once. They are reported as errors
    /// during classification, not here.
    pub(crate) fn scan(pattern: &str, mode: Mode) -> CaptureInfo {
        let mut info = CaptureInfo::default();
        let openings = Lexer::new(pattern, mode)
            .filter(|t| t.kind == TokenKind::GroupOpen)
            .filter(|t| lex::is_capturing(t.text));
        for token in openings {
            info.total = info.total.saturating_add(1);
            if let Some(name) = lex::capture_name(token.text) {
                info.names.insert(name.to_string());
            }
        }
        info
    }

    /// Returns the total number of capturing groups in the pattern.
    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    /// Returns true if the pattern has at least one named group.
    pub(crate) fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    /// Returns true if some group in the pattern has the given name.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(pattern: &str) -> CaptureInfo {
        CaptureInfo::scan(pattern, Mode::new())
    }

    #[test]
    fn counts_numbered_groups() {
        assert_eq!(0, scan("").total());
        assert_eq!(0, scan("abc").total());
        assert_eq!(2, scan("(a)(b)").total());
        assert_eq!(3, scan("((a)(b))").total());
        assert_eq!(1, scan("(a").total());
    }

    #[test]
    fn skips_non_capturing_groups() {
        assert_eq!(0, scan("(?:a)(?=b)(?!c)(?<=d)(?<!e)").total());
        assert_eq!(0, scan("(?a)").total());
        assert_eq!(0, scan(r"\(a\)").total());
        assert_eq!(0, scan("[(]a").total());
    }

    #[test]
    fn collects_names() {
        let info = scan("(?<year>\\d{4})-(?<month>\\d\\d)(x)");
        assert_eq!(3, info.total());
        assert!(info.has_names());
        assert!(info.contains("year"));
        assert!(info.contains("month"));
        assert!(!info.contains("day"));
        assert!(!scan("(a)").has_names());
    }

    #[test]
    fn duplicate_names_merge() {
        let info = scan("(?<n>a)(?<n>b)");
        assert_eq!(2, info.total());
        assert!(info.contains("n"));
    }

    #[test]
    fn names_after_use() {
        let info = scan(r"\k<later>(?<later>a)");
        assert_eq!(1, info.total());
        assert!(info.contains("later"));
    }
}
