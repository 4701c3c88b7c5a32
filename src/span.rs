use std::fmt;

/// A half-open range of byte offsets into a pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start byte offset, inclusive.
    pub start: usize,
    /// The end byte offset, exclusive.
    pub end: usize,
}

impl Span {
    /// Create a new span with the given offsets.
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when this span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A classified piece of a pattern. This is the unit of output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classified<'p> {
    /// Where this piece occurs in the pattern.
    pub span: Span,
    /// The text of the pattern covered by `span`.
    pub text: &'p str,
    /// What this piece is.
    pub category: Category,
}

impl<'p> Classified<'p> {
    /// Returns the diagnostic attached to this span, if it is an error.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self.category {
            Category::Error(diag) => Some(diag),
            _ => None,
        }
    }

    /// Returns the group-style depth of this span, if it has one.
    ///
    /// Group boundaries always have a depth in `1..=5`. Quantifiers and
    /// alternators have depth `0` unless they belong to a group.
    pub fn depth(&self) -> Option<u8> {
        match self.category {
            Category::Group(depth)
            | Category::Quantifier(depth)
            | Category::Alternator(depth) => Some(depth),
            _ => None,
        }
    }

    /// Returns true when this span carries a diagnostic.
    pub fn is_error(&self) -> bool {
        self.diagnostic().is_some()
    }
}

/// The syntactic category of a classified span.
///
/// Depths are purely presentational. They cycle through `1..=5` as groups
/// nest, so that adjacent nesting levels can be told apart visually.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// Text that matches itself.
    Literal,
    /// An escaped character that matches itself. e.g., `\.`.
    EscapedLiteral,
    /// A token with special meaning. e.g., `\d`, `.`, `^` or `\x41`.
    Metasequence,
    /// A numbered or named backreference. e.g., `\1` or `\k<name>`.
    Backreference,
    /// A group opening or closing with its style depth.
    Group(u8),
    /// A quantifier with the depth of the group it applies to, if any.
    Quantifier(u8),
    /// An alternator with the depth of its enclosing group, if any.
    Alternator(u8),
    /// The opening or closing bracket of a character class.
    ClassBoundary,
    /// Literal text inside a character class.
    ClassBody,
    /// A hyphen forming a range inside a character class.
    RangeHyphen,
    /// Malformed, ambiguous or unsupported syntax.
    Error(Diagnostic),
}

/// A problem found with a piece of a pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// A character class without its closing `]`. e.g., `[a`.
    UnclosedClass,
    /// A token missing the parts that complete it. e.g., `\x` or `\c`.
    IncompleteToken,
    /// A reversed range, or a range with a class endpoint. e.g., `[z-a]`.
    InvalidRange,
    /// A group opening that is not a recognized group type. e.g., `(?`.
    InvalidGroupType,
    /// A group opening that is never closed. e.g., `(a`.
    UnbalancedLeftParen,
    /// A group closing without a matching opening. e.g., `a)`.
    UnbalancedRightParen,
    /// An interval bound above 65,535. e.g., `a{0,65536}`.
    IntervalOverflow,
    /// An interval whose minimum exceeds its maximum. e.g., `a{5,3}`.
    IntervalReversed,
    /// A quantifier that follows nothing repeatable. e.g., `^*`.
    Unquantifiable,
    /// An alternative that is empty where that truncates the pattern.
    /// e.g., `|a`.
    EmptyAlternative,
    /// A capture name used by an earlier group. e.g., `(?<n>a)(?<n>b)`.
    DuplicateCaptureName,
    /// A backreference to a group that does not exist.
    InvalidBackreference,
    /// An escape that the dialect forbids in the current mode.
    InvalidEscape,
    /// A character that must be escaped in the current mode. e.g., `]`.
    RequiresEscape,
}

impl fmt::Display for Category {
    /// Writes a short, stable name for this category. e.g., `group-2` or
    /// `error:invalid-range`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Category::Literal => f.write_str("literal"),
            Category::EscapedLiteral => f.write_str("escaped-literal"),
            Category::Metasequence => f.write_str("metasequence"),
            Category::Backreference => f.write_str("backreference"),
            Category::Group(depth) => write!(f, "group-{}", depth),
            Category::Quantifier(depth) => write!(f, "quantifier-{}", depth),
            Category::Alternator(depth) => write!(f, "alternator-{}", depth),
            Category::ClassBoundary => f.write_str("class-boundary"),
            Category::ClassBody => f.write_str("class-body"),
            Category::RangeHyphen => f.write_str("range-hyphen"),
            Category::Error(diag) => write!(f, "error:{}", diag.name()),
        }
    }
}

impl Diagnostic {
    /// Returns a short, stable name for this diagnostic. e.g.,
    /// `invalid-range`.
    pub fn name(&self) -> &'static str {
        match *self {
            Diagnostic::UnclosedClass => "unclosed-class",
            Diagnostic::IncompleteToken => "incomplete-token",
            Diagnostic::InvalidRange => "invalid-range",
            Diagnostic::InvalidGroupType => "invalid-group-type",
            Diagnostic::UnbalancedLeftParen => "unbalanced-left-paren",
            Diagnostic::UnbalancedRightParen => "unbalanced-right-paren",
            Diagnostic::IntervalOverflow => "interval-overflow",
            Diagnostic::IntervalReversed => "interval-reversed",
            Diagnostic::Unquantifiable => "unquantifiable",
            Diagnostic::EmptyAlternative => "empty-alternative",
            Diagnostic::DuplicateCaptureName => "duplicate-capture-name",
            Diagnostic::InvalidBackreference => "invalid-backreference",
            Diagnostic::InvalidEscape => "invalid-escape",
            Diagnostic::RequiresEscape => "requires-escape",
        }
    }

    /// Returns a human readable description of this diagnostic, suitable for
    /// showing next to the span it is attached to.
    pub fn message(&self) -> &'static str {
        match *self {
            Diagnostic::UnclosedClass => "Unclosed character class",
            Diagnostic::IncompleteToken => "Incomplete regex token",
            Diagnostic::InvalidRange => "Reversed or invalid range",
            Diagnostic::InvalidGroupType => {
                "Invalid or unsupported group type"
            }
            Diagnostic::UnbalancedLeftParen => "Unclosed grouping",
            Diagnostic::UnbalancedRightParen => {
                "No matching opening parenthesis"
            }
            Diagnostic::IntervalOverflow => {
                "Interval quantifier cannot use value over 65,535"
            }
            Diagnostic::IntervalReversed => {
                "Interval quantifier range is reversed"
            }
            Diagnostic::Unquantifiable => {
                "Quantifiers must be preceded by a token that can be repeated"
            }
            Diagnostic::EmptyAlternative => {
                "Empty alternative effectively truncates the regex here"
            }
            Diagnostic::DuplicateCaptureName => {
                "Duplicate capture name"
            }
            Diagnostic::InvalidBackreference => {
                "Backreference to a missing or invalid group"
            }
            Diagnostic::InvalidEscape => "Invalid escape",
            Diagnostic::RequiresEscape => {
                "Must be escaped unless part of a valid token"
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}
