use std::fmt;

/// An error that occurs when a set of regex flags cannot be used.
///
/// This is the only error that aborts classification as a whole. Problems
/// inside a pattern are reported as [`Diagnostic`](crate::Diagnostic)s on the
/// spans they affect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    flags: String,
}

/// The kind of a flag resolution error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A flag character that the dialect does not define. e.g., `gz`.
    InvalidFlag(char),
    /// A flag given more than once. e.g., `gig`.
    DuplicateFlag(char),
    /// A flag that is recognized but whose mode is not supported. This is
    /// currently only `v` (Unicode sets).
    UnsupportedMode(char),
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, flags: &str) -> Error {
        Error { kind, flags: flags.to_string() }
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the flags that were being resolved when this error occurred.
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid regex flags '{}': {}", self.flags, self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidFlag(c) => {
                write!(f, "unrecognized flag '{}'", c.escape_debug())
            }
            ErrorKind::DuplicateFlag(c) => {
                write!(f, "flag '{}' is given more than once", c)
            }
            ErrorKind::UnsupportedMode(c) => {
                write!(f, "flag '{}' is not supported", c)
            }
        }
    }
}
