use std::{fmt, str::FromStr};

use crate::error::{Error, ErrorKind};

/// The mode a pattern is classified under, as given by its flags.
///
/// Only the `u` flag changes how a pattern is classified. The remaining flags
/// are recorded so that a mode always round trips through its flag string,
/// e.g., for display purposes.
///
/// A `Mode` can be resolved from a flag string with [`Mode::parse`] (or
/// `str::parse`), or built up one flag at a time:
///
/// ```
/// use regex_colorize::Mode;
///
/// let mode = Mode::new().unicode(true).global(true);
/// assert_eq!(mode, "gu".parse()?);
/// assert_eq!("gu", mode.to_string());
/// # Ok::<(), regex_colorize::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Mode {
    has_indices: bool,
    global: bool,
    case_insensitive: bool,
    multi_line: bool,
    dot_all: bool,
    unicode: bool,
    unicode_sets: bool,
    sticky: bool,
}

impl Mode {
    /// Return a mode with every flag disabled.
    pub fn new() -> Mode {
        Mode::default()
    }

    /// Resolve a string of single character flags into a mode.
    ///
    /// The recognized flags are `d`, `g`, `i`, `m`, `s`, `u`, `v` and `y`, in
    /// any order.
    ///
    /// # Errors
    ///
    /// If a flag is not recognized or is given more than once, then an error
    /// is returned. If the flags request Unicode sets (`v`), an error is
    /// returned as well since that mode is not supported.
    pub fn parse(flags: &str) -> Result<Mode, Error> {
        let mut mode = Mode::default();
        // Every valid flag is ASCII, so 128 slots is plenty.
        let mut seen = [false; 128];
        for c in flags.chars() {
            mode = match c {
                'd' => mode.has_indices(true),
                'g' => mode.global(true),
                'i' => mode.case_insensitive(true),
                'm' => mode.multi_line(true),
                's' => mode.dot_all(true),
                'u' => mode.unicode(true),
                'v' => mode.unicode_sets(true),
                'y' => mode.sticky(true),
                _ => {
                    return Err(Error::new(ErrorKind::InvalidFlag(c), flags))
                }
            };
            // OK because every recognized flag is ASCII.
            let slot = usize::from(c as u8);
            if seen[slot] {
                return Err(Error::new(ErrorKind::DuplicateFlag(c), flags));
            }
            seen[slot] = true;
        }
        if mode.unicode_sets {
            return Err(Error::new(ErrorKind::UnsupportedMode('v'), flags));
        }
        Ok(mode)
    }

    /// Enable or disable the `d` flag (match indices).
    pub fn has_indices(self, yes: bool) -> Mode {
        Mode { has_indices: yes, ..self }
    }

    /// Enable or disable the `g` flag (global search).
    pub fn global(self, yes: bool) -> Mode {
        Mode { global: yes, ..self }
    }

    /// Enable or disable the `i` flag (case insensitive).
    pub fn case_insensitive(self, yes: bool) -> Mode {
        Mode { case_insensitive: yes, ..self }
    }

    /// Enable or disable the `m` flag (multi-line anchors).
    pub fn multi_line(self, yes: bool) -> Mode {
        Mode { multi_line: yes, ..self }
    }

    /// Enable or disable the `s` flag (`.` matches line terminators).
    pub fn dot_all(self, yes: bool) -> Mode {
        Mode { dot_all: yes, ..self }
    }

    /// Enable or disable the `u` flag.
    ///
    /// This is the only flag that changes classification. In Unicode-aware
    /// mode, superfluous escapes, ambiguous octal escapes, dangling
    /// backreferences and unescaped `{`, `}` and `]` are errors, while
    /// `\p{...}` property escapes and `\u{...}` code point escapes are
    /// recognized.
    pub fn unicode(self, yes: bool) -> Mode {
        Mode { unicode: yes, ..self }
    }

    /// Enable or disable the `v` flag (Unicode sets).
    ///
    /// This mode is not supported. It may be set here, but classifying a
    /// pattern with it returns an error.
    pub fn unicode_sets(self, yes: bool) -> Mode {
        Mode { unicode_sets: yes, ..self }
    }

    /// Enable or disable the `y` flag (sticky).
    pub fn sticky(self, yes: bool) -> Mode {
        Mode { sticky: yes, ..self }
    }

    /// Returns whether the `d` flag is set.
    pub fn get_has_indices(&self) -> bool {
        self.has_indices
    }

    /// Returns whether the `g` flag is set.
    pub fn get_global(&self) -> bool {
        self.global
    }

    /// Returns whether the `i` flag is set.
    pub fn get_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns whether the `m` flag is set.
    pub fn get_multi_line(&self) -> bool {
        self.multi_line
    }

    /// Returns whether the `s` flag is set.
    pub fn get_dot_all(&self) -> bool {
        self.dot_all
    }

    /// Returns whether the `u` flag is set.
    pub fn get_unicode(&self) -> bool {
        self.unicode
    }

    /// Returns whether the `v` flag is set.
    pub fn get_unicode_sets(&self) -> bool {
        self.unicode_sets
    }

    /// Returns whether the `y` flag is set.
    pub fn get_sticky(&self) -> bool {
        self.sticky
    }

    /// Returns true when patterns are classified with Unicode semantics.
    pub fn is_unicode_aware(&self) -> bool {
        self.unicode || self.unicode_sets
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(flags: &str) -> Result<Mode, Error> {
        Mode::parse(flags)
    }
}

impl fmt::Display for Mode {
    /// Writes the flags in the canonical order used by the dialect.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let flags = [
            ('d', self.has_indices),
            ('g', self.global),
            ('i', self.case_insensitive),
            ('m', self.multi_line),
            ('s', self.dot_all),
            ('u', self.unicode),
            ('v', self.unicode_sets),
            ('y', self.sticky),
        ];
        for (c, _) in flags.iter().filter(|&&(_, on)| on) {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
