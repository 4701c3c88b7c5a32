use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex_colorize::Mode,
};

use crate::args::{Configurable, Usage};

/// Flags that determine the mode a pattern is classified under.
#[derive(Debug, Default)]
pub struct Config {
    flags: Option<String>,
    unicode: bool,
    case_insensitive: bool,
}

impl Config {
    /// Resolve the flag string and any shortcut flags into a mode.
    ///
    /// A shortcut flag that repeats a flag already in the flag string is not
    /// an error, since both ask for the same thing.
    pub fn mode(&self) -> anyhow::Result<Mode> {
        let flags = self.flags.as_deref().unwrap_or("");
        let mut mode = Mode::parse(flags)
            .with_context(|| format!("invalid flags '{}'", flags))?;
        if self.unicode {
            mode = mode.unicode(true);
        }
        if self.case_insensitive {
            mode = mode.case_insensitive(true);
        }
        Ok(mode)
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('f') | Arg::Long("flags") => {
                let flags = p.value().context("-f/--flags needs a value")?;
                let flags =
                    flags.string().context("-f/--flags must be valid UTF-8")?;
                self.flags = Some(flags);
            }
            Arg::Short('u') | Arg::Long("unicode") => {
                self.unicode = true;
            }
            Arg::Short('i') | Arg::Long("case-insensitive") => {
                self.case_insensitive = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-f, --flags <flags>",
                "The flags every pattern is classified with.",
                r#"
Sets the flags that every pattern is classified with, written the way they
follow a regex literal. For example, '-f gu'. The recognized flags are d, g, i,
m, s, u, v and y, and each may be given at most once.

Only the u flag changes how a pattern is classified: it enables the stricter
Unicode-aware rules. Unicode sets (the v flag) are not supported and are
rejected.
"#,
            ),
            Usage::new(
                "-u, --unicode",
                "Classify with the u flag.",
                r#"
A shortcut for adding the u flag to the flags given with -f/--flags.
"#,
            ),
            Usage::new(
                "-i, --case-insensitive",
                "Classify with the i flag.",
                r#"
A shortcut for adding the i flag to the flags given with -f/--flags. This flag
does not change how a pattern is classified, but it is shown in the flags
reported by commands that print a summary.
"#,
            ),
        ];
        USAGES
    }
}
