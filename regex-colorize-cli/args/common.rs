use lexopt::{Arg, Parser};

use crate::args::{self, Configurable, Usage};

/// Flags shared by every command.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub no_table: bool,
    pub color: ColorChoice,
}

impl Config {
    pub fn table(&self) -> bool {
        !self.no_table
    }

    /// Apply the color choice to every subsequent use of `colored`.
    pub fn apply_color(&self) {
        match self.color {
            ColorChoice::Auto => colored::control::unset_override(),
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
        }
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("no-table") => {
                self.no_table = true;
            }
            Arg::Long("color") => {
                self.color = args::parse(p, "--color")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Suppress some output.",
                r#"
This is a generic flag that suppresses some (but not all) output. Which output
is suppressed depends on the command. For example, with 'regex-colorize spans'
only the summary table is printed, and with 'regex-colorize ansi' the list of
diagnostics below each pattern is omitted.
"#,
            ),
            Usage::new(
                "--no-table",
                "Omit any table of information from the output.",
                r#"
Some commands print a table summarizing the classification of each pattern,
such as the number of spans and diagnostics found. Passing this flag will
suppress that table.
"#,
            ),
            Usage::new(
                "--color <when>",
                "When to emit terminal colors: auto, always or never.",
                r#"
Controls whether terminal colors are written. With 'auto', the default, colors
are written unless the NO_COLOR environment variable is set or CLICOLOR is set
to 0. 'always' and 'never' force colors on or off.

This only affects commands that write to a terminal, such as 'regex-colorize
ansi'.
"#,
            ),
        ];
        USAGES
    }
}

/// When terminal colors are written.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<ColorChoice> {
        let choice = match s {
            "auto" => ColorChoice::Auto,
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            unk => anyhow::bail!("unrecognized color choice '{}'", unk),
        };
        Ok(choice)
    }
}
