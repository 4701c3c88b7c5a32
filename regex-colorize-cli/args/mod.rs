use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

pub mod common;
pub mod mode;
pub mod patterns;

/// A group of related command line flags.
///
/// Each command builds a list of these and hands them to `configure`, which
/// offers every argument to each of them in turn until one claims it.
pub trait Configurable: Debug {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    fn usage(&self) -> &[Usage];
}

/// Offer every remaining argument to `targets`, in order, until one of them
/// claims it. An argument no target claims is an error.
///
/// `-h` and `--help` stop parsing and return the command's usage as the
/// error, with `%options%` in `usage` replaced by the options of every
/// target.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    while let Some(arg) = p.next()? {
        // A long flag name borrows from 'p', which the targets need
        // mutably, so it is copied out first.
        let long: String;
        let mut arg = match arg {
            Arg::Short('h') => {
                anyhow::bail!("{}", help(usage, targets, false))
            }
            Arg::Long("help") => {
                anyhow::bail!("{}", help(usage, targets, true))
            }
            Arg::Long(name) => {
                long = name.to_string();
                Arg::Long(&long)
            }
            Arg::Short(c) => Arg::Short(c),
            Arg::Value(value) => Arg::Value(value),
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
    Ok(())
}

fn help(
    usage: &str,
    targets: &[&mut dyn Configurable],
    long: bool,
) -> String {
    let mut usages: Vec<Usage> =
        targets.iter().flat_map(|t| t.usage().iter().copied()).collect();
    usages.sort_by_key(|u| u.sort_key());
    let options =
        if long { Usage::long(&usages) } else { Usage::short(&usages) };
    usage.replace("%options%", &options).trim().to_string()
}

/// Parses the next argument as a command name.
///
/// When there is no next argument, or it is -h/--help, the usage itself is
/// returned as the error, which is how it gets printed.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    match p.next()? {
        None | Some(Arg::Short('h')) | Some(Arg::Long("help")) => {
            anyhow::bail!("{}", usage.trim())
        }
        Some(Arg::Value(cmd)) => Ok(cmd.string()?),
        Some(arg) => Err(arg.unexpected().into()),
    }
}

/// Parses the value of a flag into `T`. Errors mention `flag_name`.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = p.value().and_then(|v| v.string()).context(flag_name)?;
    value.parse().map_err(anyhow::Error::msg).context(flag_name)
}

/// The documentation of a single flag.
///
/// `Usage::short` and `Usage::long` format a slice of these into the OPTIONS
/// section of a command's help output.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// The format of the flag, for example, `-f, --flags <flags>`.
    pub format: &'static str,
    /// A one line description shown by `-h`.
    pub short: &'static str,
    /// A longer description shown by `--help`. Paragraphs are separated by
    /// blank lines and rewrapped.
    pub long: &'static str,
}

impl Usage {
    pub const fn new(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { format, short, long }
    }

    /// Flags sort by their long name, e.g., `-q, --quiet` sorts as
    /// `--quiet`.
    fn sort_key(&self) -> &'static str {
        self.format.split_once(", ").map_or(self.format, |(_, long)| long)
    }

    /// Format a two column table of each usage's format and short
    /// description.
    pub fn short(usages: &[Usage]) -> String {
        const MIN_SPACE: usize = 2;

        let mut result = String::new();
        let max_len = match usages.iter().map(|u| u.format.len()).max() {
            None => return result,
            Some(len) => len,
        };
        for usage in usages.iter() {
            let padlen = MIN_SPACE + (max_len - usage.format.len());
            result.push_str("    ");
            result.push_str(usage.format);
            result.push_str(&" ".repeat(padlen));
            result.push_str(usage.short);
            result.push('\n');
        }
        result
    }

    /// Format each usage's format followed by its long description, indented
    /// to sit inside an OPTIONS section.
    pub fn long(usages: &[Usage]) -> String {
        let wrap_opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let mut result = String::new();
        for (i, usage) in usages.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            result.push_str("    ");
            result.push_str(usage.format);
            result.push('\n');
            for (i, paragraph) in usage.long.trim().split("\n\n").enumerate() {
                if i > 0 {
                    result.push('\n');
                }
                let flattened = paragraph.replace('\n', " ");
                for line in textwrap::wrap(&flattened, &wrap_opts) {
                    result.push_str(&line);
                    result.push('\n');
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USAGES: &[Usage] = &[
        Usage::new("-q, --quiet", "Be quiet.", "Be quiet."),
        Usage::new(
            "--pattern-file <path>",
            "Read patterns.",
            "Reads patterns.\n\nOne per line.",
        ),
    ];

    #[test]
    fn short_aligns_columns() {
        let got = Usage::short(USAGES);
        let want = "    -q, --quiet            Be quiet.\n    \
                    --pattern-file <path>  Read patterns.\n";
        assert_eq!(want, got);
    }

    #[test]
    fn long_separates_paragraphs() {
        let got = Usage::long(USAGES);
        let want = "    -q, --quiet\n        Be quiet.\n\n    \
                    --pattern-file <path>\n        Reads patterns.\n\n        \
                    One per line.\n";
        assert_eq!(want, got);
    }
}
