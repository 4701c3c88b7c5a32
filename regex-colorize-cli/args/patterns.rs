use std::path::Path;

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// Patterns to classify, gathered from positional arguments and from the
/// `-p/--pattern` and `--pattern-file` flags.
#[derive(Debug, Default)]
pub struct Config {
    patterns: Vec<String>,
}

impl Config {
    /// Returns every pattern given, in the order given.
    ///
    /// It is an error to give no patterns at all.
    pub fn get(&self) -> anyhow::Result<&[String]> {
        anyhow::ensure!(
            !self.patterns.is_empty(),
            "at least one pattern is required",
        );
        Ok(&self.patterns)
    }

    /// Add one pattern per line of the file at `path`.
    fn read_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        log::debug!(
            "read {} patterns from {}",
            contents.lines().count(),
            path.display(),
        );
        self.patterns.extend(contents.lines().map(String::from));
        Ok(())
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('p') | Arg::Long("pattern") => {
                let pattern = p
                    .value()
                    .and_then(|v| v.string())
                    .context("-p/--pattern")?;
                self.patterns.push(pattern);
            }
            Arg::Long("pattern-file") => {
                let path = p.value().context("--pattern-file")?;
                self.read_file(Path::new(&path))?;
            }
            Arg::Value(ref mut v) => {
                let pattern = std::mem::take(v)
                    .string()
                    .context("patterns must be valid UTF-8")?;
                self.patterns.push(pattern);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-p, --pattern <pattern>",
                "Add a pattern to this command.",
                r#"
This adds a new pattern to the command. This is useful for patterns that start
with a '-', which would otherwise be taken for a flag.

Patterns may also be given as positional arguments or read from a file with
--pattern-file. Every pattern is classified on its own, in the order given.

All patterns given must be valid UTF-8.
"#,
            ),
            Usage::new(
                "--pattern-file <path>",
                "Read patterns from the file given.",
                r#"
Reads patterns, one per line, from the file given. A pattern that spans
several lines cannot be read this way; give it with -p/--pattern instead.

All patterns given must be valid UTF-8.
"#,
            ),
        ];
        USAGES
    }
}
