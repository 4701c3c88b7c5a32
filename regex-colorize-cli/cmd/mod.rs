mod ansi;
mod html;
mod spans;

const USAGE: &'static str = "\
A tool for highlighting JavaScript regular expressions on the command line.

Every pattern is classified token by token. Malformed, ambiguous and
unsupported syntax never stops classification; it is reported inline as a
diagnostic attached to the offending text.

USAGE:
    regex-colorize <command> ...

COMMANDS:
    ansi   Print patterns highlighted with terminal colors.
    html   Print patterns highlighted as HTML markup.
    spans  Print the classified spans of patterns as a table.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "ansi" => ansi::run(p),
        "html" => html::run(p),
        "spans" => spans::run(p),
        unk => anyhow::bail!("unrecognized command '{unk}'"),
    }
}
