use std::io::{stdout, Write};

use {anyhow::Context, regex_colorize::Classified};

use crate::{
    args,
    util::{self, Table},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the classified spans of each pattern as a table.

Each row shows the byte offsets of a span, its category, its text and, for
diagnostics, a description of the problem. A summary of the classification is
printed above the spans of each pattern unless --no-table is given.

USAGE:
    regex-colorize spans [-p <pattern> ...] [<pattern> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = args::common::Config::default();
    let mut mode = args::mode::Config::default();
    let mut patterns = args::patterns::Config::default();
    args::configure(p, USAGE, &mut [&mut common, &mut mode, &mut patterns])?;

    let mode = mode.mode()?;
    let mut out = stdout().lock();
    for (i, pattern) in patterns.get()?.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let (spans, time) =
            util::timeitr(|| regex_colorize::classify(pattern, mode))
                .with_context(|| {
                    format!("failed to classify {:?}", pattern)
                })?;
        if common.table() {
            let mut table = Table::empty();
            table.add("pattern", pattern.clone());
            table.add("flags", mode.to_string());
            table.add("spans", spans.len());
            let diagnostics = spans.iter().filter(|s| s.is_error()).count();
            table.add("diagnostics", diagnostics);
            table.add("classify time", time);
            table.print(&mut out)?;
        }
        if !common.quiet {
            if common.table() {
                writeln!(out)?;
            }
            print_spans(&mut out, &spans)?;
        }
    }
    Ok(())
}

/// Write one aligned row per span.
fn print_spans<W: Write>(
    wtr: W,
    spans: &[Classified<'_>],
) -> std::io::Result<()> {
    let mut wtr = tabwriter::TabWriter::new(wtr);
    for span in spans.iter() {
        let message = span.diagnostic().map_or("", |d| d.message());
        writeln!(
            wtr,
            "{}..{}\t{}\t{:?}\t{}",
            span.span.start, span.span.end, span.category, span.text, message,
        )?;
    }
    wtr.flush()
}
