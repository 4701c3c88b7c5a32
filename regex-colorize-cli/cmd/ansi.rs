use std::io::{stdout, Write};

use {
    anyhow::Context,
    colored::{ColoredString, Colorize},
    regex_colorize::{Category, Classified},
};

use crate::{
    args,
    util::{ClassPosition, ClassTracker},
};

type Rgb = (u8, u8, u8);

const BLACK: Rgb = (0x00, 0x00, 0x00);
const WHITE: Rgb = (0xff, 0xff, 0xff);
const META_FG: Rgb = (0x09, 0x2e, 0x7f);
const META_BG: Rgb = (0x80, 0xc0, 0xff);
const BREF_FG: Rgb = (0x0d, 0x47, 0xc4);
const BREF_BG: Rgb = (0x86, 0xe9, 0xff);
const ERROR_BG: Rgb = (0xe3, 0x00, 0x00);
const ESCAPED_BG: Rgb = (0xf0, 0xf0, 0xf0);
const CLASS_BG: Rgb = (0xe3, 0xe3, 0xe3);
const CLASS_TOKEN_BG: Rgb = (0xc3, 0xc3, 0xc3);
const RANGE_BG: Rgb = (0xd3, 0xd3, 0xd3);
/// Group backgrounds by style depth, with the foreground that reads on each.
const GROUPS: [(Rgb, Rgb); 5] = [
    (BLACK, (0xb4, 0xfa, 0x50)),
    (BLACK, (0x8c, 0xd4, 0x00)),
    (WHITE, (0x26, 0xb8, 0x09)),
    (BLACK, (0x30, 0xea, 0x60)),
    (WHITE, (0x0c, 0x8d, 0x15)),
];

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints each pattern highlighted with terminal colors, one pattern per line.

Unless -q/--quiet is given, each diagnostic found in a pattern is listed below
it with its byte offsets and message.

USAGE:
    regex-colorize ansi [-p <pattern> ...] [<pattern> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = args::common::Config::default();
    let mut mode = args::mode::Config::default();
    let mut patterns = args::patterns::Config::default();
    args::configure(p, USAGE, &mut [&mut common, &mut mode, &mut patterns])?;
    common.apply_color();

    let mode = mode.mode()?;
    let mut out = stdout().lock();
    for pattern in patterns.get()?.iter() {
        let spans = regex_colorize::classify(pattern, mode)
            .with_context(|| format!("failed to classify {:?}", pattern))?;
        writeln!(out, "{}", render(&spans))?;
        if common.quiet {
            continue;
        }
        for span in spans.iter() {
            if let Some(diag) = span.diagnostic() {
                writeln!(
                    out,
                    "  {}..{} {:?}: {}",
                    span.span.start,
                    span.span.end,
                    span.text,
                    diag.message().red(),
                )?;
            }
        }
    }
    Ok(())
}

/// Render classified spans with terminal colors.
pub fn render(spans: &[Classified<'_>]) -> String {
    let mut tracker = ClassTracker::default();
    spans
        .iter()
        .map(|span| {
            let position = tracker.visit(span);
            paint(span, position).to_string()
        })
        .collect()
}

fn paint(span: &Classified<'_>, position: ClassPosition) -> ColoredString {
    let Some(style) = style(span.category, position) else {
        return span.text.normal();
    };
    let painted = span
        .text
        .truecolor(style.fg.0, style.fg.1, style.fg.2)
        .on_truecolor(style.bg.0, style.bg.1, style.bg.2);
    if style.italic {
        painted.italic()
    } else {
        painted
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Style {
    fg: Rgb,
    bg: Rgb,
    italic: bool,
}

/// Returns the style of a span, or `None` when it is printed as is.
fn style(category: Category, position: ClassPosition) -> Option<Style> {
    let in_class = position != ClassPosition::Outside;
    let plain = |fg, bg| Style { fg, bg, italic: false };
    let style = match category {
        Category::Literal => return None,
        Category::ClassBody => Style { fg: BLACK, bg: CLASS_BG, italic: true },
        Category::ClassBoundary => plain(BLACK, CLASS_TOKEN_BG),
        Category::EscapedLiteral if in_class => plain(BLACK, CLASS_TOKEN_BG),
        Category::EscapedLiteral => plain(BLACK, ESCAPED_BG),
        Category::Metasequence if in_class => Style {
            fg: META_FG,
            bg: CLASS_TOKEN_BG,
            italic: true,
        },
        Category::Metasequence
        | Category::Quantifier(0)
        | Category::Alternator(0) => plain(META_FG, META_BG),
        Category::Group(depth)
        | Category::Quantifier(depth)
        | Category::Alternator(depth) => {
            let (fg, bg) = GROUPS[usize::from(depth.clamp(1, 5)) - 1];
            plain(fg, bg)
        }
        Category::Backreference => plain(BREF_FG, BREF_BG),
        Category::RangeHyphen => {
            Style { fg: BLACK, bg: RANGE_BG, italic: true }
        }
        Category::Error(_) => plain(WHITE, ERROR_BG),
    };
    Some(style)
}

#[cfg(test)]
mod tests {
    use regex_colorize::Diagnostic;

    use super::*;

    #[test]
    fn styles() {
        let outside = ClassPosition::Outside;
        assert_eq!(None, style(Category::Literal, outside));
        assert_eq!(
            Some(GROUPS[2]),
            style(Category::Group(3), outside).map(|s| (s.fg, s.bg)),
        );
        assert_eq!(
            Some((META_FG, META_BG)),
            style(Category::Quantifier(0), outside).map(|s| (s.fg, s.bg)),
        );
        assert_eq!(
            Some(GROUPS[0]),
            style(Category::Alternator(1), outside).map(|s| (s.fg, s.bg)),
        );
        let err = Category::Error(Diagnostic::InvalidRange);
        assert_eq!(
            Some((WHITE, ERROR_BG)),
            style(err, ClassPosition::Inside).map(|s| (s.fg, s.bg)),
        );
    }

    #[test]
    fn class_tokens_are_muted() {
        let inside = ClassPosition::Inside;
        let meta = style(Category::Metasequence, inside).unwrap();
        assert_eq!(CLASS_TOKEN_BG, meta.bg);
        assert!(meta.italic);
        let outside = style(Category::Metasequence, ClassPosition::Outside);
        assert_eq!(Some(META_BG), outside.map(|s| s.bg));
    }

    #[test]
    fn uncolored_output_is_the_pattern() {
        colored::control::set_override(false);
        let pattern = r"(?<year>\d{4})-[a-z\d]+|\k<year>)";
        let spans = regex_colorize::classify_with_flags(pattern, "").unwrap();
        assert_eq!(pattern, render(&spans));
    }
}
