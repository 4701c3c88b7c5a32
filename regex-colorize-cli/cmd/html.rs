use std::io::{stdout, Write};

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    regex_colorize::{Category, Classified},
};

use crate::{
    args::{self, Configurable, Usage},
    util::{ClassPosition, ClassTracker},
};

/// The default styles for the markup written by `render`. Markup is styled
/// when it sits inside an element with the `regex` class.
const STYLESHEET: &'static str = "\
.regex {color: #000; font-family: Consolas, \"Source Code Pro\", Monospace;}
.regex b {font-weight: normal;}
.regex i {font-style: normal;}
.regex u {text-decoration: none;}
.regex * {border-radius: 0.25em;}
.regex span {background: #f0f0f0;}
.regex b {background: #80c0ff; color: #092e7f;}
.regex b.bref {background: #86e9ff; color: #0d47c4;}
.regex b.err {background: #e30000; color: #fff;}
.regex i {background: #e3e3e3; font-style: italic;}
.regex i span {background: #c3c3c3; font-style: normal;}
.regex i b {background: #c3c3c3;}
.regex i u {background: #d3d3d3;}
.regex b.g1 {background: #b4fa50;}
.regex b.g2 {background: #8cd400;}
.regex b.g3 {background: #26b809; color: #fff;}
.regex b.g4 {background: #30ea60;}
.regex b.g5 {background: #0c8d15; color: #fff;}
";

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints each pattern highlighted as HTML markup, one pattern per line.

Groups and the quantifiers and alternators that belong to them are wrapped in
<b class=\"gN\">, where N is a style depth from 1 to 5. Diagnostics are wrapped
in <b class=\"err\">, with the diagnostic's message as the title. The markup is
meant to be placed in an element with the 'regex' class, which is what the
stylesheet printed by --stylesheet targets.

USAGE:
    regex-colorize html [-p <pattern> ...] [<pattern> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = args::common::Config::default();
    let mut mode = args::mode::Config::default();
    let mut patterns = args::patterns::Config::default();
    let mut html = Config::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut common, &mut mode, &mut patterns, &mut html],
    )?;

    let mode = mode.mode()?;
    let mut out = stdout().lock();
    if html.stylesheet {
        writeln!(out, "<style>\n{}</style>", STYLESHEET)?;
    }
    for pattern in patterns.get()?.iter() {
        let spans = regex_colorize::classify(pattern, mode)
            .with_context(|| format!("failed to classify {:?}", pattern))?;
        let markup = render(&spans);
        if html.wrap {
            writeln!(out, "<code class=\"regex\">{}</code>", markup)?;
        } else {
            writeln!(out, "{}", markup)?;
        }
    }
    Ok(())
}

/// Render classified spans as HTML markup.
///
/// Every character class, from its opening to its closing (or to the end of
/// the pattern when it is unclosed), is wrapped in `<i>`. Line breaks become
/// `<br>`.
pub fn render(spans: &[Classified<'_>]) -> String {
    let mut out = String::new();
    let mut tracker = ClassTracker::default();
    for span in spans.iter() {
        let position = tracker.visit(span);
        if position == ClassPosition::Open {
            out.push_str("<i>");
        }
        render_span(&mut out, span);
        if position == ClassPosition::Close {
            out.push_str("</i>");
        }
    }
    if tracker.is_inside() {
        out.push_str("</i>");
    }
    out.replace("\r\n", "<br>").replace('\n', "<br>")
}

fn render_span(out: &mut String, span: &Classified<'_>) {
    let text = escape(span.text);
    let (tag, attrs) = match span.category {
        Category::Literal | Category::ClassBody => {
            out.push_str(&text);
            return;
        }
        Category::EscapedLiteral | Category::ClassBoundary => {
            ("span", String::new())
        }
        Category::Metasequence
        | Category::Quantifier(0)
        | Category::Alternator(0) => ("b", String::new()),
        Category::Group(depth)
        | Category::Quantifier(depth)
        | Category::Alternator(depth) => {
            ("b", format!(" class=\"g{}\"", depth))
        }
        Category::Backreference => ("b", " class=\"bref\"".to_string()),
        Category::RangeHyphen => ("u", String::new()),
        Category::Error(diag) => {
            let title = escape(diag.message()).replace('"', "&quot;");
            ("b", format!(" class=\"err\" title=\"{}\"", title))
        }
    };
    out.push('<');
    out.push_str(tag);
    out.push_str(&attrs);
    out.push('>');
    out.push_str(&text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

/// Flags specific to HTML output.
#[derive(Debug, Default)]
struct Config {
    stylesheet: bool,
    wrap: bool,
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("stylesheet") => {
                self.stylesheet = true;
            }
            Arg::Long("wrap") => {
                self.wrap = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "--stylesheet",
                "Print the default stylesheet before any markup.",
                r#"
Prints a <style> element with the default highlighting styles before the
markup of any pattern. The styles apply to markup inside an element with the
'regex' class. See also --wrap.
"#,
            ),
            Usage::new(
                "--wrap",
                "Wrap the markup of each pattern in a <code> element.",
                r#"
Wraps the markup of each pattern in a <code class="regex"> element, so that
the output can be pasted into a page that uses the default stylesheet as is.
"#,
            ),
        ];
        USAGES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(pattern: &str, flags: &str) -> String {
        render(&regex_colorize::classify_with_flags(pattern, flags).unwrap())
    }

    #[test]
    fn plain_tokens() {
        assert_eq!("abc", html("abc", ""));
        assert_eq!("a<b>+</b>", html("a+", ""));
        assert_eq!("<span>\\.</span><b>\\d</b>", html(r"\.\d", ""));
        assert_eq!("a&lt;b&amp;c", html("a<b&c", ""));
        assert_eq!("a<br>b<br>c", html("a\nb\r\nc", ""));
    }

    #[test]
    fn groups() {
        assert_eq!(
            "<b class=\"g1\">(</b>a<b class=\"g1\">|</b>b\
             <b class=\"g1\">)</b><b class=\"g1\">*</b><b>|</b>c",
            html("(a|b)*|c", ""),
        );
        assert_eq!(
            "<b class=\"bref\">\\1</b><b class=\"g1\">(</b>a\
             <b class=\"g1\">)</b>",
            html(r"\1(a)", ""),
        );
    }

    #[test]
    fn classes() {
        assert_eq!(
            "<i><span>[</span>a<u>-</u>z<b>\\d</b><span>]</span></i>",
            html(r"[a-z\d]", ""),
        );
        assert_eq!(
            "<i><b class=\"err\" title=\"Unclosed character class\">[</b>\
             a</i>",
            html("[a", ""),
        );
    }

    #[test]
    fn diagnostics() {
        assert_eq!(
            "<b class=\"err\" title=\"No matching opening parenthesis\">)\
             </b>",
            html(")", ""),
        );
        assert_eq!(
            "<b class=\"err\" title=\"Unclosed grouping\">(</b>a",
            html("(a", ""),
        );
    }
}
