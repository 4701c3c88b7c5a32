// Character classes have their own syntax rules, which are different (and
// sometimes subtly so) from the rules of the surrounding pattern. Anchors and
// quantifiers are plain literals here, `-` may form a range and a `]` closes
// the class unless it is escaped. So the top-level lexer hands over each class
// as one opaque token, and this module tokenizes and classifies its interior.

use crate::{
    lex::{self, Cursor, EscapeContext, Token},
    span::{Category, Classified, Diagnostic, Span},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ClassTokenKind {
    /// A run of chars other than `\` and `-`.
    Literal,
    Hyphen,
    Escape,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ClassToken<'p> {
    kind: ClassTokenKind,
    span: Span,
    text: &'p str,
}

/// A scanner over the interior of a character class, i.e., everything
/// between the opening `[` (or `[^`) and the closing `]`.
#[derive(Clone, Debug)]
struct ClassLexer<'p> {
    cursor: Cursor<'p>,
    /// The offset of the interior in the whole pattern.
    base: usize,
    unicode: bool,
}

impl<'p> Iterator for ClassLexer<'p> {
    type Item = ClassToken<'p>;

    fn next(&mut self) -> Option<ClassToken<'p>> {
        let cur = &mut self.cursor;
        if cur.is_done() {
            return None;
        }
        let start = cur.pos();
        let kind = if cur.bump_if("\\") {
            lex::scan_escape(cur, self.unicode, EscapeContext::Class);
            ClassTokenKind::Escape
        } else if cur.bump_if("-") {
            ClassTokenKind::Hyphen
        } else {
            cur.bump_while(|c| c != '\\' && c != '-');
            ClassTokenKind::Literal
        };
        let span = Span::new(self.base + start, self.base + cur.pos());
        Some(ClassToken { kind, span, text: cur.since(start) })
    }
}

/// What kind of token was last seen, for the purposes of range formation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Last {
    None,
    RangeHyphen,
    /// A shorthand class like `\d` or a property escape like `\p{L}`.
    Shorthand,
}

/// The state threaded from one class token to the next.
#[derive(Clone, Copy, Debug)]
struct ClassContext {
    /// Whether the last token may start a range.
    rangeable: bool,
    last: Last,
    /// The code point of the last token, when it denotes a single one.
    code: Option<u32>,
}

impl ClassContext {
    fn start() -> ClassContext {
        ClassContext { rangeable: false, last: Last::None, code: None }
    }

    /// The context following a single token. The token may start a range,
    /// unless it ended a range itself.
    fn after(self, last: Last, code: Option<u32>) -> ClassContext {
        ClassContext { rangeable: self.last != Last::RangeHyphen, last, code }
    }
}

/// Classify the given character class token, appending its spans to `out`.
///
/// The opening and closing brackets become class boundaries. When the class
/// is never closed, its opening is reported as unclosed but its interior is
/// still classified.
pub(crate) fn classify_class<'p>(
    token: &Token<'p>,
    unicode: bool,
    out: &mut Vec<Classified<'p>>,
) {
    let text = token.text;
    let start = token.span.start;
    let (open, close) = split_class(text);
    let closed = close < text.len();
    trace!("class {:?} (closed: {})", text, closed);

    let opening = if closed {
        Category::ClassBoundary
    } else {
        Category::Error(Diagnostic::UnclosedClass)
    };
    out.push(Classified {
        span: Span::new(start, start + open),
        text: &text[..open],
        category: opening,
    });

    let lexer = ClassLexer {
        cursor: Cursor::new(&text[open..close]),
        base: start + open,
        unicode,
    };
    let tokens: Vec<ClassToken<'p>> = lexer.collect();
    let mut ctx = ClassContext::start();
    for (i, tok) in tokens.iter().enumerate() {
        let (category, next_ctx) = match tok.kind {
            ClassTokenKind::Literal => literal(ctx, tok.text),
            ClassTokenKind::Hyphen => hyphen(ctx, tokens.get(i + 1), unicode),
            ClassTokenKind::Escape => escape(ctx, tok.text, unicode),
        };
        out.push(Classified { span: tok.span, text: tok.text, category });
        ctx = next_ctx;
    }

    if closed {
        out.push(Classified {
            span: Span::new(start + close, token.span.end),
            text: &text[close..],
            category: Category::ClassBoundary,
        });
    }
}

/// Returns the length of the opening of the given class and the offset of
/// its closing `]`. When the class is unclosed, the offset returned is the
/// length of the class text.
fn split_class(text: &str) -> (usize, usize) {
    let open = if text.starts_with("[^") { 2 } else { 1 };
    let mut cur = Cursor::new(text);
    cur.bump_len(open);
    while let Some(c) = cur.char() {
        if c == ']' {
            return (open, cur.pos());
        }
        cur.bump();
        if c == '\\' {
            cur.bump();
        }
    }
    (open, text.len())
}

fn literal(ctx: ClassContext, text: &str) -> (Category, ClassContext) {
    // A run of several chars always ends with a char that is not the end of
    // a range, so it can start a new one.
    let rangeable =
        text.chars().nth(1).is_some() || ctx.last != Last::RangeHyphen;
    let code = text.chars().last().map(u32::from);
    (
        Category::ClassBody,
        ClassContext { rangeable, last: Last::None, code },
    )
}

fn hyphen(
    ctx: ClassContext,
    next: Option<&ClassToken<'_>>,
    unicode: bool,
) -> (Category, ClassContext) {
    let literal =
        (Category::ClassBody, ctx.after(Last::None, Some(u32::from('-'))));
    if !ctx.rangeable {
        return literal;
    }
    // A trailing hyphen is always a literal.
    let Some(next) = next else { return literal };
    let reversed = match (ctx.code, char_code(next.text, unicode)) {
        (Some(start), Some(end)) => start > end,
        _ => false,
    };
    let invalid = reversed
        || ctx.last == Last::Shorthand
        || is_class_escape(next.text, unicode);
    let category = if invalid {
        Category::Error(Diagnostic::InvalidRange)
    } else {
        Category::RangeHyphen
    };
    let ctx =
        ClassContext { rangeable: false, last: Last::RangeHyphen, code: None };
    (category, ctx)
}

fn escape(
    ctx: ClassContext,
    text: &str,
    unicode: bool,
) -> (Category, ClassContext) {
    if is_incomplete(text, unicode) {
        let diag = Diagnostic::IncompleteToken;
        return (Category::Error(diag), ctx.after(Last::None, None));
    }
    if is_class_escape(text, unicode) {
        return (Category::Metasequence, ctx.after(Last::Shorthand, None));
    }
    if unicode && !is_valid_unicode_escape(text) {
        let diag = Diagnostic::InvalidEscape;
        return (Category::Error(diag), ctx.after(Last::None, None));
    }
    let code = char_code(text, unicode);
    (Category::Metasequence, ctx.after(Last::None, code))
}

/// Returns true for escapes missing the parts that complete them. This
/// includes a `\` at the very end of the pattern.
fn is_incomplete(text: &str, unicode: bool) -> bool {
    match text {
        "\\" | r"\c" | r"\x" | r"\u" => true,
        r"\p" | r"\P" => unicode,
        _ => false,
    }
}

/// Returns true for escapes that match more than one char, and which
/// therefore can never be the endpoint of a range.
fn is_class_escape(text: &str, unicode: bool) -> bool {
    match text {
        r"\d" | r"\D" | r"\s" | r"\S" | r"\w" | r"\W" => true,
        _ => unicode && (text.starts_with(r"\p{") || text.starts_with(r"\P{")),
    }
}

/// Returns true if the given class escape is allowed in Unicode-aware mode.
/// Incomplete escapes and class escapes are handled before this is called.
fn is_valid_unicode_escape(text: &str) -> bool {
    let Some(esc) = text.strip_prefix('\\') else { return true };
    let mut chars = esc.chars();
    let Some(first) = chars.next() else { return false };
    match first {
        '0' => esc.len() == 1,
        '1'..='9' => false,
        'b' | 'f' | 'n' | 'r' | 't' | 'v' | 'c' | 'x' => true,
        'u' => char_code(text, true).is_some(),
        '-' | '/' => true,
        c => lex::is_syntax_character(c),
    }
}

/// Returns the code point denoted by the given class token, if it denotes
/// exactly one.
///
/// For a literal run, this is its first char. Shorthand classes, property
/// escapes and incomplete or invalid escapes have no code point.
pub(crate) fn char_code(token: &str, unicode: bool) -> Option<u32> {
    let Some(esc) = token.strip_prefix('\\') else {
        return token.chars().next().map(u32::from);
    };
    let mut chars = esc.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    match first {
        'c' if !rest.is_empty() => {
            let letter = rest
                .bytes()
                .next()
                .filter(u8::is_ascii_alphabetic)?
                .to_ascii_uppercase();
            Some(u32::from(letter - b'A') + 1)
        }
        'x' | 'u' if !rest.is_empty() => {
            let digits = rest
                .strip_prefix('{')
                .and_then(|r| r.strip_suffix('}'))
                .unwrap_or(rest);
            u32::from_str_radix(digits, 16).ok().filter(|&n| n <= 0x10FFFF)
        }
        '0' if rest.is_empty() => Some(0),
        '0'..='7' if !unicode => u32::from_str_radix(esc, 8).ok(),
        _ if !rest.is_empty() => None,
        'd' | 'D' | 's' | 'S' | 'w' | 'W' | 'c' | 'x' | 'u' => None,
        'p' | 'P' if unicode => None,
        '1'..='9' if unicode => None,
        'b' => Some(0x08),
        'f' => Some(0x0C),
        'n' => Some(0x0A),
        'r' => Some(0x0D),
        't' => Some(0x09),
        'v' => Some(0x0B),
        c => Some(u32::from(c)),
    }
}
