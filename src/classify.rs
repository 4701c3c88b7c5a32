use std::collections::BTreeSet;

use crate::{
    captures::CaptureInfo,
    class,
    flags::Mode,
    lex::{self, Lexer, Token, TokenKind},
    span::{Category, Classified, Diagnostic, Span},
};

/// The largest interval bound accepted by every engine of the dialect.
const MAX_INTERVAL_BOUND: u32 = 65535;

/// Group-style depths cycle through `1..=MAX_STYLE_DEPTH`.
const MAX_STYLE_DEPTH: usize = 5;

/// What kind of token preceded the current one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Last {
    /// Nothing, i.e., the current token is the first in the pattern.
    Start,
    Alternator,
    Other,
}

/// The part of the previous token that matters for classifying the next.
///
/// Each step of the classifier consumes one context and returns a fresh one.
#[derive(Clone, Copy, Debug)]
struct Context {
    /// Whether a quantifier may follow.
    quantifiable: bool,
    /// The group-style depth of a group that was just closed. A quantifier
    /// applied to the group is shown in the same style.
    group_depth: Option<u8>,
    last: Last,
}

impl Context {
    fn start() -> Context {
        Context { quantifiable: false, group_depth: None, last: Last::Start }
    }

    fn after(quantifiable: bool) -> Context {
        Context { quantifiable, group_depth: None, last: Last::Other }
    }
}

/// An open group.
#[derive(Clone, Copy, Debug)]
struct OpenGroup {
    /// False when the opening was reported as an error. Such groups are
    /// still tracked so that their closing parenthesis is accounted for.
    valid: bool,
    lookaround: bool,
    /// The index of the opening's span in the output.
    index: usize,
    depth: u8,
}

/// The main classifier. It walks the top-level tokens of a pattern once,
/// threading a [`Context`] from each token to the next.
#[derive(Debug)]
pub(crate) struct Classifier<'p> {
    pattern: &'p str,
    mode: Mode,
    unicode: bool,
    captures: CaptureInfo,
    /// Capture names seen so far, used to detect duplicates.
    names: BTreeSet<&'p str>,
    stack: Vec<OpenGroup>,
    out: Vec<Classified<'p>>,
}

impl<'p> Classifier<'p> {
    pub(crate) fn new(pattern: &'p str, mode: Mode) -> Classifier<'p> {
        Classifier {
            pattern,
            mode,
            unicode: mode.is_unicode_aware(),
            captures: CaptureInfo::scan(pattern, mode),
            names: BTreeSet::new(),
            stack: vec![],
            out: vec![],
        }
    }

    /// Classify the entire pattern.
    pub(crate) fn classify(mut self) -> Vec<Classified<'p>> {
        debug!(
            "classifying {:?} with flags '{}' ({} capturing groups)",
            self.pattern,
            self.mode,
            self.captures.total(),
        );
        let mut ctx = Context::start();
        for token in Lexer::new(self.pattern, self.mode) {
            ctx = self.step(ctx, token);
        }
        self.patch_unclosed();
        self.out
    }

    fn step(&mut self, ctx: Context, token: Token<'p>) -> Context {
        match token.kind {
            TokenKind::Class => {
                class::classify_class(&token, self.unicode, &mut self.out);
                Context::after(true)
            }
            TokenKind::GroupOpen => self.group_open(token),
            TokenKind::GroupClose => self.group_close(token),
            TokenKind::Escape => self.escape(token),
            TokenKind::Quantifier => self.quantifier(ctx, token),
            TokenKind::Anchor => {
                self.emit(token, Category::Metasequence);
                Context::after(false)
            }
            TokenKind::Alternator => self.alternator(ctx, token),
            TokenKind::Dot => {
                self.emit(token, Category::Metasequence);
                Context::after(true)
            }
            TokenKind::Literal => {
                self.emit(token, Category::Literal);
                Context::after(true)
            }
            TokenKind::Char => {
                // Only '{', '}' and ']' end up here. They are literals
                // unless the stricter Unicode-aware rules apply.
                if self.unicode {
                    self.error(token, Diagnostic::RequiresEscape);
                } else {
                    self.emit(token, Category::Literal);
                }
                Context::after(true)
            }
        }
    }

    fn group_open(&mut self, token: Token<'p>) -> Context {
        let depth = (self.stack.len() % MAX_STYLE_DEPTH) as u8 + 1;
        let index = self.out.len();
        let lookaround = lex::is_lookaround(token.text);
        let valid = if token.text == "(?" {
            self.error(token, Diagnostic::InvalidGroupType);
            false
        } else if lex::capture_name(token.text)
            .map_or(false, |name| !self.names.insert(name))
        {
            self.error(token, Diagnostic::DuplicateCaptureName);
            false
        } else {
            self.emit(token, Category::Group(depth));
            true
        };
        self.stack.push(OpenGroup { valid, lookaround, index, depth });
        Context::after(false)
    }

    fn group_close(&mut self, token: Token<'p>) -> Context {
        match self.stack.pop() {
            Some(group) if group.valid => {
                self.emit(token, Category::Group(group.depth));
                // Quantified lookarounds are forbidden in Unicode-aware mode
                // and pointless otherwise.
                Context {
                    quantifiable: !group.lookaround,
                    group_depth: Some(group.depth),
                    last: Last::Other,
                }
            }
            _ => {
                self.error(token, Diagnostic::UnbalancedRightParen);
                Context::after(false)
            }
        }
    }

    fn escape(&mut self, token: Token<'p>) -> Context {
        let text = token.text;
        let Some(c) = text[1..].chars().next() else {
            // A '\' at the very end of the pattern.
            self.error(token, Diagnostic::IncompleteToken);
            return Context::after(false);
        };
        match c {
            '1'..='9' => return self.decimal_escape(token),
            'k' => return self.named_backreference(token),
            'p' | 'P' if self.unicode => {
                if text.len() == 2 {
                    self.error(token, Diagnostic::IncompleteToken);
                    return Context::after(false);
                }
                self.emit(token, Category::Metasequence);
            }
            'b' | 'B' => {
                self.emit(token, Category::Metasequence);
                return Context::after(false);
            }
            'c' | 'x' | 'u' if text.len() == 2 => {
                self.error(token, Diagnostic::IncompleteToken);
                return Context::after(false);
            }
            'u' if class::char_code(text, self.unicode).is_none() => {
                self.error(token, Diagnostic::InvalidEscape);
            }
            '0' if self.unicode && text.len() > 2 => {
                self.error(token, Diagnostic::InvalidEscape);
            }
            'd' | 'D' | 's' | 'S' | 'w' | 'W' | 'f' | 'n' | 'r' | 't' | 'v'
            | '0' | 'c' | 'x' | 'u' => {
                self.emit(token, Category::Metasequence);
            }
            c if self.unicode && !lex::is_syntax_character(c) && c != '/' => {
                self.error(token, Diagnostic::InvalidEscape);
            }
            _ => self.emit(token, Category::EscapedLiteral),
        }
        Context::after(true)
    }

    /// Classify `\` followed by decimal digits, the first of which is not 0.
    ///
    /// This is a backreference when the number does not exceed the number of
    /// capturing groups in the whole pattern. Otherwise, Unicode-aware mode
    /// rejects it, while legacy mode reads it as an octal escape followed by
    /// literal digits.
    fn decimal_escape(&mut self, token: Token<'p>) -> Context {
        let digits = &token.text[1..];
        // Only overflow can fail, and such a number exceeds any group count.
        let number = digits.parse::<u32>().unwrap_or(u32::MAX);
        if number <= self.captures.total() {
            self.emit(token, Category::Backreference);
        } else if self.unicode {
            self.error(token, Diagnostic::InvalidBackreference);
        } else if digits.starts_with(['8', '9']) {
            self.emit_split(token, 2, Category::EscapedLiteral);
        } else {
            let len = 1 + lex::octal_len(digits);
            self.emit_split(token, len, Category::Metasequence);
        }
        Context::after(true)
    }

    /// Classify `\k`, optionally followed by `<name>`.
    ///
    /// This is only a named backreference when the pattern has a named group
    /// somewhere, or in Unicode-aware mode. Otherwise it is an escaped `k`.
    fn named_backreference(&mut self, token: Token<'p>) -> Context {
        if self.captures.has_names() {
            let name = token
                .text
                .strip_prefix(r"\k<")
                .and_then(|rest| rest.strip_suffix('>'));
            match name {
                Some(name) if self.captures.contains(name) => {
                    self.emit(token, Category::Backreference);
                }
                Some(_) => self.error(token, Diagnostic::InvalidBackreference),
                None => {
                    self.error(token, Diagnostic::IncompleteToken);
                    return Context::after(false);
                }
            }
        } else if self.unicode {
            self.error(token, Diagnostic::InvalidBackreference);
        } else {
            self.emit_split(token, 2, Category::EscapedLiteral);
        }
        Context::after(true)
    }

    fn quantifier(&mut self, ctx: Context, token: Token<'p>) -> Context {
        if !ctx.quantifiable {
            self.error(token, Diagnostic::Unquantifiable);
        } else if let Some(diag) = interval_error(token.text) {
            self.error(token, diag);
        } else {
            let depth = ctx.group_depth.unwrap_or(0);
            self.emit(token, Category::Quantifier(depth));
        }
        Context::after(false)
    }

    /// Classify `|`. An alternator that starts the pattern or directly
    /// follows another one adds an empty alternative, which matches the
    /// empty string and so cuts the pattern short.
    fn alternator(&mut self, ctx: Context, token: Token<'p>) -> Context {
        if ctx.last == Last::Start || ctx.last == Last::Alternator {
            self.error(token, Diagnostic::EmptyAlternative);
        } else {
            let depth = self.stack.last().map_or(0, |group| group.depth);
            self.emit(token, Category::Alternator(depth));
        }
        Context {
            quantifiable: false,
            group_depth: None,
            last: Last::Alternator,
        }
    }

    /// Report every group that is still open as unbalanced, by rewriting the
    /// span of its opening. Groups whose opening was already reported are
    /// left alone.
    fn patch_unclosed(&mut self) {
        for group in std::mem::take(&mut self.stack) {
            if !group.valid {
                continue;
            }
            let span = &mut self.out[group.index];
            trace!("unclosed group {:?} at {:?}", span.text, span.span);
            span.category = Category::Error(Diagnostic::UnbalancedLeftParen);
        }
    }

    fn emit(&mut self, token: Token<'p>, category: Category) {
        let Token { span, text, .. } = token;
        self.out.push(Classified { span, text, category });
    }

    fn error(&mut self, token: Token<'p>, diag: Diagnostic) {
        trace!("{:?} at {:?}: {}", token.text, token.span, diag);
        self.emit(token, Category::Error(diag));
    }

    /// Emit the first `at` bytes of the token with the given category, and
    /// the rest, if any, as a literal.
    fn emit_split(&mut self, token: Token<'p>, at: usize, category: Category) {
        let Token { span, text, .. } = token;
        let (head, tail) = text.split_at(at);
        let mid = span.start + at;
        let span = Span::new(span.start, mid);
        self.out.push(Classified { span, text: head, category });
        if !tail.is_empty() {
            let span = Span::new(mid, token.span.end);
            let category = Category::Literal;
            self.out.push(Classified { span, text: tail, category });
        }
    }
}

/// Checks the bounds of an interval quantifier like `{m,n}`. Other
/// quantifiers are always fine.
fn interval_error(quantifier: &str) -> Option<Diagnostic> {
    let body = quantifier
        .strip_prefix('{')?
        .trim_end_matches('?')
        .strip_suffix('}')?;
    let (min, max) = match body.split_once(',') {
        Some((min, max)) if !max.is_empty() => (min, Some(max)),
        Some((min, _)) => (min, None),
        None => (body, None),
    };
    let min = parse_bound(min);
    let max = max.map(parse_bound);
    let overflows = |n: u32| n > MAX_INTERVAL_BOUND;
    if overflows(min) || max.map_or(false, overflows) {
        Some(Diagnostic::IntervalOverflow)
    } else if max.map_or(false, |max| min > max) {
        Some(Diagnostic::IntervalReversed)
    } else {
        None
    }
}

/// Parse a run of decimal digits, saturating at `u32::MAX`.
fn parse_bound(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |n, b| {
        n.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}
