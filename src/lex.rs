// The lexical grammar of the dialect, outside of character classes.
//
// Scanning is maximal munch over an ordered list of rules. At each position
// the first rule that matches wins:
//
//   1. A complete character class, '[' '^'? then any run of non-'\' non-']'
//      chars or '\' plus an optional char, then an optional ']'. A class that
//      is never closed runs to the end of the pattern.
//   2. An escape sequence. See 'scan_escape'.
//   3. A group opening: '(' optionally followed by '?' and one of '<=', '<!',
//      '<name>', ':', '=', '!' or nothing at all.
//   4. A quantifier: '?', '*', '+', '{m}', '{m,}' or '{m,n}', each with an
//      optional lazy '?'.
//   5. A run of chars with no syntactic significance.
//   6. Any single remaining char.
//
// The grammar is tied to the dialect's own tokenization, so the order of the
// rules above matters. For example, '(?' must be tried before '?' is scanned
// as a quantifier, and '{' only starts a quantifier when the full interval
// follows it.

use crate::{flags::Mode, span::Span};

/// The coarse kind of a top-level token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TokenKind {
    /// A whole bracketed character class, interior included.
    Class,
    GroupOpen,
    GroupClose,
    Escape,
    /// Anything shaped like a quantifier. Whether it actually quantifies
    /// something depends on what precedes it.
    Quantifier,
    /// `^` or `$`.
    Anchor,
    Alternator,
    Dot,
    /// A run of chars without syntactic significance.
    Literal,
    /// Any other single char, e.g., a `{` that does not start an interval.
    Char,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Token<'p> {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
    pub(crate) text: &'p str,
}

/// Where an escape sequence occurs. The two contexts recognize different
/// escapes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EscapeContext {
    Pattern,
    Class,
}

/// A position in a pattern that only ever moves forward.
#[derive(Clone, Debug)]
pub(crate) struct Cursor<'p> {
    pattern: &'p str,
    pos: usize,
}

impl<'p> Cursor<'p> {
    pub(crate) fn new(pattern: &'p str) -> Cursor<'p> {
        Cursor { pattern, pos: 0 }
    }

    /// Return the current byte offset of the cursor.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pos == self.pattern.len()
    }

    /// Return the remainder of the pattern, starting at the cursor.
    pub(crate) fn rest(&self) -> &'p str {
        &self.pattern[self.pos..]
    }

    /// Return the char at the cursor, or `None` at the end of the pattern.
    pub(crate) fn char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Return the pattern text from `start` up to the cursor.
    pub(crate) fn since(&self, start: usize) -> &'p str {
        &self.pattern[start..self.pos]
    }

    /// Bump the cursor past the current char. Returns false if the cursor
    /// was already at the end of the pattern.
    pub(crate) fn bump(&mut self) -> bool {
        match self.char() {
            None => false,
            Some(c) => {
                self.pos += c.len_utf8();
                true
            }
        }
    }

    /// If the remainder of the pattern starts with `prefix`, then bump the
    /// cursor past it and return true. Otherwise, leave the cursor alone.
    pub(crate) fn bump_if(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Bump the cursor by `len` bytes. Callers only ever measure `len` over
    /// ASCII, so this never splits a char.
    pub(crate) fn bump_len(&mut self, len: usize) {
        debug_assert!(self.rest().is_char_boundary(len));
        self.pos += len;
    }

    /// Bump the cursor past every char for which `predicate` returns true.
    pub(crate) fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.char().map_or(false, &predicate) {
            self.bump();
        }
    }
}

/// A scanner that splits a pattern into top-level tokens.
#[derive(Clone, Debug)]
pub(crate) struct Lexer<'p> {
    cursor: Cursor<'p>,
    unicode: bool,
}

impl<'p> Lexer<'p> {
    pub(crate) fn new(pattern: &'p str, mode: Mode) -> Lexer<'p> {
        Lexer {
            cursor: Cursor::new(pattern),
            unicode: mode.is_unicode_aware(),
        }
    }

    fn scan(&mut self) -> TokenKind {
        let cur = &mut self.cursor;
        if cur.bump_if("[") {
            scan_class(cur);
            return TokenKind::Class;
        }
        if cur.bump_if("\\") {
            scan_escape(cur, self.unicode, EscapeContext::Pattern);
            return TokenKind::Escape;
        }
        if cur.bump_if("(") {
            scan_group_opening(cur);
            return TokenKind::GroupOpen;
        }
        if let Some(len) = quantifier_len(cur.rest()) {
            cur.bump_len(len);
            return TokenKind::Quantifier;
        }
        let start = cur.pos();
        let unicode = self.unicode;
        cur.bump_while(|c| !is_special(c, unicode));
        if cur.pos() > start {
            return TokenKind::Literal;
        }
        let c = cur.char();
        cur.bump();
        match c {
            Some(')') => TokenKind::GroupClose,
            Some('|') => TokenKind::Alternator,
            Some('^') | Some('$') => TokenKind::Anchor,
            Some('.') => TokenKind::Dot,
            _ => TokenKind::Char,
        }
    }
}

impl<'p> Iterator for Lexer<'p> {
    type Item = Token<'p>;

    fn next(&mut self) -> Option<Token<'p>> {
        if self.cursor.is_done() {
            return None;
        }
        let start = self.cursor.pos();
        let kind = self.scan();
        let span = Span::new(start, self.cursor.pos());
        Some(Token { kind, span, text: self.cursor.since(start) })
    }
}

/// Scan the rest of a character class. This expects the cursor to be
/// positioned immediately after the opening `[`.
fn scan_class(cur: &mut Cursor<'_>) {
    cur.bump_if("^");
    while let Some(c) = cur.char() {
        cur.bump();
        match c {
            '\\' => {
                cur.bump();
            }
            ']' => return,
            _ => {}
        }
    }
}

/// Scan the rest of a group opening. This expects the cursor to be
/// positioned immediately after the `(`.
fn scan_group_opening(cur: &mut Cursor<'_>) {
    if !cur.bump_if("?") {
        return;
    }
    if cur.bump_if("<=") || cur.bump_if("<!") {
        return;
    }
    if let Some(len) = cur.rest().strip_prefix('<').and_then(group_name_len) {
        // '<' + name + '>'
        cur.bump_len(len + 2);
        return;
    }
    let _ = cur.bump_if(":") || cur.bump_if("=") || cur.bump_if("!");
}

/// Scan an escape sequence. This expects the cursor to be positioned
/// immediately after the `\`. At the end of the pattern, nothing is consumed.
///
/// After the `\`, the first of these that matches is consumed:
///
/// * `0` and a legacy octal tail, or in Unicode-aware mode, `0` and every
///   decimal digit that follows (so that `\01` can be diagnosed as a whole).
/// * In the pattern, `[1-9]` and every decimal digit that follows. In a
///   legacy class, the octal digits `[1-7]` with a legacy octal tail.
/// * `x` and two hex digits.
/// * `u` and four hex digits, or in Unicode-aware mode, `u{` hex digits `}`.
/// * `c` and an ASCII letter.
/// * In the pattern, `k<name>`.
/// * In Unicode-aware mode, `p{...}` or `P{...}`.
/// * Any single char.
pub(crate) fn scan_escape(
    cur: &mut Cursor<'_>,
    unicode: bool,
    context: EscapeContext,
) {
    let rest = cur.rest();
    let Some(c) = cur.char() else { return };
    let after = &rest[c.len_utf8()..];
    let len = match c {
        '0' if unicode => 1 + decimal_len(after),
        '1'..='7' if context == EscapeContext::Class && !unicode => {
            octal_len(rest)
        }
        '0' => octal_len(rest),
        '1'..='9' if context == EscapeContext::Pattern => {
            1 + decimal_len(after)
        }
        'x' if has_hex(after, 2) => 3,
        'u' if has_hex(after, 4) => 5,
        'u' if unicode => braced_hex_len(after).map_or(1, |n| 1 + n),
        'c' if after.starts_with(|c: char| c.is_ascii_alphabetic()) => 2,
        'k' if context == EscapeContext::Pattern => after
            .strip_prefix('<')
            .and_then(group_name_len)
            .map_or(1, |n| n + 3),
        'p' | 'P' if unicode => property_len(after).map_or(1, |n| 1 + n),
        c => c.len_utf8(),
    };
    cur.bump_len(len);
}

/// Returns true if the given char must be given its own token outside of a
/// character class.
fn is_special(c: char, unicode: bool) -> bool {
    match c {
        '.' | '?' | '*' | '+' | '^' | '$' | '{' | '[' | '(' | ')' | '|'
        | '\\' => true,
        ']' | '}' => unicode,
        _ => false,
    }
}

/// Returns true if the given char is a syntax character of the dialect. These
/// are the only chars (along with `/`) that may be escaped in Unicode-aware
/// mode.
pub(crate) fn is_syntax_character(c: char) -> bool {
    match c {
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']'
        | '{' | '}' | '|' => true,
        _ => false,
    }
}

/// Returns the length of the quantifier at the start of `s`, if there is one.
/// This includes the optional lazy `?`.
pub(crate) fn quantifier_len(s: &str) -> Option<usize> {
    let len = match s.bytes().next()? {
        b'?' | b'*' | b'+' => 1,
        b'{' => interval_len(s)?,
        _ => return None,
    };
    Some(if s[len..].starts_with('?') { len + 1 } else { len })
}

/// Returns the length of `{m}`, `{m,}` or `{m,n}` at the start of `s`.
fn interval_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('{')?;
    let min = decimal_len(body);
    if min == 0 {
        return None;
    }
    let mut len = 1 + min;
    if s[len..].starts_with(',') {
        len += 1 + decimal_len(&s[len + 1..]);
    }
    if s[len..].starts_with('}') {
        Some(len + 1)
    } else {
        None
    }
}

/// Returns the length of the leading run of decimal digits in `s`.
pub(crate) fn decimal_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Returns the length of the longest legacy octal escape at the start of `s`,
/// which is at most `\377`. That is, `[0-3][0-7]{0,2}` or `[4-7][0-7]?`.
///
/// If `s` does not start with an octal digit, this returns 0.
pub(crate) fn octal_len(s: &str) -> usize {
    let is_octal = |b: &u8| (b'0'..=b'7').contains(b);
    let max = match s.bytes().next() {
        Some(b'0'..=b'3') => 3,
        Some(b'4'..=b'7') => 2,
        _ => return 0,
    };
    s.bytes().take(max).take_while(is_octal).count()
}

/// Returns true if `s` starts with at least `n` hex digits.
fn has_hex(s: &str, n: usize) -> bool {
    s.len() >= n && s.as_bytes()[..n].iter().all(u8::is_ascii_hexdigit)
}

/// Returns the length of `{` hex digits `}` at the start of `s`.
fn braced_hex_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('{')?;
    let digits = body.bytes().take_while(u8::is_ascii_hexdigit).count();
    if digits > 0 && body[digits..].starts_with('}') {
        Some(digits + 2)
    } else {
        None
    }
}

/// Returns the length of `{...}` at the start of `s`, where the braces hold
/// a Unicode property name or `name=value` pair.
fn property_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('{')?;
    let len = body
        .bytes()
        .take_while(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'=')
        .count();
    if len > 0 && body[len..].starts_with('}') {
        Some(len + 2)
    } else {
        None
    }
}

/// Returns the length of the capture name at the start of `s`, provided the
/// name is immediately followed by a closing `>`. The `>` is not included.
///
/// Names start with an ASCII letter, `_` or `$`, and continue with ASCII
/// letters, digits, `_` or `$`.
pub(crate) fn group_name_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let is_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b'$';
    if !bytes.first().map_or(false, |&b| is_start(b)) {
        return None;
    }
    let len = bytes
        .iter()
        .take_while(|&&b| is_start(b) || b.is_ascii_digit())
        .count();
    if bytes.get(len) == Some(&b'>') {
        Some(len)
    } else {
        None
    }
}

/// Returns the capture name of a group opening, if it is a named capture.
pub(crate) fn capture_name(opening: &str) -> Option<&str> {
    let name = opening.strip_prefix("(?<")?.strip_suffix('>')?;
    if group_name_len(&opening[3..]) == Some(name.len()) {
        Some(name)
    } else {
        None
    }
}

/// Returns true if the given group opening starts a capturing group.
pub(crate) fn is_capturing(opening: &str) -> bool {
    opening == "(" || capture_name(opening).is_some()
}

/// Returns true if the given group opening starts a lookaround.
pub(crate) fn is_lookaround(opening: &str) -> bool {
    ["(?=", "(?!", "(?<=", "(?<!"].contains(&opening)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(pattern: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(pattern, Mode::new()).map(|t| (t.kind, t.text)).collect()
    }

    fn lexu(pattern: &str) -> Vec<(TokenKind, &str)> {
        let mode = Mode::new().unicode(true);
        Lexer::new(pattern, mode).map(|t| (t.kind, t.text)).collect()
    }

    fn texts(pattern: &str) -> Vec<&str> {
        lex(pattern).into_iter().map(|(_, text)| text).collect()
    }

    use self::TokenKind::*;

    #[test]
    fn lex_empty() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_literal_runs() {
        assert_eq!(lex("abc"), vec![(Literal, "abc")]);
        assert_eq!(lex("a b]}c"), vec![(Literal, "a b]}c")]);
        assert_eq!(
            lex("ab.c"),
            vec![(Literal, "ab"), (Dot, "."), (Literal, "c")],
        );
        assert_eq!(lex("☃é"), vec![(Literal, "☃é")]);
    }

    #[test]
    fn lex_unicode_literal_runs() {
        assert_eq!(
            lexu("a]b}c"),
            vec![
                (Literal, "a"),
                (Char, "]"),
                (Literal, "b"),
                (Char, "}"),
                (Literal, "c"),
            ],
        );
    }

    #[test]
    fn lex_classes() {
        assert_eq!(lex("[abc]"), vec![(Class, "[abc]")]);
        assert_eq!(lex("[^a-z]x"), vec![(Class, "[^a-z]"), (Literal, "x")]);
        assert_eq!(lex(r"[\]]"), vec![(Class, r"[\]]")]);
        assert_eq!(lex("[]a]"), vec![(Class, "[]"), (Literal, "a]")]);
        assert_eq!(lex("[a"), vec![(Class, "[a")]);
        assert_eq!(lex(r"[a\"), vec![(Class, r"[a\")]);
        assert_eq!(lex(r"[\]"), vec![(Class, r"[\]")]);
        assert_eq!(lex("[[]"), vec![(Class, "[[]")]);
    }

    #[test]
    fn lex_escapes() {
        assert_eq!(texts(r"\d\D\."), vec![r"\d", r"\D", r"\."]);
        assert_eq!(texts(r"\x41\x4"), vec![r"\x41", r"\x", "4"]);
        assert_eq!(texts(r"A\u004"), vec![r"A", r"\u", "004"]);
        assert_eq!(texts(r"\cA\c1"), vec![r"\cA", r"\c", "1"]);
        assert_eq!(texts(r"\10\1"), vec![r"\10", r"\1"]);
        assert_eq!(texts(r"\0\012\0123"), vec![r"\0", r"\012", r"\012", "3"]);
        assert_eq!(texts(r"\08"), vec![r"\0", "8"]);
        assert_eq!(texts(r"\k<name>"), vec![r"\k<name>"]);
        assert_eq!(texts(r"\k<1>"), vec![r"\k", "<1>"]);
        assert_eq!(texts(r"\p{L}"), vec![r"\p", "{", "L}"]);
        assert_eq!(texts(r"\u{41}"), vec![r"\u", "{41}"]);
        assert_eq!(texts("\\"), vec!["\\"]);
        assert_eq!(texts("\\☃"), vec!["\\☃"]);
    }

    #[test]
    fn lex_unicode_escapes() {
        assert_eq!(lexu(r"\p{L}"), vec![(Escape, r"\p{L}")]);
        assert_eq!(
            lexu(r"\P{Script=Greek}"),
            vec![(Escape, r"\P{Script=Greek}")],
        );
        assert_eq!(
            lexu(r"\p{L"),
            vec![(Escape, r"\p"), (Char, "{"), (Literal, "L")],
        );
        assert_eq!(lexu(r"\u{1F600}"), vec![(Escape, r"\u{1F600}")]);
        assert_eq!(lexu(r"\0123"), vec![(Escape, r"\0123")]);
        assert_eq!(lexu(r"\08"), vec![(Escape, r"\08")]);
    }

    #[test]
    fn lex_groups() {
        assert_eq!(
            texts("(a)(?:b)(?=c)(?!d)(?<=e)(?<!f)(?<g>h)"),
            vec![
                "(", "a", ")", "(?:", "b", ")", "(?=", "c", ")", "(?!", "d",
                ")", "(?<=", "e", ")", "(?<!", "f", ")", "(?<g>", "h", ")",
            ],
        );
        assert_eq!(lex("(?"), vec![(GroupOpen, "(?")]);
        assert_eq!(lex("(?<1>"), vec![(GroupOpen, "(?"), (Literal, "<1>")]);
        assert_eq!(lex("(?<$a_1>"), vec![(GroupOpen, "(?<$a_1>")]);
        assert_eq!(lex(")"), vec![(GroupClose, ")")]);
    }

    #[test]
    fn lex_quantifiers() {
        assert_eq!(
            lex("a*?b+c?d??"),
            vec![
                (Literal, "a"),
                (Quantifier, "*?"),
                (Literal, "b"),
                (Quantifier, "+"),
                (Literal, "c"),
                (Quantifier, "?"),
                (Literal, "d"),
                (Quantifier, "??"),
            ],
        );
        assert_eq!(texts("a{2}b{2,}c{2,5}?"), vec![
            "a", "{2}", "b", "{2,}", "c", "{2,5}?",
        ]);
        assert_eq!(
            lex("a{,5}"),
            vec![(Literal, "a"), (Char, "{"), (Literal, ",5}")],
        );
        assert_eq!(lex("{"), vec![(Char, "{")]);
    }

    #[test]
    fn lex_single_chars() {
        assert_eq!(
            lex("^a|b$"),
            vec![
                (Anchor, "^"),
                (Literal, "a"),
                (Alternator, "|"),
                (Literal, "b"),
                (Anchor, "$"),
            ],
        );
    }

    #[test]
    fn octal_lengths() {
        assert_eq!(0, octal_len(""));
        assert_eq!(0, octal_len("8"));
        assert_eq!(1, octal_len("0"));
        assert_eq!(3, octal_len("377"));
        assert_eq!(3, octal_len("3777"));
        assert_eq!(2, octal_len("47"));
        assert_eq!(2, octal_len("477"));
        assert_eq!(1, octal_len("48"));
    }

    #[test]
    fn group_openings() {
        assert_eq!(Some("name"), capture_name("(?<name>"));
        assert_eq!(None, capture_name("(?<="));
        assert_eq!(None, capture_name("(?:"));
        assert!(is_capturing("("));
        assert!(is_capturing("(?<a>"));
        assert!(!is_capturing("(?:"));
        assert!(!is_capturing("(?"));
        assert!(is_lookaround("(?<!"));
        assert!(!is_lookaround("(?<a>"));
    }
}
