//! Pattern → AST frontend.
//!
//! Parses the regex form of a token definition into a small AST which the
//! HIR lowering pass (`hir.rs`) then normalises. The parser recognises:
//!
//! | Feature | Syntax | Notes |
//! |---------|--------|-------|
//! | Literal char | `a`, `1`, `_` | any non-metacharacter scalar |
//! | Escaped metachar | `\.` `\\` `\[` `\]` `\(` `\)` `\|` `\+` `\*` `\?` `\{` `\}` `\^` `\$` `\-` `\/` `\"` `\'` | |
//! | Escape sequences | `\n` `\r` `\t` | |
//! | Scalar escape | `\u{1F600}` `\x{41}` | any scalar up to `0x10FFFF` |
//! | Quote | `\Q…\E` | verbatim literal run |
//! | Dot | `.` | the total alphabet |
//! | Character class | `[abc]` `[a-z]` `[^"]` `[a[0-9]]` | negation, ranges, nesting |
//! | Grouping | `(...)` | transparent |
//! | Alternation | <code>a&#124;b</code> | |
//! | Quantifiers | `*?` `+?` `??` `*+` `++` `?+` | reluctant / possessive |
//! | Bounded repetition | `{n}` `{n,}` `{,m}` `{n,m}` | |
//!
//! Greediness is parsed but mostly rejected downstream: the lowering algebra
//! has no greedy trailing loop, so eager `*` / `+` / `{n,}` fail. Perl
//! shorthand classes (`\d`, `\w`, `\s`, `\p{…}`), anchors, backreferences,
//! and lookaround are outside the subset and fail with a named kind.

use jumplex_runtime::Scalar;

use crate::error::{PatternError, PatternErrorKind};

/// Highest scalar value a `\u{…}` / `\x{…}` escape may produce.
const UNICODE_CEILING: Scalar = 0x10FFFF;

// ══════════════════════════════════════════════════════════════════════════════
// AST
// ══════════════════════════════════════════════════════════════════════════════

/// Parsed pattern node. Groups are kept in the tree (they carry no meaning
/// beyond precedence) and dissolved during lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// The empty pattern (e.g. one branch of `a|`).
    Empty,
    /// Two or more alternatives.
    Alternation(Vec<Ast>),
    /// Two or more juxtaposed nodes.
    Concat(Vec<Ast>),
    /// A parenthesised sub-pattern.
    Group(Box<Ast>),
    /// A quantified sub-pattern. `position` is the quantifier's offset,
    /// carried so lowering can report greediness errors precisely.
    Repeat {
        node: Box<Ast>,
        count: RepeatCount,
        mode: RepeatMode,
        position: usize,
    },
    /// A `\Q…\E` verbatim run (possibly empty).
    Quote(Vec<Scalar>),
    /// A single-position atom.
    Atom(Atom),
    /// A `[...]` character class.
    Class(ClassAst),
}

/// A single-position atom: one concrete scalar, or the total alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    Scalar(Scalar),
    Dot,
}

/// How many repetitions a quantifier asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    Exactly(u32),
    AtLeast(u32),
    AtMost(u32),
    Between(u32, u32),
}

/// Matching discipline of a quantifier: bare (`*`), reluctant (`*?`), or
/// possessive (`*+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Eager,
    Reluctant,
    Possessive,
}

/// A character class: member items plus an optional leading `^` inversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAst {
    pub negated: bool,
    pub items: Vec<ClassItem>,
}

/// One member of a character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Single(Scalar),
    Range(Scalar, Scalar),
    Nested(ClassAst),
}

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Parse a regex-form pattern into its AST.
///
/// # Errors
///
/// Returns a [`PatternError`] with the offending scalar offset and a kind
/// naming exactly what was malformed or unsupported.
pub fn parse(pattern: &str) -> Result<Ast, PatternError> {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
    };
    let ast = parser.alternation()?;
    if parser.pos < parser.chars.len() {
        /* The only way alternation() stops early is an unopened ')' */
        return Err(PatternError::new(
            parser.pos,
            PatternErrorKind::UnmatchedGroupClose,
        ));
    }
    Ok(ast)
}

// ══════════════════════════════════════════════════════════════════════════════
// Parser
// ══════════════════════════════════════════════════════════════════════════════

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn fail<T>(&self, position: usize, kind: PatternErrorKind) -> Result<T, PatternError> {
        Err(PatternError::new(position, kind))
    }

    /// `alternation := concat ('|' concat)*`
    fn alternation(&mut self) -> Result<Ast, PatternError> {
        let mut branches = vec![self.concat()?];
        while self.eat('|') {
            branches.push(self.concat()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().expect("one branch"))
        } else {
            Ok(Ast::Alternation(branches))
        }
    }

    /// `concat := quantified*`, stopping at `|`, `)`, or end of input.
    fn concat(&mut self) -> Result<Ast, PatternError> {
        let mut parts: Vec<Ast> = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let element = self.element()?;
            parts.push(self.quantified(element)?);
        }
        Ok(match parts.len() {
            0 => Ast::Empty,
            1 => parts.pop().expect("one part"),
            _ => Ast::Concat(parts),
        })
    }

    /// A single unquantified element: group, class, quote, atom.
    fn element(&mut self) -> Result<Ast, PatternError> {
        let start = self.pos;
        match self.peek().expect("concat checked for end of input") {
            '(' => {
                if self.peek_at(1) == Some('?') {
                    /* (?:…), (?=…), (?<name>…) are outside the subset */
                    return self.fail(start, PatternErrorKind::NotSupportedRegexNode);
                }
                self.pos += 1;
                let inner = self.alternation()?;
                if !self.eat(')') {
                    return self.fail(start, PatternErrorKind::UnclosedGroup);
                }
                Ok(Ast::Group(Box::new(inner)))
            }
            '[' => Ok(Ast::Class(self.class()?)),
            '.' => {
                self.pos += 1;
                Ok(Ast::Atom(Atom::Dot))
            }
            '*' | '+' | '?' | '{' => {
                self.fail(start, PatternErrorKind::NotSupportedQualification)
            }
            '^' | '$' => self.fail(start, PatternErrorKind::NotSupportedAtomKind),
            '\\' => self.escaped_element(),
            c => {
                self.pos += 1;
                Ok(Ast::Atom(Atom::Scalar(c as Scalar)))
            }
        }
    }

    /// An element introduced by a backslash: quote, scalar escape, or an
    /// escaped character.
    fn escaped_element(&mut self) -> Result<Ast, PatternError> {
        let start = self.pos;
        self.pos += 1; /* skip '\' */
        let Some(c) = self.peek() else {
            return self.fail(start, PatternErrorKind::DanglingEscape);
        };
        match c {
            'Q' => {
                self.pos += 1;
                self.quote(start)
            }
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'p' | 'P' => {
                self.fail(start, PatternErrorKind::NotSupportedCharacterClass)
            }
            'u' | 'x' => {
                self.pos += 1;
                let value = self.scalar_escape(start)?;
                Ok(Ast::Atom(Atom::Scalar(value)))
            }
            _ => {
                let scalar = self.escaped_char(start, c)?;
                Ok(Ast::Atom(Atom::Scalar(scalar)))
            }
        }
    }

    /// Resolve a single escaped character (shared between the top level and
    /// character classes). The cursor is on `c`; consumes it.
    fn escaped_char(&mut self, start: usize, c: char) -> Result<Scalar, PatternError> {
        let scalar = match c {
            'n' => '\n' as Scalar,
            'r' => '\r' as Scalar,
            't' => '\t' as Scalar,
            '\\' | '.' | '[' | ']' | '(' | ')' | '|' | '*' | '+' | '?' | '{' | '}' | '^'
            | '$' | '-' | '/' | '"' | '\'' => c as Scalar,
            _ => return self.fail(start, PatternErrorKind::InvalidEscapeCharacter),
        };
        self.pos += 1;
        Ok(scalar)
    }

    /// `\u{HEX}` / `\x{HEX}`; the cursor is past the `u`/`x`.
    fn scalar_escape(&mut self, start: usize) -> Result<Scalar, PatternError> {
        if !self.eat('{') {
            return self.fail(start, PatternErrorKind::InvalidEscapeCharacter);
        }
        let digits_start = self.pos;
        let mut value: u64 = 0;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(16) else { break };
            value = value * 16 + u64::from(digit);
            if value > u64::from(Scalar::MAX) {
                return self.fail(start, PatternErrorKind::WiderUnicodeThanSupported);
            }
            self.pos += 1;
        }
        if self.pos == digits_start || !self.eat('}') {
            return self.fail(start, PatternErrorKind::InvalidEscapeCharacter);
        }
        if value > u64::from(UNICODE_CEILING) {
            return self.fail(start, PatternErrorKind::WiderUnicodeThanSupported);
        }
        Ok(value as Scalar)
    }

    /// `\Q…\E` verbatim run; the cursor is past the `Q`.
    fn quote(&mut self, start: usize) -> Result<Ast, PatternError> {
        let mut run: Vec<Scalar> = Vec::new();
        loop {
            match self.peek() {
                None => return self.fail(start, PatternErrorKind::UnclosedQuote),
                Some('\\') if self.peek_at(1) == Some('E') => {
                    self.pos += 2;
                    return Ok(Ast::Quote(run));
                }
                Some(c) => {
                    run.push(c as Scalar);
                    self.pos += 1;
                }
            }
        }
    }

    /// Attach a quantifier to `node` if one follows.
    fn quantified(&mut self, node: Ast) -> Result<Ast, PatternError> {
        let position = self.pos;
        let count = match self.peek() {
            Some('*') => {
                self.pos += 1;
                RepeatCount::ZeroOrMore
            }
            Some('+') => {
                self.pos += 1;
                RepeatCount::OneOrMore
            }
            Some('?') => {
                self.pos += 1;
                RepeatCount::ZeroOrOne
            }
            Some('{') => self.braced_count(position)?,
            _ => return Ok(node),
        };
        let mode = match self.peek() {
            Some('?') => {
                self.pos += 1;
                RepeatMode::Reluctant
            }
            Some('+') => {
                self.pos += 1;
                RepeatMode::Possessive
            }
            _ => RepeatMode::Eager,
        };
        /* A second quantifier on the same atom has no meaning here */
        if matches!(self.peek(), Some('*' | '+' | '?' | '{')) {
            return self.fail(self.pos, PatternErrorKind::NotSupportedQualification);
        }
        Ok(Ast::Repeat {
            node: Box::new(node),
            count,
            mode,
            position,
        })
    }

    /// `{n}`, `{n,}`, `{,m}`, `{n,m}`; the cursor is on the `{`.
    fn braced_count(&mut self, position: usize) -> Result<RepeatCount, PatternError> {
        self.pos += 1; /* skip '{' */
        let min = self.repeat_bound();
        if self.eat('}') {
            return match min {
                Some(n) => Ok(RepeatCount::Exactly(n)),
                None => self.fail(position, PatternErrorKind::InvalidRepetitionRange),
            };
        }
        if !self.eat(',') {
            return self.fail(position, PatternErrorKind::InvalidRepetitionRange);
        }
        let max = self.repeat_bound();
        if !self.eat('}') {
            return self.fail(position, PatternErrorKind::InvalidRepetitionRange);
        }
        match (min, max) {
            (Some(n), Some(m)) if m < n => {
                self.fail(position, PatternErrorKind::InvalidRepetitionRange)
            }
            (Some(n), Some(m)) => Ok(RepeatCount::Between(n, m)),
            (Some(n), None) => Ok(RepeatCount::AtLeast(n)),
            (None, Some(m)) => Ok(RepeatCount::AtMost(m)),
            (None, None) => self.fail(position, PatternErrorKind::InvalidRepetitionRange),
        }
    }

    /// A decimal bound inside `{…}`; `None` when no digits are present.
    fn repeat_bound(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    // ── character classes ──────────────────────────────────────────────────

    /// `[...]`; the cursor is on the `[`.
    fn class(&mut self) -> Result<ClassAst, PatternError> {
        let open = self.pos;
        self.pos += 1; /* skip '[' */
        let negated = self.eat('^');
        let mut items: Vec<ClassItem> = Vec::new();

        /* ']' as the very first member (or first after '^') is literal */
        if self.peek() == Some(']') {
            items.push(ClassItem::Single(']' as Scalar));
            self.pos += 1;
        }

        loop {
            match self.peek() {
                None => return self.fail(open, PatternErrorKind::UnclosedClass),
                Some(']') => {
                    self.pos += 1;
                    return Ok(ClassAst { negated, items });
                }
                Some('[') => {
                    let nested = self.class()?;
                    if self.range_follows() {
                        /* `[[ab]-z]`: a class cannot bound a range */
                        return self.fail(
                            self.pos,
                            PatternErrorKind::NotSupportedCharacterRangeKind,
                        );
                    }
                    items.push(ClassItem::Nested(nested));
                }
                Some(_) => {
                    let lo = self.class_member()?;
                    if self.range_follows() {
                        let dash = self.pos;
                        self.pos += 1; /* skip '-' */
                        if self.peek() == Some('[') {
                            return self.fail(
                                dash + 1,
                                PatternErrorKind::NotSupportedCharacterRangeKind,
                            );
                        }
                        let hi = self.class_member()?;
                        if lo > hi {
                            return self.fail(dash, PatternErrorKind::IncorrectCharRange);
                        }
                        items.push(ClassItem::Range(lo, hi));
                    } else {
                        items.push(ClassItem::Single(lo));
                    }
                }
            }
        }
    }

    /// Whether a `-` at the cursor starts a range (rather than a literal
    /// dash before the closing bracket).
    fn range_follows(&self) -> bool {
        self.peek() == Some('-') && !matches!(self.peek_at(1), None | Some(']'))
    }

    /// One scalar-valued class member: a plain character or an escape.
    fn class_member(&mut self) -> Result<Scalar, PatternError> {
        let start = self.pos;
        match self.peek().expect("caller peeked") {
            '\\' => {
                self.pos += 1;
                let Some(c) = self.peek() else {
                    return self.fail(start, PatternErrorKind::DanglingEscape);
                };
                match c {
                    'Q' | 'E' => self.fail(start, PatternErrorKind::QuoteInCharacterClass),
                    'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'p' | 'P' => {
                        self.fail(start, PatternErrorKind::NotSupportedCharacterClass)
                    }
                    'u' | 'x' => {
                        self.pos += 1;
                        self.scalar_escape(start)
                    }
                    _ => self.escaped_char(start, c),
                }
            }
            c => {
                self.pos += 1;
                Ok(c as Scalar)
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(pattern: &str) -> PatternErrorKind {
        parse(pattern).expect_err("pattern should be rejected").kind
    }

    fn scalar(c: char) -> Ast {
        Ast::Atom(Atom::Scalar(c as Scalar))
    }

    /* ── Structure ─────────────────────────────────────────────────────── */

    #[test]
    fn test_empty_pattern() {
        assert_eq!(parse("").unwrap(), Ast::Empty);
    }

    #[test]
    fn test_single_char() {
        assert_eq!(parse("a").unwrap(), scalar('a'));
    }

    #[test]
    fn test_concat() {
        assert_eq!(
            parse("ab").unwrap(),
            Ast::Concat(vec![scalar('a'), scalar('b')])
        );
    }

    #[test]
    fn test_alternation() {
        assert_eq!(
            parse("a|b").unwrap(),
            Ast::Alternation(vec![scalar('a'), scalar('b')])
        );
    }

    #[test]
    fn test_alternation_with_empty_branch() {
        assert_eq!(
            parse("a|").unwrap(),
            Ast::Alternation(vec![scalar('a'), Ast::Empty])
        );
    }

    #[test]
    fn test_group_is_kept() {
        assert_eq!(parse("(a)").unwrap(), Ast::Group(Box::new(scalar('a'))));
    }

    #[test]
    fn test_group_precedence() {
        /* a(b|c) groups the alternation under the concat */
        let ast = parse("a(b|c)").unwrap();
        let Ast::Concat(parts) = ast else {
            panic!("expected concat")
        };
        assert_eq!(parts[0], scalar('a'));
        assert!(matches!(&parts[1], Ast::Group(_)));
    }

    #[test]
    fn test_dot() {
        assert_eq!(parse(".").unwrap(), Ast::Atom(Atom::Dot));
    }

    /* ── Quantifiers ───────────────────────────────────────────────────── */

    #[test]
    fn test_reluctant_star() {
        let ast = parse("a*?").unwrap();
        assert_eq!(
            ast,
            Ast::Repeat {
                node: Box::new(scalar('a')),
                count: RepeatCount::ZeroOrMore,
                mode: RepeatMode::Reluctant,
                position: 1,
            }
        );
    }

    #[test]
    fn test_possessive_plus() {
        let Ast::Repeat { count, mode, .. } = parse("a++").unwrap() else {
            panic!("expected repeat")
        };
        assert_eq!(count, RepeatCount::OneOrMore);
        assert_eq!(mode, RepeatMode::Possessive);
    }

    #[test]
    fn test_eager_star_parses() {
        /* Parsing accepts eagerness; the lowering pass rejects it */
        let Ast::Repeat { mode, .. } = parse("a*").unwrap() else {
            panic!("expected repeat")
        };
        assert_eq!(mode, RepeatMode::Eager);
    }

    #[test]
    fn test_braced_counts() {
        let cases = [
            ("a{3}", RepeatCount::Exactly(3)),
            ("a{2,}", RepeatCount::AtLeast(2)),
            ("a{,4}", RepeatCount::AtMost(4)),
            ("a{2,4}", RepeatCount::Between(2, 4)),
        ];
        for (pattern, expected) in cases {
            let Ast::Repeat { count, .. } = parse(pattern).unwrap() else {
                panic!("expected repeat for {}", pattern)
            };
            assert_eq!(count, expected, "for {}", pattern);
        }
    }

    #[test]
    fn test_invalid_repetition_ranges() {
        for pattern in ["a{}", "a{,}", "a{4,2}", "a{1x}", "a{1", "a{1,2"] {
            assert_eq!(
                kind_of(pattern),
                PatternErrorKind::InvalidRepetitionRange,
                "for {}",
                pattern
            );
        }
    }

    #[test]
    fn test_quantifier_without_atom() {
        for pattern in ["*", "+a", "?", "{3}", "a|*"] {
            assert_eq!(
                kind_of(pattern),
                PatternErrorKind::NotSupportedQualification,
                "for {}",
                pattern
            );
        }
    }

    #[test]
    fn test_double_quantifier() {
        assert_eq!(kind_of("a?*"), PatternErrorKind::NotSupportedQualification);
        assert_eq!(kind_of("a*?+"), PatternErrorKind::NotSupportedQualification);
    }

    /* ── Escapes and quotes ────────────────────────────────────────────── */

    #[test]
    fn test_escaped_metachars() {
        assert_eq!(parse(r"\.").unwrap(), scalar('.'));
        assert_eq!(parse(r"\\").unwrap(), scalar('\\'));
        assert_eq!(parse(r"\n").unwrap(), scalar('\n'));
    }

    #[test]
    fn test_scalar_escape() {
        assert_eq!(
            parse(r"\u{1F600}").unwrap(),
            Ast::Atom(Atom::Scalar(0x1F600))
        );
        assert_eq!(parse(r"\x{41}").unwrap(), Ast::Atom(Atom::Scalar(0x41)));
    }

    #[test]
    fn test_scalar_escape_too_wide() {
        assert_eq!(
            kind_of(r"\u{110000}"),
            PatternErrorKind::WiderUnicodeThanSupported
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(kind_of(r"\z"), PatternErrorKind::InvalidEscapeCharacter);
        assert_eq!(kind_of(r"\u41"), PatternErrorKind::InvalidEscapeCharacter);
    }

    #[test]
    fn test_dangling_escape() {
        assert_eq!(kind_of("\\"), PatternErrorKind::DanglingEscape);
    }

    #[test]
    fn test_quote_run() {
        assert_eq!(
            parse(r"\Qa+b\E").unwrap(),
            Ast::Quote(vec![97, 43, 98])
        );
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(kind_of(r"\Qab"), PatternErrorKind::UnclosedQuote);
    }

    #[test]
    fn test_shorthand_classes_rejected() {
        for pattern in [r"\d", r"\w+", r"\s", r"\p{L}", r"[\d]"] {
            assert_eq!(
                kind_of(pattern),
                PatternErrorKind::NotSupportedCharacterClass,
                "for {}",
                pattern
            );
        }
    }

    #[test]
    fn test_anchors_rejected() {
        assert_eq!(kind_of("^a"), PatternErrorKind::NotSupportedAtomKind);
        assert_eq!(kind_of("a$"), PatternErrorKind::NotSupportedAtomKind);
    }

    #[test]
    fn test_special_groups_rejected() {
        assert_eq!(kind_of("(?:a)"), PatternErrorKind::NotSupportedRegexNode);
    }

    /* ── Character classes ─────────────────────────────────────────────── */

    #[test]
    fn test_simple_class() {
        assert_eq!(
            parse("[ab]").unwrap(),
            Ast::Class(ClassAst {
                negated: false,
                items: vec![
                    ClassItem::Single(97),
                    ClassItem::Single(98)
                ],
            })
        );
    }

    #[test]
    fn test_class_range() {
        assert_eq!(
            parse("[a-z]").unwrap(),
            Ast::Class(ClassAst {
                negated: false,
                items: vec![ClassItem::Range(97, 122)],
            })
        );
    }

    #[test]
    fn test_negated_class() {
        let Ast::Class(class) = parse("[^bc]").unwrap() else {
            panic!("expected class")
        };
        assert!(class.negated);
        assert_eq!(
            class.items,
            vec![ClassItem::Single(98), ClassItem::Single(99)]
        );
    }

    #[test]
    fn test_nested_class() {
        let Ast::Class(class) = parse("[a[0-9]]").unwrap() else {
            panic!("expected class")
        };
        assert_eq!(class.items.len(), 2);
        assert!(matches!(class.items[1], ClassItem::Nested(_)));
    }

    #[test]
    fn test_leading_bracket_is_literal() {
        let Ast::Class(class) = parse("[]a]").unwrap() else {
            panic!("expected class")
        };
        assert_eq!(
            class.items,
            vec![ClassItem::Single(93), ClassItem::Single(97)]
        );
    }

    #[test]
    fn test_literal_dash_positions() {
        let Ast::Class(class) = parse("[-a-]").unwrap() else {
            panic!("expected class")
        };
        assert_eq!(
            class.items,
            vec![
                ClassItem::Single(45),
                ClassItem::Single(97),
                ClassItem::Single(45)
            ]
        );
    }

    #[test]
    fn test_class_range_out_of_order() {
        assert_eq!(kind_of("[z-a]"), PatternErrorKind::IncorrectCharRange);
    }

    #[test]
    fn test_class_range_endpoint_kinds() {
        assert_eq!(
            kind_of("[[ab]-z]"),
            PatternErrorKind::NotSupportedCharacterRangeKind
        );
        assert_eq!(
            kind_of("[a-[bc]]"),
            PatternErrorKind::NotSupportedCharacterRangeKind
        );
    }

    #[test]
    fn test_quote_in_class() {
        assert_eq!(kind_of(r"[\Qa\E]"), PatternErrorKind::QuoteInCharacterClass);
    }

    #[test]
    fn test_unclosed_constructs() {
        assert_eq!(kind_of("(ab"), PatternErrorKind::UnclosedGroup);
        assert_eq!(kind_of("[ab"), PatternErrorKind::UnclosedClass);
        assert_eq!(kind_of("ab)"), PatternErrorKind::UnmatchedGroupClose);
    }

    #[test]
    fn test_error_position() {
        let err = parse("ab[z-a]").expect_err("out-of-order range");
        assert_eq!(err.position, 4); /* the '-' */
    }
}
