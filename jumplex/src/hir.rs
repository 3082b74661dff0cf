//! High-level intermediate representation of a pattern.
//!
//! The HIR is the normalised algebra the graph consumes: literal runs,
//! disjoint-sorted character classes, concatenation, alternation, a single
//! zero-or-more trailing loop, and zero-or-one. Bounded repetition is
//! unrolled here into concrete copies plus at most one trailing loop, so the
//! graph never sees a counter.
//!
//! Normalisation invariants:
//! - `Concat` / `Alternation` hold at least two children and never wrap a
//!   single child; nested concatenations are flattened.
//! - `Class` range lists are pairwise disjoint and ascending; inversion is
//!   resolved at construction against the total alphabet.

use jumplex_runtime::Scalar;

use crate::error::{PatternError, PatternErrorKind};
use crate::range::{self, ScalarRange};
use crate::regex::{self, Ast, Atom, ClassAst, ClassItem, RepeatCount, RepeatMode};

/// Normalised pattern algebra. Immutable and hashable; equality is
/// structural, which the duplicate-input check relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hir {
    /// Matches the empty run.
    Empty,
    /// A non-empty run of concrete scalars.
    Literal(Vec<Scalar>),
    /// One scalar out of a disjoint, ascending range list.
    Class(Vec<ScalarRange>),
    /// Two or more parts in sequence.
    Concat(Vec<Hir>),
    /// Two or more alternatives.
    Alternation(Vec<Hir>),
    /// Zero or more repetitions, exiting on the first mismatch.
    Loop(Box<Hir>),
    /// Zero or one occurrence.
    Maybe(Box<Hir>),
}

impl Hir {
    /// Lower the token form: the text is taken verbatim, one scalar per
    /// character, with no metacharacters.
    pub fn from_token(text: &str) -> Hir {
        let run = jumplex_runtime::scalars(text);
        if run.is_empty() {
            Hir::Empty
        } else {
            Hir::Literal(run)
        }
    }

    /// Parse and lower the regex form.
    pub fn from_regex(pattern: &str) -> Result<Hir, PatternError> {
        lower(&regex::parse(pattern)?)
    }

    /// Build a concatenation, flattening nested concats, dropping empty
    /// parts, and collapsing to the single child where one remains.
    pub fn concat(parts: Vec<Hir>) -> Hir {
        let mut flat: Vec<Hir> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Hir::Empty => {}
                Hir::Concat(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Hir::Empty,
            1 => flat.pop().expect("one part"),
            _ => Hir::Concat(flat),
        }
    }

    /// Build an alternation, collapsing a single alternative to itself.
    pub fn alternation(mut branches: Vec<Hir>) -> Hir {
        match branches.len() {
            0 => Hir::Empty,
            1 => branches.pop().expect("one branch"),
            _ => Hir::Alternation(branches),
        }
    }

    /// Build a class from raw ranges, normalising to the canonical form.
    pub fn class(ranges: Vec<ScalarRange>) -> Hir {
        Hir::Class(range::normalize(ranges))
    }

    /// Whether this pattern accepts the empty run.
    ///
    /// A trailing loop over such a pattern would spin without consuming, so
    /// repetition lowering refuses to build one.
    pub fn matches_empty(&self) -> bool {
        match self {
            Hir::Empty | Hir::Loop(_) | Hir::Maybe(_) => true,
            Hir::Literal(_) | Hir::Class(_) => false,
            Hir::Concat(parts) => parts.iter().all(Hir::matches_empty),
            Hir::Alternation(branches) => branches.iter().any(Hir::matches_empty),
        }
    }

    /// Tie-break score used when two terminals accept the same span.
    ///
    /// Specificity and length are rewarded, open-ended repetition is not:
    /// literals score two per scalar, a class scores one regardless of
    /// width, loops and optionals score nothing, concatenation sums, and an
    /// alternation is only as strong as its weakest branch. The constant
    /// class score and the `min` rule are deliberate: they preserve the
    /// established tie-break outcomes even where a width-scaled score might
    /// look more principled.
    pub fn priority(&self) -> u32 {
        match self {
            Hir::Empty | Hir::Loop(_) | Hir::Maybe(_) => 0,
            Hir::Class(_) => 1,
            Hir::Literal(run) => 2 * run.len() as u32,
            Hir::Concat(parts) => parts.iter().map(Hir::priority).sum(),
            Hir::Alternation(branches) => {
                branches.iter().map(Hir::priority).min().unwrap_or(0)
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// AST → HIR lowering
// ══════════════════════════════════════════════════════════════════════════════

/// Lower a parsed AST into the normalised algebra.
pub fn lower(ast: &Ast) -> Result<Hir, PatternError> {
    match ast {
        Ast::Empty => Ok(Hir::Empty),
        Ast::Group(inner) => lower(inner),
        Ast::Concat(parts) => {
            let lowered = parts.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
            Ok(Hir::concat(lowered))
        }
        Ast::Alternation(branches) => {
            let lowered = branches.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
            Ok(Hir::alternation(lowered))
        }
        Ast::Quote(run) => Ok(if run.is_empty() {
            Hir::Empty
        } else {
            Hir::Literal(run.clone())
        }),
        Ast::Atom(Atom::Scalar(scalar)) => Ok(Hir::Literal(vec![*scalar])),
        Ast::Atom(Atom::Dot) => Ok(Hir::Class(vec![ScalarRange::TOTAL])),
        Ast::Class(class) => Ok(lower_class(class)),
        Ast::Repeat {
            node,
            count,
            mode,
            position,
        } => lower_repeat(node, *count, *mode, *position),
    }
}

/// Lower a character class to its canonical range list. Nested classes
/// resolve their own inversion first; the outer inversion complements the
/// concatenated result against the total alphabet.
fn lower_class(class: &ClassAst) -> Hir {
    let ranges = class_ranges(class);
    Hir::Class(ranges)
}

fn class_ranges(class: &ClassAst) -> Vec<ScalarRange> {
    let mut ranges: Vec<ScalarRange> = Vec::with_capacity(class.items.len());
    for item in &class.items {
        match item {
            ClassItem::Single(scalar) => ranges.push(ScalarRange::single(*scalar)),
            ClassItem::Range(lo, hi) => {
                // The parser already rejected out-of-order endpoints.
                if let Some(range) = ScalarRange::new(*lo, *hi) {
                    ranges.push(range);
                }
            }
            ClassItem::Nested(nested) => ranges.extend(class_ranges(nested)),
        }
    }
    let normalized = range::normalize(ranges);
    if class.negated {
        range::complement(&normalized)
    } else {
        normalized
    }
}

/// Unroll a quantifier per the repetition table:
///
/// | Count | Lowering |
/// |-------|----------|
/// | `*`   | `Loop(x)` |
/// | `+`   | `Concat([x, Loop(x)])` |
/// | `?`   | `Maybe(x)` |
/// | `{n}` | n copies |
/// | `{n,}`| n copies + `Loop(x)` |
/// | `{,m}`| m copies of `Maybe(x)` |
/// | `{n,m}`| n copies + (m-n) copies of `Maybe(x)` |
///
/// Open-ended eager repetition is rejected: without backtracking a greedy
/// trailing loop cannot be told apart from a reluctant one that matched too
/// much, so the caller must pick `*?` or `*+` explicitly.
fn lower_repeat(
    node: &Ast,
    count: RepeatCount,
    mode: RepeatMode,
    position: usize,
) -> Result<Hir, PatternError> {
    let child = lower(node)?;
    let eager = mode == RepeatMode::Eager;
    // An open-ended repetition needs a body that consumes at least one
    // scalar per iteration, or the trailing loop would spin in place.
    let unloopable = child.matches_empty();
    match count {
        RepeatCount::ZeroOrMore => {
            if eager {
                return Err(PatternError::new(position, PatternErrorKind::GreedyMatchingMore));
            }
            if unloopable {
                return Err(PatternError::new(
                    position,
                    PatternErrorKind::NotSupportedRepetitionKind,
                ));
            }
            Ok(Hir::Loop(Box::new(child)))
        }
        RepeatCount::OneOrMore => {
            if eager {
                return Err(PatternError::new(position, PatternErrorKind::GreedyMatchingMore));
            }
            if unloopable {
                return Err(PatternError::new(
                    position,
                    PatternErrorKind::NotSupportedRepetitionKind,
                ));
            }
            Ok(Hir::concat(vec![child.clone(), Hir::Loop(Box::new(child))]))
        }
        RepeatCount::ZeroOrOne => Ok(Hir::Maybe(Box::new(child))),
        RepeatCount::Exactly(n) => Ok(Hir::concat(vec![child; n as usize])),
        RepeatCount::AtLeast(n) => {
            if eager || unloopable {
                return Err(PatternError::new(
                    position,
                    PatternErrorKind::NotSupportedRepetitionKind,
                ));
            }
            let mut parts = vec![child.clone(); n as usize];
            parts.push(Hir::Loop(Box::new(child)));
            Ok(Hir::concat(parts))
        }
        RepeatCount::AtMost(m) => {
            let maybe = Hir::Maybe(Box::new(child));
            Ok(Hir::concat(vec![maybe; m as usize]))
        }
        RepeatCount::Between(n, m) => {
            let mut parts = vec![child.clone(); n as usize];
            let maybe = Hir::Maybe(Box::new(child));
            parts.extend(vec![maybe; (m - n) as usize]);
            Ok(Hir::concat(parts))
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
