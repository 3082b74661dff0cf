//! Generation-time error surface.
//!
//! Two layers: per-pattern errors from the regex frontend (position-annotated,
//! with a kind naming exactly what was unsupported or malformed) and graph
//! errors (design conflicts the author must resolve, plus internal invariants
//! that indicate a generator bug if they ever surface). Every error crosses
//! the API with its kind intact; nothing is collapsed into strings.

use crate::graph::NodeId;

/// What went wrong while parsing or lowering a single pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// `{m}` / `{n,m}` with empty, non-numeric, or inverted bounds.
    InvalidRepetitionRange,
    /// Greedy `*` or `+`; the algebra has no greedy trailing loop.
    GreedyMatchingMore,
    /// A repetition whose kind cannot be lowered: greedy `{n,}`, or an
    /// open-ended repetition over a body that accepts the empty run.
    NotSupportedRepetitionKind,
    /// A quantifier with nothing to qualify, or a doubly-quantified atom.
    NotSupportedQualification,
    /// An atom the lowering has no meaning for (anchors `^` / `$`).
    NotSupportedAtomKind,
    /// A regex construct outside the supported subset (`(?…)` groups).
    NotSupportedRegexNode,
    /// Perl / Unicode-property classes (`\d`, `\w`, `\s`, `\p{…}`).
    NotSupportedCharacterClass,
    /// A class range whose low endpoint exceeds its high endpoint.
    IncorrectCharRange,
    /// A class range endpoint that is not a single character.
    NotSupportedCharacterRangeKind,
    /// An escape sequence with no assigned meaning.
    InvalidEscapeCharacter,
    /// A `\Q…\E` quote inside a character class.
    QuoteInCharacterClass,
    /// A scalar escape above the Unicode ceiling `0x10FFFF`.
    WiderUnicodeThanSupported,
    /// `(` without a matching `)`.
    UnclosedGroup,
    /// `[` without a matching `]`.
    UnclosedClass,
    /// `\Q` without a matching `\E`.
    UnclosedQuote,
    /// `)` without a matching `(`.
    UnmatchedGroupClose,
    /// `\` at the end of the pattern.
    DanglingEscape,
}

impl PatternErrorKind {
    fn message(&self) -> &'static str {
        match self {
            PatternErrorKind::InvalidRepetitionRange => "invalid repetition range",
            PatternErrorKind::GreedyMatchingMore => {
                "greedy repetition is not supported; use a reluctant (`*?`) or \
                 possessive (`*+`) quantifier"
            }
            PatternErrorKind::NotSupportedRepetitionKind => "unsupported repetition kind",
            PatternErrorKind::NotSupportedQualification => "quantifier has nothing to qualify",
            PatternErrorKind::NotSupportedAtomKind => "unsupported atom",
            PatternErrorKind::NotSupportedRegexNode => "unsupported regex construct",
            PatternErrorKind::NotSupportedCharacterClass => "unsupported character class",
            PatternErrorKind::IncorrectCharRange => "character range is out of order",
            PatternErrorKind::NotSupportedCharacterRangeKind => {
                "character range endpoint must be a single character"
            }
            PatternErrorKind::InvalidEscapeCharacter => "invalid escape",
            PatternErrorKind::QuoteInCharacterClass => "\\Q quote inside a character class",
            PatternErrorKind::WiderUnicodeThanSupported => {
                "scalar escape exceeds the Unicode ceiling"
            }
            PatternErrorKind::UnclosedGroup => "unclosed group '('",
            PatternErrorKind::UnclosedClass => "unclosed character class '['",
            PatternErrorKind::UnclosedQuote => "unclosed \\Q quote",
            PatternErrorKind::UnmatchedGroupClose => "unmatched ')'",
            PatternErrorKind::DanglingEscape => "trailing backslash",
        }
    }
}

/// Error from parsing or lowering a pattern, annotated with the scalar
/// offset into the pattern where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternError {
    pub position: usize,
    pub kind: PatternErrorKind,
}

impl PatternError {
    pub(crate) fn new(position: usize, kind: PatternErrorKind) -> Self {
        PatternError { position, kind }
    }
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pattern error at offset {}: {}",
            self.position,
            self.kind.message()
        )
    }
}

impl std::error::Error for PatternError {}

/// Error from graph construction, merging, or finalisation.
///
/// `DuplicatedInputs` and `IdenticalPriority` are design conflicts the author
/// resolves by editing the token set. The remaining variants are internal
/// invariants: reaching one means the generator itself is broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two terminals with the same name and the same lowered pattern.
    DuplicatedInputs { name: String },
    /// Two distinct terminals accept the same input at the same priority.
    IdenticalPriority {
        first: String,
        second: String,
        priority: u32,
    },
    /// Both sides of a merge were empty slots.
    EmptyMerging,
    /// Two accepting leaves reached the pairwise-merge stage.
    MergingLeaves,
    /// A fill targeted a slot that already holds a node.
    OverwriteNonReserved { id: NodeId },
    /// Finalisation ran over a graph with no terminals pushed.
    EmptyRoot,
    /// The reachability pass met a dangling or unfilled slot.
    ShakingError,
    /// The branch-table range merge produced an impossible interval.
    MergingRangeError,
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicatedInputs { name } => {
                write!(f, "token `{}` is declared twice with the same pattern", name)
            }
            GraphError::IdenticalPriority {
                first,
                second,
                priority,
            } => write!(
                f,
                "tokens `{}` and `{}` both accept the same input at priority {}; \
                 assign distinct priorities to disambiguate",
                first, second, priority
            ),
            GraphError::EmptyMerging => write!(f, "internal: merged two empty slots"),
            GraphError::MergingLeaves => write!(f, "internal: merged two accepting leaves"),
            GraphError::OverwriteNonReserved { id } => {
                write!(f, "internal: overwrote non-reserved node {}", id)
            }
            GraphError::EmptyRoot => write!(f, "no terminals were pushed before finalisation"),
            GraphError::ShakingError => write!(f, "internal: dangling node during shake"),
            GraphError::MergingRangeError => {
                write!(f, "internal: impossible interval during range merge")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Umbrella error for the whole generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A pattern failed to parse or lower; carries the owning token name.
    Pattern { token: String, error: PatternError },
    /// Graph construction or finalisation failed.
    Graph(GraphError),
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::Pattern { token, error } => {
                write!(f, "in pattern for token `{}`: {}", token, error)
            }
            GenError::Graph(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::Pattern { error, .. } => Some(error),
            GenError::Graph(error) => Some(error),
        }
    }
}

impl From<GraphError> for GenError {
    fn from(error: GraphError) -> Self {
        GenError::Graph(error)
    }
}
