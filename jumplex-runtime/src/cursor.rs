//! The cursor generated jump routines drive.
//!
//! A [`Cursor`] owns two positions into a borrowed source: `start` marks the
//! beginning of the token under construction, `end` the read head. Routines
//! peek at `end`, bump it forward, and finally either record a token for the
//! span `[start, end)`, skip the span, or report a dead end.

use crate::Scalar;

/// A half-open span `[start, end)` into the source, in scalar offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Number of scalars covered by the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no scalars.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error raised while driving generated routines over a source.
///
/// `NotMatch` is data-driven and expected: the source contained a prefix no
/// pattern accepts. The other three indicate a malformed generated program
/// (a bump past the boundary, a token recorded twice in one step, or a step
/// that produced a token over an empty span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A bump would have crossed the end of the source.
    SourceBoundExceeded { at: usize },
    /// A step finished with an empty span recorded as a token.
    EmptyToken { at: usize },
    /// A routine recorded a token when one was already set for this step.
    DuplicatedToken { at: usize },
    /// No pattern matches the source at this offset.
    NotMatch { at: usize },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::SourceBoundExceeded { at } => {
                write!(f, "bump past the source boundary at offset {}", at)
            }
            LexError::EmptyToken { at } => {
                write!(f, "empty token produced at offset {}", at)
            }
            LexError::DuplicatedToken { at } => {
                write!(f, "token recorded twice in one step at offset {}", at)
            }
            LexError::NotMatch { at } => {
                write!(f, "no token matches the source at offset {}", at)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Result of a create-style callback: either a finished token variant or a
/// request to drop the matched span and continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission<T> {
    Token(T),
    Skip,
}

/// Read cursor over a borrowed source of scalars.
///
/// `T` is the token type of the generated lexer; the cursor holds at most one
/// in-flight token per step.
#[derive(Debug)]
pub struct Cursor<'s, T> {
    source: &'s [Scalar],
    start: usize,
    end: usize,
    token: Option<T>,
    skipped: bool,
}

impl<'s, T> Cursor<'s, T> {
    /// Create a cursor positioned at the start of `source`.
    pub fn new(source: &'s [Scalar]) -> Self {
        Cursor {
            source,
            start: 0,
            end: 0,
            token: None,
            skipped: false,
        }
    }

    /// The scalar under the read head, if any.
    #[inline]
    pub fn peek(&self) -> Option<Scalar> {
        self.source.get(self.end).copied()
    }

    /// A window of `len` scalars starting at the read head, if that many
    /// remain before the boundary.
    #[inline]
    pub fn peek_slice(&self, len: usize) -> Option<&'s [Scalar]> {
        self.source.get(self.end..self.end + len)
    }

    /// Advance the read head by `n` scalars.
    #[inline]
    pub fn bump(&mut self, n: usize) -> Result<(), LexError> {
        if self.end + n > self.source.len() {
            return Err(LexError::SourceBoundExceeded { at: self.end });
        }
        self.end += n;
        Ok(())
    }

    /// The scalars covered by the current span.
    #[inline]
    pub fn slice(&self) -> &'s [Scalar] {
        &self.source[self.start..self.end]
    }

    /// The current span `[start, end)`.
    #[inline]
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }

    /// Record the token produced by this step.
    pub fn set_token(&mut self, token: T) -> Result<(), LexError> {
        if self.token.is_some() {
            return Err(LexError::DuplicatedToken { at: self.end });
        }
        self.token = Some(token);
        Ok(())
    }

    /// Record a create-callback result: a token, or a skip of the span.
    pub fn emit(&mut self, emission: Emission<T>) -> Result<(), LexError> {
        match emission {
            Emission::Token(token) => self.set_token(token),
            Emission::Skip => {
                self.skip();
                Ok(())
            }
        }
    }

    /// Drop the accumulated span and restart from the read head.
    ///
    /// An empty span advances one scalar first so a skip always makes
    /// progress.
    pub fn skip(&mut self) {
        if self.start == self.end && self.end < self.source.len() {
            self.end += 1;
        }
        self.start = self.end;
        self.skipped = true;
    }

    /// The error reported when no branch accepts the scalar under the head.
    pub fn error(&self) -> LexError {
        LexError::NotMatch { at: self.end }
    }

    // ── driver-side hooks (used by `Lexer`) ────────────────────────────────

    pub(crate) fn begin_step(&mut self) {
        self.start = self.end;
        self.token = None;
        self.skipped = false;
    }

    pub(crate) fn at_boundary(&self) -> bool {
        self.end >= self.source.len()
    }

    pub(crate) fn take_token(&mut self) -> Option<T> {
        self.token.take()
    }

    pub(crate) fn was_skipped(&self) -> bool {
        self.skipped
    }
}
