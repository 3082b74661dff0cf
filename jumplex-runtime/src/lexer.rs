//! Pull-based iteration over a generated root routine.
//!
//! A [`Lexer`] owns a [`Cursor`] and a root routine. Each `next()` call runs
//! one step: reset the span to the read head, invoke the root routine, and
//! interpret the outcome. A skipped span repeats the step; a recorded token
//! is yielded with its span; an error is yielded once and ends iteration.

use crate::cursor::{Cursor, LexError, Span};
use crate::Scalar;

/// Signature of a generated root routine, as emitted by the generator.
pub type RootFn<'s, T> = fn(&mut Cursor<'s, T>) -> Result<(), LexError>;

/// Iterator producing `(token, span)` pairs by stepping a root routine.
///
/// The routine parameter is generic so both generated function items and
/// borrowing closures (e.g. a graph interpreter) can drive the same loop.
pub struct Lexer<'s, T, F>
where
    F: FnMut(&mut Cursor<'s, T>) -> Result<(), LexError>,
{
    cursor: Cursor<'s, T>,
    root: F,
    failed: bool,
}

impl<'s, T, F> Lexer<'s, T, F>
where
    F: FnMut(&mut Cursor<'s, T>) -> Result<(), LexError>,
{
    /// Create a lexer over `source` driven by `root`.
    pub fn new(source: &'s [Scalar], root: F) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            root,
            failed: false,
        }
    }
}

impl<'s, T, F> Iterator for Lexer<'s, T, F>
where
    F: FnMut(&mut Cursor<'s, T>) -> Result<(), LexError>,
{
    type Item = Result<(T, Span), LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            self.cursor.begin_step();
            if self.cursor.at_boundary() {
                return None;
            }
            if let Err(error) = (self.root)(&mut self.cursor) {
                self.failed = true;
                return Some(Err(error));
            }
            if let Some(token) = self.cursor.take_token() {
                let span = self.cursor.span();
                if span.is_empty() {
                    self.failed = true;
                    return Some(Err(LexError::EmptyToken { at: span.start }));
                }
                return Some(Ok((token, span)));
            }
            if self.cursor.was_skipped() {
                continue;
            }
            // The routine returned without a token, a skip, or an error;
            // the generated program is malformed.
            self.failed = true;
            return Some(Err(LexError::EmptyToken {
                at: self.cursor.span().start,
            }));
        }
    }
}
