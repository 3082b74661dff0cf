//! Runtime support for jumplex-generated lexers.
//!
//! This crate provides:
//! - The [`Cursor`] every generated jump routine drives (peek / bump / slice)
//! - The pull-based [`Lexer`] iterator that steps a root routine over a source
//! - The [`LexError`] surface shared by generated code and user callbacks
//! - The [`Emission`] result type for create-style callbacks
//!
//! Generated code never owns the source: a lexer borrows a slice of Unicode
//! scalar values and hands borrowed sub-slices to callbacks.

// Cursor, span, and error types
mod cursor;
pub use cursor::{Cursor, Emission, LexError, Span};

// Pull-based iteration over a root routine
mod lexer;
pub use lexer::{Lexer, RootFn};

/// A single element of the lexing alphabet: one Unicode scalar value,
/// widened to 32 bits so internal range arithmetic never overflows.
pub type Scalar = u32;

/// Decode a string into the scalar alphabet the generated routines consume.
pub fn scalars(text: &str) -> Vec<Scalar> {
    text.chars().map(|c| c as Scalar).collect()
}
