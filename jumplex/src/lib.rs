//! # jumplex: compile-time lexer generator
//!
//! From a declarative set of token definitions (literal patterns or regexes,
//! each with an optional priority and callback), jumplex builds a
//! deterministic scalar-driven state graph and emits it as a collection of
//! mutually-recursive jump routines over the `jumplex-runtime` cursor.
//!
//! ## Pipeline
//!
//! ```text
//! TokenSet
//!    │
//!    ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ 1. Frontend: pattern → AST → HIR             │
//!  │    (regex.rs, hir.rs)                        │
//!  │                                              │
//!  │ 2. Graph: push each terminal, merge, fold    │
//!  │    the canonical root, shake unreachable     │
//!  │    slots away (graph/)                       │
//!  │                                              │
//!  │ 3. Codegen: one jump routine per node        │
//!  │    (codegen.rs)                              │
//!  └──────────────────────────────────────────────┘
//!    │
//!    ▼
//! TokenStream (Rust source code)
//! ```
//!
//! The macro surface binding token definitions to an enum, the host build
//! pipeline, and file I/O all live elsewhere; this crate starts at a bound
//! [`TokenSet`] and ends at emitted routines.
//!
//! ## Example
//!
//! ```
//! use jumplex::{TokenDef, TokenSet};
//!
//! let set = TokenSet::new("Arith")
//!     .skip(" +?")
//!     .token(TokenDef::regex("Number", "[0-9]+?"))
//!     .token(TokenDef::token("Plus", "+"));
//!
//! let graph = jumplex::build_graph(&set).unwrap();
//! let source = jumplex_runtime::scalars("1 + 23");
//! let steps = jumplex::simulate::tokenize(&graph, &source).unwrap();
//! assert_eq!(steps.len(), 3);
//! ```

pub mod codegen;
pub mod error;
pub mod graph;
pub mod hir;
pub mod range;
pub mod regex;
pub mod simulate;

#[cfg(test)]
mod tests;

use proc_macro2::TokenStream;

pub use codegen::CodegenConfig;
pub use error::{GenError, GraphError, PatternError, PatternErrorKind};
pub use graph::{Graph, GraphStats, Terminal, TerminalKind};
pub use hir::Hir;

/// How a token definition binds its pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A literal: the text is matched verbatim, metacharacters and all.
    Token(String),
    /// A regex in the supported subset.
    Regex(String),
}

/// The callback attached to a token definition, carried as opaque source
/// text and spliced verbatim into the emitted leaf routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// Transforms the matched slice into the variant payload.
    Fill(String),
    /// Returns a finished variant, or the skip sentinel.
    Create(String),
}

/// One token variant: a name, exactly one pattern association, an optional
/// priority override, and at most one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub name: String,
    pub pattern: Pattern,
    pub priority: Option<u32>,
    pub callback: Option<Callback>,
}

impl TokenDef {
    /// A variant bound to a literal pattern.
    pub fn token(name: impl Into<String>, literal: impl Into<String>) -> TokenDef {
        TokenDef {
            name: name.into(),
            pattern: Pattern::Token(literal.into()),
            priority: None,
            callback: None,
        }
    }

    /// A variant bound to a regex pattern.
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> TokenDef {
        TokenDef {
            name: name.into(),
            pattern: Pattern::Regex(pattern.into()),
            priority: None,
            callback: None,
        }
    }

    /// Override the tie-break priority (defaults to the pattern's score).
    pub fn with_priority(mut self, priority: u32) -> TokenDef {
        self.priority = Some(priority);
        self
    }

    /// Attach a fill callback.
    pub fn with_fill(mut self, callback: impl Into<String>) -> TokenDef {
        self.callback = Some(Callback::Fill(callback.into()));
        self
    }

    /// Attach a create callback.
    pub fn with_create(mut self, callback: impl Into<String>) -> TokenDef {
        self.callback = Some(Callback::Create(callback.into()));
        self
    }
}

/// A complete token-set declaration: an optional skip pattern plus the
/// variants, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    pub name: String,
    pub skip: Option<String>,
    pub tokens: Vec<TokenDef>,
}

impl TokenSet {
    pub fn new(name: impl Into<String>) -> TokenSet {
        TokenSet {
            name: name.into(),
            skip: None,
            tokens: Vec::new(),
        }
    }

    /// Set the skip pattern: a regex whose matches are dropped silently.
    pub fn skip(mut self, pattern: impl Into<String>) -> TokenSet {
        self.skip = Some(pattern.into());
        self
    }

    /// Append a token definition.
    pub fn token(mut self, def: TokenDef) -> TokenSet {
        self.tokens.push(def);
        self
    }
}

/// Name under which the skip pattern appears in the terminal table.
const SKIP_TERMINAL: &str = "skip";

/// Check that every pattern in the set parses and lowers, without building
/// a graph. Useful for early per-definition diagnostics in the surface
/// layer, before the whole set is assembled.
///
/// # Errors
///
/// Returns the first pattern error in declaration order (skip pattern
/// first), tagged with the owning token name.
pub fn validate(set: &TokenSet) -> Result<(), GenError> {
    if let Some(pattern) = &set.skip {
        Hir::from_regex(pattern).map_err(|error| GenError::Pattern {
            token: SKIP_TERMINAL.to_string(),
            error,
        })?;
    }
    for def in &set.tokens {
        if let Pattern::Regex(pattern) = &def.pattern {
            Hir::from_regex(pattern).map_err(|error| GenError::Pattern {
                token: def.name.clone(),
                error,
            })?;
        }
    }
    Ok(())
}

/// Lower every definition, push it into a fresh graph, fold the root, and
/// shake. The returned graph is finalised: dense ids, every slot filled.
pub fn build_graph(set: &TokenSet) -> Result<Graph, GenError> {
    let mut graph = Graph::new();

    if let Some(pattern) = &set.skip {
        let hir = Hir::from_regex(pattern).map_err(|error| GenError::Pattern {
            token: SKIP_TERMINAL.to_string(),
            error,
        })?;
        graph.push_terminal(Terminal::new(SKIP_TERMINAL, TerminalKind::Skip, hir))?;
    }

    for def in &set.tokens {
        let hir = match &def.pattern {
            Pattern::Token(text) => Hir::from_token(text),
            Pattern::Regex(pattern) => {
                Hir::from_regex(pattern).map_err(|error| GenError::Pattern {
                    token: def.name.clone(),
                    error,
                })?
            }
        };
        let kind = match &def.callback {
            None => TerminalKind::Standalone,
            Some(Callback::Fill(callback)) => TerminalKind::FillCallback(callback.clone()),
            Some(Callback::Create(callback)) => TerminalKind::CreateCallback(callback.clone()),
        };
        let mut terminal = Terminal::new(def.name.clone(), kind, hir);
        if let Some(priority) = def.priority {
            terminal = terminal.with_priority(priority);
        }
        graph.push_terminal(terminal)?;
    }

    graph.make_root()?;
    graph.shake()?;
    Ok(graph)
}

/// The whole pipeline: build the graph and emit its jump routines.
pub fn generate_lexer(
    set: &TokenSet,
    config: &CodegenConfig,
) -> Result<(TokenStream, GraphStats), GenError> {
    let graph = build_graph(set)?;
    let (stream, stats) = codegen::generate_routines(&graph, config)?;
    Ok((stream, stats))
}
