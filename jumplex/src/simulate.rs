//! Reference executor for finalised graphs.
//!
//! Walks a graph over a source with the real runtime [`Cursor`], taking the
//! same decisions the emitted routines take arm for arm: branches peek one
//! scalar and dispatch or fall back, runs compare a peeked window against
//! their scalars, leaves record their terminal or skip. Scenario tests and
//! the prefix-closure property drive lexers through this module instead of
//! compiling emitted code.
//!
//! Callbacks are opaque source text the core never invokes, so a leaf with a
//! callback records the terminal id and span exactly like a standalone leaf.

use jumplex_runtime::{Cursor, LexError, Lexer, Span};

use crate::error::GraphError;
use crate::graph::{Graph, Node, NodeId, SeqMiss, TerminalId, TerminalKind};

/// One simulated lexing step: which terminal accepted, over which span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub terminal: TerminalId,
    pub span: Span,
}

/// Run the graph over a source, collecting every step until the input ends
/// or the first failure.
///
/// # Errors
///
/// Returns `EmptyRoot` if the graph was not finalised with `make_root`.
pub fn tokenize(
    graph: &Graph,
    source: &[jumplex_runtime::Scalar],
) -> Result<Vec<Result<Lexeme, LexError>>, GraphError> {
    let root = graph.root_id().ok_or(GraphError::EmptyRoot)?;
    let lexer = Lexer::new(source, |cursor| step(graph, root, cursor));
    Ok(lexer
        .map(|outcome| outcome.map(|(terminal, span)| Lexeme { terminal, span }))
        .collect())
}

/// Drive one step from `root` until a leaf records an outcome or a dead end
/// is reached. Mirrors the emitted routines: the node loop below is the
/// tail-call chain, flattened.
fn step(
    graph: &Graph,
    root: NodeId,
    cursor: &mut Cursor<'_, TerminalId>,
) -> Result<(), LexError> {
    let mut id = root;
    loop {
        // Dangling ids cannot survive a shake; a malformed graph surfaces
        // as the same dead end the emitted code would raise.
        let Some(node) = graph.get(id) else {
            return Err(cursor.error());
        };
        match node {
            Node::Leaf(terminal) => {
                let index = *terminal as usize;
                return match graph.terminals().get(index).map(|t| &t.kind) {
                    Some(TerminalKind::Skip) => {
                        cursor.skip();
                        Ok(())
                    }
                    _ => cursor.set_token(*terminal),
                };
            }
            Node::Branch(branch) => {
                match cursor.peek().and_then(|scalar| branch.lookup(scalar)) {
                    Some(target) => {
                        cursor.bump(1)?;
                        id = target;
                    }
                    // End of input or an uncovered scalar: the miss path,
                    // without consuming.
                    None => match branch.miss {
                        Some(miss) => id = miss,
                        None => return Err(cursor.error()),
                    },
                }
            }
            Node::Seq(seq) => {
                let window = cursor.peek_slice(seq.run.len());
                match window {
                    Some(window) if window == seq.run => {
                        cursor.bump(seq.run.len())?;
                        id = seq.then;
                    }
                    _ => match seq.miss {
                        Some(SeqMiss::Anytime(miss)) => id = miss,
                        Some(SeqMiss::First(miss)) => match window {
                            // The run began to match and then diverged:
                            // a first-position fallback no longer applies.
                            Some(window) if window.first() == seq.run.first() => {
                                return Err(cursor.error())
                            }
                            _ => id = miss,
                        },
                        None => return Err(cursor.error()),
                    },
                }
            }
        }
    }
}
