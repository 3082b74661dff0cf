//! Finalised graph → Rust jump routines.
//!
//! Every node becomes one routine `jump_to_<id>` over the runtime cursor;
//! control flow between nodes is a tail call, a mismatch either tail-calls
//! the node's fallback or raises the runtime's dead-end error, and leaves
//! record their token (or skip) according to the terminal's kind. A public
//! constructor wires the root routine into the runtime's pull-based lexer.
//!
//! Code is built as one `String` and parsed into a `TokenStream` exactly
//! once at the end; building the stream incrementally costs an allocation
//! per fragment and dominates generation time for big graphs.

use std::collections::BTreeMap;
use std::fmt::Write;

use proc_macro2::TokenStream;

use crate::error::GraphError;
use crate::graph::{Branch, Graph, GraphStats, Node, NodeId, Seq, SeqMiss, TerminalKind};
use crate::range::ScalarRange;

/// Paths and names spliced into the emitted routines.
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Path of the token enum the surrounding code declares (e.g. `Token`).
    pub token_type: String,
    /// Path of the runtime crate inside the emitted code.
    pub runtime_path: String,
    /// Name of the emitted public constructor.
    pub entry: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            token_type: "Token".to_string(),
            runtime_path: "::jumplex_runtime".to_string(),
            entry: "lexer".to_string(),
        }
    }
}

/// Generate the routines as a token stream, plus arena statistics.
pub fn generate_routines(
    graph: &Graph,
    config: &CodegenConfig,
) -> Result<(TokenStream, GraphStats), GraphError> {
    let (source, stats) = generate_source(graph, config)?;
    let stream = source
        .parse::<TokenStream>()
        .expect("generated routines must be valid Rust");
    Ok((stream, stats))
}

/// Generate the routines as a plain string (no proc-macro parsing).
///
/// The string entry point exists so a caller assembling a larger output can
/// concatenate and parse once at the very end.
pub fn generate_source(
    graph: &Graph,
    config: &CodegenConfig,
) -> Result<(String, GraphStats), GraphError> {
    let root = graph.root_id().ok_or(GraphError::EmptyRoot)?;
    let mut buf = String::with_capacity(1024 + graph.nodes().len() * 256);

    for (index, slot) in graph.nodes().iter().enumerate() {
        let node = slot.as_ref().ok_or(GraphError::ShakingError)?;
        let id = index as NodeId;
        write_routine_header(&mut buf, id, config);
        match node {
            Node::Leaf(terminal) => {
                let terminal = graph
                    .terminals()
                    .get(*terminal as usize)
                    .ok_or(GraphError::ShakingError)?;
                write_leaf_body(&mut buf, &terminal.name, &terminal.kind, config);
            }
            Node::Branch(branch) => write_branch_body(&mut buf, branch),
            Node::Seq(seq) => write_seq_body(&mut buf, seq),
        }
        buf.push_str("}\n");
    }

    write_entry(&mut buf, root, config);
    Ok((buf, GraphStats::of(graph)))
}

// ══════════════════════════════════════════════════════════════════════════════
// Writers
// ══════════════════════════════════════════════════════════════════════════════

fn write_routine_header(buf: &mut String, id: NodeId, config: &CodegenConfig) {
    write!(
        buf,
        "fn jump_to_{id}<'s>(lex: &mut {rt}::Cursor<'s, {token}>) \
         -> ::core::result::Result<(), {rt}::LexError> {{ ",
        id = id,
        rt = config.runtime_path,
        token = config.token_type,
    )
    .unwrap();
}

/// A leaf records the step's outcome according to its terminal kind.
/// Callback text is spliced verbatim; the generator never interprets it.
fn write_leaf_body(buf: &mut String, name: &str, kind: &TerminalKind, config: &CodegenConfig) {
    match kind {
        TerminalKind::Standalone => {
            write!(buf, "lex.set_token({}::{})", config.token_type, name)
        }
        TerminalKind::Skip => {
            write!(buf, "lex.skip(); ::core::result::Result::Ok(())")
        }
        TerminalKind::FillCallback(callback) => {
            write!(
                buf,
                "lex.set_token({}::{}(({})(lex)))",
                config.token_type, name, callback
            )
        }
        TerminalKind::CreateCallback(callback) => {
            write!(buf, "lex.emit(({})(lex))", callback)
        }
    }
    .unwrap();
    buf.push(' ');
}

/// A branch peeks one scalar and switches over its range arms, one arm per
/// distinct target. End of input takes the miss path without consuming.
fn write_branch_body(buf: &mut String, branch: &Branch) {
    let miss = miss_expression(branch.miss);
    if branch.branches.is_empty() {
        // No arms: every scalar (and end of input) takes the miss path.
        write!(buf, "{} ", miss).unwrap();
        return;
    }
    write!(
        buf,
        "let scalar = match lex.peek() {{ \
         ::core::option::Option::Some(scalar) => scalar, \
         ::core::option::Option::None => return {miss}, \
         }}; match scalar {{ ",
        miss = miss,
    )
    .unwrap();

    // Group keys by target so each successor gets a single arm; BTreeMap
    // iteration keeps emission order stable across runs.
    let mut groups: BTreeMap<NodeId, Vec<ScalarRange>> = BTreeMap::new();
    for (range, target) in &branch.branches {
        groups.entry(*target).or_default().push(*range);
    }
    for (target, ranges) in &groups {
        let patterns: Vec<String> = ranges
            .iter()
            .map(|range| format!("{}u32..={}u32", range.lo, range.hi))
            .collect();
        write!(
            buf,
            "{} => {{ lex.bump(1)?; jump_to_{}(lex) }} ",
            patterns.join(" | "),
            target
        )
        .unwrap();
    }
    write!(buf, "_ => {miss}, }} ", miss = miss).unwrap();
}

/// A run peeks its whole window at once: too little input or a mismatch
/// takes the fallback path per the run's policy.
fn write_seq_body(buf: &mut String, seq: &Seq) {
    let run: Vec<String> = seq.run.iter().map(|scalar| format!("{}u32", scalar)).collect();
    let miss = match seq.miss {
        Some(SeqMiss::First(target)) | Some(SeqMiss::Anytime(target)) => {
            format!("jump_to_{}(lex)", target)
        }
        None => "::core::result::Result::Err(lex.error())".to_string(),
    };
    write!(
        buf,
        "const RUN: &[u32] = &[{run}]; \
         match lex.peek_slice({len}) {{ \
         ::core::option::Option::Some(window) if window == RUN => \
         {{ lex.bump({len})?; jump_to_{then}(lex) }} ",
        run = run.join(", "),
        len = seq.run.len(),
        then = seq.then,
    )
    .unwrap();
    if let Some(SeqMiss::First(_)) = seq.miss {
        // The window began to match and then diverged: the first-position
        // fallback no longer applies, so this is a dead end.
        write!(
            buf,
            "::core::option::Option::Some(window) if window[0] == {first}u32 => \
             ::core::result::Result::Err(lex.error()), ",
            first = seq.run[0],
        )
        .unwrap();
    }
    write!(buf, "_ => {miss}, }} ", miss = miss).unwrap();
}

fn miss_expression(miss: Option<NodeId>) -> String {
    match miss {
        Some(target) => format!("jump_to_{}(lex)", target),
        None => "::core::result::Result::Err(lex.error())".to_string(),
    }
}

/// The public constructor tying the root routine to the runtime lexer.
fn write_entry(buf: &mut String, root: NodeId, config: &CodegenConfig) {
    write!(
        buf,
        "pub fn {entry}<'s>(source: &'s [u32]) \
         -> {rt}::Lexer<'s, {token}, {rt}::RootFn<'s, {token}>> {{ \
         {rt}::Lexer::new(source, jump_to_{root} as {rt}::RootFn<'s, {token}>) \
         }}\n",
        entry = config.entry,
        rt = config.runtime_path,
        token = config.token_type,
        root = root,
    )
    .unwrap();
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
