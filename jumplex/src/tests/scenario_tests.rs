//! End-to-end scenarios: token sets driven over real sources through the
//! reference executor, asserting the full token streams.

use jumplex_runtime::{scalars, LexError, Scalar};

use crate::simulate::{tokenize, Lexeme};
use crate::{build_graph, Graph, TokenDef, TokenSet};

/// Lex `text` and return `(terminal name, matched text)` pairs, panicking
/// on any failed step.
fn lex_names(graph: &Graph, text: &str) -> Vec<(String, String)> {
    let source = scalars(text);
    tokenize(graph, &source)
        .expect("finalised graph")
        .into_iter()
        .map(|step| {
            let Lexeme { terminal, span } = step.expect("lexing step");
            let name = graph.terminals()[terminal as usize].name.clone();
            let matched: String = source[span.start..span.end]
                .iter()
                .map(|&scalar| char::from_u32(scalar).expect("valid scalar"))
                .collect();
            (name, matched)
        })
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect()
}

#[test]
fn test_priority_overrides_pick_the_winner() {
    // Two terminals over the identical literal: the explicit priority wins
    // every accept.
    let set = TokenSet::new("PriorityTest")
        .token(TokenDef::token("Fast", "fast"))
        .token(TokenDef::token("Faaaast", "fast").with_priority(10));
    let graph = build_graph(&set).expect("build");
    assert_eq!(lex_names(&graph, "fast"), pairs(&[("Faaaast", "fast")]));
}

#[test]
fn test_callback_set_full_stream() {
    let set = TokenSet::new("CallbackTest")
        .skip(" ")
        .token(TokenDef::regex("Double", r"[0-9]*?\.[0-9]+?").with_fill("read_f64"))
        .token(TokenDef::regex("Number", "[0-9]+?").with_fill("read_i64"))
        .token(TokenDef::token("What", "what"))
        .token(TokenDef::regex("Comment", "//.*?").with_fill("read_text"));
    let graph = build_graph(&set).expect("build");

    assert_eq!(
        lex_names(&graph, "100 1.5 what // this is a comment"),
        pairs(&[
            ("Number", "100"),
            ("Double", "1.5"),
            ("What", "what"),
            ("Comment", "// this is a comment"),
        ])
    );
}

#[test]
fn test_longest_prefix_beats_priority() {
    // "ab" vs "[a-b]+?": whatever the priorities, "aba" reaches only the
    // class terminal's accept at full length, so the longer span wins.
    for (high, low) in [("Ab", "Any"), ("Any", "Ab")] {
        let set = TokenSet::new("LongestMatch")
            .token(TokenDef::token("Ab", "ab").with_priority(if high == "Ab" { 10 } else { 1 }))
            .token(
                TokenDef::regex("Any", "[a-b]+?")
                    .with_priority(if high == "Any" { 10 } else { 1 }),
            );
        let graph = build_graph(&set).expect("build");
        assert_eq!(
            lex_names(&graph, "aba"),
            pairs(&[("Any", "aba")]),
            "high priority on {high}, low on {low}"
        );
    }
}

#[test]
fn test_same_span_resolves_by_priority() {
    // On exactly "ab" both terminals accept at the same span; priority
    // decides, in either direction.
    let set = TokenSet::new("SameSpan")
        .token(TokenDef::token("Ab", "ab").with_priority(10))
        .token(TokenDef::regex("Any", "[a-b]+?").with_priority(1));
    let graph = build_graph(&set).expect("build");
    assert_eq!(lex_names(&graph, "ab"), pairs(&[("Ab", "ab")]));

    let set = TokenSet::new("SameSpan")
        .token(TokenDef::token("Ab", "ab").with_priority(1))
        .token(TokenDef::regex("Any", "[a-b]+?").with_priority(10));
    let graph = build_graph(&set).expect("build");
    assert_eq!(lex_names(&graph, "ab"), pairs(&[("Any", "ab")]));
}

#[test]
fn test_keywords_beat_identifiers_by_priority() {
    let set = TokenSet::new("Keywords")
        .skip(" +?")
        .token(TokenDef::token("If", "if").with_priority(10))
        .token(TokenDef::regex("Ident", "[a-z]+?"));
    let graph = build_graph(&set).expect("build");
    assert_eq!(
        lex_names(&graph, "if iffy fi"),
        pairs(&[("If", "if"), ("Ident", "iffy"), ("Ident", "fi")])
    );
}

#[test]
fn test_not_match_stops_the_stream() {
    let set = TokenSet::new("Strict").token(TokenDef::token("Ab", "ab"));
    let graph = build_graph(&set).expect("build");
    let source = scalars("ab!ab");
    let steps = tokenize(&graph, &source).expect("finalised graph");
    assert_eq!(steps.len(), 2);
    assert!(steps[0].is_ok());
    assert_eq!(steps[1], Err(LexError::NotMatch { at: 2 }));
}

#[test]
fn test_skip_only_input_yields_nothing() {
    let set = TokenSet::new("Spaces")
        .skip(" +?")
        .token(TokenDef::token("Ab", "ab"));
    let graph = build_graph(&set).expect("build");
    let source = scalars("   ");
    let steps = tokenize(&graph, &source).expect("finalised graph");
    assert!(steps.is_empty());
}

#[test]
fn test_wide_scalars_lex_like_ascii() {
    let set = TokenSet::new("Wide")
        .skip(" +?")
        .token(TokenDef::token("Snowman", "☃"))
        .token(TokenDef::regex("Greek", "[α-ω]+?"));
    let graph = build_graph(&set).expect("build");
    assert_eq!(
        lex_names(&graph, "☃ αβγ"),
        pairs(&[("Snowman", "☃"), ("Greek", "αβγ")])
    );
}

#[test]
fn test_empty_source_yields_nothing() {
    let set = TokenSet::new("Empty").token(TokenDef::token("Ab", "ab"));
    let graph = build_graph(&set).expect("build");
    let source: Vec<Scalar> = Vec::new();
    let steps = tokenize(&graph, &source).expect("finalised graph");
    assert!(steps.is_empty());
}
