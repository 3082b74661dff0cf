//! Generate and drive a small arithmetic lexer.
//!
//! Builds the token graph for a calculator-flavoured token set, walks an
//! input through the reference executor, and prints the routines the
//! generator would hand to the macro layer.

use jumplex::codegen::{generate_source, CodegenConfig};
use jumplex::{build_graph, simulate, GraphStats, TokenDef, TokenSet};

fn main() {
    let set = TokenSet::new("Arith")
        .skip(" +?")
        .token(TokenDef::regex("Number", "[0-9]+?").with_fill("read_number"))
        .token(TokenDef::token("Plus", "+"))
        .token(TokenDef::token("Minus", "-"))
        .token(TokenDef::token("Star", "*"))
        .token(TokenDef::token("LParen", "("))
        .token(TokenDef::token("RParen", ")"));

    let graph = match build_graph(&set) {
        Ok(graph) => graph,
        Err(error) => {
            eprintln!("generation failed: {}", error);
            return;
        }
    };
    println!("=== Graph ===");
    println!("{:#?}", GraphStats::of(&graph));

    let input = "12 + (3 - 4) * 56";
    println!("\n=== Tokens for {:?} ===", input);
    let source = jumplex_runtime::scalars(input);
    for step in simulate::tokenize(&graph, &source).expect("finalised graph") {
        match step {
            Ok(lexeme) => {
                let terminal = &graph.terminals()[lexeme.terminal as usize];
                let text: String = source[lexeme.span.start..lexeme.span.end]
                    .iter()
                    .filter_map(|&scalar| char::from_u32(scalar))
                    .collect();
                println!("  {:<8} {:>6}  {:?}", terminal.name, lexeme.span.to_string(), text);
            }
            Err(error) => {
                println!("  error: {}", error);
                break;
            }
        }
    }

    println!("\n=== Emitted routines ===");
    match generate_source(&graph, &CodegenConfig::default()) {
        Ok((code, _)) => println!("{}", code),
        Err(error) => eprintln!("codegen failed: {}", error),
    }
}
