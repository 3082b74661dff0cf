//! Shape tests over finalised graphs: node kinds, shared prefixes, loop
//! wiring, and alphabet partitions.

use jumplex_runtime::Scalar;

use crate::graph::{Graph, Node, SeqMiss, Terminal, TerminalKind};
use crate::hir::Hir;
use crate::range::ScalarRange;

fn token(name: &str, text: &str) -> Terminal {
    Terminal::new(name, TerminalKind::Standalone, Hir::from_token(text))
}

fn regex(name: &str, pattern: &str) -> Terminal {
    Terminal::new(
        name,
        TerminalKind::Standalone,
        Hir::from_regex(pattern).expect("test pattern"),
    )
}

fn finalised(terminals: Vec<Terminal>) -> Graph {
    let mut graph = Graph::new();
    for terminal in terminals {
        graph.push_terminal(terminal).expect("push");
    }
    graph.make_root().expect("root");
    graph.shake().expect("shake");
    graph
}

fn r(lo: Scalar, hi: Scalar) -> ScalarRange {
    ScalarRange { lo, hi }
}

#[test]
fn test_single_pattern_is_run_then_leaf() {
    let graph = finalised(vec![token("Ab", "ab")]);
    assert_eq!(graph.root_id(), Some(0));
    assert_eq!(graph.nodes().len(), 2);
    let Some(Node::Seq(seq)) = graph.get(0) else {
        panic!("root should be the full run");
    };
    assert_eq!(seq.run, vec![97, 98]);
    assert_eq!(seq.then, 1);
    assert_eq!(seq.miss, None);
    assert_eq!(graph.get(1), Some(&Node::Leaf(0)));
}

#[test]
fn test_loop_suffix_shares_run_prefix() {
    // "ab" and "ab(b)+?": the run "ab" is shared, the second terminal's
    // trailing loop hangs off the shared tail.
    let graph = finalised(vec![token("Ab", "ab"), regex("AbBs", "ab(b)+?")]);

    let root = graph.root_id().expect("root");
    let Some(Node::Seq(prefix)) = graph.get(root) else {
        panic!("root should be the shared run");
    };
    assert_eq!(prefix.run, vec![97, 98]);

    // The node after "ab" must try "b" and fall back to accepting "ab".
    let Some(Node::Seq(tail)) = graph.get(prefix.then) else {
        panic!("tail should try the loop scalar");
    };
    assert_eq!(tail.run, vec![98]);
    let Some(SeqMiss::First(fallback)) = tail.miss else {
        panic!("tail must fall back to the short accept");
    };
    assert_eq!(graph.get(fallback), Some(&Node::Leaf(0)));

    // The loop: after "abb", more b's re-enter, anything else accepts.
    let Some(Node::Seq(looped)) = graph.get(tail.then) else {
        panic!("loop body should be a run");
    };
    assert_eq!(looped.run, vec![98]);
    assert_eq!(looped.then, tail.then, "loop must re-enter its own head");
    let Some(SeqMiss::First(accept)) = looped.miss else {
        panic!("loop exit must accept the long terminal");
    };
    assert_eq!(graph.get(accept), Some(&Node::Leaf(1)));
}

#[test]
fn test_negated_class_partitions_alphabet() {
    // "ab" and "[^bc]+?": after the first scalar the automaton must hold a
    // branch partitioning the alphabet exactly at the class's boundary
    // scalars: everything up to 'a', 'b' alone, and everything past 'c'.
    let graph = finalised(vec![token("Ab", "ab"), regex("NotBc", "[^bc]+?")]);

    let expected = vec![r(0, 97), r(98, 98), r(100, Scalar::MAX)];
    let found = graph.nodes().iter().flatten().any(|node| match node {
        Node::Branch(branch) => {
            branch
                .branches
                .iter()
                .map(|(range, _)| *range)
                .collect::<Vec<_>>()
                == expected
        }
        _ => false,
    });
    assert!(
        found,
        "expected a branch over exactly {:?} in {:?}",
        expected,
        graph.nodes()
    );
}

#[test]
fn test_root_branch_covers_only_live_first_scalars() {
    // Same set as above: the root must dispatch 'b' nowhere ('b' is only
    // reachable inside "ab"), and must route 'a' to the merged state.
    let graph = finalised(vec![token("Ab", "ab"), regex("NotBc", "[^bc]+?")]);
    let root = graph.root_id().expect("root");
    let Some(Node::Branch(branch)) = graph.get(root) else {
        panic!("root should fork");
    };
    assert!(branch.lookup(97).is_some(), "'a' starts both terminals");
    assert_eq!(branch.lookup(98), None, "'b' starts neither terminal");
    assert_eq!(branch.lookup(99), None, "'c' starts neither terminal");
    assert!(branch.lookup(100).is_some());
    assert!(branch.lookup(0).is_some());
}

#[test]
fn test_every_slot_filled_after_shake() {
    let graph = finalised(vec![
        token("Ab", "ab"),
        regex("Digits", "[0-9]+?"),
        regex("Word", "[a-z]+?"),
    ]);
    assert!(graph.nodes().iter().all(|slot| slot.is_some()));
    let len = graph.nodes().len() as u32;
    assert!(graph.root_id().expect("root") < len);
}

#[test]
fn test_alternation_folds_into_one_branch() {
    let graph = finalised(vec![regex("Keyword", "if|in|of")]);
    let root = graph.root_id().expect("root");
    let Some(Node::Branch(branch)) = graph.get(root) else {
        panic!("alternation entry should be a branch");
    };
    // 'i' leads somewhere shared by "if"/"in", 'o' to "of".
    assert!(branch.lookup(105).is_some());
    assert!(branch.lookup(111).is_some());
    assert_eq!(branch.lookup(102), None);
}

#[test]
fn test_maybe_merges_exit_paths() {
    // "ab?c": after 'a', the optional 'b' is tried and a first-position
    // mismatch falls through to the 'c' run both paths continue at.
    let graph = finalised(vec![regex("AbC", "ab?c")]);
    let root = graph.root_id().expect("root");
    let Some(Node::Seq(head)) = graph.get(root) else {
        panic!("entry should consume 'a'");
    };
    assert_eq!(head.run, vec![97]);
    let Some(Node::Seq(optional)) = graph.get(head.then) else {
        panic!("optional scalar should be tried as a run");
    };
    assert_eq!(optional.run, vec![98]);
    let Some(SeqMiss::First(without_b)) = optional.miss else {
        panic!("skipping the optional must be a first-position fallback");
    };
    assert_eq!(optional.then, without_b, "both paths continue at 'c'");
    let Some(Node::Seq(tail)) = graph.get(without_b) else {
        panic!("continuation should consume 'c'");
    };
    assert_eq!(tail.run, vec![99]);
}
