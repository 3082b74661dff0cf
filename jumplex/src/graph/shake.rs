//! Reachability shake and arena compaction.
//!
//! Construction leaves garbage behind: slot 0, entries absorbed by merges,
//! and remainder runs allocated while splitting. A depth-first mark from the
//! root finds the live sub-graph; ids are then re-issued densely, counting
//! surviving slots from the top of the arena down, and every node is rebuilt
//! with remapped edges. Terminal ids are untouched.

use super::{Branch, Graph, Node, NodeId, Seq, SeqMiss};
use crate::error::GraphError;

pub(super) fn shake(graph: &mut Graph) -> Result<(), GraphError> {
    let root = graph.root.ok_or(GraphError::EmptyRoot)?;
    let len = graph.nodes.len();

    // Mark phase: depth-first over success, branch, and miss edges.
    let mut marked = vec![false; len];
    let mut stack: Vec<NodeId> = vec![root];
    while let Some(id) = stack.pop() {
        let index = id as usize;
        if index >= len {
            return Err(GraphError::ShakingError);
        }
        if marked[index] {
            continue;
        }
        marked[index] = true;
        match graph.nodes[index].as_ref().ok_or(GraphError::ShakingError)? {
            Node::Leaf(_) => {}
            Node::Seq(seq) => {
                stack.push(seq.then);
                if let Some(miss) = &seq.miss {
                    stack.push(miss.target());
                }
            }
            Node::Branch(branch) => {
                stack.extend(branch.branches.iter().map(|(_, target)| *target));
                if let Some(miss) = branch.miss {
                    stack.push(miss);
                }
            }
        }
    }

    // Renumber phase: count marks from the highest slot down. The final
    // merge result sits at the top of the arena, so the root lands at 0.
    let mut map: Vec<Option<NodeId>> = vec![None; len];
    let mut next: NodeId = 0;
    for old in (0..len).rev() {
        if marked[old] {
            map[old] = Some(next);
            next += 1;
        }
    }
    let remap = |id: NodeId| -> Result<NodeId, GraphError> {
        map.get(id as usize)
            .copied()
            .flatten()
            .ok_or(GraphError::ShakingError)
    };

    // Rebuild phase: move every survivor into its new slot with remapped
    // edges. Branch key order is untouched, so tables stay sorted.
    let mut compacted: Vec<Option<Node>> = (0..next).map(|_| None).collect();
    for old in 0..len {
        let Some(new_id) = map[old] else { continue };
        let node = graph.nodes[old].take().ok_or(GraphError::ShakingError)?;
        let rebuilt = match node {
            Node::Leaf(terminal) => Node::Leaf(terminal),
            Node::Seq(seq) => Node::Seq(Seq {
                run: seq.run,
                then: remap(seq.then)?,
                miss: match seq.miss {
                    None => None,
                    Some(SeqMiss::First(target)) => Some(SeqMiss::First(remap(target)?)),
                    Some(SeqMiss::Anytime(target)) => Some(SeqMiss::Anytime(remap(target)?)),
                },
            }),
            Node::Branch(branch) => Node::Branch(Branch {
                branches: branch
                    .branches
                    .into_iter()
                    .map(|(range, target)| Ok((range, remap(target)?)))
                    .collect::<Result<Vec<_>, GraphError>>()?,
                miss: branch.miss.map(remap).transpose()?,
            }),
        };
        compacted[new_id as usize] = Some(rebuilt);
    }

    graph.root = Some(remap(root)?);
    graph.nodes = compacted;
    // Construction bookkeeping holds stale ids from here on.
    graph.merges.clear();
    graph.pending.clear();
    graph.roots.clear();
    Ok(())
}
