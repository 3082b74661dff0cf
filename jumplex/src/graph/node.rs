//! Graph vertices.
//!
//! Three closed variants cover every state of the automaton: a `Branch`
//! dispatches on disjoint scalar ranges, a `Seq` consumes a fixed run in one
//! step, and a `Leaf` accepts a terminal. Edges are arena indices, so loops
//! and forward references cost nothing at the ownership layer.

use jumplex_runtime::Scalar;

use crate::range::ScalarRange;

/// Dense arena index of a node. Slot 0 stays reserved during construction
/// and ids are re-issued by the shake pass.
pub type NodeId = u32;

/// Index into the graph's terminal table.
pub type TerminalId = u32;

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Branch(Branch),
    Seq(Seq),
    Leaf(TerminalId),
}

/// Dispatch on disjoint scalar ranges with an optional fallback.
///
/// Invariant: the key ranges are pairwise disjoint and sorted ascending, so
/// every scalar resolves to at most one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub branches: Vec<(ScalarRange, NodeId)>,
    pub miss: Option<NodeId>,
}

impl Branch {
    /// A branch with no arms that falls through to `miss`.
    pub fn miss_only(miss: NodeId) -> Branch {
        Branch {
            branches: Vec::new(),
            miss: Some(miss),
        }
    }

    /// The target a scalar resolves to, if any arm covers it.
    pub fn lookup(&self, scalar: Scalar) -> Option<NodeId> {
        self.branches
            .iter()
            .find(|(range, _)| range.contains(scalar))
            .map(|(_, target)| *target)
    }

    /// Whether this branch has no arms and no fallback. Such a node matches
    /// nothing and is an identity element of the merge fold.
    pub fn is_identity(&self) -> bool {
        self.branches.is_empty() && self.miss.is_none()
    }
}

/// Consume a fixed run of scalars, then continue at `then`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq {
    pub run: Vec<Scalar>,
    pub then: NodeId,
    pub miss: Option<SeqMiss>,
}

/// Fallback policy of a `Seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqMiss {
    /// Taken only when the very first scalar of the run mismatches; a
    /// mismatch deeper in the run is a dead end.
    First(NodeId),
    /// Taken on a mismatch anywhere in the run.
    Anytime(NodeId),
}

impl SeqMiss {
    /// The fallback target, whatever the policy.
    pub fn target(&self) -> NodeId {
        match self {
            SeqMiss::First(id) | SeqMiss::Anytime(id) => *id,
        }
    }
}
