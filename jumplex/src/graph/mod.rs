//! Multi-pattern automaton construction.
//!
//! All terminals share one graph. Pushing a terminal threads its HIR into
//! the arena back-to-front (each construct receives the node to continue at
//! on success and an optional fallback for its first mismatch), and
//! finalisation folds every per-terminal entry point into a single canonical
//! root via pairwise merging.
//!
//! Merging is memoised per node pair. A merge that meets a reserved-but-
//! unfilled slot (a forward reference, created by loops) cannot resolve yet:
//! it reserves a result slot, parks a pending record keyed on the empty
//! side, and the fill of that slot later replays the merge. Cycles are fine
//! because edges are indices and the memo closes the loop.

mod node;
mod shake;

use std::collections::HashMap;

use serde::Serialize;

pub use node::{Branch, Node, NodeId, Seq, SeqMiss, TerminalId};

use crate::error::GraphError;
use crate::hir::Hir;
use crate::range::ScalarRange;

// ══════════════════════════════════════════════════════════════════════════════
// Terminals
// ══════════════════════════════════════════════════════════════════════════════

/// What the lexer does when a terminal's leaf is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalKind {
    /// Record the plain token variant.
    Standalone,
    /// Drop the matched span silently.
    Skip,
    /// Record the variant built by a fill callback from the matched slice.
    /// The string is the callback's source text, spliced verbatim.
    FillCallback(String),
    /// Record whatever a create callback returns (a variant, or a skip
    /// sentinel). The string is the callback's source text.
    CreateCallback(String),
}

/// One user-declared token definition, lowered and ready to push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub name: String,
    pub kind: TerminalKind,
    pub hir: Hir,
    pub priority: u32,
}

impl Terminal {
    /// A terminal with the default (HIR-derived) priority.
    pub fn new(name: impl Into<String>, kind: TerminalKind, hir: Hir) -> Terminal {
        let priority = hir.priority();
        Terminal {
            name: name.into(),
            kind,
            hir,
            priority,
        }
    }

    /// Override the tie-break priority.
    pub fn with_priority(mut self, priority: u32) -> Terminal {
        self.priority = priority;
        self
    }
}

/// Arena sizes after construction, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub terminals: usize,
    pub nodes: usize,
    pub branch_nodes: usize,
    pub seq_nodes: usize,
    pub leaf_nodes: usize,
}

impl GraphStats {
    pub fn of(graph: &Graph) -> GraphStats {
        let mut stats = GraphStats {
            terminals: graph.terminals.len(),
            nodes: 0,
            branch_nodes: 0,
            seq_nodes: 0,
            leaf_nodes: 0,
        };
        for node in graph.nodes.iter().flatten() {
            stats.nodes += 1;
            match node {
                Node::Branch(_) => stats.branch_nodes += 1,
                Node::Seq(_) => stats.seq_nodes += 1,
                Node::Leaf(_) => stats.leaf_nodes += 1,
            }
        }
        stats
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Graph
// ══════════════════════════════════════════════════════════════════════════════

/// A merge parked on a slot that was empty when the merge was requested.
#[derive(Debug, Clone, Copy)]
struct PendingMerge {
    /// The empty side; the merge replays when this slot fills.
    waiting: NodeId,
    /// The side that was already filled.
    has: NodeId,
    /// The reserved slot the replayed merge fills.
    into: NodeId,
}

/// The construction workspace: node arena, terminal table, merge memo,
/// pending queue, and per-terminal entry points.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    terminals: Vec<Terminal>,
    merges: HashMap<(NodeId, NodeId), NodeId>,
    pending: Vec<PendingMerge>,
    roots: Vec<NodeId>,
    root: Option<NodeId>,
}

impl Graph {
    /// An empty graph. Slot 0 is reserved and never used, so a `NodeId` of
    /// zero can never alias a real node during construction.
    pub fn new() -> Graph {
        Graph {
            nodes: vec![None],
            ..Graph::default()
        }
    }

    /// The arena, including unfilled slots.
    pub fn nodes(&self) -> &[Option<Node>] {
        &self.nodes
    }

    /// The node stored at `id`, if the slot is filled.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize).and_then(|slot| slot.as_ref())
    }

    /// The terminal table, in insertion order.
    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// The canonical start node, once `make_root` has run.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.get(id).ok_or(GraphError::EmptyMerging)
    }

    /// Allocate an empty slot to be filled exactly once later.
    fn reserve(&mut self) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(None);
        id
    }

    /// Fill a reserved slot, then replay any merges parked on it, most
    /// recently parked first.
    fn fill(&mut self, id: NodeId, node: Node) -> Result<(), GraphError> {
        let slot = self
            .nodes
            .get_mut(id as usize)
            .ok_or(GraphError::OverwriteNonReserved { id })?;
        if slot.is_some() {
            return Err(GraphError::OverwriteNonReserved { id });
        }
        *slot = Some(node);

        let mut ready: Vec<PendingMerge> = Vec::new();
        let mut index = self.pending.len();
        while index > 0 {
            index -= 1;
            if self.pending[index].waiting == id {
                ready.push(self.pending.remove(index));
            }
        }
        for parked in ready {
            self.merge_known(parked.has, parked.waiting, parked.into)?;
        }
        Ok(())
    }

    fn insert(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = self.reserve();
        self.fill(id, node)?;
        Ok(id)
    }

    /// Fill `reserved` with `node`, or allocate a fresh slot for it.
    fn install(&mut self, node: Node, reserved: Option<NodeId>) -> Result<NodeId, GraphError> {
        match reserved {
            Some(id) => {
                self.fill(id, node)?;
                Ok(id)
            }
            None => self.insert(node),
        }
    }

    // ── terminal ingestion ─────────────────────────────────────────────────

    /// Append a terminal and thread its HIR into the graph. Returns the
    /// terminal's entry node.
    pub fn push_terminal(&mut self, terminal: Terminal) -> Result<NodeId, GraphError> {
        if self
            .terminals
            .iter()
            .any(|t| t.name == terminal.name && t.hir == terminal.hir)
        {
            return Err(GraphError::DuplicatedInputs {
                name: terminal.name,
            });
        }
        let end = self.terminals.len() as TerminalId;
        let hir = terminal.hir.clone();
        self.terminals.push(terminal);
        let leaf = self.insert(Node::Leaf(end))?;
        let entry = self.push_hir(&hir, leaf, None, None)?;
        self.roots.push(entry);
        Ok(entry)
    }

    /// Thread one HIR construct into the arena.
    ///
    /// `succ` is the node to continue at after the construct matches;
    /// `miss` is where a first-position mismatch falls back to; `reserved`
    /// is a pre-allocated slot the construct's entry must land in (used by
    /// loops so the body can point back at its own head).
    pub fn push_hir(
        &mut self,
        hir: &Hir,
        succ: NodeId,
        miss: Option<NodeId>,
        reserved: Option<NodeId>,
    ) -> Result<NodeId, GraphError> {
        match hir {
            Hir::Empty => match reserved {
                // A reserved slot must still be filled; an empty body
                // degenerates to an immediate fallback to the successor.
                Some(id) => {
                    self.fill(id, Node::Branch(Branch::miss_only(succ)))?;
                    Ok(id)
                }
                None => Ok(succ),
            },
            Hir::Literal(run) => {
                let node = Node::Seq(Seq {
                    run: run.clone(),
                    then: succ,
                    miss: miss.map(SeqMiss::First),
                });
                self.install(node, reserved)
            }
            Hir::Class(ranges) => {
                let node = Node::Branch(Branch {
                    branches: ranges.iter().map(|range| (*range, succ)).collect(),
                    miss,
                });
                self.install(node, reserved)
            }
            Hir::Loop(inner) => {
                let exit = match miss {
                    Some(m) => self.merge(succ, m)?,
                    None => succ,
                };
                let head = match reserved {
                    Some(id) => id,
                    None => self.reserve(),
                };
                // The body's success path re-enters the head, so the loop
                // consumes greedily-by-iteration and leaves on first miss.
                self.push_hir(inner, head, Some(exit), Some(head))
            }
            Hir::Maybe(inner) => {
                let exit = match miss {
                    Some(m) => self.merge(succ, m)?,
                    None => succ,
                };
                self.push_hir(inner, succ, Some(exit), reserved)
            }
            Hir::Concat(parts) => {
                let parts = merge_adjacent_literals(parts);
                let mut current = succ;
                for (index, part) in parts.iter().enumerate().rev() {
                    current = if index == 0 {
                        self.push_hir(part, current, miss, reserved)?
                    } else {
                        self.push_hir(part, current, None, None)?
                    };
                }
                Ok(current)
            }
            Hir::Alternation(parts) => {
                let mut acc = Branch {
                    branches: Vec::new(),
                    miss,
                };
                for part in parts {
                    let entry = self.push_hir(part, succ, None, None)?;
                    let content = match self.get(entry) {
                        Some(_) => self.project(entry)?,
                        // An empty alternative whose successor is still a
                        // reserved loop head: defer through the miss edge.
                        None => Branch::miss_only(entry),
                    };
                    acc = self.merge_branches(acc, content)?;
                }
                self.install(Node::Branch(acc), reserved)
            }
        }
    }

    /// Fold every terminal entry point into the canonical start node.
    pub fn make_root(&mut self) -> Result<NodeId, GraphError> {
        if self.roots.is_empty() {
            return Err(GraphError::EmptyRoot);
        }
        let mut root = self.insert(Node::Branch(Branch::default()))?;
        for entry in self.roots.clone() {
            root = self.merge(root, entry)?;
        }
        self.merge_all_pendings()?;
        self.root = Some(root);
        Ok(root)
    }

    /// Re-issue dense ids over the reachable sub-graph. See `shake.rs`.
    pub fn shake(&mut self) -> Result<(), GraphError> {
        shake::shake(self)
    }

    // ── merge algebra ──────────────────────────────────────────────────────

    fn merge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        (a.min(b), a.max(b))
    }

    fn record_merge(&mut self, a: NodeId, b: NodeId, into: NodeId) {
        // Merging either operand with the result is idempotent, so the memo
        // closes cycles created by forward references.
        self.merges.insert(Self::merge_key(a, b), into);
        self.merges.insert(Self::merge_key(a, into), into);
        self.merges.insert(Self::merge_key(b, into), into);
    }

    /// Merge two nodes into one that accepts the union of both languages.
    pub fn merge(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        if a == b {
            return Ok(a);
        }
        let key = Self::merge_key(a, b);
        if let Some(&hit) = self.merges.get(&key) {
            return Ok(hit);
        }
        let filled_a = self.get(a).is_some();
        let filled_b = self.get(b).is_some();
        match (filled_a, filled_b) {
            (false, false) => Err(GraphError::EmptyMerging),
            (true, true) => {
                // A branch with no arms and no fallback matches nothing;
                // folding it is an identity (the root fold starts on one).
                if matches!(self.get(a), Some(Node::Branch(branch)) if branch.is_identity()) {
                    self.merges.insert(key, b);
                    return Ok(b);
                }
                if matches!(self.get(b), Some(Node::Branch(branch)) if branch.is_identity()) {
                    self.merges.insert(key, a);
                    return Ok(a);
                }
                if let (Some(&Node::Leaf(first)), Some(&Node::Leaf(second))) =
                    (self.get(a), self.get(b))
                {
                    return self.merge_leaves(a, first, b, second, key);
                }
                let into = self.reserve();
                self.record_merge(a, b, into);
                self.merge_known(a, b, into)?;
                Ok(into)
            }
            _ => {
                // Forward reference: one side is a reserved slot. Park the
                // merge; the fill of that slot replays it.
                let (waiting, has) = if filled_a { (b, a) } else { (a, b) };
                let into = self.reserve();
                self.record_merge(a, b, into);
                self.pending.push(PendingMerge { waiting, has, into });
                Ok(into)
            }
        }
    }

    /// Two accepting leaves compete on priority; a strict winner absorbs
    /// the other, a tie is a design conflict the author must resolve.
    fn merge_leaves(
        &mut self,
        a: NodeId,
        first: TerminalId,
        b: NodeId,
        second: TerminalId,
        key: (NodeId, NodeId),
    ) -> Result<NodeId, GraphError> {
        let pa = self.terminals[first as usize].priority;
        let pb = self.terminals[second as usize].priority;
        if pa > pb {
            self.merges.insert(key, a);
            Ok(a)
        } else if pb > pa {
            self.merges.insert(key, b);
            Ok(b)
        } else {
            Err(GraphError::IdenticalPriority {
                first: self.terminals[first as usize].name.clone(),
                second: self.terminals[second as usize].name.clone(),
                priority: pa,
            })
        }
    }

    /// Merge two filled nodes into the reserved slot `into`.
    fn merge_known(&mut self, a: NodeId, b: NodeId, into: NodeId) -> Result<(), GraphError> {
        let node_a = self.node(a)?.clone();
        let node_b = self.node(b)?.clone();
        let specialised = match (&node_a, &node_b) {
            (Node::Leaf(_), Node::Leaf(_)) => return Err(GraphError::MergingLeaves),
            (Node::Seq(sa), Node::Seq(sb)) => self.merge_seq_seq(sa, sb)?,
            (Node::Seq(seq), Node::Branch(branch)) => self.merge_seq_branch(seq, b, branch)?,
            (Node::Branch(branch), Node::Seq(seq)) => self.merge_seq_branch(seq, a, branch)?,
            (Node::Seq(seq), Node::Leaf(_)) => merge_seq_leaf(seq, b),
            (Node::Leaf(_), Node::Seq(seq)) => merge_seq_leaf(seq, a),
            _ => None,
        };
        let node = match specialised {
            Some(node) => node,
            None => {
                let left = self.project(a)?;
                let right = self.project(b)?;
                Node::Branch(self.merge_branches(left, right)?)
            }
        };
        self.fill(into, node)
    }

    /// Shared-prefix merge of two runs. Applies when the prefix is non-empty
    /// and the fallback policies are compatible (at most one side has one,
    /// or both agree).
    fn merge_seq_seq(&mut self, sa: &Seq, sb: &Seq) -> Result<Option<Node>, GraphError> {
        let prefix = sa
            .run
            .iter()
            .zip(&sb.run)
            .take_while(|(x, y)| x == y)
            .count();
        if prefix == 0 {
            return Ok(None);
        }
        let miss = match (sa.miss, sb.miss) {
            (Some(x), Some(y)) => {
                if x == y {
                    Some(x)
                } else {
                    return Ok(None);
                }
            }
            (None, m) | (m, None) => m,
        };
        let tail_a = self.seq_tail(sa, prefix)?;
        let tail_b = self.seq_tail(sb, prefix)?;
        let then = self.merge(tail_a, tail_b)?;
        Ok(Some(Node::Seq(Seq {
            run: sa.run[..prefix].to_vec(),
            then,
            miss,
        })))
    }

    /// Merge a miss-less run into a branch it partially loops through.
    ///
    /// Counts the longest prefix whose scalars each resolve back to the
    /// branch itself. This is a proxy for a self-looping branch: sound when
    /// those arms do loop, pessimistic otherwise, and deliberately kept so
    /// established graphs do not change shape.
    fn merge_seq_branch(
        &mut self,
        seq: &Seq,
        branch_id: NodeId,
        branch: &Branch,
    ) -> Result<Option<Node>, GraphError> {
        if seq.miss.is_some() {
            return Ok(None);
        }
        let looped = seq
            .run
            .iter()
            .take_while(|&&scalar| branch.lookup(scalar) == Some(branch_id))
            .count();
        if looped == 0 {
            return Ok(None);
        }
        let tail = self.seq_tail(seq, looped)?;
        let then = self.merge(tail, branch_id)?;
        Ok(Some(Node::Seq(Seq {
            run: seq.run[..looped].to_vec(),
            then,
            miss: Some(SeqMiss::Anytime(branch_id)),
        })))
    }

    /// The node continuing a run after its first `consumed` scalars.
    ///
    /// An `Anytime` fallback still covers the remainder; a `First` fallback
    /// applied only to position zero and is dropped.
    fn seq_tail(&mut self, seq: &Seq, consumed: usize) -> Result<NodeId, GraphError> {
        if consumed >= seq.run.len() {
            return Ok(seq.then);
        }
        let miss = match seq.miss {
            Some(SeqMiss::Anytime(target)) => Some(SeqMiss::Anytime(target)),
            _ => None,
        };
        self.insert(Node::Seq(Seq {
            run: seq.run[consumed..].to_vec(),
            then: seq.then,
            miss,
        }))
    }

    /// Project any node to branch form for the generic table merge.
    fn project(&mut self, id: NodeId) -> Result<Branch, GraphError> {
        match self.node(id)?.clone() {
            Node::Branch(branch) => Ok(branch),
            Node::Leaf(_) => Ok(Branch::miss_only(id)),
            Node::Seq(seq) => {
                let first = *seq.run.first().ok_or(GraphError::MergingRangeError)?;
                let rest = self.seq_tail(&seq, 1)?;
                Ok(Branch {
                    branches: vec![(ScalarRange::single(first), rest)],
                    miss: seq.miss.map(|m| m.target()),
                })
            }
        }
    }

    /// Merge two branch tables into a canonical pairwise-disjoint table.
    fn merge_branches(&mut self, left: Branch, right: Branch) -> Result<Branch, GraphError> {
        let miss = match (left.miss, right.miss) {
            (Some(a), Some(b)) if a != b => Some(self.merge(a, b)?),
            (a, b) => a.or(b),
        };
        let mut combined = left.branches;
        for (range, target) in right.branches {
            match combined.iter_mut().find(|(key, _)| *key == range) {
                Some(entry) => {
                    if entry.1 != target {
                        entry.1 = self.merge(entry.1, target)?;
                    }
                }
                None => combined.push((range, target)),
            }
        }
        let branches = self.split_ranges(combined)?;
        Ok(Branch { branches, miss })
    }

    /// Split overlapping keys until every scalar belongs to exactly one.
    ///
    /// Keys are processed smallest-first off a sorted stack; an overlap
    /// `[a,b]` / `[c,d]` (`a ≤ c ≤ b`) peels the exclusive head `[a,c-1]`,
    /// merges the shared middle, and re-queues middle and tail so they can
    /// interact with later keys.
    fn split_ranges(
        &mut self,
        mut items: Vec<(ScalarRange, NodeId)>,
    ) -> Result<Vec<(ScalarRange, NodeId)>, GraphError> {
        items.sort_by_key(|(range, _)| (range.lo, range.hi));
        items.reverse(); // stack: pop() yields the smallest key
        let mut out: Vec<(ScalarRange, NodeId)> = Vec::with_capacity(items.len());

        while let Some((range, target)) = items.pop() {
            let Some(&(next, next_target)) = items.last() else {
                out.push((range, target));
                break;
            };
            if next.lo > range.hi {
                out.push((range, target));
                continue;
            }
            items.pop();
            let (a, b) = (range.lo, range.hi);
            let (c, d) = (next.lo, next.hi);
            if c < a {
                return Err(GraphError::MergingRangeError);
            }
            if a < c {
                out.push((ScalarRange { lo: a, hi: c - 1 }, target));
            }
            let mid_hi = b.min(d);
            let merged = if target == next_target {
                target
            } else {
                self.merge(target, next_target)?
            };
            push_sorted(&mut items, (ScalarRange { lo: c, hi: mid_hi }, merged));
            if mid_hi < b.max(d) {
                let owner = if b > d { target } else { next_target };
                push_sorted(
                    &mut items,
                    (
                        ScalarRange {
                            lo: mid_hi + 1,
                            hi: b.max(d),
                        },
                        owner,
                    ),
                );
            }
        }
        Ok(out)
    }

    /// Replay every pending merge whose empty side has since been filled.
    ///
    /// Fills drain their own waiters eagerly, so this residual pass is the
    /// closure guarantee before shaking: a record that still cannot resolve
    /// here means a reserved slot was never filled.
    pub fn merge_all_pendings(&mut self) -> Result<(), GraphError> {
        loop {
            let position = self
                .pending
                .iter()
                .rposition(|parked| self.get(parked.waiting).is_some());
            let Some(position) = position else { break };
            let parked = self.pending.remove(position);
            self.merge_known(parked.has, parked.waiting, parked.into)?;
        }
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(GraphError::EmptyMerging)
        }
    }
}

/// A miss-less run overlapped by an accept: the leaf becomes the run's
/// first-mismatch fallback, keeping the Seq shape intact.
fn merge_seq_leaf(seq: &Seq, leaf: NodeId) -> Option<Node> {
    if seq.miss.is_some() {
        return None;
    }
    Some(Node::Seq(Seq {
        run: seq.run.clone(),
        then: seq.then,
        miss: Some(SeqMiss::First(leaf)),
    }))
}

/// Insert into a stack sorted descending by `(lo, hi)` (so the smallest key
/// stays on top).
fn push_sorted(items: &mut Vec<(ScalarRange, NodeId)>, item: (ScalarRange, NodeId)) {
    let key = (item.0.lo, item.0.hi);
    let index = items.partition_point(|(range, _)| (range.lo, range.hi) > key);
    items.insert(index, item);
}

/// Collapse runs of adjacent literal children into single merged literals,
/// so `Concat([Lit "a", Lit "b", Loop])` threads one two-scalar run.
fn merge_adjacent_literals(parts: &[Hir]) -> Vec<Hir> {
    let mut out: Vec<Hir> = Vec::with_capacity(parts.len());
    for part in parts {
        match (out.last_mut(), part) {
            (Some(Hir::Literal(run)), Hir::Literal(next)) => run.extend(next),
            _ => out.push(part.clone()),
        }
    }
    out
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
