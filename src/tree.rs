use crate::pslg::Edge;

/// Payload of a decomposition tree node: the boundary the node splits the plane along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeData {
    /// Split along the horizontal line through a vertex; `left` is below, `right` is above.
    Vertex(usize),
    /// Split along a non-horizontal edge; `left` and `right` are the respective sides.
    Edge(Edge),
}

/// A node of the decomposition tree.
///
/// Children are exclusively owned by their parent, and every maximal root-to-`None` path
/// corresponds to exactly one trapezoid of the decomposition. The `weight` counts the vertex
/// nodes of the subtree; it steers the balancing during construction and is meaningless
/// afterwards.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub(crate) weight: usize,
}

/// The decomposition tree, backed by an arena.
///
/// Trees of this kind are generally implemented using pointers, but that is not very
/// practical or idiomatic in Rust, so here the nodes live in a simple [`Vec`] and refer to
/// each other by [`usize`] index. Nodes are never removed; balancing only relinks them.
#[derive(Debug, Default)]
pub(crate) struct Tree {
    arena: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Tree { arena: Vec::new() }
    }

    /// Adds an unlinked node to the arena. Returns the index of the node.
    pub(crate) fn add(&mut self, data: NodeData) -> usize {
        let idx = self.arena.len();
        let weight = match data {
            NodeData::Vertex(_) => 1,
            NodeData::Edge(_) => 0,
        };
        self.arena.push(Node {
            data,
            left: None,
            right: None,
            weight,
        });
        idx
    }

    pub(crate) fn get(&self, idx: usize) -> &Node {
        &self.arena[idx]
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.arena.iter()
    }

    /// Number of nodes on the longest path from `root` down to a `None` slot.
    pub(crate) fn depth(&self, root: Option<usize>) -> usize {
        root.map_or(0, |idx| {
            let node = &self.arena[idx];
            1 + self.depth(node.left).max(self.depth(node.right))
        })
    }

    fn weight_of(&self, child: Option<usize>) -> usize {
        child.map_or(0, |idx| self.arena[idx].weight)
    }

    /// Relinks both children of `idx` and recomputes its weight.
    ///
    /// Only vertex nodes count towards the weight; an edge node weighs whatever its subtree
    /// weighs, so a childless edge node is weightless.
    pub(crate) fn set_children(&mut self, idx: usize, left: Option<usize>, right: Option<usize>) {
        let unit = match self.arena[idx].data {
            NodeData::Vertex(_) => 1,
            NodeData::Edge(_) => 0,
        };
        let weight = self.weight_of(left) + self.weight_of(right) + unit;
        let node = &mut self.arena[idx];
        node.left = left;
        node.right = right;
        node.weight = weight;
    }

    /// Rebuilds the ordered `entries` into a single subtree of logarithmic depth, preserving
    /// the input order as the in-order traversal of the result.
    ///
    /// The entries alternate between subtrees produced by deeper slabs (weight ≥ 1) and
    /// childless edge nodes awaiting composition (weight 0). The list is split at its
    /// weighted median: the two edge nodes flanking the median entry become the upper levels
    /// of the subtree and the remainders recurse. With no weight to steer by, the split
    /// degrades to the structural middle of the list.
    pub(crate) fn balance(&mut self, entries: &[usize]) -> Option<usize> {
        let total: usize = entries.iter().map(|&idx| self.arena[idx].weight).sum();
        if total == 0 {
            return self.balance_midpoint(entries);
        }

        // First index at which the running weight reaches half the total.
        let mut acc = 0;
        let mut r = 0;
        for (i, &idx) in entries.iter().enumerate() {
            acc += self.arena[idx].weight;
            if 2 * acc >= total {
                r = i;
                break;
            }
        }

        let before = if r > 1 {
            self.balance(&entries[..r - 1])
        } else {
            None
        };
        let after = if r + 2 < entries.len() {
            self.balance(&entries[r + 2..])
        } else {
            None
        };
        let pivot = entries[r];
        match (r.checked_sub(1).map(|i| entries[i]), entries.get(r + 1)) {
            (None, None) => Some(pivot),
            (None, Some(&upper)) => {
                self.set_children(upper, Some(pivot), after);
                Some(upper)
            }
            (Some(lower), None) => {
                self.set_children(lower, before, Some(pivot));
                Some(lower)
            }
            (Some(lower), Some(&upper)) => {
                self.set_children(upper, Some(pivot), after);
                self.set_children(lower, before, Some(upper));
                Some(lower)
            }
        }
    }

    /// Plain structural balancing: the middle entry becomes the root, the halves recurse.
    fn balance_midpoint(&mut self, entries: &[usize]) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        let mid = entries.len() / 2;
        let left = self.balance_midpoint(&entries[..mid]);
        let right = self.balance_midpoint(&entries[mid + 1..]);
        self.set_children(entries[mid], left, right);
        Some(entries[mid])
    }
}
