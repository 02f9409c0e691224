use std::cmp::Ordering;

use anyhow::{bail, Result};
use itertools::Itertools;

use crate::geometry::x_at;

/// An edge of a [`Pslg`], canonicalized so that `p` is the endpoint with the smaller
/// y-coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Index of the lower endpoint.
    pub p: usize,
    /// Index of the upper endpoint.
    pub q: usize,
}

/// A planar straight-line graph: indexed vertices plus non-crossing straight edges.
///
/// Construction validates the general-position assumptions the slab decomposition relies on
/// (see [`Pslg::new`]) and stores the edges sorted left-to-right, so that the decomposition
/// discovers the trapezoids of every slab in x-order. Vertex indices are assigned at input
/// time and never change.
///
/// Whether the edges actually cross is *not* checked; that is a precondition on the input.
#[derive(Clone, Debug)]
pub struct Pslg {
    vertices: Vec<[f64; 2]>,
    edges: Vec<Edge>,
}

impl Pslg {
    /// Creates a PSLG from vertex coordinates and edges given as pairs of vertex indices.
    ///
    /// Each edge is canonicalized to start at its lower endpoint. Fails if an edge index is
    /// out of bounds, if an edge is degenerate or horizontal, or if two vertices share a
    /// y-coordinate, since the slab splits happen at vertex y-values and a strict vertical
    /// order is assumed throughout.
    pub fn new(vertices: Vec<[f64; 2]>, edges: &[(usize, usize)]) -> Result<Self> {
        let n = vertices.len();
        let mut canonicalized = Vec::with_capacity(edges.len());
        for &(i, j) in edges {
            if i >= n || j >= n {
                bail!("Edge ({}, {}) refers to a nonexistent vertex.", i, j);
            }
            if i == j {
                bail!("Edge ({}, {}) is degenerate.", i, j);
            }
            let edge = match vertices[i][1].total_cmp(&vertices[j][1]) {
                Ordering::Less => Edge { p: i, q: j },
                Ordering::Greater => Edge { p: j, q: i },
                Ordering::Equal => bail!("Edge ({}, {}) is horizontal.", i, j),
            };
            canonicalized.push(edge);
        }
        // The horizontal-edge check above catches connected vertices at the same height with
        // a more precise message; this catches the rest.
        if vertices
            .iter()
            .map(|&[_, y]| y)
            .sorted_by(f64::total_cmp)
            .tuple_windows()
            .any(|(y1, y2)| y1 == y2)
        {
            bail!("Two vertices share a y-coordinate.");
        }
        let pslg = Self {
            vertices,
            edges: Vec::new(),
        };
        let mut edges = canonicalized;
        edges.sort_by(|&a, &b| pslg.cmp_edges(a, b));
        Ok(Self { edges, ..pslg })
    }

    /// A triangulated vertical strip with `n` vertices, rungs zigzagging between its two
    /// rails.
    ///
    /// All vertex y-coordinates are distinct and no edge is horizontal, so this family is
    /// valid input for any `n`. Useful to exercise the locator on meshes of arbitrary size.
    pub fn ladder(n: usize) -> Result<Self> {
        let vertices = (0..n)
            .map(|i| [if i % 2 == 0 { 0. } else { 1. }, i as f64])
            .collect();
        let zigzag = (1..n).map(|i| (i - 1, i));
        let rails = (2..n).map(|i| (i - 2, i));
        let edges = zigzag.chain(rails).collect_vec();
        Self::new(vertices, &edges)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Coordinates of the vertex with index `idx`.
    pub fn coords(&self, idx: usize) -> [f64; 2] {
        self.vertices[idx]
    }

    /// The edges, canonicalized and sorted left-to-right.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn y(&self, idx: usize) -> f64 {
        self.vertices[idx][1]
    }

    /// Orders two edges left-to-right.
    ///
    /// When the open y-ranges of the edges overlap, the comparison is geometric: whichever
    /// edge crosses the midline of the overlap at the smaller x-coordinate comes first. Two
    /// non-crossing edges keep the same relative x-order over their whole overlap, so this
    /// is consistent for any pair that can bound a common slab.
    ///
    /// Edges with disjoint y-ranges never bound a common slab and their relative order
    /// carries no geometric meaning; they are ordered by their lower endpoints and then by
    /// index, which keeps the comparison a total order instead of the arbitrary constant a
    /// naive version would return.
    pub(crate) fn cmp_edges(&self, a: Edge, b: Edge) -> Ordering {
        let lo = self.y(a.p).max(self.y(b.p));
        let hi = self.y(a.q).min(self.y(b.q));
        if lo < hi {
            let y = (lo + hi) / 2.;
            let xa = x_at(self.coords(a.p), self.coords(a.q), y);
            let xb = x_at(self.coords(b.p), self.coords(b.q), y);
            xa.total_cmp(&xb)
                .then_with(|| (a.p, a.q).cmp(&(b.p, b.q)))
        } else {
            let [xa, ya] = self.coords(a.p);
            let [xb, yb] = self.coords(b.p);
            ya.total_cmp(&yb)
                .then_with(|| xa.total_cmp(&xb))
                .then_with(|| (a.p, a.q).cmp(&(b.p, b.q)))
        }
    }
}
