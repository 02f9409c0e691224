use itertools::Itertools;
use smallvec::SmallVec;

use crate::geometry::{Point, Positioning};
use crate::point_locator::{Branch, Decision, PointLocator};
use crate::pslg::{Edge, Pslg};
use crate::tree::{Node, NodeData, Tree};

/// Slab decomposition of a planar straight-line graph.
///
/// The plane is cut into horizontal slabs at vertex y-coordinates, recursively: the median
/// vertex of the current slab splits it in two, and within each sub-slab the edges crossing
/// it cut the strip into trapezoids, discovered left to right. The result is a binary search
/// tree over the whole plane whose inner nodes are either *vertex splits* (is the query
/// below or above this vertex?) or *edge splits* (is the query left or right of this edge?),
/// and whose `None` slots are the trapezoids themselves.
///
/// Splitting at median vertices alone does not bound the depth, because the trapezoids of a
/// slab form an arbitrarily long ordered list. Each list is therefore rebuilt around its
/// weighted median (see [`Tree::balance`]), which makes the depth logarithmic in the number
/// of vertices while keeping the left-to-right order of the cells intact.
///
/// The tree is built once and never mutated afterwards, so any number of concurrent queries
/// can traverse it without synchronization.
#[derive(Debug)]
pub struct SlabMap {
    pslg: Pslg,
    tree: Tree,
    root: Option<usize>,
}

/// Vertices and edges accumulated for the trapezoid currently being discovered, one
/// accumulator per sub-slab.
#[derive(Default)]
struct Accum {
    verts: Vec<usize>,
    edges: Vec<Edge>,
}

struct Builder<'a> {
    pslg: &'a Pslg,
    tree: Tree,
}

impl Builder<'_> {
    /// Decomposes the part of the slab `[lo, hi]` that is bounded by `edges`, splitting at
    /// the median of `verts` (the vertices strictly inside the slab, in y-order).
    ///
    /// Returns the root of the resulting subtree, or `None` when there is nothing left to
    /// split and the region is a single trapezoid.
    fn decompose(&mut self, edges: &[Edge], verts: &[usize], lo: f64, hi: f64) -> Option<usize> {
        if verts.is_empty() {
            return None;
        }
        let split = verts[(verts.len() - 1) / 2];
        let y_split = self.pslg.y(split);
        let slabs = [(lo, y_split), (y_split, hi)];

        let mut pending = [Accum::default(), Accum::default()];
        let mut entries = [SmallVec::<[usize; 8]>::new(), SmallVec::new()];

        for &edge in edges {
            let y_start = self.pslg.y(edge.p);
            let y_end = self.pslg.y(edge.q);
            for (side, &(sub_lo, sub_hi)) in slabs.iter().enumerate() {
                let acc = &mut pending[side];
                for endpoint in [edge.p, edge.q] {
                    let y = self.pslg.y(endpoint);
                    if sub_lo < y && y < sub_hi && !acc.verts.contains(&endpoint) {
                        acc.verts.push(endpoint);
                    }
                }
                if (sub_lo < y_start && y_start < sub_hi) || (sub_lo < y_end && y_end < sub_hi) {
                    acc.edges.push(edge);
                }
                if y_start <= sub_lo && y_end >= sub_hi {
                    // `edge` crosses the whole sub-slab, so everything accumulated so far
                    // lies to its left and forms one trapezoid run
                    let group = std::mem::take(acc);
                    if let Some(sub) = self.split_group(group, sub_lo, sub_hi) {
                        entries[side].push(sub);
                    }
                    entries[side].push(self.tree.add(NodeData::Edge(edge)));
                }
            }
        }

        // The rightmost trapezoid of each sub-slab is not closed by any edge
        for (side, &(sub_lo, sub_hi)) in slabs.iter().enumerate() {
            let group = std::mem::take(&mut pending[side]);
            if let Some(sub) = self.split_group(group, sub_lo, sub_hi) {
                entries[side].push(sub);
            }
        }

        let left = self.tree.balance(&entries[0]);
        let right = self.tree.balance(&entries[1]);
        let node = self.tree.add(NodeData::Vertex(split));
        self.tree.set_children(node, left, right);
        Some(node)
    }

    fn split_group(&mut self, group: Accum, lo: f64, hi: f64) -> Option<usize> {
        let Accum { mut verts, edges } = group;
        verts.sort_by(|&a, &b| self.pslg.y(a).total_cmp(&self.pslg.y(b)));
        self.decompose(&edges, &verts, lo, hi)
    }
}

impl SlabMap {
    /// Builds the decomposition tree for a [`Pslg`].
    pub fn new(pslg: Pslg) -> Self {
        let mut builder = Builder {
            pslg: &pslg,
            tree: Tree::new(),
        };
        let verts = (0..pslg.vertex_count())
            .sorted_by(|&a, &b| pslg.y(a).total_cmp(&pslg.y(b)))
            .collect_vec();
        let root = match (verts.first(), verts.last()) {
            (Some(&bottom), Some(&top)) => {
                builder.decompose(pslg.edges(), &verts, pslg.y(bottom), pslg.y(top))
            }
            _ => None,
        };
        let tree = builder.tree;
        Self { pslg, tree, root }
    }

    /// The underlying graph.
    pub fn pslg(&self) -> &Pslg {
        &self.pslg
    }

    /// The root of the decomposition tree, if the graph has any vertices.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// The tree node with index `idx`, for read-only consumers such as renderers.
    pub fn node(&self, idx: usize) -> &Node {
        self.tree.get(idx)
    }

    /// Walks the tree from the root down to the trapezoid containing `point`, recording
    /// every decision along the way.
    ///
    /// Points exactly on a split boundary resolve to `Above`/`Right`, and points outside the
    /// hull of the graph get an ordinary path like any other point; in both cases the walk
    /// is deterministic and terminates after at most [`depth`](Self::depth) steps.
    pub fn trace(&self, point: &[f64; 2]) -> Vec<Decision> {
        let mut path = Vec::new();
        let mut next = self.root;
        while let Some(idx) = next {
            let node = self.tree.get(idx);
            let branch = match node.data {
                NodeData::Vertex(v) => {
                    if point[1] < self.pslg.y(v) {
                        Branch::Below
                    } else {
                        Branch::Above
                    }
                }
                NodeData::Edge(edge) => {
                    let p1 = self.pslg.coords(edge.p);
                    let p2 = self.pslg.coords(edge.q);
                    match Point::from(point).position(p1, p2) {
                        Positioning::Left => Branch::Left,
                        Positioning::On | Positioning::Right => Branch::Right,
                    }
                }
            };
            path.push(Decision {
                node: node.data,
                branch,
            });
            next = match branch {
                Branch::Below | Branch::Left => node.left,
                Branch::Above | Branch::Right => node.right,
            };
        }
        path
    }

    /// Returns the number of vertex- and edge-nodes in the tree.
    pub fn node_count(&self) -> (usize, usize) {
        self.tree
            .iter()
            .fold((0, 0), |(vertices, edges), node| match node.data {
                NodeData::Vertex(_) => (vertices + 1, edges),
                NodeData::Edge(_) => (vertices, edges + 1),
            })
    }

    /// Number of nodes on the longest root-to-trapezoid path.
    pub fn depth(&self) -> usize {
        self.tree.depth(self.root)
    }

    /// Prints some statistics of the decomposition tree.
    ///
    /// Useful for debugging purposes.
    pub fn print_stats(&self) {
        let (vertex_count, edge_count) = self.node_count();
        println!(
            "Slab decomposition counts:\n\t{} vertex split(s)\n\t{} edge split(s)",
            vertex_count, edge_count,
        );
        println!("Depth:\n\tmax {}", self.depth());
    }
}

impl PointLocator for SlabMap {
    fn locate_one(&self, point: &[f64; 2]) -> Vec<Decision> {
        self.trace(point)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use proptest::prelude::*;

    use super::*;

    prop_compose! {
        fn coords_in_range(xmin: f64, xmax: f64, ymin: f64, ymax: f64)
                          (x in xmin..xmax, y in ymin..ymax) -> [f64; 2] {
           [x, y]
        }
    }

    fn vertex(v: usize, branch: Branch) -> Decision {
        Decision {
            node: NodeData::Vertex(v),
            branch,
        }
    }

    fn edge(p: usize, q: usize, branch: Branch) -> Decision {
        Decision {
            node: NodeData::Edge(Edge { p, q }),
            branch,
        }
    }

    //
    //        2
    //       /|
    //      / |
    //     /  1
    //    /  /
    //   0--'
    //
    fn triangle() -> Result<Pslg> {
        let vertices = vec![[0., 0.], [3., 1.], [1., 3.]];
        Pslg::new(vertices, &[(0, 1), (1, 2), (0, 2)])
    }

    #[test]
    fn empty_graph_has_no_tree() -> Result<()> {
        let map = SlabMap::new(Pslg::ladder(0)?);

        assert_eq!(map.root(), None);
        assert_eq!(map.trace(&[0., 0.]), vec![]);

        Ok(())
    }

    #[test]
    fn single_vertex_splits_the_plane_in_two() -> Result<()> {
        let map = SlabMap::new(Pslg::new(vec![[2., 3.]], &[])?);

        assert_eq!(map.node_count(), (1, 0));
        assert_eq!(map.trace(&[0., 0.]), vec![vertex(0, Branch::Below)]);
        assert_eq!(map.trace(&[0., 7.]), vec![vertex(0, Branch::Above)]);

        Ok(())
    }

    #[test]
    fn first_split_is_the_median_vertex() -> Result<()> {
        let map = SlabMap::new(triangle()?);

        // The median vertex by y-order is vertex 1, at y = 1
        let above = map.trace(&[1.5, 1.2]);
        assert_eq!(above[0], vertex(1, Branch::Above));
        let below = map.trace(&[-5., -5.]);
        assert_eq!(below[0], vertex(1, Branch::Below));

        Ok(())
    }

    #[test]
    fn locate_points_around_a_triangle() -> Result<()> {
        let map = SlabMap::new(triangle()?);

        // Interior, upper slab
        assert_eq!(
            map.trace(&[1.5, 1.2]),
            vec![
                vertex(1, Branch::Above),
                edge(1, 2, Branch::Left),
                edge(0, 2, Branch::Right),
            ]
        );
        // Interior, lower slab
        assert_eq!(
            map.trace(&[0.5, 0.4]),
            vec![
                vertex(1, Branch::Below),
                edge(0, 1, Branch::Left),
                edge(0, 2, Branch::Right),
            ]
        );
        // Outside, left of the hull
        assert_eq!(
            map.trace(&[-1., 0.5]),
            vec![
                vertex(1, Branch::Below),
                edge(0, 1, Branch::Left),
                edge(0, 2, Branch::Left),
            ]
        );
        // Outside, below the hull
        assert_eq!(
            map.trace(&[-5., -5.]),
            vec![vertex(1, Branch::Below), edge(0, 1, Branch::Right)]
        );

        Ok(())
    }

    #[test]
    fn points_in_the_same_trapezoid_share_their_path() -> Result<()> {
        let map = SlabMap::new(triangle()?);

        assert_eq!(map.trace(&[0.5, 0.4]), map.trace(&[0.6, 0.45]));

        Ok(())
    }

    #[test]
    fn boundary_queries_take_deterministic_branches() -> Result<()> {
        let map = SlabMap::new(triangle()?);

        // Exactly on the split vertex: above, then on its right edge: right
        assert_eq!(
            map.trace(&[3., 1.]),
            vec![vertex(1, Branch::Above), edge(1, 2, Branch::Right)]
        );
        // Exactly on an edge: collinear resolves to the right-hand cell
        assert_eq!(
            map.trace(&[0.5, 1.5]),
            vec![
                vertex(1, Branch::Above),
                edge(1, 2, Branch::Left),
                edge(0, 2, Branch::Right),
            ]
        );

        Ok(())
    }

    #[test]
    fn interior_vertex_nests_a_deeper_split() -> Result<()> {
        //
        //         2
        //        /|\
        //       / | \
        //      /  3  \
        //     /  / \__\
        //    /  /   __-1
        //   0--'---
        //
        let vertices = vec![[0., 0.], [4., 1.], [2., 6.], [2., 2.]];
        let pslg = Pslg::new(vertices, &[(0, 1), (1, 2), (0, 2), (0, 3), (1, 3), (3, 2)])?;
        let map = SlabMap::new(pslg);

        assert_eq!(map.node_count(), (2, 8));

        // Inside the triangle (0, 1, 3)
        let query = [2., 1.5];
        assert!(Point::from(query).is_inside(&[[0., 0.], [4., 1.], [2., 2.]]));
        assert_eq!(
            map.trace(&query),
            vec![
                vertex(1, Branch::Above),
                edge(0, 2, Branch::Right),
                edge(1, 2, Branch::Left),
                vertex(3, Branch::Below),
                edge(1, 3, Branch::Left),
                edge(0, 3, Branch::Right),
            ]
        );

        Ok(())
    }

    #[test]
    fn ladder_triangles_are_distinct_cells() -> Result<()> {
        let map = SlabMap::new(Pslg::ladder(8)?);

        let centroids = (0..6)
            .map(|i| {
                let tri = [
                    map.pslg().coords(i),
                    map.pslg().coords(i + 1),
                    map.pslg().coords(i + 2),
                ];
                let centroid = [
                    (tri[0][0] + tri[1][0] + tri[2][0]) / 3.,
                    (tri[0][1] + tri[1][1] + tri[2][1]) / 3.,
                ];
                // Make sure the query actually is where we think it is
                assert!(Point::from(centroid).is_inside(&tri));
                centroid
            })
            .collect_vec();

        let paths = map.locate_many(&centroids);
        for (i, a) in paths.iter().enumerate() {
            for b in paths.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
            // A cell of the mesh and the outside world can never share a trapezoid
            assert_ne!(a, &map.trace(&[10., 3.5]));
        }

        Ok(())
    }

    #[test]
    fn locating_twice_yields_identical_paths() -> Result<()> {
        let map = SlabMap::new(Pslg::ladder(16)?);

        proptest!(|(points in proptest::collection::vec(coords_in_range(-2., 3., -5., 20.), 20))| {
            let first = map.locate_many(&points);
            let second = map.locate_many(&points);
            prop_assert_eq!(first, second);
        });

        Ok(())
    }

    #[test]
    fn paths_are_bounded_by_the_tree_depth() -> Result<()> {
        let map = SlabMap::new(Pslg::ladder(32)?);
        let depth = map.depth();

        proptest!(|(points in proptest::collection::vec(coords_in_range(-10., 10., -10., 40.), 20))| {
            for path in map.locate_many(&points) {
                prop_assert!(!path.is_empty());
                prop_assert!(path.len() <= depth);
            }
        });

        Ok(())
    }

    #[test]
    fn tree_depth_stays_logarithmic() -> Result<()> {
        // 128 vertices give 126 bounded triangles; a degenerate tree would be hundreds of
        // levels deep
        let map = SlabMap::new(Pslg::ladder(128)?);

        assert!(map.depth() <= 32, "depth = {}", map.depth());

        Ok(())
    }

    #[test]
    fn parallel_location_matches_sequential() -> Result<()> {
        let map = SlabMap::new(Pslg::ladder(8)?);
        let points = vec![[0.5, 0.5], [0.5, 3.5], [1.5, 2.5], [-1., -1.]];

        assert_eq!(map.par_locate_many(&points), map.locate_many(&points));

        Ok(())
    }
}
