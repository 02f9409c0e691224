use rayon::prelude::*;

use crate::tree::NodeData;

/// The side taken at one node of the decomposition tree.
///
/// `Below`/`Above` are the outcomes of a vertex split, `Left`/`Right` of an edge split. A
/// query point exactly on the split boundary always resolves to `Above` respectively
/// `Right`, so every point takes a single deterministic path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Below,
    Above,
    Left,
    Right,
}

/// One step of a location query: the split that was examined and the side that was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub node: NodeData,
    pub branch: Branch,
}

/// A trait to locate one or several query points within a planar subdivision.
///
/// Locating a point yields the full path of [`Decision`]s from the root of the search
/// structure down to the trapezoid containing the point. The path is the cell's identity:
/// two points lie in the same trapezoid exactly when their paths are equal.
pub trait PointLocator {
    /// Locates one query point, returning the decision path leading to its trapezoid.
    fn locate_one(&self, point: &[f64; 2]) -> Vec<Decision>;

    /// Locates several query points.
    fn locate_many(&self, points: &[[f64; 2]]) -> Vec<Vec<Decision>> {
        points.iter().map(|point| self.locate_one(point)).collect()
    }

    /// Locates several query points in parallel.
    fn par_locate_many(&self, points: &[[f64; 2]]) -> Vec<Vec<Decision>>
    where
        Self: std::marker::Sync,
    {
        points
            .par_iter()
            .map(|point| self.locate_one(point))
            .collect()
    }
}
