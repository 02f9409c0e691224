//! Planar point location through slab decomposition.
//!
//! Given a planar straight-line graph ([`Pslg`]), [`SlabMap`] builds a weight-balanced
//! binary search tree over the trapezoidal decomposition of the plane, and answers "which
//! cell contains this point?" queries in logarithmic time. A query does not return an
//! opaque cell id but the full path of [`Decision`]s taken through the tree, which uniquely
//! identifies the trapezoid and doubles as an explanation of the answer.
//!
//! ```
//! use slabloc::{PointLocator, Pslg, SlabMap};
//!
//! # fn main() -> anyhow::Result<()> {
//! let pslg = Pslg::new(
//!     vec![[0., 0.], [3., 1.], [1., 3.]],
//!     &[(0, 1), (1, 2), (0, 2)],
//! )?;
//! let map = SlabMap::new(pslg);
//!
//! let path = map.locate_one(&[1.5, 1.2]);
//! assert!(!path.is_empty());
//! # Ok(())
//! # }
//! ```

mod geometry;
mod point_locator;
mod pslg;
mod slab_map;
mod tree;

pub use crate::geometry::{x_at, Point};
pub use crate::point_locator::{Branch, Decision, PointLocator};
pub use crate::pslg::{Edge, Pslg};
pub use crate::slab_map::SlabMap;
pub use crate::tree::{Node, NodeData};
