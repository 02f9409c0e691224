use itertools::Itertools;

/// A point of the 2D plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl From<&Point> for [f64; 2] {
    fn from(val: &Point) -> Self {
        [val.x, val.y]
    }
}

impl From<Point> for [f64; 2] {
    fn from(val: Point) -> Self {
        (&val).into()
    }
}

impl From<&[f64; 2]> for Point {
    fn from(value: &[f64; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::from(&value)
    }
}

/// Positioning of a `Point` with respect to a line.
#[derive(Debug, PartialEq)]
pub(crate) enum Positioning {
    Left,
    On,
    Right,
}

impl Point {
    /// Tests if a point is Left|On|Right of an infinite 2D line defined by two points.
    pub(crate) fn position<T>(&self, p1: T, p2: T) -> Positioning
    where
        T: Into<[f64; 2]>,
    {
        let Self { x: x0, y: y0 } = self;
        let [x1, y1] = p1.into();
        let [x2, y2] = p2.into();
        match ((x2 - x1) * (y0 - y1) - (x0 - x1) * (y2 - y1)).total_cmp(&0.) {
            std::cmp::Ordering::Greater => Positioning::Left,
            std::cmp::Ordering::Less => Positioning::Right,
            std::cmp::Ordering::Equal => Positioning::On,
        }
    }

    /// Computes the winding number for a [`Point`] in a polygon (defined by a slice of
    /// coordinates).
    ///
    /// This number is `0` if the [`Point`] is not inside the polygon, and its magnitude counts
    /// how many times the polygon "winds" around it (positive counter-clockwise).
    ///
    /// The slab decomposition itself never computes winding numbers; this is the separate
    /// hull/face membership check for callers that need one, and an independent oracle for the
    /// test suites.
    ///
    /// For more information, see <https://web.archive.org/web/20130126163405/http://geomalgorithms.com/a03-_inclusion.html>.
    pub fn wn(&self, poly: &[[f64; 2]]) -> isize {
        let mut wn = 0;
        for (&a, &b) in poly.iter().circular_tuple_windows() {
            let [_, ya] = a;
            let [_, yb] = b;
            if ya <= self.y {
                // `a` is below self, so look for an upward crossing
                if yb > self.y && matches!(self.position(a, b), Positioning::Left) {
                    wn += 1;
                }
            } else {
                // `a` is above self, so look for a downward crossing
                if yb <= self.y && matches!(self.position(a, b), Positioning::Right) {
                    wn -= 1;
                }
            }
        }
        wn
    }

    /// Returns `true` if the point is inside the input polygon.
    pub fn is_inside(&self, poly: &[[f64; 2]]) -> bool {
        self.wn(poly) != 0
    }
}

/// X-coordinate where the segment from `p1` to `p2` crosses the horizontal line at `y`,
/// by linear interpolation.
///
/// The segment must not be horizontal (`p1[1] != p2[1]`), otherwise the division is
/// degenerate. [`Pslg`](crate::Pslg) construction rejects horizontal edges so every edge
/// of a valid graph can be interpolated.
pub fn x_at(p1: [f64; 2], p2: [f64; 2], y: f64) -> f64 {
    let [x1, y1] = p1;
    let [x2, y2] = p2;
    x2 - (x2 - x1) * (y2 - y) / (y2 - y1)
}
