//! Geometry primitives: points, corner quads, and bilinear grid projection.
//!
//! A [`Quad`] bounds the answer-bubble region of the sheet. Projection from
//! normalized `(u, v)` coordinates into pixel coordinates is bilinear
//! interpolation over the quad's edges: exact for parallelograms and an
//! approximation of the true projective transform for general
//! quadrilaterals produced by camera skew. Swapping in a homography solve
//! would be a drop-in change at [`Quad::project`] only.

/// Minimum corner separation and edge-area scale below which a quad is
/// considered degenerate.
const DEGENERACY_EPS: f64 = 1e-9;

/// A 2D point in pixel units.
///
/// The coordinate space (display or buffer) is determined by context:
/// [`crate::Calibration`] holds display-space points, everything sampled
/// from a [`crate::PixelBuffer`] is buffer-space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Construct a point from pixel coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` toward `other` by `t`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One of the four calibration corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All four corners in `[top_left, top_right, bottom_left, bottom_right]`
    /// order. This order is stable and matches [`Quad::corners`].
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        };
        f.write_str(s)
    }
}

/// Four corner points bounding the bubble region.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl Quad {
    /// Construct a quad from its four corners.
    pub fn new(top_left: Point, top_right: Point, bottom_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Corner accessor by [`Corner`] tag.
    pub fn corner(&self, which: Corner) -> Point {
        match which {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Replace one corner wholesale.
    pub fn set_corner(&mut self, which: Corner, point: Point) {
        match which {
            Corner::TopLeft => self.top_left = point,
            Corner::TopRight => self.top_right = point,
            Corner::BottomLeft => self.bottom_left = point,
            Corner::BottomRight => self.bottom_right = point,
        }
    }

    /// The four corners in [`Corner::ALL`] order.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// Project normalized `(u, v)` in `[0,1]²` to a pixel point.
    ///
    /// Bilinear over the quad's edges:
    /// `lerp(lerp(tl, tr, u), lerp(bl, br, u), v)`.
    /// The corner-identity law holds exactly: `project(0,0) == top_left`,
    /// `project(1,0) == top_right`, `project(0,1) == bottom_left`,
    /// `project(1,1) == bottom_right`.
    ///
    /// Total function: degenerate quads are rejected by callers (see
    /// [`Quad::is_degenerate`]), never here.
    pub fn project(&self, u: f64, v: f64) -> Point {
        let top = self.top_left.lerp(self.top_right, u);
        let bottom = self.bottom_left.lerp(self.bottom_right, u);
        top.lerp(bottom, v)
    }

    /// Length of the top edge in pixels. Used to derive the bubble sampling
    /// radius.
    pub fn top_edge_len(&self) -> f64 {
        self.top_left.distance(self.top_right)
    }

    /// Uniformly scale all four corners about the origin.
    pub fn scaled(&self, factor: f64) -> Quad {
        let s = |p: Point| Point::new(p.x * factor, p.y * factor);
        Quad::new(
            s(self.top_left),
            s(self.top_right),
            s(self.bottom_left),
            s(self.bottom_right),
        )
    }

    /// True when the quad cannot support projection: any non-finite corner,
    /// coincident corner pair, or (near-)zero enclosed area.
    pub fn is_degenerate(&self) -> bool {
        let c = self.corners();
        if c.iter().any(|p| !p.is_finite()) {
            return true;
        }
        for i in 0..4 {
            for j in (i + 1)..4 {
                if c[i].distance(c[j]) < DEGENERACY_EPS {
                    return true;
                }
            }
        }
        self.area().abs() < DEGENERACY_EPS
    }

    /// Signed shoelace area over the perimeter order tl → tr → br → bl.
    fn area(&self) -> f64 {
        let ring = [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ];
        let mut acc = 0.0;
        for i in 0..4 {
            let a = ring[i];
            let b = ring[(i + 1) % 4];
            acc += a.x * b.y - b.x * a.y;
        }
        acc * 0.5
    }
}
