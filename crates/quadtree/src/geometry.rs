//! # Geometry Primitives
//!
//! Axis-aligned rectangles and circles used as node boundaries and query
//! regions.
//!
//! ## Key Types
//!
//! - [`Rectangle`] - Center/size rectangle with derived edges
//! - [`Circle`] - Center/radius query region
//! - [`Quadrant`] - One of the four sub-regions of a subdivided rectangle
//! - [`QueryShape`] - Capability shared by every query region
//!
//! The y axis grows downwards: `top = y - h/2` and "north" quadrants sit at
//! smaller y values.

use crate::types::Point;

/// A region that can drive a range query.
///
/// Implementors answer two questions: does the region hold a given point, and
/// can it overlap a node boundary at all. The second one is used to prune
/// whole subtrees, so it must never return `false` for a rectangle that
/// actually holds a matching point.
pub trait QueryShape {
    /// Returns `true` when `point` lies inside the region.
    fn contains<T>(&self, point: &Point<T>) -> bool;

    /// Returns `true` when the region may overlap `rect`.
    fn intersects(&self, rect: &Rectangle) -> bool;
}

/// The four quadrants produced by subdividing a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Right half, smaller y
    NorthEast,
    /// Left half, smaller y
    NorthWest,
    /// Right half, larger y
    SouthEast,
    /// Left half, larger y
    SouthWest,
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];
}

/// An axis-aligned rectangle described by its center and full extents.
///
/// Edges are derived once at construction and cannot be changed afterwards,
/// so they always agree with the center and size.
///
/// # Examples
///
/// ```rust
/// use quadtree::{Point, Rectangle};
///
/// let area = Rectangle::new(0.0, 0.0, 40.0, 40.0);
/// assert_eq!(area.left(), -20.0);
/// assert!(area.contains(&Point::new(20.0, -20.0, ())));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Rectangle {
    /// Creates a rectangle centered at `(x, y)` with width `w` and height `h`.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            left: x - w / 2.0,
            right: x + w / 2.0,
            top: y - h / 2.0,
            bottom: y + h / 2.0,
        }
    }

    /// Creates a rectangle spanning the given edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let width = right - left;
        let height = bottom - top;
        Self::new(left + width / 2.0, top + height / 2.0, width, height)
    }

    /// Center x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Center y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Full width
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Full height
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Left edge, `x - w/2`
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Right edge, `x + w/2`
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Top edge, `y - h/2`
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Bottom edge, `y + h/2`
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Returns `true` when center and extents are all finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Inclusive containment test on all four edges.
    ///
    /// A point on a shared edge is contained by both neighbours.
    pub fn contains<T>(&self, point: &Point<T>) -> bool {
        self.left <= point.x()
            && point.x() <= self.right
            && self.top <= point.y()
            && point.y() <= self.bottom
    }

    /// Overlap test. Rectangles that only touch along an edge intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.right < other.left
            || other.right < self.left
            || self.bottom < other.top
            || other.bottom < self.top)
    }

    /// Returns the quarter of this rectangle that lies in `quadrant`.
    pub fn subdivide(&self, quadrant: Quadrant) -> Rectangle {
        let (dx, dy) = match quadrant {
            Quadrant::NorthEast => (self.w / 4.0, -self.h / 4.0),
            Quadrant::NorthWest => (-self.w / 4.0, -self.h / 4.0),
            Quadrant::SouthEast => (self.w / 4.0, self.h / 4.0),
            Quadrant::SouthWest => (-self.w / 4.0, self.h / 4.0),
        };
        Rectangle::new(self.x + dx, self.y + dy, self.w / 2.0, self.h / 2.0)
    }

    /// Distance along x from `point` to this rectangle, 0 inside the span.
    pub fn x_distance_from<T>(&self, point: &Point<T>) -> f64 {
        if self.left <= point.x() && point.x() <= self.right {
            return 0.0;
        }
        (point.x() - self.left).abs().min((point.x() - self.right).abs())
    }

    /// Distance along y from `point` to this rectangle, 0 inside the span.
    pub fn y_distance_from<T>(&self, point: &Point<T>) -> f64 {
        if self.top <= point.y() && point.y() <= self.bottom {
            return 0.0;
        }
        (point.y() - self.top).abs().min((point.y() - self.bottom).abs())
    }

    /// Smallest possible distance from `point` to anything inside this
    /// rectangle.
    ///
    /// Nearest-neighbor search relies on this never exceeding the true
    /// distance to a contained point.
    pub fn distance_from<T>(&self, point: &Point<T>) -> f64 {
        let dx = self.x_distance_from(point);
        let dy = self.y_distance_from(point);
        (dx * dx + dy * dy).sqrt()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

impl QueryShape for Rectangle {
    fn contains<T>(&self, point: &Point<T>) -> bool {
        Rectangle::contains(self, point)
    }

    fn intersects(&self, rect: &Rectangle) -> bool {
        Rectangle::intersects(self, rect)
    }
}

/// A circular query region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    x: f64,
    y: f64,
    r: f64,
    r_squared: f64,
}

impl Circle {
    /// Creates a circle centered at `(x, y)` with radius `r`.
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            x,
            y,
            r,
            r_squared: r * r,
        }
    }

    /// Center x
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Center y
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Radius
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Squared radius, cached at construction.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Returns `true` when `point` is within the radius, edge included.
    pub fn contains<T>(&self, point: &Point<T>) -> bool {
        let dx = point.x() - self.x;
        let dy = point.y() - self.y;
        dx * dx + dy * dy <= self.r_squared
    }

    /// Closest-point test against a rectangle.
    pub fn intersects(&self, rect: &Rectangle) -> bool {
        let x_dist = (rect.x() - self.x).abs();
        let y_dist = (rect.y() - self.y).abs();

        let half_w = rect.w() / 2.0;
        let half_h = rect.h() / 2.0;

        if x_dist > self.r + half_w || y_dist > self.r + half_h {
            return false;
        }

        if x_dist <= half_w || y_dist <= half_h {
            return true;
        }

        // Center lies diagonally off a corner
        let corner_dx = x_dist - half_w;
        let corner_dy = y_dist - half_h;
        corner_dx * corner_dx + corner_dy * corner_dy <= self.r_squared
    }
}

impl QueryShape for Circle {
    fn contains<T>(&self, point: &Point<T>) -> bool {
        Circle::contains(self, point)
    }

    fn intersects(&self, rect: &Rectangle) -> bool {
        Circle::intersects(self, rect)
    }
}
