//! # Core Type Definitions
//!
//! This module contains the point type stored by the quadtree.
//!
//! ## Key Types
//!
//! - [`Point`] - An immutable 2D coordinate carrying an opaque user payload
//!
//! Coordinates use double precision throughout. Points serialize as
//! `{ "x": .., "y": .., "payload": .. }`; the older `userData` key is accepted
//! when reading, and a point without a payload gets the payload type's default.

use serde::{Deserialize, Serialize};

/// A 2D point with an attached payload.
///
/// Points are immutable once created. The tree takes ownership on insert and
/// hands out shared references from queries.
///
/// # Examples
///
/// ```rust
/// use quadtree::Point;
///
/// let spawn = Point::new(0.0, 0.0, "spawn");
/// let crate_drop = Point::new(3.0, 4.0, "crate");
/// assert_eq!(spawn.distance_from(&crate_drop), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point<T> {
    x: f64,
    y: f64,
    /// Left at `T::default()` when absent from the input
    #[serde(
        default,
        alias = "userData",
        bound(deserialize = "T: Deserialize<'de> + Default")
    )]
    payload: T,
}

impl<T> Point<T> {
    /// Creates a new point at `(x, y)` carrying `payload`.
    pub fn new(x: f64, y: f64, payload: T) -> Self {
        Self { x, y, payload }
    }

    /// X coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// The user payload attached to this point.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consumes the point, returning its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Euclidean distance to another point, regardless of its payload type.
    pub fn distance_from<U>(&self, other: &Point<U>) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
