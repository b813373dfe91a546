//! # Snapshot Serialization
//!
//! A tree is exchanged as one flat JSON object:
//!
//! ```text
//! { "x": .., "y": .., "w": .., "h": .., "depth": .., "capacity": ..,
//!   "points": [ { "x": .., "y": .., "payload": .. }, ... ] }
//! ```
//!
//! Only the boundary, capacity, depth budget and the stored points survive;
//! the subdivision layout is rebuilt by inserting the points again in array
//! order. Loading the same snapshot twice always yields the same layout.

use crate::config::DEFAULT_DEPTH;
use crate::error::{QuadTreeError, Result};
use crate::geometry::Rectangle;
use crate::quadtree::QuadTree;
use crate::types::Point;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Owned form of the exchange format.
///
/// Every field is optional on input so that validation can report exactly
/// what is missing instead of failing inside the JSON decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de> + Default"))]
pub struct QuadTreeSnapshot<T> {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    /// Depth budget of the root
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default = "Vec::new")]
    pub points: Vec<Point<T>>,
}

/// Borrowed view used when writing a tree out.
#[derive(Serialize)]
struct SnapshotView<'a, T> {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    depth: u32,
    capacity: usize,
    points: Vec<&'a Point<T>>,
}

impl<T> QuadTree<T> {
    /// Flattens the tree into an owned snapshot.
    pub fn to_snapshot(&self) -> QuadTreeSnapshot<T>
    where
        T: Clone,
    {
        let boundary = self.boundary();
        QuadTreeSnapshot {
            x: Some(boundary.x()),
            y: Some(boundary.y()),
            w: Some(boundary.w()),
            h: Some(boundary.h()),
            depth: Some(self.depth()),
            capacity: Some(self.capacity()),
            points: self.iter().cloned().collect(),
        }
    }

    /// Rebuilds a tree from a snapshot.
    ///
    /// # Errors
    ///
    /// - "JSON missing boundary information" when any of `x`, `y`, `w`, `h`
    ///   is absent
    /// - "capacity should be a number" when `capacity` is absent
    /// - any construction error from [`QuadTree::with_depth`]
    ///
    /// A missing `depth` falls back to the default budget. Points outside the
    /// boundary are skipped with a warning.
    pub fn from_snapshot(snapshot: QuadTreeSnapshot<T>) -> Result<Self> {
        let (Some(x), Some(y), Some(w), Some(h)) = (snapshot.x, snapshot.y, snapshot.w, snapshot.h)
        else {
            return Err(QuadTreeError::invalid("JSON missing boundary information"));
        };
        let capacity = snapshot
            .capacity
            .ok_or_else(|| QuadTreeError::invalid("capacity should be a number"))?;
        let depth = snapshot.depth.unwrap_or(DEFAULT_DEPTH);

        let mut tree = Self::with_depth(Rectangle::new(x, y, w, h), capacity, depth)?;

        let total = snapshot.points.len();
        let rejected = snapshot
            .points
            .into_iter()
            .filter_map(|point| tree.try_insert(point).err())
            .count();
        if rejected > 0 {
            warn!(rejected, total, "Snapshot points outside the boundary were skipped");
        }

        Ok(tree)
    }

    /// Serializes the tree into a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value>
    where
        T: Serialize,
    {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes the tree into a JSON string.
    pub fn to_json_string(&self) -> Result<String>
    where
        T: Serialize,
    {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a tree from a JSON value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadtree::{QuadTree, QuadTreeError};
    ///
    /// let err = QuadTree::<()>::from_json(serde_json::json!({ "points": [] })).unwrap_err();
    /// assert!(matches!(err, QuadTreeError::InvalidArgument(_)));
    /// assert_eq!(err.to_string(), "JSON missing boundary information");
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self>
    where
        T: DeserializeOwned + Default,
    {
        let snapshot: QuadTreeSnapshot<T> = serde_json::from_value(value)?;
        Self::from_snapshot(snapshot)
    }

    /// Rebuilds a tree from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self>
    where
        T: DeserializeOwned + Default,
    {
        let snapshot: QuadTreeSnapshot<T> = serde_json::from_str(text)?;
        Self::from_snapshot(snapshot)
    }
}

impl<T: Serialize> Serialize for QuadTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let boundary = self.boundary();
        SnapshotView {
            x: boundary.x(),
            y: boundary.y(),
            w: boundary.w(),
            h: boundary.h(),
            depth: self.depth(),
            capacity: self.capacity(),
            points: self.iter().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for QuadTree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let snapshot = QuadTreeSnapshot::<T>::deserialize(deserializer)?;
        QuadTree::from_snapshot(snapshot).map_err(serde::de::Error::custom)
    }
}
