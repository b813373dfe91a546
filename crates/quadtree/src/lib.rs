//! # QuadTree
//!
//! A point quadtree for two-dimensional spatial lookups: range queries over
//! rectangles and circles, and k-nearest-neighbor search.
//!
//! ## Core Features
//!
//! - **Lazy Subdivision**: Leaves split into four quadrants only when they
//!   overflow their capacity
//! - **Bounded Depth**: A depth budget caps subdivision, so clustered input
//!   always terminates
//! - **Pluggable Query Shapes**: Anything implementing [`QueryShape`] can drive
//!   a range query
//! - **Nearest Neighbors**: Branch-and-bound search pruned by rectangle lower
//!   bounds
//! - **Snapshots**: Flat JSON exchange format via serde
//!
//! ## Quick Start Example
//!
//! ```rust
//! use quadtree::{Circle, Point, QuadTree, Rectangle};
//!
//! let mut tree = QuadTree::new(Rectangle::new(0.0, 0.0, 40.0, 40.0), 2)?;
//! for (x, y) in [(-10.0, 10.0), (-10.0, -10.0), (10.0, 10.0), (10.0, -10.0)] {
//!     tree.insert(Point::new(x, y, format!("{x},{y}")));
//! }
//! assert!(tree.is_divided());
//!
//! // Everything within 16 units of (5, 5)
//! let nearby = tree.query(&Circle::new(5.0, 5.0, 16.0));
//! assert_eq!(nearby.len(), 3);
//!
//! // The two points closest to the north-east corner
//! let closest = tree.closest(&Point::new(20.0, -20.0, ()), 2, f64::INFINITY)?;
//! assert_eq!(closest[0].payload(), "10,-10");
//!
//! // Flat JSON snapshot
//! let json = tree.to_json()?;
//! let restored = QuadTree::<String>::from_json(json)?;
//! assert_eq!(restored.len(), 4);
//! # Ok::<(), quadtree::QuadTreeError>(())
//! ```
//!
//! ## Thread Safety
//!
//! All operations are synchronous. Queries take `&self` and may run from
//! several threads at once; inserts take `&mut self`, so sharing a tree that
//! is still growing needs a lock around it.

pub mod config;
pub mod error;
pub mod geometry;
pub mod quadtree;
pub mod serialization;
pub mod types;


pub use config::{TreeConfig, DEFAULT_CAPACITY, DEFAULT_DEPTH};
pub use error::{QuadTreeError, Result};
pub use geometry::{Circle, Quadrant, QueryShape, Rectangle};
pub use quadtree::{Iter, NodeStats, QuadTree};
pub use serialization::QuadTreeSnapshot;
pub use types::Point;
