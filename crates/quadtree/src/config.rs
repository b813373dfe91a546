//! Explicit tree configuration.
//!
//! [`TreeConfig`] describes a tree covering `(0, 0)..(width, height)`. It is
//! the replacement for reaching into process-wide canvas dimensions: callers
//! pass the dimensions in, typically from a configuration file.

use serde::{Deserialize, Serialize};

/// Capacity used when a constructor is not given one.
pub const DEFAULT_CAPACITY: usize = 8;
/// Depth budget used when a constructor is not given one.
pub const DEFAULT_DEPTH: u32 = 10;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

/// Dimensions and tuning for a tree anchored at the origin.
///
/// `width` and `height` are optional so that a configuration file without
/// them deserializes; building a tree from such a config fails instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Full width of the indexed area
    #[serde(default)]
    pub width: Option<f64>,
    /// Full height of the indexed area
    #[serde(default)]
    pub height: Option<f64>,
    /// Points a leaf holds before subdividing
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Maximum number of subdivisions along any branch
    #[serde(default = "default_depth")]
    pub depth: u32,
}

impl TreeConfig {
    /// Config for a `width` x `height` area with default capacity and depth.
    pub fn with_dimensions(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            capacity: DEFAULT_CAPACITY,
            depth: DEFAULT_DEPTH,
        }
    }
}
