//! Error type shared by every fallible quadtree operation.

/// Errors that can occur while building, querying or loading a quadtree.
///
/// Inserting a point outside the tree boundary is not an error; see
/// [`QuadTree::insert`](crate::QuadTree::insert).
#[derive(Debug, thiserror::Error)]
pub enum QuadTreeError {
    /// An argument was rejected before any state was touched
    #[error("{0}")]
    InvalidArgument(String),
    /// JSON input could not be decoded into a snapshot
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuadTreeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias for quadtree operations.
pub type Result<T> = std::result::Result<T, QuadTreeError>;
