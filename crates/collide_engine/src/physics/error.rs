//! Errors reported by shape construction and the collision facade

use thiserror::Error;

use super::legacy::LegacyFormatError;

/// Shape construction and lookup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Fewer points than a hull needs
    #[error("convex hull needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// Hull construction produced no usable faces
    #[error("convex hull is degenerate (collinear or coplanar input)")]
    DegenerateHull,

    /// Bounding box with identical corners
    #[error("bounding box has zero size")]
    EmptyBoundingBox,

    /// Triangle mesh with an empty or ragged index list, or an index past the vertices
    #[error("triangle mesh index list is invalid")]
    InvalidTriangleMesh,

    /// Compound requested from no convexes
    #[error("cannot build a compound from an empty convex list")]
    EmptyConvexList,

    /// Convex handle is stale or unknown
    #[error("unknown convex handle")]
    UnknownConvex,

    /// Collide handle is stale or unknown
    #[error("unknown collide handle")]
    UnknownCollide,

    /// Polysoup handle is stale or unknown
    #[error("unknown polysoup handle")]
    UnknownPolysoup,

    /// Convex already belongs to a compound or to an internal cache
    #[error("convex is not owned by the caller")]
    ConvexNotAvailable,

    /// Same convex listed more than once for one compound
    #[error("convex listed more than once")]
    DuplicateConvex,

    /// Collide is owned by an internal cache
    #[error("collide is managed internally and cannot be destroyed")]
    InternalCollide,

    /// Operation not supported by this shape kind
    #[error("operation not supported by {0} shapes")]
    UnsupportedShape(&'static str),

    /// Legacy collision data could not be read
    #[error("legacy collision data: {0}")]
    Legacy(#[from] LegacyFormatError),
}
