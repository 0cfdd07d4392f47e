//! Legacy convex-decomposition format
//!
//! Collision models authored by the old offline toolchain are stored as a
//! "compact surface": a binary tree of ledges, each ledge a convex piece with
//! bit-packed triangles and edges. Files come in either byte order, so every
//! record goes through [`byteswap::LegacyReader`] before it is interpreted.

pub mod byteswap;
pub mod ledge_tree;
pub mod records;
pub mod vcollide;

use thiserror::Error;

pub use byteswap::{Endianness, LegacyReader};
pub use ledge_tree::{LedgeTreeImporter, LegacySurface};
pub use vcollide::{parse_solid, parse_vcollide, VCollideData};

/// Errors raised while reading legacy collision data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LegacyFormatError {
    /// A record extends past the end of the buffer
    #[error("record at offset {offset} needs {needed} bytes but the buffer holds {len}")]
    Truncated {
        /// Start of the record
        offset: usize,
        /// Record size
        needed: usize,
        /// Buffer length
        len: usize,
    },

    /// A relative offset points before the start of the buffer
    #[error("relative offset resolves to invalid position {offset}")]
    BadOffset {
        /// Resolved absolute position
        offset: i64,
    },

    /// The ledge tree nests deeper than allowed
    #[error("ledge tree deeper than {depth} levels")]
    TreeTooDeep {
        /// Depth limit that was hit
        depth: usize,
    },

    /// The ledge tree has more nodes than allowed
    #[error("ledge tree has more than {limit} nodes")]
    TooManyNodes {
        /// Node limit that was hit
        limit: usize,
    },

    /// A ledge has too few points or triangles, or an index out of range
    #[error("invalid ledge at offset {offset}")]
    InvalidLedge {
        /// Start of the ledge record
        offset: usize,
    },

    /// Modern solid header with a model type other than a compact surface
    #[error("unknown collision model type {0}")]
    UnknownModelType(i16),

    /// Compact surface without the expected identifier
    #[error("unsupported compact surface id {0:#010x}")]
    UnsupportedCompactSurface(u32),
}
