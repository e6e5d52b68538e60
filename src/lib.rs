//! # mapview
//!
//! A map projection and viewport transform engine for tiled maps.
//!
//! The crate converts geographic coordinates on the WGS84 ellipsoid into
//! viewport pixel coordinates and back, and computes the affine transforms
//! a renderer needs to position tile rasters and overlay graphics at
//! arbitrary zoom, heading and pan. It performs no rendering, networking
//! or input handling itself; those collaborators consume the matrices and
//! tile indices produced here.

pub mod core;
pub mod projection;
pub mod tiles;
pub mod transform;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::MapConfig,
    geo::{Location, Point},
    viewport::Viewport,
};

pub use crate::projection::{for_crs, Projection};

pub use crate::tiles::{TileGrid, TileId};

pub use crate::transform::{Matrix, ViewportTransform};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("degenerate viewport scale: {0}")]
    DegenerateScale(f64),

    #[error("singular transform matrix")]
    SingularMatrix,

    #[error("unknown CRS identifier: {0}")]
    UnknownCrs(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;
