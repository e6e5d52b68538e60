//! Affine transform composition between projected map coordinates and
//! viewport pixels.

pub mod matrix;

pub use matrix::Matrix;

use crate::core::geo::Point;
use crate::{MapError, Result};

/// The affine mapping from projected map coordinates to viewport pixels,
/// together with its precomputed inverse.
///
/// A transform is an immutable value: the viewport composes a fresh one on
/// every state change and swaps it in whole, so a reader never observes a
/// half-updated matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    forward: Matrix,
    inverse: Matrix,
}

impl ViewportTransform {
    /// Composes the transform in the fixed order: translate the map origin
    /// to the plane origin, scale to pixels (flipping y so it grows
    /// downward), rotate by the heading, translate to the viewport origin.
    ///
    /// A non-finite or non-positive scale would produce a singular matrix
    /// and is rejected up front.
    pub fn compose(
        scale: f64,
        rotation: f64,
        map_origin: Point,
        viewport_origin: Point,
    ) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MapError::DegenerateScale(scale));
        }

        let forward = Matrix::translation(-map_origin.x, -map_origin.y)
            .then(&Matrix::scaling(scale, -scale))
            .then(&Matrix::rotation(rotation))
            .then(&Matrix::translation(viewport_origin.x, viewport_origin.y));
        let inverse = forward.invert()?;

        Ok(Self { forward, inverse })
    }

    /// The identity transform; map coordinates equal pixels.
    pub fn identity() -> Self {
        Self {
            forward: Matrix::identity(),
            inverse: Matrix::identity(),
        }
    }

    /// Maps a projected map coordinate to a viewport pixel.
    pub fn map_to_view(&self, point: Point) -> Point {
        self.forward.transform(point)
    }

    /// Maps a viewport pixel back to a projected map coordinate.
    pub fn view_to_map(&self, point: Point) -> Point {
        self.inverse.transform(point)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.forward
    }

    pub fn inverse(&self) -> &Matrix {
        &self.inverse
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}
