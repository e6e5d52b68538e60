use crate::core::geo::Point;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// An affine transform with six coefficients:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
///
/// Composition is written left to right with [`Matrix::then`], so a chain
/// reads in the order the transforms are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by an angle in degrees. With y growing downward this turns
    /// content clockwise on screen.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by an angle in degrees about a fixed point.
    pub fn rotation_about(degrees: f64, center: Point) -> Self {
        Self::translation(-center.x, -center.y)
            .then(&Self::rotation(degrees))
            .then(&Self::translation(center.x, center.y))
    }

    /// Composes `self` followed by `after`.
    pub fn then(&self, after: &Matrix) -> Matrix {
        Matrix::new(
            after.a * self.a + after.c * self.b,
            after.b * self.a + after.d * self.b,
            after.a * self.c + after.c * self.d,
            after.b * self.c + after.d * self.d,
            after.a * self.e + after.c * self.f + after.e,
            after.b * self.e + after.d * self.f + after.f,
        )
    }

    /// Applies the transform to a point.
    pub fn transform(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverts the transform, failing on a singular or non-finite linear
    /// part.
    pub fn invert(&self) -> Result<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(MapError::SingularMatrix);
        }
        Ok(Matrix::new(
            self.d / det,
            -self.b / det,
            -self.c / det,
            self.a / det,
            (self.c * self.f - self.d * self.e) / det,
            (self.b * self.e - self.a * self.f) / det,
        ))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point, tolerance: f64) {
        assert!(
            (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_identity() {
        let p = Point::new(3.5, -7.0);
        assert_eq!(Matrix::identity().transform(p), p);
    }

    #[test]
    fn test_composition_order() {
        // Scale then translate is not translate then scale
        let scale = Matrix::scaling(2.0, 2.0);
        let translate = Matrix::translation(10.0, 0.0);
        let p = Point::new(1.0, 0.0);

        assert_eq!(scale.then(&translate).transform(p), Point::new(12.0, 0.0));
        assert_eq!(translate.then(&scale).transform(p), Point::new(22.0, 0.0));
    }

    #[test]
    fn test_rotation() {
        let quarter = Matrix::rotation(90.0);
        assert_close(
            quarter.transform(Point::new(1.0, 0.0)),
            Point::new(0.0, 1.0),
            1e-12,
        );
    }

    #[test]
    fn test_rotation_about_fixed_point() {
        let center = Point::new(5.0, 5.0);
        let rotation = Matrix::rotation_about(137.0, center);
        assert_close(rotation.transform(center), center, 1e-12);
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Matrix::translation(-20.0, 30.0)
            .then(&Matrix::scaling(3.0, -3.0))
            .then(&Matrix::rotation(25.0))
            .then(&Matrix::translation(400.0, 300.0));
        let inverse = m.invert().unwrap();
        let p = Point::new(12.3, -45.6);
        assert_close(inverse.transform(m.transform(p)), p, 1e-9);
    }

    #[test]
    fn test_invert_singular() {
        assert!(Matrix::scaling(0.0, 1.0).invert().is_err());
    }
}
