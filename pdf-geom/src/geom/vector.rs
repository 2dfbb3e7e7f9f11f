use std::fmt;

use crate::error::{GeomError, Result};
use crate::geom::matrix::Matrix;

/// A homogeneous vector `(x, y, z)`.
///
/// Positions carry `z = 1`, so crossing with a [`Matrix`] applies its translation;
/// directions carry `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    vals: [f32; 3],
}

impl Vector {
    pub const I1: usize = 0;
    pub const I2: usize = 1;
    pub const I3: usize = 2;

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector { vals: [x, y, z] }
    }

    pub fn get(&self, index: usize) -> Result<f32> {
        self.vals
            .get(index)
            .copied()
            .ok_or(GeomError::IndexOutOfRange(index))
    }

    pub fn x(&self) -> f32 {
        self.vals[Self::I1]
    }

    pub fn y(&self) -> f32 {
        self.vals[Self::I2]
    }

    pub fn z(&self) -> f32 {
        self.vals[Self::I3]
    }

    /// Row vector times matrix: `[x y z] * by`.
    pub fn cross_matrix(&self, by: &Matrix) -> Vector {
        let [x, y, z] = self.vals;
        Vector::new(
            x * by.v11 + y * by.v21 + z * by.v31,
            x * by.v12 + y * by.v22 + z * by.v32,
            x * by.v13 + y * by.v23 + z * by.v33,
        )
    }

    pub fn cross(&self, with: &Vector) -> Vector {
        let [x1, y1, z1] = self.vals;
        let [x2, y2, z2] = with.vals;
        Vector::new(y1 * z2 - z1 * y2, z1 * x2 - x1 * z2, x1 * y2 - y1 * x2)
    }

    pub fn subtract(&self, v: &Vector) -> Vector {
        Vector::new(self.x() - v.x(), self.y() - v.y(), self.z() - v.z())
    }

    pub fn dot(&self, with: &Vector) -> f32 {
        self.x() * with.x() + self.y() * with.y() + self.z() * with.z()
    }

    pub fn multiply(&self, by: f32) -> Vector {
        Vector::new(self.x() * by, self.y() * by, self.z() * by)
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. A zero vector normalizes to NaN components.
    pub fn normalize(&self) -> Vector {
        let l = self.length();
        Vector::new(self.x() / l, self.y() / l, self.z() / l)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::Vector;
    use crate::geom::matrix::Matrix;

    #[test]
    fn test_cross_matrix_applies_translation() {
        let m = Matrix::new(2.0, 0.0, 0.0, 3.0, 10.0, 20.0);
        let position = Vector::new(1.0, 1.0, 1.0);
        assert_eq!(position.cross_matrix(&m), Vector::new(12.0, 23.0, 1.0));
        let direction = Vector::new(1.0, 1.0, 0.0);
        assert_eq!(direction.cross_matrix(&m), Vector::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn test_cross_vector() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_length_and_normalize() {
        let v = Vector::new(3.0, 4.0, 0.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.length(), 5.0);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(4.0, 5.0, 6.0);
        assert_eq!(b.subtract(&a), Vector::new(3.0, 3.0, 3.0));
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(a.multiply(2.0), Vector::new(2.0, 4.0, 6.0));
        assert_eq!(a.get(Vector::I3).unwrap(), 3.0);
        assert!(a.get(3).is_err());
    }
}
