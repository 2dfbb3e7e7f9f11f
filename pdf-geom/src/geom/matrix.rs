use std::fmt;
use std::ops::Mul;

use crate::error::{GeomError, Result};

/// A 3x3 transformation matrix in the PDF row-vector convention.
///
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// A point `[x y 1]` is transformed as `[x y 1] * M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub v11: f32,
    pub v12: f32,
    pub v13: f32,
    pub v21: f32,
    pub v22: f32,
    pub v23: f32,
    pub v31: f32,
    pub v32: f32,
    pub v33: f32,
}

impl Matrix {
    pub const I11: usize = 0;
    pub const I12: usize = 1;
    pub const I13: usize = 2;
    pub const I21: usize = 3;
    pub const I22: usize = 4;
    pub const I23: usize = 5;
    pub const I31: usize = 6;
    pub const I32: usize = 7;
    pub const I33: usize = 8;

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Matrix {
            v11: a,
            v12: b,
            v13: 0.0,
            v21: c,
            v22: d,
            v23: 0.0,
            v31: e,
            v32: f,
            v33: 1.0,
        }
    }

    pub fn identity() -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn new_translation_matrix(x: f32, y: f32) -> Matrix {
        Matrix::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Builds a matrix from all nine values in row order.
    pub fn from_values(vals: [f32; 9]) -> Self {
        Matrix {
            v11: vals[0],
            v12: vals[1],
            v13: vals[2],
            v21: vals[3],
            v22: vals[4],
            v23: vals[5],
            v31: vals[6],
            v32: vals[7],
            v33: vals[8],
        }
    }

    pub fn values(&self) -> [f32; 9] {
        [
            self.v11, self.v12, self.v13, self.v21, self.v22, self.v23, self.v31, self.v32,
            self.v33,
        ]
    }

    pub fn get(&self, index: usize) -> Result<f32> {
        self.values()
            .get(index)
            .copied()
            .ok_or(GeomError::IndexOutOfRange(index))
    }

    /// `self * by`: the result applies `self` first and `by` second.
    pub fn multiply(&self, by: &Matrix) -> Matrix {
        Matrix {
            v11: self.v11 * by.v11 + self.v12 * by.v21 + self.v13 * by.v31,
            v12: self.v11 * by.v12 + self.v12 * by.v22 + self.v13 * by.v32,
            v13: self.v11 * by.v13 + self.v12 * by.v23 + self.v13 * by.v33,
            v21: self.v21 * by.v11 + self.v22 * by.v21 + self.v23 * by.v31,
            v22: self.v21 * by.v12 + self.v22 * by.v22 + self.v23 * by.v32,
            v23: self.v21 * by.v13 + self.v22 * by.v23 + self.v23 * by.v33,
            v31: self.v31 * by.v11 + self.v32 * by.v21 + self.v33 * by.v31,
            v32: self.v31 * by.v12 + self.v32 * by.v22 + self.v33 * by.v32,
            v33: self.v31 * by.v13 + self.v32 * by.v23 + self.v33 * by.v33,
        }
    }

    pub fn add(&self, arg: &Matrix) -> Matrix {
        let a = self.values();
        let b = arg.values();
        let mut vals = [0.0; 9];
        for (i, v) in vals.iter_mut().enumerate() {
            *v = a[i] + b[i];
        }
        Matrix::from_values(vals)
    }

    pub fn subtract(&self, arg: &Matrix) -> Matrix {
        let a = self.values();
        let b = arg.values();
        let mut vals = [0.0; 9];
        for (i, v) in vals.iter_mut().enumerate() {
            *v = a[i] - b[i];
        }
        Matrix::from_values(vals)
    }

    // full cofactor expansion, the third column is not assumed to be (0, 0, 1)
    pub fn determinant(&self) -> f32 {
        self.v11 * self.v22 * self.v33
            + self.v12 * self.v23 * self.v31
            + self.v13 * self.v21 * self.v32
            - self.v11 * self.v23 * self.v32
            - self.v12 * self.v21 * self.v33
            - self.v13 * self.v22 * self.v31
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\n{}\t{}\t{}\n{}\t{}\t{}",
            self.v11,
            self.v12,
            self.v13,
            self.v21,
            self.v22,
            self.v23,
            self.v31,
            self.v32,
            self.v33
        )
    }
}
